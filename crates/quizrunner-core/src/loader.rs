//! Single-bank loading: fetch through a source, then validate.

use crate::error::LoadError;
use crate::model::BankFormat;
use crate::traits::BankSource;
use crate::validate::{parse_bank_str, ValidatedBank};

/// Load and validate the bank named by `identifier`.
///
/// The format is picked from the identifier's extension. Dropped records are
/// logged and returned alongside the bank.
pub async fn load_bank(
    source: &dyn BankSource,
    identifier: &str,
) -> Result<ValidatedBank, LoadError> {
    let content = source.fetch(identifier).await?;
    let format = BankFormat::from_identifier(identifier);

    let validated = parse_bank_str(&content, format, identifier).inspect_err(|e| {
        tracing::warn!("bank '{identifier}' from {} rejected: {e}", source.name());
    })?;

    for rejection in &validated.rejected {
        tracing::warn!("{identifier}: dropped {rejection}");
    }
    tracing::debug!(
        "loaded '{}' ({} questions, {} dropped) from {}",
        validated.bank.info.name,
        validated.bank.len(),
        validated.rejected.len(),
        source.name()
    );

    Ok(validated)
}
