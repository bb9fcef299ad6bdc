//! Collaborator traits for fetching and discovering banks.
//!
//! The core never touches a filesystem or network itself. These async traits
//! are implemented by the `quizrunner-sources` crate.

use async_trait::async_trait;

use crate::error::LoadError;
use crate::model::BankDescriptor;

/// Something that can turn a bank identifier into raw document text.
#[async_trait]
pub trait BankSource: Send + Sync {
    /// Human-readable source name (e.g. "directory").
    fn name(&self) -> &str;

    /// Fetch the raw document for `identifier`.
    ///
    /// Must return `LoadError::NotFound` when the identifier does not
    /// resolve, so callers can tell a missing bank from a broken one.
    async fn fetch(&self, identifier: &str) -> Result<String, LoadError>;
}

/// Something that knows which banks exist.
#[async_trait]
pub trait BankCatalog: Send + Sync {
    /// List the banks this catalog can offer, in display order.
    async fn list_banks(&self) -> anyhow::Result<Vec<BankDescriptor>>;
}
