//! Bank document parsing and validation.
//!
//! Accepts JSON documents and comma-delimited text with a header row.
//! Each record is validated independently: a bad record is dropped and its
//! rejection reason collected, and only a bank with zero surviving records
//! fails as a whole.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::error::{BankError, RecordRejection};
use crate::model::{BankFormat, BankInfo, Question, QuestionBank, OPTION_COUNT};

/// Columns a delimited document must declare in its header.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "id", "question", "option1", "option2", "option3", "option4", "correct",
];

/// Optional trailing column of a delimited document.
pub const WEIGHT_COLUMN: &str = "weight";

/// A validated bank plus the records dropped on the way.
#[derive(Debug, Clone)]
pub struct ValidatedBank {
    pub bank: QuestionBank,
    /// Per-record rejection reasons, in document order.
    pub rejected: Vec<RecordRejection>,
}

/// Parse and validate a document of the given format.
///
/// `identifier` names the bank when the document carries no name of its own.
pub fn parse_bank_str(
    content: &str,
    format: BankFormat,
    identifier: &str,
) -> std::result::Result<ValidatedBank, BankError> {
    match format {
        BankFormat::Json => {
            let value: Value = serde_json::from_str(content)
                .map_err(|e| BankError::Malformed(format!("invalid JSON: {e}")))?;
            validate_json_document(&value, identifier)
        }
        BankFormat::Delimited => validate_delimited(content, identifier),
    }
}

/// Validate an already-parsed JSON document.
pub fn validate_json_document(
    value: &Value,
    identifier: &str,
) -> std::result::Result<ValidatedBank, BankError> {
    let Some(object) = value.as_object() else {
        return Err(BankError::Malformed(
            "top level must be an object with a `questions` array".into(),
        ));
    };
    let Some(records) = object.get("questions").and_then(Value::as_array) else {
        return Err(BankError::Malformed("missing `questions` array".into()));
    };

    let info = json_info(object.get("info"), identifier);

    let mut accumulator = Accumulator::default();
    for (i, record) in records.iter().enumerate() {
        let position = i + 1;
        match json_record(record) {
            Ok(question) => accumulator.accept(position, question),
            Err((id, reason)) => accumulator.reject(position, id, reason),
        }
    }

    accumulator.finish(info)
}

fn json_info(info: Option<&Value>, identifier: &str) -> BankInfo {
    let field = |key: &str| {
        info.and_then(|v| v.get(key))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    BankInfo {
        name: field("name").unwrap_or_else(|| name_from_identifier(identifier)),
        description: field("description").unwrap_or_default(),
        version: field("version"),
    }
}

type RecordResult = std::result::Result<Question, (Option<i64>, String)>;

fn json_record(record: &Value) -> RecordResult {
    let Some(fields) = record.as_object() else {
        return Err((None, "record is not an object".into()));
    };

    let id = match fields.get("id") {
        Some(v) => json_integer(v).ok_or((None, "`id` is not numeric".to_string()))?,
        None => return Err((None, "missing `id`".into())),
    };
    let fail = |reason: String| (Some(id), reason);

    let prompt = json_string(fields, "question").map_err(fail)?;

    let options = match fields.get("options") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str()
                    .map(String::from)
                    .ok_or_else(|| format!("option {} is not a string", i + 1))
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(fail)?,
        Some(_) => return Err(fail("`options` is not an array".into())),
        None => return Err(fail("missing `options`".into())),
    };

    let correct = match fields.get("correct") {
        Some(v) => json_integer(v).ok_or_else(|| fail("`correct` is not numeric".into()))?,
        None => return Err(fail("missing `correct`".into())),
    };

    let weight = match fields.get("weight") {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            v.as_f64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
                .ok_or_else(|| fail("`weight` is not numeric".into()))?,
        ),
    };

    build_question(id, prompt, options, correct, weight).map_err(fail)
}

fn json_string(fields: &Map<String, Value>, key: &str) -> std::result::Result<String, String> {
    match fields.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(format!("`{key}` is not a string")),
        None => Err(format!("missing `{key}`")),
    }
}

/// Integers may arrive as numbers or as integer-valued strings.
fn json_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f))
                    .map(|f| f as i64)
            }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Validate comma-delimited text.
///
/// The first line is the header. Fields are split on every comma: quoting
/// and escaping are not supported, so a record with more fields than the
/// header declares is rejected rather than guessed at.
pub fn validate_delimited(
    content: &str,
    identifier: &str,
) -> std::result::Result<ValidatedBank, BankError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.lines().enumerate();

    let Some((_, header_line)) = lines.next() else {
        return Err(BankError::Malformed("empty document".into()));
    };
    let header: Vec<String> = header_line
        .split(',')
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();

    let column = |name: &str| header.iter().position(|h| h == name);
    let mut required = [0usize; REQUIRED_COLUMNS.len()];
    let mut missing = Vec::new();
    for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
        match column(name) {
            Some(index) => *slot = index,
            None => missing.push(name),
        }
    }
    if !missing.is_empty() {
        return Err(BankError::Malformed(format!(
            "header is missing column(s): {}",
            missing.join(", ")
        )));
    }
    let weight_column = column(WEIGHT_COLUMN);

    let mut accumulator = Accumulator::default();
    for (index, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let position = index + 1;
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        match delimited_record(&fields, header.len(), &required, weight_column) {
            Ok(question) => accumulator.accept(position, question),
            Err((id, reason)) => accumulator.reject(position, id, reason),
        }
    }

    accumulator.finish(BankInfo {
        name: name_from_identifier(identifier),
        description: String::new(),
        version: None,
    })
}

fn delimited_record(
    fields: &[&str],
    width: usize,
    required: &[usize; REQUIRED_COLUMNS.len()],
    weight_column: Option<usize>,
) -> RecordResult {
    let get = |i: usize| fields.get(i).copied().unwrap_or("");

    let id = get(required[0])
        .parse::<i64>()
        .map_err(|_| (None, "`id` is not numeric".to_string()))?;
    let fail = |reason: String| (Some(id), reason);

    if fields.len() > width {
        return Err(fail(format!(
            "expected at most {width} fields, found {} (embedded commas are not supported)",
            fields.len()
        )));
    }

    let prompt = get(required[1]).to_string();
    let options = required[2..6].iter().map(|&i| get(i).to_string()).collect();
    let correct = get(required[6])
        .parse::<i64>()
        .map_err(|_| fail("`correct` is not numeric".into()))?;
    let weight = match weight_column.map(get).filter(|w| !w.is_empty()) {
        Some(w) => Some(
            w.parse::<f64>()
                .map_err(|_| fail("`weight` is not numeric".into()))?,
        ),
        None => None,
    };

    build_question(id, prompt, options, correct, weight).map_err(fail)
}

/// Checks shared by both formats once the fields have been extracted.
fn build_question(
    id: i64,
    prompt: String,
    options: Vec<String>,
    correct: i64,
    weight: Option<f64>,
) -> std::result::Result<Question, String> {
    if prompt.trim().is_empty() {
        return Err("question text is empty".into());
    }

    let options: [String; OPTION_COUNT] = options.try_into().map_err(|o: Vec<String>| {
        format!("expected {OPTION_COUNT} options, found {}", o.len())
    })?;
    if let Some(i) = options.iter().position(|o| o.trim().is_empty()) {
        return Err(format!("option {} is empty", i + 1));
    }

    let correct_index = usize::try_from(correct)
        .ok()
        .filter(|&c| c < OPTION_COUNT)
        .ok_or_else(|| format!("correct index {correct} is outside 0..={}", OPTION_COUNT - 1))?;

    let weight = weight.unwrap_or(1.0);
    if !(weight.is_finite() && weight > 0.0) {
        return Err(format!("weight {weight} is not a positive number"));
    }

    Ok(Question {
        id,
        prompt,
        options,
        correct_index,
        weight,
    })
}

#[derive(Default)]
struct Accumulator {
    questions: Vec<Question>,
    rejected: Vec<RecordRejection>,
    seen_ids: HashSet<i64>,
}

impl Accumulator {
    fn accept(&mut self, position: usize, question: Question) {
        if !self.seen_ids.insert(question.id) {
            let id = question.id;
            self.reject(position, Some(id), format!("duplicate id {id}"));
            return;
        }
        self.questions.push(question);
    }

    fn reject(&mut self, position: usize, id: Option<i64>, reason: String) {
        self.rejected.push(RecordRejection {
            position,
            id,
            reason,
        });
    }

    fn finish(self, info: BankInfo) -> std::result::Result<ValidatedBank, BankError> {
        if self.questions.is_empty() {
            return Err(BankError::EmptyBank {
                rejected: self.rejected,
            });
        }
        Ok(ValidatedBank {
            bank: QuestionBank {
                info,
                questions: self.questions,
            },
            rejected: self.rejected,
        })
    }
}

/// Display name for a bank that does not carry one: the file stem with
/// underscores turned into spaces.
pub fn name_from_identifier(identifier: &str) -> String {
    let stem = Path::new(identifier)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(identifier);
    stem.replace('_', " ")
}

/// Parse and validate a bank file from disk.
pub fn parse_bank_file(path: &Path) -> Result<ValidatedBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;
    let identifier = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    parse_bank_str(&content, BankFormat::from_identifier(identifier), identifier)
        .with_context(|| format!("invalid bank: {}", path.display()))
}

/// Recursively load every `.json` / `.csv` bank under a directory.
///
/// Files that fail validation are logged and skipped.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<(PathBuf, ValidatedBank)>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if is_bank_file(&path) {
            match parse_bank_file(&path) {
                Ok(bank) => banks.push((path, bank)),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Whether a path looks like a bank document.
pub fn is_bank_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("csv"))
}
