//! Filesystem bank source rooted at a directory.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use serde_json::Value;

use quizrunner_core::error::LoadError;
use quizrunner_core::model::BankDescriptor;
use quizrunner_core::traits::{BankCatalog, BankSource};
use quizrunner_core::validate::{is_bank_file, name_from_identifier};

/// Serves bank documents from a directory and lists what it holds.
///
/// Identifiers are file names relative to the root. Discovery scans the
/// root for `.json` and `.csv` files, then merges entries from an optional
/// manifest (`quiz_list.json` by default) that the scan did not find.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    manifest: String,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    quizzes: Vec<BankDescriptor>,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            manifest: "quiz_list.json".to_string(),
        }
    }

    /// Use a different manifest file name.
    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.manifest = manifest.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an identifier to a path under the root, refusing anything that
    /// could escape it.
    fn resolve(&self, identifier: &str) -> Option<PathBuf> {
        let relative = Path::new(identifier);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        (contained && !identifier.is_empty()).then(|| self.root.join(relative))
    }

    /// Read the bank's own name and description without full validation.
    ///
    /// JSON files without a `questions` array are not banks and yield `None`.
    async fn describe(&self, file: String) -> Option<BankDescriptor> {
        let path = self.root.join(&file);
        if !file.to_ascii_lowercase().ends_with(".json") {
            return Some(BankDescriptor {
                name: name_from_identifier(&file),
                file,
                description: String::new(),
            });
        }

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("skipping {}: {e}", path.display());
                return None;
            }
        };
        let value: Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("skipping {}: invalid JSON: {e}", path.display());
                return None;
            }
        };
        if !value.get("questions").is_some_and(Value::is_array) {
            tracing::debug!("skipping {}: no questions array", path.display());
            return None;
        }

        let info = |key: &str| {
            value
                .get("info")
                .and_then(|i| i.get(key))
                .and_then(Value::as_str)
                .map(String::from)
        };
        Some(BankDescriptor {
            name: info("name").unwrap_or_else(|| name_from_identifier(&file)),
            description: info("description").unwrap_or_default(),
            file,
        })
    }

    async fn read_manifest(&self) -> Vec<BankDescriptor> {
        let path = self.root.join(&self.manifest);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str::<Manifest>(&content) {
            Ok(manifest) => manifest.quizzes,
            Err(e) => {
                tracing::warn!("ignoring manifest {}: {e}", path.display());
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl BankSource for DirectorySource {
    fn name(&self) -> &str {
        "directory"
    }

    async fn fetch(&self, identifier: &str) -> Result<String, LoadError> {
        let path = self
            .resolve(identifier)
            .ok_or_else(|| LoadError::NotFound(identifier.to_string()))?;

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LoadError::NotFound(identifier.to_string()))
            }
            Err(e) => Err(LoadError::Io {
                identifier: identifier.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

#[async_trait]
impl BankCatalog for DirectorySource {
    async fn list_banks(&self) -> Result<Vec<BankDescriptor>> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .with_context(|| format!("failed to read bank directory: {}", self.root.display()))?;

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(file) = path.file_name().and_then(|f| f.to_str()) else {
                continue;
            };
            if file != self.manifest && path.is_file() && is_bank_file(&path) {
                files.push(file.to_string());
            }
        }
        files.sort();

        let mut banks: Vec<BankDescriptor> = join_all(files.into_iter().map(|f| self.describe(f)))
            .await
            .into_iter()
            .flatten()
            .collect();

        for entry in self.read_manifest().await {
            if !banks.iter().any(|b| b.file == entry.file) {
                banks.push(entry);
            }
        }

        Ok(banks)
    }
}
