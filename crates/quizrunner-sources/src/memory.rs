//! In-memory bank source for tests and embedded banks.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizrunner_core::error::LoadError;
use quizrunner_core::model::BankDescriptor;
use quizrunner_core::traits::{BankCatalog, BankSource};

/// A source that serves documents held in memory.
///
/// Banks are listed in insertion order. Fetches are counted so tests can
/// assert how often a collaborator was consulted.
pub struct MemorySource {
    /// Registered banks: descriptor plus raw document text.
    banks: Vec<(BankDescriptor, String)>,
    /// Number of fetches made.
    fetch_count: AtomicU32,
    /// Last identifier requested.
    last_identifier: Mutex<Option<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            banks: Vec::new(),
            fetch_count: AtomicU32::new(0),
            last_identifier: Mutex::new(None),
        }
    }

    /// Register a document under `file`.
    pub fn with_bank(mut self, name: &str, file: &str, content: &str) -> Self {
        self.banks.push((
            BankDescriptor {
                name: name.to_string(),
                file: file.to_string(),
                description: String::new(),
            },
            content.to_string(),
        ));
        self
    }

    /// Get the number of fetches made to this source.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    /// Get the last identifier fetched from this source.
    pub fn last_identifier(&self) -> Option<String> {
        self.last_identifier
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BankSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(&self, identifier: &str) -> Result<String, LoadError> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_identifier
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(identifier.to_string());

        self.banks
            .iter()
            .find(|(descriptor, _)| descriptor.file == identifier)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| LoadError::NotFound(identifier.to_string()))
    }
}

#[async_trait]
impl BankCatalog for MemorySource {
    async fn list_banks(&self) -> anyhow::Result<Vec<BankDescriptor>> {
        Ok(self.banks.iter().map(|(d, _)| d.clone()).collect())
    }
}
