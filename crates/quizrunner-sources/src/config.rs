//! quizrunner configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizrunner_core::engine::{SessionConfig, DEFAULT_MAX_QUESTIONS};

use crate::directory::DirectorySource;

/// Top-level quizrunner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizrunnerConfig {
    /// Directory holding bank documents.
    #[serde(default = "default_banks_dir")]
    pub banks_dir: PathBuf,
    /// Catalog manifest file name inside `banks_dir`.
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// Questions drawn per attempt.
    #[serde(default = "default_max_questions")]
    pub max_questions_per_session: usize,
    /// Seconds allowed per question. Unset means no limit.
    #[serde(default)]
    pub time_limit_secs: Option<u64>,
    /// Where result exports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_banks_dir() -> PathBuf {
    PathBuf::from("./questions")
}
fn default_manifest() -> String {
    "quiz_list.json".to_string()
}
fn default_max_questions() -> usize {
    DEFAULT_MAX_QUESTIONS
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizrunner-results")
}

impl Default for QuizrunnerConfig {
    fn default() -> Self {
        Self {
            banks_dir: default_banks_dir(),
            manifest: default_manifest(),
            max_questions_per_session: default_max_questions(),
            time_limit_secs: None,
            output_dir: default_output_dir(),
        }
    }
}

impl QuizrunnerConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_questions_per_session: self.max_questions_per_session,
        }
    }

    /// A directory source over `banks_dir` using the configured manifest.
    pub fn directory_source(&self) -> DirectorySource {
        DirectorySource::new(&self.banks_dir).with_manifest(&self.manifest)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `quizrunner.toml` in the current directory
/// 2. `~/.config/quizrunner/config.toml`
///
/// Environment variable overrides: `QUIZRUNNER_BANKS_DIR`, `QUIZRUNNER_MAX_QUESTIONS`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizrunnerConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizrunner.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("using config {}", path.display());
            toml::from_str::<QuizrunnerConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizrunnerConfig::default(),
    };

    apply_env_overrides(&mut config)?;

    config.banks_dir = resolve_path(&config.banks_dir);
    config.output_dir = resolve_path(&config.output_dir);

    anyhow::ensure!(
        config.max_questions_per_session >= 1,
        "max_questions_per_session must be at least 1"
    );
    anyhow::ensure!(
        config.time_limit_secs != Some(0),
        "time_limit_secs must be at least 1"
    );

    Ok(config)
}

fn apply_env_overrides(config: &mut QuizrunnerConfig) -> Result<()> {
    if let Ok(dir) = std::env::var("QUIZRUNNER_BANKS_DIR") {
        config.banks_dir = PathBuf::from(dir);
    }

    if let Ok(max) = std::env::var("QUIZRUNNER_MAX_QUESTIONS") {
        config.max_questions_per_session = max
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZRUNNER_MAX_QUESTIONS: '{max}'"))?;
    }

    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizrunner"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZRUNNER_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZRUNNER_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZRUNNER_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars"), "no vars");
        std::env::remove_var("_QUIZRUNNER_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizrunnerConfig::default();
        assert_eq!(config.banks_dir, PathBuf::from("./questions"));
        assert_eq!(config.manifest, "quiz_list.json");
        assert_eq!(config.max_questions_per_session, 10);
        assert_eq!(config.session_config(), SessionConfig::default());
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
banks_dir = "/srv/banks"
max_questions_per_session = 5
"#;
        let config: QuizrunnerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.banks_dir, PathBuf::from("/srv/banks"));
        assert_eq!(config.max_questions_per_session, 5);
        assert_eq!(config.output_dir, PathBuf::from("./quizrunner-results"));
        assert_eq!(config.time_limit_secs, None);
    }

    #[test]
    fn time_limit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timed.toml");
        std::fs::write(&path, "time_limit_secs = 20\n").unwrap();
        assert_eq!(load_config_from(Some(&path)).unwrap().time_limit_secs, Some(20));

        std::fs::write(&path, "time_limit_secs = 0\n").unwrap();
        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("time_limit_secs"));
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from(Some(Path::new("/nonexistent/quizrunner.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "max_questions_per_session = 3\nmanifest = \"index.json\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.manifest, "index.json");
        // The env override may be set by the surrounding environment.
        if std::env::var("QUIZRUNNER_MAX_QUESTIONS").is_err() {
            assert_eq!(config.max_questions_per_session, 3);
        }
    }

    #[test]
    fn zero_question_limit_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.toml");
        std::fs::write(&path, "max_questions_per_session = 0\n").unwrap();
        if std::env::var("QUIZRUNNER_MAX_QUESTIONS").is_err() {
            assert!(load_config_from(Some(&path)).is_err());
        }
    }
}
