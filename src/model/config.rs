use serde::{Deserialize, Serialize};

use super::todo::FlagVocabulary;

/// Configuration from orgenda.toml. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub flags: FlagConfig,
    #[serde(default)]
    pub agenda: AgendaConfig,
    #[serde(default)]
    pub files: FilesConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlagConfig {
    #[serde(default)]
    pub vocabulary: FlagVocabulary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaConfig {
    #[serde(default)]
    pub days_before_showing: u32,
    #[serde(default = "default_days_after")]
    pub days_after_showing: u32,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        AgendaConfig {
            days_before_showing: 0,
            days_after_showing: default_days_after(),
        }
    }
}

/// A week starting today
fn default_days_after() -> u32 {
    6
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Extensions scanned when a directory is given (without the dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "org".to_string()]
}

impl FilesConfig {
    pub fn matches(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.agenda.days_after_showing, 6);
        assert!(config.flags.vocabulary.contains("POSTPONED"));
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"[flags]
vocabulary = ["TODO", "DONE", "NEXT"]

[agenda]
days_before_showing = 2
"#,
        )
        .unwrap();
        assert!(config.flags.vocabulary.contains("NEXT"));
        assert!(!config.flags.vocabulary.contains("WAITING"));
        assert_eq!(config.agenda.days_before_showing, 2);
        assert_eq!(config.agenda.days_after_showing, 6);
        assert_eq!(config.files.extensions, vec!["md", "org"]);
    }

    #[test]
    fn test_files_matches_extension() {
        let files = FilesConfig::default();
        assert!(files.matches(std::path::Path::new("notes/a.md")));
        assert!(files.matches(std::path::Path::new("b.org")));
        assert!(!files.matches(std::path::Path::new("c.txt")));
        assert!(!files.matches(std::path::Path::new("Makefile")));
    }
}
