//! TOML configuration file reading and parsing.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Read `path` and deserialize it as TOML into `T`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::InvalidSyntax`] if it is not valid TOML for `T` (including
/// missing keys).
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content, path)
}

/// Parse TOML `content`, attributing errors to `path`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSyntax`] if parsing fails.
pub fn parse_config<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::InvalidSyntax {
        file: path.display().to_string(),
        message: e.message().to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
        items: Vec<String>,
    }

    #[test]
    fn parse_valid_toml() {
        let s: Sample =
            parse_config("name = \"x\"\nitems = [\"a\", \"b\"]\n", Path::new("s.toml")).unwrap();
        assert_eq!(s.name, "x");
        assert_eq!(s.items, vec!["a", "b"]);
    }

    #[test]
    fn parse_missing_key_names_file() {
        let err = parse_config::<Sample>("name = \"x\"\n", Path::new("s.toml")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("s.toml"), "unexpected message: {msg}");
        assert!(msg.contains("items"), "unexpected message: {msg}");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_config::<Sample>(&tmp.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
