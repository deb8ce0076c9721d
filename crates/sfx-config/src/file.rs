//! JSON config file reading.
//!
//! The reader itself does not tolerate a missing file; [`load_optional`]
//! skips paths where nothing exists. Anything that does exist at the path,
//! a directory included, must read and decode as a JSON object.

use std::path::Path;

use crate::{ConfigError, ConfigLayer, Result};

/// Read and decode a config file into a partial layer.
///
/// Fails with [`ConfigError::ReadFile`] if the file cannot be read and with
/// [`ConfigError::Decode`] if its content is not a valid config object.
pub fn read_config_file(path: &Path) -> Result<ConfigLayer> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    ConfigLayer::from_json(&contents).map_err(|e| ConfigError::Decode {
        path: path.display().to_string(),
        source: e,
    })
}

/// Read a config file if one exists at `path`.
///
/// Returns `Ok(None)` when nothing is there; read and decode failures of an
/// existing file are propagated.
pub fn load_optional(path: &Path) -> Result<Option<ConfigLayer>> {
    match std::fs::metadata(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "config file not present, skipping");
            Ok(None)
        }
        Err(e) => Err(ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        }),
        Ok(_) => read_config_file(path).map(Some),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signalfx.conf");
        fs::write(
            &path,
            r#"{"auth_token": "tok", "api_url": "https://api.us1.signalfx.com"}"#,
        )
        .unwrap();

        let layer = read_config_file(&path).unwrap();
        assert_eq!(layer.auth_token.as_deref(), Some("tok"));
        assert_eq!(layer.api_url.as_deref(), Some("https://api.us1.signalfx.com"));
        assert!(layer.custom_app_url.is_none());
    }

    #[test]
    fn test_read_config_file_not_found() {
        let err = read_config_file(Path::new("/nonexistent/signalfx.conf")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_read_config_file_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signalfx.conf");
        fs::write(&path, "auth_token = \"toml is not json\"").unwrap();

        let err = read_config_file(&path).unwrap_err();
        match err {
            ConfigError::Decode { path: p, .. } => assert!(p.ends_with("signalfx.conf")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_config_file_not_an_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signalfx.conf");
        fs::write(&path, r#"["auth_token"]"#).unwrap();

        let err = read_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Decode { .. }));

        fs::write(&path, "42").unwrap();
        let err = read_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Decode { .. }));
    }

    #[test]
    fn test_read_directory_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = read_config_file(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_load_optional_missing() {
        let dir = TempDir::new().unwrap();
        let layer = load_optional(&dir.path().join("absent.conf")).unwrap();
        assert!(layer.is_none());
    }

    #[test]
    fn test_load_optional_directory_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = load_optional(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_load_optional_propagates_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signalfx.conf");
        fs::write(&path, "{{{{").unwrap();

        let err = load_optional(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Decode { .. }));
    }
}
