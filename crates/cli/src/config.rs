//! Loads `CanvasConfig` overrides from an optional TOML file, the way
//! `oxidized` loads its config: parse on a best-effort basis, falling
//! back to defaults on a missing file or a parse error rather than
//! failing the run.

use std::path::Path;

use canvas_core::CanvasConfig;

pub fn load_config(path: Option<&Path>) -> CanvasConfig {
    let Some(path) = path else {
        return CanvasConfig::default();
    };

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str::<CanvasConfig>(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("failed to parse config file {}: {e}; using defaults", path.display());
                CanvasConfig::default()
            }
        },
        Err(e) => {
            tracing::warn!("failed to read config file {}: {e}; using defaults", path.display());
            CanvasConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_path_returns_defaults() {
        assert_eq!(load_config(None), CanvasConfig::default());
    }

    #[test]
    fn unreadable_path_falls_back_to_defaults() {
        assert_eq!(load_config(Some(Path::new("/nonexistent/canvas.toml"))), CanvasConfig::default());
    }

    #[test]
    fn partial_overrides_merge_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.toml");
        std::fs::write(&path, "grid_size = 8.0\nsnapshot_ttl_hours = 12\n").unwrap();
        let config = load_config(Some(&path));
        assert_eq!(config.grid_size, 8.0);
        assert_eq!(config.snapshot_ttl_hours, 12);
        assert_eq!(config.default_node_w, CanvasConfig::default().default_node_w);
    }

    #[test]
    fn invalid_toml_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.toml");
        std::fs::write(&path, "not valid toml {{{").unwrap();
        assert_eq!(load_config(Some(&path)), CanvasConfig::default());
    }
}
