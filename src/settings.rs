use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub globe: GlobeSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct GlobeSettings {
    /// Remote palette JSON; flat colors are used when unset or unreachable.
    pub palette_url: Option<String>,
    /// Default surface node count, overridden by --nodes.
    pub nodes: Option<usize>,
    /// Default color scheme (0-3).
    pub color_scheme: Option<u8>,
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("netsphere")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_settings_parse() {
        let toml = r#"
            [globe]
            palette_url = "https://example.com/palette.json"
            nodes = 600
            color_scheme = 2
        "#;
        let settings: Settings = toml::from_str(toml).expect("valid settings");
        assert_eq!(settings.globe.nodes, Some(600));
        assert_eq!(settings.globe.color_scheme, Some(2));
        assert!(settings.globe.palette_url.is_some());
    }

    #[test]
    fn empty_settings_default() {
        let settings: Settings = toml::from_str("").expect("empty settings");
        assert!(settings.globe.nodes.is_none());
    }
}
