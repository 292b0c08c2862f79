use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::error::PackError;

/// Supported mod loaders — strongly typed, no magic strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoaderType {
    Vanilla,
    Forge,
    Fabric,
    NeoForge,
    Quilt,
}

impl std::fmt::Display for LoaderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderType::Vanilla => write!(f, "vanilla"),
            LoaderType::Forge => write!(f, "forge"),
            LoaderType::Fabric => write!(f, "fabric"),
            LoaderType::NeoForge => write!(f, "neoforge"),
            LoaderType::Quilt => write!(f, "quilt"),
        }
    }
}

impl FromStr for LoaderType {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vanilla" => Ok(LoaderType::Vanilla),
            "forge" => Ok(LoaderType::Forge),
            "fabric" => Ok(LoaderType::Fabric),
            "neoforge" => Ok(LoaderType::NeoForge),
            "quilt" => Ok(LoaderType::Quilt),
            _ => Err(PackError::UnsupportedLoader(s.to_string())),
        }
    }
}

/// Settings that end up in `instance.cfg`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    pub name: String,
    pub java_path: Option<PathBuf>,
    pub max_memory_mb: Option<u32>,
}

impl InstanceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            java_path: None,
            max_memory_mb: None,
        }
    }

    /// Render as MultiMC `key=value` lines.
    pub fn to_cfg(&self) -> String {
        let mut lines = vec![
            "InstanceType=OneSix".to_string(),
            format!("name={}", self.name),
        ];
        if let Some(java) = &self.java_path {
            lines.push("OverrideJavaLocation=true".to_string());
            lines.push(format!("JavaPath={}", java.display()));
        }
        if let Some(mem) = self.max_memory_mb {
            lines.push("OverrideMemory=true".to_string());
            lines.push(format!("MaxMemAlloc={}", mem));
        }
        let mut cfg = lines.join("\n");
        cfg.push('\n');
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_names_parse_case_insensitively() {
        assert_eq!("Fabric".parse::<LoaderType>().unwrap(), LoaderType::Fabric);
        assert_eq!("NEOFORGE".parse::<LoaderType>().unwrap(), LoaderType::NeoForge);
        assert_eq!(LoaderType::Quilt.to_string(), "quilt");
    }

    #[test]
    fn unknown_loader_is_unsupported() {
        let err = "liteloader".parse::<LoaderType>().unwrap_err();
        assert!(matches!(err, PackError::UnsupportedLoader(ref l) if l == "liteloader"));
    }

    #[test]
    fn cfg_only_overrides_what_is_set() {
        let mut config = InstanceConfig::new("Skyblock 1.2.0");
        assert_eq!(config.to_cfg(), "InstanceType=OneSix\nname=Skyblock 1.2.0\n");

        config.max_memory_mb = Some(6144);
        assert!(config.to_cfg().ends_with("OverrideMemory=true\nMaxMemAlloc=6144\n"));
        assert!(!config.to_cfg().contains("JavaPath"));
    }
}
