use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::model::InstanceConfig;
use super::pack::PackManifest;
use crate::core::error::{PackError, PackResult};

pub const PACK_FILE: &str = "mmc-pack.json";
pub const CONFIG_FILE: &str = "instance.cfg";

/// Writes a launcher instance folder.
///
/// Layout:
/// - `<instance>/.minecraft/`  — game working directory
/// - `<instance>/mmc-pack.json`
/// - `<instance>/instance.cfg`
pub struct InstanceWriter {
    instance_dir: PathBuf,
    overwrite: bool,
}

impl InstanceWriter {
    pub fn new(instance_dir: impl Into<PathBuf>) -> Self {
        Self {
            instance_dir: instance_dir.into(),
            overwrite: false,
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn pack_path(&self) -> PathBuf {
        self.instance_dir.join(PACK_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.instance_dir.join(CONFIG_FILE)
    }

    /// Both files are staged under temporary names first; `mmc-pack.json`
    /// only appears once `instance.cfg` is in place.
    pub async fn write(&self, config: &InstanceConfig, manifest: &PackManifest) -> PackResult<()> {
        let pack_path = self.pack_path();
        let exists = tokio::fs::try_exists(&pack_path)
            .await
            .map_err(|source| PackError::Io {
                path: pack_path.clone(),
                source,
            })?;
        if exists && !self.overwrite {
            return Err(PackError::Other(format!(
                "{} already exists (use --overwrite to replace it)",
                pack_path.display()
            )));
        }

        create_dir_safe(&self.instance_dir.join(".minecraft")).await?;

        let config_path = self.config_path();
        let pack_tmp = staging_path(&pack_path);
        let config_tmp = staging_path(&config_path);

        let staged: PackResult<()> = async {
            write_safe(&pack_tmp, manifest.to_json_string()?).await?;
            write_safe(&config_tmp, config.to_cfg()).await?;
            rename_safe(&config_tmp, &config_path).await?;
            rename_safe(&pack_tmp, &pack_path).await
        }
        .await;

        if let Err(e) = staged {
            for tmp in [&pack_tmp, &config_tmp] {
                if let Err(cleanup) = tokio::fs::remove_file(tmp).await {
                    debug!("Could not remove {:?}: {}", tmp, cleanup);
                }
            }
            return Err(e);
        }

        info!(
            "Wrote instance '{}' with {} components to {:?}",
            config.name,
            manifest.components.len(),
            self.instance_dir
        );
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn rename_safe(from: &Path, to: &Path) -> PackResult<()> {
    tokio::fs::rename(from, to)
        .await
        .map_err(|source| PackError::Io {
            path: to.to_path_buf(),
            source,
        })
}

async fn create_dir_safe(path: &Path) -> PackResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| PackError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_safe(path: &Path, contents: String) -> PackResult<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| PackError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instance::PackComponent;

    fn manifest() -> PackManifest {
        PackManifest {
            format_version: 1,
            components: vec![PackComponent {
                uid: "net.minecraft".into(),
                version: "1.20.1".into(),
                cached_name: "Minecraft".into(),
                cached_version: "1.20.1".into(),
                cached_volatile: false,
                important: true,
                dependency_only: false,
                cached_requires: vec![],
            }],
        }
    }

    #[tokio::test]
    async fn writes_pack_and_config() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("Skyblock");
        let writer = InstanceWriter::new(&dir);

        writer
            .write(&InstanceConfig::new("Skyblock"), &manifest())
            .await
            .unwrap();

        assert!(dir.join(".minecraft").is_dir());
        let pack: PackManifest =
            serde_json::from_str(&std::fs::read_to_string(dir.join(PACK_FILE)).unwrap()).unwrap();
        assert_eq!(pack, manifest());
        let cfg = std::fs::read_to_string(dir.join(CONFIG_FILE)).unwrap();
        assert!(cfg.contains("name=Skyblock"));
    }

    #[tokio::test]
    async fn refuses_to_replace_existing_pack() {
        let tmp = tempfile::tempdir().unwrap();
        let config = InstanceConfig::new("Skyblock");

        InstanceWriter::new(tmp.path())
            .write(&config, &manifest())
            .await
            .unwrap();
        let err = InstanceWriter::new(tmp.path())
            .write(&config, &manifest())
            .await
            .unwrap_err();
        assert!(matches!(err, PackError::Other(_)), "{err}");

        InstanceWriter::new(tmp.path())
            .overwrite(true)
            .write(&config, &manifest())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_config_write_leaves_no_pack_file() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory in place of instance.cfg makes the final rename fail.
        std::fs::create_dir_all(tmp.path().join(CONFIG_FILE).join("occupied")).unwrap();

        let err = InstanceWriter::new(tmp.path())
            .write(&InstanceConfig::new("Skyblock"), &manifest())
            .await
            .unwrap_err();

        assert!(
            matches!(&err, PackError::Io { path, .. } if path.ends_with(CONFIG_FILE)),
            "{err}"
        );
        assert!(!tmp.path().join(PACK_FILE).exists());
        assert!(!tmp.path().join("mmc-pack.json.tmp").exists());
        assert!(!tmp.path().join("instance.cfg.tmp").exists());
    }

    #[test]
    fn staging_path_appends_suffix() {
        assert_eq!(
            staging_path(Path::new("/x/mmc-pack.json")),
            PathBuf::from("/x/mmc-pack.json.tmp")
        );
    }
}
