use std::collections::BTreeMap;

use tracing::warn;

use crate::core::error::{PackError, PackResult};
use crate::core::instance::LoaderType;
use crate::core::meta::MINECRAFT_UID;

/// Metadata components a loader is made of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderComponents {
    /// Pinned to the loader version.
    pub loader_uid: Option<String>,
    /// Mapping layer pinned to the Minecraft version.
    pub mapping_uid: Option<String>,
}

impl LoaderComponents {
    pub fn new(loader_uid: Option<&str>, mapping_uid: Option<&str>) -> Self {
        Self {
            loader_uid: loader_uid.map(str::to_string),
            mapping_uid: mapping_uid.map(str::to_string),
        }
    }
}

/// Table of supported loaders. Built once at startup and passed around
/// by reference.
#[derive(Debug, Clone)]
pub struct LoaderRegistry {
    loaders: BTreeMap<LoaderType, LoaderComponents>,
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        let loaders = BTreeMap::from([
            (LoaderType::Vanilla, LoaderComponents::new(None, None)),
            (
                LoaderType::Forge,
                LoaderComponents::new(Some("net.minecraftforge"), None),
            ),
            (
                LoaderType::Fabric,
                LoaderComponents::new(
                    Some("net.fabricmc.fabric-loader"),
                    Some("net.fabricmc.intermediary"),
                ),
            ),
            (
                LoaderType::Quilt,
                LoaderComponents::new(
                    Some("org.quiltmc.quilt-loader"),
                    Some("net.fabricmc.intermediary"),
                ),
            ),
            (
                LoaderType::NeoForge,
                LoaderComponents::new(Some("net.neoforged"), None),
            ),
        ]);
        Self { loaders }
    }
}

impl LoaderRegistry {
    pub fn empty() -> Self {
        Self {
            loaders: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, loader: LoaderType, components: LoaderComponents) -> PackResult<()> {
        if self.loaders.contains_key(&loader) {
            return Err(PackError::Config(format!("Duplicate loader: {}", loader)));
        }
        self.loaders.insert(loader, components);
        Ok(())
    }

    pub fn get(&self, loader: LoaderType) -> PackResult<&LoaderComponents> {
        self.loaders
            .get(&loader)
            .ok_or_else(|| PackError::UnsupportedLoader(loader.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (LoaderType, &LoaderComponents)> {
        self.loaders.iter().map(|(l, c)| (*l, c))
    }

    /// Whether `uid` may be seeded for `loader`: the runtime, or one of the
    /// loader's own components. Components of other loaders are not.
    pub fn knows_component(&self, loader: LoaderType, uid: &str) -> bool {
        uid == MINECRAFT_UID
            || self.loaders.get(&loader).is_some_and(|c| {
                c.loader_uid.as_deref() == Some(uid) || c.mapping_uid.as_deref() == Some(uid)
            })
    }

    /// Reject seeds naming components outside `loader`'s supported table.
    pub fn check_seed(&self, loader: LoaderType, seed: &BTreeMap<String, String>) -> PackResult<()> {
        match seed.keys().find(|uid| !self.knows_component(loader, uid)) {
            Some(uid) => Err(PackError::UnsupportedComponent(format!(
                "{} (not part of {})",
                uid, loader
            ))),
            None => Ok(()),
        }
    }

    /// Seed set for a loader: the loader itself at `loader_version` and its
    /// mapping layer at the Minecraft version. The runtime comes in through
    /// their requirements. Vanilla seeds the runtime directly.
    pub fn seed_for(
        &self,
        loader: LoaderType,
        minecraft_version: &str,
        loader_version: Option<&str>,
    ) -> PackResult<BTreeMap<String, String>> {
        let components = self.get(loader)?;
        let loader_version = loader_version.filter(|v| !v.is_empty());
        let mut seed = BTreeMap::new();

        match (&components.loader_uid, loader_version) {
            (Some(uid), Some(version)) => {
                seed.insert(uid.clone(), version.to_string());
            }
            (Some(uid), None) => {
                return Err(PackError::UnsupportedComponent(format!(
                    "{} ({} needs a loader version)",
                    uid, loader
                )));
            }
            (None, Some(version)) => {
                warn!("Ignoring loader version {} for {}", version, loader);
            }
            (None, None) => {}
        }

        if let Some(uid) = &components.mapping_uid {
            seed.insert(uid.clone(), minecraft_version.to_string());
        }

        if seed.is_empty() {
            seed.insert(MINECRAFT_UID.to_string(), minecraft_version.to_string());
        }

        Ok(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fabric_seeds_loader_and_intermediary() {
        let seed = LoaderRegistry::default()
            .seed_for(LoaderType::Fabric, "1.20.1", Some("0.15.0"))
            .unwrap();
        assert_eq!(
            seed,
            BTreeMap::from([
                ("net.fabricmc.fabric-loader".to_string(), "0.15.0".to_string()),
                ("net.fabricmc.intermediary".to_string(), "1.20.1".to_string()),
            ])
        );
    }

    #[test]
    fn forge_seeds_only_the_loader() {
        let seed = LoaderRegistry::default()
            .seed_for(LoaderType::Forge, "1.20.1", Some("47.2.0"))
            .unwrap();
        assert_eq!(seed.len(), 1);
        assert_eq!(seed["net.minecraftforge"], "47.2.0");
    }

    #[test]
    fn vanilla_seeds_the_runtime() {
        let seed = LoaderRegistry::default()
            .seed_for(LoaderType::Vanilla, "1.20.1", None)
            .unwrap();
        assert_eq!(seed[MINECRAFT_UID], "1.20.1");
    }

    #[test]
    fn loader_without_version_is_rejected() {
        let err = LoaderRegistry::default()
            .seed_for(LoaderType::Quilt, "1.20.1", Some(""))
            .unwrap_err();
        assert!(matches!(err, PackError::UnsupportedComponent(_)), "{err}");
    }

    #[test]
    fn unregistered_loader_is_unsupported() {
        let err = LoaderRegistry::empty()
            .seed_for(LoaderType::Fabric, "1.20.1", Some("0.15.0"))
            .unwrap_err();
        assert!(matches!(err, PackError::UnsupportedLoader(ref l) if l == "fabric"));
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = LoaderRegistry::default();
        let err = registry
            .register(LoaderType::Forge, LoaderComponents::new(Some("x"), None))
            .unwrap_err();
        assert!(matches!(err, PackError::Config(_)));
    }

    #[test]
    fn seed_with_unknown_component_is_rejected() {
        let registry = LoaderRegistry::default();
        let seed = BTreeMap::from([
            (MINECRAFT_UID.to_string(), "1.20.1".to_string()),
            ("com.example.unknown".to_string(), "1".to_string()),
        ]);
        let err = registry.check_seed(LoaderType::Vanilla, &seed).unwrap_err();
        assert!(
            matches!(err, PackError::UnsupportedComponent(ref msg) if msg.starts_with("com.example.unknown")),
            "{err}"
        );
    }

    #[test]
    fn seed_with_another_loaders_component_is_rejected() {
        let registry = LoaderRegistry::default();
        let mut seed = registry
            .seed_for(LoaderType::Fabric, "1.20.1", Some("0.15.0"))
            .unwrap();
        registry.check_seed(LoaderType::Fabric, &seed).unwrap();

        seed.insert("net.minecraftforge".to_string(), "47.2.0".to_string());
        let err = registry.check_seed(LoaderType::Fabric, &seed).unwrap_err();
        assert!(
            matches!(err, PackError::UnsupportedComponent(ref msg) if msg.starts_with("net.minecraftforge")),
            "{err}"
        );
    }

    #[test]
    fn quilt_may_seed_shared_intermediary() {
        let registry = LoaderRegistry::default();
        assert!(registry.knows_component(LoaderType::Quilt, "net.fabricmc.intermediary"));
        assert!(registry.knows_component(LoaderType::Forge, MINECRAFT_UID));
        assert!(!registry.knows_component(LoaderType::Forge, "net.neoforged"));
    }
}
