use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use crate::core::error::{PackError, PackResult};
use crate::core::instance::{InstanceConfig, InstanceWriter, LoaderType, PackManifest};
use crate::core::meta::{
    ComponentDescriptor, ComponentResolver, MetadataSource, Resolution, MINECRAFT_UID,
};
use crate::core::state::AppState;

/// What to build a pack for.
#[derive(Debug, Clone)]
pub struct PackRequest {
    pub loader: LoaderType,
    pub minecraft_version: String,
    pub loader_version: Option<String>,
    /// Additional `uid -> version` seeds.
    pub extra_components: BTreeMap<String, String>,
}

impl PackRequest {
    pub fn new(loader: LoaderType, minecraft_version: impl Into<String>) -> Self {
        Self {
            loader,
            minecraft_version: minecraft_version.into(),
            loader_version: None,
            extra_components: BTreeMap::new(),
        }
    }

    pub fn loader_version(mut self, version: impl Into<String>) -> Self {
        self.loader_version = Some(version.into());
        self
    }
}

#[derive(Debug)]
pub struct LoaderInfo {
    pub loader: LoaderType,
    pub loader_uid: Option<String>,
    pub mapping_uid: Option<String>,
}

/// Parse a `uid=version` pin.
pub fn parse_component_pin(raw: &str) -> PackResult<(String, String)> {
    match raw.split_once('=') {
        Some((uid, version)) if !uid.trim().is_empty() && !version.trim().is_empty() => {
            Ok((uid.trim().to_string(), version.trim().to_string()))
        }
        _ => Err(PackError::Other(format!(
            "Invalid component '{}', expected uid=version",
            raw
        ))),
    }
}

/// Seed set for a request. Unsupported loaders and components are rejected
/// here, before anything is fetched.
pub fn pack_seed(state: &AppState, request: &PackRequest) -> PackResult<BTreeMap<String, String>> {
    let mut seed = state.loaders.seed_for(
        request.loader,
        &request.minecraft_version,
        request.loader_version.as_deref(),
    )?;
    for (uid, version) in &request.extra_components {
        match seed.get(uid) {
            Some(seeded) if seeded != version => {
                return Err(PackError::UnsupportedComponent(format!(
                    "{}={} (already seeded at {})",
                    uid, version, seeded
                )));
            }
            Some(_) => {}
            None => {
                seed.insert(uid.clone(), version.clone());
            }
        }
    }
    state.loaders.check_seed(request.loader, &seed)?;
    Ok(seed)
}

/// Resolve a request against an explicit metadata source.
pub async fn resolve_with<S: MetadataSource + ?Sized>(
    state: &AppState,
    source: &S,
    request: &PackRequest,
) -> PackResult<Resolution> {
    let seed = pack_seed(state, request)?;
    info!(
        "Resolving {} {} for Minecraft {}",
        request.loader,
        request.loader_version.as_deref().unwrap_or("-"),
        request.minecraft_version
    );

    ComponentResolver::new(source)
        .with_concurrency(state.settings.fetch_concurrency)
        .resolve(&seed, MINECRAFT_UID)
        .await
}

pub async fn resolve_components(state: &AppState, request: &PackRequest) -> PackResult<Resolution> {
    let source = state.metadata_source();
    resolve_with(state, &source, request).await
}

pub async fn build_loader_pack(state: &AppState, request: &PackRequest) -> PackResult<PackManifest> {
    let resolution = resolve_components(state, request).await?;
    Ok(PackManifest::from_resolution(&resolution))
}

pub async fn write_instance(
    state: &AppState,
    request: &PackRequest,
    config: &InstanceConfig,
    instance_dir: &Path,
    overwrite: bool,
) -> PackResult<PackManifest> {
    let manifest = build_loader_pack(state, request).await?;
    InstanceWriter::new(instance_dir)
        .overwrite(overwrite)
        .write(config, &manifest)
        .await?;
    Ok(manifest)
}

pub async fn describe_component(
    state: &AppState,
    uid: &str,
    version: &str,
) -> PackResult<ComponentDescriptor> {
    state.metadata_source().fetch(uid, version).await
}

pub fn list_loaders(state: &AppState) -> Vec<LoaderInfo> {
    state
        .loaders
        .iter()
        .map(|(loader, components)| LoaderInfo {
            loader,
            loader_uid: components.loader_uid.clone(),
            mapping_uid: components.mapping_uid.clone(),
        })
        .collect()
}

/// Human readable component list, one line per component in load order.
pub fn render_resolution(resolution: &Resolution) -> String {
    let width = resolution
        .components()
        .iter()
        .map(|c| c.id.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for c in resolution.components() {
        let mut tags = Vec::new();
        if resolution.is_primary(&c.id) {
            tags.push("important");
        }
        if resolution.is_dependency_only(&c.id) {
            tags.push("dependency");
        }
        if c.is_volatile {
            tags.push("volatile");
        }
        let _ = write!(out, "{:>4}  {:<width$}  {}", c.order, c.id, c.version);
        if !tags.is_empty() {
            let _ = write!(out, "  [{}]", tags.join(", "));
        }
        out.push('\n');
    }
    out
}
