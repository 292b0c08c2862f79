// ─── Pack Manifest ───
// The `mmc-pack.json` document a launcher reads to know which components
// make up an instance.

use serde::{Deserialize, Serialize};

use crate::core::error::PackResult;
use crate::core::meta::{Requirement, Resolution};

pub const PACK_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackManifest {
    pub format_version: u32,
    pub components: Vec<PackComponent>,
}

/// One entry of `components`. Flags are omitted from the JSON unless set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackComponent {
    pub uid: String,
    pub version: String,
    pub cached_name: String,
    pub cached_version: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub cached_volatile: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub important: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub dependency_only: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cached_requires: Vec<Requirement>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl PackManifest {
    /// Build the manifest in the resolver's output order.
    pub fn from_resolution(resolution: &Resolution) -> Self {
        let components = resolution
            .components()
            .iter()
            .map(|c| PackComponent {
                uid: c.id.clone(),
                version: c.version.clone(),
                cached_name: c.display_name.clone(),
                cached_version: c.version.clone(),
                cached_volatile: c.is_volatile,
                important: resolution.is_primary(&c.id),
                dependency_only: resolution.is_dependency_only(&c.id),
                cached_requires: c.requirements.clone(),
            })
            .collect();

        Self {
            format_version: PACK_FORMAT_VERSION,
            components,
        }
    }

    pub fn to_json_string(&self) -> PackResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn component(&self, uid: &str) -> Option<&PackComponent> {
        self.components.iter().find(|c| c.uid == uid)
    }
}
