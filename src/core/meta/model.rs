use serde::{Deserialize, Serialize};

/// A constraint on another component, as listed in a descriptor's `requires`.
///
/// Serializes back to the same `{ uid, equals?, suggests? }` shape that the
/// metadata service uses, which is also what the pack manifest caches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Requirement {
    #[serde(rename = "uid")]
    pub dependency_id: String,
    /// Hard pin.
    #[serde(rename = "equals", default, skip_serializing_if = "Option::is_none")]
    pub exact_version: Option<String>,
    /// Soft pin, only used when no hard pin is ever seen for the id.
    #[serde(rename = "suggests", default, skip_serializing_if = "Option::is_none")]
    pub suggested_version: Option<String>,
}

impl Requirement {
    pub fn new(dependency_id: impl Into<String>) -> Self {
        Self {
            dependency_id: dependency_id.into(),
            exact_version: None,
            suggested_version: None,
        }
    }

    pub fn equals(mut self, version: impl Into<String>) -> Self {
        self.exact_version = Some(version.into());
        self
    }

    pub fn suggests(mut self, version: impl Into<String>) -> Self {
        self.suggested_version = Some(version.into());
        self
    }

    /// Merge a later sighting of the same id into this one.
    ///
    /// Fields already set are kept; only empty fields are filled from `other`.
    pub fn merge_from(&mut self, other: &Requirement) {
        if self.exact_version.is_none() {
            self.exact_version = other.exact_version.clone();
        }
        if self.suggested_version.is_none() {
            self.suggested_version = other.suggested_version.clone();
        }
    }

    /// True when both sightings carry a hard pin and the pins differ.
    pub fn conflicts_with(&self, other: &Requirement) -> bool {
        matches!(
            (&self.exact_version, &other.exact_version),
            (Some(a), Some(b)) if a != b
        )
    }

    /// Empty version strings carry no constraint.
    fn normalized(mut self) -> Self {
        self.exact_version = self.exact_version.filter(|v| !v.is_empty());
        self.suggested_version = self.suggested_version.filter(|v| !v.is_empty());
        self
    }
}

/// Raw `{endpoint}/{uid}/{version}.json` document.
///
/// Only the fields the resolver needs are modelled; anything else the
/// service returns is ignored.
#[derive(Debug, Deserialize)]
pub struct ComponentJson {
    pub name: Option<String>,
    #[serde(default)]
    pub volatile: bool,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub requires: Vec<Requirement>,
}

/// One component resolved at a concrete version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentDescriptor {
    pub id: String,
    pub version: String,
    pub display_name: String,
    /// Content behind `version` may change without a version bump.
    pub is_volatile: bool,
    /// Lower loads first.
    pub order: i32,
    pub requirements: Vec<Requirement>,
}

impl ComponentDescriptor {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            version: version.into(),
            is_volatile: false,
            order: 0,
            requirements: Vec::new(),
        }
    }

    pub fn from_json(id: &str, version: &str, json: ComponentJson) -> Self {
        Self {
            id: id.to_string(),
            version: version.to_string(),
            display_name: json.name.unwrap_or_else(|| id.to_string()),
            is_volatile: json.volatile,
            order: json.order,
            requirements: json
                .requires
                .into_iter()
                .map(Requirement::normalized)
                .collect(),
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }
}
