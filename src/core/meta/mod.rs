mod model;
mod resolver;
mod source;

pub use model::{ComponentDescriptor, ComponentJson, Requirement};
pub use resolver::{ComponentResolver, Resolution};
pub use source::{HttpMetadataSource, MetadataSource};

/// Public MultiMC metadata service.
pub const MULTIMC_META: &str = "https://meta.multimc.org/v1";

/// Uid of the base game runtime component.
pub const MINECRAFT_UID: &str = "net.minecraft";
