pub mod model;
pub mod pack;
pub mod writer;

pub use model::{InstanceConfig, LoaderType};
pub use pack::{PackComponent, PackManifest};
pub use writer::InstanceWriter;
