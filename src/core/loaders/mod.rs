pub mod registry;

pub use registry::{LoaderComponents, LoaderRegistry};
