// Parser module - turns manifest text into the dependency list

pub mod manifest;

pub use manifest::{parse_manifest, MAX_DEPENDENCIES};
