// Kiln asset pipeline
//
// Content-addressed asset registries, intermediate compilers and a per-project runtime
// cache for a 2D engine.

pub mod assets;
pub mod compile;
pub mod core;
pub mod documents;
pub mod project;
pub mod runtime;

pub use assets::{AssetError, AssetHandle, AssetStore, AssetType};
pub use project::Project;
