//! Configuration types and loading for skylogix

mod loader;

#[allow(unused_imports)]
pub use loader::{DatabaseConfig, OutputConfig, SkylogixConfig};
