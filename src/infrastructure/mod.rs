//! Infrastructure layer for resources outside the overlay's own state.
//!
//! - [`assets`]: stylesheets and scripts the host injects from the peer
//! - [`paths`]: platform configuration and data directories

pub mod assets;
pub mod paths;

pub use assets::{load_assets, Asset, AssetKind, AssetLoader, AssetManifest};
pub use paths::{default_config_file, get_config_dir, get_data_dir};
