//! Theme stylesheets and helper scripts served by the search peer.
//!
//! The overlay needs a handful of static resources from the peer before its
//! popup can be styled. Which ones is derived from the configured base URL and
//! theme; loading them is the host's job and a failed load never blocks the
//! overlay.

use crate::domain::error::Result;
use crate::Config;
use serde::{Deserialize, Serialize};

const THEME_STYLESHEETS: [&str; 4] = ["ui.core.css", "ui.dialog.css", "ui.theme.css", "ui.resizable.css"];

const SCRIPTS: [&str; 6] = [
    "jquery.dimensions.js",
    "jquery.query.js",
    "jquery.form.js",
    "jquery.field.min.js",
    "jquery-faviconize-1.0.js",
    "jquery.ui.all.min.js",
];

/// Kind of a static resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    Stylesheet,
    Script,
}

/// One resource to inject into the host document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub kind: AssetKind,
    pub url: String,
}

/// Ordered resource list for one overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
}

impl AssetManifest {
    /// Derives the resource URLs from `config.url` and `config.theme`.
    ///
    /// ```
    /// use portalsearch::infrastructure::assets::AssetManifest;
    /// use portalsearch::PartialConfig;
    ///
    /// let config = PartialConfig::with_url("http://localhost:8090").resolve().unwrap();
    /// let manifest = AssetManifest::for_config(&config);
    /// assert_eq!(
    ///     manifest.stylesheets[1],
    ///     "http://localhost:8090/yacy/ui/css/themes/start/ui.core.css"
    /// );
    /// ```
    #[must_use]
    pub fn for_config(config: &Config) -> Self {
        let base = &config.url;

        let mut stylesheets = vec![format!("{base}/yacy/ui/css/yacyui-portalsearch.css")];
        stylesheets.extend(
            THEME_STYLESHEETS
                .iter()
                .map(|sheet| format!("{base}/yacy/ui/css/themes/{}/{sheet}", config.theme)),
        );

        let scripts = SCRIPTS.iter().map(|script| format!("{base}/yacy/ui/js/{script}")).collect();

        Self { stylesheets, scripts }
    }

    /// Stylesheets first, then scripts, each in declaration order.
    pub fn assets(&self) -> impl Iterator<Item = Asset> + '_ {
        let sheets = self.stylesheets.iter().map(|url| Asset {
            kind: AssetKind::Stylesheet,
            url: url.clone(),
        });
        let scripts = self.scripts.iter().map(|url| Asset {
            kind: AssetKind::Script,
            url: url.clone(),
        });
        sheets.chain(scripts)
    }
}

/// Injects one resource into the host document.
pub trait AssetLoader {
    /// # Errors
    ///
    /// Returns an error when the resource could not be loaded.
    fn load(&self, asset: &Asset) -> Result<()>;
}

/// Loads every asset of `manifest`, logging failures instead of propagating
/// them. Returns the number of assets that loaded.
pub fn load_assets(loader: &dyn AssetLoader, manifest: &AssetManifest) -> usize {
    let mut loaded = 0;
    for asset in manifest.assets() {
        match loader.load(&asset) {
            Ok(()) => loaded += 1,
            Err(e) => tracing::warn!(url = %asset.url, kind = ?asset.kind, error = %e, "asset failed to load"),
        }
    }
    tracing::debug!(loaded, "asset injection finished");
    loaded
}
