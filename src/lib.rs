//! Scatter Gallery
//!
//! A headless gallery renderer. Given an HTML page that contains a gallery
//! container and a JSON manifest of images, it clones the container's
//! "blueprint" item once per image, points each clone at its image, fills in
//! captions and lightbox data, and stamps a deterministic scattered position
//! onto it as CSS custom properties.
//!
//! # Features
//!
//! - **Blueprint auto-discovery**: the existing markup is the template, so
//!   the page's stylesheet keeps working unchanged
//! - **Swappable loaders**: HTTP (feature `http`, default), local files, or
//!   in-memory manifests through the [`ManifestLoader`] trait
//! - **Stable layout**: scatter values depend only on the item index
//!
//! # Example
//!
//! ```no_run
//! use scatter_gallery::{Gallery, GalleryConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GalleryConfig {
//!     base_url: Some("https://example.com/portfolio/".to_string()),
//!     ..Default::default()
//! };
//!
//! let gallery = Gallery::http(config)?;
//! let page = r#"<html><body><div id="gallery"><a class="gallery-item"><img></a></div></body></html>"#;
//! let (html, outcome) = gallery.render_html(page)?;
//! println!("{:?}\n{}", outcome, html);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

pub mod error;
pub use error::{Error, FetchError, Result};

pub mod dom;
pub mod loader;
pub mod manifest;
pub mod populate;
pub mod render;
pub mod scatter;
pub mod selector;

// Async-friendly wrapper around the blocking render pass
pub mod async_api;

pub use dom::{Document, NodeId};
#[cfg(feature = "http")]
pub use loader::HttpLoader;
pub use loader::{FileLoader, ManifestLoader, StaticLoader};
pub use manifest::{ImageEntry, Manifest};
pub use populate::{asset_url, NodePopulator};
pub use render::{init_gallery, RenderOutcome};
pub use scatter::{scatter_for, Scatter};

/// Configuration for a gallery render
///
/// The defaults match the conventional site layout: a `#gallery` container,
/// a manifest at `./assets/imgs/images.json`, and images next to it.
///
/// # Examples
///
/// ```
/// let cfg = scatter_gallery::GalleryConfig::default();
/// assert_eq!(cfg.container_id, "gallery");
/// assert!(cfg.user_agent.contains("scatter-gallery"));
/// ```
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// `id` of the mount container
    pub container_id: String,
    /// Manifest location, usually relative to the page
    pub manifest_url: String,
    /// Prefix prepended to every encoded image file name
    pub image_base: String,
    /// Value for `data-fancybox` on links that don't carry one
    pub lightbox_group: String,
    /// URL of the page, used to resolve a relative `manifest_url` over HTTP
    pub base_url: Option<String>,
    /// User agent string to send with requests
    pub user_agent: String,
    /// Timeout for the manifest request in milliseconds
    pub timeout_ms: u64,
    /// Custom HTTP headers
    pub headers: HashMap<String, String>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            container_id: "gallery".to_string(),
            manifest_url: "./assets/imgs/images.json".to_string(),
            image_base: "./assets/imgs/".to_string(),
            lightbox_group: "gallery".to_string(),
            base_url: None,
            user_agent: concat!("scatter-gallery/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_ms: 30000,
            headers: HashMap::new(),
        }
    }
}

impl GalleryConfig {
    /// Reject configurations that can never render anything.
    pub fn validate(&self) -> Result<()> {
        if self.container_id.trim().is_empty() {
            return Err(Error::ConfigError("container id must not be empty".into()));
        }
        if self.manifest_url.trim().is_empty() {
            return Err(Error::ConfigError("manifest URL must not be empty".into()));
        }
        if self.lightbox_group.is_empty() {
            return Err(Error::ConfigError("lightbox group must not be empty".into()));
        }
        Ok(())
    }
}

/// A configured renderer: configuration plus the loader it fetches with.
pub struct Gallery {
    config: GalleryConfig,
    loader: Box<dyn ManifestLoader + Send + Sync>,
}

impl Gallery {
    pub fn new<L>(config: GalleryConfig, loader: L) -> Result<Self>
    where
        L: ManifestLoader + Send + Sync + 'static,
    {
        config.validate()?;
        Ok(Self {
            config,
            loader: Box::new(loader),
        })
    }

    /// Gallery that fetches its manifest over HTTP.
    #[cfg(feature = "http")]
    pub fn http(config: GalleryConfig) -> Result<Self> {
        let loader = HttpLoader::new(&config)?;
        Self::new(config, loader)
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Render into an already parsed document.
    pub fn render(&self, doc: &mut Document) -> Result<RenderOutcome> {
        init_gallery(doc, &self.config, &self.loader)
    }

    /// Parse `page`, render the gallery into it and serialize it back.
    pub fn render_html(&self, page: &str) -> Result<(String, RenderOutcome)> {
        let mut doc = Document::parse(page);
        let outcome = self.render(&mut doc)?;
        Ok((doc.to_html(), outcome))
    }
}
