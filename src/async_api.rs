//! Async entry point.
//!
//! Rendering is blocking (the HTTP loader uses reqwest's blocking client),
//! so async hosts hand the work to tokio's blocking pool and await it.

use crate::{Document, Error, Gallery, RenderOutcome, Result};
use std::sync::Arc;

/// A cloneable, async-friendly handle to a [`Gallery`].
#[derive(Clone)]
pub struct AsyncGallery {
    inner: Arc<Gallery>,
}

impl AsyncGallery {
    pub fn new(gallery: Gallery) -> Self {
        Self {
            inner: Arc::new(gallery),
        }
    }

    /// Parse, render and serialize `page` on a blocking worker.
    pub async fn render_html(&self, page: String) -> Result<(String, RenderOutcome)> {
        let gallery = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || gallery.render_html(&page))
            .await
            .map_err(|e| Error::Other(format!("Render worker failed: {}", e)))?
    }

    /// Render into an owned document and hand it back.
    pub async fn render(&self, mut doc: Document) -> Result<(Document, RenderOutcome)> {
        let gallery = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let outcome = gallery.render(&mut doc)?;
            Ok((doc, outcome))
        })
        .await
        .map_err(|e| Error::Other(format!("Render worker failed: {}", e)))?
    }
}
