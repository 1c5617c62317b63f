//! Manifest loaders.
//!
//! The renderer only sees the [`ManifestLoader`] trait. `HttpLoader` is the
//! normal backend (feature `http`, enabled by default); `FileLoader` serves
//! pages rendered straight from disk; `StaticLoader` answers from memory.

use crate::error::FetchError;
use crate::manifest::Manifest;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "http")]
use crate::{Error, GalleryConfig, Result};
#[cfg(feature = "http")]
use reqwest::blocking::Client;
#[cfg(feature = "http")]
use std::time::Duration;

/// Source of gallery manifests
pub trait ManifestLoader {
    /// Fetch and parse the manifest at `url`. No retries.
    fn load(&self, url: &str) -> std::result::Result<Manifest, FetchError>;
}

fn parse_body(url: &str, body: &str) -> std::result::Result<Manifest, FetchError> {
    Manifest::from_json(body).map_err(|e| FetchError::Parse {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Fetches manifests over HTTP, bypassing caches.
#[cfg(feature = "http")]
pub struct HttpLoader {
    client: Client,
    base_url: Option<url::Url>,
    user_agent: String,
    headers: Vec<(String, String)>,
}

#[cfg(feature = "http")]
impl HttpLoader {
    /// Build a loader from the HTTP-related parts of `config`.
    pub fn new(config: &GalleryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                Error::InitializationError(format!("Failed to build HTTP client: {}", e))
            })?;

        let base_url = config
            .base_url
            .as_deref()
            .map(|b| {
                url::Url::parse(b)
                    .map_err(|e| Error::ConfigError(format!("Invalid base URL '{}': {}", b, e)))
            })
            .transpose()?;

        let mut headers: Vec<(String, String)> = config
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        headers.sort();

        Ok(Self {
            client,
            base_url,
            user_agent: config.user_agent.clone(),
            headers,
        })
    }

    /// Resolve `url` against the page URL when one is configured.
    pub fn resolve(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) => base
                .join(url)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| url.to_string()),
            None => url.to_string(),
        }
    }
}

#[cfg(feature = "http")]
impl ManifestLoader for HttpLoader {
    fn load(&self, url: &str) -> std::result::Result<Manifest, FetchError> {
        let target = self.resolve(url);
        log::debug!("Fetching gallery manifest {}", target);

        let mut request = self
            .client
            .get(&target)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header(reqwest::header::PRAGMA, "no-cache");
        for (k, v) in &self.headers {
            request = request.header(k.as_str(), v.as_str());
        }

        let resp = request.send().map_err(|e| FetchError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(|e| FetchError::Transport {
            url: url.to_string(),
            reason: format!("Failed to read response body: {}", e),
        })?;
        parse_body(url, &body)
    }
}

/// Reads manifests from the local filesystem.
///
/// Relative URLs resolve against `base_dir` (normally the page's directory).
/// A missing file is reported like an HTTP 404.
pub struct FileLoader {
    base_dir: PathBuf,
}

impl FileLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn resolve(&self, url: &str) -> PathBuf {
        if let Some(path) = url::Url::parse(url)
            .ok()
            .filter(|u| u.scheme() == "file")
            .and_then(|u| u.to_file_path().ok())
        {
            return path;
        }
        // drop any query/fragment, then undo percent-encoding
        let path = url.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
        let decoded = percent_encoding::percent_decode_str(path).decode_utf8_lossy();
        let path = Path::new(&*decoded);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl ManifestLoader for FileLoader {
    fn load(&self, url: &str) -> std::result::Result<Manifest, FetchError> {
        let path = self.resolve(url);
        log::debug!("Reading gallery manifest {}", path.display());
        let body = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FetchError::Status {
                url: url.to_string(),
                status: 404,
            },
            _ => FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            },
        })?;
        parse_body(url, &body)
    }
}

/// Answers every request with the same body or failure.
///
/// Records how many times it was asked, which lets callers verify that a
/// render did (or did not) reach the network stage.
#[derive(Debug)]
pub struct StaticLoader {
    response: std::result::Result<String, FetchError>,
    calls: AtomicUsize,
}

impl StaticLoader {
    /// Serve `body` as the manifest text.
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            response: Ok(body.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every load with `error`.
    pub fn failing(error: FetchError) -> Self {
        Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ManifestLoader for StaticLoader {
    fn load(&self, url: &str) -> std::result::Result<Manifest, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(body) => parse_body(url, body),
            Err(e) => Err(e.clone()),
        }
    }
}

impl<L: ManifestLoader + ?Sized> ManifestLoader for &L {
    fn load(&self, url: &str) -> std::result::Result<Manifest, FetchError> {
        (**self).load(url)
    }
}

impl<L: ManifestLoader + ?Sized> ManifestLoader for Box<L> {
    fn load(&self, url: &str) -> std::result::Result<Manifest, FetchError> {
        (**self).load(url)
    }
}
