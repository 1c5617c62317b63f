use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use scatter_gallery::{scatter_for, Error, FileLoader, Gallery, GalleryConfig, RenderOutcome};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "scatter-gallery")]
#[command(about = "Render an image gallery into an HTML page from a JSON manifest")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the gallery into a page and print (or write) the result
    Render(RenderArgs),
    /// Print scatter values for the first COUNT indices as JSON lines
    Scatter {
        count: usize,
    },
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Page to render: an http(s) URL or a local file
    page: String,

    /// Manifest location, relative to the page
    #[arg(long)]
    manifest: Option<String>,

    /// `id` of the gallery container
    #[arg(long)]
    container: Option<String>,

    /// Prefix for image URLs
    #[arg(long)]
    image_base: Option<String>,

    /// Lightbox group for links without one
    #[arg(long)]
    lightbox_group: Option<String>,

    /// Manifest request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Write the rendered page here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    fn config(&self) -> GalleryConfig {
        let mut config = GalleryConfig::default();
        if let Some(v) = &self.manifest {
            config.manifest_url = v.clone();
        }
        if let Some(v) = &self.container {
            config.container_id = v.clone();
        }
        if let Some(v) = &self.image_base {
            config.image_base = v.clone();
        }
        if let Some(v) = &self.lightbox_group {
            config.lightbox_group = v.clone();
        }
        if let Some(v) = self.timeout_ms {
            config.timeout_ms = v;
        }
        config
    }
}

fn is_remote(page: &str) -> bool {
    page.starts_with("http://") || page.starts_with("https://")
}

#[cfg(feature = "http")]
fn remote_gallery(mut config: GalleryConfig, url: &str) -> anyhow::Result<(String, Gallery)> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_millis(config.timeout_ms))
        .build()
        .context("Failed to build HTTP client")?;
    let resp = client
        .get(url)
        .header(reqwest::header::USER_AGENT, config.user_agent.as_str())
        .send()
        .map_err(|e| Error::LoadError(format!("Failed to fetch {}: {}", url, e)))?;
    if !resp.status().is_success() {
        bail!(Error::LoadError(format!("Failed to fetch {} ({})", url, resp.status())));
    }
    let page = resp
        .text()
        .map_err(|e| Error::LoadError(format!("Failed to read response body: {}", e)))?;

    // the manifest URL is relative to the page
    config.base_url = Some(url.to_string());
    Ok((page, Gallery::http(config)?))
}

#[cfg(not(feature = "http"))]
fn remote_gallery(_config: GalleryConfig, url: &str) -> anyhow::Result<(String, Gallery)> {
    bail!("cannot fetch {}: built without the `http` feature", url)
}

fn local_gallery(config: GalleryConfig, path: &Path) -> anyhow::Result<(String, Gallery)> {
    let page = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read page {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((page, Gallery::new(config, FileLoader::new(dir))?))
}

fn render(args: RenderArgs) -> anyhow::Result<()> {
    let config = args.config();
    let (page, gallery) = if is_remote(&args.page) {
        remote_gallery(config, &args.page)?
    } else {
        local_gallery(config, Path::new(&args.page))?
    };

    let (html, outcome) = gallery.render_html(&page)?;
    match &outcome {
        RenderOutcome::NoMount => log::warn!("page has no #{} container", gallery.config().container_id),
        RenderOutcome::LoadFailed(e) => log::warn!("manifest not loaded: {}", e),
        RenderOutcome::Empty => log::warn!("manifest lists no images"),
        RenderOutcome::Rendered { count } => log::info!("{} item(s) rendered", count),
    }

    match &args.output {
        Some(path) => std::fs::write(path, html)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", html),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => render(args)?,
        Command::Scatter { count } => {
            for i in 0..count {
                println!("{}", serde_json::to_string(&scatter_for(i))?);
            }
        }
    }
    Ok(())
}
