//! Gallery rendering pass.
//!
//! One call to [`init_gallery`] does what the page script does on DOM-ready:
//! find the mount container, load the manifest, pick a blueprint, clear the
//! container and append one populated clone per usable manifest entry.

use crate::dom::{Document, NodeId};
use crate::error::FetchError;
use crate::loader::ManifestLoader;
use crate::populate::NodePopulator;
use crate::scatter::scatter_for;
use crate::selector::Selector;
use crate::{GalleryConfig, Result};

/// Attribute stamped on every cloned item
pub const ITEM_MARKER: &str = "data-gallery-item";

/// Blueprint candidates, highest priority first.
const BLUEPRINT_SELECTORS: [&str; 4] = ["[data-gallery-item]", ".gallery-item", "a", "div"];

/// How a render pass ended. Every variant is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The page has no mount container; nothing was fetched or changed
    NoMount,
    /// The manifest could not be loaded; the container shows a diagnostic
    LoadFailed(FetchError),
    /// The manifest listed no images; the container shows a notice
    Empty,
    /// `count` items were appended to the container
    Rendered { count: usize },
}

/// Inline notice shown when the manifest cannot be loaded.
pub fn show_load_error(doc: &mut Document, container: NodeId, manifest_url: &str) {
    doc.remove_children(container);
    let p = doc.create_element("p");
    doc.set_attribute(
        p,
        "style",
        "max-width: 48rem; margin: 2rem auto; color: #666; line-height: 1.6;",
    );
    let lead = doc.create_text("Could not load gallery manifest (");
    let code = doc.create_element("code");
    doc.set_text_content(code, manifest_url);
    let tail = doc.create_text(
        "). Make sure it exists in the deployed site and is valid JSON.",
    );
    for child in [lead, code, tail] {
        doc.append_child(p, child);
    }
    doc.append_child(container, p);
}

/// Inline notice shown when the manifest has no images.
pub fn show_empty(doc: &mut Document, container: NodeId) {
    doc.remove_children(container);
    let p = doc.create_element("p");
    doc.set_attribute(p, "style", "text-align:center; color:#666; margin-top:2rem;");
    doc.set_text_content(p, "No images found.");
    doc.append_child(container, p);
}

/// First blueprint candidate inside `container`, by selector priority.
pub fn find_blueprint(doc: &Document, container: NodeId) -> Result<Option<NodeId>> {
    for raw in BLUEPRINT_SELECTORS {
        let selector = Selector::parse(raw)?;
        if let Some(node) = doc.query_selector(container, &selector) {
            log::debug!("Using blueprint matched by '{}'", raw);
            return Ok(Some(node));
        }
    }
    Ok(None)
}

/// `<a data-fancybox="{group}"><img></a>`, used when the page has no blueprint.
fn fallback_item(doc: &mut Document, lightbox_group: &str) -> NodeId {
    let a = doc.create_element("a");
    doc.set_attribute(a, "data-fancybox", lightbox_group);
    let img = doc.create_element("img");
    doc.append_child(a, img);
    a
}

fn strip_ids(doc: &mut Document, node: NodeId) {
    doc.remove_attribute(node, "id");
    for descendant in doc.descendants(node) {
        doc.remove_attribute(descendant, "id");
    }
}

/// Render the gallery described by `config` into `doc`.
///
/// Manifest problems never surface as `Err`: they are shown inline and
/// reported through the returned [`RenderOutcome`]. `Err` means the
/// configuration itself is unusable.
pub fn init_gallery<L>(doc: &mut Document, config: &GalleryConfig, loader: &L) -> Result<RenderOutcome>
where
    L: ManifestLoader + ?Sized,
{
    config.validate()?;
    let populator = NodePopulator::new(&config.image_base, &config.lightbox_group)?;

    let Some(container) = doc.get_element_by_id(&config.container_id) else {
        log::warn!("No #{} container on the page; skipping gallery", config.container_id);
        return Ok(RenderOutcome::NoMount);
    };

    let manifest = match loader.load(&config.manifest_url) {
        Ok(manifest) => manifest,
        Err(e) => {
            log::error!("{}", e);
            show_load_error(doc, container, &config.manifest_url);
            return Ok(RenderOutcome::LoadFailed(e));
        }
    };

    if manifest.is_empty() {
        show_empty(doc, container);
        return Ok(RenderOutcome::Empty);
    }

    // grab the blueprint before the placeholder content is cleared
    let blueprint = find_blueprint(doc, container)?;
    doc.remove_children(container);

    let mut count = 0;
    for (index, entry) in manifest.images.iter().enumerate() {
        if !entry.is_renderable() {
            log::debug!("Skipping manifest entry {} without a file", index);
            continue;
        }

        let node = match blueprint {
            Some(blueprint) => {
                let node = doc.deep_clone(blueprint);
                strip_ids(doc, node);
                doc.set_attribute(node, ITEM_MARKER, "1");
                node
            }
            None => fallback_item(doc, &config.lightbox_group),
        };

        populator.populate(doc, node, &entry.file, &entry.title);
        scatter_for(index).apply(doc, node);
        doc.append_child(container, node);
        log::debug!("Rendered gallery item {} from {:?}", index, entry.file);
        count += 1;
    }

    log::info!(
        "Rendered {} gallery item(s) from {} into #{}",
        count,
        config.manifest_url,
        config.container_id
    );
    Ok(RenderOutcome::Rendered { count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::StaticLoader;

    const PAGE: &str = r##"<!DOCTYPE html><html><head><title>G</title></head><body>
<div id="gallery"><a class="gallery-item" id="first" href="#"><img id="pic" src="placeholder.jpg"><span class="caption">Placeholder</span></a></div>
</body></html>"##;

    fn render(page: &str, manifest: &str) -> (Document, RenderOutcome) {
        let mut doc = Document::parse(page);
        let loader = StaticLoader::body(manifest);
        let outcome = init_gallery(&mut doc, &GalleryConfig::default(), &loader).unwrap();
        (doc, outcome)
    }

    fn items(doc: &Document) -> Vec<NodeId> {
        let gallery = doc.get_element_by_id("gallery").unwrap();
        doc.children(gallery).to_vec()
    }

    #[test]
    fn test_blueprint_priority() {
        let doc = Document::parse(
            r##"<html><body><div id="g"><div class="x"><a href="#">l</a><span class="gallery-item"></span><p data-gallery-item></p></div></div></body></html>"##,
        );
        let g = doc.get_element_by_id("g").unwrap();
        let bp = find_blueprint(&doc, g).unwrap().unwrap();
        assert_eq!(doc.element(bp).unwrap().name(), "p");

        let doc = Document::parse(r##"<html><body><div id="g"><div><a href="#">l</a></div></div></body></html>"##);
        let g = doc.get_element_by_id("g").unwrap();
        let bp = find_blueprint(&doc, g).unwrap().unwrap();
        assert_eq!(doc.element(bp).unwrap().name(), "a");

        let doc = Document::parse(r#"<html><body><div id="g"><span>text</span></div></body></html>"#);
        let g = doc.get_element_by_id("g").unwrap();
        assert_eq!(find_blueprint(&doc, g).unwrap(), None);
    }

    #[test]
    fn test_renders_items_in_order() {
        let (doc, outcome) = render(
            PAGE,
            r#"{"images":[{"file":"one.jpg","title":"One"},{"file":"two.jpg","title":"Two"}]}"#,
        );
        assert_eq!(outcome, RenderOutcome::Rendered { count: 2 });
        let items = items(&doc);
        assert_eq!(items.len(), 2);
        assert_eq!(doc.get_attribute(items[0], "href"), Some("./assets/imgs/one.jpg"));
        assert_eq!(doc.get_attribute(items[1], "href"), Some("./assets/imgs/two.jpg"));
        assert_eq!(doc.get_attribute(items[0], ITEM_MARKER), Some("1"));
        assert_eq!(doc.get_attribute(items[0], "class"), Some("gallery-item"));
        assert_eq!(doc.text_content(items[1]), "Two");
    }

    #[test]
    fn test_clones_carry_no_ids() {
        let (doc, _) = render(
            PAGE,
            r#"{"images":[{"file":"one.jpg"},{"file":"two.jpg"}]}"#,
        );
        for item in items(&doc) {
            assert_eq!(doc.get_attribute(item, "id"), None);
            for d in doc.descendants(item) {
                assert_eq!(doc.get_attribute(d, "id"), None);
            }
        }
        assert!(doc.get_element_by_id("pic").is_none());
    }

    #[test]
    fn test_skipped_entries_keep_index() {
        let (doc, outcome) = render(
            PAGE,
            r#"{"images":[{"title":"no file"},{"file":"b.jpg"},{"file":""},{"file":"d.jpg"}]}"#,
        );
        assert_eq!(outcome, RenderOutcome::Rendered { count: 2 });
        let items = items(&doc);
        assert_eq!(doc.style_property(items[0], "--i").as_deref(), Some("1"));
        assert_eq!(doc.style_property(items[1], "--i").as_deref(), Some("3"));
        assert_eq!(
            doc.style_property(items[1], "--x"),
            Some(format!("{}%", scatter_for(3).left))
        );
    }

    #[test]
    fn test_fallback_item_without_blueprint() {
        let (doc, outcome) = render(
            r#"<html><body><section id="gallery"><span>loading</span></section></body></html>"#,
            r#"{"images":[{"file":"x y.jpg","title":"XY"}]}"#,
        );
        assert_eq!(outcome, RenderOutcome::Rendered { count: 1 });
        let items = items(&doc);
        assert_eq!(items.len(), 1);
        let a = items[0];
        assert_eq!(doc.element(a).unwrap().name(), "a");
        assert_eq!(doc.get_attribute(a, "data-fancybox"), Some("gallery"));
        assert_eq!(doc.get_attribute(a, ITEM_MARKER), None);
        let img = doc.children(a)[0];
        assert_eq!(doc.get_attribute(img, "src"), Some("./assets/imgs/x%20y.jpg"));
        assert_eq!(doc.get_attribute(img, "alt"), Some("XY"));
    }

    #[test]
    fn test_empty_manifest_shows_notice() {
        let (doc, outcome) = render(PAGE, r#"{"images":[]}"#);
        assert_eq!(outcome, RenderOutcome::Empty);
        let gallery = doc.get_element_by_id("gallery").unwrap();
        assert_eq!(doc.text_content(gallery), "No images found.");
        assert!(doc.query_selector(gallery, &Selector::parse("a").unwrap()).is_none());
    }

    #[test]
    fn test_load_failure_shows_diagnostic() {
        let mut doc = Document::parse(PAGE);
        let err = FetchError::Status {
            url: "./assets/imgs/images.json".into(),
            status: 404,
        };
        let loader = StaticLoader::failing(err.clone());
        let outcome = init_gallery(&mut doc, &GalleryConfig::default(), &loader).unwrap();
        assert_eq!(outcome, RenderOutcome::LoadFailed(err));

        let gallery = doc.get_element_by_id("gallery").unwrap();
        let html = doc.inner_html(gallery);
        assert!(html.contains("<code>./assets/imgs/images.json</code>"));
        assert!(doc.query_selector(gallery, &Selector::parse(".gallery-item").unwrap()).is_none());
    }

    #[test]
    fn test_no_mount_does_not_fetch() {
        let mut doc = Document::parse("<html><body><p>no gallery</p></body></html>");
        let before = doc.to_html();
        let loader = StaticLoader::body(r#"{"images":[{"file":"a.jpg"}]}"#);
        let outcome = init_gallery(&mut doc, &GalleryConfig::default(), &loader).unwrap();
        assert_eq!(outcome, RenderOutcome::NoMount);
        assert_eq!(loader.calls(), 0);
        assert_eq!(doc.to_html(), before);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut doc = Document::parse(PAGE);
        let config = GalleryConfig {
            container_id: String::new(),
            ..Default::default()
        };
        let loader = StaticLoader::body("{}");
        assert!(init_gallery(&mut doc, &config, &loader).is_err());
    }
}
