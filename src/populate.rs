//! Rewires a template node for one manifest entry: image source, lightbox
//! link and caption text. Only the node's own subtree is touched.

use crate::dom::{Document, NodeId};
use crate::selector::Selector;
use crate::{Error, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters `encodeURIComponent` leaves alone besides ASCII alphanumerics.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `image_base` followed by the percent-encoded file name.
pub fn asset_url(image_base: &str, file: &str) -> String {
    format!("{}{}", image_base, utf8_percent_encode(file, COMPONENT))
}

/// Precompiled selectors used while populating items.
#[derive(Debug, Clone)]
pub struct NodePopulator {
    image_base: String,
    lightbox_group: String,
    img: Selector,
    link: Selector,
    // priority order, not document order
    captions: [Selector; 3],
}

impl NodePopulator {
    pub fn new(image_base: &str, lightbox_group: &str) -> Result<Self> {
        if lightbox_group.is_empty() {
            return Err(Error::ConfigError("lightbox group must not be empty".into()));
        }
        Ok(Self {
            image_base: image_base.to_string(),
            lightbox_group: lightbox_group.to_string(),
            img: Selector::parse("img")?,
            link: Selector::parse("a")?,
            captions: [
                Selector::parse("[data-title]")?,
                Selector::parse(".caption")?,
                Selector::parse(".title")?,
            ],
        })
    }

    fn self_or_descendant(&self, doc: &Document, node: NodeId, selector: &Selector) -> Option<NodeId> {
        if doc.matches(node, selector) {
            Some(node)
        } else {
            doc.query_selector(node, selector)
        }
    }

    /// Point `node`'s image and link at `file` and caption it with `title`.
    pub fn populate(&self, doc: &mut Document, node: NodeId, file: &str, title: &str) {
        let url = asset_url(&self.image_base, file);

        if let Some(img) = self.self_or_descendant(doc, node, &self.img) {
            doc.set_attribute(img, "src", &url);
            doc.set_attribute(img, "alt", title);
            doc.set_attribute(img, "loading", "lazy");
            doc.set_attribute(img, "decoding", "async");
        }

        if let Some(link) = self.self_or_descendant(doc, node, &self.link) {
            doc.set_attribute(link, "href", &url);
            if doc.get_attribute(link, "data-fancybox").map_or(true, str::is_empty) {
                doc.set_attribute(link, "data-fancybox", &self.lightbox_group);
            }
            if !title.is_empty() {
                doc.set_attribute(link, "data-caption", title);
            }
        }

        let caption = self
            .captions
            .iter()
            .find_map(|selector| doc.query_selector(node, selector));
        if let Some(caption) = caption {
            if !title.is_empty() {
                doc.set_text_content(caption, title);
            }
        }
    }
}
