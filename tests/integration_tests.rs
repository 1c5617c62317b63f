//! Integration tests for the gallery renderer over HTTP

use scatter_gallery::{
    scatter_for, Document, Gallery, GalleryConfig, NodeId, RenderOutcome,
};
use scatter_gallery::selector::Selector;
use std::collections::HashMap;
use tiny_http::{Response, Server};

const PAGE: &str = r##"<!DOCTYPE html>
<html>
<head><title>Portfolio</title></head>
<body>
<main>
<div id="gallery" class="scatter"><figure class="gallery-item" id="tpl" style="width: 12rem"><a href="#" id="tpl-link"><img src="placeholder.jpg" alt="placeholder"></a><figcaption class="caption" id="tpl-cap">Placeholder</figcaption></figure></div>
</main>
</body>
</html>"##;

/// Start a server answering `routes` (path -> (status, body)); unknown paths 404.
fn start_test_server(routes: Vec<(&'static str, u16, String)>) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    let routes: HashMap<&'static str, (u16, String)> =
        routes.into_iter().map(|(p, s, b)| (p, (s, b))).collect();

    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let path = request.url().split('?').next().unwrap_or("").to_string();
            let response = match routes.get(path.as_str()) {
                Some((status, body)) => Response::from_string(body.clone())
                    .with_status_code(*status)
                    .with_header(
                        "Content-Type: application/json"
                            .parse::<tiny_http::Header>()
                            .unwrap(),
                    ),
                None => Response::from_string("Not Found").with_status_code(404),
            };
            let _ = request.respond(response);
        }
    });

    format!("http://{}", addr)
}

fn render_with_manifest(manifest: Option<&str>) -> (Document, RenderOutcome) {
    let routes = match manifest {
        Some(body) => vec![("/site/assets/imgs/images.json", 200, body.to_string())],
        None => vec![],
    };
    let base = start_test_server(routes);
    let config = GalleryConfig {
        base_url: Some(format!("{}/site/index.html", base)),
        timeout_ms: 5000,
        ..Default::default()
    };
    let gallery = Gallery::http(config).expect("Failed to create gallery");
    let mut doc = Document::parse(PAGE);
    let outcome = gallery.render(&mut doc).expect("render failed");
    (doc, outcome)
}

fn sel(s: &str) -> Selector {
    Selector::parse(s).unwrap()
}

fn items(doc: &Document) -> Vec<NodeId> {
    let gallery = doc.get_element_by_id("gallery").expect("gallery container");
    doc.children(gallery).to_vec()
}

#[test]
fn test_encoded_file_name_round_trip() {
    let (doc, outcome) = render_with_manifest(Some(r#"{"images":[{"file":"a b.png","title":"T"}]}"#));
    assert_eq!(outcome, RenderOutcome::Rendered { count: 1 });

    let item = items(&doc)[0];
    let img = doc.query_selector(item, &sel("img")).unwrap();
    assert_eq!(doc.get_attribute(img, "src"), Some("./assets/imgs/a%20b.png"));
    let link = doc.query_selector(item, &sel("a")).unwrap();
    assert_eq!(doc.get_attribute(link, "href"), Some("./assets/imgs/a%20b.png"));
    assert_eq!(doc.get_attribute(link, "data-fancybox"), Some("gallery"));
    assert_eq!(doc.get_attribute(link, "data-caption"), Some("T"));
    let cap = doc.query_selector(item, &sel(".caption")).unwrap();
    assert_eq!(doc.text_content(cap), "T");
}

#[test]
fn test_empty_manifest_shows_notice() {
    let (doc, outcome) = render_with_manifest(Some(r#"{"images":[]}"#));
    assert_eq!(outcome, RenderOutcome::Empty);
    let gallery = doc.get_element_by_id("gallery").unwrap();
    assert_eq!(doc.text_content(gallery), "No images found.");
    assert!(doc.query_selector(gallery, &sel(".gallery-item")).is_none());
    assert!(doc.query_selector(gallery, &sel("[data-gallery-item]")).is_none());
}

#[test]
fn test_missing_manifest_shows_diagnostic() {
    let (doc, outcome) = render_with_manifest(None);
    match &outcome {
        RenderOutcome::LoadFailed(e) => {
            assert_eq!(e.url(), "./assets/imgs/images.json");
            assert!(e.to_string().contains("404"));
        }
        other => panic!("expected LoadFailed, got {:?}", other),
    }
    let gallery = doc.get_element_by_id("gallery").unwrap();
    let text = doc.text_content(gallery);
    assert!(text.contains("Could not load gallery manifest (./assets/imgs/images.json)"));
    assert!(doc.query_selector(gallery, &sel(".gallery-item")).is_none());
}

#[test]
fn test_invalid_json_shows_diagnostic() {
    let (doc, outcome) = render_with_manifest(Some("<html>oops</html>"));
    assert!(matches!(outcome, RenderOutcome::LoadFailed(scatter_gallery::FetchError::Parse { .. })));
    let gallery = doc.get_element_by_id("gallery").unwrap();
    assert!(doc.inner_html(gallery).contains("<code>./assets/imgs/images.json</code>"));
}

#[test]
fn test_clones_never_share_ids() {
    let (doc, outcome) = render_with_manifest(Some(
        r#"{"images":[{"file":"one.jpg","title":"One"},{"file":"two.jpg","title":"Two"}]}"#,
    ));
    assert_eq!(outcome, RenderOutcome::Rendered { count: 2 });

    let gallery = doc.get_element_by_id("gallery").unwrap();
    for node in doc.descendants(gallery) {
        assert_eq!(doc.get_attribute(node, "id"), None, "clone kept an id");
    }
    // the container itself keeps its id
    assert!(doc.get_element_by_id("gallery").is_some());
}

#[test]
fn test_missing_title_leaves_caption_untouched() {
    let (doc, _) = render_with_manifest(Some(r#"{"images":[{"file":"quiet.jpg"}]}"#));
    let item = items(&doc)[0];
    let img = doc.query_selector(item, &sel("img")).unwrap();
    assert_eq!(doc.get_attribute(img, "alt"), Some(""));
    let cap = doc.query_selector(item, &sel(".caption")).unwrap();
    assert_eq!(doc.text_content(cap), "Placeholder");
    let link = doc.query_selector(item, &sel("a")).unwrap();
    assert_eq!(doc.get_attribute(link, "data-caption"), None);
}

#[test]
fn test_items_keep_blueprint_structure_and_scatter() {
    let (doc, _) = render_with_manifest(Some(
        r#"{"images":[{"file":"a.jpg"},{"file":"b.jpg"},{"file":"c.jpg"}]}"#,
    ));
    let items = items(&doc);
    assert_eq!(items.len(), 3);
    for (i, &item) in items.iter().enumerate() {
        assert_eq!(doc.element(item).unwrap().name(), "figure");
        assert_eq!(doc.get_attribute(item, "class"), Some("gallery-item"));
        assert_eq!(doc.get_attribute(item, "data-gallery-item"), Some("1"));
        assert_eq!(doc.style_property(item, "width").as_deref(), Some("12rem"));

        let s = scatter_for(i);
        assert_eq!(doc.style_property(item, "--x"), Some(format!("{}%", s.left)));
        assert_eq!(doc.style_property(item, "--y"), Some(format!("{}%", s.top)));
        assert_eq!(doc.style_property(item, "--r"), Some(format!("{}deg", s.rotation)));
        assert_eq!(doc.style_property(item, "--i"), Some(i.to_string()));
    }
}

#[test]
fn test_render_is_stable_across_loads() {
    let manifest = r#"{"images":[{"file":"a.jpg","title":"A"},{"file":"b.jpg","title":"B"}]}"#;
    let (first, _) = render_with_manifest(Some(manifest));
    let (second, _) = render_with_manifest(Some(manifest));
    assert_eq!(first.to_html(), second.to_html());
}
