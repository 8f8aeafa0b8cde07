//! Browser tests for the web-sys adapter.
//!
//! Run with `wasm-pack test --headless --firefox crates/vitrine-widgets`.

#![cfg(target_arch = "wasm32")]

use vitrine_widgets::{AccordionOptions, Document, WebDocument, mount_accordion};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn page(markup: &str) -> WebDocument {
    let document = WebDocument::current().expect("browser document");
    document
        .inner()
        .body()
        .expect("body")
        .set_inner_html(markup);
    document
}

fn click(document: &WebDocument, id: &str) {
    document
        .element_by_id(id)
        .expect("element")
        .dyn_into::<HtmlElement>()
        .expect("html element")
        .click();
}

#[wasm_bindgen_test]
fn test_click_toggles_panel() {
    let document = page(
        r#"<button id="q1" class="answers__accordion-btn">Q</button><div id="a1">A</div>"#,
    );
    let mounted = mount_accordion(document.clone(), &AccordionOptions::default()).expect("mount");
    let trigger = document.element_by_id("q1").expect("trigger");
    let panel = document.element_by_id("a1").expect("panel");

    assert_eq!(mounted.controller.borrow().len(), 1);
    assert!(!document.is_shown(&panel));

    click(&document, "q1");
    assert!(document.is_shown(&panel));
    assert!(document.has_class(&trigger, "active"));

    click(&document, "q1");
    assert!(!document.is_shown(&panel));
    assert!(!document.has_class(&trigger, "active"));
}

#[wasm_bindgen_test]
fn test_unbound_trigger_is_reported() {
    let document = page(r#"<div><button class="answers__accordion-btn">Q</button></div>"#);
    let mounted = mount_accordion(document, &AccordionOptions::default()).expect("mount");

    assert!(mounted.controller.borrow().is_empty());
    assert_eq!(mounted.unbound.len(), 1);
}
