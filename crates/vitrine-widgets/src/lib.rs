//! Vitrine page runtime
//!
//! The interactive parts of a Vitrine landing page, compiled to WebAssembly.
//!
//! # Widgets
//!
//! - **Accordion**: triggers marked `answers__accordion-btn` expand and collapse the
//!   element after them (or the one named by `aria-controls`)
//! - **Phone mask**: `input[type="tel"]` fields formatted by `Inputmask`
//! - **Carousel**: `.swiper` started through `Swiper`
//!
//! The accordion state machine is written against the [`Document`] trait, so it runs
//! on [`MemoryDocument`] in tests and on [`WebDocument`] in the browser.

pub mod accordion;
pub mod bindings;
pub mod document;
pub mod memory;
pub mod page;
pub mod state;
pub mod web;

pub use accordion::{
    AccordionController, AccordionOptions, Binding, GroupId, ToggleGroup, UnboundReason,
    UnboundTrigger,
};
pub use bindings::{CarouselOptions, Navigation, PhoneMask};
pub use document::Document;
pub use memory::{MemoryDocument, NodeId};
pub use page::{PageOptions, PageWidgets, mount};
pub use state::PanelState;
use wasm_bindgen::prelude::*;
pub use web::{MountedAccordion, WebDocument, mount_accordion};

/// Entry point run when the module loads.
///
/// Installs the panic hook and console logger, then mounts the default widgets.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // a second init (hot module reload) keeps the first logger
    let _ = console_log::init_with_level(log::Level::Info);

    match WebDocument::current() {
        Some(document) => {
            // listeners hold what they need; the summary is not kept
            let _ = mount(&document, &PageOptions::default());
        }
        None => log::warn!("no document, widgets not mounted"),
    }
}

/// Get the version of the page runtime.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
