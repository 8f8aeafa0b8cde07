//! Browser adapter: [`Document`] over `web_sys` and click wiring for the accordion.

use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::{JsCast, prelude::*};
use web_sys::{Element, HtmlElement};

use crate::{
    accordion::{AccordionController, AccordionOptions, GroupId, UnboundTrigger},
    document::Document,
};

/// A live browser document.
#[derive(Debug, Clone)]
pub struct WebDocument {
    inner: web_sys::Document,
}

impl WebDocument {
    /// Wrap a document.
    pub fn new(inner: web_sys::Document) -> Self {
        Self { inner }
    }

    /// The document of the current window, if there is one.
    pub fn current() -> Option<Self> {
        web_sys::window()?.document().map(Self::new)
    }

    /// The wrapped document.
    pub fn inner(&self) -> &web_sys::Document {
        &self.inner
    }
}

impl Document for WebDocument {
    type Element = Element;

    fn elements_by_class(&self, class: &str) -> Vec<Element> {
        // HtmlCollection is live; copy it out so later class changes cannot shift it
        let collection = self.inner.get_elements_by_class_name(class);
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.inner.get_element_by_id(id)
    }

    fn next_element_sibling(&self, element: &Element) -> Option<Element> {
        element.next_element_sibling()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn set_class(&self, element: &Element, class: &str, present: bool) {
        let list = element.class_list();
        let result = if present {
            list.add_1(class)
        } else {
            list.remove_1(class)
        };
        if let Err(err) = result {
            log::warn!("could not update class `{class}`: {err:?}");
        }
    }

    fn is_shown(&self, element: &Element) -> bool {
        element
            .dyn_ref::<HtmlElement>()
            .and_then(|el| el.style().get_property_value("display").ok())
            .is_none_or(|display| display != "none")
    }

    fn set_shown(&self, element: &Element, shown: bool) {
        let Some(el) = element.dyn_ref::<HtmlElement>() else {
            log::warn!("accordion panel <{}> has no style", element.tag_name());
            return;
        };
        let display = if shown { "block" } else { "none" };
        if let Err(err) = el.style().set_property("display", display) {
            log::warn!("could not set display: {err:?}");
        }
    }
}

/// An accordion bound to the page, with its listeners installed.
#[derive(Debug)]
pub struct MountedAccordion {
    /// Shared with the click listeners.
    pub controller: Rc<RefCell<AccordionController<WebDocument>>>,

    /// Triggers left out of the accordion.
    pub unbound: Vec<UnboundTrigger>,
}

/// Bind the accordion in `document` and register one click listener per group.
///
/// Listeners live as long as the page.
pub fn mount_accordion(
    document: WebDocument,
    options: &AccordionOptions,
) -> Result<MountedAccordion, JsValue> {
    let binding = AccordionController::bind(document, options);
    for report in &binding.unbound {
        log::warn!("{report}");
    }

    let triggers: Vec<(GroupId, Element)> = binding
        .controller
        .ids()
        .zip(binding.controller.groups().iter().map(|g| g.trigger().clone()))
        .collect();
    let controller = Rc::new(RefCell::new(binding.controller));

    for (id, trigger) in triggers {
        let shared = Rc::clone(&controller);
        let handler = Closure::<dyn FnMut()>::new(move || {
            shared.borrow_mut().activate(id);
        });
        trigger.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
        handler.forget();
    }

    log::debug!("accordion bound {} group(s)", controller.borrow().len());
    Ok(MountedAccordion {
        controller,
        unbound: binding.unbound,
    })
}
