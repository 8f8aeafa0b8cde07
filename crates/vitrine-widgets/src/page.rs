//! Mounting every widget on a page.

use serde::{Deserialize, Serialize};

use crate::{
    accordion::AccordionOptions,
    bindings::{CarouselOptions, PhoneMask},
    web::{MountedAccordion, WebDocument, mount_accordion},
};

/// Which widgets to mount and how. `None` skips a widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageOptions {
    pub accordion: Option<AccordionOptions>,
    pub phone_mask: Option<PhoneMask>,
    pub carousel: Option<CarouselOptions>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            accordion: Some(AccordionOptions::default()),
            phone_mask: Some(PhoneMask::default()),
            carousel: Some(CarouselOptions::default()),
        }
    }
}

/// What got mounted.
#[derive(Debug, Default)]
pub struct PageWidgets {
    pub accordion: Option<MountedAccordion>,
    pub masked_inputs: u32,
    pub carousel: bool,
}

/// Mount the configured widgets. A widget that fails, typically because its
/// library is not loaded, is logged and skipped.
pub fn mount(document: &WebDocument, options: &PageOptions) -> PageWidgets {
    let mut widgets = PageWidgets::default();

    if let Some(accordion) = &options.accordion {
        match mount_accordion(document.clone(), accordion) {
            Ok(mounted) => widgets.accordion = Some(mounted),
            Err(err) => log::warn!("accordion not mounted: {err:?}"),
        }
    }

    if let Some(mask) = &options.phone_mask {
        match mask.apply(document.inner()) {
            Ok(count) => widgets.masked_inputs = count,
            Err(err) => log::warn!("phone mask not applied (is Inputmask loaded?): {err:?}"),
        }
    }

    if let Some(carousel) = &options.carousel {
        match carousel.mount(document.inner()) {
            Ok(mounted) => widgets.carousel = mounted,
            Err(err) => log::warn!("carousel not started (is Swiper loaded?): {err:?}"),
        }
    }

    log::info!(
        "page widgets: {} accordion group(s), {} masked input(s), carousel {}",
        widgets
            .accordion
            .as_ref()
            .map_or(0, |a| a.controller.borrow().len()),
        widgets.masked_inputs,
        if widgets.carousel { "on" } else { "off" },
    );
    widgets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mounts_everything() {
        let options = PageOptions::default();
        assert!(options.accordion.is_some());
        assert!(options.phone_mask.is_some());
        assert!(options.carousel.is_some());
    }

    #[test]
    fn test_disable_one_widget() {
        let options: PageOptions = serde_json::from_str(r#"{"carousel": null}"#).unwrap();
        assert!(options.carousel.is_none());
        assert_eq!(options.accordion, Some(AccordionOptions::default()));
    }

    #[test]
    fn test_override_trigger_class() {
        let options: PageOptions =
            serde_json::from_str(r#"{"accordion": {"triggerClass": "faq__q"}}"#).unwrap();
        let accordion = options.accordion.unwrap();
        assert_eq!(accordion.trigger_class, "faq__q");
        assert_eq!(accordion.active_class, "active");
    }
}
