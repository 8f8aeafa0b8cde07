//! Phone mask and carousel, delegated to the page's `Inputmask` and `Swiper` globals.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use web_sys::NodeList;

#[wasm_bindgen]
extern "C" {
    type Inputmask;

    #[wasm_bindgen(constructor, catch)]
    fn new(pattern: &str) -> Result<Inputmask, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn mask(this: &Inputmask, elements: &NodeList) -> Result<JsValue, JsValue>;

    type Swiper;

    #[wasm_bindgen(constructor, catch)]
    fn new(selector: &str, options: &JsValue) -> Result<Swiper, JsValue>;
}

/// Input mask applied to phone fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneMask {
    /// Mask in `Inputmask` syntax.
    pub pattern: String,

    /// Inputs to mask.
    pub selector: String,
}

impl Default for PhoneMask {
    fn default() -> Self {
        Self {
            pattern: "+7 (999) 999-99-99".to_string(),
            selector: "input[type=\"tel\"]".to_string(),
        }
    }
}

impl PhoneMask {
    /// Mask every matching input in `document`. Returns how many inputs matched.
    pub fn apply(&self, document: &web_sys::Document) -> Result<u32, JsValue> {
        let inputs = document.query_selector_all(&self.selector)?;
        if inputs.length() == 0 {
            return Ok(0);
        }
        Inputmask::new(&self.pattern)?.mask(&inputs)?;
        Ok(inputs.length())
    }
}

/// Carousel navigation buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub next_el: String,
    pub prev_el: String,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            next_el: ".swiper-button-next".to_string(),
            prev_el: ".swiper-button-prev".to_string(),
        }
    }
}

/// Options handed to the `Swiper` constructor, serialized as its JS options object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarouselOptions {
    /// Container selector; passed separately from the options object.
    #[serde(skip)]
    pub selector: String,
    pub navigation: Navigation,
    /// Gap between slides in pixels.
    pub space_between: u32,
    pub slides_per_view: f64,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            selector: ".swiper".to_string(),
            navigation: Navigation::default(),
            space_between: 10,
            slides_per_view: 2.0,
        }
    }
}

impl CarouselOptions {
    /// Start the carousel. Returns `false` when the page has no carousel container.
    pub fn mount(&self, document: &web_sys::Document) -> Result<bool, JsValue> {
        if document.query_selector(&self.selector)?.is_none() {
            return Ok(false);
        }
        let options = serde_wasm_bindgen::to_value(self)?;
        Swiper::new(&self.selector, &options)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carousel_options_shape() {
        let json = serde_json::to_value(CarouselOptions::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "navigation": {
                    "nextEl": ".swiper-button-next",
                    "prevEl": ".swiper-button-prev",
                },
                "spaceBetween": 10,
                "slidesPerView": 2.0,
            })
        );
    }

    #[test]
    fn test_phone_mask_defaults() {
        let mask = PhoneMask::default();
        assert_eq!(mask.pattern, "+7 (999) 999-99-99");
        assert_eq!(mask.selector, r#"input[type="tel"]"#);
    }

    #[test]
    fn test_partial_carousel_options() {
        let options: CarouselOptions =
            serde_json::from_str(r#"{"slidesPerView": 3, "navigation": {"nextEl": ".n", "prevEl": ".p"}}"#)
                .unwrap();
        assert_eq!(options.slides_per_view, 3.0);
        assert_eq!(options.space_between, 10);
        assert_eq!(options.selector, ".swiper");
        assert_eq!(options.navigation.next_el, ".n");
    }
}
