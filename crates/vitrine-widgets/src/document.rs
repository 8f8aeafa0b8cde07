//! The slice of the DOM the widgets rely on.

/// Element queries and presentational writes needed by the widgets.
///
/// Writes take `&self`: a document is shared with the browser and mutated through
/// handles, as the DOM itself is.
pub trait Document {
    /// Non-owning element handle.
    type Element: Clone + PartialEq;

    /// Elements carrying `class`, in document order. The result is a snapshot.
    fn elements_by_class(&self, class: &str) -> Vec<Self::Element>;

    /// Element with the given `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// The element immediately following `element` among its siblings.
    fn next_element_sibling(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Value of an attribute.
    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Whether `element` carries `class`.
    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    /// Add or remove `class`.
    fn set_class(&self, element: &Self::Element, class: &str, present: bool);

    /// Whether `element` is displayed.
    fn is_shown(&self, element: &Self::Element) -> bool;

    /// Show or hide `element`.
    fn set_shown(&self, element: &Self::Element, shown: bool);
}
