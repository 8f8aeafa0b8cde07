//! Accordion behavior on an in-memory page.

use vitrine_widgets::{
    AccordionController, AccordionOptions, Document, GroupId, MemoryDocument, NodeId, PanelState,
};

const TRIGGER: &str = "answers__accordion-btn";

/// `count` question blocks, each a button followed by its answer.
fn faq(count: usize) -> (MemoryDocument, Vec<(NodeId, NodeId)>) {
    let doc = MemoryDocument::new();
    let list = doc.append_with_classes(doc.root(), "ul", &["answers__list"]);
    let pairs = (0..count)
        .map(|_| {
            let item = doc.append(list, "li");
            let trigger = doc.append_with_classes(item, "button", &[TRIGGER]);
            let panel = doc.append_with_classes(item, "div", &["answers__text"]);
            (trigger, panel)
        })
        .collect();
    (doc, pairs)
}

fn observed(doc: &MemoryDocument, (trigger, panel): (NodeId, NodeId)) -> (bool, bool) {
    (doc.has_class(&trigger, "active"), doc.is_shown(&panel))
}

#[test]
fn test_single_activation_expands() {
    let (doc, pairs) = faq(1);
    let mut controller = AccordionController::bind(doc, &AccordionOptions::default()).controller;
    assert_eq!(observed(controller.document(), pairs[0]), (false, false));

    assert_eq!(controller.activate(GroupId(0)), Some(PanelState::Expanded));

    assert_eq!(controller.state(GroupId(0)), Some(PanelState::Expanded));
    assert_eq!(observed(controller.document(), pairs[0]), (true, true));
}

#[test]
fn test_double_activation_restores() {
    let (doc, pairs) = faq(1);
    let mut controller = AccordionController::bind(doc, &AccordionOptions::default()).controller;
    let before = observed(controller.document(), pairs[0]);

    controller.activate(GroupId(0));
    controller.activate(GroupId(0));

    assert_eq!(controller.state(GroupId(0)), Some(PanelState::Collapsed));
    assert_eq!(observed(controller.document(), pairs[0]), before);
}

#[test]
fn test_groups_are_independent() {
    let (doc, pairs) = faq(3);
    let mut controller = AccordionController::bind(doc, &AccordionOptions::default()).controller;

    for _ in 0..5 {
        controller.activate(GroupId(0));
        assert_eq!(controller.state(GroupId(1)), Some(PanelState::Collapsed));
        assert_eq!(controller.state(GroupId(2)), Some(PanelState::Collapsed));
        assert_eq!(observed(controller.document(), pairs[1]), (false, false));
        assert_eq!(observed(controller.document(), pairs[2]), (false, false));
    }

    controller.activate(GroupId(2));
    assert_eq!(controller.state(GroupId(0)), Some(PanelState::Expanded));
    assert_eq!(observed(controller.document(), pairs[0]), (true, true));
    assert_eq!(observed(controller.document(), pairs[2]), (true, true));
}

#[test]
fn test_visibility_matches_state() {
    let (doc, pairs) = faq(4);
    let mut controller = AccordionController::bind(doc, &AccordionOptions::default()).controller;

    // an arbitrary but fixed click sequence
    for id in [0, 2, 2, 3, 1, 0, 3, 3, 1] {
        controller.activate(GroupId(id));
        for (group, pair) in controller.groups().iter().zip(&pairs) {
            let expanded = group.is_expanded();
            assert_eq!(observed(controller.document(), *pair), (expanded, expanded));
        }
    }
}

#[test]
fn test_group_set_is_fixed() {
    let (doc, pairs) = faq(2);
    let mut controller = AccordionController::bind(doc, &AccordionOptions::default()).controller;

    // markup added after binding is not picked up
    let late = controller
        .document()
        .append_with_classes(controller.document().root(), "button", &[TRIGGER]);
    controller.document().append(controller.document().root(), "div");

    for id in [0, 1, 0] {
        controller.activate(GroupId(id));
        assert_eq!(controller.len(), 2);
    }
    assert_eq!(controller.activate_trigger(&late), None);

    let triggers: Vec<NodeId> = controller.groups().iter().map(|g| *g.trigger()).collect();
    assert_eq!(triggers, pairs.iter().map(|(t, _)| *t).collect::<Vec<_>>());
}

#[test]
fn test_no_triggers() {
    let doc = MemoryDocument::new();
    doc.append_with_classes(doc.root(), "section", &["answers"]);

    let binding = AccordionController::bind(doc, &AccordionOptions::default());

    assert!(binding.controller.is_empty());
    assert!(binding.unbound.is_empty());
}

#[test]
fn test_document_order() {
    let (doc, pairs) = faq(3);
    let controller = AccordionController::bind(doc, &AccordionOptions::default()).controller;

    let bound: Vec<(NodeId, NodeId)> = controller
        .groups()
        .iter()
        .map(|g| (*g.trigger(), *g.panel()))
        .collect();
    assert_eq!(bound, pairs);
}

#[test]
fn test_broken_markup_leaves_others_working() {
    let doc = MemoryDocument::new();
    let good = doc.append_with_classes(doc.root(), "button", &[TRIGGER]);
    let good_panel = doc.append(doc.root(), "div");
    let wrapper = doc.append(doc.root(), "div");
    let orphan = doc.append_with_classes(wrapper, "button", &[TRIGGER]);

    let binding = AccordionController::bind(doc, &AccordionOptions::default());
    let mut controller = binding.controller;

    assert_eq!(binding.unbound.len(), 1);
    assert_eq!(binding.unbound[0].position, 1);
    assert_eq!(controller.activate_trigger(&orphan), None);

    assert_eq!(controller.activate_trigger(&good), Some(PanelState::Expanded));
    assert!(controller.document().is_shown(&good_panel));
    assert!(controller.document().is_shown(&wrapper));
}
