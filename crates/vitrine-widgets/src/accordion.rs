//! Accordion: independent trigger/panel pairs that expand and collapse on activation.
//!
//! Triggers are found by class. Each trigger's panel is the element named by its
//! `aria-controls` attribute when present, and otherwise its next element sibling.
//! Triggers without a usable panel are reported, not bound.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{document::Document, state::PanelState};

/// How triggers and panels are found and marked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccordionOptions {
    /// Class identifying triggers.
    pub trigger_class: String,

    /// Class put on a trigger while its panel is open.
    pub active_class: String,

    /// Attribute naming a panel by id; takes precedence over the sibling rule.
    pub controls_attribute: String,
}

impl Default for AccordionOptions {
    fn default() -> Self {
        Self {
            trigger_class: "answers__accordion-btn".to_string(),
            active_class: "active".to_string(),
            controls_attribute: "aria-controls".to_string(),
        }
    }
}

/// Index of a bound group, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub usize);

/// A trigger, the panel it controls, and the current state.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleGroup<E> {
    trigger: E,
    panel: E,
    state: PanelState,
}

impl<E> ToggleGroup<E> {
    /// The clickable element.
    pub fn trigger(&self) -> &E {
        &self.trigger
    }

    /// The element shown and hidden.
    pub fn panel(&self) -> &E {
        &self.panel
    }

    /// Current state.
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Whether the panel is open.
    pub fn is_expanded(&self) -> bool {
        self.state.is_expanded()
    }
}

/// Why a trigger could not be bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnboundReason {
    /// No element follows the trigger.
    NoSibling,
    /// The following element is itself a trigger.
    SiblingIsTrigger,
    /// `aria-controls` names an id that does not exist.
    MissingTarget(String),
    /// `aria-controls` names a trigger, possibly this one.
    TargetIsTrigger(String),
    /// The panel already belongs to an earlier trigger.
    PanelTaken,
}

/// A trigger left out of the accordion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundTrigger {
    /// Position among all elements carrying the trigger class.
    pub position: usize,

    /// What went wrong.
    pub reason: UnboundReason,
}

impl fmt::Display for UnboundTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "accordion trigger #{} not bound: ", self.position)?;
        match &self.reason {
            UnboundReason::NoSibling => f.write_str("no element follows it"),
            UnboundReason::SiblingIsTrigger => f.write_str("the next element is another trigger"),
            UnboundReason::MissingTarget(id) => write!(f, "no element with id `{id}`"),
            UnboundReason::TargetIsTrigger(id) => write!(f, "`{id}` is a trigger, not a panel"),
            UnboundReason::PanelTaken => f.write_str("its panel is controlled by another trigger"),
        }
    }
}

/// Result of binding an accordion.
pub struct Binding<D: Document> {
    /// The bound accordion.
    pub controller: AccordionController<D>,

    /// Triggers that were left out, in document order.
    pub unbound: Vec<UnboundTrigger>,
}

impl<D: Document> fmt::Debug for Binding<D>
where
    D::Element: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("controller", &self.controller)
            .field("unbound", &self.unbound)
            .finish()
    }
}

/// Owns the toggle groups of one document.
///
/// The set of groups is fixed at [`bind`](Self::bind) time.
pub struct AccordionController<D: Document> {
    document: D,
    active_class: String,
    groups: Vec<ToggleGroup<D::Element>>,
}

impl<D: Document> fmt::Debug for AccordionController<D>
where
    D::Element: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccordionController")
            .field("active_class", &self.active_class)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

impl<D: Document> AccordionController<D> {
    /// Find and bind every trigger in `document`.
    ///
    /// Bound groups start collapsed: panels hidden, triggers unmarked.
    pub fn bind(document: D, options: &AccordionOptions) -> Binding<D> {
        let triggers = document.elements_by_class(&options.trigger_class);
        let mut groups: Vec<ToggleGroup<D::Element>> = Vec::with_capacity(triggers.len());
        let mut unbound = Vec::new();

        for (position, trigger) in triggers.iter().enumerate() {
            let panel = match resolve_panel(&document, trigger, &triggers, options) {
                Ok(panel) => panel,
                Err(reason) => {
                    unbound.push(UnboundTrigger { position, reason });
                    continue;
                }
            };

            if groups.iter().any(|g| g.panel == panel || g.trigger == panel) {
                unbound.push(UnboundTrigger {
                    position,
                    reason: UnboundReason::PanelTaken,
                });
                continue;
            }

            groups.push(ToggleGroup {
                trigger: trigger.clone(),
                panel,
                state: PanelState::Collapsed,
            });
        }

        let controller = Self {
            document,
            active_class: options.active_class.clone(),
            groups,
        };
        for group in &controller.groups {
            controller.render(group);
        }

        Binding {
            controller,
            unbound,
        }
    }

    /// Flip one group and update its trigger and panel. Returns the new state, or
    /// `None` for an unknown id.
    pub fn activate(&mut self, id: GroupId) -> Option<PanelState> {
        let group = self.groups.get_mut(id.0)?;
        group.state = group.state.toggled();
        let state = group.state;

        self.render(&self.groups[id.0]);
        Some(state)
    }

    /// Activate the group whose trigger is `trigger`.
    pub fn activate_trigger(&mut self, trigger: &D::Element) -> Option<PanelState> {
        let id = self.find(trigger)?;
        self.activate(id)
    }

    /// Id of the group whose trigger is `trigger`.
    pub fn find(&self, trigger: &D::Element) -> Option<GroupId> {
        self.groups
            .iter()
            .position(|g| &g.trigger == trigger)
            .map(GroupId)
    }

    /// State of one group.
    pub fn state(&self, id: GroupId) -> Option<PanelState> {
        self.groups.get(id.0).map(ToggleGroup::state)
    }

    /// Bound groups in document order.
    pub fn groups(&self) -> &[ToggleGroup<D::Element>] {
        &self.groups
    }

    /// Ids of all bound groups.
    pub fn ids(&self) -> impl Iterator<Item = GroupId> + use<D> {
        (0..self.groups.len()).map(GroupId)
    }

    /// Number of bound groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no trigger was bound.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The underlying document.
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Write a group's state to its trigger and panel.
    fn render(&self, group: &ToggleGroup<D::Element>) {
        let expanded = group.state.is_expanded();
        self.document
            .set_class(&group.trigger, &self.active_class, expanded);
        self.document.set_shown(&group.panel, expanded);
    }
}

fn resolve_panel<D: Document>(
    document: &D,
    trigger: &D::Element,
    triggers: &[D::Element],
    options: &AccordionOptions,
) -> Result<D::Element, UnboundReason> {
    if let Some(target) = document
        .attribute(trigger, &options.controls_attribute)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    {
        let panel = document
            .element_by_id(&target)
            .ok_or_else(|| UnboundReason::MissingTarget(target.clone()))?;
        if panel == *trigger || triggers.contains(&panel) {
            return Err(UnboundReason::TargetIsTrigger(target));
        }
        return Ok(panel);
    }

    let sibling = document
        .next_element_sibling(trigger)
        .ok_or(UnboundReason::NoSibling)?;
    if triggers.contains(&sibling) {
        return Err(UnboundReason::SiblingIsTrigger);
    }
    Ok(sibling)
}
