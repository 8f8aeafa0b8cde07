//! Expand/collapse state of a single toggle group.

/// State of one trigger/panel pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelState {
    /// Panel hidden, trigger unmarked.
    #[default]
    Collapsed,
    /// Panel shown, trigger marked active.
    Expanded,
}

impl PanelState {
    /// The state after one activation.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            PanelState::Collapsed => PanelState::Expanded,
            PanelState::Expanded => PanelState::Collapsed,
        }
    }

    /// Whether the panel is open.
    #[must_use]
    pub fn is_expanded(self) -> bool {
        self == PanelState::Expanded
    }
}

impl From<bool> for PanelState {
    fn from(expanded: bool) -> Self {
        if expanded {
            PanelState::Expanded
        } else {
            PanelState::Collapsed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_collapsed() {
        assert_eq!(PanelState::default(), PanelState::Collapsed);
        assert!(!PanelState::default().is_expanded());
    }

    #[test]
    fn test_toggle_flips() {
        assert_eq!(PanelState::Collapsed.toggled(), PanelState::Expanded);
        assert_eq!(PanelState::Expanded.toggled(), PanelState::Collapsed);
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        for state in [PanelState::Collapsed, PanelState::Expanded] {
            assert_eq!(state.toggled().toggled(), state);
        }
    }

    #[test]
    fn test_from_bool() {
        assert_eq!(PanelState::from(true), PanelState::Expanded);
        assert_eq!(PanelState::from(false), PanelState::Collapsed);
    }
}
