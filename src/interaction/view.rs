use crate::domain::{CardId, Status};
use crate::interaction::Effect;
use std::collections::{BTreeMap, BTreeSet};

/// Adapter that turns controller effects into something the user sees.
///
/// Only visual effects reach a view; moves and rejections are handled by the
/// session before this is called.
pub trait BoardView {
    fn apply(&mut self, effect: &Effect);
}

/// View that records affordances in memory instead of touching a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessView {
    pub lifted: Option<CardId>,
    pub highlighted: BTreeSet<Status>,
    /// Hovered column and whether it accepts the drop
    pub hover: BTreeMap<Status, bool>,
    pub armed: Option<CardId>,
    pub focused: Option<Status>,
}

impl BoardView for HeadlessView {
    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::LiftCard(id) => self.lifted = Some(id.clone()),
            Effect::HighlightColumns(columns) => {
                self.highlighted = columns.iter().copied().collect();
            }
            Effect::Hover { column, accepting } => {
                self.hover.insert(*column, *accepting);
            }
            Effect::ClearHover(column) => {
                self.hover.remove(column);
            }
            Effect::ClearDrag => {
                self.lifted = None;
                self.highlighted.clear();
                self.hover.clear();
            }
            Effect::ArmCard(id) => self.armed = Some(id.clone()),
            Effect::FocusColumn(status) => self.focused = Some(*status),
            Effect::DisarmCard(id) => {
                if self.armed.as_ref() == Some(id) {
                    self.armed = None;
                    self.focused = None;
                }
            }
            Effect::Move(_) | Effect::Reject(_) => {}
        }
    }
}

impl HeadlessView {
    /// True when no drag or keyboard affordance is showing
    pub fn is_clear(&self) -> bool {
        self.lifted.is_none()
            && self.highlighted.is_empty()
            && self.hover.is_empty()
            && self.armed.is_none()
            && self.focused.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_headless_view_tracks_drag_affordances() {
        let id = CardId::from_str("5").unwrap();
        let mut view = HeadlessView::default();

        view.apply(&Effect::LiftCard(id.clone()));
        view.apply(&Effect::HighlightColumns(vec![Status::Review]));
        view.apply(&Effect::Hover { column: Status::Review, accepting: true });
        assert_eq!(view.lifted, Some(id));
        assert_eq!(view.hover.get(&Status::Review), Some(&true));

        view.apply(&Effect::ClearHover(Status::Review));
        assert!(view.hover.is_empty());

        view.apply(&Effect::ClearDrag);
        assert!(view.is_clear());
    }

    #[test]
    fn test_disarm_only_clears_matching_card() {
        let first = CardId::from_str("1").unwrap();
        let second = CardId::from_str("2").unwrap();
        let mut view = HeadlessView::default();

        view.apply(&Effect::ArmCard(second.clone()));
        view.apply(&Effect::FocusColumn(Status::Todo));
        view.apply(&Effect::DisarmCard(first));
        assert_eq!(view.armed, Some(second.clone()));

        view.apply(&Effect::DisarmCard(second));
        assert!(view.is_clear());
    }
}
