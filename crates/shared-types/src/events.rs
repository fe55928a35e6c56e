//! UI control events delivered to the controller

use crate::point::PointSelection;
use crate::query_state::StateUpdate;

/// Everything the page can tell the controller.
///
/// Field edits become a [`StateUpdate`]; filter checkboxes report their own
/// key/value; the explicit update button and the initial load only trigger a
/// cycle.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlEvent {
    Initial,
    Field(StateUpdate),
    FilterToggled {
        key: String,
        value: String,
        checked: bool,
    },
    UpdateRequested,
    PointClicked(PointSelection),
}

impl ControlEvent {
    /// Whether handling the event starts a query cycle
    pub fn triggers_cycle(&self) -> bool {
        !matches!(self, ControlEvent::PointClicked(_))
    }
}
