//! Async glue between events, the network and the controller
//!
//! The controller is only borrowed around synchronous steps, never across
//! an await, so events arriving while a request is in flight can still be
//! handled.

use crate::controller::{CycleOutcome, PendingCycle, ReactiveController};
use explorer_shared::ControlEvent;
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::rc::Rc;

pub type SharedController = Rc<RefCell<ReactiveController>>;

/// Handle an event. Returns the cycle future when the event triggered one;
/// the caller spawns it on the local executor.
pub fn dispatch(
    controller: &SharedController,
    event: ControlEvent,
) -> Option<LocalBoxFuture<'static, CycleOutcome>> {
    let cycle = controller.borrow_mut().handle_event(event)?;
    Some(Box::pin(run_cycle(controller.clone(), cycle)))
}

/// Send the request, apply the completion, then run any coalesced
/// follow-up. Returns the outcome of the last cycle run.
pub async fn run_cycle(controller: SharedController, cycle: PendingCycle) -> CycleOutcome {
    let mut cycle = cycle;
    loop {
        let seq = cycle.seq;
        let result = cycle.send().await;

        let (outcome, follow_up) = {
            let mut controller = controller.borrow_mut();
            let outcome = controller.complete_cycle(seq, result);
            (outcome, controller.take_follow_up())
        };

        match follow_up {
            Some(next) => cycle = next,
            None => return outcome,
        }
    }
}
