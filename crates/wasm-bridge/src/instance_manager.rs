//! Registry of live explorer controllers
//! DOM callbacks hold only an id; the controller lives in thread-local storage

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use uuid::Uuid;

use crate::controller::ReactiveController;
use crate::driver::SharedController;

thread_local! {
    static EXPLORER_INSTANCES: RefCell<HashMap<Uuid, SharedController>> = RefCell::new(HashMap::new());
}

/// Manages controller instances without global mutable state
pub struct InstanceManager;

impl InstanceManager {
    /// Register a controller and return its id
    pub fn create_instance(controller: ReactiveController) -> Uuid {
        let id = Uuid::new_v4();
        Self::register(id, controller);
        id
    }

    /// Register under an id chosen by the caller. Replaces any controller
    /// already registered under it.
    pub fn register(id: Uuid, controller: ReactiveController) {
        EXPLORER_INSTANCES.with(|instances| {
            instances
                .borrow_mut()
                .insert(id, Rc::new(RefCell::new(controller)));
        });
    }

    /// Shared handle for async cycles
    pub fn get(id: &Uuid) -> Option<SharedController> {
        EXPLORER_INSTANCES.with(|instances| instances.borrow().get(id).cloned())
    }

    pub fn with_instance<F, R>(id: &Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&ReactiveController) -> R,
    {
        Self::get(id).map(|controller| f(&controller.borrow()))
    }

    pub fn instance_exists(id: &Uuid) -> bool {
        EXPLORER_INSTANCES.with(|instances| instances.borrow().contains_key(id))
    }

    /// Cycles still in flight keep their handle and finish normally
    pub fn remove_instance(id: &Uuid) -> Option<SharedController> {
        EXPLORER_INSTANCES.with(|instances| instances.borrow_mut().remove(id))
    }

    pub fn instance_count() -> usize {
        EXPLORER_INSTANCES.with(|instances| instances.borrow().len())
    }

    pub fn clear_all() {
        EXPLORER_INSTANCES.with(|instances| {
            instances.borrow_mut().clear();
        });
    }
}
