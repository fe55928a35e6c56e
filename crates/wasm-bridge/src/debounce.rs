//! Trailing debounce for bursts of edits

use std::cell::Cell;
use std::rc::Rc;

/// Hands out tokens; only the most recently issued token is current.
///
/// A caller arms the gate on every edit, waits `delay_ms`, then fires only if
/// its token is still current. A delay of 0 disables debouncing.
#[derive(Debug, Clone, Default)]
pub struct DebounceGate {
    delay_ms: u32,
    latest: Rc<Cell<u64>>,
}

#[derive(Debug, Clone)]
pub struct DebounceToken {
    id: u64,
    latest: Rc<Cell<u64>>,
}

impl DebounceGate {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            latest: Rc::new(Cell::new(0)),
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn is_enabled(&self) -> bool {
        self.delay_ms > 0
    }

    /// Supersede every earlier token
    pub fn arm(&self) -> DebounceToken {
        let id = self.latest.get() + 1;
        self.latest.set(id);
        DebounceToken {
            id,
            latest: self.latest.clone(),
        }
    }
}

impl DebounceToken {
    pub fn is_current(&self) -> bool {
        self.latest.get() == self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_token_fires() {
        let gate = DebounceGate::new(200);
        let first = gate.arm();
        let second = gate.arm();

        assert!(!first.is_current());
        assert!(second.is_current());

        let third = gate.clone().arm();
        assert!(!second.is_current());
        assert!(third.is_current());
    }

    #[test]
    fn test_zero_delay_disables() {
        assert!(!DebounceGate::new(0).is_enabled());
        assert!(DebounceGate::new(150).is_enabled());
    }
}
