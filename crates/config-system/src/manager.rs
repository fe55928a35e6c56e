//! Live configuration with validation and rollback

use crate::{ConfigError, ConfigValidator, ExplorerConfig, Result};
use arc_swap::ArcSwap;
use parking_lot::RwLock;
use std::sync::Arc;

type UpdateListener = Box<dyn Fn(&ConfigUpdateEvent) + Send + Sync>;

/// Configuration update event
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigUpdateEvent {
    pub old_version: String,
    pub new_version: String,
    pub changed_sections: Vec<&'static str>,
}

/// Holds the active configuration. Reads are lock-free; updates are
/// validated before they replace the current value.
pub struct ConfigManager {
    current: ArcSwap<ExplorerConfig>,

    /// Accepted configurations, oldest first. The last entry is current
    /// unless a rollback happened since.
    history: RwLock<Vec<Arc<ExplorerConfig>>>,

    listeners: RwLock<Vec<UpdateListener>>,

    max_history: usize,
}

impl ConfigManager {
    /// Create a manager around an initial configuration
    pub fn new(initial: ExplorerConfig) -> Result<Self> {
        ConfigValidator::validate(&initial)?;

        let initial = Arc::new(initial);
        Ok(Self {
            current: ArcSwap::new(initial.clone()),
            history: RwLock::new(vec![initial]),
            listeners: RwLock::new(Vec::new()),
            max_history: 10,
        })
    }

    /// Get the current configuration
    pub fn current(&self) -> Arc<ExplorerConfig> {
        self.current.load_full()
    }

    /// Replace the configuration. Invalid configurations are rejected and
    /// the current one stays in place.
    pub fn update(&self, new_config: ExplorerConfig) -> Result<()> {
        ConfigValidator::validate(&new_config)?;

        let old_config = self.current.load_full();
        if *old_config == new_config {
            return Ok(());
        }

        let event = ConfigUpdateEvent {
            old_version: old_config.version.clone(),
            new_version: new_config.version.clone(),
            changed_sections: changed_sections(&old_config, &new_config),
        };

        let new_config = Arc::new(new_config);
        self.current.store(new_config.clone());

        {
            let mut history = self.history.write();
            history.push(new_config);
            if history.len() > self.max_history {
                history.remove(0);
            }
        }

        log::info!(
            "Configuration updated {} -> {} ({})",
            event.old_version,
            event.new_version,
            event.changed_sections.join(", ")
        );

        for listener in self.listeners.read().iter() {
            listener(&event);
        }

        Ok(())
    }

    /// Step back through accepted configurations. `steps = 0` restores the
    /// newest entry.
    pub fn rollback(&self, steps: usize) -> Result<()> {
        let history = self.history.read();

        if steps >= history.len() {
            return Err(ConfigError::Validation(format!(
                "Cannot roll back {steps} steps with {} entries of history",
                history.len()
            )));
        }

        let target = history[history.len() - 1 - steps].clone();
        drop(history);

        log::warn!("Rolling configuration back to version {}", target.version);
        self.current.store(target);
        Ok(())
    }

    /// Register a callback run after every accepted update
    pub fn on_update(&self, listener: impl Fn(&ConfigUpdateEvent) + Send + Sync + 'static) {
        self.listeners.write().push(Box::new(listener));
    }

    pub fn history_len(&self) -> usize {
        self.history.read().len()
    }
}

fn changed_sections(old: &ExplorerConfig, new: &ExplorerConfig) -> Vec<&'static str> {
    let mut changes = Vec::new();

    if old.version != new.version {
        changes.push("version");
    }
    if old.log_level != new.log_level {
        changes.push("log_level");
    }
    if old.endpoint != new.endpoint {
        changes.push("endpoint");
    }
    if old.defaults != new.defaults {
        changes.push("defaults");
    }
    if old.theme != new.theme {
        changes.push("theme");
    }
    if old.tooltip != new.tooltip {
        changes.push("tooltip");
    }
    if old.controller != new.controller {
        changes.push("controller");
    }

    changes
}
