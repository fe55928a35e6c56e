//! Categorical filter controls and their reduction into a `FilterGroup`

use explorer_shared::{FilterGroup, StartupContext};

/// One checkable filter control: an option value under a filter key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControl {
    pub key: String,
    pub value: String,
    pub checked: bool,
}

impl FilterControl {
    pub fn new(key: impl Into<String>, value: impl Into<String>, checked: bool) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            checked,
        }
    }
}

/// Anything that can enumerate the current filter controls. The browser
/// reads checkboxes from the DOM; tests and headless hosts use
/// [`FilterRegistry`].
pub trait FilterSource {
    fn controls(&self) -> Vec<FilterControl>;

    /// Mirror a toggle into the source. Sources that read live UI state
    /// already reflect it and keep the default.
    fn set_checked(&mut self, _key: &str, _value: &str, _checked: bool) {}
}

/// In-memory filter controls
#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
    controls: Vec<FilterControl>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One unchecked control per option listed in the startup payload
    pub fn from_startup(context: &StartupContext) -> Self {
        let controls = context
            .filters
            .iter()
            .flat_map(|(key, options)| {
                options
                    .iter()
                    .map(move |option| FilterControl::new(key.as_str(), option.as_str(), false))
            })
            .collect();
        Self { controls }
    }

    pub fn register(&mut self, control: FilterControl) {
        self.controls.push(control);
    }
}

impl FilterSource for FilterRegistry {
    fn controls(&self) -> Vec<FilterControl> {
        self.controls.clone()
    }

    fn set_checked(&mut self, key: &str, value: &str, checked: bool) {
        let mut found = false;
        for control in self
            .controls
            .iter_mut()
            .filter(|c| c.key == key && c.value == value)
        {
            control.checked = checked;
            found = true;
        }

        if !found {
            log::warn!("Toggled unknown filter control {key}={value}");
        }
    }
}

/// Reduces filter controls into the grouped selection sent to the backend
pub struct FilterCollector {
    source: Box<dyn FilterSource>,
    known_keys: Vec<String>,
}

impl FilterCollector {
    pub fn new(source: Box<dyn FilterSource>) -> Self {
        Self {
            source,
            known_keys: Vec::new(),
        }
    }

    /// Keys that must be sent even when the page offers no control for them
    pub fn with_known_keys(mut self, keys: impl IntoIterator<Item = String>) -> Self {
        self.known_keys.extend(keys);
        self
    }

    /// Every key present among the controls appears in the result, with an
    /// empty set when none of its controls is checked.
    pub fn collect(&self) -> FilterGroup {
        let mut group = FilterGroup::new();
        for key in &self.known_keys {
            group.ensure_key(key);
        }
        for control in self.source.controls() {
            if control.checked {
                group.select(&control.key, &control.value);
            } else {
                group.ensure_key(&control.key);
            }
        }
        group
    }

    pub fn toggle(&mut self, key: &str, value: &str, checked: bool) {
        self.source.set_checked(key, value, checked);
    }
}

impl std::fmt::Debug for FilterCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterCollector")
            .field("controls", &self.source.controls().len())
            .finish()
    }
}
