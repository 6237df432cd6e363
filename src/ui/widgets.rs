//! Form widget model
//!
//! The form's controls are modelled independently of egui so the wiring and
//! field consistency logic can run (and be tested) without a window:
//! - SpinBox: numeric field, emits `valueChanged`, exposes `value`
//! - CheckBox: toggle, emits `stateChanged`, exposes `isChecked`
//!
//! Both expose `isEnabled`. Setting a property that changes the widget's
//! state queues the matching event on the owning `WidgetSet`; the hook
//! registry drains that queue after the current callback returns.

use std::collections::{HashMap, VecDeque};
use std::fmt;

pub const VALUE_CHANGED: &str = "valueChanged";
pub const STATE_CHANGED: &str = "stateChanged";

pub const VALUE: &str = "value";
pub const IS_CHECKED: &str = "isChecked";
pub const IS_ENABLED: &str = "isEnabled";

/// Value read from or written to a widget property
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetValue {
    Number(f64),
    Bool(bool),
}

impl WidgetValue {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            WidgetValue::Number(v) => Some(v),
            WidgetValue::Bool(_) => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            WidgetValue::Bool(b) => Some(b),
            WidgetValue::Number(_) => None,
        }
    }
}

impl fmt::Display for WidgetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetValue::Number(v) => write!(f, "{}", v),
            WidgetValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// A UI control as seen by the hook machinery.
pub trait Widget: fmt::Debug {
    /// Concrete widget type, used in diagnostics
    fn type_name(&self) -> &'static str;

    /// Events this widget can emit
    fn events(&self) -> &'static [&'static str];

    /// Read a named property, `None` if the widget has no such property
    fn property(&self, name: &str) -> Option<WidgetValue>;

    /// Write a named property.
    ///
    /// Returns the event the change emits, if the write changed anything that
    /// the widget reports through an event.
    fn set_property(&mut self, name: &str, value: WidgetValue) -> Option<&'static str>;

    fn has_event(&self, event: &str) -> bool {
        self.events().contains(&event)
    }

    fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }
}

/// Numeric spin control with a clamped range
#[derive(Debug, Clone, PartialEq)]
pub struct SpinBox {
    value: f64,
    min: f64,
    max: f64,
    enabled: bool,
}

impl SpinBox {
    pub fn new(value: f64, min: f64, max: f64) -> Self {
        SpinBox {
            value: value.clamp(min, max),
            min,
            max,
            enabled: true,
        }
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

impl Widget for SpinBox {
    fn type_name(&self) -> &'static str {
        "SpinBox"
    }

    fn events(&self) -> &'static [&'static str] {
        &[VALUE_CHANGED]
    }

    fn property(&self, name: &str) -> Option<WidgetValue> {
        match name {
            VALUE => Some(WidgetValue::Number(self.value)),
            IS_ENABLED => Some(WidgetValue::Bool(self.enabled)),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: WidgetValue) -> Option<&'static str> {
        match (name, value) {
            (VALUE, WidgetValue::Number(v)) if v.is_finite() => {
                let v = v.clamp(self.min, self.max);
                let changed = v != self.value;
                self.value = v;
                changed.then_some(VALUE_CHANGED)
            }
            (IS_ENABLED, WidgetValue::Bool(en)) => {
                self.enabled = en;
                None
            }
            _ => {
                log::warn!("[Widgets] SpinBox ignored write {}={}", name, value);
                None
            }
        }
    }
}

/// Boolean toggle
#[derive(Debug, Clone, PartialEq)]
pub struct CheckBox {
    checked: bool,
    enabled: bool,
}

impl CheckBox {
    pub fn new(checked: bool) -> Self {
        CheckBox {
            checked,
            enabled: true,
        }
    }
}

impl Widget for CheckBox {
    fn type_name(&self) -> &'static str {
        "CheckBox"
    }

    fn events(&self) -> &'static [&'static str] {
        &[STATE_CHANGED]
    }

    fn property(&self, name: &str) -> Option<WidgetValue> {
        match name {
            IS_CHECKED => Some(WidgetValue::Bool(self.checked)),
            IS_ENABLED => Some(WidgetValue::Bool(self.enabled)),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: WidgetValue) -> Option<&'static str> {
        match (name, value) {
            (IS_CHECKED, WidgetValue::Bool(c)) => {
                let changed = c != self.checked;
                self.checked = c;
                changed.then_some(STATE_CHANGED)
            }
            (IS_ENABLED, WidgetValue::Bool(en)) => {
                self.enabled = en;
                None
            }
            _ => {
                log::warn!("[Widgets] CheckBox ignored write {}={}", name, value);
                None
            }
        }
    }
}

/// An event waiting to be delivered to its bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEvent {
    pub widget: String,
    pub event: &'static str,
}

/// Named collection of widgets plus the queue of events their changes emitted
#[derive(Debug, Default)]
pub struct WidgetSet {
    widgets: HashMap<String, Box<dyn Widget>>,
    pending: VecDeque<PendingEvent>,
}

impl WidgetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, widget: impl Widget + 'static) {
        self.widgets.insert(name.into(), Box::new(widget));
    }

    /// Remove a widget; events already queued for it are dropped.
    /// Outside the crate widgets are destroyed through
    /// `HookRegistry::remove_widget`, which also releases their bindings.
    pub(crate) fn remove(&mut self, name: &str) -> Option<Box<dyn Widget>> {
        self.pending.retain(|e| e.widget != name);
        self.widgets.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Widget> {
        self.widgets.get(name).map(|w| w.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.widgets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn property(&self, widget: &str, name: &str) -> Option<WidgetValue> {
        self.get(widget).and_then(|w| w.property(name))
    }

    /// Write a property, queueing whatever event the change emits.
    /// Returns false if the widget does not exist.
    pub fn set_property(&mut self, widget: &str, name: &str, value: WidgetValue) -> bool {
        let Some(target) = self.widgets.get_mut(widget) else {
            log::warn!("[Widgets] write {}.{} on unknown widget", widget, name);
            return false;
        };
        if let Some(event) = target.set_property(name, value) {
            self.pending.push_back(PendingEvent {
                widget: widget.to_string(),
                event,
            });
        }
        true
    }

    pub fn value(&self, widget: &str) -> Option<f64> {
        self.property(widget, VALUE).and_then(WidgetValue::as_f64)
    }

    pub fn is_checked(&self, widget: &str) -> bool {
        self.property(widget, IS_CHECKED)
            .and_then(WidgetValue::as_bool)
            .unwrap_or(false)
    }

    pub fn is_enabled(&self, widget: &str) -> bool {
        self.property(widget, IS_ENABLED)
            .and_then(WidgetValue::as_bool)
            .unwrap_or(false)
    }

    pub fn set_value(&mut self, widget: &str, value: f64) -> bool {
        self.set_property(widget, VALUE, WidgetValue::Number(value))
    }

    pub fn set_checked(&mut self, widget: &str, checked: bool) -> bool {
        self.set_property(widget, IS_CHECKED, WidgetValue::Bool(checked))
    }

    pub fn set_enabled(&mut self, widget: &str, enabled: bool) -> bool {
        self.set_property(widget, IS_ENABLED, WidgetValue::Bool(enabled))
    }

    pub fn pop_event(&mut self) -> Option<PendingEvent> {
        self.pending.pop_front()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop queued events without delivering them (used before hooks exist)
    pub fn clear_pending(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }
}
