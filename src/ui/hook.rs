//! Event hook utility
//!
//! Binds a widget event to a callback, optionally forwarding one of the
//! widget's properties read at the moment the event fires. Wiring statements
//! stay one line per field:
//!
//! ```ignore
//! hooks.hook(&widgets, "PreScaleX", VALUE_CHANGED, Callback::with_value(sync), Some(VALUE))?;
//! ```
//!
//! A missing event is a wiring bug and fails the whole setup. A missing
//! accessor only skips that binding after logging a warning.

use crate::error::HookError;
use crate::ui::widgets::{Widget, WidgetSet, WidgetValue};

/// Upper bound on events delivered by one dispatch; a cascade longer than
/// this means two handlers keep re-triggering each other.
const MAX_CASCADE: usize = 1024;

type PlainFn = Box<dyn FnMut(&mut WidgetSet)>;
type ValueFn = Box<dyn FnMut(&mut WidgetSet, WidgetValue)>;

/// Action run when a hooked event fires.
///
/// Callbacks get the widget set as explicit context instead of capturing
/// references to other widgets.
pub enum Callback {
    /// Invoked with no value (binding registered without an accessor)
    Plain(PlainFn),
    /// Invoked with the accessor's value at fire time
    WithValue(ValueFn),
}

impl Callback {
    pub fn plain(f: impl FnMut(&mut WidgetSet) + 'static) -> Self {
        Callback::Plain(Box::new(f))
    }

    pub fn with_value(f: impl FnMut(&mut WidgetSet, WidgetValue) + 'static) -> Self {
        Callback::WithValue(Box::new(f))
    }
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Callback::Plain(_) => f.write_str("Callback::Plain"),
            Callback::WithValue(_) => f.write_str("Callback::WithValue"),
        }
    }
}

/// Result of a `hook` call that did not hit a fatal wiring error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Bound,
    /// Accessor missing on the widget; nothing was registered
    Skipped,
}

#[derive(Debug)]
struct HookBinding {
    widget: String,
    event: String,
    accessor: Option<String>,
    callback: Callback,
}

/// All registered bindings, in registration order
#[derive(Debug, Default)]
pub struct HookRegistry {
    bindings: Vec<HookBinding>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `event` on `widget`.
    ///
    /// With `accessor` set, the callback must be `Callback::WithValue` and
    /// receives the accessor's value when the event fires; without it the
    /// callback must be `Callback::Plain`. A callback of the other shape
    /// cannot be invoked correctly and is treated as a wiring error.
    pub fn hook(
        &mut self,
        widgets: &WidgetSet,
        widget: &str,
        event: &str,
        callback: Callback,
        accessor: Option<&str>,
    ) -> Result<HookOutcome, HookError> {
        let target = widgets
            .get(widget)
            .ok_or_else(|| HookError::WidgetNotFound(widget.to_string()))?;

        if !target.has_event(event) {
            return Err(HookError::EventNotFound {
                widget: widget.to_string(),
                widget_type: target.type_name().to_string(),
                event: event.to_string(),
            });
        }

        if let Some(name) = accessor {
            if !target.has_property(name) {
                log::warn!(
                    "[Hook] Could not hook to {} '{}': no such accessor '{}'",
                    target.type_name(),
                    widget,
                    name
                );
                return Ok(HookOutcome::Skipped);
            }
        }

        match (&callback, accessor) {
            (Callback::Plain(_), None) | (Callback::WithValue(_), Some(_)) => {}
            _ => {
                return Err(HookError::CallbackArity {
                    widget: widget.to_string(),
                    event: event.to_string(),
                })
            }
        }

        log::debug!(
            "[Hook] {}.{} -> callback (accessor: {:?})",
            widget,
            event,
            accessor
        );
        self.bindings.push(HookBinding {
            widget: widget.to_string(),
            event: event.to_string(),
            accessor: accessor.map(str::to_string),
            callback,
        });
        Ok(HookOutcome::Bound)
    }

    /// Drop every binding on `widget`; returns how many were released
    pub fn release(&mut self, widget: &str) -> usize {
        let before = self.bindings.len();
        self.bindings.retain(|b| b.widget != widget);
        before - self.bindings.len()
    }

    /// Destroy `name`: its bindings are released and its queued events dropped
    pub fn remove_widget(&mut self, widgets: &mut WidgetSet, name: &str) -> Option<Box<dyn Widget>> {
        let widget = widgets.remove(name)?;
        let released = self.release(name);
        log::debug!("[Hook] removed {} and {} bindings", name, released);
        Some(widget)
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn bindings_for(&self, widget: &str, event: &str) -> usize {
        self.bindings
            .iter()
            .filter(|b| b.widget == widget && b.event == event)
            .count()
    }

    /// Deliver every queued event, including those raised by the callbacks
    /// themselves, in FIFO order. Each callback runs to completion before the
    /// next one starts. Returns the number of events delivered.
    pub fn dispatch_pending(&mut self, widgets: &mut WidgetSet) -> usize {
        let mut delivered = 0;
        while let Some(pending) = widgets.pop_event() {
            if delivered == MAX_CASCADE {
                let dropped = widgets.clear_pending() + 1;
                log::error!(
                    "[Hook] event cascade exceeded {} deliveries, dropped {} queued events",
                    MAX_CASCADE,
                    dropped
                );
                break;
            }
            delivered += 1;
            self.deliver(widgets, &pending.widget, pending.event);
        }
        delivered
    }

    fn deliver(&mut self, widgets: &mut WidgetSet, widget: &str, event: &str) {
        for binding in self
            .bindings
            .iter_mut()
            .filter(|b| b.widget == widget && b.event == event)
        {
            match &mut binding.callback {
                Callback::Plain(f) => f(widgets),
                Callback::WithValue(f) => {
                    let value = binding
                        .accessor
                        .as_deref()
                        .and_then(|name| widgets.property(widget, name));
                    match value {
                        Some(v) => f(widgets, v),
                        None => log::warn!(
                            "[Hook] {}.{} fired but accessor {:?} is unreadable",
                            widget,
                            event,
                            binding.accessor
                        ),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::widgets::{CheckBox, SpinBox, IS_CHECKED, STATE_CHANGED, VALUE, VALUE_CHANGED};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn widgets() -> WidgetSet {
        let mut w = WidgetSet::new();
        w.insert("X", SpinBox::new(1.0, 0.0, 100.0));
        w.insert("Toggle", CheckBox::new(false));
        w
    }

    #[test]
    fn test_missing_event_is_fatal() {
        let w = widgets();
        let mut hooks = HookRegistry::new();
        let err = hooks
            .hook(&w, "X", "clicked", Callback::plain(|_| {}), None)
            .unwrap_err();
        assert!(matches!(err, HookError::EventNotFound { .. }));
        assert_eq!(hooks.binding_count(), 0);
    }

    #[test]
    fn test_missing_widget_is_fatal() {
        let w = widgets();
        let mut hooks = HookRegistry::new();
        let err = hooks
            .hook(&w, "Nope", VALUE_CHANGED, Callback::plain(|_| {}), None)
            .unwrap_err();
        assert_eq!(err, HookError::WidgetNotFound("Nope".to_string()));
    }

    #[test]
    fn test_missing_accessor_is_skipped() {
        let w = widgets();
        let mut hooks = HookRegistry::new();
        let outcome = hooks
            .hook(&w, "Toggle", STATE_CHANGED, Callback::with_value(|_, _| {}), Some(VALUE))
            .unwrap();
        assert_eq!(outcome, HookOutcome::Skipped);
        assert_eq!(hooks.binding_count(), 0);
    }

    #[test]
    fn test_arity_mismatch_is_fatal() {
        let w = widgets();
        let mut hooks = HookRegistry::new();
        let err = hooks
            .hook(&w, "X", VALUE_CHANGED, Callback::plain(|_| {}), Some(VALUE))
            .unwrap_err();
        assert!(matches!(err, HookError::CallbackArity { .. }));
    }

    #[test]
    fn test_value_read_at_fire_time_in_registration_order() {
        let mut w = widgets();
        let mut hooks = HookRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        hooks
            .hook(
                &w,
                "X",
                VALUE_CHANGED,
                Callback::with_value(move |_, v| first.borrow_mut().push(("first", v))),
                Some(VALUE),
            )
            .unwrap();
        let second = Rc::clone(&seen);
        hooks
            .hook(
                &w,
                "X",
                VALUE_CHANGED,
                Callback::plain(move |w| {
                    second
                        .borrow_mut()
                        .push(("second", WidgetValue::Number(w.value("X").unwrap_or(0.0))))
                }),
                None,
            )
            .unwrap();

        w.set_value("X", 7.5);
        assert_eq!(hooks.dispatch_pending(&mut w), 1);
        assert_eq!(
            *seen.borrow(),
            vec![
                ("first", WidgetValue::Number(7.5)),
                ("second", WidgetValue::Number(7.5))
            ]
        );
    }

    #[test]
    fn test_cascading_events_are_delivered() {
        let mut w = widgets();
        let mut hooks = HookRegistry::new();
        hooks
            .hook(
                &w,
                "Toggle",
                STATE_CHANGED,
                Callback::with_value(|w, v| {
                    if v.as_bool() == Some(true) {
                        w.set_value("X", 42.0);
                    }
                }),
                Some(IS_CHECKED),
            )
            .unwrap();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        hooks
            .hook(&w, "X", VALUE_CHANGED, Callback::plain(move |_| *counter.borrow_mut() += 1), None)
            .unwrap();

        w.set_checked("Toggle", true);
        assert_eq!(hooks.dispatch_pending(&mut w), 2);
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(w.value("X"), Some(42.0));
    }

    #[test]
    fn test_remove_widget_stops_delivery() {
        let mut w = widgets();
        let mut hooks = HookRegistry::new();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        hooks
            .hook(&w, "X", VALUE_CHANGED, Callback::plain(move |_| *counter.borrow_mut() += 1), None)
            .unwrap();

        w.set_value("X", 2.0);
        assert!(hooks.remove_widget(&mut w, "X").is_some());
        assert_eq!(hooks.binding_count(), 0);
        assert_eq!(hooks.dispatch_pending(&mut w), 0);
        assert_eq!(*hits.borrow(), 0);
        assert!(hooks.remove_widget(&mut w, "X").is_none());
    }

    #[test]
    fn test_release_removes_bindings() {
        let w = widgets();
        let mut hooks = HookRegistry::new();
        hooks
            .hook(&w, "X", VALUE_CHANGED, Callback::plain(|_| {}), None)
            .unwrap();
        hooks
            .hook(&w, "Toggle", STATE_CHANGED, Callback::plain(|_| {}), None)
            .unwrap();
        assert_eq!(hooks.release("X"), 1);
        assert_eq!(hooks.bindings_for("X", VALUE_CHANGED), 0);
        assert_eq!(hooks.binding_count(), 1);
    }
}
