//! Field consistency controller
//!
//! Keeps every linked X/Y field pair consistent: while the pair's override
//! toggle is off, the secondary (Y) field mirrors the primary (X) field and
//! cannot be edited; once the override is on, the secondary is independent.

use crate::error::HookError;
use crate::ui::hook::{Callback, HookRegistry};
use crate::ui::widgets::{WidgetSet, IS_CHECKED, STATE_CHANGED, VALUE, VALUE_CHANGED};

/// A primary field, the secondary that follows it, and the toggle decoupling them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedFieldPair {
    pub primary: String,
    pub secondary: String,
    pub override_toggle: String,
}

impl LinkedFieldPair {
    pub fn new(
        primary: impl Into<String>,
        secondary: impl Into<String>,
        override_toggle: impl Into<String>,
    ) -> Self {
        LinkedFieldPair {
            primary: primary.into(),
            secondary: secondary.into(),
            override_toggle: override_toggle.into(),
        }
    }

    pub fn pre_scale() -> Self {
        Self::new("PreScaleX", "PreScaleY", "EnablePreScaleY")
    }

    pub fn post_scale() -> Self {
        Self::new("PostScaleX", "PostScaleY", "EnablePostScaleY")
    }

    /// override off => secondary == primary and secondary not editable
    pub fn holds(&self, widgets: &WidgetSet) -> bool {
        if widgets.is_checked(&self.override_toggle) {
            return true;
        }
        widgets.value(&self.primary) == widgets.value(&self.secondary)
            && !widgets.is_enabled(&self.secondary)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FieldConsistencyController {
    pairs: Vec<LinkedFieldPair>,
}

impl FieldConsistencyController {
    pub fn new(pairs: Vec<LinkedFieldPair>) -> Self {
        FieldConsistencyController { pairs }
    }

    /// Pre-scale and post-scale pairs of the driver form
    pub fn scale_pairs() -> Self {
        Self::new(vec![LinkedFieldPair::pre_scale(), LinkedFieldPair::post_scale()])
    }

    pub fn pairs(&self) -> &[LinkedFieldPair] {
        &self.pairs
    }

    /// One-time startup pass, run before any hook is wired.
    ///
    /// Equal fields force the override off. Differing fields keep the
    /// configured override; the secondary's editability follows it, and an
    /// override that is configured off still pulls the secondary onto the
    /// primary. Events raised here are discarded.
    pub fn initialize(&self, widgets: &mut WidgetSet) {
        for pair in &self.pairs {
            let primary = widgets.value(&pair.primary);
            let secondary = widgets.value(&pair.secondary);

            if primary == secondary {
                widgets.set_checked(&pair.override_toggle, false);
                widgets.set_enabled(&pair.secondary, false);
                continue;
            }

            let overridden = widgets.is_checked(&pair.override_toggle);
            widgets.set_enabled(&pair.secondary, overridden);
            if !overridden {
                if let Some(v) = primary {
                    log::info!(
                        "[Linked] {} differs from {} with override off, resyncing to {}",
                        pair.secondary,
                        pair.primary,
                        v
                    );
                    widgets.set_value(&pair.secondary, v);
                }
            }
        }
        widgets.clear_pending();
    }

    /// Register the primary-changed and override-toggled handlers of every pair
    pub fn wire(&self, hooks: &mut HookRegistry, widgets: &WidgetSet) -> Result<(), HookError> {
        for pair in &self.pairs {
            let toggle = pair.override_toggle.clone();
            let secondary = pair.secondary.clone();
            hooks.hook(
                widgets,
                &pair.primary,
                VALUE_CHANGED,
                Callback::with_value(move |w, v| {
                    if w.is_checked(&toggle) {
                        return;
                    }
                    if let Some(v) = v.as_f64() {
                        w.set_value(&secondary, v);
                    }
                }),
                Some(VALUE),
            )?;

            let primary = pair.primary.clone();
            let secondary = pair.secondary.clone();
            hooks.hook(
                widgets,
                &pair.override_toggle,
                STATE_CHANGED,
                Callback::with_value(move |w, enabled| {
                    let enabled = enabled.as_bool().unwrap_or(false);
                    w.set_enabled(&secondary, enabled);
                    if !enabled {
                        // resync even when already equal
                        if let Some(v) = w.value(&primary) {
                            w.set_value(&secondary, v);
                        }
                    }
                }),
                Some(IS_CHECKED),
            )?;
        }
        Ok(())
    }

    /// Every pair whose invariant is currently broken
    pub fn violations(&self, widgets: &WidgetSet) -> Vec<&LinkedFieldPair> {
        self.pairs.iter().filter(|p| !p.holds(widgets)).collect()
    }

    pub fn check_invariant(&self, widgets: &WidgetSet) -> bool {
        self.violations(widgets).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::widgets::{CheckBox, SpinBox};

    fn pair_widgets(x: f64, y: f64, overridden: bool) -> WidgetSet {
        let mut w = WidgetSet::new();
        w.insert("PreScaleX", SpinBox::new(x, 0.0, 100.0));
        w.insert("PreScaleY", SpinBox::new(y, 0.0, 100.0));
        w.insert("EnablePreScaleY", CheckBox::new(overridden));
        w
    }

    fn controller() -> FieldConsistencyController {
        FieldConsistencyController::new(vec![LinkedFieldPair::pre_scale()])
    }

    #[test]
    fn test_equal_values_force_override_off() {
        let mut w = pair_widgets(5.0, 5.0, true);
        controller().initialize(&mut w);
        assert!(!w.is_checked("EnablePreScaleY"));
        assert!(!w.is_enabled("PreScaleY"));
        assert!(!w.has_pending());
    }

    #[test]
    fn test_differing_values_keep_override() {
        let mut w = pair_widgets(5.0, 7.0, true);
        controller().initialize(&mut w);
        assert!(w.is_checked("EnablePreScaleY"));
        assert!(w.is_enabled("PreScaleY"));
        assert_eq!(w.value("PreScaleY"), Some(7.0));
    }

    #[test]
    fn test_differing_values_with_override_off_resync() {
        let mut w = pair_widgets(5.0, 7.0, false);
        let c = controller();
        c.initialize(&mut w);
        assert!(!w.is_checked("EnablePreScaleY"));
        assert_eq!(w.value("PreScaleY"), Some(5.0));
        assert!(c.check_invariant(&w));
    }

    #[test]
    fn test_wire_fails_on_missing_widget() {
        let mut w = pair_widgets(1.0, 1.0, false);
        w.remove("EnablePreScaleY");
        let mut hooks = HookRegistry::new();
        assert!(controller().wire(&mut hooks, &w).is_err());
    }

    #[test]
    fn test_wire_registers_two_bindings_per_pair() {
        let w = pair_widgets(1.0, 1.0, false);
        let mut hooks = HookRegistry::new();
        controller().wire(&mut hooks, &w).unwrap();
        assert_eq!(hooks.bindings_for("PreScaleX", VALUE_CHANGED), 1);
        assert_eq!(hooks.bindings_for("EnablePreScaleY", STATE_CHANGED), 1);
    }
}
