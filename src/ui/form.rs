//! Driver parameter form
//!
//! Owns the widget set for every `Param`, the hook registry and the field
//! consistency controller. The egui view only reads widget state and reports
//! user edits through `user_set_value` / `user_set_checked`; every other
//! widget update happens through the wired hooks.

use crate::error::HookError;
use crate::models::{DriverParams, Param, ALL_PARAMS};
use crate::ui::hook::HookRegistry;
use crate::ui::linked::FieldConsistencyController;
use crate::ui::widgets::{CheckBox, SpinBox, WidgetSet};

pub const ENABLE_PRE_SCALE_Y: &str = "EnablePreScaleY";
pub const ENABLE_POST_SCALE_Y: &str = "EnablePostScaleY";


pub struct ParameterForm {
    widgets: WidgetSet,
    hooks: HookRegistry,
    controller: FieldConsistencyController,
}

impl ParameterForm {
    /// Build the widgets from `params`, run the startup consistency pass and
    /// wire the hooks. A wiring error aborts construction so no window is
    /// ever shown with half-connected fields.
    pub fn build(params: &DriverParams) -> Result<Self, HookError> {
        let mut widgets = WidgetSet::new();
        for &param in ALL_PARAMS {
            let (min, max) = param.range();
            widgets.insert(param.widget(), SpinBox::new(params.get(param), min, max));
        }
        widgets.insert(
            ENABLE_PRE_SCALE_Y,
            CheckBox::new(params.pre_scale_x != params.pre_scale_y),
        );
        widgets.insert(
            ENABLE_POST_SCALE_Y,
            CheckBox::new(params.post_scale_x != params.post_scale_y),
        );

        let controller = FieldConsistencyController::scale_pairs();
        controller.initialize(&mut widgets);

        let mut hooks = HookRegistry::new();
        controller.wire(&mut hooks, &widgets)?;
        log::info!(
            "[Form] {} widgets, {} hook bindings",
            widgets.len(),
            hooks.binding_count()
        );

        Ok(ParameterForm {
            widgets,
            hooks,
            controller,
        })
    }

    /// Current parameter values as shown in the form
    pub fn params(&self) -> DriverParams {
        let mut params = DriverParams::default();
        for &param in ALL_PARAMS {
            if let Some(v) = self.widgets.value(param.widget()) {
                params.set(param, v);
            }
        }
        params
    }

    pub fn widgets(&self) -> &WidgetSet {
        &self.widgets
    }

    pub fn value(&self, param: Param) -> f64 {
        self.widgets.value(param.widget()).unwrap_or_default()
    }

    pub fn range(&self, param: Param) -> (f64, f64) {
        param.range()
    }

    pub fn is_enabled(&self, widget: &str) -> bool {
        self.widgets.is_enabled(widget)
    }

    pub fn is_checked(&self, widget: &str) -> bool {
        self.widgets.is_checked(widget)
    }

    /// A user edit of a spin field; returns the number of events delivered
    pub fn user_set_value(&mut self, param: Param, value: f64) -> usize {
        self.widgets.set_value(param.widget(), value);
        self.dispatch()
    }

    /// A user click on a toggle; returns the number of events delivered
    pub fn user_set_checked(&mut self, widget: &str, checked: bool) -> usize {
        self.widgets.set_checked(widget, checked);
        self.dispatch()
    }

    /// Destroy a widget together with every binding on it
    pub fn remove_widget(&mut self, name: &str) -> bool {
        self.hooks.remove_widget(&mut self.widgets, name).is_some()
    }

    pub fn invariants_hold(&self) -> bool {
        self.controller.check_invariant(&self.widgets)
    }

    fn dispatch(&mut self) -> usize {
        let delivered = self.hooks.dispatch_pending(&mut self.widgets);
        for pair in self.controller.violations(&self.widgets) {
            log::error!(
                "[Form] linked pair {} / {} out of sync",
                pair.primary,
                pair.secondary
            );
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::widgets::VALUE_CHANGED;

    #[test]
    fn test_build_from_defaults_links_both_pairs() {
        let form = ParameterForm::build(&DriverParams::default()).unwrap();
        assert!(!form.is_checked(ENABLE_PRE_SCALE_Y));
        assert!(!form.is_checked(ENABLE_POST_SCALE_Y));
        assert!(!form.is_enabled(Param::PreScaleY.widget()));
        assert!(form.is_enabled(Param::Sensitivity.widget()));
        assert!(form.invariants_hold());
    }

    #[test]
    fn test_build_with_split_axes_enables_override() {
        let params = DriverParams {
            post_scale_x: 0.4,
            post_scale_y: 0.6,
            ..DriverParams::default()
        };
        let form = ParameterForm::build(&params).unwrap();
        assert!(form.is_checked(ENABLE_POST_SCALE_Y));
        assert!(form.is_enabled(Param::PostScaleY.widget()));
        assert_eq!(form.params(), params);
    }

    #[test]
    fn test_large_values_are_kept_exactly() {
        let params = DriverParams {
            speed_cap: 150.0,
            pre_scale_x: 150.0,
            pre_scale_y: 200.0,
            ..DriverParams::default()
        };
        let form = ParameterForm::build(&params).unwrap();
        assert_eq!(form.params(), params);
        assert!(form.is_checked(ENABLE_PRE_SCALE_Y));
        assert!(form.is_enabled(Param::PreScaleY.widget()));
    }

    #[test]
    fn test_widget_range_matches_driver_validation() {
        let form = ParameterForm::build(&DriverParams::default()).unwrap();
        for &param in ALL_PARAMS {
            let (min, max) = form.range(param);
            assert!(crate::driver::validate_param_value(param, min).is_ok());
            assert!(crate::driver::validate_param_value(param, max).is_ok());
        }
    }

    #[test]
    fn test_remove_widget_releases_its_bindings() {
        let mut form = ParameterForm::build(&DriverParams::default()).unwrap();
        assert_eq!(form.hooks.bindings_for(Param::PreScaleX.widget(), VALUE_CHANGED), 1);

        assert!(form.remove_widget(Param::PreScaleX.widget()));
        assert!(!form.widgets().contains(Param::PreScaleX.widget()));
        assert_eq!(form.hooks.bindings_for(Param::PreScaleX.widget(), VALUE_CHANGED), 0);
        assert!(!form.remove_widget(Param::PreScaleX.widget()));

        // the post-scale pair is untouched
        form.user_set_value(Param::PostScaleX, 0.4);
        assert_eq!(form.value(Param::PostScaleY), 0.4);
    }

    #[test]
    fn test_edit_flows_back_into_params() {
        let mut form = ParameterForm::build(&DriverParams::default()).unwrap();
        form.user_set_value(Param::Sensitivity, 0.85);
        form.user_set_value(Param::PreScaleX, 0.0333);
        let params = form.params();
        assert_eq!(params.sensitivity, 0.85);
        assert_eq!(params.pre_scale_x, 0.0333);
        assert_eq!(params.pre_scale_y, 0.0333);
    }
}
