//! UI Module - egui front-end for the leetmouse driver parameters
//!
//! The form logic is independent of egui: widgets are modelled in `widgets`,
//! event wiring lives in `hook`, the X/Y linking rules in `linked`, and
//! `form` ties them to `DriverParams`. `app` is the egui view on top.

pub mod app;
pub mod form;
pub mod hook;
pub mod linked;
pub mod threading;
pub mod widgets;

pub use app::LeetmouseApp;
pub use form::ParameterForm;
pub use hook::{Callback, HookOutcome, HookRegistry};
pub use linked::{FieldConsistencyController, LinkedFieldPair};
pub use threading::KeepAlive;
pub use widgets::{CheckBox, SpinBox, Widget, WidgetSet, WidgetValue};
