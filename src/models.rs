//! Core data structures shared by the GUI, the parameter store and profiles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest value any parameter may take, in the form and in the driver
pub const PARAM_MAX: f64 = 1000.0;
/// Smallest value of a parameter that must stay positive
pub const PARAM_MIN_POSITIVE: f64 = 0.0001;

/// Every driver parameter the GUI edits.
///
/// `name()` is the module parameter name under
/// `/sys/module/leetmouse/parameters`, `widget()` the form field editing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Sensitivity,
    Acceleration,
    SensCap,
    Offset,
    SpeedCap,
    ScrollsPerTick,
    PreScaleX,
    PreScaleY,
    PostScaleX,
    PostScaleY,
}

pub const ALL_PARAMS: &[Param] = &[
    Param::Sensitivity,
    Param::Acceleration,
    Param::SensCap,
    Param::Offset,
    Param::SpeedCap,
    Param::ScrollsPerTick,
    Param::PreScaleX,
    Param::PreScaleY,
    Param::PostScaleX,
    Param::PostScaleY,
];

impl Param {
    pub fn name(self) -> &'static str {
        match self {
            Param::Sensitivity => "sensitivity",
            Param::Acceleration => "acceleration",
            Param::SensCap => "sens_cap",
            Param::Offset => "offset",
            Param::SpeedCap => "speed_cap",
            Param::ScrollsPerTick => "scrolls_per_tick",
            Param::PreScaleX => "pre_scale_x",
            Param::PreScaleY => "pre_scale_y",
            Param::PostScaleX => "post_scale_x",
            Param::PostScaleY => "post_scale_y",
        }
    }

    pub fn widget(self) -> &'static str {
        match self {
            Param::Sensitivity => "Sensitivity",
            Param::Acceleration => "Acceleration",
            Param::SensCap => "SensCap",
            Param::Offset => "Offset",
            Param::SpeedCap => "SpeedCap",
            Param::ScrollsPerTick => "ScrollsPerTick",
            Param::PreScaleX => "PreScaleX",
            Param::PreScaleY => "PreScaleY",
            Param::PostScaleX => "PostScaleX",
            Param::PostScaleY => "PostScaleY",
        }
    }

    /// Human readable label for the form
    pub fn label(self) -> &'static str {
        match self {
            Param::Sensitivity => "Sensitivity",
            Param::Acceleration => "Acceleration",
            Param::SensCap => "Sensitivity cap",
            Param::Offset => "Offset",
            Param::SpeedCap => "Speed cap",
            Param::ScrollsPerTick => "Scrolls per tick",
            Param::PreScaleX => "Pre-scale X",
            Param::PreScaleY => "Pre-scale Y",
            Param::PostScaleX => "Post-scale X",
            Param::PostScaleY => "Post-scale Y",
        }
    }

    /// Scales and sensitivity multiply the input and must stay positive.
    /// Everything else is a threshold or additive term where 0 means "off".
    pub fn must_be_positive(self) -> bool {
        matches!(
            self,
            Param::Sensitivity
                | Param::ScrollsPerTick
                | Param::PreScaleX
                | Param::PreScaleY
                | Param::PostScaleX
                | Param::PostScaleY
        )
    }

    /// Inclusive range accepted by the form, the profiles and the driver store
    pub fn range(self) -> (f64, f64) {
        let min = if self.must_be_positive() { PARAM_MIN_POSITIVE } else { 0.0 };
        (min, PARAM_MAX)
    }

    /// Spin box increment
    pub fn step(self) -> f64 {
        match self {
            Param::ScrollsPerTick => 0.5,
            Param::Offset | Param::SpeedCap => 0.1,
            _ => 0.01,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Full parameter set of the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverParams {
    pub sensitivity: f64,
    pub acceleration: f64,
    pub sens_cap: f64,
    pub offset: f64,
    pub speed_cap: f64,
    pub scrolls_per_tick: f64,
    pub pre_scale_x: f64,
    pub pre_scale_y: f64,
    pub post_scale_x: f64,
    pub post_scale_y: f64,
}

impl Default for DriverParams {
    fn default() -> Self {
        DriverParams {
            sensitivity: 1.0,
            acceleration: 0.0,
            sens_cap: 0.0,
            offset: 0.0,
            speed_cap: 0.0,
            scrolls_per_tick: 3.0,
            pre_scale_x: 1.0,
            pre_scale_y: 1.0,
            post_scale_x: 1.0,
            post_scale_y: 1.0,
        }
    }
}

impl DriverParams {
    pub fn get(&self, param: Param) -> f64 {
        match param {
            Param::Sensitivity => self.sensitivity,
            Param::Acceleration => self.acceleration,
            Param::SensCap => self.sens_cap,
            Param::Offset => self.offset,
            Param::SpeedCap => self.speed_cap,
            Param::ScrollsPerTick => self.scrolls_per_tick,
            Param::PreScaleX => self.pre_scale_x,
            Param::PreScaleY => self.pre_scale_y,
            Param::PostScaleX => self.post_scale_x,
            Param::PostScaleY => self.post_scale_y,
        }
    }

    pub fn set(&mut self, param: Param, value: f64) {
        let slot = match param {
            Param::Sensitivity => &mut self.sensitivity,
            Param::Acceleration => &mut self.acceleration,
            Param::SensCap => &mut self.sens_cap,
            Param::Offset => &mut self.offset,
            Param::SpeedCap => &mut self.speed_cap,
            Param::ScrollsPerTick => &mut self.scrolls_per_tick,
            Param::PreScaleX => &mut self.pre_scale_x,
            Param::PreScaleY => &mut self.pre_scale_y,
            Param::PostScaleX => &mut self.post_scale_x,
            Param::PostScaleY => &mut self.post_scale_y,
        };
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_cover_every_param() {
        let mut params = DriverParams::default();
        for (i, &param) in ALL_PARAMS.iter().enumerate() {
            params.set(param, i as f64 + 0.5);
        }
        for (i, &param) in ALL_PARAMS.iter().enumerate() {
            assert_eq!(params.get(param), i as f64 + 0.5, "{}", param);
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = ALL_PARAMS.iter().map(|p| p.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL_PARAMS.len());
    }
}
