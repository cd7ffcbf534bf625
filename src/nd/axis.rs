//! Per-axis calibration: how an integer coordinate maps to a physical value.

use std::fmt;
use std::sync;

/// Maps a coordinate along one axis to a calibrated value. Evaluated on every call, never cached.
pub trait Calibration: Send + Sync {
  fn calibrate(&self, coord: i64) -> f64;
}

/// The coordinate itself.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Identity;

impl Calibration for Identity {
  fn calibrate(&self, coord: i64) -> f64 {
    coord as f64
  }
}

/// `offset + scale * coord`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linear {
  pub offset: f64,
  pub scale: f64,
}

impl Linear {
  pub fn new(offset: f64, scale: f64) -> Self {
    Linear { offset, scale }
  }
}

impl Calibration for Linear {
  fn calibrate(&self, coord: i64) -> f64 {
    self.offset + self.scale * coord as f64
  }
}

/// An arbitrary function of the coordinate.
pub struct FnCalibration<F>(pub F);

impl<F: Fn(i64) -> f64 + Send + Sync> Calibration for FnCalibration<F> {
  fn calibrate(&self, coord: i64) -> f64 {
    (self.0)(coord)
  }
}

/// Label, unit and calibration of one axis.
#[derive(Clone)]
pub struct Axis {
  label: String,
  unit: String,
  equation: sync::Arc<dyn Calibration>,
}

impl Default for Axis {
  fn default() -> Self {
    Axis { label: String::new(), unit: String::new(), equation: sync::Arc::new(Identity) }
  }
}

impl fmt::Debug for Axis {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Axis").field("label", &self.label).field("unit", &self.unit).finish_non_exhaustive()
  }
}

impl Axis {
  pub fn new(label: impl Into<String>, unit: impl Into<String>) -> Self {
    Axis { label: label.into(), unit: unit.into(), ..Axis::default() }
  }

  pub fn with_equation(mut self, equation: impl Calibration + 'static) -> Self {
    self.equation = sync::Arc::new(equation);
    self
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  pub fn unit(&self) -> &str {
    &self.unit
  }

  pub fn set_label(&mut self, label: impl Into<String>) {
    self.label = label.into();
  }

  pub fn set_unit(&mut self, unit: impl Into<String>) {
    self.unit = unit.into();
  }

  pub fn set_equation(&mut self, equation: impl Calibration + 'static) {
    self.equation = sync::Arc::new(equation);
  }

  pub fn equation(&self) -> &dyn Calibration {
    &*self.equation
  }

  pub fn calibrate(&self, coord: i64) -> f64 {
    self.equation.calibrate(coord)
  }
}
