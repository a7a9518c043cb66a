//! Two-dimensional pixel vectors.
//!
//! [`Vector2`] is the position/offset type used throughout the frame
//! hierarchy and the sample history. Every operation rebuilds its components
//! through [`Px`], so a NaN can never enter a vector.
//!
//! [`DynVector`] is the loose, variable-length representation used at
//! boundaries that hand over plain component lists. Binary operations on it
//! zero-pad the shorter operand instead of failing.

#[cfg(test)]
#[path = "vector_test.rs"]
mod vector_test;

use std::fmt;

use serde::Serialize;

use crate::error::GeometryError;
use crate::unit::{Px, UnitScalar};

/// An immutable pixel vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector2 {
    x: Px,
    y: Px,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: Px::ZERO, y: Px::ZERO };

    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] if either component is not finite.
    pub fn new(x: f64, y: f64) -> Result<Self, GeometryError> {
        Ok(Self { x: Px::new(x)?, y: Px::new(y)? })
    }

    #[must_use]
    pub fn from_px(x: Px, y: Px) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.x.get()
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.y.get()
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] on overflow.
    pub fn plus(&self, other: &Self) -> Result<Self, GeometryError> {
        Ok(Self { x: self.x.plus(&other.x)?, y: self.y.plus(&other.y)? })
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] on overflow.
    pub fn minus(&self, other: &Self) -> Result<Self, GeometryError> {
        Ok(Self { x: self.x.minus(&other.x)?, y: self.y.minus(&other.y)? })
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for a non-finite factor or overflow.
    pub fn times(&self, factor: f64) -> Result<Self, GeometryError> {
        Ok(Self { x: self.x.times(factor)?, y: self.y.times(factor)? })
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::DivisionByZero`] for a zero divisor.
    pub fn divide(&self, divisor: f64) -> Result<Self, GeometryError> {
        Ok(Self { x: self.x.divide(divisor)?, y: self.y.divide(divisor)? })
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x() * other.x() + self.y() * other.y()
    }

    /// Euclidean norm.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.x().hypot(self.y())
    }

    /// Component-wise absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self { x: self.x.abs(), y: self.y.abs() }
    }

    /// Whether both components are within `eps` of `other`'s.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        (self.x() - other.x()).abs() <= eps && (self.y() - other.y()).abs() <= eps
    }

    /// Take the first two components of `v`, zero-padding if it is shorter.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] if a used component is not finite.
    pub fn from_dyn(v: &DynVector) -> Result<Self, GeometryError> {
        Self::new(v.component(0), v.component(1))
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

/// A variable-length list of components.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DynVector {
    components: Vec<f64>,
}

impl DynVector {
    #[must_use]
    pub fn new(components: Vec<f64>) -> Self {
        Self { components }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component `i`, or zero past the end.
    #[must_use]
    pub fn component(&self, i: usize) -> f64 {
        self.components.get(i).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn components(&self) -> &[f64] {
        &self.components
    }

    /// Component-wise sum; the shorter operand is zero-padded.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        self.zip_padded(other, |a, b| a + b)
    }

    /// Component-wise difference; the shorter operand is zero-padded.
    #[must_use]
    pub fn minus(&self, other: &Self) -> Self {
        self.zip_padded(other, |a, b| a - b)
    }

    /// Dot product; missing components count as zero.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.components.iter().zip(&other.components).map(|(a, b)| a * b).sum()
    }

    fn zip_padded(&self, other: &Self, op: impl Fn(f64, f64) -> f64) -> Self {
        let len = self.len().max(other.len());
        Self { components: (0..len).map(|i| op(self.component(i), other.component(i))).collect() }
    }
}

impl From<Vector2> for DynVector {
    fn from(v: Vector2) -> Self {
        Self { components: vec![v.x(), v.y()] }
    }
}
