//! Dimensioned scalars.
//!
//! A [`UnitScalar`] is a finite real number tagged with a unit. Arithmetic
//! and comparisons between two scalars check the units first and fail with
//! [`GeometryError::UnitMismatch`] instead of coercing. Every result is
//! rebuilt through [`UnitScalar::with_value`], so each concrete scalar type
//! keeps its own type (and its own validation) through `plus`/`minus`.
//!
//! [`Px`] is the pixel length used by vectors and frames. [`Length`] carries
//! its unit at runtime (pixels, percent, viewport width/height) and converts
//! between units given a [`ReferenceContext`].

#[cfg(test)]
#[path = "unit_test.rs"]
mod unit_test;

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Reject NaN and infinities.
///
/// # Errors
///
/// Returns [`GeometryError::NonFinite`] when `value` is not finite.
pub fn finite(value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() { Ok(value) } else { Err(GeometryError::NonFinite(value)) }
}

/// A finite number carrying a unit.
///
/// Implementors provide the raw accessors and a factory; the arithmetic and
/// comparison methods are shared.
pub trait UnitScalar: Copy + Sized {
    /// The unit tag compared before any binary operation.
    type Unit: Copy + PartialEq + fmt::Display;

    fn value(&self) -> f64;

    fn unit(&self) -> Self::Unit;

    /// Build a scalar of the same concrete type and unit carrying `value`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] when `value` is not finite.
    fn with_value(&self, value: f64) -> Result<Self, GeometryError>;

    /// Fail unless `other` has the same unit.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnitMismatch`] naming both units.
    fn check_unit(&self, other: &Self) -> Result<(), GeometryError> {
        if self.unit() == other.unit() {
            Ok(())
        } else {
            Err(GeometryError::UnitMismatch {
                left: self.unit().to_string(),
                right: other.unit().to_string(),
            })
        }
    }

    /// # Errors
    ///
    /// Unit mismatch, or a non-finite sum.
    fn plus(&self, other: &Self) -> Result<Self, GeometryError> {
        self.check_unit(other)?;
        self.with_value(self.value() + other.value())
    }

    /// # Errors
    ///
    /// Unit mismatch, or a non-finite difference.
    fn minus(&self, other: &Self) -> Result<Self, GeometryError> {
        self.check_unit(other)?;
        self.with_value(self.value() - other.value())
    }

    /// Scale by a bare number; the unit is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for a non-finite factor or product.
    fn times(&self, factor: f64) -> Result<Self, GeometryError> {
        self.with_value(self.value() * finite(factor)?)
    }

    /// Divide by a bare number; the unit is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DivisionByZero`] for a zero divisor.
    fn divide(&self, divisor: f64) -> Result<Self, GeometryError> {
        if finite(divisor)? == 0.0 {
            return Err(GeometryError::DivisionByZero);
        }
        self.with_value(self.value() / divisor)
    }

    /// Dimensionless ratio `self / other`.
    ///
    /// # Errors
    ///
    /// Unit mismatch, or [`GeometryError::DivisionByZero`] when `other` is zero.
    fn per(&self, other: &Self) -> Result<f64, GeometryError> {
        self.check_unit(other)?;
        if other.value() == 0.0 {
            return Err(GeometryError::DivisionByZero);
        }
        Ok(self.value() / other.value())
    }

    /// Numeric ordering; `-0` and `+0` compare equal.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnitMismatch`] for different units.
    fn compare(&self, other: &Self) -> Result<Ordering, GeometryError> {
        self.check_unit(other)?;
        // Adding +0 folds -0 into +0; values are finite so this is total.
        Ok((self.value() + 0.0).total_cmp(&(other.value() + 0.0)))
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::UnitMismatch`] for different units.
    fn is_greater_than(&self, other: &Self) -> Result<bool, GeometryError> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::UnitMismatch`] for different units.
    fn is_less_than(&self, other: &Self) -> Result<bool, GeometryError> {
        Ok(self.compare(other)? == Ordering::Less)
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::UnitMismatch`] for different units.
    fn equals(&self, other: &Self) -> Result<bool, GeometryError> {
        Ok(self.compare(other)? == Ordering::Equal)
    }
}

/// Length units understood by [`Length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// CSS pixels.
    Px,
    /// Percent of the context's percent basis.
    Percent,
    /// Percent of the viewport width.
    Vw,
    /// Percent of the viewport height.
    Vh,
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Px => "px",
            Self::Percent => "%",
            Self::Vw => "vw",
            Self::Vh => "vh",
        })
    }
}

/// A pixel length.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct Px(f64);

impl Px {
    pub const ZERO: Self = Self(0.0);

    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for NaN or infinities.
    pub fn new(value: f64) -> Result<Self, GeometryError> {
        Ok(Self(finite(value)?))
    }

    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

impl UnitScalar for Px {
    type Unit = LengthUnit;

    fn value(&self) -> f64 {
        self.0
    }

    fn unit(&self) -> LengthUnit {
        LengthUnit::Px
    }

    fn with_value(&self, value: f64) -> Result<Self, GeometryError> {
        Self::new(value)
    }
}

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

/// Reference sizes needed to turn relative lengths into pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceContext {
    /// Viewport width in pixels (basis for `vw`).
    pub viewport_width: f64,
    /// Viewport height in pixels (basis for `vh`).
    pub viewport_height: f64,
    /// Pixel size that `100%` resolves to, usually the parent's extent on the same axis.
    pub percent_basis: f64,
}

impl ReferenceContext {
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] if any size is not finite.
    pub fn new(viewport_width: f64, viewport_height: f64, percent_basis: f64) -> Result<Self, GeometryError> {
        Ok(Self {
            viewport_width: finite(viewport_width)?,
            viewport_height: finite(viewport_height)?,
            percent_basis: finite(percent_basis)?,
        })
    }

    /// Pixels represented by one whole unit of `unit`.
    fn pixels_per(&self, unit: LengthUnit) -> f64 {
        match unit {
            LengthUnit::Px => 1.0,
            LengthUnit::Percent => self.percent_basis / 100.0,
            LengthUnit::Vw => self.viewport_width / 100.0,
            LengthUnit::Vh => self.viewport_height / 100.0,
        }
    }
}

/// A length whose unit is known only at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    value: f64,
    unit: LengthUnit,
}

impl Length {
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for NaN or infinities.
    pub fn new(value: f64, unit: LengthUnit) -> Result<Self, GeometryError> {
        Ok(Self { value: finite(value)?, unit })
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for NaN or infinities.
    pub fn px(value: f64) -> Result<Self, GeometryError> {
        Self::new(value, LengthUnit::Px)
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for NaN or infinities.
    pub fn percent(value: f64) -> Result<Self, GeometryError> {
        Self::new(value, LengthUnit::Percent)
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for NaN or infinities.
    pub fn vw(value: f64) -> Result<Self, GeometryError> {
        Self::new(value, LengthUnit::Vw)
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for NaN or infinities.
    pub fn vh(value: f64) -> Result<Self, GeometryError> {
        Self::new(value, LengthUnit::Vh)
    }

    /// Resolve to pixels against `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] if the product overflows.
    pub fn to_px(&self, ctx: &ReferenceContext) -> Result<Px, GeometryError> {
        Px::new(self.value * ctx.pixels_per(self.unit))
    }

    /// Re-express this length in `unit`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DivisionByZero`] when the target unit's basis
    /// in `ctx` is zero (e.g. converting to `vw` on a zero-width viewport).
    pub fn convert(&self, unit: LengthUnit, ctx: &ReferenceContext) -> Result<Self, GeometryError> {
        if unit == self.unit {
            return Ok(*self);
        }
        let px = self.to_px(ctx)?;
        let per = ctx.pixels_per(unit);
        if per == 0.0 {
            return Err(GeometryError::DivisionByZero);
        }
        Self::new(px.get() / per, unit)
    }
}

impl UnitScalar for Length {
    type Unit = LengthUnit;

    fn value(&self) -> f64 {
        self.value
    }

    fn unit(&self) -> LengthUnit {
        self.unit
    }

    fn with_value(&self, value: f64) -> Result<Self, GeometryError> {
        Self::new(value, self.unit)
    }
}

impl From<Px> for Length {
    fn from(px: Px) -> Self {
        Self { value: px.get(), unit: LengthUnit::Px }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}
