//! Conversion helpers between unit-aware scene points and plain centimeter coordinates.
//!
//! All geometric calculations of the engine are performed on plain `f64` values in centimeter.
//! The public API uses [`Length`] based points only.
use crate::{
    centimeter,
    error::{OpticsError, OpticsResult},
};
use nalgebra::Point2;
use uom::si::{f64::Length, length::centimeter};

/// Convert a scene point into plain centimeter coordinates.
#[must_use]
pub fn to_cm(point: &Point2<Length>) -> Point2<f64> {
    Point2::new(point.x.get::<centimeter>(), point.y.get::<centimeter>())
}
/// Convert plain centimeter coordinates into a scene point.
#[must_use]
pub fn from_cm(point: &Point2<f64>) -> Point2<Length> {
    centimeter!(point.x, point.y)
}
/// Returns `true` if both coordinates of the given point are finite.
#[must_use]
pub fn is_finite_point(point: &Point2<Length>) -> bool {
    point.x.is_finite() && point.y.is_finite()
}
/// Check that a point has finite coordinates.
///
/// # Errors
///
/// This function returns an [`OpticsError::InvalidParameter`] naming `what` if a coordinate is `NaN` or infinite.
pub fn ensure_finite_point(point: &Point2<Length>, what: &str) -> OpticsResult<()> {
    if is_finite_point(point) {
        Ok(())
    } else {
        Err(OpticsError::InvalidParameter(format!(
            "{what} must have finite coordinates"
        )))
    }
}
/// Check that a length is strictly positive and finite.
///
/// # Errors
///
/// This function returns an [`OpticsError::InvalidParameter`] naming `what` if the value is zero, negative, `NaN` or infinite.
pub fn ensure_positive_length(value: Length, what: &str) -> OpticsResult<()> {
    if value.is_normal() && value.is_sign_positive() {
        Ok(())
    } else {
        Err(OpticsError::InvalidParameter(format!(
            "{what} must be > 0 and finite"
        )))
    }
}
