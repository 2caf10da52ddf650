#![warn(missing_docs)]
//! Light emitting (or reflecting) objects placed in front of an optic.
//!
//! Two kinds of objects exist:
//!   - a point object emitting light from its position
//!   - an arrow object standing on its base point. Its tip is located at `position + (0, magnitude)` and
//!     light is traced from the tip.
use crate::{
    centimeter,
    error::{OpticsError, OpticsResult},
    utils::geometry::ensure_finite_point,
};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::centimeter};

/// Minimum magnitude (height) of an arrow object in cm.
pub const MIN_ARROW_MAGNITUDE: f64 = 20.0;

/// The kind of an [`OpticalObject`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    /// a point-like light source
    Point,
    /// an upright (positive magnitude) or hanging (negative magnitude) arrow
    Arrow {
        /// signed height of the arrow tip above its base
        magnitude: Length,
    },
}

/// An optical object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpticalObject {
    position: Point2<Length>,
    kind: ObjectKind,
    #[serde(default = "default_visible")]
    visible: bool,
}
const fn default_visible() -> bool {
    true
}
impl OpticalObject {
    /// Creates a new point object at the given position.
    ///
    /// # Errors
    ///
    /// This function will return an error if the position is not finite.
    pub fn new_point(position: Point2<Length>) -> OpticsResult<Self> {
        ensure_finite_point(&position, "object position")?;
        Ok(Self {
            position,
            kind: ObjectKind::Point,
            visible: true,
        })
    }
    /// Creates a new arrow object standing on the given base point.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the position is not finite.
    ///   - the magnitude is not finite or its absolute value is below [`MIN_ARROW_MAGNITUDE`].
    pub fn new_arrow(position: Point2<Length>, magnitude: Length) -> OpticsResult<Self> {
        ensure_finite_point(&position, "object position")?;
        check_arrow_magnitude(magnitude)?;
        Ok(Self {
            position,
            kind: ObjectKind::Arrow { magnitude },
            visible: true,
        })
    }
    /// Returns the position of this [`OpticalObject`] (the base point of an arrow).
    #[must_use]
    pub fn position(&self) -> Point2<Length> {
        self.position
    }
    /// Sets the position of this [`OpticalObject`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the position is not finite.
    pub fn set_position(&mut self, position: Point2<Length>) -> OpticsResult<()> {
        ensure_finite_point(&position, "object position")?;
        self.position = position;
        Ok(())
    }
    /// Returns the [`ObjectKind`] of this [`OpticalObject`].
    #[must_use]
    pub const fn kind(&self) -> &ObjectKind {
        &self.kind
    }
    /// Returns the magnitude of an arrow object or `None` for a point object.
    #[must_use]
    pub fn magnitude(&self) -> Option<Length> {
        match self.kind {
            ObjectKind::Point => None,
            ObjectKind::Arrow { magnitude } => Some(magnitude),
        }
    }
    /// Sets the magnitude of an arrow object.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - this object is not an arrow.
    ///   - the magnitude is not finite or its absolute value is below [`MIN_ARROW_MAGNITUDE`].
    pub fn set_magnitude(&mut self, new_magnitude: Length) -> OpticsResult<()> {
        let ObjectKind::Arrow { magnitude } = &mut self.kind else {
            return Err(OpticsError::UnsupportedOperation(
                "only arrow objects have a magnitude".into(),
            ));
        };
        check_arrow_magnitude(new_magnitude)?;
        *magnitude = new_magnitude;
        Ok(())
    }
    /// Returns the point from which the light rays of this object are traced.
    ///
    /// This is the tip of an arrow or the position of a point object.
    #[must_use]
    pub fn emission_point(&self) -> Point2<Length> {
        match self.kind {
            ObjectKind::Point => self.position,
            ObjectKind::Arrow { magnitude } => {
                Point2::new(self.position.x, self.position.y + magnitude)
            }
        }
    }
    /// Returns `true` if this object is currently shown in the scene.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }
    /// Show or hide this object.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
fn check_arrow_magnitude(magnitude: Length) -> OpticsResult<()> {
    if !magnitude.is_finite() || magnitude.abs() < centimeter!(MIN_ARROW_MAGNITUDE) {
        return Err(OpticsError::InvalidParameter(format!(
            "arrow magnitude must be finite and its absolute value >= {MIN_ARROW_MAGNITUDE} cm, got {} cm",
            magnitude.get::<centimeter>()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn new_point() {
        let object = OpticalObject::new_point(centimeter!(-50.0, 10.0)).unwrap();
        assert_eq!(object.position(), centimeter!(-50.0, 10.0));
        assert_eq!(object.emission_point(), centimeter!(-50.0, 10.0));
        assert_eq!(object.magnitude(), None);
        assert_eq!(object.kind(), &ObjectKind::Point);
        assert!(object.is_visible());
        assert!(OpticalObject::new_point(centimeter!(f64::NAN, 0.0)).is_err());
    }
    #[test]
    fn new_arrow() {
        let object = OpticalObject::new_arrow(centimeter!(-50.0, 0.0), centimeter!(25.0)).unwrap();
        assert_eq!(object.magnitude(), Some(centimeter!(25.0)));
        assert_eq!(object.emission_point(), centimeter!(-50.0, 25.0));
        let hanging =
            OpticalObject::new_arrow(centimeter!(-50.0, 0.0), centimeter!(-20.0)).unwrap();
        assert_eq!(hanging.emission_point(), centimeter!(-50.0, -20.0));

        assert_matches!(
            OpticalObject::new_arrow(centimeter!(-50.0, 0.0), centimeter!(19.9)),
            Err(OpticsError::InvalidParameter(_))
        );
        assert!(OpticalObject::new_arrow(centimeter!(-50.0, 0.0), centimeter!(-19.9)).is_err());
        assert!(OpticalObject::new_arrow(centimeter!(-50.0, 0.0), centimeter!(f64::NAN)).is_err());
        assert!(
            OpticalObject::new_arrow(centimeter!(-50.0, 0.0), centimeter!(f64::INFINITY)).is_err()
        );
        assert!(
            OpticalObject::new_arrow(centimeter!(-50.0, f64::NAN), centimeter!(30.0)).is_err()
        );
    }
    #[test]
    fn set_magnitude() {
        let mut object =
            OpticalObject::new_arrow(centimeter!(-50.0, 0.0), centimeter!(25.0)).unwrap();
        assert!(object.set_magnitude(centimeter!(5.0)).is_err());
        assert_eq!(object.magnitude(), Some(centimeter!(25.0)));
        object.set_magnitude(centimeter!(40.0)).unwrap();
        assert_eq!(object.magnitude(), Some(centimeter!(40.0)));

        let mut point = OpticalObject::new_point(centimeter!(-50.0, 0.0)).unwrap();
        assert_matches!(
            point.set_magnitude(centimeter!(40.0)),
            Err(OpticsError::UnsupportedOperation(_))
        );
    }
    #[test]
    fn set_position() {
        let mut object = OpticalObject::new_point(centimeter!(-50.0, 0.0)).unwrap();
        assert!(object.set_position(centimeter!(f64::INFINITY, 0.0)).is_err());
        assert_eq!(object.position(), centimeter!(-50.0, 0.0));
        object.set_position(centimeter!(-30.0, 5.0)).unwrap();
        assert_eq!(object.position(), centimeter!(-30.0, 5.0));
    }
    #[test]
    fn visibility() {
        let mut object = OpticalObject::new_point(centimeter!(-50.0, 0.0)).unwrap();
        object.set_visible(false);
        assert!(!object.is_visible());
    }
}
