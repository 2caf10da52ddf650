#![warn(missing_docs)]
//! The optic (lens or mirror) of a scene.
//!
//! An [`Optic`] is a thin lens or a thin mirror located at a given position. Its optical axis is the horizontal
//! line through this position and light always propagates from left (-x) to right (+x) towards the optic.
//!
//! Curvature / sign convention of the focal length:
//! - convex lens: positive (converging)
//! - concave lens: negative (diverging)
//! - concave mirror: positive (converging)
//! - convex mirror: negative (diverging)
//! - flat optic: no focal length (zero optical power)
use crate::{
    centimeter,
    error::{OpticsError, OpticsResult},
    focal_length::FocalLengthModel,
    utils::geometry::{ensure_finite_point, ensure_positive_length},
};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uom::si::{f64::Length, length::centimeter};

mod outline;
pub use outline::OpticOutline;

/// The surface shape of an [`Optic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
pub enum OpticShape {
    /// converging lens or diverging mirror
    Convex,
    /// diverging lens or converging mirror
    Concave,
    /// plane surface without optical power
    Flat,
}
/// The kind of an [`Optic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
pub enum OpticType {
    /// transmitting thin lens
    Lens,
    /// reflecting thin mirror
    Mirror,
}
impl OpticType {
    /// Returns the x direction (+1.0 or -1.0) of the light after interacting with the optic.
    #[must_use]
    pub const fn propagation_direction(self) -> f64 {
        match self {
            Self::Lens => 1.0,
            Self::Mirror => -1.0,
        }
    }
}

/// A thin lens or mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Optic {
    optic_type: OpticType,
    shape: OpticShape,
    diameter: Length,
    position: Point2<Length>,
    focal_length_model: FocalLengthModel,
}
impl Default for Optic {
    /// Create a convex lens with a focal length of 80 cm and a diameter of 80 cm located at the origin.
    fn default() -> Self {
        Self {
            optic_type: OpticType::Lens,
            shape: OpticShape::Convex,
            diameter: centimeter!(80.0),
            position: centimeter!(0.0, 0.0),
            focal_length_model: FocalLengthModel::default(),
        }
    }
}
impl Optic {
    /// Creates a new [`Optic`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the diameter is <= 0.0 or not finite.
    ///   - the position is not finite.
    ///   - the focal length model was created for a different [`OpticType`].
    pub fn new(
        optic_type: OpticType,
        shape: OpticShape,
        diameter: Length,
        position: Point2<Length>,
        focal_length_model: FocalLengthModel,
    ) -> OpticsResult<Self> {
        ensure_positive_length(diameter, "diameter")?;
        ensure_finite_point(&position, "optic position")?;
        if focal_length_model.optic_type() != optic_type {
            return Err(OpticsError::InvalidParameter(format!(
                "focal length model of a {} cannot be used for a {optic_type}",
                focal_length_model.optic_type()
            )));
        }
        Ok(Self {
            optic_type,
            shape,
            diameter,
            position,
            focal_length_model,
        })
    }
    /// Creates a new lens with a directly controlled focal length located at the origin.
    ///
    /// # Errors
    ///
    /// This function will return an error if the focal length or the diameter is <= 0.0 or not finite.
    pub fn new_lens(shape: OpticShape, focal_length: Length, diameter: Length) -> OpticsResult<Self> {
        let model = FocalLengthModel::new_direct(OpticType::Lens, focal_length)?;
        Self::new(
            OpticType::Lens,
            shape,
            diameter,
            centimeter!(0.0, 0.0),
            model,
        )
    }
    /// Creates a new mirror with a directly controlled focal length located at the origin.
    ///
    /// # Errors
    ///
    /// This function will return an error if the focal length or the diameter is <= 0.0 or not finite.
    pub fn new_mirror(
        shape: OpticShape,
        focal_length: Length,
        diameter: Length,
    ) -> OpticsResult<Self> {
        let model = FocalLengthModel::new_direct(OpticType::Mirror, focal_length)?;
        Self::new(
            OpticType::Mirror,
            shape,
            diameter,
            centimeter!(0.0, 0.0),
            model,
        )
    }
    /// Modifies the position of an [`Optic`]. This function can be used with the "builder pattern".
    ///
    /// # Errors
    ///
    /// This function will return an error if the position is not finite.
    pub fn with_position(mut self, position: Point2<Length>) -> OpticsResult<Self> {
        self.set_position(position)?;
        Ok(self)
    }
    /// Returns the [`OpticType`] of this [`Optic`].
    #[must_use]
    pub const fn optic_type(&self) -> OpticType {
        self.optic_type
    }
    /// Returns the [`OpticShape`] of this [`Optic`].
    #[must_use]
    pub const fn shape(&self) -> OpticShape {
        self.shape
    }
    /// Returns the diameter (aperture) of this [`Optic`].
    #[must_use]
    pub fn diameter(&self) -> Length {
        self.diameter
    }
    /// Sets the diameter of this [`Optic`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the diameter is <= 0.0 or not finite.
    pub fn set_diameter(&mut self, diameter: Length) -> OpticsResult<()> {
        ensure_positive_length(diameter, "diameter")?;
        self.diameter = diameter;
        Ok(())
    }
    /// Returns the position (center) of this [`Optic`].
    #[must_use]
    pub fn position(&self) -> Point2<Length> {
        self.position
    }
    /// Sets the position of this [`Optic`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the position is not finite.
    pub fn set_position(&mut self, position: Point2<Length>) -> OpticsResult<()> {
        ensure_finite_point(&position, "optic position")?;
        self.position = position;
        Ok(())
    }
    /// Returns a reference to the [`FocalLengthModel`] of this [`Optic`].
    #[must_use]
    pub const fn focal_length_model(&self) -> &FocalLengthModel {
        &self.focal_length_model
    }
    /// Returns a mutable reference to the [`FocalLengthModel`] of this [`Optic`].
    ///
    /// All setters of the model validate their input, so the optic can never reach an invalid state.
    pub fn focal_length_model_mut(&mut self) -> &mut FocalLengthModel {
        &mut self.focal_length_model
    }
    /// Returns the sign of the focal length (+1.0 converging, -1.0 diverging, 0.0 flat).
    #[must_use]
    pub const fn curvature_sign(&self) -> f64 {
        match (self.optic_type, self.shape) {
            (_, OpticShape::Flat) => 0.0,
            (OpticType::Lens, OpticShape::Convex) | (OpticType::Mirror, OpticShape::Concave) => 1.0,
            (OpticType::Lens, OpticShape::Concave) | (OpticType::Mirror, OpticShape::Convex) => {
                -1.0
            }
        }
    }
    /// Returns the signed focal length of this [`Optic`].
    ///
    /// A flat optic has no (an infinite) focal length and returns `None`.
    #[must_use]
    pub fn signed_focal_length(&self) -> Option<Length> {
        if self.shape == OpticShape::Flat {
            None
        } else {
            Some(self.focal_length_model.focal_length_magnitude() * self.curvature_sign())
        }
    }
    /// Returns the optical power (in 1/cm) of this [`Optic`]. A flat optic has zero optical power.
    #[must_use]
    pub fn optical_power(&self) -> f64 {
        self.signed_focal_length()
            .map_or(0.0, |f| 1.0 / f.get::<centimeter>())
    }
    /// Returns the two focal points (left, right) of this [`Optic`] on its optical axis.
    ///
    /// A flat optic returns `None`.
    #[must_use]
    pub fn focal_points(&self) -> Option<(Point2<Length>, Point2<Length>)> {
        self.axis_points(1.0)
    }
    /// Returns the two "2F" points (left, right) at twice the focal length on the optical axis.
    ///
    /// A flat optic returns `None`.
    #[must_use]
    pub fn two_f_points(&self) -> Option<(Point2<Length>, Point2<Length>)> {
        self.axis_points(2.0)
    }
    fn axis_points(&self, multiple: f64) -> Option<(Point2<Length>, Point2<Length>)> {
        self.signed_focal_length().map(|f| {
            let offset = f.abs() * multiple;
            (
                Point2::new(self.position.x - offset, self.position.y),
                Point2::new(self.position.x + offset, self.position.y),
            )
        })
    }
    /// Returns the top edge point of the aperture.
    #[must_use]
    pub fn top_edge(&self) -> Point2<Length> {
        Point2::new(self.position.x, self.position.y + self.diameter / 2.0)
    }
    /// Returns the bottom edge point of the aperture.
    #[must_use]
    pub fn bottom_edge(&self) -> Point2<Length> {
        Point2::new(self.position.x, self.position.y - self.diameter / 2.0)
    }
    /// Check if a given height (y coordinate in the optic plane) lies within the aperture `[-D/2, D/2]`.
    ///
    /// The aperture edges are part of the aperture.
    #[must_use]
    pub fn is_within_aperture(&self, height: Length) -> bool {
        let offset = (height - self.position.y).get::<centimeter>().abs();
        let diameter = self.diameter.get::<centimeter>();
        offset <= APERTURE_TOLERANCE.mul_add(diameter, diameter / 2.0)
    }
    /// Returns the outline of this [`Optic`] for hit-testing.
    ///
    /// The outline is rebuilt from the current parameters on every call.
    ///
    /// # Errors
    ///
    /// This function will return an error if the outline cannot be represented with finite coordinates.
    pub fn outline(&self) -> OpticsResult<OpticOutline> {
        OpticOutline::for_optic(self)
    }
    /// Check if the given point hits the optic's outline.
    ///
    /// Returns `false` if the outline cannot be built.
    #[must_use]
    pub fn contains_point(&self, point: &Point2<Length>) -> bool {
        self.outline().is_ok_and(|outline| outline.contains(point))
    }
}
/// relative tolerance of the aperture edge test
const APERTURE_TOLERANCE: f64 = 1e-9;
