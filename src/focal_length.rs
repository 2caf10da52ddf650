#![warn(missing_docs)]
//! Focal length models of an [`Optic`](crate::optic::Optic).
//!
//! The focal length of an optic can either be set directly (a simple focal length magnitude) or indirectly by its
//! physical parameters, the radius of curvature and (for lenses) the index of refraction of the lens material:
//!
//! - lens: `f = R / (2 (n - 1))` (lensmaker's equation of a symmetric thin lens)
//! - mirror: `f = R / 2`
//!
//! Switching between both modes preserves the focal length magnitude.
//! ```rust
//! use geolens::{centimeter, focal_length::{FocalLengthControlType, FocalLengthModel}, optic::OpticType};
//!
//! let mut model = FocalLengthModel::new_direct(OpticType::Lens, centimeter!(20.0)).unwrap();
//! model.set_control_type(FocalLengthControlType::Indirect).unwrap();
//! assert!((model.radius_of_curvature().unwrap().value - 0.2).abs() < 1e-12);
//! ```
use crate::{
    centimeter,
    error::{OpticsError, OpticsResult},
    optic::OpticType,
    utils::geometry::ensure_positive_length,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uom::si::f64::Length;

/// Default index of refraction of a lens material (crown glass).
pub const DEFAULT_INDEX_OF_REFRACTION: f64 = 1.5;

/// The way the focal length of an optic is controlled.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum FocalLengthControlType {
    /// the focal length magnitude is set directly
    #[default]
    Direct,
    /// the focal length is derived from radius of curvature and index of refraction
    Indirect,
}

/// Focal length model of a lens or mirror.
///
/// The model always stores the parameters of both control types. Only the parameters of the active
/// [`FocalLengthControlType`] determine the focal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocalLengthModel {
    optic_type: OpticType,
    control_type: FocalLengthControlType,
    focal_length: Length,
    radius_of_curvature: Length,
    index_of_refraction: f64,
}
impl Default for FocalLengthModel {
    /// Lens model with a directly controlled focal length of 80 cm.
    fn default() -> Self {
        Self {
            optic_type: OpticType::Lens,
            control_type: FocalLengthControlType::Direct,
            focal_length: centimeter!(80.0),
            radius_of_curvature: centimeter!(80.0),
            index_of_refraction: DEFAULT_INDEX_OF_REFRACTION,
        }
    }
}
impl FocalLengthModel {
    /// Creates a new [`FocalLengthModel`] with a directly controlled focal length.
    ///
    /// The indirect parameters are initialized such that they yield the same focal length (using the
    /// [`DEFAULT_INDEX_OF_REFRACTION`] for lenses).
    ///
    /// # Errors
    ///
    /// This function will return an error if the given focal length magnitude or the derived radius of curvature is
    /// <= 0.0 or not finite.
    pub fn new_direct(optic_type: OpticType, focal_length: Length) -> OpticsResult<Self> {
        ensure_positive_length(focal_length, "focal length")?;
        let index_of_refraction = DEFAULT_INDEX_OF_REFRACTION;
        Ok(Self {
            optic_type,
            control_type: FocalLengthControlType::Direct,
            focal_length,
            radius_of_curvature: checked_radius(optic_type, focal_length, index_of_refraction)?,
            index_of_refraction,
        })
    }
    /// Creates a new [`FocalLengthModel`] controlled by the given radius of curvature.
    ///
    /// Lenses use the [`DEFAULT_INDEX_OF_REFRACTION`]. A different value can be set using
    /// [`with_index_of_refraction`](Self::with_index_of_refraction).
    ///
    /// # Errors
    ///
    /// This function will return an error if the given radius of curvature or the derived focal length is <= 0.0 or
    /// not finite.
    pub fn new_indirect(optic_type: OpticType, radius_of_curvature: Length) -> OpticsResult<Self> {
        ensure_positive_length(radius_of_curvature, "radius of curvature")?;
        let index_of_refraction = DEFAULT_INDEX_OF_REFRACTION;
        Ok(Self {
            optic_type,
            control_type: FocalLengthControlType::Indirect,
            focal_length: checked_focal_length(optic_type, radius_of_curvature, index_of_refraction)?,
            radius_of_curvature,
            index_of_refraction,
        })
    }
    /// Modifies the index of refraction of a lens model. This function can be used with the "builder pattern".
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the index of refraction is <= 1.0 or not finite.
    ///   - the resulting focal length or radius of curvature is not finite.
    ///   - the model belongs to a mirror.
    pub fn with_index_of_refraction(mut self, index_of_refraction: f64) -> OpticsResult<Self> {
        self.set_index_of_refraction(index_of_refraction)?;
        Ok(self)
    }
    /// Returns the optic type this model was created for.
    #[must_use]
    pub const fn optic_type(&self) -> OpticType {
        self.optic_type
    }
    /// Returns the active [`FocalLengthControlType`].
    #[must_use]
    pub const fn control_type(&self) -> FocalLengthControlType {
        self.control_type
    }
    /// Returns the (unsigned) focal length magnitude determined by the active control type.
    #[must_use]
    pub fn focal_length_magnitude(&self) -> Length {
        match self.control_type {
            FocalLengthControlType::Direct => self.focal_length,
            FocalLengthControlType::Indirect => focal_length_from_radius(
                self.optic_type,
                self.radius_of_curvature,
                self.index_of_refraction,
            ),
        }
    }
    /// Returns the radius of curvature magnitude.
    ///
    /// In direct mode this is the radius of curvature which would yield the current focal length with the
    /// stored index of refraction.
    #[must_use]
    pub fn radius_of_curvature(&self) -> Option<Length> {
        match self.control_type {
            FocalLengthControlType::Indirect => Some(self.radius_of_curvature),
            FocalLengthControlType::Direct => Some(radius_from_focal_length(
                self.optic_type,
                self.focal_length,
                self.index_of_refraction,
            )),
        }
    }
    /// Returns the index of refraction of a lens. Mirrors have no index of refraction and return `None`.
    #[must_use]
    pub const fn index_of_refraction(&self) -> Option<f64> {
        match self.optic_type {
            OpticType::Lens => Some(self.index_of_refraction),
            OpticType::Mirror => None,
        }
    }
    /// Sets the focal length magnitude.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the focal length or the derived radius of curvature is <= 0.0 or not finite.
    ///   - the model is not in [`FocalLengthControlType::Direct`] mode.
    pub fn set_focal_length_magnitude(&mut self, focal_length: Length) -> OpticsResult<()> {
        if self.control_type != FocalLengthControlType::Direct {
            return Err(OpticsError::UnsupportedOperation(
                "focal length can only be set in direct mode".into(),
            ));
        }
        ensure_positive_length(focal_length, "focal length")?;
        checked_radius(self.optic_type, focal_length, self.index_of_refraction)?;
        self.focal_length = focal_length;
        Ok(())
    }
    /// Sets the radius of curvature magnitude.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the radius of curvature or the derived focal length is <= 0.0 or not finite.
    ///   - the model is not in [`FocalLengthControlType::Indirect`] mode.
    pub fn set_radius_of_curvature(&mut self, radius_of_curvature: Length) -> OpticsResult<()> {
        if self.control_type != FocalLengthControlType::Indirect {
            return Err(OpticsError::UnsupportedOperation(
                "radius of curvature can only be set in indirect mode".into(),
            ));
        }
        ensure_positive_length(radius_of_curvature, "radius of curvature")?;
        checked_focal_length(self.optic_type, radius_of_curvature, self.index_of_refraction)?;
        self.radius_of_curvature = radius_of_curvature;
        Ok(())
    }
    /// Sets the index of refraction of a lens.
    ///
    /// In direct mode the value is only stored and used when switching to indirect mode.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the index of refraction is <= 1.0 or not finite.
    ///   - the resulting focal length (indirect mode) or radius of curvature (direct mode) is not finite.
    ///   - the model belongs to a mirror.
    pub fn set_index_of_refraction(&mut self, index_of_refraction: f64) -> OpticsResult<()> {
        if self.optic_type == OpticType::Mirror {
            return Err(OpticsError::UnsupportedOperation(
                "a mirror has no index of refraction".into(),
            ));
        }
        if index_of_refraction <= 1.0 || !index_of_refraction.is_finite() {
            return Err(OpticsError::InvalidParameter(
                "index of refraction must be > 1.0 and finite".into(),
            ));
        }
        match self.control_type {
            FocalLengthControlType::Direct => {
                checked_radius(self.optic_type, self.focal_length, index_of_refraction)?;
            }
            FocalLengthControlType::Indirect => {
                checked_focal_length(
                    self.optic_type,
                    self.radius_of_curvature,
                    index_of_refraction,
                )?;
            }
        }
        self.index_of_refraction = index_of_refraction;
        Ok(())
    }
    /// Switch the [`FocalLengthControlType`].
    ///
    /// The parameters of the new control type are synchronized such that the focal length magnitude does
    /// not change.
    ///
    /// # Errors
    ///
    /// This function will return an error if the synchronized parameter is <= 0.0 or not finite. The model is left
    /// unchanged in this case.
    pub fn set_control_type(&mut self, control_type: FocalLengthControlType) -> OpticsResult<()> {
        if control_type == self.control_type {
            return Ok(());
        }
        let focal_length = self.focal_length_magnitude();
        match control_type {
            FocalLengthControlType::Direct => {
                ensure_positive_length(focal_length, "focal length")?;
                self.focal_length = focal_length;
            }
            FocalLengthControlType::Indirect => {
                self.radius_of_curvature =
                    checked_radius(self.optic_type, focal_length, self.index_of_refraction)?;
            }
        }
        self.control_type = control_type;
        Ok(())
    }
}
fn checked_focal_length(
    optic_type: OpticType,
    radius_of_curvature: Length,
    index_of_refraction: f64,
) -> OpticsResult<Length> {
    let focal_length = focal_length_from_radius(optic_type, radius_of_curvature, index_of_refraction);
    ensure_positive_length(focal_length, "derived focal length")?;
    Ok(focal_length)
}
fn checked_radius(
    optic_type: OpticType,
    focal_length: Length,
    index_of_refraction: f64,
) -> OpticsResult<Length> {
    let radius = radius_from_focal_length(optic_type, focal_length, index_of_refraction);
    ensure_positive_length(radius, "derived radius of curvature")?;
    Ok(radius)
}
fn focal_length_from_radius(
    optic_type: OpticType,
    radius_of_curvature: Length,
    index_of_refraction: f64,
) -> Length {
    match optic_type {
        OpticType::Lens => radius_of_curvature / (2.0 * (index_of_refraction - 1.0)),
        OpticType::Mirror => radius_of_curvature / 2.0,
    }
}
fn radius_from_focal_length(
    optic_type: OpticType,
    focal_length: Length,
    index_of_refraction: f64,
) -> Length {
    match optic_type {
        OpticType::Lens => focal_length * (2.0 * (index_of_refraction - 1.0)),
        OpticType::Mirror => focal_length * 2.0,
    }
}
