#![warn(missing_docs)]
//! Guide arms at the edges of a lens.
//!
//! A guide is a pair of rays pivoting around a fulcrum at the top or bottom edge of the lens. The incident arm points
//! towards the emission point of the object, the transmitted arm follows the refracted ray behind the lens.
use crate::{
    error::{OpticsError, OpticsResult},
    optic::{Optic, OpticType},
    optical_object::OpticalObject,
    utils::{geometry::to_cm, normalize_angle},
};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

/// A single guide located at one edge of a lens.
///
/// All angles are given in radians measured counter-clockwise from the +x axis and normalized to `(-π, π]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    fulcrum: Point2<Length>,
    incident_angle: f64,
    transmitted_angle: f64,
}
impl Guide {
    /// Returns the pivot point of this [`Guide`].
    #[must_use]
    pub fn fulcrum(&self) -> Point2<Length> {
        self.fulcrum
    }
    /// Returns the direction angle from the fulcrum towards the object's emission point.
    #[must_use]
    pub const fn incident_angle(&self) -> f64 {
        self.incident_angle
    }
    /// Returns the direction angle of the refracted ray leaving the fulcrum.
    #[must_use]
    pub const fn transmitted_angle(&self) -> f64 {
        self.transmitted_angle
    }
}
/// The guides at the top and bottom edge of a lens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guides {
    top: Guide,
    bottom: Guide,
}
impl Guides {
    /// Returns the [`Guide`] at the top edge.
    #[must_use]
    pub const fn top(&self) -> &Guide {
        &self.top
    }
    /// Returns the [`Guide`] at the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> &Guide {
        &self.bottom
    }
}
/// Calculate the [`Guides`] of a lens for the given [`OpticalObject`].
///
/// # Errors
///
/// This function will return an [`OpticsError::UnsupportedOperation`] if the optic is a mirror.
pub fn compute_guides(object: &OpticalObject, optic: &Optic) -> OpticsResult<Guides> {
    if optic.optic_type() == OpticType::Mirror {
        return Err(OpticsError::UnsupportedOperation(
            "guides are only available for lenses".into(),
        ));
    }
    Ok(Guides {
        top: guide_at(object, optic, optic.top_edge()),
        bottom: guide_at(object, optic, optic.bottom_edge()),
    })
}
fn guide_at(object: &OpticalObject, optic: &Optic, fulcrum: Point2<Length>) -> Guide {
    let emission = to_cm(&object.emission_point());
    let pivot = to_cm(&fulcrum);
    let center = to_cm(&optic.position());
    let to_object = emission - pivot;
    let object_distance = center.x - emission.x;
    let transmitted = if object_distance > 0.0 {
        let incident_slope = (pivot.y - emission.y) / object_distance;
        Vector2::new(
            1.0,
            (pivot.y - center.y).mul_add(-optic.optical_power(), incident_slope),
        )
    } else {
        -to_object
    };
    Guide {
        fulcrum,
        incident_angle: direction_angle(&to_object),
        transmitted_angle: direction_angle(&transmitted),
    }
}
fn direction_angle(direction: &Vector2<f64>) -> f64 {
    normalize_angle(direction.y.atan2(direction.x))
}
