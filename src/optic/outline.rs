//! Hit-testable outline of an [`Optic`].
use super::{Optic, OpticShape, OpticType};
use crate::{
    error::{OpticsError, OpticsResult},
    utils::{
        geometry::{from_cm, to_cm},
        usize_to_f64,
    },
};
use nalgebra::Point2;
use uom::si::{f64::Length, length::centimeter};

/// number of segments used for approximating a curved surface
const NR_OF_SURFACE_SEGMENTS: usize = 32;
/// thickness of a lens at its thinnest point (in cm)
const LENS_MIN_THICKNESS: f64 = 2.0;
/// thickness of a mirror (in cm)
const MIRROR_THICKNESS: f64 = 2.0;

/// Closed polygon describing the cross section of an [`Optic`].
///
/// The outline is only used for hit-testing and drawing. The optical calculations treat the optic as infinitely thin.
#[derive(Debug, Clone, PartialEq)]
pub struct OpticOutline {
    points: Vec<Point2<f64>>,
}
impl OpticOutline {
    /// Create a new [`OpticOutline`] from a set of 2D points (in cm).
    ///
    /// The order of the points must follow the outline of the polygon.
    ///
    /// # Errors
    ///
    /// This function will return an error if less than three points are given or a point is not finite.
    pub fn new(points: Vec<Point2<f64>>) -> OpticsResult<Self> {
        if points.len() < 3 {
            return Err(OpticsError::InvalidParameter(
                "less than 3 points given".into(),
            ));
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(OpticsError::InvalidParameter(
                "outline points must be finite".into(),
            ));
        }
        Ok(Self { points })
    }
    /// Build the outline of the given [`Optic`].
    ///
    /// The surface sag is derived from the radius of curvature of the optic's focal length model. Very strongly curved
    /// surfaces are flattened such that the sag never exceeds the aperture radius.
    ///
    /// # Errors
    ///
    /// This function will return an error if an outline point is not finite (e.g. for extreme optic dimensions).
    pub fn for_optic(optic: &Optic) -> OpticsResult<Self> {
        let center = to_cm(&optic.position());
        let half_aperture = optic.diameter().get::<centimeter>() / 2.0;
        let radius = optic
            .focal_length_model()
            .radius_of_curvature()
            .map_or(f64::INFINITY, |r| r.get::<centimeter>());
        let sag = Sag::new(radius, half_aperture);
        let heights: Vec<f64> = (0..=NR_OF_SURFACE_SEGMENTS)
            .map(|i| {
                half_aperture
                    - 2.0 * half_aperture * usize_to_f64(i) / usize_to_f64(NR_OF_SURFACE_SEGMENTS)
            })
            .collect();
        // (front, back) surface x offset for a given height
        let surface = |y: f64| -> (f64, f64) {
            match (optic.optic_type(), optic.shape()) {
                (OpticType::Lens, OpticShape::Convex) => {
                    let x = LENS_MIN_THICKNESS / 2.0 + sag.at_edge() - sag.at(y);
                    (-x, x)
                }
                (OpticType::Lens, OpticShape::Concave) => {
                    let x = LENS_MIN_THICKNESS / 2.0 + sag.at(y);
                    (-x, x)
                }
                (OpticType::Lens, OpticShape::Flat) => {
                    (-LENS_MIN_THICKNESS / 2.0, LENS_MIN_THICKNESS / 2.0)
                }
                (OpticType::Mirror, OpticShape::Concave) => {
                    let x = -sag.at(y);
                    (x, x + MIRROR_THICKNESS)
                }
                (OpticType::Mirror, OpticShape::Convex) => {
                    let x = sag.at(y);
                    (x, x + MIRROR_THICKNESS)
                }
                (OpticType::Mirror, OpticShape::Flat) => (0.0, MIRROR_THICKNESS),
            }
        };
        let mut points = Vec::with_capacity(2 * heights.len());
        // back surface from top to bottom, then front surface from bottom to top
        for y in &heights {
            points.push(Point2::new(center.x + surface(*y).1, center.y + y));
        }
        for y in heights.iter().rev() {
            points.push(Point2::new(center.x + surface(*y).0, center.y + y));
        }
        Self::new(points)
    }
    /// Returns the outline points.
    #[must_use]
    pub fn points(&self) -> Vec<Point2<Length>> {
        self.points.iter().map(from_cm).collect()
    }
    /// Check if the given point is inside the outline (even-odd rule).
    #[must_use]
    pub fn contains(&self, point: &Point2<Length>) -> bool {
        let p = to_cm(point);
        let mut inside = false;
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let (pi, pj) = (self.points[i], self.points[j]);
            if (pi.y > p.y) != (pj.y > p.y) {
                let x_cross = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}
/// Parabolic surface sag, flattened if it would exceed the aperture radius.
struct Sag {
    radius: f64,
    scale: f64,
    half_aperture: f64,
}
impl Sag {
    fn new(radius: f64, half_aperture: f64) -> Self {
        let raw_edge_sag = half_aperture * half_aperture / (2.0 * radius);
        let scale = if raw_edge_sag > half_aperture {
            half_aperture / raw_edge_sag
        } else {
            1.0
        };
        Self {
            radius,
            scale,
            half_aperture,
        }
    }
    fn at(&self, y: f64) -> f64 {
        if self.radius.is_infinite() {
            0.0
        } else {
            self.scale * y * y / (2.0 * self.radius)
        }
    }
    fn at_edge(&self) -> f64 {
        self.at(self.half_aperture)
    }
}
