#![warn(missing_docs)]
//! Rectangular bounds of the visible scene.
//!
//! Traced light rays are truncated at the scene bounds. Emergent rays are extended until they leave the bounds.
use crate::{
    centimeter,
    error::{OpticsError, OpticsResult},
    utils::geometry::{ensure_finite_point, to_cm},
};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

/// Axis-aligned rectangle of the visible scene in model coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBounds {
    min: Point2<Length>,
    max: Point2<Length>,
}
impl Default for SceneBounds {
    /// The default bounds cover 1000 cm x 500 cm centered at the origin.
    fn default() -> Self {
        Self {
            min: centimeter!(-500.0, -250.0),
            max: centimeter!(500.0, 250.0),
        }
    }
}
impl SceneBounds {
    /// Create new [`SceneBounds`] from the lower left and the upper right corner.
    ///
    /// # Errors
    ///
    /// This function will return an error if a corner is not finite or the rectangle has a zero or negative extent.
    pub fn new(min: Point2<Length>, max: Point2<Length>) -> OpticsResult<Self> {
        ensure_finite_point(&min, "lower scene bound")?;
        ensure_finite_point(&max, "upper scene bound")?;
        if min.x >= max.x || min.y >= max.y {
            return Err(OpticsError::InvalidParameter(
                "scene bounds must have a positive width and height".into(),
            ));
        }
        Ok(Self { min, max })
    }
    /// Returns the lower left corner.
    #[must_use]
    pub fn min(&self) -> Point2<Length> {
        self.min
    }
    /// Returns the upper right corner.
    #[must_use]
    pub fn max(&self) -> Point2<Length> {
        self.max
    }
    /// Check if a point lies inside (or on the border of) the bounds.
    #[must_use]
    pub fn contains(&self, point: &Point2<Length>) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }
    /// Clip a line segment (in cm) to the bounds (Liang-Barsky).
    ///
    /// Returns `None` if the segment lies completely outside.
    pub(crate) fn clip_segment(
        &self,
        start: &Point2<f64>,
        end: &Point2<f64>,
    ) -> Option<(Point2<f64>, Point2<f64>)> {
        let dir = end - start;
        let (t_enter, t_exit) = self.parameter_range(start, &dir, 0.0, 1.0)?;
        Some((start + dir * t_enter, start + dir * t_exit))
    }
    /// Returns the point (in cm) where a ray starting at `origin` with direction `dir` leaves the bounds.
    ///
    /// Returns `None` if the ray never passes through the bounds in forward direction.
    pub(crate) fn ray_exit(&self, origin: &Point2<f64>, dir: &Vector2<f64>) -> Option<Point2<f64>> {
        let (_, t_exit) = self.parameter_range(origin, dir, 0.0, f64::INFINITY)?;
        if t_exit.is_finite() && t_exit > 0.0 {
            Some(origin + dir * t_exit)
        } else {
            None
        }
    }
    fn parameter_range(
        &self,
        origin: &Point2<f64>,
        dir: &Vector2<f64>,
        mut t_enter: f64,
        mut t_exit: f64,
    ) -> Option<(f64, f64)> {
        let min = to_cm(&self.min);
        let max = to_cm(&self.max);
        for (p, d, lo, hi) in [
            (origin.x, dir.x, min.x, max.x),
            (origin.y, dir.y, min.y, max.y),
        ] {
            if d == 0.0 {
                if p < lo || p > hi {
                    return None;
                }
                continue;
            }
            let (t0, t1) = {
                let a = (lo - p) / d;
                let b = (hi - p) / d;
                if a < b {
                    (a, b)
                } else {
                    (b, a)
                }
            };
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }
        Some((t_enter, t_exit))
    }
}
