#![warn(missing_docs)]
//! Paraxial ray tracing through a thin lens or mirror.
//!
//! Each traced ray starts at the emission point of an [`OpticalObject`] and hits the optic plane at a given height `h`.
//! The emerging direction follows the paraxial refraction of a thin element:
//! ```text
//! u' = u - (h - y_optic) / f
//! ```
//! where `u` is the slope of the incident ray. A mirror reverses the x component of the direction. Emergent rays are
//! split at a real image point, virtual images get an additional back-extension from the optic to the image point.
use crate::{
    error::{OpticsError, OpticsResult},
    image_formation::{ImageLocation, OpticalImage, FOCAL_PLANE_TOLERANCE},
    light_ray::{LightRay, LightRaySegment, SegmentKind},
    optic::Optic,
    optical_object::OpticalObject,
    scene_bounds::SceneBounds,
    utils::{
        geometry::{from_cm, to_cm},
        usize_to_f64,
    },
};
use log::{debug, warn};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uom::si::{f64::Length, length::centimeter};

/// default number of rays traced in [`RaysMode::Many`]
pub const DEFAULT_MANY_RAYS_COUNT: usize = 21;

/// Selection of the rays traced for each object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
pub enum RaysMode {
    /// two rays hitting the top and bottom edge of the optic
    #[default]
    Marginal,
    /// parallel ray, center ray and focal ray
    Principal,
    /// a configurable number of rays uniformly distributed over the aperture
    Many,
    /// no rays
    None,
}

/// Configuration of a [`RayTracer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RayTracerConfig {
    many_rays_count: usize,
    scene_bounds: SceneBounds,
}
impl Default for RayTracerConfig {
    fn default() -> Self {
        Self {
            many_rays_count: DEFAULT_MANY_RAYS_COUNT,
            scene_bounds: SceneBounds::default(),
        }
    }
}
impl RayTracerConfig {
    /// Creates a new [`RayTracerConfig`].
    ///
    /// # Errors
    ///
    /// This function will return an error if `many_rays_count` is < 2.
    pub fn new(many_rays_count: usize, scene_bounds: SceneBounds) -> OpticsResult<Self> {
        check_rays_count(many_rays_count)?;
        Ok(Self {
            many_rays_count,
            scene_bounds,
        })
    }
    /// Returns the number of rays traced in [`RaysMode::Many`].
    #[must_use]
    pub const fn many_rays_count(&self) -> usize {
        self.many_rays_count
    }
    /// Sets the number of rays traced in [`RaysMode::Many`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the number is < 2.
    pub fn set_many_rays_count(&mut self, many_rays_count: usize) -> OpticsResult<()> {
        check_rays_count(many_rays_count)?;
        self.many_rays_count = many_rays_count;
        Ok(())
    }
    /// Returns the [`SceneBounds`] used for clipping the rays.
    #[must_use]
    pub const fn scene_bounds(&self) -> &SceneBounds {
        &self.scene_bounds
    }
    /// Sets the [`SceneBounds`] used for clipping the rays.
    pub fn set_scene_bounds(&mut self, scene_bounds: SceneBounds) {
        self.scene_bounds = scene_bounds;
    }
}
fn check_rays_count(many_rays_count: usize) -> OpticsResult<()> {
    if many_rays_count < 2 {
        return Err(OpticsError::InvalidParameter(format!(
            "number of rays must be >= 2, got {many_rays_count}"
        )));
    }
    Ok(())
}

/// Tracer generating the [`LightRay`]s of an object / optic pair.
#[derive(Debug, Clone, Default)]
pub struct RayTracer {
    config: RayTracerConfig,
}
impl RayTracer {
    /// Creates a new [`RayTracer`].
    #[must_use]
    pub const fn new(config: RayTracerConfig) -> Self {
        Self { config }
    }
    /// Returns the [`RayTracerConfig`] of this [`RayTracer`].
    #[must_use]
    pub const fn config(&self) -> &RayTracerConfig {
        &self.config
    }
    /// Trace the rays of an [`OpticalObject`] through an [`Optic`].
    ///
    /// The given [`OpticalImage`] must be the image of the object formed by the optic (see
    /// [`compute_image`](crate::image_formation::compute_image)). Rays hitting the optic plane outside its aperture are
    /// omitted and all segments are clipped to the scene bounds. An object not located in front of the optic does
    /// not emit any ray.
    #[must_use]
    pub fn trace_rays(
        &self,
        object: &OpticalObject,
        optic: &Optic,
        image: &OpticalImage,
        mode: RaysMode,
    ) -> Vec<LightRay> {
        let emission = to_cm(&object.emission_point());
        let center = to_cm(&optic.position());
        let object_distance = center.x - emission.x;
        if object_distance <= 0.0 {
            debug!("object not located in front of the optic: no rays traced");
            return Vec::new();
        }
        self.hit_heights(mode, &emission, &center, object_distance, optic)
            .into_iter()
            .filter(|height| optic.is_within_aperture(Length::new::<centimeter>(*height)))
            .filter_map(|height| {
                match self.trace_ray(&emission, &center, height, optic, image) {
                    Ok(ray) => Some(ray),
                    Err(e) => {
                        warn!("ray hitting the optic at height {height} cm dropped: {e}");
                        None
                    }
                }
            })
            .filter(|ray| !ray.is_empty())
            .collect()
    }
    /// Returns the absolute heights (in cm) at which the rays of the given mode hit the optic plane.
    fn hit_heights(
        &self,
        mode: RaysMode,
        emission: &Point2<f64>,
        center: &Point2<f64>,
        object_distance: f64,
        optic: &Optic,
    ) -> Vec<f64> {
        let half_aperture = optic.diameter().get::<centimeter>() / 2.0;
        match mode {
            RaysMode::None => Vec::new(),
            RaysMode::Marginal => vec![center.y + half_aperture, center.y - half_aperture],
            RaysMode::Many => {
                let nr_of_rays = self.config.many_rays_count;
                (0..nr_of_rays)
                    .map(|i| {
                        center.y + half_aperture
                            - 2.0 * half_aperture * usize_to_f64(i) / usize_to_f64(nr_of_rays - 1)
                    })
                    .collect()
            }
            RaysMode::Principal => {
                let mut heights = vec![emission.y, center.y];
                if let Some(focal_length) = optic.signed_focal_length() {
                    let focal_length = focal_length.get::<centimeter>();
                    let distance_to_focus = object_distance - focal_length;
                    if (distance_to_focus / focal_length).abs() > FOCAL_PLANE_TOLERANCE {
                        // aimed at the front focal point
                        heights.push(
                            (center.y - emission.y)
                                .mul_add(object_distance / distance_to_focus, emission.y),
                        );
                    } else {
                        debug!("object located in focal plane: focal ray skipped");
                    }
                }
                heights
            }
        }
    }
    fn trace_ray(
        &self,
        emission: &Point2<f64>,
        center: &Point2<f64>,
        height: f64,
        optic: &Optic,
        image: &OpticalImage,
    ) -> OpticsResult<LightRay> {
        let bounds = &self.config.scene_bounds;
        let hit = Point2::new(center.x, height);
        let incident_slope = (height - emission.y) / (center.x - emission.x);
        let emergent_slope = (height - center.y).mul_add(-optic.optical_power(), incident_slope);
        let direction = Vector2::new(
            optic.optic_type().propagation_direction(),
            emergent_slope,
        );
        let mut ray = LightRay::new();
        add_clipped(&mut ray, bounds, emission, &hit, SegmentKind::Incident)?;
        match image.location() {
            ImageLocation::Finite { position, .. } if image.is_real() => {
                let image_point = to_cm(position);
                add_clipped(&mut ray, bounds, &hit, &image_point, SegmentKind::Emergent)?;
                if let Some(exit) = bounds.ray_exit(&image_point, &direction) {
                    add_clipped(&mut ray, bounds, &image_point, &exit, SegmentKind::Emergent)?;
                }
            }
            ImageLocation::Finite { position, .. } => {
                if let Some(exit) = bounds.ray_exit(&hit, &direction) {
                    add_clipped(&mut ray, bounds, &hit, &exit, SegmentKind::Emergent)?;
                }
                add_clipped(
                    &mut ray,
                    bounds,
                    &hit,
                    &to_cm(position),
                    SegmentKind::VirtualExtension,
                )?;
            }
            ImageLocation::AtInfinity => {
                if let Some(exit) = bounds.ray_exit(&hit, &direction) {
                    add_clipped(&mut ray, bounds, &hit, &exit, SegmentKind::Emergent)?;
                }
            }
        }
        Ok(ray)
    }
}
/// Clip a segment to the scene bounds and append it to the ray. Segments outside the bounds are dropped.
fn add_clipped(
    ray: &mut LightRay,
    bounds: &SceneBounds,
    start: &Point2<f64>,
    end: &Point2<f64>,
    kind: SegmentKind,
) -> OpticsResult<()> {
    if let Some((start, end)) = bounds.clip_segment(start, end) {
        if start != end {
            ray.add_segment(LightRaySegment::new(from_cm(&start), from_cm(&end), kind)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        centimeter, image_formation::compute_image, optic::OpticShape,
        utils::{geometry::is_finite_point, test_helper::test_helper::check_logs},
    };
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    fn lens(shape: OpticShape, focal_length: f64, diameter: f64) -> Optic {
        Optic::new_lens(shape, centimeter!(focal_length), centimeter!(diameter)).unwrap()
    }
    fn trace(object: &OpticalObject, optic: &Optic, mode: RaysMode) -> Vec<LightRay> {
        let image = compute_image(object, optic);
        RayTracer::default().trace_rays(object, optic, &image, mode)
    }
    fn point_at(x: f64, y: f64) -> OpticalObject {
        OpticalObject::new_point(centimeter!(x, y)).unwrap()
    }
    fn assert_point_eq(p: Point2<Length>, x: f64, y: f64) {
        assert_relative_eq!(p.x.get::<centimeter>(), x, epsilon = 1e-9);
        assert_relative_eq!(p.y.get::<centimeter>(), y, epsilon = 1e-9);
    }
    fn is_finite(ray: &LightRay) -> bool {
        ray.segments()
            .iter()
            .all(|s| is_finite_point(&s.start()) && is_finite_point(&s.end()))
    }
    fn slope(segment: &LightRaySegment) -> f64 {
        let d = to_cm(&segment.end()) - to_cm(&segment.start());
        d.y / d.x
    }
    #[test]
    fn config() {
        let config = RayTracerConfig::default();
        assert_eq!(config.many_rays_count(), DEFAULT_MANY_RAYS_COUNT);
        assert_eq!(config.scene_bounds(), &SceneBounds::default());
        assert!(RayTracerConfig::new(1, SceneBounds::default()).is_err());
        assert!(RayTracerConfig::new(0, SceneBounds::default()).is_err());
        let mut config = RayTracerConfig::new(2, SceneBounds::default()).unwrap();
        assert!(config.set_many_rays_count(1).is_err());
        assert_eq!(config.many_rays_count(), 2);
        config.set_many_rays_count(7).unwrap();
        assert_eq!(config.many_rays_count(), 7);
    }
    #[test]
    fn default_mode() {
        assert_eq!(RaysMode::default(), RaysMode::Marginal);
    }
    #[test]
    fn mode_none() {
        assert!(trace(&point_at(-40.0, 10.0), &Optic::default(), RaysMode::None).is_empty());
    }
    #[test]
    fn marginal_rays_real_image() {
        let optic = lens(OpticShape::Convex, 20.0, 40.0);
        let rays = trace(&point_at(-40.0, 10.0), &optic, RaysMode::Marginal);
        assert_eq!(rays.len(), 2);
        for (ray, height) in rays.iter().zip([20.0, -20.0]) {
            assert_eq!(ray.len(), 3);
            let segments = ray.segments();
            assert_eq!(segments[0].kind(), SegmentKind::Incident);
            assert_point_eq(segments[0].start(), -40.0, 10.0);
            assert_point_eq(segments[0].end(), 0.0, height);
            assert_eq!(segments[1].kind(), SegmentKind::Emergent);
            assert_point_eq(segments[1].end(), 40.0, -10.0);
            assert_eq!(segments[2].kind(), SegmentKind::Emergent);
            assert_point_eq(segments[2].start(), 40.0, -10.0);
            assert!(!ray.has_virtual_extension());
        }
    }
    #[test]
    fn continuation_keeps_direction() {
        let optic = lens(OpticShape::Convex, 20.0, 40.0);
        let rays = trace(&point_at(-40.0, 10.0), &optic, RaysMode::Marginal);
        let segments = rays[0].segments();
        assert_relative_eq!(slope(&segments[1]), -0.75, max_relative = 1e-9);
        assert_relative_eq!(slope(&segments[2]), -0.75, max_relative = 1e-9);
    }
    #[test]
    fn virtual_image_extension() {
        let optic = lens(OpticShape::Convex, 20.0, 40.0);
        let rays = trace(&point_at(-10.0, 5.0), &optic, RaysMode::Marginal);
        assert_eq!(rays.len(), 2);
        for ray in &rays {
            assert!(ray.has_virtual_extension());
            let extension = ray
                .segments_of_kind(SegmentKind::VirtualExtension)
                .next()
                .unwrap();
            assert_point_eq(extension.end(), -20.0, 10.0);
            let emergent = ray.segments_of_kind(SegmentKind::Emergent).next().unwrap();
            assert!(emergent.end().x > emergent.start().x);
        }
    }
    #[test]
    fn diverging_lens() {
        let optic = lens(OpticShape::Concave, 20.0, 40.0);
        let rays = trace(&point_at(-20.0, 0.0), &optic, RaysMode::Marginal);
        // image at -10 cm
        for ray in &rays {
            let extension = ray
                .segments_of_kind(SegmentKind::VirtualExtension)
                .next()
                .unwrap();
            assert_point_eq(extension.end(), -10.0, 0.0);
        }
    }
    #[test]
    fn many_rays() {
        let optic = lens(OpticShape::Convex, 20.0, 40.0);
        let object = point_at(-40.0, 10.0);
        let rays = trace(&object, &optic, RaysMode::Many);
        assert_eq!(rays.len(), DEFAULT_MANY_RAYS_COUNT);
        assert_point_eq(rays[0].segments()[0].end(), 0.0, 20.0);
        assert_point_eq(rays[10].segments()[0].end(), 0.0, 0.0);
        assert_point_eq(rays[20].segments()[0].end(), 0.0, -20.0);
        let config = RayTracerConfig::new(5, SceneBounds::default()).unwrap();
        let image = compute_image(&object, &optic);
        let rays = RayTracer::new(config).trace_rays(&object, &optic, &image, RaysMode::Many);
        assert_eq!(rays.len(), 5);
        assert_point_eq(rays[1].segments()[0].end(), 0.0, 10.0);
    }
    #[test]
    fn principal_rays() {
        let optic = lens(OpticShape::Convex, 20.0, 100.0);
        let rays = trace(&point_at(-40.0, 10.0), &optic, RaysMode::Principal);
        assert_eq!(rays.len(), 3);
        // parallel ray: horizontal incident segment, passes through the back focal point
        let parallel = rays[0].segments();
        assert_point_eq(parallel[0].end(), 0.0, 10.0);
        assert_relative_eq!(slope(&parallel[1]), -0.5, max_relative = 1e-9);
        // center ray: undeflected
        let center = rays[1].segments();
        assert_point_eq(center[0].end(), 0.0, 0.0);
        // focal ray: passes the front focal point, leaves the lens parallel to the axis
        let focal = rays[2].segments();
        assert_point_eq(focal[0].end(), 0.0, -10.0);
        assert_relative_eq!(
            focal[1].end().y.get::<centimeter>(),
            focal[1].start().y.get::<centimeter>(),
            epsilon = 1e-9
        );
    }
    #[test]
    fn principal_rays_flat_optic() {
        let optic = lens(OpticShape::Flat, 20.0, 100.0);
        let rays = trace(&point_at(-40.0, 10.0), &optic, RaysMode::Principal);
        assert_eq!(rays.len(), 2);
    }
    #[test]
    fn aperture_clipping() {
        let optic = lens(OpticShape::Convex, 20.0, 40.0);
        let object = point_at(-40.0, 30.0);
        // parallel ray (h = 30) and focal ray (h = -30) miss the lens
        let rays = trace(&object, &optic, RaysMode::Principal);
        assert_eq!(rays.len(), 1);
        assert_point_eq(rays[0].segments()[0].end(), 0.0, 0.0);
        for mode in RaysMode::iter() {
            for ray in trace(&object, &optic, mode) {
                let hit = ray.segments()[0].end();
                assert!(hit.y.get::<centimeter>().abs() <= 20.0 + 1e-9);
            }
        }
    }
    #[test]
    fn object_in_focal_plane() {
        testing_logger::setup();
        let optic = lens(OpticShape::Convex, 20.0, 40.0);
        let object = point_at(-20.0, 10.0);
        let rays = trace(&object, &optic, RaysMode::Principal);
        check_logs(
            log::Level::Debug,
            vec![
                "DegenerateGeometry:object located in focal plane: image placed at infinity",
                "object located in focal plane: focal ray skipped",
            ],
        );
        assert_eq!(rays.len(), 2);
        for ray in &rays {
            assert!(is_finite(ray));
            assert!(!ray.has_virtual_extension());
            let emergent = ray.segments_of_kind(SegmentKind::Emergent).next().unwrap();
            assert_relative_eq!(slope(emergent), -0.5, max_relative = 1e-9);
        }
        for mode in RaysMode::iter() {
            assert!(trace(&object, &optic, mode).iter().all(is_finite));
        }
    }
    #[test]
    fn object_behind_optic() {
        testing_logger::setup();
        let rays = trace(&point_at(10.0, 0.0), &Optic::default(), RaysMode::Many);
        assert!(rays.is_empty());
        check_logs(
            log::Level::Debug,
            vec!["object not located in front of the optic: no rays traced"],
        );
        assert!(trace(&point_at(0.0, 0.0), &Optic::default(), RaysMode::Many).is_empty());
    }
    #[test]
    fn concave_mirror() {
        let optic =
            Optic::new_mirror(OpticShape::Concave, centimeter!(20.0), centimeter!(100.0)).unwrap();
        let rays = trace(&point_at(-60.0, 10.0), &optic, RaysMode::Marginal);
        assert_eq!(rays.len(), 2);
        for ray in &rays {
            let emergent: Vec<_> = ray.segments_of_kind(SegmentKind::Emergent).collect();
            assert_eq!(emergent.len(), 2);
            assert_point_eq(emergent[0].end(), -30.0, -5.0);
            for segment in emergent {
                assert!(segment.end().x < segment.start().x);
            }
        }
    }
    #[test]
    fn flat_mirror() {
        let optic =
            Optic::new_mirror(OpticShape::Flat, centimeter!(20.0), centimeter!(100.0)).unwrap();
        let rays = trace(&point_at(-25.0, 10.0), &optic, RaysMode::Marginal);
        for ray in &rays {
            let extension = ray
                .segments_of_kind(SegmentKind::VirtualExtension)
                .next()
                .unwrap();
            assert_point_eq(extension.end(), 25.0, 10.0);
            let emergent = ray.segments_of_kind(SegmentKind::Emergent).next().unwrap();
            assert!(emergent.end().x < emergent.start().x);
        }
    }
    #[test]
    fn scene_clipping() {
        let bounds = SceneBounds::new(centimeter!(-30.0, -15.0), centimeter!(30.0, 15.0)).unwrap();
        let config = RayTracerConfig::new(11, bounds).unwrap();
        let optic = lens(OpticShape::Convex, 20.0, 30.0);
        let object = point_at(-40.0, 10.0);
        let image = compute_image(&object, &optic);
        let rays = RayTracer::new(config).trace_rays(&object, &optic, &image, RaysMode::Many);
        assert!(!rays.is_empty());
        for ray in &rays {
            for segment in ray.segments() {
                for p in [segment.start(), segment.end()] {
                    assert!(p.x.get::<centimeter>().abs() <= 30.0 + 1e-9);
                    assert!(p.y.get::<centimeter>().abs() <= 15.0 + 1e-9);
                }
            }
        }
        // the object is outside: the incident segments start at the left border
        assert_relative_eq!(
            rays[0].segments()[0].start().x.get::<centimeter>(),
            -30.0,
            epsilon = 1e-9
        );
    }
}
