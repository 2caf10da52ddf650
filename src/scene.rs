#![warn(missing_docs)]
//! The model of a scene consisting of one optic and a number of objects.
//!
//! An [`OpticScene`] owns the only mutable state of the engine. All derived values (images, rays, guides and jump
//! points) are rebuilt from scratch by [`OpticScene::recompute`] in the order
//! `optic -> images -> rays / guides -> jump points`.
use crate::{
    error::{OpticsError, OpticsResult},
    focal_length::FocalLengthControlType,
    guides::{compute_guides, Guides},
    image_formation::{compute_image, OpticalImage},
    jump_points::{JumpPointRegistry, SceneVisibility},
    light_ray::LightRay,
    optic::{Optic, OpticType},
    optical_object::OpticalObject,
    ray_tracer::{RayTracer, RayTracerConfig, RaysMode},
};
use nalgebra::Point2;
use serde::Serialize;
use uom::si::f64::Length;

/// The editable state of a scene.
#[derive(Debug, Clone, Default)]
pub struct OpticScene {
    optic: Optic,
    objects: Vec<OpticalObject>,
    rays_mode: RaysMode,
    visibility: SceneVisibility,
    ray_tracer: RayTracer,
}
impl OpticScene {
    /// Creates a new [`OpticScene`] containing the given [`Optic`] and no objects.
    #[must_use]
    pub fn new(optic: Optic) -> Self {
        Self {
            optic,
            ..Self::default()
        }
    }
    /// Add an [`OpticalObject`] to this scene. This function can be used with the "builder pattern".
    #[must_use]
    pub fn with_object(mut self, object: OpticalObject) -> Self {
        self.add_object(object);
        self
    }
    /// Returns the [`Optic`] of this scene.
    #[must_use]
    pub const fn optic(&self) -> &Optic {
        &self.optic
    }
    /// Returns the objects of this scene.
    #[must_use]
    pub fn objects(&self) -> &[OpticalObject] {
        &self.objects
    }
    /// Add an [`OpticalObject`] and return its index.
    pub fn add_object(&mut self, object: OpticalObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }
    /// Remove the [`OpticalObject`] with the given index.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is out of range.
    pub fn remove_object(&mut self, index: usize) -> OpticsResult<OpticalObject> {
        self.object_mut(index)?;
        Ok(self.objects.remove(index))
    }
    /// Sets the position of the optic.
    ///
    /// # Errors
    ///
    /// This function will return an error if the position is not finite.
    pub fn set_optic_position(&mut self, position: Point2<Length>) -> OpticsResult<()> {
        self.optic.set_position(position)
    }
    /// Sets the diameter of the optic.
    ///
    /// # Errors
    ///
    /// This function will return an error if the diameter is <= 0.0 or not finite.
    pub fn set_diameter(&mut self, diameter: Length) -> OpticsResult<()> {
        self.optic.set_diameter(diameter)
    }
    /// Sets the focal length magnitude of the optic (direct control only).
    ///
    /// # Errors
    ///
    /// This function will return an error if the value is <= 0.0 or not finite or the optic is not in direct control
    /// mode.
    pub fn set_focal_length(&mut self, focal_length: Length) -> OpticsResult<()> {
        self.optic
            .focal_length_model_mut()
            .set_focal_length_magnitude(focal_length)
    }
    /// Sets the radius of curvature of the optic (indirect control only).
    ///
    /// # Errors
    ///
    /// This function will return an error if the value is <= 0.0 or not finite or the optic is not in indirect
    /// control mode.
    pub fn set_radius_of_curvature(&mut self, radius: Length) -> OpticsResult<()> {
        self.optic
            .focal_length_model_mut()
            .set_radius_of_curvature(radius)
    }
    /// Sets the index of refraction of the optic.
    ///
    /// # Errors
    ///
    /// This function will return an error if the optic is a mirror or the index is <= 1.0 or not finite.
    pub fn set_index_of_refraction(&mut self, index: f64) -> OpticsResult<()> {
        self.optic
            .focal_length_model_mut()
            .set_index_of_refraction(index)
    }
    /// Switch the focal length control of the optic. The focal length is preserved.
    ///
    /// # Errors
    ///
    /// This function will return an error if the synchronized parameter of the new control type is not finite.
    pub fn set_focal_length_control_type(
        &mut self,
        control_type: FocalLengthControlType,
    ) -> OpticsResult<()> {
        self.optic
            .focal_length_model_mut()
            .set_control_type(control_type)
    }
    /// Sets the position of the object with the given index.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is out of range or the position is not finite.
    pub fn set_object_position(&mut self, index: usize, position: Point2<Length>) -> OpticsResult<()> {
        self.object_mut(index)?.set_position(position)
    }
    /// Sets the magnitude of the arrow object with the given index.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the index is out of range.
    ///   - the object is not an arrow.
    ///   - the magnitude is invalid.
    pub fn set_object_magnitude(&mut self, index: usize, magnitude: Length) -> OpticsResult<()> {
        self.object_mut(index)?.set_magnitude(magnitude)
    }
    /// Show or hide the object with the given index.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is out of range.
    pub fn set_object_visible(&mut self, index: usize, visible: bool) -> OpticsResult<()> {
        self.object_mut(index)?.set_visible(visible);
        Ok(())
    }
    /// Returns the current [`RaysMode`].
    #[must_use]
    pub const fn rays_mode(&self) -> RaysMode {
        self.rays_mode
    }
    /// Sets the [`RaysMode`].
    pub fn set_rays_mode(&mut self, rays_mode: RaysMode) {
        self.rays_mode = rays_mode;
    }
    /// Returns the [`SceneVisibility`] flags.
    #[must_use]
    pub const fn visibility(&self) -> &SceneVisibility {
        &self.visibility
    }
    /// Sets the [`SceneVisibility`] flags.
    pub fn set_visibility(&mut self, visibility: SceneVisibility) {
        self.visibility = visibility;
    }
    /// Returns the [`RayTracerConfig`].
    #[must_use]
    pub const fn ray_tracer_config(&self) -> &RayTracerConfig {
        self.ray_tracer.config()
    }
    /// Sets the [`RayTracerConfig`].
    pub fn set_ray_tracer_config(&mut self, config: RayTracerConfig) {
        self.ray_tracer = RayTracer::new(config);
    }
    /// Recalculate all derived values of this scene.
    ///
    /// # Errors
    ///
    /// This function will return an error if a derived value cannot be calculated.
    pub fn recompute(&self) -> OpticsResult<SceneSnapshot> {
        let images: Vec<OpticalImage> = self
            .objects
            .iter()
            .map(|object| compute_image(object, &self.optic))
            .collect();
        let mut objects = Vec::with_capacity(self.objects.len());
        for (object, image) in self.objects.iter().zip(&images) {
            let rays = self
                .ray_tracer
                .trace_rays(object, &self.optic, image, self.rays_mode);
            let guides = match self.optic.optic_type() {
                OpticType::Lens => Some(compute_guides(object, &self.optic)?),
                OpticType::Mirror => None,
            };
            objects.push(ObjectSnapshot {
                image: image.clone(),
                rays,
                guides,
            });
        }
        let jump_points =
            JumpPointRegistry::build(&self.optic, &self.objects, &images, &self.visibility)?;
        Ok(SceneSnapshot {
            objects,
            jump_points,
        })
    }
    fn object_mut(&mut self, index: usize) -> OpticsResult<&mut OpticalObject> {
        let nr_of_objects = self.objects.len();
        self.objects.get_mut(index).ok_or_else(|| {
            OpticsError::InvalidParameter(format!(
                "object index {index} out of range (scene contains {nr_of_objects} objects)"
            ))
        })
    }
}
/// The derived values of one object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSnapshot {
    image: OpticalImage,
    rays: Vec<LightRay>,
    guides: Option<Guides>,
}
impl ObjectSnapshot {
    /// Returns the image of the object.
    #[must_use]
    pub const fn image(&self) -> &OpticalImage {
        &self.image
    }
    /// Returns the traced rays of the object.
    #[must_use]
    pub fn rays(&self) -> &[LightRay] {
        &self.rays
    }
    /// Returns the guides (lenses only).
    #[must_use]
    pub const fn guides(&self) -> Option<&Guides> {
        self.guides.as_ref()
    }
}
/// Immutable result of [`OpticScene::recompute`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnapshot {
    objects: Vec<ObjectSnapshot>,
    jump_points: JumpPointRegistry,
}
impl SceneSnapshot {
    /// Returns one [`ObjectSnapshot`] per object in scene order.
    #[must_use]
    pub fn objects(&self) -> &[ObjectSnapshot] {
        &self.objects
    }
    /// Returns the jump points of the scene.
    #[must_use]
    pub const fn jump_points(&self) -> &JumpPointRegistry {
        &self.jump_points
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{centimeter, optic::OpticShape};
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use uom::si::length::centimeter;

    fn scene() -> OpticScene {
        OpticScene::new(
            Optic::new_lens(OpticShape::Convex, centimeter!(20.0), centimeter!(40.0)).unwrap(),
        )
        .with_object(OpticalObject::new_point(centimeter!(-40.0, 10.0)).unwrap())
        .with_object(
            OpticalObject::new_arrow(centimeter!(-20.0, -20.0), centimeter!(20.0)).unwrap(),
        )
    }
    #[test]
    fn default() {
        let scene = OpticScene::default();
        assert!(scene.objects().is_empty());
        assert_eq!(scene.rays_mode(), RaysMode::Marginal);
        assert_eq!(scene.visibility(), &SceneVisibility::default());
        assert_eq!(scene.ray_tracer_config(), &RayTracerConfig::default());
        let snapshot = scene.recompute().unwrap();
        assert!(snapshot.objects().is_empty());
        assert_eq!(snapshot.jump_points().all().len(), 5);
    }
    #[test]
    fn recompute() {
        let snapshot = scene().recompute().unwrap();
        assert_eq!(snapshot.objects().len(), 2);
        let first = &snapshot.objects()[0];
        assert!(first.image().is_real());
        assert_eq!(first.rays().len(), 2);
        assert!(first.guides().is_some());
        let second = &snapshot.objects()[1];
        assert!(second.image().is_at_infinity());
        assert_eq!(snapshot.jump_points().all().len(), 9);
    }
    #[test]
    fn recompute_idempotent() {
        let scene = scene();
        assert_eq!(scene.recompute().unwrap(), scene.recompute().unwrap());
    }
    #[test]
    fn mirror_has_no_guides() {
        let scene = OpticScene::new(
            Optic::new_mirror(OpticShape::Concave, centimeter!(20.0), centimeter!(40.0)).unwrap(),
        )
        .with_object(OpticalObject::new_point(centimeter!(-60.0, 10.0)).unwrap());
        let snapshot = scene.recompute().unwrap();
        assert!(snapshot.objects()[0].guides().is_none());
    }
    #[test]
    fn rays_mode() {
        let mut scene = scene();
        scene.set_rays_mode(RaysMode::None);
        let snapshot = scene.recompute().unwrap();
        assert!(snapshot.objects().iter().all(|o| o.rays().is_empty()));
        scene.set_rays_mode(RaysMode::Many);
        let snapshot = scene.recompute().unwrap();
        assert_eq!(snapshot.objects()[0].rays().len(), 21);
    }
    #[test]
    fn optic_setters() {
        let mut scene = scene();
        assert!(scene.set_diameter(centimeter!(-1.0)).is_err());
        assert!(scene.set_optic_position(centimeter!(f64::NAN, 0.0)).is_err());
        assert!(scene.set_radius_of_curvature(centimeter!(30.0)).is_err());
        scene.set_focal_length(centimeter!(40.0)).unwrap();
        let snapshot = scene.recompute().unwrap();
        // object at the focal point now
        assert!(snapshot.objects()[0].image().is_at_infinity());
        scene
            .set_focal_length_control_type(FocalLengthControlType::Indirect)
            .unwrap();
        assert!(scene.set_focal_length(centimeter!(20.0)).is_err());
        scene.set_index_of_refraction(2.0).unwrap();
        // R = 2 f (n - 1) = 40 cm with n = 1.5 -> f = 20 cm with n = 2
        assert_relative_eq!(
            scene
                .optic()
                .signed_focal_length()
                .unwrap()
                .get::<centimeter>(),
            20.0,
            max_relative = 1e-12
        );
        scene.set_radius_of_curvature(centimeter!(80.0)).unwrap();
        assert_relative_eq!(
            scene
                .optic()
                .signed_focal_length()
                .unwrap()
                .get::<centimeter>(),
            40.0,
            max_relative = 1e-12
        );
    }
    #[test]
    fn object_setters() {
        let mut scene = scene();
        assert_matches!(
            scene.set_object_position(5, centimeter!(0.0, 0.0)),
            Err(OpticsError::InvalidParameter(_))
        );
        assert!(scene
            .set_object_position(0, centimeter!(f64::INFINITY, 0.0))
            .is_err());
        scene
            .set_object_position(0, centimeter!(-60.0, 10.0))
            .unwrap();
        assert_eq!(scene.objects()[0].position(), centimeter!(-60.0, 10.0));
        assert_matches!(
            scene.set_object_magnitude(0, centimeter!(30.0)),
            Err(OpticsError::UnsupportedOperation(_))
        );
        scene.set_object_magnitude(1, centimeter!(30.0)).unwrap();
        scene.set_object_visible(1, false).unwrap();
        assert!(!scene.objects()[1].is_visible());
        assert!(scene.set_object_visible(2, false).is_err());
    }
    #[test]
    fn add_remove_objects() {
        let mut scene = scene();
        let index = scene.add_object(OpticalObject::new_point(centimeter!(-80.0, 0.0)).unwrap());
        assert_eq!(index, 2);
        assert!(scene.remove_object(3).is_err());
        let removed = scene.remove_object(0).unwrap();
        assert_eq!(removed.position(), centimeter!(-40.0, 10.0));
        assert_eq!(scene.objects().len(), 2);
    }
    #[test]
    fn rejected_index_keeps_jump_points_finite() {
        let mut scene = scene();
        scene
            .set_focal_length_control_type(FocalLengthControlType::Indirect)
            .unwrap();
        scene.set_radius_of_curvature(centimeter!(1e300)).unwrap();
        assert_matches!(
            scene.set_index_of_refraction(1.000_000_000_000_000_2),
            Err(OpticsError::InvalidParameter(_))
        );
        let snapshot = scene.recompute().unwrap();
        for point in snapshot.jump_points().all() {
            assert!(crate::utils::geometry::is_finite_point(&point.position()));
        }
        assert!(scene.optic().optical_power() > 0.0);
    }
}
