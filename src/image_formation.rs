#![warn(missing_docs)]
//! Image formation of thin lenses and mirrors.
//!
//! The image of an [`OpticalObject`] is calculated using the thin lens / mirror equation
//! ```text
//! 1/d_i = 1/f - 1/d_o
//! m     = -d_i / d_o
//! ```
//! where `d_o` is the distance of the object's emission point to the optic plane (positive if the object is located
//! in front of the optic) and `f` is the signed focal length of the [`Optic`]. The image is real for `d_i >= 0` and
//! virtual otherwise. For a lens, a real image is located behind the lens (+x), for a mirror it is located in front of
//! the mirror (-x).
//!
//! If the object is located in the focal plane (`d_o == f`) no finite image exists. In this case the image is
//! classified as virtual and located "at infinity" ([`ImageLocation::AtInfinity`]). The emerging light rays are parallel.
use crate::{
    error::{OpticsError, OpticsResult},
    optic::Optic,
    optical_object::OpticalObject,
    utils::geometry::{from_cm, to_cm},
};
use log::debug;
use nalgebra::Point2;
use num::Zero;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uom::si::{f64::Length, length::centimeter};

/// relative tolerance for detecting an object located in the focal plane
pub(crate) const FOCAL_PLANE_TOLERANCE: f64 = 1e-9;

/// Classification of an [`OpticalImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
pub enum ImageType {
    /// light rays actually converge in the image point
    Real,
    /// light rays only appear to diverge from the image point
    Virtual,
}
/// Orientation of an [`OpticalImage`] relative to its object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
pub enum ImageOrientation {
    /// same orientation as the object (`m > 0`)
    Upright,
    /// upside-down (`m < 0`)
    Inverted,
}
/// Location of an [`OpticalImage`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageLocation {
    /// image at a finite distance
    Finite {
        /// image of the object's emission point
        position: Point2<Length>,
        /// signed image distance `d_i`
        image_distance: Length,
        /// lateral magnification `m`
        magnification: f64,
    },
    /// object located in the focal plane: no finite image exists, the emerging rays are parallel.
    AtInfinity,
}
/// The image of an [`OpticalObject`] formed by an [`Optic`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpticalImage {
    location: ImageLocation,
    image_type: ImageType,
    object_distance: Length,
    object_magnitude: Option<Length>,
}
impl OpticalImage {
    /// Returns the [`ImageLocation`] of this [`OpticalImage`].
    #[must_use]
    pub const fn location(&self) -> &ImageLocation {
        &self.location
    }
    /// Returns the [`ImageType`] of this [`OpticalImage`].
    #[must_use]
    pub const fn image_type(&self) -> ImageType {
        self.image_type
    }
    /// Returns `true` if this image is real.
    #[must_use]
    pub fn is_real(&self) -> bool {
        self.image_type == ImageType::Real
    }
    /// Returns `true` if this image is virtual.
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.image_type == ImageType::Virtual
    }
    /// Returns `true` if no finite image exists (object in the focal plane).
    #[must_use]
    pub const fn is_at_infinity(&self) -> bool {
        matches!(self.location, ImageLocation::AtInfinity)
    }
    /// Returns the object distance `d_o` used for calculating this image.
    #[must_use]
    pub fn object_distance(&self) -> Length {
        self.object_distance
    }
    /// Returns the position of the image point or `None` for an image at infinity.
    #[must_use]
    pub fn position(&self) -> Option<Point2<Length>> {
        match self.location {
            ImageLocation::Finite { position, .. } => Some(position),
            ImageLocation::AtInfinity => None,
        }
    }
    /// Returns the signed image distance `d_i` or `None` for an image at infinity.
    #[must_use]
    pub fn image_distance(&self) -> Option<Length> {
        match self.location {
            ImageLocation::Finite { image_distance, .. } => Some(image_distance),
            ImageLocation::AtInfinity => None,
        }
    }
    /// Returns the magnification `m` or `None` for an image at infinity.
    #[must_use]
    pub fn magnification(&self) -> Option<f64> {
        match self.location {
            ImageLocation::Finite { magnification, .. } => Some(magnification),
            ImageLocation::AtInfinity => None,
        }
    }
    /// Returns the [`ImageOrientation`] or `None` for an image at infinity.
    #[must_use]
    pub fn orientation(&self) -> Option<ImageOrientation> {
        self.magnification().map(|m| {
            if m.is_sign_negative() {
                ImageOrientation::Inverted
            } else {
                ImageOrientation::Upright
            }
        })
    }
    /// Returns the signed magnitude of the image of an arrow object.
    ///
    /// Returns `None` for point objects or an image at infinity.
    #[must_use]
    pub fn magnitude(&self) -> Option<Length> {
        self.object_magnitude
            .zip(self.magnification())
            .map(|(magnitude, m)| magnitude * m)
    }
    /// Returns the image of the base point of an arrow object.
    ///
    /// Returns `None` for point objects or an image at infinity.
    #[must_use]
    pub fn arrow_base(&self) -> Option<Point2<Length>> {
        self.position()
            .zip(self.magnitude())
            .map(|(tip, magnitude)| Point2::new(tip.x, tip.y - magnitude))
    }
}
/// Calculate the image of an [`OpticalObject`] formed by the given [`Optic`].
///
/// The calculation is a pure function of the object's emission point and the optic's position, type, shape and focal
/// length. Degenerate configurations never return an error:
///   - object in the focal plane: image at infinity (virtual)
///   - object located in the optic plane: the image coincides with the object (`m = 1`, real)
///   - object behind the optic: the same equations apply (virtual object)
#[must_use]
pub fn compute_image(object: &OpticalObject, optic: &Optic) -> OpticalImage {
    let emission = to_cm(&object.emission_point());
    let center = to_cm(&optic.position());
    let object_distance = center.x - emission.x;
    let object_magnitude = object.magnitude();
    if object_distance.abs() <= f64::EPSILON {
        return OpticalImage {
            location: ImageLocation::Finite {
                position: object.emission_point(),
                image_distance: Length::zero(),
                magnification: 1.0,
            },
            image_type: ImageType::Real,
            object_distance: Length::new::<centimeter>(object_distance),
            object_magnitude,
        };
    }
    match image_distance(object_distance, optic.optical_power()) {
        Ok(image_distance) => {
            let magnification = -image_distance / object_distance;
            let position = Point2::new(
                optic
                    .optic_type()
                    .propagation_direction()
                    .mul_add(image_distance, center.x),
                magnification.mul_add(emission.y - center.y, center.y),
            );
            OpticalImage {
                location: ImageLocation::Finite {
                    position: from_cm(&position),
                    image_distance: Length::new::<centimeter>(image_distance),
                    magnification,
                },
                image_type: if image_distance.is_sign_negative() {
                    ImageType::Virtual
                } else {
                    ImageType::Real
                },
                object_distance: Length::new::<centimeter>(object_distance),
                object_magnitude,
            }
        }
        Err(e) => {
            debug!("{e}: image placed at infinity");
            OpticalImage {
                location: ImageLocation::AtInfinity,
                image_type: ImageType::Virtual,
                object_distance: Length::new::<centimeter>(object_distance),
                object_magnitude,
            }
        }
    }
}
/// Solve the thin lens equation for the image distance (all values in cm, power in 1/cm).
///
/// # Errors
///
/// This function returns [`OpticsError::DegenerateGeometry`] if the object is located in the focal plane.
fn image_distance(object_distance: f64, optical_power: f64) -> OpticsResult<f64> {
    let denominator = object_distance.mul_add(optical_power, -1.0);
    if denominator.abs() <= FOCAL_PLANE_TOLERANCE {
        return Err(OpticsError::DegenerateGeometry(
            "object located in focal plane".into(),
        ));
    }
    let image_distance = object_distance / denominator;
    if image_distance.is_finite() {
        Ok(image_distance)
    } else {
        Err(OpticsError::DegenerateGeometry(
            "image distance not finite".into(),
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        centimeter,
        optic::OpticShape,
        utils::test_helper::test_helper::check_logs,
    };
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    fn lens(focal_length: f64) -> Optic {
        let shape = if focal_length > 0.0 {
            OpticShape::Convex
        } else {
            OpticShape::Concave
        };
        Optic::new_lens(shape, centimeter!(focal_length.abs()), centimeter!(100.0)).unwrap()
    }
    fn point_at(x: f64, y: f64) -> OpticalObject {
        OpticalObject::new_point(centimeter!(x, y)).unwrap()
    }
    #[test]
    fn converging_lens_real_image() {
        let image = compute_image(&point_at(-40.0, 10.0), &lens(20.0));
        assert_eq!(image.image_type(), ImageType::Real);
        assert!(image.is_real());
        assert_relative_eq!(
            image.image_distance().unwrap().get::<centimeter>(),
            40.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(image.magnification().unwrap(), -1.0, max_relative = 1e-12);
        assert_eq!(image.orientation(), Some(ImageOrientation::Inverted));
        let position = image.position().unwrap();
        assert_relative_eq!(position.x.get::<centimeter>(), 40.0, max_relative = 1e-12);
        assert_relative_eq!(position.y.get::<centimeter>(), -10.0, max_relative = 1e-12);
        assert_relative_eq!(
            image.object_distance().get::<centimeter>(),
            40.0,
            max_relative = 1e-12
        );
    }
    #[test]
    fn converging_lens_virtual_image() {
        let image = compute_image(&point_at(-10.0, 5.0), &lens(20.0));
        assert_eq!(image.image_type(), ImageType::Virtual);
        assert!(image.is_virtual());
        assert_relative_eq!(
            image.image_distance().unwrap().get::<centimeter>(),
            -20.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(image.magnification().unwrap(), 2.0, max_relative = 1e-12);
        assert_eq!(image.orientation(), Some(ImageOrientation::Upright));
        let position = image.position().unwrap();
        assert_relative_eq!(position.x.get::<centimeter>(), -20.0, max_relative = 1e-12);
        assert_relative_eq!(position.y.get::<centimeter>(), 10.0, max_relative = 1e-12);
    }
    #[test]
    fn diverging_lens_always_virtual() {
        for x in [-5.0, -20.0, -60.0, -300.0] {
            let image = compute_image(&point_at(x, 10.0), &lens(-20.0));
            assert!(image.is_virtual());
            let m = image.magnification().unwrap();
            assert!(m > 0.0 && m < 1.0);
        }
    }
    #[test]
    fn thin_lens_equation_holds() {
        for f in [-35.0, -10.0, 15.0, 20.0, 80.0] {
            for d_o in [3.0, 17.0, 40.0, 55.5, 120.0] {
                let image = compute_image(&point_at(-d_o, 7.0), &lens(f));
                let d_i = image.image_distance().unwrap().get::<centimeter>();
                assert_relative_eq!(1.0 / d_i, 1.0 / f - 1.0 / d_o, max_relative = 1e-9);
                assert_eq!(image.is_real(), d_i >= 0.0);
                assert_relative_eq!(image.magnification().unwrap(), -d_i / d_o, max_relative = 1e-9);
            }
        }
    }
    #[test]
    fn concave_mirror() {
        let mirror = Optic::new(
            crate::optic::OpticType::Mirror,
            OpticShape::Concave,
            centimeter!(100.0),
            centimeter!(0.0, 0.0),
            crate::focal_length::FocalLengthModel::new_indirect(
                crate::optic::OpticType::Mirror,
                centimeter!(40.0),
            )
            .unwrap(),
        )
        .unwrap();
        let image = compute_image(&point_at(-60.0, 10.0), &mirror);
        assert!(image.is_real());
        assert_relative_eq!(
            image.image_distance().unwrap().get::<centimeter>(),
            30.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(image.magnification().unwrap(), -0.5, max_relative = 1e-12);
        // real mirror images are located in front of the mirror
        let position = image.position().unwrap();
        assert_relative_eq!(position.x.get::<centimeter>(), -30.0, max_relative = 1e-12);
        assert_relative_eq!(position.y.get::<centimeter>(), -5.0, max_relative = 1e-12);
    }
    #[test]
    fn convex_mirror() {
        let mirror =
            Optic::new_mirror(OpticShape::Convex, centimeter!(20.0), centimeter!(100.0)).unwrap();
        let image = compute_image(&point_at(-60.0, 10.0), &mirror);
        assert!(image.is_virtual());
        assert_relative_eq!(
            image.image_distance().unwrap().get::<centimeter>(),
            -15.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(image.magnification().unwrap(), 0.25, max_relative = 1e-12);
        assert_relative_eq!(
            image.position().unwrap().x.get::<centimeter>(),
            15.0,
            max_relative = 1e-12
        );
    }
    #[test]
    fn flat_mirror() {
        let mirror =
            Optic::new_mirror(OpticShape::Flat, centimeter!(20.0), centimeter!(100.0)).unwrap();
        let image = compute_image(&point_at(-25.0, 10.0), &mirror);
        assert!(image.is_virtual());
        assert_relative_eq!(image.magnification().unwrap(), 1.0);
        let position = image.position().unwrap();
        assert_relative_eq!(position.x.get::<centimeter>(), 25.0, max_relative = 1e-12);
        assert_relative_eq!(position.y.get::<centimeter>(), 10.0, max_relative = 1e-12);
    }
    #[test]
    fn object_in_focal_plane() {
        testing_logger::setup();
        let image = compute_image(&point_at(-20.0, 10.0), &lens(20.0));
        assert!(image.is_at_infinity());
        assert!(image.is_virtual());
        assert_matches!(image.location(), ImageLocation::AtInfinity);
        assert_eq!(image.position(), None);
        assert_eq!(image.image_distance(), None);
        assert_eq!(image.magnification(), None);
        assert_eq!(image.orientation(), None);
        check_logs(
            log::Level::Debug,
            vec!["DegenerateGeometry:object located in focal plane: image placed at infinity"],
        );
    }
    #[test]
    fn object_in_optic_plane() {
        let object = point_at(0.0, 10.0);
        let image = compute_image(&object, &lens(20.0));
        assert!(image.is_real());
        assert_eq!(image.position(), Some(object.emission_point()));
        assert_eq!(image.magnification(), Some(1.0));
        assert_eq!(image.image_distance(), Some(centimeter!(0.0)));
    }
    #[test]
    fn object_behind_optic() {
        let image = compute_image(&point_at(10.0, 0.0), &lens(20.0));
        let d_i = image.image_distance().unwrap().get::<centimeter>();
        assert_relative_eq!(d_i, 20.0 / 3.0, max_relative = 1e-12);
        assert!(image.is_real());
    }
    #[test]
    fn arrow_image() {
        let arrow = OpticalObject::new_arrow(centimeter!(-40.0, 0.0), centimeter!(30.0)).unwrap();
        let image = compute_image(&arrow, &lens(20.0));
        assert_relative_eq!(
            image.magnitude().unwrap().get::<centimeter>(),
            -30.0,
            max_relative = 1e-12
        );
        let base = image.arrow_base().unwrap();
        assert_relative_eq!(base.x.get::<centimeter>(), 40.0, max_relative = 1e-12);
        assert_relative_eq!(base.y.get::<centimeter>(), 0.0, epsilon = 1e-12);
        assert_eq!(compute_image(&point_at(-40.0, 0.0), &lens(20.0)).magnitude(), None);
    }
    #[test]
    fn off_axis_optic() {
        let optic = lens(20.0)
            .with_position(centimeter!(100.0, 20.0))
            .unwrap();
        let image = compute_image(&point_at(60.0, 30.0), &optic);
        let position = image.position().unwrap();
        assert_relative_eq!(position.x.get::<centimeter>(), 140.0, max_relative = 1e-12);
        assert_relative_eq!(position.y.get::<centimeter>(), 10.0, max_relative = 1e-12);
    }
    #[test]
    fn idempotent() {
        let object = point_at(-33.3, 12.1);
        let optic = lens(17.0);
        assert_eq!(compute_image(&object, &optic), compute_image(&object, &optic));
    }
    #[test]
    fn solver_rejects_focal_plane() {
        assert_matches!(
            image_distance(20.0, 1.0 / 20.0),
            Err(OpticsError::DegenerateGeometry(_))
        );
        assert_relative_eq!(image_distance(40.0, 1.0 / 20.0).unwrap(), 40.0);
    }
}
