//! This is the documentation for the **geolens** software package. **geolens** models the image formation of a
//! single thin lens or a single curved mirror in a two-dimensional scene.
//!
//! A scene ([`OpticScene`]) consists of exactly one [`Optic`](optic::Optic) and an arbitrary number of
//! [`OpticalObject`](optical_object::OpticalObject)s. For each object the engine computes the paraxial image, a set
//! of traced [`LightRay`](light_ray::LightRay)s, the guide arms at the lens edges as well as the jump points used for
//! keyboard navigation of measurement tools.
#![allow(clippy::module_name_repetitions)]

pub mod console;
pub mod error;
pub mod focal_length;
pub mod guides;
pub mod image_formation;
pub mod jump_points;
pub mod light_ray;
pub mod optic;
pub mod optical_object;
pub mod ray_tracer;
pub mod scene;
pub mod scene_bounds;
pub mod scene_document;
pub mod utils;

pub use scene::OpticScene;
pub use scene_document::SceneDocument;

/// Return the version information of the currently built geolens executable.
///
/// This function returs a `String` which contains the package version as well as the supported version of the scene
/// file format.
#[must_use]
pub fn get_version() -> String {
    format!(
        "{} (scene file version {})",
        env!("CARGO_PKG_VERSION"),
        scene_document::SCENE_FILE_VERSION
    )
}
