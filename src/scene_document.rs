#![warn(missing_docs)]
//! Reading and writing of scene description files.
//!
//! A scene is stored as a YAML document. All lengths and coordinates of the document are given in centimeter:
//! ```yaml
//! file_version: '1.0'
//! optic:
//!   optic_type: lens
//!   shape: convex
//!   diameter: 80.0
//!   position: [0.0, 0.0]
//!   focal_length:
//!     control_type: direct
//!     focal_length: 20.0
//! objects:
//! - type: point
//!   position: [-40.0, 10.0]
//! - type: arrow
//!   position: [-60.0, 0.0]
//!   magnitude: 25.0
//! rays_mode: principal
//! ```
use crate::{
    centimeter,
    error::{OpticsError, OpticsResult},
    focal_length::{FocalLengthControlType, FocalLengthModel},
    jump_points::SceneVisibility,
    optic::{Optic, OpticShape, OpticType},
    optical_object::{ObjectKind, OpticalObject},
    ray_tracer::{RayTracerConfig, RaysMode, DEFAULT_MANY_RAYS_COUNT},
    scene::OpticScene,
    scene_bounds::SceneBounds,
    utils::geometry::to_cm,
};
use log::warn;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};
use uom::si::{f64::Length, length::centimeter};

/// Version of the scene file format written by this crate.
pub const SCENE_FILE_VERSION: &str = "1.0";

/// The serializable description of an [`OpticScene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    file_version: String,
    optic: OpticEntry,
    #[serde(default)]
    objects: Vec<ObjectEntry>,
    #[serde(default)]
    rays_mode: RaysMode,
    #[serde(default)]
    visibility: SceneVisibility,
    #[serde(default)]
    ray_tracer: RayTracerEntry,
}
impl Default for SceneDocument {
    fn default() -> Self {
        Self::from_scene(&OpticScene::default())
    }
}
impl SceneDocument {
    /// Create a [`SceneDocument`] describing the given [`OpticScene`].
    #[must_use]
    pub fn from_scene(scene: &OpticScene) -> Self {
        Self {
            file_version: SCENE_FILE_VERSION.to_string(),
            optic: OpticEntry::from(scene.optic()),
            objects: scene.objects().iter().map(ObjectEntry::from).collect(),
            rays_mode: scene.rays_mode(),
            visibility: *scene.visibility(),
            ray_tracer: RayTracerEntry::from(scene.ray_tracer_config()),
        }
    }
    /// Create a new [`SceneDocument`] from a scene file at the given path.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the given path is not found or readable.
    ///   - the parsing / deserialization of the file failed.
    pub fn from_file(path: &Path) -> OpticsResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            OpticsError::SceneDocument(format!("cannot read file {} : {}", path.display(), e))
        })?;
        Self::from_string(&contents)
    }
    /// Create a new [`SceneDocument`] from the given YAML string.
    ///
    /// A document written by a different file format version is accepted but a warning is logged.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parsing of the string failed.
    pub fn from_string(file_string: &str) -> OpticsResult<Self> {
        let document: Self = serde_yaml::from_str(file_string)
            .map_err(|e| OpticsError::SceneDocument(format!("parsing of scene failed: {e}")))?;
        if document.file_version != SCENE_FILE_VERSION {
            warn!("scene file version does not match the supported version.");
            warn!(
                "read version '{}' <-> supported file version '{SCENE_FILE_VERSION}'",
                document.file_version
            );
        }
        Ok(document)
    }
    /// Return the YAML representation of this [`SceneDocument`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the serialization fails.
    pub fn to_string(&self) -> OpticsResult<String> {
        serde_yaml::to_string(self).map_err(|e| {
            OpticsError::SceneDocument(format!("serialization of scene document failed: {e}"))
        })
    }
    /// Save this [`SceneDocument`] to a file with the given path.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the serialization of the document failed.
    ///   - the file cannot be created or written.
    pub fn save_to_file(&self, path: &Path) -> OpticsResult<()> {
        let serialized = self.to_string()?;
        let mut output = File::create(path).map_err(|e| {
            OpticsError::SceneDocument(format!(
                "could not create file path: {}: {}",
                path.display(),
                e
            ))
        })?;
        write!(output, "{serialized}").map_err(|e| {
            OpticsError::SceneDocument(format!(
                "writing to file path {} failed: {}",
                path.display(),
                e
            ))
        })
    }
    /// Returns the file format version of this document.
    #[must_use]
    pub fn file_version(&self) -> &str {
        &self.file_version
    }
    /// Build the [`OpticScene`] described by this document.
    ///
    /// # Errors
    ///
    /// This function will return an error if a parameter of the document is invalid.
    pub fn into_scene(self) -> OpticsResult<OpticScene> {
        let mut scene = OpticScene::new(self.optic.into_optic()?);
        for object in self.objects {
            scene.add_object(object.into_object()?);
        }
        scene.set_rays_mode(self.rays_mode);
        scene.set_visibility(self.visibility);
        scene.set_ray_tracer_config(self.ray_tracer.into_config()?);
        Ok(scene)
    }
}
fn point_from(coordinates: [f64; 2]) -> Point2<Length> {
    centimeter!(coordinates[0], coordinates[1])
}
fn coordinates_of(point: &Point2<Length>) -> [f64; 2] {
    let p = to_cm(point);
    [p.x, p.y]
}
const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct OpticEntry {
    optic_type: OpticType,
    shape: OpticShape,
    diameter: f64,
    #[serde(default)]
    position: [f64; 2],
    focal_length: FocalLengthEntry,
}
impl From<&Optic> for OpticEntry {
    fn from(optic: &Optic) -> Self {
        Self {
            optic_type: optic.optic_type(),
            shape: optic.shape(),
            diameter: optic.diameter().get::<centimeter>(),
            position: coordinates_of(&optic.position()),
            focal_length: FocalLengthEntry::from(optic.focal_length_model()),
        }
    }
}
impl OpticEntry {
    fn into_optic(self) -> OpticsResult<Optic> {
        let model = self.focal_length.into_model(self.optic_type)?;
        Optic::new(
            self.optic_type,
            self.shape,
            centimeter!(self.diameter),
            point_from(self.position),
            model,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FocalLengthEntry {
    #[serde(default)]
    control_type: FocalLengthControlType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    focal_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    radius_of_curvature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index_of_refraction: Option<f64>,
}
impl From<&FocalLengthModel> for FocalLengthEntry {
    fn from(model: &FocalLengthModel) -> Self {
        let (focal_length, radius_of_curvature) = match model.control_type() {
            FocalLengthControlType::Direct => {
                (Some(model.focal_length_magnitude().get::<centimeter>()), None)
            }
            FocalLengthControlType::Indirect => (
                None,
                model.radius_of_curvature().map(|r| r.get::<centimeter>()),
            ),
        };
        Self {
            control_type: model.control_type(),
            focal_length,
            radius_of_curvature,
            index_of_refraction: model.index_of_refraction(),
        }
    }
}
impl FocalLengthEntry {
    fn into_model(self, optic_type: OpticType) -> OpticsResult<FocalLengthModel> {
        let model = match self.control_type {
            FocalLengthControlType::Direct => {
                let focal_length = self.focal_length.ok_or_else(|| {
                    OpticsError::SceneDocument(
                        "direct focal length control requires a `focal_length` entry".into(),
                    )
                })?;
                FocalLengthModel::new_direct(optic_type, centimeter!(focal_length))?
            }
            FocalLengthControlType::Indirect => {
                let radius = self.radius_of_curvature.ok_or_else(|| {
                    OpticsError::SceneDocument(
                        "indirect focal length control requires a `radius_of_curvature` entry"
                            .into(),
                    )
                })?;
                FocalLengthModel::new_indirect(optic_type, centimeter!(radius))?
            }
        };
        match (self.index_of_refraction, optic_type) {
            (Some(index), OpticType::Lens) => model.with_index_of_refraction(index),
            (Some(_), OpticType::Mirror) => {
                warn!("index of refraction of a mirror ignored");
                Ok(model)
            }
            (None, _) => Ok(model),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ObjectEntry {
    Point {
        position: [f64; 2],
        #[serde(default = "default_true")]
        visible: bool,
    },
    Arrow {
        position: [f64; 2],
        magnitude: f64,
        #[serde(default = "default_true")]
        visible: bool,
    },
}
impl From<&OpticalObject> for ObjectEntry {
    fn from(object: &OpticalObject) -> Self {
        let position = coordinates_of(&object.position());
        let visible = object.is_visible();
        match object.kind() {
            ObjectKind::Point => Self::Point { position, visible },
            ObjectKind::Arrow { magnitude } => Self::Arrow {
                position,
                magnitude: magnitude.get::<centimeter>(),
                visible,
            },
        }
    }
}
impl ObjectEntry {
    fn into_object(self) -> OpticsResult<OpticalObject> {
        let (mut object, visible) = match self {
            Self::Point { position, visible } => {
                (OpticalObject::new_point(point_from(position))?, visible)
            }
            Self::Arrow {
                position,
                magnitude,
                visible,
            } => (
                OpticalObject::new_arrow(point_from(position), centimeter!(magnitude))?,
                visible,
            ),
        };
        object.set_visible(visible);
        Ok(object)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BoundsEntry {
    min: [f64; 2],
    max: [f64; 2],
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RayTracerEntry {
    #[serde(default = "default_many_rays_count")]
    many_rays_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scene_bounds: Option<BoundsEntry>,
}
const fn default_many_rays_count() -> usize {
    DEFAULT_MANY_RAYS_COUNT
}
impl Default for RayTracerEntry {
    fn default() -> Self {
        Self {
            many_rays_count: DEFAULT_MANY_RAYS_COUNT,
            scene_bounds: None,
        }
    }
}
impl From<&RayTracerConfig> for RayTracerEntry {
    fn from(config: &RayTracerConfig) -> Self {
        let bounds = config.scene_bounds();
        Self {
            many_rays_count: config.many_rays_count(),
            scene_bounds: Some(BoundsEntry {
                min: coordinates_of(&bounds.min()),
                max: coordinates_of(&bounds.max()),
            }),
        }
    }
}
impl RayTracerEntry {
    fn into_config(self) -> OpticsResult<RayTracerConfig> {
        let bounds = match self.scene_bounds {
            Some(entry) => SceneBounds::new(point_from(entry.min), point_from(entry.max))?,
            None => SceneBounds::default(),
        };
        RayTracerConfig::new(self.many_rays_count, bounds)
    }
}
