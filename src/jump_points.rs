#![warn(missing_docs)]
//! Navigation points for placing measurement tools.
//!
//! The [`JumpPointRegistry`] collects the "interesting" positions of a scene in a fixed priority order: the optic, all
//! objects, all images, the focal points and the 2F points. Tools can cycle through the visible points of their
//! [`NavigationContext`] with [`JumpPointRegistry::next_visible`].
use crate::{
    error::{OpticsError, OpticsResult},
    image_formation::OpticalImage,
    optic::Optic,
    optical_object::OpticalObject,
};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uom::si::f64::Length;

/// The entity a [`ToolJumpPoint`] is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
pub enum JumpPointKind {
    /// center of the optic
    Optic,
    /// emission point of an object
    Object,
    /// image of an object's emission point
    Image,
    /// focal point
    FocalPoint,
    /// point at twice the focal length
    TwoFPoint,
}
/// The tool using the jump points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
pub enum NavigationContext {
    /// ruler measuring horizontal distances
    HorizontalRuler,
    /// ruler measuring vertical distances (heights of objects and images)
    VerticalRuler,
    /// marker showing the coordinates of a position
    PositionMarker,
}
impl NavigationContext {
    /// Returns `true` if points of the given [`JumpPointKind`] are used in this context.
    #[must_use]
    pub const fn accepts(self, kind: JumpPointKind) -> bool {
        match self {
            Self::HorizontalRuler | Self::PositionMarker => true,
            Self::VerticalRuler => matches!(kind, JumpPointKind::Object | JumpPointKind::Image),
        }
    }
}
/// Scene wide visibility flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneVisibility {
    /// show the focal points
    #[serde(default = "default_true")]
    pub focal_points: bool,
    /// show the 2F points
    #[serde(default)]
    pub two_f_points: bool,
    /// show virtual images
    #[serde(default = "default_true")]
    pub virtual_images: bool,
}
impl Default for SceneVisibility {
    fn default() -> Self {
        Self {
            focal_points: true,
            two_f_points: false,
            virtual_images: true,
        }
    }
}
const fn default_true() -> bool {
    true
}
/// A navigable position derived from another entity of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolJumpPoint {
    kind: JumpPointKind,
    position: Point2<Length>,
    visible: bool,
}
impl ToolJumpPoint {
    /// Returns the [`JumpPointKind`] of this [`ToolJumpPoint`].
    #[must_use]
    pub const fn kind(&self) -> JumpPointKind {
        self.kind
    }
    /// Returns the position of this [`ToolJumpPoint`].
    #[must_use]
    pub fn position(&self) -> Point2<Length> {
        self.position
    }
    /// Returns `true` if the owning entity is currently visible.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }
}
/// Ordered collection of all [`ToolJumpPoint`]s of a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JumpPointRegistry {
    points: Vec<ToolJumpPoint>,
}
impl JumpPointRegistry {
    /// Build the jump points of a scene.
    ///
    /// `images` must contain the image of each object in the same order.
    ///
    /// # Errors
    ///
    /// This function will return an error if the number of images does not match the number of objects.
    pub fn build(
        optic: &Optic,
        objects: &[OpticalObject],
        images: &[OpticalImage],
        visibility: &SceneVisibility,
    ) -> OpticsResult<Self> {
        if objects.len() != images.len() {
            return Err(OpticsError::InvalidParameter(format!(
                "got {} images for {} objects",
                images.len(),
                objects.len()
            )));
        }
        let fallback = optic.position();
        let mut points = vec![ToolJumpPoint {
            kind: JumpPointKind::Optic,
            position: fallback,
            visible: true,
        }];
        points.extend(objects.iter().map(|object| ToolJumpPoint {
            kind: JumpPointKind::Object,
            position: object.emission_point(),
            visible: object.is_visible(),
        }));
        points.extend(objects.iter().zip(images).map(|(object, image)| {
            image.position().map_or(
                ToolJumpPoint {
                    kind: JumpPointKind::Image,
                    position: fallback,
                    visible: false,
                },
                |position| ToolJumpPoint {
                    kind: JumpPointKind::Image,
                    position,
                    visible: object.is_visible()
                        && (image.is_real() || visibility.virtual_images),
                },
            )
        }));
        for (kind, axis_points, shown) in [
            (
                JumpPointKind::FocalPoint,
                optic.focal_points(),
                visibility.focal_points,
            ),
            (
                JumpPointKind::TwoFPoint,
                optic.two_f_points(),
                visibility.two_f_points,
            ),
        ] {
            let (left, right, visible) =
                axis_points.map_or((fallback, fallback, false), |(l, r)| (l, r, shown));
            for position in [left, right] {
                points.push(ToolJumpPoint {
                    kind,
                    position,
                    visible,
                });
            }
        }
        Ok(Self { points })
    }
    /// Returns all jump points in priority order.
    #[must_use]
    pub fn all(&self) -> &[ToolJumpPoint] {
        &self.points
    }
    /// Returns the jump points used in the given [`NavigationContext`] in priority order.
    ///
    /// The result includes invisible points.
    #[must_use]
    pub fn jump_points(&self, context: NavigationContext) -> Vec<&ToolJumpPoint> {
        self.points
            .iter()
            .filter(|p| context.accepts(p.kind()))
            .collect()
    }
    /// Returns the next visible jump point of a [`NavigationContext`] following the point at index `after`.
    ///
    /// The index refers to the sequence returned by [`JumpPointRegistry::jump_points`]. If `after` is `None`, the first
    /// visible point is returned. The search wraps around at the end of the sequence. Returns `None` if no point of the
    /// context is visible.
    #[must_use]
    pub fn next_visible(
        &self,
        context: NavigationContext,
        after: Option<usize>,
    ) -> Option<(usize, &ToolJumpPoint)> {
        let points = self.jump_points(context);
        let nr_of_points = points.len();
        if nr_of_points == 0 {
            return None;
        }
        let start = after.map_or(0, |i| (i + 1) % nr_of_points);
        (0..nr_of_points)
            .map(|offset| (start + offset) % nr_of_points)
            .find(|i| points[*i].is_visible())
            .map(|i| (i, points[i]))
    }
}
