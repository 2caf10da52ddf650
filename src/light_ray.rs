#![warn(missing_docs)]
//! Module for handling traced light rays
//!
//! A [`LightRay`] is an ordered sequence of straight [`LightRaySegment`]s: the incident segment from the object to the
//! optic, one or two emergent segments (split at a real image point) and, for virtual images, a virtual back-extension
//! from the optic to the image point.
use crate::{
    error::{OpticsError, OpticsResult},
    utils::geometry::{ensure_finite_point, to_cm},
};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uom::si::{f64::Length, length::centimeter};

/// Role of a [`LightRaySegment`] within a [`LightRay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// from the object to the optic
    Incident,
    /// refracted or reflected light leaving the optic
    Emergent,
    /// backward extension of an emergent segment to a virtual image (usually drawn dashed)
    VirtualExtension,
}
/// An immutable straight piece of a traced light ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightRaySegment {
    start: Point2<Length>,
    end: Point2<Length>,
    kind: SegmentKind,
}
impl LightRaySegment {
    /// Creates a new [`LightRaySegment`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the start or end point is not finite.
    pub fn new(start: Point2<Length>, end: Point2<Length>, kind: SegmentKind) -> OpticsResult<Self> {
        ensure_finite_point(&start, "segment start point")?;
        ensure_finite_point(&end, "segment end point")?;
        Ok(Self { start, end, kind })
    }
    /// Returns the start point of this [`LightRaySegment`].
    #[must_use]
    pub fn start(&self) -> Point2<Length> {
        self.start
    }
    /// Returns the end point of this [`LightRaySegment`].
    #[must_use]
    pub fn end(&self) -> Point2<Length> {
        self.end
    }
    /// Returns the [`SegmentKind`] of this [`LightRaySegment`].
    #[must_use]
    pub const fn kind(&self) -> SegmentKind {
        self.kind
    }
    /// Returns `true` if this segment is a virtual extension (no light actually travels along it).
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.kind == SegmentKind::VirtualExtension
    }
    /// Returns the geometric length of this [`LightRaySegment`].
    #[must_use]
    pub fn length(&self) -> Length {
        Length::new::<centimeter>((to_cm(&self.end) - to_cm(&self.start)).norm())
    }
}
/// A traced light ray consisting of an ordered sequence of [`LightRaySegment`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LightRay {
    segments: Vec<LightRaySegment>,
}
impl LightRay {
    /// Creates an empty [`LightRay`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Append a segment to this [`LightRay`].
    ///
    /// # Errors
    ///
    /// This function will return an error if an incident segment is added after a non-incident segment.
    pub fn add_segment(&mut self, segment: LightRaySegment) -> OpticsResult<()> {
        if segment.kind() == SegmentKind::Incident
            && self
                .segments
                .iter()
                .any(|s| s.kind() != SegmentKind::Incident)
        {
            return Err(OpticsError::Other(
                "incident segments must precede all other segments".into(),
            ));
        }
        self.segments.push(segment);
        Ok(())
    }
    /// Returns the segments of this [`LightRay`].
    #[must_use]
    pub fn segments(&self) -> &[LightRaySegment] {
        &self.segments
    }
    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }
    /// Returns `true` if the ray has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
    /// Returns all segments of the given [`SegmentKind`].
    pub fn segments_of_kind(&self, kind: SegmentKind) -> impl Iterator<Item = &LightRaySegment> {
        self.segments.iter().filter(move |s| s.kind() == kind)
    }
    /// Returns `true` if the ray contains a virtual extension segment.
    #[must_use]
    pub fn has_virtual_extension(&self) -> bool {
        self.segments.iter().any(LightRaySegment::is_virtual)
    }
}
