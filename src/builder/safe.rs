//! Type-state wrappers over [`PosePathBuilder`] that only admit directive
//! sequences with a continuous heading rate.
//!
//! A tangent, constant or linear segment fixes its own rates, so the segment
//! after it must be a spline that can absorb them. The wrappers encode that
//! rule in their method sets:
//!
//! ```compile_fail
//! use std::sync::Arc;
//! use roadkit::builder::{PositionPathBuilder, SafePosePathBuilder};
//! use roadkit::math::{Rotation2, Vector2};
//!
//! let path = PositionPathBuilder::new(Vector2::zeros(), Rotation2::IDENTITY)
//!     .forward(10.0)?
//!     .build()?;
//! let restricted = SafePosePathBuilder::new(Arc::new(path), Rotation2::IDENTITY)
//!     .constant_until(4.0)?;
//! // only spline directives may follow a constant segment
//! let _ = restricted.constant_until(8.0)?;
//! # Ok::<(), roadkit::RoadkitError>(())
//! ```

use crate::error::Result;
use crate::math::Rotation2;
use crate::path::{CompositePosePath, SharedPositionPath};

use super::PosePathBuilder;

/// Pose path builder that accepts every heading directive.
///
/// Non-spline directives hand back a [`RestrictedPosePathBuilder`].
#[derive(Debug, Clone)]
pub struct SafePosePathBuilder {
    inner: PosePathBuilder,
}

impl SafePosePathBuilder {
    #[must_use]
    pub fn new(path: SharedPositionPath, begin_heading: Rotation2) -> Self {
        Self {
            inner: PosePathBuilder::new(path, begin_heading),
        }
    }

    #[must_use]
    pub fn from_builder(inner: PosePathBuilder) -> Self {
        Self { inner }
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::tangent_until`].
    pub fn tangent_until(&self, disp: f64) -> Result<RestrictedPosePathBuilder> {
        Ok(RestrictedPosePathBuilder::new(self.inner.tangent_until(disp)?))
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::constant_until`].
    pub fn constant_until(&self, disp: f64) -> Result<RestrictedPosePathBuilder> {
        Ok(RestrictedPosePathBuilder::new(self.inner.constant_until(disp)?))
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::linear_until`].
    pub fn linear_until(&self, disp: f64, heading: Rotation2) -> Result<RestrictedPosePathBuilder> {
        Ok(RestrictedPosePathBuilder::new(
            self.inner.linear_until(disp, heading)?,
        ))
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::spline_until`].
    pub fn spline_until(&self, disp: f64, heading: Rotation2) -> Result<SafePosePathBuilder> {
        Ok(Self::from_builder(self.inner.spline_until(disp, heading)?))
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::tangent_until_end`].
    pub fn tangent_until_end(&self) -> Result<CompositePosePath> {
        self.inner.tangent_until_end()
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::constant_until_end`].
    pub fn constant_until_end(&self) -> Result<CompositePosePath> {
        self.inner.constant_until_end()
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::linear_until_end`].
    pub fn linear_until_end(&self, heading: Rotation2) -> Result<CompositePosePath> {
        self.inner.linear_until_end(heading)
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::spline_until_end`].
    pub fn spline_until_end(&self, heading: Rotation2) -> Result<CompositePosePath> {
        self.inner.spline_until_end(heading)
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::build`].
    pub fn build(&self) -> Result<CompositePosePath> {
        self.inner.build()
    }
}

/// Pose path builder right after a tangent, constant or linear segment:
/// only a spline segment or finishing the path may follow.
#[derive(Debug, Clone)]
pub struct RestrictedPosePathBuilder {
    inner: PosePathBuilder,
}

impl RestrictedPosePathBuilder {
    fn new(inner: PosePathBuilder) -> Self {
        Self { inner }
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::spline_until`].
    pub fn spline_until(&self, disp: f64, heading: Rotation2) -> Result<SafePosePathBuilder> {
        Ok(SafePosePathBuilder::from_builder(
            self.inner.spline_until(disp, heading)?,
        ))
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::spline_until_end`].
    pub fn spline_until_end(&self, heading: Rotation2) -> Result<CompositePosePath> {
        self.inner.spline_until_end(heading)
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::build`].
    pub fn build(&self) -> Result<CompositePosePath> {
        self.inner.build()
    }
}
