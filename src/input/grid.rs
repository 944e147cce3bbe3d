// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains structures specifying the span and orientation of the grid.

use std::fmt;

use groan_rs::prelude::{Dimension, SimBox, Vector3D};
use serde::Deserialize;

use crate::errors::GridError;

/// Orientation of the grid. Corresponds to the plane in which the membrane is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Plane {
    #[default]
    #[serde(alias = "xy")]
    XY,
    #[serde(alias = "xz")]
    XZ,
    #[serde(alias = "yz")]
    YZ,
}

impl Plane {
    /// Get the dimensions of the grid from the simulation box dimensions.
    pub(crate) fn dimensions_from_simbox(&self, simbox: &SimBox) -> (f32, f32) {
        match self {
            Plane::XY => (simbox.x, simbox.y),
            Plane::XZ => (simbox.x, simbox.z),
            Plane::YZ => (simbox.z, simbox.y),
        }
    }

    /// Get projection of the position to the plane.
    #[inline(always)]
    pub(crate) fn projection2plane(&self, position: &Vector3D) -> (f32, f32) {
        match self {
            Plane::XY => (position.x, position.y),
            Plane::XZ => (position.x, position.z),
            Plane::YZ => (position.z, position.y),
        }
    }

    /// Get labels for the axes of the grid.
    pub(crate) fn get_labels(&self) -> (char, char) {
        match self {
            Plane::XY => ('x', 'y'),
            Plane::XZ => ('x', 'z'),
            Plane::YZ => ('z', 'y'),
        }
    }
}

impl From<Plane> for Dimension {
    /// Convert from Plane to Dimension.
    fn from(value: Plane) -> Self {
        match value {
            Plane::XY => Dimension::XY,
            Plane::XZ => Dimension::XZ,
            Plane::YZ => Dimension::YZ,
        }
    }
}

impl fmt::Display for Plane {
    /// Print Plane.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::XY => write!(f, "xy"),
            Self::XZ => write!(f, "xz"),
            Self::YZ => write!(f, "yz"),
        }
    }
}

/// Specifies the span of the grid along one of its axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum GridSpan {
    /// Span goes from zero to the size of the simulation box of the input structure.
    #[default]
    Auto,
    /// Span is directly provided.
    Manual { start: f32, end: f32 },
}

impl GridSpan {
    /// Create a new valid `GridSpan` structure from the provided floats.
    ///
    /// This performs sanity checks, making sure that start is lower than end.
    pub fn manual(start: f32, end: f32) -> Result<GridSpan, GridError> {
        let span = GridSpan::Manual { start, end };
        span.validate()?;
        Ok(span)
    }

    /// Check that the span is not empty or inverted.
    pub(crate) fn validate(&self) -> Result<(), GridError> {
        match self {
            GridSpan::Auto => Ok(()),
            GridSpan::Manual { start, end } => check_span(*start, *end),
        }
    }

    /// Get the concrete span, using the provided box length for an automatic span.
    pub(crate) fn resolve(&self, box_length: f32) -> Result<(f32, f32), GridError> {
        let (start, end) = match self {
            GridSpan::Auto => (0.0, box_length),
            GridSpan::Manual { start, end } => (*start, *end),
        };

        check_span(start, end)?;
        Ok((start, end))
    }
}

/// Minimum of the span must be strictly lower than its maximum.
fn check_span(start: f32, end: f32) -> Result<(), GridError> {
    // also rejects NaN
    if start < end {
        Ok(())
    } else {
        Err(GridError::InvalidSpan(start, end))
    }
}

impl fmt::Display for GridSpan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Manual { start, end } => write!(f, "{:.1} - {:.1} nm", start, end),
        }
    }
}
