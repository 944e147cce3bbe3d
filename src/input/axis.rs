// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains the implementation of the `Axis` structure and its methods.

use std::fmt;

use groan_rs::prelude::Dimension;
use serde::Deserialize;

use super::grid::Plane;

/// Represents the X, Y, or Z axis.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Axis {
    #[serde(alias = "x")]
    X,
    #[serde(alias = "y")]
    Y,
    #[default]
    #[serde(alias = "z")]
    Z,
}

impl Axis {
    /// Return a plane perpendicular to this axis.
    pub(crate) fn perpendicular(&self) -> Plane {
        match self {
            Axis::X => Plane::YZ,
            Axis::Y => Plane::XZ,
            Axis::Z => Plane::XY,
        }
    }
}

impl fmt::Display for Axis {
    /// Print Axis.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

impl From<Axis> for Dimension {
    /// Convert from Axis to Dimension.
    fn from(value: Axis) -> Self {
        match value {
            Axis::X => Dimension::X,
            Axis::Y => Dimension::Y,
            Axis::Z => Dimension::Z,
        }
    }
}
