// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains the classification of atoms relative to the membrane center.

use crate::{input::AnalysisType, Leaflet};

/// Method used to classify atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Classifier {
    /// Atom is assigned to a leaflet based on the sign of its offset from the membrane center.
    /// The offset itself is sampled.
    Leaflet,
    /// Atom is counted if it is located inside a cylinder spanning the membrane.
    Cylinder { radius: f32, half_height: f32 },
    /// Atom is counted if it is located inside a slab spanning the membrane.
    Slab { half_height: f32 },
}

/// Result of the classification of a single atom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Sample {
    /// Signed offset of the atom from the membrane center.
    Offset(Leaflet, f32),
    /// Atom is inside the region of interest.
    Hit(Leaflet),
}

impl Classifier {
    pub(crate) fn new(analysis_type: &AnalysisType) -> Classifier {
        match analysis_type {
            AnalysisType::LeafletThickness { .. } | AnalysisType::MembraneThickness { .. } => {
                Classifier::Leaflet
            }
            AnalysisType::WaterDefect { radius, height, .. } => Classifier::Cylinder {
                radius: *radius,
                half_height: *height / 2.0,
            },
            AnalysisType::WaterDefectMap { height, .. } => Classifier::Slab {
                half_height: *height / 2.0,
            },
        }
    }

    /// Classify an atom.
    ///
    /// `offset` is the signed distance of the atom from the membrane center along the membrane normal.
    /// `radial` calculates the in-plane distance of the atom from the reference point and is only
    /// called by the cylinder classifier.
    ///
    /// Returns `None` if the atom should not be sampled.
    #[inline]
    pub(crate) fn classify(&self, offset: f32, radial: impl FnOnce() -> f32) -> Option<Sample> {
        let leaflet = Leaflet::from_offset(offset);

        match self {
            Classifier::Leaflet => Some(Sample::Offset(leaflet, offset)),
            Classifier::Cylinder {
                radius,
                half_height,
            } => (offset.abs() < *half_height && radial() < *radius).then_some(Sample::Hit(leaflet)),
            Classifier::Slab { half_height } => {
                (offset.abs() <= *half_height).then_some(Sample::Hit(leaflet))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        assert_eq!(
            Classifier::new(&AnalysisType::membrane_thickness("@membrane", "name PO4")),
            Classifier::Leaflet
        );
        assert_eq!(
            Classifier::new(&AnalysisType::water_defect(
                "@membrane",
                "name W",
                None,
                2.5,
                4.0
            )),
            Classifier::Cylinder {
                radius: 2.5,
                half_height: 2.0
            }
        );
        assert_eq!(
            Classifier::new(&AnalysisType::water_defect_map("@membrane", "name W", 3.0)),
            Classifier::Slab { half_height: 1.5 }
        );
    }

    #[test]
    fn test_leaflet_sign() {
        let classifier = Classifier::Leaflet;

        assert_eq!(
            classifier.classify(1.2, || unreachable!()),
            Some(Sample::Offset(Leaflet::Upper, 1.2))
        );
        assert_eq!(
            classifier.classify(-0.7, || unreachable!()),
            Some(Sample::Offset(Leaflet::Lower, -0.7))
        );
        assert_eq!(
            classifier.classify(0.0, || unreachable!()),
            Some(Sample::Offset(Leaflet::Lower, 0.0))
        );
    }

    #[test]
    fn test_cylinder() {
        let classifier = Classifier::Cylinder {
            radius: 2.5,
            half_height: 2.0,
        };

        assert_eq!(classifier.classify(1.0, || 1.0), Some(Sample::Hit(Leaflet::Upper)));
        assert_eq!(classifier.classify(-1.0, || 2.4), Some(Sample::Hit(Leaflet::Lower)));
        assert_eq!(classifier.classify(0.0, || 0.0), Some(Sample::Hit(Leaflet::Lower)));

        // both conditions are strict
        assert_eq!(classifier.classify(2.0, || 1.0), None);
        assert_eq!(classifier.classify(-2.0, || 1.0), None);
        assert_eq!(classifier.classify(1.0, || 2.5), None);
        assert_eq!(classifier.classify(3.0, || 0.5), None);
        assert_eq!(classifier.classify(0.5, || 3.0), None);
    }

    #[test]
    fn test_slab() {
        let classifier = Classifier::Slab { half_height: 2.0 };

        assert_eq!(classifier.classify(1.0, || unreachable!()), Some(Sample::Hit(Leaflet::Upper)));
        assert_eq!(classifier.classify(-1.9, || unreachable!()), Some(Sample::Hit(Leaflet::Lower)));

        // inclusive
        assert_eq!(classifier.classify(2.0, || unreachable!()), Some(Sample::Hit(Leaflet::Upper)));
        assert_eq!(classifier.classify(-2.0, || unreachable!()), Some(Sample::Hit(Leaflet::Lower)));

        assert_eq!(classifier.classify(2.01, || unreachable!()), None);
        assert_eq!(classifier.classify(-3.0, || unreachable!()), None);
    }
}
