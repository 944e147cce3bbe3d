// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains structures accumulating the samples collected during the analysis.

use std::ops::Add;

use getset::CopyGetters;

use crate::{errors::GridError, input::AnalysisType, Leaflet, PANIC_MESSAGE};

use super::{
    classify::Sample,
    grid::{Grid, TileGrid, TileIndex},
};

/// Sum of values and the number of samples collected for a single tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, CopyGetters)]
pub(crate) struct TileSum {
    #[getset(get_copy = "pub(crate)")]
    sum: f32,
    #[getset(get_copy = "pub(crate)")]
    samples: usize,
}

impl TileSum {
    #[inline(always)]
    pub(crate) fn add_sample(&mut self, value: f32) {
        self.sum += value;
        self.samples += 1;
    }

    /// Calculate the mean of the collected values.
    /// Returns `None` if not enough samples have been collected.
    #[inline]
    pub(crate) fn mean(&self, min_samples: usize) -> Option<f32> {
        if self.samples < min_samples || self.samples == 0 {
            None
        } else {
            Some(self.sum / self.samples as f32)
        }
    }
}

impl Add for TileSum {
    type Output = TileSum;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        TileSum {
            sum: self.sum + rhs.sum,
            samples: self.samples + rhs.samples,
        }
    }
}

/// Storage for the collected samples.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Accumulator {
    /// Offsets from the membrane center collected for each tile and each leaflet.
    Leaflets {
        upper: TileGrid<TileSum>,
        lower: TileGrid<TileSum>,
    },
    /// Number of hits for each tile.
    Hits(TileGrid<usize>),
    /// Total number of hits for each leaflet.
    Counts { upper: usize, lower: usize },
}

impl Accumulator {
    /// Allocate an empty accumulator for the specified analysis.
    pub(crate) fn new(analysis_type: &AnalysisType, grid: &Grid) -> Result<Accumulator, GridError> {
        match analysis_type {
            AnalysisType::LeafletThickness { .. } | AnalysisType::MembraneThickness { .. } => {
                Ok(Accumulator::Leaflets {
                    upper: TileGrid::new(grid)?,
                    lower: TileGrid::new(grid)?,
                })
            }
            AnalysisType::WaterDefectMap { .. } => Ok(Accumulator::Hits(TileGrid::new(grid)?)),
            AnalysisType::WaterDefect { .. } => Ok(Accumulator::Counts { upper: 0, lower: 0 }),
        }
    }

    /// Are the samples collected for individual tiles of the grid?
    #[inline(always)]
    pub(crate) fn is_spatial(&self) -> bool {
        !matches!(self, Accumulator::Counts { .. })
    }

    /// Add a sample. `tile` must be provided for spatial accumulators.
    #[inline]
    pub(crate) fn push_sample(&mut self, tile: Option<TileIndex>, sample: Sample) {
        match (self, sample, tile) {
            (Accumulator::Leaflets { upper, lower }, Sample::Offset(leaflet, offset), Some(tile)) => {
                match leaflet {
                    Leaflet::Upper => upper.get_mut(tile).add_sample(offset),
                    Leaflet::Lower => lower.get_mut(tile).add_sample(offset),
                }
            }
            (Accumulator::Hits(hits), Sample::Hit(_), Some(tile)) => *hits.get_mut(tile) += 1,
            (Accumulator::Counts { upper, lower }, Sample::Hit(leaflet), _) => match leaflet {
                Leaflet::Upper => *upper += 1,
                Leaflet::Lower => *lower += 1,
            },
            (acc, sample, tile) => panic!(
                "FATAL MEMGRID ERROR | Accumulator::push_sample | Sample '{:?}' (tile '{:?}') is incompatible with accumulator '{}'. {}",
                sample,
                tile,
                acc.name(),
                PANIC_MESSAGE
            ),
        }
    }

    fn name(&self) -> &str {
        match self {
            Accumulator::Leaflets { .. } => "Leaflets",
            Accumulator::Hits(_) => "Hits",
            Accumulator::Counts { .. } => "Counts",
        }
    }
}

impl Add for Accumulator {
    type Output = Accumulator;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (
                Accumulator::Leaflets {
                    upper: upper1,
                    lower: lower1,
                },
                Accumulator::Leaflets {
                    upper: upper2,
                    lower: lower2,
                },
            ) => Accumulator::Leaflets {
                upper: upper1 + upper2,
                lower: lower1 + lower2,
            },
            (Accumulator::Hits(hits1), Accumulator::Hits(hits2)) => {
                Accumulator::Hits(hits1 + hits2)
            }
            (
                Accumulator::Counts {
                    upper: upper1,
                    lower: lower1,
                },
                Accumulator::Counts {
                    upper: upper2,
                    lower: lower2,
                },
            ) => Accumulator::Counts {
                upper: upper1 + upper2,
                lower: lower1 + lower2,
            },
            (lhs, rhs) => panic!(
                "FATAL MEMGRID ERROR | Accumulator::add | Accumulators '{}' and '{}' can not be merged. {}",
                lhs.name(),
                rhs.name(),
                PANIC_MESSAGE
            ),
        }
    }
}
