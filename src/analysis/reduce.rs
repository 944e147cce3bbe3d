// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains the conversion of the accumulated samples into the final results.

use crate::{
    errors::AnalysisError,
    input::{AnalysisType, Plane},
    presentation::{
        AnalysisResults, GridResults, LeafletThicknessResults, MapKind, TileValue,
        WaterDefectResults,
    },
    PANIC_MESSAGE,
};

use super::{
    accumulator::Accumulator,
    engine::FrameEngine,
    grid::{Grid, TileIndex},
};

impl FrameEngine {
    /// Convert the samples collected by the engine into the results of the analysis.
    ///
    /// ## Errors
    /// Returns `AnalysisError::NoFrames` if no frames have been processed.
    pub(crate) fn reduce(
        self,
        analysis_type: &AnalysisType,
        min_samples: usize,
    ) -> Result<AnalysisResults, AnalysisError> {
        let grid = self.grid().clone();
        let plane = self.normal().perpendicular();
        let (accumulator, n_frames) = self.into_samples();

        if n_frames == 0 {
            return Err(AnalysisError::NoFrames);
        }

        let map = |kind: MapKind, value: &dyn Fn(TileIndex) -> Option<f32>| {
            reduce_grid(&grid, plane, kind, n_frames, min_samples, value)
        };

        let results = match (analysis_type, accumulator) {
            (AnalysisType::LeafletThickness { .. }, Accumulator::Leaflets { upper, lower }) => {
                AnalysisResults::LeafletThickness(LeafletThicknessResults::new(
                    map(MapKind::UpperLeafletThickness, &|tile: TileIndex| {
                        upper.get(tile).mean(min_samples).map(f32::abs)
                    }),
                    map(MapKind::LowerLeafletThickness, &|tile: TileIndex| {
                        lower.get(tile).mean(min_samples).map(f32::abs)
                    }),
                ))
            }
            (AnalysisType::MembraneThickness { .. }, Accumulator::Leaflets { upper, lower }) => {
                AnalysisResults::MembraneThickness(map(MapKind::MembraneThickness, &|tile: TileIndex| {
                    match (
                        upper.get(tile).mean(min_samples),
                        lower.get(tile).mean(min_samples),
                    ) {
                        (Some(upper), Some(lower)) => Some(upper - lower),
                        _ => None,
                    }
                }))
            }
            (AnalysisType::WaterDefectMap { .. }, Accumulator::Hits(hits)) => {
                AnalysisResults::WaterDefectMap(map(MapKind::WaterDefect, &|tile: TileIndex| {
                    Some(*hits.get(tile) as f32 / n_frames as f32)
                }))
            }
            (AnalysisType::WaterDefect { .. }, Accumulator::Counts { upper, lower }) => {
                let n = n_frames as f32;
                AnalysisResults::WaterDefect(WaterDefectResults::new(
                    n_frames,
                    upper as f32 / n,
                    lower as f32 / n,
                    (upper + lower) as f32 / n,
                ))
            }
            (analysis_type, _) => panic!(
                "FATAL MEMGRID ERROR | FrameEngine::reduce | Accumulator does not match the analysis type '{}'. {}",
                analysis_type.name(),
                PANIC_MESSAGE
            ),
        };

        Ok(results)
    }
}

/// Calculate values for all tiles of the grid and their average.
fn reduce_grid(
    grid: &Grid,
    plane: Plane,
    kind: MapKind,
    n_frames: usize,
    min_samples: usize,
    value: &dyn Fn(TileIndex) -> Option<f32>,
) -> GridResults {
    let tiles: Vec<TileValue> = grid
        .tiles()
        .map(|tile| {
            let (x, y) = grid.tile_coordinates(tile);
            TileValue::new(x, y, value(tile))
        })
        .collect();

    let (n_valid, average) = grand_average(&tiles);
    if average.is_none() {
        log::warn!(
            "No tile of the {} map contains at least {} sample(s). Average is undefined.",
            kind,
            min_samples
        );
    }

    GridResults::new(
        kind,
        plane,
        grid.span_x(),
        grid.span_y(),
        tiles,
        n_valid,
        average,
        n_frames,
    )
}

/// Calculate average over tiles with a value.
/// Tiles without a value are ignored.
fn grand_average(tiles: &[TileValue]) -> (usize, Option<f32>) {
    let (n_valid, sum) = tiles
        .iter()
        .filter_map(|tile| tile.value())
        .fold((0usize, 0.0f64), |(n, sum), value| (n + 1, sum + value as f64));

    if n_valid == 0 {
        (0, None)
    } else {
        (n_valid, Some((sum / n_valid as f64) as f32))
    }
}
