// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! This module contains the implementation of the analysis logic.

use groan_rs::{
    prelude::{ProgressPrinter, XtcReader},
    system::System,
};

use crate::{
    auxiliary::{create_group, Role},
    errors::{AnalysisError, ConfigError},
    input::Analysis,
    presentation::{check_output_files, AnalysisResults},
    TILES_PER_NM,
};

use engine::FrameEngine;
use grid::Grid;

mod accumulator;
mod classify;
mod engine;
mod grid;
mod pbc;
mod reduce;

impl Analysis {
    /// Perform the analysis.
    /// Returns the results which can then be written into output files using `AnalysisResults::write`.
    pub fn run(&self) -> Result<AnalysisResults, Box<dyn std::error::Error + Send + Sync>> {
        let mut system = System::from_file(self.structure())?;
        log::info!("Read molecular system from '{}'.", self.structure());

        if let Some(ndx) = self.index() {
            system.read_ndx(ndx)?;
            log::info!(
                "Read {} group(s) from ndx file '{}'.",
                system.get_n_groups() - 2,
                ndx
            );
        }

        let mut engine = self.prepare_engine(&system)?;
        self.prepare_groups(&mut system, &engine)?;
        self.info();

        // check the output files before reading any frame
        check_output_files(&self.output_files())?;

        let engine = match self.trajectory() {
            None => {
                log::info!("No trajectory file provided. Analyzing the input structure...");
                engine.process_frame(&system)?;
                engine
            }
            Some(trajectory) => self.read_trajectory(&system, trajectory, engine)?,
        };

        log::info!("Analyzed {} frame(s).", engine.n_frames());

        let results = engine
            .reduce(self.analysis_type(), self.min_samples())?
            .with_output(self.output_or_default(), self.overwrite());
        results.info();

        Ok(results)
    }

    /// Construct the grid from the simulation box of the input structure and create an empty engine.
    fn prepare_engine(
        &self,
        system: &System,
    ) -> Result<FrameEngine, Box<dyn std::error::Error + Send + Sync>> {
        let simbox = pbc::check_box(system.get_box())?;
        let plane = self.membrane_normal().perpendicular();
        let (length_x, length_y) = plane.dimensions_from_simbox(simbox);

        let [span_x, span_y] = self.grid();
        let span_x = span_x
            .resolve(length_x)
            .map_err(ConfigError::InvalidGrid)?;
        let span_y = span_y
            .resolve(length_y)
            .map_err(ConfigError::InvalidGrid)?;

        let grid = Grid::new(span_x, span_y, TILES_PER_NM)?;
        log::info!(
            "Grid of {} x {} tiles constructed.",
            grid.n_cols(),
            grid.n_rows()
        );

        Ok(FrameEngine::new(
            self.analysis_type(),
            self.membrane_normal(),
            grid,
        )?)
    }

    /// Select atoms for all roles needed by the engine.
    fn prepare_groups(
        &self,
        system: &mut System,
        engine: &FrameEngine,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let analysis_type = self.analysis_type();

        let n_lipids = create_group(system, Role::Lipids, analysis_type.lipids())?;
        log::info!(
            "Detected {} lipid atoms using the query '{}'.",
            n_lipids,
            analysis_type.lipids()
        );

        let n_targets = create_group(system, engine.targets(), analysis_type.targets())?;
        log::info!(
            "Detected {} {} atoms using the query '{}'.",
            n_targets,
            engine.targets(),
            analysis_type.targets()
        );

        if let (Some(role), Some(query)) = (engine.reference(), analysis_type.protein()) {
            let n_reference = create_group(system, role, query)?;
            log::info!(
                "Detected {} {} atoms using the query '{}'.",
                n_reference,
                role,
                query
            );
        }

        Ok(())
    }

    /// Analyze all requested frames of the trajectory.
    fn read_trajectory(
        &self,
        system: &System,
        trajectory: &str,
        engine: FrameEngine,
    ) -> Result<FrameEngine, Box<dyn std::error::Error + Send + Sync>> {
        let progress_printer = if self.silent() {
            None
        } else {
            Some(ProgressPrinter::new().with_print_freq((100 / self.n_threads()).max(1)))
        };

        log::info!(
            "Will read trajectory file '{}' (start: {} ps, end: {} ps, step: {}).",
            trajectory,
            self.begin(),
            self.end(),
            self.step()
        );

        log::info!(
            "Performing the analysis using {} thread(s)...",
            self.n_threads()
        );

        let engine = system.traj_iter_map_reduce::<XtcReader, FrameEngine, AnalysisError>(
            trajectory,
            self.n_threads(),
            analyze_frame,
            engine,
            None,
            Some(self.begin()),
            Some(self.end()),
            Some(self.step()),
            progress_printer,
        )?;

        Ok(engine)
    }
}

/// Analyze a single trajectory frame.
fn analyze_frame(system: &System, engine: &mut FrameEngine) -> Result<(), AnalysisError> {
    engine.process_frame(system)
}
