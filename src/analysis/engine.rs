// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains the engine classifying atoms and accumulating samples frame by frame.

use std::ops::Add;

use getset::{CopyGetters, Getters};
use groan_rs::system::{ParallelTrajData, System};

use crate::{
    auxiliary::Role,
    errors::{AnalysisError, GridError},
    input::{AnalysisType, Axis},
    PANIC_MESSAGE,
};

use super::{
    accumulator::Accumulator,
    classify::Classifier,
    grid::Grid,
    pbc::{box_center, check_box, group_center},
};

/// Engine processing the frames of the simulation.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub(crate) struct FrameEngine {
    /// ID of the thread working with this engine.
    thread_id: usize,
    #[getset(get = "pub(crate)")]
    grid: Grid,
    #[getset(get_copy = "pub(crate)")]
    normal: Axis,
    classifier: Classifier,
    #[getset(get = "pub(crate)")]
    accumulator: Accumulator,
    /// Role of the atoms that are classified.
    #[getset(get_copy = "pub(crate)")]
    targets: Role,
    /// Role of the atoms defining the reference point.
    /// If `None`, the center of the simulation box is used as the reference point.
    #[getset(get_copy = "pub(crate)")]
    reference: Option<Role>,
    /// Number of frames processed by this engine.
    #[getset(get_copy = "pub(crate)")]
    n_frames: usize,
}

impl FrameEngine {
    /// Create a new engine with empty accumulator.
    pub(crate) fn new(
        analysis_type: &AnalysisType,
        normal: Axis,
        grid: Grid,
    ) -> Result<FrameEngine, GridError> {
        let accumulator = Accumulator::new(analysis_type, &grid)?;

        let targets = match analysis_type {
            AnalysisType::LeafletThickness { .. } | AnalysisType::MembraneThickness { .. } => {
                Role::Phosphates
            }
            AnalysisType::WaterDefect { .. } | AnalysisType::WaterDefectMap { .. } => Role::Water,
        };

        let reference = analysis_type.protein().map(|_| Role::Protein);

        Ok(FrameEngine {
            thread_id: 0,
            grid,
            normal,
            classifier: Classifier::new(analysis_type),
            accumulator,
            targets,
            reference,
            n_frames: 0,
        })
    }

    /// Classify all target atoms of the current frame of the system and accumulate the samples.
    /// Groups for all the roles used by the engine must already exist in the system.
    pub(crate) fn process_frame(&mut self, system: &System) -> Result<(), AnalysisError> {
        let simbox = check_box(system.get_box())?;
        let plane = self.normal.perpendicular();

        let membrane_center = group_center(system, Role::Lipids)?;
        let reference = match self.reference {
            Some(role) => group_center(system, role)?,
            None => box_center(simbox),
        };

        let spatial = self.accumulator.is_spatial();

        let targets = system
            .group_iter(self.targets.group_name())
            .unwrap_or_else(|_| {
                panic!(
                    "FATAL MEMGRID ERROR | FrameEngine::process_frame | Group for {} atoms should exist. {}",
                    self.targets, PANIC_MESSAGE
                )
            });

        for atom in targets {
            let position = atom
                .get_position()
                .ok_or_else(|| AnalysisError::UndefinedPosition(atom.get_index()))?;

            let tile = if spatial {
                let (x, y) = plane.projection2plane(position);
                match self.grid.tile_at(x, y) {
                    Some(tile) => Some(tile),
                    None => continue,
                }
            } else {
                None
            };

            let offset = position.distance(&membrane_center, self.normal.into(), simbox);
            let radial = || position.distance(&reference, plane.into(), simbox);

            if let Some(sample) = self.classifier.classify(offset, radial) {
                self.accumulator.push_sample(tile, sample);
            }
        }

        self.n_frames += 1;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn accumulator_mut(&mut self) -> &mut Accumulator {
        &mut self.accumulator
    }

    /// Decompose the engine into the accumulated samples and the number of processed frames.
    pub(crate) fn into_samples(self) -> (Accumulator, usize) {
        (self.accumulator, self.n_frames)
    }
}

impl Add for FrameEngine {
    type Output = FrameEngine;

    /// Merge two engines that processed different frames.
    fn add(self, rhs: Self) -> Self::Output {
        FrameEngine {
            thread_id: self.thread_id,
            grid: self.grid,
            normal: self.normal,
            classifier: self.classifier,
            accumulator: self.accumulator + rhs.accumulator,
            targets: self.targets,
            reference: self.reference,
            n_frames: self.n_frames + rhs.n_frames,
        }
    }
}

impl ParallelTrajData for FrameEngine {
    fn reduce(mut data: Vec<Self>) -> Self {
        // merge in the order of threads so that the floating point sums are reproducible
        data.sort_by(|a, b| a.thread_id.cmp(&b.thread_id));

        let mut iter = data.into_iter();
        let first = iter.next().unwrap_or_else(|| {
            panic!(
                "FATAL MEMGRID ERROR | FrameEngine::reduce | Vector should not be empty. {}",
                PANIC_MESSAGE
            )
        });

        iter.fold(first, |acc, engine| acc + engine)
    }

    fn initialize(&mut self, thread_id: usize) {
        self.thread_id = thread_id;
    }
}

#[cfg(test)]
pub(super) mod tests {
    use approx::assert_relative_eq;
    use groan_rs::prelude::{Atom, SimBox, Vector3D};

    use super::*;

    /// Test utility. Construct a system with groups for lipids, targets and protein.
    /// Target atoms with `None` position have undefined position.
    /// Protein group is only created if any protein atoms are provided.
    pub(in crate::analysis) fn build_system(
        simbox: [f32; 3],
        membrane: &[[f32; 3]],
        targets: (Role, &[Option<[f32; 3]>]),
        protein: &[[f32; 3]],
    ) -> System {
        let vector = |pos: &[f32; 3]| Vector3D::new(pos[0], pos[1], pos[2]);

        let mut atoms = Vec::new();
        for pos in membrane {
            atoms.push(Atom::new(1, "MEM", 1, "A").with_position(vector(pos)));
        }

        for pos in targets.1 {
            let atom = Atom::new(2, "TGT", 1, "A");
            match pos {
                Some(pos) => atoms.push(atom.with_position(vector(pos))),
                None => atoms.push(atom),
            }
        }

        for pos in protein {
            atoms.push(Atom::new(3, "PRT", 1, "A").with_position(vector(pos)));
        }

        let mut system = System::new("test", atoms, Some(SimBox::from(simbox)));
        system
            .group_create(Role::Lipids.group_name(), "resname MEM")
            .unwrap();
        system
            .group_create(targets.0.group_name(), "resname TGT")
            .unwrap();
        if !protein.is_empty() {
            system
                .group_create(Role::Protein.group_name(), "resname PRT")
                .unwrap();
        }

        system
    }

    const MEMBRANE: [[f32; 3]; 3] = [[2.0, 2.0, 4.0], [8.0, 8.0, 6.0], [3.0, 7.0, 5.0]];

    /// Test utility. Get the position of the membrane center along z.
    fn membrane_center() -> f32 {
        let system = build_system([10.0, 10.0, 10.0], &MEMBRANE, (Role::Water, &[]), &[]);
        group_center(&system, Role::Lipids).unwrap().z
    }

    fn grid() -> Grid {
        Grid::new((0.0, 10.0), (0.0, 10.0), 10).unwrap()
    }

    fn thickness_engine() -> FrameEngine {
        FrameEngine::new(
            &AnalysisType::membrane_thickness("@membrane", "name PO4"),
            Axis::Z,
            grid(),
        )
        .unwrap()
    }

    #[test]
    fn test_new() {
        let engine = thickness_engine();
        assert_eq!(engine.targets(), Role::Phosphates);
        assert_eq!(engine.reference(), None);
        assert_eq!(engine.n_frames(), 0);

        let engine = FrameEngine::new(
            &AnalysisType::water_defect("@membrane", "name W", Some("@protein"), 2.5, 4.0),
            Axis::Z,
            grid(),
        )
        .unwrap();
        assert_eq!(engine.targets(), Role::Water);
        assert_eq!(engine.reference(), Some(Role::Protein));
    }

    #[test]
    fn test_process_frame_leaflets() {
        let mut engine = thickness_engine();
        let center = membrane_center();

        let system = build_system(
            [10.0, 10.0, 10.0],
            &MEMBRANE,
            (
                Role::Phosphates,
                &[
                    Some([4.0, 4.0, 6.0]),
                    Some([4.0, 4.0, 4.0]),
                    // exactly at the membrane center
                    Some([6.0, 4.0, center]),
                ],
            ),
            &[],
        );

        engine.process_frame(&system).unwrap();
        assert_eq!(engine.n_frames(), 1);

        let tile = engine.grid().tile_at(4.0, 4.0).unwrap();
        let center_tile = engine.grid().tile_at(6.0, 4.0).unwrap();

        match engine.accumulator() {
            Accumulator::Leaflets { upper, lower } => {
                assert_eq!(upper.get(tile).samples(), 1);
                assert_relative_eq!(upper.get(tile).sum(), 1.0, epsilon = 1e-4);
                assert_eq!(lower.get(tile).samples(), 1);
                assert_relative_eq!(lower.get(tile).sum(), -1.0, epsilon = 1e-4);

                assert_eq!(upper.get(center_tile).samples(), 0);
                assert_eq!(lower.get(center_tile).samples(), 1);
            }
            _ => panic!("Incorrect accumulator."),
        }
    }

    #[test]
    fn test_process_frame_outside_grid() {
        let mut engine = FrameEngine::new(
            &AnalysisType::membrane_thickness("@membrane", "name PO4"),
            Axis::Z,
            Grid::new((2.0, 5.0), (2.0, 5.0), 10).unwrap(),
        )
        .unwrap();

        let system = build_system(
            [10.0, 10.0, 10.0],
            &MEMBRANE,
            (
                Role::Phosphates,
                &[
                    Some([1.9, 3.0, 6.0]),
                    Some([3.0, 5.1, 6.0]),
                    // exactly at the edge
                    Some([5.0, 5.0, 6.0]),
                ],
            ),
            &[],
        );

        engine.process_frame(&system).unwrap();

        match engine.accumulator() {
            Accumulator::Leaflets { upper, lower } => {
                let total: usize = engine
                    .grid()
                    .tiles()
                    .map(|t| upper.get(t).samples() + lower.get(t).samples())
                    .sum();
                assert_eq!(total, 1);

                let edge = engine.grid().tile_at(5.0, 5.0).unwrap();
                assert_eq!(upper.get(edge).samples(), 1);
            }
            _ => panic!("Incorrect accumulator."),
        }
    }

    #[test]
    fn test_process_frame_periodic_membrane() {
        let mut engine = thickness_engine();

        // membrane is split across the periodic boundary along z
        let system = build_system(
            [10.0, 10.0, 10.0],
            &[[2.0, 2.0, 9.0], [8.0, 8.0, 1.0]],
            (
                Role::Phosphates,
                &[Some([4.0, 4.0, 1.5]), Some([4.0, 4.0, 8.5])],
            ),
            &[],
        );

        engine.process_frame(&system).unwrap();
        let tile = engine.grid().tile_at(4.0, 4.0).unwrap();

        match engine.accumulator() {
            Accumulator::Leaflets { upper, lower } => {
                assert_eq!(upper.get(tile).samples(), 1);
                assert_relative_eq!(upper.get(tile).sum(), 1.5, epsilon = 1e-4);
                assert_eq!(lower.get(tile).samples(), 1);
                assert_relative_eq!(lower.get(tile).sum(), -1.5, epsilon = 1e-4);
            }
            _ => panic!("Incorrect accumulator."),
        }
    }

    #[test]
    fn test_process_frame_cylinder() {
        let mut engine = FrameEngine::new(
            &AnalysisType::water_defect("@membrane", "name W", None, 2.5, 4.0),
            Axis::Z,
            grid(),
        )
        .unwrap();

        let center = membrane_center();

        let system = build_system(
            [10.0, 10.0, 10.0],
            &MEMBRANE,
            (
                Role::Water,
                &[
                    // inside, upper
                    Some([5.0, 5.0, 6.5]),
                    // inside, lower
                    Some([6.0, 5.0, 4.0]),
                    // exactly at the center, lower
                    Some([5.0, 5.0, center]),
                    // too far from the box center
                    Some([8.0, 5.0, 5.0]),
                    // too far from the membrane center
                    Some([5.0, 5.0, 7.5]),
                ],
            ),
            &[],
        );

        engine.process_frame(&system).unwrap();
        assert_eq!(
            engine.accumulator(),
            &Accumulator::Counts { upper: 1, lower: 2 }
        );
    }

    #[test]
    fn test_process_frame_cylinder_protein() {
        let mut engine = FrameEngine::new(
            &AnalysisType::water_defect("@membrane", "name W", Some("@protein"), 1.0, 4.0),
            Axis::Z,
            grid(),
        )
        .unwrap();

        // protein is split across the periodic boundary along x
        let system = build_system(
            [10.0, 10.0, 10.0],
            &MEMBRANE,
            (
                Role::Water,
                &[
                    Some([0.5, 5.0, 6.0]),
                    Some([9.5, 5.2, 4.0]),
                    Some([5.0, 5.0, 5.0]),
                ],
            ),
            &[[9.8, 5.0, 5.0], [0.2, 5.0, 5.0]],
        );

        engine.process_frame(&system).unwrap();
        assert_eq!(
            engine.accumulator(),
            &Accumulator::Counts { upper: 1, lower: 1 }
        );
    }

    #[test]
    fn test_process_frame_empty_membrane() {
        let mut engine = thickness_engine();
        let system = build_system(
            [10.0, 10.0, 10.0],
            &[],
            (Role::Phosphates, &[Some([4.0, 4.0, 6.0])]),
            &[],
        );

        match engine.process_frame(&system) {
            Err(AnalysisError::EmptyCenter(role)) => assert_eq!(role, "lipid"),
            Ok(_) => panic!("Function should have failed."),
            Err(e) => panic!("Unexpected error type returned {}", e),
        }
    }

    #[test]
    fn test_process_frame_undefined_position() {
        let mut engine = thickness_engine();
        let system = build_system(
            [10.0, 10.0, 10.0],
            &MEMBRANE,
            (Role::Phosphates, &[Some([4.0, 4.0, 6.0]), None]),
            &[],
        );

        match engine.process_frame(&system) {
            Err(AnalysisError::UndefinedPosition(index)) => assert_eq!(index, 4),
            Ok(_) => panic!("Function should have failed."),
            Err(e) => panic!("Unexpected error type returned {}", e),
        }
    }

    #[test]
    fn test_process_frame_normal_x() {
        let mut engine = FrameEngine::new(
            &AnalysisType::membrane_thickness("@membrane", "name PO4"),
            Axis::X,
            grid(),
        )
        .unwrap();

        let system = build_system(
            [10.0, 10.0, 10.0],
            &[[4.0, 2.0, 3.0], [6.0, 8.0, 7.0]],
            (Role::Phosphates, &[Some([7.0, 1.0, 3.0])]),
            &[],
        );

        engine.process_frame(&system).unwrap();

        // grid lies in the yz plane; the first grid axis is z
        let tile = engine.grid().tile_at(3.0, 1.0).unwrap();
        match engine.accumulator() {
            Accumulator::Leaflets { upper, .. } => {
                assert_eq!(upper.get(tile).samples(), 1);
                assert_relative_eq!(upper.get(tile).sum(), 2.0, epsilon = 1e-4);
            }
            _ => panic!("Incorrect accumulator."),
        }
    }

    #[test]
    fn test_process_frames_and_merge() {
        let system = build_system(
            [10.0, 10.0, 10.0],
            &MEMBRANE,
            (Role::Phosphates, &[Some([4.0, 4.0, 6.0])]),
            &[],
        );

        let mut engine = thickness_engine();
        for _ in 0..3 {
            engine.process_frame(&system).unwrap();
        }
        assert_eq!(engine.n_frames(), 3);

        let mut other = thickness_engine();
        other.process_frame(&system).unwrap();

        let merged = engine + other;
        assert_eq!(merged.n_frames(), 4);

        let tile = merged.grid().tile_at(4.0, 4.0).unwrap();
        match merged.accumulator() {
            Accumulator::Leaflets { upper, .. } => assert_eq!(upper.get(tile).samples(), 4),
            _ => panic!("Incorrect accumulator."),
        }
    }

    #[test]
    fn test_parallel_reduce() {
        let system = build_system(
            [10.0, 10.0, 10.0],
            &MEMBRANE,
            (Role::Phosphates, &[Some([4.0, 4.0, 6.0])]),
            &[],
        );

        let engines: Vec<FrameEngine> = (0..3)
            .rev()
            .map(|thread_id| {
                let mut engine = thickness_engine();
                engine.initialize(thread_id);
                for _ in 0..=thread_id {
                    engine.process_frame(&system).unwrap();
                }
                engine
            })
            .collect();

        let merged = <FrameEngine as ParallelTrajData>::reduce(engines);
        assert_eq!(merged.thread_id, 0);
        assert_eq!(merged.n_frames(), 6);

        let tile = merged.grid().tile_at(4.0, 4.0).unwrap();
        match merged.accumulator() {
            Accumulator::Leaflets { upper, .. } => {
                assert_eq!(upper.get(tile).samples(), 6);
                assert_relative_eq!(upper.get(tile).sum(), 6.0, epsilon = 1e-4);
            }
            _ => panic!("Incorrect accumulator."),
        }
    }
}
