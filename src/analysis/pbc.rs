// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains functions for working with periodic boundary conditions.

use groan_rs::{
    errors::{GroupError, PositionError, SimBoxError},
    prelude::{SimBox, Vector3D},
    system::System,
};

use crate::{auxiliary::Role, errors::AnalysisError, PANIC_MESSAGE};

/// Check that the simulation box is defined, orthogonal and that none of its dimensions is zero.
pub(crate) fn check_box(simbox: Option<&SimBox>) -> Result<&SimBox, AnalysisError> {
    let simbox = simbox.ok_or(AnalysisError::UndefinedBox)?;

    if !simbox.is_orthogonal() {
        return Err(AnalysisError::NotOrthogonalBox);
    }

    if simbox.x == 0.0 || simbox.y == 0.0 || simbox.z == 0.0 {
        return Err(AnalysisError::ZeroBox);
    }

    Ok(simbox)
}

/// Calculate center of geometry of the atoms with the given role.
/// Periodic boundary conditions are taken into account so the center
/// does not depend on the periodic images of the atoms.
pub(crate) fn group_center(system: &System, role: Role) -> Result<Vector3D, AnalysisError> {
    match system.group_get_center(role.group_name()) {
        Ok(center) => Ok(center),
        Err(GroupError::EmptyGroup(_)) => Err(AnalysisError::EmptyCenter(role.to_string())),
        Err(GroupError::InvalidSimBox(SimBoxError::DoesNotExist)) => Err(AnalysisError::UndefinedBox),
        Err(GroupError::InvalidSimBox(SimBoxError::NotOrthogonal)) => Err(AnalysisError::NotOrthogonalBox),
        Err(GroupError::InvalidSimBox(SimBoxError::AllDimensionsZero)) => Err(AnalysisError::ZeroBox),
        Err(GroupError::InvalidPosition(PositionError::NoPosition(x))) => Err(AnalysisError::UndefinedPosition(x)),
        Err(e) => panic!("FATAL MEMGRID ERROR | pbc::group_center | Unexpected error type '{}' returned for {} atoms. {}", e, role, PANIC_MESSAGE),
    }
}

/// Get the geometric center of the simulation box.
#[inline(always)]
pub(crate) fn box_center(simbox: &SimBox) -> Vector3D {
    Vector3D::new(simbox.x / 2.0, simbox.y / 2.0, simbox.z / 2.0)
}
