// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Implementations of some commonly used functions.

use std::fmt;

use groan_rs::{errors::GroupError, system::System};

use crate::{errors::TopologyError, PANIC_MESSAGE};

#[macro_use]
pub(crate) mod macros {
    macro_rules! group_name {
        ($group:expr) => {
            concat!("xxxMemgridReservedxxx-", $group)
        };
    }

    pub(crate) use group_name;
}

/// Semantic role of a group of atoms selected for the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    /// Atoms used to calculate the membrane center.
    Lipids,
    /// Atoms sampled for thickness calculations.
    Phosphates,
    /// Atoms sampled for water defect calculations.
    Water,
    /// Atoms used to position the cylinder for water defect calculation.
    Protein,
}

impl Role {
    /// Name of the group used to store the atoms of this role in the system.
    pub(crate) fn group_name(&self) -> &'static str {
        match self {
            Role::Lipids => macros::group_name!("Lipids"),
            Role::Phosphates => macros::group_name!("Phosphates"),
            Role::Water => macros::group_name!("Water"),
            Role::Protein => macros::group_name!("Protein"),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Lipids => write!(f, "lipid"),
            Role::Phosphates => write!(f, "phosphate"),
            Role::Water => write!(f, "water"),
            Role::Protein => write!(f, "protein"),
        }
    }
}

/// Select atoms using the query and store them in a group corresponding to the role.
/// Returns the number of selected atoms.
///
/// ## Errors
/// - `TopologyError::InvalidQuery` if the query could not be understood.
/// - `TopologyError::EmptyGroup` if no atoms were selected.
pub(crate) fn create_group(
    system: &mut System,
    role: Role,
    query: &str,
) -> Result<usize, TopologyError> {
    let group_name = role.group_name();

    match system.group_create(group_name, query) {
        Ok(_) | Err(GroupError::AlreadyExistsWarning(_)) => (),
        Err(GroupError::InvalidQuery(e)) => {
            return Err(TopologyError::InvalidQuery(query.to_owned(), e.to_string()))
        }
        Err(e) => panic!(
            "FATAL MEMGRID ERROR | auxiliary::create_group | Unexpected error `{}` returned when selecting {} atoms using the query '{}'. {}",
            e, role, query, PANIC_MESSAGE
        ),
    }

    let n_atoms = system.group_get_n_atoms(group_name).unwrap_or_else(|_| {
        panic!(
            "FATAL MEMGRID ERROR | auxiliary::create_group | Group '{}' should exist. {}",
            group_name, PANIC_MESSAGE,
        )
    });

    if n_atoms == 0 {
        Err(TopologyError::EmptyGroup(role.to_string(), query.to_owned()))
    } else {
        Ok(n_atoms)
    }
}
