// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! This module contains error types that can be returned by the `memgrid` crate.

use std::path::Path;

use colored::{ColoredString, Colorize};
use thiserror::Error;

fn path_to_yellow(path: &Path) -> ColoredString {
    path.to_string_lossy().yellow()
}

/// Errors that can occur when constructing the grid of tiles.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("{} invalid span of the grid: minimum ('{}' nm) is not lower than maximum ('{}' nm)",
            "error:".red().bold(),
            .0.to_string().yellow(),
            .1.to_string().yellow())]
    InvalidSpan(f32, f32),

    #[error("{} grid of '{}' x '{}' tiles could not be allocated ({} is the grid span reasonable?)",
            "error:".red().bold(),
            .0.to_string().yellow(),
            .1.to_string().yellow(),
            "hint:".blue().bold())]
    TooLarge(usize, usize),
}

/// Errors that can occur when constructing an `Analysis` structure from the provided configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{} could not open the configuration file '{}'", "error:".red().bold(), .0.yellow())]
    CouldNotOpenConfig(String),

    #[error("{} could not understand the contents of the configuration file '{}' ({})", "error:".red().bold(), .0.yellow(), .1)]
    CouldNotParseConfig(String, serde_yaml::Error),

    #[error("{} the specified value of '{}' is invalid (must be positive)", "error:".red().bold(), "step".yellow())]
    InvalidStep,

    #[error("{} the specified value of '{}' is invalid (must be positive)", "error:".red().bold(), "min_samples".yellow())]
    InvalidMinSamples,

    #[error("{} the specified value of '{}' is invalid (must be positive)", "error:".red().bold(), "n_threads".yellow())]
    InvalidNThreads,

    #[error("{} invalid values of '{}' and '{}' (begin is higher than end)",
            "error:".red().bold(),
            "begin".yellow(),
            "end".yellow())]
    InvalidBeginEnd,

    #[error("{} the specified cylinder radius ('{}' nm) is invalid (must be positive)", "error:".red().bold(), .0.to_string().yellow())]
    InvalidRadius(f32),

    #[error("{} the specified height ('{}' nm) is invalid (must be positive)", "error:".red().bold(), .0.to_string().yellow())]
    InvalidHeight(f32),

    #[error("{}", .0)]
    InvalidGrid(GridError),
}

/// Errors that can occur when selecting atoms from the system.
#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("{} could not understand the selection query '{}' ({})", "error:".red().bold(), .0.yellow(), .1)]
    InvalidQuery(String, String),

    #[error("{} no {} atoms detected using the query '{}'", "error:".red().bold(), .0, .1.yellow())]
    EmptyGroup(String, String),
}

/// Errors that can occur while analyzing the trajectory.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{} system has undefined simulation box", "error:".red().bold())]
    UndefinedBox,

    #[error("{} the simulation box is not orthogonal", "error:".red().bold())]
    NotOrthogonalBox,

    #[error("{} the simulation box has a zero dimension", "error:".red().bold())]
    ZeroBox,

    #[error("{} atom with atom index '{}' has an undefined position", "error:".red().bold(), .0.to_string().yellow())]
    UndefinedPosition(usize),

    #[error("{} could not calculate center of geometry of {} atoms (no positions available)", "error:".red().bold(), .0)]
    EmptyCenter(String),

    #[error("{} no trajectory frames have been analyzed, averages are undefined ({} check the values of '{}' and '{}')",
            "error:".red().bold(),
            "hint:".blue().bold(),
            "begin".bright_blue(),
            "end".bright_blue())]
    NoFrames,
}

/// Errors that can occur while writing the results.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("{} output directory for file '{}' does not exist", "error:".red().bold(), path_to_yellow(.0))]
    MissingDirectory(Box<Path>),

    #[error("{} could not create file '{}'", "error:".red().bold(), path_to_yellow(.0))]
    CouldNotCreateFile(Box<Path>),

    #[error("{} could not create a backup for file '{}'", "error:".red().bold(), path_to_yellow(.0))]
    CouldNotBackupFile(Box<Path>),

    #[error("{} could not write line into '{}'", "error:".red().bold(), path_to_yellow(.0))]
    CouldNotWriteLine(Box<Path>),

    #[error("{} could not write results in yaml format into '{}' (serde_yaml error: `{}`)", "error:".red().bold(), path_to_yellow(.0), .1)]
    CouldNotWriteYaml(Box<Path>, serde_yaml::Error),
}
