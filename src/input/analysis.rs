// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains the implementation of the main `Analysis` structure and its methods.

use std::fs::read_to_string;
use std::path::Path;

use derive_builder::Builder;
use getset::{CopyGetters, Getters, Setters};
use serde::Deserialize;

use crate::errors::ConfigError;

use super::{Axis, GridSpan};

/// Type of the analysis to perform.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum AnalysisType {
    /// Map of the thickness of the individual membrane leaflets.
    #[serde(alias = "leafthick")]
    LeafletThickness {
        #[serde(default = "default_lipids")]
        lipids: String,
        #[serde(default = "default_phosphates")]
        phosphates: String,
    },
    /// Map of the thickness of the entire membrane.
    #[serde(alias = "memthick")]
    MembraneThickness {
        #[serde(default = "default_lipids")]
        lipids: String,
        #[serde(default = "default_phosphates")]
        phosphates: String,
    },
    /// Average number of water molecules inside a cylinder spanning the membrane.
    #[serde(alias = "wdcalc")]
    WaterDefect {
        #[serde(default = "default_lipids")]
        lipids: String,
        #[serde(default = "default_water")]
        water: String,
        /// If not provided, the cylinder is placed into the center of the simulation box.
        #[serde(default)]
        protein: Option<String>,
        #[serde(default = "default_radius")]
        radius: f32,
        #[serde(default = "default_height")]
        height: f32,
    },
    /// Map of water molecules penetrating the membrane.
    #[serde(alias = "wdmap")]
    WaterDefectMap {
        #[serde(default = "default_lipids")]
        lipids: String,
        #[serde(default = "default_water")]
        water: String,
        #[serde(default = "default_height")]
        height: f32,
    },
}

fn default_lipids() -> String {
    "@membrane".to_owned()
}

fn default_phosphates() -> String {
    "name PO4".to_owned()
}

fn default_water() -> String {
    "name W".to_owned()
}

fn default_radius() -> f32 {
    2.5
}

fn default_height() -> f32 {
    4.0
}

impl AnalysisType {
    pub fn leaflet_thickness(lipids: &str, phosphates: &str) -> Self {
        Self::LeafletThickness {
            lipids: lipids.to_owned(),
            phosphates: phosphates.to_owned(),
        }
    }

    pub fn membrane_thickness(lipids: &str, phosphates: &str) -> Self {
        Self::MembraneThickness {
            lipids: lipids.to_owned(),
            phosphates: phosphates.to_owned(),
        }
    }

    pub fn water_defect(
        lipids: &str,
        water: &str,
        protein: Option<&str>,
        radius: f32,
        height: f32,
    ) -> Self {
        Self::WaterDefect {
            lipids: lipids.to_owned(),
            water: water.to_owned(),
            protein: protein.map(str::to_owned),
            radius,
            height,
        }
    }

    pub fn water_defect_map(lipids: &str, water: &str, height: f32) -> Self {
        Self::WaterDefectMap {
            lipids: lipids.to_owned(),
            water: water.to_owned(),
            height,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::LeafletThickness { .. } => "leaflet thickness",
            Self::MembraneThickness { .. } => "membrane thickness",
            Self::WaterDefect { .. } => "water defect",
            Self::WaterDefectMap { .. } => "water defect map",
        }
    }

    /// Selection query for the lipids used to calculate the membrane center.
    pub fn lipids(&self) -> &str {
        match self {
            Self::LeafletThickness { lipids, .. }
            | Self::MembraneThickness { lipids, .. }
            | Self::WaterDefect { lipids, .. }
            | Self::WaterDefectMap { lipids, .. } => lipids,
        }
    }

    /// Selection query for the atoms that are classified in every frame.
    /// These are phosphates for thickness calculations and water for water defect calculations.
    pub fn targets(&self) -> &str {
        match self {
            Self::LeafletThickness { phosphates, .. }
            | Self::MembraneThickness { phosphates, .. } => phosphates,
            Self::WaterDefect { water, .. } | Self::WaterDefectMap { water, .. } => water,
        }
    }

    /// Selection query for the protein, if relevant.
    pub fn protein(&self) -> Option<&str> {
        match self {
            Self::WaterDefect { protein, .. } => protein.as_deref(),
            _ => None,
        }
    }

    /// Does this analysis produce a map?
    pub fn is_map(&self) -> bool {
        !matches!(self, Self::WaterDefect { .. })
    }

    /// Output file (or output file pattern) used if none is provided.
    pub(crate) fn default_output(&self) -> Option<&'static str> {
        match self {
            Self::LeafletThickness { .. } => Some("thickness"),
            Self::MembraneThickness { .. } => Some("membrane_thickness.dat"),
            Self::WaterDefect { .. } => None,
            Self::WaterDefectMap { .. } => Some("wd_map.dat"),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::WaterDefect { radius, height, .. } => {
                validate_radius(*radius)?;
                validate_height(*height)
            }
            Self::WaterDefectMap { height, .. } => validate_height(*height),
            _ => Ok(()),
        }
    }
}

/// Structure holding all the information necessary to perform the specified analysis.
#[derive(Debug, Clone, Builder, Getters, CopyGetters, Setters, Deserialize)]
#[serde(deny_unknown_fields)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Analysis {
    /// Path to a structure file (gro, pdb, tpr...) containing the system.
    #[builder(setter(into))]
    #[getset(get = "pub")]
    structure: String,
    /// Path to an XTC trajectory file to be analyzed.
    /// If not provided, only the structure file is analyzed.
    #[builder(setter(into, strip_option), default)]
    #[serde(default)]
    #[getset(get = "pub")]
    trajectory: Option<String>,
    /// Path to an NDX file containing the groups associated with the system.
    #[builder(setter(into, strip_option), default)]
    #[serde(default)]
    #[getset(get = "pub")]
    index: Option<String>,
    /// Path to the output file. For leaflet thickness, this is a pattern to which
    /// '_upper.dat' and '_lower.dat' are appended.
    /// If not provided, a default for the analysis type is used
    /// (water defect results are then only logged).
    #[builder(setter(into, strip_option), default)]
    #[serde(default)]
    #[getset(get = "pub")]
    output: Option<String>,
    /// Type of the analysis to perform.
    #[getset(get = "pub")]
    #[serde(alias = "type")]
    analysis_type: AnalysisType,
    /// Direction of the membrane normal.
    /// If not provided, the default value is 'Axis::Z'.
    #[builder(setter(into), default = "Axis::Z")]
    #[serde(default)]
    #[getset(get_copy = "pub")]
    membrane_normal: Axis,
    /// Span of the grid along its two axes.
    /// If not provided, the grid covers the entire simulation box of the input structure.
    #[builder(default)]
    #[serde(default, alias = "dim")]
    #[getset(get_copy = "pub")]
    grid: [GridSpan; 2],
    /// Minimal number of samples in a grid tile required to calculate a value for it.
    /// If not specified, the default value is 30.
    #[builder(default = "30")]
    #[serde(default = "default_min_samples", alias = "nan_limit")]
    #[getset(get_copy = "pub")]
    min_samples: usize,
    /// Starting time of the trajectory analysis (in ps).
    #[builder(default = "0.0")]
    #[serde(default = "default_begin", alias = "start")]
    #[getset(get_copy = "pub")]
    begin: f32,
    /// Ending time of the trajectory analysis (in ps).
    #[builder(default = "f32::INFINITY")]
    #[serde(default = "default_end")]
    #[getset(get_copy = "pub")]
    end: f32,
    /// Only every Nth frame of the trajectory will be analyzed.
    #[builder(default = "1")]
    #[serde(default = "default_one")]
    #[getset(get_copy = "pub")]
    step: usize,
    /// Number of threads to use to read the trajectory.
    #[builder(default = "1")]
    #[serde(default = "default_one")]
    #[getset(get_copy = "pub")]
    n_threads: usize,
    /// Be silent. Print nothing to the standard output during the analysis.
    #[builder(setter(custom), default = "false")]
    #[serde(default)]
    #[getset(get_copy = "pub", set = "pub")]
    silent: bool,
    /// Do not make backups. Overwrite all output files.
    #[builder(setter(custom), default = "false")]
    #[serde(default)]
    #[getset(get_copy = "pub", set = "pub")]
    overwrite: bool,
}

fn default_min_samples() -> usize {
    30
}

fn default_begin() -> f32 {
    0.0
}

fn default_end() -> f32 {
    f32::INFINITY
}

fn default_one() -> usize {
    1
}

fn validate_step(step: usize) -> Result<(), ConfigError> {
    if step == 0 {
        Err(ConfigError::InvalidStep)
    } else {
        Ok(())
    }
}

fn validate_min_samples(samples: usize) -> Result<(), ConfigError> {
    if samples == 0 {
        Err(ConfigError::InvalidMinSamples)
    } else {
        Ok(())
    }
}

fn validate_n_threads(n_threads: usize) -> Result<(), ConfigError> {
    if n_threads == 0 {
        Err(ConfigError::InvalidNThreads)
    } else {
        Ok(())
    }
}

fn validate_begin_end(begin: f32, end: f32) -> Result<(), ConfigError> {
    if begin > end {
        Err(ConfigError::InvalidBeginEnd)
    } else {
        Ok(())
    }
}

fn validate_radius(radius: f32) -> Result<(), ConfigError> {
    if radius > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRadius(radius))
    }
}

fn validate_height(height: f32) -> Result<(), ConfigError> {
    if height > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidHeight(height))
    }
}

fn validate_grid(grid: &[GridSpan; 2]) -> Result<(), ConfigError> {
    for span in grid {
        span.validate().map_err(ConfigError::InvalidGrid)?;
    }

    Ok(())
}

impl Analysis {
    /// Start providing the parameters of the analysis.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> AnalysisBuilder {
        AnalysisBuilder::default()
    }

    /// Same as `Analysis::new`.
    pub fn builder() -> AnalysisBuilder {
        AnalysisBuilder::default()
    }

    /// Read the parameters of the analysis from a yaml configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Analysis, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().into_owned();

        let string =
            read_to_string(&path).map_err(|_| ConfigError::CouldNotOpenConfig(path_str.clone()))?;
        let analysis: Analysis = serde_yaml::from_str(&string)
            .map_err(|e| ConfigError::CouldNotParseConfig(path_str, e))?;

        analysis.validate()?;
        Ok(analysis)
    }

    /// Check that the Analysis structure is valid. Used after deserialization from config yaml file.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_step(self.step)?;
        validate_min_samples(self.min_samples)?;
        validate_n_threads(self.n_threads)?;
        validate_begin_end(self.begin, self.end)?;
        validate_grid(&self.grid)?;
        self.analysis_type.validate()?;

        Ok(())
    }

    /// Output file (or pattern) that will actually be used.
    pub fn output_or_default(&self) -> Option<&str> {
        self.output
            .as_deref()
            .or_else(|| self.analysis_type.default_output())
    }
}

impl AnalysisBuilder {
    /// Be silent. Print nothing to the standard output during the analysis.
    #[inline(always)]
    pub fn silent(&mut self) -> &mut Self {
        self.silent = Some(true);
        self
    }

    /// Do not make backups. Overwrite all output files.
    #[inline(always)]
    pub fn overwrite(&mut self) -> &mut Self {
        self.overwrite = Some(true);
        self
    }

    /// Alias for `min_samples`.
    #[inline(always)]
    pub fn nan_limit(&mut self, value: usize) -> &mut Self {
        self.min_samples(value)
    }

    /// Validate the process of analysis building.
    fn validate(&self) -> Result<(), String> {
        if let Some(step) = self.step {
            validate_step(step).map_err(|e| e.to_string())?;
        }

        if let Some(min_samples) = self.min_samples {
            validate_min_samples(min_samples).map_err(|e| e.to_string())?;
        }

        if let Some(n_threads) = self.n_threads {
            validate_n_threads(n_threads).map_err(|e| e.to_string())?;
        }

        if let (Some(begin), Some(end)) = (self.begin, self.end) {
            validate_begin_end(begin, end).map_err(|e| e.to_string())?;
        }

        if let Some(grid) = &self.grid {
            validate_grid(grid).map_err(|e| e.to_string())?;
        }

        if let Some(analysis_type) = &self.analysis_type {
            analysis_type.validate().map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}
