// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! This module contains structures and methods for presenting the results of the analysis.

use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
};

use getset::{CopyGetters, Getters};
use serde::{Serialize, Serializer};

use crate::{
    errors::WriteError,
    input::{Analysis, AnalysisType, Plane},
    MEMGRID_VERSION,
};

macro_rules! write_line {
    ($path:expr, $dst:expr, $($arg:tt)*) => {
        writeln!($dst, $($arg)*).map_err(|_| WriteError::CouldNotWriteLine(Box::from($path)))?
    };
}

/// Results of any analysis performed by `memgrid`.
#[derive(Debug, Clone)]
pub enum AnalysisResults {
    LeafletThickness(LeafletThicknessResults),
    MembraneThickness(GridResults),
    WaterDefect(WaterDefectResults),
    WaterDefectMap(GridResults),
}

impl AnalysisResults {
    /// Write the results into the output file(s) specified for the analysis.
    /// Existing files are backed up unless `overwrite` was requested.
    /// All output files are checked before anything is written.
    pub fn write(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        check_output_files(&self.output_files())?;

        match self {
            AnalysisResults::LeafletThickness(results) => {
                results.upper().write()?;
                results.lower().write()?;
            }
            AnalysisResults::MembraneThickness(results)
            | AnalysisResults::WaterDefectMap(results) => results.write()?,
            AnalysisResults::WaterDefect(results) => results.write()?,
        }

        Ok(())
    }

    /// Number of trajectory frames that were analyzed.
    pub fn n_frames(&self) -> usize {
        match self {
            AnalysisResults::LeafletThickness(results) => results.upper().n_frames(),
            AnalysisResults::MembraneThickness(results)
            | AnalysisResults::WaterDefectMap(results) => results.n_frames(),
            AnalysisResults::WaterDefect(results) => results.n_frames(),
        }
    }

    /// Assign output files and the overwrite flag to the results.
    pub(crate) fn with_output(mut self, output: Option<&str>, overwrite: bool) -> Self {
        match &mut self {
            AnalysisResults::LeafletThickness(results) => {
                let (upper, lower) = match output.map(leaflet_files) {
                    Some((upper, lower)) => (Some(upper), Some(lower)),
                    None => (None, None),
                };
                results.upper.set_output(upper, overwrite);
                results.lower.set_output(lower, overwrite);
            }
            AnalysisResults::MembraneThickness(results)
            | AnalysisResults::WaterDefectMap(results) => {
                results.set_output(output.map(str::to_owned), overwrite)
            }
            AnalysisResults::WaterDefect(results) => {
                results.output = output.map(str::to_owned);
                results.overwrite = overwrite;
            }
        }

        self
    }

    /// Paths to all files that will be written.
    pub(crate) fn output_files(&self) -> Vec<&str> {
        match self {
            AnalysisResults::LeafletThickness(results) => [results.upper(), results.lower()]
                .into_iter()
                .filter_map(|r| r.output().as_deref())
                .collect(),
            AnalysisResults::MembraneThickness(results)
            | AnalysisResults::WaterDefectMap(results) => {
                results.output().as_deref().into_iter().collect()
            }
            AnalysisResults::WaterDefect(results) => {
                results.output().as_deref().into_iter().collect()
            }
        }
    }

    /// Log the main result of the analysis.
    pub(crate) fn info(&self) {
        match self {
            AnalysisResults::LeafletThickness(results) => {
                results.upper().info();
                results.lower().info();
            }
            AnalysisResults::MembraneThickness(results)
            | AnalysisResults::WaterDefectMap(results) => results.info(),
            AnalysisResults::WaterDefect(results) => results.info(),
        }
    }
}

/// Type of a map of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    UpperLeafletThickness,
    LowerLeafletThickness,
    MembraneThickness,
    WaterDefect,
}

impl MapKind {
    fn zlabel(&self) -> &str {
        match self {
            MapKind::UpperLeafletThickness | MapKind::LowerLeafletThickness => {
                "leaflet thickness [nm]"
            }
            MapKind::MembraneThickness => "membrane thickness [nm]",
            MapKind::WaterDefect => "water defect [arb. u.]",
        }
    }

    fn colormap(&self) -> &str {
        match self {
            MapKind::WaterDefect => "hot",
            _ => "rainbow",
        }
    }

    /// Number of decimal places used to write the values.
    fn precision(&self) -> usize {
        match self {
            MapKind::WaterDefect => 6,
            _ => 4,
        }
    }

    fn average_label(&self) -> &str {
        match self {
            MapKind::UpperLeafletThickness => "Average upper leaflet thickness",
            MapKind::LowerLeafletThickness => "Average lower leaflet thickness",
            MapKind::MembraneThickness => "Average membrane thickness",
            MapKind::WaterDefect => "Average water defect per square Å",
        }
    }

    fn unit(&self) -> &str {
        match self {
            MapKind::WaterDefect => "arb. u.",
            _ => "nm",
        }
    }

    /// Are tiles with too few samples reported as missing?
    fn is_masked(&self) -> bool {
        !matches!(self, MapKind::WaterDefect)
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKind::UpperLeafletThickness => write!(f, "upper leaflet thickness"),
            MapKind::LowerLeafletThickness => write!(f, "lower leaflet thickness"),
            MapKind::MembraneThickness => write!(f, "membrane thickness"),
            MapKind::WaterDefect => write!(f, "water defect"),
        }
    }
}

/// Value calculated for a single tile of the grid.
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
pub struct TileValue {
    /// Coordinate of the tile along the first axis of the grid.
    #[getset(get_copy = "pub")]
    x: f32,
    /// Coordinate of the tile along the second axis of the grid.
    #[getset(get_copy = "pub")]
    y: f32,
    /// Value for the tile. `None` if the value could not be calculated.
    #[getset(get_copy = "pub")]
    value: Option<f32>,
}

impl TileValue {
    pub(crate) fn new(x: f32, y: f32, value: Option<f32>) -> Self {
        TileValue { x, y, value }
    }
}

/// Map of values calculated for the individual tiles of a grid.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct GridResults {
    /// Type of the map.
    #[getset(get_copy = "pub")]
    kind: MapKind,
    /// Plane in which the grid lies.
    #[getset(get_copy = "pub")]
    plane: Plane,
    /// Span of the grid along its first axis.
    #[getset(get_copy = "pub")]
    span_x: (f32, f32),
    /// Span of the grid along its second axis.
    #[getset(get_copy = "pub")]
    span_y: (f32, f32),
    /// Values for all tiles of the grid. The second axis is the outer loop.
    #[getset(get = "pub")]
    tiles: Vec<TileValue>,
    /// Number of tiles with a calculated value.
    #[getset(get_copy = "pub")]
    n_valid: usize,
    /// Average value over all tiles with a calculated value.
    #[getset(get_copy = "pub")]
    average: Option<f32>,
    /// Number of analyzed trajectory frames.
    #[getset(get_copy = "pub")]
    n_frames: usize,
    /// Output file.
    #[getset(get = "pub")]
    output: Option<String>,
    overwrite: bool,
}

impl GridResults {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        kind: MapKind,
        plane: Plane,
        span_x: (f32, f32),
        span_y: (f32, f32),
        tiles: Vec<TileValue>,
        n_valid: usize,
        average: Option<f32>,
        n_frames: usize,
    ) -> Self {
        GridResults {
            kind,
            plane,
            span_x,
            span_y,
            tiles,
            n_valid,
            average,
            n_frames,
            output: None,
            overwrite: false,
        }
    }

    fn set_output(&mut self, output: Option<String>, overwrite: bool) {
        self.output = output;
        self.overwrite = overwrite;
    }

    /// Write the map into the output file. Does nothing if no output file is assigned.
    pub fn write(&self) -> Result<(), WriteError> {
        match &self.output {
            Some(output) => self.write_to(output, self.overwrite),
            None => Ok(()),
        }
    }

    /// Write the map into the specified file.
    pub fn write_to(&self, filename: impl AsRef<Path>, overwrite: bool) -> Result<(), WriteError> {
        log::info!(
            "Writing the {} map into '{}'...",
            self.kind,
            filename.as_ref().to_string_lossy()
        );

        let mut writer = prepare_file(&filename, overwrite)?;
        self.write_map(&mut writer, filename.as_ref())?;

        writer
            .flush()
            .map_err(|_| WriteError::CouldNotWriteLine(Box::from(filename.as_ref())))
    }

    fn write_map(&self, writer: &mut impl Write, path: &Path) -> Result<(), WriteError> {
        let (xlabel, ylabel) = self.plane.get_labels();
        let precision = self.kind.precision();

        write_line!(path, writer, "# Generated with memgrid v{}", MEMGRID_VERSION);
        write_line!(
            path,
            writer,
            "# Map of {} calculated from {} frame(s).{}",
            self.kind,
            self.n_frames,
            if self.kind.is_masked() {
                " Tiles with too few samples are 'nan'."
            } else {
                ""
            }
        );
        write_line!(path, writer, "@ xlabel {} coordinate [nm]", xlabel);
        write_line!(path, writer, "@ ylabel {} coordinate [nm]", ylabel);
        write_line!(path, writer, "@ zlabel {}", self.kind.zlabel());
        write_line!(path, writer, "@ grid --");
        write_line!(path, writer, "$ type colorbar");
        write_line!(path, writer, "$ colormap {}", self.kind.colormap());

        for tile in self.tiles.iter() {
            match tile.value {
                Some(value) => write_line!(
                    path,
                    writer,
                    "{:.6} {:.6} {:.*}",
                    tile.x,
                    tile.y,
                    precision,
                    value
                ),
                None => write_line!(path, writer, "{:.6} {:.6} nan", tile.x, tile.y),
            }
        }

        write_line!(
            path,
            writer,
            "# {}: {} {}",
            self.kind.average_label(),
            format_option(self.average, precision),
            self.kind.unit()
        );

        Ok(())
    }

    fn info(&self) {
        log::info!(
            "{}: {} {} ({} of {} tiles with a value).",
            self.kind.average_label(),
            format_option(self.average, self.kind.precision()),
            self.kind.unit(),
            self.n_valid,
            self.tiles.len()
        );
    }
}

/// Maps of thickness calculated for the individual membrane leaflets.
#[derive(Debug, Clone, Getters)]
pub struct LeafletThicknessResults {
    #[getset(get = "pub")]
    upper: GridResults,
    #[getset(get = "pub")]
    lower: GridResults,
}

impl LeafletThicknessResults {
    pub(crate) fn new(upper: GridResults, lower: GridResults) -> Self {
        LeafletThicknessResults { upper, lower }
    }
}

/// Average number of water molecules detected inside the cylinder per frame.
#[derive(Debug, Clone, Serialize, CopyGetters, Getters)]
pub struct WaterDefectResults {
    /// Number of analyzed trajectory frames.
    #[getset(get_copy = "pub")]
    n_frames: usize,
    /// Average water defect in the upper part of the cylinder.
    #[getset(get_copy = "pub")]
    #[serde(serialize_with = "round_serialize_f32")]
    upper: f32,
    /// Average water defect in the lower part of the cylinder.
    #[getset(get_copy = "pub")]
    #[serde(serialize_with = "round_serialize_f32")]
    lower: f32,
    /// Average water defect in the entire cylinder.
    #[getset(get_copy = "pub")]
    #[serde(serialize_with = "round_serialize_f32")]
    total: f32,
    /// Output yaml file.
    #[getset(get = "pub")]
    #[serde(skip)]
    output: Option<String>,
    #[serde(skip)]
    overwrite: bool,
}

impl WaterDefectResults {
    pub(crate) fn new(n_frames: usize, upper: f32, lower: f32, total: f32) -> Self {
        WaterDefectResults {
            n_frames,
            upper,
            lower,
            total,
            output: None,
            overwrite: false,
        }
    }

    /// Write the results into the output yaml file. Does nothing if no output file is assigned.
    pub fn write(&self) -> Result<(), WriteError> {
        match &self.output {
            Some(output) => self.write_yaml(output, self.overwrite),
            None => Ok(()),
        }
    }

    /// Write the results into the specified yaml file.
    pub fn write_yaml(&self, filename: impl AsRef<Path>, overwrite: bool) -> Result<(), WriteError> {
        log::info!(
            "Writing the water defect into '{}'...",
            filename.as_ref().to_string_lossy()
        );

        let mut writer = prepare_file(&filename, overwrite)?;
        write_line!(
            filename.as_ref(),
            writer,
            "# Water defect calculated with 'memgrid v{}'.",
            MEMGRID_VERSION
        );

        serde_yaml::to_writer(&mut writer, self)
            .map_err(|e| WriteError::CouldNotWriteYaml(Box::from(filename.as_ref()), e))?;

        writer
            .flush()
            .map_err(|_| WriteError::CouldNotWriteLine(Box::from(filename.as_ref())))
    }

    fn info(&self) {
        log::info!("Average upper-leaflet water defect: {:8.4}", self.upper);
        log::info!("Average lower-leaflet water defect: {:8.4}", self.lower);
        log::info!("Average water defect:               {:8.4}", self.total);
    }
}

/// Check that the directory in which the file should be created exists.
pub(crate) fn check_output_directory(filename: impl AsRef<Path>) -> Result<(), WriteError> {
    match filename.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => Err(
            WriteError::MissingDirectory(Box::from(filename.as_ref())),
        ),
        _ => Ok(()),
    }
}

/// Check that all the output files can be created or written into.
/// Existing files are left untouched. Files that did not exist are removed after the check.
pub(crate) fn check_output_files(files: &[impl AsRef<Path>]) -> Result<(), WriteError> {
    for file in files {
        let path = file.as_ref();
        check_output_directory(path)?;

        let error = || WriteError::CouldNotCreateFile(Box::from(path));
        if path.exists() {
            OpenOptions::new()
                .append(true)
                .open(path)
                .map_err(|_| error())?;
        } else {
            File::create(path).map_err(|_| error())?;
            std::fs::remove_file(path).map_err(|_| error())?;
        }
    }

    Ok(())
}

/// Names of the output files for the upper and lower leaflet.
#[inline(always)]
fn leaflet_files(pattern: &str) -> (String, String) {
    (
        format!("{}_upper.dat", pattern),
        format!("{}_lower.dat", pattern),
    )
}

/// Back up a file (if needed) and create a new one.
#[inline(always)]
fn prepare_file(
    filename: &impl AsRef<Path>,
    overwrite: bool,
) -> Result<BufWriter<File>, WriteError> {
    check_output_directory(filename)?;
    try_backup_file(filename, overwrite)?;
    create_and_open_file(filename)
}

/// Create and open file for buffered writing.
#[inline(always)]
fn create_and_open_file(filename: &impl AsRef<Path>) -> Result<BufWriter<File>, WriteError> {
    let file = File::create(filename.as_ref())
        .map_err(|_| WriteError::CouldNotCreateFile(Box::from(filename.as_ref())))?;

    Ok(BufWriter::new(file))
}

/// Back up an output file, if it is necessary and if it is requested.
fn try_backup_file(filename: &impl AsRef<Path>, overwrite: bool) -> Result<(), WriteError> {
    if filename.as_ref().exists() {
        if !overwrite {
            log::warn!(
                "Output file '{}' already exists. Backing it up.",
                filename.as_ref().to_string_lossy()
            );
            backitup::backup(filename.as_ref())
                .map_err(|_| WriteError::CouldNotBackupFile(Box::from(filename.as_ref())))?;
        } else {
            log::warn!(
                "Output file '{}' already exists. It will be overwritten as requested.",
                filename.as_ref().to_string_lossy()
            );
        }
    }

    Ok(())
}

#[inline(always)]
fn format_option(value: Option<f32>, precision: usize) -> String {
    match value {
        Some(x) => format!("{:.*}", precision, x),
        None => "nan".to_owned(),
    }
}

#[inline(always)]
fn round_serialize_f32<S>(x: &f32, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_f32((x * 10000.0).round() / 10000.0)
}

impl Analysis {
    /// Print basic information about the analysis for the user.
    pub(crate) fn info(&self) {
        log::info!("Will calculate {}.", self.analysis_type().name());
        log::info!(
            "Membrane normal expected to be oriented along the {} axis.",
            self.membrane_normal()
        );

        if self.analysis_type().is_map() {
            let [span_x, span_y] = self.grid();
            let (label_x, label_y) = self.membrane_normal().perpendicular().get_labels();
            log::info!(
                "Grid spans {}: {}, {}: {}.",
                label_x,
                span_x,
                label_y,
                span_y,
            );
        }

        if !matches!(
            self.analysis_type(),
            AnalysisType::WaterDefect { .. } | AnalysisType::WaterDefectMap { .. }
        ) {
            log::info!(
                "Tiles with fewer than {} samples will be 'nan'.",
                self.min_samples()
            );
        }

        match self.output_or_default() {
            Some(output) => log::info!("Results will be written into '{}'.", output),
            None => log::info!("Results will not be written into a file."),
        }
    }

    /// Paths to all files that will be written by the analysis.
    pub(crate) fn output_files(&self) -> Vec<String> {
        match (self.output_or_default(), self.analysis_type()) {
            (None, _) => Vec::new(),
            (Some(pattern), AnalysisType::LeafletThickness { .. }) => {
                let (upper, lower) = leaflet_files(pattern);
                vec![upper, lower]
            }
            (Some(output), _) => vec![output.to_owned()],
        }
    }
}
