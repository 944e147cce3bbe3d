// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! # memgrid: Membrane thickness and water defects from Gromacs simulations
//!
//! Crate for calculating spatially resolved membrane properties from Gromacs simulations.
//! `memgrid` can calculate maps of leaflet thickness, maps of membrane thickness,
//! maps of water defects, and the average water defect in a cylinder spanning the membrane.
//!
//! ## Usage
//!
//! Run:
//!
//! ```bash
//! $ cargo add memgrid
//! ```
//!
//! Import the crate in your Rust code:
//!
//! ```rust
//! use memgrid::prelude::*;
//! ```
//!
//! `memgrid` is also available as a command line tool. You can install it using:
//! ```bash
//! $ cargo install memgrid
//! ```
//!
//! ## Examples
//!
//! Map of membrane thickness calculated from the positions of lipid phosphates.
//! ```no_run
//! use memgrid::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     // construct the analysis
//!     let analysis = Analysis::new()
//!             .structure("system.gro")                   // structure file
//!             .trajectory("md.xtc")                      // trajectory file to analyze
//!             .output("thickness.dat")                   // output file
//!             .analysis_type(AnalysisType::membrane_thickness(
//!                "@membrane",                            // selection of lipids
//!                "name PO4",                             // selection of phosphates
//!             ))
//!             .build()?;                                 // constructing the analysis
//!
//!     // activate colog if you want logging (requires the `colog` crate)
//!     colog::init();
//!
//!     // run the analysis and write the output
//!     let results = analysis.run()?;
//!     results.write()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ***
//!
//! Average water defect inside a cylinder positioned at the center of a protein.
//!
//! ```no_run
//! use memgrid::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let analysis = Analysis::new()
//!             .structure("system.gro")
//!             .trajectory("md.xtc")
//!             .analysis_type(AnalysisType::water_defect(
//!                "@membrane",                            // selection of lipids
//!                "name W",                               // selection of water
//!                Some("@protein"),                       // selection of the protein
//!                2.5,                                    // radius of the cylinder (nm)
//!                4.0,                                    // height of the cylinder (nm)
//!             ))
//!             .build()?;
//!
//!     colog::init();
//!
//!     if let AnalysisResults::WaterDefect(defect) = analysis.run()? {
//!         println!("Average water defect: {}", defect.total());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ***
//!
//! The `Analysis` structure has a few other, optional fields.
//!
//! ```no_run
//! use memgrid::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let analysis = Analysis::new()
//!             .structure("system.gro")                   // structure file
//!             .trajectory("md.xtc")                      // trajectory file to analyze
//!             .index("index.ndx")                        // input ndx file
//!             .output("leaflets")                        // pattern for the output files
//!             .analysis_type(AnalysisType::leaflet_thickness(
//!                "Membrane",                             // selection of lipids
//!                "name PO4",                             // selection of phosphates
//!             ))
//!             .membrane_normal(Axis::Z)                  // membrane normal
//!             .grid([                                    // span of the grid
//!                 GridSpan::manual(2.0, 8.0)?,           // grid goes from 2 nm to 8 nm along x...
//!                 GridSpan::Auto,                        // ...and spans the entire box along y
//!             ])
//!             .min_samples(50)                           // minimal number of samples per tile
//!             .begin(100_000.0)                          // starting time of analysis
//!             .end(200_000.0)                            // ending time of analysis
//!             .step(5)                                   // analyze every Nth frame of the trajectory
//!             .n_threads(4)                              // number of threads to use
//!             .build()?;
//!
//!     colog::init();
//!
//!     analysis.run()?.write()?;
//!
//!     Ok(())
//! }
//! ```

/// Version of the `memgrid` crate.
pub const MEMGRID_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of grid tiles per nanometer. Each tile is 0.1 x 0.1 nm.
pub(crate) const TILES_PER_NM: usize = 10;

/// Message that should be added to every panic.
pub(crate) const PANIC_MESSAGE: &str =
    "\n\n\n            >>> THIS SHOULD NOT HAVE HAPPENED! PLEASE REPORT THIS ERROR <<<
(open an issue at 'github.com/Ladme/memgrid/issues' or write an e-mail to 'ladmeb@gmail.com')\n\n";

/// Specifies leaflet an atom is part of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Leaflet {
    Upper,
    Lower,
}

impl Leaflet {
    /// Assign leaflet based on the signed offset from the membrane center.
    /// Offset of exactly zero belongs to the lower leaflet.
    #[inline(always)]
    pub(crate) fn from_offset(offset: f32) -> Leaflet {
        if offset > 0.0 {
            Leaflet::Upper
        } else {
            Leaflet::Lower
        }
    }
}

impl Display for Leaflet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Leaflet::Upper => write!(f, "upper"),
            Leaflet::Lower => write!(f, "lower"),
        }
    }
}

mod analysis;
mod auxiliary;
pub mod errors;
pub mod input;
pub mod presentation;

use std::fmt::Display;

pub use input::{Analysis, AnalysisType};

/// This module contains re-exported public structures of the `memgrid` crate.
pub mod prelude {
    pub use super::input::{analysis::AnalysisBuilder, Analysis, AnalysisType, Axis, GridSpan, Plane};

    pub use super::presentation::{
        AnalysisResults, GridResults, LeafletThicknessResults, MapKind, TileValue,
        WaterDefectResults,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaflet_from_offset() {
        assert_eq!(Leaflet::from_offset(0.3), Leaflet::Upper);
        assert_eq!(Leaflet::from_offset(-0.3), Leaflet::Lower);
        assert_eq!(Leaflet::from_offset(0.0), Leaflet::Lower);
        assert_eq!(Leaflet::from_offset(-0.0), Leaflet::Lower);
        assert_eq!(Leaflet::from_offset(f32::MIN_POSITIVE), Leaflet::Upper);
    }
}
