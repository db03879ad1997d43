// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Arbo-Lite Export
//!
//! Format encoders and the per-tree export pipeline:
//!
//! - **CityGML 2.0**: `veg:SolitaryVegetationObject` members inside a
//!   `core:CityModel`, explicit or implicit geometry, optional
//!   appearance materials
//! - **CityJSON 1.0**: indexed geometries over one global vertex list
//!   (explicit placement only)
//! - **Export run**: validator-gated shape construction per tree and
//!   LOD, with progress reporting and cancellation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arbo_lite_core::{ExportConfig, TreeRow};
//! use arbo_lite_export::Exporter;
//!
//! # fn demo(config: &ExportConfig, rows: Vec<TreeRow>) -> arbo_lite_export::Result<()> {
//! let exporter = Exporter::new(config)?;
//! let prepared = exporter.run(rows)?;
//! let citygml = exporter.encode_citygml(&prepared.models)?;
//! std::fs::write("trees.gml", citygml)?;
//! # Ok(())
//! # }
//! ```

pub mod citygml;
pub mod cityjson;
pub mod error;
pub mod gml;
pub mod run;
pub mod xml;

pub use citygml::CityGmlEncoder;
pub use cityjson::CityJsonEncoder;
pub use error::{Error, Result};
pub use gml::{gml_geometry, srs_name};
pub use run::{ExportSummary, Exporter, PreparedExport};
pub use xml::{XmlDocument, XmlElement};
