// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for encoder and export-run operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding documents or driving an
/// export run
#[derive(Error, Debug)]
pub enum Error {
    /// CityJSON has no implicit-geometry representation; the run must
    /// be configured with explicit placement for this format.
    #[error("CityJSON output requires explicit geometry placement")]
    ImplicitUnsupported,

    #[error("Input EPSG {from} differs from output EPSG {to} but no reprojector was supplied")]
    ReprojectorRequired { from: u32, to: u32 },

    #[error("XML write failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] arbo_lite_core::Error),

    #[error(transparent)]
    Geometry(#[from] arbo_lite_geometry::Error),
}
