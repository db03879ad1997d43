// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for model and configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling tree models or validating
/// an export configuration
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid segment count {count} for shape code {shape}")]
    InvalidSegments { shape: u8, count: u32 },

    #[error("Invalid attribute value for '{0}'")]
    InvalidAttribute(String),

    #[error("Reprojection failed: {0}")]
    Reprojection(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
}
