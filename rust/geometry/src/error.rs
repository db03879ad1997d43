// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry construction
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing tree geometry
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing parameter '{name}' for shape code {shape}")]
    MissingParameter { shape: u8, name: &'static str },

    #[error("Invalid segment count {count} for shape code {shape}")]
    InvalidSegments { shape: u8, count: u32 },

    #[error("Non-positive parameter '{name}': {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },

    #[error("Trunk diameter {trunk} exceeds crown diameter {crown}")]
    TrunkWiderThanCrown { trunk: f64, crown: f64 },

    #[error("Core model error: {0}")]
    Core(#[from] arbo_lite_core::Error),
}
