// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Arbo-Lite Geometry
//!
//! Procedural tree geometry generation: six interchangeable shape
//! builders (line, cylinder, billboard rectangle, billboard outline,
//! cuboid, detailed revolved solid), the per-shape parameter validator
//! gating them, and planar reprojection implementations.
//!
//! Builders are pure: scalar tree parameters in, a composite geometry
//! plus part-identifier lists out. All trigonometric construction uses
//! [nalgebra](https://docs.rs/nalgebra) for the radial direction math.

pub mod builders;
pub mod error;
pub mod reproject;
pub mod validator;

// Re-export the nalgebra type used in builder signatures
pub use nalgebra::Vector2;

pub use builders::{build_shape, BuildRequest, BuiltGeometry, PartIds};
pub use error::{Error, Result};
pub use reproject::{reproject_point, IdentityReprojection, PlanarReprojection};
pub use validator::validate;
