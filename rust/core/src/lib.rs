// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Arbo-Lite Core
//!
//! Shared model types for the tree-inventory → city-model export engine:
//!
//! - **Geometry model**: six shape kinds (Point, LineString, Polygon,
//!   CompositePolygon, Solid, CompositeSolid) as one closed sum type
//! - **Indexed form**: CityJSON-style vertex/boundary bookkeeping with
//!   a typed recursive index tree and the vertex dedup pass
//! - **Tree model**: per-row record assembly with configured defaults
//! - **Configuration**: validated per-run export options
//!
//! ## Quick Start
//!
//! ```rust
//! use arbo_lite_core::{ExportConfig, TreeModel, TreeRow};
//! # use arbo_lite_core::{CrownHeightMode, GeometryMode, LodSetup, ShapeKind, TreeClass};
//!
//! # let config = ExportConfig {
//! #     epsg_input: 25832,
//! #     epsg_output: 25832,
//! #     geometry_mode: GeometryMode::Explicit,
//! #     crown_height_mode: CrownHeightMode::Explicit,
//! #     default_class: TreeClass::Deciduous,
//! #     default_crown_diameter: None,
//! #     lods: [Some(LodSetup { shape: ShapeKind::Line, segments: 5 }), None, None, None],
//! #     generate_generic_attributes: false,
//! #     use_appearance: false,
//! #     pretty_print: false,
//! # };
//! config.validate().unwrap();
//! let row = TreeRow {
//!     id: "tree-17".into(),
//!     x: 512000.0,
//!     y: 5403000.0,
//!     reference_height: 101.5,
//!     height: Some(12.0),
//!     ..Default::default()
//! };
//! let model = TreeModel::assemble(row, &config);
//! assert!(model.height.is_some());
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod indexed;
pub mod tree;
pub mod types;

pub use config::{
    CrownHeightMode, ExportConfig, GeometryMode, Lod, LodSetup, ShapeKind, ALL_LODS,
};
pub use error::{Error, Result};
pub use geometry::{
    CompositePolygon, CompositeSolid, GeoPoint, Geometry, LineString, Polygon, Reprojector, Solid,
};
pub use indexed::{to_indexed, IndexTree, IndexedGeometry};
pub use tree::{TreeModel, TreeRow};
pub use types::{AttributeValue, GenericAttribute, Point3, TreeClass, TreeParameters};
