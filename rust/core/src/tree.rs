// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tree model assembly
//!
//! A [`TreeRow`] is the flat record the importer hands over, one per
//! source row. The assembler turns it into a [`TreeModel`], applying the
//! configured defaults. Geometry is attached per LOD by the export loop
//! and the finished model is consumed exactly once by a format encoder.

use crate::config::{ExportConfig, Lod};
use crate::geometry::Geometry;
use crate::types::{GenericAttribute, Point3, TreeClass, TreeParameters};

/// One source row, scalar attributes already unit-normalized to meters
#[derive(Debug, Clone, Default)]
pub struct TreeRow {
    pub id: String,
    /// Vegetation catalog code, if mapped
    pub class_code: Option<u32>,
    /// Species code or name, if mapped
    pub species: Option<String>,
    pub x: f64,
    pub y: f64,
    /// Ground elevation at the trunk position
    pub reference_height: f64,
    pub height: Option<f64>,
    pub trunk_diameter: Option<f64>,
    pub crown_diameter: Option<f64>,
    pub crown_height: Option<f64>,
    /// Additional user-mapped attributes, in mapping order
    pub generics: Vec<GenericAttribute>,
}

/// Fully assembled per-tree export record
#[derive(Debug, Clone)]
pub struct TreeModel {
    pub id: String,
    pub class: TreeClass,
    pub species: Option<String>,
    pub height: Option<f64>,
    pub trunk_diameter: Option<f64>,
    pub crown_diameter: Option<f64>,
    pub crown_height: Option<f64>,
    /// Trunk ground position in the export CRS
    pub position: Point3,
    pub generics: Vec<GenericAttribute>,
    /// One optional geometry per LOD (index 0 = LOD1)
    pub lods: [Option<Geometry>; 4],
}

impl TreeModel {
    /// Assemble a model from a source row, applying configured defaults.
    ///
    /// The position is stamped with the input CRS; the export loop
    /// reprojects it before any geometry is built.
    pub fn assemble(row: TreeRow, config: &ExportConfig) -> TreeModel {
        let class = match row.class_code.map(TreeClass::from_code) {
            Some(TreeClass::Unspecified) | None => config.default_class,
            Some(class) => class,
        };
        let crown_diameter = row
            .crown_diameter
            .or_else(|| config.effective_default_crown_diameter());
        TreeModel {
            id: row.id,
            class,
            species: row.species,
            height: row.height,
            trunk_diameter: row.trunk_diameter,
            crown_diameter,
            crown_height: row.crown_height,
            position: Point3::new(config.epsg_input, row.x, row.y, row.reference_height),
            generics: row.generics,
            lods: [None, None, None, None],
        }
    }

    /// Scalar parameter view consumed by validator and builders
    #[inline]
    pub fn parameters(&self) -> TreeParameters {
        TreeParameters {
            height: self.height,
            trunk_diameter: self.trunk_diameter,
            crown_diameter: self.crown_diameter,
            crown_height: self.crown_height,
            class: self.class,
            position: self.position,
        }
    }

    /// Attach a generated geometry for one LOD
    #[inline]
    pub fn attach(&mut self, lod: Lod, geometry: Geometry) {
        self.lods[lod.index()] = Some(geometry);
    }

    /// Geometry attached for one LOD, if any
    #[inline]
    pub fn geometry(&self, lod: Lod) -> Option<&Geometry> {
        self.lods[lod.index()].as_ref()
    }

    /// Whether any LOD carries a geometry
    pub fn has_geometry(&self) -> bool {
        self.lods.iter().any(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CrownHeightMode, GeometryMode, LodSetup, ShapeKind};

    fn config() -> ExportConfig {
        ExportConfig {
            epsg_input: 25832,
            epsg_output: 25832,
            geometry_mode: GeometryMode::Explicit,
            crown_height_mode: CrownHeightMode::Explicit,
            default_class: TreeClass::Coniferous,
            default_crown_diameter: Some(2.0),
            lods: [
                Some(LodSetup {
                    shape: ShapeKind::Line,
                    segments: 5,
                }),
                None,
                None,
                None,
            ],
            generate_generic_attributes: false,
            use_appearance: false,
            pretty_print: false,
        }
    }

    #[test]
    fn test_assemble_applies_defaults() {
        let row = TreeRow {
            id: "t1".into(),
            x: 500.0,
            y: 600.0,
            reference_height: 12.5,
            height: Some(10.0),
            ..Default::default()
        };
        let model = TreeModel::assemble(row, &config());
        assert_eq!(model.class, TreeClass::Coniferous);
        // configured default of 2.0 is radius-equivalent, doubled
        assert_eq!(model.crown_diameter, Some(4.0));
        assert_eq!(model.position, Point3::new(25832, 500.0, 600.0, 12.5));
        assert!(!model.has_geometry());
    }

    #[test]
    fn test_assemble_keeps_mapped_values() {
        let row = TreeRow {
            id: "t2".into(),
            class_code: Some(1070),
            crown_diameter: Some(7.0),
            ..Default::default()
        };
        let model = TreeModel::assemble(row, &config());
        assert_eq!(model.class, TreeClass::Deciduous);
        assert_eq!(model.crown_diameter, Some(7.0));
    }

    #[test]
    fn test_attach_and_lookup() {
        let mut model = TreeModel::assemble(TreeRow::default(), &config());
        assert!(model.geometry(Lod::Lod2).is_none());
        model.attach(
            Lod::Lod2,
            Geometry::Point(crate::geometry::GeoPoint {
                id: None,
                pos: Point3::new(25832, 0.0, 0.0, 0.0),
            }),
        );
        assert!(model.geometry(Lod::Lod2).is_some());
        assert!(model.geometry(Lod::Lod1).is_none());
        assert!(model.has_geometry());
    }
}
