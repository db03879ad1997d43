// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CityJSON 1.0 document encoder
//!
//! One `SolitaryVegetationObject` per tree keyed by its source
//! identifier, sharing a single document-global vertex list. Per-tree
//! indexed geometries are appended in order, their boundary indices
//! shifted by the vertices contributed by earlier trees; vertices are
//! deduplicated within one tree only, never across trees.
//!
//! CityJSON has no implicit-geometry representation, so an
//! implicit-mode run is refused up front.

use crate::error::{Error, Result};
use arbo_lite_core::{
    to_indexed, AttributeValue, ExportConfig, GeometryMode, IndexTree, TreeModel, ALL_LODS,
};
use serde_json::{json, Map, Value};

/// Encodes assembled tree models into one CityJSON 1.0 document
pub struct CityJsonEncoder<'a> {
    config: &'a ExportConfig,
}

impl<'a> CityJsonEncoder<'a> {
    pub fn new(config: &'a ExportConfig) -> Self {
        Self { config }
    }

    /// Encode all trees into a UTF-8 document
    pub fn encode(&self, trees: &[TreeModel]) -> Result<Vec<u8>> {
        if self.config.geometry_mode == GeometryMode::Implicit {
            return Err(Error::ImplicitUnsupported);
        }

        let mut vertices: Vec<[f64; 3]> = Vec::new();
        let mut city_objects = Map::new();
        for tree in trees {
            city_objects.insert(tree.id.clone(), self.city_object(tree, &mut vertices));
        }

        let mut document = Map::new();
        document.insert("type".into(), json!("CityJSON"));
        document.insert("version".into(), json!("1.0"));
        document.insert("metadata".into(), metadata(self.config.epsg_output, &vertices));
        document.insert("CityObjects".into(), Value::Object(city_objects));
        document.insert(
            "vertices".into(),
            Value::Array(
                vertices
                    .iter()
                    .map(|v| json!([v[0], v[1], v[2]]))
                    .collect(),
            ),
        );

        let value = Value::Object(document);
        let bytes = if self.config.pretty_print {
            serde_json::to_vec_pretty(&value)?
        } else {
            serde_json::to_vec(&value)?
        };
        Ok(bytes)
    }

    fn city_object(&self, tree: &TreeModel, vertices: &mut Vec<[f64; 3]>) -> Value {
        let mut geometries = Vec::new();
        for lod in ALL_LODS {
            if let Some(geometry) = tree.geometry(lod) {
                let indexed = to_indexed(geometry);
                let boundaries = indexed.boundaries.offset(vertices.len());
                vertices.extend(indexed.vertices.iter().map(|p| [p.x, p.y, p.z]));
                geometries.push(json!({
                    "type": indexed.semantic_type,
                    "lod": lod.number(),
                    "boundaries": index_tree_to_json(&boundaries),
                }));
            }
        }

        let mut object = Map::new();
        object.insert("type".into(), json!("SolitaryVegetationObject"));
        object.insert("attributes".into(), self.attributes(tree));
        object.insert("geometry".into(), Value::Array(geometries));
        Value::Object(object)
    }

    fn attributes(&self, tree: &TreeModel) -> Value {
        let mut attributes = Map::new();
        if let Some(code) = tree.class.code() {
            attributes.insert("class".into(), json!(code));
        }
        if let Some(species) = &tree.species {
            attributes.insert("species".into(), json!(species));
        }
        if let Some(height) = tree.height {
            attributes.insert("height".into(), json!(height));
        }
        if let Some(trunk) = tree.trunk_diameter {
            attributes.insert("trunkDiameter".into(), json!(trunk));
        }
        if let Some(crown) = tree.crown_diameter {
            attributes.insert("crownDiameter".into(), json!(crown));
        }
        if self.config.generate_generic_attributes {
            for generic in &tree.generics {
                attributes.insert(
                    generic.name.clone(),
                    match &generic.value {
                        AttributeValue::Int(v) => json!(v),
                        AttributeValue::Double(v) => json!(v),
                        AttributeValue::Text(v) => json!(v),
                    },
                );
            }
        }
        Value::Object(attributes)
    }
}

fn metadata(epsg: u32, vertices: &[[f64; 3]]) -> Value {
    let mut metadata = Map::new();
    metadata.insert(
        "referenceSystem".into(),
        json!(format!("urn:ogc:def:crs:EPSG::{epsg}")),
    );
    if let Some(extent) = geographical_extent(vertices) {
        metadata.insert("geographicalExtent".into(), json!(extent));
    }
    Value::Object(metadata)
}

/// `[min_x, min_y, min_z, max_x, max_y, max_z]` over the global vertices
fn geographical_extent(vertices: &[[f64; 3]]) -> Option<[f64; 6]> {
    let first = vertices.first()?;
    let mut extent = [first[0], first[1], first[2], first[0], first[1], first[2]];
    for v in vertices {
        for axis in 0..3 {
            extent[axis] = extent[axis].min(v[axis]);
            extent[axis + 3] = extent[axis + 3].max(v[axis]);
        }
    }
    Some(extent)
}

fn index_tree_to_json(tree: &IndexTree) -> Value {
    match tree {
        IndexTree::Leaf(index) => json!(index),
        IndexTree::Group(children) => {
            Value::Array(children.iter().map(index_tree_to_json).collect())
        }
    }
}
