// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared value types for the tree-inventory model
//!
//! All lengths are meters and all diameters are diameters (not
//! circumferences); unit normalization happens upstream in the importer.

use serde::{Deserialize, Serialize};

/// A 3D point tagged with the EPSG code of its coordinate reference system.
///
/// Immutable after construction. Dedup equality during serialization is
/// decided on the `(x, y, z)` triple only; the EPSG tag is bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    /// EPSG code of the CRS the coordinates are expressed in
    pub epsg: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Create a new point
    #[inline]
    pub fn new(epsg: u32, x: f64, y: f64, z: f64) -> Self {
        Self { epsg, x, y, z }
    }

    /// Coordinate-only equality, ignoring the CRS tag.
    ///
    /// This is the equality used by the vertex dedup pass: two points
    /// collapse iff their coordinate triples compare equal.
    #[inline]
    pub fn same_position(&self, other: &Point3) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

/// Vegetation class of a tree.
///
/// The numeric codes follow the ALKIS vegetation catalog used by most
/// German tree cadastres (1070 deciduous, 1060 coniferous).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeClass {
    Deciduous,
    Coniferous,
    Unspecified,
}

impl TreeClass {
    /// Catalog code for this class, if it has one
    #[inline]
    pub fn code(&self) -> Option<u32> {
        match self {
            TreeClass::Deciduous => Some(1070),
            TreeClass::Coniferous => Some(1060),
            TreeClass::Unspecified => None,
        }
    }

    /// Map a catalog code back to a class
    #[inline]
    pub fn from_code(code: u32) -> Self {
        match code {
            1070 => TreeClass::Deciduous,
            1060 => TreeClass::Coniferous,
            _ => TreeClass::Unspecified,
        }
    }
}

/// A typed value of a generic (user-mapped) attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Int(i64),
    Double(f64),
    Text(String),
}

impl AttributeValue {
    /// CityGML generics element name for this value kind
    #[inline]
    pub fn gml_element(&self) -> &'static str {
        match self {
            AttributeValue::Int(_) => "gen:intAttribute",
            AttributeValue::Double(_) => "gen:doubleAttribute",
            AttributeValue::Text(_) => "gen:stringAttribute",
        }
    }

    /// Render the value as it appears in both output formats
    pub fn to_text(&self) -> String {
        match self {
            AttributeValue::Int(v) => v.to_string(),
            AttributeValue::Double(v) => v.to_string(),
            AttributeValue::Text(v) => v.clone(),
        }
    }
}

/// A named generic attribute carried through to the output document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericAttribute {
    pub name: String,
    pub value: AttributeValue,
}

impl GenericAttribute {
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Scalar parameters of one tree, as consumed by the shape builders.
///
/// A builder may only be invoked after the validator certified that the
/// parameter subset its shape needs is present.
#[derive(Debug, Clone, Copy)]
pub struct TreeParameters {
    /// Total tree height above the reference position, meters
    pub height: Option<f64>,
    /// Trunk diameter, meters
    pub trunk_diameter: Option<f64>,
    /// Crown diameter, meters
    pub crown_diameter: Option<f64>,
    /// Crown height (apex to crown onset), meters
    pub crown_height: Option<f64>,
    /// Vegetation class
    pub class: TreeClass,
    /// Ground reference position (already in the export CRS)
    pub position: Point3,
}

impl TreeParameters {
    /// Apex height: reference z plus tree height.
    ///
    /// Only meaningful when `height` is present.
    #[inline]
    pub fn apex(&self) -> Option<f64> {
        self.height.map(|h| self.position.z + h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_codes_round_trip() {
        assert_eq!(TreeClass::from_code(1070), TreeClass::Deciduous);
        assert_eq!(TreeClass::from_code(1060), TreeClass::Coniferous);
        assert_eq!(TreeClass::from_code(9999), TreeClass::Unspecified);
        assert_eq!(TreeClass::Deciduous.code(), Some(1070));
        assert_eq!(TreeClass::Unspecified.code(), None);
    }

    #[test]
    fn test_same_position_ignores_epsg() {
        let a = Point3::new(25832, 1.0, 2.0, 3.0);
        let b = Point3::new(4326, 1.0, 2.0, 3.0);
        assert!(a.same_position(&b));
        assert!(!a.same_position(&Point3::new(25832, 1.0, 2.0, 3.1)));
    }

    #[test]
    fn test_attribute_value_text() {
        assert_eq!(AttributeValue::Int(42).to_text(), "42");
        assert_eq!(AttributeValue::Text("oak".into()).to_text(), "oak");
        assert_eq!(
            AttributeValue::Double(1.5).gml_element(),
            "gen:doubleAttribute"
        );
    }
}
