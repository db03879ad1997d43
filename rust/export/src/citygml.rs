// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CityGML 2.0 document encoder
//!
//! One `veg:SolitaryVegetationObject` per tree inside a `core:CityModel`,
//! with the 2D envelope inserted as the first child once all trees are
//! collected. Geometry is embedded per LOD either directly
//! (`veg:lodNGeometry`) or as an implicit representation instanced
//! through a per-tree reference point.
//!
//! With appearance enabled, up to three `app:X3DMaterial` entries color
//! the stem and crown polygons through their identifiers.

use crate::error::Result;
use crate::gml::{gml_geometry, srs_name};
use crate::xml::{XmlDocument, XmlElement};
use arbo_lite_core::{
    ExportConfig, GenericAttribute, Geometry, GeometryMode, Lod, Polygon, TreeClass, TreeModel,
    ALL_LODS,
};

const XMLNS_CORE: &str = "http://www.opengis.net/citygml/2.0";
const XMLNS_GML: &str = "http://www.opengis.net/gml";
const XMLNS_VEG: &str = "http://www.opengis.net/citygml/vegetation/2.0";
const XMLNS_GEN: &str = "http://www.opengis.net/citygml/generics/2.0";
const XMLNS_APP: &str = "http://www.opengis.net/citygml/appearance/2.0";
const XMLNS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str = "http://www.opengis.net/citygml/vegetation/2.0 \
     http://schemas.opengis.net/citygml/vegetation/2.0/vegetation.xsd";

/// Row-major 4x4 identity, the only transformation implicit geometry uses
const IDENTITY_MATRIX: &str = "1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1";

const STEM_COLOR: &str = "0.45 0.27 0.14";
const DECIDUOUS_CROWN_COLOR: &str = "0.22 0.55 0.17";
const CONIFEROUS_CROWN_COLOR: &str = "0.11 0.35 0.16";

/// Encodes assembled tree models into one CityGML 2.0 document
pub struct CityGmlEncoder<'a> {
    config: &'a ExportConfig,
}

impl<'a> CityGmlEncoder<'a> {
    pub fn new(config: &'a ExportConfig) -> Self {
        Self { config }
    }

    /// Encode all trees into a UTF-8 document
    pub fn encode(&self, trees: &[TreeModel]) -> Result<Vec<u8>> {
        let srs = srs_name(self.config.epsg_output);
        let mut root = XmlElement::new("core:CityModel")
            .attr("xmlns:core", XMLNS_CORE)
            .attr("xmlns:gml", XMLNS_GML)
            .attr("xmlns:veg", XMLNS_VEG)
            .attr("xmlns:gen", XMLNS_GEN)
            .attr("xmlns:app", XMLNS_APP)
            .attr("xmlns:xsi", XMLNS_XSI)
            .attr("xsi:schemaLocation", SCHEMA_LOCATION);

        let mut envelope = Envelope2d::default();
        let mut targets = AppearanceTargets::default();

        for (index, tree) in trees.iter().enumerate() {
            self.track_extent(tree, &mut envelope);
            if self.config.use_appearance {
                targets.collect(tree);
            }
            root.push(
                XmlElement::new("core:cityObjectMember")
                    .child(self.vegetation_object(index, tree, &srs)),
            );
        }

        // envelope first, appearance members right behind it, ahead of
        // the trees
        if self.config.use_appearance {
            for member in targets.appearance_members().into_iter().rev() {
                root.insert(0, member);
            }
        }
        if let Some(bounded_by) = envelope.bounded_by(&srs) {
            root.insert(0, bounded_by);
        }

        XmlDocument::new(root).to_bytes(self.config.pretty_print)
    }

    fn vegetation_object(&self, index: usize, tree: &TreeModel, srs: &str) -> XmlElement {
        let mut object = XmlElement::new("veg:SolitaryVegetationObject")
            .attr("gml:id", format!("tree{index}"))
            .child(
                XmlElement::new("core:creationDate")
                    .text(chrono::Local::now().format("%Y-%m-%d").to_string()),
            );

        if self.config.generate_generic_attributes {
            for attribute in &tree.generics {
                object.push(generic_attribute(attribute));
            }
        }

        if let Some(code) = tree.class.code() {
            object.push(XmlElement::new("veg:class").text(code.to_string()));
        }
        if let Some(species) = &tree.species {
            object.push(XmlElement::new("veg:species").text(species.clone()));
        }
        if let Some(height) = tree.height {
            object.push(measured("veg:height", height));
        }
        if let Some(trunk) = tree.trunk_diameter {
            object.push(measured("veg:trunkDiameter", trunk));
        }
        if let Some(crown) = tree.crown_diameter {
            object.push(measured("veg:crownDiameter", crown));
        }

        for lod in ALL_LODS {
            if let Some(geometry) = tree.geometry(lod) {
                object.push(self.lod_property(lod, geometry, tree, srs));
            }
        }
        object
    }

    fn lod_property(
        &self,
        lod: Lod,
        geometry: &Geometry,
        tree: &TreeModel,
        srs: &str,
    ) -> XmlElement {
        match self.config.geometry_mode {
            GeometryMode::Explicit => XmlElement::new(format!("veg:lod{}Geometry", lod.number()))
                .child(gml_geometry(geometry, Some(srs))),
            GeometryMode::Implicit => {
                let reference_point = XmlElement::new("core:referencePoint").child(
                    XmlElement::new("gml:Point")
                        .attr("srsName", srs)
                        .attr("srsDimension", "3")
                        .child(XmlElement::new("gml:pos").text(format!(
                            "{} {} {}",
                            tree.position.x, tree.position.y, tree.position.z
                        ))),
                );
                XmlElement::new(format!("veg:lod{}ImplicitRepresentation", lod.number())).child(
                    XmlElement::new("core:ImplicitGeometry")
                        .child(
                            XmlElement::new("core:transformationMatrix").text(IDENTITY_MATRIX),
                        )
                        .child(
                            XmlElement::new("core:relativeGMLGeometry")
                                .child(gml_geometry(geometry, None)),
                        )
                        .child(reference_point),
                )
            }
        }
    }

    /// Implicit documents are bounded by their reference points; explicit
    /// documents by every embedded vertex.
    fn track_extent(&self, tree: &TreeModel, envelope: &mut Envelope2d) {
        match self.config.geometry_mode {
            GeometryMode::Explicit => {
                for lod in ALL_LODS {
                    if let Some(geometry) = tree.geometry(lod) {
                        geometry.for_each_point(&mut |p| envelope.update(p.x, p.y));
                    }
                }
            }
            GeometryMode::Implicit => {
                if tree.has_geometry() {
                    envelope.update(tree.position.x, tree.position.y);
                }
            }
        }
    }
}

fn measured(name: &str, value: f64) -> XmlElement {
    XmlElement::new(name).attr("uom", "m").text(value.to_string())
}

fn generic_attribute(attribute: &GenericAttribute) -> XmlElement {
    XmlElement::new(attribute.value.gml_element())
        .attr("name", attribute.name.clone())
        .child(XmlElement::new("gen:value").text(attribute.value.to_text()))
}

/// Running 2D extent, reported at centimeter resolution
#[derive(Debug, Default)]
struct Envelope2d {
    bounds: Option<(f64, f64, f64, f64)>,
}

impl Envelope2d {
    fn update(&mut self, x: f64, y: f64) {
        self.bounds = Some(match self.bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    /// The `gml:boundedBy` element, if any point was tracked; both
    /// corners rounded to two decimals
    fn bounded_by(&self, srs: &str) -> Option<XmlElement> {
        let (min_x, min_y, max_x, max_y) = self.bounds?;
        let round2 = |v: f64| (v * 100.0).round() / 100.0;
        Some(
            XmlElement::new("gml:boundedBy").child(
                XmlElement::new("gml:Envelope")
                    .attr("srsName", srs)
                    .attr("srsDimension", "2")
                    .child(
                        XmlElement::new("gml:lowerCorner")
                            .text(format!("{} {}", round2(min_x), round2(min_y))),
                    )
                    .child(
                        XmlElement::new("gml:upperCorner")
                            .text(format!("{} {}", round2(max_x), round2(max_y))),
                    ),
            ),
        )
    }
}

/// Polygon identifiers partitioned into the three material groups
#[derive(Debug, Default)]
struct AppearanceTargets {
    stem: Vec<String>,
    deciduous_crown: Vec<String>,
    coniferous_crown: Vec<String>,
}

impl AppearanceTargets {
    /// Part kind is recoverable from the identifier scheme the builders
    /// use; crown color follows the tree class.
    fn collect(&mut self, tree: &TreeModel) {
        for lod in ALL_LODS {
            if let Some(geometry) = tree.geometry(lod) {
                for_each_polygon(geometry, &mut |polygon| {
                    let Some(id) = &polygon.id else { return };
                    if id.contains("_stempolygon") {
                        self.stem.push(id.clone());
                    } else if id.contains("_crownpolygon") {
                        match tree.class {
                            TreeClass::Coniferous => self.coniferous_crown.push(id.clone()),
                            _ => self.deciduous_crown.push(id.clone()),
                        }
                    }
                });
            }
        }
    }

    /// One `app:appearanceMember` per non-empty material group, in
    /// stem, deciduous-crown, coniferous-crown order
    fn appearance_members(&self) -> Vec<XmlElement> {
        let groups = [
            (STEM_COLOR, &self.stem),
            (DECIDUOUS_CROWN_COLOR, &self.deciduous_crown),
            (CONIFEROUS_CROWN_COLOR, &self.coniferous_crown),
        ];
        let mut members = Vec::new();
        for (color, ids) in groups {
            if ids.is_empty() {
                continue;
            }
            let mut material = XmlElement::new("app:X3DMaterial")
                .child(XmlElement::new("app:diffuseColor").text(color));
            for id in ids {
                material.push(XmlElement::new("app:target").text(format!("#{id}")));
            }
            members.push(
                XmlElement::new("app:appearanceMember").child(
                    XmlElement::new("app:Appearance")
                        .child(XmlElement::new("app:theme").text("default"))
                        .child(XmlElement::new("app:surfaceDataMember").child(material)),
                ),
            );
        }
        members
    }
}

fn for_each_polygon(geometry: &Geometry, f: &mut dyn FnMut(&Polygon)) {
    match geometry {
        Geometry::Point(_) | Geometry::LineString(_) => {}
        Geometry::Polygon(p) => f(p),
        Geometry::CompositePolygon(c) => c.members.iter().for_each(|p| f(p)),
        Geometry::Solid(s) => s.exterior.members.iter().for_each(|p| f(p)),
        Geometry::CompositeSolid(c) => {
            for solid in &c.members {
                solid.exterior.members.iter().for_each(|p| f(p));
            }
        }
    }
}
