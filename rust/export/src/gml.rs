// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GML 3.1.1 geometry elements
//!
//! Exhaustive mapping of the geometry model onto GML element trees:
//! Point, LineString, Polygon, CompositeSurface (with surfaceMember
//! wrappers), Solid and CompositeSolid (with solidMember wrappers).
//!
//! The CRS attributes (`srsName`, `srsDimension`) are attached to the
//! outermost element only; inner members carry nothing but their
//! `gml:id` so appearance targets can resolve them.

use crate::xml::XmlElement;
use arbo_lite_core::{
    CompositePolygon, CompositeSolid, GeoPoint, Geometry, LineString, Point3, Polygon, Solid,
};

/// `srsName` value for an EPSG code
#[inline]
pub fn srs_name(epsg: u32) -> String {
    format!("EPSG:{epsg}")
}

/// Convert a geometry to its GML element tree.
///
/// When `srs` is given it becomes the `srsName` of the outermost
/// element, together with `srsDimension="3"`.
pub fn gml_geometry(geometry: &Geometry, srs: Option<&str>) -> XmlElement {
    let element = match geometry {
        Geometry::Point(g) => gml_point(g),
        Geometry::LineString(g) => gml_line_string(g),
        Geometry::Polygon(g) => gml_polygon(g),
        Geometry::CompositePolygon(g) => gml_composite_surface(g),
        Geometry::Solid(g) => gml_solid(g),
        Geometry::CompositeSolid(g) => gml_composite_solid(g),
    };
    match srs {
        Some(name) => element.attr("srsName", name).attr("srsDimension", "3"),
        None => element,
    }
}

fn with_id(element: XmlElement, id: &Option<String>) -> XmlElement {
    match id {
        Some(id) => element.attr("gml:id", id),
        None => element,
    }
}

/// "x y z" with the shortest round-trip float representation
fn pos(point: &Point3) -> String {
    format!("{} {} {}", point.x, point.y, point.z)
}

fn pos_list(points: &[Point3]) -> String {
    points
        .iter()
        .map(pos)
        .collect::<Vec<_>>()
        .join(" ")
}

fn gml_point(point: &GeoPoint) -> XmlElement {
    with_id(XmlElement::new("gml:Point"), &point.id)
        .child(XmlElement::new("gml:pos").text(pos(&point.pos)))
}

fn gml_line_string(line: &LineString) -> XmlElement {
    with_id(XmlElement::new("gml:LineString"), &line.id)
        .child(XmlElement::new("gml:posList").text(pos_list(&line.points)))
}

fn gml_polygon(polygon: &Polygon) -> XmlElement {
    with_id(XmlElement::new("gml:Polygon"), &polygon.id).child(
        XmlElement::new("gml:exterior").child(
            XmlElement::new("gml:LinearRing")
                .child(XmlElement::new("gml:posList").text(pos_list(&polygon.ring))),
        ),
    )
}

fn gml_composite_surface(composite: &CompositePolygon) -> XmlElement {
    let mut element = with_id(XmlElement::new("gml:CompositeSurface"), &composite.id);
    for member in &composite.members {
        element.push(XmlElement::new("gml:surfaceMember").child(gml_polygon(member)));
    }
    element
}

fn gml_solid(solid: &Solid) -> XmlElement {
    with_id(XmlElement::new("gml:Solid"), &solid.id)
        .child(XmlElement::new("gml:exterior").child(gml_composite_surface(&solid.exterior)))
}

fn gml_composite_solid(composite: &CompositeSolid) -> XmlElement {
    let mut element = with_id(XmlElement::new("gml:CompositeSolid"), &composite.id);
    for member in &composite.members {
        element.push(XmlElement::new("gml:solidMember").child(gml_solid(member)));
    }
    element
}
