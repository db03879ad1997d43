// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry model
//!
//! Six shape kinds as one closed sum type: Point, LineString, Polygon,
//! CompositePolygon (multi-panel surface), Solid (one exterior shell) and
//! CompositeSolid (union of solids). Instances are plain data holders;
//! builders own all construction logic and serializers own all format
//! logic, both as exhaustive matches over the variants.
//!
//! A composite owns its children exclusively. Every shape carries an
//! optional stable string identifier, used only as a CityGML appearance
//! target.

use crate::error::{Error, Result};
use crate::types::Point3;

/// Coordinate reprojection, consumed as a black box.
///
/// Reprojection is 2D only: `z` is passed through unchanged by every
/// caller. An out-of-domain coordinate is a hard error for the tree
/// being processed, never silently zeroed.
pub trait Reprojector {
    /// EPSG code of the target CRS
    fn target_epsg(&self) -> u32;

    /// Reproject a single xy pair into the target CRS
    fn reproject_xy(&self, x: f64, y: f64) -> Result<(f64, f64)>;

    /// Reproject a point, passing z through unchanged
    fn reproject(&self, point: &Point3) -> Result<Point3> {
        let (x, y) = self.reproject_xy(point.x, point.y)?;
        Ok(Point3::new(self.target_epsg(), x, y, point.z))
    }
}

/// A single position
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub id: Option<String>,
    pub pos: Point3,
}

/// An open polyline of two or more positions
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    pub id: Option<String>,
    pub points: Vec<Point3>,
}

/// One closed exterior ring, no interior rings.
///
/// Builders close rings explicitly by repeating the first point; the
/// closing duplicate is part of the stored ring. At least 3 distinct
/// points are required before a serializer may consume the polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub id: Option<String>,
    pub ring: Vec<Point3>,
}

impl Polygon {
    pub fn new(id: Option<String>, ring: Vec<Point3>) -> Self {
        debug_assert!(ring.len() >= 3, "polygon ring needs at least 3 points");
        Self { id, ring }
    }

    /// Whether the ring repeats its first point at the end
    #[inline]
    pub fn is_closed(&self) -> bool {
        match (self.ring.first(), self.ring.last()) {
            (Some(first), Some(last)) => first.same_position(last),
            _ => false,
        }
    }
}

/// An ordered collection of polygon panels forming one surface
#[derive(Debug, Clone, PartialEq)]
pub struct CompositePolygon {
    pub id: Option<String>,
    pub members: Vec<Polygon>,
}

/// One solid bounded by a single exterior shell.
///
/// Watertightness of the shell is a builder contract; the model does not
/// validate closure.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub id: Option<String>,
    pub exterior: CompositePolygon,
}

/// An ordered union of solids (e.g. stem solid plus crown solid)
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeSolid {
    pub id: Option<String>,
    pub members: Vec<Solid>,
}

/// Any geometry attachable to a tree at one LOD
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    LineString(LineString),
    Polygon(Polygon),
    CompositePolygon(CompositePolygon),
    Solid(Solid),
    CompositeSolid(CompositeSolid),
}

impl Geometry {
    /// Identifier of the outermost shape, if any
    pub fn id(&self) -> Option<&str> {
        match self {
            Geometry::Point(g) => g.id.as_deref(),
            Geometry::LineString(g) => g.id.as_deref(),
            Geometry::Polygon(g) => g.id.as_deref(),
            Geometry::CompositePolygon(g) => g.id.as_deref(),
            Geometry::Solid(g) => g.id.as_deref(),
            Geometry::CompositeSolid(g) => g.id.as_deref(),
        }
    }

    /// Reproject every owned point into the target CRS.
    ///
    /// Returns a structurally identical new instance of the same variant.
    /// z coordinates are passed through unchanged (2D-only reprojection).
    pub fn transform(&self, reprojector: &dyn Reprojector) -> Result<Geometry> {
        Ok(match self {
            Geometry::Point(g) => Geometry::Point(GeoPoint {
                id: g.id.clone(),
                pos: reprojector.reproject(&g.pos)?,
            }),
            Geometry::LineString(g) => Geometry::LineString(LineString {
                id: g.id.clone(),
                points: transform_points(&g.points, reprojector)?,
            }),
            Geometry::Polygon(g) => Geometry::Polygon(transform_polygon(g, reprojector)?),
            Geometry::CompositePolygon(g) => {
                Geometry::CompositePolygon(transform_composite(g, reprojector)?)
            }
            Geometry::Solid(g) => Geometry::Solid(transform_solid(g, reprojector)?),
            Geometry::CompositeSolid(g) => Geometry::CompositeSolid(CompositeSolid {
                id: g.id.clone(),
                members: g
                    .members
                    .iter()
                    .map(|s| transform_solid(s, reprojector))
                    .collect::<Result<_>>()?,
            }),
        })
    }

    /// Visit every point of the geometry in traversal order
    pub fn for_each_point(&self, f: &mut dyn FnMut(&Point3)) {
        match self {
            Geometry::Point(g) => f(&g.pos),
            Geometry::LineString(g) => g.points.iter().for_each(|p| f(p)),
            Geometry::Polygon(g) => g.ring.iter().for_each(|p| f(p)),
            Geometry::CompositePolygon(g) => {
                for m in &g.members {
                    m.ring.iter().for_each(|p| f(p));
                }
            }
            Geometry::Solid(g) => {
                Geometry::CompositePolygon(g.exterior.clone()).for_each_point(f)
            }
            Geometry::CompositeSolid(g) => {
                for s in &g.members {
                    Geometry::Solid(s.clone()).for_each_point(f);
                }
            }
        }
    }

    /// Guard against structurally invalid shapes reaching a serializer
    pub fn check_structure(&self) -> Result<()> {
        match self {
            Geometry::Point(_) => Ok(()),
            Geometry::LineString(g) if g.points.len() >= 2 => Ok(()),
            Geometry::LineString(_) => Err(Error::DegenerateGeometry(
                "line string with fewer than 2 points".into(),
            )),
            Geometry::Polygon(g) => check_ring(g),
            Geometry::CompositePolygon(g) => g.members.iter().try_for_each(check_ring),
            Geometry::Solid(g) => g.exterior.members.iter().try_for_each(check_ring),
            Geometry::CompositeSolid(g) => g
                .members
                .iter()
                .flat_map(|s| s.exterior.members.iter())
                .try_for_each(check_ring),
        }
    }
}

fn check_ring(polygon: &Polygon) -> Result<()> {
    if polygon.ring.len() < 3 {
        return Err(Error::DegenerateGeometry(format!(
            "polygon {} has fewer than 3 points",
            polygon.id.as_deref().unwrap_or("<anonymous>")
        )));
    }
    Ok(())
}

fn transform_points(points: &[Point3], reprojector: &dyn Reprojector) -> Result<Vec<Point3>> {
    points.iter().map(|p| reprojector.reproject(p)).collect()
}

fn transform_polygon(polygon: &Polygon, reprojector: &dyn Reprojector) -> Result<Polygon> {
    Ok(Polygon {
        id: polygon.id.clone(),
        ring: transform_points(&polygon.ring, reprojector)?,
    })
}

fn transform_composite(
    composite: &CompositePolygon,
    reprojector: &dyn Reprojector,
) -> Result<CompositePolygon> {
    Ok(CompositePolygon {
        id: composite.id.clone(),
        members: composite
            .members
            .iter()
            .map(|m| transform_polygon(m, reprojector))
            .collect::<Result<_>>()?,
    })
}

fn transform_solid(solid: &Solid, reprojector: &dyn Reprojector) -> Result<Solid> {
    Ok(Solid {
        id: solid.id.clone(),
        exterior: transform_composite(&solid.exterior, reprojector)?,
    })
}
