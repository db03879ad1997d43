// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape builders
//!
//! Pure functions turning a tree's scalar parameters into a composite
//! geometry plus the per-part identifier lists the CityGML appearance
//! block targets later. One module per shape family, dispatched by
//! geometry-type code and, for class-dependent shapes, by tree class.
//!
//! Conventions shared by all builders:
//!
//! - Rings and fans sample `segments` uniform angles over `[0, 2π)` in
//!   radians and are sampled counter-clockwise seen from +Z.
//! - Every ring connects back to sample 0; wall and fan polygons repeat
//!   their first point to close the ring.
//! - Crown onset = apex − crown height; apex = reference z + height.
//! - Deciduous crowns are lowered by the trunk-intersection delta so the
//!   clipped bottom lands exactly on the onset height. The revolved
//!   solid pins its apex vertex at exact apex height; the billboard
//!   outline dome tops out at apex minus the delta. Coniferous crowns
//!   never apply the delta.

mod billboard;
mod cuboid;
mod cylinder;
mod line;
mod revolved;

use crate::error::{Error, Result};
use arbo_lite_core::{GeometryMode, Lod, Point3, ShapeKind, TreeClass, TreeParameters};
use arbo_lite_core::Geometry;
use nalgebra::Vector2;
use std::f64::consts::TAU;

/// Everything a builder needs for one tree at one LOD
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest<'a> {
    pub tree_id: &'a str,
    pub lod: Lod,
    pub params: &'a TreeParameters,
    /// Angular tessellation count
    pub segments: u32,
    pub mode: GeometryMode,
    /// Crown height resolved by the configured mode, meters
    pub crown_height: Option<f64>,
}

impl BuildRequest<'_> {
    /// Base position the geometry is built around: the absolute trunk
    /// position in explicit mode, `(0, 0, reference z)` in implicit mode.
    pub fn origin(&self) -> Point3 {
        let p = self.params.position;
        match self.mode {
            GeometryMode::Explicit => p,
            GeometryMode::Implicit => Point3::new(p.epsg, 0.0, 0.0, p.z),
        }
    }

    fn require(&self, shape: ShapeKind, name: &'static str, value: Option<f64>) -> Result<f64> {
        let value = value.ok_or(Error::MissingParameter {
            shape: shape.code(),
            name,
        })?;
        if value <= 0.0 {
            return Err(Error::NonPositiveParameter { name, value });
        }
        Ok(value)
    }

    pub fn height(&self, shape: ShapeKind) -> Result<f64> {
        self.require(shape, "height", self.params.height)
    }

    pub fn crown_diameter(&self, shape: ShapeKind) -> Result<f64> {
        self.require(shape, "crownDiameter", self.params.crown_diameter)
    }

    pub fn trunk_diameter(&self, shape: ShapeKind) -> Result<f64> {
        self.require(shape, "trunkDiameter", self.params.trunk_diameter)
    }

    pub fn resolved_crown_height(&self, shape: ShapeKind) -> Result<f64> {
        self.require(shape, "crownHeight", self.crown_height)
    }
}

/// Identifier lists of the polygons making up one geometry, split by
/// part kind. These become CityGML appearance targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartIds {
    pub stem: Vec<String>,
    pub crown: Vec<String>,
}

impl PartIds {
    pub fn is_empty(&self) -> bool {
        self.stem.is_empty() && self.crown.is_empty()
    }
}

/// A built geometry plus the part identifiers assigned inside it
#[derive(Debug, Clone)]
pub struct BuiltGeometry {
    pub geometry: Geometry,
    pub parts: PartIds,
}

/// Allocates deterministic part identifiers, unique within one tree
/// across all of its LODs and parts.
pub(crate) struct PartLabeler<'a> {
    tree_id: &'a str,
    lod: Lod,
    parts: PartIds,
}

impl<'a> PartLabeler<'a> {
    pub(crate) fn new(tree_id: &'a str, lod: Lod) -> Self {
        Self {
            tree_id,
            lod,
            parts: PartIds::default(),
        }
    }

    pub(crate) fn stem(&mut self) -> String {
        let id = format!(
            "{}_lod{}_stempolygon{}",
            self.tree_id,
            self.lod.number(),
            self.parts.stem.len()
        );
        self.parts.stem.push(id.clone());
        id
    }

    pub(crate) fn crown(&mut self) -> String {
        let id = format!(
            "{}_lod{}_crownpolygon{}",
            self.tree_id,
            self.lod.number(),
            self.parts.crown.len()
        );
        self.parts.crown.push(id.clone());
        id
    }

    pub(crate) fn finish(self) -> PartIds {
        self.parts
    }
}

/// Horizontal n-gon ring around `(center.x, center.y)` at height `z`,
/// counter-clockwise seen from +Z, unclosed (`segments` points).
pub(crate) fn horizontal_ring(center: &Point3, radius: f64, z: f64, segments: u32) -> Vec<Point3> {
    (0..segments)
        .map(|k| {
            let angle = TAU * f64::from(k) / f64::from(segments);
            let dir = Vector2::new(angle.cos(), angle.sin());
            Point3::new(
                center.epsg,
                center.x + radius * dir.x,
                center.y + radius * dir.y,
                z,
            )
        })
        .collect()
}

/// Radial direction of panel `k` out of `segments`
pub(crate) fn panel_direction(k: u32, segments: u32) -> Vector2<f64> {
    let angle = TAU * f64::from(k) / f64::from(segments);
    Vector2::new(angle.cos(), angle.sin())
}

/// Angle at which a crown of radius `crown_radius` intersects a trunk of
/// radius `trunk_radius`, measured from the downward vertical.
#[inline]
pub(crate) fn trunk_intersection_angle(trunk_radius: f64, crown_radius: f64) -> f64 {
    debug_assert!(trunk_radius <= crown_radius);
    (trunk_radius / crown_radius).asin()
}

/// Downward shift of deciduous ring/outline centers: the crown bulges
/// below its nominal onset line by this amount.
#[inline]
pub(crate) fn deciduous_delta(crown_height: f64, clip_angle: f64) -> f64 {
    (crown_height / 2.0) * (1.0 - clip_angle.cos())
}

/// Build the configured shape for one tree at one LOD.
///
/// The caller is expected to have run the validator first; missing
/// parameters still surface as errors rather than panics. Trees with an
/// unspecified class build the deciduous variant of class-dependent
/// shapes.
pub fn build_shape(shape: ShapeKind, request: &BuildRequest) -> Result<BuiltGeometry> {
    if !shape.valid_segments(request.segments) {
        return Err(Error::InvalidSegments {
            shape: shape.code(),
            count: request.segments,
        });
    }
    match shape {
        ShapeKind::Line => line::build(request),
        ShapeKind::Cylinder => cylinder::build(request),
        ShapeKind::BillboardRectangle => billboard::build_rectangles(request),
        ShapeKind::BillboardOutline => match request.params.class {
            TreeClass::Coniferous => billboard::build_coniferous_outline(request),
            _ => billboard::build_deciduous_outline(request),
        },
        ShapeKind::Cuboid => match request.params.class {
            TreeClass::Coniferous => cuboid::build_coniferous(request),
            _ => cuboid::build_deciduous(request),
        },
        ShapeKind::Revolved => match request.params.class {
            TreeClass::Coniferous => revolved::build_coniferous(request),
            _ => revolved::build_deciduous(request),
        },
    }
}
