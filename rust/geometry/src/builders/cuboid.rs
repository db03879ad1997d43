// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape code 4: axis-aligned box stem plus box or pyramid crown
//!
//! Deciduous trees get a box crown spanning onset to apex; coniferous
//! trees get a pyramid crown with the apex point at the tree top. Both
//! variants share the box stem from the ground to the crown onset.

use super::{BuildRequest, BuiltGeometry, PartLabeler};
use crate::error::Result;
use arbo_lite_core::{CompositePolygon, CompositeSolid, Geometry, Point3, Polygon, ShapeKind, Solid};

/// Corners of an axis-aligned square around `(center.x, center.y)` with
/// half side `half`, counter-clockwise seen from +Z, unclosed.
fn square_corners(center: &Point3, half: f64, z: f64) -> [Point3; 4] {
    let p = |x: f64, y: f64| Point3::new(center.epsg, x, y, z);
    [
        p(center.x - half, center.y - half),
        p(center.x + half, center.y - half),
        p(center.x + half, center.y + half),
        p(center.x - half, center.y + half),
    ]
}

/// Six closed faces of an axis-aligned box
fn box_faces(
    center: &Point3,
    half: f64,
    z_lo: f64,
    z_hi: f64,
    mut label: impl FnMut() -> String,
) -> Vec<Polygon> {
    let lo = square_corners(center, half, z_lo);
    let hi = square_corners(center, half, z_hi);
    let mut faces = Vec::with_capacity(6);
    for k in 0..4 {
        let next = (k + 1) % 4;
        faces.push(Polygon::new(
            Some(label()),
            vec![lo[k], lo[next], hi[next], hi[k], lo[k]],
        ));
    }
    faces.push(Polygon::new(
        Some(label()),
        vec![hi[0], hi[1], hi[2], hi[3], hi[0]],
    ));
    faces.push(Polygon::new(
        Some(label()),
        vec![lo[0], lo[1], lo[2], lo[3], lo[0]],
    ));
    faces
}

struct CuboidDims {
    base: Point3,
    apex: f64,
    onset: f64,
    trunk_half: f64,
    crown_half: f64,
}

fn cuboid_dims(request: &BuildRequest) -> Result<CuboidDims> {
    let shape = ShapeKind::Cuboid;
    let height = request.height(shape)?;
    let crown_height = request.resolved_crown_height(shape)?;
    let trunk_half = request.trunk_diameter(shape)? / 2.0;
    let crown_half = request.crown_diameter(shape)? / 2.0;
    let base = request.origin();
    let apex = base.z + height;
    Ok(CuboidDims {
        base,
        apex,
        onset: apex - crown_height,
        trunk_half,
        crown_half,
    })
}

fn stem_solid(dims: &CuboidDims, labels: &mut PartLabeler) -> Solid {
    Solid {
        id: None,
        exterior: CompositePolygon {
            id: None,
            members: box_faces(&dims.base, dims.trunk_half, dims.base.z, dims.onset, || {
                labels.stem()
            }),
        },
    }
}

/// Deciduous: box stem plus box crown
pub(crate) fn build_deciduous(request: &BuildRequest) -> Result<BuiltGeometry> {
    let dims = cuboid_dims(request)?;
    let mut labels = PartLabeler::new(request.tree_id, request.lod);

    let stem = stem_solid(&dims, &mut labels);
    let crown = Solid {
        id: None,
        exterior: CompositePolygon {
            id: None,
            members: box_faces(&dims.base, dims.crown_half, dims.onset, dims.apex, || {
                labels.crown()
            }),
        },
    };

    Ok(BuiltGeometry {
        geometry: Geometry::CompositeSolid(CompositeSolid {
            id: None,
            members: vec![stem, crown],
        }),
        parts: labels.finish(),
    })
}

/// Coniferous: box stem plus pyramid crown with the apex at the tree top
pub(crate) fn build_coniferous(request: &BuildRequest) -> Result<BuiltGeometry> {
    let dims = cuboid_dims(request)?;
    let mut labels = PartLabeler::new(request.tree_id, request.lod);

    let stem = stem_solid(&dims, &mut labels);

    let corners = square_corners(&dims.base, dims.crown_half, dims.onset);
    let apex = Point3::new(dims.base.epsg, dims.base.x, dims.base.y, dims.apex);
    let mut members = Vec::with_capacity(5);
    for k in 0..4 {
        let next = (k + 1) % 4;
        members.push(Polygon::new(
            Some(labels.crown()),
            vec![corners[k], corners[next], apex, corners[k]],
        ));
    }
    members.push(Polygon::new(
        Some(labels.crown()),
        vec![corners[0], corners[1], corners[2], corners[3], corners[0]],
    ));
    let crown = Solid {
        id: None,
        exterior: CompositePolygon { id: None, members },
    };

    Ok(BuiltGeometry {
        geometry: Geometry::CompositeSolid(CompositeSolid {
            id: None,
            members: vec![stem, crown],
        }),
        parts: labels.finish(),
    })
}
