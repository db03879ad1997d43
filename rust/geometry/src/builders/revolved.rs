// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape code 5: detailed revolved solid
//!
//! A cylindrical n-gon stem plus a revolved crown: horizontal parallel
//! rings approximating an ellipsoid for deciduous trees (bottom ring
//! clipped at the trunk intersection angle), a cone fan for coniferous
//! trees. The crown apex vertex is pinned at exactly reference z plus
//! tree height for both classes.

use super::{BuildRequest, BuiltGeometry, PartLabeler};
use crate::error::{Error, Result};
use arbo_lite_core::{CompositePolygon, CompositeSolid, Geometry, Point3, Polygon, ShapeKind, Solid};
use std::f64::consts::PI;

struct RevolvedDims {
    base: Point3,
    apex: f64,
    onset: f64,
    trunk_radius: f64,
    crown_radius: f64,
    crown_height: f64,
}

fn revolved_dims(request: &BuildRequest) -> Result<RevolvedDims> {
    let shape = ShapeKind::Revolved;
    let height = request.height(shape)?;
    let crown_height = request.resolved_crown_height(shape)?;
    let trunk_radius = request.trunk_diameter(shape)? / 2.0;
    let crown_radius = request.crown_diameter(shape)? / 2.0;
    if trunk_radius > crown_radius {
        return Err(Error::TrunkWiderThanCrown {
            trunk: trunk_radius * 2.0,
            crown: crown_radius * 2.0,
        });
    }
    let base = request.origin();
    let apex = base.z + height;
    Ok(RevolvedDims {
        base,
        apex,
        onset: apex - crown_height,
        trunk_radius,
        crown_radius,
        crown_height,
    })
}

/// n-gon stem cylinder from the ground to the crown onset, capped
fn stem_solid(dims: &RevolvedDims, segments: u32, labels: &mut PartLabeler) -> Solid {
    let bottom = super::horizontal_ring(&dims.base, dims.trunk_radius, dims.base.z, segments);
    let top = super::horizontal_ring(&dims.base, dims.trunk_radius, dims.onset, segments);
    let n = segments as usize;
    let mut members = Vec::with_capacity(n + 2);
    for k in 0..n {
        let next = (k + 1) % n;
        members.push(Polygon::new(
            Some(labels.stem()),
            vec![bottom[k], bottom[next], top[next], top[k], bottom[k]],
        ));
    }
    members.push(closed_ring_polygon(&top, labels.stem()));
    members.push(closed_ring_polygon(&bottom, labels.stem()));
    Solid {
        id: None,
        exterior: CompositePolygon { id: None, members },
    }
}

fn closed_ring_polygon(ring: &[Point3], id: String) -> Polygon {
    let mut points = ring.to_vec();
    points.push(ring[0]);
    Polygon::new(Some(id), points)
}

/// Quad strip between two rings of equal point count
fn band_quads(lower: &[Point3], upper: &[Point3], labels: &mut PartLabeler) -> Vec<Polygon> {
    let n = lower.len();
    (0..n)
        .map(|k| {
            let next = (k + 1) % n;
            Polygon::new(
                Some(labels.crown()),
                vec![lower[k], lower[next], upper[next], upper[k], lower[k]],
            )
        })
        .collect()
}

/// Triangle fan from a ring up to an apex point
fn apex_fan(ring: &[Point3], apex: Point3, labels: &mut PartLabeler) -> Vec<Polygon> {
    let n = ring.len();
    (0..n)
        .map(|k| {
            let next = (k + 1) % n;
            Polygon::new(
                Some(labels.crown()),
                vec![ring[k], ring[next], apex, ring[k]],
            )
        })
        .collect()
}

/// Deciduous: ellipsoid-like crown from horizontal parallel rings.
///
/// Ring latitudes sweep from the trunk intersection angle up to the
/// apex; ring centers are lowered by the deciduous delta so the clipped
/// bottom ring lands exactly on the crown onset and meets the stem top
/// at trunk radius.
pub(crate) fn build_deciduous(request: &BuildRequest) -> Result<BuiltGeometry> {
    let dims = revolved_dims(request)?;
    let segments = request.segments;
    let clip = super::trunk_intersection_angle(dims.trunk_radius, dims.crown_radius);
    let delta = super::deciduous_delta(dims.crown_height, clip);
    let center_z = dims.apex - dims.crown_height / 2.0 - delta;
    let half_height = dims.crown_height / 2.0;

    let mut labels = PartLabeler::new(request.tree_id, request.lod);
    let stem = stem_solid(&dims, segments, &mut labels);

    // latitude bands at the same angular resolution as the rings
    let bands = (segments / 2).max(2);
    let rings: Vec<Vec<Point3>> = (0..bands)
        .map(|k| {
            let phi = clip + (PI - clip) * f64::from(k) / f64::from(bands);
            let radius = dims.crown_radius * phi.sin();
            let z = center_z - half_height * phi.cos();
            super::horizontal_ring(&dims.base, radius, z, segments)
        })
        .collect();

    let mut members = Vec::new();
    for pair in rings.windows(2) {
        members.extend(band_quads(&pair[0], &pair[1], &mut labels));
    }
    let apex = Point3::new(dims.base.epsg, dims.base.x, dims.base.y, dims.apex);
    members.extend(apex_fan(&rings[rings.len() - 1], apex, &mut labels));
    members.push(closed_ring_polygon(&rings[0], labels.crown()));

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

/// Coniferous: cone crown from an n-gon fan, base ring at the onset
pub(crate) fn build_coniferous(request: &BuildRequest) -> Result<BuiltGeometry> {
    let dims = revolved_dims(request)?;
    let segments = request.segments;

    let mut labels = PartLabeler::new(request.tree_id, request.lod);
    let stem = stem_solid(&dims, segments, &mut labels);

    let base_ring = super::horizontal_ring(&dims.base, dims.crown_radius, dims.onset, segments);
    let apex = Point3::new(dims.base.epsg, dims.base.x, dims.base.y, dims.apex);
    let mut members = apex_fan(&base_ring, apex, &mut labels);
    members.push(closed_ring_polygon(&base_ring, labels.crown()));

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
