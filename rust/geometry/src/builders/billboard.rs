// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape codes 2 and 3: billboard panel fans
//!
//! Code 2 arranges `segments` vertical rectangles radially, each spanning
//! the full tree height and the full crown diameter. Code 3 replaces the
//! rectangles with class-specific outlines: a trunk panel below the crown
//! onset plus a dome outline (deciduous) or triangle outline (coniferous)
//! above it.

use super::{BuildRequest, BuiltGeometry, PartLabeler};
use crate::error::{Error, Result};
use arbo_lite_core::{CompositePolygon, Geometry, Point3, Polygon, ShapeKind};
use nalgebra::Vector2;
use std::f64::consts::TAU;

/// A point in a vertical panel plane: `u` is the signed radial offset
/// along `dir`, `z` the absolute height.
fn panel_point(center: &Point3, dir: &Vector2<f64>, u: f64, z: f64) -> Point3 {
    Point3::new(center.epsg, center.x + u * dir.x, center.y + u * dir.y, z)
}

/// Code 2: radial fan of full-size rectangles
pub(crate) fn build_rectangles(request: &BuildRequest) -> Result<BuiltGeometry> {
    let shape = ShapeKind::BillboardRectangle;
    let height = request.height(shape)?;
    let radius = request.crown_diameter(shape)? / 2.0;
    let base = request.origin();

    let mut labels = PartLabeler::new(request.tree_id, request.lod);
    let mut members = Vec::with_capacity(request.segments as usize);
    for k in 0..request.segments {
        let dir = super::panel_direction(k, request.segments);
        let p = |u: f64, z: f64| panel_point(&base, &dir, u, z);
        members.push(Polygon::new(
            Some(labels.crown()),
            vec![
                p(-radius, base.z),
                p(radius, base.z),
                p(radius, base.z + height),
                p(-radius, base.z + height),
                p(-radius, base.z),
            ],
        ));
    }

    Ok(BuiltGeometry {
        geometry: Geometry::CompositePolygon(CompositePolygon { id: None, members }),
        parts: labels.finish(),
    })
}

/// Scalars shared by both code-3 variants
struct OutlineDims {
    base: Point3,
    apex: f64,
    onset: f64,
    trunk_radius: f64,
    crown_radius: f64,
    crown_height: f64,
}

fn outline_dims(request: &BuildRequest) -> Result<OutlineDims> {
    let shape = ShapeKind::BillboardOutline;
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
    Ok(OutlineDims {
        base,
        apex,
        onset: apex - crown_height,
        trunk_radius,
        crown_radius,
        crown_height,
    })
}

/// Trunk panel from the ground up to the crown onset
fn stem_panel(dims: &OutlineDims, dir: &Vector2<f64>, id: String) -> Polygon {
    let p = |u: f64, z: f64| panel_point(&dims.base, dir, u, z);
    let r = dims.trunk_radius;
    Polygon::new(
        Some(id),
        vec![
            p(-r, dims.base.z),
            p(r, dims.base.z),
            p(r, dims.onset),
            p(-r, dims.onset),
            p(-r, dims.base.z),
        ],
    )
}

/// Code 3, deciduous: trunk panels plus dome outline panels.
///
/// The outline sweeps the crown ellipse from the trunk intersection on
/// one side over the top to the trunk intersection on the other side,
/// with the ellipse center lowered by the deciduous delta so both
/// intersection points land exactly on the crown onset height.
pub(crate) fn build_deciduous_outline(request: &BuildRequest) -> Result<BuiltGeometry> {
    let dims = outline_dims(request)?;
    let clip = super::trunk_intersection_angle(dims.trunk_radius, dims.crown_radius);
    let delta = super::deciduous_delta(dims.crown_height, clip);
    let center_z = dims.apex - dims.crown_height / 2.0 - delta;
    let half_height = dims.crown_height / 2.0;

    let mut labels = PartLabeler::new(request.tree_id, request.lod);
    let mut members = Vec::with_capacity(2 * request.segments as usize);
    for k in 0..request.segments {
        let dir = super::panel_direction(k, request.segments);
        members.push(stem_panel(&dims, &dir, labels.stem()));

        // dome outline: uniform sweep of the clipped arc, closed ring
        let arc = TAU - 2.0 * clip;
        let steps = request.segments;
        let mut ring = Vec::with_capacity(steps as usize + 2);
        for s in 0..=steps {
            let phi = clip + arc * f64::from(s) / f64::from(steps);
            let u = dims.crown_radius * phi.sin();
            let z = center_z - half_height * phi.cos();
            ring.push(panel_point(&dims.base, &dir, u, z));
        }
        ring.push(ring[0]);
        members.push(Polygon::new(Some(labels.crown()), ring));
    }

    Ok(BuiltGeometry {
        geometry: Geometry::CompositePolygon(CompositePolygon { id: None, members }),
        parts: labels.finish(),
    })
}

/// Code 3, coniferous: trunk panels plus triangle outline panels
pub(crate) fn build_coniferous_outline(request: &BuildRequest) -> Result<BuiltGeometry> {
    let dims = outline_dims(request)?;

    let mut labels = PartLabeler::new(request.tree_id, request.lod);
    let mut members = Vec::with_capacity(2 * request.segments as usize);
    for k in 0..request.segments {
        let dir = super::panel_direction(k, request.segments);
        members.push(stem_panel(&dims, &dir, labels.stem()));

        let p = |u: f64, z: f64| panel_point(&dims.base, &dir, u, z);
        members.push(Polygon::new(
            Some(labels.crown()),
            vec![
                p(-dims.crown_radius, dims.onset),
                p(dims.crown_radius, dims.onset),
                p(0.0, dims.apex),
                p(-dims.crown_radius, dims.onset),
            ],
        ));
    }

    Ok(BuiltGeometry {
        geometry: Geometry::CompositePolygon(CompositePolygon { id: None, members }),
        parts: labels.finish(),
    })
}
