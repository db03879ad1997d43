// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape code 1: extruded regular n-gon at crown diameter
//!
//! One solid spanning the full tree height: `segments` wall quads plus a
//! top and a bottom cap. Wall rings are closed by repeating their first
//! point; the caps are emitted unclosed (`segments` points each), which
//! matches the documented polygon point counts of existing exports.

use super::{BuildRequest, BuiltGeometry, PartLabeler};
use crate::error::Result;
use arbo_lite_core::{CompositePolygon, Geometry, Polygon, ShapeKind, Solid};

pub(crate) fn build(request: &BuildRequest) -> Result<BuiltGeometry> {
    let height = request.height(ShapeKind::Cylinder)?;
    let radius = request.crown_diameter(ShapeKind::Cylinder)? / 2.0;
    let base = request.origin();
    let segments = request.segments;

    let bottom = super::horizontal_ring(&base, radius, base.z, segments);
    let top = super::horizontal_ring(&base, radius, base.z + height, segments);

    let mut labels = PartLabeler::new(request.tree_id, request.lod);
    let mut members = Vec::with_capacity(segments as usize + 2);

    // wall quads, each closed back to its bottom-ring start point
    for k in 0..segments as usize {
        let next = (k + 1) % segments as usize;
        members.push(Polygon::new(
            Some(labels.crown()),
            vec![bottom[k], bottom[next], top[next], top[k], bottom[k]],
        ));
    }
    members.push(Polygon::new(Some(labels.crown()), top.clone()));
    members.push(Polygon::new(Some(labels.crown()), bottom));

    Ok(BuiltGeometry {
        geometry: Geometry::Solid(Solid {
            id: None,
            exterior: CompositePolygon { id: None, members },
        }),
        parts: labels.finish(),
    })
}
