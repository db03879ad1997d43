// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cross-shape builder properties: ring closure, indexed-vertex
//! consistency and the documented polygon counts per shape code.

use approx::assert_relative_eq;
use arbo_lite_core::{
    to_indexed, Geometry, GeometryMode, Lod, Point3, ShapeKind, TreeClass, TreeParameters,
};
use arbo_lite_geometry::{build_shape, BuildRequest};

fn params(class: TreeClass) -> TreeParameters {
    TreeParameters {
        height: Some(10.0),
        trunk_diameter: Some(0.3),
        crown_diameter: Some(4.0),
        crown_height: Some(6.0),
        class,
        position: Point3::new(25832, 0.0, 0.0, 0.0),
    }
}

fn request<'a>(p: &'a TreeParameters, segments: u32) -> BuildRequest<'a> {
    BuildRequest {
        tree_id: "tree0",
        lod: Lod::Lod1,
        params: p,
        segments,
        mode: GeometryMode::Explicit,
        crown_height: p.crown_height,
    }
}

fn polygons(geometry: &Geometry) -> Vec<&arbo_lite_core::Polygon> {
    match geometry {
        Geometry::Polygon(p) => vec![p],
        Geometry::CompositePolygon(c) => c.members.iter().collect(),
        Geometry::Solid(s) => s.exterior.members.iter().collect(),
        Geometry::CompositeSolid(c) => c
            .members
            .iter()
            .flat_map(|s| s.exterior.members.iter())
            .collect(),
        _ => Vec::new(),
    }
}

#[test]
fn line_scenario() {
    let p = params(TreeClass::Deciduous);
    let built = build_shape(ShapeKind::Line, &request(&p, 5)).unwrap();
    match &built.geometry {
        Geometry::LineString(line) => {
            assert_eq!(line.points[0], Point3::new(25832, 0.0, 0.0, 0.0));
            assert_eq!(line.points[1], Point3::new(25832, 0.0, 0.0, 10.0));
        }
        other => panic!("expected line string, got {other:?}"),
    }
}

#[test]
fn cylinder_scenario_polygon_counts() {
    // height=10, crown diameter=4, segments=8: 8 closed wall quads plus
    // two unclosed 8-point caps.
    let p = params(TreeClass::Deciduous);
    let built = build_shape(ShapeKind::Cylinder, &request(&p, 8)).unwrap();
    let faces = polygons(&built.geometry);
    assert_eq!(faces.len(), 10);
    let (walls, caps) = faces.split_at(8);
    for wall in walls {
        assert_eq!(wall.ring.len(), 5);
        assert!(wall.is_closed());
    }
    for cap in caps {
        assert_eq!(cap.ring.len(), 8);
    }
}

#[test]
fn every_boundary_index_exists_for_all_shapes() {
    for class in [TreeClass::Deciduous, TreeClass::Coniferous] {
        let p = params(class);
        for shape in [
            ShapeKind::Line,
            ShapeKind::Cylinder,
            ShapeKind::BillboardRectangle,
            ShapeKind::BillboardOutline,
            ShapeKind::Cuboid,
            ShapeKind::Revolved,
        ] {
            let segments = if shape == ShapeKind::Cuboid { 4 } else { 10 };
            let built = build_shape(shape, &request(&p, segments)).unwrap();
            let indexed = to_indexed(&built.geometry);
            let max = indexed.boundaries.max_index().unwrap();
            assert!(
                indexed.vertices.len() >= max + 1,
                "{shape:?}/{class:?}: {} vertices, max index {max}",
                indexed.vertices.len()
            );
        }
    }
}

#[test]
fn wall_rings_are_closed_before_dedup() {
    let p = params(TreeClass::Coniferous);
    for shape in [
        ShapeKind::BillboardRectangle,
        ShapeKind::BillboardOutline,
        ShapeKind::Cuboid,
        ShapeKind::Revolved,
    ] {
        let segments = if shape == ShapeKind::Cuboid { 4 } else { 10 };
        let built = build_shape(shape, &request(&p, segments)).unwrap();
        for polygon in polygons(&built.geometry) {
            assert!(
                polygon.is_closed(),
                "{shape:?}: polygon {:?} not closed",
                polygon.id
            );
        }
    }
}

#[test]
fn cylinder_dedup_collapses_shared_base_vertices() {
    // Adjacent wall panels share their base corners; dedup must collapse
    // them while keeping all boundary references consistent.
    let p = params(TreeClass::Deciduous);
    let built = build_shape(ShapeKind::Cylinder, &request(&p, 8)).unwrap();
    let indexed = to_indexed(&built.geometry);
    // 8 unique bottom + 8 unique top corners survive out of
    // 8*5 wall points + 2*8 cap points
    assert_eq!(indexed.vertices.len(), 16);
    assert!(indexed.vertices.len() >= indexed.boundaries.max_index().unwrap() + 1);
}

#[test]
fn revolved_apex_and_onset_contract() {
    // Both classes at segments=20: apex exactly reference+height, crown
    // onset exactly apex-crownHeight; the deciduous delta shifts nothing
    // at these two heights.
    for class in [TreeClass::Deciduous, TreeClass::Coniferous] {
        let mut p = params(class);
        p.position = Point3::new(25832, 7.0, 8.0, 100.0);
        let built = build_shape(ShapeKind::Revolved, &request(&p, 20)).unwrap();
        let mut max_z = f64::MIN;
        built.geometry.for_each_point(&mut |pt| max_z = max_z.max(pt.z));
        assert_relative_eq!(max_z, 110.0, epsilon = 1e-12);

        let crown_min = match &built.geometry {
            Geometry::CompositeSolid(c) => c.members[1]
                .exterior
                .members
                .iter()
                .flat_map(|f| f.ring.iter())
                .map(|pt| pt.z)
                .fold(f64::MAX, f64::min),
            other => panic!("expected composite solid, got {other:?}"),
        };
        assert_relative_eq!(crown_min, 104.0, epsilon = 1e-9);
    }
}

#[test]
fn part_ids_unique_across_lods() {
    let p = params(TreeClass::Deciduous);
    let mut all_ids: Vec<String> = Vec::new();
    for lod in [Lod::Lod1, Lod::Lod2, Lod::Lod3, Lod::Lod4] {
        let request = BuildRequest {
            tree_id: "tree0",
            lod,
            params: &p,
            segments: 10,
            mode: GeometryMode::Explicit,
            crown_height: p.crown_height,
        };
        let built = build_shape(ShapeKind::Revolved, &request).unwrap();
        all_ids.extend(built.parts.stem);
        all_ids.extend(built.parts.crown);
    }
    let total = all_ids.len();
    all_ids.sort();
    all_ids.dedup();
    assert_eq!(all_ids.len(), total);
}

#[test]
fn implicit_mode_builds_around_local_origin() {
    let mut p = params(TreeClass::Deciduous);
    p.position = Point3::new(25832, 512000.0, 5403000.0, 55.0);
    let request = BuildRequest {
        tree_id: "t",
        lod: Lod::Lod2,
        params: &p,
        segments: 8,
        mode: GeometryMode::Implicit,
        crown_height: p.crown_height,
    };
    let built = build_shape(ShapeKind::Cylinder, &request).unwrap();
    let mut max_xy: f64 = 0.0;
    built.geometry.for_each_point(&mut |pt| {
        max_xy = max_xy.max(pt.x.abs()).max(pt.y.abs());
    });
    // crown radius only, not the absolute easting/northing
    assert!(max_xy <= 2.0 + 1e-12);
}

#[test]
fn invalid_segment_count_is_rejected() {
    let p = params(TreeClass::Deciduous);
    assert!(build_shape(ShapeKind::Revolved, &request(&p, 7)).is_err());
    assert!(build_shape(ShapeKind::Cylinder, &request(&p, 9)).is_err());
}
