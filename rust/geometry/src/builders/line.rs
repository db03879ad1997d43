// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape code 0: vertical line from ground to apex

use super::{BuildRequest, BuiltGeometry, PartIds};
use crate::error::Result;
use arbo_lite_core::{Geometry, LineString, Point3, ShapeKind};

pub(crate) fn build(request: &BuildRequest) -> Result<BuiltGeometry> {
    let height = request.height(ShapeKind::Line)?;
    let base = request.origin();
    let apex = Point3::new(base.epsg, base.x, base.y, base.z + height);
    Ok(BuiltGeometry {
        geometry: Geometry::LineString(LineString {
            id: None,
            points: vec![base, apex],
        }),
        parts: PartIds::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbo_lite_core::{GeometryMode, Lod, Point3, TreeClass, TreeParameters};

    fn request_params(x: f64, y: f64, z: f64) -> TreeParameters {
        TreeParameters {
            height: Some(10.0),
            trunk_diameter: None,
            crown_diameter: None,
            crown_height: None,
            class: TreeClass::Unspecified,
            position: Point3::new(25832, x, y, z),
        }
    }

    #[test]
    fn test_line_spans_ground_to_apex() {
        let params = request_params(0.0, 0.0, 0.0);
        let request = BuildRequest {
            tree_id: "t",
            lod: Lod::Lod1,
            params: &params,
            segments: 5,
            mode: GeometryMode::Explicit,
            crown_height: None,
        };
        let built = build(&request).unwrap();
        match built.geometry {
            Geometry::LineString(line) => {
                assert_eq!(line.points[0], Point3::new(25832, 0.0, 0.0, 0.0));
                assert_eq!(line.points[1], Point3::new(25832, 0.0, 0.0, 10.0));
            }
            _ => panic!("expected line string"),
        }
        assert!(built.parts.is_empty());
    }

    #[test]
    fn test_implicit_mode_zeroes_xy_keeps_reference_z() {
        let params = request_params(500.0, 600.0, 42.0);
        let request = BuildRequest {
            tree_id: "t",
            lod: Lod::Lod1,
            params: &params,
            segments: 5,
            mode: GeometryMode::Implicit,
            crown_height: None,
        };
        let built = build(&request).unwrap();
        match built.geometry {
            Geometry::LineString(line) => {
                assert_eq!(line.points[0], Point3::new(25832, 0.0, 0.0, 42.0));
                assert_eq!(line.points[1], Point3::new(25832, 0.0, 0.0, 52.0));
            }
            _ => panic!("expected line string"),
        }
    }

    #[test]
    fn test_missing_height_is_an_error() {
        let mut params = request_params(0.0, 0.0, 0.0);
        params.height = None;
        let request = BuildRequest {
            tree_id: "t",
            lod: Lod::Lod1,
            params: &params,
            segments: 5,
            mode: GeometryMode::Explicit,
            crown_height: None,
        };
        assert!(build(&request).is_err());
    }
}
