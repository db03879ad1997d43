// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-shape parameter validation
//!
//! Stateless gate run once per tree and LOD before a builder is invoked.
//! A negative result skips geometry construction for that LOD only; the
//! caller counts the skip and the export run continues.

use arbo_lite_core::{CrownHeightMode, ShapeKind, TreeParameters};

/// Decide whether `shape` is constructible from the given parameters.
///
/// Shape codes 0..=2 only look at presence and positivity of the scalars
/// they consume. Codes 3..=5 carry a crown and dispatch on how the crown
/// height is derived for this export run.
pub fn validate(shape: ShapeKind, mode: CrownHeightMode, params: &TreeParameters) -> bool {
    match shape {
        ShapeKind::Line => positive(params.height),
        ShapeKind::Cylinder | ShapeKind::BillboardRectangle => {
            positive(params.height) && positive(params.crown_diameter)
        }
        ShapeKind::BillboardOutline | ShapeKind::Cuboid | ShapeKind::Revolved => match mode {
            CrownHeightMode::SameAsCrownDiameter => analyze_height_crown_trunk_sphere(params),
            CrownHeightMode::HalfHeight
            | CrownHeightMode::ThirdHeight
            | CrownHeightMode::TwoThirdsHeight
            | CrownHeightMode::ThreeQuartersHeight => analyze_height_crown_trunk(params),
            CrownHeightMode::Explicit => analyze_height_crown_trunk_nosphere(params),
        },
    }
}

/// Height, crown diameter and trunk diameter present and physically sane
fn analyze_height_crown_trunk(params: &TreeParameters) -> bool {
    positive(params.height)
        && positive(params.crown_diameter)
        && positive(params.trunk_diameter)
        && trunk_fits_crown(params)
}

/// As [`analyze_height_crown_trunk`], plus the crown must be derivable
/// as a sphere: its diameter may not exceed the tree height.
fn analyze_height_crown_trunk_sphere(params: &TreeParameters) -> bool {
    analyze_height_crown_trunk(params)
        && matches!(
            (params.crown_diameter, params.height),
            (Some(cd), Some(h)) if cd <= h
        )
}

/// As [`analyze_height_crown_trunk`], plus an explicit crown height;
/// no sphere relationship is required.
fn analyze_height_crown_trunk_nosphere(params: &TreeParameters) -> bool {
    analyze_height_crown_trunk(params) && positive(params.crown_height)
}

#[inline]
fn positive(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v > 0.0)
}

/// The trunk must fit inside the crown footprint, otherwise the
/// asin-based trunk intersection angle is undefined.
#[inline]
fn trunk_fits_crown(params: &TreeParameters) -> bool {
    matches!(
        (params.trunk_diameter, params.crown_diameter),
        (Some(td), Some(cd)) if td <= cd
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbo_lite_core::{Point3, TreeClass};

    fn params() -> TreeParameters {
        TreeParameters {
            height: Some(10.0),
            trunk_diameter: Some(0.3),
            crown_diameter: Some(4.0),
            crown_height: Some(6.0),
            class: TreeClass::Deciduous,
            position: Point3::new(25832, 0.0, 0.0, 0.0),
        }
    }

    #[test]
    fn test_line_needs_only_height() {
        let mut p = params();
        p.trunk_diameter = None;
        p.crown_diameter = None;
        p.crown_height = None;
        assert!(validate(ShapeKind::Line, CrownHeightMode::Explicit, &p));
        p.height = None;
        assert!(!validate(ShapeKind::Line, CrownHeightMode::Explicit, &p));
    }

    #[test]
    fn test_cylinder_needs_crown_diameter() {
        let mut p = params();
        p.trunk_diameter = None;
        assert!(validate(ShapeKind::Cylinder, CrownHeightMode::Explicit, &p));
        p.crown_diameter = None;
        assert!(!validate(ShapeKind::Cylinder, CrownHeightMode::Explicit, &p));
        assert!(!validate(
            ShapeKind::BillboardRectangle,
            CrownHeightMode::Explicit,
            &p
        ));
    }

    #[test]
    fn test_mode5_requires_trunk_diameter() {
        let mut p = params();
        p.trunk_diameter = None;
        assert!(!validate(
            ShapeKind::BillboardOutline,
            CrownHeightMode::Explicit,
            &p
        ));
    }

    #[test]
    fn test_mode5_requires_explicit_crown_height() {
        let mut p = params();
        p.crown_height = None;
        assert!(!validate(ShapeKind::Revolved, CrownHeightMode::Explicit, &p));
        // fraction modes derive the crown height, so they pass without it
        assert!(validate(ShapeKind::Revolved, CrownHeightMode::HalfHeight, &p));
    }

    #[test]
    fn test_sphere_mode_rejects_crown_wider_than_height() {
        let mut p = params();
        p.crown_diameter = Some(12.0);
        assert!(!validate(
            ShapeKind::Cuboid,
            CrownHeightMode::SameAsCrownDiameter,
            &p
        ));
        p.crown_diameter = Some(8.0);
        assert!(validate(
            ShapeKind::Cuboid,
            CrownHeightMode::SameAsCrownDiameter,
            &p
        ));
    }

    #[test]
    fn test_trunk_wider_than_crown_is_rejected() {
        let mut p = params();
        p.trunk_diameter = Some(5.0);
        assert!(!validate(ShapeKind::Revolved, CrownHeightMode::Explicit, &p));
    }

    #[test]
    fn test_zero_values_are_not_valid() {
        let mut p = params();
        p.height = Some(0.0);
        assert!(!validate(ShapeKind::Line, CrownHeightMode::Explicit, &p));
    }
}
