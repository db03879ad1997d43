// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-run export configuration
//!
//! The configuration is assembled by the calling application (GUI or CLI)
//! and validated once before an export run starts. The export core assumes
//! a validated configuration everywhere else.

use crate::error::{Error, Result};
use crate::types::{TreeClass, TreeParameters};
use serde::{Deserialize, Serialize};

/// Level of detail of a generated geometry (CityGML LOD1..LOD4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lod {
    Lod1,
    Lod2,
    Lod3,
    Lod4,
}

/// All LODs in ascending order
pub const ALL_LODS: [Lod; 4] = [Lod::Lod1, Lod::Lod2, Lod::Lod3, Lod::Lod4];

impl Lod {
    /// Numeric LOD (1..=4)
    #[inline]
    pub fn number(&self) -> u8 {
        match self {
            Lod::Lod1 => 1,
            Lod::Lod2 => 2,
            Lod::Lod3 => 3,
            Lod::Lod4 => 4,
        }
    }

    /// Zero-based index into per-LOD arrays
    #[inline]
    pub fn index(&self) -> usize {
        self.number() as usize - 1
    }
}

/// Procedural shape selected for one LOD.
///
/// The numeric codes are the geometry-type codes of the column mapping
/// dialog (0..=5) and are stable across exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Vertical line from ground to apex
    Line,
    /// Extruded regular n-gon at crown diameter, capped
    Cylinder,
    /// Radial fan of vertical rectangles
    BillboardRectangle,
    /// Radial fan of class-specific outline panels
    BillboardOutline,
    /// Box stem plus box (deciduous) or pyramid (coniferous) crown
    Cuboid,
    /// Cylindrical stem plus revolved crown solid
    Revolved,
}

impl ShapeKind {
    /// Geometry-type code (0..=5)
    #[inline]
    pub fn code(&self) -> u8 {
        match self {
            ShapeKind::Line => 0,
            ShapeKind::Cylinder => 1,
            ShapeKind::BillboardRectangle => 2,
            ShapeKind::BillboardOutline => 3,
            ShapeKind::Cuboid => 4,
            ShapeKind::Revolved => 5,
        }
    }

    /// Map a geometry-type code to a shape
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(ShapeKind::Line),
            1 => Ok(ShapeKind::Cylinder),
            2 => Ok(ShapeKind::BillboardRectangle),
            3 => Ok(ShapeKind::BillboardOutline),
            4 => Ok(ShapeKind::Cuboid),
            5 => Ok(ShapeKind::Revolved),
            _ => Err(Error::InvalidConfig(format!(
                "Unknown geometry type code: {code}"
            ))),
        }
    }

    /// Whether the generated geometry differs by tree class
    #[inline]
    pub fn class_dependent(&self) -> bool {
        matches!(
            self,
            ShapeKind::BillboardOutline | ShapeKind::Cuboid | ShapeKind::Revolved
        )
    }

    /// Valid angular tessellation counts for this shape.
    ///
    /// Box-like shapes accept {4, 6, 8}; smooth revolved shapes accept
    /// {5, 10, 15, 18, 20, 30}. Shapes without tessellation accept any
    /// count (it is ignored).
    pub fn valid_segments(&self, segments: u32) -> bool {
        match self {
            ShapeKind::Line => true,
            ShapeKind::Cuboid => true,
            ShapeKind::Cylinder | ShapeKind::BillboardRectangle => {
                matches!(segments, 4 | 6 | 8 | 5 | 10 | 15 | 18 | 20 | 30)
            }
            ShapeKind::BillboardOutline | ShapeKind::Revolved => {
                matches!(segments, 5 | 10 | 15 | 18 | 20 | 30)
            }
        }
    }
}

/// Placement mode of generated geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryMode {
    /// Absolute world coordinates embedded per tree
    Explicit,
    /// Geometry relative to a local origin `(0, 0, reference z)`,
    /// instanced through a per-tree reference point
    Implicit,
}

/// How the crown height of a tree is derived from its other parameters.
///
/// Modes 0..=5 of the export dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrownHeightMode {
    /// Mode 0: crown height equals crown diameter (spherical crown)
    SameAsCrownDiameter,
    /// Mode 1: half of tree height
    HalfHeight,
    /// Mode 2: one third of tree height
    ThirdHeight,
    /// Mode 3: two thirds of tree height
    TwoThirdsHeight,
    /// Mode 4: three quarters of tree height
    ThreeQuartersHeight,
    /// Mode 5: explicit crown-height column
    Explicit,
}

impl CrownHeightMode {
    /// Map a dialog mode number to a mode
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(CrownHeightMode::SameAsCrownDiameter),
            1 => Ok(CrownHeightMode::HalfHeight),
            2 => Ok(CrownHeightMode::ThirdHeight),
            3 => Ok(CrownHeightMode::TwoThirdsHeight),
            4 => Ok(CrownHeightMode::ThreeQuartersHeight),
            5 => Ok(CrownHeightMode::Explicit),
            _ => Err(Error::InvalidConfig(format!(
                "Unknown crown height mode: {code}"
            ))),
        }
    }

    /// Resolve the effective crown height for a tree, meters.
    ///
    /// Returns `None` when the parameters the mode needs are absent.
    pub fn resolve(&self, params: &TreeParameters) -> Option<f64> {
        match self {
            CrownHeightMode::SameAsCrownDiameter => params.crown_diameter,
            CrownHeightMode::HalfHeight => params.height.map(|h| h / 2.0),
            CrownHeightMode::ThirdHeight => params.height.map(|h| h / 3.0),
            CrownHeightMode::TwoThirdsHeight => params.height.map(|h| h * 2.0 / 3.0),
            CrownHeightMode::ThreeQuartersHeight => params.height.map(|h| h * 0.75),
            CrownHeightMode::Explicit => params.crown_height,
        }
    }
}

/// Shape selection for one enabled LOD
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LodSetup {
    pub shape: ShapeKind,
    /// Angular tessellation count for ring/fan shapes
    pub segments: u32,
}

/// Validated per-run export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// EPSG code of the source rows
    pub epsg_input: u32,
    /// EPSG code of the output document
    pub epsg_output: u32,
    pub geometry_mode: GeometryMode,
    pub crown_height_mode: CrownHeightMode,
    /// Class substituted when a row carries none
    pub default_class: TreeClass,
    /// Fallback crown diameter, meters, applied when a tree has no crown
    /// diameter attribute. The configured value is interpreted as a
    /// radius and doubled before use.
    pub default_crown_diameter: Option<f64>,
    /// Per-LOD shape selection; `None` disables the LOD
    pub lods: [Option<LodSetup>; 4],
    /// Emit generic attributes into the output document
    pub generate_generic_attributes: bool,
    /// Emit an appearance block with stem/crown materials (CityGML only)
    pub use_appearance: bool,
    /// Indent the CityGML output
    pub pretty_print: bool,
}

impl ExportConfig {
    /// Shape setup for one LOD, if enabled
    #[inline]
    pub fn lod(&self, lod: Lod) -> Option<&LodSetup> {
        self.lods[lod.index()].as_ref()
    }

    /// Effective default crown diameter (configured value doubled)
    #[inline]
    pub fn effective_default_crown_diameter(&self) -> Option<f64> {
        self.default_crown_diameter.map(|d| d * 2.0)
    }

    /// Validate the configuration once, before a run starts.
    ///
    /// Rejects EPSG code 0, an empty LOD map, and segment counts outside
    /// the valid set of the selected shape.
    pub fn validate(&self) -> Result<()> {
        if self.epsg_input == 0 || self.epsg_output == 0 {
            return Err(Error::InvalidConfig("EPSG code must be non-zero".into()));
        }
        if self.lods.iter().all(Option::is_none) {
            return Err(Error::InvalidConfig("No LOD enabled".into()));
        }
        if let Some(d) = self.default_crown_diameter {
            if d <= 0.0 {
                return Err(Error::InvalidConfig(
                    "Default crown diameter must be positive".into(),
                ));
            }
        }
        for setup in self.lods.iter().flatten() {
            if !setup.shape.valid_segments(setup.segments) {
                return Err(Error::InvalidSegments {
                    shape: setup.shape.code(),
                    count: setup.segments,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point3;

    fn base_config() -> ExportConfig {
        ExportConfig {
            epsg_input: 25832,
            epsg_output: 25832,
            geometry_mode: GeometryMode::Explicit,
            crown_height_mode: CrownHeightMode::Explicit,
            default_class: TreeClass::Deciduous,
            default_crown_diameter: None,
            lods: [
                Some(LodSetup {
                    shape: ShapeKind::Cylinder,
                    segments: 8,
                }),
                None,
                None,
                None,
            ],
            generate_generic_attributes: true,
            use_appearance: false,
            pretty_print: false,
        }
    }

    fn params(height: Option<f64>, crown_diameter: Option<f64>) -> TreeParameters {
        TreeParameters {
            height,
            trunk_diameter: Some(0.3),
            crown_diameter,
            crown_height: Some(6.0),
            class: TreeClass::Deciduous,
            position: Point3::new(25832, 0.0, 0.0, 0.0),
        }
    }

    #[test]
    fn test_validate_accepts_valid_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_epsg() {
        let mut config = base_config();
        config.epsg_output = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_segments() {
        let mut config = base_config();
        config.lods[0] = Some(LodSetup {
            shape: ShapeKind::Revolved,
            segments: 7,
        });
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidSegments { shape: 5, count: 7 })
        ));
    }

    #[test]
    fn test_validate_rejects_all_lods_disabled() {
        let mut config = base_config();
        config.lods = [None, None, None, None];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_crown_height_modes() {
        let p = params(Some(12.0), Some(4.0));
        assert_eq!(
            CrownHeightMode::SameAsCrownDiameter.resolve(&p),
            Some(4.0)
        );
        assert_eq!(CrownHeightMode::HalfHeight.resolve(&p), Some(6.0));
        assert_eq!(CrownHeightMode::ThirdHeight.resolve(&p), Some(4.0));
        assert_eq!(CrownHeightMode::TwoThirdsHeight.resolve(&p), Some(8.0));
        assert_eq!(CrownHeightMode::ThreeQuartersHeight.resolve(&p), Some(9.0));
        assert_eq!(CrownHeightMode::Explicit.resolve(&p), Some(6.0));
    }

    #[test]
    fn test_crown_height_mode_missing_input() {
        let p = params(None, None);
        assert_eq!(CrownHeightMode::SameAsCrownDiameter.resolve(&p), None);
        assert_eq!(CrownHeightMode::HalfHeight.resolve(&p), None);
    }

    #[test]
    fn test_default_crown_diameter_is_doubled() {
        let mut config = base_config();
        config.default_crown_diameter = Some(2.5);
        assert_eq!(config.effective_default_crown_diameter(), Some(5.0));
    }
}
