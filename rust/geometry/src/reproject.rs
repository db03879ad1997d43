// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reprojection implementations
//!
//! The geodesy library doing true datum shifts is an external
//! collaborator consumed through [`Reprojector`]. This module ships the
//! two implementations the engine itself needs: the identity (input and
//! output CRS agree) and a planar similarity transform (offset, rotation,
//! scale) for map CRS pairs that differ only by a plane transformation.

use arbo_lite_core::{Point3, Reprojector, Result};

/// No-op reprojection onto a (possibly different) EPSG tag
#[derive(Debug, Clone, Copy)]
pub struct IdentityReprojection {
    epsg: u32,
}

impl IdentityReprojection {
    pub fn new(epsg: u32) -> Self {
        Self { epsg }
    }
}

impl Reprojector for IdentityReprojection {
    #[inline]
    fn target_epsg(&self) -> u32 {
        self.epsg
    }

    #[inline]
    fn reproject_xy(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        Ok((x, y))
    }
}

/// Planar similarity transform: rotation (given as the x-axis direction
/// cosine/sine pair), uniform scale and an easting/northing offset.
#[derive(Debug, Clone, Copy)]
pub struct PlanarReprojection {
    target_epsg: u32,
    /// False easting (X offset into the target CRS)
    pub eastings: f64,
    /// False northing (Y offset into the target CRS)
    pub northings: f64,
    /// cos of the rotation angle
    pub x_axis_abscissa: f64,
    /// sin of the rotation angle
    pub x_axis_ordinate: f64,
    /// Uniform scale factor
    pub scale: f64,
}

impl PlanarReprojection {
    /// Pure translation into the target CRS
    pub fn translation(target_epsg: u32, eastings: f64, northings: f64) -> Self {
        Self {
            target_epsg,
            eastings,
            northings,
            x_axis_abscissa: 1.0,
            x_axis_ordinate: 0.0,
            scale: 1.0,
        }
    }

    /// Full similarity transform
    pub fn new(
        target_epsg: u32,
        eastings: f64,
        northings: f64,
        rotation: f64,
        scale: f64,
    ) -> Self {
        Self {
            target_epsg,
            eastings,
            northings,
            x_axis_abscissa: rotation.cos(),
            x_axis_ordinate: rotation.sin(),
            scale,
        }
    }

    /// Rotation angle in radians
    #[inline]
    pub fn rotation(&self) -> f64 {
        self.x_axis_ordinate.atan2(self.x_axis_abscissa)
    }

    /// The inverse transform, mapping target coordinates back to source
    pub fn inverse(&self, source_epsg: u32) -> Self {
        // Guard against division by zero
        let inv_scale = if self.scale.abs() < f64::EPSILON {
            1.0
        } else {
            1.0 / self.scale
        };
        let cos_r = self.x_axis_abscissa;
        let sin_r = self.x_axis_ordinate;
        // Inverse rotation is the transpose; offsets rotate back too
        Self {
            target_epsg: source_epsg,
            eastings: -inv_scale * (cos_r * self.eastings + sin_r * self.northings),
            northings: -inv_scale * (-sin_r * self.eastings + cos_r * self.northings),
            x_axis_abscissa: cos_r,
            x_axis_ordinate: -sin_r,
            scale: inv_scale,
        }
    }
}

impl Reprojector for PlanarReprojection {
    #[inline]
    fn target_epsg(&self) -> u32 {
        self.target_epsg
    }

    #[inline]
    fn reproject_xy(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let cos_r = self.x_axis_abscissa;
        let sin_r = self.x_axis_ordinate;
        let s = self.scale;
        let e = s * (cos_r * x - sin_r * y) + self.eastings;
        let n = s * (sin_r * x + cos_r * y) + self.northings;
        Ok((e, n))
    }
}

/// Reproject a bare point (z passthrough); convenience for callers that
/// hold positions rather than geometries.
pub fn reproject_point(point: &Point3, reprojector: &dyn Reprojector) -> Result<Point3> {
    reprojector.reproject(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_keeps_coordinates() {
        let reproj = IdentityReprojection::new(25832);
        let p = reproj
            .reproject(&Point3::new(31467, 3512000.0, 5403000.0, 7.5))
            .unwrap();
        assert_eq!(p, Point3::new(25832, 3512000.0, 5403000.0, 7.5));
    }

    #[test]
    fn test_translation() {
        let reproj = PlanarReprojection::translation(25832, 100.0, -50.0);
        let (x, y) = reproj.reproject_xy(10.0, 20.0).unwrap();
        assert_eq!((x, y), (110.0, -30.0));
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let forward = PlanarReprojection::new(25832, 512000.0, 5403000.0, 0.37, 1.0002);
        let back = forward.inverse(31467);
        let (x0, y0) = (1234.56, -789.01);
        let (x1, y1) = forward.reproject_xy(x0, y0).unwrap();
        let (x2, y2) = back.reproject_xy(x1, y1).unwrap();
        assert_relative_eq!(x2, x0, epsilon = 1e-9);
        assert_relative_eq!(y2, y0, epsilon = 1e-9);
    }

    #[test]
    fn test_z_passes_through() {
        let reproj = PlanarReprojection::new(25832, 1.0, 2.0, 0.5, 2.0);
        let p = reproj.reproject(&Point3::new(31467, 3.0, 4.0, 99.0)).unwrap();
        assert_eq!(p.z, 99.0);
        assert_eq!(p.epsg, 25832);
    }
}
