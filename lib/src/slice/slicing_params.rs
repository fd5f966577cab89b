//! Slicing parameters and layer enumeration.

use crate::config::{SlicerConfig, StitchStrategy};
use crate::{Coord, Error, Result};
use std::f32::consts::FRAC_PI_2;
use std::ops::RangeInclusive;

/// Slack added to the layer count quotient so an exact multiple of the
/// layer height still reaches the top despite round-off.
const LAYER_COUNT_SLACK: Coord = 1e-4;

/// Fraction of a layer height the top layer is lowered by, so that the
/// plane does not coincide with the top face (coplanar vertices count as below).
const TOP_LAYER_INSET: Coord = 1e-3;

/// Parameters that produced a set of slices.
#[derive(Clone, Debug, PartialEq)]
pub struct SlicingParams {
    /// Distance between consecutive planes (mm).
    pub layer_height: Coord,
    /// Endpoint matching and path reduction tolerance (mm).
    pub tolerance: Coord,
    /// Facets with a verticality angle below this are cut into double lines.
    pub z_angle_threshold: Coord,
    pub double_line_separation: Coord,
    pub strategy: StitchStrategy,
    pub tile_grid: usize,
}

impl SlicingParams {
    pub fn new(layer_height: Coord, tolerance: Coord, z_angle_threshold: Coord) -> Result<Self> {
        let params = Self {
            layer_height,
            tolerance,
            z_angle_threshold,
            double_line_separation: 0.5,
            strategy: StitchStrategy::Auto,
            tile_grid: 64,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn from_config(config: &SlicerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            layer_height: config.layer_height,
            tolerance: config.stitch_tolerance,
            z_angle_threshold: config.z_angle_threshold,
            double_line_separation: config.double_line_separation,
            strategy: config.stitch_strategy,
            tile_grid: config.tile_grid,
        })
    }

    pub fn with_strategy(mut self, strategy: StitchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_double_line_separation(mut self, separation: Coord) -> Self {
        self.double_line_separation = separation;
        self
    }

    pub fn with_tile_grid(mut self, grid: usize) -> Self {
        self.tile_grid = grid;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.layer_height.is_finite() && self.layer_height > 0.0) {
            return Err(Error::Config(format!(
                "Layer height must be positive, got {}",
                self.layer_height
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(Error::Config(format!(
                "Stitch tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        if !(0.0..=FRAC_PI_2).contains(&self.z_angle_threshold) {
            return Err(Error::Config(format!(
                "Z angle threshold must lie in [0, pi/2] radians, got {}",
                self.z_angle_threshold
            )));
        }
        if !(self.double_line_separation.is_finite() && self.double_line_separation >= 0.0) {
            return Err(Error::Config(format!(
                "Double line separation must be non-negative, got {}",
                self.double_line_separation
            )));
        }
        Ok(())
    }

    /// Number of layers for a model spanning `zmin..=zmax`.
    ///
    /// Zero for an empty or zero-height range.
    pub fn layer_count(&self, zmin: Coord, zmax: Coord) -> usize {
        let height = zmax - zmin;
        if !(height.is_finite() && height > 0.0) {
            return 0;
        }
        (height / self.layer_height + LAYER_COUNT_SLACK).floor() as usize + 1
    }

    /// Nominal height of layer `k`.
    #[inline]
    pub fn layer_z(&self, zmin: Coord, k: usize) -> Coord {
        zmin + k as Coord * self.layer_height
    }

    /// Height the plane of a layer at nominal `z` is actually cut at.
    #[inline]
    pub fn cut_height(&self, z: Coord, zmax: Coord) -> Coord {
        z.min(zmax - self.layer_height * TOP_LAYER_INSET)
    }

    /// Layers (out of `count`) whose plane may cross a facet spanning
    /// `fzmin..=fzmax`. Conservative: one layer of slack on either side.
    pub fn layer_span(
        &self,
        zmin: Coord,
        count: usize,
        fzmin: Coord,
        fzmax: Coord,
    ) -> Option<RangeInclusive<usize>> {
        if count == 0 {
            return None;
        }
        let lo = ((fzmin - zmin) / self.layer_height - TOP_LAYER_INSET)
            .floor()
            .max(0.0) as usize;
        let hi = (((fzmax - zmin) / self.layer_height).floor().max(0.0) as usize + 1).min(count - 1);
        (lo <= hi).then_some(lo..=hi)
    }
}

impl Default for SlicingParams {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            tolerance: 1e-4,
            z_angle_threshold: std::f32::consts::FRAC_PI_4,
            double_line_separation: 0.5,
            strategy: StitchStrategy::Auto,
            tile_grid: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates() {
        assert!(SlicingParams::new(0.2, 1e-4, 0.5).is_ok());
        assert!(matches!(
            SlicingParams::new(0.0, 1e-4, 0.5),
            Err(Error::Config(_))
        ));
        assert!(SlicingParams::new(-0.2, 1e-4, 0.5).is_err());
        assert!(SlicingParams::new(0.2, -1.0, 0.5).is_err());
        assert!(SlicingParams::new(0.2, 1e-4, 3.0).is_err());
    }

    #[test]
    fn test_from_config() {
        let config = SlicerConfig::default()
            .layer_height(0.3)
            .stitch_strategy(StitchStrategy::Tiles);
        let params = SlicingParams::from_config(&config).unwrap();
        assert!((params.layer_height - 0.3).abs() < 1e-6);
        assert_eq!(params.strategy, StitchStrategy::Tiles);

        assert!(SlicingParams::from_config(&config.layer_height(0.0)).is_err());
    }

    #[test]
    fn test_layer_count() {
        let p = SlicingParams::new(5.0, 1e-4, 0.0).unwrap();
        assert_eq!(p.layer_count(0.0, 10.0), 3);
        assert_eq!(p.layer_count(0.0, 12.0), 3);
        assert_eq!(p.layer_count(0.0, 4.0), 1);
        assert_eq!(p.layer_count(2.0, 2.0), 0);
        assert_eq!(p.layer_count(Coord::MAX, Coord::MIN), 0);

        // 0.2 is not exact in binary; ten layers of it still reach 2.0.
        let fine = SlicingParams::new(0.2, 1e-4, 0.0).unwrap();
        assert_eq!(fine.layer_count(0.0, 2.0), 11);
    }

    #[test]
    fn test_layer_heights_do_not_accumulate() {
        let p = SlicingParams::new(0.1, 1e-4, 0.0).unwrap();
        let z = p.layer_z(0.0, 1000);
        assert!((z - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_cut_height_insets_top() {
        let p = SlicingParams::new(5.0, 1e-4, 0.0).unwrap();
        assert_eq!(p.cut_height(5.0, 10.0), 5.0);
        let top = p.cut_height(10.0, 10.0);
        assert!(top < 10.0 && top > 9.99);
    }

    #[test]
    fn test_layer_span() {
        let p = SlicingParams::new(1.0, 1e-4, 0.0).unwrap();
        assert_eq!(p.layer_span(0.0, 11, 2.5, 4.5), Some(2..=5));
        assert_eq!(p.layer_span(0.0, 11, 9.0, 10.0), Some(8..=10));
        assert_eq!(p.layer_span(0.0, 11, 0.0, 0.0), Some(0..=1));
        assert_eq!(p.layer_span(0.0, 0, 0.0, 1.0), None);
    }
}
