//! Discrete zoom levels for the sprite preview.

use std::fmt;

/// The zoom factors a preview can be displayed at, in ascending order.
pub const ZOOM_FACTORS: [f32; 12] = [0.25, 0.5, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0, 10.0, 12.0, 16.0];

/// Index of the factor `1.0` in [`ZOOM_FACTORS`].
const ACTUAL_SIZE: usize = 2;

/// Index of the factor `2.0` in [`ZOOM_FACTORS`].
const DEFAULT_LEVEL: usize = 3;

/// Direction of a single zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// One of the fixed [`ZOOM_FACTORS`].
///
/// Stepping past either end of the set stays at that end.
///
/// # Examples
///
/// ```
/// # use spright_core::zoom::{ZoomDirection, ZoomLevel};
/// let mut zoom = ZoomLevel::actual_size();
/// zoom = zoom.step(ZoomDirection::In);
/// assert_eq!(zoom.factor(), 2.0);
///
/// let smallest = ZoomLevel::from_factor(0.25).unwrap();
/// assert_eq!(smallest.step(ZoomDirection::Out), smallest);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoomLevel {
    index: usize,
}

impl ZoomLevel {
    /// Returns the level that shows sprites at their pixel size.
    pub fn actual_size() -> Self {
        Self {
            index: ACTUAL_SIZE,
        }
    }

    /// Returns the level with the given factor, if it is one of [`ZOOM_FACTORS`].
    pub fn from_factor(factor: f32) -> Option<Self> {
        ZOOM_FACTORS
            .iter()
            .position(|&candidate| candidate == factor)
            .map(|index| Self { index })
    }

    /// Returns the scale factor of this level.
    pub fn factor(self) -> f32 {
        ZOOM_FACTORS[self.index]
    }

    /// Moves one level in the given direction, clamped at both ends.
    pub fn step(self, direction: ZoomDirection) -> Self {
        let index = match direction {
            ZoomDirection::In => (self.index + 1).min(ZOOM_FACTORS.len() - 1),
            ZoomDirection::Out => self.index.saturating_sub(1),
        };
        Self { index }
    }

    /// Returns `true` if zooming in further has no effect.
    pub fn is_max(self) -> bool {
        self.index == ZOOM_FACTORS.len() - 1
    }

    /// Returns `true` if zooming out further has no effect.
    pub fn is_min(self) -> bool {
        self.index == 0
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self {
            index: DEFAULT_LEVEL,
        }
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.factor())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_default_is_two() {
        assert_eq!(ZoomLevel::default().factor(), 2.0);
    }

    #[test]
    fn test_from_factor_rejects_unknown_factor() {
        assert!(ZoomLevel::from_factor(7.0).is_none());
        assert_eq!(ZoomLevel::from_factor(1.0), Some(ZoomLevel::actual_size()));
    }

    #[test]
    fn test_zoom_in_converges_to_max() {
        let mut zoom = ZoomLevel::actual_size();
        for _ in 0..20 {
            zoom = zoom.step(ZoomDirection::In);
        }
        assert_eq!(zoom.factor(), 16.0);
        assert!(zoom.is_max());
    }

    #[test]
    fn test_zoom_out_converges_to_min() {
        let mut zoom = ZoomLevel::from_factor(16.0).unwrap();
        for _ in 0..20 {
            zoom = zoom.step(ZoomDirection::Out);
        }
        assert_eq!(zoom.factor(), 0.25);
        assert!(zoom.is_min());
    }

    #[test]
    fn test_display() {
        assert_eq!(ZoomLevel::from_factor(0.5).unwrap().to_string(), "0.5x");
    }

    fn direction_strategy() -> impl Strategy<Value = ZoomDirection> {
        prop_oneof![Just(ZoomDirection::In), Just(ZoomDirection::Out)]
    }

    proptest! {
        #[test]
        fn zoom_steps_stay_within_levels(steps in prop::collection::vec(direction_strategy(), 0..64)) {
            let mut zoom = ZoomLevel::actual_size();
            for direction in steps {
                let previous = zoom.factor();
                zoom = zoom.step(direction);
                prop_assert!(ZOOM_FACTORS.contains(&zoom.factor()));
                match direction {
                    ZoomDirection::In => prop_assert!(zoom.factor() >= previous),
                    ZoomDirection::Out => prop_assert!(zoom.factor() <= previous),
                }
            }
        }
    }
}
