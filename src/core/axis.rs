use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, ClusterResult};

/// Linear projection between one axis's data values and chart pixels.
///
/// `visible_min..visible_max` is the extent currently on screen and
/// `data_min..data_max` the absolute extent of the series; the pixel gap
/// between the two minimums is the pan/zoom offset correction that keeps
/// grid cells anchored in data space while the viewport moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedAxis {
    visible_min: f64,
    visible_max: f64,
    data_min: f64,
    data_max: f64,
    length_px: f64,
    origin_px: f64,
}

impl ProjectedAxis {
    /// Creates an axis projection from visible extent, absolute data extent,
    /// plot length and plot origin.
    pub fn new(
        visible_min: f64,
        visible_max: f64,
        data_min: f64,
        data_max: f64,
        length_px: f64,
        origin_px: f64,
    ) -> ClusterResult<Self> {
        for (value, name) in [
            (visible_min, "visible_min"),
            (visible_max, "visible_max"),
            (data_min, "data_min"),
            (data_max, "data_max"),
            (length_px, "length_px"),
            (origin_px, "origin_px"),
        ] {
            if !value.is_finite() {
                return Err(ClusterError::InvalidData(format!(
                    "axis `{name}` must be finite"
                )));
            }
        }

        if visible_min >= visible_max {
            return Err(ClusterError::InvalidData(
                "axis visible extent must satisfy min < max".to_owned(),
            ));
        }
        if data_min > data_max {
            return Err(ClusterError::InvalidData(
                "axis data extent must satisfy min <= max".to_owned(),
            ));
        }
        if length_px <= 0.0 {
            return Err(ClusterError::InvalidData(
                "axis plot length must be > 0".to_owned(),
            ));
        }

        Ok(Self {
            visible_min,
            visible_max,
            data_min,
            data_max,
            length_px,
            origin_px,
        })
    }

    /// Creates an axis whose absolute data extent equals the visible extent
    /// (nothing panned or zoomed out of view).
    pub fn fitted(
        visible_min: f64,
        visible_max: f64,
        length_px: f64,
        origin_px: f64,
    ) -> ClusterResult<Self> {
        Self::new(
            visible_min,
            visible_max,
            visible_min,
            visible_max,
            length_px,
            origin_px,
        )
    }

    #[must_use]
    pub fn visible_range(self) -> (f64, f64) {
        (self.visible_min, self.visible_max)
    }

    #[must_use]
    pub fn data_range(self) -> (f64, f64) {
        (self.data_min, self.data_max)
    }

    #[must_use]
    pub fn length_px(self) -> f64 {
        self.length_px
    }

    #[must_use]
    pub fn origin_px(self) -> f64 {
        self.origin_px
    }

    /// Maps a data value to an absolute chart pixel coordinate.
    #[must_use]
    pub fn to_pixel(self, value: f64) -> f64 {
        let span = self.visible_max - self.visible_min;
        self.origin_px + (value - self.visible_min) / span * self.length_px
    }

    /// Maps an absolute chart pixel coordinate back to a data value.
    #[must_use]
    pub fn to_value(self, pixel: f64) -> f64 {
        let span = self.visible_max - self.visible_min;
        self.visible_min + (pixel - self.origin_px) / self.length_px * span
    }

    /// Pixel distance between the visible minimum and the absolute data
    /// minimum. Zero when the data does not extend below the visible window.
    #[must_use]
    pub fn pan_offset_px(self) -> f64 {
        if self.data_min < self.visible_min {
            (self.to_pixel(self.visible_min) - self.to_pixel(self.data_min)).abs()
        } else {
            0.0
        }
    }

    /// Whether a plot-local pixel coordinate falls inside the plot area.
    #[must_use]
    pub fn contains_plot_pixel(self, plot_px: f64) -> bool {
        plot_px >= 0.0 && plot_px <= self.length_px
    }
}
