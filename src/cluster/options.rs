use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, ClusterResult};

/// Grid anchoring mode used by the bucketing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GridMode {
    /// Cells are fixed to the current viewport and shift with every pan/zoom.
    #[serde(rename = "grid-view-relative")]
    ViewRelative,
    /// Cells are fixed to the full data extent via the pan offset correction,
    /// so cell boundaries stay stable in data space across pan/zoom.
    #[default]
    #[serde(rename = "grid-data-relative")]
    DataRelative,
}

impl GridMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GridMode::ViewRelative => "grid-view-relative",
            GridMode::DataRelative => "grid-data-relative",
        }
    }
}

impl fmt::Display for GridMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridMode {
    type Err = ClusterError;

    fn from_str(input: &str) -> ClusterResult<Self> {
        match input {
            "grid-view-relative" => Ok(GridMode::ViewRelative),
            "grid-data-relative" => Ok(GridMode::DataRelative),
            other => Err(ClusterError::UnsupportedLayout(other.to_owned())),
        }
    }
}

/// Layout algorithm selection and its grid cell size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutAlgorithm {
    #[serde(rename = "type", default)]
    pub kind: GridMode,
    #[serde(default = "default_grid_size_px")]
    pub grid_size_px: f64,
}

impl Default for LayoutAlgorithm {
    fn default() -> Self {
        Self {
            kind: GridMode::default(),
            grid_size_px: default_grid_size_px(),
        }
    }
}

/// Base marker style applied to rendered cluster points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMarkerStyle {
    #[serde(default = "default_cluster_symbol")]
    pub symbol: String,
    #[serde(default = "default_cluster_radius")]
    pub radius: f64,
    #[serde(default)]
    pub fill_color: Option<String>,
    #[serde(default)]
    pub line_color: Option<String>,
    #[serde(default)]
    pub line_width: Option<f64>,
}

impl Default for ClusterMarkerStyle {
    fn default() -> Self {
        Self {
            symbol: default_cluster_symbol(),
            radius: default_cluster_radius(),
            fill_color: None,
            line_color: None,
            line_width: None,
        }
    }
}

impl ClusterMarkerStyle {
    /// Returns this style with every populated zone field overriding it.
    #[must_use]
    pub fn merged_with(&self, zone: &ZoneStyle) -> Self {
        Self {
            symbol: zone.symbol.clone().unwrap_or_else(|| self.symbol.clone()),
            radius: zone.radius.unwrap_or(self.radius),
            fill_color: zone.fill_color.clone().or_else(|| self.fill_color.clone()),
            line_color: zone.line_color.clone().or_else(|| self.line_color.clone()),
            line_width: zone.line_width.or(self.line_width),
        }
    }
}

/// Style overrides carried by one size zone; unset fields fall back to the
/// base cluster style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ZoneStyle {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub fill_color: Option<String>,
    #[serde(default)]
    pub line_color: Option<String>,
    #[serde(default)]
    pub line_width: Option<f64>,
}

/// One member-count range mapped to a style override.
///
/// Zones are scanned in declaration order and the last zone containing the
/// member count wins, so overlapping ranges are legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleZone {
    pub from: usize,
    pub to: usize,
    pub style: ZoneStyle,
}

impl StyleZone {
    #[must_use]
    pub fn contains(&self, member_count: usize) -> bool {
        member_count >= self.from && member_count <= self.to
    }
}

/// Default marker geometry assumed for noise points during collision checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMarkerDefaults {
    #[serde(default = "default_point_radius")]
    pub radius: f64,
    #[serde(default = "default_point_line_width")]
    pub line_width: f64,
}

impl Default for PointMarkerDefaults {
    fn default() -> Self {
        Self {
            radius: default_point_radius(),
            line_width: default_point_line_width(),
        }
    }
}

impl PointMarkerDefaults {
    #[must_use]
    pub fn collision_radius_px(self) -> f64 {
        self.radius + self.line_width
    }
}

/// Full clustering configuration for one series.
///
/// This type is serializable so host applications can persist/load cluster
/// setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterOptions {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_allow_overlap")]
    pub allow_overlap: bool,
    #[serde(default = "default_minimum_cluster_size")]
    pub minimum_cluster_size: usize,
    #[serde(default)]
    pub layout: LayoutAlgorithm,
    #[serde(default)]
    pub style: ClusterMarkerStyle,
    #[serde(default)]
    pub zones: Vec<StyleZone>,
    #[serde(default = "default_data_label_format")]
    pub data_label_format: String,
    #[serde(default = "default_tooltip_cluster_format")]
    pub tooltip_cluster_format: String,
    #[serde(default)]
    pub point_marker: PointMarkerDefaults,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            allow_overlap: default_allow_overlap(),
            minimum_cluster_size: default_minimum_cluster_size(),
            layout: LayoutAlgorithm::default(),
            style: ClusterMarkerStyle::default(),
            zones: Vec::new(),
            data_label_format: default_data_label_format(),
            tooltip_cluster_format: default_tooltip_cluster_format(),
            point_marker: PointMarkerDefaults::default(),
        }
    }
}

impl ClusterOptions {
    /// Enables or disables clustering for the series.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Allows or forbids visually overlapping cluster anchors.
    #[must_use]
    pub fn with_allow_overlap(mut self, allow_overlap: bool) -> Self {
        self.allow_overlap = allow_overlap;
        self
    }

    /// Sets the minimum member count for a cell to form a cluster.
    #[must_use]
    pub fn with_minimum_cluster_size(mut self, minimum_cluster_size: usize) -> Self {
        self.minimum_cluster_size = minimum_cluster_size;
        self
    }

    /// Sets the layout algorithm mode and grid cell size.
    #[must_use]
    pub fn with_layout(mut self, kind: GridMode, grid_size_px: f64) -> Self {
        self.layout = LayoutAlgorithm { kind, grid_size_px };
        self
    }

    /// Sets the base cluster marker style.
    #[must_use]
    pub fn with_style(mut self, style: ClusterMarkerStyle) -> Self {
        self.style = style;
        self
    }

    /// Appends one size zone.
    #[must_use]
    pub fn with_zone(mut self, zone: StyleZone) -> Self {
        self.zones.push(zone);
        self
    }

    /// Replaces the zone list.
    #[must_use]
    pub fn with_zones(mut self, zones: Vec<StyleZone>) -> Self {
        self.zones = zones;
        self
    }

    /// Sets the data label template; `{memberCount}` is substituted per cluster.
    #[must_use]
    pub fn with_data_label_format(mut self, format: impl Into<String>) -> Self {
        self.data_label_format = format.into();
        self
    }

    /// Sets the tooltip template; `{memberCount}` is substituted per cluster.
    #[must_use]
    pub fn with_tooltip_cluster_format(mut self, format: impl Into<String>) -> Self {
        self.tooltip_cluster_format = format.into();
        self
    }

    /// Sets the default noise marker geometry used by collision checks.
    #[must_use]
    pub fn with_point_marker(mut self, point_marker: PointMarkerDefaults) -> Self {
        self.point_marker = point_marker;
        self
    }

    /// Validates the configuration, failing fast before any pass runs.
    pub fn validate(&self) -> ClusterResult<()> {
        if !self.layout.grid_size_px.is_finite() || self.layout.grid_size_px <= 0.0 {
            return Err(ClusterError::InvalidConfig(
                "layout grid size must be finite and > 0".to_owned(),
            ));
        }
        if self.minimum_cluster_size < 2 {
            return Err(ClusterError::InvalidConfig(
                "minimum cluster size must be >= 2".to_owned(),
            ));
        }
        if !self.style.radius.is_finite() || self.style.radius <= 0.0 {
            return Err(ClusterError::InvalidConfig(
                "cluster marker radius must be finite and > 0".to_owned(),
            ));
        }
        if self
            .style
            .line_width
            .is_some_and(|width| !width.is_finite() || width < 0.0)
        {
            return Err(ClusterError::InvalidConfig(
                "cluster marker line width must be finite and >= 0".to_owned(),
            ));
        }

        for (index, zone) in self.zones.iter().enumerate() {
            if zone.from > zone.to {
                return Err(ClusterError::InvalidConfig(format!(
                    "zone {index} bounds must satisfy from <= to"
                )));
            }
            if zone
                .style
                .radius
                .is_some_and(|radius| !radius.is_finite() || radius <= 0.0)
            {
                return Err(ClusterError::InvalidConfig(format!(
                    "zone {index} radius must be finite and > 0"
                )));
            }
            if zone
                .style
                .line_width
                .is_some_and(|width| !width.is_finite() || width < 0.0)
            {
                return Err(ClusterError::InvalidConfig(format!(
                    "zone {index} line width must be finite and >= 0"
                )));
            }
        }

        if !self.point_marker.radius.is_finite() || self.point_marker.radius <= 0.0 {
            return Err(ClusterError::InvalidConfig(
                "point marker radius must be finite and > 0".to_owned(),
            ));
        }
        if !self.point_marker.line_width.is_finite() || self.point_marker.line_width < 0.0 {
            return Err(ClusterError::InvalidConfig(
                "point marker line width must be finite and >= 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Serializes options to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ClusterResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ClusterError::InvalidConfig(format!("failed to serialize options: {e}")))
    }

    /// Deserializes options from JSON.
    pub fn from_json_str(input: &str) -> ClusterResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ClusterError::InvalidConfig(format!("failed to parse options: {e}")))
    }
}

/// Returns the index of the matched zone for a member count, if any.
///
/// Every zone is visited; a later match overwrites an earlier one.
#[must_use]
pub fn match_zone(zones: &[StyleZone], member_count: usize) -> Option<usize> {
    let mut matched = None;
    for (index, zone) in zones.iter().enumerate() {
        if zone.contains(member_count) {
            matched = Some(index);
        }
    }
    matched
}

/// Substitutes the member count into a label/tooltip template.
#[must_use]
pub fn format_member_count(template: &str, member_count: usize) -> String {
    template.replace("{memberCount}", &member_count.to_string())
}

fn default_allow_overlap() -> bool {
    true
}

fn default_minimum_cluster_size() -> usize {
    2
}

fn default_grid_size_px() -> f64 {
    50.0
}

fn default_cluster_symbol() -> String {
    "cluster".to_owned()
}

fn default_cluster_radius() -> f64 {
    12.0
}

fn default_point_radius() -> f64 {
    4.0
}

fn default_point_line_width() -> f64 {
    1.0
}

fn default_data_label_format() -> String {
    "{memberCount}".to_owned()
}

fn default_tooltip_cluster_format() -> String {
    "Clustered points: {memberCount}".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_zone_match_overrides_earlier() {
        let zones = vec![
            StyleZone {
                from: 0,
                to: 10,
                style: ZoneStyle::default(),
            },
            StyleZone {
                from: 5,
                to: 15,
                style: ZoneStyle::default(),
            },
        ];
        assert_eq!(match_zone(&zones, 7), Some(1));
        assert_eq!(match_zone(&zones, 3), Some(0));
        assert_eq!(match_zone(&zones, 20), None);
    }

    #[test]
    fn zone_merge_prefers_populated_zone_fields() {
        let base = ClusterMarkerStyle {
            fill_color: Some("#335cad".to_owned()),
            ..ClusterMarkerStyle::default()
        };
        let zone = ZoneStyle {
            radius: Some(20.0),
            fill_color: Some("#90ed7d".to_owned()),
            ..ZoneStyle::default()
        };

        let merged = base.merged_with(&zone);
        assert_eq!(merged.radius, 20.0);
        assert_eq!(merged.fill_color.as_deref(), Some("#90ed7d"));
        assert_eq!(merged.symbol, "cluster");
        assert_eq!(merged.line_width, None);
    }

    #[test]
    fn validate_rejects_bad_grid_and_threshold() {
        let bad_grid = ClusterOptions::default().with_layout(GridMode::DataRelative, 0.0);
        assert!(matches!(
            bad_grid.validate(),
            Err(ClusterError::InvalidConfig(_))
        ));

        let bad_threshold = ClusterOptions::default().with_minimum_cluster_size(1);
        assert!(matches!(
            bad_threshold.validate(),
            Err(ClusterError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unknown_layout_kind_is_unsupported() {
        let parsed = "grid-hexagonal".parse::<GridMode>();
        assert!(matches!(parsed, Err(ClusterError::UnsupportedLayout(_))));
    }

    #[test]
    fn options_round_trip_through_json() {
        let options = ClusterOptions::default()
            .with_enabled(true)
            .with_allow_overlap(false)
            .with_layout(GridMode::ViewRelative, 40.0)
            .with_zone(StyleZone {
                from: 2,
                to: 9,
                style: ZoneStyle {
                    radius: Some(10.0),
                    ..ZoneStyle::default()
                },
            });

        let json = options.to_json_pretty().expect("serialize");
        let parsed = ClusterOptions::from_json_str(&json).expect("parse");
        assert_eq!(parsed, options);
    }
}
