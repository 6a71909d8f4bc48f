use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    foundation::core::UNKNOWN_YEAR,
    foundation::error::{BandtreeError, BandtreeResult},
    graph::normalize::YearDefaults,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Horizontal placement strategy.
pub enum LayoutMode {
    /// Bands are packed into non-overlapping time lanes (first-fit interval colouring).
    #[default]
    Lanes,
    /// Every lineup searches the open canvas outward from its preferred x.
    Canvas,
}

impl std::str::FromStr for LayoutMode {
    type Err = BandtreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lanes" => Ok(Self::Lanes),
            "canvas" => Ok(Self::Canvas),
            other => Err(BandtreeError::validation(format!(
                "unknown layout mode '{other}' (expected 'lanes' or 'canvas')"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Geometry and policy knobs for one compilation.
///
/// Every field has a default, so a config file only needs the values it changes.
pub struct LayoutConfig {
    /// Placement strategy.
    pub mode: LayoutMode,
    /// Nominal canvas width; canvas mode centres new bands on it.
    pub canvas_width: f64,
    /// Left margin of the drawing.
    pub left_padding: f64,
    /// Top margin of the drawing.
    pub top_padding: f64,
    /// Vertical pixels per year. Raised automatically, up to `max_px_per_year`, until the
    /// shortest lineup fits `min_box_height` inside its own years.
    pub px_per_year: f64,
    /// Ceiling for the automatically raised vertical scale.
    pub max_px_per_year: f64,
    /// Distance from a box's top to its beam.
    pub header_height: f64,
    /// Width of one member column.
    pub member_width: f64,
    /// Distance from the beam down to member names.
    pub member_drop: f64,
    /// Height of a member's text block; continuity edges leave from its bottom.
    pub text_block_height: f64,
    /// Inner horizontal padding of a box.
    pub box_padding: f64,
    /// Smallest box height regardless of lineup duration.
    pub min_box_height: f64,
    /// Margin added on every side of a box before testing overlap.
    pub margin: f64,
    /// Horizontal gap between lanes.
    pub lane_gap: f64,
    /// Distance between successive collision-search candidates.
    pub search_step: f64,
    /// Hard ceiling on collision-search steps per box.
    pub max_search_steps: u32,
    /// Year used when nothing is dated.
    pub fallback_year: f64,
    /// Minimum lifespan of a dated band.
    pub min_span_years: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Lanes,
            canvas_width: 2480.0,
            left_padding: 20.0,
            top_padding: 20.0,
            px_per_year: 40.0,
            max_px_per_year: 160.0,
            header_height: 60.0,
            member_width: 90.0,
            member_drop: 20.0,
            text_block_height: 30.0,
            box_padding: 10.0,
            min_box_height: 110.0,
            margin: 8.0,
            lane_gap: 40.0,
            search_step: 120.0,
            max_search_steps: 100,
            fallback_year: UNKNOWN_YEAR,
            min_span_years: 1.0,
        }
    }
}

impl LayoutConfig {
    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BandtreeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BandtreeError::validation(format!("open layout config '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| BandtreeError::serde(format!("parse layout config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Year-resolution defaults derived from this config.
    pub fn year_defaults(&self) -> YearDefaults {
        YearDefaults {
            fallback_year: self.fallback_year,
            min_span_years: self.min_span_years,
        }
    }

    /// Validate geometry invariants.
    pub fn validate(&self) -> BandtreeResult<()> {
        for (name, value) in [
            ("canvas_width", self.canvas_width),
            ("px_per_year", self.px_per_year),
            ("max_px_per_year", self.max_px_per_year),
            ("member_width", self.member_width),
            ("min_box_height", self.min_box_height),
            ("search_step", self.search_step),
            ("min_span_years", self.min_span_years),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(BandtreeError::validation(format!(
                    "layout config {name} must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("left_padding", self.left_padding),
            ("top_padding", self.top_padding),
            ("header_height", self.header_height),
            ("member_drop", self.member_drop),
            ("text_block_height", self.text_block_height),
            ("box_padding", self.box_padding),
            ("margin", self.margin),
            ("lane_gap", self.lane_gap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BandtreeError::validation(format!(
                    "layout config {name} must be finite and >= 0"
                )));
            }
        }
        if self.max_px_per_year < self.px_per_year {
            return Err(BandtreeError::validation(
                "layout config max_px_per_year must be >= px_per_year",
            ));
        }
        if !self.fallback_year.is_finite() {
            return Err(BandtreeError::validation(
                "layout config fallback_year must be finite",
            ));
        }
        if self.max_search_steps == 0 {
            return Err(BandtreeError::validation(
                "layout config max_search_steps must be > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/config.rs"]
mod tests;
