//! Plot styling.
//!
//! All colours, widths and dash patterns used by the trace builders live in a
//! [`PlotStyle`] passed in by the caller. Style files are TOML; omitted keys
//! keep their defaults.

use plotly::common::{DashType, Mode};
use serde::{Deserialize, Serialize};

use crate::error::{FlightPlotError, Result};

/// Plotly's qualitative palette.
pub const QUALITATIVE_PALETTE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Plotly's classic default trace colours.
pub const SECTION_PALETTE: [&str; 10] = [
    "rgb(31, 119, 180)",
    "rgb(255, 127, 14)",
    "rgb(44, 160, 44)",
    "rgb(214, 39, 40)",
    "rgb(148, 103, 189)",
    "rgb(140, 86, 75)",
    "rgb(227, 119, 194)",
    "rgb(127, 127, 127)",
    "rgb(188, 189, 34)",
    "rgb(23, 190, 207)",
];

/// Drawing mode of line traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineMode {
    Lines,
    Markers,
    #[serde(rename = "lines+markers")]
    LinesMarkers,
}

impl From<LineMode> for Mode {
    fn from(mode: LineMode) -> Self {
        match mode {
            LineMode::Lines => Mode::Lines,
            LineMode::Markers => Mode::Markers,
            LineMode::LinesMarkers => Mode::LinesMarkers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dash {
    Solid,
    Dot,
    Dash,
    LongDash,
    DashDot,
    LongDashDot,
}

impl From<Dash> for DashType {
    fn from(dash: Dash) -> Self {
        match dash {
            Dash::Solid => DashType::Solid,
            Dash::Dot => DashType::Dot,
            Dash::Dash => DashType::Dash,
            Dash::LongDash => DashType::LongDash,
            Dash::DashDot => DashType::DashDot,
            Dash::LongDashDot => DashType::LongDashDot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    /// Colours for time-series columns and manoeuvre lines.
    pub palette: Vec<String>,
    /// Colours for labelled flight sections.
    pub section_palette: Vec<String>,
    /// Trace mode for every line trace.
    pub mode: LineMode,
    /// Dash pattern for time-series traces.
    pub dash: Dash,
    /// Dash pattern for the aerodynamic angle traces.
    pub aoa_dash: Dash,
    pub show_legend_3d: bool,

    pub path_colour: String,
    pub path_width: f64,
    pub left_tip_colour: String,
    pub right_tip_colour: String,
    pub tip_width: f64,
    pub section_width: f64,
    /// Wingspan used for the tip tracks drawn alongside sections.
    pub section_span: f64,
    pub ribbon_colour: String,
    pub mesh_colour: String,
    pub vector_colour: String,
    pub box_opacity: f64,
    pub axis_length: f64,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            palette: QUALITATIVE_PALETTE.iter().map(|c| c.to_string()).collect(),
            section_palette: SECTION_PALETTE.iter().map(|c| c.to_string()).collect(),
            mode: LineMode::Lines,
            dash: Dash::Solid,
            aoa_dash: Dash::Dash,
            show_legend_3d: false,
            path_colour: "black".to_string(),
            path_width: 2.0,
            left_tip_colour: "blue".to_string(),
            right_tip_colour: "red".to_string(),
            tip_width: 1.0,
            section_width: 6.0,
            section_span: 10.0,
            ribbon_colour: "grey".to_string(),
            mesh_colour: "orange".to_string(),
            vector_colour: "black".to_string(),
            box_opacity: 0.4,
            axis_length: 20.0,
        }
    }
}

impl PlotStyle {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let style: Self =
            toml::from_str(text).map_err(|e| FlightPlotError::InvalidStyle(e.to_string()))?;
        style.validate()?;
        Ok(style)
    }

    pub fn validate(&self) -> Result<()> {
        if self.palette.is_empty() || self.section_palette.is_empty() {
            return Err(FlightPlotError::InvalidStyle(
                "palettes must hold at least one colour".to_string(),
            ));
        }
        for (name, width) in [
            ("path_width", self.path_width),
            ("tip_width", self.tip_width),
            ("section_width", self.section_width),
        ] {
            if !(width > 0.0) {
                return Err(FlightPlotError::InvalidStyle(format!(
                    "{name} must be positive, got {width}"
                )));
            }
        }
        if !(self.section_span >= 0.0) {
            return Err(FlightPlotError::InvalidStyle(format!(
                "section_span must be non-negative, got {}",
                self.section_span
            )));
        }
        if !(0.0..=1.0).contains(&self.box_opacity) {
            return Err(FlightPlotError::InvalidStyle(format!(
                "box_opacity must lie in [0, 1], got {}",
                self.box_opacity
            )));
        }
        Ok(())
    }

    /// Palette colour for series `i`, wrapping around.
    ///
    /// An empty palette falls back to the path colour.
    pub fn colour(&self, i: usize) -> &str {
        cycle(&self.palette, i).unwrap_or(&self.path_colour)
    }

    /// Section palette colour for section `i`, wrapping around.
    pub fn section_colour(&self, i: usize) -> &str {
        cycle(&self.section_palette, i).unwrap_or(&self.path_colour)
    }
}

fn cycle(palette: &[String], i: usize) -> Option<&str> {
    i.checked_rem(palette.len()).map(|i| palette[i].as_str())
}
