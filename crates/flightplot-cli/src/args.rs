use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(name = "flightplot-cli")]
#[command(about = "Render aerobatic flight logs as 3D and time-series figures")]
#[command(version)]
pub struct Args {
    /// Flight log (CSV). A demo flight is simulated when omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Output file format
    #[arg(short, long, value_enum, default_value = "html")]
    pub format: OutputFormat,

    // ── Scene options ─────────────────────────────────────────
    /// Wingspan used for ribbons, tip tracks and the vehicle model (m)
    #[arg(long, default_value_t = 10.0)]
    pub span: f64,

    /// Number of intermediate vehicle placements and vectors
    #[arg(long, default_value_t = 10)]
    pub npoints: usize,

    /// 3D layers to draw
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values = ["box", "cg", "ribbon", "meshes", "manoeuvres"]
    )]
    pub plots: Vec<PlotKind>,

    /// Time-series figures to draw
    #[arg(long, value_enum, value_delimiter = ',', default_values = ["rates", "aoa"])]
    pub series: Vec<SeriesKind>,

    /// Control input columns (defaults to aileron, elevator, rudder, throttle)
    #[arg(long, value_delimiter = ',')]
    pub controls: Option<Vec<String>>,

    /// Manoeuvre whose elements are drawn by the `elements` layer
    #[arg(long)]
    pub elements_of: Option<String>,

    /// Length multiplier applied to drawn wind vectors
    #[arg(long, default_value_t = 5.0)]
    pub vector_scale: f64,

    /// Style file (TOML)
    #[arg(long)]
    pub style: Option<PathBuf>,

    /// Vehicle model (Wavefront OBJ, body axes, metres)
    #[arg(long)]
    pub model: Option<PathBuf>,

    // ── Demo flight options ───────────────────────────────────
    #[arg(long, default_value_t = 30.0)]
    pub speed: f64,

    #[arg(long, default_value_t = 0.05)]
    pub dt: f64,

    #[arg(long, default_value_t = 0.0)]
    pub wind_x: f64,

    #[arg(long, default_value_t = 3.0)]
    pub wind_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Html,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlotKind {
    /// Aerobatic box outline
    Box,
    /// Centre of gravity path
    Cg,
    /// Wingtip tracks
    Tips,
    /// Wingtip ribbon surface
    Ribbon,
    /// Vehicle model placed along the path
    Meshes,
    /// Wind vectors
    Vectors,
    /// One line per manoeuvre
    Manoeuvres,
    /// One line per element of `--elements-of`
    Elements,
    /// Tip tracks plus wide manoeuvre lines
    Sections,
    /// World and entry reference frames
    Axes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeriesKind {
    /// Body rates (deg/s)
    Rates,
    /// Control inputs
    Controls,
    /// Angle of attack and sideslip (deg)
    Aoa,
}
