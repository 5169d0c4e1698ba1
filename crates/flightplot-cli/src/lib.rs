//! Flightplot CLI - turns flight logs into figure files.

pub mod args;
pub mod flightlog;
pub mod output;
pub mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flightplot_core::{MeshModel, PlotStyle, StateSequence};
use flightplot_sim::{simulate_plan, FlightPlan};
use nalgebra::Vector3;

pub use args::{Args, OutputFormat, PlotKind, SeriesKind};
pub use render::{render, RenderOptions};

/// Public function that can be called from the main binary
pub fn run_cli_main(args: &[&str]) -> Result<Vec<PathBuf>> {
    let args = Args::try_parse_from(args)?;
    run(&args)
}

pub fn run(args: &Args) -> Result<Vec<PathBuf>> {
    let seq = match &args.input {
        Some(path) => flightlog::load_csv(path)?,
        None => {
            tracing::info!("no input log given, simulating demo flight");
            demo_sequence(args)?
        }
    };

    let opts = build_render_options(args)?;
    let figures = render(&seq, &opts)?;

    let mut written = Vec::with_capacity(figures.len());
    for (name, fig) in &figures {
        written.push(output::write_figure(&args.output_dir, name, fig, args.format)?);
    }

    println!("Rendered {} samples into {} figures:", seq.len(), written.len());
    for path in &written {
        println!("  {}", path.display());
    }
    Ok(written)
}

/// Default demo flight at the given airspeed, time step and horizontal wind.
///
/// The plan is validated when it is flown by [`simulate_plan`].
pub fn demo_plan(speed: f64, dt: f64, wind_x: f64, wind_y: f64) -> FlightPlan {
    FlightPlan {
        speed,
        dt,
        wind: Vector3::new(wind_x, wind_y, 0.0),
        ..FlightPlan::default()
    }
}

fn demo_sequence(args: &Args) -> Result<StateSequence> {
    let plan = demo_plan(args.speed, args.dt, args.wind_x, args.wind_y);
    Ok(simulate_plan(&plan)?)
}

fn build_render_options(args: &Args) -> Result<RenderOptions> {
    let style = match &args.style {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read style file {}", path.display()))?;
            PlotStyle::from_toml_str(&text)
                .with_context(|| format!("failed to parse style file {}", path.display()))?
        }
        None => PlotStyle::default(),
    };

    let model = match &args.model {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read model {}", path.display()))?;
            MeshModel::from_obj(&text)
                .with_context(|| format!("failed to parse model {}", path.display()))?
        }
        None => MeshModel::aircraft(args.span),
    };

    Ok(RenderOptions {
        span: args.span,
        npoints: args.npoints,
        plots: args.plots.clone(),
        series: args.series.clone(),
        controls: args.controls.clone(),
        elements_of: args.elements_of.clone(),
        vector_scale: args.vector_scale,
        style,
        model,
    })
}
