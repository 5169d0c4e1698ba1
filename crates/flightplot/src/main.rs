//! Flightplot - aerobatic flight trajectory visualiser

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "flightplot")]
#[command(about = "Render aerobatic flight trajectories as 3D scenes and time-series plots")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a flight log (or the demo flight) into figure files
    Render {
        /// Pass remaining arguments to flightplot-cli
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Simulate the demo flight and write it as a CSV flight log
    Simulate {
        /// Output file
        #[arg(short, long, default_value = "demo_flight.csv")]
        output: PathBuf,

        /// Airspeed (m/s)
        #[arg(long, default_value_t = 30.0)]
        speed: f64,

        /// Time step (s)
        #[arg(long, default_value_t = 0.05)]
        dt: f64,

        /// Wind towards world x (m/s)
        #[arg(long, default_value_t = 0.0)]
        wind_x: f64,

        /// Wind towards world y (m/s)
        #[arg(long, default_value_t = 3.0)]
        wind_y: f64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render { args }) => {
            let cli_args: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
            run_render(&cli_args)
        }
        Some(Commands::Simulate {
            output,
            speed,
            dt,
            wind_x,
            wind_y,
        }) => run_simulate(&output, speed, dt, wind_x, wind_y),
        None => {
            // Default to rendering the demo flight
            run_render(&[])
        }
    }
}

fn run_render(args: &[&str]) -> anyhow::Result<()> {
    let mut full_args = vec!["flightplot-cli"];
    full_args.extend(args);

    match flightplot_cli::run_cli_main(&full_args) {
        Ok(_) => Ok(()),
        Err(e) => {
            // Help and version requests surface as clap errors
            if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
                clap_err.exit();
            }
            eprintln!("CLI error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run_simulate(
    output: &Path,
    speed: f64,
    dt: f64,
    wind_x: f64,
    wind_y: f64,
) -> anyhow::Result<()> {
    let plan = flightplot_cli::demo_plan(speed, dt, wind_x, wind_y);
    let seq = flightplot_sim::simulate_plan(&plan)?;

    let file = std::fs::File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    flightplot_cli::flightlog::write_csv(&seq, file)?;

    tracing::info!(samples = seq.len(), path = %output.display(), "wrote demo flight log");
    println!("Demo flight written to {:?}", output);
    Ok(())
}
