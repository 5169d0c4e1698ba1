//! Builds figures from a flight sequence.

use anyhow::{bail, Result};
use flightplot_core::plots::{
    aoa_traces, axes_traces, axis_rate_traces, box_trace, cg_trace, control_input_traces,
    element_traces, manoeuvre_traces, ribbon_trace, section_traces, tip_traces, vector_traces,
    vehicle_meshes,
};
use flightplot_core::state::MANOEUVRE_LABEL;
use flightplot_core::trace::{scene_layout, time_series_layout};
use flightplot_core::{Coord, MeshModel, PlotStyle, StateSequence};
use flightplot_sim::WIND_COLUMNS;
use plotly::{Plot, Trace};

use crate::args::{PlotKind, SeriesKind};

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub span: f64,
    pub npoints: usize,
    pub plots: Vec<PlotKind>,
    pub series: Vec<SeriesKind>,
    pub controls: Option<Vec<String>>,
    pub elements_of: Option<String>,
    pub vector_scale: f64,
    pub style: PlotStyle,
    pub model: MeshModel,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            span: 10.0,
            npoints: 10,
            plots: vec![
                PlotKind::Box,
                PlotKind::Cg,
                PlotKind::Ribbon,
                PlotKind::Meshes,
                PlotKind::Manoeuvres,
            ],
            series: vec![SeriesKind::Rates, SeriesKind::Aoa],
            controls: None,
            elements_of: None,
            vector_scale: 5.0,
            style: PlotStyle::default(),
            model: MeshModel::aircraft(10.0),
        }
    }
}

/// Named output figures: the 3D scene first, then one figure per series kind.
///
/// An empty sequence renders empty traces rather than failing.
pub fn render(seq: &StateSequence, opts: &RenderOptions) -> Result<Vec<(String, Plot)>> {
    if !(opts.span >= 0.0) {
        bail!("span must be non-negative, got {}", opts.span);
    }
    opts.style.validate()?;
    if seq.is_empty() {
        tracing::warn!("flight sequence is empty, figures will hold no data");
    }

    let mut figures = vec![("flight3d".to_string(), scene(seq, opts)?)];
    for kind in &opts.series {
        figures.push(series(seq, *kind, opts)?);
    }
    Ok(figures)
}

fn boxed<T: Trace + 'static>(traces: Vec<Box<T>>) -> Vec<Box<dyn Trace>> {
    traces.into_iter().map(|t| t as Box<dyn Trace>).collect()
}

fn scene(seq: &StateSequence, opts: &RenderOptions) -> Result<Plot> {
    let style = &opts.style;
    let mut traces: Vec<Box<dyn Trace>> = Vec::new();

    for kind in &opts.plots {
        let before = traces.len();
        match kind {
            PlotKind::Box => traces.push(box_trace(style)),
            PlotKind::Cg => traces.push(cg_trace(seq, style)),
            PlotKind::Tips => traces.extend(boxed(tip_traces(seq, opts.span, style))),
            PlotKind::Ribbon => traces.push(ribbon_trace(
                seq,
                opts.span,
                style.ribbon_colour.as_str(),
                "ribbon",
            )),
            PlotKind::Meshes => traces.extend(boxed(vehicle_meshes(
                seq,
                opts.npoints,
                &style.mesh_colour,
                &opts.model,
            ))),
            PlotKind::Vectors => {
                let wind: Vec<_> = seq
                    .vector_column(WIND_COLUMNS)?
                    .into_iter()
                    .map(|w| w * opts.vector_scale)
                    .collect();
                traces.extend(boxed(vector_traces(seq, opts.npoints, &wind, style)?));
            }
            PlotKind::Manoeuvres | PlotKind::Sections if !seq.has_labels(MANOEUVRE_LABEL) => {
                tracing::warn!(layer = ?kind, "no manoeuvre labels in the sequence, layer skipped");
            }
            PlotKind::Manoeuvres => traces.extend(boxed(manoeuvre_traces(seq, style)?)),
            PlotKind::Elements => match &opts.elements_of {
                Some(name) => traces.extend(boxed(element_traces(seq, name, style)?)),
                None => bail!("the elements layer needs --elements-of <MANOEUVRE>"),
            },
            PlotKind::Sections => {
                traces.extend(boxed(section_traces(seq, MANOEUVRE_LABEL, true, style)?))
            }
            PlotKind::Axes => {
                let mut coords = vec![Coord::default()];
                if !seq.is_empty() {
                    coords.push(Coord::from_isometry(&seq.transform(0)));
                }
                traces.extend(boxed(axes_traces(&coords, style)));
            }
        }
        tracing::debug!(layer = ?kind, traces = traces.len() - before, "added scene layer");
    }

    let mut plot = Plot::new();
    plot.set_layout(scene_layout("Flight"));
    plot.add_traces(traces);
    Ok(plot)
}

fn series(seq: &StateSequence, kind: SeriesKind, opts: &RenderOptions) -> Result<(String, Plot)> {
    let style = &opts.style;
    let (name, layout, traces) = match kind {
        SeriesKind::Rates => (
            "rates",
            time_series_layout("Body rates", "Rate (deg/s)"),
            axis_rate_traces(seq, style)?,
        ),
        SeriesKind::Aoa => (
            "aoa",
            time_series_layout("Angle of attack and sideslip", "Angle (deg)"),
            aoa_traces(seq, style)?,
        ),
        SeriesKind::Controls => {
            let columns: Option<Vec<&str>> = opts
                .controls
                .as_ref()
                .map(|c| c.iter().map(String::as_str).collect());
            (
                "controls",
                time_series_layout("Control inputs", "Deflection"),
                control_input_traces(seq, columns.as_deref(), style)?,
            )
        }
    };
    let mut plot = Plot::new();
    plot.set_layout(layout);
    plot.add_traces(boxed(traces));
    Ok((name.to_string(), plot))
}
