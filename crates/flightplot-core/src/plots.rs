//! Trace builders for flight sequences.
//!
//! Each function maps columns of a [`StateSequence`] (or a transform derived
//! from it) onto one `plotly` trace. Styling always comes from the caller's
//! [`PlotStyle`].

use nalgebra::Vector3;
use plotly::common::HoverInfo;
use plotly::mesh3d::IntensityMode;
use plotly::Scatter;

use crate::error::{FlightPlotError, Result};
use crate::frame::Coord;
use crate::model::MeshModel;
use crate::ribbon::{build_ribbon, FaceColors};
use crate::state::{
    StateSequence, AOA_COLUMNS, BODY_RATE_COLUMNS, DEFAULT_CONTROL_COLUMNS, ELEMENT_LABEL,
    MANOEUVRE_LABEL,
};
use crate::style::{Dash, PlotStyle};
use crate::trace::{self, Mesh, Path3d, Series};

/// Distance from the pilot to the box plane, in metres.
const BOX_DISTANCE: f64 = 170.0;
/// Half-angle of the box seen from the pilot, in degrees.
const BOX_HALF_ANGLE_DEG: f64 = 60.0;

/// Per-value conversion applied to time-series columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnTransform {
    #[default]
    Identity,
    /// Radians to degrees.
    Degrees,
}

impl ColumnTransform {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Identity => value,
            Self::Degrees => value.to_degrees(),
        }
    }
}

// ---------------------------------------------------------------------------
// 3D traces
// ---------------------------------------------------------------------------

/// Outline of the aerobatic box as seen from the pilot position at the origin.
pub fn box_trace(style: &PlotStyle) -> Mesh {
    let xlim = BOX_DISTANCE * BOX_HALF_ANGLE_DEG.to_radians().tan();
    let ylim = BOX_DISTANCE;
    let vertices = [
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(xlim, ylim, 0.0),
        Vector3::new(0.0, ylim, 0.0),
        Vector3::new(-xlim, ylim, 0.0),
        Vector3::new(xlim, ylim, xlim),
        Vector3::new(0.0, ylim, xlim),
        Vector3::new(-xlim, ylim, xlim),
    ];
    let faces = [[0, 1, 2], [0, 2, 3], [0, 1, 4], [0, 3, 6], [0, 4, 6]];
    trace::mesh(&vertices, &faces)
        .name("box")
        .opacity(style.box_opacity)
}

/// Plain 3D line through `points`.
pub fn trace3d(
    points: &[Vector3<f64>],
    colour: &str,
    width: f64,
    text: Option<Vec<String>>,
    name: &str,
    style: &PlotStyle,
) -> Path3d {
    let tr = trace::path(points)
        .mode(style.mode.into())
        .line(trace::line(colour, Some(width), None))
        .name(name)
        .show_legend(style.show_legend_3d);
    match text {
        Some(text) => tr.text_array(text).hover_info(HoverInfo::Text),
        None => tr,
    }
}

/// Flight path of the centre of gravity, hover text showing the timestamp.
pub fn cg_trace(seq: &StateSequence, style: &PlotStyle) -> Path3d {
    trace3d(
        seq.pos(),
        &style.path_colour,
        style.path_width,
        Some(seq.time_text()),
        "cgtrace",
        style,
    )
}

/// Left and right wingtip tracks for a wingspan of `span`.
pub fn tip_traces(seq: &StateSequence, span: f64, style: &PlotStyle) -> Vec<Path3d> {
    let text = seq.time_text();
    [
        (span / 2.0, &style.left_tip_colour, "left tip"),
        (-span / 2.0, &style.right_tip_colour, "right tip"),
    ]
    .into_iter()
    .map(|(y, colour, name)| {
        trace3d(
            &seq.body_to_world(&Vector3::new(0.0, y, 0.0)),
            colour,
            style.tip_width,
            Some(text.clone()),
            name,
            style,
        )
        .show_legend(false)
    })
    .collect()
}

/// Ribbon swept by the wingtips, as a flat-shaded mesh.
///
/// # Panics
///
/// See [`build_ribbon`].
pub fn ribbon_trace(
    seq: &StateSequence,
    span: f64,
    colours: impl Into<FaceColors>,
    name: &str,
) -> Mesh {
    let ribbon = build_ribbon(seq, span, colours);
    trace::mesh(&ribbon.vertices, &ribbon.faces)
        .name(name)
        .face_color(ribbon.face_colors)
        .intensity_mode(IntensityMode::Cell)
}

/// Copies of `model` placed along the sequence, named by timestamp.
pub fn vehicle_meshes(
    seq: &StateSequence,
    npoints: usize,
    colour: &str,
    model: &MeshModel,
) -> Vec<Mesh> {
    seq.sample_indices(npoints)
        .into_iter()
        .map(|i| {
            model
                .transform(&seq.transform(i))
                .to_mesh3d(colour, &format!("{:.1}", seq.time()[i]))
        })
        .collect()
}

/// One segment per sampled point, from the position to position + vector.
///
/// `vectors` holds one world-frame vector per sample (wind, velocity, ...).
pub fn vector_traces(
    seq: &StateSequence,
    npoints: usize,
    vectors: &[Vector3<f64>],
    style: &PlotStyle,
) -> Result<Vec<Path3d>> {
    if vectors.len() != seq.len() {
        return Err(FlightPlotError::LengthMismatch {
            what: "vectors".to_string(),
            expected: seq.len(),
            found: vectors.len(),
        });
    }
    Ok(seq
        .sample_indices(npoints)
        .into_iter()
        .map(|i| {
            let start = seq.pos()[i];
            trace::path(&[start, start + vectors[i]])
                .mode(style.mode.into())
                .line(trace::line(&style.vector_colour, None, None))
                .show_legend(false)
        })
        .collect())
}

fn labelled_line(
    seq: &StateSequence,
    name: &str,
    text: Option<Vec<String>>,
    colour: &str,
    width: Option<f64>,
    show_legend: bool,
    style: &PlotStyle,
) -> Path3d {
    let tr = trace::path(seq.pos())
        .mode(style.mode.into())
        .line(trace::line(colour, width, None))
        .name(name)
        .show_legend(show_legend);
    match text {
        Some(text) => tr.text_array(text).hover_info(HoverInfo::Text),
        None => tr,
    }
}

/// One line per manoeuvre, hover text naming the element under the cursor.
pub fn manoeuvre_traces(seq: &StateSequence, style: &PlotStyle) -> Result<Vec<Path3d>> {
    seq.sections(MANOEUVRE_LABEL)?
        .into_iter()
        .enumerate()
        .map(|(i, (name, section))| -> Result<Path3d> {
            let text = if section.has_labels(ELEMENT_LABEL) {
                Some(section.labels(ELEMENT_LABEL)?.to_vec())
            } else {
                None
            };
            Ok(labelled_line(
                &section,
                &name,
                text,
                style.colour(i),
                None,
                true,
                style,
            ))
        })
        .collect()
}

/// One line per element of the named manoeuvre, named by element index.
///
/// Fails with [`FlightPlotError::UnknownSection`] when no sample belongs to
/// `manoeuvre`.
pub fn element_traces(
    seq: &StateSequence,
    manoeuvre: &str,
    style: &PlotStyle,
) -> Result<Vec<Path3d>> {
    let man = seq.section(MANOEUVRE_LABEL, manoeuvre)?;
    Ok(man
        .sections(ELEMENT_LABEL)?
        .into_iter()
        .enumerate()
        .map(|(i, (_, element))| {
            let text = vec![manoeuvre.to_string(); element.len()];
            labelled_line(
                &element,
                &i.to_string(),
                Some(text),
                style.colour(i),
                None,
                true,
                style,
            )
        })
        .collect())
}

/// Wingtip tracks plus one wide line per section of a label column.
pub fn section_traces(
    seq: &StateSequence,
    label: &str,
    show_legend: bool,
    style: &PlotStyle,
) -> Result<Vec<Path3d>> {
    let mut traces = tip_traces(seq, style.section_span, style);
    for (i, (name, section)) in seq.sections(label)?.into_iter().enumerate() {
        traces.push(labelled_line(
            &section,
            &name,
            None,
            style.section_colour(i),
            Some(style.section_width),
            show_legend,
            style,
        ));
    }
    Ok(traces)
}

/// Axis markers for each reference frame.
pub fn axes_traces(coords: &[Coord], style: &PlotStyle) -> Vec<Path3d> {
    coords
        .iter()
        .map(|c| {
            trace3d(
                &c.plot_points(style.axis_length),
                &style.path_colour,
                style.path_width,
                None,
                "axes",
                style,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// One 2D trace per named column against time.
pub fn column_traces(
    seq: &StateSequence,
    columns: &[&str],
    dash: Dash,
    style: &PlotStyle,
    transform: ColumnTransform,
) -> Result<Vec<Series>> {
    columns
        .iter()
        .enumerate()
        .map(|(i, &name)| -> Result<Series> {
            let values = seq.column(name)?;
            Ok(Scatter::new(
                seq.time().to_vec(),
                values.iter().map(|&v| transform.apply(v)).collect(),
            )
            .mode(style.mode.into())
            .line(trace::line(style.colour(i), None, Some(dash.into())))
            .name(name)
            .show_legend(true))
        })
        .collect()
}

/// Body rates in degrees per second.
pub fn axis_rate_traces(seq: &StateSequence, style: &PlotStyle) -> Result<Vec<Series>> {
    column_traces(
        seq,
        &BODY_RATE_COLUMNS,
        style.dash,
        style,
        ColumnTransform::Degrees,
    )
}

/// Control inputs, defaulting to aileron, elevator, rudder and throttle.
pub fn control_input_traces(
    seq: &StateSequence,
    columns: Option<&[&str]>,
    style: &PlotStyle,
) -> Result<Vec<Series>> {
    column_traces(
        seq,
        columns.unwrap_or(&DEFAULT_CONTROL_COLUMNS),
        style.dash,
        style,
        ColumnTransform::Identity,
    )
}

/// Angle of attack and sideslip in degrees.
pub fn aoa_traces(seq: &StateSequence, style: &PlotStyle) -> Result<Vec<Series>> {
    column_traces(
        seq,
        &AOA_COLUMNS,
        style.aoa_dash,
        style,
        ColumnTransform::Degrees,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::UnitQuaternion;
    use serde::Serialize;
    use serde_json::{json, Value};

    fn labelled_sequence() -> StateSequence {
        let mut seq = StateSequence::new();
        for i in 0..6 {
            seq.push(
                i as f64 * 0.2,
                Vector3::new(i as f64 * 10.0, 0.0, 100.0),
                UnitQuaternion::identity(),
            );
        }
        let man = ["entry", "entry", "loop", "loop", "loop", "exit"];
        let elm = ["line", "line", "pull", "arc", "arc", "line"];
        seq.with_channel("brvr", vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5])
            .unwrap()
            .with_channel("brvp", vec![1.0; 6])
            .unwrap()
            .with_channel("brvy", vec![-1.0; 6])
            .unwrap()
            .with_channel("alpha", vec![0.05; 6])
            .unwrap()
            .with_channel("beta", vec![0.0; 6])
            .unwrap()
            .with_labels(MANOEUVRE_LABEL, man.iter().map(|s| s.to_string()).collect())
            .unwrap()
            .with_labels(ELEMENT_LABEL, elm.iter().map(|s| s.to_string()).collect())
            .unwrap()
    }

    fn to_json<T: Serialize>(trace: &T) -> Value {
        serde_json::to_value(trace).unwrap()
    }

    fn floats(v: &Value) -> Vec<f64> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|x| x.as_f64().unwrap())
            .collect()
    }

    #[test]
    fn test_box_trace() {
        let b = to_json(&box_trace(&PlotStyle::default()));
        assert_eq!(b["type"], "mesh3d");
        let x = floats(&b["x"]);
        assert_eq!(x.len(), 7);
        assert_eq!(b["i"], json!([0, 0, 0, 0, 0]));
        assert_eq!(b["j"], json!([1, 2, 1, 3, 4]));
        assert_eq!(b["k"], json!([2, 3, 4, 6, 6]));
        assert!((x[1] - 170.0 * 3f64.sqrt()).abs() < 1e-9);
        assert_eq!(b["opacity"], 0.4);
    }

    #[test]
    fn test_cg_trace_hover_text() {
        let tr = to_json(&cg_trace(&labelled_sequence(), &PlotStyle::default()));
        assert_eq!(floats(&tr["x"]), vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(tr["text"][1], "0.2");
        assert_eq!(tr["hoverinfo"], "text");
        assert_eq!(tr["mode"], "lines");
        assert_eq!(tr["showlegend"], false);
        assert_eq!(tr["line"]["width"], 2.0);
    }

    #[test]
    fn test_tip_traces_offset_sides() {
        let style = PlotStyle::default();
        let tips: Vec<Value> = tip_traces(&labelled_sequence(), 4.0, &style)
            .iter()
            .map(to_json)
            .collect();
        assert_eq!(tips.len(), 2);
        assert!(floats(&tips[0]["y"]).iter().all(|&y| (y - 2.0).abs() < 1e-12));
        assert!(floats(&tips[1]["y"]).iter().all(|&y| (y + 2.0).abs() < 1e-12));
        assert_eq!(tips[0]["line"]["color"], "blue");
        assert_eq!(tips[1]["line"]["width"], 1.0);
    }

    #[test]
    fn test_ribbon_trace() {
        let mesh = to_json(&ribbon_trace(&labelled_sequence(), 2.0, "grey", "ribbon"));
        assert_eq!(mesh["name"], "ribbon");
        assert_eq!(mesh["x"].as_array().unwrap().len(), 12);
        assert_eq!(mesh["i"].as_array().unwrap().len(), 10);
        assert_eq!(mesh["facecolor"].as_array().unwrap().len(), 10);
        assert_eq!(mesh["facecolor"][9], "grey");
        assert_eq!(mesh["intensitymode"], "cell");
    }

    #[test]
    fn test_vehicle_meshes_include_ends() {
        let seq = labelled_sequence();
        let meshes: Vec<Value> = vehicle_meshes(&seq, 1, "orange", &MeshModel::aircraft(1.0))
            .iter()
            .map(to_json)
            .collect();
        let names: Vec<_> = meshes.iter().map(|m| m["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["0.0", "0.6", "1.0"]);
        // First placement sits at the first sample position.
        assert!((floats(&meshes[0]["x"])[0] - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_vector_traces() {
        let seq = labelled_sequence();
        let wind = vec![Vector3::new(0.0, 5.0, 0.0); seq.len()];
        let trs = vector_traces(&seq, 1, &wind, &PlotStyle::default()).unwrap();
        assert_eq!(trs.len(), 3);
        let mid = to_json(&trs[1]);
        assert_eq!(floats(&mid["x"]), vec![30.0, 30.0]);
        assert_eq!(floats(&mid["y"]), vec![0.0, 5.0]);

        let short = vec![Vector3::zeros(); 2];
        assert!(vector_traces(&seq, 1, &short, &PlotStyle::default()).is_err());
    }

    #[test]
    fn test_manoeuvre_traces() {
        let style = PlotStyle::default();
        let trs: Vec<Value> = manoeuvre_traces(&labelled_sequence(), &style)
            .unwrap()
            .iter()
            .map(to_json)
            .collect();
        let names: Vec<_> = trs.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["entry", "loop", "exit"]);
        assert_eq!(trs[1]["x"].as_array().unwrap().len(), 3);
        assert_eq!(trs[1]["text"], json!(["pull", "arc", "arc"]));
        assert_eq!(trs[1]["line"]["color"], style.colour(1));
        assert_eq!(trs[1]["showlegend"], true);
    }

    #[test]
    fn test_element_traces() {
        let trs: Vec<Value> = element_traces(&labelled_sequence(), "loop", &PlotStyle::default())
            .unwrap()
            .iter()
            .map(to_json)
            .collect();
        assert_eq!(trs.len(), 2);
        assert_eq!(trs[0]["name"], "0");
        assert_eq!(floats(&trs[1]["x"]), vec![30.0, 40.0]);
        assert_eq!(trs[1]["text"], json!(["loop", "loop"]));
    }

    #[test]
    fn test_element_traces_unknown_manoeuvre() {
        let err = element_traces(&labelled_sequence(), "Loop", &PlotStyle::default())
            .err()
            .expect("manoeuvre names are case sensitive");
        assert!(matches!(
            err,
            FlightPlotError::UnknownSection { label, name } if label == MANOEUVRE_LABEL && name == "Loop"
        ));
    }

    #[test]
    fn test_section_traces() {
        let style = PlotStyle::default();
        let trs: Vec<Value> = section_traces(&labelled_sequence(), MANOEUVRE_LABEL, true, &style)
            .unwrap()
            .iter()
            .map(to_json)
            .collect();
        // Two wingtip tracks plus three sections.
        assert_eq!(trs.len(), 5);
        assert_eq!(trs[2]["line"]["width"], 6.0);
        assert_eq!(trs[4]["line"]["color"], style.section_colour(2));
        assert_eq!(trs[2]["showlegend"], true);
    }

    #[test]
    fn test_rate_traces_in_degrees() {
        let seq = labelled_sequence();
        let trs = axis_rate_traces(&seq, &PlotStyle::default()).unwrap();
        assert_eq!(trs.len(), 3);
        let roll = to_json(&trs[0]);
        assert_eq!(roll["type"], "scatter");
        assert_eq!(floats(&roll["x"]), seq.time());
        assert_eq!(roll["name"], "brvr");
        for (y, raw) in floats(&roll["y"]).iter().zip(seq.column("brvr").unwrap()) {
            assert!((y - raw.to_degrees()).abs() < 1e-12);
        }
        assert_eq!(roll["line"]["dash"], "solid");
    }

    #[test]
    fn test_aoa_traces_dashed() {
        let trs = aoa_traces(&labelled_sequence(), &PlotStyle::default()).unwrap();
        assert_eq!(trs.len(), 2);
        assert_eq!(to_json(&trs[1])["line"]["dash"], "dash");
        assert!((floats(&to_json(&trs[0])["y"])[0] - 0.05f64.to_degrees()).abs() < 1e-12);
    }

    #[test]
    fn test_column_traces_keep_values_and_order() {
        let seq = labelled_sequence();
        let trs: Vec<Value> = column_traces(
            &seq,
            &["brvy", "brvr"],
            Dash::Dot,
            &PlotStyle::default(),
            ColumnTransform::Identity,
        )
        .unwrap()
        .iter()
        .map(to_json)
        .collect();
        assert_eq!(floats(&trs[0]["y"]), vec![-1.0; 6]);
        assert_eq!(floats(&trs[1]["y"]), seq.column("brvr").unwrap());
        assert_eq!(trs[1]["line"]["color"], "#EF553B");
        assert_eq!(trs[1]["line"]["dash"], "dot");
    }

    #[test]
    fn test_missing_control_columns() {
        let err = control_input_traces(&labelled_sequence(), None, &PlotStyle::default())
            .err()
            .expect("default control columns are absent");
        assert!(matches!(err, FlightPlotError::MissingColumn(name) if name == "aileron"));

        let some = control_input_traces(
            &labelled_sequence(),
            Some(&["brvp"][..]),
            &PlotStyle::default(),
        )
        .unwrap();
        assert_eq!(some.len(), 1);
    }

    #[test]
    fn test_axes_traces() {
        let trs = axes_traces(&[Coord::default(), Coord::default()], &PlotStyle::default());
        assert_eq!(trs.len(), 2);
        assert_eq!(
            floats(&to_json(&trs[0])["x"]),
            vec![0.0, 20.0, 0.0, 0.0, 0.0, 0.0]
        );
    }
}
