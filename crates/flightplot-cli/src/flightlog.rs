//! CSV flight logs.
//!
//! One row per sample. The columns `t,x,y,z,qw,qx,qy,qz` are required: time
//! in seconds, world position in metres and the body→world attitude
//! quaternion. `manoeuvre` and `element` are read as labels; every other
//! column becomes a numeric channel (empty cells read as NaN).

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use flightplot_core::state::{ELEMENT_LABEL, MANOEUVRE_LABEL};
use flightplot_core::{FlightPlotError, StateSequence};
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

pub const STATE_COLUMNS: [&str; 8] = ["t", "x", "y", "z", "qw", "qx", "qy", "qz"];

const LABEL_COLUMNS: [&str; 2] = [MANOEUVRE_LABEL, ELEMENT_LABEL];

pub fn load_csv(path: &Path) -> Result<StateSequence> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open flight log {}", path.display()))?;
    let seq = read_csv(file).with_context(|| format!("failed to read {}", path.display()))?;
    tracing::info!(samples = seq.len(), path = %path.display(), "loaded flight log");
    Ok(seq)
}

pub fn read_csv<R: Read>(reader: R) -> Result<StateSequence> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut state_idx = [0usize; 8];
    for (slot, name) in state_idx.iter_mut().zip(STATE_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| FlightPlotError::MissingColumn(name.to_string()))?;
    }

    let mut channels: BTreeMap<String, (usize, Vec<f64>)> = BTreeMap::new();
    let mut labels: BTreeMap<String, (usize, Vec<String>)> = BTreeMap::new();
    for (i, h) in headers.iter().enumerate() {
        if STATE_COLUMNS.contains(&h) {
            continue;
        }
        if LABEL_COLUMNS.contains(&h) {
            labels.insert(h.to_string(), (i, Vec::new()));
        } else {
            channels.insert(h.to_string(), (i, Vec::new()));
        }
    }

    let mut seq = StateSequence::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        // Header is line 1
        let line = row + 2;
        let field = |i: usize| -> Result<f64> {
            parse_cell(record.get(i).unwrap_or_default())
                .with_context(|| format!("line {line}, column '{}'", &headers[i]))
        };

        let [t, x, y, z, qw, qx, qy, qz] = state_idx;
        let q = Quaternion::new(field(qw)?, field(qx)?, field(qy)?, field(qz)?);
        if !(q.norm() > 1e-12) {
            bail!("line {line}: attitude quaternion has zero length");
        }
        seq.push(
            field(t)?,
            Vector3::new(field(x)?, field(y)?, field(z)?),
            UnitQuaternion::from_quaternion(q),
        );

        for (i, values) in channels.values_mut() {
            values.push(field(*i)?);
        }
        for (i, values) in labels.values_mut() {
            values.push(record.get(*i).unwrap_or_default().to_string());
        }
    }

    for (name, (_, values)) in channels {
        seq = seq.with_channel(name, values)?;
    }
    for (name, (_, values)) in labels {
        seq = seq.with_labels(name, values)?;
    }
    Ok(seq)
}

fn parse_cell(cell: &str) -> Result<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse()
        .map_err(|e| anyhow!("'{cell}' is not a number: {e}"))
}

/// Writes a sequence in the layout [`read_csv`] accepts.
pub fn write_csv<W: Write>(seq: &StateSequence, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let channel_names: Vec<&str> = seq.channel_names().collect();
    let label_names: Vec<&str> = LABEL_COLUMNS
        .into_iter()
        .filter(|l| seq.has_labels(l))
        .collect();

    let header: Vec<&str> = STATE_COLUMNS
        .iter()
        .copied()
        .chain(channel_names.iter().copied())
        .chain(label_names.iter().copied())
        .collect();
    wtr.write_record(&header)?;

    let channels = channel_names
        .iter()
        .map(|c| seq.column(c))
        .collect::<flightplot_core::Result<Vec<_>>>()?;
    let labels = label_names
        .iter()
        .map(|l| seq.labels(l))
        .collect::<flightplot_core::Result<Vec<_>>>()?;

    for i in 0..seq.len() {
        let p = seq.pos()[i];
        let q = seq.att()[i];
        let mut row = vec![
            format!("{:.4}", seq.time()[i]),
            format!("{:.4}", p.x),
            format!("{:.4}", p.y),
            format!("{:.4}", p.z),
            format!("{:.6}", q.w),
            format!("{:.6}", q.i),
            format!("{:.6}", q.j),
            format!("{:.6}", q.k),
        ];
        row.extend(channels.iter().map(|c| format!("{:.6}", c[i])));
        row.extend(labels.iter().map(|l| l[i].clone()));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
