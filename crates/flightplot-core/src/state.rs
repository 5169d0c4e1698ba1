//! Time-indexed flight-state sequences.
//!
//! A [`StateSequence`] stores one sample per timestamp: a world-frame position,
//! a body→world attitude, any number of named scalar channels (body rates,
//! control deflections, aerodynamic angles) and named string labels
//! (manoeuvre and element names). Everything is kept as parallel columns.

use std::collections::BTreeMap;

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

use crate::error::{FlightPlotError, Result};

/// Body-frame angular rate channels (roll, pitch, yaw), in rad/s.
pub const BODY_RATE_COLUMNS: [&str; 3] = ["brvr", "brvp", "brvy"];

/// Angle of attack and sideslip channels, in radians.
pub const AOA_COLUMNS: [&str; 2] = ["alpha", "beta"];

/// Control input channels plotted when the caller does not name any.
pub const DEFAULT_CONTROL_COLUMNS: [&str; 4] = ["aileron", "elevator", "rudder", "throttle"];

/// Label column naming the manoeuvre each sample belongs to.
pub const MANOEUVRE_LABEL: &str = "manoeuvre";

/// Label column naming the element (within a manoeuvre) each sample belongs to.
pub const ELEMENT_LABEL: &str = "element";

// ---------------------------------------------------------------------------
// Sequence
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateSequence {
    time: Vec<f64>,
    pos: Vec<Vector3<f64>>,          // World frame
    att: Vec<UnitQuaternion<f64>>,   // Body -> World
    channels: BTreeMap<String, Vec<f64>>,
    labels: BTreeMap<String, Vec<String>>,
}

impl StateSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one sample.
    ///
    /// # Panics
    ///
    /// Panics if channels or labels are already attached, since they would
    /// no longer line up with the samples.
    pub fn push(&mut self, t: f64, pos: Vector3<f64>, att: UnitQuaternion<f64>) {
        assert!(
            self.channels.is_empty() && self.labels.is_empty(),
            "samples must be pushed before channels or labels are attached"
        );
        self.time.push(t);
        self.pos.push(pos);
        self.att.push(att);
    }

    /// Attaches a scalar channel, replacing any channel of the same name.
    pub fn with_channel(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        check_len(&name, self.len(), values.len())?;
        self.channels.insert(name, values);
        Ok(self)
    }

    /// Attaches a label column, replacing any column of the same name.
    pub fn with_labels(mut self, name: impl Into<String>, values: Vec<String>) -> Result<Self> {
        let name = name.into();
        check_len(&name, self.len(), values.len())?;
        self.labels.insert(name, values);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn pos(&self) -> &[Vector3<f64>] {
        &self.pos
    }

    pub fn att(&self) -> &[UnitQuaternion<f64>] {
        &self.att
    }

    /// Body→world rigid transform of sample `i`.
    pub fn transform(&self, i: usize) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.pos[i]), self.att[i])
    }

    /// Timestamps formatted for hover text.
    pub fn time_text(&self) -> Vec<String> {
        self.time.iter().map(|t| format!("{t:.1}")).collect()
    }

    // -----------------------------------------------------------------------
    // Columns
    // -----------------------------------------------------------------------

    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.channels
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| FlightPlotError::MissingColumn(name.to_string()))
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    pub fn labels(&self, name: &str) -> Result<&[String]> {
        self.labels
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| FlightPlotError::MissingColumn(name.to_string()))
    }

    pub fn has_labels(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    /// Reads three channels as one vector per sample.
    pub fn vector_column(&self, names: [&str; 3]) -> Result<Vec<Vector3<f64>>> {
        let (x, y, z) = (
            self.column(names[0])?,
            self.column(names[1])?,
            self.column(names[2])?,
        );
        Ok((0..self.len())
            .map(|i| Vector3::new(x[i], y[i], z[i]))
            .collect())
    }

    // -----------------------------------------------------------------------
    // Frame transforms
    // -----------------------------------------------------------------------

    /// World-frame track of a point fixed in the body frame.
    pub fn body_to_world(&self, offset: &Vector3<f64>) -> Vec<Vector3<f64>> {
        self.pos
            .iter()
            .zip(&self.att)
            .map(|(p, q)| p + q.transform_vector(offset))
            .collect()
    }

    /// Rotates per-sample body-frame vectors into the world frame.
    pub fn body_to_world_vectors(&self, vectors: &[Vector3<f64>]) -> Result<Vec<Vector3<f64>>> {
        check_len("body vectors", self.len(), vectors.len())?;
        Ok(self
            .att
            .iter()
            .zip(vectors)
            .map(|(q, v)| q.transform_vector(v))
            .collect())
    }

    /// Rotates per-sample world-frame vectors into the body frame.
    pub fn world_to_body_vectors(&self, vectors: &[Vector3<f64>]) -> Result<Vec<Vector3<f64>>> {
        check_len("world vectors", self.len(), vectors.len())?;
        Ok(self
            .att
            .iter()
            .zip(vectors)
            .map(|(q, v)| q.inverse_transform_vector(v))
            .collect())
    }

    // -----------------------------------------------------------------------
    // Subsets
    // -----------------------------------------------------------------------

    /// New sequence holding only the given sample indices, in the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        fn pick<T: Clone>(src: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| src[i].clone()).collect()
        }

        Self {
            time: pick(&self.time, indices),
            pos: pick(&self.pos, indices),
            att: pick(&self.att, indices),
            channels: self
                .channels
                .iter()
                .map(|(k, v)| (k.clone(), pick(v, indices)))
                .collect(),
            labels: self
                .labels
                .iter()
                .map(|(k, v)| (k.clone(), pick(v, indices)))
                .collect(),
        }
    }

    /// All samples whose `label` column equals `name`, contiguous or not.
    pub fn section(&self, label: &str, name: &str) -> Result<Self> {
        let indices: Vec<usize> = self
            .labels(label)?
            .iter()
            .enumerate()
            .filter(|(_, l)| l.as_str() == name)
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            return Err(FlightPlotError::UnknownSection {
                label: label.to_string(),
                name: name.to_string(),
            });
        }
        Ok(self.select(&indices))
    }

    /// Splits the sequence by the values of a label column.
    ///
    /// Sections come back in order of first appearance.
    pub fn sections(&self, label: &str) -> Result<Vec<(String, Self)>> {
        let mut names: Vec<&str> = Vec::new();
        for l in self.labels(label)? {
            if !names.contains(&l.as_str()) {
                names.push(l);
            }
        }
        names
            .into_iter()
            .map(|name| -> Result<(String, Self)> {
                Ok((name.to_string(), self.section(label, name)?))
            })
            .collect()
    }

    /// Evenly stepped sample indices, always including the first and last sample.
    pub fn sample_indices(&self, npoints: usize) -> Vec<usize> {
        let n = self.len();
        if n == 0 {
            return Vec::new();
        }
        let step = (n / (npoints + 1)).max(1);
        let mut indices: Vec<usize> = (0..n).step_by(step).collect();
        if indices.last() != Some(&(n - 1)) {
            indices.push(n - 1);
        }
        indices
    }
}

fn check_len(what: &str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(FlightPlotError::LengthMismatch {
            what: what.to_string(),
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn level_line(n: usize) -> StateSequence {
        let mut seq = StateSequence::new();
        for i in 0..n {
            seq.push(
                i as f64 * 0.5,
                Vector3::new(i as f64, 0.0, 0.0),
                UnitQuaternion::identity(),
            );
        }
        seq
    }

    #[test]
    fn test_body_to_world_level() {
        let seq = level_line(3);
        let left = seq.body_to_world(&Vector3::new(0.0, 1.0, 0.0));
        for (i, p) in left.iter().enumerate() {
            assert!((p - Vector3::new(i as f64, 1.0, 0.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_body_to_world_knife_edge() {
        // Rolled 90 degrees about the body x axis: the left wingtip points up.
        let mut seq = StateSequence::new();
        seq.push(
            0.0,
            Vector3::new(10.0, 0.0, 50.0),
            UnitQuaternion::from_euler_angles(FRAC_PI_2, 0.0, 0.0),
        );
        let tip = seq.body_to_world(&Vector3::new(0.0, 2.0, 0.0));
        assert!((tip[0] - Vector3::new(10.0, 0.0, 52.0)).norm() < 1e-9);
    }

    #[test]
    fn test_world_body_vectors_invert() {
        let mut seq = StateSequence::new();
        seq.push(0.0, Vector3::zeros(), UnitQuaternion::from_euler_angles(0.3, -0.2, 1.1));
        let v = vec![Vector3::new(1.0, 2.0, 3.0)];
        let body = seq.world_to_body_vectors(&v).unwrap();
        let back = seq.body_to_world_vectors(&body).unwrap();
        assert!((back[0] - v[0]).norm() < 1e-12);
    }

    #[test]
    fn test_channel_length_checked() {
        let err = level_line(3).with_channel("brvr", vec![0.0; 2]).unwrap_err();
        assert!(matches!(
            err,
            FlightPlotError::LengthMismatch { expected: 3, found: 2, .. }
        ));
    }

    #[test]
    fn test_missing_column() {
        let seq = level_line(3);
        assert!(matches!(
            seq.column("alpha"),
            Err(FlightPlotError::MissingColumn(name)) if name == "alpha"
        ));
        assert!(seq.labels(MANOEUVRE_LABEL).is_err());
    }

    #[test]
    fn test_sample_indices_include_ends() {
        let seq = level_line(10);
        assert_eq!(seq.sample_indices(2), vec![0, 3, 6, 9]);
        assert_eq!(seq.sample_indices(3), vec![0, 2, 4, 6, 8, 9]);
        // More points than samples degenerates to every sample.
        assert_eq!(seq.sample_indices(50), (0..10).collect::<Vec<_>>());
        assert!(StateSequence::new().sample_indices(4).is_empty());
    }

    #[test]
    fn test_sections_in_first_appearance_order() {
        let labels = ["loop", "loop", "roll", "roll", "loop"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let seq = level_line(5)
            .with_channel("brvr", vec![0.0, 1.0, 2.0, 3.0, 4.0])
            .unwrap()
            .with_labels(MANOEUVRE_LABEL, labels)
            .unwrap();

        let sections = seq.sections(MANOEUVRE_LABEL).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].0, "loop");
        assert_eq!(sections[0].1.time(), &[0.0, 0.5, 2.0]);
        assert_eq!(sections[0].1.column("brvr").unwrap(), &[0.0, 1.0, 4.0]);
        assert_eq!(sections[1].0, "roll");
        assert_eq!(sections[1].1.len(), 2);
    }

    #[test]
    fn test_unknown_section_is_an_error() {
        let labels = vec!["loop".to_string(); 3];
        let seq = level_line(3).with_labels(MANOEUVRE_LABEL, labels).unwrap();
        assert_eq!(seq.section(MANOEUVRE_LABEL, "loop").unwrap().len(), 3);
        assert!(matches!(
            seq.section(MANOEUVRE_LABEL, "Loop"),
            Err(FlightPlotError::UnknownSection { name, .. }) if name == "Loop"
        ));
    }

    #[test]
    #[should_panic]
    fn test_push_after_channel_panics() {
        let mut seq = level_line(2).with_channel("brvr", vec![0.0; 2]).unwrap();
        seq.push(1.0, Vector3::zeros(), UnitQuaternion::identity());
    }
}
