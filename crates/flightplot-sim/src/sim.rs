use flightplot_core::state::{
    StateSequence, AOA_COLUMNS, BODY_RATE_COLUMNS, ELEMENT_LABEL, MANOEUVRE_LABEL,
};
use flightplot_core::{FlightPlotError, Result};
use nalgebra::{Unit, UnitQuaternion, Vector3};

/// World-frame wind channels emitted alongside the state.
pub const WIND_COLUMNS: [&str; 3] = ["wind_x", "wind_y", "wind_z"];

// ---------------------------------------------------------------------------
// Flight plan
// ---------------------------------------------------------------------------

/// One element of a manoeuvre, flown at constant airspeed.
///
/// Frames: world x/y horizontal with z up; body x forward, y left, z up.
/// Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Straight line, attitude held.
    Line { duration: f64 },
    /// Pitch through `angle` on a circle of `radius`; positive pulls up.
    Loop { radius: f64, angle: f64 },
    /// Axial roll through `angle`; positive rolls right.
    Roll { duration: f64, angle: f64 },
    /// Flat turn through `angle` on a circle of `radius`; positive turns left.
    Turn { radius: f64, angle: f64 },
}

impl Segment {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Loop { .. } => "loop",
            Self::Roll { .. } => "roll",
            Self::Turn { .. } => "turn",
        }
    }

    pub fn duration(&self, speed: f64) -> f64 {
        match *self {
            Self::Line { duration } | Self::Roll { duration, .. } => duration,
            Self::Loop { radius, angle } | Self::Turn { radius, angle } => {
                radius * angle.to_radians().abs() / speed
            }
        }
    }

    /// Total body-axis rotation over the segment, in radians.
    fn rotation(&self) -> Vector3<f64> {
        match *self {
            Self::Line { .. } => Vector3::zeros(),
            // Positive rotation about body y drops the nose, so a pull is negative.
            Self::Loop { angle, .. } => Vector3::new(0.0, -angle.to_radians(), 0.0),
            // Positive rotation about body x lifts the left wing.
            Self::Roll { angle, .. } => Vector3::new(angle.to_radians(), 0.0, 0.0),
            Self::Turn { angle, .. } => Vector3::new(0.0, 0.0, angle.to_radians()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manoeuvre {
    pub name: String,
    pub elements: Vec<Segment>,
}

impl Manoeuvre {
    pub fn new(name: &str, elements: Vec<Segment>) -> Self {
        Self {
            name: name.to_string(),
            elements,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightPlan {
    pub speed: f64,              // m/s (airspeed)
    pub dt: f64,                 // s
    pub start_pos: Vector3<f64>, // m (world)
    pub start_heading: f64,      // ° (about world z, 0 = along +x)
    pub wind: Vector3<f64>,      // m/s (world)
    pub manoeuvres: Vec<Manoeuvre>,
}

impl Default for FlightPlan {
    fn default() -> Self {
        Self {
            speed: 30.0,
            dt: 0.05,
            start_pos: Vector3::new(-200.0, 170.0, 150.0),
            start_heading: 0.0,
            wind: Vector3::new(0.0, 3.0, 0.0),
            manoeuvres: vec![
                Manoeuvre::new("entry", vec![Segment::Line { duration: 3.0 }]),
                Manoeuvre::new(
                    "loop",
                    vec![Segment::Loop {
                        radius: 60.0,
                        angle: 360.0,
                    }],
                ),
                Manoeuvre::new(
                    "roll",
                    vec![
                        Segment::Line { duration: 1.0 },
                        Segment::Roll {
                            duration: 2.0,
                            angle: 360.0,
                        },
                        Segment::Line { duration: 1.0 },
                    ],
                ),
                Manoeuvre::new(
                    "turnaround",
                    vec![Segment::Turn {
                        radius: 50.0,
                        angle: 180.0,
                    }],
                ),
                Manoeuvre::new("exit", vec![Segment::Line { duration: 2.0 }]),
            ],
        }
    }
}

impl FlightPlan {
    /// Checks that every segment spans a positive time at a positive speed.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("speed", self.speed), ("dt", self.dt)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(FlightPlotError::InvalidPlan(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        for man in &self.manoeuvres {
            for (k, seg) in man.elements.iter().enumerate() {
                let (what, size, angle) = match *seg {
                    Segment::Line { duration } => ("duration", duration, 0.0),
                    Segment::Roll { duration, angle } => ("duration", duration, angle),
                    Segment::Loop { radius, angle } | Segment::Turn { radius, angle } => {
                        ("radius", radius, angle)
                    }
                };
                if !(size > 0.0 && size.is_finite()) || !angle.is_finite() {
                    return Err(FlightPlotError::InvalidPlan(format!(
                        "{}{k} of '{}' needs a positive {what} and a finite angle, got {size} and {angle}",
                        seg.label(),
                        man.name
                    )));
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Flies the plan and records one sample per time step.
///
/// The track is flown relative to the ground with the nose along the track,
/// so any wind shows up in the recorded angle of attack and sideslip.
///
/// Every segment is flown in at least one step, so its full rotation is
/// always applied. Fails with [`FlightPlotError::InvalidPlan`] when
/// [`FlightPlan::validate`] rejects the plan.
pub fn simulate_plan(plan: &FlightPlan) -> Result<StateSequence> {
    plan.validate()?;

    let mut seq = StateSequence::new();
    let mut rates: Vec<Vector3<f64>> = Vec::new();
    let mut man_labels = Vec::new();
    let mut elm_labels = Vec::new();

    let mut t = 0.0;
    let mut pos = plan.start_pos;
    let mut att = UnitQuaternion::from_euler_angles(0.0, 0.0, plan.start_heading.to_radians());
    let v_body = Vector3::new(plan.speed, 0.0, 0.0);

    for man in &plan.manoeuvres {
        for (k, seg) in man.elements.iter().enumerate() {
            let duration = seg.duration(plan.speed);
            let steps = ((duration / plan.dt).round() as usize).max(1);
            let seg_dt = duration / steps as f64;
            let ang_vel_b = seg.rotation() / duration;
            let element = format!("{}{}", seg.label(), k);

            for _ in 0..steps {
                // Record
                seq.push(t, pos, att);
                rates.push(ang_vel_b);
                man_labels.push(man.name.clone());
                elm_labels.push(element.clone());

                // Position follows the attitude at mid-step
                let half = rotate(&ang_vel_b, seg_dt * 0.5);
                pos += (att * half).transform_vector(&v_body) * seg_dt;

                att *= rotate(&ang_vel_b, seg_dt); // Local update
                t += seg_dt;
            }
        }
    }

    // Final sample closes the last element
    if let (Some(man), Some(elm)) = (man_labels.last().cloned(), elm_labels.last().cloned()) {
        seq.push(t, pos, att);
        rates.push(Vector3::zeros());
        man_labels.push(man);
        elm_labels.push(elm);
    }

    let (alpha, beta) = aero_angles(&seq, plan);
    let n = seq.len();

    tracing::debug!(samples = n, duration = t, "simulated flight plan");

    seq.with_channel(BODY_RATE_COLUMNS[0], rates.iter().map(|w| w.x).collect())?
        .with_channel(BODY_RATE_COLUMNS[1], rates.iter().map(|w| w.y).collect())?
        .with_channel(BODY_RATE_COLUMNS[2], rates.iter().map(|w| w.z).collect())?
        .with_channel(AOA_COLUMNS[0], alpha)?
        .with_channel(AOA_COLUMNS[1], beta)?
        .with_channel(WIND_COLUMNS[0], vec![plan.wind.x; n])?
        .with_channel(WIND_COLUMNS[1], vec![plan.wind.y; n])?
        .with_channel(WIND_COLUMNS[2], vec![plan.wind.z; n])?
        .with_labels(MANOEUVRE_LABEL, man_labels)?
        .with_labels(ELEMENT_LABEL, elm_labels)
}

fn rotate(ang_vel_b: &Vector3<f64>, dt: f64) -> UnitQuaternion<f64> {
    let angle = ang_vel_b.norm() * dt;
    if angle > 1e-12 {
        UnitQuaternion::from_axis_angle(&Unit::new_normalize(*ang_vel_b), angle)
    } else {
        UnitQuaternion::identity()
    }
}

// Angle of attack and sideslip from the air-relative velocity in body axes.
// With z up, air flowing up onto the wing (w < 0) is positive alpha; air from
// the right (v < 0) is positive beta.
fn aero_angles(seq: &StateSequence, plan: &FlightPlan) -> (Vec<f64>, Vec<f64>) {
    let v_body = Vector3::new(plan.speed, 0.0, 0.0);
    seq.att()
        .iter()
        .map(|q| {
            let v_air_w = q.transform_vector(&v_body) - plan.wind;
            let v_rel_b = q.inverse_transform_vector(&v_air_w);
            let v_mag = v_rel_b.norm();
            if v_mag < 1e-9 {
                return (0.0, 0.0);
            }
            (
                (-v_rel_b.z).atan2(v_rel_b.x),
                (-v_rel_b.y / v_mag).clamp(-1.0, 1.0).asin(),
            )
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn still_air(manoeuvres: Vec<Manoeuvre>) -> FlightPlan {
        FlightPlan {
            start_pos: Vector3::zeros(),
            wind: Vector3::zeros(),
            manoeuvres,
            ..FlightPlan::default()
        }
    }

    #[test]
    fn test_straight_line() {
        let plan = still_air(vec![Manoeuvre::new(
            "line",
            vec![Segment::Line { duration: 2.0 }],
        )]);
        let seq = simulate_plan(&plan).unwrap();
        assert_eq!(seq.len(), 41);
        let last = seq.pos().last().unwrap();
        assert!((last - Vector3::new(60.0, 0.0, 0.0)).norm() < 1e-9);
        assert!(seq.column("alpha").unwrap().iter().all(|a| a.abs() < 1e-12));
    }

    #[test]
    fn test_loop_closes() {
        let plan = still_air(vec![Manoeuvre::new(
            "loop",
            vec![Segment::Loop {
                radius: 60.0,
                angle: 360.0,
            }],
        )]);
        let seq = simulate_plan(&plan).unwrap();
        let last = seq.pos().last().unwrap();
        assert!(last.norm() < 0.5, "loop ended {:.3} m from entry", last.norm());
        // Highest point is one diameter above the entry.
        let top = seq.pos().iter().map(|p| p.z).fold(f64::NEG_INFINITY, f64::max);
        assert!((top - 120.0).abs() < 0.5, "top of loop at {top:.2} m");
        assert!(seq.att().last().unwrap().angle() < 1e-4);
        // Pitch rate of V / R throughout.
        assert!((seq.column("brvp").unwrap()[10] + 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_roll_keeps_track() {
        let plan = still_air(vec![Manoeuvre::new(
            "roll",
            vec![Segment::Roll {
                duration: 2.0,
                angle: 180.0,
            }],
        )]);
        let seq = simulate_plan(&plan).unwrap();
        let last = seq.pos().last().unwrap();
        assert!((last - Vector3::new(60.0, 0.0, 0.0)).norm() < 1e-9);
        // Inverted: the left wing now points to world -y.
        let left = seq.body_to_world(&Vector3::y());
        let tip = left.last().unwrap() - last;
        assert!((tip + Vector3::y()).norm() < 1e-9);
    }

    #[test]
    fn test_labels_and_channels() {
        let seq = simulate_plan(&FlightPlan::default()).unwrap();
        let names: Vec<_> = seq
            .sections(MANOEUVRE_LABEL)
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["entry", "loop", "roll", "turnaround", "exit"]);
        let roll = seq.section(MANOEUVRE_LABEL, "roll").unwrap();
        let elements: Vec<_> = roll
            .sections(ELEMENT_LABEL)
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(elements, vec!["line0", "roll1", "line2"]);
        for col in BODY_RATE_COLUMNS.iter().chain(&AOA_COLUMNS).chain(&WIND_COLUMNS) {
            assert_eq!(seq.column(col).unwrap().len(), seq.len());
        }
    }

    #[test]
    fn test_short_segment_applies_full_rotation() {
        // Shorter than one time step: flown in a single step.
        let plan = still_air(vec![Manoeuvre::new(
            "pull",
            vec![Segment::Loop {
                radius: 0.5,
                angle: 90.0,
            }],
        )]);
        let seq = simulate_plan(&plan).unwrap();
        assert_eq!(seq.len(), 2);
        assert!(seq.time()[1] > seq.time()[0]);
        assert!((seq.att()[1].angle() - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_segments_rejected() {
        for seg in [
            Segment::Loop {
                radius: 0.0,
                angle: 90.0,
            },
            Segment::Turn {
                radius: -5.0,
                angle: 90.0,
            },
            Segment::Roll {
                duration: 0.0,
                angle: 360.0,
            },
            Segment::Line { duration: f64::NAN },
            Segment::Roll {
                duration: 1.0,
                angle: f64::INFINITY,
            },
        ] {
            let plan = still_air(vec![Manoeuvre::new("bad", vec![seg])]);
            assert!(
                matches!(simulate_plan(&plan), Err(FlightPlotError::InvalidPlan(_))),
                "{seg:?} was accepted"
            );
        }
    }

    #[test]
    fn test_time_step_and_speed_validated() {
        for (speed, dt) in [(30.0, 0.0), (30.0, -0.1), (0.0, 0.05), (f64::NAN, 0.05)] {
            let plan = FlightPlan {
                speed,
                dt,
                ..FlightPlan::default()
            };
            let err = simulate_plan(&plan).unwrap_err();
            assert!(matches!(err, FlightPlotError::InvalidPlan(_)), "{err}");
        }
        assert!(FlightPlan::default().validate().is_ok());
    }

    #[test]
    fn test_crosswind_gives_sideslip() {
        let plan = FlightPlan {
            wind: Vector3::new(0.0, 3.0, 0.0),
            manoeuvres: vec![Manoeuvre::new("line", vec![Segment::Line { duration: 1.0 }])],
            ..FlightPlan::default()
        };
        let seq = simulate_plan(&plan).unwrap();
        // Wind from the right of a +x track blows towards +y (left), so the
        // air-relative velocity has a rightward component.
        let beta = seq.column("beta").unwrap()[0];
        assert!((beta - (3.0f64 / 30.0f64.hypot(3.0)).asin()).abs() < 1e-9);
        assert!(seq.column("alpha").unwrap()[0].abs() < 1e-12);
    }
}
