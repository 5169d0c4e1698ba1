//! Vehicle mesh templates.
//!
//! Templates are read from Wavefront OBJ text. Only geometry is used: `v`
//! records become vertices and `f` records become faces (polygons are fan
//! triangulated). Texture, normal, group and material records are ignored.

use nalgebra::{Isometry3, Vector3};
use plotly::mesh3d::IntensityMode;

use crate::error::{FlightPlotError, Result};
use crate::trace::{self, Mesh};

/// Low-poly aircraft in body axes (x forward, y left, z up), 1 m wingspan.
const AIRCRAFT_OBJ: &str = "\
# fuselage
v 0.45 0.0 0.0
v -0.55 0.04 0.0
v -0.55 -0.04 0.0
v -0.55 0.0 0.05
# wing
v 0.08 0.5 0.0
v 0.08 -0.5 0.0
v -0.12 0.5 0.0
v -0.12 -0.5 0.0
# tailplane
v -0.42 0.18 0.0
v -0.42 -0.18 0.0
v -0.55 0.18 0.0
v -0.55 -0.18 0.0
# fin
v -0.40 0.0 0.0
v -0.55 0.0 0.18
f 1 2 4
f 1 4 3
f 1 3 2
f 5 6 8 7
f 9 10 12 11
f 13 4 14
";

#[derive(Debug, Clone, PartialEq)]
pub struct MeshModel {
    pub vertices: Vec<Vector3<f64>>,
    pub faces: Vec<[usize; 3]>,
}

impl MeshModel {
    /// Built-in aircraft template scaled to the given wingspan.
    pub fn aircraft(span: f64) -> Self {
        let unit = Self::from_obj(AIRCRAFT_OBJ).expect("built-in aircraft template is valid OBJ");
        unit.scaled(span)
    }

    /// Parses Wavefront OBJ text.
    pub fn from_obj(text: &str) -> Result<Self> {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for (lineno, raw) in text.lines().enumerate() {
            let line = lineno + 1;
            let mut tokens = raw.split_whitespace();
            match tokens.next() {
                Some("v") => {
                    let coords = tokens
                        .take(3)
                        .map(|t| t.parse::<f64>())
                        .collect::<std::result::Result<Vec<_>, _>>()
                        .map_err(|e| obj_error(line, format!("bad vertex coordinate: {e}")))?;
                    if coords.len() != 3 {
                        return Err(obj_error(line, "vertex needs three coordinates"));
                    }
                    vertices.push(Vector3::new(coords[0], coords[1], coords[2]));
                }
                Some("f") => {
                    let polygon = tokens
                        .map(|t| resolve_index(t, vertices.len(), line))
                        .collect::<Result<Vec<_>>>()?;
                    if polygon.len() < 3 {
                        return Err(obj_error(line, "face needs at least three vertices"));
                    }
                    for w in 1..polygon.len() - 1 {
                        faces.push([polygon[0], polygon[w], polygon[w + 1]]);
                    }
                }
                _ => {}
            }
        }

        Ok(Self { vertices, faces })
    }

    pub fn scaled(mut self, factor: f64) -> Self {
        for v in &mut self.vertices {
            *v *= factor;
        }
        self
    }

    /// Copy of the template placed by a body→world transform.
    pub fn transform(&self, iso: &Isometry3<f64>) -> Self {
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|v| iso.transform_point(&(*v).into()).coords)
                .collect(),
            faces: self.faces.clone(),
        }
    }

    /// Flat-shaded mesh trace in a single colour.
    pub fn to_mesh3d(&self, colour: &str, name: &str) -> Mesh {
        trace::mesh(&self.vertices, &self.faces)
            .name(name)
            .face_color(vec![colour.to_string(); self.faces.len()])
            .intensity_mode(IntensityMode::Cell)
    }
}

// OBJ indices are 1-based; negative values count back from the latest vertex.
fn resolve_index(token: &str, nvertices: usize, line: usize) -> Result<usize> {
    let head = token.split('/').next().unwrap_or_default();
    let idx: i64 = head
        .parse()
        .map_err(|e| obj_error(line, format!("bad face index '{token}': {e}")))?;
    let resolved = match idx {
        i if i > 0 => i - 1,
        i if i < 0 => nvertices as i64 + i,
        _ => return Err(obj_error(line, "face index 0 is not valid")),
    };
    if resolved < 0 || resolved as usize >= nvertices {
        return Err(obj_error(
            line,
            format!("face index {idx} outside {nvertices} vertices"),
        ));
    }
    Ok(resolved as usize)
}

fn obj_error(line: usize, message: impl Into<String>) -> FlightPlotError {
    FlightPlotError::Obj {
        line,
        message: message.into(),
    }
}
