//! Wingtip ribbon meshes.
//!
//! A ribbon is the surface swept by the line joining the two wingtips. Both
//! tips are tracked in the world frame, the tracks are interleaved into one
//! vertex array (`left[0], right[0], left[1], right[1], ...`) and every pair
//! of consecutive samples is joined by two triangles.

use nalgebra::Vector3;

use crate::state::StateSequence;

/// Per-face colouring of a ribbon.
#[derive(Debug, Clone, PartialEq)]
pub enum FaceColors {
    /// Same colour broadcast to every triangle.
    Uniform(String),
    /// One colour per triangle, in face order.
    PerFace(Vec<String>),
}

impl From<&str> for FaceColors {
    fn from(colour: &str) -> Self {
        Self::Uniform(colour.to_string())
    }
}

/// Triangle-strip mesh following the wingtips.
#[derive(Debug, Clone, PartialEq)]
pub struct RibbonMesh {
    /// `2N` vertices, left and right tips alternating.
    pub vertices: Vec<Vector3<f64>>,
    /// `2N - 2` triangles indexing into `vertices`.
    pub faces: Vec<[usize; 3]>,
    /// One colour per face.
    pub face_colors: Vec<String>,
}

impl RibbonMesh {
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }
}

/// Zips two equal-length slices into `[a0, b0, a1, b1, ...]`.
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn interleave<T: Copy>(a: &[T], b: &[T]) -> Vec<T> {
    assert_eq!(a.len(), b.len(), "interleaved arrays must have equal length");
    a.iter().zip(b).flat_map(|(&x, &y)| [x, y]).collect()
}

/// Triangle connectivity of a strip over `nsamples` interleaved left/right pairs.
///
/// For each pair of consecutive samples `s`, `s + 1` two triangles are emitted:
/// current pair to next left, then current right to next pair.
pub fn strip_faces(nsamples: usize) -> Vec<[usize; 3]> {
    (0..nsamples.saturating_sub(1))
        .flat_map(|s| {
            let (l0, r0, l1, r1) = (2 * s, 2 * s + 1, 2 * s + 2, 2 * s + 3);
            [[l0, r0, l1], [r0, r1, l1]]
        })
        .collect()
}

/// Builds the ribbon swept by two wingtips `span` apart.
///
/// The left tip sits at `+span / 2` and the right tip at `-span / 2` along the
/// body y axis. A span of zero collapses both tracks onto the flight path and
/// yields zero-area triangles. Fewer than two samples yield no triangles.
///
/// # Panics
///
/// Panics if `span` is negative or NaN, or if [`FaceColors::PerFace`] does not
/// hold exactly one colour per triangle.
pub fn build_ribbon(seq: &StateSequence, span: f64, colors: impl Into<FaceColors>) -> RibbonMesh {
    assert!(span >= 0.0, "ribbon span must be non-negative, got {span}");

    let left = seq.body_to_world(&Vector3::new(0.0, span / 2.0, 0.0));
    let right = seq.body_to_world(&Vector3::new(0.0, -span / 2.0, 0.0));

    let vertices = interleave(&left, &right);
    let faces = strip_faces(seq.len());

    let face_colors = match colors.into() {
        FaceColors::Uniform(colour) => vec![colour; faces.len()],
        FaceColors::PerFace(colours) => {
            assert_eq!(
                colours.len(),
                faces.len(),
                "per-face colours must match the number of ribbon triangles"
            );
            colours
        }
    };

    tracing::debug!(
        samples = seq.len(),
        faces = faces.len(),
        span,
        "built ribbon mesh"
    );

    RibbonMesh {
        vertices,
        faces,
        face_colors,
    }
}
