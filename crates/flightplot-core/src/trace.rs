//! Thin helpers between flight geometry and `plotly` traces.

use nalgebra::Vector3;
use plotly::common::{DashType, Line, Title};
use plotly::layout::{AspectMode, Axis, LayoutScene};
use plotly::{Layout, Mesh3D, Scatter, Scatter3D};

pub type Path3d = Box<Scatter3D<f64, f64, f64>>;
pub type Mesh = Box<Mesh3D<f64, f64, f64>>;
pub type Series = Box<Scatter<f64, f64>>;

/// Splits points into x, y and z columns.
pub fn split_xyz(points: &[Vector3<f64>]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    (
        points.iter().map(|p| p.x).collect(),
        points.iter().map(|p| p.y).collect(),
        points.iter().map(|p| p.z).collect(),
    )
}

/// Bare 3D polyline through `points`.
pub fn path(points: &[Vector3<f64>]) -> Path3d {
    let (x, y, z) = split_xyz(points);
    Scatter3D::new(x, y, z)
}

/// Triangle mesh with one `[i, j, k]` vertex triple per face.
pub fn mesh(vertices: &[Vector3<f64>], faces: &[[usize; 3]]) -> Mesh {
    let (x, y, z) = split_xyz(vertices);
    Mesh3D::new(
        x,
        y,
        z,
        faces.iter().map(|f| f[0]).collect(),
        faces.iter().map(|f| f[1]).collect(),
        faces.iter().map(|f| f[2]).collect(),
    )
}

pub fn line(colour: &str, width: Option<f64>, dash: Option<DashType>) -> Line {
    let mut line = Line::new().color(colour.to_string());
    if let Some(width) = width {
        line = line.width(width);
    }
    if let Some(dash) = dash {
        line = line.dash(dash);
    }
    line
}

/// 3D layout with equal axis scaling.
pub fn scene_layout(title: &str) -> Layout {
    Layout::new()
        .title(Title::with_text(title))
        .scene(LayoutScene::new().aspect_mode(AspectMode::Data))
}

/// 2D layout with time along x.
pub fn time_series_layout(title: &str, y_label: &str) -> Layout {
    Layout::new()
        .title(Title::with_text(title))
        .x_axis(Axis::new().title(Title::with_text("Time (s)")))
        .y_axis(Axis::new().title(Title::with_text(y_label)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_mesh_index_columns() {
        let verts = [Vector3::zeros(), Vector3::x(), Vector3::y(), Vector3::z()];
        let v: Value = serde_json::to_value(&*mesh(&verts, &[[0, 1, 2], [1, 3, 2]])).unwrap();
        assert_eq!(v["type"], "mesh3d");
        assert_eq!(v["i"], json!([0, 1]));
        assert_eq!(v["j"], json!([1, 3]));
        assert_eq!(v["k"], json!([2, 2]));
        assert_eq!(v["x"], json!([0.0, 1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_path_columns() {
        let v: Value =
            serde_json::to_value(&*path(&[Vector3::zeros(), Vector3::new(1.0, 2.0, 3.0)]))
                .unwrap();
        assert_eq!(v["type"], "scatter3d");
        assert_eq!(v["x"], json!([0.0, 1.0]));
        assert_eq!(v["z"], json!([0.0, 3.0]));
    }

    #[test]
    fn test_layouts() {
        let v: Value = serde_json::to_value(scene_layout("Flight")).unwrap();
        assert_eq!(v["scene"]["aspectmode"], "data");

        let v: Value = serde_json::to_value(time_series_layout("Rates", "deg/s")).unwrap();
        assert_eq!(v["yaxis"]["title"]["text"], "deg/s");
        assert!(v.get("scene").is_none());
    }
}
