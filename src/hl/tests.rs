//! Tests for the one-call exporters.

use std::path::Path;

use glam::DVec2;

use super::*;
use crate::util::{CellType, Error, Result};
use crate::vtk::{DataArray, Payload};

const MARKER: &[u8] = b"<AppendedData encoding=\"raw\">\n_";

/// Header text and appended section (without the closing tags) of a file.
fn read_output(path: &Path) -> (String, Vec<u8>) {
    let bytes = std::fs::read(path).unwrap();
    let marker = bytes.windows(MARKER.len()).position(|w| w == MARKER).unwrap();
    let header = String::from_utf8(bytes[..marker].to_vec()).unwrap();
    let tail = b"\n</AppendedData>\n</VTKFile>";
    assert!(bytes.ends_with(tail));
    let data = bytes[marker + MARKER.len()..bytes.len() - tail.len()].to_vec();
    (header, data)
}

fn block_len(data: &[u8], offset: usize) -> u64 {
    u64::from_ne_bytes(data[offset..offset + 8].try_into().unwrap())
}

fn data_array(name: &str, ty: &str, ncomp: usize, offset: u64) -> String {
    format!(
        "<DataArray Name=\"{name}\" NumberOfComponents=\"{ncomp}\" type=\"{ty}\" format=\"appended\" offset=\"{offset}\"/>"
    )
}

#[test]
fn test_rectilinear_export() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let x = [0.0f64, 1.0, 2.0];
    let y = [0.0f64, 1.0];
    let z = [0.0f64, 1.0];
    let temp: Vec<f64> = (0..12).map(f64::from).collect();
    let pressure = [1.0f32, 2.0];
    let fields = Fields::new()
        .point("temp", Payload::scalar(&temp))
        .cell("pressure", Payload::scalar(&pressure));

    let path = rectilinear_to_vtk(dir.path().join("rect"), &x, &y, &z, &fields)?;
    assert!(path.ends_with("rect.vtr"));

    let (header, data) = read_output(&path);
    assert!(header.contains("<RectilinearGrid WholeExtent=\"0 2 0 1 0 1\">"));
    assert!(header.contains("<Piece Extent=\"0 2 0 1 0 1\">"));
    assert!(header.contains(&data_array("x_coordinates", "Float64", 1, 0)));
    assert!(header.contains(&data_array("y_coordinates", "Float64", 1, 32)));
    assert!(header.contains(&data_array("z_coordinates", "Float64", 1, 56)));
    assert!(header.contains("<PointData Scalars=\"temp\">"));
    assert!(header.contains(&data_array("temp", "Float64", 1, 80)));
    assert!(header.contains("<CellData Scalars=\"pressure\">"));
    assert!(header.contains(&data_array("pressure", "Float32", 1, 184)));
    assert_eq!(data.len(), 184 + 8 + 8);
    assert_eq!(block_len(&data, 184), 8);
    Ok(())
}

#[test]
fn test_image_from_cell_data() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let values: Vec<f64> = (0..24).map(f64::from).collect();
    let cells = DataArray::grid(&values, [2, 3, 4])?;
    let fields = Fields::new().cell("values", Payload::Scalar(cells));

    let path = image_to_vtk(dir.path().join("image"), [0.0; 3], [1.0, 0.5, 0.25], &fields)?;
    let (header, data) = read_output(&path);
    assert!(header.contains(
        "<ImageData WholeExtent=\"0 2 0 3 0 4\" Origin=\"0.0 0.0 0.0\" Spacing=\"1.0 0.5 0.25\">"
    ));
    assert_eq!(block_len(&data, 0), 24 * 8);
    Ok(())
}

#[test]
fn test_image_from_point_data() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let values = vec![0u8; 3 * 4 * 5];
    let nodes = DataArray::grid_c(&values, [3, 4, 5])?;
    let fields = Fields::new().point("mask", Payload::Scalar(nodes));

    let path = image_to_vtk(dir.path().join("mask"), [1.0, 2.0, 3.0], [1.0; 3], &fields)?;
    let (header, _) = read_output(&path);
    assert!(header.contains("WholeExtent=\"0 2 0 3 0 4\" Origin=\"1.0 2.0 3.0\""));
    assert!(header.contains("type=\"UInt8\""));
    Ok(())
}

#[test]
fn test_image_needs_data() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        image_to_vtk(dir.path().join("empty"), [0.0; 3], [1.0; 3], &Fields::new()),
        Err(Error::MissingGeometry { grid: "ImageData", .. })
    ));
}

#[test]
fn test_wrong_field_length_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let x = [0.0f64, 1.0];
    let cells = [1.0f64, 2.0];
    let fields = Fields::new().cell("bad", Payload::scalar(&cells));
    let err = rectilinear_to_vtk(dir.path().join("bad"), &x, &x, &x, &fields).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(_)));
    assert!(!dir.path().join("bad.vtr").exists());
}

#[test]
fn test_structured_export() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut z = Vec::new();
    for k in 0..2 {
        for j in 0..2 {
            for i in 0..3 {
                x.push(i as f64);
                y.push(j as f64 + 0.1 * i as f64);
                z.push(k as f64);
            }
        }
    }
    let shape = [3, 2, 2];
    let path = structured_to_vtk(
        dir.path().join("structured"),
        DataArray::grid(&x, shape)?,
        DataArray::grid(&y, shape)?,
        DataArray::grid(&z, shape)?,
        &Fields::new(),
    )?;

    let (header, data) = read_output(&path);
    assert!(header.contains("<StructuredGrid WholeExtent=\"0 2 0 1 0 1\">"));
    assert!(header.contains(&format!("<Points>\n{}\n</Points>", data_array("points", "Float64", 3, 0))));
    assert_eq!(block_len(&data, 0), 12 * 3 * 8);
    // Second node: x = 1, y = 0.1, z = 0.
    let second: Vec<f64> = data[8 + 24..8 + 48]
        .chunks_exact(8)
        .map(|b| f64::from_ne_bytes(b.try_into().unwrap()))
        .collect();
    assert_eq!(second, vec![1.0, 0.1, 0.0]);
    Ok(())
}

#[test]
fn test_structured_shape_checks() {
    let dir = tempfile::tempdir().unwrap();
    let a = vec![0.0f64; 8];
    let b = vec![0.0f64; 8];
    let err = structured_to_vtk(
        dir.path().join("s"),
        DataArray::grid(&a, [2, 2, 2]).unwrap(),
        DataArray::grid(&b, [4, 2, 1]).unwrap(),
        DataArray::grid(&a, [2, 2, 2]).unwrap(),
        &Fields::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(_)));

    let err = structured_to_vtk(
        dir.path().join("s"),
        DataArray::new(&a),
        DataArray::new(&a),
        DataArray::new(&a),
        &Fields::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidShape(_)));
}

#[test]
fn test_points_export() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let x = [0.0f64, 1.0, 2.0];
    let y = [0.0f64, 0.5, 1.0];
    let z = [0.0f64, 0.0, 0.0];
    let elev = [10.0f64, 20.0, 30.0];
    let fields = Fields::new().point("elev", Payload::scalar(&elev));

    let path = points_to_vtk(dir.path().join("points"), &x, &y, &z, &fields)?;
    assert!(path.ends_with("points.vtu"));
    let (header, data) = read_output(&path);
    assert!(header.contains("<Piece NumberOfPoints=\"3\" NumberOfCells=\"3\">"));
    assert!(header.contains(&data_array("points", "Float64", 3, 0)));
    assert!(header.contains(&data_array("connectivity", "Int64", 1, 80)));
    assert!(header.contains(&data_array("offsets", "Int64", 1, 112)));
    assert!(header.contains(&data_array("types", "UInt8", 1, 144)));
    assert!(header.contains(&data_array("elev", "Float64", 1, 155)));

    assert_eq!(block_len(&data, 112), 24);
    let offsets: Vec<i64> = data[120..144]
        .chunks_exact(8)
        .map(|b| i64::from_ne_bytes(b.try_into().unwrap()))
        .collect();
    assert_eq!(offsets, vec![1, 2, 3]);
    assert_eq!(block_len(&data, 144), 3);
    assert_eq!(&data[152..155], &[CellType::Vertex.id(); 3]);
    Ok(())
}

#[test]
fn test_lines_export() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let x = [0.0f64, 1.0, 0.0, 1.0];
    let y = [0.0f64, 0.0, 1.0, 1.0];
    let z = [0.0f64; 4];
    let length = [1.0f64, 1.0];
    let fields = Fields::new().cell("length", Payload::scalar(&length));

    let path = lines_to_vtk(dir.path().join("lines"), &x, &y, &z, &fields)?;
    let (header, data) = read_output(&path);
    assert!(header.contains("<Piece NumberOfPoints=\"4\" NumberOfCells=\"2\">"));
    // points 8 + 96, connectivity 8 + 32, offsets 8 + 16
    assert_eq!(block_len(&data, 168), 2);
    assert_eq!(&data[176..178], &[CellType::Line.id(); 2]);

    let odd = [0.0f64; 3];
    let err = lines_to_vtk(dir.path().join("odd"), &odd, &odd, &odd, &Fields::new()).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(_)));
    Ok(())
}

#[test]
fn test_poly_lines_export() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let x = [0.0f64, 1.0, 0.0, 1.0, 2.0];
    let y = [0.0f64; 5];
    let z = [0.0f64, 0.0, 1.0, 1.0, 1.0];

    let path = poly_lines_to_vtk(dir.path().join("poly"), &x, &y, &z, &[2, 3], &Fields::new())?;
    let (header, data) = read_output(&path);
    assert!(header.contains("<Piece NumberOfPoints=\"5\" NumberOfCells=\"2\">"));
    // points 8 + 120, connectivity 8 + 40
    assert_eq!(block_len(&data, 176), 16);
    let offsets: Vec<i64> = data[184..200]
        .chunks_exact(8)
        .map(|b| i64::from_ne_bytes(b.try_into().unwrap()))
        .collect();
    assert_eq!(offsets, vec![2, 5]);
    assert_eq!(&data[208..], &[CellType::PolyLine.id(); 2]);

    let err = poly_lines_to_vtk(dir.path().join("bad"), &x, &y, &z, &[2, 2], &Fields::new()).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(_)));
    Ok(())
}

#[test]
fn test_unstructured_export() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let x = [0.0f64, 1.0, 1.0, 0.0, 2.0];
    let y = [0.0f64, 0.0, 1.0, 1.0, 0.5];
    let z = [0.0f64; 5];
    let conn = [0i32, 1, 2, 3, 1, 4, 2];
    let offsets = [4i32, 7];
    let types = [CellType::Quad.id(), CellType::Triangle.id()];
    let id = [0i32, 1];
    let velocity = ([1.0f32; 5], [0.0f32; 5], [0.0f32; 5]);
    let fields = Fields::new()
        .cell("id", Payload::scalar(&id))
        .point("velocity", Payload::vector(&velocity.0, &velocity.1, &velocity.2)?);

    let path = unstructured_grid_to_vtk(
        dir.path().join("mesh"),
        &x,
        &y,
        &z,
        &conn,
        &offsets,
        &types,
        &fields,
    )?;
    let (header, _) = read_output(&path);
    assert!(header.contains("<Piece NumberOfPoints=\"5\" NumberOfCells=\"2\">"));
    assert!(header.contains(&data_array("connectivity", "Int32", 1, 128)));
    assert!(header.contains("<PointData Vectors=\"velocity\">"));
    assert!(header.contains(&data_array("velocity", "Float32", 3, 190)));
    assert!(header.contains("<CellData Scalars=\"id\">"));

    let err = unstructured_grid_to_vtk(
        dir.path().join("bad"),
        &x,
        &y,
        &z,
        &conn,
        &[4i32],
        &types,
        &Fields::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(_)));
    Ok(())
}

#[test]
fn test_unstructured_cell_sizes_checked() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let x = [0.0f64, 1.0, 1.0, 0.0];
    let y = [0.0f64, 0.0, 1.0, 1.0];
    let z = [0.0f64; 4];
    let conn = [0i64, 1, 2, 3];
    let write = |name: &str, offsets: DataArray<'_>, types: DataArray<'_>| {
        unstructured_grid_to_vtk(dir.path().join(name), &x, &y, &z, &conn, offsets, types, &Fields::new())
    };

    // Quad spanning three nodes.
    let err = write("quad3", DataArray::from(&[3i64]), DataArray::from(&[CellType::Quad.id()]))
        .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(ref m) if m.contains("Quad")));
    assert!(!dir.path().join("quad3.vtu").exists());

    // Offset past the end of the connectivity.
    let err = write("past_end", DataArray::from(&[5i64]), DataArray::from(&[CellType::Polygon.id()]))
        .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(_)));

    // Floating point offsets.
    let err = write("float", DataArray::from(&[4.0f64]), DataArray::from(&[CellType::Quad.id()]))
        .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(_)));

    // Poly cells and unknown ids only need valid offsets.
    write("polygon", DataArray::from(&[4i64]), DataArray::from(&[CellType::Polygon.id()]))?;
    write("custom", DataArray::from(&[4u32]), DataArray::from(&[42u8]))?;
    Ok(())
}

#[test]
fn test_cylinder_geometry() {
    let c = Cylinder::new(DVec2::ZERO, 0.0, 1.0, 1.0, 2).pillars(4);
    assert_eq!(c.num_points(), 12);
    assert_eq!(c.num_cells(), 8);

    let nodes = c.nodes();
    assert_eq!(nodes.len(), 12);
    assert!((nodes[1].x).abs() < 1e-12 && (nodes[1].y - 1.0).abs() < 1e-12);
    assert_eq!(nodes[4].z, 0.5);
    assert_eq!(nodes[11].z, 1.0);

    let conn = c.connectivity();
    assert_eq!(conn.len(), 32);
    assert_eq!(&conn[..4], &[0, 1, 5, 4]);
    assert_eq!(&conn[12..16], &[3, 0, 4, 7]);
    assert_eq!(&conn[16..20], &[4, 5, 9, 8]);
}

#[test]
fn test_cylinder_export() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let c = Cylinder::new(DVec2::new(1.0, 2.0), 0.0, 3.0, 0.5, 3);
    let level: Vec<f64> = (0..c.num_cells()).map(|i| i as f64).collect();
    let fields = Fields::new().cell("level", Payload::scalar(&level)).comment("cylinder");

    let path = cylinder_to_vtk(dir.path().join("cyl"), &c, &fields)?;
    let (header, data) = read_output(&path);
    assert!(header.contains("\n<!-- cylinder -->"));
    assert!(header.contains("<Piece NumberOfPoints=\"64\" NumberOfCells=\"48\">"));

    // points, connectivity, offsets, then types.
    let types_at = (8 + 64 * 24) + (8 + 48 * 4 * 8) + (8 + 48 * 8);
    assert_eq!(block_len(&data, types_at), 48);
    assert!(data[types_at + 8..types_at + 56].iter().all(|&t| t == CellType::Quad.id()));

    let flat = Cylinder::new(DVec2::ZERO, 0.0, 1.0, 1.0, 1).pillars(2);
    assert!(matches!(
        cylinder_to_vtk(dir.path().join("flat"), &flat, &Fields::new()),
        Err(Error::InvalidShape(_))
    ));
    Ok(())
}
