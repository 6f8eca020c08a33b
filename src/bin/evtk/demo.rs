//! Example datasets, one per exporter plus a hand-driven low-level file.
//!
//! Values are deterministic so repeated runs produce identical files.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use glam::DVec2;

use evtk::hl::{self, Cylinder, Fields};
use evtk::prelude::*;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DemoKind {
    /// Uniform image with cell and point data (.vti)
    Image,
    /// Rectilinear grid (.vtr)
    Rectilinear,
    /// Jittered structured grid (.vts)
    Structured,
    /// Point cloud (.vtu)
    Points,
    /// Two line segments (.vtu)
    Lines,
    /// Two poly lines (.vtu)
    Polylines,
    /// Triangles and a quad (.vtu)
    Unstructured,
    /// Cylinder surface (.vtu)
    Cylinder,
    /// Rectilinear grid written call by call (.vtr)
    Lowlevel,
}

/// Pseudo-random value in `[0, 1)`.
fn noise(i: usize) -> f64 {
    ((i as f64 * 12.9898).sin() * 43_758.545_3).fract().abs()
}

fn noise_vec(n: usize, seed: usize) -> Vec<f64> {
    (0..n).map(|i| noise(i + seed * 7919)).collect()
}

/// `n + 1` evenly spaced nodes on `[0, length]`.
fn axis(n: usize, length: f64) -> Vec<f64> {
    (0..=n).map(|i| length * i as f64 / n as f64).collect()
}

const DIMS: [usize; 3] = [6, 6, 2];

fn cells() -> usize {
    DIMS[0] * DIMS[1] * DIMS[2]
}

fn nodes() -> [usize; 3] {
    [DIMS[0] + 1, DIMS[1] + 1, DIMS[2] + 1]
}

fn comments(fields: Fields<'_>) -> Fields<'_> {
    fields.comment("comment 1").comment("comment 2")
}

pub fn run(kind: DemoKind, output: &Path) -> Result<PathBuf> {
    match kind {
        DemoKind::Image => image(output),
        DemoKind::Rectilinear => rectilinear(output),
        DemoKind::Structured => structured(output),
        DemoKind::Points => points(output),
        DemoKind::Lines => lines(output),
        DemoKind::Polylines => poly_lines(output),
        DemoKind::Unstructured => unstructured(output),
        DemoKind::Cylinder => cylinder(output),
        DemoKind::Lowlevel => low_level(output),
    }
}

fn image(output: &Path) -> Result<PathBuf> {
    let pressure = noise_vec(cells(), 1);
    let temp = noise_vec(nodes().iter().product(), 2);
    let fields = comments(Fields::new())
        .cell("pressure", Payload::Scalar(DataArray::grid_c(&pressure, DIMS)?))
        .point("temp", Payload::Scalar(DataArray::grid_c(&temp, nodes())?));
    hl::image_to_vtk(output, [0.0; 3], [1.0; 3], &fields)
}

fn rectilinear(output: &Path) -> Result<PathBuf> {
    let (x, y, z) = (axis(DIMS[0], 1.0), axis(DIMS[1], 1.0), axis(DIMS[2], 1.0));
    let pressure = noise_vec(cells(), 1);
    let temp = noise_vec(nodes().iter().product(), 2);
    let fields = comments(Fields::new())
        .cell("pressure", Payload::Scalar(DataArray::grid_c(&pressure, DIMS)?))
        .point("temp", Payload::Scalar(DataArray::grid_c(&temp, nodes())?));
    hl::rectilinear_to_vtk(output, &x, &y, &z, &fields)
}

fn structured(output: &Path) -> Result<PathBuf> {
    let [nx, ny, nz] = nodes();
    let (ax, ay, az) = (axis(DIMS[0], 1.0), axis(DIMS[1], 1.0), axis(DIMS[2], 1.0));
    let (dx, dy, dz) = (ax[1], ay[1], az[1]);

    let n = nx * ny * nz;
    let (mut x, mut y, mut z) = (Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n));
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let id = i + nx * (j + ny * k);
                x.push(ax[i] + (0.5 - noise(3 * id)) * 0.1 * dx);
                y.push(ay[j] + (0.5 - noise(3 * id + 1)) * 0.1 * dy);
                z.push(az[k] + (0.5 - noise(3 * id + 2)) * 0.1 * dz);
            }
        }
    }

    let pressure = noise_vec(cells(), 1);
    let temp = noise_vec(n, 2);
    let fields = comments(Fields::new())
        .cell("pressure", Payload::Scalar(DataArray::grid(&pressure, DIMS)?))
        .point("temp", Payload::Scalar(DataArray::grid(&temp, nodes())?));
    hl::structured_to_vtk(
        output,
        DataArray::grid(&x, nodes())?,
        DataArray::grid(&y, nodes())?,
        DataArray::grid(&z, nodes())?,
        &fields,
    )
}

fn points(output: &Path) -> Result<PathBuf> {
    let n = 100;
    let (x, y, z) = (noise_vec(n, 1), noise_vec(n, 2), noise_vec(n, 3));
    let temp = noise_vec(n, 4);
    let pressure = noise_vec(n, 5);
    // Keys are written in sorted order.
    let fields = comments(Fields::new())
        .point("1_temp", Payload::scalar(&temp))
        .point("2_pressure", Payload::scalar(&pressure));
    hl::points_to_vtk(output, &x, &y, &z, &fields)
}

fn lines(output: &Path) -> Result<PathBuf> {
    let x = [0.0f64, 1.0, 0.0, -1.0];
    let y = [0.0f64, 1.0, 0.0, 1.0];
    let z = [0.0f64, 1.0, 0.0, 1.0];
    let pressure = noise_vec(4, 1);
    let temp = noise_vec(4, 2);
    let vel = [1.0f64, 5.0];
    let fields = comments(Fields::new())
        .cell("vel", Payload::scalar(&vel))
        .point("temp", Payload::scalar(&temp))
        .point("pressure", Payload::scalar(&pressure));
    hl::lines_to_vtk(output, &x, &y, &z, &fields)
}

fn poly_lines(output: &Path) -> Result<PathBuf> {
    let x = [0.0f64, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0];
    let y = [0.0f64, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0];
    let z = [0.0f64, 0.0, 0.0, 0.0, 3.0, 3.0, 3.0];
    let pressure = noise_vec(7, 1);
    let temp = noise_vec(7, 2);
    let vel = [1.0f64, 5.0];
    let fields = Fields::new()
        .cell("vel", Payload::scalar(&vel))
        .point("temp", Payload::scalar(&temp))
        .point("pressure", Payload::scalar(&pressure));
    hl::poly_lines_to_vtk(output, &x, &y, &z, &[4, 3], &fields)
}

fn unstructured(output: &Path) -> Result<PathBuf> {
    let x = [0.0f64, 1.0, 2.0, 0.0, 1.0, 2.0];
    let y = [0.0f64, 0.0, 0.0, 1.0, 1.0, 1.0];
    let z = [0.0f64; 6];
    let conn = [0i64, 1, 3, 1, 4, 3, 1, 2, 5, 4];
    let offsets = [3i64, 6, 10];
    let types = [CellType::Triangle.id(), CellType::Triangle.id(), CellType::Quad.id()];
    let pressure = noise_vec(3, 1);
    let ec = noise_vec(6, 2);
    let fields = comments(Fields::new())
        .cell("pressure", Payload::scalar(&pressure))
        .point("ec", Payload::scalar(&ec));
    hl::unstructured_grid_to_vtk(output, &x, &y, &z, &conn, &offsets, &types, &fields)
}

fn cylinder(output: &Path) -> Result<PathBuf> {
    let cylinder = Cylinder::new(DVec2::ZERO, 0.0, 1.0, 0.5, 8).pillars(16);
    let layer: Vec<i32> = (0..cylinder.num_cells()).map(|c| (c / cylinder.pillars) as i32).collect();
    let height: Vec<f64> = cylinder.nodes().iter().map(|p| p.z).collect();
    let fields = Fields::new()
        .cell("layer", Payload::scalar(&layer))
        .point("height", Payload::scalar(&height));
    hl::cylinder_to_vtk(output, &cylinder, &fields)
}

/// Rectilinear grid driven through the writer directly, data sections first.
fn low_level(output: &Path) -> Result<PathBuf> {
    let (x, y, z) = (axis(DIMS[0], 1.0), axis(DIMS[1], 1.0), axis(DIMS[2], 1.0));
    let npoints: usize = nodes().iter().product();
    let temp = noise_vec(npoints, 1);
    let zeros = vec![0.0f64; npoints];
    let velocity = Payload::vector(
        DataArray::grid(&zeros, nodes())?,
        DataArray::grid(&zeros, nodes())?,
        DataArray::grid(&zeros, nodes())?,
    )?;
    let ones = vec![1.0f64; cells()];
    let pressure = Payload::Scalar(DataArray::grid(&ones, DIMS)?);

    let extent = Extent::from_cells(DIMS);
    let options = WriterOptions::new().generator_comment(true);
    let mut w = VtkFile::create_with_options(output, GridType::RectilinearGrid, options)?;
    w.open_grid(&GridGeometry::extent(extent))?;
    w.open_piece(PieceShape::Extent(extent))?;

    w.open_data(NodeType::Point, &DataDefaults::new().scalars("Temperature").vectors("Velocity"))?;
    w.add_data("Temperature", &Payload::scalar(&temp))?;
    w.add_data("Velocity", &velocity)?;
    w.close_data(NodeType::Point)?;

    w.open_data(NodeType::Cell, &DataDefaults::new().scalars("Pressure"))?;
    w.add_data("Pressure", &pressure)?;
    w.close_data(NodeType::Cell)?;

    w.open_element("Coordinates")?;
    w.add_data("x_coordinates", &Payload::scalar(&x))?;
    w.add_data("y_coordinates", &Payload::scalar(&y))?;
    w.add_data("z_coordinates", &Payload::scalar(&z))?;
    w.close_element("Coordinates")?;

    w.close_piece()?;
    w.close_grid()?;

    w.append_data(&Payload::scalar(&temp))?
        .append_data(&velocity)?
        .append_data(&pressure)?;
    w.append_data(&Payload::scalar(&x))?
        .append_data(&Payload::scalar(&y))?
        .append_data(&Payload::scalar(&z))?;
    w.save()
}
