//! Unstructured grid exporters: point clouds, line sets and general cells.

use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use glam::{DVec2, DVec3};
use tracing::debug;

use super::{append_fields, begin, check_section, declare_fields, Fields};
use crate::util::{CellType, Error, Result};
use crate::vtk::{DataArray, GridGeometry, GridType, NodeType, Payload, PieceShape};

/// Write an unstructured grid with explicit topology arrays.
fn write_unstructured(
    path: &Path,
    points: Payload<'_>,
    connectivity: DataArray<'_>,
    offsets: DataArray<'_>,
    cell_types: DataArray<'_>,
    fields: &Fields<'_>,
) -> Result<PathBuf> {
    let npoints = points.num_elements();
    let ncells = cell_types.len();
    if offsets.len() != ncells {
        return Err(Error::shape(format!(
            "{} offsets for {ncells} cells",
            offsets.len()
        )));
    }
    check_section(&fields.point, NodeType::Point, npoints)?;
    check_section(&fields.cell, NodeType::Cell, ncells)?;

    let topology = [
        ("connectivity", Payload::Scalar(connectivity)),
        ("offsets", Payload::Scalar(offsets)),
        ("types", Payload::Scalar(cell_types)),
    ];

    let mut w = begin(path, GridType::UnstructuredGrid, fields)?;
    w.open_grid(&GridGeometry::none())?;
    w.open_piece(PieceShape::Unstructured { points: npoints, cells: ncells })?;
    w.open_element("Points")?;
    w.add_data("points", &points)?;
    w.close_element("Points")?;
    w.open_element("Cells")?;
    for (name, payload) in &topology {
        w.add_data(name, payload)?;
    }
    w.close_element("Cells")?;
    declare_fields(&mut w, fields)?;
    w.close_piece()?;
    w.close_grid()?;

    w.append_data(&points)?;
    for (_, payload) in &topology {
        w.append_data(payload)?;
    }
    append_fields(&mut w, fields)?;

    debug!(npoints, ncells, "unstructured export");
    w.save()
}

/// `offsets[i]` is the end of cell `i` in the connectivity array.
fn cumulative_offsets(sizes: impl IntoIterator<Item = usize>) -> Vec<i64> {
    sizes
        .into_iter()
        .scan(0i64, |end, n| {
            *end += n as i64;
            Some(*end)
        })
        .collect()
}

/// Connectivity listing every point once, in order.
fn identity_connectivity(npoints: usize) -> Vec<i64> {
    (0..npoints as i64).collect()
}

/// Export a point cloud; every point becomes a vertex cell.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn points_to_vtk<'a>(
    path: impl AsRef<Path>,
    x: impl Into<DataArray<'a>>,
    y: impl Into<DataArray<'a>>,
    z: impl Into<DataArray<'a>>,
    fields: &Fields<'_>,
) -> Result<PathBuf> {
    let points = Payload::vector(x, y, z)?;
    let npoints = points.num_elements();
    let connectivity = identity_connectivity(npoints);
    let offsets = cumulative_offsets(std::iter::repeat(1).take(npoints));
    let cell_types = vec![CellType::Vertex.id(); npoints];

    write_unstructured(
        path.as_ref(),
        points,
        DataArray::from(&connectivity),
        DataArray::from(&offsets),
        DataArray::from(&cell_types),
        fields,
    )
}

/// Export independent segments; points `2i` and `2i + 1` form line `i`.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn lines_to_vtk<'a>(
    path: impl AsRef<Path>,
    x: impl Into<DataArray<'a>>,
    y: impl Into<DataArray<'a>>,
    z: impl Into<DataArray<'a>>,
    fields: &Fields<'_>,
) -> Result<PathBuf> {
    let points = Payload::vector(x, y, z)?;
    let npoints = points.num_elements();
    if npoints % 2 != 0 {
        return Err(Error::shape(format!(
            "line segments need an even number of points, got {npoints}"
        )));
    }
    let ncells = npoints / 2;
    let connectivity = identity_connectivity(npoints);
    let offsets = cumulative_offsets(std::iter::repeat(2).take(ncells));
    let cell_types = vec![CellType::Line.id(); ncells];

    write_unstructured(
        path.as_ref(),
        points,
        DataArray::from(&connectivity),
        DataArray::from(&offsets),
        DataArray::from(&cell_types),
        fields,
    )
}

/// Export poly lines made of consecutive points.
///
/// `points_per_line[i]` points belong to line `i`; the counts must add up to
/// the number of points.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display(), lines = points_per_line.len()))]
pub fn poly_lines_to_vtk<'a>(
    path: impl AsRef<Path>,
    x: impl Into<DataArray<'a>>,
    y: impl Into<DataArray<'a>>,
    z: impl Into<DataArray<'a>>,
    points_per_line: &[usize],
    fields: &Fields<'_>,
) -> Result<PathBuf> {
    let points = Payload::vector(x, y, z)?;
    let npoints = points.num_elements();
    let total: usize = points_per_line.iter().sum();
    if total != npoints {
        return Err(Error::shape(format!(
            "poly lines use {total} points, coordinates hold {npoints}"
        )));
    }
    let connectivity = identity_connectivity(npoints);
    let offsets = cumulative_offsets(points_per_line.iter().copied());
    let cell_types = vec![CellType::PolyLine.id(); points_per_line.len()];

    write_unstructured(
        path.as_ref(),
        points,
        DataArray::from(&connectivity),
        DataArray::from(&offsets),
        DataArray::from(&cell_types),
        fields,
    )
}

/// Export a general unstructured grid.
///
/// `offsets[i]` is the index one past the last vertex of cell `i` in
/// `connectivity`; `cell_types` holds one [`CellType`] id per cell.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
#[allow(clippy::too_many_arguments)]
pub fn unstructured_grid_to_vtk<'a>(
    path: impl AsRef<Path>,
    x: impl Into<DataArray<'a>>,
    y: impl Into<DataArray<'a>>,
    z: impl Into<DataArray<'a>>,
    connectivity: impl Into<DataArray<'a>>,
    offsets: impl Into<DataArray<'a>>,
    cell_types: impl Into<DataArray<'a>>,
    fields: &Fields<'_>,
) -> Result<PathBuf> {
    let points = Payload::vector(x, y, z)?;
    let (connectivity, offsets, cell_types) = (connectivity.into(), offsets.into(), cell_types.into());
    check_cell_sizes(&connectivity, &offsets, &cell_types)?;
    write_unstructured(path.as_ref(), points, connectivity, offsets, cell_types, fields)
}

/// Offsets must be non-decreasing and stay inside the connectivity array;
/// fixed-size cells must span exactly their node count. Unknown cell ids and
/// poly cells are not size-checked.
fn check_cell_sizes(
    connectivity: &DataArray<'_>,
    offsets: &DataArray<'_>,
    cell_types: &DataArray<'_>,
) -> Result<()> {
    let not_integer = |what: &str| Error::shape(format!("{what} must hold integers"));
    let ends = offsets.integer_values().ok_or_else(|| not_integer("offsets"))?;
    let ids = cell_types.integer_values().ok_or_else(|| not_integer("cell types"))?;
    let len = connectivity.len() as i64;

    let mut start = 0i64;
    for (cell, (&end, &id)) in ends.iter().zip(&ids).enumerate() {
        if end < start || end > len {
            return Err(Error::shape(format!(
                "cell {cell} ends at {end}, outside {start}..={len}"
            )));
        }
        let cell_type = u8::try_from(id).ok().and_then(CellType::from_id);
        if let Some((ty, nodes)) = cell_type.and_then(|ty| Some((ty, ty.num_nodes()?))) {
            if end - start != nodes as i64 {
                return Err(Error::shape(format!(
                    "cell {cell} is a {ty} with {} nodes, expected {nodes}",
                    end - start
                )));
            }
        }
        start = end;
    }
    Ok(())
}

/// Vertical cylinder surface split into quads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cylinder {
    /// Axis position in the xy plane.
    pub center: DVec2,
    /// Bottom elevation.
    pub z0: f64,
    /// Top elevation.
    pub z1: f64,
    pub radius: f64,
    /// Number of layers along z.
    pub layers: usize,
    /// Number of nodes around the circumference.
    pub pillars: usize,
}

impl Cylinder {
    /// Cylinder with 16 pillars.
    pub fn new(center: DVec2, z0: f64, z1: f64, radius: f64, layers: usize) -> Self {
        Self { center, z0, z1, radius, layers, pillars: 16 }
    }

    pub fn pillars(mut self, pillars: usize) -> Self {
        self.pillars = pillars;
        self
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.pillars * (self.layers + 1)
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.pillars * self.layers
    }

    fn validate(&self) -> Result<()> {
        if self.layers == 0 || self.pillars < 3 {
            return Err(Error::InvalidShape(format!(
                "cylinder needs at least 1 layer and 3 pillars, got {} and {}",
                self.layers, self.pillars
            )));
        }
        Ok(())
    }

    /// Nodes layer by layer, counter-clockwise within a layer.
    pub fn nodes(&self) -> Vec<DVec3> {
        let dz = (self.z1 - self.z0) / self.layers as f64;
        let ring: Vec<DVec2> = (0..self.pillars)
            .map(|p| self.center + DVec2::from_angle(p as f64 * TAU / self.pillars as f64) * self.radius)
            .collect();
        (0..=self.layers)
            .flat_map(|k| {
                let z = self.z0 + k as f64 * dz;
                ring.iter().map(move |xy| xy.extend(z))
            })
            .collect()
    }

    /// Four node ids per quad, wrapping around the circumference.
    pub fn connectivity(&self) -> Vec<i64> {
        let n = self.pillars as i64;
        let mut conn = Vec::with_capacity(4 * self.num_cells());
        for layer in 0..self.layers as i64 {
            for p in 0..n {
                let n0 = p + layer * n;
                let n1 = (p + 1) % n + layer * n;
                conn.extend_from_slice(&[n0, n1, n1 + n, n0 + n]);
            }
        }
        conn
    }
}

/// Export the side surface of a vertical cylinder as quads.
#[tracing::instrument(skip_all, fields(
    path = %path.as_ref().display(),
    layers = cylinder.layers,
    pillars = cylinder.pillars,
))]
pub fn cylinder_to_vtk(path: impl AsRef<Path>, cylinder: &Cylinder, fields: &Fields<'_>) -> Result<PathBuf> {
    cylinder.validate()?;
    let nodes = cylinder.nodes();
    let x: Vec<f64> = nodes.iter().map(|p| p.x).collect();
    let y: Vec<f64> = nodes.iter().map(|p| p.y).collect();
    let z: Vec<f64> = nodes.iter().map(|p| p.z).collect();
    let connectivity = cylinder.connectivity();
    let offsets = cumulative_offsets(std::iter::repeat(4).take(cylinder.num_cells()));
    let cell_types = vec![CellType::Quad.id(); cylinder.num_cells()];

    write_unstructured(
        path.as_ref(),
        Payload::vector(&x, &y, &z)?,
        DataArray::from(&connectivity),
        DataArray::from(&offsets),
        DataArray::from(&cell_types),
        fields,
    )
}
