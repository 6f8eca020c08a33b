//! Array shapes and index extents.
//!
//! VTK expects every array in Fortran (column-major) order: the first index
//! varies fastest. Producers may hold 3D fields in either layout, so a shape
//! carries the storage layout alongside the sizes.

use std::fmt;

use super::{Error, Result};

/// Memory layout of a rank-3 array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    /// First index varies fastest (the order VTK reads).
    #[default]
    ColumnMajor,
    /// Last index varies fastest (C order).
    RowMajor,
}

/// Shape of an array handed to the writer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// 1D array of `n` elements.
    Linear(usize),
    /// 3D array of `dims[0] x dims[1] x dims[2]` elements.
    Grid { dims: [usize; 3], layout: Layout },
}

impl Shape {
    /// Rank-3 shape in column-major layout.
    pub const fn grid(nx: usize, ny: usize, nz: usize) -> Self {
        Self::Grid { dims: [nx, ny, nz], layout: Layout::ColumnMajor }
    }

    /// Rank-3 shape in row-major (C) layout.
    pub const fn grid_c(nx: usize, ny: usize, nz: usize) -> Self {
        Self::Grid { dims: [nx, ny, nz], layout: Layout::RowMajor }
    }

    /// Number of dimensions (1 or 3).
    #[inline]
    pub const fn rank(&self) -> usize {
        match self {
            Self::Linear(_) => 1,
            Self::Grid { .. } => 3,
        }
    }

    /// Total number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        match self {
            Self::Linear(n) => *n,
            Self::Grid { dims, .. } => dims[0] * dims[1] * dims[2],
        }
    }

    /// Returns true if the shape holds no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sizes along each axis; linear shapes report `[n, 1, 1]`.
    pub const fn dims(&self) -> [usize; 3] {
        match self {
            Self::Linear(n) => [*n, 1, 1],
            Self::Grid { dims, .. } => *dims,
        }
    }

    /// Returns true if elements can be streamed in storage order.
    #[inline]
    pub const fn is_column_major(&self) -> bool {
        !matches!(self, Self::Grid { layout: Layout::RowMajor, .. })
    }

    /// Check that the shape describes exactly `len` stored elements.
    pub fn validate(&self, len: usize) -> Result<()> {
        if self.len() != len {
            return Err(Error::InvalidShape(format!(
                "shape {} holds {} elements, data has {}",
                self,
                self.len(),
                len
            )));
        }
        Ok(())
    }

    /// Storage indices in column-major visiting order.
    pub fn column_major_indices(&self) -> ColumnMajorIndices {
        let (dims, row_major) = match *self {
            Self::Linear(n) => ([n, 1, 1], false),
            Self::Grid { dims, layout } => (dims, layout == Layout::RowMajor),
        };
        ColumnMajorIndices { dims, row_major, ijk: [0, 0, 0], remaining: self.len() }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear(n) => write!(f, "[{}]", n),
            Self::Grid { dims, layout } => {
                let tag = match layout {
                    Layout::ColumnMajor => "F",
                    Layout::RowMajor => "C",
                };
                write!(f, "[{}x{}x{}]{}", dims[0], dims[1], dims[2], tag)
            }
        }
    }
}

/// Iterator over storage indices of an array, first axis fastest.
#[derive(Clone, Debug)]
pub struct ColumnMajorIndices {
    dims: [usize; 3],
    row_major: bool,
    ijk: [usize; 3],
    remaining: usize,
}

impl Iterator for ColumnMajorIndices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let [i, j, k] = self.ijk;
        let [nx, ny, nz] = self.dims;
        let idx = if self.row_major {
            (i * ny + j) * nz + k
        } else {
            i + nx * (j + ny * k)
        };

        self.remaining -= 1;
        self.ijk[0] += 1;
        if self.ijk[0] == nx {
            self.ijk[0] = 0;
            self.ijk[1] += 1;
            if self.ijk[1] == ny {
                self.ijk[1] = 0;
                self.ijk[2] += 1;
            }
        }
        Some(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ColumnMajorIndices {}

/// Index range `start..=end` along each axis of a structured grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extent {
    pub start: [usize; 3],
    pub end: [usize; 3],
}

impl Extent {
    pub const fn new(start: [usize; 3], end: [usize; 3]) -> Self {
        Self { start, end }
    }

    /// Extent of a grid with `cells` cells per axis, starting at the origin.
    pub const fn from_cells(cells: [usize; 3]) -> Self {
        Self { start: [0, 0, 0], end: cells }
    }

    /// Number of cells along each axis.
    pub fn cells(&self) -> [usize; 3] {
        [
            self.end[0].saturating_sub(self.start[0]),
            self.end[1].saturating_sub(self.start[1]),
            self.end[2].saturating_sub(self.start[2]),
        ]
    }

    /// Number of points along each axis.
    pub fn points(&self) -> [usize; 3] {
        let c = self.cells();
        [c[0] + 1, c[1] + 1, c[2] + 1]
    }

    /// Attribute form, `x0 x1 y0 y1 z0 z1`.
    pub fn to_attribute(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.start[0], self.end[0], self.start[1], self.end[1], self.start[2], self.end[2]
        )
    }
}

/// Attribute form of a real-valued triple (`Origin`, `Spacing`).
pub(crate) fn triple_to_attribute(v: [f64; 3]) -> String {
    format!("{:?} {:?} {:?}", v[0], v[1], v[2])
}
