//! Grid categories and the geometry attached to grid and piece elements.

use std::fmt;

use crate::util::{triple_to_attribute, Error, Extent, Result};

/// Dataset category; selects the grid element name and the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridType {
    ImageData,
    PolyData,
    RectilinearGrid,
    StructuredGrid,
    UnstructuredGrid,
}

impl GridType {
    /// Element name and value of the root `type` attribute.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ImageData => "ImageData",
            Self::PolyData => "PolyData",
            Self::RectilinearGrid => "RectilinearGrid",
            Self::StructuredGrid => "StructuredGrid",
            Self::UnstructuredGrid => "UnstructuredGrid",
        }
    }

    /// File extension including the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::ImageData => ".vti",
            Self::PolyData => ".vtp",
            Self::RectilinearGrid => ".vtr",
            Self::StructuredGrid => ".vts",
            Self::UnstructuredGrid => ".vtu",
        }
    }

    /// Returns true for categories described by index extents.
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::ImageData | Self::RectilinearGrid | Self::StructuredGrid)
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Whether a data section holds per-point or per-cell values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Point,
    Cell,
}

impl NodeType {
    /// Element name of the data section.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Point => "PointData",
            Self::Cell => "CellData",
        }
    }
}

/// Attributes of the grid element.
///
/// Structured families need a whole extent; image data also needs origin and
/// spacing. Unstructured and poly grids take none of them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridGeometry {
    pub whole_extent: Option<Extent>,
    pub origin: Option<[f64; 3]>,
    pub spacing: Option<[f64; 3]>,
}

impl GridGeometry {
    /// No geometry (unstructured and poly grids).
    pub const fn none() -> Self {
        Self { whole_extent: None, origin: None, spacing: None }
    }

    /// Whole extent only (rectilinear and structured grids).
    pub const fn extent(whole_extent: Extent) -> Self {
        Self { whole_extent: Some(whole_extent), origin: None, spacing: None }
    }

    /// Whole extent, origin and spacing (image data).
    pub const fn image(whole_extent: Extent, origin: [f64; 3], spacing: [f64; 3]) -> Self {
        Self { whole_extent: Some(whole_extent), origin: Some(origin), spacing: Some(spacing) }
    }

    /// Attribute list for the grid element of `grid`.
    pub(crate) fn attributes(&self, grid: GridType) -> Result<Vec<(&'static str, String)>> {
        let missing = |what| Error::MissingGeometry { grid: grid.name(), what };
        match grid {
            GridType::ImageData => {
                let ext = self.whole_extent.ok_or_else(|| missing("whole extent"))?;
                let origin = self.origin.ok_or_else(|| missing("origin"))?;
                let spacing = self.spacing.ok_or_else(|| missing("spacing"))?;
                Ok(vec![
                    ("WholeExtent", ext.to_attribute()),
                    ("Origin", triple_to_attribute(origin)),
                    ("Spacing", triple_to_attribute(spacing)),
                ])
            }
            GridType::RectilinearGrid | GridType::StructuredGrid => {
                let ext = self.whole_extent.ok_or_else(|| missing("whole extent"))?;
                Ok(vec![("WholeExtent", ext.to_attribute())])
            }
            GridType::UnstructuredGrid | GridType::PolyData => Ok(Vec::new()),
        }
    }
}

/// Attributes of a piece element. Exactly one shape per piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceShape {
    /// Index extent of a structured piece.
    Extent(Extent),
    /// Point and cell counts of an unstructured piece.
    Unstructured { points: usize, cells: usize },
    /// Point and primitive counts of a poly data piece.
    Poly { points: usize, verts: usize, lines: usize, strips: usize, polys: usize },
}

impl PieceShape {
    /// Attribute list for a piece of `grid`.
    pub(crate) fn attributes(&self, grid: GridType) -> Result<Vec<(&'static str, String)>> {
        let invalid = |reason: &str| Error::InvalidPiece { grid: grid.name(), reason: reason.to_string() };
        match (*self, grid) {
            (Self::Extent(ext), g) if g.is_structured() => Ok(vec![("Extent", ext.to_attribute())]),
            (Self::Extent(_), _) => Err(invalid("extent pieces require a structured grid")),
            (Self::Unstructured { points, cells }, GridType::UnstructuredGrid) => Ok(vec![
                ("NumberOfPoints", points.to_string()),
                ("NumberOfCells", cells.to_string()),
            ]),
            (Self::Unstructured { .. }, _) => {
                Err(invalid("point/cell counts require an unstructured grid"))
            }
            (Self::Poly { points, verts, lines, strips, polys }, GridType::PolyData) => Ok(vec![
                ("NumberOfPoints", points.to_string()),
                ("NumberOfVerts", verts.to_string()),
                ("NumberOfLines", lines.to_string()),
                ("NumberOfStrips", strips.to_string()),
                ("NumberOfPolys", polys.to_string()),
            ]),
            (Self::Poly { .. }, _) => Err(invalid("primitive counts require poly data")),
        }
    }
}

/// Default array names of a data section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataDefaults {
    pub scalars: Option<String>,
    pub vectors: Option<String>,
    pub normals: Option<String>,
    pub tensors: Option<String>,
    pub tcoords: Option<String>,
}

impl DataDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scalars(mut self, name: impl Into<String>) -> Self {
        self.scalars = Some(name.into());
        self
    }

    pub fn vectors(mut self, name: impl Into<String>) -> Self {
        self.vectors = Some(name.into());
        self
    }

    pub fn normals(mut self, name: impl Into<String>) -> Self {
        self.normals = Some(name.into());
        self
    }

    pub fn tensors(mut self, name: impl Into<String>) -> Self {
        self.tensors = Some(name.into());
        self
    }

    pub fn tcoords(mut self, name: impl Into<String>) -> Self {
        self.tcoords = Some(name.into());
        self
    }

    pub(crate) fn attributes(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Scalars", &self.scalars),
            ("Vectors", &self.vectors),
            ("Normals", &self.normals),
            ("Tensors", &self.tensors),
            ("TCoords", &self.tcoords),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.as_deref().map(|v| (k, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions() {
        assert_eq!(GridType::ImageData.extension(), ".vti");
        assert_eq!(GridType::PolyData.extension(), ".vtp");
        assert_eq!(GridType::RectilinearGrid.extension(), ".vtr");
        assert_eq!(GridType::StructuredGrid.extension(), ".vts");
        assert_eq!(GridType::UnstructuredGrid.extension(), ".vtu");
    }

    #[test]
    fn test_image_geometry_required() {
        let ext = Extent::from_cells([2, 2, 2]);
        let err = GridGeometry::extent(ext).attributes(GridType::ImageData).unwrap_err();
        assert!(matches!(err, Error::MissingGeometry { what: "origin", .. }));

        let attrs = GridGeometry::image(ext, [0.0; 3], [1.0; 3])
            .attributes(GridType::ImageData)
            .unwrap();
        assert_eq!(attrs[0], ("WholeExtent", "0 2 0 2 0 2".to_string()));
        assert_eq!(attrs[2], ("Spacing", "1.0 1.0 1.0".to_string()));
    }

    #[test]
    fn test_structured_geometry_required() {
        assert!(matches!(
            GridGeometry::none().attributes(GridType::StructuredGrid),
            Err(Error::MissingGeometry { what: "whole extent", .. })
        ));
        assert!(GridGeometry::none().attributes(GridType::UnstructuredGrid).unwrap().is_empty());
    }

    #[test]
    fn test_piece_shapes() {
        let attrs = PieceShape::Unstructured { points: 5, cells: 0 }
            .attributes(GridType::UnstructuredGrid)
            .unwrap();
        assert_eq!(
            attrs,
            vec![("NumberOfPoints", "5".to_string()), ("NumberOfCells", "0".to_string())]
        );

        let ext = PieceShape::Extent(Extent::from_cells([1, 1, 1]));
        assert!(matches!(
            ext.attributes(GridType::UnstructuredGrid),
            Err(Error::InvalidPiece { .. })
        ));
        assert!(matches!(
            PieceShape::Unstructured { points: 1, cells: 1 }.attributes(GridType::PolyData),
            Err(Error::InvalidPiece { .. })
        ));
    }

    #[test]
    fn test_data_defaults() {
        let d = DataDefaults::new().scalars("T").vectors("V");
        let attrs: Vec<_> = d.attributes().collect();
        assert_eq!(attrs, vec![("Scalars", "T"), ("Vectors", "V")]);
    }
}
