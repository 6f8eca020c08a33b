//! VTK cell types - integer ids identifying the shape of a mesh element.

use std::fmt;

/// Cell shape, as written into the `types` array of an unstructured grid.
///
/// Ids follow the fixed VTK enumeration and are stable across implementations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CellType {
    Vertex = 1,
    PolyVertex = 2,
    Line = 3,
    PolyLine = 4,
    Triangle = 5,
    TriangleStrip = 6,
    Polygon = 7,
    Pixel = 8,
    Quad = 9,
    Tetra = 10,
    Voxel = 11,
    Hexahedron = 12,
    Wedge = 13,
    Pyramid = 14,
    QuadraticEdge = 21,
    QuadraticTriangle = 22,
    QuadraticQuad = 23,
    QuadraticTetra = 24,
    QuadraticHexahedron = 25,
}

impl CellType {
    /// Number of supported cell types.
    pub const COUNT: usize = 19;

    /// VTK cell type id.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Look up a cell type by id.
    pub const fn from_id(id: u8) -> Option<Self> {
        let ty = match id {
            1 => Self::Vertex,
            2 => Self::PolyVertex,
            3 => Self::Line,
            4 => Self::PolyLine,
            5 => Self::Triangle,
            6 => Self::TriangleStrip,
            7 => Self::Polygon,
            8 => Self::Pixel,
            9 => Self::Quad,
            10 => Self::Tetra,
            11 => Self::Voxel,
            12 => Self::Hexahedron,
            13 => Self::Wedge,
            14 => Self::Pyramid,
            21 => Self::QuadraticEdge,
            22 => Self::QuadraticTriangle,
            23 => Self::QuadraticQuad,
            24 => Self::QuadraticTetra,
            25 => Self::QuadraticHexahedron,
            _ => return None,
        };
        Some(ty)
    }

    /// Human readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertex => "Vertex",
            Self::PolyVertex => "PolyVertex",
            Self::Line => "Line",
            Self::PolyLine => "PolyLine",
            Self::Triangle => "Triangle",
            Self::TriangleStrip => "TriangleStrip",
            Self::Polygon => "Polygon",
            Self::Pixel => "Pixel",
            Self::Quad => "Quad",
            Self::Tetra => "Tetra",
            Self::Voxel => "Voxel",
            Self::Hexahedron => "Hexahedron",
            Self::Wedge => "Wedge",
            Self::Pyramid => "Pyramid",
            Self::QuadraticEdge => "Quadratic_Edge",
            Self::QuadraticTriangle => "Quadratic_Triangle",
            Self::QuadraticQuad => "Quadratic_Quad",
            Self::QuadraticTetra => "Quadratic_Tetra",
            Self::QuadraticHexahedron => "Quadratic_Hexahedron",
        }
    }

    /// Number of nodes for fixed-size cells, `None` for poly cells.
    pub const fn num_nodes(self) -> Option<usize> {
        match self {
            Self::Vertex => Some(1),
            Self::Line => Some(2),
            Self::Triangle => Some(3),
            Self::Pixel | Self::Quad | Self::Tetra => Some(4),
            Self::Pyramid => Some(5),
            Self::Wedge => Some(6),
            Self::Voxel | Self::Hexahedron => Some(8),
            Self::QuadraticEdge => Some(3),
            Self::QuadraticTriangle => Some(6),
            Self::QuadraticQuad => Some(8),
            Self::QuadraticTetra => Some(10),
            Self::QuadraticHexahedron => Some(20),
            Self::PolyVertex | Self::PolyLine | Self::TriangleStrip | Self::Polygon => None,
        }
    }
}

impl From<CellType> for u8 {
    fn from(ty: CellType) -> Self {
        ty.id()
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_ids() {
        assert_eq!(CellType::Vertex.id(), 1);
        assert_eq!(CellType::Line.id(), 3);
        assert_eq!(CellType::Triangle.id(), 5);
        assert_eq!(CellType::Quad.id(), 9);
        assert_eq!(CellType::Tetra.id(), 10);
        assert_eq!(CellType::Hexahedron.id(), 12);
        assert_eq!(CellType::QuadraticHexahedron.id(), 25);
    }

    #[test]
    fn test_id_roundtrip() {
        let known: Vec<CellType> = (0..=u8::MAX).filter_map(CellType::from_id).collect();
        assert_eq!(known.len(), CellType::COUNT);
        for ty in known {
            assert_eq!(CellType::from_id(ty.id()), Some(ty));
        }
        assert_eq!(CellType::from_id(15), None);
    }
}
