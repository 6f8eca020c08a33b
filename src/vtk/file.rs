//! VTK XML dataset writer.
//!
//! A file is written in two phases. The header phase emits the grid, its
//! pieces and data sections, and one `DataArray` element per array, each
//! carrying the offset its block will have in the appended section. After the
//! grid is closed, the blocks are appended in exactly the declaration order.
//!
//! ```ignore
//! use evtk::vtk::{GridGeometry, GridType, NodeType, DataDefaults, Payload, PieceShape, VtkFile};
//! use evtk::util::Extent;
//!
//! let ext = Extent::from_cells([2, 2, 2]);
//! let mut w = VtkFile::create("out/field", GridType::RectilinearGrid)?;
//! w.open_grid(&GridGeometry::extent(ext))?;
//! w.open_piece(PieceShape::Extent(ext))?;
//! w.open_data(NodeType::Point, &DataDefaults::new().scalars("T"))?;
//! w.add_data("T", &Payload::scalar(&temperature))?;
//! w.close_data(NodeType::Point)?;
//! // ... Coordinates ...
//! w.close_piece()?;
//! w.close_grid()?;
//! w.append_data(&Payload::scalar(&temperature))?;
//! // ... coordinates ...
//! let path = w.save()?;
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::array::Payload;
use super::constants::*;
use super::encoder::write_block;
use super::grid::{DataDefaults, GridGeometry, GridType, NodeType, PieceShape};
use super::ledger::OffsetLedger;
use super::options::WriterOptions;
use super::append_extension;
use crate::util::{DataType, Error, Result};
use crate::xml::{OStream, XmlWriter};

/// Position of the writer in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriterState {
    /// Root element written, grid not opened yet.
    Created,
    /// Inside the grid element.
    GridOpen,
    /// Inside a piece.
    PieceOpen,
    /// Inside a `PointData` or `CellData` section.
    DataSectionOpen(NodeType),
    /// Inside a generic element (`Points`, `Cells`, `Coordinates`, ...).
    ElementOpen,
    /// Grid closed, no block appended yet.
    GridClosed,
    /// Inside the appended data section.
    AppendedOpen,
}

/// Writer method responsible for `tag`, if it is not a plain structural element.
fn reserved_tag_method(tag: &str) -> Option<&'static str> {
    match tag {
        PIECE_TAG => Some("open_piece"),
        "PointData" | "CellData" => Some("open_data"),
        APPENDED_TAG => Some("append_data"),
        DATA_ARRAY_TAG => Some("declare_array"),
        ROOT_TAG => Some("create"),
        "ImageData" | "PolyData" | "RectilinearGrid" | "StructuredGrid" | "UnstructuredGrid" => {
            Some("open_grid")
        }
        _ => None,
    }
}

/// Writer for one VTK XML dataset file.
pub struct VtkFile<W: Write = BufWriter<File>> {
    xml: XmlWriter<W>,
    grid_type: GridType,
    path: Option<PathBuf>,
    options: WriterOptions,
    ledger: OffsetLedger,
    grid_opened: bool,
    grid_closed: bool,
    appended_open: bool,
    /// Data sections opened in the current piece.
    piece_sections: SmallVec<[NodeType; 2]>,
}

impl VtkFile<BufWriter<File>> {
    /// Create `path` + grid extension (e.g. `out/mesh` -> `out/mesh.vtu`).
    pub fn create(path: impl AsRef<Path>, grid_type: GridType) -> Result<Self> {
        Self::create_with_options(path, grid_type, WriterOptions::default())
    }

    /// Create a file with explicit options.
    pub fn create_with_options(
        path: impl AsRef<Path>,
        grid_type: GridType,
        options: WriterOptions,
    ) -> Result<Self> {
        let path = append_extension(path.as_ref(), grid_type.extension());
        debug!(path = %path.display(), grid = %grid_type, "creating VTK file");
        let stream = OStream::create(&path)?;
        let mut file = Self::init(stream, grid_type, options)?;
        file.path = Some(path);
        Ok(file)
    }

    /// Close the document and the file; returns the absolute output path.
    pub fn save(self) -> Result<PathBuf> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| Error::other("file writer has no output path"))?;
        self.finish()?;
        Ok(std::path::absolute(&path).unwrap_or(path))
    }
}

impl<W: Write> VtkFile<W> {
    /// Write a dataset into an arbitrary sink.
    pub fn from_writer(writer: W, grid_type: GridType, options: WriterOptions) -> Result<Self> {
        Self::init(OStream::new(writer), grid_type, options)
    }

    fn init(stream: OStream<W>, grid_type: GridType, options: WriterOptions) -> Result<Self> {
        let mut xml = XmlWriter::new(stream, options.declaration)?;
        xml.open_element(ROOT_TAG)?
            .add_attribute("type", grid_type.name())?
            .add_attribute("version", FILE_VERSION)?
            .add_attribute("byte_order", options.byte_order.name())?
            .add_attribute("header_type", HEADER_TYPE)?;
        if options.generator_comment {
            xml.add_comment(&crate::version_string())?;
        }

        Ok(Self {
            xml,
            grid_type,
            path: None,
            options,
            ledger: OffsetLedger::new(),
            grid_opened: false,
            grid_closed: false,
            appended_open: false,
            piece_sections: SmallVec::new(),
        })
    }

    #[inline]
    pub fn grid_type(&self) -> GridType {
        self.grid_type
    }

    /// Output path, if writing to a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Absolute output path, if writing to a file.
    pub fn file_name(&self) -> Option<PathBuf> {
        self.path
            .as_deref()
            .map(|p| std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf()))
    }

    #[inline]
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Offset ledger of this file.
    #[inline]
    pub fn ledger(&self) -> &OffsetLedger {
        &self.ledger
    }

    /// Currently open elements, outermost first.
    pub fn open_elements(&self) -> &[String] {
        self.xml.open_elements()
    }

    /// Current position in the document.
    pub fn state(&self) -> WriterState {
        if self.appended_open {
            return WriterState::AppendedOpen;
        }
        if self.grid_closed {
            return WriterState::GridClosed;
        }
        if !self.grid_opened {
            return WriterState::Created;
        }
        match self.xml.current() {
            Some(PIECE_TAG) => WriterState::PieceOpen,
            Some(t) if t == NodeType::Point.tag() => WriterState::DataSectionOpen(NodeType::Point),
            Some(t) if t == NodeType::Cell.tag() => WriterState::DataSectionOpen(NodeType::Cell),
            Some(t) if t == self.grid_type.name() => WriterState::GridOpen,
            _ => WriterState::ElementOpen,
        }
    }

    fn require_header_phase(&self, op: &str) -> Result<()> {
        if self.appended_open {
            return Err(Error::protocol(format!("{op} after the appended data section was opened")));
        }
        Ok(())
    }

    fn require_inside_grid(&self, op: &str) -> Result<()> {
        self.require_header_phase(op)?;
        if !self.grid_opened || self.grid_closed {
            return Err(Error::protocol(format!("{op} outside of the grid element")));
        }
        Ok(())
    }

    /// Insert comments into the header.
    ///
    /// Call right after creating the file so they land before the grid.
    pub fn add_comments<S: AsRef<str>>(&mut self, comments: &[S]) -> Result<&mut Self> {
        self.require_header_phase("comment")?;
        for c in comments {
            self.xml.add_comment(c.as_ref())?;
        }
        Ok(self)
    }

    /// Open the grid element.
    pub fn open_grid(&mut self, geometry: &GridGeometry) -> Result<&mut Self> {
        self.require_header_phase("open_grid")?;
        if self.grid_opened {
            return Err(Error::protocol("grid element already written"));
        }
        let attrs = geometry.attributes(self.grid_type)?;
        self.xml.open_element(self.grid_type.name())?.add_attributes(attrs)?;
        self.grid_opened = true;
        debug!(grid = %self.grid_type, "opened grid");
        Ok(self)
    }

    /// Close the grid element; the header phase ends here.
    pub fn close_grid(&mut self) -> Result<&mut Self> {
        self.require_header_phase("close_grid")?;
        self.xml.close_element(self.grid_type.name())?;
        self.grid_closed = true;
        Ok(self)
    }

    /// Open a piece directly inside the grid.
    pub fn open_piece(&mut self, shape: PieceShape) -> Result<&mut Self> {
        self.require_inside_grid("open_piece")?;
        if self.xml.current() != Some(self.grid_type.name()) {
            return Err(Error::protocol("pieces must be opened directly inside the grid element"));
        }
        let attrs = shape.attributes(self.grid_type)?;
        self.xml.open_element(PIECE_TAG)?.add_attributes(attrs)?;
        self.piece_sections.clear();
        debug!(?shape, "opened piece");
        Ok(self)
    }

    pub fn close_piece(&mut self) -> Result<&mut Self> {
        self.xml.close_element(PIECE_TAG)?;
        Ok(self)
    }

    /// Open a `PointData` or `CellData` section of the current piece.
    pub fn open_data(&mut self, node_type: NodeType, defaults: &DataDefaults) -> Result<&mut Self> {
        self.require_inside_grid("open_data")?;
        if self.xml.current() != Some(PIECE_TAG) {
            return Err(Error::protocol(format!(
                "{} must be opened directly inside a piece",
                node_type.tag()
            )));
        }
        if self.piece_sections.contains(&node_type) {
            return Err(Error::protocol(format!("{} already written for this piece", node_type.tag())));
        }
        self.xml.open_element(node_type.tag())?.add_attributes(defaults.attributes())?;
        self.piece_sections.push(node_type);
        Ok(self)
    }

    pub fn close_data(&mut self, node_type: NodeType) -> Result<&mut Self> {
        self.xml.close_element(node_type.tag())?;
        Ok(self)
    }

    /// Open a structural element such as `Points`, `Cells` or `Coordinates`.
    ///
    /// Tags with a dedicated method (`Piece`, `PointData`, `CellData`,
    /// `AppendedData`, ...) are rejected.
    pub fn open_element(&mut self, tag: &str) -> Result<&mut Self> {
        self.require_inside_grid("open_element")?;
        if let Some(method) = reserved_tag_method(tag) {
            return Err(Error::protocol(format!("<{tag}> must be opened with {method}")));
        }
        self.xml.open_element(tag)?;
        Ok(self)
    }

    pub fn close_element(&mut self, tag: &str) -> Result<&mut Self> {
        self.xml.close_element(tag)?;
        Ok(self)
    }

    /// Declare a data array in the header and reserve its block.
    ///
    /// The `n`-th declaration must be matched by the `n`-th
    /// [`append_data`](Self::append_data) call.
    pub fn declare_array(
        &mut self,
        name: &str,
        data_type: DataType,
        num_elements: usize,
        num_components: usize,
    ) -> Result<&mut Self> {
        self.require_inside_grid("declare_array")?;
        if num_components != 1 && num_components != 3 {
            return Err(Error::InvalidComponents(num_components));
        }
        if matches!(self.xml.current(), Some(t) if t == PIECE_TAG || t == self.grid_type.name()) {
            return Err(Error::protocol(format!(
                "data array {name:?} must be declared inside a data section or a structural element"
            )));
        }
        let byte_len = num_elements
            .checked_mul(num_components)
            .and_then(|n| n.checked_mul(data_type.size()))
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| {
                Error::InvalidShape(format!(
                    "array {name:?} of {num_elements} x {num_components} {data_type} values is too large"
                ))
            })?;
        let offset = self.ledger.declare(name, byte_len)?;

        self.xml
            .open_element(DATA_ARRAY_TAG)?
            .add_attribute("Name", name)?
            .add_attribute("NumberOfComponents", num_components)?
            .add_attribute("type", data_type.name())?
            .add_attribute("format", "appended")?
            .add_attribute("offset", offset)?
            .close_empty()?;

        trace!(name, data_type = %data_type, offset, byte_len, "declared data array");
        Ok(self)
    }

    /// Declare a data array describing `payload`.
    pub fn add_data(&mut self, name: &str, payload: &Payload<'_>) -> Result<&mut Self> {
        payload.validate()?;
        self.declare_array(name, payload.data_type(), payload.num_elements(), payload.num_components())
    }

    /// Open the appended data section. Called implicitly by the first append.
    pub fn open_appended_data(&mut self) -> Result<&mut Self> {
        if self.appended_open {
            return Ok(self);
        }
        if !self.grid_closed || self.xml.current() != Some(ROOT_TAG) {
            return Err(Error::protocol("appended data must follow the closed grid element"));
        }
        self.xml
            .open_element(APPENDED_TAG)?
            .add_attribute("encoding", "raw")?
            .add_text(APPENDED_MARKER)?;
        self.appended_open = true;
        debug!(pos = self.xml.pos(), pending = self.ledger.pending(), "opened appended data");
        Ok(self)
    }

    /// Append the block for the next declared array.
    pub fn append_data(&mut self, payload: &Payload<'_>) -> Result<&mut Self> {
        payload.validate()?;
        self.open_appended_data()?;

        let order = self.options.byte_order;
        let byte_len = payload.byte_len();
        self.xml
            .raw_stream()?
            .write_counted(BLOCK_HEADER_SIZE + byte_len, |w| write_block(w, payload, order).map(drop))?;
        self.ledger.record_append(byte_len);

        trace!(block = self.ledger.appended() - 1, byte_len, "appended block");
        Ok(self)
    }

    /// Close all remaining elements and return the sink.
    pub fn finish(mut self) -> Result<W> {
        if self.appended_open {
            self.xml.close_element(APPENDED_TAG)?;
        }
        let open = self.xml.open_elements();
        if open.len() != 1 {
            return Err(Error::UnclosedElements(open.iter().skip(1).cloned().collect()));
        }
        if self.options.verify_ledger {
            self.ledger.verify()?;
        }
        self.xml.close_element(ROOT_TAG)?;

        debug!(
            arrays = self.ledger.declared().len(),
            appended_bytes = self.ledger.appended_bytes(),
            total_bytes = self.xml.pos(),
            "finished VTK file"
        );
        self.xml.into_inner()
    }
}
