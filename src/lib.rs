//! # evtk
//!
//! Writer for VTK XML files (`.vti`, `.vtp`, `.vtr`, `.vts`, `.vtu`) with raw
//! appended binary data, plus `.pvd` collections for time series.
//!
//! ## Modules
//!
//! - [`util`] - Basic types (data types, cell types, shapes, errors)
//! - [`xml`] - Streaming markup writer
//! - [`vtk`] - Dataset and collection writers
//! - [`hl`] - One-call exporters for common grid layouts
//!
//! ## Example
//!
//! ```ignore
//! use evtk::hl::{points_to_vtk, Fields};
//! use evtk::vtk::Payload;
//!
//! let fields = Fields::new().point("elevation", Payload::scalar(&z));
//! let path = points_to_vtk("out/points", &x, &y, &z, &fields)?;
//! println!("wrote {}", path.display());
//! ```

pub mod util;
pub mod xml;
pub mod vtk;
pub mod hl;

// Re-export commonly used types
pub use util::{CellType, DataType, Endianness, Error, Result, VtkPod};
pub use vtk::{VtkFile, VtkGroup};

/// Library version with build date and time.
pub fn version_string() -> String {
    format!(
        "evtk {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        env!("EVTK_BUILD_DATE"),
        env!("EVTK_BUILD_TIME")
    )
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::hl::{Cylinder, FieldMap, Fields};
    pub use crate::util::{CellType, DataType, Endianness, Error, Extent, Layout, Result, Shape};
    pub use crate::vtk::{
        DataArray, DataDefaults, GridGeometry, GridType, NodeType, Payload, PieceShape, VtkFile,
        VtkGroup, WriterOptions,
    };
}
