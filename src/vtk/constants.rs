//! VTK XML format constants.

/// Root element of every file.
pub(crate) const ROOT_TAG: &str = "VTKFile";

/// `version` attribute of dataset files (required for `header_type`).
pub(crate) const FILE_VERSION: &str = "1.0";

/// `version` attribute of collection (`.pvd`) files.
pub(crate) const COLLECTION_VERSION: &str = "0.1";

/// Type of the size prefix in front of every appended block.
pub(crate) const HEADER_TYPE: &str = "UInt64";

/// Size in bytes of the block size prefix (`UInt64`).
pub const BLOCK_HEADER_SIZE: u64 = 8;

/// Element holding the raw binary section.
pub(crate) const APPENDED_TAG: &str = "AppendedData";

/// Marks the first byte before raw appended data.
pub(crate) const APPENDED_MARKER: &str = "_";

pub(crate) const PIECE_TAG: &str = "Piece";
pub(crate) const DATA_ARRAY_TAG: &str = "DataArray";

/// Extension of collection files.
pub const COLLECTION_EXTENSION: &str = ".pvd";
