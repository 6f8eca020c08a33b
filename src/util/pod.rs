//! Numeric types - the fixed set of element types a VTK data array can hold.

use std::fmt;
use std::io::{self, Write};

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use bytemuck::Pod;

use super::{Error, Result};

/// Numeric element type of a `DataArray`.
///
/// The discriminant order is irrelevant on the wire; only [`DataType::name`]
/// is written to the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DataType {
    /// Signed 8-bit integer
    Int8,
    /// Unsigned 8-bit integer
    UInt8,
    /// Signed 16-bit integer
    Int16,
    /// Unsigned 16-bit integer
    UInt16,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 32-bit integer
    UInt32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    UInt64,
    /// 32-bit floating point (IEEE 754 single precision)
    Float32,
    /// 64-bit floating point (IEEE 754 double precision)
    Float64,
}

impl DataType {
    /// All supported types, in table order.
    pub const ALL: [DataType; 10] = [
        Self::Int8,
        Self::UInt8,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Float32,
        Self::Float64,
    ];

    /// Size in bytes of a single element.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// Name written in the `type` attribute.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "Int8",
            Self::UInt8 => "UInt8",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
        }
    }

    /// Lowercase element type name (`float64`, `uint8`, ...).
    #[inline]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Look up a type by its wire name (`Float64`) or lowercase name (`float64`).
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name || t.short_name() == name)
            .ok_or_else(|| Error::UnsupportedType(name.to_string()))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Byte order of every binary value in the appended section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Byte order of the producing platform.
    #[inline]
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    /// Value of the root `byte_order` attribute.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Little => "LittleEndian",
            Self::Big => "BigEndian",
        }
    }

    /// Returns true if values in this order can be copied from memory as-is.
    #[inline]
    pub const fn is_native(self) -> bool {
        matches!(
            (self, Self::native()),
            (Self::Little, Self::Little) | (Self::Big, Self::Big)
        )
    }

    /// Write a block size prefix (always an unsigned 64-bit value).
    pub fn write_u64<W: Write + ?Sized>(self, w: &mut W, value: u64) -> io::Result<()> {
        match self {
            Self::Little => w.write_u64::<LittleEndian>(value),
            Self::Big => w.write_u64::<BigEndian>(value),
        }
    }
}

impl Default for Endianness {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// === POD trait for type-safe conversions ===

/// Trait for Rust primitives that can be stored in a VTK data array.
pub trait VtkPod: Pod + Copy + Default + PartialEq + fmt::Debug {
    /// The corresponding [`DataType`] value.
    const DATA_TYPE: DataType;
}

macro_rules! impl_vtk_pod {
    ($($t:ty => $dt:ident),* $(,)?) => {
        $(
            impl VtkPod for $t {
                const DATA_TYPE: DataType = DataType::$dt;
            }
        )*
    };
}

impl_vtk_pod! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_sizes() {
        assert_eq!(DataType::Int8.size(), 1);
        assert_eq!(DataType::UInt16.size(), 2);
        assert_eq!(DataType::Int32.size(), 4);
        assert_eq!(DataType::Float32.size(), 4);
        assert_eq!(DataType::UInt64.size(), 8);
        assert_eq!(DataType::Float64.size(), 8);
    }

    #[test]
    fn test_lookup_by_name() {
        for _ in 0..3 {
            let t = DataType::from_name("float64").unwrap();
            assert_eq!(t.size(), 8);
            assert_eq!(t.name(), "Float64");
        }
        assert_eq!(DataType::from_name("UInt8").unwrap(), DataType::UInt8);
        assert!(matches!(
            DataType::from_name("complex128"),
            Err(Error::UnsupportedType(name)) if name == "complex128"
        ));
    }

    #[test]
    fn test_pod_matches_table() {
        assert_eq!(<f64 as VtkPod>::DATA_TYPE, DataType::Float64);
        assert_eq!(<u8 as VtkPod>::DATA_TYPE, DataType::UInt8);
        assert_eq!(std::mem::size_of::<i64>(), <i64 as VtkPod>::DATA_TYPE.size());
        assert_eq!(std::mem::size_of::<f32>(), <f32 as VtkPod>::DATA_TYPE.size());
    }

    #[test]
    fn test_write_prefix_byte_order() {
        let mut le = Vec::new();
        Endianness::Little.write_u64(&mut le, 24).unwrap();
        assert_eq!(le, [24, 0, 0, 0, 0, 0, 0, 0]);

        let mut prefix = Vec::new();
        Endianness::Big.write_u64(&mut prefix, 24).unwrap();
        assert_eq!(prefix, [0, 0, 0, 0, 0, 0, 0, 24]);
    }

    #[test]
    fn test_native_order() {
        assert!(Endianness::native().is_native());
        assert_eq!(Endianness::default(), Endianness::native());
        #[cfg(target_endian = "little")]
        assert_eq!(Endianness::native().name(), "LittleEndian");
    }
}
