//! Typed array views and payloads handed to the writer.

use crate::util::{DataType, Error, Result, Shape, VtkPod};

/// Borrowed, type-erased view of a numeric array.
///
/// The bytes are the array's in-memory representation (native byte order);
/// `shape` records how they are laid out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataArray<'a> {
    bytes: &'a [u8],
    data_type: DataType,
    shape: Shape,
}

impl<'a> DataArray<'a> {
    /// 1D array view.
    pub fn new<T: VtkPod>(data: &'a [T]) -> Self {
        Self {
            bytes: bytemuck::cast_slice(data),
            data_type: T::DATA_TYPE,
            shape: Shape::Linear(data.len()),
        }
    }

    /// Array view with an explicit shape.
    pub fn with_shape<T: VtkPod>(data: &'a [T], shape: Shape) -> Result<Self> {
        shape.validate(data.len())?;
        Ok(Self { shape, ..Self::new(data) })
    }

    /// Rank-3 column-major array view.
    pub fn grid<T: VtkPod>(data: &'a [T], dims: [usize; 3]) -> Result<Self> {
        Self::with_shape(data, Shape::grid(dims[0], dims[1], dims[2]))
    }

    /// Rank-3 row-major (C order) array view.
    pub fn grid_c<T: VtkPod>(data: &'a [T], dims: [usize; 3]) -> Result<Self> {
        Self::with_shape(data, Shape::grid_c(dims[0], dims[1], dims[2]))
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// Payload size in bytes, without block prefix.
    #[inline]
    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Raw bytes in storage order.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Bytes of the element at storage index `idx`.
    #[inline]
    pub(crate) fn element(&self, idx: usize) -> &'a [u8] {
        let size = self.data_type.size();
        &self.bytes[idx * size..(idx + 1) * size]
    }
}

impl DataArray<'_> {
    /// Element at storage index `idx` widened to `i64`; `None` for floating
    /// point arrays and `UInt64` values above `i64::MAX`.
    fn integer_at(&self, idx: usize) -> Option<i64> {
        use bytemuck::pod_read_unaligned as read;
        let b = self.element(idx);
        match self.data_type {
            DataType::Int8 => Some(read::<i8>(b).into()),
            DataType::UInt8 => Some(read::<u8>(b).into()),
            DataType::Int16 => Some(read::<i16>(b).into()),
            DataType::UInt16 => Some(read::<u16>(b).into()),
            DataType::Int32 => Some(read::<i32>(b).into()),
            DataType::UInt32 => Some(read::<u32>(b).into()),
            DataType::Int64 => Some(read::<i64>(b)),
            DataType::UInt64 => i64::try_from(read::<u64>(b)).ok(),
            DataType::Float32 | DataType::Float64 => None,
        }
    }

    /// Integer values in column-major order.
    pub(crate) fn integer_values(&self) -> Option<Vec<i64>> {
        self.shape.column_major_indices().map(|idx| self.integer_at(idx)).collect()
    }
}

impl<'a, T: VtkPod> From<&'a [T]> for DataArray<'a> {
    fn from(data: &'a [T]) -> Self {
        Self::new(data)
    }
}

impl<'a, T: VtkPod> From<&'a Vec<T>> for DataArray<'a> {
    fn from(data: &'a Vec<T>) -> Self {
        Self::new(data.as_slice())
    }
}

impl<'a, T: VtkPod, const N: usize> From<&'a [T; N]> for DataArray<'a> {
    fn from(data: &'a [T; N]) -> Self {
        Self::new(data.as_slice())
    }
}

/// Data written as one block: a scalar array or the three components of a
/// vector field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Payload<'a> {
    Scalar(DataArray<'a>),
    Vector(DataArray<'a>, DataArray<'a>, DataArray<'a>),
}

impl<'a> Payload<'a> {
    pub fn scalar(data: impl Into<DataArray<'a>>) -> Self {
        Self::Scalar(data.into())
    }

    /// Vector payload; components must have equal length and element width.
    pub fn vector(
        x: impl Into<DataArray<'a>>,
        y: impl Into<DataArray<'a>>,
        z: impl Into<DataArray<'a>>,
    ) -> Result<Self> {
        let payload = Self::Vector(x.into(), y.into(), z.into());
        payload.validate()?;
        Ok(payload)
    }

    /// Check the vector preconditions.
    pub fn validate(&self) -> Result<()> {
        if let Self::Vector(x, y, z) = self {
            if x.len() != y.len() || x.len() != z.len() {
                return Err(Error::shape(format!(
                    "vector components have different lengths ({}, {}, {})",
                    x.len(),
                    y.len(),
                    z.len()
                )));
            }
            let size = x.data_type().size();
            if y.data_type().size() != size || z.data_type().size() != size {
                return Err(Error::shape(format!(
                    "vector components have different element sizes ({}, {}, {})",
                    x.data_type(),
                    y.data_type(),
                    z.data_type()
                )));
            }
        }
        Ok(())
    }

    /// 1 for scalars, 3 for vectors.
    #[inline]
    pub fn num_components(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Vector(..) => 3,
        }
    }

    /// Number of tuples.
    #[inline]
    pub fn num_elements(&self) -> usize {
        match self {
            Self::Scalar(a) | Self::Vector(a, _, _) => a.len(),
        }
    }

    /// Declared element type (the first component's type for vectors).
    #[inline]
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Scalar(a) | Self::Vector(a, _, _) => a.data_type(),
        }
    }

    /// Payload size in bytes, without block prefix.
    pub fn byte_len(&self) -> u64 {
        match self {
            Self::Scalar(a) => a.byte_len(),
            Self::Vector(x, y, z) => x.byte_len() + y.byte_len() + z.byte_len(),
        }
    }

    /// Shape of the (first) component.
    pub fn shape(&self) -> Shape {
        match self {
            Self::Scalar(a) | Self::Vector(a, _, _) => a.shape(),
        }
    }
}

impl<'a> From<DataArray<'a>> for Payload<'a> {
    fn from(array: DataArray<'a>) -> Self {
        Self::Scalar(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Layout;

    #[test]
    fn test_array_view() {
        let data = [1.0f64, 2.0, 3.0];
        let a = DataArray::from(&data);
        assert_eq!(a.data_type(), DataType::Float64);
        assert_eq!(a.len(), 3);
        assert_eq!(a.byte_len(), 24);
        assert_eq!(a.element(1), &2.0f64.to_ne_bytes());
    }

    #[test]
    fn test_grid_shape_checked() {
        let data = vec![0u8; 12];
        let a = DataArray::grid_c(&data, [2, 3, 2]).unwrap();
        assert_eq!(a.shape(), Shape::Grid { dims: [2, 3, 2], layout: Layout::RowMajor });
        assert!(matches!(DataArray::grid(&data, [2, 2, 2]), Err(Error::InvalidShape(_))));
    }

    #[test]
    fn test_vector_preconditions() {
        let x = [1.0f64, 2.0];
        let y = [1.0f64];
        let z = [1.0f64, 2.0];
        assert!(matches!(Payload::vector(&x, &y, &z), Err(Error::ShapeMismatch(_))));

        let yf = [1.0f32, 2.0];
        assert!(matches!(Payload::vector(&x, &yf, &z), Err(Error::ShapeMismatch(_))));

        // Same width, different types: allowed.
        let yi = [1i64, 2];
        let p = Payload::vector(&x, &yi, &z).unwrap();
        assert_eq!(p.num_components(), 3);
        assert_eq!(p.num_elements(), 2);
        assert_eq!(p.byte_len(), 48);
    }

    #[test]
    fn test_integer_values() {
        let small = [3u8, 250];
        assert_eq!(DataArray::from(&small).integer_values(), Some(vec![3, 250]));
        let signed = [-4i16, 7];
        assert_eq!(DataArray::from(&signed).integer_values(), Some(vec![-4, 7]));
        let huge = [u64::MAX];
        assert_eq!(DataArray::from(&huge).integer_values(), None);
        let floats = [1.0f32];
        assert_eq!(DataArray::from(&floats).integer_values(), None);
    }
}
