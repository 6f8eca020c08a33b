//! Binary block encoding for the appended data section.
//!
//! A block is a `UInt64` byte count followed by the payload. Elements are
//! written in column-major order and in the requested byte order; vector
//! payloads are interleaved as `x0 y0 z0 x1 y1 z1 ...`.

use std::io::Write;

use super::array::{DataArray, Payload};
use super::constants::BLOCK_HEADER_SIZE;
use crate::util::{Endianness, Result};

/// Staging buffer size for reordered or byte-swapped output.
const CHUNK_SIZE: usize = 64 * 1024;

/// Append one element to `buf`, swapping bytes if `order` is not native.
#[inline]
fn push_element(buf: &mut Vec<u8>, element: &[u8], order: Endianness) {
    let start = buf.len();
    buf.extend_from_slice(element);
    if !order.is_native() {
        buf[start..].reverse();
    }
}

fn write_elements<W: Write + ?Sized>(w: &mut W, array: &DataArray<'_>, order: Endianness) -> Result<()> {
    let size = array.data_type().size();
    if array.shape().is_column_major() && (order.is_native() || size == 1) {
        w.write_all(array.as_bytes())?;
        return Ok(());
    }

    let mut buf = Vec::with_capacity(CHUNK_SIZE.min(array.as_bytes().len()));
    for idx in array.shape().column_major_indices() {
        push_element(&mut buf, array.element(idx), order);
        if buf.len() >= CHUNK_SIZE {
            w.write_all(&buf)?;
            buf.clear();
        }
    }
    w.write_all(&buf)?;
    Ok(())
}

/// Write a scalar block; returns the number of bytes written.
pub fn write_scalar_block<W: Write + ?Sized>(
    w: &mut W,
    array: &DataArray<'_>,
    order: Endianness,
) -> Result<u64> {
    order.write_u64(w, array.byte_len())?;
    write_elements(w, array, order)?;
    Ok(BLOCK_HEADER_SIZE + array.byte_len())
}

/// Write a vector block from three component arrays; returns the number of
/// bytes written.
pub fn write_vector_block<W: Write + ?Sized>(
    w: &mut W,
    x: &DataArray<'_>,
    y: &DataArray<'_>,
    z: &DataArray<'_>,
    order: Endianness,
) -> Result<u64> {
    Payload::Vector(*x, *y, *z).validate()?;
    let total = x.byte_len() + y.byte_len() + z.byte_len();
    order.write_u64(w, total)?;

    let mut buf = Vec::with_capacity(CHUNK_SIZE.min(total as usize));
    let xs = x.shape().column_major_indices();
    let ys = y.shape().column_major_indices();
    let zs = z.shape().column_major_indices();
    for ((i, j), k) in xs.zip(ys).zip(zs) {
        push_element(&mut buf, x.element(i), order);
        push_element(&mut buf, y.element(j), order);
        push_element(&mut buf, z.element(k), order);
        if buf.len() >= CHUNK_SIZE {
            w.write_all(&buf)?;
            buf.clear();
        }
    }
    w.write_all(&buf)?;
    Ok(BLOCK_HEADER_SIZE + total)
}

/// Write the block for any payload.
pub fn write_block<W: Write + ?Sized>(w: &mut W, payload: &Payload<'_>, order: Endianness) -> Result<u64> {
    match payload {
        Payload::Scalar(a) => write_scalar_block(w, a, order),
        Payload::Vector(x, y, z) => write_vector_block(w, x, y, z, order),
    }
}

/// Encode a scalar block into memory.
pub fn encode_scalar(array: &DataArray<'_>, order: Endianness) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity((BLOCK_HEADER_SIZE + array.byte_len()) as usize);
    write_scalar_block(&mut out, array, order)?;
    Ok(out)
}

/// Encode an interleaved vector block into memory.
pub fn encode_vector(
    x: &DataArray<'_>,
    y: &DataArray<'_>,
    z: &DataArray<'_>,
    order: Endianness,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_vector_block(&mut out, x, y, z, order)?;
    Ok(out)
}
