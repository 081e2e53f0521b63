//! Reader/writer for NumPy `.npy` version 1.0 arrays of u8
//!
//! The `.npy` format is self-describing:
//! - 6 bytes: magic `\x93NUMPY`
//! - 2 bytes: format version (major, minor) — only 1.0 is supported here
//! - u16 (little-endian): header length
//! - Header: ASCII Python dict literal
//!   `{'descr': '|u1', 'fortran_order': False, 'shape': (N, F), }`
//!   space-padded and newline-terminated so the data start is 64-byte aligned
//! - Raw element bytes, C (row-major) order
//!
//! Keeping to the stock format means the dataset stays loadable with
//! `numpy.load` on the training side.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const DESCR_U8: &str = "|u1";
const HEADER_ALIGN: usize = 64;

/// A loaded u8 array: shape plus row-major element bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpyArray {
    pub shape: Vec<usize>,
    pub data: Vec<u8>,
}

impl NpyArray {
    /// Leading dimension (row count); 0 for an empty shape
    pub fn rows(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }
}

/// Read a u8 `.npy` array from disk.
///
/// Fails with [`Error::NotFound`] if the file is missing, [`Error::CorruptStore`]
/// for malformed or truncated files, and [`Error::TypeMismatch`] when the file
/// is a valid array of the wrong element type or memory order.
pub fn read_u8_array(path: &Path) -> Result<NpyArray> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let shape = read_header(&mut reader, path)?;
    let expected: usize = shape.iter().product();

    let mut data = Vec::with_capacity(expected);
    reader.read_to_end(&mut data)?;
    if data.len() != expected {
        return Err(Error::corrupt(
            path,
            format!(
                "payload is {} bytes but header shape {:?} needs {}",
                data.len(),
                shape,
                expected
            ),
        ));
    }

    Ok(NpyArray { shape, data })
}

/// Read only the shape of a u8 `.npy` array, without its payload
pub fn read_shape(path: &Path) -> Result<Vec<usize>> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read_header(&mut reader, path)
}

/// Write a u8 array to disk, replacing any existing file.
///
/// `data.len()` must equal the product of `shape`.
pub fn write_u8_array(path: &Path, shape: &[usize], data: &[u8]) -> Result<()> {
    let expected: usize = shape.iter().product();
    if data.len() != expected {
        return Err(Error::corrupt(
            path,
            format!("refusing to write {} bytes as shape {:?}", data.len(), shape),
        ));
    }

    let header = format_header(shape);
    let mut file = File::create(path)?;
    file.write_all(MAGIC)?;
    file.write_all(&[1, 0])?;
    file.write_all(&(header.len() as u16).to_le_bytes())?;
    file.write_all(header.as_bytes())?;
    file.write_all(data)?;
    file.flush()?;
    Ok(())
}

/// Parse the magic, version, and header dict; returns the array shape
fn read_header<R: Read>(reader: &mut R, path: &Path) -> Result<Vec<usize>> {
    let mut magic = [0u8; 6];
    reader
        .read_exact(&mut magic)
        .map_err(|_| Error::corrupt(path, "file too short for npy magic"))?;
    if &magic != MAGIC {
        return Err(Error::corrupt(path, "bad npy magic"));
    }

    let mut version = [0u8; 2];
    reader
        .read_exact(&mut version)
        .map_err(|_| Error::corrupt(path, "file too short for npy version"))?;
    if version != [1, 0] {
        return Err(Error::corrupt(
            path,
            format!("unsupported npy version {}.{}", version[0], version[1]),
        ));
    }

    let mut len_bytes = [0u8; 2];
    reader
        .read_exact(&mut len_bytes)
        .map_err(|_| Error::corrupt(path, "file too short for header length"))?;
    let header_len = u16::from_le_bytes(len_bytes) as usize;

    let mut header = vec![0u8; header_len];
    reader
        .read_exact(&mut header)
        .map_err(|_| Error::corrupt(path, "truncated npy header"))?;
    let header = std::str::from_utf8(&header)
        .map_err(|_| Error::corrupt(path, "npy header is not valid ASCII"))?;

    let descr = dict_str_value(header, "descr")
        .ok_or_else(|| Error::corrupt(path, "npy header missing 'descr'"))?;
    if descr != DESCR_U8 {
        return Err(Error::TypeMismatch {
            path: path.to_path_buf(),
            expected: format!("dtype {}", DESCR_U8),
            actual: format!("dtype {}", descr),
        });
    }

    match dict_bool_value(header, "fortran_order") {
        Some(false) => {}
        Some(true) => {
            return Err(Error::TypeMismatch {
                path: path.to_path_buf(),
                expected: "C-order array".to_string(),
                actual: "Fortran-order array".to_string(),
            })
        }
        None => return Err(Error::corrupt(path, "npy header missing 'fortran_order'")),
    }

    parse_shape(header, path)
}

/// Extract the quoted string value for `key` from the header dict
fn dict_str_value<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let rest = value_after_key(header, key)?;
    let quote = rest.chars().next()?;
    if quote != '\'' && quote != '"' {
        return None;
    }
    let rest = &rest[1..];
    let end = rest.find(quote)?;
    Some(&rest[..end])
}

/// Extract the True/False value for `key` from the header dict
fn dict_bool_value(header: &str, key: &str) -> Option<bool> {
    let rest = value_after_key(header, key)?;
    if rest.starts_with("True") {
        Some(true)
    } else if rest.starts_with("False") {
        Some(false)
    } else {
        None
    }
}

/// Slice of the header just past `'key':`, with leading spaces trimmed
fn value_after_key<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let marker = format!("'{}'", key);
    let pos = header.find(&marker)?;
    let rest = &header[pos + marker.len()..];
    let rest = rest.trim_start();
    let rest = rest.strip_prefix(':')?;
    Some(rest.trim_start())
}

/// Parse the `(a, b, ...)` shape tuple
fn parse_shape(header: &str, path: &Path) -> Result<Vec<usize>> {
    let rest = value_after_key(header, "shape")
        .ok_or_else(|| Error::corrupt(path, "npy header missing 'shape'"))?;
    let rest = rest
        .strip_prefix('(')
        .ok_or_else(|| Error::corrupt(path, "npy shape is not a tuple"))?;
    let end = rest
        .find(')')
        .ok_or_else(|| Error::corrupt(path, "unterminated npy shape tuple"))?;

    let mut shape = Vec::new();
    for part in rest[..end].split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let dim = part
            .parse::<usize>()
            .map_err(|_| Error::corrupt(path, format!("bad shape dimension '{}'", part)))?;
        shape.push(dim);
    }
    Ok(shape)
}

/// Format the header dict for `shape`, padded so data starts 64-byte aligned
fn format_header(shape: &[usize]) -> String {
    let shape_str = match shape.len() {
        1 => format!("({},)", shape[0]),
        _ => {
            let dims: Vec<String> = shape.iter().map(ToString::to_string).collect();
            format!("({})", dims.join(", "))
        }
    };
    let mut header = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': {}, }}",
        DESCR_U8, shape_str
    );

    // magic + version + u16 length prefix
    let preamble = MAGIC.len() + 2 + 2;
    let unpadded = preamble + header.len() + 1;
    let padding = (HEADER_ALIGN - unpadded % HEADER_ALIGN) % HEADER_ALIGN;
    header.extend(std::iter::repeat(' ').take(padding));
    header.push('\n');
    header
}
