//! # Value loading
//!
//! Value files are headerless sequences of 32 bit floats, one per node (times
//! the vector length), in the same flattened order as the node coordinates:
//! the first index axis varies fastest. Files written by the simulation are
//! usually big endian; the byte order is part of the configuration and values
//! are converted to the host representation on load.

use crate::config::ValueSource;
use crate::grid::GridKind;
use crate::Error;

use byteorder::{BigEndian, ByteOrder as _, LittleEndian, NativeEndian};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Read, Seek, SeekFrom};

const VALUE_SIZE: usize = std::mem::size_of::<f32>();

/// Byte order of a value source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Little,
    Big,
    #[default]
    Native,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FormatError {
    #[error("expected {expected} values but the source only holds {found}")]
    ShortRead { expected: usize, found: usize },
    #[error("{kind} grid expects {expected} values, got {found}")]
    LengthMismatch {
        kind: GridKind,
        expected: usize,
        found: usize,
    },
    #[error("{len} values cannot be split into nodes of {veclen} components")]
    Shape { len: usize, veclen: usize },
    #[error("{kind} grid has no values loaded")]
    MissingValues { kind: GridKind },
    #[error("no finite isovalue in the Yin value range [{min}, {max}]")]
    NoIsovalue { min: f32, max: f32 },
}

/// Read exactly `count` values from `reader`, converting from `byte_order`
///
/// A source holding fewer than `count` values is a [`FormatError::ShortRead`].
/// Anything after the first `count` values is ignored.
pub fn read_values<R: Read>(
    mut reader: R,
    count: usize,
    byte_order: ByteOrder,
) -> Result<Vec<f32>, Error> {
    let expected_bytes = count * VALUE_SIZE;

    let mut bytes = Vec::with_capacity(expected_bytes);
    reader
        .by_ref()
        .take(expected_bytes as u64)
        .read_to_end(&mut bytes)?;

    if bytes.len() < expected_bytes {
        return Err(FormatError::ShortRead {
            expected: count,
            found: bytes.len() / VALUE_SIZE,
        }
        .into());
    }

    let mut probe = [0u8; 1];
    if reader.read(&mut probe)? > 0 {
        warn!("value source holds more than {} values, ignoring the rest", count);
    }

    let mut values = vec![0f32; count];

    match byte_order {
        ByteOrder::Little => LittleEndian::read_f32_into(&bytes, &mut values),
        ByteOrder::Big => BigEndian::read_f32_into(&bytes, &mut values),
        ByteOrder::Native => NativeEndian::read_f32_into(&bytes, &mut values),
    }

    Ok(values)
}

/// Open the file of `source`, skip its header and read `count` values
///
/// I/O failures are reported as [`Error::ValueFile`] with the offending path.
pub fn read_value_file(
    source: &ValueSource,
    count: usize,
    byte_order: ByteOrder,
) -> Result<Vec<f32>, Error> {
    let path = source.path.as_path();
    debug!("reading {} values from {}", count, path.display());

    let file = std::fs::File::open(path).map_err(|e| Error::value_file(path, e))?;
    let mut reader = BufReader::new(file);

    if source.offset > 0 {
        reader
            .seek(SeekFrom::Start(source.offset))
            .map_err(|e| Error::value_file(path, e))?;
    }

    read_values(reader, count, byte_order).map_err(|e| match e {
        Error::Io(e) => Error::value_file(path, e),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big_endian(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn big_endian_source() {
        let bytes = big_endian(&[1.0, -2.5, 3.25]);
        let values = read_values(bytes.as_slice(), 3, ByteOrder::Big).unwrap();
        assert_eq!(values, vec![1.0, -2.5, 3.25]);
    }

    #[test]
    fn little_endian_source() {
        let bytes: Vec<u8> = [0.5f32, 8.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        let values = read_values(bytes.as_slice(), 2, ByteOrder::Little).unwrap();
        assert_eq!(values, vec![0.5, 8.0]);
    }

    #[test]
    fn native_matches_host() {
        let bytes: Vec<u8> = [42.0f32].iter().flat_map(|v| v.to_ne_bytes()).collect();
        let values = read_values(bytes.as_slice(), 1, ByteOrder::Native).unwrap();
        assert_eq!(values, vec![42.0]);
    }

    #[test]
    fn short_source_is_format_error() {
        // two and a half values
        let mut bytes = big_endian(&[1.0, 2.0]);
        bytes.extend_from_slice(&[0, 0]);

        let err = read_values(bytes.as_slice(), 4, ByteOrder::Big).unwrap_err();
        match err {
            Error::Format(FormatError::ShortRead { expected, found }) => {
                assert_eq!(expected, 4);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn trailing_data_is_ignored() {
        let bytes = big_endian(&[1.0, 2.0, 3.0]);
        let values = read_values(bytes.as_slice(), 2, ByteOrder::Big).unwrap();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn missing_file_reports_path() {
        let source = ValueSource::new("/nonexistent/yyz/values.bin");
        let err = read_value_file(&source, 1, ByteOrder::Big).unwrap_err();
        match err {
            Error::ValueFile { path, .. } => {
                assert_eq!(path, std::path::PathBuf::from("/nonexistent/yyz/values.bin"))
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
