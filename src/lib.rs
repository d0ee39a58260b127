#![doc = include_str!("../README.md")]

pub mod array;
pub mod config;
pub mod grid;
pub mod mesh;
pub mod model;
pub mod prelude;
pub mod reconcile;
pub mod values;
mod write_vtk;

pub use array::{Array, Numeric, Precision};

pub use config::{ConfigError, ModelConfig, ValueSource};

pub use grid::{Bounds, Dims, GridBlock, GridKind, Point, ShellGeometry, ValueRange, Values};

pub use mesh::{CellType, UnstructuredMesh};

pub use model::{Extraction, Model};

pub use reconcile::{reconcile, BoundsMerge, GlobalRange};

pub use values::{read_value_file, read_values, ByteOrder, FormatError};

pub use write_vtk::{close_inline_array_header, write_inline_array_header, write_inline_dataarray};
pub use write_vtk::{write_vtu, write_vtu_file, Encoding};

pub use ndarray;

pub use quick_xml::writer::Writer;

use std::path::PathBuf;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Could not read value file `{}`: {source}", path.display())]
    ValueFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed value data: {0}")]
    Format(#[from] FormatError),
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Could not write XML data to file: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
    #[error("Could not parse configuration: `{0}`")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn value_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::ValueFile {
            path: path.into(),
            source,
        }
    }
}
