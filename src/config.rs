//! # Import configuration
//!
//! A [`ModelConfig`] describes one import of the overset grid: the node counts
//! shared by the blocks, the value file of each block and how to decode it.
//! It can be built in code or deserialized from JSON:
//!
//! ```text
//! {
//!     "dim_rad": 201, "dim_lat": 204, "dim_lon": 608, "dim_zhong": 160,
//!     "yin":   { "path": "data/yin.vx" },
//!     "yang":  { "path": "data/yang.vx" },
//!     "zhong": { "path": "data/zhong.vx", "offset": 4 },
//!     "byte_order": "big",
//!     "bounds_merge": "min_of_maxima"
//! }
//! ```

use crate::grid::{Dims, GridKind, ShellGeometry};
use crate::reconcile::BoundsMerge;
use crate::values::ByteOrder;
use crate::Error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("dimension `{name}` must be at least 2, got {value}")]
    Extent { name: &'static str, value: usize },
    #[error("vector length {veclen} is out of range for the {kind} grid")]
    VectorLength { kind: GridKind, veclen: usize },
    #[error("{kind} grid needs {expected} dimensions")]
    DimsMismatch {
        kind: GridKind,
        expected: &'static str,
    },
    #[error("expected a {expected} grid block, got {found}")]
    KindMismatch { expected: GridKind, found: GridKind },
    #[error("radial dimension of the {kind} grid ({found}) does not match the Yin grid ({expected})")]
    RadialMismatch {
        kind: GridKind,
        expected: usize,
        found: usize,
    },
    #[error("{kind} grid dims {found} do not match the Yin grid dims {expected}")]
    ShellMismatch {
        kind: GridKind,
        expected: Dims,
        found: Dims,
    },
    #[error("shell geometry of the {kind} grid does not match the Yin grid")]
    GeometryMismatch { kind: GridKind },
    #[error("{kind} grid has more nodes than a mesh can index")]
    TooManyNodes { kind: GridKind },
    #[error("invalid shell geometry: {0}")]
    Geometry(&'static str),
    #[error("{operation} is not supported for the {kind} grid")]
    UnsupportedKind {
        kind: GridKind,
        operation: &'static str,
    },
    #[error("line stride must be at least 1")]
    Stride,
}

/// Where to find the values of one block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSource {
    pub path: PathBuf,
    /// number of header bytes to skip before the first value
    #[serde(default)]
    pub offset: u64,
}

impl ValueSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            offset: 0,
        }
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub dim_rad: usize,
    pub dim_lat: usize,
    pub dim_lon: usize,
    pub dim_zhong: usize,
    pub yin: ValueSource,
    pub yang: ValueSource,
    pub zhong: ValueSource,
    #[serde(default)]
    pub byte_order: ByteOrder,
    #[serde(default)]
    pub geometry: ShellGeometry,
    #[serde(default)]
    pub bounds_merge: BoundsMerge,
}

impl ModelConfig {
    /// configuration with native byte order, default geometry and the default
    /// bounds merge
    pub fn new(
        dim_rad: usize,
        dim_lat: usize,
        dim_lon: usize,
        dim_zhong: usize,
        yin: ValueSource,
        yang: ValueSource,
        zhong: ValueSource,
    ) -> Self {
        Self {
            dim_rad,
            dim_lat,
            dim_lon,
            dim_zhong,
            yin,
            yang,
            zhong,
            byte_order: ByteOrder::default(),
            geometry: ShellGeometry::default(),
            bounds_merge: BoundsMerge::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = std::fs::File::open(path.as_ref())?;
        let reader = std::io::BufReader::new(file);
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    }

    pub fn shell_dims(&self) -> Dims {
        Dims::shell(self.dim_rad, self.dim_lat, self.dim_lon)
    }

    pub fn cube_dims(&self) -> Dims {
        Dims::cube(self.dim_rad, self.dim_zhong)
    }

    pub fn dims(&self, kind: GridKind) -> Dims {
        match kind {
            GridKind::Yin | GridKind::Yang => self.shell_dims(),
            GridKind::Zhong => self.cube_dims(),
        }
    }

    pub fn source(&self, kind: GridKind) -> &ValueSource {
        match kind {
            GridKind::Yin => &self.yin,
            GridKind::Yang => &self.yang,
            GridKind::Zhong => &self.zhong,
        }
    }

    /// check every dimension and the geometry without touching any file
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in GridKind::ALL {
            self.dims(kind).validate(kind)?;
        }
        self.geometry.validate()
    }
}
