//! Common traits and types that are useful for working with `yyz`
#![allow(unused_imports)]

pub use crate::grid::{Bounds, Dims, GridBlock, GridKind, Point, ShellGeometry, ValueRange};
pub use crate::mesh::{CellType, UnstructuredMesh};
pub use crate::model::Model;
pub use crate::reconcile::{reconcile, BoundsMerge};
pub use crate::array::{Array, Numeric, Precision};

pub(crate) use crate::{ConfigError, Error, FormatError};
pub(crate) use std::io::Write;

pub(crate) use derive_more::{Deref, Into};
pub(crate) use log::{debug, info, warn};

pub(crate) use ndarray::{Array2, ArrayView1};
