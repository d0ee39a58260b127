//! # Grid blocks
//!
//! A [`GridBlock`] is one structured sub-grid of the Yin-Yang-Zhong overset
//! grid. The two shell blocks (Yin and Yang) are indexed by
//! `(radius, latitude, longitude)`, the Zhong core by `(x, y, z)` on a cube.
//!
//! The node coordinates of a block are computed when the block is created and
//! never change. Values are loaded afterwards, either from a binary source with
//! [`GridBlock::load_values`] or from memory with [`GridBlock::set_values`].
//! Loading values records the block's local value range, which is later
//! overwritten by [reconciliation](crate::reconcile()) while
//! [`GridBlock::local_range`] keeps the original.

mod bounds;
mod coords;
mod geometry;

pub use bounds::{Bounds, ValueRange};
pub use geometry::{spherical, ShellGeometry};

use crate::prelude::*;
use crate::values::{self, ByteOrder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

/// A point in 3D space
pub type Point = [f32; 3];

/// The three blocks of the overset grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridKind {
    Yin,
    Yang,
    Zhong,
}

impl GridKind {
    pub const ALL: [GridKind; 3] = [GridKind::Yin, GridKind::Yang, GridKind::Zhong];

    pub fn name(&self) -> &'static str {
        match self {
            GridKind::Yin => "Yin",
            GridKind::Yang => "Yang",
            GridKind::Zhong => "Zhong",
        }
    }

    pub fn is_shell(&self) -> bool {
        matches!(self, GridKind::Yin | GridKind::Yang)
    }
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Index extents of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dims {
    /// spherical shell (Yin / Yang): radial, latitude and longitude node counts
    Shell { rad: usize, lat: usize, lon: usize },
    /// Cartesian core (Zhong): the radial node count of the shells it sits in and
    /// the node count along each cube edge
    Cube { rad: usize, edge: usize },
}

impl Dims {
    pub fn shell(rad: usize, lat: usize, lon: usize) -> Self {
        Dims::Shell { rad, lat, lon }
    }

    pub fn cube(rad: usize, edge: usize) -> Self {
        Dims::Cube { rad, edge }
    }

    /// node counts along the three index axes, fastest varying first
    pub fn extent(&self) -> [usize; 3] {
        match *self {
            Dims::Shell { rad, lat, lon } => [rad, lat, lon],
            Dims::Cube { edge, .. } => [edge, edge, edge],
        }
    }

    pub fn rad(&self) -> usize {
        match *self {
            Dims::Shell { rad, .. } | Dims::Cube { rad, .. } => rad,
        }
    }

    pub fn nodes(&self) -> usize {
        self.extent().iter().product()
    }

    /// number of hexahedral index windows
    pub fn cells(&self) -> usize {
        self.extent().iter().map(|n| n.saturating_sub(1)).product()
    }

    /// flattened node index of `(i, j, k)`
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        let [n0, n1, _] = self.extent();
        i + n0 * (j + n1 * k)
    }

    pub(crate) fn validate(&self, kind: GridKind) -> Result<(), ConfigError> {
        match (kind.is_shell(), self) {
            (true, Dims::Cube { .. }) => {
                return Err(ConfigError::DimsMismatch {
                    kind,
                    expected: "shell (rad, lat, lon)",
                })
            }
            (false, Dims::Shell { .. }) => {
                return Err(ConfigError::DimsMismatch {
                    kind,
                    expected: "cube (rad, edge)",
                })
            }
            _ => (),
        }

        let named: Vec<(&'static str, usize)> = match *self {
            Dims::Shell { rad, lat, lon } => vec![("dim_rad", rad), ("dim_lat", lat), ("dim_lon", lon)],
            Dims::Cube { rad, edge } => vec![("dim_rad", rad), ("dim_zhong", edge)],
        };

        for (name, value) in named {
            if value < 2 {
                return Err(ConfigError::Extent { name, value });
            }
        }

        let nodes = self
            .extent()
            .iter()
            .try_fold(1usize, |acc, n| acc.checked_mul(*n));

        match nodes {
            Some(nodes) if nodes <= u32::MAX as usize => Ok(()),
            _ => Err(ConfigError::TooManyNodes { kind }),
        }
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dims::Shell { rad, lat, lon } => write!(f, "{} x {} x {} (rad x lat x lon)", rad, lat, lon),
            Dims::Cube { rad, edge } => write!(f, "{0} x {0} x {0} (cube, rad = {1})", edge, rad),
        }
    }
}

/// Node values of a block, one row per node and `veclen` columns
#[derive(Deref, Into, Clone, PartialEq, Debug)]
pub struct Values(Array2<f32>);

impl Values {
    pub fn empty(veclen: usize) -> Self {
        Self(Array2::zeros((0, veclen)))
    }

    /// build from node-major data (`veclen` consecutive components per node)
    pub fn from_vec(data: Vec<f32>, veclen: usize) -> Result<Self, FormatError> {
        let len = data.len();
        if veclen == 0 || len % veclen != 0 {
            return Err(FormatError::Shape { len, veclen });
        }
        Array2::from_shape_vec((len / veclen, veclen), data)
            .map(Self)
            .map_err(|_| FormatError::Shape { len, veclen })
    }

    pub(crate) fn from_shape_fn<F>(nodes: usize, veclen: usize, f: F) -> Self
    where
        F: FnMut((usize, usize)) -> f32,
    {
        Self(Array2::from_shape_fn((nodes, veclen), f))
    }

    pub fn veclen(&self) -> usize {
        self.0.ncols()
    }

    pub fn nodes(&self) -> usize {
        self.0.nrows()
    }

    /// all components of node `n`
    pub fn node(&self, n: usize) -> ArrayView1<'_, f32> {
        self.0.row(n)
    }

    pub fn range(&self) -> ValueRange {
        ValueRange::of(self.0.iter())
    }
}

/// One structured block (Yin, Yang or Zhong) of the overset grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridBlock {
    kind: GridKind,
    dims: Dims,
    geometry: ShellGeometry,
    coords: Vec<Point>,
    values: Values,
    local_range: ValueRange,
    range: ValueRange,
    object_bounds: Bounds,
    external_bounds: Bounds,
}

impl GridBlock {
    /// Create a block and compute the coordinates of all of its nodes.
    ///
    /// The block starts without values; its bounds are the bounding box of its
    /// own nodes.
    pub fn new(
        kind: GridKind,
        dims: Dims,
        veclen: usize,
        geometry: ShellGeometry,
    ) -> Result<Self, ConfigError> {
        dims.validate(kind)?;
        geometry.validate()?;
        // the value array must stay addressable in bytes
        let bytes = dims
            .nodes()
            .checked_mul(veclen)
            .and_then(|count| count.checked_mul(std::mem::size_of::<f32>()));
        if veclen == 0 || !matches!(bytes, Some(bytes) if bytes <= isize::MAX as usize) {
            return Err(ConfigError::VectorLength { kind, veclen });
        }

        let coords = coords::generate(kind, &dims, &geometry);
        let bounds = Bounds::of_points(&coords);

        Ok(Self {
            kind,
            dims,
            geometry,
            coords,
            values: Values::empty(veclen),
            local_range: ValueRange::EMPTY,
            range: ValueRange::EMPTY,
            object_bounds: bounds,
            external_bounds: bounds,
        })
    }

    /// Read `nodes * veclen` values from `reader` (see [`values::read_values`])
    pub fn load_values<R: Read>(&mut self, reader: R, byte_order: ByteOrder) -> Result<(), Error> {
        let data = values::read_values(reader, self.value_count(), byte_order)?;
        self.set_values(data)?;
        Ok(())
    }

    /// Replace the node values and recompute the local value range
    pub fn set_values(&mut self, data: Vec<f32>) -> Result<(), FormatError> {
        let expected = self.value_count();
        if data.len() != expected {
            return Err(FormatError::LengthMismatch {
                kind: self.kind,
                expected,
                found: data.len(),
            });
        }

        self.values = Values::from_vec(data, self.veclen())?;
        self.update_min_max_values();
        self.local_range = self.range;

        debug!("{} grid value range: [{}, {}]", self.kind, self.range.min, self.range.max);

        Ok(())
    }

    /// recompute the value range from the node values
    pub fn update_min_max_values(&mut self) {
        self.range = self.values.range();
    }

    /// recompute the object and external bounds from the node coordinates
    pub fn update_min_max_coords(&mut self) {
        let bounds = Bounds::of_points(&self.coords);
        self.set_min_max_coords(bounds);
    }

    pub fn set_min_max_values(&mut self, range: ValueRange) {
        self.range = range;
    }

    /// set both the object space and external space bounds
    pub fn set_min_max_coords(&mut self, bounds: Bounds) {
        self.object_bounds = bounds;
        self.external_bounds = bounds;
    }

    pub fn kind(&self) -> GridKind {
        self.kind
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn geometry(&self) -> &ShellGeometry {
        &self.geometry
    }

    pub fn veclen(&self) -> usize {
        self.values.veclen()
    }

    pub fn nodes(&self) -> usize {
        self.coords.len()
    }

    pub fn cells(&self) -> usize {
        self.dims.cells()
    }

    /// number of scalars the value array holds once loaded
    pub fn value_count(&self) -> usize {
        self.nodes() * self.veclen()
    }

    pub fn has_values(&self) -> bool {
        self.values.nodes() == self.nodes()
    }

    pub fn coords(&self) -> &[Point] {
        &self.coords
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn coord_at(&self, i: usize, j: usize, k: usize) -> Point {
        self.coords[self.dims.index(i, j, k)]
    }

    /// component `c` of the value at node `(i, j, k)`
    pub fn value_at(&self, i: usize, j: usize, k: usize, c: usize) -> f32 {
        self.values[[self.dims.index(i, j, k), c]]
    }

    /// value range computed when the values were loaded, never reconciled
    pub fn local_range(&self) -> ValueRange {
        self.local_range
    }

    /// current value range (global once the block has been reconciled)
    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn min_value(&self) -> f32 {
        self.range.min
    }

    pub fn max_value(&self) -> f32 {
        self.range.max
    }

    pub fn object_bounds(&self) -> Bounds {
        self.object_bounds
    }

    pub fn external_bounds(&self) -> Bounds {
        self.external_bounds
    }
}

impl fmt::Display for GridBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} grid", self.kind)?;
        writeln!(f, "    dims: {}", self.dims)?;
        writeln!(f, "    vector length: {}", self.veclen())?;
        writeln!(f, "    number of nodes: {}", self.nodes())?;
        writeln!(f, "    number of cells: {}", self.cells())?;
        writeln!(f, "    min value: {}", self.range.min)?;
        writeln!(f, "    max value: {}", self.range.max)?;
        writeln!(f, "    min coord: {:?}", self.object_bounds.min)?;
        write!(f, "    max coord: {:?}", self.object_bounds.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yin(rad: usize, lat: usize, lon: usize) -> GridBlock {
        GridBlock::new(GridKind::Yin, Dims::shell(rad, lat, lon), 1, ShellGeometry::default())
            .unwrap()
    }

    #[test]
    fn sizes_match_dims() {
        for (dims, kind) in [
            (Dims::shell(3, 4, 5), GridKind::Yin),
            (Dims::shell(2, 2, 7), GridKind::Yang),
            (Dims::cube(5, 4), GridKind::Zhong),
        ] {
            for veclen in [1, 3] {
                let mut block = GridBlock::new(kind, dims, veclen, ShellGeometry::default()).unwrap();
                assert_eq!(block.coords().len(), dims.nodes());

                block.set_values(vec![1.0; dims.nodes() * veclen]).unwrap();
                assert_eq!(block.values().len(), dims.nodes() * veclen);
                assert_eq!(block.values().nodes(), dims.nodes());
            }
        }
    }

    #[test]
    fn flattening_is_first_axis_fastest() {
        let dims = Dims::shell(3, 4, 5);
        assert_eq!(dims.index(1, 0, 0), 1);
        assert_eq!(dims.index(0, 1, 0), 3);
        assert_eq!(dims.index(0, 0, 1), 12);
        assert_eq!(dims.index(2, 3, 4), dims.nodes() - 1);
    }

    #[test]
    fn rejects_degenerate_dims() {
        let err = GridBlock::new(GridKind::Yin, Dims::shell(3, 0, 5), 1, ShellGeometry::default())
            .unwrap_err();
        assert_eq!(err, ConfigError::Extent { name: "dim_lat", value: 0 });

        let err = GridBlock::new(GridKind::Zhong, Dims::cube(3, 1), 1, ShellGeometry::default())
            .unwrap_err();
        assert_eq!(err, ConfigError::Extent { name: "dim_zhong", value: 1 });
    }

    #[test]
    fn rejects_mismatched_kind() {
        let err = GridBlock::new(GridKind::Zhong, Dims::shell(3, 3, 3), 1, ShellGeometry::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::DimsMismatch { kind: GridKind::Zhong, .. }));
    }

    #[test]
    fn rejects_zero_veclen() {
        let err = GridBlock::new(GridKind::Yin, Dims::shell(3, 3, 3), 0, ShellGeometry::default())
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::VectorLength {
                kind: GridKind::Yin,
                veclen: 0
            }
        );
    }

    #[test]
    fn rejects_oversized_veclen() {
        for veclen in [usize::MAX, usize::MAX / 8, isize::MAX as usize / 4] {
            let dims = Dims::shell(2, 2, 2);
            let err = GridBlock::new(GridKind::Yin, dims, veclen, ShellGeometry::default())
                .unwrap_err();
            assert_eq!(err, ConfigError::VectorLength { kind: GridKind::Yin, veclen });
        }

        let block =
            GridBlock::new(GridKind::Yin, Dims::shell(2, 2, 2), 3, ShellGeometry::default())
                .unwrap();
        assert_eq!(block.value_count(), 24);
    }

    #[test]
    fn rejects_wrong_value_count() {
        let mut block = yin(3, 3, 3);
        let err = block.set_values(vec![0.0; 26]).unwrap_err();
        assert!(matches!(err, FormatError::LengthMismatch { expected: 27, found: 26, .. }));
        assert!(!block.has_values());
    }

    #[test]
    fn local_range_survives_broadcast() {
        let mut block = yin(2, 2, 2);
        block.set_values((0..8).map(|v| v as f32).collect()).unwrap();
        assert_eq!(block.range(), ValueRange::new(0.0, 7.0));

        block.set_min_max_values(ValueRange::new(-1.0, 100.0));
        assert_eq!(block.min_value(), -1.0);
        assert_eq!(block.local_range(), ValueRange::new(0.0, 7.0));
    }

    #[test]
    fn load_big_endian_values() {
        let mut block = yin(2, 2, 2);
        let bytes: Vec<u8> = (0..8).flat_map(|v| (v as f32 * 0.5).to_be_bytes()).collect();

        block.load_values(bytes.as_slice(), ByteOrder::Big).unwrap();
        assert_eq!(block.value_at(1, 1, 1, 0), 3.5);
        assert_eq!(block.local_range(), ValueRange::new(0.0, 3.5));

        let err = block.load_values(&bytes[..12], ByteOrder::Big).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::ShortRead { expected: 8, found: 3 })));
    }

    #[test]
    fn value_lookup() {
        let mut block = yin(2, 3, 2);
        block.set_values((0..12).map(|v| v as f32).collect()).unwrap();
        assert_eq!(block.value_at(1, 2, 1, 0), 11.0);
        assert_eq!(block.value_at(0, 1, 0, 0), 2.0);
    }

    #[test]
    fn summary_mentions_kind_and_dims() {
        let block = yin(3, 4, 5);
        let summary = block.to_string();
        assert!(summary.starts_with("Yin grid"));
        assert!(summary.contains("3 x 4 x 5"));
        assert!(summary.contains("number of nodes: 60"));
    }
}
