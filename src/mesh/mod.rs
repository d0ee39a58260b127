//! # Unstructured meshes
//!
//! An [`UnstructuredMesh`] is an explicit node list plus cell connectivity,
//! independent of the structured index space of the block it came from. It is
//! the representation handed to generic algorithms (isosurfaces, external
//! faces, cell-by-cell particle sampling) and written to `.vtu` files.
//!
//! Meshes never alias the block they were built from: coordinates and values
//! are copied, so a mesh stays valid after the block is dropped.
//!
//! * [`to_unstructured`] turns every index window of a block into a hexahedron.
//! * [`outline`] and [`shell_lines`] build line meshes for drawing a block's
//!   edges and the grid lines on its outer shell.

mod hexahedra;
mod lines;

pub use hexahedra::{to_unstructured, HEXAHEDRON_CORNERS};
pub use lines::{outline, shell_lines};

use crate::grid::{Bounds, Point, ValueRange, Values};
use std::fmt;

/// Shape of the cells of a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    Hexahedron,
    Line,
}

impl CellType {
    pub fn nodes_per_cell(&self) -> usize {
        match self {
            CellType::Hexahedron => 8,
            CellType::Line => 2,
        }
    }

    /// cell type id used by the VTK file formats
    pub fn vtk_id(&self) -> u8 {
        match self {
            CellType::Hexahedron => 12,
            CellType::Line => 3,
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellType::Hexahedron => f.write_str("hexahedral"),
            CellType::Line => f.write_str("line"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnstructuredMesh {
    cell_type: CellType,
    coords: Vec<Point>,
    connections: Vec<u32>,
    values: Values,
    range: ValueRange,
    bounds: Bounds,
}

impl UnstructuredMesh {
    pub(crate) fn new(
        cell_type: CellType,
        coords: Vec<Point>,
        connections: Vec<u32>,
        values: Values,
        range: ValueRange,
        bounds: Bounds,
    ) -> Self {
        debug_assert_eq!(connections.len() % cell_type.nodes_per_cell(), 0);
        Self {
            cell_type,
            coords,
            connections,
            values,
            range,
            bounds,
        }
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn nodes(&self) -> usize {
        self.coords.len()
    }

    pub fn cells(&self) -> usize {
        self.connections.len() / self.cell_type.nodes_per_cell()
    }

    pub fn coords(&self) -> &[Point] {
        &self.coords
    }

    /// flat connectivity, `nodes_per_cell` node indices per cell
    pub fn connections(&self) -> &[u32] {
        &self.connections
    }

    /// node indices of cell `n`
    pub fn cell(&self, n: usize) -> &[u32] {
        let per_cell = self.cell_type.nodes_per_cell();
        &self.connections[n * per_cell..(n + 1) * per_cell]
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn veclen(&self) -> usize {
        self.values.veclen()
    }

    /// true if every node carries a value
    pub fn has_values(&self) -> bool {
        self.values.nodes() == self.coords.len() && !self.coords.is_empty()
    }

    /// value range inherited from the source block
    pub fn range(&self) -> ValueRange {
        self.range
    }

    /// bounds inherited from the source block
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}
