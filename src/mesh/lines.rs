use super::{CellType, UnstructuredMesh};
use crate::config::ConfigError;
use crate::grid::{GridBlock, Point, Values};
use log::debug;
use std::collections::HashMap;

/// Collects line segments over a subset of a block's nodes, emitting each
/// referenced node once
struct LineBuilder<'a> {
    block: &'a GridBlock,
    remap: HashMap<usize, u32>,
    sources: Vec<usize>,
    coords: Vec<Point>,
    connections: Vec<u32>,
}

impl<'a> LineBuilder<'a> {
    fn new(block: &'a GridBlock) -> Self {
        Self {
            block,
            remap: HashMap::new(),
            sources: Vec::new(),
            coords: Vec::new(),
            connections: Vec::new(),
        }
    }

    fn node(&mut self, index: usize) -> u32 {
        if let Some(&n) = self.remap.get(&index) {
            return n;
        }
        let n = self.coords.len() as u32;
        self.remap.insert(index, n);
        self.sources.push(index);
        self.coords.push(self.block.coords()[index]);
        n
    }

    /// connect consecutive nodes of a polyline with line cells
    fn polyline<I: IntoIterator<Item = usize>>(&mut self, indices: I) {
        let mut previous: Option<u32> = None;
        for index in indices {
            let current = self.node(index);
            if let Some(previous) = previous {
                self.connections.push(previous);
                self.connections.push(current);
            }
            previous = Some(current);
        }
    }

    fn finish(self) -> UnstructuredMesh {
        let block = self.block;
        let values = if block.has_values() {
            let sources = &self.sources;
            Values::from_shape_fn(sources.len(), block.veclen(), |(n, c)| {
                block.values()[[sources[n], c]]
            })
        } else {
            Values::empty(block.veclen())
        };

        UnstructuredMesh::new(
            CellType::Line,
            self.coords,
            self.connections,
            values,
            block.range(),
            block.object_bounds(),
        )
    }
}

/// The twelve edges of a block's index box as line cells
///
/// The edges follow the grid, so for the shell blocks they are curved.
pub fn outline(block: &GridBlock) -> UnstructuredMesh {
    let dims = block.dims();
    let extent = dims.extent();
    let mut builder = LineBuilder::new(block);

    for axis in 0..3 {
        let (b, c) = ((axis + 1) % 3, (axis + 2) % 3);
        for sb in [0, extent[b] - 1] {
            for sc in [0, extent[c] - 1] {
                builder.polyline((0..extent[axis]).map(|t| {
                    let mut ijk = [0usize; 3];
                    ijk[axis] = t;
                    ijk[b] = sb;
                    ijk[c] = sc;
                    dims.index(ijk[0], ijk[1], ijk[2])
                }));
            }
        }
    }

    let mesh = builder.finish();
    debug!(
        "built the outline of the {} grid: {} segments",
        block.kind(),
        mesh.cells()
    );
    mesh
}

/// Latitude and longitude lines on the outer shell of a Yin or Yang block
///
/// Lines are drawn at every `stride`-th latitude and longitude index, and
/// always at the last one so the boundary of the shell is closed.
pub fn shell_lines(block: &GridBlock, stride: usize) -> Result<UnstructuredMesh, ConfigError> {
    if !block.kind().is_shell() {
        return Err(ConfigError::UnsupportedKind {
            kind: block.kind(),
            operation: "shell grid lines",
        });
    }
    if stride == 0 {
        return Err(ConfigError::Stride);
    }

    let dims = block.dims();
    let [n_rad, n_lat, n_lon] = dims.extent();
    let outer = n_rad - 1;
    let mut builder = LineBuilder::new(block);

    // lines of constant longitude
    for k in strided(n_lon, stride) {
        builder.polyline((0..n_lat).map(|j| dims.index(outer, j, k)));
    }

    // lines of constant latitude
    for j in strided(n_lat, stride) {
        builder.polyline((0..n_lon).map(|k| dims.index(outer, j, k)));
    }

    let mesh = builder.finish();
    debug!(
        "built shell lines of the {} grid (stride {}): {} segments",
        block.kind(),
        stride,
        mesh.cells()
    );
    Ok(mesh)
}

fn strided(n: usize, stride: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).step_by(stride).collect();
    if indices.last() != Some(&(n - 1)) {
        indices.push(n - 1);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Dims, GridKind, ShellGeometry};
    use approx::assert_relative_eq;

    fn block(kind: GridKind, dims: Dims) -> GridBlock {
        let mut block = GridBlock::new(kind, dims, 1, ShellGeometry::default()).unwrap();
        let values = (0..dims.nodes()).map(|v| v as f32).collect();
        block.set_values(values).unwrap();
        block
    }

    #[test]
    fn outline_counts() {
        let dims = Dims::shell(3, 4, 5);
        let mesh = outline(&block(GridKind::Yin, dims));

        assert_eq!(mesh.cell_type(), CellType::Line);
        assert_eq!(mesh.cells(), 4 * (2 + 3 + 4));
        assert_eq!(mesh.nodes(), 4 * (1 + 2 + 3) + 8);
        assert!(mesh.connections().iter().all(|&n| (n as usize) < mesh.nodes()));
    }

    #[test]
    fn outline_carries_source_values() {
        let dims = Dims::cube(2, 3);
        let source = block(GridKind::Zhong, dims);
        let mesh = outline(&source);

        for (n, coord) in mesh.coords().iter().enumerate() {
            let index = source.coords().iter().position(|c| c == coord).unwrap();
            assert_eq!(mesh.values()[[n, 0]], index as f32);
        }
    }

    #[test]
    fn shell_lines_on_outer_radius() {
        let dims = Dims::shell(3, 5, 7);
        let source = block(GridKind::Yang, dims);
        let mesh = shell_lines(&source, 2).unwrap();

        // longitude indices 0 2 4 6, latitude indices 0 2 4
        assert_eq!(mesh.cells(), 4 * 4 + 3 * 6);

        let r_max = source.geometry().r_max;
        for p in mesh.coords() {
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert_relative_eq!(r, r_max, epsilon = 1e-5);
        }
    }

    #[test]
    fn shell_lines_close_the_boundary() {
        assert_eq!(strided(5, 3), vec![0, 3, 4]);
        assert_eq!(strided(4, 3), vec![0, 3]);
        assert_eq!(strided(2, 1), vec![0, 1]);
    }

    #[test]
    fn shell_lines_rejects_core_and_zero_stride() {
        let zhong = block(GridKind::Zhong, Dims::cube(2, 2));
        assert!(matches!(
            shell_lines(&zhong, 1),
            Err(ConfigError::UnsupportedKind { kind: GridKind::Zhong, .. })
        ));

        let yin = block(GridKind::Yin, Dims::shell(2, 2, 2));
        assert_eq!(shell_lines(&yin, 0).unwrap_err(), ConfigError::Stride);
    }
}
