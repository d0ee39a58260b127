use super::{CellType, UnstructuredMesh};
use crate::grid::GridBlock;
use log::debug;

/// Index offsets `(di, dj, dk)` of the eight corners of a hexahedral cell
///
/// The bottom face (`dk = 0`) runs counter-clockwise seen from the top face,
/// which is the node order of VTK hexahedra. All three block kinds have a
/// right handed index frame, so cells built from this table have positive
/// volume and outward facing faces.
pub const HEXAHEDRON_CORNERS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
];

/// Convert a block into a hexahedral mesh
///
/// Every index window `(i..=i+1, j..=j+1, k..=k+1)` becomes one cell; cells
/// are enumerated with `i` varying fastest. Nodes keep the block's flattened
/// order, so node `n` of the mesh is node `n` of the block.
pub fn to_unstructured(block: &GridBlock) -> UnstructuredMesh {
    let dims = block.dims();
    let [n0, n1, n2] = dims.extent();

    let mut connections = Vec::with_capacity(dims.cells() * HEXAHEDRON_CORNERS.len());

    for k in 0..n2 - 1 {
        for j in 0..n1 - 1 {
            for i in 0..n0 - 1 {
                for [di, dj, dk] in HEXAHEDRON_CORNERS {
                    // node counts are validated to fit in u32
                    connections.push(dims.index(i + di, j + dj, k + dk) as u32);
                }
            }
        }
    }

    let mesh = UnstructuredMesh::new(
        CellType::Hexahedron,
        block.coords().to_vec(),
        connections,
        block.values().clone(),
        block.range(),
        block.object_bounds(),
    );

    debug!(
        "converted the {} grid into {} hexahedra over {} nodes",
        block.kind(),
        mesh.cells(),
        mesh.nodes()
    );

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Dims, GridKind, Point, ShellGeometry};

    fn sub(a: Point, b: Point) -> Point {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn triple(a: Point, b: Point, c: Point) -> f32 {
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    #[test]
    fn cell_and_node_counts() {
        for (kind, dims) in [
            (GridKind::Yin, Dims::shell(3, 4, 5)),
            (GridKind::Yang, Dims::shell(2, 6, 3)),
            (GridKind::Zhong, Dims::cube(3, 4)),
        ] {
            let block = GridBlock::new(kind, dims, 1, ShellGeometry::default()).unwrap();
            let mesh = to_unstructured(&block);
            let [n0, n1, n2] = dims.extent();

            assert_eq!(mesh.nodes(), n0 * n1 * n2);
            assert_eq!(mesh.cells(), (n0 - 1) * (n1 - 1) * (n2 - 1));
            assert!(mesh.connections().iter().all(|&n| (n as usize) < mesh.nodes()));
        }
    }

    #[test]
    fn first_cell_winding() {
        let block =
            GridBlock::new(GridKind::Yin, Dims::shell(3, 3, 3), 1, ShellGeometry::default())
                .unwrap();
        let mesh = to_unstructured(&block);
        assert_eq!(mesh.cell(0), &[0, 1, 4, 3, 9, 10, 13, 12]);
        // second cell steps along the radial index
        assert_eq!(mesh.cell(1), &[1, 2, 5, 4, 10, 11, 14, 13]);
    }

    #[test]
    fn cells_have_positive_volume() {
        for (kind, dims) in [
            (GridKind::Yin, Dims::shell(3, 4, 5)),
            (GridKind::Yang, Dims::shell(3, 4, 5)),
            (GridKind::Zhong, Dims::cube(3, 3)),
        ] {
            let block = GridBlock::new(kind, dims, 1, ShellGeometry::default()).unwrap();
            let mesh = to_unstructured(&block);

            for c in 0..mesh.cells() {
                let cell = mesh.cell(c);
                let p = |n: usize| mesh.coords()[cell[n] as usize];
                let volume = triple(sub(p(1), p(0)), sub(p(3), p(0)), sub(p(4), p(0)));
                assert!(volume > 0.0, "{} cell {} has volume {}", kind, c, volume);
            }
        }
    }

    #[test]
    fn mesh_is_independent_of_block() {
        let mut block =
            GridBlock::new(GridKind::Zhong, Dims::cube(2, 2), 1, ShellGeometry::default())
                .unwrap();
        block.set_values(vec![1.0; 8]).unwrap();
        let mesh = to_unstructured(&block);

        block.set_values(vec![2.0; 8]).unwrap();
        assert!(mesh.values().iter().all(|&v| v == 1.0));
    }
}
