//! # Coordinate generation
//!
//! Every block maps its node index `(i, j, k)` to a Cartesian point. Nodes are
//! flattened with `i` varying fastest, then `j`, then `k`, and the value arrays
//! read from disk follow the same order.
//!
//! * Yin: `i` is radial, `j` latitude (colatitude measured from +z), `k` longitude.
//! * Yang: the Yin mapping followed by the rotation `(x, y, z) -> (-x, z, y)`.
//!   The rotation is its own inverse and has determinant +1, so the local frame
//!   stays right handed. It moves the local poles (+-z) onto the global +-y axis,
//!   which sits on Yin's equator, and the other way around.
//! * Zhong: a uniform cube centered at the origin. Its half-edge is
//!   `r_min + dr`, with `dr` the radial step of the shells, so the radial node
//!   count is part of the core's geometry.

use super::{Dims, GridKind, Point, ShellGeometry};
use log::debug;

impl GridKind {
    /// map a point from this block's local frame into the global frame
    pub fn to_global(&self, local: Point) -> Point {
        match self {
            GridKind::Yang => yang_rotation(local),
            GridKind::Yin | GridKind::Zhong => local,
        }
    }

    /// map a global point into this block's local frame
    pub fn to_local(&self, global: Point) -> Point {
        match self {
            GridKind::Yang => yang_rotation(global),
            GridKind::Yin | GridKind::Zhong => global,
        }
    }

    /// local spherical angles `(r, theta, phi)` of a global point
    pub fn local_angles(&self, global: Point) -> (f32, f32, f32) {
        super::geometry::spherical(self.to_local(global))
    }

    /// the global directions where this block's spherical parameterization is
    /// singular (its local north and south poles), `None` for the Cartesian core
    pub fn singular_directions(&self) -> Option<[Point; 2]> {
        match self {
            GridKind::Zhong => None,
            _ => Some([
                self.to_global([0.0, 0.0, 1.0]),
                self.to_global([0.0, 0.0, -1.0]),
            ]),
        }
    }
}

fn yang_rotation(p: Point) -> Point {
    [-p[0], p[2], p[1]]
}

/// Node spacing along each index axis of a block
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Spacing {
    origin: [f32; 3],
    step: [f32; 3],
}

impl Spacing {
    pub(crate) fn new(kind: GridKind, dims: &Dims, geometry: &ShellGeometry) -> Self {
        let [n0, n1, n2] = dims.extent();
        let steps = |from: f32, to: f32, n: usize| (to - from) / (n - 1) as f32;

        match kind {
            GridKind::Yin | GridKind::Yang => {
                let (theta_from, theta_to) = geometry.theta_range();
                let (phi_from, phi_to) = geometry.phi_range();
                Spacing {
                    origin: [geometry.r_min, theta_from, phi_from],
                    step: [
                        geometry.radial_step(n0),
                        steps(theta_from, theta_to, n1),
                        steps(phi_from, phi_to, n2),
                    ],
                }
            }
            GridKind::Zhong => {
                let h = geometry.zhong_half_edge(dims.rad());
                Spacing {
                    origin: [-h; 3],
                    step: [steps(-h, h, n0), steps(-h, h, n1), steps(-h, h, n2)],
                }
            }
        }
    }

    fn at(&self, axis: usize, index: usize) -> f32 {
        self.origin[axis] + index as f32 * self.step[axis]
    }
}

/// coordinate of node `(i, j, k)` in the global frame
pub(crate) fn node_coord(kind: GridKind, spacing: &Spacing, i: usize, j: usize, k: usize) -> Point {
    let a = spacing.at(0, i);
    let b = spacing.at(1, j);
    let c = spacing.at(2, k);

    match kind {
        GridKind::Zhong => [a, b, c],
        GridKind::Yin | GridKind::Yang => {
            let (r, theta, phi) = (a, b, c);
            let local = [
                r * theta.sin() * phi.cos(),
                r * theta.sin() * phi.sin(),
                r * theta.cos(),
            ];
            kind.to_global(local)
        }
    }
}

/// coordinates of every node of a block, in flattened order
pub(crate) fn generate(kind: GridKind, dims: &Dims, geometry: &ShellGeometry) -> Vec<Point> {
    let [n0, n1, n2] = dims.extent();
    let spacing = Spacing::new(kind, dims, geometry);

    let mut coords = Vec::with_capacity(dims.nodes());

    for k in 0..n2 {
        for j in 0..n1 {
            for i in 0..n0 {
                coords.push(node_coord(kind, &spacing, i, j, k));
            }
        }
    }

    debug!("generated {} node coordinates for the {} grid", coords.len(), kind);

    coords
}
