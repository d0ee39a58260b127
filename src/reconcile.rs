//! # Range reconciliation
//!
//! Downstream algorithms (isosurfaces, slices, particle sampling) map values
//! through one transfer function and cull against one bounding box, so every
//! block must report the same range. [`reconcile`] merges the ranges of any
//! number of blocks and writes the result back into each of them.
//!
//! ## Maximum coordinate
//!
//! The legacy visualization tools computed the maximum corner of the global
//! bounding box as the component-wise *minimum* of the per-block maxima
//! ([`BoundsMerge::MinOfMaxima`]). For the Yin-Yang-Zhong grid this clips the
//! box to the extent of the smallest block along each axis. The behavior is
//! kept as the default so results match the legacy tools; use
//! [`BoundsMerge::Union`] for the geometric union of the blocks.

use crate::grid::{Bounds, GridBlock, ValueRange};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// How the maximum corner of the global bounding box is merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsMerge {
    /// component-wise minimum of the block maxima (legacy)
    #[default]
    MinOfMaxima,
    /// component-wise maximum of the block maxima
    Union,
}

/// The value range and bounds shared by all blocks after reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlobalRange {
    pub values: ValueRange,
    pub bounds: Bounds,
}

/// Compute the global range of `blocks` without modifying them
pub fn global_range<'a, I>(blocks: I, merge: BoundsMerge) -> GlobalRange
where
    I: IntoIterator<Item = &'a GridBlock>,
{
    let mut values = ValueRange::EMPTY;
    let mut bounds: Option<Bounds> = None;

    for block in blocks {
        values = values.merge(block.range());

        let local = block.object_bounds();
        bounds = Some(match bounds {
            None => local,
            Some(global) => merge_bounds(global, local, merge),
        });
    }

    GlobalRange {
        values,
        bounds: bounds.unwrap_or(Bounds::EMPTY),
    }
}

fn merge_bounds(a: Bounds, b: Bounds, merge: BoundsMerge) -> Bounds {
    let mut out = a;
    for axis in 0..3 {
        out.min[axis] = a.min[axis].min(b.min[axis]);
        out.max[axis] = match merge {
            BoundsMerge::MinOfMaxima => a.max[axis].min(b.max[axis]),
            BoundsMerge::Union => a.max[axis].max(b.max[axis]),
        };
    }
    out
}

/// Merge the ranges of `blocks` and broadcast the result into every block
///
/// Each block's value range, object bounds and external bounds are replaced
/// with the global ones. Running it again on the same blocks changes nothing.
pub fn reconcile<'a, I>(blocks: I, merge: BoundsMerge) -> GlobalRange
where
    I: IntoIterator<Item = &'a mut GridBlock>,
{
    let mut blocks: Vec<&'a mut GridBlock> = blocks.into_iter().collect();

    let global = global_range(blocks.iter().map(|block| &**block), merge);

    if global.bounds.is_inverted() && !blocks.is_empty() {
        warn!(
            "reconciled bounds are inverted: min {:?}, max {:?}",
            global.bounds.min, global.bounds.max
        );
    }

    for block in blocks.iter_mut() {
        block.set_min_max_values(global.values);
        block.set_min_max_coords(global.bounds);
        debug!("broadcast global range to the {} grid", block.kind());
    }

    info!(
        "reconciled {} blocks: values [{}, {}], min coord {:?}, max coord {:?}",
        blocks.len(),
        global.values.min,
        global.values.max,
        global.bounds.min,
        global.bounds.max
    );

    global
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Dims, GridKind, ShellGeometry};

    fn block(kind: GridKind, dims: Dims, values: Vec<f32>) -> GridBlock {
        let mut block = GridBlock::new(kind, dims, 1, ShellGeometry::default()).unwrap();
        block.set_values(values).unwrap();
        block
    }

    fn shell_and_core() -> (GridBlock, GridBlock) {
        let yin = block(GridKind::Yin, Dims::shell(2, 3, 3), vec![1.0; 18]);
        let zhong = block(GridKind::Zhong, Dims::cube(2, 2), vec![-3.0; 8]);
        (yin, zhong)
    }

    #[test]
    fn min_of_maxima_is_reproduced() {
        let (mut yin, mut zhong) = shell_and_core();
        let yin_max = yin.object_bounds().max;
        let zhong_max = zhong.object_bounds().max;

        let global = reconcile([&mut yin, &mut zhong], BoundsMerge::MinOfMaxima);

        for axis in 0..3 {
            assert_eq!(global.bounds.max[axis], yin_max[axis].min(zhong_max[axis]));
        }
        assert_eq!(yin.object_bounds(), global.bounds);
        assert_eq!(zhong.external_bounds(), global.bounds);
    }

    #[test]
    fn union_contains_every_node() {
        let (mut yin, mut zhong) = shell_and_core();
        let global = reconcile([&mut yin, &mut zhong], BoundsMerge::Union);

        for node in yin.coords().iter().chain(zhong.coords()) {
            assert!(global.bounds.contains(*node));
        }
    }

    #[test]
    fn values_are_merged() {
        let (mut yin, mut zhong) = shell_and_core();
        let global = reconcile([&mut yin, &mut zhong], BoundsMerge::default());

        assert_eq!(global.values, ValueRange::new(-3.0, 1.0));
        assert_eq!(yin.range(), global.values);
        assert_eq!(zhong.range(), global.values);
        assert_eq!(yin.local_range(), ValueRange::new(1.0, 1.0));
    }

    #[test]
    fn idempotent() {
        for merge in [BoundsMerge::MinOfMaxima, BoundsMerge::Union] {
            let (mut yin, mut zhong) = shell_and_core();
            let first = reconcile([&mut yin, &mut zhong], merge);
            let after_first = (yin.clone(), zhong.clone());

            let second = reconcile([&mut yin, &mut zhong], merge);
            assert_eq!(first, second);
            assert_eq!((yin, zhong), after_first);
        }
    }

    #[test]
    fn block_without_values_is_neutral() {
        let (mut yin, _) = shell_and_core();
        let mut empty =
            GridBlock::new(GridKind::Yang, Dims::shell(2, 3, 3), 1, ShellGeometry::default())
                .unwrap();

        let global = reconcile([&mut yin, &mut empty], BoundsMerge::Union);
        assert_eq!(global.values, ValueRange::new(1.0, 1.0));
    }

    #[test]
    fn no_blocks() {
        let blocks: Vec<&mut GridBlock> = Vec::new();
        let global = reconcile(blocks, BoundsMerge::Union);
        assert!(global.values.is_empty());
        assert!(global.bounds.is_inverted());
    }
}
