//! # Composite model
//!
//! [`Model`] owns the Yin, Yang and Zhong blocks of one import. Importing runs
//! in a fixed order: validate the configuration, build each block (which
//! computes its coordinates) and load its values, derive the isovalue, then
//! reconcile the ranges of all three blocks. After that the model is only
//! queried.
//!
//! The isovalue is the midpoint of the Yin block's *local* value range, i.e.
//! the range before reconciliation. It is taken from
//! [`GridBlock::local_range`], so it does not depend on whether reconciliation
//! has already run.

use crate::config::{ConfigError, ModelConfig, ValueSource};
use crate::grid::{Dims, GridBlock, GridKind, ValueRange};
use crate::mesh::{self, UnstructuredMesh};
use crate::reconcile::{self, BoundsMerge, GlobalRange};
use crate::values::{self, FormatError};
use crate::Error;

use log::info;

/// Parameters handed to downstream extraction algorithms (isosurfaces,
/// transfer functions) instead of shared mutable state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extraction {
    pub isovalue: f32,
    /// reconciled value range all blocks share
    pub range: ValueRange,
}

impl Extraction {
    /// position of the isovalue inside the range, in `[0, 1]` for isovalues
    /// inside the range and `0` for a degenerate range
    pub fn normalized_isovalue(&self) -> f32 {
        let width = self.range.max - self.range.min;
        if width > 0.0 {
            (self.isovalue - self.range.min) / width
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    yin: GridBlock,
    yang: GridBlock,
    zhong: GridBlock,
    isovalue: f32,
    global: GlobalRange,
}

impl Model {
    /// Import all three blocks described by `config` and reconcile them
    ///
    /// The configuration is validated before any file is opened. Any failure
    /// aborts the whole import.
    pub fn import(config: &ModelConfig) -> Result<Self, Error> {
        config.validate()?;

        info!("importing volumes ...");

        let yin = import_block(GridKind::Yin, config)?;
        let yang = import_block(GridKind::Yang, config)?;
        let zhong = import_block(GridKind::Zhong, config)?;

        Self::from_blocks(yin, yang, zhong, config.bounds_merge)
    }

    /// Build a model from blocks that already hold their values
    pub fn from_blocks(
        mut yin: GridBlock,
        mut yang: GridBlock,
        mut zhong: GridBlock,
        merge: BoundsMerge,
    ) -> Result<Self, Error> {
        for (expected, block) in [
            (GridKind::Yin, &yin),
            (GridKind::Yang, &yang),
            (GridKind::Zhong, &zhong),
        ] {
            if block.kind() != expected {
                return Err(ConfigError::KindMismatch {
                    expected,
                    found: block.kind(),
                }
                .into());
            }
            if block.dims().rad() != yin.dims().rad() {
                return Err(ConfigError::RadialMismatch {
                    kind: block.kind(),
                    expected: yin.dims().rad(),
                    found: block.dims().rad(),
                }
                .into());
            }
            if block.kind().is_shell() && block.dims() != yin.dims() {
                return Err(ConfigError::ShellMismatch {
                    kind: block.kind(),
                    expected: yin.dims(),
                    found: block.dims(),
                }
                .into());
            }
            // the core is sized from the shell radii
            if block.geometry() != yin.geometry() {
                return Err(ConfigError::GeometryMismatch { kind: block.kind() }.into());
            }
            if !block.has_values() {
                return Err(FormatError::MissingValues { kind: block.kind() }.into());
            }
        }

        let local = yin.local_range();
        let isovalue = local.midpoint();
        if !isovalue.is_finite() {
            return Err(FormatError::NoIsovalue {
                min: local.min,
                max: local.max,
            }
            .into());
        }

        let global = reconcile::reconcile([&mut yin, &mut yang, &mut zhong], merge);

        info!("initial isovalue: {}", isovalue);

        Ok(Self {
            yin,
            yang,
            zhong,
            isovalue,
            global,
        })
    }

    pub fn yin(&self) -> &GridBlock {
        &self.yin
    }

    pub fn yang(&self) -> &GridBlock {
        &self.yang
    }

    pub fn zhong(&self) -> &GridBlock {
        &self.zhong
    }

    pub fn block(&self, kind: GridKind) -> &GridBlock {
        match kind {
            GridKind::Yin => &self.yin,
            GridKind::Yang => &self.yang,
            GridKind::Zhong => &self.zhong,
        }
    }

    pub fn blocks(&self) -> [&GridBlock; 3] {
        [&self.yin, &self.yang, &self.zhong]
    }

    /// a freshly converted hexahedral mesh of one block
    pub fn mesh(&self, kind: GridKind) -> UnstructuredMesh {
        mesh::to_unstructured(self.block(kind))
    }

    pub fn outline(&self, kind: GridKind) -> UnstructuredMesh {
        mesh::outline(self.block(kind))
    }

    pub fn shell_lines(&self, kind: GridKind, stride: usize) -> Result<UnstructuredMesh, ConfigError> {
        mesh::shell_lines(self.block(kind), stride)
    }

    pub fn isovalue(&self) -> f32 {
        self.isovalue
    }

    pub fn set_isovalue(&mut self, isovalue: f32) {
        self.isovalue = isovalue;
    }

    pub fn global_range(&self) -> GlobalRange {
        self.global
    }

    pub fn extraction(&self) -> Extraction {
        Extraction {
            isovalue: self.isovalue,
            range: self.global.values,
        }
    }
}

fn import_block(kind: GridKind, config: &ModelConfig) -> Result<GridBlock, Error> {
    let dims: Dims = config.dims(kind);
    let source: &ValueSource = config.source(kind);

    let mut block = GridBlock::new(kind, dims, 1, config.geometry)?;
    let data = values::read_value_file(source, block.value_count(), config.byte_order)?;
    block.set_values(data)?;

    info!(
        "imported the {} grid from {}: {} nodes, values [{}, {}]",
        kind,
        source.path.display(),
        block.nodes(),
        block.min_value(),
        block.max_value()
    );

    Ok(block)
}
