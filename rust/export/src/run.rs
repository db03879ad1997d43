// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export run orchestration
//!
//! Drives the per-tree pipeline: assemble the model from its source row,
//! reproject the trunk position when input and output CRS differ, gate
//! each enabled LOD through the validator, build the configured shape
//! and attach it. Trees failing validation on one LOD are counted and
//! the run continues; a tree with no geometry on any LOD is skipped
//! entirely.
//!
//! The progress callback fires between trees and can cancel the run by
//! returning `false`; everything prepared up to that point is kept.

use crate::citygml::CityGmlEncoder;
use crate::cityjson::CityJsonEncoder;
use crate::error::{Error, Result};
use arbo_lite_core::{ExportConfig, Reprojector, TreeModel, TreeRow, ALL_LODS};
use arbo_lite_geometry::{build_shape, validate, BuildRequest};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Counters of one export run, surfaced to the caller's UI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Trees with at least one generated geometry
    pub exported: usize,
    /// Trees with no geometry on any enabled LOD
    pub skipped: usize,
    /// Validation/build failures per LOD (index 0 = LOD1)
    pub invalid: [u32; 4],
    /// Whether the progress callback aborted the run
    pub cancelled: bool,
}

/// Assembled models plus the run counters, ready for an encoder
#[derive(Debug)]
pub struct PreparedExport {
    pub models: Vec<TreeModel>,
    pub summary: ExportSummary,
}

/// One configured export run over a set of source rows
pub struct Exporter<'a> {
    config: &'a ExportConfig,
    reprojector: Option<&'a dyn Reprojector>,
}

impl<'a> Exporter<'a> {
    /// Create an exporter over a validated configuration
    pub fn new(config: &'a ExportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            reprojector: None,
        })
    }

    /// Supply the reprojector used when input and output CRS differ
    pub fn with_reprojector(mut self, reprojector: &'a dyn Reprojector) -> Self {
        self.reprojector = Some(reprojector);
        self
    }

    /// Prepare all rows without progress reporting
    pub fn run(&self, rows: Vec<TreeRow>) -> Result<PreparedExport> {
        self.run_with_progress(rows, &mut |_, _| true)
    }

    /// Prepare all rows, reporting `(processed, total)` between trees.
    /// The callback returns `false` to cancel the run.
    pub fn run_with_progress(
        &self,
        rows: Vec<TreeRow>,
        progress: &mut dyn FnMut(usize, usize) -> bool,
    ) -> Result<PreparedExport> {
        if self.config.epsg_input != self.config.epsg_output && self.reprojector.is_none() {
            return Err(Error::ReprojectorRequired {
                from: self.config.epsg_input,
                to: self.config.epsg_output,
            });
        }

        let total = rows.len();
        let mut summary = ExportSummary::default();
        let mut models = Vec::with_capacity(total);

        for (processed, row) in rows.into_iter().enumerate() {
            let model = self.prepare_tree(row, &mut summary)?;
            match model {
                Some(model) => models.push(model),
                None => summary.skipped += 1,
            }
            if !progress(processed + 1, total) {
                summary.cancelled = true;
                break;
            }
        }

        summary.exported = models.len();
        info!(
            exported = summary.exported,
            skipped = summary.skipped,
            cancelled = summary.cancelled,
            "export run prepared"
        );
        Ok(PreparedExport { models, summary })
    }

    /// Encode prepared models as a CityGML 2.0 document
    pub fn encode_citygml(&self, models: &[TreeModel]) -> Result<Vec<u8>> {
        CityGmlEncoder::new(self.config).encode(models)
    }

    /// Encode prepared models as a CityJSON 1.0 document
    pub fn encode_cityjson(&self, models: &[TreeModel]) -> Result<Vec<u8>> {
        CityJsonEncoder::new(self.config).encode(models)
    }

    fn prepare_tree(
        &self,
        row: TreeRow,
        summary: &mut ExportSummary,
    ) -> Result<Option<TreeModel>> {
        let mut model = TreeModel::assemble(row, self.config);
        if let Some(reprojector) = self.reprojector {
            if model.position.epsg != reprojector.target_epsg() {
                model.position = reprojector.reproject(&model.position)?;
            }
        }

        let tree_id = model.id.clone();
        let params = model.parameters();
        let crown_height = self.config.crown_height_mode.resolve(&params);

        for lod in ALL_LODS {
            let Some(setup) = self.config.lod(lod) else {
                continue;
            };
            if !validate(setup.shape, self.config.crown_height_mode, &params) {
                summary.invalid[lod.index()] += 1;
                debug!(
                    tree = %tree_id,
                    lod = lod.number(),
                    shape = setup.shape.code(),
                    "parameters insufficient, LOD skipped"
                );
                continue;
            }
            let request = BuildRequest {
                tree_id: &tree_id,
                lod,
                params: &params,
                segments: setup.segments,
                mode: self.config.geometry_mode,
                crown_height,
            };
            match build_shape(setup.shape, &request) {
                Ok(built) => model.attach(lod, built.geometry),
                Err(error) => {
                    summary.invalid[lod.index()] += 1;
                    warn!(tree = %tree_id, lod = lod.number(), %error, "geometry construction failed");
                }
            }
        }

        if model.has_geometry() {
            Ok(Some(model))
        } else {
            debug!(tree = %tree_id, "no LOD produced geometry, tree skipped");
            Ok(None)
        }
    }
}
