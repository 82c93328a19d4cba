use bevy::prelude::*;
use rand::Rng;

use super::events::BuildingsGenerated;
use super::stage::GenerationStage;
use crate::blocks::{BlockWorker, StreetGraph};
use crate::carving::{carve_courtyards, CarveMode, CarveStats};
use crate::config::{BuildingConfig, BLOCK_PREVIEW_SHRINK_FRACTION};
use crate::error::GenerationError;
use crate::geometry::{resize, Polygon};
use crate::projection::{Building, BuildingModels, CameraView};

/// State carried by an in-flight pass. The config is a snapshot taken when
/// the pass started.
#[derive(Debug, Clone)]
struct GenerationPass {
    config: BuildingConfig,
    animate: bool,
    dividing: bool,
    lots: Vec<Polygon>,
    stats: CarveStats,
}

/// Streets in, buildings out.
///
/// Owns the street network, the block worker and the published lots and
/// buildings. A pass never touches the published collections until it
/// finishes, then swaps both in at once.
#[derive(Resource, Debug, Default)]
pub struct Buildings {
    streets: StreetGraph,
    worker: BlockWorker,
    lots: Vec<Polygon>,
    models: BuildingModels,
    stage: GenerationStage,
    pass: Option<GenerationPass>,
    last_stats: Option<CarveStats>,
}

impl Buildings {
    pub fn new(streets: StreetGraph) -> Self {
        Self {
            streets,
            ..default()
        }
    }

    pub fn streets(&self) -> &StreetGraph {
        &self.streets
    }

    /// Replace the street network. A pass in flight keeps the blocks it found.
    pub fn set_streets(&mut self, streets: StreetGraph) {
        self.streets = streets;
    }

    pub fn worker(&self) -> &BlockWorker {
        &self.worker
    }

    pub fn stage(&self) -> GenerationStage {
        self.stage
    }

    pub fn is_generating(&self) -> bool {
        self.pass.is_some()
    }

    /// Start a pass. Without `animate` the pass completes inside this call.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        config: &BuildingConfig,
        rng: &mut R,
        animate: bool,
    ) -> Result<(), GenerationError> {
        if self.is_generating() {
            return Err(GenerationError::AlreadyGenerating);
        }
        config.validate()?;

        let blocks = self.streets.find_blocks(config.max_length);
        info!(
            "Generating buildings: {} blocks, {} mode",
            blocks.len(),
            config.mode.label()
        );
        self.worker.set_polygons(blocks);
        self.stage = GenerationStage::BlocksFound;
        self.worker.shrink(config.shrink_spacing, animate);
        self.pass = Some(GenerationPass {
            config: config.clone(),
            animate,
            dividing: false,
            lots: Vec::new(),
            stats: CarveStats::default(),
        });

        if !animate {
            while self.step(rng) {}
        }
        Ok(())
    }

    /// Advance the pass by one unit of work: one block of a shrink or divide
    /// job, or one stage transition. Returns whether the pass is still in
    /// flight afterwards.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let Some(pass) = self.pass.as_mut() else {
            return false;
        };
        if self.worker.is_busy() {
            self.worker.step(rng);
            return true;
        }

        match self.stage {
            GenerationStage::BlocksFound => {
                debug!("Blocks shrunk: {}", self.worker.polygons().len());
                self.stage = GenerationStage::Shrunk;
            }
            GenerationStage::Shrunk => match pass.config.mode {
                CarveMode::Courtyard => {
                    let blocks = self.worker.take_polygons();
                    let outcome = carve_courtyards(
                        &blocks,
                        pass.config.min_area,
                        pass.config.courtyard_depth,
                        rng,
                    );
                    pass.lots = outcome.lots;
                    pass.stats = outcome.stats;
                    self.stage = GenerationStage::Carved;
                }
                CarveMode::Divide if !pass.dividing => {
                    pass.dividing = true;
                    pass.stats.blocks_without_courtyards = self.worker.polygons().len();
                    self.worker.divide(
                        pass.config.min_area,
                        pass.config.chance_no_divide,
                        pass.animate,
                        rng,
                    );
                }
                CarveMode::Divide => {
                    pass.lots = self.worker.take_polygons();
                    self.stage = GenerationStage::Carved;
                }
            },
            GenerationStage::Carved => {
                debug!("Blocks carved into {} lots", pass.lots.len());
                self.publish(rng);
                return false;
            }
            GenerationStage::Idle | GenerationStage::Projected => {
                self.pass = None;
                return false;
            }
        }
        true
    }

    /// Per-frame driver hook; same as [`Buildings::step`].
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.step(rng)
    }

    fn publish<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Some(pass) = self.pass.take() else {
            return;
        };
        let models = BuildingModels::new(
            &pass.lots,
            pass.config.min_height,
            pass.config.height_range,
            rng,
        );
        info!(
            "Buildings generated: {} lots, {} blocks with courtyards, {} without, {} interior lots discarded",
            pass.lots.len(),
            pass.stats.blocks_with_courtyards,
            pass.stats.blocks_without_courtyards,
            pass.stats.discarded_lots
        );
        self.lots = pass.lots;
        self.models = models;
        self.last_stats = Some(pass.stats);
        self.stage = GenerationStage::Projected;
    }

    /// Drop everything generated, including a pass in flight. The street
    /// network is kept.
    pub fn reset(&mut self) {
        self.worker.reset();
        self.lots.clear();
        self.models.clear();
        self.pass = None;
        self.last_stats = None;
        self.stage = GenerationStage::Idle;
    }

    /// Published lots in world space.
    pub fn lots(&self) -> &[Polygon] {
        &self.lots
    }

    /// Published lots in screen space, flat.
    pub fn screen_lots(&self, camera: &impl CameraView) -> Vec<Polygon> {
        to_screen(self.lots.iter(), camera)
    }

    /// Buildings with their cache as of the last projection.
    pub fn buildings(&self) -> &[Building] {
        self.models.buildings()
    }

    pub fn project(&mut self, camera: &impl CameraView, distance: f32) {
        self.models.set_projections(camera, distance);
    }

    /// Reproject for `camera`, then return the buildings in draw order.
    pub fn models(&mut self, camera: &impl CameraView, distance: f32) -> &[Building] {
        self.project(camera, distance);
        self.models.buildings()
    }

    pub fn last_stats(&self) -> Option<CarveStats> {
        self.last_stats
    }

    /// Summary of the published pass.
    pub fn generated_event(&self) -> BuildingsGenerated {
        BuildingsGenerated {
            lots: self.lots.len(),
            buildings: self.models.len(),
            stats: self.last_stats.unwrap_or_default(),
        }
    }

    /// Blocks the current network would produce, half-shrunk, in screen space.
    pub fn preview_blocks(&self, config: &BuildingConfig, camera: &impl CameraView) -> Vec<Polygon> {
        let spacing = config.shrink_spacing * BLOCK_PREVIEW_SHRINK_FRACTION;
        let blocks: Vec<Polygon> = self
            .streets
            .find_blocks(config.max_length)
            .iter()
            .filter_map(|block| resize(block, -spacing))
            .collect();
        to_screen(blocks.iter(), camera)
    }

    /// What the worker holds mid-pass, in screen space.
    pub fn working_polygons(&self, camera: &impl CameraView) -> Vec<Polygon> {
        if !self.is_generating() {
            return Vec::new();
        }
        to_screen(self.worker.preview(), camera)
    }
}

fn to_screen<'a>(
    polygons: impl Iterator<Item = &'a Polygon>,
    camera: &impl CameraView,
) -> Vec<Polygon> {
    polygons
        .map(|polygon| polygon.iter().map(|&p| camera.world_to_screen(p)).collect())
        .collect()
}
