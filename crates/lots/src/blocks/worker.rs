use std::collections::VecDeque;

use rand::Rng;

use crate::carving::divide_block;
use crate::geometry::{resize, Polygon};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JobKind {
    /// Inset every block by the street setback.
    Shrink { spacing: f32 },
    /// Split every block into lots, keeping a few whole.
    Divide { min_area: f32, chance_no_divide: f32 },
}

#[derive(Debug, Clone)]
struct WorkerJob {
    kind: JobKind,
    pending: VecDeque<Polygon>,
    done: Vec<Polygon>,
}

/// Owns the current block set and mutates it in place with shrink and
/// divide jobs.
///
/// A job either runs to completion inside the call that starts it, or is
/// queued and advanced one block per [`BlockWorker::step`], so an animated
/// driver can show blocks changing frame by frame.
#[derive(Debug, Clone, Default)]
pub struct BlockWorker {
    polygons: Vec<Polygon>,
    job: Option<WorkerJob>,
}

impl BlockWorker {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self {
            polygons,
            job: None,
        }
    }

    /// Settled polygons. Empty while a job holds them.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Everything the worker currently holds, processed blocks first.
    pub fn preview(&self) -> impl Iterator<Item = &Polygon> {
        let (done, pending) = match &self.job {
            Some(job) => (job.done.as_slice(), Some(&job.pending)),
            None => (self.polygons.as_slice(), None),
        };
        done.iter().chain(pending.into_iter().flatten())
    }

    /// Replace the block set, dropping any queued job.
    pub fn set_polygons(&mut self, polygons: Vec<Polygon>) {
        self.job = None;
        self.polygons = polygons;
    }

    pub fn take_polygons(&mut self) -> Vec<Polygon> {
        std::mem::take(&mut self.polygons)
    }

    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    pub fn current_job(&self) -> Option<JobKind> {
        self.job.as_ref().map(|job| job.kind)
    }

    /// Blocks still waiting in the queued job.
    pub fn remaining(&self) -> usize {
        self.job.as_ref().map_or(0, |job| job.pending.len())
    }

    pub fn reset(&mut self) {
        self.polygons.clear();
        self.job = None;
    }

    /// Inset every block by `spacing`. Blocks that collapse are dropped.
    pub fn shrink(&mut self, spacing: f32, animate: bool) {
        if animate {
            self.queue(JobKind::Shrink { spacing });
        } else {
            self.abandon_job();
            self.polygons = self
                .polygons
                .drain(..)
                .filter_map(|block| resize(&block, -spacing))
                .collect();
        }
    }

    /// Subdivide every block into lots of roughly `min_area`. Each block is
    /// kept whole with probability `chance_no_divide`, or when it is too small
    /// to yield any lot.
    pub fn divide<R: Rng + ?Sized>(
        &mut self,
        min_area: f32,
        chance_no_divide: f32,
        animate: bool,
        rng: &mut R,
    ) {
        self.queue(JobKind::Divide {
            min_area,
            chance_no_divide,
        });
        if !animate {
            while self.step(rng) {}
        }
    }

    /// Process one block of the queued job. Returns whether any work was done.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let Some(job) = self.job.as_mut() else {
            return false;
        };
        if let Some(block) = job.pending.pop_front() {
            match job.kind {
                JobKind::Shrink { spacing } => job.done.extend(resize(&block, -spacing)),
                JobKind::Divide {
                    min_area,
                    chance_no_divide,
                } => job
                    .done
                    .extend(divide_block(&block, min_area, chance_no_divide, rng)),
            }
        }
        if job.pending.is_empty() {
            if let Some(job) = self.job.take() {
                self.polygons = job.done;
            }
        }
        true
    }

    /// Non-blocking poll for per-frame drivers: advance a queued job by one
    /// block and report whether one was in flight.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.step(rng)
    }

    fn queue(&mut self, kind: JobKind) {
        self.abandon_job();
        self.job = Some(WorkerJob {
            kind,
            pending: self.polygons.drain(..).collect(),
            done: Vec::new(),
        });
    }

    /// Put the blocks of an interrupted job back, processed or not.
    fn abandon_job(&mut self) {
        if let Some(job) = self.job.take() {
            self.polygons = job.done;
            self.polygons.extend(job.pending);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::area;
    use crate::LotRng;
    use bevy::math::Vec2;

    fn square(origin: Vec2, size: f32) -> Polygon {
        vec![
            origin,
            origin + Vec2::new(size, 0.0),
            origin + Vec2::new(size, size),
            origin + Vec2::new(0.0, size),
        ]
    }

    fn three_blocks() -> Vec<Polygon> {
        vec![
            square(Vec2::ZERO, 40.0),
            square(Vec2::new(50.0, 0.0), 40.0),
            square(Vec2::new(100.0, 0.0), 6.0),
        ]
    }

    #[test]
    fn test_shrink_blocking() {
        let mut worker = BlockWorker::new(three_blocks());
        worker.shrink(4.0, false);
        assert!(!worker.is_busy());
        // The 6x6 block collapses under an 8-unit total setback
        assert_eq!(worker.polygons().len(), 2);
        for block in worker.polygons() {
            assert!((area(block) - 32.0 * 32.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_shrink_animated_processes_one_block_per_step() {
        let mut rng = LotRng::from_seed_u64(1);
        let mut worker = BlockWorker::new(three_blocks());
        worker.shrink(4.0, true);
        assert!(worker.is_busy());
        assert_eq!(worker.remaining(), 3);
        assert!(worker.polygons().is_empty());
        assert_eq!(worker.preview().count(), 3);

        assert!(worker.update(&mut rng.0));
        assert_eq!(worker.remaining(), 2);
        assert!(worker.update(&mut rng.0));
        assert!(worker.update(&mut rng.0));
        assert!(!worker.is_busy());
        assert!(!worker.update(&mut rng.0));
        assert_eq!(worker.polygons().len(), 2);
    }

    #[test]
    fn test_animated_and_blocking_shrink_agree() {
        let mut rng = LotRng::from_seed_u64(1);
        let mut blocking = BlockWorker::new(three_blocks());
        blocking.shrink(3.0, false);
        let mut animated = BlockWorker::new(three_blocks());
        animated.shrink(3.0, true);
        while animated.step(&mut rng.0) {}
        assert_eq!(blocking.polygons(), animated.polygons());
    }

    #[test]
    fn test_divide_blocking_is_deterministic() {
        let mut a = BlockWorker::new(three_blocks());
        let mut b = BlockWorker::new(three_blocks());
        a.divide(50.0, 0.0, false, &mut LotRng::from_seed_u64(5).0);
        b.divide(50.0, 0.0, false, &mut LotRng::from_seed_u64(5).0);
        assert!(a.polygons().len() > 3);
        assert_eq!(a.polygons(), b.polygons());
    }

    #[test]
    fn test_divide_chance_one_keeps_blocks_whole() {
        let mut worker = BlockWorker::new(three_blocks());
        worker.divide(50.0, 1.0, false, &mut LotRng::from_seed_u64(5).0);
        assert_eq!(worker.polygons(), three_blocks().as_slice());
    }

    #[test]
    fn test_divide_preserves_area() {
        let mut worker = BlockWorker::new(vec![square(Vec2::ZERO, 40.0)]);
        worker.divide(50.0, 0.0, true, &mut LotRng::from_seed_u64(3).0);
        assert_eq!(
            worker.current_job(),
            Some(JobKind::Divide {
                min_area: 50.0,
                chance_no_divide: 0.0
            })
        );
        while worker.step(&mut LotRng::from_seed_u64(3).0) {}
        let total: f32 = worker.polygons().iter().map(|p| area(p)).sum();
        assert!((total - 1600.0).abs() < 1.0, "total {total}");
    }

    #[test]
    fn test_divide_keeps_block_too_small_to_subdivide() {
        // 4x4 is below half of min_area, so subdivision yields nothing
        let tiny = square(Vec2::ZERO, 4.0);
        for animate in [false, true] {
            let mut worker = BlockWorker::new(vec![tiny.clone()]);
            let mut rng = LotRng::from_seed_u64(9);
            worker.divide(50.0, 0.0, animate, &mut rng.0);
            while worker.step(&mut rng.0) {}
            assert_eq!(worker.polygons(), [tiny.clone()].as_slice());
        }
    }

    #[test]
    fn test_reset_drops_job_and_blocks() {
        let mut worker = BlockWorker::new(three_blocks());
        worker.shrink(4.0, true);
        worker.reset();
        assert!(!worker.is_busy());
        assert!(worker.polygons().is_empty());
        assert_eq!(worker.preview().count(), 0);
    }

    #[test]
    fn test_new_job_abandons_queued_one() {
        let mut worker = BlockWorker::new(three_blocks());
        worker.shrink(4.0, true);
        worker.set_polygons(vec![square(Vec2::ZERO, 10.0)]);
        assert!(!worker.is_busy());
        assert_eq!(worker.take_polygons().len(), 1);
        assert!(worker.polygons().is_empty());
    }
}
