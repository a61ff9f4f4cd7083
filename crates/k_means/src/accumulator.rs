//! Per-cluster coordinate sums and member counts.
//!
//! [`Accumulator`] is owned by exactly one worker at a time and needs no
//! synchronization. [`AtomicAccumulator`] is shared by every worker; each count
//! increment and each coordinate addition is applied atomically on its own.

use common::vec2::Vec2;
use rayon::prelude::*;
use std::collections::TryReserveError;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Read access to accumulated per-cluster totals.
pub trait Tally: Sync {
    fn clusters(&self) -> usize;
    fn dims(&self) -> usize;
    fn count(&self, cluster: usize) -> u64;
    fn coordinate(&self, cluster: usize, dim: usize) -> f32;
}

#[derive(Debug, Clone)]
pub struct Accumulator {
    sums: Vec2<f32>,
    counts: Vec<u64>,
}

impl Accumulator {
    pub fn try_new(clusters: usize, dims: usize) -> Result<Self, TryReserveError> {
        let sums = Vec2::try_zeros((clusters, dims))?;
        let mut counts = Vec::new();
        counts.try_reserve_exact(clusters)?;
        counts.resize(clusters, 0);
        Ok(Self { sums, counts })
    }

    #[inline]
    pub fn add(&mut self, cluster: usize, point: &[f32]) {
        self.counts[cluster] += 1;
        let sum = &mut self.sums[(cluster,)];
        assert_eq!(sum.len(), point.len());
        for j in 0..point.len() {
            sum[j] += point[j];
        }
    }

    pub fn reset(&mut self) {
        self.sums.fill(0.0);
        self.counts.fill(0);
    }

    pub fn sum(&self, cluster: usize) -> &[f32] {
        &self.sums[(cluster,)]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Tally for Accumulator {
    fn clusters(&self) -> usize {
        self.counts.len()
    }
    fn dims(&self) -> usize {
        self.sums.shape_1()
    }
    fn count(&self, cluster: usize) -> u64 {
        self.counts[cluster]
    }
    fn coordinate(&self, cluster: usize, dim: usize) -> f32 {
        self.sums[(cluster, dim)]
    }
}

/// Overwrites `global` with the cluster-wise sum of `locals`.
///
/// Runs in parallel over clusters: every cluster row of `global` is written by
/// one task, which reads that row from each worker-local accumulator.
pub fn merge(locals: &[Accumulator], global: &mut Accumulator) {
    let dims = global.sums.shape_1();
    if dims == 0 {
        return;
    }
    for local in locals {
        assert_eq!(local.counts.len(), global.counts.len());
        assert_eq!(local.sums.shape_1(), dims);
    }
    global
        .sums
        .as_mut_slice()
        .par_chunks_mut(dims)
        .zip(global.counts.par_iter_mut())
        .enumerate()
        .for_each(|(i, (sum, count))| {
            sum.fill(0.0);
            *count = 0;
            for local in locals {
                *count += local.counts[i];
                let src = &local.sums[(i,)];
                for j in 0..dims {
                    sum[j] += src[j];
                }
            }
        });
}

#[derive(Debug)]
pub struct AtomicAccumulator {
    dims: usize,
    // f32 bit patterns
    sums: Vec<AtomicU32>,
    counts: Vec<AtomicU64>,
}

impl AtomicAccumulator {
    pub fn try_new(clusters: usize, dims: usize) -> Result<Self, TryReserveError> {
        let mut sums = Vec::new();
        sums.try_reserve_exact(clusters.saturating_mul(dims))?;
        sums.resize_with(clusters * dims, || AtomicU32::new(0.0f32.to_bits()));
        let mut counts = Vec::new();
        counts.try_reserve_exact(clusters)?;
        counts.resize_with(clusters, || AtomicU64::new(0));
        Ok(Self { dims, sums, counts })
    }

    #[inline]
    pub fn add(&self, cluster: usize, point: &[f32]) {
        assert_eq!(point.len(), self.dims);
        self.counts[cluster].fetch_add(1, Ordering::Relaxed);
        let sum = &self.sums[cluster * self.dims..][..self.dims];
        for j in 0..self.dims {
            add_f32(&sum[j], point[j]);
        }
    }

    pub fn reset(&mut self) {
        for x in self.sums.iter_mut() {
            *x.get_mut() = 0.0f32.to_bits();
        }
        for x in self.counts.iter_mut() {
            *x.get_mut() = 0;
        }
    }
}

impl Tally for AtomicAccumulator {
    fn clusters(&self) -> usize {
        self.counts.len()
    }
    fn dims(&self) -> usize {
        self.dims
    }
    fn count(&self, cluster: usize) -> u64 {
        self.counts[cluster].load(Ordering::Relaxed)
    }
    fn coordinate(&self, cluster: usize, dim: usize) -> f32 {
        f32::from_bits(self.sums[cluster * self.dims + dim].load(Ordering::Relaxed))
    }
}

#[inline]
fn add_f32(cell: &AtomicU32, value: f32) {
    let mut current = cell.load(Ordering::Relaxed);
    loop {
        let next = (f32::from_bits(current) + value).to_bits();
        match cell.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(actual) => current = actual,
        }
    }
}
