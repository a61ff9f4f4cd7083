use crate::accumulator::{Accumulator, AtomicAccumulator};
use crate::distance::k_means_lookup;
use common::vec2::Vec2;
use rayon::prelude::*;

/// Membership value of an object that has not been assigned yet.
pub const UNASSIGNED: usize = usize::MAX;

/// Length of each worker's contiguous index range.
pub fn range_len(n: usize, workers: usize) -> usize {
    assert!(workers > 0);
    n.div_ceil(workers).max(1)
}

/// Assigns every object, feeding worker `w` into `locals[w]`.
///
/// Object indices are split into contiguous ranges of [`range_len`] objects,
/// one per worker. Each local accumulator is zeroed before its worker starts.
/// Returns the number of objects whose cluster changed.
pub fn assign_privatized(
    samples: &Vec2<f32>,
    centroids: &Vec2<f32>,
    membership: &mut [usize],
    locals: &mut [Accumulator],
) -> usize {
    let n = samples.shape_0();
    assert_eq!(membership.len(), n);
    if n == 0 {
        return 0;
    }
    let len = range_len(n, locals.len());
    membership
        .par_chunks_mut(len)
        .zip(locals.par_iter_mut())
        .enumerate()
        .map(|(worker, (slots, local))| {
            local.reset();
            assign_range(samples, centroids, worker * len, slots, |cluster, point| {
                local.add(cluster, point)
            })
        })
        .sum()
}

/// Assigns every object, feeding all workers into one shared accumulator.
///
/// The accumulator is zeroed before the pass. Returns the number of objects
/// whose cluster changed.
pub fn assign_atomic(
    samples: &Vec2<f32>,
    centroids: &Vec2<f32>,
    membership: &mut [usize],
    shared: &mut AtomicAccumulator,
    workers: usize,
) -> usize {
    let n = samples.shape_0();
    assert_eq!(membership.len(), n);
    if n == 0 {
        return 0;
    }
    shared.reset();
    let shared = &*shared;
    let len = range_len(n, workers);
    membership
        .par_chunks_mut(len)
        .enumerate()
        .map(|(worker, slots)| {
            assign_range(samples, centroids, worker * len, slots, |cluster, point| {
                shared.add(cluster, point)
            })
        })
        .sum()
}

fn assign_range(
    samples: &Vec2<f32>,
    centroids: &Vec2<f32>,
    start: usize,
    slots: &mut [usize],
    mut accumulate: impl FnMut(usize, &[f32]),
) -> usize {
    let mut changed = 0;
    for (offset, slot) in slots.iter_mut().enumerate() {
        let point = &samples[(start + offset,)];
        let index = k_means_lookup(point, centroids);
        if *slot != index {
            changed += 1;
        }
        *slot = index;
        accumulate(index, point);
    }
    changed
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::accumulator::Tally;

    fn fixture() -> (Vec2<f32>, Vec2<f32>) {
        let samples = Vec2::from_rows(1, &[[1.0], [2.0], [3.0], [10.0], [11.0], [12.0], [4.0]]);
        let centroids = Vec2::from_rows(1, &[[1.0], [10.0]]);
        (samples, centroids)
    }

    #[test]
    fn ranges_cover_every_index() {
        assert_eq!(range_len(7, 3), 3);
        assert_eq!(range_len(6, 3), 2);
        assert_eq!(range_len(2, 8), 1);
        for (n, workers) in [(7, 3), (100, 7), (5, 16), (1, 1)] {
            let len = range_len(n, workers);
            assert!(n.div_ceil(len) <= workers);
        }
    }

    fn count(locals: &[Accumulator], cluster: usize) -> u64 {
        locals.iter().map(|l| l.count(cluster)).sum()
    }

    #[test]
    fn privatized_pass() {
        let (samples, centroids) = fixture();
        let mut membership = vec![UNASSIGNED; 7];
        let mut locals = vec![Accumulator::try_new(2, 1).unwrap(); 3];
        let changed = assign_privatized(&samples, &centroids, &mut membership, &mut locals);
        assert_eq!(changed, 7);
        assert_eq!(membership, vec![0, 0, 0, 1, 1, 1, 0]);
        assert_eq!(count(&locals, 0), 4);
        assert_eq!(count(&locals, 1), 3);
        // ranges of three: [0, 3), [3, 6), [6, 7)
        assert_eq!(locals[0].count(0), 3);
        assert_eq!(locals[1].count(1), 3);
        assert_eq!(locals[2].sum(0), &[4.0]);

        let changed = assign_privatized(&samples, &centroids, &mut membership, &mut locals);
        assert_eq!(changed, 0);
        assert_eq!(count(&locals, 0), 4);
    }

    #[test]
    fn atomic_pass() {
        let (samples, centroids) = fixture();
        let mut membership = vec![UNASSIGNED; 7];
        membership[3] = 1;
        let mut shared = AtomicAccumulator::try_new(2, 1).unwrap();
        let changed = assign_atomic(&samples, &centroids, &mut membership, &mut shared, 2);
        assert_eq!(changed, 6);
        assert_eq!(membership, vec![0, 0, 0, 1, 1, 1, 0]);
        assert_eq!(shared.count(0), 4);
        assert_eq!(shared.coordinate(0, 0), 10.0);
        assert_eq!(shared.count(1), 3);
        assert_eq!(shared.coordinate(1, 0), 33.0);

        let changed = assign_atomic(&samples, &centroids, &mut membership, &mut shared, 2);
        assert_eq!(changed, 0);
        assert_eq!(shared.count(0), 4);
    }
}
