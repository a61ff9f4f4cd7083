use crate::accumulator::Tally;
use common::vec2::Vec2;
use rayon::prelude::*;

/// Moves each centroid to the mean of its members.
///
/// A cluster that received no members keeps its coordinates.
pub fn recompute<T: Tally + ?Sized>(tally: &T, centroids: &mut Vec2<f32>) {
    let dims = centroids.shape_1();
    assert_eq!(tally.clusters(), centroids.shape_0());
    assert_eq!(tally.dims(), dims);
    if dims == 0 {
        return;
    }
    centroids
        .as_mut_slice()
        .par_chunks_mut(dims)
        .enumerate()
        .for_each(|(i, centroid)| {
            let count = tally.count(i);
            if count == 0 {
                return;
            }
            for j in 0..dims {
                centroid[j] = tally.coordinate(i, j) / count as f32;
            }
        });
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::accumulator::{Accumulator, AtomicAccumulator};

    #[test]
    fn mean_of_members() {
        let mut acc = Accumulator::try_new(2, 2).unwrap();
        acc.add(0, &[1.0, 1.0]);
        acc.add(0, &[3.0, 5.0]);
        acc.add(1, &[-2.0, 4.0]);
        let mut centroids = Vec2::from_rows(2, &[[0.0, 0.0], [9.0, 9.0]]);
        recompute(&acc, &mut centroids);
        assert_eq!(&centroids[(0,)], &[2.0, 3.0]);
        assert_eq!(&centroids[(1,)], &[-2.0, 4.0]);
    }

    #[test]
    fn empty_cluster_stays_put() {
        let acc = AtomicAccumulator::try_new(3, 2).unwrap();
        acc.add(1, &[4.0, 4.0]);
        let mut centroids = Vec2::from_rows(2, &[[1e6, -1e6], [0.0, 0.0], [7.0, 8.0]]);
        recompute(&acc, &mut centroids);
        assert_eq!(&centroids[(0,)], &[1e6, -1e6]);
        assert_eq!(&centroids[(1,)], &[4.0, 4.0]);
        assert_eq!(&centroids[(2,)], &[7.0, 8.0]);
    }
}
