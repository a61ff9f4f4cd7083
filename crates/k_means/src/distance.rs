use common::vec2::Vec2;

/// Squared Euclidean distance. Both points must have the same number of coordinates.
#[inline]
pub fn euclid_distance_2(lhs: &[f32], rhs: &[f32]) -> f32 {
    assert_eq!(lhs.len(), rhs.len(), "points of different dimensionality");
    let mut result = 0.0f32;
    for i in 0..lhs.len() {
        let diff = lhs[i] - rhs[i];
        result += diff * diff;
    }
    result
}

/// Index of the centroid closest to `vector`; the lowest index wins a tie.
pub fn k_means_lookup(vector: &[f32], centroids: &Vec2<f32>) -> usize {
    assert!(!centroids.is_empty());
    let mut result = (euclid_distance_2(vector, &centroids[(0,)]), 0);
    for i in 1..centroids.shape_0() {
        let dis = euclid_distance_2(vector, &centroids[(i,)]);
        if dis < result.0 {
            result = (dis, i);
        }
    }
    result.1
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn distance_is_squared() {
        assert_eq!(euclid_distance_2(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(euclid_distance_2(&[1.5, -2.0, 7.0], &[1.5, -2.0, 7.0]), 0.0);
    }

    #[test]
    #[should_panic]
    fn distance_rejects_mismatched_points() {
        euclid_distance_2(&[1.0, 2.0], &[1.0]);
    }

    #[test]
    fn lookup_picks_nearest() {
        let centroids = Vec2::from_rows(2, &[[0.0, 0.0], [10.0, 10.0], [-5.0, 3.0]]);
        assert_eq!(k_means_lookup(&[9.0, 8.5], &centroids), 1);
        assert_eq!(k_means_lookup(&[-4.0, 2.0], &centroids), 2);
        assert_eq!(k_means_lookup(&[0.5, 0.1], &centroids), 0);
    }

    #[test]
    fn lookup_tie_goes_to_lowest_index() {
        // 4.0 is exactly 1.0 away from centroids 2 and 5.
        let centroids = Vec2::from_rows(1, &[[100.0], [-100.0], [3.0], [50.0], [-50.0], [5.0]]);
        assert_eq!(k_means_lookup(&[4.0], &centroids), 2);
    }
}
