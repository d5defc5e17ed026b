pub const DEFAULT_SCALE: f64 = 400.0;

/// Logistic win probability of `rating_a` over `rating_b` on the standard 400-point scale.
pub fn win_probability(rating_a: f64, rating_b: f64) -> f64 {
    win_probability_scaled(rating_a, rating_b, DEFAULT_SCALE)
}

pub fn win_probability_scaled(rating_a: f64, rating_b: f64, scale: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((rating_b - rating_a) / scale))
}

/// Both sides' probabilities. Side B is `1 - p_a`, never recomputed, so the
/// pair always sums to one.
pub fn probability_pair(rating_a: f64, rating_b: f64, scale: f64) -> (f64, f64) {
    let p_a = win_probability_scaled(rating_a, rating_b, scale);
    (p_a, 1.0 - p_a)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::{probability_pair, win_probability, win_probability_scaled};

    #[test]
    fn equal_ratings_are_even() {
        for r in [0.0, 1500.0, 2250.75, -300.0] {
            assert_eq!(win_probability(r, r), 0.5);
        }
    }

    #[test]
    fn swapped_ratings_are_complementary() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let a = rng.gen_range(1000.0..2600.0);
            let b = rng.gen_range(1000.0..2600.0);
            let sum = win_probability(a, b) + win_probability(b, a);
            assert!((sum - 1.0).abs() < 1e-9, "{a} vs {b} summed to {sum}");
        }
    }

    #[test]
    fn four_hundred_points_is_ten_to_one() {
        let p = win_probability(2000.0, 1600.0);
        assert!((p - 10.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn smaller_scale_sharpens_the_curve() {
        assert!(win_probability_scaled(2100.0, 2000.0, 200.0) > win_probability(2100.0, 2000.0));
    }

    #[test]
    fn pair_sums_to_one() {
        let (a, b) = probability_pair(2152.5, 1752.63, 400.0);
        assert_eq!(a + b, 1.0);
        assert!(a > b);
    }
}
