use rand::Rng;

/// generate_hurdles places the hurdles for one race instance. The first hurdle sits at
/// 10 + U(0,10) units, each following hurdle another 10 + U(0,10) units further down the
/// track. A candidate at or beyond 90 units is dropped by the loop condition before it is
/// stored, so all stored positions lie strictly below 90. Positions are rounded to one
/// decimal place.
pub fn generate_hurdles<R: Rng>(rng: &mut R) -> Vec<f64> {
    let mut hurdles = Vec::new();
    let mut pos = 10.0 + rng.gen::<f64>() * 10.0;

    while pos < 90.0 {
        hurdles.push((pos * 10.0).round() / 10.0);
        pos += 10.0 + rng.gen::<f64>() * 10.0;
    }

    hurdles
}

/// next_hurdle_in_window returns the position of a hurdle lying ahead of the runner within
/// the given window, if any. A runner exactly on a hurdle position has already cleared it.
pub fn next_hurdle_in_window(hurdles: &[f64], distance: f64, window: f64) -> Option<f64> {
    hurdles
        .iter()
        .copied()
        .find(|&h| h > distance && h - distance <= window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn hurdles_are_strictly_increasing_and_within_bounds() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let hurdles = generate_hurdles(&mut rng);

            assert!(!hurdles.is_empty(), "seed {} produced no hurdles", seed);

            for pair in hurdles.windows(2) {
                assert!(pair[0] < pair[1], "seed {} not strictly increasing", seed);
            }

            for &h in hurdles.iter() {
                assert!(h >= 10.0 && h < 90.0, "seed {} placed hurdle at {}", seed, h);
            }
        }
    }

    #[test]
    fn hurdle_gaps_stay_in_the_configured_band() {
        // Stored positions are rounded to one decimal, so allow that much slack around
        // the raw [10, 20) gap.
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let hurdles = generate_hurdles(&mut rng);

            for pair in hurdles.windows(2) {
                let gap = pair[1] - pair[0];
                assert!(gap >= 9.9 && gap < 20.1, "seed {} produced gap {}", seed, gap);
            }
        }
    }

    #[test]
    fn window_check_only_looks_ahead() {
        let hurdles = [20.0, 35.5];

        assert_eq!(next_hurdle_in_window(&hurdles, 19.5, 1.0), Some(20.0));
        assert_eq!(next_hurdle_in_window(&hurdles, 19.0, 1.0), Some(20.0));
        // exactly on the hurdle: already cleared
        assert_eq!(next_hurdle_in_window(&hurdles, 20.0, 1.0), None);
        // behind the runner
        assert_eq!(next_hurdle_in_window(&hurdles, 20.5, 1.0), None);
        // too far away
        assert_eq!(next_hurdle_in_window(&hurdles, 18.9, 1.0), None);
    }
}
