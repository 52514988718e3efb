use rand::Rng;

use crate::session::NameUsage;

/// Turns that must pass after a name use before it may be used again.
pub const NAME_COOLDOWN_TURNS: usize = 3;

/// Probability of using the name at depths 1 to 3.
pub const EARLY_NAME_CHANCE: f64 = 0.25;
/// Probability of using the name from depth 4 on.
pub const LATE_NAME_CHANCE: f64 = 0.10;

/// Whether the reply should address the user by name.
///
/// `draw` is a uniform sample in `[0, 1)`. Always true at depth 0, never
/// inside the cooldown window after the last use.
pub fn should_use_name(depth: usize, has_name: bool, usage: &NameUsage, draw: f64) -> bool {
    if !has_name {
        return false;
    }
    if depth == 0 {
        return true;
    }
    if let Some(last) = usage.last_turn {
        if depth.saturating_sub(last) < NAME_COOLDOWN_TURNS || depth < last {
            return false;
        }
    }
    let chance = if depth <= 3 {
        EARLY_NAME_CHANCE
    } else {
        LATE_NAME_CHANCE
    };
    draw < chance
}

/// Draws from `rng`, decides, and records the use on `usage`.
pub fn decide_name_usage<R: Rng + ?Sized>(
    depth: usize,
    has_name: bool,
    usage: &mut NameUsage,
    rng: &mut R,
) -> bool {
    let draw: f64 = rng.gen();
    let use_name = should_use_name(depth, has_name, usage, draw);
    if use_name {
        usage.record(depth);
    }
    use_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_turn_always_uses_name() {
        let usage = NameUsage::default();
        for draw in [0.0, 0.5, 0.99] {
            assert!(should_use_name(0, true, &usage, draw));
        }
        assert!(!should_use_name(0, false, &usage, 0.0));
    }

    #[test]
    fn cooldown_blocks_reuse() {
        let mut usage = NameUsage::default();
        usage.record(0);
        assert!(!should_use_name(1, true, &usage, 0.0));
        assert!(!should_use_name(2, true, &usage, 0.0));
        assert!(should_use_name(3, true, &usage, 0.0));
    }

    #[test]
    fn probability_by_depth() {
        let usage = NameUsage::default();
        assert!(should_use_name(2, true, &usage, 0.24));
        assert!(!should_use_name(2, true, &usage, 0.25));
        assert!(should_use_name(6, true, &usage, 0.09));
        assert!(!should_use_name(6, true, &usage, 0.10));
    }

    #[test]
    fn never_twice_within_window() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut usage = NameUsage::default();
        let mut used_at = Vec::new();
        for depth in 0..40 {
            if decide_name_usage(depth, true, &mut usage, &mut rng) {
                used_at.push(depth);
            }
        }
        assert_eq!(used_at.first(), Some(&0));
        assert!(used_at.windows(2).all(|w| w[1] - w[0] >= NAME_COOLDOWN_TURNS));
        assert_eq!(usage.count as usize, used_at.len());
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut usage = NameUsage::default();
            (0..20)
                .map(|d| decide_name_usage(d, true, &mut usage, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
