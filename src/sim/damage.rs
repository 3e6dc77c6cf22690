//! Damage model: response curve, chain multiplier, boss health pool

use crate::config::BoardConfig;

/// Shared boss health, decremented by resolved clusters and clamped at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossHealth {
    current: u32,
    max: u32,
}

impl BossHealth {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_defeated(&self) -> bool {
        self.current == 0
    }

    /// Subtract `damage`, clamped at zero. Zero damage is a silent no-op;
    /// health never increases from an apply.
    pub fn apply_damage(&mut self, damage: u32) {
        self.current = self.current.saturating_sub(damage);
    }

    /// Back to full, on every board reset.
    pub fn restore(&mut self) {
        self.current = self.max;
    }
}

/// Curve-scaled damage for a cluster of `size` tiles, before chaining.
/// Deliberately super-linear with the default curve: 3, 6 and 9 tiles should
/// feel like different worlds.
pub fn base_damage(config: &BoardConfig, size: usize) -> u32 {
    let scaled = config.base_damage as f32 * config.damage_curve.evaluate(size as f32);
    // float-to-int casts saturate, so a zero/negative curve yields 0 damage
    scaled.round() as u32
}

/// 1.0 for the first resolution of a turn, growing by `chain_step` for every
/// chained resolution after it. Uncapped.
pub fn chain_multiplier(config: &BoardConfig, chain_index: u32) -> f32 {
    1.0 + config.chain_step * chain_index.saturating_sub(1) as f32
}

/// Final damage for the `chain_index`-th cluster of a turn.
pub fn final_damage(config: &BoardConfig, size: usize, chain_index: u32) -> u32 {
    (base_damage(config, size) as f32 * chain_multiplier(config, chain_index)).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_damage_follows_curve() {
        let config = BoardConfig::default();
        // default curve: size 3 -> x1, size 12 -> x6, linear between
        assert_eq!(base_damage(&config, 3), 100);
        assert_eq!(base_damage(&config, 12), 600);
        // size 4 -> 1 + 5/9 multiplier
        assert_eq!(base_damage(&config, 4), 156);
        // clamped past the last key
        assert_eq!(base_damage(&config, 30), 600);
    }

    #[test]
    fn test_damage_monotonic_in_size_and_chain() {
        let config = BoardConfig::default();
        for chain in 1..6 {
            for size in 3..20 {
                assert!(
                    final_damage(&config, size + 1, chain) >= final_damage(&config, size, chain)
                );
                assert!(
                    final_damage(&config, size, chain + 1) >= final_damage(&config, size, chain)
                );
            }
        }
    }

    #[test]
    fn test_chain_multiplier_steps() {
        let config = BoardConfig::default();
        assert_eq!(chain_multiplier(&config, 1), 1.0);
        assert_eq!(chain_multiplier(&config, 2), 1.5);
        assert_eq!(chain_multiplier(&config, 3), 2.0);
        // uncapped
        assert_eq!(chain_multiplier(&config, 11), 6.0);
    }

    #[test]
    fn test_boss_health_clamps_at_zero() {
        let mut boss = BossHealth::new(250);
        boss.apply_damage(100);
        assert_eq!(boss.current(), 150);
        boss.apply_damage(0);
        assert_eq!(boss.current(), 150);
        boss.apply_damage(9999);
        assert_eq!(boss.current(), 0);
        assert!(boss.is_defeated());
        boss.restore();
        assert_eq!(boss.current(), 250);
    }
}
