//! Combat-related components.

use bevy::prelude::*;

/// Hit points in half-heart units.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub maximum: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    /// Subtract `amount`, never going below zero. Returns the damage
    /// actually taken.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let actual = amount.max(0).min(self.current.max(0));
        self.current -= actual;
        actual
    }

    /// Add up to `amount`, capped at the maximum. Returns the amount healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let actual = amount.max(0).min((self.maximum - self.current).max(0));
        self.current += actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn percentage(&self) -> f32 {
        if self.maximum <= 0 {
            return 0.0;
        }
        self.current as f32 / self.maximum as f32
    }

    /// At or below half of the maximum (boss phase threshold).
    pub fn at_or_below_half(&self) -> bool {
        self.current * 2 <= self.maximum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_and_heal_are_clamped() {
        let mut health = Health::new(6);
        assert_eq!(health.take_damage(4), 4);
        assert_eq!(health.heal(5), 4);
        assert_eq!(health.current, 6);
        assert_eq!(health.take_damage(10), 6);
        assert_eq!(health.current, 0);
        assert!(health.is_dead());
        assert_eq!(health.take_damage(1), 0);
    }

    #[test]
    fn half_threshold_matches_integer_halving() {
        let mut health = Health::new(45);
        health.current = 23;
        assert!(!health.at_or_below_half());
        health.current = 22;
        assert!(health.at_or_below_half());
    }
}
