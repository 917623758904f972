//! Health, armour and damage bookkeeping

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::entity::EntityState;

/// Damage type every entity understands
pub const GENERIC_DAMAGE: &str = "Generic";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self {
            current: 100.0,
            max: 100.0,
        }
    }
}

/// Resistance to one damage type
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Damage {
    pub armour: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub health: Health,
    /// Damage types this entity can take, keyed by name
    pub damage_types: HashMap<String, Damage>,
    /// Entities spawn invulnerable and must be opted in to damage
    pub invulnerable: bool,
}

impl Default for Attributes {
    fn default() -> Self {
        let mut damage_types = HashMap::new();
        damage_types.insert(GENERIC_DAMAGE.to_string(), Damage::default());
        Self {
            health: Health::default(),
            damage_types,
            invulnerable: true,
        }
    }
}

impl Attributes {
    /// Set armour for a damage type, registering the type if needed
    pub fn set_armour(&mut self, kind: &str, armour: f32) {
        self.damage_types
            .entry(kind.to_string())
            .or_default()
            .armour = armour;
    }

    /// Apply `amount` of `kind` damage, minus armour
    ///
    /// Ignored for dead or invulnerable entities and unknown damage types.
    /// Returns true only on the hit that kills.
    pub fn take_damage(&mut self, state: &mut EntityState, kind: &str, amount: f32) -> bool {
        if *state == EntityState::Dead || self.invulnerable {
            return false;
        }
        let Some(damage) = self.damage_types.get(kind) else {
            return false;
        };

        let taken = (amount - damage.armour).max(0.0);
        self.health.current -= taken;

        if self.health.current <= 0.0 {
            self.health.current = 0.0;
            *state = EntityState::Dead;
            return true;
        }
        false
    }
}
