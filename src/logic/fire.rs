//! Fire (fuel) service.
//!
//! Fuel is a bounded value in [0, 1]. Reaching either bound emits a single
//! event per crossing; staying at the bound emits nothing further.

use crate::models::settings::FireConfig;
use crate::models::stats::HitTier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireEvent {
    /// Fuel reached 0.
    Extinguished,
    /// Fuel reached 1.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FuelState {
    pub value: f32,
    pub notes_total: u32,
    pub notes_hit: u32,
}

pub struct FireService {
    config: FireConfig,
    state: FuelState,
    pending: Vec<FireEvent>,
}

impl FireService {
    pub fn new(config: FireConfig) -> Self {
        let state = FuelState {
            value: config.initial.clamp(0.0, 1.0),
            ..FuelState::default()
        };
        Self {
            config,
            state,
            pending: Vec::new(),
        }
    }

    pub fn add_fuel(&mut self, amount: f32) {
        self.set(self.state.value + amount.max(0.0));
    }

    pub fn drain(&mut self, amount: f32) {
        self.set(self.state.value - amount.max(0.0));
    }

    pub fn record_hit(&mut self, tier: HitTier) {
        self.state.notes_total += 1;
        self.state.notes_hit += 1;
        let gain = match tier {
            HitTier::Perfect => self.config.perfect_gain,
            HitTier::Good => self.config.good_gain,
            HitTier::Late => self.config.late_gain,
        };
        self.add_fuel(gain);
    }

    pub fn record_miss(&mut self) {
        self.state.notes_total += 1;
        self.drain(self.config.miss_drain);
    }

    /// Relights the fire at the configured revive level.
    pub fn revive(&mut self) {
        log::info!("FIRE: revived at {:.2}", self.config.revive);
        self.set(self.config.revive);
    }

    pub fn ratio(&self) -> f32 {
        self.state.value
    }

    pub fn state(&self) -> FuelState {
        self.state
    }

    pub fn config(&self) -> &FireConfig {
        &self.config
    }

    pub fn is_extinguished(&self) -> bool {
        self.state.value <= 0.0
    }

    /// Returns the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<FireEvent> {
        std::mem::take(&mut self.pending)
    }

    fn set(&mut self, value: f32) {
        let previous = self.state.value;
        let value = value.clamp(0.0, 1.0);
        self.state.value = value;

        if value >= 1.0 && previous < 1.0 {
            log::debug!("FIRE: full");
            self.pending.push(FireEvent::Full);
        } else if value <= 0.0 && previous > 0.0 {
            log::debug!("FIRE: extinguished");
            self.pending.push(FireEvent::Extinguished);
        }
    }
}
