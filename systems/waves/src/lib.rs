#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduling system that releases enemy spawns on simulated time.
//!
//! The controller never touches enemies directly. It hands due
//! [`WaveAction`]s to the world, which performs the spawn and reports back how
//! many enemies remain so completion can be observed.

pub mod schedule;

use std::time::Duration;

use yasashi_tower_core::WaveConfig;

pub use schedule::DeferredQueue;

/// Lifecycle of the wave currently tracked by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    /// No wave has started yet, or the next one is still pending.
    Idle,
    /// Spawns for the wave are scheduled or enemies from it remain.
    Spawning {
        /// One-based wave number.
        wave: u32,
    },
    /// The wave was observed as cleared.
    Cleared {
        /// One-based wave number.
        wave: u32,
    },
}

/// Deferred work released by [`WaveController::poll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveAction {
    /// The given wave should start now.
    StartWave {
        /// One-based wave number.
        wave: u32,
    },
    /// One enemy of the wave should enter the path at its first waypoint.
    SpawnEnemy {
        /// Wave the enemy belongs to.
        wave: u32,
        /// Zero-based position of the spawn within its wave.
        ordinal: u32,
    },
}

/// State machine driving wave starts, spawn bursts, and completion.
#[derive(Debug)]
pub struct WaveController {
    config: WaveConfig,
    phase: WavePhase,
    schedule: DeferredQueue<WaveAction>,
    scheduled_spawns: u32,
    fired_spawns: u32,
}

impl WaveController {
    /// Creates an idle controller using the provided cadence.
    #[must_use]
    pub fn new(config: WaveConfig) -> Self {
        Self {
            config,
            phase: WavePhase::Idle,
            schedule: DeferredQueue::new(),
            scheduled_spawns: 0,
            fired_spawns: 0,
        }
    }

    /// Defers the start of `wave` until the clock reaches `at`.
    pub fn schedule_wave(&mut self, wave: u32, at: Duration) {
        self.schedule.schedule(at, WaveAction::StartWave { wave });
    }

    /// Starts `wave` at `now`, scheduling its spawns one interval apart.
    ///
    /// The first spawn is due at `now`. Returns the number of enemies the wave
    /// will release.
    pub fn start_wave(&mut self, wave: u32, now: Duration) -> u32 {
        let enemy_count = self.config.enemy_count(wave);
        let interval = self.config.spawn_interval();

        let mut fire_at = now;
        for ordinal in 0..enemy_count {
            self.schedule
                .schedule(fire_at, WaveAction::SpawnEnemy { wave, ordinal });
            fire_at = fire_at.saturating_add(interval);
        }

        self.phase = WavePhase::Spawning { wave };
        self.scheduled_spawns = enemy_count;
        self.fired_spawns = 0;
        enemy_count
    }

    /// Releases the earliest action due at or before `now` with its fire time.
    pub fn poll(&mut self, now: Duration) -> Option<(Duration, WaveAction)> {
        let (fire_at, action) = self.schedule.pop_due(now)?;
        if let WaveAction::SpawnEnemy { .. } = action {
            self.fired_spawns = self.fired_spawns.saturating_add(1);
        }
        Some((fire_at, action))
    }

    /// Reports whether the active wave has just been cleared.
    ///
    /// A wave is cleared once every scheduled spawn has fired and no enemies
    /// remain. The first positive observation moves the controller to
    /// [`WavePhase::Cleared`], so each wave reports `true` exactly once.
    pub fn is_wave_cleared(&mut self, live_enemies: usize) -> bool {
        let WavePhase::Spawning { wave } = self.phase else {
            return false;
        };

        if self.fired_spawns < self.scheduled_spawns || live_enemies > 0 {
            return false;
        }

        self.phase = WavePhase::Cleared { wave };
        true
    }

    /// Drops every pending wave start and spawn, returning how many were dropped.
    pub fn cancel(&mut self) -> usize {
        self.schedule.cancel_all()
    }

    /// Current phase of the controller.
    #[must_use]
    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Number of wave starts and spawns still waiting to fire.
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.schedule.len()
    }

    /// Fire time of the next pending action, if any.
    #[must_use]
    pub fn next_action_at(&self) -> Option<Duration> {
        self.schedule.next_fire_time()
    }

    /// Cadence the controller was configured with.
    #[must_use]
    pub fn config(&self) -> &WaveConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_controller_never_reports_cleared() {
        let mut controller = WaveController::new(WaveConfig::default());
        assert!(!controller.is_wave_cleared(0));
        assert_eq!(controller.phase(), WavePhase::Idle);
    }

    #[test]
    fn start_wave_schedules_growing_bursts() {
        let mut controller = WaveController::new(WaveConfig::default());
        assert_eq!(controller.start_wave(1, Duration::ZERO), 7);
        assert_eq!(controller.pending_actions(), 7);

        let mut controller = WaveController::new(WaveConfig::default());
        assert_eq!(controller.start_wave(3, Duration::ZERO), 11);
    }
}
