#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for Yasashi Tower.
//!
//! The [`World`] owns every enemy and tower of a run. It only changes through
//! [`apply`] and the command functions next to it, and reports every change as
//! an [`Event`]. Read access goes through the [`query`] module.

pub mod enemies;
pub mod towers;

use std::time::Duration;

use log::{debug, info, warn};
use yasashi_tower_core::{
    Command, ConfigError, EnemyId, EnemyStatus, Event, PlacementError, RunOutcome,
    SimulationConfig, SimulationError, TowerCommandError, TowerId, TowerSnapshot, TowerUpgrade,
    Vec2,
};
use yasashi_tower_system_placement::PlacementValidator;
use yasashi_tower_system_waves::{WaveAction, WaveController};

pub use enemies::Enemy;
pub use towers::{Attack, Tower};

/// Represents the authoritative state of a single run.
#[derive(Debug)]
pub struct World {
    config: SimulationConfig,
    validator: PlacementValidator,
    waves: WaveController,
    enemies: Vec<Enemy>,
    towers: Vec<Tower>,
    lives: u32,
    score: u32,
    current_wave: u32,
    elapsed: Duration,
    outcome: Option<RunOutcome>,
    next_enemy_id: u32,
    next_tower_id: u32,
}

impl World {
    /// Creates a world for a fresh run and schedules its first wave.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut waves = WaveController::new(config.waves);
        waves.schedule_wave(1, config.waves.first_wave_delay());

        Ok(Self {
            lives: config.economy.starting_lives,
            validator: PlacementValidator::new(),
            waves,
            enemies: Vec::new(),
            towers: Vec::new(),
            score: 0,
            current_wave: 1,
            elapsed: Duration::ZERO,
            outcome: None,
            next_enemy_id: 0,
            next_tower_id: 0,
            config,
        })
    }

    fn remaining_tower_budget(&self) -> u32 {
        let placed = u32::try_from(self.towers.len()).unwrap_or(u32::MAX);
        self.config.economy.max_tower_budget.saturating_sub(placed)
    }

    fn tower_mut(&mut self, tower: TowerId) -> Option<&mut Tower> {
        let index = self
            .towers
            .binary_search_by_key(&tower, |existing| existing.id())
            .ok()?;
        self.towers.get_mut(index)
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) -> Result<(), SimulationError> {
        if let Some(outcome) = self.outcome {
            warn!("tick rejected: run already ended ({outcome:?})");
            return Err(SimulationError::RunEnded);
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        self.fire_due_actions(out_events);

        self.advance_enemies(dt.as_secs_f32(), out_events);
        if self.resolve_escapes(out_events) {
            return Ok(());
        }

        self.run_towers(dt, out_events);
        self.resolve_defeats(out_events);
        self.resolve_wave_completion(out_events);
        Ok(())
    }

    fn fire_due_actions(&mut self, out_events: &mut Vec<Event>) {
        while let Some((fire_at, action)) = self.waves.poll(self.elapsed) {
            match action {
                WaveAction::StartWave { wave } => {
                    self.current_wave = wave;
                    let enemy_count = self.waves.start_wave(wave, fire_at);
                    info!(
                        "wave {wave}/{} started with {enemy_count} enemies",
                        self.config.waves.total_waves
                    );
                    out_events.push(Event::WaveStarted { wave, enemy_count });
                }
                WaveAction::SpawnEnemy { wave, .. } => self.spawn_enemy(wave, out_events),
            }
        }
    }

    fn spawn_enemy(&mut self, wave: u32, out_events: &mut Vec<Event>) {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);

        let enemy = Enemy::spawn(id, wave, &self.config.path, &self.config.enemy);
        debug!("enemy {} of wave {wave} spawned", id.get());
        out_events.push(Event::EnemySpawned {
            enemy: id,
            wave,
            position: enemy.position(),
        });
        self.enemies.push(enemy);
    }

    fn advance_enemies(&mut self, seconds: f32, out_events: &mut Vec<Event>) {
        for enemy in self.enemies.iter_mut().filter(|enemy| enemy.is_alive()) {
            let from = enemy.position();
            enemy.advance(&self.config.path, enemy.speed() * seconds);
            let to = enemy.position();
            if to != from {
                out_events.push(Event::EnemyMoved {
                    enemy: enemy.id(),
                    from,
                    to,
                });
            }
        }
    }

    /// Removes escaped enemies and reports whether the run was lost.
    fn resolve_escapes(&mut self, out_events: &mut Vec<Event>) -> bool {
        let escaped = self.take_enemies(EnemyStatus::ReachedGoal);
        if escaped.is_empty() {
            return false;
        }

        for enemy in escaped {
            self.lives = self.lives.saturating_sub(1);
            debug!(
                "enemy {} reached the goal, {} lives left",
                enemy.id().get(),
                self.lives
            );
            out_events.push(Event::EnemyReachedGoal {
                enemy: enemy.id(),
                lives_remaining: self.lives,
            });
        }

        if self.lives > 0 {
            return false;
        }

        self.end_run(RunOutcome::Lost, out_events);
        true
    }

    fn run_towers(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for tower in self.towers.iter_mut().filter(|tower| tower.is_active()) {
            let Some(attack) = tower.tick(dt, &mut self.enemies) else {
                continue;
            };

            debug!(
                "tower {} hit enemy {} for {}",
                tower.id().get(),
                attack.enemy.get(),
                attack.damage
            );
            out_events.push(Event::TowerAttacked {
                tower: tower.id(),
                enemy: attack.enemy,
                damage: attack.damage,
            });
        }
    }

    fn resolve_defeats(&mut self, out_events: &mut Vec<Event>) {
        for enemy in self.take_enemies(EnemyStatus::Defeated) {
            let reward = enemy.reward();
            self.score = self.score.saturating_add(reward);
            debug!("enemy {} defeated for {reward} points", enemy.id().get());
            out_events.push(Event::EnemyDefeated {
                enemy: enemy.id(),
                reward,
            });
        }
    }

    fn resolve_wave_completion(&mut self, out_events: &mut Vec<Event>) {
        if !self.waves.is_wave_cleared(self.enemies.len()) {
            return;
        }

        let wave = self.current_wave;
        let bonus = self
            .config
            .economy
            .wave_clear_bonus_per_wave
            .saturating_mul(wave);
        self.score = self.score.saturating_add(bonus);
        info!("wave {wave} cleared, bonus {bonus}");
        out_events.push(Event::WaveCleared { wave, bonus });

        if wave >= self.config.waves.total_waves {
            self.end_run(RunOutcome::Won, out_events);
            return;
        }

        self.current_wave = wave + 1;
        let start_at = self
            .elapsed
            .saturating_add(self.config.waves.inter_wave_delay());
        self.waves.schedule_wave(self.current_wave, start_at);
    }

    /// Removes every enemy with `status`, preserving spawn order on both sides.
    fn take_enemies(&mut self, status: EnemyStatus) -> Vec<Enemy> {
        if self.enemies.iter().all(|enemy| enemy.status() != status) {
            return Vec::new();
        }

        let (taken, kept): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut self.enemies)
            .into_iter()
            .partition(|enemy| enemy.status() == status);
        self.enemies = kept;
        taken
    }

    fn end_run(&mut self, outcome: RunOutcome, out_events: &mut Vec<Event>) {
        self.outcome = Some(outcome);
        let cancelled = self.waves.cancel();
        info!(
            "run ended ({outcome:?}) after {:.2}s with score {}, {cancelled} pending actions cancelled",
            self.elapsed.as_secs_f32(),
            self.score
        );
        out_events.push(Event::GameEnded {
            won: outcome.is_win(),
        });
    }

    fn admit_tower(&mut self, at: Vec2) -> Result<&Tower, PlacementError> {
        if self.outcome.is_some() {
            return Err(PlacementError::RunEnded);
        }
        if self.remaining_tower_budget() == 0 {
            return Err(PlacementError::BudgetExceeded);
        }

        let position = self.config.board.snap(at);
        self.validator
            .check(
                position,
                &self.config.path,
                self.towers.iter().map(Tower::position),
                &self.config.board,
            )
            .map_err(PlacementError::InvalidPlacement)?;

        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id = self.next_tower_id.saturating_add(1);
        self.towers.push(Tower::new(id, position, &self.config.tower));
        debug_assert_eq!(
            self.remaining_tower_budget() as usize + self.towers.len(),
            self.config.economy.max_tower_budget as usize
        );

        let index = self.towers.len() - 1;
        Ok(&self.towers[index])
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), SimulationError> {
    match command {
        Command::Tick { dt } => tick(world, dt, out_events),
        Command::PlaceTower { at } => place_tower(world, at, out_events)
            .map(|_| ())
            .map_err(SimulationError::from),
        Command::UpgradeTower { tower, upgrade } => {
            upgrade_tower(world, tower, upgrade, out_events)
                .map(|_| ())
                .map_err(SimulationError::from)
        }
        Command::SetTowerActive { tower, active } => {
            set_tower_active(world, tower, active, out_events).map_err(SimulationError::from)
        }
    }
}

/// Advances the run by `dt` of simulated time.
///
/// Deferred wave starts and spawns fire first, then enemies move, escapes are
/// counted, towers attack, defeats are scored, and wave completion is checked.
/// Fails with [`SimulationError::RunEnded`] once the run is over, leaving the
/// world untouched.
pub fn tick(
    world: &mut World,
    dt: Duration,
    out_events: &mut Vec<Event>,
) -> Result<(), SimulationError> {
    world.tick(dt, out_events)
}

/// Places a tower at `at`, snapped to the centre of its placement-grid cell.
///
/// Rejections leave the world untouched and are also broadcast as
/// [`Event::TowerPlacementRejected`].
pub fn place_tower(
    world: &mut World,
    at: Vec2,
    out_events: &mut Vec<Event>,
) -> Result<TowerSnapshot, PlacementError> {
    match world.admit_tower(at) {
        Ok(tower) => {
            let snapshot = tower.snapshot();
            debug!(
                "tower {} placed at ({}, {})",
                snapshot.id.get(),
                snapshot.position.x,
                snapshot.position.y
            );
            out_events.push(Event::TowerPlaced {
                tower: snapshot.id,
                position: snapshot.position,
            });
            Ok(snapshot)
        }
        Err(reason) => {
            warn!("tower placement at ({}, {}) rejected: {reason}", at.x, at.y);
            out_events.push(Event::TowerPlacementRejected {
                requested: at,
                reason,
            });
            Err(reason)
        }
    }
}

/// Applies an additive upgrade to an existing tower.
pub fn upgrade_tower(
    world: &mut World,
    tower: TowerId,
    upgrade: TowerUpgrade,
    out_events: &mut Vec<Event>,
) -> Result<TowerSnapshot, TowerCommandError> {
    let Some(target) = world.tower_mut(tower) else {
        warn!("upgrade rejected: tower {} does not exist", tower.get());
        return Err(TowerCommandError::MissingTower { tower });
    };

    target.upgrade(upgrade);
    let snapshot = target.snapshot();
    out_events.push(Event::TowerUpgraded {
        tower,
        damage: snapshot.damage,
        range: snapshot.range,
        attack_rate: snapshot.attack_rate,
    });
    Ok(snapshot)
}

/// Enables or disables an existing tower.
pub fn set_tower_active(
    world: &mut World,
    tower: TowerId,
    active: bool,
    out_events: &mut Vec<Event>,
) -> Result<(), TowerCommandError> {
    let Some(target) = world.tower_mut(tower) else {
        warn!("activation change rejected: tower {} does not exist", tower.get());
        return Err(TowerCommandError::MissingTower { tower });
    };

    if target.is_active() != active {
        target.set_active(active);
        out_events.push(Event::TowerActivationChanged { tower, active });
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Enemy, Tower, World};
    use yasashi_tower_core::{
        RunOutcome, SimulationConfig, SimulationSnapshot, TowerId, WaveProgress,
    };
    use yasashi_tower_system_waves::WavePhase;

    /// Captures the whole simulation for rendering and UI.
    #[must_use]
    pub fn snapshot(world: &World) -> SimulationSnapshot {
        SimulationSnapshot {
            elapsed: world.elapsed,
            enemies: world.enemies.iter().map(Enemy::snapshot).collect(),
            towers: world.towers.iter().map(Tower::snapshot).collect(),
            lives: world.lives,
            score: world.score,
            wave: wave_progress(world),
            remaining_tower_budget: world.remaining_tower_budget(),
            max_tower_budget: world.config.economy.max_tower_budget,
            outcome: world.outcome,
        }
    }

    /// Enemies currently on the path, in spawn order.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        &world.enemies
    }

    /// Towers in placement order.
    #[must_use]
    pub fn towers(world: &World) -> &[Tower] {
        &world.towers
    }

    /// Looks up a tower by identifier.
    #[must_use]
    pub fn tower(world: &World, tower: TowerId) -> Option<&Tower> {
        world
            .towers
            .binary_search_by_key(&tower, |existing| existing.id())
            .ok()
            .and_then(|index| world.towers.get(index))
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Accumulated score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Wave counter as displayed to the player.
    #[must_use]
    pub fn wave_progress(world: &World) -> WaveProgress {
        WaveProgress {
            current: world.current_wave,
            total: world.config.waves.total_waves,
        }
    }

    /// Phase of the wave controller.
    #[must_use]
    pub fn wave_phase(world: &World) -> WavePhase {
        world.waves.phase()
    }

    /// Simulated time until the next wave start or spawn, if one is pending.
    #[must_use]
    pub fn next_scheduled_action(world: &World) -> Option<Duration> {
        world
            .waves
            .next_action_at()
            .map(|at| at.saturating_sub(world.elapsed))
    }

    /// Towers that may still be placed.
    #[must_use]
    pub fn remaining_tower_budget(world: &World) -> u32 {
        world.remaining_tower_budget()
    }

    /// Simulated time elapsed since the run began.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Terminal result, once the run has ended.
    #[must_use]
    pub fn outcome(world: &World) -> Option<RunOutcome> {
        world.outcome
    }

    /// Configuration the run was created with.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }
}
