//! The authoritative simulation state and its per-tick transform.
//!
//! `World` owns every registry the simulation touches. Nothing here is shared
//! or locked: the room task calls into it one operation at a time, and each
//! `tick` returns what happened instead of pushing it anywhere.

use super::bots::{bot_name, steer_bot};
use super::broadcast;
use super::collision::CollisionGrids;
use super::constants::{DEFAULT_PLAYER_NAME, ORB_VALUE, SNAKE_COLORS, SPAWN_MARGIN};
use super::input::parse_heading;
use super::math::random_in_range;
use super::orbs::OrbField;
use super::physics::advance_snake;
use super::registry::Registry;
use super::schedule::{Scheduler, Task};
use super::snake::{create_snake, grow};
use super::types::{Controller, Player, PlayerId, Segment, SessionId};
use crate::app::time::now_millis;
use crate::config::GameConfig;
use crate::protocol::{LeaderboardEntry, WorldUpdate};
use crate::shared::names::sanitize_player_name;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Identity handed back to a session after a join or respawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined {
  pub id: PlayerId,
  pub name: String,
  pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
  PlayerDied {
    player: PlayerId,
    session: Option<SessionId>,
    killer: Option<PlayerId>,
    killer_name: Option<String>,
  },
  /// A body entered the world without a session request (bot respawns).
  PlayerJoined { player: PlayerId, name: String },
}

#[derive(Debug, Clone)]
pub struct TickReport {
  pub tick: u64,
  pub events: Vec<WorldEvent>,
  pub snapshot: WorldUpdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldStats {
  pub players: usize,
  pub bots: usize,
  pub orbs: usize,
  pub tick: u64,
}

#[derive(Debug)]
pub struct World {
  config: Arc<GameConfig>,
  rng: StdRng,
  tick: u64,
  registry: Registry,
  orbs: OrbField,
  grids: CollisionGrids,
  scheduler: Scheduler,
}

impl World {
  pub fn new(config: Arc<GameConfig>, rng: StdRng) -> Self {
    Self {
      config,
      rng,
      tick: 0,
      registry: Registry::new(),
      orbs: OrbField::new(),
      grids: CollisionGrids::new(),
      scheduler: Scheduler::new(),
    }
  }

  pub fn with_seed(config: Arc<GameConfig>, seed: u64) -> Self {
    Self::new(config, StdRng::seed_from_u64(seed))
  }

  pub fn from_entropy(config: Arc<GameConfig>) -> Self {
    Self::new(config, StdRng::from_entropy())
  }

  /// Initial orb fill plus the configured bots.
  pub fn populate(&mut self) {
    self.orbs.fill(&self.config, &mut self.rng);
    for bot in 0..self.config.bot_count {
      self.spawn_entry(Controller::Bot(bot), bot_name(bot));
    }
    info!(orbs = self.orbs.len(), bots = self.config.bot_count, "world populated");
  }

  pub fn config(&self) -> &GameConfig {
    &self.config
  }

  pub fn tick_count(&self) -> u64 {
    self.tick
  }

  pub fn snapshot(&self) -> WorldUpdate {
    broadcast::world_update(&self.registry, &self.orbs, self.tick)
  }

  pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
    broadcast::leaderboard(&self.registry, self.config.leaderboard_size)
  }

  pub fn stats(&self) -> WorldStats {
    WorldStats {
      players: self.registry.human_count(),
      bots: self.registry.bot_count(),
      orbs: self.orbs.len(),
      tick: self.tick,
    }
  }

  /// Places a fresh body for `session`. A session that already owns one gets
  /// it replaced, exactly like a respawn.
  pub fn join(&mut self, session: SessionId, name: Option<&str>) -> Joined {
    let name = sanitize_player_name(name.unwrap_or_default(), DEFAULT_PLAYER_NAME);
    let joined = self.spawn_entry(Controller::Human(session), name);
    info!(%session, player = %joined.id, name = %joined.name, "player joined");
    joined
  }

  /// Replaces the session's entry with a new identity. Unknown sessions are ignored.
  pub fn respawn(&mut self, session: SessionId, name: Option<&str>) -> Option<Joined> {
    let controller = Controller::Human(session);
    self.registry.seat_of(controller)?;
    let name = match name {
      Some(name) => sanitize_player_name(name, DEFAULT_PLAYER_NAME),
      None => self
        .registry
        .for_controller(controller)
        .map(|player| player.name.clone())
        .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string()),
    };
    let joined = self.spawn_entry(controller, name);
    debug!(%session, player = %joined.id, "player respawned");
    Some(joined)
  }

  /// Drops the session's seat. A living body leaves its remains behind.
  pub fn leave(&mut self, session: SessionId) -> Option<PlayerId> {
    let player = self.registry.release_seat(Controller::Human(session))?;
    if player.snake.alive {
      self.orbs.drop_remains(&self.config, &player.snake, &mut self.rng);
    }
    info!(%session, player = %player.id, "player left");
    Some(player.id)
  }

  /// Records steering for the session's body; it takes effect on the next tick.
  ///
  /// Returns false when the session has no living body. A non-finite heading is
  /// discarded but the boost flag still applies.
  pub fn handle_input(&mut self, session: SessionId, angle: Option<f64>, boost: bool) -> bool {
    let Some(player) = self.registry.for_session_mut(session) else {
      return false;
    };
    if !player.snake.alive {
      return false;
    }
    if let Some(heading) = angle.and_then(parse_heading) {
      player.snake.target_angle = heading;
    }
    player.snake.boosting = boost;
    player.last_input = now_millis();
    true
  }

  pub fn tick(&mut self) -> TickReport {
    self.tick += 1;
    let mut events = Vec::new();

    for task in self.scheduler.take_due(self.tick) {
      self.run_task(task, &mut events);
    }
    self.steer_bots();
    self.move_bodies();
    self.grids.rebuild(&self.registry, &self.orbs);
    trace!(
      orbs = self.grids.orb_count(),
      segments = self.grids.segment_count(),
      "collision grids rebuilt"
    );
    self.resolve_collisions(&mut events);

    TickReport {
      tick: self.tick,
      events,
      snapshot: self.snapshot(),
    }
  }

  fn spawn_entry(&mut self, controller: Controller, name: String) -> Joined {
    let slot = self.registry.seat(controller);
    let id = self.registry.next_id(slot);
    let x = random_in_range(&mut self.rng, SPAWN_MARGIN, self.config.world_width - SPAWN_MARGIN);
    let y = random_in_range(&mut self.rng, SPAWN_MARGIN, self.config.world_height - SPAWN_MARGIN);
    let color = SNAKE_COLORS.choose(&mut self.rng).copied().unwrap_or(SNAKE_COLORS[0]);

    let mut snake = create_snake(
      x,
      y,
      self.config.initial_segments,
      self.config.segment_spacing,
      self.config.base_speed,
      color,
    );
    if controller.is_bot() {
      snake.target_angle = self.rng.gen_range(-PI..PI);
    }

    let replaced = self.registry.insert(Player {
      id,
      controller,
      name: name.clone(),
      last_input: now_millis(),
      kills: 0,
      snake,
    });
    if let Some(previous) = replaced.filter(|previous| previous.snake.alive) {
      self.orbs.drop_remains(&self.config, &previous.snake, &mut self.rng);
    }

    Joined { id, name, color }
  }

  fn run_task(&mut self, task: Task, events: &mut Vec<WorldEvent>) {
    match task {
      Task::RemoveEntry(id) => {
        let dead = self.registry.get(id).is_some_and(|player| !player.snake.alive);
        if dead {
          self.registry.remove(id);
        }
      }
      Task::RespawnBot { previous, bot } => {
        let controller = Controller::Bot(bot);
        let current = self.registry.for_controller(controller).map(|player| player.id);
        if current.is_some_and(|current| current != previous) {
          return;
        }
        let joined = self.spawn_entry(controller, bot_name(bot));
        debug!(player = %joined.id, name = %joined.name, "bot respawned");
        events.push(WorldEvent::PlayerJoined {
          player: joined.id,
          name: joined.name,
        });
      }
    }
  }

  fn steer_bots(&mut self) {
    for player in self.registry.iter_mut() {
      if player.controller.is_bot() && player.snake.alive {
        steer_bot(&mut player.snake, &self.config, &mut self.rng);
      }
    }
  }

  fn move_bodies(&mut self) {
    for player in self.registry.iter_mut() {
      if !player.snake.alive {
        continue;
      }
      if let Some(tail) = advance_snake(&mut player.snake, &self.config, &mut self.rng) {
        self.orbs.spawn_at(&self.config, tail.x, tail.y, ORB_VALUE, player.snake.color);
      }
    }
  }

  fn resolve_collisions(&mut self, events: &mut Vec<WorldEvent>) {
    for id in self.registry.alive_ids() {
      self.consume_orbs(id);
      self.check_body_contact(id, events);
    }
  }

  fn living_head(&self, id: PlayerId) -> Option<Segment> {
    self
      .registry
      .get(id)
      .filter(|player| player.snake.alive)
      .and_then(|player| player.snake.head().copied())
  }

  fn consume_orbs(&mut self, id: PlayerId) {
    let Some(head) = self.living_head(id) else { return };
    for touched in self.grids.orbs_touching(&head) {
      // Another head may have reached it first this tick.
      let Some(orb) = self.orbs.remove(touched.id) else { continue };
      if let Some(player) = self.registry.get_mut(id) {
        grow(&mut player.snake, orb.value);
      }
      self.orbs.spawn_random(&self.config, &mut self.rng);
    }
  }

  fn check_body_contact(&mut self, id: PlayerId, events: &mut Vec<WorldEvent>) {
    // Growth may have widened the head since the orb pass.
    let Some(head) = self.living_head(id) else { return };
    let registry = &self.registry;
    let hit = self.grids.body_contact(id, &head, |owner| {
      registry.get(owner).is_some_and(|player| player.snake.alive)
    });
    if let Some(hit) = hit {
      self.kill(id, Some(hit.owner), events);
    }
  }

  fn kill(&mut self, victim: PlayerId, killer: Option<PlayerId>, events: &mut Vec<WorldEvent>) {
    let Some(player) = self.registry.get_mut(victim) else { return };
    if !player.snake.alive {
      return;
    }
    player.snake.alive = false;
    player.snake.boosting = false;
    let controller = player.controller;
    self.orbs.drop_remains(&self.config, &player.snake, &mut self.rng);

    let killer_name = killer
      .and_then(|killer| self.registry.get_mut(killer))
      .map(|killer| {
        killer.kills += 1;
        killer.name.clone()
      });

    let removal_at = self.tick + self.config.ticks_for_ms(self.config.removal_grace_ms);
    self.scheduler.schedule(removal_at, Task::RemoveEntry(victim));
    if let Controller::Bot(bot) = controller {
      let respawn_at = self.tick + self.config.ticks_for_ms(self.config.bot_respawn_ms);
      self.scheduler.schedule(
        respawn_at,
        Task::RespawnBot {
          previous: victim,
          bot,
        },
      );
    }

    debug!(
      player = %victim,
      killer = ?killer,
      tick = self.tick,
      "player died"
    );
    events.push(WorldEvent::PlayerDied {
      player: victim,
      session: controller.session(),
      killer,
      killer_name,
    });
  }
}
