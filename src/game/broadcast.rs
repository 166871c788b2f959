//! Snapshot and ranking assembly.
//!
//! Rounding here only shrinks the wire payload; the registry keeps full precision.

use super::math::round_to;
use super::orbs::OrbField;
use super::registry::Registry;
use super::types::{Orb, Player};
use crate::protocol::{LeaderboardEntry, OrbDto, SegmentDto, SnakeDto, WorldUpdate};
use std::cmp::Reverse;

fn snake_dto(player: &Player) -> SnakeDto {
  SnakeDto {
    id: player.id,
    name: player.name.clone(),
    segments: player
      .snake
      .segments
      .iter()
      .map(|segment| SegmentDto {
        x: round_to(segment.x, 1),
        y: round_to(segment.y, 1),
        radius: round_to(segment.radius, 1),
      })
      .collect(),
    angle: round_to(player.snake.angle, 2),
    color: player.snake.color,
    score: player.snake.score,
    is_boosting: player.snake.boosting,
  }
}

fn orb_dto(orb: &Orb) -> OrbDto {
  OrbDto {
    id: orb.id,
    x: orb.x.round(),
    y: orb.y.round(),
    value: orb.value,
    color: orb.color,
    radius: orb.radius,
  }
}

pub fn world_update(registry: &Registry, orbs: &OrbField, tick: u64) -> WorldUpdate {
  WorldUpdate {
    snakes: registry
      .iter()
      .filter(|player| player.snake.alive)
      .map(snake_dto)
      .collect(),
    orbs: orbs.iter().map(orb_dto).collect(),
    tick,
  }
}

/// Top `limit` living bodies by score, highest first; ties keep registry order.
pub fn leaderboard(registry: &Registry, limit: usize) -> Vec<LeaderboardEntry> {
  let mut entries: Vec<LeaderboardEntry> = registry
    .iter()
    .filter(|player| player.snake.alive)
    .map(|player| LeaderboardEntry {
      id: player.id,
      name: player.name.clone(),
      score: player.snake.score,
    })
    .collect();
  entries.sort_by_key(|entry| Reverse(entry.score));
  entries.truncate(limit);
  entries
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::GameConfig;
  use crate::game::snake::create_snake;
  use crate::game::types::{Controller, PlayerId, SessionId};

  fn add(registry: &mut Registry, name: &str, score: u32, alive: bool) -> PlayerId {
    let controller = Controller::Human(SessionId::new());
    let slot = registry.seat(controller);
    let id = registry.next_id(slot);
    let mut snake = create_snake(123.456, 78.91, 3, 5.0, 3.0, "#fff");
    snake.score = score;
    snake.alive = alive;
    snake.angle = 1.23456;
    registry.insert(Player {
      id,
      controller,
      name: name.to_string(),
      last_input: 0,
      kills: 0,
      snake,
    });
    id
  }

  #[test]
  fn snapshot_rounds_wire_fields_and_skips_dead_bodies() {
    let config = GameConfig::default();
    let mut registry = Registry::new();
    let alive = add(&mut registry, "alive", 1, true);
    add(&mut registry, "dead", 1, false);
    let mut orbs = OrbField::new();
    orbs.spawn_at(&config, 10.6, 20.4, 1, "#abc");

    let update = world_update(&registry, &orbs, 9);

    assert_eq!(update.tick, 9);
    assert_eq!(update.snakes.len(), 1);
    let snake = &update.snakes[0];
    assert_eq!(snake.id, alive);
    assert_eq!(snake.angle, 1.23);
    assert_eq!(snake.segments[0].x, 123.5);
    assert_eq!(snake.segments[0].y, 78.9);
    assert_eq!(update.orbs[0].x, 11.0);
    assert_eq!(update.orbs[0].y, 20.0);

    // Authoritative state keeps full precision.
    let player = registry.get(alive).expect("player");
    assert_eq!(player.snake.segments[0].x, 123.456);
  }

  #[test]
  fn leaderboard_ranks_living_bodies_by_score() {
    let mut registry = Registry::new();
    let low = add(&mut registry, "low", 2, true);
    let high = add(&mut registry, "high", 40, true);
    add(&mut registry, "dead", 99, false);
    let mid = add(&mut registry, "mid", 10, true);

    let ranking = leaderboard(&registry, 10);
    let ids: Vec<PlayerId> = ranking.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![high, mid, low]);

    let top_two = leaderboard(&registry, 2);
    assert_eq!(top_two.len(), 2);
    assert_eq!(top_two[0].score, 40);
  }
}
