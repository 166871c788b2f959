use super::constants::{
  DEATH_ORB_JITTER, DEATH_ORB_STRIDE, DEATH_ORB_VALUE, ORB_COLORS, ORB_RADIUS, ORB_SPAWN_MARGIN, ORB_VALUE,
};
use super::math::{clamp, random_in_range};
use super::types::{Orb, OrbId, Snake};
use crate::config::GameConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Every consumable orb in the world, keyed by a monotonically increasing id.
#[derive(Debug, Default)]
pub struct OrbField {
  orbs: BTreeMap<OrbId, Orb>,
  next_id: OrbId,
}

impl OrbField {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.orbs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.orbs.is_empty()
  }

  pub fn get(&self, id: OrbId) -> Option<&Orb> {
    self.orbs.get(&id)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Orb> {
    self.orbs.values()
  }

  pub fn remove(&mut self, id: OrbId) -> Option<Orb> {
    self.orbs.remove(&id)
  }

  /// Places an orb, clamped into the world bounds.
  pub fn spawn_at(&mut self, config: &GameConfig, x: f64, y: f64, value: u32, color: &'static str) -> OrbId {
    let id = self.next_id;
    self.next_id = self.next_id.wrapping_add(1);
    self.orbs.insert(
      id,
      Orb {
        id,
        x: clamp(x, 0.0, config.world_width),
        y: clamp(y, 0.0, config.world_height),
        value,
        color,
        radius: ORB_RADIUS,
      },
    );
    id
  }

  pub fn spawn_random<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) -> OrbId {
    let x = random_in_range(rng, ORB_SPAWN_MARGIN, config.world_width - ORB_SPAWN_MARGIN);
    let y = random_in_range(rng, ORB_SPAWN_MARGIN, config.world_height - ORB_SPAWN_MARGIN);
    let color = ORB_COLORS.choose(rng).copied().unwrap_or(ORB_COLORS[0]);
    self.spawn_at(config, x, y, ORB_VALUE, color)
  }

  /// Initial fill up to the configured population.
  pub fn fill<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
    while self.orbs.len() < config.orb_count {
      self.spawn_random(config, rng);
    }
  }

  /// Turns every third segment of a dead body into a high-value orb in its color.
  pub fn drop_remains<R: Rng + ?Sized>(&mut self, config: &GameConfig, snake: &Snake, rng: &mut R) -> usize {
    let mut dropped = 0;
    for segment in snake.segments.iter().step_by(DEATH_ORB_STRIDE) {
      let x = segment.x + (rng.gen::<f64>() - 0.5) * DEATH_ORB_JITTER;
      let y = segment.y + (rng.gen::<f64>() - 0.5) * DEATH_ORB_JITTER;
      self.spawn_at(config, x, y, DEATH_ORB_VALUE, snake.color);
      dropped += 1;
    }
    dropped
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::snake::create_snake;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  #[test]
  fn fill_reaches_target_inside_margins() {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(11);
    let mut field = OrbField::new();
    field.fill(&config, &mut rng);
    assert_eq!(field.len(), config.orb_count);
    for orb in field.iter() {
      assert!(orb.x >= ORB_SPAWN_MARGIN && orb.x <= config.world_width - ORB_SPAWN_MARGIN);
      assert!(orb.y >= ORB_SPAWN_MARGIN && orb.y <= config.world_height - ORB_SPAWN_MARGIN);
      assert_eq!(orb.value, ORB_VALUE);
      assert!(ORB_COLORS.contains(&orb.color));
    }
  }

  #[test]
  fn ids_are_never_reused() {
    let config = GameConfig::default();
    let mut field = OrbField::new();
    let first = field.spawn_at(&config, 10.0, 10.0, 1, "#fff");
    field.remove(first);
    let second = field.spawn_at(&config, 10.0, 10.0, 1, "#fff");
    assert_ne!(first, second);
  }

  #[test]
  fn remains_drop_every_third_segment_in_body_color() {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(5);
    let snake = create_snake(1000.0, 1000.0, 10, 5.0, 3.0, "#BB8FCE");
    let mut field = OrbField::new();

    let dropped = field.drop_remains(&config, &snake, &mut rng);

    assert_eq!(dropped, 4);
    assert_eq!(field.len(), 4);
    for (orb, segment) in field.iter().zip(snake.segments.iter().step_by(3)) {
      assert_eq!(orb.value, DEATH_ORB_VALUE);
      assert_eq!(orb.color, "#BB8FCE");
      assert!((orb.x - segment.x).abs() <= DEATH_ORB_JITTER / 2.0);
      assert!((orb.y - segment.y).abs() <= DEATH_ORB_JITTER / 2.0);
    }
  }

  #[test]
  fn drops_are_clamped_into_the_world() {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(5);
    let snake = create_snake(0.0, 0.0, 30, 5.0, 3.0, "#fff");
    let mut field = OrbField::new();
    field.drop_remains(&config, &snake, &mut rng);
    for orb in field.iter() {
      assert!(orb.x >= 0.0 && orb.y >= 0.0);
    }
  }
}
