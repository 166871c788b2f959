use super::constants::{BOOST_DRAIN_CHANCE, BOOST_MIN_LENGTH};
use super::math::{clamp, turn_toward};
use super::snake::shed_tail;
use super::types::{Segment, Snake};
use crate::config::GameConfig;
use rand::Rng;

/// Advances one living body by a single tick.
///
/// Returns the tail segment shed by boosting, if any; the caller turns it into an orb.
pub fn advance_snake<R: Rng + ?Sized>(snake: &mut Snake, config: &GameConfig, rng: &mut R) -> Option<Segment> {
  snake.angle = turn_toward(snake.angle, snake.target_angle, config.max_turn_rate);
  snake.speed = if snake.boosting {
    config.boost_speed
  } else {
    config.base_speed
  };

  let head = snake.segments.first_mut()?;
  head.x = clamp(head.x + snake.angle.cos() * snake.speed, 0.0, config.world_width);
  head.y = clamp(head.y + snake.angle.sin() * snake.speed, 0.0, config.world_height);

  follow_leaders(&mut snake.segments, config.segment_spacing);

  if snake.boosting && snake.segments.len() > BOOST_MIN_LENGTH && rng.gen_bool(BOOST_DRAIN_CHANCE) {
    return shed_tail(snake, BOOST_MIN_LENGTH);
  }
  None
}

/// Pulls every segment back to `spacing` from its leader when it trails too far.
pub fn follow_leaders(segments: &mut [Segment], spacing: f64) {
  for index in 1..segments.len() {
    let leader = segments[index - 1];
    let current = &mut segments[index];
    let dx = leader.x - current.x;
    let dy = leader.y - current.y;
    let dist = dx.hypot(dy);
    if dist > spacing {
      let ratio = spacing / dist;
      current.x = leader.x - dx * ratio;
      current.y = leader.y - dy * ratio;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::snake::create_snake;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn config() -> GameConfig {
    GameConfig::default()
  }

  fn link_lengths_ok(snake: &Snake, spacing: f64) -> bool {
    snake
      .segments
      .windows(2)
      .all(|pair| (pair[0].x - pair[1].x).hypot(pair[0].y - pair[1].y) <= spacing + 1e-9)
  }

  #[test]
  fn head_moves_along_heading_at_base_speed() {
    let config = config();
    let mut rng = StdRng::seed_from_u64(1);
    let mut snake = create_snake(100.0, 100.0, 10, config.segment_spacing, config.base_speed, "#fff");
    advance_snake(&mut snake, &config, &mut rng);
    assert!((snake.segments[0].x - 103.0).abs() < 1e-9);
    assert!((snake.segments[0].y - 100.0).abs() < 1e-9);
  }

  #[test]
  fn boosting_uses_boost_speed() {
    let config = config();
    let mut rng = StdRng::seed_from_u64(1);
    let mut snake = create_snake(100.0, 100.0, 10, config.segment_spacing, config.base_speed, "#fff");
    snake.boosting = true;
    advance_snake(&mut snake, &config, &mut rng);
    assert_eq!(snake.speed, config.boost_speed);
    assert!((snake.segments[0].x - 106.0).abs() < 1e-9);
  }

  #[test]
  fn head_is_clamped_at_right_edge() {
    let config = config();
    let mut rng = StdRng::seed_from_u64(1);
    let mut snake = create_snake(config.world_width, 500.0, 10, config.segment_spacing, config.base_speed, "#fff");
    for _ in 0..10 {
      advance_snake(&mut snake, &config, &mut rng);
      assert!(snake.segments[0].x <= config.world_width);
    }
    assert_eq!(snake.segments[0].x, config.world_width);
  }

  #[test]
  fn turning_is_rate_limited() {
    let config = config();
    let mut rng = StdRng::seed_from_u64(1);
    let mut snake = create_snake(500.0, 500.0, 10, config.segment_spacing, config.base_speed, "#fff");
    snake.target_angle = 3.0;
    advance_snake(&mut snake, &config, &mut rng);
    assert!((snake.angle - config.max_turn_rate).abs() < 1e-12);
  }

  #[test]
  fn links_never_exceed_spacing_through_sharp_turns() {
    let config = config();
    let mut rng = StdRng::seed_from_u64(9);
    let mut snake = create_snake(1500.0, 1500.0, 40, config.segment_spacing, config.base_speed, "#fff");
    for step in 0..400 {
      if step % 15 == 0 {
        snake.target_angle = -snake.target_angle + 2.5;
      }
      snake.boosting = step % 3 == 0;
      advance_snake(&mut snake, &config, &mut rng);
      assert!(link_lengths_ok(&snake, config.segment_spacing), "step {step}");
    }
  }

  #[test]
  fn boost_never_sheds_at_minimum_length() {
    let config = config();
    let mut rng = StdRng::seed_from_u64(3);
    let mut snake = create_snake(1500.0, 1500.0, BOOST_MIN_LENGTH, config.segment_spacing, config.base_speed, "#fff");
    snake.boosting = true;
    for _ in 0..500 {
      snake.target_angle += 0.05;
      assert!(advance_snake(&mut snake, &config, &mut rng).is_none());
      assert_eq!(snake.len(), BOOST_MIN_LENGTH);
    }
  }

  #[test]
  fn boost_eventually_sheds_above_minimum_length() {
    let config = config();
    let mut rng = StdRng::seed_from_u64(3);
    let mut snake = create_snake(1500.0, 1500.0, BOOST_MIN_LENGTH + 5, config.segment_spacing, config.base_speed, "#fff");
    snake.boosting = true;
    let mut shed = 0;
    for _ in 0..1000 {
      snake.target_angle += 0.05;
      if advance_snake(&mut snake, &config, &mut rng).is_some() {
        shed += 1;
      }
    }
    assert_eq!(shed, 5);
    assert_eq!(snake.len(), BOOST_MIN_LENGTH);
  }
}
