use super::constants::{BOT_BOOST_CHANCE, BOT_BOOST_MIN_LENGTH, BOT_TURN_CHANCE, BOT_WALL_MARGIN};
use super::types::Snake;
use crate::config::GameConfig;
use rand::Rng;
use std::f64::consts::{FRAC_PI_2, PI};

pub fn bot_name(index: usize) -> String {
  format!("Bot {}", index + 1)
}

/// Picks the next heading and boost flag for an autonomous body.
///
/// Wanders randomly, turns inward near the walls, and boosts now and then once
/// it has length to spare.
pub fn steer_bot<R: Rng + ?Sized>(snake: &mut Snake, config: &GameConfig, rng: &mut R) {
  if rng.gen_bool(BOT_TURN_CHANCE) {
    snake.target_angle += rng.gen::<f64>() - 0.5;
  }

  if let Some(head) = snake.head().copied() {
    if head.x < BOT_WALL_MARGIN {
      snake.target_angle = 0.0;
    }
    if head.x > config.world_width - BOT_WALL_MARGIN {
      snake.target_angle = PI;
    }
    if head.y < BOT_WALL_MARGIN {
      snake.target_angle = FRAC_PI_2;
    }
    if head.y > config.world_height - BOT_WALL_MARGIN {
      snake.target_angle = -FRAC_PI_2;
    }
  }

  snake.boosting = rng.gen_bool(BOT_BOOST_CHANCE) && snake.len() > BOT_BOOST_MIN_LENGTH;
}
