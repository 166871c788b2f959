use super::constants::{BASE_SEGMENT_RADIUS, SEGMENTS_PER_RADIUS_STEP, TAIL_TAPER};
use super::types::{Segment, Snake};

/// Lays out `length` segments horizontally behind a head at `(x, y)`, facing +x.
pub fn create_snake(x: f64, y: f64, length: usize, spacing: f64, speed: f64, color: &'static str) -> Snake {
  let segments = (0..length.max(1))
    .map(|index| Segment {
      x: x - index as f64 * spacing,
      y,
      radius: BASE_SEGMENT_RADIUS,
    })
    .collect();

  Snake {
    segments,
    angle: 0.0,
    target_angle: 0.0,
    speed,
    boosting: false,
    color,
    score: 0,
    alive: true,
  }
}

/// Head radius for a body of `length` segments.
pub fn base_radius_for_len(length: usize) -> f64 {
  BASE_SEGMENT_RADIUS + (length / SEGMENTS_PER_RADIUS_STEP) as f64
}

/// Radius of segment `index` in a body of `length` segments.
pub fn tapered_radius(index: usize, length: usize) -> f64 {
  let base = base_radius_for_len(length);
  let factor = 1.0 - (index as f64 / length.max(1) as f64) * TAIL_TAPER;
  base * factor
}

pub fn update_radii(snake: &mut Snake) {
  let length = snake.segments.len();
  for (index, segment) in snake.segments.iter_mut().enumerate() {
    segment.radius = tapered_radius(index, length);
  }
}

/// Adds `amount` to the score and appends `amount` copies of the tail.
pub fn grow(snake: &mut Snake, amount: u32) {
  snake.score += amount;
  let Some(tail) = snake.segments.last().copied() else { return };
  snake
    .segments
    .extend(std::iter::repeat(tail).take(amount as usize));
  update_radii(snake);
}

/// Removes the tail segment if the body is longer than `min_length`.
pub fn shed_tail(snake: &mut Snake, min_length: usize) -> Option<Segment> {
  if snake.segments.len() <= min_length {
    return None;
  }
  snake.segments.pop()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn snake(length: usize) -> Snake {
    create_snake(500.0, 500.0, length, 5.0, 3.0, "#FF6B6B")
  }

  #[test]
  fn create_lays_segments_behind_head() {
    let snake = snake(10);
    assert_eq!(snake.len(), 10);
    assert!(snake.alive);
    for (index, segment) in snake.segments.iter().enumerate() {
      assert_eq!(segment.x, 500.0 - index as f64 * 5.0);
      assert_eq!(segment.y, 500.0);
      assert_eq!(segment.radius, BASE_SEGMENT_RADIUS);
    }
  }

  #[test]
  fn grow_adds_score_and_segments_by_amount() {
    for amount in [1, 2, 5, 17] {
      let mut snake = snake(10);
      snake.score = 4;
      grow(&mut snake, amount);
      assert_eq!(snake.score, 4 + amount);
      assert_eq!(snake.len(), 10 + amount as usize);
    }
  }

  #[test]
  fn grow_keeps_radii_within_taper_bounds() {
    let mut snake = snake(10);
    for _ in 0..40 {
      grow(&mut snake, 3);
      let base = base_radius_for_len(snake.len());
      for pair in snake.segments.windows(2) {
        assert!(pair[1].radius <= pair[0].radius);
      }
      for segment in &snake.segments {
        assert!(segment.radius <= base + 1e-9);
        assert!(segment.radius >= base * (1.0 - TAIL_TAPER) - 1e-9);
      }
    }
    assert_eq!(snake.segments[0].radius, base_radius_for_len(snake.len()));
  }

  #[test]
  fn longer_bodies_get_larger_heads() {
    assert_eq!(base_radius_for_len(10), 8.0);
    assert_eq!(base_radius_for_len(20), 9.0);
    assert_eq!(base_radius_for_len(65), 11.0);
  }

  #[test]
  fn shed_tail_respects_minimum_length() {
    let mut snake = snake(10);
    assert!(shed_tail(&mut snake, 10).is_none());
    assert_eq!(snake.len(), 10);

    grow(&mut snake, 1);
    let tail = snake.segments.last().copied();
    assert_eq!(shed_tail(&mut snake, 10), tail);
    assert_eq!(snake.len(), 10);
  }
}
