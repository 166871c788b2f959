use super::types::Point;
use rand::Rng;
use std::f64::consts::PI;

pub fn distance(a: Point, b: Point) -> f64 {
  (a.x - b.x).hypot(a.y - b.y)
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
  value.max(min).min(max)
}

/// Wraps an angle into (-PI, PI].
pub fn normalize_angle(angle: f64) -> f64 {
  let mut wrapped = angle % (PI * 2.0);
  if wrapped > PI {
    wrapped -= PI * 2.0;
  } else if wrapped <= -PI {
    wrapped += PI * 2.0;
  }
  wrapped
}

/// Moves `current` toward `target` along the shortest arc, by at most `max_delta`.
pub fn turn_toward(current: f64, target: f64, max_delta: f64) -> f64 {
  let diff = normalize_angle(target - current);
  if diff.abs() <= max_delta {
    return normalize_angle(target);
  }
  normalize_angle(current + max_delta.copysign(diff))
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
  let factor = 10f64.powi(decimals);
  (value * factor).round() / factor
}

pub fn random_in_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
  if max <= min {
    return min;
  }
  rng.gen_range(min..max)
}
