use super::math::normalize_angle;

/// Validates a client-supplied heading. Non-finite values are rejected.
pub fn parse_heading(value: f64) -> Option<f64> {
  if !value.is_finite() {
    return None;
  }
  Some(normalize_angle(value))
}
