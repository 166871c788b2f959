//! Bucketed hash grid over world coordinates.
//!
//! Items are bucketed by `floor(x / cell_size), floor(y / cell_size)`. A radius
//! query scans every cell touched by the bounding square of the query circle
//! and keeps only items whose true distance is within the radius. The grid is
//! cleared and refilled every tick.

use super::math::distance;
use super::types::Point;
use std::collections::HashMap;

pub type CellKey = (i64, i64);

const CELL_INITIAL_CAPACITY: usize = 8;

/// Anything that can be bucketed by position.
pub trait GridItem {
  fn position(&self) -> Point;
}

#[derive(Debug)]
pub struct SpatialGrid<T> {
  cell_size: f64,
  cells: HashMap<CellKey, Vec<T>>,
  len: usize,
}

impl<T: GridItem> SpatialGrid<T> {
  pub fn new(cell_size: f64) -> Self {
    Self {
      cell_size,
      cells: HashMap::new(),
      len: 0,
    }
  }

  /// Empties every cell but keeps the allocations for the next rebuild.
  pub fn clear(&mut self) {
    for cell in self.cells.values_mut() {
      cell.clear();
    }
    self.len = 0;
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  fn cell_coord(&self, value: f64) -> i64 {
    (value / self.cell_size).floor() as i64
  }

  pub fn insert(&mut self, item: T) {
    let position = item.position();
    let key = (self.cell_coord(position.x), self.cell_coord(position.y));
    self
      .cells
      .entry(key)
      .or_insert_with(|| Vec::with_capacity(CELL_INITIAL_CAPACITY))
      .push(item);
    self.len += 1;
  }

  /// Every inserted item within `radius` of `center` (inclusive).
  pub fn query(&self, center: Point, radius: f64) -> Vec<&T> {
    let mut results = Vec::new();
    if !radius.is_finite() || radius < 0.0 || !center.x.is_finite() || !center.y.is_finite() {
      return results;
    }

    let min_cx = self.cell_coord(center.x - radius);
    let max_cx = self.cell_coord(center.x + radius);
    let min_cy = self.cell_coord(center.y - radius);
    let max_cy = self.cell_coord(center.y + radius);
    // Casts saturate on huge coordinates, so the cell span must too.
    let width = max_cx.saturating_sub(min_cx).saturating_add(1);
    let height = max_cy.saturating_sub(min_cy).saturating_add(1);
    let span = usize::try_from(width.saturating_mul(height)).unwrap_or(usize::MAX);

    if span > self.cells.len() {
      // Query square covers more cells than are occupied; walk the occupied ones.
      for (&(cx, cy), cell) in &self.cells {
        if cx < min_cx || cx > max_cx || cy < min_cy || cy > max_cy {
          continue;
        }
        results.extend(cell.iter().filter(|item| distance(item.position(), center) <= radius));
      }
      return results;
    }

    for cx in min_cx..=max_cx {
      for cy in min_cy..=max_cy {
        let Some(cell) = self.cells.get(&(cx, cy)) else { continue };
        results.extend(cell.iter().filter(|item| distance(item.position(), center) <= radius));
      }
    }
    results
  }
}
