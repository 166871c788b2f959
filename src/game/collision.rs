use super::constants::{BODY_CONTACT_TOLERANCE, COLLISION_LOOKAHEAD, GRID_CELL_SIZE, NECK_SEGMENTS};
use super::grid::{GridItem, SpatialGrid};
use super::math::distance;
use super::orbs::OrbField;
use super::registry::Registry;
use super::types::{OrbId, PlayerId, Point, Segment};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbEntry {
  pub id: OrbId,
  pub x: f64,
  pub y: f64,
  pub radius: f64,
}

impl GridItem for OrbEntry {
  fn position(&self) -> Point {
    Point { x: self.x, y: self.y }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentEntry {
  pub owner: PlayerId,
  pub index: usize,
  pub x: f64,
  pub y: f64,
  pub radius: f64,
}

impl GridItem for SegmentEntry {
  fn position(&self) -> Point {
    Point { x: self.x, y: self.y }
  }
}

/// Per-tick projections of orbs and body segments.
#[derive(Debug)]
pub struct CollisionGrids {
  orbs: SpatialGrid<OrbEntry>,
  segments: SpatialGrid<SegmentEntry>,
}

impl Default for CollisionGrids {
  fn default() -> Self {
    Self::new()
  }
}

impl CollisionGrids {
  pub fn new() -> Self {
    Self {
      orbs: SpatialGrid::new(GRID_CELL_SIZE),
      segments: SpatialGrid::new(GRID_CELL_SIZE),
    }
  }

  /// Refills both grids from scratch. Only segments past the neck of living
  /// bodies are indexed.
  pub fn rebuild(&mut self, registry: &Registry, orbs: &OrbField) {
    self.orbs.clear();
    self.segments.clear();

    for orb in orbs.iter() {
      self.orbs.insert(OrbEntry {
        id: orb.id,
        x: orb.x,
        y: orb.y,
        radius: orb.radius,
      });
    }

    for player in registry.iter().filter(|player| player.snake.alive) {
      for (index, segment) in player.snake.segments.iter().enumerate().skip(NECK_SEGMENTS) {
        self.segments.insert(SegmentEntry {
          owner: player.id,
          index,
          x: segment.x,
          y: segment.y,
          radius: segment.radius,
        });
      }
    }
  }

  pub fn orb_count(&self) -> usize {
    self.orbs.len()
  }

  pub fn segment_count(&self) -> usize {
    self.segments.len()
  }

  /// Orbs overlapping `head`, ordered by id.
  pub fn orbs_touching(&self, head: &Segment) -> Vec<OrbEntry> {
    let center = head.point();
    let mut touching: Vec<OrbEntry> = self
      .orbs
      .query(center, head.radius + COLLISION_LOOKAHEAD)
      .into_iter()
      .filter(|orb| distance(orb.position(), center) < head.radius + orb.radius)
      .copied()
      .collect();
    touching.sort_by_key(|orb| orb.id);
    touching
  }

  /// The deepest contact between `head` and another living body, if any.
  ///
  /// `is_alive` lets the caller exclude bodies that already died this tick.
  pub fn body_contact(
    &self,
    owner: PlayerId,
    head: &Segment,
    is_alive: impl Fn(PlayerId) -> bool,
  ) -> Option<SegmentEntry> {
    let center = head.point();
    self
      .segments
      .query(center, head.radius + COLLISION_LOOKAHEAD)
      .into_iter()
      .filter(|segment| segment.owner != owner)
      .filter(|segment| {
        distance(segment.position(), center) < head.radius + segment.radius - BODY_CONTACT_TOLERANCE
      })
      .filter(|segment| is_alive(segment.owner))
      .min_by(|a, b| {
        let da = distance(a.position(), center);
        let db = distance(b.position(), center);
        da.total_cmp(&db)
          .then_with(|| a.owner.cmp(&b.owner))
          .then_with(|| a.index.cmp(&b.index))
      })
      .copied()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::GameConfig;
  use crate::game::snake::create_snake;
  use crate::game::types::{Controller, Player, SessionId};

  fn add_player(registry: &mut Registry, x: f64, y: f64, length: usize) -> PlayerId {
    let controller = Controller::Human(SessionId::new());
    let slot = registry.seat(controller);
    let id = registry.next_id(slot);
    registry.insert(Player {
      id,
      controller,
      name: "Test".to_string(),
      last_input: 0,
      kills: 0,
      snake: create_snake(x, y, length, 5.0, 3.0, "#fff"),
    });
    id
  }

  #[test]
  fn rebuild_skips_neck_segments_and_dead_bodies() {
    let config = GameConfig::default();
    let mut registry = Registry::new();
    let mut orbs = OrbField::new();
    orbs.spawn_at(&config, 10.0, 10.0, 1, "#fff");
    add_player(&mut registry, 500.0, 500.0, 10);
    let dead = add_player(&mut registry, 900.0, 900.0, 10);
    if let Some(player) = registry.get_mut(dead) {
      player.snake.alive = false;
    }

    let mut grids = CollisionGrids::new();
    grids.rebuild(&registry, &orbs);

    assert_eq!(grids.orb_count(), 1);
    assert_eq!(grids.segment_count(), 10 - NECK_SEGMENTS);
  }

  #[test]
  fn own_body_never_counts_as_contact() {
    let mut registry = Registry::new();
    let id = add_player(&mut registry, 500.0, 500.0, 30);
    let mut grids = CollisionGrids::new();
    grids.rebuild(&registry, &OrbField::new());

    let probe = Segment { x: 480.0, y: 500.0, radius: 8.0 };
    assert!(grids.body_contact(id, &probe, |_| true).is_none());
  }

  #[test]
  fn contact_respects_tolerance() {
    let mut registry = Registry::new();
    let other = add_player(&mut registry, 500.0, 500.0, 10);
    let mut grids = CollisionGrids::new();
    grids.rebuild(&registry, &OrbField::new());
    let me = PlayerId { slot: 99, generation: 99 };

    // Segment 3 sits at x = 485 with radius 8; contact needs distance < 8 + 8 - 2.
    let grazing = Segment { x: 485.0, y: 514.0, radius: 8.0 };
    assert!(grids.body_contact(me, &grazing, |_| true).is_none());

    let touching = Segment { x: 485.0, y: 513.9, radius: 8.0 };
    let hit = grids.body_contact(me, &touching, |_| true).expect("contact");
    assert_eq!(hit.owner, other);
    assert_eq!(hit.index, 3);
  }

  #[test]
  fn contact_ignores_bodies_reported_dead() {
    let mut registry = Registry::new();
    add_player(&mut registry, 500.0, 500.0, 10);
    let mut grids = CollisionGrids::new();
    grids.rebuild(&registry, &OrbField::new());
    let me = PlayerId { slot: 99, generation: 99 };
    let probe = Segment { x: 480.0, y: 500.0, radius: 8.0 };
    assert!(grids.body_contact(me, &probe, |_| false).is_none());
  }

  #[test]
  fn orbs_touching_uses_radius_sum() {
    let config = GameConfig::default();
    let mut orbs = OrbField::new();
    let near = orbs.spawn_at(&config, 112.9, 100.0, 1, "#fff");
    orbs.spawn_at(&config, 113.0, 100.0, 1, "#fff");
    let mut grids = CollisionGrids::new();
    grids.rebuild(&Registry::new(), &orbs);

    let head = Segment { x: 100.0, y: 100.0, radius: 8.0 };
    let ids: Vec<OrbId> = grids.orbs_touching(&head).iter().map(|orb| orb.id).collect();
    assert_eq!(ids, vec![near]);
  }
}
