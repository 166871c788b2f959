//! Authoritative map of controllers to players.
//!
//! Every controller (a connected session or a bot seat) owns one slot for as
//! long as it exists. A slot holds at most one player entry at a time; each new
//! entry placed in the slot gets a fresh generation, so a stale `PlayerId` never
//! resolves to the entry that replaced it.

use super::types::{Controller, Player, PlayerId, SessionId};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
pub struct Registry {
  players: BTreeMap<u32, Player>,
  seats: HashMap<Controller, u32>,
  next_slot: u32,
  next_generation: u32,
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  /// The slot owned by `controller`, allocating one on first use.
  pub fn seat(&mut self, controller: Controller) -> u32 {
    if let Some(slot) = self.seats.get(&controller) {
      return *slot;
    }
    let slot = self.next_slot;
    self.next_slot += 1;
    self.seats.insert(controller, slot);
    slot
  }

  pub fn seat_of(&self, controller: Controller) -> Option<u32> {
    self.seats.get(&controller).copied()
  }

  /// Gives up the seat and removes whatever entry it holds.
  pub fn release_seat(&mut self, controller: Controller) -> Option<Player> {
    let slot = self.seats.remove(&controller)?;
    self.players.remove(&slot)
  }

  /// Mints the identity for the next entry placed in `slot`.
  pub fn next_id(&mut self, slot: u32) -> PlayerId {
    self.next_generation = self.next_generation.wrapping_add(1);
    PlayerId {
      slot,
      generation: self.next_generation,
    }
  }

  /// Places `player` in its slot, returning the entry it replaced.
  pub fn insert(&mut self, player: Player) -> Option<Player> {
    self.players.insert(player.id.slot, player)
  }

  pub fn get(&self, id: PlayerId) -> Option<&Player> {
    self.players.get(&id.slot).filter(|player| player.id == id)
  }

  pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
    self.players.get_mut(&id.slot).filter(|player| player.id == id)
  }

  pub fn for_controller(&self, controller: Controller) -> Option<&Player> {
    let slot = self.seat_of(controller)?;
    self.players.get(&slot)
  }

  pub fn for_session_mut(&mut self, session: SessionId) -> Option<&mut Player> {
    let slot = self.seat_of(Controller::Human(session))?;
    self.players.get_mut(&slot)
  }

  /// Removes the entry only if it is still the one `id` names.
  pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
    self.get(id)?;
    self.players.remove(&id.slot)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Player> {
    self.players.values()
  }

  pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
    self.players.values_mut()
  }

  /// Ids of living bodies in slot order.
  pub fn alive_ids(&self) -> Vec<PlayerId> {
    self
      .players
      .values()
      .filter(|player| player.snake.alive)
      .map(|player| player.id)
      .collect()
  }

  pub fn len(&self) -> usize {
    self.players.len()
  }

  pub fn is_empty(&self) -> bool {
    self.players.is_empty()
  }

  pub fn bot_count(&self) -> usize {
    self.players.values().filter(|player| player.controller.is_bot()).count()
  }

  pub fn human_count(&self) -> usize {
    self.players.len() - self.bot_count()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::snake::create_snake;

  fn player(registry: &mut Registry, controller: Controller) -> Player {
    let slot = registry.seat(controller);
    Player {
      id: registry.next_id(slot),
      controller,
      name: "Test".to_string(),
      last_input: 0,
      kills: 0,
      snake: create_snake(100.0, 100.0, 10, 5.0, 3.0, "#fff"),
    }
  }

  #[test]
  fn seat_is_stable_per_controller() {
    let mut registry = Registry::new();
    let session = Controller::Human(SessionId::new());
    let slot = registry.seat(session);
    assert_eq!(registry.seat(session), slot);
    assert_ne!(registry.seat(Controller::Bot(0)), slot);
  }

  #[test]
  fn replaced_entry_is_not_reachable_through_old_id() {
    let mut registry = Registry::new();
    let controller = Controller::Human(SessionId::new());
    let first = player(&mut registry, controller);
    let first_id = first.id;
    registry.insert(first);

    let second = player(&mut registry, controller);
    let second_id = second.id;
    assert_eq!(first_id.slot, second_id.slot);
    assert_ne!(first_id, second_id);
    registry.insert(second);

    assert!(registry.get(first_id).is_none());
    assert!(registry.remove(first_id).is_none());
    assert_eq!(registry.get(second_id).map(|p| p.id), Some(second_id));
  }

  #[test]
  fn alive_ids_follow_slot_order() {
    let mut registry = Registry::new();
    let mut expected = Vec::new();
    for bot in 0..4 {
      let mut entry = player(&mut registry, Controller::Bot(bot));
      if bot == 2 {
        entry.snake.alive = false;
      } else {
        expected.push(entry.id);
      }
      registry.insert(entry);
    }
    assert_eq!(registry.alive_ids(), expected);
  }

  #[test]
  fn release_seat_drops_entry() {
    let mut registry = Registry::new();
    let session = SessionId::new();
    let entry = player(&mut registry, Controller::Human(session));
    registry.insert(entry);
    assert_eq!(registry.human_count(), 1);
    assert!(registry.release_seat(Controller::Human(session)).is_some());
    assert!(registry.is_empty());
    assert!(registry.for_session_mut(session).is_none());
  }
}
