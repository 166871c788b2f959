//! One-shot tasks scheduled against the tick counter.
//!
//! Tasks name the exact `PlayerId` (slot and generation) they target, so a task
//! that outlives its entry resolves to nothing instead of touching a newer one.

use super::types::PlayerId;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
  /// Delete a dead entry once its death notification had time to land.
  RemoveEntry(PlayerId),
  /// Re-seat bot `bot` whose body `previous` died.
  RespawnBot { previous: PlayerId, bot: usize },
}

#[derive(Debug, PartialEq, Eq)]
struct Scheduled {
  due_tick: u64,
  seq: u64,
  task: Task,
}

impl Ord for Scheduled {
  fn cmp(&self, other: &Self) -> Ordering {
    (self.due_tick, self.seq).cmp(&(other.due_tick, other.seq))
  }
}

impl PartialOrd for Scheduled {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

#[derive(Debug, Default)]
pub struct Scheduler {
  queue: BinaryHeap<Reverse<Scheduled>>,
  next_seq: u64,
}

impl Scheduler {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn schedule(&mut self, due_tick: u64, task: Task) {
    let seq = self.next_seq;
    self.next_seq += 1;
    self.queue.push(Reverse(Scheduled { due_tick, seq, task }));
  }

  /// Pops every task due at or before `tick`, in due order then insertion order.
  pub fn take_due(&mut self, tick: u64) -> Vec<Task> {
    let mut due = Vec::new();
    while let Some(Reverse(next)) = self.queue.peek() {
      if next.due_tick > tick {
        break;
      }
      if let Some(Reverse(scheduled)) = self.queue.pop() {
        due.push(scheduled.task);
      }
    }
    due
  }

  pub fn len(&self) -> usize {
    self.queue.len()
  }

  pub fn is_empty(&self) -> bool {
    self.queue.is_empty()
  }
}
