use std::time::Duration;
use tokio::time::{interval, interval_at, Instant, Interval, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
  Tick,
  Leaderboard,
}

/// Fixed-rate drivers for the simulation tick and the slower leaderboard publish.
///
/// Late ticks are skipped rather than bunched up, so a stall never replays a
/// burst of simulation steps.
#[derive(Debug)]
pub struct Clock {
  tick: Interval,
  leaderboard: Interval,
}

impl Clock {
  pub fn new(tick_every: Duration, leaderboard_every: Duration) -> Self {
    let mut tick = interval(tick_every);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut leaderboard = interval_at(Instant::now() + leaderboard_every, leaderboard_every);
    leaderboard.set_missed_tick_behavior(MissedTickBehavior::Skip);
    Self { tick, leaderboard }
  }

  pub async fn next(&mut self) -> ClockEvent {
    tokio::select! {
      biased;
      _ = self.tick.tick() => ClockEvent::Tick,
      _ = self.leaderboard.tick() => ClockEvent::Leaderboard,
    }
  }
}
