//! The room task: sole owner of the world and of every session outbox.
//!
//! Connections, client messages, ticks and leaderboard publishes all arrive on
//! one task and are handled one at a time, so the world never needs a lock.

use super::clock::{Clock, ClockEvent};
use super::types::SessionId;
use super::world::{Joined, World, WorldEvent};
use crate::app::time::now_millis;
use crate::protocol::{
  ClientMessage, JoinedPayload, LeaderboardEntry, PlayerDiedPayload, PlayerJoinedPayload, PongPayload,
  ServerMessage,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

mod session;

pub use session::{LatestFrame, SessionIo};
use session::{session_pair, SessionEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomStats {
  pub players: usize,
  pub bots: usize,
  pub sessions: usize,
  pub orbs: usize,
  pub tick: u64,
}

#[derive(Debug)]
enum RoomCommand {
  Connect { reply: oneshot::Sender<SessionIo> },
  Disconnect { session_id: SessionId },
  Message { session_id: SessionId, message: ClientMessage },
  Leaderboard { reply: oneshot::Sender<Vec<LeaderboardEntry>> },
  Stats { reply: oneshot::Sender<RoomStats> },
  Shutdown,
}

/// Cheap, cloneable way in to a running room. Every method is a no-op (or
/// returns `None`) once the room has stopped.
#[derive(Debug, Clone)]
pub struct RoomHandle {
  commands: mpsc::UnboundedSender<RoomCommand>,
}

impl RoomHandle {
  pub async fn connect(&self) -> Option<SessionIo> {
    let (reply, response) = oneshot::channel();
    self.commands.send(RoomCommand::Connect { reply }).ok()?;
    response.await.ok()
  }

  pub fn disconnect(&self, session_id: SessionId) {
    let _ = self.commands.send(RoomCommand::Disconnect { session_id });
  }

  pub fn send(&self, session_id: SessionId, message: ClientMessage) {
    let _ = self.commands.send(RoomCommand::Message { session_id, message });
  }

  pub async fn leaderboard(&self) -> Option<Vec<LeaderboardEntry>> {
    let (reply, response) = oneshot::channel();
    self.commands.send(RoomCommand::Leaderboard { reply }).ok()?;
    response.await.ok()
  }

  pub async fn stats(&self) -> Option<RoomStats> {
    let (reply, response) = oneshot::channel();
    self.commands.send(RoomCommand::Stats { reply }).ok()?;
    response.await.ok()
  }

  pub fn shutdown(&self) {
    let _ = self.commands.send(RoomCommand::Shutdown);
  }
}

pub struct Room {
  world: World,
  sessions: HashMap<SessionId, SessionEntry>,
  clock: Clock,
  commands: mpsc::UnboundedReceiver<RoomCommand>,
}

impl Room {
  /// Starts the room task. It runs until `shutdown` is called or every handle is dropped.
  pub fn spawn(world: World) -> (RoomHandle, JoinHandle<()>) {
    let (commands_tx, commands) = mpsc::unbounded_channel();
    let clock = Clock::new(world.config().tick_interval(), world.config().leaderboard_interval());
    let room = Room {
      world,
      sessions: HashMap::new(),
      clock,
      commands,
    };
    let task = tokio::spawn(room.run());
    (RoomHandle { commands: commands_tx }, task)
  }

  async fn run(mut self) {
    info!(tick_rate = self.world.config().tick_rate, "room started");
    loop {
      tokio::select! {
        event = self.clock.next() => match event {
          ClockEvent::Tick => self.tick(),
          ClockEvent::Leaderboard => self.publish_leaderboard(),
        },
        command = self.commands.recv() => match command {
          Some(RoomCommand::Shutdown) | None => break,
          Some(command) => self.handle_command(command),
        },
      }
    }
    info!(tick = self.world.tick_count(), "room stopped");
  }

  fn handle_command(&mut self, command: RoomCommand) {
    match command {
      RoomCommand::Connect { reply } => {
        let session_id = SessionId::new();
        let (entry, io) = session_pair(session_id);
        if reply.send(io).is_ok() {
          self.sessions.insert(session_id, entry);
          debug!(%session_id, sessions = self.sessions.len(), "session connected");
        }
      }
      RoomCommand::Disconnect { session_id } => self.disconnect(session_id),
      RoomCommand::Message { session_id, message } => self.handle_message(session_id, message),
      RoomCommand::Leaderboard { reply } => {
        let _ = reply.send(self.world.leaderboard());
      }
      RoomCommand::Stats { reply } => {
        let _ = reply.send(self.stats());
      }
      RoomCommand::Shutdown => {}
    }
  }

  fn handle_message(&mut self, session_id: SessionId, message: ClientMessage) {
    if !self.sessions.contains_key(&session_id) {
      return;
    }
    match message {
      ClientMessage::Join(request) => {
        let joined = self.world.join(session_id, request.name.as_deref());
        self.send_joined(session_id, &joined);
        let announcement = ServerMessage::PlayerJoined(PlayerJoinedPayload {
          id: joined.id,
          name: joined.name,
        });
        self.broadcast_lo(&announcement, Some(session_id));
      }
      ClientMessage::Respawn(request) => {
        if let Some(joined) = self.world.respawn(session_id, request.name.as_deref()) {
          self.send_joined(session_id, &joined);
        }
      }
      ClientMessage::Input(input) => {
        self.world.handle_input(session_id, input.angle, input.boost);
      }
      ClientMessage::Ping => {
        let pong = ServerMessage::Pong(PongPayload {
          timestamp: now_millis(),
        });
        self.send_hi(session_id, &pong);
      }
    }
  }

  fn tick(&mut self) {
    let started = Instant::now();
    let report = self.world.tick();

    for event in report.events {
      self.dispatch_event(event);
    }

    match ServerMessage::WorldUpdate(report.snapshot).encode() {
      Ok(frame) => {
        let frame: Arc<str> = Arc::from(frame);
        for entry in self.sessions.values() {
          entry.outbound_state.store(Arc::clone(&frame));
        }
      }
      Err(error) => warn!(%error, "failed to encode world update"),
    }

    trace!(
      tick = report.tick,
      elapsed_us = started.elapsed().as_micros() as u64,
      "tick complete"
    );
  }

  fn dispatch_event(&mut self, event: WorldEvent) {
    match event {
      WorldEvent::PlayerDied {
        session,
        killer,
        killer_name,
        ..
      } => {
        let Some(session_id) = session else { return };
        let message = ServerMessage::PlayerDied(PlayerDiedPayload {
          killer_id: killer,
          killer_name,
        });
        self.send_hi(session_id, &message);
      }
      WorldEvent::PlayerJoined { player, name } => {
        let message = ServerMessage::PlayerJoined(PlayerJoinedPayload { id: player, name });
        self.broadcast_lo(&message, None);
      }
    }
  }

  fn publish_leaderboard(&mut self) {
    let message = ServerMessage::Leaderboard(self.world.leaderboard());
    self.broadcast_lo(&message, None);
  }

  fn stats(&self) -> RoomStats {
    let world = self.world.stats();
    RoomStats {
      players: world.players,
      bots: world.bots,
      sessions: self.sessions.len(),
      orbs: world.orbs,
      tick: world.tick,
    }
  }

  fn send_joined(&mut self, session_id: SessionId, joined: &Joined) {
    let message = ServerMessage::Joined(JoinedPayload {
      id: joined.id,
      name: joined.name.clone(),
      color: joined.color,
    });
    self.send_hi(session_id, &message);
  }

  fn send_hi(&mut self, session_id: SessionId, message: &ServerMessage) {
    let Some(payload) = encode(message) else { return };
    let Some(entry) = self.sessions.get(&session_id) else { return };
    if let Err(error) = entry.outbound_hi.try_send(payload) {
      warn!(%session_id, %error, "dropping session with stalled outbox");
      self.disconnect(session_id);
    }
  }

  /// Sends to every session except `skip`. A full low-priority queue just loses
  /// the message; a closed one means the socket is gone.
  fn broadcast_lo(&mut self, message: &ServerMessage, skip: Option<SessionId>) {
    let Some(payload) = encode(message) else { return };
    let mut stale = Vec::new();
    for (session_id, entry) in &self.sessions {
      if Some(*session_id) == skip {
        continue;
      }
      match entry.outbound_lo.try_send(payload.clone()) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
          debug!(%session_id, "low-priority outbox full, message dropped");
        }
        Err(TrySendError::Closed(_)) => stale.push(*session_id),
      }
    }
    for session_id in stale {
      warn!(%session_id, "dropping session with closed outbox");
      self.disconnect(session_id);
    }
  }

  fn disconnect(&mut self, session_id: SessionId) {
    if self.sessions.remove(&session_id).is_none() {
      return;
    }
    self.world.leave(session_id);
    debug!(%session_id, sessions = self.sessions.len(), "session disconnected");
  }
}

fn encode(message: &ServerMessage) -> Option<String> {
  match message.encode() {
    Ok(payload) => Some(payload),
    Err(error) => {
      warn!(%error, "failed to encode server message");
      None
    }
  }
}
