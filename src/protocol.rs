use crate::game::types::PlayerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inbound frames larger than this are rejected before parsing.
pub const MAX_CLIENT_FRAME_BYTES: usize = 1024;

#[derive(Debug, Error)]
pub enum ProtocolError {
  #[error("client frame of {0} bytes exceeds the limit")]
  TooLarge(usize),

  #[error("malformed client frame: {0}")]
  Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JoinRequest {
  #[serde(default)]
  pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InputRequest {
  /// Target heading in radians.
  #[serde(default)]
  pub angle: Option<f64>,
  #[serde(default)]
  pub boost: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
  #[serde(alias = "join_game")]
  Join(JoinRequest),
  Input(InputRequest),
  Respawn(JoinRequest),
  Ping,
}

pub fn decode_client_message(text: &str) -> Result<ClientMessage, ProtocolError> {
  if text.len() > MAX_CLIENT_FRAME_BYTES {
    return Err(ProtocolError::TooLarge(text.len()));
  }
  Ok(serde_json::from_str(text)?)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentDto {
  pub x: f64,
  pub y: f64,
  pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeDto {
  pub id: PlayerId,
  pub name: String,
  pub segments: Vec<SegmentDto>,
  pub angle: f64,
  pub color: &'static str,
  pub score: u32,
  pub is_boosting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbDto {
  pub id: u32,
  pub x: f64,
  pub y: f64,
  pub value: u32,
  pub color: &'static str,
  pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldUpdate {
  pub snakes: Vec<SnakeDto>,
  pub orbs: Vec<OrbDto>,
  pub tick: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
  pub id: PlayerId,
  pub name: String,
  pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedPayload {
  pub id: PlayerId,
  pub name: String,
  pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerJoinedPayload {
  pub id: PlayerId,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDiedPayload {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub killer_id: Option<PlayerId>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub killer_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PongPayload {
  pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
  Joined(JoinedPayload),
  WorldUpdate(WorldUpdate),
  Leaderboard(Vec<LeaderboardEntry>),
  PlayerDied(PlayerDiedPayload),
  PlayerJoined(PlayerJoinedPayload),
  Pong(PongPayload),
}

impl ServerMessage {
  pub fn encode(&self) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(self)?)
  }
}
