use serde::{Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
  pub x: f64,
  pub y: f64,
  pub radius: f64,
}

impl Segment {
  pub fn point(&self) -> Point {
    Point { x: self.x, y: self.y }
  }
}

/// A chain of segments, head first.
#[derive(Debug, Clone)]
pub struct Snake {
  pub segments: Vec<Segment>,
  pub angle: f64,
  pub target_angle: f64,
  pub speed: f64,
  pub boosting: bool,
  pub color: &'static str,
  pub score: u32,
  pub alive: bool,
}

impl Snake {
  pub fn head(&self) -> Option<&Segment> {
    self.segments.first()
  }

  pub fn len(&self) -> usize {
    self.segments.len()
  }

  pub fn is_empty(&self) -> bool {
    self.segments.is_empty()
  }
}

/// Connection identity assigned by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }
}

impl fmt::Display for SessionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Who steers a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Controller {
  Human(SessionId),
  Bot(usize),
}

impl Controller {
  pub fn is_bot(&self) -> bool {
    matches!(self, Controller::Bot(_))
  }

  pub fn session(&self) -> Option<SessionId> {
    match self {
      Controller::Human(session) => Some(*session),
      Controller::Bot(_) => None,
    }
  }
}

/// Registry identity of a body. The slot is a stable seat per controller; the
/// generation changes every time the seat is re-occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId {
  pub slot: u32,
  pub generation: u32,
}

impl fmt::Display for PlayerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.slot, self.generation)
  }
}

impl Serialize for PlayerId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

#[derive(Debug, Clone)]
pub struct Player {
  pub id: PlayerId,
  pub controller: Controller,
  pub name: String,
  pub last_input: i64,
  pub kills: u32,
  pub snake: Snake,
}

pub type OrbId = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct Orb {
  pub id: OrbId,
  pub x: f64,
  pub y: f64,
  pub value: u32,
  pub color: &'static str,
  pub radius: f64,
}
