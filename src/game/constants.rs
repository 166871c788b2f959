pub const GRID_CELL_SIZE: f64 = 100.0;
pub const COLLISION_LOOKAHEAD: f64 = 20.0;
pub const NECK_SEGMENTS: usize = 3;
pub const BODY_CONTACT_TOLERANCE: f64 = 2.0;

pub const BASE_SEGMENT_RADIUS: f64 = 8.0;
pub const SEGMENTS_PER_RADIUS_STEP: usize = 20;
pub const TAIL_TAPER: f64 = 0.3;

pub const BOOST_MIN_LENGTH: usize = 10;
pub const BOOST_DRAIN_CHANCE: f64 = 0.1;

pub const ORB_RADIUS: f64 = 5.0;
pub const ORB_VALUE: u32 = 1;
pub const ORB_SPAWN_MARGIN: f64 = 50.0;
pub const DEATH_ORB_VALUE: u32 = 2;
pub const DEATH_ORB_STRIDE: usize = 3;
pub const DEATH_ORB_JITTER: f64 = 20.0;

pub const SPAWN_MARGIN: f64 = 200.0;

pub const BOT_TURN_CHANCE: f64 = 0.02;
pub const BOT_WALL_MARGIN: f64 = 200.0;
pub const BOT_BOOST_CHANCE: f64 = 0.1;
pub const BOT_BOOST_MIN_LENGTH: usize = 20;

pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

pub const SNAKE_COLORS: [&str; 12] = [
  "#FF6B6B",
  "#4ECDC4",
  "#45B7D1",
  "#96CEB4",
  "#FFEAA7",
  "#DDA0DD",
  "#98D8C8",
  "#F7DC6F",
  "#BB8FCE",
  "#85C1E9",
  "#F8B500",
  "#00CED1",
];

pub const ORB_COLORS: [&str; 8] = [
  "#FF6B6B",
  "#4ECDC4",
  "#45B7D1",
  "#96CEB4",
  "#FFEAA7",
  "#DDA0DD",
  "#F7DC6F",
  "#85C1E9",
];
