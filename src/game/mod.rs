pub mod bots;
pub mod broadcast;
pub mod clock;
pub mod collision;
pub mod constants;
pub mod grid;
pub mod input;
pub mod math;
pub mod orbs;
pub mod physics;
pub mod registry;
pub mod room;
pub mod schedule;
pub mod snake;
pub mod types;
pub mod world;
