pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod ghost;
pub mod mode;
pub mod movement;
pub mod player;
pub mod session;
pub mod timers;
pub mod types;
pub mod world;
