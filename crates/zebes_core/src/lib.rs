pub mod animation;
pub mod blueprint;
pub mod camera;
pub mod camera_controller;
pub mod collider;
pub mod config;
pub mod entity;
pub mod error;
pub mod input;
pub mod level;
pub mod sprite;
pub mod texture;
pub mod time;
pub mod vec;

pub use error::{ErrorKind, Result, ZebesError};
