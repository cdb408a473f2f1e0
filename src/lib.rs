//! Tile-grid raycasting engine: a first-person renderer over a grid world
//! plus the simulation that drives it.

pub mod actor;
pub mod animation;
pub mod billboard;
pub mod bitmap;
pub mod clock;
pub mod config;
pub mod door;
pub mod effect;
pub mod error;
pub mod input;
pub mod math;
pub mod monster;
pub mod player;
pub mod pushwall;
pub mod raycaster;
pub mod renderer;
pub mod scaler;
pub mod switch;
pub mod texture;
pub mod tilemap;
pub mod traversal;
pub mod vision;
pub mod world;

pub use bitmap::{Bitmap, Color};
pub use config::{EngineConfig, VisionConfig};
pub use error::{MapError, MapResult};
pub use input::Input;
pub use math::{Ray, Rect, Rotation, Vector};
pub use renderer::Renderer;
pub use texture::{Texture, Textures};
pub use tilemap::{Thing, Tile, Tilemap};
pub use world::{World, WorldAction, WorldEvent};
