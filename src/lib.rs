pub mod error;
pub mod grid;
pub mod ground;
pub mod loader;
pub mod region;
pub mod render;
pub mod request;
pub mod seeds;
pub mod shell;
pub mod tilemap;
pub mod validate;

pub use error::TileMapError;
pub use ground::{Ground, GroundPalette, Rgb};
pub use request::{CustomGround, MapRequest};
pub use tilemap::{ColorShare, TileMap};
