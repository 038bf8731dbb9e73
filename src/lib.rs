pub mod debug;
pub mod glide;
pub mod movement;
pub mod player;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod settings;
pub mod world;
