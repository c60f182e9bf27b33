pub mod renderer;

pub use renderer::{Notice, Overlay, Renderer};
