pub mod auth_gate;
pub mod board;
pub mod calendar;
pub mod render;
pub mod repository;
pub mod screen;

// Re-export main components
pub use auth_gate::*;
pub use board::*;
pub use calendar::*;
pub use render::*;
pub use repository::*;
pub use screen::*;
