pub mod board;
pub mod errors;
pub mod history;
pub mod messages;
pub mod user;

pub type SessionId = uuid::Uuid;

// Re-export all types
pub use board::*;
pub use errors::*;
pub use history::*;
pub use messages::*;
pub use user::*;
