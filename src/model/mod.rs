pub mod config;
pub mod contact;
pub mod message;
pub mod task;

pub use config::*;
pub use contact::*;
pub use message::*;
pub use task::*;
