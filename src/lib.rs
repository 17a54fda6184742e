pub mod contact;
pub mod error;
pub mod event;
pub mod integration;
pub mod message;
pub mod state;
pub mod thread;
pub mod unread;
pub mod user;

pub type Result<T> = std::result::Result<T, error::Error>;
