//! Handlers for the user actions of a session.
//!
//! - [`SessionHandler`]: synchronous handler owning one session's state
//! - [`upload_images`], [`convert_images`], [`download_archive`],
//!   [`clear_session`]: async entry points over [`AppState`](crate::core::AppState)

mod actions;
mod session;

pub use actions::*;
pub use session::SessionHandler;
