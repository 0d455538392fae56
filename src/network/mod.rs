//! Network Layer
//!
//! The HTTP/JSON surface and the per-client session registry. This layer
//! is plumbing: request validation, status mapping, and orchestration.
//! Game rules live in `game/`, durable records in `store/`.

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod session;

pub use error::ApiError;
pub use server::{run, AppState, ServerConfig, ServerError};
pub use session::{Session, SessionError, SessionRegistry};
