#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod server;
mod status;
mod transport;

pub use server::{EaselServer, ToolArguments, call_generate_image};
pub use status::{ClientLogLevel, PeerStatus};
pub use transport::{serve_stdio, streamable_http_service};
