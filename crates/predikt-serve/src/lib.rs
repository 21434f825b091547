pub mod body;
pub mod config;
pub mod error;
pub mod locate;
pub mod server;
pub mod telemetry;

pub use body::{json_object, BodyError};
pub use config::load_section;
pub use error::ServeError;
pub use locate::resolve_artifact;
pub use server::{router_with_defaults, serve};
pub use telemetry::init_tracing;
