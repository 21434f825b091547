pub mod config;
pub mod embedder;
pub mod hashing;
#[cfg(feature = "minilm")]
pub mod minilm;

pub use config::*;
pub use embedder::*;
pub use hashing::*;
#[cfg(feature = "minilm")]
pub use minilm::*;
