pub mod pipeline;
pub mod regressor;
pub mod traits;

pub use pipeline::*;
pub use regressor::*;
pub use traits::*;
