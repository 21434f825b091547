pub mod column;
pub mod encoder;
pub mod pca;
pub mod scaler;
pub mod split;

pub use column::*;
pub use encoder::*;
pub use pca::*;
pub use scaler::*;
pub use split::*;
