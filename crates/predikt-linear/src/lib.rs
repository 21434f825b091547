pub mod logistic;
pub mod regression;

pub use logistic::*;
pub use regression::*;
