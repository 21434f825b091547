use std::fmt;

use predikt_core::{Matrix, PrediktResult};
use predikt_linear::{LinearRegression, Ridge};
use predikt_tree::DecisionTreeRegressor;
use serde::{Deserialize, Serialize};

use crate::traits::Estimator;

/// Unfitted description of a regression model.
///
/// This is what configuration files name; adding a variant here (and to
/// [`Regressor`]) is how a new candidate model becomes available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RegressorSpec {
    LinearRegression,
    DecisionTree {
        #[serde(default = "default_max_depth")]
        max_depth: usize,
    },
    Ridge {
        #[serde(default = "default_alpha")]
        alpha: f64,
    },
}

fn default_max_depth() -> usize {
    10
}

fn default_alpha() -> f64 {
    1.0
}

impl RegressorSpec {
    pub fn build(&self) -> Regressor {
        match self {
            RegressorSpec::LinearRegression => Regressor::Linear(LinearRegression::new(true)),
            RegressorSpec::DecisionTree { max_depth } => {
                Regressor::Tree(DecisionTreeRegressor::with_max_depth(*max_depth))
            }
            RegressorSpec::Ridge { alpha } => Regressor::Ridge(Ridge::new(*alpha)),
        }
    }

    /// Model family name, e.g. `"DecisionTree"`.
    pub fn kind(&self) -> &'static str {
        match self {
            RegressorSpec::LinearRegression => "LinearRegression",
            RegressorSpec::DecisionTree { .. } => "DecisionTree",
            RegressorSpec::Ridge { .. } => "Ridge",
        }
    }
}

impl fmt::Display for RegressorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressorSpec::LinearRegression => write!(f, "LinearRegression"),
            RegressorSpec::DecisionTree { max_depth } => write!(f, "DecisionTree(max_depth={})", max_depth),
            RegressorSpec::Ridge { alpha } => write!(f, "Ridge(alpha={})", alpha),
        }
    }
}

/// A fitted (or fittable) regression model of any supported family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "model")]
pub enum Regressor {
    Linear(LinearRegression),
    Tree(DecisionTreeRegressor),
    Ridge(Ridge),
}

impl Estimator for Regressor {
    type Target = f64;

    fn fit(&mut self, x: &Matrix, y: &[f64]) -> PrediktResult<()> {
        match self {
            Regressor::Linear(m) => m.fit(x, y),
            Regressor::Tree(m) => m.fit(x, y),
            Regressor::Ridge(m) => m.fit(x, y),
        }
    }

    fn predict(&self, x: &Matrix) -> PrediktResult<Vec<f64>> {
        match self {
            Regressor::Linear(m) => m.predict(x),
            Regressor::Tree(m) => m.predict(x),
            Regressor::Ridge(m) => m.predict(x),
        }
    }
}
