pub mod config;
pub mod estimator;
pub mod policy;
pub mod selector;

pub use config::{EstimatorConfig, PolicyConfig};
pub use estimator::{Estimate, EstimateError, Estimator};
pub use policy::{GreedyPolicy, MonteCarloPolicy, Policy, PolicyContext};
pub use selector::Selector;
