pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod reports;
pub mod sampler;
pub mod tuner;
