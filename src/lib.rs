pub mod config;
pub mod error;
pub mod data;
pub mod model;
pub mod eval;

pub use config::Config;
pub use error::{RecmetricsError, Result};
pub use eval::{Prediction, PredictionSet};
