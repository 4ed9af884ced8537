//! Price estimation strategies: the local per-region formula and the remote
//! inference call, selected per estimate and never mixed within one.

pub mod engine;
pub mod formula;
pub mod inference;
pub mod mapping;

pub use engine::{EstimationEngine, EstimationError, PriceSource, ResolutionError};
pub use inference::{HttpInferenceClient, InferenceError, InferenceGateway, PredictionRequest};
