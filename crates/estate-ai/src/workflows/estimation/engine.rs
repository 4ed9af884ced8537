use serde::{Deserialize, Serialize};

use super::formula;
use super::inference::{InferenceError, InferenceGateway, PredictionRequest};
use super::mapping;
use crate::workflows::leads::domain::PropertyInput;

/// Which estimation strategy to run. The two are never mixed within a
/// single estimate, and the engine performs no automatic fallback between
/// them: when inference fails, the caller decides whether to re-estimate
/// with the formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    #[default]
    Formula,
    Inference,
}

/// The locality has no registered model code. Reported before any network
/// traffic, distinct from a failure of the call itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no inference model is registered for locality '{locality}'")]
pub struct ResolutionError {
    pub locality: String,
}

#[derive(Debug, thiserror::Error)]
pub enum EstimationError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Computes the price attached to a lead at creation time. Holds only the
/// gateway; the region and locality tables are static and read-only.
pub struct EstimationEngine<G> {
    gateway: G,
}

impl<G> EstimationEngine<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn formula_estimate(&self, region: &str, land_size: f64) -> u64 {
        formula::estimate(region, land_size)
    }
}

impl<G: InferenceGateway> EstimationEngine<G> {
    pub async fn estimate(
        &self,
        property: &PropertyInput,
        source: PriceSource,
    ) -> Result<u64, EstimationError> {
        match source {
            PriceSource::Formula => {
                Ok(self.formula_estimate(&property.region, property.land_size))
            }
            PriceSource::Inference => self.inference_estimate(property).await,
        }
    }

    /// Resolves the locality to its model code, then asks the remote
    /// endpoint for a prediction. An unresolved locality fails here without
    /// issuing any request.
    pub async fn inference_estimate(
        &self,
        property: &PropertyInput,
    ) -> Result<u64, EstimationError> {
        let locality = property.locality.trim();
        let city_code = mapping::locality_code_for(locality).ok_or_else(|| ResolutionError {
            locality: locality.to_string(),
        })?;

        let request = PredictionRequest {
            city_code: city_code.to_string(),
            features: [
                property.land_size,
                property.frontage,
                property.breadth,
                property.coverage_ratio,
                property.floor_area_ratio,
            ],
        };

        let predicted = self.gateway.predict(&request).await?;
        Ok(predicted.round() as u64)
    }
}
