use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Symbol;

/// Request body for the prediction endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub symbols: Vec<Symbol>,
}

/// Successful prediction response. Per-symbol payloads are opaque to the core
/// and passed through unmodified to the results view; a symbol the service
/// could not analyze maps to `null` or to an entry in `errors`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    #[serde(default)]
    pub predictions: BTreeMap<String, Option<Value>>,
    #[serde(default)]
    pub metrics: BTreeMap<String, Option<Value>>,
    #[serde(default)]
    pub technical_analysis: BTreeMap<String, Value>,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
}

impl ResultPayload {
    /// True when at least one symbol produced a non-null prediction series.
    pub fn has_usable_predictions(&self) -> bool {
        self.predictions
            .values()
            .any(|entry| matches!(entry, Some(value) if !value.is_null()))
    }

    pub fn has_symbol_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Error body attached to a non-2xx prediction response. Both fields are
/// optional; message resolution is `error`, then `details`, then a generic
/// fallback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceFailure {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ServiceFailure {
    pub fn message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.details.clone())
            .unwrap_or_else(|| "Prediction service reported an unspecified failure".to_string())
    }
}
