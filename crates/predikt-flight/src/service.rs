use std::path::Path;
use std::sync::Arc;

use axum::{body::Bytes, extract::State, routing::get, routing::post, Json, Router};
use predikt_core::{FeatureRecord, PrediktResult, Value};
use predikt_pipeline::Pipeline;
use predikt_serve::{json_object, router_with_defaults, BodyError, ServeError};
use serde_json::{json, Map};

/// Request fields, in the order missing ones are reported.
pub const REQUIRED_FIELDS: [&str; 9] = [
    "from",
    "to",
    "flightType",
    "time",
    "distance",
    "agency",
    "day",
    "month",
    "weekday",
];

/// Read-only state shared by every request.
#[derive(Debug)]
pub struct FlightContext {
    pipeline: Pipeline,
}

impl FlightContext {
    pub fn new(pipeline: Pipeline) -> Self {
        FlightContext { pipeline }
    }

    pub fn load(path: impl AsRef<Path>) -> PrediktResult<Self> {
        let pipeline: Pipeline = predikt_io::load_artifact(path.as_ref())?;
        tracing::info!(
            model = %pipeline.name,
            path = %path.as_ref().display(),
            features = pipeline.n_features_out(),
            "loaded flight price pipeline"
        );
        Ok(FlightContext::new(pipeline))
    }

    /// Validate a request object and return the rounded, non-negative price.
    pub fn predict(&self, body: &Map<String, serde_json::Value>) -> Result<f64, ServeError> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|f| !body.contains_key(**f))
            .map(|f| format!("'{}'", f))
            .collect();
        if !missing.is_empty() {
            return Err(ServeError::validation(format!("Missing fields: [{}]", missing.join(", "))));
        }

        let mut record = FeatureRecord::new();
        for field in REQUIRED_FIELDS {
            record.insert(field, to_value(field, &body[field])?);
        }

        let frame = self.pipeline.record_to_frame(&record)?;
        let raw = self
            .pipeline
            .predict(&frame)
            .map_err(|e| ServeError::internal(e.to_string()))?
            .first()
            .copied()
            .ok_or_else(|| ServeError::internal("model returned no prediction"))?;
        Ok(round_price(raw))
    }
}

fn to_value(field: &str, raw: &serde_json::Value) -> Result<Value, ServeError> {
    match raw {
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| ServeError::validation(format!("Field '{}' is not a finite number", field))),
        serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
        _ => Err(ServeError::validation(format!(
            "Field '{}' must be a number or a string",
            field
        ))),
    }
}

fn round_price(raw: f64) -> f64 {
    (raw.max(0.0) * 100.0).round() / 100.0
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "UP" }))
}

async fn predict(
    State(ctx): State<Arc<FlightContext>>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ServeError> {
    let map = json_object(&body).map_err(|e| match e {
        BodyError::Empty => ServeError::validation("No input data provided"),
        BodyError::Invalid(err) => ServeError::validation(format!("Invalid JSON: {}", err)),
    })?;
    let price = ctx.predict(&map)?;
    tracing::debug!(price, "predicted flight price");
    Ok(Json(json!({ "predicted_price": price })))
}

pub fn router(ctx: Arc<FlightContext>) -> Router {
    router_with_defaults(
        Router::new()
            .route("/health", get(health))
            .route("/predict", post(predict))
            .with_state(ctx),
    )
}
