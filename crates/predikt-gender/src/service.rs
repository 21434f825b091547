use std::sync::Arc;

use axum::{body::Bytes, extract::State, routing::get, routing::post, Json, Router};
use predikt_core::PrediktResult;
use predikt_embed::TextEmbedder;
use predikt_serve::{json_object, router_with_defaults, ServeError};
use serde_json::{json, Map, Value};

use crate::artifacts::GenderArtifacts;
use crate::config::GenderConfig;

pub const REQUIRED_FIELDS: [&str; 4] = ["name", "company", "age", "code"];

/// Fitted artifacts plus the embedder they were trained with.
pub struct GenderContext {
    artifacts: GenderArtifacts,
    embedder: Box<dyn TextEmbedder>,
}

impl GenderContext {
    pub fn new(artifacts: GenderArtifacts, embedder: Box<dyn TextEmbedder>) -> Self {
        GenderContext { artifacts, embedder }
    }

    pub fn load(cfg: &GenderConfig) -> PrediktResult<Self> {
        let artifacts = GenderArtifacts::load(&cfg.artifact_dir)?;
        artifacts.check_embedder(&cfg.embedder)?;
        let embedder = cfg.embedder.build()?;
        artifacts.check_dimension(embedder.as_ref())?;
        tracing::info!(
            dir = %cfg.artifact_dir.display(),
            dimension = embedder.dimension(),
            classes = ?artifacts.label_encoder.classes,
            "loaded gender classifier"
        );
        Ok(GenderContext::new(artifacts, embedder))
    }

    pub fn predict(&self, body: &Map<String, Value>) -> Result<String, ServeError> {
        if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !body.contains_key(**f)) {
            return Err(ServeError::validation(format!("Missing field: {}", missing)));
        }
        let name = stringify(&body["name"]);
        let company = stringify(&body["company"]);
        let age = coerce_int(&body["age"]).ok_or_else(|| ServeError::validation("Invalid data type"))?;
        let code = coerce_int(&body["code"]).ok_or_else(|| ServeError::validation("Invalid data type"))?;

        self.artifacts
            .predict_one(self.embedder.as_ref(), &name, &company, age, code)
            .map(str::to_string)
            .map_err(|e| ServeError::internal(e.to_string()))
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Integer from a JSON int, float (truncated), bool, or a string holding an int.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn predict(State(ctx): State<Arc<GenderContext>>, body: Bytes) -> Result<Json<Value>, ServeError> {
    let map = json_object(&body).map_err(|_| ServeError::validation("Invalid or empty JSON"))?;
    // embedding can be a full model forward pass
    let gender = tokio::task::spawn_blocking(move || ctx.predict(&map))
        .await
        .map_err(|e| ServeError::internal(e.to_string()))??;
    Ok(Json(json!({ "prediction": gender })))
}

pub fn router(ctx: Arc<GenderContext>) -> Router {
    router_with_defaults(
        Router::new()
            .route("/health", get(health))
            .route("/predict", post(predict))
            .with_state(ctx),
    )
}
