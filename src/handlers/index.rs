//! Service description handler

use std::collections::BTreeMap;

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct IndexResponse {
    message: &'static str,
    version: &'static str,
    endpoints: BTreeMap<&'static str, &'static str>,
}

pub async fn describe() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "ONNX Model API is running",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: BTreeMap::from([
            ("/", "POST endpoint for model predictions"),
            ("/health", "GET endpoint for health check"),
        ]),
    })
}
