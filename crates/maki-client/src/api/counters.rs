//! Meter counter (`contadores`) endpoints.

use serde_json::Value;

use crate::envelope::ApiEnvelope;
use crate::gateway::{ApiRequest, Gateway, Outcome};

/// Lists all counters.
pub async fn list_counters(gateway: &Gateway) -> Outcome<ApiEnvelope<Value>> {
    gateway.call(ApiRequest::get("/contadores")).await
}

/// Fetches one counter by id.
pub async fn get_counter(gateway: &Gateway, id: i64) -> Outcome<ApiEnvelope<Value>> {
    gateway.call(ApiRequest::get(format!("/contadores/{id}"))).await
}

/// Lists the counters attached to one printer.
pub async fn list_printer_counters(
    gateway: &Gateway,
    printer_id: i64,
) -> Outcome<ApiEnvelope<Value>> {
    gateway
        .call(ApiRequest::get(format!("/impresoras/{printer_id}/contadores")))
        .await
}

/// Records a new meter reading for a counter.
pub async fn record_reading(
    gateway: &Gateway,
    id: i64,
    reading: Value,
) -> Outcome<ApiEnvelope<Value>> {
    gateway
        .call(ApiRequest::post(format!("/contadores/{id}/lecturas"), reading))
        .await
}

/// Updates a counter.
pub async fn update_counter(
    gateway: &Gateway,
    id: i64,
    counter: Value,
) -> Outcome<ApiEnvelope<Value>> {
    gateway
        .call(ApiRequest::put(format!("/contadores/{id}"), counter))
        .await
}
