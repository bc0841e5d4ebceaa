//! Printer (`impresoras`) endpoints.

use serde_json::Value;

use crate::envelope::ApiEnvelope;
use crate::gateway::{ApiRequest, Gateway, Outcome};

/// Lists all printers.
pub async fn list_printers(gateway: &Gateway) -> Outcome<ApiEnvelope<Value>> {
    gateway.call(ApiRequest::get("/impresoras")).await
}

/// Fetches one printer by id.
pub async fn get_printer(gateway: &Gateway, id: i64) -> Outcome<ApiEnvelope<Value>> {
    gateway.call(ApiRequest::get(format!("/impresoras/{id}"))).await
}

/// Creates a printer.
pub async fn create_printer(gateway: &Gateway, printer: Value) -> Outcome<ApiEnvelope<Value>> {
    gateway.call(ApiRequest::post("/impresoras", printer)).await
}

/// Updates a printer.
pub async fn update_printer(
    gateway: &Gateway,
    id: i64,
    printer: Value,
) -> Outcome<ApiEnvelope<Value>> {
    gateway
        .call(ApiRequest::put(format!("/impresoras/{id}"), printer))
        .await
}

/// Deletes a printer.
pub async fn delete_printer(gateway: &Gateway, id: i64) -> Outcome<ApiEnvelope<Value>> {
    gateway
        .call(ApiRequest::delete(format!("/impresoras/{id}")))
        .await
}

/// Assigns a printer to a contract.
pub async fn assign_printer(
    gateway: &Gateway,
    id: i64,
    contract_id: i64,
) -> Outcome<ApiEnvelope<Value>> {
    gateway
        .call(ApiRequest::post(
            format!("/impresoras/{id}/asignar"),
            serde_json::json!({ "contratoId": contract_id }),
        ))
        .await
}
