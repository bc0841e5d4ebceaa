//! Customer (`clientes`) endpoints.

use serde_json::Value;

use crate::envelope::ApiEnvelope;
use crate::gateway::{ApiRequest, Gateway, Outcome};

/// Lists all customers.
pub async fn list_customers(gateway: &Gateway) -> Outcome<ApiEnvelope<Value>> {
    gateway.call(ApiRequest::get("/clientes")).await
}

/// Fetches one customer by id.
pub async fn get_customer(gateway: &Gateway, id: i64) -> Outcome<ApiEnvelope<Value>> {
    gateway.call(ApiRequest::get(format!("/clientes/{id}"))).await
}

/// Creates a customer.
pub async fn create_customer(gateway: &Gateway, customer: Value) -> Outcome<ApiEnvelope<Value>> {
    gateway.call(ApiRequest::post("/clientes", customer)).await
}

/// Updates a customer.
pub async fn update_customer(
    gateway: &Gateway,
    id: i64,
    customer: Value,
) -> Outcome<ApiEnvelope<Value>> {
    gateway
        .call(ApiRequest::put(format!("/clientes/{id}"), customer))
        .await
}

/// Deletes a customer.
pub async fn delete_customer(gateway: &Gateway, id: i64) -> Outcome<ApiEnvelope<Value>> {
    gateway
        .call(ApiRequest::delete(format!("/clientes/{id}")))
        .await
}
