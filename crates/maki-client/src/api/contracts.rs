//! Contract (`contratos`) endpoints.

use serde_json::Value;

use crate::envelope::ApiEnvelope;
use crate::gateway::{ApiRequest, Gateway, Outcome};

/// Lists all contracts.
pub async fn list_contracts(gateway: &Gateway) -> Outcome<ApiEnvelope<Value>> {
    gateway.call(ApiRequest::get("/contratos")).await
}

/// Fetches one contract by id.
pub async fn get_contract(gateway: &Gateway, id: i64) -> Outcome<ApiEnvelope<Value>> {
    gateway.call(ApiRequest::get(format!("/contratos/{id}"))).await
}

/// Lists the contracts of one customer.
pub async fn list_customer_contracts(
    gateway: &Gateway,
    customer_id: i64,
) -> Outcome<ApiEnvelope<Value>> {
    gateway
        .call(ApiRequest::get(format!("/clientes/{customer_id}/contratos")))
        .await
}

/// Creates a contract.
pub async fn create_contract(gateway: &Gateway, contract: Value) -> Outcome<ApiEnvelope<Value>> {
    gateway.call(ApiRequest::post("/contratos", contract)).await
}

/// Updates a contract.
pub async fn update_contract(
    gateway: &Gateway,
    id: i64,
    contract: Value,
) -> Outcome<ApiEnvelope<Value>> {
    gateway
        .call(ApiRequest::put(format!("/contratos/{id}"), contract))
        .await
}

/// Marks a contract as terminated.
pub async fn terminate_contract(gateway: &Gateway, id: i64) -> Outcome<ApiEnvelope<Value>> {
    gateway
        .call(ApiRequest::patch(
            format!("/contratos/{id}/finalizar"),
            Value::Null,
        ))
        .await
}
