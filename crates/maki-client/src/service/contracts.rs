//! Contract operations as consumed by UI pages.

use serde_json::Value;

use super::ServiceResult;
use crate::api;
use crate::gateway::{Gateway, Outcome};

/// Fetches the contract list.
pub async fn fetch_contracts(gateway: &Gateway) -> Outcome<ServiceResult<Value>> {
    api::contracts::list_contracts(gateway)
        .await
        .map(ServiceResult::from_envelope)
}

/// Fetches one contract.
pub async fn fetch_contract(gateway: &Gateway, id: i64) -> Outcome<ServiceResult<Value>> {
    api::contracts::get_contract(gateway, id)
        .await
        .map(ServiceResult::from_envelope)
}

/// Fetches the contracts belonging to one customer.
pub async fn fetch_customer_contracts(
    gateway: &Gateway,
    customer_id: i64,
) -> Outcome<ServiceResult<Value>> {
    api::contracts::list_customer_contracts(gateway, customer_id)
        .await
        .map(ServiceResult::from_envelope)
}

/// Registers a new contract.
pub async fn register_contract(
    gateway: &Gateway,
    contract: Value,
) -> Outcome<ServiceResult<Value>> {
    api::contracts::create_contract(gateway, contract)
        .await
        .map(ServiceResult::from_envelope)
}

/// Updates a contract.
pub async fn update_contract(
    gateway: &Gateway,
    id: i64,
    contract: Value,
) -> Outcome<ServiceResult<Value>> {
    api::contracts::update_contract(gateway, id, contract)
        .await
        .map(ServiceResult::from_envelope)
}

/// Terminates a contract.
pub async fn terminate_contract(gateway: &Gateway, id: i64) -> Outcome<ServiceResult<Value>> {
    api::contracts::terminate_contract(gateway, id)
        .await
        .map(ServiceResult::from_envelope)
}
