//! Customer operations as consumed by UI pages.

use serde_json::Value;

use super::ServiceResult;
use crate::api;
use crate::gateway::{Gateway, Outcome};

/// Fetches the customer list.
pub async fn fetch_customers(gateway: &Gateway) -> Outcome<ServiceResult<Value>> {
    api::customers::list_customers(gateway)
        .await
        .map(ServiceResult::from_envelope)
}

/// Fetches one customer.
pub async fn fetch_customer(gateway: &Gateway, id: i64) -> Outcome<ServiceResult<Value>> {
    api::customers::get_customer(gateway, id)
        .await
        .map(ServiceResult::from_envelope)
}

/// Registers a new customer.
pub async fn register_customer(
    gateway: &Gateway,
    customer: Value,
) -> Outcome<ServiceResult<Value>> {
    api::customers::create_customer(gateway, customer)
        .await
        .map(ServiceResult::from_envelope)
}

/// Updates a customer.
pub async fn update_customer(
    gateway: &Gateway,
    id: i64,
    customer: Value,
) -> Outcome<ServiceResult<Value>> {
    api::customers::update_customer(gateway, id, customer)
        .await
        .map(ServiceResult::from_envelope)
}

/// Removes a customer.
pub async fn remove_customer(gateway: &Gateway, id: i64) -> Outcome<ServiceResult<Value>> {
    api::customers::delete_customer(gateway, id)
        .await
        .map(ServiceResult::from_envelope)
}
