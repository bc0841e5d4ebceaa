//! Meter counter operations as consumed by UI pages.

use serde_json::Value;

use super::ServiceResult;
use crate::api;
use crate::gateway::{Gateway, Outcome};

/// Fetches the counter list.
pub async fn fetch_counters(gateway: &Gateway) -> Outcome<ServiceResult<Value>> {
    api::counters::list_counters(gateway)
        .await
        .map(ServiceResult::from_envelope)
}

/// Fetches one counter.
pub async fn fetch_counter(gateway: &Gateway, id: i64) -> Outcome<ServiceResult<Value>> {
    api::counters::get_counter(gateway, id)
        .await
        .map(ServiceResult::from_envelope)
}

/// Fetches the counters attached to one printer.
pub async fn fetch_printer_counters(
    gateway: &Gateway,
    printer_id: i64,
) -> Outcome<ServiceResult<Value>> {
    api::counters::list_printer_counters(gateway, printer_id)
        .await
        .map(ServiceResult::from_envelope)
}

/// Records a meter reading.
pub async fn submit_reading(
    gateway: &Gateway,
    id: i64,
    reading: Value,
) -> Outcome<ServiceResult<Value>> {
    api::counters::record_reading(gateway, id, reading)
        .await
        .map(ServiceResult::from_envelope)
}

/// Updates a counter.
pub async fn update_counter(
    gateway: &Gateway,
    id: i64,
    counter: Value,
) -> Outcome<ServiceResult<Value>> {
    api::counters::update_counter(gateway, id, counter)
        .await
        .map(ServiceResult::from_envelope)
}
