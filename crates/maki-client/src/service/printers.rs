//! Printer operations as consumed by UI pages.

use serde_json::Value;

use super::ServiceResult;
use crate::api;
use crate::gateway::{Gateway, Outcome};

/// Fetches the printer list.
pub async fn fetch_printers(gateway: &Gateway) -> Outcome<ServiceResult<Value>> {
    api::printers::list_printers(gateway)
        .await
        .map(ServiceResult::from_envelope)
}

/// Fetches one printer.
pub async fn fetch_printer(gateway: &Gateway, id: i64) -> Outcome<ServiceResult<Value>> {
    api::printers::get_printer(gateway, id)
        .await
        .map(ServiceResult::from_envelope)
}

/// Registers a new printer.
pub async fn register_printer(gateway: &Gateway, printer: Value) -> Outcome<ServiceResult<Value>> {
    api::printers::create_printer(gateway, printer)
        .await
        .map(ServiceResult::from_envelope)
}

/// Updates a printer.
pub async fn update_printer(
    gateway: &Gateway,
    id: i64,
    printer: Value,
) -> Outcome<ServiceResult<Value>> {
    api::printers::update_printer(gateway, id, printer)
        .await
        .map(ServiceResult::from_envelope)
}

/// Removes a printer.
pub async fn remove_printer(gateway: &Gateway, id: i64) -> Outcome<ServiceResult<Value>> {
    api::printers::delete_printer(gateway, id)
        .await
        .map(ServiceResult::from_envelope)
}

/// Assigns a printer to a contract.
pub async fn assign_printer(
    gateway: &Gateway,
    id: i64,
    contract_id: i64,
) -> Outcome<ServiceResult<Value>> {
    api::printers::assign_printer(gateway, id, contract_id)
        .await
        .map(ServiceResult::from_envelope)
}
