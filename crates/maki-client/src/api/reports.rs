//! Report (`reportes`) endpoints.
//!
//! Report data comes back as regular envelopes; generated documents use
//! the gateway's download variant, which hands the raw response to the
//! caller for blob extraction.

use maki_core::Result;
use reqwest::Response;
use serde_json::Value;

use crate::envelope::ApiEnvelope;
use crate::gateway::{ApiRequest, Gateway, Outcome};

/// Fetches the billing dashboard dataset.
pub async fn billing_summary(gateway: &Gateway) -> Outcome<ApiEnvelope<Value>> {
    gateway.call(ApiRequest::get("/reportes/facturacion")).await
}

/// Fetches the consumption report for one contract.
pub async fn contract_consumption(
    gateway: &Gateway,
    contract_id: i64,
) -> Outcome<ApiEnvelope<Value>> {
    gateway
        .call(ApiRequest::get(format!("/reportes/consumo/{contract_id}")))
        .await
}

/// Downloads a generated invoice document.
///
/// # Errors
///
/// Unlike the envelope calls, transport failures propagate so the caller
/// can manage blob-specific cleanup.
pub async fn download_invoice(gateway: &Gateway, invoice_id: i64) -> Result<Outcome<Response>> {
    gateway
        .download(ApiRequest::get(format!("/reportes/facturas/{invoice_id}/pdf")))
        .await
}
