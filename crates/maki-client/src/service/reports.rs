//! Report operations as consumed by UI pages.

use bytes::Bytes;
use maki_core::{Error, Result};
use serde_json::Value;

use super::ServiceResult;
use crate::api;
use crate::gateway::{Gateway, Outcome};

/// Fetches the billing dashboard dataset.
pub async fn fetch_billing_summary(gateway: &Gateway) -> Outcome<ServiceResult<Value>> {
    api::reports::billing_summary(gateway)
        .await
        .map(ServiceResult::from_envelope)
}

/// Fetches the consumption report for one contract.
pub async fn fetch_contract_consumption(
    gateway: &Gateway,
    contract_id: i64,
) -> Outcome<ServiceResult<Value>> {
    api::reports::contract_consumption(gateway, contract_id)
        .await
        .map(ServiceResult::from_envelope)
}

/// Downloads an invoice document as raw bytes.
///
/// # Errors
///
/// Propagates transport failures and non-success statuses so the caller
/// can clean up whatever it was about to hand the blob to.
pub async fn download_invoice(gateway: &Gateway, invoice_id: i64) -> Result<Outcome<Bytes>> {
    let outcome = api::reports::download_invoice(gateway, invoice_id).await?;
    match outcome {
        Outcome::Redirecting => Ok(Outcome::Redirecting),
        Outcome::Completed(response) => {
            let status = response.status();
            if !status.is_success() {
                return Err(Error::external(format!(
                    "invoice download failed with status {status}"
                )));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|source| Error::external("failed to read invoice body").with_source(source))?;
            Ok(Outcome::Completed(bytes))
        }
    }
}
