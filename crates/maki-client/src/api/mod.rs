//! One module per backend resource.
//!
//! Each function builds exactly one URL + method pair and delegates to the
//! [`Gateway`](crate::Gateway); no module here touches headers, cookies or
//! error handling — that is the gateway's job. Domain payloads are opaque
//! JSON passed through unchanged.

pub mod auth;
pub mod contracts;
pub mod counters;
pub mod customers;
pub mod printers;
pub mod reports;
