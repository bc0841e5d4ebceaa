#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

//! # Maki Client
//!
//! Every data-fetching call to the backend passes through one chokepoint,
//! the [`Gateway`]: it merges headers, attaches the session credential,
//! reacts uniformly to session expiry and folds every response into the
//! [`ApiEnvelope`] shape. The `api` modules build one URL + method pair per
//! backend operation and delegate to the gateway; the `service` modules
//! translate envelopes into the [`ServiceResult`] shape the UI consumes.

pub mod api;
pub mod service;

mod config;
mod envelope;
mod gateway;
mod navigator;

pub use config::GatewayConfig;
pub use envelope::ApiEnvelope;
pub use gateway::{ApiRequest, Gateway, Outcome};
pub use navigator::{LoggingNavigator, Navigator};
pub use service::ServiceResult;
