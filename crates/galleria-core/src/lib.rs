//! # `galleria-core`
//!
//! Provider-agnostic building blocks shared by every crate in the workspace:
//!
//! * [`profile`] – the catalog of provider profiles and its registry,
//! * [`parameters`] – typed parameter records per profile,
//! * [`provider`] – the [`GenerationProvider`](provider::GenerationProvider)
//!   trait backends implement,
//! * [`client`] – the [`GenerationClient`] that validates, merges and calls a
//!   backend,
//! * [`storage`] – the [`ObjectStore`](storage::ObjectStore) trait artifact
//!   persistence is written against,
//! * [`artifact`] / [`metadata`] – ids, locators, sidecar records and
//!   gallery entries,
//! * [`error`] – the unified [`GalleriaError`](error::GalleriaError).
pub mod artifact;
pub mod client;
pub mod error;
pub mod metadata;
pub mod parameters;
pub mod policy;
pub mod profile;
pub mod provider;
pub mod schema_util;
pub mod storage;

pub use client::{GenerationClient, GenerationRequest};
