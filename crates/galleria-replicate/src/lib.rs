//! Replicate backend for `galleria`.
//!
//! [`ReplicateAdapter`] implements
//! [`GenerationProvider`](galleria_core::provider::GenerationProvider) on top
//! of Replicate's prediction API. Errors reaching the caller are
//! [`GalleriaError::Provider`](galleria_core::error::GalleriaError::Provider)
//! values carrying Replicate's own message and, when there is one, its JSON
//! error body as detail.
mod adapter;
mod model_map;
mod provider_impl;

pub use adapter::{ReplicateAdapter, ReplicateAdapterBuilder};
pub use model_map::ModelRef;
pub mod api_v1;
mod client;
pub mod error;

pub use client::ReplicateClient;
