//! NetBox REST backend for the topsync reconciliation engine.
//!
//! - **[`NetBoxClient`]** — Hand-crafted async HTTP client for the NetBox
//!   REST API. Token auth, JSON endpoints under `/api/`, offset-paged
//!   list walking.
//!
//! - **[`NetBoxStore`]** — Implements [`topsync_core::Store`] on top of
//!   the client: one endpoint per lookup or mutation, wire shapes mapped
//!   into the core model at the boundary.
//!
//! Validation conflicts NetBox reports as 400/409 surface as
//! [`topsync_core::Error::Conflict`] so the reconcilers can absorb them;
//! everything else becomes a store error.

pub mod client;
pub mod dto;
pub mod error;
pub mod store;

pub use client::{NetBoxClient, TransportOptions};
pub use error::Error;
pub use store::NetBoxStore;
