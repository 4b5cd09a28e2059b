//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep Cattle resource and report structs in one place.
//! - Avoid cyclic imports and duplicated type definitions.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs` — Cattle resources (service, stack, load balancer config) and output envelope.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! Resources round-trip through read-modify-write calls, so unknown server
//! fields must survive deserialization. Keep the `extra` maps intact.
//! Schema-impacting changes to `--json` output must stay in sync with `docs/contracts/*`.

pub mod models;
