//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `credentials.rs` — cli.json / CATTLE_* resolution of the API base and keys.
//! - `settings.rs` — optional TOML client settings (timeouts, polling).
//! - `cattle.rs` — blocking Cattle v2-beta client and polling helpers.
//! - `payloads.rs` — request bodies for create/clone/upgrade/restart/retarget.
//! - `shell.rs` — word splitting for the interactive session.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod cattle;
pub mod credentials;
pub mod output;
pub mod payloads;
pub mod settings;
pub mod shell;
