//! # Orpheus Architecture
//!
//! Orpheus is the front-end dispatcher of a modular media-archival tool. It
//! turns free-form input (URLs, search queries, explicit media ids) into a
//! [`batch::DownloadBatch`]: per-module lists of resolved media, handed to a
//! download pipeline that lives elsewhere.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, builds config/registry/picker/pipeline │
//! │  - The ONLY place that knows about exit codes and Ctrl-C    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - search / luckysearch / download / links                  │
//! │  - Returns Resolution::{Batch, Aborted}                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Components                                                 │
//! │  - router: URL → (module, media)                            │
//! │  - format + picker + selection: search disambiguation       │
//! │  - batch: per-module aggregation                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Collaborators                                              │
//! │  - registry: modules, their URL rules and search backends   │
//! │  - pipeline: where the final DownloadJob goes               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quitting Is Not an Error
//!
//! A user typing `q` (or `e`, `x`, `exit`, `quit`) at the picker yields
//! [`selection::SelectionOutcome::Aborted`] and then [`api::Resolution::Aborted`].
//! Callers stop there: nothing is aggregated or submitted, and the process exits 0.
//!
//! ## Recovering Locally
//!
//! The only failure handled in place is the external fuzzy picker failing or
//! being absent; the line prompt takes over silently. Every other error is
//! returned to the caller.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade used by every client
//! - [`router`]: URL routing by network location and path segments
//! - [`format`]: Candidate rows for search results
//! - [`picker`]: Fuzzy-finder and line-prompt selection backends
//! - [`selection`]: Selection validation and backend orchestration
//! - [`batch`]: Request aggregation
//! - [`registry`]: Module registry and module backends
//! - [`overrides`]: Lyrics/covers/credits module overrides
//! - [`pipeline`]: Download job handoff
//! - [`config`]: Configuration management
//! - [`model`]: Core data types
//! - [`error`]: Error types

pub mod api;
pub mod batch;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod overrides;
pub mod picker;
pub mod pipeline;
pub mod registry;
pub mod router;
pub mod selection;
