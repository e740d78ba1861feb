//! # mreg-reconciler
//!
//! Reconciles declared infrastructure records — hosts and SRV DNS records —
//! against a [Mreg](https://github.com/unioslo/mreg) network-record API over
//! HTTP.
//!
//! The crate covers the transport and orchestration core: token acquisition,
//! request/response marshaling with structured diagnostics, per-resource
//! create/read/delete, deterministic identity derivation for host batches,
//! and best-effort extraction of fields from loosely structured responses.
//! Schema validation and user-facing orchestration live outside this crate;
//! they hand validated state in and receive diagnostics and identities back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mreg_reconciler::{Gateway, Host, HostBatch, HostReconciler, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Build a session, logging in when no token is at hand
//!     let gateway = Gateway::new(Session::anonymous("https://mreg.example.org/"))
//!         .login("svc-user", "secret")
//!         .await?;
//!
//!     // 2. Declare a batch and reconcile it
//!     let mut batch = HostBatch {
//!         hosts: vec![Host::new("h1.example.org")],
//!         contact: "ops@example.org".to_string(),
//!         network: Some("10.0.0.0/24".to_string()),
//!         ..HostBatch::default()
//!     };
//!     let identity = HostReconciler::new(&gateway).create(&mut batch).await?;
//!     println!("created batch {identity}");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, Diagnostic>`](Diagnostic). An
//! `Error`-severity diagnostic aborts the batch that produced it and carries
//! the full request/response context; conditions the API treats as benign
//! (an already absent SRV record, an empty declared host list) surface as
//! `Warning` diagnostics inside the [`SrvDeletion`] and [`ReadOutcome`]
//! outcome types and do not fail the operation. Nothing is retried
//! internally.
//!
//! ## Concurrency
//!
//! Operations are sequential; the crate spawns no tasks. Host creation holds
//! a process-wide advisory lock (see [`allocation_lock`]) for the whole
//! batch so concurrent batches cannot be handed the same first-unused IP
//! address from a network.

mod auth;
mod diagnostics;
mod gateway;
mod hosts;
mod session;
mod srv;
pub mod utils;

pub use diagnostics::{Diagnostic, Severity};
pub use gateway::{ApiResponse, Gateway};
pub use hosts::{Host, HostBatch, HostReconciler, ReadOutcome, allocation_lock};
pub use session::Session;
pub use srv::{SrvDeletion, SrvRecord, SrvReconciler};

// Request primitives callers need to talk to the gateway directly.
pub use reqwest::{Method, StatusCode};
