//! Reconciliation of declared host batches.

use std::sync::{Arc, LazyLock};

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::diagnostics::Diagnostic;
use crate::gateway::Gateway;
use crate::utils::identity::compound_identity;
use crate::utils::json_path::extract;

/// One declared host record.
///
/// `name` is the immutable key. `comment`, `contact` and `ipaddress` are
/// computed: create fills them from the batch, read refreshes them from the
/// remote record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Host {
    pub name: String,
    /// Explicit IP address; takes precedence over network allocation.
    #[serde(default)]
    pub manual_ipaddress: Option<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub ipaddress: String,
}

impl Host {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_manual_ip(mut self, ipaddress: impl Into<String>) -> Self {
        self.manual_ipaddress = Some(ipaddress.into());
        self
    }
}

/// Caller-owned declared state for one batch of hosts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostBatch {
    pub hosts: Vec<Host>,
    pub comment: String,
    pub contact: String,
    /// Network to allocate addresses from when a host has no manual IP.
    #[serde(default)]
    pub network: Option<String>,
    /// Comma-separated host policy names assigned to every host on create.
    #[serde(default)]
    pub policies: Option<String>,
}

/// Outcome of [`HostReconciler::read`].
#[derive(Debug)]
pub enum ReadOutcome {
    /// Remote state was fetched and folded into the batch.
    Refreshed { identity: String },
    /// The declared state contained no hosts; nothing was touched.
    NothingToRead { warning: Diagnostic },
}

static ALLOCATION_LOCK: LazyLock<Arc<Mutex<()>>> = LazyLock::new(|| Arc::new(Mutex::new(())));

/// The process-wide advisory lock guarding first-unused-IP allocation.
///
/// Two concurrent create batches drawing from the same network would both be
/// handed the same "first unused" address; the lock serializes them. It is
/// injectable via [`HostReconciler::with_lock`] so tests or a distributed
/// coordinator can substitute their own guard.
#[must_use]
pub fn allocation_lock() -> Arc<Mutex<()>> {
    Arc::clone(&ALLOCATION_LOCK)
}

/// Create/read/delete orchestration for host batches.
pub struct HostReconciler<'a> {
    gateway: &'a Gateway,
    lock: Arc<Mutex<()>>,
}

impl<'a> HostReconciler<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self {
            gateway,
            lock: allocation_lock(),
        }
    }

    /// Reconciler with a caller-supplied allocation lock.
    pub fn with_lock(gateway: &'a Gateway, lock: Arc<Mutex<()>>) -> Self {
        Self { gateway, lock }
    }

    /// Create every host in the batch and assign its policies.
    ///
    /// The allocation lock is taken once for the whole batch, before any IP
    /// is allocated, and held until the batch completes or fails. Per host:
    /// a manual IP wins; otherwise, when the batch names a network, the
    /// first unused address is requested from the API; otherwise the host is
    /// created without an address. The first `Error` diagnostic aborts the
    /// remaining hosts.
    ///
    /// Returns the compound identity over all declared host names.
    pub async fn create(&self, batch: &mut HostBatch) -> Result<String, Diagnostic> {
        let policies = parse_policy_list(batch.policies.as_deref());

        let _guard = self.lock.lock().await;

        for host in &mut batch.hosts {
            let ipaddress = match host.manual_ipaddress.as_deref() {
                Some(ip) if !ip.is_empty() => ip.to_string(),
                _ => match batch.network.as_deref() {
                    Some(network) if !network.is_empty() => {
                        self.first_unused_ip(network).await?
                    }
                    _ => String::new(),
                },
            };

            let mut payload = json!({
                "name": host.name,
                "contact": batch.contact,
                "comment": batch.comment,
            });
            // The API rejects an empty ipaddress field, so only send one
            // when the host is supposed to have an address.
            if !ipaddress.is_empty() {
                payload["ipaddress"] = Value::String(ipaddress.clone());
            }
            self.gateway
                .request(
                    Method::POST,
                    "/api/v1/hosts/",
                    Some(&payload),
                    StatusCode::CREATED,
                )
                .await?;

            for policy in &policies {
                let payload = json!({ "name": host.name });
                self.gateway
                    .request(
                        Method::POST,
                        &format!("/api/v1/hostpolicy/roles/{}/hosts/", urlencoding::encode(policy)),
                        Some(&payload),
                        StatusCode::CREATED,
                    )
                    .await?;
            }

            host.ipaddress = ipaddress;
            host.comment = batch.comment.clone();
            host.contact = batch.contact.clone();
        }

        Ok(compound_identity(batch.hosts.iter().map(|h| h.name.as_str())))
    }

    /// Refresh comment, contact and IP address of every host from the API.
    ///
    /// An empty declared host list is not a failure: it yields
    /// [`ReadOutcome::NothingToRead`] with a `Warning` and leaves the batch
    /// untouched.
    pub async fn read(&self, batch: &mut HostBatch) -> Result<ReadOutcome, Diagnostic> {
        if batch.hosts.is_empty() {
            let warning = Diagnostic::warning(
                "The declared state does not contain any Mreg hosts",
                "",
            );
            log::warn!("{warning}");
            return Ok(ReadOutcome::NothingToRead { warning });
        }

        for host in &mut batch.hosts {
            let response = self
                .gateway
                .request(
                    Method::GET,
                    &format!("/api/v1/hosts/{}", urlencoding::encode(&host.name)),
                    None,
                    StatusCode::OK,
                )
                .await?;
            let record = response.json.unwrap_or(Value::Null);

            host.comment = extract(&record, "comment");
            host.contact = extract(&record, "contact");
            host.ipaddress = extract(&record, "ipaddresses.0.ipaddress");
        }

        Ok(ReadOutcome::Refreshed {
            identity: compound_identity(batch.hosts.iter().map(|h| h.name.as_str())),
        })
    }

    /// Delete every host in the batch by name.
    ///
    /// Any status other than 204 aborts with an `Error`, including 404 for an
    /// already absent host. This is deliberately stricter than SRV deletion,
    /// where absence is only a warning.
    pub async fn delete(&self, batch: &HostBatch) -> Result<(), Diagnostic> {
        for host in &batch.hosts {
            self.gateway
                .request(
                    Method::DELETE,
                    &format!("/api/v1/hosts/{}", urlencoding::encode(&host.name)),
                    None,
                    StatusCode::NO_CONTENT,
                )
                .await?;
        }
        Ok(())
    }

    /// Ask the API for the first unused address in `network`.
    ///
    /// The endpoint answers with a bare quoted IP string rather than an
    /// object, so the quotes are trimmed off the raw body.
    async fn first_unused_ip(&self, network: &str) -> Result<String, Diagnostic> {
        let response = self
            .gateway
            .request(
                Method::GET,
                &format!(
                    "/api/v1/networks/{}/first_unused",
                    urlencoding::encode(network)
                ),
                None,
                StatusCode::OK,
            )
            .await?;
        Ok(response.text.trim_matches('"').to_string())
    }
}

/// Split a comma-separated policy list, trimming entries and dropping empties.
fn parse_policy_list(policies: Option<&str>) -> Vec<String> {
    policies
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
