//! Reconciliation of single SRV records.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::diagnostics::Diagnostic;
use crate::gateway::Gateway;

/// One declared SRV record, pointing at a host by name.
///
/// The remote numeric id of the record is never stored by the caller; it is
/// rediscovered by exact-field match when the record is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrvRecord {
    pub target_host: String,
    pub service: String,
    pub proto: String,
    pub name: String,
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
}

impl SrvRecord {
    /// The `_{service}._{proto}.{name}.` owner name of the record.
    #[must_use]
    pub fn service_proto_name(&self) -> String {
        format!("_{}._{}.{}.", self.service, self.proto, self.name)
    }
}

/// Outcome of [`SrvReconciler::delete`].
#[derive(Debug)]
pub enum SrvDeletion {
    /// The record was found and deleted.
    Deleted { record_id: i64 },
    /// No matching record exists remotely; treated as success with a warning.
    AlreadyAbsent { warning: Diagnostic },
}

/// Create/read/delete orchestration for SRV records.
pub struct SrvReconciler<'a> {
    gateway: &'a Gateway,
}

impl<'a> SrvReconciler<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Create the SRV record, resolving the target host to its numeric id.
    ///
    /// Returns the record's identity string:
    /// `"{service_proto_name}|{priority}|{weight}|{port}|{host_id}"` —
    /// human-legible and order-fixed, unlike the hashed host batch identity.
    pub async fn create(&self, record: &SrvRecord) -> Result<String, Diagnostic> {
        let host_id = self.resolve_host_id(&record.target_host).await?;
        let service_proto_name = record.service_proto_name();

        let payload = json!({
            "name": service_proto_name,
            "priority": record.priority,
            "weight": record.weight,
            "port": record.port,
            "host": host_id,
        });
        self.gateway
            .request(
                Method::POST,
                "/api/v1/srvs/",
                Some(&payload),
                StatusCode::CREATED,
            )
            .await?;

        Ok(format!(
            "{service_proto_name}|{}|{}|{}|{host_id}",
            record.priority, record.weight, record.port
        ))
    }

    /// Intentionally a no-op: SRV records are treated as immutable once
    /// created, so nothing is re-fetched.
    pub fn read(&self) -> Result<(), Diagnostic> {
        Ok(())
    }

    /// Delete the SRV record matching every declared field exactly.
    ///
    /// The candidate set is fetched filtered by host id and owner name, then
    /// scanned for an exact priority/weight/port match. A missing record is
    /// not a failure: it yields [`SrvDeletion::AlreadyAbsent`] with a
    /// `Warning` and no DELETE is issued.
    pub async fn delete(&self, record: &SrvRecord) -> Result<SrvDeletion, Diagnostic> {
        let service_proto_name = record.service_proto_name();
        let host_id = self.resolve_host_id(&record.target_host).await?;

        let response = self
            .gateway
            .request(
                Method::GET,
                &format!(
                    "/api/v1/srvs/?host={host_id}&name={}",
                    urlencoding::encode(&service_proto_name)
                ),
                None,
                StatusCode::OK,
            )
            .await?;
        let body = response.json.unwrap_or(Value::Null);
        let results = body
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                Diagnostic::error(
                    "The Mreg SRV listing is missing the results field",
                    response.text.clone(),
                )
            })?;

        let record_id = results.iter().find_map(|entry| {
            let matches = entry.get("name").and_then(Value::as_str)
                == Some(service_proto_name.as_str())
                && entry.get("priority").and_then(Value::as_i64)
                    == Some(i64::from(record.priority))
                && entry.get("weight").and_then(Value::as_i64)
                    == Some(i64::from(record.weight))
                && entry.get("port").and_then(Value::as_i64) == Some(i64::from(record.port));
            if matches {
                entry.get("id").and_then(Value::as_i64)
            } else {
                None
            }
        });

        let Some(record_id) = record_id else {
            let warning = Diagnostic::warning(
                "The host does not have the SRV record in Mreg",
                format!("{service_proto_name} , {}", record.target_host),
            );
            log::warn!("{warning}");
            return Ok(SrvDeletion::AlreadyAbsent { warning });
        };

        self.gateway
            .request(
                Method::DELETE,
                &format!("/api/v1/srvs/{record_id}"),
                None,
                StatusCode::NO_CONTENT,
            )
            .await?;

        Ok(SrvDeletion::Deleted { record_id })
    }

    /// Look up a host by name and return its numeric id.
    async fn resolve_host_id(&self, hostname: &str) -> Result<i64, Diagnostic> {
        let response = self
            .gateway
            .request(
                Method::GET,
                &format!("/api/v1/hosts/{}", urlencoding::encode(hostname)),
                None,
                StatusCode::OK,
            )
            .await?;
        response
            .json
            .as_ref()
            .and_then(|body| body.get("id"))
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                Diagnostic::error(
                    format!("The Mreg host record for {hostname} is missing a numeric id"),
                    response.text.clone(),
                )
            })
    }
}
