//! Declared-configuration and observed-state shapes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use l7sync_sdk::{l7origin, l7resource};

use crate::error::ConvergeError;

/// Operator-declared configuration for one protected resource.
///
/// `None` means the operator expressed no intent for a field: it never
/// counts as a difference and never overwrites an observed value. There is
/// no way to declare "explicitly cleared" as distinct from "not mentioned";
/// a configuration that wants a toggle off must say so with `Some(0)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Resource name; the one field that always carries intent.
    pub name: String,

    pub is_active: Option<i64>,
    pub protection_disable: Option<i64>,
    pub use_custom_ssl: Option<i64>,
    pub use_letsencrypt_ssl: Option<i64>,
    /// PEM key material; write-only on the remote side.
    pub custom_ssl_key: Option<String>,
    /// PEM certificate material; write-only on the remote side.
    pub custom_ssl_crt: Option<String>,
    pub force_ssl: Option<i64>,
    pub service_http2: Option<i64>,
    pub geoip_mode: Option<i64>,
    pub geoip_list: Option<String>,
    pub global_whitelist_active: Option<i64>,
    pub http2https: Option<i64>,
    pub https2http: Option<i64>,
    pub www_redir: Option<i64>,
    pub cdn: Option<i64>,
    pub cdn_host: Option<String>,
    pub cdn_proxy_host: Option<String>,

    /// Backend origins, in declaration order. At least one is required;
    /// the first one's IP doubles as the representative origin at creation.
    pub origins: Vec<OriginSpec>,
}

/// One declared backend origin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginSpec {
    pub ip: String,
    pub weight: Option<i64>,
    pub mode: Option<String>,
}

impl ResourceSpec {
    /// Reject configurations that cannot be applied, before any remote
    /// call is made. Duplicate origin IPs are refused outright: matching
    /// is by IP, and two entries with the same IP have no well-defined
    /// outcome.
    pub fn validate(&self) -> Result<(), ConvergeError> {
        if self.name.is_empty() {
            return Err(ConvergeError::InvalidSpec("name must not be empty".into()));
        }
        if self.origins.is_empty() {
            return Err(ConvergeError::InvalidSpec(
                "at least one origin is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for origin in &self.origins {
            if origin.ip.is_empty() {
                return Err(ConvergeError::InvalidSpec(
                    "origin ip must not be empty".into(),
                ));
            }
            if !seen.insert(origin.ip.as_str()) {
                return Err(ConvergeError::InvalidSpec(format!(
                    "duplicate origin ip {}",
                    origin.ip
                )));
            }
        }

        Ok(())
    }
}

/// State observed after the last successful convergence pass.
///
/// This is what the caller persists between runs. The SSL key and
/// certificate inside `resource` hold the carried-forward declared values,
/// not anything the server reported (it reports them empty, always).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub resource: l7resource::Item,
    pub origins: Vec<l7origin::Item>,
}

impl ResourceState {
    /// Server-assigned identifier of the resource.
    pub fn resource_id(&self) -> i64 {
        self.resource.l7_resource_id
    }
}
