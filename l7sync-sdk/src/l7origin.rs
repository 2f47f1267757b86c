//! Requests and wire schemas for backend origins.
//!
//! An origin belongs to exactly one resource. Its surrogate `id` is assigned
//! by the server at creation; the IP address is the only identity a caller
//! knows up front.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{ApiError, Result};

const ORIGIN_PATH: &str = "l7/origin";

/// A backend origin as carried on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    pub l7_resource_id: i64,
    pub id: i64,
    pub weight: i64,
    pub mode: String,
    pub ip: String,
    pub created_at: i64,
    pub modified_at: i64,
}

/// Creation options. `weight` and `mode` are omitted from the request when
/// unset so the server applies its own defaults.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpts {
    pub l7_resource_id: i64,
    pub ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOpts {
    pub l7_resource_id: i64,
    pub id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Page {
    items: Vec<Item>,
}

/// Fetch a single origin by resource id and surrogate id.
pub async fn get_by_id(client: &Client, l7_resource_id: i64, id: i64) -> Result<Item> {
    client
        .get(&format!("{ORIGIN_PATH}/{l7_resource_id}/{id}"))
        .await
}

/// List the origins belonging to one resource.
pub async fn list(client: &Client, l7_resource_id: i64) -> Result<Vec<Item>> {
    let page: Page = client
        .get_query(ORIGIN_PATH, &[("l7ResourceId", l7_resource_id.to_string())])
        .await?;
    Ok(page.items)
}

/// Create an origin under a resource.
pub async fn create(client: &Client, opts: &CreateOpts) -> Result<Item> {
    if opts.ip.is_empty() {
        return Err(ApiError::InvalidRequest("origin ip must not be empty".into()));
    }
    client.post(ORIGIN_PATH, opts).await
}

/// Replace an origin with the full record keyed by resource id + id.
pub async fn update(client: &Client, item: &Item) -> Result<Item> {
    client.put(ORIGIN_PATH, item).await
}

/// Delete an origin. Returns the server's confirmation marker; anything
/// other than `"ok"` means the delete did not happen.
pub async fn delete(client: &Client, opts: &DeleteOpts) -> Result<String> {
    client.delete(ORIGIN_PATH, opts).await
}
