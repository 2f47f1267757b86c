//! Requests and wire schemas for the top-level protected resource.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{ApiError, Result};

pub(crate) const RESOURCE_PATH: &str = "l7/resource";

/// A protected resource as carried on the wire.
///
/// `l7_resource_id` and `protected_ip` are assigned by the server and never
/// change after creation. `custom_ssl_key` and `custom_ssl_crt` are accepted
/// on writes but the server never returns them — reads always carry them
/// empty, and callers must not interpret that as "cleared".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    pub partner_client_account_id: i64,
    pub l7_resource_id: i64,
    pub l7_resource_name: String,
    pub l7_resource_is_active: i64,
    pub l7_protection_disable: i64,
    pub use_custom_ssl: i64,
    pub use_letsencrypt_ssl: i64,
    pub custom_ssl_key: String,
    pub custom_ssl_crt: String,
    pub forcessl: i64,
    pub service_http2: i64,
    pub geoip_mode: i64,
    pub geoip_list: String,
    pub global_whitelist_active: i64,
    pub http2https: i64,
    pub https2http: i64,
    pub protected_ip: String,
    pub created_at: i64,
    pub modified_at: i64,
    // Odd casing is what the server actually sends.
    #[serde(rename = "SslExpireDate")]
    pub ssl_expire_date: i64,
    pub wwwredir: i64,
    pub cdn: i64,
    pub cdn_host: String,
    pub cdn_proxy_host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_data: Option<String>,
}

/// The only fields the API accepts at creation time. Everything else comes
/// back as a server default and needs a follow-up update to change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpts {
    pub l7_resource_name: String,
    /// IPv4 address of the representative origin.
    pub origin_data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOpts {
    pub l7_resource_id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Page {
    items: Vec<Item>,
}

/// Fetch a single resource by its server-assigned id.
pub async fn get_by_id(client: &Client, l7_resource_id: i64) -> Result<Item> {
    client
        .get(&format!("{RESOURCE_PATH}/{l7_resource_id}"))
        .await
}

/// List all resources on the account.
pub async fn list(client: &Client) -> Result<Vec<Item>> {
    let page: Page = client.get(RESOURCE_PATH).await?;
    Ok(page.items)
}

/// Create a resource from a name and a representative origin IP.
pub async fn create(client: &Client, opts: &CreateOpts) -> Result<Item> {
    if opts.origin_data.is_empty() {
        return Err(ApiError::InvalidRequest(
            "originData must not be empty".into(),
        ));
    }
    client.post(RESOURCE_PATH, opts).await
}

/// Replace a resource with the full record keyed by its id.
pub async fn update(client: &Client, item: &Item) -> Result<Item> {
    client.put(RESOURCE_PATH, item).await
}

/// Delete a resource. Returns the server's confirmation marker; anything
/// other than `"ok"` means the delete did not happen.
pub async fn delete(client: &Client, opts: &DeleteOpts) -> Result<String> {
    client.delete(RESOURCE_PATH, opts).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_deserializes_from_wire_payload() {
        let body = r#"{
            "partnerClientAccountId": 9,
            "l7ResourceId": 1234,
            "l7ResourceName": "edge1",
            "l7ResourceIsActive": 1,
            "l7ProtectionDisable": 0,
            "useCustomSsl": 0,
            "useLetsencryptSsl": 0,
            "customSslKey": "",
            "customSslCrt": "",
            "forcessl": 0,
            "serviceHttp2": 1,
            "geoipMode": 0,
            "geoipList": "",
            "globalWhitelistActive": 1,
            "http2https": 0,
            "https2http": 0,
            "protectedIp": "203.0.113.10",
            "createdAt": 1700000000,
            "modifiedAt": 1700000001,
            "SslExpireDate": 0,
            "wwwredir": 0,
            "cdn": 0,
            "cdnHost": "",
            "cdnProxyHost": ""
        }"#;

        let item: Item = serde_json::from_str(body).unwrap();
        assert_eq!(item.l7_resource_id, 1234);
        assert_eq!(item.l7_resource_name, "edge1");
        assert_eq!(item.l7_resource_is_active, 1);
        assert_eq!(item.service_http2, 1);
        assert_eq!(item.protected_ip, "203.0.113.10");
        assert_eq!(item.origin_data, None);
    }

    #[test]
    fn item_tolerates_missing_fields() {
        let item: Item = serde_json::from_str(r#"{"l7ResourceId": 7}"#).unwrap();
        assert_eq!(item.l7_resource_id, 7);
        assert_eq!(item.l7_resource_name, "");
        assert_eq!(item.custom_ssl_key, "");
    }

    #[test]
    fn create_opts_serialize_to_camel_case() {
        let opts = CreateOpts {
            l7_resource_name: "edge1".into(),
            origin_data: "10.0.0.1".into(),
        };
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["l7ResourceName"], "edge1");
        assert_eq!(json["originData"], "10.0.0.1");
    }
}
