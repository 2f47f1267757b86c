//! Capability interface over the remote API.
//!
//! The engine talks to the remote service only through [`RemoteApi`]. The
//! production implementation sits on [`Client`]; the test suite drives the
//! engine through an in-memory fake. Every call is an async request/response
//! pair; dropping the future abandons the in-flight call, and the client's
//! request timeout bounds each one.

use async_trait::async_trait;

use l7sync_sdk::{l7origin, l7resource, ApiError, Client};

/// The operations a convergence pass needs from the remote service.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn create_resource(
        &self,
        opts: &l7resource::CreateOpts,
    ) -> Result<l7resource::Item, ApiError>;

    async fn update_resource(&self, item: &l7resource::Item)
        -> Result<l7resource::Item, ApiError>;

    async fn get_resource(&self, l7_resource_id: i64) -> Result<l7resource::Item, ApiError>;

    /// Returns the server's confirmation marker; `"ok"` means deleted.
    async fn delete_resource(&self, l7_resource_id: i64) -> Result<String, ApiError>;

    async fn create_origin(&self, opts: &l7origin::CreateOpts)
        -> Result<l7origin::Item, ApiError>;

    async fn update_origin(&self, item: &l7origin::Item) -> Result<l7origin::Item, ApiError>;

    async fn get_origin(&self, l7_resource_id: i64, id: i64) -> Result<l7origin::Item, ApiError>;

    /// Returns the server's confirmation marker; `"ok"` means deleted.
    async fn delete_origin(&self, l7_resource_id: i64, id: i64) -> Result<String, ApiError>;

    async fn list_origins(&self, l7_resource_id: i64) -> Result<Vec<l7origin::Item>, ApiError>;
}

#[async_trait]
impl RemoteApi for Client {
    async fn create_resource(
        &self,
        opts: &l7resource::CreateOpts,
    ) -> Result<l7resource::Item, ApiError> {
        l7resource::create(self, opts).await
    }

    async fn update_resource(
        &self,
        item: &l7resource::Item,
    ) -> Result<l7resource::Item, ApiError> {
        l7resource::update(self, item).await
    }

    async fn get_resource(&self, l7_resource_id: i64) -> Result<l7resource::Item, ApiError> {
        l7resource::get_by_id(self, l7_resource_id).await
    }

    async fn delete_resource(&self, l7_resource_id: i64) -> Result<String, ApiError> {
        l7resource::delete(self, &l7resource::DeleteOpts { l7_resource_id }).await
    }

    async fn create_origin(
        &self,
        opts: &l7origin::CreateOpts,
    ) -> Result<l7origin::Item, ApiError> {
        l7origin::create(self, opts).await
    }

    async fn update_origin(&self, item: &l7origin::Item) -> Result<l7origin::Item, ApiError> {
        l7origin::update(self, item).await
    }

    async fn get_origin(&self, l7_resource_id: i64, id: i64) -> Result<l7origin::Item, ApiError> {
        l7origin::get_by_id(self, l7_resource_id, id).await
    }

    async fn delete_origin(&self, l7_resource_id: i64, id: i64) -> Result<String, ApiError> {
        l7origin::delete(self, &l7origin::DeleteOpts { l7_resource_id, id }).await
    }

    async fn list_origins(&self, l7_resource_id: i64) -> Result<Vec<l7origin::Item>, ApiError> {
        l7origin::list(self, l7_resource_id).await
    }
}
