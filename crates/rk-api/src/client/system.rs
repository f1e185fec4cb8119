use rocker_client::{Request, Transport};
use tracing::instrument;

use crate::error::Result;

impl<T: Transport> super::RockerApi<T> {
    /// Get the server's version string.
    #[instrument(skip(self))]
    pub async fn server_version(&self) -> Result<String> {
        let response = self.client.dispatch(Request::get("system/version")).await?;
        let version: super::ServerVersion = super::expect_status(response, 200)?.json()?;
        Ok(version.version)
    }

    /// Get the operations the server exposes.
    #[instrument(skip(self))]
    pub async fn available_operations(&self) -> Result<serde_json::Value> {
        let response = self.client.dispatch(Request::get("operations")).await?;
        Ok(super::expect_status(response, 200)?.into_body())
    }
}
