use rocker_client::{DecodedResponse, FormData, Request, Scalar, Transport};
use tracing::{debug, instrument};

use crate::error::Result;

impl<T: Transport> super::RockerApi<T> {
    /// Get the authenticated user.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<serde_json::Value> {
        let response = self.client.dispatch(Request::get("me").with_auth()).await?;
        Ok(super::expect_status(response, 200)?.into_body())
    }

    /// Register a new user.
    ///
    /// `meta` is sent as `meta[key]=value` form fields. On `201 Created` the
    /// client's credentials become (`email`, `password`). Any status is
    /// returned as data.
    #[instrument(skip(self, password, meta))]
    pub async fn create_user<K, V, I>(
        &mut self,
        email: &str,
        nick: &str,
        password: &str,
        meta: I,
    ) -> Result<DecodedResponse>
    where
        K: Into<String>,
        V: Into<Scalar>,
        I: IntoIterator<Item = (K, V)>,
    {
        let form = FormData::new()
            .field("email", email)
            .field("nick", nick)
            .field("password", password)
            .nested("meta", meta);

        let response = self.client.dispatch(Request::post("user").form(form)).await?;
        if response.is_created() {
            debug!("User created, switching credentials");
            self.client.set_user(email, password)?;
        }
        Ok(response)
    }
}
