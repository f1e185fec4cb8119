use bytes::Bytes;
use rocker_client::{DecodedResponse, Request, Transport};
use tracing::instrument;

use super::SaveFileOptions;
use crate::error::{Error, ErrorKind, Result};

impl<T: Transport> super::RockerApi<T> {
    /// Store `content` as `name` with a PUT request.
    ///
    /// The body is sent as is with `mime` as its Content-Type. Any status is
    /// returned as data.
    #[instrument(skip(self, content, options), fields(base64_decode = options.base64_decode))]
    pub async fn save_file(
        &self,
        content: impl Into<Bytes>,
        name: &str,
        mime: &str,
        options: SaveFileOptions,
    ) -> Result<DecodedResponse> {
        if name.is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput(
                "file name must not be empty".to_string(),
            )));
        }

        let mut path = format!("file/{}", encode_file_name(name));
        let query = options.query();
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query);
        }

        let request = Request::put(path)
            .with_auth()
            .header("Content-Type", mime)
            .bytes(content);
        Ok(self.client.dispatch(request).await?)
    }

    /// Delete a stored file.
    ///
    /// Names of the form `owner/file` are reduced to the part after the
    /// first `/`.
    #[instrument(skip(self))]
    pub async fn remove_file(&self, name: &str) -> Result<DecodedResponse> {
        let name = match name.split_once('/') {
            Some((_, rest)) => rest.split('/').next().unwrap_or(rest),
            None => name,
        };
        if name.is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput(
                "file name must not be empty".to_string(),
            )));
        }

        let request = Request::delete(format!("file/{}", urlencoding::encode(name))).with_auth();
        Ok(self.client.dispatch(request).await?)
    }

    /// Upload a file and return the server's description of it.
    ///
    /// The content is Base64-encoded here and decoded by the server. Any
    /// status other than `201 Created` is an `UnexpectedStatus` error.
    #[instrument(skip(self, content, image_versions))]
    pub async fn upload_file(
        &self,
        content: impl AsRef<[u8]>,
        name: &str,
        mime: &str,
        image_versions: Vec<(String, String)>,
    ) -> Result<serde_json::Value> {
        let encoded = rocker_auth::encoding::encode(content);
        let options = SaveFileOptions {
            base64_decode: true,
            image_versions,
        };

        let response = self.save_file(encoded, name, mime, options).await?;
        Ok(super::expect_status(response, 201)?.into_body())
    }
}

/// Percent-encode each `/`-separated segment of a file name.
fn encode_file_name(name: &str) -> String {
    name.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
