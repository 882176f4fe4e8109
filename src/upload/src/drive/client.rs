// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::model::{ErrorResponse, FileList, FileMetadata, RemoteFile};
use super::{BuildError, BuildResult, DEFAULT_ENDPOINT, Error, Result};
use drive_upload_auth::credentials::Credentials;
use std::sync::Arc;

// Request only the fields used to select the files to update.
const LIST_FIELDS: &str = "nextPageToken, files(id, name, trashed)";
const FILE_FIELDS: &str = "id, name, trashed";

/// An authorized client for the Google Drive v3 API.
///
/// `Drive` holds a connection pool and the credentials, clones share both.
///
/// # Example
/// ```
/// # use drive_upload::drive::Drive;
/// # use drive_upload_auth::credentials::testing::test_credentials;
/// # async fn sample() -> anyhow::Result<()> {
/// let client = Drive::builder()
///     .with_credentials(test_credentials())
///     .build()?;
/// let files = client.find_files_by_name("report.pdf").await?;
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct Drive {
    inner: Arc<DriveInner>,
}

#[derive(Debug)]
struct DriveInner {
    client: reqwest::Client,
    cred: Credentials,
    endpoint: String,
}

impl Drive {
    /// Returns a builder for [Drive].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Lists the files named `name` that are not in the trash.
    ///
    /// The name must match exactly. All result pages are returned, in the
    /// order the service sends them.
    pub async fn find_files_by_name(&self, name: &str) -> Result<Vec<RemoteFile>> {
        let query = name_query(name);
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let builder = self
                .inner
                .client
                .get(format!("{}/drive/v3/files", self.inner.endpoint))
                .query(&[("q", query.as_str()), ("fields", LIST_FIELDS)]);
            let builder = match page_token.as_deref() {
                Some(token) => builder.query(&[("pageToken", token)]),
                None => builder,
            };
            let builder = self.inner.apply_auth_headers(builder).await?;
            let response = builder.send().await.map_err(Error::io)?;
            let page = handle_json_response::<FileList>(response).await?;
            tracing::debug!(count = page.files.len(), "received a page of matching files");
            files.extend(page.files);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(files)
    }

    /// Creates a new file with the given metadata and contents.
    pub async fn create_file(
        &self,
        metadata: &FileMetadata,
        media: bytes::Bytes,
    ) -> Result<RemoteFile> {
        let builder = self.create_builder(metadata, media).await?;
        let response = builder.send().await.map_err(Error::io)?;
        handle_json_response(response).await
    }

    /// Replaces the contents and metadata of the file `file_id`.
    ///
    /// The parents of the file are not modified.
    pub async fn update_file(
        &self,
        file_id: &str,
        metadata: &FileMetadata,
        media: bytes::Bytes,
    ) -> Result<RemoteFile> {
        let builder = self.update_builder(file_id, metadata, media).await?;
        let response = builder.send().await.map_err(Error::io)?;
        handle_json_response(response).await
    }

    async fn create_builder(
        &self,
        metadata: &FileMetadata,
        media: bytes::Bytes,
    ) -> Result<reqwest::RequestBuilder> {
        let builder = self.inner.client.request(
            reqwest::Method::POST,
            format!("{}/upload/drive/v3/files", self.inner.endpoint),
        );
        self.multipart_builder(builder, metadata, media).await
    }

    async fn update_builder(
        &self,
        file_id: &str,
        metadata: &FileMetadata,
        media: bytes::Bytes,
    ) -> Result<reqwest::RequestBuilder> {
        let builder = self.inner.client.request(
            reqwest::Method::PATCH,
            format!("{}/upload/drive/v3/files/{file_id}", self.inner.endpoint),
        );
        self.multipart_builder(builder, metadata, media).await
    }

    async fn multipart_builder(
        &self,
        builder: reqwest::RequestBuilder,
        metadata: &FileMetadata,
        media: bytes::Bytes,
    ) -> Result<reqwest::RequestBuilder> {
        let builder = builder
            .query(&[("uploadType", "multipart")])
            .query(&[("fields", FILE_FIELDS)]);
        let builder = self.inner.apply_auth_headers(builder).await?;

        let metadata = serde_json::to_string(metadata).map_err(Error::ser)?;
        let metadata = reqwest::multipart::Part::text(metadata)
            .mime_str("application/json; charset=UTF-8")
            .map_err(Error::ser)?;
        let length = media.len() as u64;
        let media = reqwest::multipart::Part::stream_with_length(media, length)
            .mime_str("application/octet-stream")
            .map_err(Error::ser)?;
        let form = reqwest::multipart::Form::new()
            .part("metadata", metadata)
            .part("media", media);

        let builder = builder.header(
            "content-type",
            format!("multipart/related; boundary={}", form.boundary()),
        );
        Ok(builder.body(reqwest::Body::wrap_stream(form.into_stream())))
    }
}

impl DriveInner {
    async fn apply_auth_headers(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder> {
        let auth_headers = self.cred.headers().await.map_err(Error::authentication)?;
        Ok(auth_headers
            .into_iter()
            .fold(builder, |b, (name, value)| b.header(name, value)))
    }
}

/// Returns the `files.list` query selecting non-trashed files named `name`.
pub(crate) fn name_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!("name = '{escaped}' and trashed = false")
}

async fn handle_json_response<O>(response: reqwest::Response) -> Result<O>
where
    O: serde::de::DeserializeOwned,
{
    if !response.status().is_success() {
        return to_http_error(response).await;
    }
    let body = response.bytes().await.map_err(Error::io)?;
    serde_json::from_slice::<O>(&body).map_err(Error::deser)
}

async fn to_http_error<O>(response: reqwest::Response) -> Result<O> {
    let status_code = response.status().as_u16();
    let body = response.bytes().await.map_err(Error::io)?;
    let error = match serde_json::from_slice::<ErrorResponse>(&body) {
        Ok(e) => Error::service(status_code, e.error.message),
        Err(_) => Error::http(status_code, body),
    };
    Err(error)
}

/// A builder for [Drive].
///
/// ```
/// # use drive_upload::drive::Drive;
/// # use drive_upload_auth::credentials::testing::test_credentials;
/// # fn sample() -> anyhow::Result<()> {
/// let client = Drive::builder()
///     .with_endpoint("https://private.googleapis.com")
///     .with_credentials(test_credentials())
///     .build()?;
/// # Ok(()) }
/// ```
#[derive(Clone, Debug, Default)]
pub struct ClientBuilder {
    endpoint: Option<String>,
    credentials: Option<Credentials>,
}

impl ClientBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Creates a new client.
    ///
    /// Fails if the credentials are not set or the HTTP client cannot be
    /// initialized. No requests are made.
    pub fn build(self) -> BuildResult<Drive> {
        let cred = self.credentials.ok_or_else(BuildError::missing_credentials)?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(BuildError::transport)?;
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();
        let inner = DriveInner {
            client,
            cred,
            endpoint,
        };
        Ok(Drive {
            inner: Arc::new(inner),
        })
    }

    /// Sets the endpoint, `https://www.googleapis.com` by default.
    pub fn with_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.endpoint = Some(v.into());
        self
    }

    /// Configures the authentication credentials.
    pub fn with_credentials<V: Into<Credentials>>(mut self, v: V) -> Self {
        self.credentials = Some(v.into());
        self
    }
}
