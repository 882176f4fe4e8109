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

//! Upload or update the file.
//!
//! With `update` disabled a run always creates a new file in the target
//! folder. With `update` enabled a run replaces the contents of every
//! non-trashed file with the same name, and creates a new file only if there
//! are none. Existing files keep their parents.

use crate::config::RunConfig;
use crate::drive::model::{FileMetadata, RemoteFile};
use crate::drive::{DRIVE_FILE_SCOPE, Drive};
use crate::masking::Masker;
use crate::secrets::decode_credentials;
use crate::{Error, Result, WriteOperation};
use drive_upload_auth::credentials::service_account;
use std::path::Path;

/// The files written by a successful run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// The files created, at most one.
    pub created: Vec<RemoteFile>,
    /// The existing files updated, in the order returned by the lookup.
    pub updated: Vec<RemoteFile>,
}

/// Runs the upload described by `config`.
///
/// The credentials are decoded and the local file is checked before any
/// request is sent. The first error stops the run, files written before the
/// error are not rolled back.
pub async fn run(config: &RunConfig, masker: &Masker) -> Result<RunSummary> {
    let credentials = decode_credentials(&config.credentials, masker)?;
    let client = authorize(&credentials, &config.endpoint, masker)?;
    check_readable(&config.local_file_path).await?;
    let name = config.resolved_name();

    let mut summary = RunSummary::default();
    if !config.update_mode {
        tracing::info!("Uploading new file on drive: {name}");
        let file = upload_new_file(&client, config, &name).await?;
        summary.created.push(file);
        return Ok(summary);
    }

    tracing::info!("Updating file on drive: {name}");
    let matches = client
        .find_files_by_name(&name)
        .await
        .map_err(Error::remote_query)?;
    if matches.is_empty() {
        tracing::info!("No existing file named {name}, uploading a new file.");
        let file = upload_new_file(&client, config, &name).await?;
        summary.created.push(file);
        return Ok(summary);
    }
    for existing in matches {
        tracing::info!(
            "Updating file; {} ({}) Trashed={}",
            existing.name,
            existing.id,
            existing.trashed
        );
        let file = update_existing_file(&client, config, &name, &existing.id).await?;
        summary.updated.push(file);
    }
    Ok(summary)
}

/// Returns a [Drive] client authorized by a service account key.
///
/// `credentials` is the JSON key file. Its private key is registered with
/// `masker`. The client requests the `drive.file` scope. No requests are sent,
/// the token is fetched on first use.
pub fn authorize(credentials: &str, endpoint: &str, masker: &Masker) -> Result<Drive> {
    let key = serde_json::from_str::<serde_json::Value>(credentials).map_err(Error::auth)?;
    if let Some(private_key) = key.get("private_key").and_then(|v| v.as_str()) {
        masker.register(private_key);
    }
    let credentials = service_account::Builder::new(key)
        .with_scopes([DRIVE_FILE_SCOPE])
        .build()
        .map_err(Error::auth)?;
    Drive::builder()
        .with_endpoint(endpoint)
        .with_credentials(credentials)
        .build()
        .map_err(Error::auth)
}

/// Fails unless `path` is a regular file that can be opened for reading.
pub async fn check_readable(path: &Path) -> Result<()> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| Error::io(path, e))?;
    let metadata = file.metadata().await.map_err(|e| Error::io(path, e))?;
    if metadata.is_dir() {
        return Err(Error::io(
            path,
            std::io::Error::new(std::io::ErrorKind::IsADirectory, "is a directory"),
        ));
    }
    Ok(())
}

async fn read_contents(path: &Path) -> Result<bytes::Bytes> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|e| Error::io(path, e))?;
    Ok(bytes::Bytes::from(contents))
}

async fn upload_new_file(client: &Drive, config: &RunConfig, name: &str) -> Result<RemoteFile> {
    let media = read_contents(&config.local_file_path).await?;
    let metadata = FileMetadata::new(name).with_parents([config.folder_id.as_str()]);
    let file = client
        .create_file(&metadata, media)
        .await
        .map_err(|e| Error::remote_write(WriteOperation::Upload, e))?;
    tracing::info!(id = %file.id, "Uploaded new file successfully.");
    Ok(file)
}

async fn update_existing_file(
    client: &Drive,
    config: &RunConfig,
    name: &str,
    file_id: &str,
) -> Result<RemoteFile> {
    let media = read_contents(&config.local_file_path).await?;
    let file = client
        .update_file(file_id, &FileMetadata::new(name), media)
        .await
        .map_err(|e| Error::remote_write(WriteOperation::Update, e))?;
    tracing::info!(id = %file.id, "Updated file successfully.");
    Ok(file)
}
