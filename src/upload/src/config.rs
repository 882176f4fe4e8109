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

//! Load the run configuration.
//!
//! The inputs come from command-line flags or, as in any GitHub Action, from
//! the `INPUT_<NAME>` environment variables set by the runner. Flags take
//! precedence.

use crate::drive::DEFAULT_ENDPOINT;
use crate::logging::LogFormat;
use crate::{Error, Result};
use clap::Parser;
use std::path::PathBuf;

pub const FILENAME_INPUT: &str = "filename";
pub const FOLDER_ID_INPUT: &str = "folderId";
pub const CREDENTIALS_INPUT: &str = "credentials";
pub const UPDATE_INPUT: &str = "update";

/// Upload or update a file on Google Drive.
#[derive(Clone, Parser)]
#[command(name = "drive-upload", version, about)]
pub struct Args {
    /// The local path of the file to upload.
    #[arg(long, env = "INPUT_FILENAME")]
    pub filename: Option<String>,

    /// The name of the file on Drive, defaults to the base name of the local
    /// file.
    #[arg(long, env = "INPUT_NAME")]
    pub name: Option<String>,

    /// The id of the Drive folder receiving new files.
    #[arg(long, env = "INPUT_FOLDERID")]
    pub folder_id: Option<String>,

    /// The base64 encoded service account key.
    #[arg(long, env = "INPUT_CREDENTIALS", hide_env_values = true)]
    pub credentials: Option<String>,

    /// Replace the contents of existing files with the same name, instead of
    /// creating a new file.
    #[arg(long, env = "INPUT_UPDATE")]
    pub update: Option<String>,

    /// The root of the Drive API.
    #[arg(long, env = "DRIVE_UPLOAD_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// The format of the diagnostics, `github` by default in GitHub Actions.
    #[arg(
        long,
        env = "DRIVE_UPLOAD_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::detect()
    )]
    pub log_format: LogFormat,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("filename", &self.filename)
            .field("name", &self.name)
            .field("folder_id", &self.folder_id)
            .field("credentials", &self.credentials.as_ref().map(|_| "[censored]"))
            .field("update", &self.update)
            .field("endpoint", &self.endpoint)
            .field("log_format", &self.log_format)
            .finish()
    }
}

/// The validated configuration of a run.
#[derive(Clone, PartialEq)]
pub struct RunConfig {
    /// The file to upload.
    pub local_file_path: PathBuf,
    /// The name of the file on Drive. Empty means the base name of
    /// `local_file_path`.
    pub display_name: String,
    /// The parent folder of new files.
    pub folder_id: String,
    /// The base64 encoded service account key.
    pub credentials: String,
    /// Update existing files with the same name.
    pub update_mode: bool,
    /// The root of the Drive API.
    pub endpoint: String,
}

impl RunConfig {
    /// Validates the inputs.
    ///
    /// The required inputs are checked in order: `filename`, `folderId`, and
    /// `credentials`. The first missing one is reported.
    pub fn from_args(args: Args) -> Result<Self> {
        let local_file_path = required(args.filename, FILENAME_INPUT)?;
        let display_name = input(args.name);
        let folder_id = required(args.folder_id, FOLDER_ID_INPUT)?;
        let credentials = required(args.credentials, CREDENTIALS_INPUT)?;

        let update = input(args.update);
        let update_mode = if update.is_empty() {
            tracing::warn!("Update is disabled.");
            false
        } else {
            parse_bool(&update).unwrap_or_else(|| {
                tracing::debug!(input = UPDATE_INPUT, value = %update, "not a boolean, using false");
                false
            })
        };

        Ok(Self {
            local_file_path: PathBuf::from(local_file_path),
            display_name,
            folder_id,
            credentials,
            update_mode,
            endpoint: args.endpoint,
        })
    }

    /// The name of the file on Drive.
    ///
    /// Falls back to the base name of the local file when the `name` input is
    /// empty.
    pub fn resolved_name(&self) -> String {
        if !self.display_name.is_empty() {
            return self.display_name.clone();
        }
        self.local_file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.local_file_path.display().to_string())
    }
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("local_file_path", &self.local_file_path)
            .field("display_name", &self.display_name)
            .field("folder_id", &self.folder_id)
            .field("credentials", &"[censored]")
            .field("update_mode", &self.update_mode)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

// The runner trims action inputs.
fn input(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn required(value: Option<String>, name: &'static str) -> Result<String> {
    let value = input(value);
    if value.is_empty() {
        return Err(Error::MissingInput(name));
    }
    Ok(value)
}

/// Parses the boolean spellings accepted by GitHub Actions inputs.
///
/// Returns `None` for anything else.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
