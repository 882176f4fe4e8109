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

//! The subset of the Drive v3 resources used by this crate.

use serde::{Deserialize, Serialize};

/// A file stored in Google Drive.
///
/// Only the fields requested by the client are populated, the service omits
/// any other field.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct RemoteFile {
    /// The opaque identifier of the file.
    pub id: String,
    /// The display name of the file.
    #[serde(default)]
    pub name: String,
    /// Whether the file is in the trash.
    #[serde(default)]
    pub trashed: bool,
}

impl RemoteFile {
    pub fn new<I: Into<String>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trashed: false,
        }
    }
}

/// The metadata sent with a create or update request.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub name: String,
    /// The parent folders, updates must leave this empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
}

impl FileMetadata {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            parents: Vec::new(),
        }
    }

    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(|p| p.into()).collect();
        self
    }
}

/// One page of results from `files.list`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileList {
    #[serde(default)]
    pub files: Vec<RemoteFile>,
    pub next_page_token: Option<String>,
}

/// The error document returned by Google APIs.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorStatus,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ErrorStatus {
    #[serde(default)]
    pub message: String,
}
