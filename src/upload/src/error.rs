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

use crate::drive;
use std::path::PathBuf;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The errors that stop a run.
///
/// Every error is fatal, the run stops at the first one and the process
/// exits with a non-zero status.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A required input is empty or absent.
    #[error("missing input '{0}'")]
    MissingInput(&'static str),

    /// The credentials input is not valid base64, or does not decode to text.
    #[error("base64 decoding of 'credentials' failed with error: {0}")]
    Decode(#[source] BoxError),

    /// The credentials cannot be used to authorize requests.
    #[error("fetching JWT credentials failed with error: {0}")]
    Auth(#[source] BoxError),

    /// The local file cannot be opened or read.
    #[error("opening file with filename: {} failed with error: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The lookup of existing files failed.
    #[error("Unable to retrieve files: {0}")]
    RemoteQuery(#[source] drive::Error),

    /// Creating or updating a file failed.
    #[error("{operation} failed with error: {source}")]
    RemoteWrite {
        operation: WriteOperation,
        #[source]
        source: drive::Error,
    },
}

/// The remote write that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOperation {
    Upload,
    Update,
}

impl std::fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload => write!(f, "Uploading new file"),
            Self::Update => write!(f, "Updating file"),
        }
    }
}

impl Error {
    pub(crate) fn decode<T: Into<BoxError>>(source: T) -> Self {
        Self::Decode(source.into())
    }

    pub(crate) fn auth<T: Into<BoxError>>(source: T) -> Self {
        Self::Auth(source.into())
    }

    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    // A token exchange failure is an authentication problem, even if it
    // happens on the first request.
    pub(crate) fn remote_query(source: drive::Error) -> Self {
        if source.is_authentication() {
            return Self::auth(source);
        }
        Self::RemoteQuery(source)
    }

    pub(crate) fn remote_write(operation: WriteOperation, source: drive::Error) -> Self {
        if source.is_authentication() {
            return Self::auth(source);
        }
        Self::RemoteWrite { operation, source }
    }
}
