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

//! A minimal client for the [Google Drive v3] REST API.
//!
//! Only the operations needed to upload a single file are implemented: find
//! files by name, create a file, and replace the contents of a file. Uploads
//! use the `multipart` upload type, the metadata and the contents are sent in
//! a single request.
//!
//! [Google Drive v3]: https://developers.google.com/workspace/drive/api/reference/rest/v3

mod client;
mod error;
pub mod model;

pub use client::{ClientBuilder, Drive};
pub use error::{BuildError, Error};

/// The OAuth scope granting access to files created or opened by the app.
pub const DRIVE_FILE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

/// The default root for Drive API requests.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com";

/// The result type for [Drive] requests.
pub type Result<T> = std::result::Result<T, Error>;

/// The result type for [ClientBuilder::build].
pub type BuildResult<T> = std::result::Result<T, BuildError>;
