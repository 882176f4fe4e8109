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

//! Upload or update a file on Google Drive from a GitHub Actions step.
//!
//! The step authenticates with a base64 encoded [service account key] and
//! either creates a new file in a folder, or replaces the contents of the
//! existing files with the same name. The main entry points are:
//!
//! * [RunConfig][config::RunConfig], the validated inputs.
//! * [run][run::run], which performs the upload.
//! * [Masker][masking::Masker], which keeps secrets out of the diagnostics.
//!
//! [service account key]: https://cloud.google.com/iam/docs/keys-create-delete#creating

pub mod config;
pub mod drive;
pub mod logging;
pub mod masking;
pub mod run;
pub mod secrets;

mod error;
pub use error::{Error, WriteOperation};

/// The result type for a run.
pub type Result<T> = std::result::Result<T, Error>;
