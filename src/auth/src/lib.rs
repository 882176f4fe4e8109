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

//! Authentication components for `drive-upload`.
//!
//! This crate turns a [service account key] into [Credentials] that can
//! authorize calls to Google APIs. The key is exchanged for an OAuth2 access
//! token using a signed JWT assertion, as described in [RFC 7523]. The token
//! is fetched on first use and reused while it remains valid.
//!
//! [Credentials]: crate::credentials::Credentials
//! [RFC 7523]: https://datatracker.ietf.org/doc/html/rfc7523
//! [service account key]: https://cloud.google.com/iam/docs/keys-create-delete#creating

pub mod build_errors;
pub mod errors;

/// Types and functions to work with Google Cloud authentication [Credentials].
///
/// [Credentials]: https://cloud.google.com/docs/authentication#credentials
pub mod credentials;

/// Types and functions to work with auth [Tokens].
///
/// [Tokens]: https://cloud.google.com/docs/authentication#token
pub mod token;

pub(crate) mod constants;

/// The token cache
pub(crate) mod token_cache;

/// A `Result` alias where the `Err` case is
/// `drive_upload_auth::errors::CredentialsError`.
pub type Result<T> = std::result::Result<T, crate::errors::CredentialsError>;
