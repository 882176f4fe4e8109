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

use drive_upload_auth::errors::CredentialsError;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The error type for requests made by the [Drive] client.
///
/// The Drive API reports problems in a JSON document with a numeric `code`
/// and a human readable `message`. When the response includes such a
/// document the error is a *service* error. Responses with an error status
/// code and a different payload are reported as *HTTP* errors. Problems
/// before a response is received are reported as *I/O* errors.
///
/// [Drive]: super::Drive
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// The service rejected the request.
    pub fn service(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Service {
                status_code,
                message: message.into(),
            },
        }
    }

    /// The request failed with an HTTP status and a payload that is not a
    /// Drive error document.
    pub fn http(status_code: u16, payload: bytes::Bytes) -> Self {
        Self {
            kind: ErrorKind::Http {
                status_code,
                payload,
            },
        }
    }

    /// A problem in the transport layer without a full HTTP response.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Io(source.into()),
        }
    }

    /// The request could not be created.
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Serialization(source.into()),
        }
    }

    /// The response could not be parsed.
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization(source.into()),
        }
    }

    /// The credentials could not produce the authentication headers.
    pub fn authentication(source: CredentialsError) -> Self {
        Self {
            kind: ErrorKind::Authentication(source.into()),
        }
    }

    pub fn is_service(&self) -> bool {
        matches!(self.kind, ErrorKind::Service { .. })
    }

    pub fn is_http(&self) -> bool {
        matches!(self.kind, ErrorKind::Http { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io(_))
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Serialization(_))
    }

    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization(_))
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication(_))
    }

    /// The HTTP status code, if the service sent a response.
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Service { status_code, .. } | ErrorKind::Http { status_code, .. } => {
                Some(*status_code)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ErrorKind::Service {
                status_code,
                message,
            } => write!(
                f,
                "the service reports an error with code {status_code} described as: {message}"
            ),
            ErrorKind::Http {
                status_code,
                payload,
            } => write!(
                f,
                "the HTTP transport reports a [{status_code}] error: {}",
                String::from_utf8_lossy(payload)
            ),
            ErrorKind::Io(e) => write!(f, "the transport reports an error: {e}"),
            ErrorKind::Serialization(e) => write!(f, "cannot serialize the request {e}"),
            ErrorKind::Deserialization(e) => write!(f, "cannot deserialize the response {e}"),
            ErrorKind::Authentication(e) => {
                write!(f, "cannot create the authentication headers {e}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            ErrorKind::Service { .. } | ErrorKind::Http { .. } => None,
            ErrorKind::Io(e)
            | ErrorKind::Serialization(e)
            | ErrorKind::Deserialization(e)
            | ErrorKind::Authentication(e) => Some(e.as_ref() as &(dyn StdError + 'static)),
        }
    }
}

// Kinds without a full response always carry the cause.
#[derive(Debug)]
enum ErrorKind {
    Service { status_code: u16, message: String },
    Http { status_code: u16, payload: bytes::Bytes },
    Io(BoxError),
    Serialization(BoxError),
    Deserialization(BoxError),
    Authentication(BoxError),
}

/// The error type for [ClientBuilder::build].
///
/// [ClientBuilder::build]: super::ClientBuilder::build
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct BuildError(BuildErrorKind);

impl BuildError {
    /// The builder was not configured with credentials.
    pub fn is_missing_credentials(&self) -> bool {
        matches!(self.0, BuildErrorKind::MissingCredentials)
    }

    /// The HTTP client could not be initialized.
    pub fn is_transport(&self) -> bool {
        matches!(self.0, BuildErrorKind::Transport(_))
    }

    pub(crate) fn missing_credentials() -> Self {
        Self(BuildErrorKind::MissingCredentials)
    }

    pub(crate) fn transport<T: Into<BoxError>>(source: T) -> Self {
        Self(BuildErrorKind::Transport(source.into()))
    }
}

#[derive(thiserror::Error, Debug)]
enum BuildErrorKind {
    #[error("the Drive client requires credentials")]
    MissingCredentials,
    #[error("could not initialize transport client")]
    Transport(#[source] BoxError),
}
