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

pub mod service_account;

use crate::Result;
use crate::errors;
use crate::token::Token;
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use std::sync::Arc;

/// An implementation of [crate::credentials::CredentialsProvider].
///
/// Represents a [Credentials] used to obtain auth [Token]s and the
/// corresponding request headers.
///
/// `Credentials` is cheap to clone, all clones share the same token.
///
/// [Credentials]: https://cloud.google.com/docs/authentication#credentials
/// [Token]: https://cloud.google.com/docs/authentication#token
#[derive(Clone, Debug)]
pub struct Credentials {
    inner: Arc<dyn CredentialsProvider>,
}

impl<T> std::convert::From<T> for Credentials
where
    T: CredentialsProvider + 'static,
{
    fn from(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }
}

impl Credentials {
    /// Asynchronously retrieves a token.
    pub async fn token(&self) -> Result<Token> {
        self.inner.token().await
    }

    /// Asynchronously constructs the auth headers.
    ///
    /// The `Authorization` header value is marked as sensitive, so it is
    /// omitted from `Debug` output of requests.
    pub async fn headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>> {
        self.inner.headers().await
    }
}

/// Represents a source of auth [Token]s and headers.
///
/// Applications rarely implement this trait directly. Tests may use it to
/// provide fixed tokens.
#[async_trait::async_trait]
pub trait CredentialsProvider: std::fmt::Debug + Send + Sync {
    /// Asynchronously retrieves a token.
    async fn token(&self) -> Result<Token>;

    /// Asynchronously constructs the auth headers.
    async fn headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>>;
}

pub(crate) fn build_bearer_headers(token: &Token) -> Result<Vec<(HeaderName, HeaderValue)>> {
    let mut value = HeaderValue::from_str(&format!("{} {}", token.token_type, token.token))
        .map_err(errors::non_retryable)?;
    value.set_sensitive(true);
    Ok(vec![(AUTHORIZATION, value)])
}

/// Credentials with a fixed token, for use in tests of downstream crates.
pub mod testing {
    use super::*;

    /// A simple credentials implementation returning `Bearer test-token`.
    pub fn test_credentials() -> Credentials {
        Credentials::from(TestCredentials)
    }

    /// Credentials that always fail with a non-retryable error.
    pub fn error_credentials() -> Credentials {
        Credentials::from(ErrorCredentials)
    }

    #[derive(Debug)]
    struct TestCredentials;

    #[async_trait::async_trait]
    impl CredentialsProvider for TestCredentials {
        async fn token(&self) -> Result<Token> {
            Ok(Token {
                token: "test-token".to_string(),
                token_type: "Bearer".to_string(),
                expires_at: None,
            })
        }

        async fn headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>> {
            build_bearer_headers(&self.token().await?)
        }
    }

    #[derive(Debug)]
    struct ErrorCredentials;

    #[async_trait::async_trait]
    impl CredentialsProvider for ErrorCredentials {
        async fn token(&self) -> Result<Token> {
            Err(errors::non_retryable_from_str("test-only error credentials"))
        }

        async fn headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>> {
            Err(errors::non_retryable_from_str("test-only error credentials"))
        }
    }
}
