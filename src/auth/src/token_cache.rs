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

use crate::Result;
use crate::token::{Token, TokenProvider};
use std::time::Duration;
use tokio::sync::Mutex;
// Using tokio's wrapper makes the cache testable without relying on clock times.
use tokio::time::Instant;

// Tokens this close to expiring are treated as expired.
const EXPIRY_MARGIN: Duration = Duration::from_secs(10);

/// Reuses the last token fetched from `inner` until it is about to expire.
///
/// Errors are never cached, and there is no background refresh: a new token
/// is only requested when a caller needs one.
#[derive(Debug)]
pub(crate) struct TokenCache<T>
where
    T: TokenProvider,
{
    token: Mutex<Option<Token>>,
    inner: T,
}

fn usable(token: &Token) -> bool {
    token
        .expires_at
        .is_none_or(|e| e > Instant::now() + EXPIRY_MARGIN)
}

impl<T: TokenProvider> TokenCache<T> {
    pub fn new(inner: T) -> TokenCache<T> {
        TokenCache {
            token: Mutex::new(None),
            inner,
        }
    }
}

#[async_trait::async_trait]
impl<T: TokenProvider> TokenProvider for TokenCache<T> {
    async fn token(&self) -> Result<Token> {
        let mut current = self.token.lock().await;
        if let Some(token) = current.as_ref().filter(|t| usable(t)) {
            return Ok(token.clone());
        }
        let token = self.inner.token().await?;
        *current = Some(token.clone());
        Ok(token)
    }
}
