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

//! Redact secrets from the diagnostics emitted by a run.
//!
//! A [Masker] holds the secrets registered during a run. It is created once,
//! at startup, and passed to every component that learns a secret. The
//! logging layer writes through a [RedactingMakeWriter], so every formatted
//! event is redacted before it reaches the output.

use std::io::{self, Write};
use std::sync::{Arc, PoisonError, RwLock};
use tracing_subscriber::fmt::MakeWriter;

/// The replacement for redacted secrets.
pub const MASK: &str = "***";

// Lines of a multi-line secret shorter than this are not registered. Short
// lines, such as the braces of a JSON document, would redact unrelated output.
const MIN_LINE_LEN: usize = 8;

/// A set of secrets to redact from diagnostics.
///
/// `Masker` is cheap to clone, all clones share the same set of secrets.
#[derive(Clone, Default)]
pub struct Masker {
    secrets: Arc<RwLock<Vec<String>>>,
}

impl std::fmt::Debug for Masker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secrets = self.secrets.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Masker")
            .field("secrets", &secrets.len())
            .finish()
    }
}

impl Masker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a secret.
    ///
    /// Empty values are ignored. Each line of a multi-line secret is also
    /// registered, so partial output of the secret is redacted too.
    pub fn register<S: AsRef<str>>(&self, secret: S) {
        let secret = secret.as_ref();
        let lines = secret
            .lines()
            .map(str::trim)
            .filter(|l| l.len() >= MIN_LINE_LEN && l.len() < secret.len());
        let mut secrets = self.secrets.write().unwrap_or_else(PoisonError::into_inner);
        for candidate in std::iter::once(secret).chain(lines) {
            if candidate.is_empty() || secrets.iter().any(|s| s == candidate) {
                continue;
            }
            secrets.push(candidate.to_string());
        }
        // Longer secrets first, a secret may contain a shorter one.
        secrets.sort_by(|a, b| b.len().cmp(&a.len()));
    }

    /// Returns `text` with every registered secret replaced by [MASK].
    pub fn redact(&self, text: &str) -> String {
        let secrets = self.secrets.read().unwrap_or_else(PoisonError::into_inner);
        secrets
            .iter()
            .fold(text.to_string(), |acc, secret| acc.replace(secret.as_str(), MASK))
    }

    /// Wraps `inner`, redacting every event before it is written.
    pub fn make_writer<M>(&self, inner: M) -> RedactingMakeWriter<M> {
        RedactingMakeWriter {
            masker: self.clone(),
            inner,
        }
    }
}

/// A [MakeWriter] that redacts the registered secrets.
#[derive(Debug)]
pub struct RedactingMakeWriter<M> {
    masker: Masker,
    inner: M,
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<'a, M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            masker: &self.masker,
            buffer: Vec::new(),
            inner: self.inner.make_writer(),
        }
    }
}

/// Buffers one event and writes it, redacted, when flushed or dropped.
///
/// Secrets may be split across several `write()` calls, the redaction only
/// works on a complete event.
pub struct RedactingWriter<'a, W: Write> {
    masker: &'a Masker,
    buffer: Vec<u8>,
    inner: W,
}

impl<W: Write> RedactingWriter<'_, W> {
    fn emit(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let redacted = self.masker.redact(&String::from_utf8_lossy(&self.buffer));
        self.buffer.clear();
        self.inner.write_all(redacted.as_bytes())?;
        self.inner.flush()
    }
}

impl<W: Write> Write for RedactingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.emit()
    }
}

impl<W: Write> Drop for RedactingWriter<'_, W> {
    fn drop(&mut self) {
        // Nowhere to report the error.
        let _ = self.emit();
    }
}
