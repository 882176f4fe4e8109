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

use crate::masking::Masker;
use crate::{Error, Result};
use base64::prelude::{BASE64_STANDARD, Engine as _};

/// Decodes the `credentials` input.
///
/// The input is standard base64, with padding. Line breaks in the input are
/// ignored, `base64` wraps its output at 76 columns by default. A single
/// trailing newline is removed from the decoded text, any other whitespace is
/// preserved.
///
/// Both the encoded input and the decoded text are registered with `masker`
/// before they are used.
pub fn decode_credentials(blob: &str, masker: &Masker) -> Result<String> {
    masker.register(blob);
    let unwrapped = blob
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .collect::<String>();
    masker.register(&unwrapped);
    let decoded = BASE64_STANDARD.decode(&unwrapped).map_err(Error::decode)?;
    let mut decoded = String::from_utf8(decoded).map_err(Error::decode)?;
    if decoded.ends_with('\n') {
        decoded.pop();
    }
    masker.register(&decoded);
    Ok(decoded)
}
