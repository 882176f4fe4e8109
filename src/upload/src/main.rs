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

use clap::Parser;
use drive_upload::config::{Args, RunConfig};
use drive_upload::masking::Masker;
use drive_upload::run::{RunSummary, run};
use drive_upload::{Result, logging};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let masker = Masker::new();
    if let Err(e) = logging::init(args.log_format, &masker) {
        eprintln!("cannot initialize logging: {e}");
        return ExitCode::FAILURE;
    }
    tracing::debug!(?args, "parsed arguments");

    match execute(args, &masker).await {
        Ok(summary) => {
            tracing::info!(
                created = summary.created.len(),
                updated = summary.updated.len(),
                "Done."
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(args: Args, masker: &Masker) -> Result<RunSummary> {
    let config = RunConfig::from_args(args)?;
    run(&config, masker).await
}
