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

#[cfg(test)]
mod tests {
    use base64::prelude::{BASE64_STANDARD, Engine as _};
    use drive_upload::config::RunConfig;
    use drive_upload::logging::{self, LogFormat};
    use drive_upload::masking::Masker;
    use drive_upload::run::run;
    use drive_upload::{Error, WriteOperation};
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use serde_json::json;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt::MakeWriter;

    type TestResult = anyhow::Result<()>;

    const PKCS8_KEY: &str = include_str!("../../auth/tests/data/test-key-pkcs8.pem");
    const QUERY: &str = "name = 'report.txt' and trashed = false";

    struct Fixture {
        server: Server,
        // Keeps the temporary directory alive.
        _dir: tempfile::TempDir,
        path: PathBuf,
    }

    impl Fixture {
        fn new() -> anyhow::Result<Self> {
            let dir = tempfile::tempdir()?;
            let path = dir.path().join("report.txt");
            std::fs::write(&path, "report contents")?;
            Ok(Self {
                server: Server::run(),
                _dir: dir,
                path,
            })
        }

        fn credentials(&self) -> String {
            let key = json!({
                "type": "service_account",
                "client_email": "test-client-email@test-project.iam.gserviceaccount.com",
                "private_key_id": "test-private-key-id",
                "private_key": PKCS8_KEY,
                "project_id": "test-project-id",
                "token_uri": self.server.url("/token").to_string(),
            });
            // Encoded files often end with a newline.
            BASE64_STANDARD.encode(format!("{key}\n"))
        }

        fn config(&self, update_mode: bool) -> RunConfig {
            RunConfig {
                local_file_path: self.path.clone(),
                display_name: String::new(),
                folder_id: "folder-123".to_string(),
                credentials: self.credentials(),
                update_mode,
                endpoint: format!("http://{}", self.server.addr()),
            }
        }

        fn expect_token(&self) {
            self.server.expect(
                Expectation::matching(request::method_path("POST", "/token"))
                    .times(1..)
                    .respond_with(json_encoded(json!({
                        "access_token": "test-access-token",
                        "token_type": "Bearer",
                        "expires_in": 3600,
                    }))),
            );
        }

        fn expect_lookup(&self, ids: &[&str]) {
            let files = ids
                .iter()
                .map(|id| json!({"id": id, "name": "report.txt", "trashed": false}))
                .collect::<Vec<_>>();
            self.server.expect(
                Expectation::matching(all_of![
                    request::method_path("GET", "/drive/v3/files"),
                    request::query(url_decoded(contains(("q", QUERY)))),
                    request::headers(contains(("authorization", "Bearer test-access-token"))),
                ])
                .times(1)
                .respond_with(json_encoded(json!({ "files": files }))),
            );
        }

        fn expect_update(&self, id: &str) {
            self.server.expect(
                Expectation::matching(all_of![
                    request::method_path("PATCH", format!("/upload/drive/v3/files/{id}")),
                    request::query(url_decoded(contains(("uploadType", "multipart")))),
                    request::body(matches("report contents")),
                    request::body(matches(r#""name":"report.txt""#)),
                    request::body(not(matches("parents"))),
                ])
                .times(1)
                .respond_with(json_encoded(json!({"id": id, "name": "report.txt"}))),
            );
        }

        fn expect_no_create(&self) {
            self.server.expect(
                Expectation::matching(request::method_path("POST", "/upload/drive/v3/files"))
                    .times(0)
                    .respond_with(status_code(500)),
            );
        }
    }

    #[derive(Clone, Debug, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn upload_new_file() -> TestResult {
        let fixture = Fixture::new()?;
        fixture.expect_token();
        fixture.server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/upload/drive/v3/files"),
                request::query(url_decoded(contains(("uploadType", "multipart")))),
                request::headers(contains(("authorization", "Bearer test-access-token"))),
                request::body(matches(r#""name":"report.txt""#)),
                request::body(matches(r#""parents":\["folder-123"\]"#)),
                request::body(matches("report contents")),
            ])
            .times(1)
            .respond_with(json_encoded(json!({"id": "new-id", "name": "report.txt"}))),
        );

        let summary = run(&fixture.config(false), &Masker::new()).await?;
        let created = summary.created.iter().map(|f| f.id.as_str()).collect::<Vec<_>>();
        assert_eq!(created, vec!["new-id"]);
        assert!(summary.updated.is_empty(), "{summary:?}");
        Ok(())
    }

    #[tokio::test]
    async fn upload_mode_skips_lookup() -> TestResult {
        let fixture = Fixture::new()?;
        fixture.expect_token();
        fixture.server.expect(
            Expectation::matching(request::method_path("GET", "/drive/v3/files"))
                .times(0)
                .respond_with(status_code(500)),
        );
        fixture.server.expect(
            Expectation::matching(request::method_path("POST", "/upload/drive/v3/files"))
                .times(1)
                .respond_with(json_encoded(json!({"id": "new-id", "name": "report.txt"}))),
        );

        let summary = run(&fixture.config(false), &Masker::new()).await?;
        assert_eq!(summary.created.len(), 1, "{summary:?}");
        Ok(())
    }

    #[tokio::test]
    async fn explicit_name() -> TestResult {
        let fixture = Fixture::new()?;
        fixture.expect_token();
        fixture.server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/upload/drive/v3/files"),
                request::body(matches(r#""name":"Quarterly Report.txt""#)),
            ])
            .times(1)
            .respond_with(json_encoded(
                json!({"id": "new-id", "name": "Quarterly Report.txt"}),
            )),
        );

        let config = RunConfig {
            display_name: "Quarterly Report.txt".to_string(),
            ..fixture.config(false)
        };
        let summary = run(&config, &Masker::new()).await?;
        assert_eq!(summary.created[0].name, "Quarterly Report.txt");
        Ok(())
    }

    #[tokio::test]
    async fn update_without_matches_uploads() -> TestResult {
        let fixture = Fixture::new()?;
        fixture.expect_token();
        fixture.expect_lookup(&[]);
        fixture.server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/upload/drive/v3/files"),
                request::body(matches(r#""parents":\["folder-123"\]"#)),
            ])
            .times(1)
            .respond_with(json_encoded(json!({"id": "new-id", "name": "report.txt"}))),
        );

        let summary = run(&fixture.config(true), &Masker::new()).await?;
        assert_eq!(summary.created.len(), 1, "{summary:?}");
        assert!(summary.updated.is_empty(), "{summary:?}");
        Ok(())
    }

    #[tokio::test]
    async fn update_single_match() -> TestResult {
        let fixture = Fixture::new()?;
        fixture.expect_token();
        fixture.expect_lookup(&["id-1"]);
        fixture.expect_update("id-1");
        fixture.expect_no_create();

        let summary = run(&fixture.config(true), &Masker::new()).await?;
        assert!(summary.created.is_empty(), "{summary:?}");
        let updated = summary.updated.iter().map(|f| f.id.as_str()).collect::<Vec<_>>();
        assert_eq!(updated, vec!["id-1"]);
        Ok(())
    }

    #[tokio::test]
    async fn update_every_match() -> TestResult {
        let fixture = Fixture::new()?;
        fixture.expect_token();
        fixture.expect_lookup(&["id-1", "id-2", "id-3"]);
        fixture.expect_update("id-1");
        fixture.expect_update("id-2");
        fixture.expect_update("id-3");
        fixture.expect_no_create();

        let summary = run(&fixture.config(true), &Masker::new()).await?;
        let updated = summary.updated.iter().map(|f| f.id.as_str()).collect::<Vec<_>>();
        assert_eq!(updated, vec!["id-1", "id-2", "id-3"]);
        Ok(())
    }

    #[tokio::test]
    async fn update_failure_stops_the_run() -> TestResult {
        let fixture = Fixture::new()?;
        fixture.expect_token();
        fixture.expect_lookup(&["id-1", "id-2"]);
        fixture.server.expect(
            Expectation::matching(request::method_path("PATCH", "/upload/drive/v3/files/id-1"))
                .times(1)
                .respond_with(status_code(500).body(
                    json!({"error": {"code": 500, "message": "backend error"}}).to_string(),
                )),
        );
        fixture.server.expect(
            Expectation::matching(request::method_path("PATCH", "/upload/drive/v3/files/id-2"))
                .times(0)
                .respond_with(status_code(500)),
        );
        fixture.expect_no_create();

        let err = run(&fixture.config(true), &Masker::new())
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                Error::RemoteWrite {
                    operation: WriteOperation::Update,
                    ..
                }
            ),
            "{err:?}"
        );
        assert!(
            err.to_string()
                .starts_with("Updating file failed with error: "),
            "{err}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn lookup_failure() -> TestResult {
        let fixture = Fixture::new()?;
        fixture.expect_token();
        fixture.server.expect(
            Expectation::matching(request::method_path("GET", "/drive/v3/files"))
                .times(1)
                .respond_with(status_code(403).body(
                    json!({"error": {"code": 403, "message": "insufficient permissions"}})
                        .to_string(),
                )),
        );
        fixture.expect_no_create();

        let err = run(&fixture.config(true), &Masker::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RemoteQuery(_)), "{err:?}");
        assert!(
            err.to_string().starts_with("Unable to retrieve files: "),
            "{err}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn upload_failure() -> TestResult {
        let fixture = Fixture::new()?;
        fixture.expect_token();
        fixture.server.expect(
            Expectation::matching(request::method_path("POST", "/upload/drive/v3/files"))
                .times(1)
                .respond_with(status_code(404).body(
                    json!({"error": {"code": 404, "message": "File not found: folder-123."}})
                        .to_string(),
                )),
        );

        let err = run(&fixture.config(false), &Masker::new())
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                Error::RemoteWrite {
                    operation: WriteOperation::Upload,
                    ..
                }
            ),
            "{err:?}"
        );
        assert!(
            err.to_string()
                .starts_with("Uploading new file failed with error: "),
            "{err}"
        );
        assert!(err.to_string().contains("folder-123"), "{err}");
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_fails_before_any_request() -> TestResult {
        for update_mode in [false, true] {
            let fixture = Fixture::new()?;
            fixture.server.expect(
                Expectation::matching(any())
                    .times(0)
                    .respond_with(status_code(500)),
            );
            let config = RunConfig {
                local_file_path: fixture.path.with_file_name("missing.txt"),
                ..fixture.config(update_mode)
            };
            let err = run(&config, &Masker::new()).await.unwrap_err();
            assert!(matches!(err, Error::Io { .. }), "{err:?}");
            assert!(
                err.to_string().contains("missing.txt"),
                "update_mode={update_mode} {err}"
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn directory_fails_before_any_request() -> TestResult {
        for update_mode in [false, true] {
            let fixture = Fixture::new()?;
            fixture.server.expect(
                Expectation::matching(any())
                    .times(0)
                    .respond_with(status_code(500)),
            );
            let config = RunConfig {
                local_file_path: fixture._dir.path().to_path_buf(),
                ..fixture.config(update_mode)
            };
            let err = run(&config, &Masker::new()).await.unwrap_err();
            assert!(matches!(err, Error::Io { .. }), "{err:?}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn invalid_credentials_encoding() -> TestResult {
        let fixture = Fixture::new()?;
        fixture.server.expect(
            Expectation::matching(any())
                .times(0)
                .respond_with(status_code(500)),
        );
        let config = RunConfig {
            credentials: "not base64!".to_string(),
            ..fixture.config(false)
        };
        let err = run(&config, &Masker::new()).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)), "{err:?}");
        assert!(
            err.to_string()
                .starts_with("base64 decoding of 'credentials' failed with error: "),
            "{err}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn token_failure_is_an_auth_error() -> TestResult {
        let fixture = Fixture::new()?;
        fixture.server.expect(
            Expectation::matching(request::method_path("POST", "/token"))
                .times(1)
                .respond_with(status_code(401).body("invalid_client")),
        );
        fixture.expect_no_create();

        let err = run(&fixture.config(false), &Masker::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(_)), "{err:?}");
        assert!(
            err.to_string()
                .starts_with("fetching JWT credentials failed with error: "),
            "{err}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn secrets_never_reach_the_logs() -> TestResult {
        let fixture = Fixture::new()?;
        let credentials = fixture.credentials();
        // A misbehaving token endpoint echoes the credentials.
        fixture.server.expect(
            Expectation::matching(request::method_path("POST", "/token"))
                .times(1)
                .respond_with(status_code(400).body(format!("rejected: {credentials}"))),
        );

        let masker = Masker::new();
        let capture = Capture::default();
        let subscriber = logging::subscriber(
            LogFormat::Github,
            EnvFilter::new("debug"),
            &masker,
            capture.clone(),
        );
        let _guard = tracing::subscriber::set_default(subscriber);

        let err = run(&fixture.config(false), &masker).await.unwrap_err();
        assert!(err.to_string().contains(&credentials), "{err}");
        tracing::error!("{err}");

        let output = capture.contents();
        assert!(output.contains("::error::"), "{output}");
        assert!(!output.contains(&credentials), "{output}");
        assert!(!output.contains("BEGIN PRIVATE KEY"), "{output}");
        assert!(masker.redact(&err.to_string()).contains("rejected: ***"));
        Ok(())
    }
}
