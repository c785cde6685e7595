//! Binary tests for successful commands against a mock registry.
//!
//! `QUAY_API_URL` points the binary at the mock server while the hostname
//! printed in results stays `quay.io`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn qucli(server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin("qucli").expect("qucli binary should build");
    cmd.env_remove("QUAY_HOSTNAME")
        .env_remove("RUST_LOG")
        .env("QUAY_API_TOKEN", "test-token")
        .env("QUAY_API_URL", format!("{}/api/v1/", server.uri()));
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn create_prints_created_line() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/repository"))
        .and(header("Authorization", "Bearer test-token"))
        .and(body_json(json!({
            "namespace": "koudaiii",
            "repository": "qucli",
            "visibility": "private",
            "description": ""
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "namespace": "koudaiii",
            "name": "qucli",
            "kind": "image"
        })))
        .expect(1)
        .mount(&server)
        .await;

    qucli(&server)
        .args(["create", "quay.io/koudaiii/qucli", "--visibility", "private"])
        .assert()
        .success()
        .stdout("Created! quay.io/koudaiii/qucli\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn add_user_prints_added_line() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/repository/koudaiii/qucli/permissions/user/koudaiii"))
        .and(body_json(json!({"role": "admin"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "koudaiii",
            "role": "admin"
        })))
        .expect(1)
        .mount(&server)
        .await;

    qucli(&server)
        .args(["add-user", "koudaiii/qucli", "koudaiii", "--role", "admin"])
        .assert()
        .success()
        .stdout("Added! koudaiii(admin) in quay.io/koudaiii/qucli\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_user_prints_deleted_line() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/repository/koudaiii/qucli/permissions/user/koudaiii"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    qucli(&server)
        .args(["delete-user", "koudaiii/qucli", "koudaiii"])
        .assert()
        .success()
        .stdout("Deleted! koudaiii in quay.io/koudaiii/qucli\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn add_notification_prints_added_line() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/repository/koudaiii/qucli/notification/"))
        .and(body_json(json!({
            "event": "vulnerability_found",
            "method": "email",
            "config": {"email": "a@b.com"},
            "eventConfig": {"level": "2"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "uuid": "n-1",
            "title": null,
            "event": "vulnerability_found",
            "method": "email",
            "config": {"email": "a@b.com"},
            "event_config": {"level": "2"},
            "number_of_failures": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    qucli(&server)
        .args([
            "add-notification",
            "koudaiii/qucli",
            "--event=vulnerability_found",
            "--method=email",
            "--level=2",
            "--email=a@b.com",
        ])
        .assert()
        .success()
        .stdout(
            "Added! \tn-1\t-\tvulnerability_found\tlevel=2\temail\temail=a@b.com\tin quay.io/koudaiii/qucli\n",
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_notification_prints_deleted_line() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/repository/koudaiii/qucli/notification/n-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    qucli(&server)
        .args(["delete-notification", "koudaiii/qucli", "n-1"])
        .assert()
        .success()
        .stdout("Deleted! n-1 notification in quay.io/koudaiii/qucli\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_notification_prints_confirmation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/repository/koudaiii/qucli/notification/n-1/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    qucli(&server)
        .args(["test-notification", "koudaiii/qucli", "n-1"])
        .assert()
        .success()
        .stdout("Test Notification! n-1 notification in quay.io/koudaiii/qucli\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn list_notification_shows_unmanaged_kinds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/repository/koudaiii/qucli/notification/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notifications": [
                {
                    "uuid": "n-1",
                    "title": null,
                    "event": "repo_push",
                    "method": "webhook",
                    "config": {"url": "http://x"},
                    "event_config": {},
                    "number_of_failures": 0
                },
                {
                    "uuid": "n-2",
                    "title": "expiry",
                    "event": "repo_image_expiry",
                    "method": "quay_notification",
                    "config": {"target": {"name": "owners", "kind": "team"}},
                    "event_config": {"days": 7},
                    "number_of_failures": 1
                }
            ]
        })))
        .mount(&server)
        .await;

    qucli(&server)
        .args(["list-notification", "koudaiii/qucli"])
        .assert()
        .success()
        .stdout(
            "n-1\t-\trepo_push\t-\twebhook\turl=http://x\tfailures=0\n\
             n-2\texpiry\trepo_image_expiry\t-\tquay_notification\t-\tfailures=1\n",
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn registry_error_exits_one() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/repository/koudaiii/qucli/notification/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"detail": "Not Found"}"#))
        .mount(&server)
        .await;

    qucli(&server)
        .args(["delete-notification", "koudaiii/qucli", "missing"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("err: Failed to delete notification"))
        .stderr(predicate::str::contains("404"))
        .stderr(predicate::str::contains("Usage").not());
}
