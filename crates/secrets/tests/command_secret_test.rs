#![cfg(unix)]

use secretconf_core::Error;
use secretconf_secrets::backends::{CommandSecret, JsonFieldSecret};
use secretconf_secrets::{Secret, SharedSecret};
use std::error::Error as _;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_stdout_is_trimmed() {
    let secret = CommandSecret::new("Api:Key", "echo", ["  s3cr3t  "]);
    assert_eq!(secret.value().await.unwrap(), "  s3cr3t");
}

#[tokio::test]
async fn test_non_zero_exit_is_retrieval_error() {
    let secret = CommandSecret::new("Api:Key", "sh", ["-c", "echo denied >&2; exit 3"]);

    let err = secret.value().await.unwrap_err();
    assert!(matches!(err, Error::SecretRetrieval { .. }));

    let cause = err.source().expect("command error should be attached");
    let message = cause.to_string();
    assert!(message.contains("exit code 3"), "unexpected: {message}");
    assert!(message.contains("denied"), "unexpected: {message}");
}

#[tokio::test]
async fn test_missing_binary_is_retrieval_error() {
    let secret = CommandSecret::new("Api:Key", "secretconf-definitely-not-installed", Vec::<String>::new());
    let err = secret.value().await.unwrap_err();
    assert_eq!(err.secret_key(), Some("Api:Key"));
}

#[tokio::test]
async fn test_timeout_is_retrieval_error() {
    let secret = CommandSecret::new("Slow", "sleep", ["5"]).with_timeout(Duration::from_millis(50));

    let err = secret.value().await.unwrap_err();
    assert!(matches!(err, Error::SecretRetrieval { .. }));
    assert!(err.source().unwrap().to_string().contains("timed out"));
}

#[tokio::test]
async fn test_json_field_from_command_output() {
    let document: SharedSecret = Arc::new(CommandSecret::new(
        "database",
        "echo",
        [r#"{"username":"app","password":"pa55"}"#],
    ));
    let password = JsonFieldSecret::new(document, "password");

    assert_eq!(password.key(), "database:password");
    assert_eq!(password.value().await.unwrap(), "pa55");
}
