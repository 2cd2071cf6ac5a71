use base64::Engine;
use history_server::auth::{AuthError, AuthService, frontend_api_from_publishable_key};
use history_types::HistoryError;

fn publishable_key(environment: &str, host: &str) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(format!("{}$", host));
    format!("pk_{}_{}", environment, payload)
}

#[test]
fn test_publishable_key_round_trip_hosts() {
    for host in ["clerk.chess.app", "eager-fox-12.clerk.accounts.dev"] {
        let key = publishable_key("test", host);
        assert_eq!(frontend_api_from_publishable_key(&key).unwrap(), host);
    }
}

#[test]
fn test_auth_service_from_bad_key() {
    assert!(matches!(
        AuthService::from_publishable_key("pk_test_"),
        Err(AuthError::InvalidPublishableKey)
    ));
    let service = AuthService::from_publishable_key(&publishable_key("live", "clerk.chess.app"))
        .unwrap();
    assert!(!service.is_dev_mode());
}

#[tokio::test]
async fn test_production_mode_rejects_unsigned_tokens() {
    let service = AuthService::new("clerk.chess.app".to_string());

    // Dev-style tokens are never accepted outside dev mode
    let result = service
        .validate_token("user_1:mike@test.com:Mike")
        .await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_dev_mode_rejects_garbage() {
    let service = AuthService::new_dev_mode();
    for token in ["", "a.b.c", ":email:name"] {
        let err = service.validate_token(token).await.unwrap_err();
        assert_eq!(HistoryError::from(err), HistoryError::InvalidToken);
    }
}
