use chrono::{Duration, Utc};

use campus_auth::domain::types::{SessionRecord, audit_actions};
use campus_auth::error::AuthServiceError;
use campus_auth::usecase::session::{
    IssuedSession, LogoutUseCase, SessionIssuer, SessionResolver, session_key,
};
use campus_auth_types::identity::presented_token;
use campus_auth_types::token::generate_session_token;
use campus_domain::account::AccountStatus;
use campus_testing::auth::MockSession;

use crate::helpers::{
    MockAccountStore, MockAuditSink, MockKvStore, origin, policy, test_account,
};

async fn issue(
    accounts: &MockAccountStore,
    kv: &MockKvStore,
    audit: &MockAuditSink,
    username: &str,
) -> IssuedSession {
    let account = accounts
        .accounts
        .lock()
        .unwrap()
        .iter()
        .find(|a| a.username == username)
        .cloned()
        .unwrap();
    let policy = policy();
    SessionIssuer {
        accounts,
        kv,
        audit,
        policy: &policy,
    }
    .issue(&account, &origin("198.51.100.4"))
    .await
    .unwrap()
}

// ── SessionResolver ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_resolve_issued_session_to_account() {
    let account = test_account("alice");
    let accounts = MockAccountStore::new(vec![account.clone()]);
    let (kv, audit) = (MockKvStore::default(), MockAuditSink::default());
    let session = issue(&accounts, &kv, &audit, "alice").await;

    let current = SessionResolver {
        accounts: &accounts,
        kv: &kv,
    }
    .resolve(&session.token)
    .await
    .unwrap();

    assert_eq!(current.account_id, account.id);
    assert_eq!(current.username, "alice");
    assert_eq!(current.role, account.role);
    assert_eq!(current.token, session.token);
}

#[tokio::test]
async fn should_resolve_token_presented_as_bearer_or_cookie() {
    let accounts = MockAccountStore::new(vec![test_account("alice")]);
    let (kv, audit) = (MockKvStore::default(), MockAuditSink::default());
    let session = issue(&accounts, &kv, &audit, "alice").await;
    let client = MockSession::new(session.token.clone());
    let resolver = SessionResolver {
        accounts: &accounts,
        kv: &kv,
    };

    for headers in [client.bearer_headers(), client.cookie_headers()] {
        let token = presented_token(&headers).expect("token presented");
        let current = resolver.resolve(&token).await.unwrap();
        assert_eq!(current.username, "alice");
    }
}

#[tokio::test]
async fn should_reject_expired_session_and_drop_it() {
    let account = test_account("alice");
    let accounts = MockAccountStore::new(vec![account.clone()]);
    let kv = MockKvStore::default();
    let token = generate_session_token();
    let issued_at = Utc::now() - Duration::hours(3);
    let record = SessionRecord {
        account_id: account.id,
        issued_at,
        expires_at: issued_at + Duration::hours(2),
    };
    kv.put(&session_key(&token), serde_json::to_vec(&record).unwrap());

    let result = SessionResolver {
        accounts: &accounts,
        kv: &kv,
    }
    .resolve(&token)
    .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidSession)),
        "expected InvalidSession, got {result:?}"
    );
    assert!(!kv.contains(&session_key(&token)));
}

#[tokio::test]
async fn should_reject_unknown_token() {
    let accounts = MockAccountStore::default();
    let kv = MockKvStore::default();

    let result = SessionResolver {
        accounts: &accounts,
        kv: &kv,
    }
    .resolve(&MockSession::random().token)
    .await;

    assert!(matches!(result, Err(AuthServiceError::InvalidSession)));
}

#[tokio::test]
async fn should_reject_malformed_token() {
    let accounts = MockAccountStore::default();
    let kv = MockKvStore::default();

    let result = SessionResolver {
        accounts: &accounts,
        kv: &kv,
    }
    .resolve("../../etc/passwd")
    .await;

    assert!(matches!(result, Err(AuthServiceError::InvalidSession)));
}

#[tokio::test]
async fn should_reject_session_of_disabled_account() {
    let account = test_account("alice");
    let accounts = MockAccountStore::new(vec![account.clone()]);
    let (kv, audit) = (MockKvStore::default(), MockAuditSink::default());
    let session = issue(&accounts, &kv, &audit, "alice").await;

    accounts.set_status(account.id, AccountStatus::Disabled);

    let result = SessionResolver {
        accounts: &accounts,
        kv: &kv,
    }
    .resolve(&session.token)
    .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidSession)),
        "expected InvalidSession, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_session_of_removed_account() {
    let accounts = MockAccountStore::new(vec![test_account("alice")]);
    let (kv, audit) = (MockKvStore::default(), MockAuditSink::default());
    let session = issue(&accounts, &kv, &audit, "alice").await;

    accounts.accounts.lock().unwrap().clear();

    let result = SessionResolver {
        accounts: &accounts,
        kv: &kv,
    }
    .resolve(&session.token)
    .await;

    assert!(matches!(result, Err(AuthServiceError::InvalidSession)));
}

// ── LogoutUseCase ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_invalidate_token_on_logout() {
    let accounts = MockAccountStore::new(vec![test_account("alice")]);
    let (kv, audit) = (MockKvStore::default(), MockAuditSink::default());
    let session = issue(&accounts, &kv, &audit, "alice").await;
    let resolver = SessionResolver {
        accounts: &accounts,
        kv: &kv,
    };
    let current = resolver.resolve(&session.token).await.unwrap();

    LogoutUseCase {
        kv: kv.clone(),
        audit: audit.clone(),
    }
    .execute(&current, &origin("198.51.100.4"))
    .await
    .unwrap();

    assert!(!kv.contains(&session_key(&session.token)));
    assert!(matches!(
        resolver.resolve(&session.token).await,
        Err(AuthServiceError::InvalidSession)
    ));
    assert_eq!(
        audit.actions(),
        vec![audit_actions::LOGIN, audit_actions::LOGOUT]
    );
}

#[tokio::test]
async fn should_logout_when_audit_write_fails() {
    let accounts = MockAccountStore::new(vec![test_account("alice")]);
    let kv = MockKvStore::default();
    let audit = MockAuditSink::failing();
    let session = issue(&accounts, &kv, &audit, "alice").await;
    let current = SessionResolver {
        accounts: &accounts,
        kv: &kv,
    }
    .resolve(&session.token)
    .await
    .unwrap();

    let result = LogoutUseCase { kv: kv.clone(), audit }
        .execute(&current, &origin("198.51.100.4"))
        .await;

    assert!(result.is_ok());
    assert!(!kv.contains(&session_key(&session.token)));
}

#[tokio::test]
async fn should_keep_other_sessions_on_logout() {
    let accounts = MockAccountStore::new(vec![test_account("alice")]);
    let (kv, audit) = (MockKvStore::default(), MockAuditSink::default());
    let first = issue(&accounts, &kv, &audit, "alice").await;
    let second = issue(&accounts, &kv, &audit, "alice").await;
    let resolver = SessionResolver {
        accounts: &accounts,
        kv: &kv,
    };
    let current = resolver.resolve(&first.token).await.unwrap();

    LogoutUseCase {
        kv: kv.clone(),
        audit: audit.clone(),
    }
    .execute(&current, &origin("198.51.100.4"))
    .await
    .unwrap();

    assert!(resolver.resolve(&second.token).await.is_ok());
}
