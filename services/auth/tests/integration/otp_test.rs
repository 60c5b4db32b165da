use chrono::{Duration, Utc};

use campus_auth::domain::types::{Account, LoginPolicy, OneTimeCode};
use campus_auth::error::AuthServiceError;
use campus_auth::usecase::otp::{
    CodeIssue, CodeIssuer, CodeVerifier, MAX_CODE_ATTEMPTS, code_key, load_code, resend_key,
};

use crate::helpers::{MockKvStore, MockSms, TEST_PHONE, policy, test_account};

fn wrong_code(code: &str) -> &'static str {
    if code == "000000" { "999999" } else { "000000" }
}

async fn issue(
    kv: &MockKvStore,
    sms: &MockSms,
    policy: &LoginPolicy,
    account: &Account,
) -> CodeIssue {
    CodeIssuer { kv, sms, policy }.issue(account).await.unwrap()
}

// ── CodeIssuer ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_code_with_ttl_and_send_it() {
    let account = test_account("alice");
    let (kv, sms, policy) = (MockKvStore::default(), MockSms::default(), policy());

    assert_eq!(issue(&kv, &sms, &policy, &account).await, CodeIssue::Sent);

    let stored = load_code(&kv, account.id).await.unwrap().unwrap();
    assert_eq!(stored.account_id, account.id);
    assert_eq!(stored.code.len(), 6);
    assert!(stored.expires_at > Utc::now());
    assert_eq!(kv.ttl(&code_key(account.id)), Some(policy.code_ttl_secs));
    assert_eq!(kv.ttl(&resend_key(account.id)), Some(policy.code_resend_secs));

    let sent = sms.sent.lock().unwrap().clone();
    assert_eq!(sent, vec![(TEST_PHONE.to_owned(), stored.code)]);
}

#[tokio::test]
async fn should_not_resend_within_resend_window() {
    let account = test_account("alice");
    let (kv, sms, policy) = (MockKvStore::default(), MockSms::default(), policy());

    issue(&kv, &sms, &policy, &account).await;
    let first = sms.last_code().unwrap();

    assert_eq!(issue(&kv, &sms, &policy, &account).await, CodeIssue::AlreadySent);
    assert_eq!(sms.sent_count(), 1);
    assert_eq!(load_code(&kv, account.id).await.unwrap().unwrap().code, first);
}

#[tokio::test]
async fn should_replace_code_after_resend_window() {
    let account = test_account("alice");
    let (kv, sms) = (MockKvStore::default(), MockSms::default());
    let policy = LoginPolicy {
        code_resend_secs: 0,
        ..policy()
    };

    issue(&kv, &sms, &policy, &account).await;
    assert_eq!(issue(&kv, &sms, &policy, &account).await, CodeIssue::Sent);

    assert_eq!(sms.sent_count(), 2);
    let stored = load_code(&kv, account.id).await.unwrap().unwrap();
    assert_eq!(Some(stored.code), sms.last_code());
}

// ── CodeVerifier ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_accept_code_only_once() {
    let account = test_account("alice");
    let (kv, sms, policy) = (MockKvStore::default(), MockSms::default(), policy());
    issue(&kv, &sms, &policy, &account).await;
    let code = sms.last_code().unwrap();

    let verifier = CodeVerifier { kv: &kv, policy: &policy };
    verifier.verify(account.id, &code).await.unwrap();

    let replay = verifier.verify(account.id, &code).await;
    assert!(
        matches!(replay, Err(AuthServiceError::CodeMismatch)),
        "expected CodeMismatch on replay, got {replay:?}"
    );
}

#[tokio::test]
async fn should_reject_expired_code() {
    let account = test_account("alice");
    let kv = MockKvStore::default();
    let policy = policy();
    let issued_at = Utc::now() - Duration::minutes(10);
    let expired = OneTimeCode {
        account_id: account.id,
        code: "123456".to_owned(),
        issued_at,
        expires_at: issued_at + Duration::minutes(5),
    };
    kv.put(&code_key(account.id), serde_json::to_vec(&expired).unwrap());

    let result = CodeVerifier { kv: &kv, policy: &policy }
        .verify(account.id, "123456")
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::CodeMismatch)),
        "expected CodeMismatch, got {result:?}"
    );
    assert!(!kv.contains(&code_key(account.id)), "expired code is dropped");
}

#[tokio::test]
async fn should_reject_code_issued_to_another_account() {
    let alice = test_account("alice");
    let mallory = test_account("mallory");
    let (kv, sms, policy) = (MockKvStore::default(), MockSms::default(), policy());
    issue(&kv, &sms, &policy, &alice).await;
    let code = sms.last_code().unwrap();

    let verifier = CodeVerifier { kv: &kv, policy: &policy };
    let result = verifier.verify(mallory.id, &code).await;
    assert!(
        matches!(result, Err(AuthServiceError::CodeMismatch)),
        "expected CodeMismatch, got {result:?}"
    );

    verifier.verify(alice.id, &code).await.unwrap();
}

#[tokio::test]
async fn should_burn_code_after_repeated_mismatches() {
    let account = test_account("alice");
    let (kv, sms, policy) = (MockKvStore::default(), MockSms::default(), policy());
    issue(&kv, &sms, &policy, &account).await;
    let code = sms.last_code().unwrap();

    let verifier = CodeVerifier { kv: &kv, policy: &policy };
    for _ in 0..MAX_CODE_ATTEMPTS {
        let result = verifier.verify(account.id, wrong_code(&code)).await;
        assert!(matches!(result, Err(AuthServiceError::CodeMismatch)));
    }

    assert!(!kv.contains(&code_key(account.id)));
    let result = verifier.verify(account.id, &code).await;
    assert!(matches!(result, Err(AuthServiceError::CodeMismatch)));
}

#[tokio::test]
async fn should_keep_resend_throttle_after_code_is_burned() {
    let account = test_account("alice");
    let (kv, sms, policy) = (MockKvStore::default(), MockSms::default(), policy());
    issue(&kv, &sms, &policy, &account).await;
    let code = sms.last_code().unwrap();

    let verifier = CodeVerifier { kv: &kv, policy: &policy };
    for _ in 0..MAX_CODE_ATTEMPTS {
        let _ = verifier.verify(account.id, wrong_code(&code)).await;
    }
    assert!(!kv.contains(&code_key(account.id)));
    assert!(kv.contains(&resend_key(account.id)));

    assert_eq!(issue(&kv, &sms, &policy, &account).await, CodeIssue::AlreadySent);
    assert_eq!(sms.sent_count(), 1);
}

#[tokio::test]
async fn should_not_mark_resend_when_delivery_fails() {
    let account = test_account("alice");
    let (kv, sms, policy) = (MockKvStore::default(), MockSms::failing(), policy());

    let result = CodeIssuer { kv: &kv, sms: &sms, policy: &policy }
        .issue(&account)
        .await;

    assert!(matches!(result, Err(AuthServiceError::DeliveryFailure)));
    assert!(!kv.contains(&resend_key(account.id)));
}

#[tokio::test]
async fn should_accept_code_after_fewer_mismatches_than_limit() {
    let account = test_account("alice");
    let (kv, sms, policy) = (MockKvStore::default(), MockSms::default(), policy());
    issue(&kv, &sms, &policy, &account).await;
    let code = sms.last_code().unwrap();

    let verifier = CodeVerifier { kv: &kv, policy: &policy };
    for _ in 0..MAX_CODE_ATTEMPTS - 1 {
        let _ = verifier.verify(account.id, wrong_code(&code)).await;
    }

    verifier.verify(account.id, &code).await.unwrap();
}

#[tokio::test]
async fn should_reject_when_no_code_was_issued() {
    let account = test_account("alice");
    let kv = MockKvStore::default();
    let policy = policy();

    let result = CodeVerifier { kv: &kv, policy: &policy }
        .verify(account.id, "123456")
        .await;

    assert!(matches!(result, Err(AuthServiceError::CodeMismatch)));
}
