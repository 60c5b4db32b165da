use tracing::info;

use crate::domain::repository::{AccountStore, AuditSink, KvStore, SmsGateway};
use crate::domain::types::{LoginPolicy, RequestOrigin};
use crate::error::AuthServiceError;
use crate::usecase::credential::CredentialCheck;
use crate::usecase::otp::{CodeIssuer, CodeVerifier};
use crate::usecase::risk_gate::RiskGate;
use crate::usecase::session::{IssuedSession, SessionIssuer};

pub struct LoginInput {
    pub username: String,
    pub password: String,
    /// One-time code; only consulted when the risk gate demands one.
    pub code: Option<String>,
    pub origin: RequestOrigin,
}

/// Password login with failed-attempt step-up.
///
/// ```text
/// credential check ──fail──▶ count failure, reject
///        │ pass
/// risk gate ──clear──▶ issue session
///        │ code required
///   no code ──▶ send SMS code, CodeRequired
///   code    ──▶ verify ──fail──▶ CodeMismatch
///                  │ pass
///             issue session
/// ```
pub struct LoginUseCase<A, K, S, L>
where
    A: AccountStore,
    K: KvStore,
    S: SmsGateway,
    L: AuditSink,
{
    pub accounts: A,
    pub kv: K,
    pub sms: S,
    pub audit: L,
    pub policy: LoginPolicy,
}

impl<A, K, S, L> LoginUseCase<A, K, S, L>
where
    A: AccountStore,
    K: KvStore,
    S: SmsGateway,
    L: AuditSink,
{
    pub async fn execute(&self, input: LoginInput) -> Result<IssuedSession, AuthServiceError> {
        let ip = input.origin.ip;
        let gate = RiskGate {
            kv: &self.kv,
            policy: &self.policy,
        };

        let credentials = CredentialCheck {
            accounts: &self.accounts,
        };
        let account = match credentials.check(&input.username, &input.password).await {
            Ok(account) => account,
            Err(e) if e.is_credential_failure() => {
                let failures = gate.record_failure(ip).await?;
                info!(%ip, failures, kind = e.kind(), "login rejected");
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        if gate.requires_code(ip).await? {
            match input.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
                None => {
                    let issuer = CodeIssuer {
                        kv: &self.kv,
                        sms: &self.sms,
                        policy: &self.policy,
                    };
                    issuer.issue(&account).await?;
                    return Err(AuthServiceError::CodeRequired);
                }
                Some(code) => {
                    let verifier = CodeVerifier {
                        kv: &self.kv,
                        policy: &self.policy,
                    };
                    verifier.verify(account.id, code).await?;
                }
            }
        }

        gate.clear(ip).await?;

        SessionIssuer {
            accounts: &self.accounts,
            kv: &self.kv,
            audit: &self.audit,
            policy: &self.policy,
        }
        .issue(&account, &input.origin)
        .await
    }
}
