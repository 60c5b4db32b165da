use chrono::Utc;
use tracing::warn;

use campus_domain::id::AccountId;

use crate::domain::repository::AuditSink;
use crate::domain::types::{AuditEntry, RequestOrigin};

/// Append an audit entry, logging instead of failing when the sink is unavailable.
pub async fn record_best_effort<L: AuditSink>(
    sink: &L,
    account_id: AccountId,
    action: &'static str,
    content: String,
    origin: &RequestOrigin,
) {
    let entry = AuditEntry {
        account_id,
        action,
        content,
        ip: origin.ip.to_string(),
        user_agent: origin.user_agent.clone(),
        created_at: Utc::now(),
    };
    if let Err(e) = sink.append(&entry).await {
        warn!(%account_id, action, error = %e, "audit write failed");
    }
}
