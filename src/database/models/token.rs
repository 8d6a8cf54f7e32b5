use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

const MAX_TTL_HOURS: i64 = 24 * 365 * 1000;

/// Stored form of an issued token; the raw key is never persisted
#[derive(Debug, Clone, FromRow)]
pub struct AuthToken {
    pub token_hash: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn is_expired(&self, ttl_hours: u64, now: DateTime<Utc>) -> bool {
        // Capped at 1000 years so Duration::hours cannot overflow
        let hours = i64::try_from(ttl_hours).unwrap_or(i64::MAX).min(MAX_TTL_HOURS);
        now - self.created_at >= Duration::hours(hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_relative_to_creation() {
        let now = Utc::now();
        let token = AuthToken {
            token_hash: "h".into(),
            user_id: 1,
            created_at: now - Duration::hours(2),
        };
        assert!(!token.is_expired(3, now));
        assert!(token.is_expired(2, now));
        assert!(token.is_expired(0, now));
    }
}
