// Expiry Policy - classify an expiry instant against the lookahead window
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::Result;
use crate::error::CheckerError;
use crate::expiry::extractor::CredentialExpiry;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Outcome of a single check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Valid {
        expires_at: DateTime<Utc>,
    },
    ExpiringSoon {
        expires_at: DateTime<Utc>,
    },
    Expired {
        expires_at: Option<DateTime<Utc>>,
        reason: String,
    },
}

impl Verdict {
    /// Whether this verdict should raise an alert
    pub fn is_violation(&self) -> bool {
        !matches!(self, Verdict::Valid { .. })
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Verdict::Valid { expires_at } | Verdict::ExpiringSoon { expires_at } => {
                Some(*expires_at)
            }
            Verdict::Expired { expires_at, .. } => *expires_at,
        }
    }
}

/// Certificate rule: anything expiring before `now + lookahead` is expiring soon
pub fn evaluate(
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
    lookahead: TimeDelta,
) -> Result<Verdict> {
    let horizon = now
        .checked_add_signed(lookahead)
        .ok_or_else(|| CheckerError::Config {
            message: format!("lookahead of {} seconds is out of range", lookahead.num_seconds()),
        })?;

    if expires_at < horizon {
        Ok(Verdict::ExpiringSoon { expires_at })
    } else {
        Ok(Verdict::Valid { expires_at })
    }
}

/// Keytab rule
///
/// The lookahead is already folded into the derived keytab expiry, so the only
/// outcomes are a successful extraction (valid) or an expired entry. Any other
/// extraction failure is handed back to the caller.
pub fn evaluate_keytab(extraction: Result<CredentialExpiry>) -> Result<Verdict> {
    match extraction {
        Ok(expiry) => Ok(Verdict::Valid {
            expires_at: expiry.expires_at,
        }),
        Err(err @ CheckerError::Expired { .. }) => {
            let expires_at = match &err {
                CheckerError::Expired { expires_at, .. } => Some(*expires_at),
                _ => None,
            };
            Ok(Verdict::Expired {
                expires_at,
                reason: err.to_string(),
            })
        }
        Err(err) => Err(err),
    }
}
