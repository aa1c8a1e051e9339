//! The in-memory test session: throwaway credentials plus the current token.

use chrono::Utc;
use std::fmt;

use crate::config::Config;

/// Shown in place of a token when registration succeeded without one.
pub const NO_TOKEN: &str = "NO_TOKEN";

const NICKNAME_PREFIX: &str = "测试用户_";
const NICKNAME_MODULUS: i64 = 100_000;

/// Bearer token held by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BearerToken {
    Issued(String),
    NotIssued,
}

impl BearerToken {
    /// Wrap a token from a response; empty strings are treated as missing.
    pub fn from_response(token: Option<String>) -> Self {
        match token {
            Some(t) if !t.is_empty() => BearerToken::Issued(t),
            _ => BearerToken::NotIssued,
        }
    }

    /// The token if one is usable for an `Authorization` header.
    pub fn usable(&self) -> Option<&str> {
        match self {
            BearerToken::Issued(t) if !t.is_empty() && t != NO_TOKEN => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BearerToken::Issued(t) => write!(f, "{t}"),
            BearerToken::NotIssued => write!(f, "{NO_TOKEN}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestSession {
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub token: BearerToken,
}

impl TestSession {
    /// Credentials derived from the current Unix time.
    pub fn generate(config: &Config) -> Self {
        Self::at_timestamp(Utc::now().timestamp(), config)
    }

    pub fn at_timestamp(timestamp: i64, config: &Config) -> Self {
        Self {
            email: format!("test_{timestamp}@{}", config.email_domain),
            password: config.password.clone(),
            nickname: format!(
                "{NICKNAME_PREFIX}{}",
                timestamp.rem_euclid(NICKNAME_MODULUS)
            ),
            token: BearerToken::NotIssued,
        }
    }
}
