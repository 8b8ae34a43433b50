use log::{info, warn};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{FolioError, Result};

pub const PASSWORD_MISMATCH: &str = "비밀번호가 올바르지 않습니다.";

pub fn sha256_hex(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Accepted { token: String },
    Rejected { message: &'static str },
}

/// Compares password digests against the configured one and holds the
/// single in-memory session token. Nothing here survives a restart.
#[derive(Debug)]
pub struct AdminAuth {
    password_hash: String,
    session: Option<Uuid>,
}

impl AdminAuth {
    pub fn new(password_hash: &str) -> Self {
        AdminAuth {
            password_hash: password_hash.trim().to_ascii_lowercase(),
            session: None,
        }
    }

    pub fn login(&mut self, password: &str) -> LoginOutcome {
        if sha256_hex(password) == self.password_hash {
            let token = Uuid::new_v4();
            self.session = Some(token);
            info!("Admin session started");
            LoginOutcome::Accepted {
                token: token.to_string(),
            }
        } else {
            warn!("Rejected admin login attempt");
            LoginOutcome::Rejected {
                message: PASSWORD_MISMATCH,
            }
        }
    }

    pub fn logout(&mut self) {
        if self.session.take().is_some() {
            info!("Admin session cleared");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn check_token(&self, token: &str) -> Result<()> {
        match self.session {
            Some(session) if session.to_string() == token => Ok(()),
            _ => {
                warn!("Failed to authorize token");
                Err(FolioError::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD_HASH: &str = "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";

    #[test]
    fn digest_matches_known_value() {
        assert_eq!(sha256_hex("password"), PASSWORD_HASH);
    }

    #[test]
    fn wrong_password_stays_unauthenticated() {
        let mut auth = AdminAuth::new(PASSWORD_HASH);
        let outcome = auth.login("hunter2");
        assert_eq!(
            outcome,
            LoginOutcome::Rejected {
                message: PASSWORD_MISMATCH
            }
        );
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn session_token_gates_until_logout() {
        let mut auth = AdminAuth::new(PASSWORD_HASH);
        let token = match auth.login("password") {
            LoginOutcome::Accepted { token } => token,
            other => panic!("unexpected: {:?}", other),
        };
        assert!(auth.check_token(&token).is_ok());
        assert!(auth.check_token("other").is_err());
        auth.logout();
        assert!(auth.check_token(&token).is_err());
    }
}
