use std::sync::Arc;

use super::{AuthError, Identity, PasswordEncoder};
use crate::database::models::Employee;
use crate::database::EmployeeRepository;

/// Checks a username/password pair against stored employee accounts.
///
/// Checks run in a fixed order: account exists, password matches, account is
/// enabled. A disabled account with a wrong password is reported as a plain
/// mismatch so the enabled flag is only revealed to someone who knows the
/// password.
pub struct CredentialVerifier {
    accounts: Arc<dyn EmployeeRepository>,
    encoder: Arc<dyn PasswordEncoder>,
    // Hashed on unknown usernames so both failure paths cost the same
    decoy_digest: Option<String>,
}

impl CredentialVerifier {
    pub fn new(accounts: Arc<dyn EmployeeRepository>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        let decoy_digest = encoder.encode("decoy-password").ok();
        Self {
            accounts,
            encoder,
            decoy_digest,
        }
    }

    pub async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(Identity, Employee), AuthError> {
        let Some(mut employee) = self.accounts.find_by_username(username).await? else {
            if let Some(decoy) = &self.decoy_digest {
                let _ = self.encoder.matches(password, decoy);
            }
            return Err(AuthError::AccountNotFound);
        };

        if !self.encoder.matches(password, &employee.password) {
            return Err(AuthError::PasswordMismatch);
        }

        if !employee.is_enabled() {
            return Err(AuthError::AccountDisabled);
        }

        employee.password.clear();
        Ok((Identity::new(employee.id), employee))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Argon2PasswordEncoder;
    use crate::database::memory::MemoryStore;
    use crate::database::models::{STATUS_DISABLED, STATUS_ENABLED};

    async fn fixture() -> (CredentialVerifier, i64, i64) {
        let encoder: Arc<dyn PasswordEncoder> =
            Arc::new(Argon2PasswordEncoder::with_params(1024, 1, 1).unwrap());
        let store = Arc::new(MemoryStore::new());
        let digest = encoder.encode("123456").unwrap();
        let admin = store
            .seed_employee("admin", "Administrator", &digest, STATUS_ENABLED)
            .await
            .unwrap();
        let frozen = store
            .seed_employee("frozen", "Frozen Clerk", &digest, STATUS_DISABLED)
            .await
            .unwrap();
        (CredentialVerifier::new(store, encoder), admin.id, frozen.id)
    }

    #[tokio::test]
    async fn accepts_valid_credentials() {
        let (verifier, admin_id, _) = fixture().await;
        let (identity, employee) = verifier.verify("admin", "123456").await.unwrap();

        assert_eq!(identity, Identity::new(admin_id));
        assert_eq!(employee.username, "admin");
        assert!(employee.password.is_empty());
    }

    #[tokio::test]
    async fn unknown_username() {
        let (verifier, _, _) = fixture().await;
        let err = verifier.verify("nobody", "123456").await.unwrap_err();
        assert!(matches!(err, AuthError::AccountNotFound));
    }

    #[tokio::test]
    async fn username_lookup_is_exact() {
        let (verifier, _, _) = fixture().await;
        for username in ["Admin", "admin "] {
            let result = verifier.verify(username, "123456").await;
            assert!(matches!(result, Err(AuthError::AccountNotFound)), "{:?}", username);
        }
    }

    #[tokio::test]
    async fn wrong_password() {
        let (verifier, _, _) = fixture().await;
        let err = verifier.verify("admin", "654321").await.unwrap_err();
        assert!(matches!(err, AuthError::PasswordMismatch));
    }

    #[tokio::test]
    async fn disabled_account_with_correct_password() {
        let (verifier, _, _) = fixture().await;
        let err = verifier.verify("frozen", "123456").await.unwrap_err();
        assert!(matches!(err, AuthError::AccountDisabled));
    }

    #[tokio::test]
    async fn disabled_account_with_wrong_password_is_a_mismatch() {
        let (verifier, _, _) = fixture().await;
        let err = verifier.verify("frozen", "nope").await.unwrap_err();
        assert!(matches!(err, AuthError::PasswordMismatch));
    }
}
