use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::{AuthError, CredentialRecord, Credentials, Identity};

/// How stored secrets are interpreted by [verify].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SecretPolicy {
    /// Stored secrets are the passwords themselves.
    #[default]
    Plaintext,

    /// Stored secrets are SHA-256 digests of the passwords, rendered as
    /// lowercase hexadecimal.
    Hashed,
}

/// Compared against when no record exists, so that rejecting an unknown name
/// costs the same as rejecting a wrong secret.
const PLACEHOLDER_SECRET: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Verify a presented credential pair against a stored record.
///
/// Returns the [Identity] the record grants, or
/// [AuthError::InvalidCredentials]. The rejection is opaque: an absent
/// record, an empty name or secret, and a wrong secret all produce the same
/// result, and the comparison work is performed even when the record is
/// absent (against a placeholder), so the cases are not separable by timing
/// either.
///
/// The comparison itself is length-checked and constant-time: unequal
/// lengths short-circuit without touching the bytes (leaking length, never
/// content), equal lengths compare in time independent of where a mismatch
/// sits. Under [SecretPolicy::Hashed] the presented secret is digested
/// first, which also fixes the compared lengths.
pub fn verify(
    credentials: &Credentials,
    record: Option<&CredentialRecord>,
    policy: SecretPolicy,
) -> Result<Identity, AuthError> {
    if credentials.name.is_empty() || credentials.secret.is_empty() {
        return Err(AuthError::InvalidCredentials);
    }

    let presented = match policy {
        SecretPolicy::Plaintext => credentials.secret.clone(),
        SecretPolicy::Hashed => sha256_hex(&credentials.secret),
    };

    let stored = match record {
        Some(record) => record.secret(),
        None => PLACEHOLDER_SECRET,
    };

    let matched = bool::from(presented.as_bytes().ct_eq(stored.as_bytes()));
    let record = record.ok_or(AuthError::InvalidCredentials)?;

    if matched {
        Ok(Identity::new(
            credentials.name.clone(),
            record.permissions().clone(),
        ))
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

/// SHA-256 of `input`, rendered as lowercase hexadecimal.
fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PermissionSet;

    const S3CR3T_SHA256: &str =
        "4e738ca5563c06cfd0018299933d58db1dd8bf97f6973dc99bf6cdc64b5550bd";

    fn record(secret: &str) -> CredentialRecord {
        CredentialRecord::new(secret, PermissionSet::from_csv("read,write"))
    }

    #[test]
    fn it_verifies_a_plaintext_secret() -> anyhow::Result<()> {
        let identity = verify(
            &Credentials::new("alice", "s3cr3t"),
            Some(&record("s3cr3t")),
            SecretPolicy::Plaintext,
        )?;

        assert_eq!(identity.name, "alice");
        assert!(identity.permissions.grants(&["write"]));

        Ok(())
    }

    #[test]
    fn it_verifies_a_hashed_secret() -> anyhow::Result<()> {
        let identity = verify(
            &Credentials::new("alice", "s3cr3t"),
            Some(&record(S3CR3T_SHA256)),
            SecretPolicy::Hashed,
        )?;

        assert_eq!(identity.name, "alice");

        Ok(())
    }

    #[test]
    fn it_rejects_a_wrong_secret() {
        let result = verify(
            &Credentials::new("alice", "guess"),
            Some(&record("s3cr3t")),
            SecretPolicy::Plaintext,
        );

        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn it_rejects_an_absent_record() {
        let result = verify(
            &Credentials::new("mallory", "s3cr3t"),
            None,
            SecretPolicy::Plaintext,
        );

        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn it_rejects_an_empty_name() {
        let result = verify(
            &Credentials::new("", "s3cr3t"),
            Some(&record("s3cr3t")),
            SecretPolicy::Plaintext,
        );

        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn it_rejects_an_empty_secret() {
        let result = verify(
            &Credentials::new("alice", ""),
            Some(&record("")),
            SecretPolicy::Plaintext,
        );

        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn it_respects_the_secret_policy() {
        // A hashed record must not verify when the policy says plaintext.
        let result = verify(
            &Credentials::new("alice", "s3cr3t"),
            Some(&record(S3CR3T_SHA256)),
            SecretPolicy::Plaintext,
        );

        assert_eq!(result, Err(AuthError::InvalidCredentials));

        // And a plaintext record must not verify when the policy says hashed.
        let result = verify(
            &Credentials::new("alice", "s3cr3t"),
            Some(&record("s3cr3t")),
            SecretPolicy::Hashed,
        );

        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn it_never_grants_the_placeholder_secret() {
        // Even presenting the placeholder text verbatim cannot turn an
        // unknown name into an identity.
        let result = verify(
            &Credentials::new("mallory", PLACEHOLDER_SECRET),
            None,
            SecretPolicy::Plaintext,
        );

        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }
}
