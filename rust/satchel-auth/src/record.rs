use crate::PermissionSet;

/// A stored credential record, keyed externally by identity name.
///
/// The stored wire form is a UTF-8 text blob: the first line is the secret
/// (plaintext or a SHA-256 hex digest, depending on the verifier's
/// [SecretPolicy]), the second line is the comma-separated permission list.
///
/// ```text
/// s3cr3t
/// read,write
/// ```
///
/// [SecretPolicy]: crate::SecretPolicy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    secret: String,
    permissions: PermissionSet,
}

impl CredentialRecord {
    /// Construct a record directly, for seeding stores.
    pub fn new(secret: impl Into<String>, permissions: PermissionSet) -> Self {
        Self {
            secret: secret.into(),
            permissions,
        }
    }

    /// Parse the stored two-line form.
    ///
    /// A record with no second line has the empty permission set; lines
    /// beyond the second are ignored. There is no invalid text: a blob that
    /// is none of the expected shape simply produces a secret nobody can
    /// present.
    pub fn parse(text: &str) -> Self {
        let mut lines = text.split('\n');
        let secret = lines.next().unwrap_or_default();
        let permissions = lines.next().unwrap_or_default();

        Self {
            secret: secret.to_owned(),
            permissions: PermissionSet::from_csv(permissions),
        }
    }

    /// The stored secret, verbatim.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The permissions this record grants.
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Render the stored two-line form.
    pub fn to_text(&self) -> String {
        let permissions = self
            .permissions
            .iter()
            .collect::<Vec<_>>()
            .join(",");

        format!("{}\n{}", self.secret, permissions)
    }
}
