use serde::Serialize;
use serde_json::{Map, Value};

use crate::ManifestError;

/// The one `extra` field this system owns.
pub(crate) const RESTRICTIONS: &str = "satchel-restrictions";

/// A Composer-style package index document.
///
/// The document is held as parsed JSON rather than as a typed model: the
/// filter owns only the `packages` mapping and the restriction field inside
/// entry `extra` records, and everything else must come back out of
/// [Manifest::to_vec_pretty] with its meaning and key order intact. Parsing
/// validates the owned shape up front: `packages` must be a mapping from
/// package name to an array of entry records, and a restriction field must
/// be an array of strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    pub(crate) document: Map<String, Value>,
}

impl Manifest {
    /// Parse a manifest from its stored bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ManifestError> {
        let document: Map<String, Value> = serde_json::from_slice(bytes)
            .map_err(|error| ManifestError::ParseFailed(format!("{error}")))?;

        validate(&document)?;

        Ok(Self { document })
    }

    /// Serialize pretty-printed, the way manifests are served.
    pub fn to_vec_pretty(&self) -> Result<Vec<u8>, ManifestError> {
        serde_json::to_vec_pretty(&self.document)
            .map_err(|error| ManifestError::SerializeFailed(format!("{error}")))
    }
}

/// Check the parts of the document the filter acts on; everything else is
/// opaque and cannot fail.
fn validate(document: &Map<String, Value>) -> Result<(), ManifestError> {
    let Some(packages) = document.get("packages") else {
        return Err(ManifestError::ParseFailed(
            "missing the `packages` mapping".into(),
        ));
    };
    let Some(packages) = packages.as_object() else {
        return Err(ManifestError::ParseFailed(
            "`packages` is not a mapping".into(),
        ));
    };

    for (name, versions) in packages {
        let Some(entries) = versions.as_array() else {
            return Err(ManifestError::ParseFailed(format!(
                "package `{name}` is not a sequence of versions"
            )));
        };

        for entry in entries {
            validate_entry(name, entry)?;
        }
    }

    Ok(())
}

fn validate_entry(name: &str, entry: &Value) -> Result<(), ManifestError> {
    let Some(entry) = entry.as_object() else {
        return Err(ManifestError::ParseFailed(format!(
            "package `{name}` holds a non-record version entry"
        )));
    };

    let Some(extra) = entry.get("extra") else {
        return Ok(());
    };
    let Some(extra) = extra.as_object() else {
        return Err(ManifestError::ParseFailed(format!(
            "package `{name}` holds an entry whose `extra` is not a record"
        )));
    };

    match extra.get(RESTRICTIONS) {
        None => Ok(()),
        Some(Value::Array(tokens)) if tokens.iter().all(Value::is_string) => Ok(()),
        Some(_) => Err(ManifestError::ParseFailed(format!(
            "package `{name}` holds a restriction field that is not an array of strings"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn it_parses_a_restricted_document() -> anyhow::Result<()> {
        let document = json!({
            "packages": {
                "acme/widget": [
                    {
                        "version": "1.0.0",
                        "extra": {
                            "branch-alias": { "dev-main": "1.x-dev" },
                            "satchel-restrictions": ["beta", "qa-*"]
                        }
                    }
                ]
            }
        });

        let manifest = Manifest::from_slice(document.to_string().as_bytes())?;

        assert_eq!(serde_json::to_value(&manifest)?, document);

        Ok(())
    }

    #[test]
    fn it_requires_the_packages_mapping() {
        assert!(Manifest::from_slice(br#"{"metadata-url": "/p2/%package%.json"}"#).is_err());
        assert!(Manifest::from_slice(br#"{"packages": []}"#).is_err());
    }

    #[test]
    fn it_rejects_a_non_record_version_entry() {
        let result = Manifest::from_slice(br#"{"packages": {"acme/widget": ["1.0.0"]}}"#);

        assert!(result.is_err());
    }

    #[test]
    fn it_rejects_a_non_array_restriction_field() {
        let result = Manifest::from_slice(
            br#"{
                "packages": {
                    "acme/widget": [
                        { "extra": { "satchel-restrictions": "beta" } }
                    ]
                }
            }"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn it_rejects_non_string_restriction_tokens() {
        let result = Manifest::from_slice(
            br#"{
                "packages": {
                    "acme/widget": [
                        { "extra": { "satchel-restrictions": ["beta", 1] } }
                    ]
                }
            }"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn it_preserves_unmodeled_fields_through_a_round_trip() -> anyhow::Result<()> {
        let document = json!({
            "packages": {
                "acme/widget": [
                    { "version": "1.0.0", "dist": { "type": "zip", "url": "/dist/w.zip" } }
                ]
            },
            "minified": "composer/2.0"
        });

        let manifest = Manifest::from_slice(document.to_string().as_bytes())?;

        assert_eq!(serde_json::to_value(&manifest)?, document);

        Ok(())
    }

    #[test]
    fn it_keeps_top_level_keys_in_document_order() -> anyhow::Result<()> {
        let manifest = Manifest::from_slice(
            br#"{"minified": "composer/2.0", "packages": {}, "security-advisories": {}}"#,
        )?;

        let served: Value = serde_json::from_slice(&manifest.to_vec_pretty()?)?;
        let keys = served
            .as_object()
            .expect("the document is a record")
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>();

        assert_eq!(keys, ["minified", "packages", "security-advisories"]);

        Ok(())
    }
}
