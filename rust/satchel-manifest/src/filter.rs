use satchel_auth::Identity;
use serde_json::{Map, Value};

use crate::{Manifest, document::RESTRICTIONS};

impl Manifest {
    /// Produce the view of this manifest a caller is entitled to see.
    ///
    /// The filter edits a copy of the document in place, so every field it
    /// does not own keeps both its value and its position; `self` is never
    /// mutated, and callers may retain the unfiltered original. Per entry:
    ///
    /// - No `extra`, or no restriction field in it: the entry is kept
    ///   unchanged.
    /// - Restriction field present and the identity absent: the entry is
    ///   dropped. Anonymous callers never see restricted entries, however
    ///   the restriction reads.
    /// - Restriction field present and the identity's permissions do not
    ///   satisfy it: the entry is dropped.
    /// - Otherwise the entry is kept with the restriction field stripped,
    ///   and with `extra` removed entirely if stripping left it empty.
    ///
    /// A package whose entries were all dropped loses its key. The transform
    /// is idempotent: surviving entries carry no restriction field, so a
    /// second pass keeps everything.
    pub fn filtered(&self, identity: Option<&Identity>) -> Manifest {
        let mut document = self.document.clone();

        if let Some(Value::Object(packages)) = document.get_mut("packages") {
            for versions in packages.values_mut() {
                if let Value::Array(entries) = versions {
                    entries.retain_mut(|entry| visible_entry(entry, identity));
                }
            }

            packages.retain(|_, versions| {
                !matches!(versions, Value::Array(entries) if entries.is_empty())
            });
        }

        Manifest { document }
    }
}

/// The per-entry decision: `false` drops the entry, `true` keeps it, with
/// the restriction field stripped in place when one was present.
fn visible_entry(entry: &mut Value, identity: Option<&Identity>) -> bool {
    let Some(fields) = entry.as_object_mut() else {
        return true;
    };

    let Some(required) = restriction_of(fields) else {
        return true;
    };

    let Some(identity) = identity else {
        return false;
    };

    if !identity.permissions.grants(&required) {
        return false;
    }

    strip_restriction(fields);

    true
}

/// The restriction tokens of an entry, when it carries any.
fn restriction_of(fields: &Map<String, Value>) -> Option<Vec<&str>> {
    let tokens = fields.get("extra")?.get(RESTRICTIONS)?.as_array()?;

    Some(tokens.iter().filter_map(Value::as_str).collect())
}

/// Remove the restriction field, and `extra` itself once nothing else is
/// left in it.
fn strip_restriction(fields: &mut Map<String, Value>) {
    // `Map::remove` is a swap_remove on the order-preserving map;
    // `shift_remove` keeps the surviving siblings in document order.
    let exhausted = match fields.get_mut("extra") {
        Some(Value::Object(extra)) => {
            extra.shift_remove(RESTRICTIONS);
            extra.is_empty()
        }
        _ => false,
    };

    if exhausted {
        fields.shift_remove("extra");
    }
}
