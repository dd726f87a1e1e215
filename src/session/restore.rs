//! Rebuilding the aggregate from whatever was last written to the slot.
//!
//! There is no schema version. A stored record is always recomposed over the
//! canonical default: every stored top-level field that still deserializes
//! replaces the default's value, anything missing, null, unknown or malformed
//! keeps the default. Adding a field to [`AquariumBuild`] therefore needs no
//! migration as long as it has a sensible default.

use serde_json::{Map, Value};

use crate::models::AquariumBuild;

/// Parse `stored` and merge it over `defaults`. Never fails.
pub fn restore(defaults: &AquariumBuild, stored: Option<&str>) -> AquariumBuild {
    let Some(text) = stored else {
        return defaults.clone();
    };

    match serde_json::from_str::<Value>(text) {
        Ok(value) => merge_over_default(defaults, &value),
        Err(e) => {
            tracing::warn!(error = %e, "Stored build is not valid JSON, using defaults");
            defaults.clone()
        }
    }
}

/// Shallow-merge the fields of `stored` over `defaults`.
pub fn merge_over_default(defaults: &AquariumBuild, stored: &Value) -> AquariumBuild {
    let Some(stored) = stored.as_object() else {
        tracing::warn!("Stored build is not a JSON object, using defaults");
        return defaults.clone();
    };

    let Ok(Value::Object(mut merged)) = serde_json::to_value(defaults) else {
        return defaults.clone();
    };

    for (key, value) in stored {
        if value.is_null() {
            continue;
        }
        if !merged.contains_key(key) {
            tracing::debug!(field = %key, "Ignoring unknown stored field");
            continue;
        }

        let mut candidate = merged.clone();
        candidate.insert(key.clone(), value.clone());
        if decode(candidate.clone()).is_some() {
            merged = candidate;
        } else {
            tracing::warn!(field = %key, "Discarding malformed stored field");
        }
    }

    decode(merged).unwrap_or_else(|| defaults.clone())
}

fn decode(fields: Map<String, Value>) -> Option<AquariumBuild> {
    serde_json::from_value(Value::Object(fields)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_slot_yields_defaults() {
        let defaults = AquariumBuild::default();
        assert_eq!(restore(&defaults, None), defaults);
    }

    #[test]
    fn unparsable_slot_yields_defaults() {
        let defaults = AquariumBuild::default();
        assert_eq!(restore(&defaults, Some("{not json")), defaults);
        assert_eq!(restore(&defaults, Some("[1, 2, 3]")), defaults);
    }

    #[test]
    fn older_shape_without_photos_gets_empty_photos() {
        let defaults = AquariumBuild::default();
        let stored = json!({
            "id": "build-draft",
            "title": "Old Tank",
            "description": "<p>hi</p>",
            "equipment": [],
            "fish": [],
            "plants": [],
            "isPublic": true,
            "createdAt": "2025-01-01T00:00:00Z",
            "author": "Someone"
        });

        let build = merge_over_default(&defaults, &stored);
        assert_eq!(build.title, "Old Tank");
        assert!(build.is_public);
        assert!(build.photos.is_empty());
        assert_eq!(build.created_at.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn null_and_malformed_fields_keep_defaults() {
        let defaults = AquariumBuild::default();
        let stored = json!({
            "title": 42,
            "photos": null,
            "author": "Reefer",
            "mood": "happy"
        });

        let build = merge_over_default(&defaults, &stored);
        assert_eq!(build.title, defaults.title);
        assert!(build.photos.is_empty());
        assert_eq!(build.author, "Reefer");
    }
}
