use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EquipmentLine, LivestockLine};

/// Identifier given to the draft build before it is ever shared.
pub const DRAFT_BUILD_ID: &str = "build-draft";
pub const DEFAULT_TITLE: &str = "My Aquarium Build";
pub const DEFAULT_AUTHOR: &str = "CurrentUser";

/// The aquarium a user is putting together.
///
/// There is one build per session. Item ids are unique within each of
/// `equipment`, `fish` and `plants`; the session enforces this on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AquariumBuild {
    pub id: String,
    pub title: String,
    /// Rich-text description as an HTML fragment. Not sanitized.
    pub description: String,
    pub equipment: Vec<EquipmentLine>,
    pub fish: Vec<LivestockLine>,
    pub plants: Vec<LivestockLine>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub author: String,
    /// Photo URLs, usually `data:` URLs produced by an upload.
    pub photos: Vec<String>,
}

impl AquariumBuild {
    /// An empty draft created now by `author`.
    pub fn draft(author: impl Into<String>) -> Self {
        Self {
            id: DRAFT_BUILD_ID.to_string(),
            title: DEFAULT_TITLE.to_string(),
            description: String::new(),
            equipment: Vec::new(),
            fish: Vec::new(),
            plants: Vec::new(),
            is_public: false,
            created_at: Utc::now(),
            author: author.into(),
            photos: Vec::new(),
        }
    }

    /// Shallow-merge `input` into the build. Fields left as `None` are kept.
    pub fn apply(&mut self, input: UpdateBuildInput) {
        let UpdateBuildInput {
            id,
            title,
            description,
            equipment,
            fish,
            plants,
            is_public,
            created_at,
            author,
            photos,
        } = input;

        if let Some(id) = id {
            self.id = id;
        }
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(equipment) = equipment {
            self.equipment = equipment;
        }
        if let Some(fish) = fish {
            self.fish = fish;
        }
        if let Some(plants) = plants {
            self.plants = plants;
        }
        if let Some(is_public) = is_public {
            self.is_public = is_public;
        }
        if let Some(created_at) = created_at {
            self.created_at = created_at;
        }
        if let Some(author) = author {
            self.author = author;
        }
        if let Some(photos) = photos {
            self.photos = photos;
        }
    }
}

impl Default for AquariumBuild {
    fn default() -> Self {
        Self::draft(DEFAULT_AUTHOR)
    }
}

/// Input for updating the build. All fields are optional for partial updates.
///
/// No validation is applied; list fields replace the existing list wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBuildInput {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub equipment: Option<Vec<EquipmentLine>>,
    pub fish: Option<Vec<LivestockLine>>,
    pub plants: Option<Vec<LivestockLine>>,
    pub is_public: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub photos: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_only_touches_given_fields() {
        let mut build = AquariumBuild::default();
        build.photos.push("data:image/png;base64,AA==".to_string());

        build.apply(UpdateBuildInput {
            title: Some("Nano Scape".to_string()),
            is_public: Some(true),
            ..Default::default()
        });

        assert_eq!(build.title, "Nano Scape");
        assert!(build.is_public);
        assert_eq!(build.id, DRAFT_BUILD_ID);
        assert_eq!(build.photos.len(), 1);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(AquariumBuild::default()).unwrap();
        assert_eq!(value["isPublic"], false);
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["photos"], serde_json::json!([]));
    }
}
