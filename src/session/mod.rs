//! Build state management.
//!
//! A [`BuildSession`] exclusively owns the active [`AquariumBuild`] and is the
//! only thing that mutates it. Every mutation is followed by a full write of
//! the aggregate to the `currentBuild` slot, so the stored copy never lags
//! behind memory.
//!
//! # Add semantics
//!
//! Equipment and livestock deliberately differ:
//!
//! - Adding equipment whose id is already in the build does nothing. The
//!   quantity chosen on first add stands.
//! - Adding fish or plants whose id is already present adds the new quantity
//!   to the existing line.

mod error;
mod restore;
mod scope;

pub use error::{Result, SessionError};
pub use restore::{merge_over_default, restore};
pub use scope::SessionScope;

use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::models::*;

/// Slot the serialized build is written to.
pub const BUILD_SLOT_KEY: &str = "currentBuild";

pub struct BuildSession {
    db: Database,
    build: AquariumBuild,
    /// Canonical default record; reset returns to exactly this value.
    defaults: AquariumBuild,
    comments: Vec<Comment>,
}

impl BuildSession {
    /// Load the build from storage, repairing it against `defaults`.
    pub fn load(db: Database, defaults: AquariumBuild) -> Result<Self> {
        let stored = db.get_slot(BUILD_SLOT_KEY)?;
        let build = restore(&defaults, stored.as_deref());
        tracing::info!(
            build_id = %build.id,
            restored = stored.is_some(),
            "Build session loaded"
        );

        Ok(Self {
            db,
            build,
            defaults,
            comments: Vec::new(),
        })
    }

    /// Seed the comment thread shown on the listing page.
    pub fn with_comments(mut self, comments: impl IntoIterator<Item = Comment>) -> Self {
        self.comments.extend(comments);
        self
    }

    pub fn build(&self) -> &AquariumBuild {
        &self.build
    }

    pub fn default_build(&self) -> &AquariumBuild {
        &self.defaults
    }

    // ============================================================
    // Mutations
    // ============================================================

    pub fn update_build(&mut self, input: UpdateBuildInput) -> Result<()> {
        self.build.apply(input);
        self.persist()
    }

    /// Add equipment unless a line with the same id exists.
    pub fn add_equipment(&mut self, item: &Equipment, quantity: u32) -> Result<()> {
        if self.has_equipment(&item.id) {
            tracing::debug!(id = %item.id, "Equipment already in build");
        } else {
            self.build
                .equipment
                .push(LineItem::new(item.clone(), quantity));
        }
        self.persist()
    }

    pub fn remove_equipment(&mut self, id: &str) -> Result<()> {
        remove_line(&mut self.build.equipment, id);
        self.persist()
    }

    pub fn add_fish(&mut self, item: &Livestock, quantity: u32) -> Result<()> {
        accumulate(&mut self.build.fish, item, quantity);
        self.persist()
    }

    pub fn remove_fish(&mut self, id: &str) -> Result<()> {
        remove_line(&mut self.build.fish, id);
        self.persist()
    }

    pub fn add_plant(&mut self, item: &Livestock, quantity: u32) -> Result<()> {
        accumulate(&mut self.build.plants, item, quantity);
        self.persist()
    }

    pub fn remove_plant(&mut self, id: &str) -> Result<()> {
        remove_line(&mut self.build.plants, id);
        self.persist()
    }

    /// Add to the fish or plant list depending on the item's kind.
    pub fn add_livestock(&mut self, item: &Livestock, quantity: u32) -> Result<()> {
        match item.kind {
            LivestockKind::Fish => self.add_fish(item, quantity),
            LivestockKind::Plant => self.add_plant(item, quantity),
        }
    }

    pub fn remove_livestock(&mut self, item: &Livestock) -> Result<()> {
        match item.kind {
            LivestockKind::Fish => self.remove_fish(&item.id),
            LivestockKind::Plant => self.remove_plant(&item.id),
        }
    }

    pub fn add_photo(&mut self, url: String) -> Result<()> {
        self.build.photos.push(url);
        self.persist()
    }

    /// Remove the photo at `index`; out-of-range indexes change nothing.
    pub fn remove_photo(&mut self, index: usize) -> Result<()> {
        if index < self.build.photos.len() {
            self.build.photos.remove(index);
        }
        self.persist()
    }

    /// Flip public/private and return the new visibility.
    pub fn toggle_visibility(&mut self) -> Result<bool> {
        self.build.is_public = !self.build.is_public;
        self.persist()?;
        Ok(self.build.is_public)
    }

    /// Back to the default build, with nothing left in storage.
    pub fn reset_build(&mut self) -> Result<()> {
        self.build = self.defaults.clone();
        self.db.delete_slot(BUILD_SLOT_KEY)?;
        tracing::info!("Build reset to defaults");
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.build)?;
        self.db.put_slot(BUILD_SLOT_KEY, &json)?;
        Ok(())
    }

    // ============================================================
    // Queries
    // ============================================================

    pub fn has_equipment(&self, id: &str) -> bool {
        self.build.equipment.iter().any(|l| l.id() == id)
    }

    pub fn has_livestock(&self, item: &Livestock) -> bool {
        let lines = match item.kind {
            LivestockKind::Fish => &self.build.fish,
            LivestockKind::Plant => &self.build.plants,
        };
        lines.iter().any(|l| l.id() == item.id)
    }

    /// Link to the listing. Private builds have none.
    pub fn share_url(&self, base: &str) -> Option<String> {
        self.build
            .is_public
            .then(|| format!("{}/{}", base.trim_end_matches('/'), self.build.id))
    }

    // ============================================================
    // Comments (never persisted)
    // ============================================================

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Append a comment. Blank content is ignored and yields `None`.
    pub fn post_comment(&mut self, input: CreateCommentInput) -> Option<Comment> {
        if input.content.trim().is_empty() {
            return None;
        }

        let comment = Comment {
            id: format!("comment-{}", Uuid::new_v4().simple()),
            build_id: self.build.id.clone(),
            author: input.author.unwrap_or_else(|| self.build.author.clone()),
            content: input.content,
            created_at: Utc::now(),
        };
        self.comments.push(comment.clone());
        Some(comment)
    }
}

fn accumulate(lines: &mut Vec<LivestockLine>, item: &Livestock, quantity: u32) {
    match lines.iter_mut().find(|l| l.id() == item.id) {
        Some(line) => line.quantity = line.quantity.saturating_add(quantity),
        None => lines.push(LineItem::new(item.clone(), quantity)),
    }
}

fn remove_line<T: CatalogItem>(lines: &mut Vec<LineItem<T>>, id: &str) {
    lines.retain(|l| l.id() != id);
}
