//! Favorites and tags service implementation.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::debug;

use crate::catalog::{package_key, PackageType};
use crate::events::ChangeHub;
use crate::store::{PackageStore, StoreError};

/// Errors for user metadata operations.
#[derive(Debug, Error)]
pub enum UserDataError {
    /// Rename target already exists as a distinct tag.
    #[error("tag already exists: {0}")]
    DuplicateTag(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Point-in-time copy of the metadata maps for the query engine.
#[derive(Debug, Clone, Default)]
pub struct MetadataSnapshot {
    /// "type:id" keys of favorited packages.
    pub favorites: HashSet<String>,
    /// "type:id" key to that package's tag set.
    pub tags: HashMap<String, BTreeSet<String>>,
}

#[derive(Default)]
struct UserDataState {
    favorites: HashSet<String>,
    tags: HashMap<String, BTreeSet<String>>,
    all_tags: BTreeSet<String>,
}

impl UserDataState {
    fn rebuild(store: &dyn PackageStore) -> Result<Self, StoreError> {
        let mut state = Self::default();

        for favorite in store.list_favorites()? {
            state
                .favorites
                .insert(package_key(&favorite.package_id, favorite.package_type));
        }

        for row in store.list_tags()? {
            let key = package_key(&row.package_id, row.package_type);
            state.all_tags.insert(row.tag.clone());
            state.tags.entry(key).or_default().insert(row.tag);
        }

        Ok(state)
    }
}

/// Favorites and tags service backed by the local store.
pub struct UserDataStore {
    store: Arc<dyn PackageStore>,
    hub: ChangeHub,
    // One lock serializes all mutations (single-writer semantics).
    state: Mutex<UserDataState>,
}

impl UserDataStore {
    /// Build the in-memory mirrors from the durable tables.
    pub fn load(store: Arc<dyn PackageStore>, hub: ChangeHub) -> Result<Self, UserDataError> {
        let state = UserDataState::rebuild(store.as_ref())?;
        debug!(
            "Loaded user metadata: {} favorites, {} tagged packages, {} tags",
            state.favorites.len(),
            state.tags.len(),
            state.all_tags.len()
        );
        Ok(Self {
            store,
            hub,
            state: Mutex::new(state),
        })
    }

    pub fn is_favorite(&self, package_id: &str, package_type: PackageType) -> bool {
        let state = self.state.lock().unwrap();
        state
            .favorites
            .contains(&package_key(package_id, package_type))
    }

    /// Flip the favorite state of a package.
    ///
    /// Returns the new state: true if the package is now a favorite.
    pub fn toggle_favorite(
        &self,
        package_id: &str,
        package_type: PackageType,
    ) -> Result<bool, UserDataError> {
        let mut state = self.state.lock().unwrap();
        let key = package_key(package_id, package_type);

        let favorited = if state.favorites.contains(&key) {
            self.store.delete_favorite(package_id, package_type)?;
            state.favorites.remove(&key);
            false
        } else {
            self.store.insert_favorite(package_id, package_type)?;
            state.favorites.insert(key);
            true
        };
        drop(state);

        self.hub
            .notify_favorite_changed(package_id, package_type, favorited);
        Ok(favorited)
    }

    /// Tags on one package, sorted.
    pub fn get_tags(&self, package_id: &str, package_type: PackageType) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .tags
            .get(&package_key(package_id, package_type))
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Attach a tag to a package; no-op if already present.
    pub fn add_tag(
        &self,
        package_id: &str,
        package_type: PackageType,
        tag: &str,
    ) -> Result<(), UserDataError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(());
        }

        let mut state = self.state.lock().unwrap();
        let key = package_key(package_id, package_type);
        if state.tags.get(&key).is_some_and(|set| set.contains(tag)) {
            return Ok(());
        }

        self.store.insert_tag(package_id, package_type, tag)?;
        state.tags.entry(key).or_default().insert(tag.to_string());
        state.all_tags.insert(tag.to_string());
        drop(state);

        self.hub.notify_tags_changed();
        Ok(())
    }

    /// Detach a tag from a package.
    ///
    /// The tag disappears from the global set once no package carries it.
    pub fn remove_tag(
        &self,
        package_id: &str,
        package_type: PackageType,
        tag: &str,
    ) -> Result<(), UserDataError> {
        let mut state = self.state.lock().unwrap();
        let key = package_key(package_id, package_type);

        self.store.delete_tag(package_id, package_type, tag)?;

        if let Some(set) = state.tags.get_mut(&key) {
            set.remove(tag);
            if set.is_empty() {
                state.tags.remove(&key);
            }
        }

        let remaining = self.store.count_rows_with_tag(tag)?;
        if remaining == 0 {
            state.all_tags.remove(tag);
        }
        drop(state);

        self.hub.notify_tags_changed();
        Ok(())
    }

    /// Rename a tag everywhere it is used, all-or-nothing.
    ///
    /// Returns the number of rows rewritten.
    pub fn rename_tag(&self, old: &str, new: &str) -> Result<u64, UserDataError> {
        let new = new.trim();
        if new.is_empty() || new == old {
            return Ok(0);
        }

        let mut state = self.state.lock().unwrap();
        if state.all_tags.contains(new) {
            return Err(UserDataError::DuplicateTag(new.to_string()));
        }

        let renamed = self.store.rename_tag_rows(old, new)?;
        if renamed > 0 {
            for set in state.tags.values_mut() {
                if set.remove(old) {
                    set.insert(new.to_string());
                }
            }
            state.all_tags.remove(old);
            state.all_tags.insert(new.to_string());
            drop(state);
            self.hub.notify_tags_changed();
        }

        Ok(renamed)
    }

    /// Delete a tag everywhere it is used.
    ///
    /// Returns the number of rows removed.
    pub fn delete_tag(&self, tag: &str) -> Result<u64, UserDataError> {
        let mut state = self.state.lock().unwrap();
        let deleted = self.store.delete_tag_rows(tag)?;

        state.tags.retain(|_, set| {
            set.remove(tag);
            !set.is_empty()
        });
        state.all_tags.remove(tag);
        drop(state);

        if deleted > 0 {
            self.hub.notify_tags_changed();
        }
        Ok(deleted)
    }

    /// Whether at least one package carries this tag.
    pub fn tag_exists(&self, tag: &str) -> bool {
        let state = self.state.lock().unwrap();
        state.all_tags.contains(tag)
    }

    /// All known tags, sorted.
    pub fn list_all_tags(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.all_tags.iter().cloned().collect()
    }

    /// Every package carrying this exact tag; empty for unknown tags.
    pub fn get_items_with_tag(&self, tag: &str) -> Vec<(String, PackageType)> {
        let state = self.state.lock().unwrap();
        let mut items = Vec::new();
        for (key, set) in &state.tags {
            if set.contains(tag) {
                if let Some((type_str, id)) = key.split_once(':') {
                    if let Some(package_type) = PackageType::parse(type_str) {
                        items.push((id.to_string(), package_type));
                    }
                }
            }
        }
        items.sort();
        items
    }

    /// Copy of the maps the query engine filters against.
    pub fn snapshot(&self) -> MetadataSnapshot {
        let state = self.state.lock().unwrap();
        MetadataSnapshot {
            favorites: state.favorites.clone(),
            tags: state.tags.clone(),
        }
    }
}
