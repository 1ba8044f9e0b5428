//! Favourite locations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Namespace, StoreError};

const FAVORITES_KEY: &str = "favorites";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteLocation {
    pub code: String,
    pub name: String,
    pub country: String,
    pub added_at: DateTime<Utc>,
}

/// Payload for [`Favorites::add`]; the timestamp is stamped on insert.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFavorite {
    pub code: String,
    pub name: String,
    pub country: String,
}

#[derive(Clone)]
pub struct Favorites {
    store: Namespace,
}

impl Favorites {
    pub fn new(store: Namespace) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<FavoriteLocation>, StoreError> {
        self.store.load_or_default(FAVORITES_KEY)
    }

    /// Append unless a favourite with the same code exists. Returns whether
    /// anything was added.
    pub fn add(&self, location: NewFavorite, now: DateTime<Utc>) -> Result<bool, StoreError> {
        self.store
            .update(FAVORITES_KEY, |favorites: &mut Vec<FavoriteLocation>| {
                if favorites.iter().any(|f| f.code == location.code) {
                    return false;
                }
                favorites.push(FavoriteLocation {
                    code: location.code,
                    name: location.name,
                    country: location.country,
                    added_at: now,
                });
                true
            })
    }

    pub fn remove(&self, code: &str) -> Result<(), StoreError> {
        self.store
            .update(FAVORITES_KEY, |favorites: &mut Vec<FavoriteLocation>| {
                favorites.retain(|f| f.code != code)
            })
    }

    pub fn is_favorite(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.list()?.iter().any(|f| f.code == code))
    }
}
