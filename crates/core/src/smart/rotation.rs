//! Paging through the best-ranked amenities for "show me something else".
//!
//! The selector keeps no state: callers hold the rotation index, increment it
//! to advance and reset it to zero to start over.

use serde::{Deserialize, Serialize};

use super::scoring::ScoredAmenity;

pub const DEFAULT_PAGE_SIZE: usize = 7;
pub const DEFAULT_POOL_PAGES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSettings {
    pub page_size: usize,
    pub pool_pages: usize,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE, pool_pages: DEFAULT_POOL_PAGES }
    }
}

impl RotationSettings {
    pub fn pool_size(&self) -> usize {
        self.page_size.saturating_mul(self.pool_pages)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationItem {
    #[serde(flatten)]
    pub scored: ScoredAmenity,
    pub hero: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationPage {
    pub rotation_index: usize,
    pub items: Vec<RotationItem>,
}

impl RotationPage {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn hero(&self) -> Option<&RotationItem> {
        self.items.first()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.scored.amenity.id.as_str()).collect()
    }
}

/// Build one page from an already ranked list (best first).
///
/// The pool is the top `pool_size` entries. A page starts at
/// `rotation_index × page_size` and wraps to the start of the pool when it
/// runs past the end; an offset beyond the pool restarts at the first page.
/// Every page of a non-empty pool holds `min(page_size, pool.len())` items.
pub fn page_from_ranked(
    mut ranked: Vec<ScoredAmenity>,
    rotation_index: usize,
    settings: RotationSettings,
) -> RotationPage {
    ranked.truncate(settings.pool_size());
    let pool = ranked;

    let offset = rotation_index.saturating_mul(settings.page_size);
    let start = if offset < pool.len() { offset } else { 0 };
    let length = settings.page_size.min(pool.len());

    let items: Vec<RotationItem> = pool
        .iter()
        .cycle()
        .skip(start)
        .take(length)
        .enumerate()
        .map(|(position, scored)| RotationItem { scored: scored.clone(), hero: position == 0 })
        .collect();

    tracing::debug!(
        event_name = "smart.rotation.page_built",
        rotation_index,
        pool_size = pool.len(),
        start,
        page_size = items.len(),
        "built rotation page"
    );

    RotationPage { rotation_index, items }
}
