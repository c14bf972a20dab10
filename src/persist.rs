use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dataset::StatsTable;
use crate::season_metrics::{CATEGORIES, Category};
use crate::state::{AppState, TeamSlot};

const CACHE_DIR: &str = "seasonwise_terminal";
const CACHE_FILE: &str = "selections.json";
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CacheFile {
    version: u32,
    leagues: [Option<String>; 2],
    teams: [Option<String>; 2],
    category: String,
}

/// Restore the previous session's selections. Best-effort: a missing or
/// stale cache file leaves the defaults in place. Teams that no longer
/// appear in the loaded table under their saved league fall back to the
/// sentinel.
pub fn load_into_state(state: &mut AppState, table: &StatsTable) {
    let Some(path) = cache_path() else {
        return;
    };
    let Ok(raw) = fs::read_to_string(&path) else {
        return;
    };
    let Ok(cache) = serde_json::from_str::<CacheFile>(&raw) else {
        return;
    };
    if cache.version != CACHE_VERSION {
        return;
    }

    for idx in 0..2 {
        let (Some(league), Some(team)) = (cache.leagues[idx].clone(), cache.teams[idx].clone())
        else {
            continue;
        };
        if !table.teams_in_league(&league).iter().any(|t| t == &team) {
            continue;
        }
        state.selection.slots[idx] = TeamSlot {
            league: Some(league),
            team: Some(team),
        };
    }
    if let Some(category) = category_from_label(&cache.category) {
        state.selection.category = category;
    }
}

pub fn save_from_state(state: &AppState) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let cache = CacheFile {
        version: CACHE_VERSION,
        leagues: [
            state.selection.slots[0].league.clone(),
            state.selection.slots[1].league.clone(),
        ],
        teams: [
            state.selection.slots[0].team.clone(),
            state.selection.slots[1].team.clone(),
        ],
        category: state.selection.category.label().to_string(),
    };

    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(&cache).context("serialize selections")?;
    fs::write(&tmp, json).context("write selections cache")?;
    fs::rename(&tmp, &path).context("swap selections cache")?;
    Ok(())
}

fn category_from_label(raw: &str) -> Option<Category> {
    CATEGORIES
        .into_iter()
        .find(|c| c.label().eq_ignore_ascii_case(raw.trim()))
}

fn cache_path() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    // Fallback to ~/.cache on linux-like systems.
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_round_trip() {
        for category in CATEGORIES {
            assert_eq!(category_from_label(category.label()), Some(category));
        }
        assert_eq!(category_from_label(" attacking "), Some(Category::Attacking));
        assert_eq!(category_from_label("unknown"), None);
    }
}
