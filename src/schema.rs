use std::collections::HashMap;

use anyhow::{Result, bail};

/// The two compared domestic seasons, oldest first.
///
/// The source sheets disagree on season literals ("2024/2025" strings in one
/// variant, 2425-style codes in the other); everything downstream works on
/// this enum and only `parse` knows the spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    S2024_25,
    S2025_26,
}

pub const SEASONS: [Season; 2] = [Season::S2024_25, Season::S2025_26];

impl Season {
    pub fn label(self) -> &'static str {
        match self {
            Season::S2024_25 => "2024/25",
            Season::S2025_26 => "2025/26",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Season::S2024_25 => "2024/2025",
            Season::S2025_26 => "2025/2026",
        }
    }

    /// Season immediately before this one, if it is part of the compared pair.
    pub fn prev(self) -> Option<Season> {
        match self {
            Season::S2024_25 => None,
            Season::S2025_26 => Some(Season::S2024_25),
        }
    }

    /// Accepts "2024/2025", "2024/25", "2024-25" and bare "2425" codes.
    pub fn parse(raw: &str) -> Option<Season> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        match digits.as_str() {
            "20242025" | "202425" | "2425" => Some(Season::S2024_25),
            "20252026" | "202526" | "2526" => Some(Season::S2025_26),
            _ => None,
        }
    }
}

/// Canonical columns consumed from the stats sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatColumn {
    League,
    Team,
    Season,
    Matches,
    Wins,
    Draws,
    GoalsPerGame,
    XgPerGame,
    ConcededPerGame,
    XgaPerGame,
    Possession,
    ShotsPerGame,
    OnTargetPerGame,
    YellowCardsPerGame,
    FoulsCommittedPerGame,
    FoulsDrawnPerGame,
    TacklesPerGame,
    TacklesWonPerGame,
    TacklesDefThirdPerGame,
    TacklesMidThirdPerGame,
    TacklesAttThirdPerGame,
}

pub const ALL_COLUMNS: &[StatColumn] = &[
    StatColumn::League,
    StatColumn::Team,
    StatColumn::Season,
    StatColumn::Matches,
    StatColumn::Wins,
    StatColumn::Draws,
    StatColumn::GoalsPerGame,
    StatColumn::XgPerGame,
    StatColumn::ConcededPerGame,
    StatColumn::XgaPerGame,
    StatColumn::Possession,
    StatColumn::ShotsPerGame,
    StatColumn::OnTargetPerGame,
    StatColumn::YellowCardsPerGame,
    StatColumn::FoulsCommittedPerGame,
    StatColumn::FoulsDrawnPerGame,
    StatColumn::TacklesPerGame,
    StatColumn::TacklesWonPerGame,
    StatColumn::TacklesDefThirdPerGame,
    StatColumn::TacklesMidThirdPerGame,
    StatColumn::TacklesAttThirdPerGame,
];

impl StatColumn {
    pub fn name(self) -> &'static str {
        // First alias doubles as the display name in error messages.
        self.aliases()[0]
    }

    /// Lowercased header spellings seen across the two sheet variants.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            StatColumn::League => &["league"],
            StatColumn::Team => &["team", "squad"],
            StatColumn::Season => &["season"],
            StatColumn::Matches => &["matches", "matches played", "mp"],
            StatColumn::Wins => &["wins", "w"],
            StatColumn::Draws => &["draws", "d"],
            StatColumn::GoalsPerGame => &["goals/game", "goals per game", "gls/game"],
            StatColumn::XgPerGame => &["expected goals/game", "xg/game", "xg per game"],
            StatColumn::ConcededPerGame => {
                &["goals conceded/game", "conceded/game", "ga/game"]
            }
            StatColumn::XgaPerGame => {
                &["expected goals conceded/game", "xga/game", "xga per game"]
            }
            StatColumn::Possession => {
                &["average_possession", "possession", "avg possession"]
            }
            StatColumn::ShotsPerGame => &["shots_taken/game", "shots/game"],
            StatColumn::OnTargetPerGame => {
                &["shot_ontarget/game", "shots_on_target/game", "sot/game"]
            }
            StatColumn::YellowCardsPerGame => {
                &["crdy/game", "yellow_cards/game", "yellows/game"]
            }
            // "commited" [sic] is what one sheet variant actually ships.
            StatColumn::FoulsCommittedPerGame => {
                &["fouls_commited/game", "fouls_committed/game", "fouls/game"]
            }
            StatColumn::FoulsDrawnPerGame => &["fouls_drawn/game", "fouled/game"],
            StatColumn::TacklesPerGame => &["tackles_tkl/game", "tackles/game", "tkl/game"],
            StatColumn::TacklesWonPerGame => {
                &["tackles_tklw/game", "tackles_won/game", "tklw/game"]
            }
            StatColumn::TacklesDefThirdPerGame => {
                &["tackles_def_3rd/game", "def 3rd tackles/game", "tkl def 3rd/game"]
            }
            StatColumn::TacklesMidThirdPerGame => {
                &["tackles_mid_3rd/game", "mid 3rd tackles/game", "tkl mid 3rd/game"]
            }
            StatColumn::TacklesAttThirdPerGame => {
                &["tackles_att_3rd/game", "att 3rd tackles/game", "tkl att 3rd/game"]
            }
        }
    }
}

/// Resolved header positions for one sheet.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    indices: HashMap<StatColumn, usize>,
}

impl ColumnMap {
    /// Column index; only valid for maps returned by `resolve_headers`.
    pub fn idx(&self, column: StatColumn) -> usize {
        self.indices[&column]
    }
}

/// Match a header row against the alias table. All canonical columns are
/// required; the error lists every one that is missing.
pub fn resolve_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<ColumnMap> {
    let normalized: Vec<String> = headers
        .into_iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut indices = HashMap::with_capacity(ALL_COLUMNS.len());
    let mut missing = Vec::new();

    for &column in ALL_COLUMNS {
        let found = column.aliases().iter().find_map(|alias| {
            normalized.iter().position(|h| h == alias)
        });
        match found {
            Some(pos) => {
                indices.insert(column, pos);
            }
            None => missing.push(column.name()),
        }
    }

    if !missing.is_empty() {
        bail!("stats sheet is missing required columns: {}", missing.join(", "));
    }
    Ok(ColumnMap { indices })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_parse_accepts_both_variants() {
        assert_eq!(Season::parse("2024/2025"), Some(Season::S2024_25));
        assert_eq!(Season::parse("2024/25"), Some(Season::S2024_25));
        assert_eq!(Season::parse(" 2425 "), Some(Season::S2024_25));
        assert_eq!(Season::parse("2025-26"), Some(Season::S2025_26));
        assert_eq!(Season::parse("2526"), Some(Season::S2025_26));
        assert_eq!(Season::parse("2023/24"), None);
        assert_eq!(Season::parse("n/a"), None);
    }

    #[test]
    fn seasons_are_ordered_oldest_first() {
        assert!(Season::S2024_25 < Season::S2025_26);
        assert_eq!(Season::S2025_26.prev(), Some(Season::S2024_25));
        assert_eq!(Season::S2024_25.prev(), None);
    }

    #[test]
    fn resolve_headers_handles_spelling_variants() {
        let variant_a = [
            "league", "team", "season", "matches", "Wins", "Draws",
            "Goals/Game", "Expected Goals/Game", "Goals Conceded/Game",
            "Expected Goals Conceded/Game", "Average_Possession",
            "Shots_Taken/Game", "Shot_OnTarget/Game", "CrdY/Game",
            "Fouls_Commited/Game", "Fouls_Drawn/Game", "Tackles_Tkl/Game",
            "Tackles_TklW/Game", "Tackles_Def_3rd/Game", "Tackles_Mid_3rd/Game",
            "Tackles_Att_3rd/Game",
        ];
        let map = resolve_headers(variant_a).expect("variant A headers resolve");
        assert_eq!(map.idx(StatColumn::Team), 1);
        assert_eq!(map.idx(StatColumn::FoulsCommittedPerGame), 14);
        assert_eq!(map.idx(StatColumn::TacklesAttThirdPerGame), 20);
    }

    #[test]
    fn resolve_headers_reports_every_missing_column() {
        let err = resolve_headers(["league", "team", "season"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("matches"), "missing list should name matches: {msg}");
        assert!(msg.contains("tackles_tkl/game"), "missing list should name tackles: {msg}");
    }
}
