use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use once_cell::sync::OnceCell;

use crate::schema::{self, ColumnMap, Season, StatColumn};

/// One sheet row: a team's pre-aggregated stats for one season.
///
/// All `*_pg` figures arrive already divided by matches played; this module
/// only canonicalizes units (possession is stored as a 0..1 fraction).
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSeasonRecord {
    pub league: String,
    pub team: String,
    pub season: Season,
    pub matches: u32,
    pub wins: u32,
    pub draws: u32,
    pub goals_pg: f64,
    pub xg_pg: f64,
    pub conceded_pg: f64,
    pub xga_pg: f64,
    pub possession: f64,
    pub shots_pg: f64,
    pub on_target_pg: f64,
    pub yellow_cards_pg: f64,
    pub fouls_committed_pg: f64,
    pub fouls_drawn_pg: f64,
    pub tackles_pg: f64,
    pub tackles_won_pg: f64,
    pub tackles_def3_pg: f64,
    pub tackles_mid3_pg: f64,
    pub tackles_att3_pg: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub rows_loaded: usize,
    pub rows_skipped: usize,
    pub warnings: Vec<String>,
}

/// The loaded stats sheet. Immutable after load; every lookup is an equality
/// match and a miss is a valid empty result.
#[derive(Debug, Clone)]
pub struct StatsTable {
    records: Vec<TeamSeasonRecord>,
    summary: LoadSummary,
}

impl StatsTable {
    pub fn load(path: &Path) -> Result<StatsTable> {
        let file = File::open(path)
            .with_context(|| format!("open stats file {}", path.display()))?;
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some("tsv") => b'\t',
            _ => b',',
        };
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(file);
        Self::from_csv(reader)
            .with_context(|| format!("parse stats file {}", path.display()))
    }

    /// Comma-delimited variant for in-memory sources (tests, benches).
    pub fn load_from_reader<R: Read>(rdr: R) -> Result<StatsTable> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(rdr);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<StatsTable> {
        let headers = reader.headers().context("read header row")?.clone();
        let columns = schema::resolve_headers(headers.iter())?;

        let mut records: Vec<TeamSeasonRecord> = Vec::new();
        let mut seen: HashSet<(String, Season)> = HashSet::new();
        let mut summary = LoadSummary::default();

        for (line, row) in reader.records().enumerate() {
            // Header is line 1; data starts at line 2.
            let line_no = line + 2;
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    summary.rows_skipped += 1;
                    summary.warnings.push(format!("line {line_no}: {err}"));
                    continue;
                }
            };
            match parse_record(&row, &columns) {
                Ok(record) => {
                    let key = (record.team.clone(), record.season);
                    if !seen.insert(key) {
                        summary.rows_skipped += 1;
                        summary.warnings.push(format!(
                            "line {line_no}: duplicate row for {} {}, keeping the first",
                            record.team,
                            record.season.label()
                        ));
                        continue;
                    }
                    records.push(record);
                    summary.rows_loaded += 1;
                }
                Err(err) => {
                    summary.rows_skipped += 1;
                    summary.warnings.push(format!("line {line_no}: {err}"));
                }
            }
        }

        if records.is_empty() {
            bail!(
                "no usable rows in stats sheet ({} skipped)",
                summary.rows_skipped
            );
        }
        Ok(StatsTable { records, summary })
    }

    /// Build a table from already-canonical records (embedded or synthetic
    /// data). The caller keeps the at-most-one-per-(team, season) invariant.
    pub fn from_records(records: Vec<TeamSeasonRecord>) -> StatsTable {
        let summary = LoadSummary {
            rows_loaded: records.len(),
            ..LoadSummary::default()
        };
        StatsTable { records, summary }
    }

    pub fn get(&self, team: &str, season: Season) -> Option<&TeamSeasonRecord> {
        self.records
            .iter()
            .find(|r| r.team == team && r.season == season)
    }

    pub fn has_team(&self, team: &str) -> bool {
        self.records.iter().any(|r| r.team == team)
    }

    pub fn leagues(&self) -> Vec<String> {
        let mut leagues: Vec<String> = self
            .records
            .iter()
            .map(|r| r.league.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        leagues.sort();
        leagues
    }

    pub fn teams_in_league(&self, league: &str) -> Vec<String> {
        let mut teams: Vec<String> = self
            .records
            .iter()
            .filter(|r| r.league == league)
            .map(|r| r.team.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        teams.sort();
        teams
    }

    pub fn records(&self) -> &[TeamSeasonRecord] {
        &self.records
    }

    pub fn summary(&self) -> &LoadSummary {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_record(row: &csv::StringRecord, columns: &ColumnMap) -> Result<TeamSeasonRecord> {
    let season_raw = field(row, columns, StatColumn::Season)?;
    let Some(season) = Season::parse(season_raw) else {
        bail!("unknown season code {season_raw:?}");
    };

    let team = field(row, columns, StatColumn::Team)?.to_string();
    if team.is_empty() {
        bail!("empty team name");
    }

    Ok(TeamSeasonRecord {
        league: field(row, columns, StatColumn::League)?.to_string(),
        team,
        season,
        matches: count(row, columns, StatColumn::Matches)?,
        wins: count(row, columns, StatColumn::Wins)?,
        draws: count(row, columns, StatColumn::Draws)?,
        goals_pg: num(row, columns, StatColumn::GoalsPerGame)?,
        xg_pg: num(row, columns, StatColumn::XgPerGame)?,
        conceded_pg: num(row, columns, StatColumn::ConcededPerGame)?,
        xga_pg: num(row, columns, StatColumn::XgaPerGame)?,
        possession: normalize_possession(num(row, columns, StatColumn::Possession)?),
        shots_pg: num(row, columns, StatColumn::ShotsPerGame)?,
        on_target_pg: num(row, columns, StatColumn::OnTargetPerGame)?,
        yellow_cards_pg: num(row, columns, StatColumn::YellowCardsPerGame)?,
        fouls_committed_pg: num(row, columns, StatColumn::FoulsCommittedPerGame)?,
        fouls_drawn_pg: num(row, columns, StatColumn::FoulsDrawnPerGame)?,
        tackles_pg: num(row, columns, StatColumn::TacklesPerGame)?,
        tackles_won_pg: num(row, columns, StatColumn::TacklesWonPerGame)?,
        tackles_def3_pg: num(row, columns, StatColumn::TacklesDefThirdPerGame)?,
        tackles_mid3_pg: num(row, columns, StatColumn::TacklesMidThirdPerGame)?,
        tackles_att3_pg: num(row, columns, StatColumn::TacklesAttThirdPerGame)?,
    })
}

fn field<'r>(
    row: &'r csv::StringRecord,
    columns: &ColumnMap,
    column: StatColumn,
) -> Result<&'r str> {
    row.get(columns.idx(column))
        .with_context(|| format!("row too short, no {} field", column.name()))
}

fn num(row: &csv::StringRecord, columns: &ColumnMap, column: StatColumn) -> Result<f64> {
    let raw = field(row, columns, column)?;
    parse_number(raw).with_context(|| format!("bad {} value {raw:?}", column.name()))
}

fn count(row: &csv::StringRecord, columns: &ColumnMap, column: StatColumn) -> Result<u32> {
    let raw = field(row, columns, column)?;
    raw.trim()
        .parse::<u32>()
        .with_context(|| format!("bad {} value {raw:?}", column.name()))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().trim_end_matches('%').trim().parse::<f64>().ok()
}

/// One sheet variant stores possession as 0-100, the canonical model is 0..1.
fn normalize_possession(value: f64) -> f64 {
    if value > 1.0 { value / 100.0 } else { value }
}

static TABLE: OnceCell<StatsTable> = OnceCell::new();

pub fn stats_file_path() -> PathBuf {
    std::env::var("SEASONWISE_STATS_FILE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("season_stats.csv"))
}

/// Process-wide table: loaded once, served from memory afterwards. The file
/// is assumed static for the process lifetime; there is no invalidation.
pub fn stats_table() -> Result<&'static StatsTable> {
    TABLE.get_or_try_init(|| StatsTable::load(&stats_file_path()))
}
