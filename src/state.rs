use std::collections::VecDeque;

use crate::dataset::StatsTable;
use crate::schema::{SEASONS, Season};
use crate::season_metrics::{self, Category, DerivedSnapshot, MetricRow};

const MAX_LOG_LINES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Compare,
    Picker { slot: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerPane {
    #[default]
    Leagues,
    Teams,
}

/// One of the two team slots. `None` is the "no selection" sentinel; the
/// deriver is never invoked for a slot still at the sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamSlot {
    pub league: Option<String>,
    pub team: Option<String>,
}

impl TeamSlot {
    pub fn is_selected(&self) -> bool {
        self.team.is_some()
    }

    pub fn clear(&mut self) {
        self.league = None;
        self.team = None;
    }
}

/// Explicit session state, passed into every derivation/rendering call.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub slots: [TeamSlot; 2],
    pub category: Category,
}

#[derive(Debug, Clone, Default)]
pub struct PickerState {
    pub pane: PickerPane,
    pub league_idx: usize,
    pub team_idx: usize,
}

pub struct AppState {
    pub screen: Screen,
    pub selection: SelectionState,
    pub focus_slot: usize,
    pub picker: PickerState,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Compare,
            selection: SelectionState::default(),
            focus_slot: 0,
            picker: PickerState::default(),
            logs: VecDeque::with_capacity(MAX_LOG_LINES),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOG_LINES {
            self.logs.pop_front();
        }
    }

    pub fn focus_slot_mut(&mut self) -> &mut TeamSlot {
        &mut self.selection.slots[self.focus_slot]
    }

    pub fn toggle_focus_slot(&mut self) {
        self.focus_slot = 1 - self.focus_slot;
    }

    pub fn cycle_category(&mut self) {
        self.selection.category = self.selection.category.cycle();
    }

    pub fn set_category(&mut self, category: Category) {
        self.selection.category = category;
    }

    /// Step the focused slot's team through its league without opening the
    /// picker. No-op while the slot has no league chosen.
    pub fn cycle_focus_team(&mut self, table: &StatsTable, step: isize) {
        let slot = &mut self.selection.slots[self.focus_slot];
        let Some(league) = slot.league.as_deref() else {
            return;
        };
        let teams = table.teams_in_league(league);
        if teams.is_empty() {
            return;
        }
        let next = match slot.team.as_deref().and_then(|t| teams.iter().position(|x| x == t)) {
            Some(current) => step_index(current, step, teams.len()),
            None => 0,
        };
        slot.team = Some(teams[next].clone());
    }

    pub fn open_picker(&mut self, slot: usize, table: &StatsTable) {
        let slot = slot.min(1);
        self.focus_slot = slot;
        let leagues = table.leagues();
        let league_idx = self.selection.slots[slot]
            .league
            .as_deref()
            .and_then(|league| leagues.iter().position(|l| l == league))
            .unwrap_or(0);
        self.picker = PickerState {
            pane: PickerPane::Leagues,
            league_idx,
            team_idx: 0,
        };
        self.screen = Screen::Picker { slot };
    }

    pub fn picker_leagues(&self, table: &StatsTable) -> Vec<String> {
        table.leagues()
    }

    /// Teams for the league currently under the cursor (not yet committed).
    pub fn picker_teams(&self, table: &StatsTable) -> Vec<String> {
        let leagues = table.leagues();
        match leagues.get(self.picker.league_idx) {
            Some(league) => table.teams_in_league(league),
            None => Vec::new(),
        }
    }

    pub fn picker_next(&mut self, table: &StatsTable) {
        self.picker_step(table, 1);
    }

    pub fn picker_prev(&mut self, table: &StatsTable) {
        self.picker_step(table, -1);
    }

    fn picker_step(&mut self, table: &StatsTable, step: isize) {
        match self.picker.pane {
            PickerPane::Leagues => {
                let len = table.leagues().len();
                self.picker.league_idx = step_index(self.picker.league_idx, step, len);
                self.picker.team_idx = 0;
            }
            PickerPane::Teams => {
                let len = self.picker_teams(table).len();
                self.picker.team_idx = step_index(self.picker.team_idx, step, len);
            }
        }
    }

    /// Advance the picker: the league pane moves into the team pane; the team
    /// pane commits the selection. Returns true once a team was committed.
    pub fn picker_enter(&mut self, table: &StatsTable) -> bool {
        let Screen::Picker { slot } = self.screen else {
            return false;
        };
        match self.picker.pane {
            PickerPane::Leagues => {
                if !table.leagues().is_empty() {
                    self.picker.pane = PickerPane::Teams;
                    self.picker.team_idx = 0;
                }
                false
            }
            PickerPane::Teams => {
                let leagues = table.leagues();
                let teams = self.picker_teams(table);
                let (Some(league), Some(team)) = (
                    leagues.get(self.picker.league_idx),
                    teams.get(self.picker.team_idx),
                ) else {
                    return false;
                };
                self.selection.slots[slot] = TeamSlot {
                    league: Some(league.clone()),
                    team: Some(team.clone()),
                };
                self.screen = Screen::Compare;
                true
            }
        }
    }

    /// Back out one level. Returns true when the picker was left entirely.
    pub fn picker_back(&mut self) -> bool {
        match self.picker.pane {
            PickerPane::Teams => {
                self.picker.pane = PickerPane::Leagues;
                false
            }
            PickerPane::Leagues => {
                self.screen = Screen::Compare;
                true
            }
        }
    }

    pub fn comparison(&self, table: &StatsTable) -> [TeamPanel; 2] {
        [
            team_panel(table, &self.selection.slots[0], self.selection.category),
            team_panel(table, &self.selection.slots[1], self.selection.category),
        ]
    }
}

fn step_index(current: usize, step: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    if step > 0 {
        current.saturating_add(1).min(len - 1)
    } else {
        current.saturating_sub(1)
    }
}

/// Render model for one season column of one team slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SeasonPanel {
    /// Slot still at the sentinel; show a prompt, derive nothing.
    Prompt,
    /// Valid team with no row for this season.
    NoData { season: Season },
    Stats { season: Season, rows: Vec<MetricRow> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamPanel {
    pub team: Option<String>,
    pub seasons: Vec<SeasonPanel>,
}

/// Derive both season columns for one slot. Seasons run oldest to newest so
/// each derived snapshot can serve as the next season's baseline; a missing
/// season resets the baseline rather than leaving a stale one in place.
pub fn team_panel(table: &StatsTable, slot: &TeamSlot, category: Category) -> TeamPanel {
    let Some(team) = slot.team.as_deref() else {
        return TeamPanel {
            team: None,
            seasons: vec![SeasonPanel::Prompt; SEASONS.len()],
        };
    };

    let mut seasons = Vec::with_capacity(SEASONS.len());
    let mut prev: Option<DerivedSnapshot> = None;
    for season in SEASONS {
        match table.get(team, season) {
            Some(rec) => {
                let snap = season_metrics::derive_snapshot(rec);
                let rows = season_metrics::metric_rows(rec, &snap, prev.as_ref(), category);
                seasons.push(SeasonPanel::Stats { season, rows });
                prev = Some(snap);
            }
            None => {
                seasons.push(SeasonPanel::NoData { season });
                prev = None;
            }
        }
    }
    TeamPanel {
        team: Some(team.to_string()),
        seasons,
    }
}
