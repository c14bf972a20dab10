use seasonwise_terminal::dataset::{StatsTable, TeamSeasonRecord};
use seasonwise_terminal::schema::Season;
use seasonwise_terminal::season_metrics::Category;
use seasonwise_terminal::state::{
    AppState, PickerPane, Screen, SeasonPanel, TeamSlot, team_panel,
};

fn record(league: &str, team: &str, season: Season) -> TeamSeasonRecord {
    TeamSeasonRecord {
        league: league.to_string(),
        team: team.to_string(),
        season,
        matches: 38,
        wins: 20,
        draws: 10,
        goals_pg: 2.1,
        xg_pg: 1.8,
        conceded_pg: 1.0,
        xga_pg: 1.2,
        possession: 0.58,
        shots_pg: 14.0,
        on_target_pg: 5.6,
        yellow_cards_pg: 1.8,
        fouls_committed_pg: 10.5,
        fouls_drawn_pg: 11.2,
        tackles_pg: 18.0,
        tackles_won_pg: 11.7,
        tackles_def3_pg: 9.0,
        tackles_mid3_pg: 6.0,
        tackles_att3_pg: 3.0,
    }
}

fn two_league_table() -> StatsTable {
    StatsTable::from_records(vec![
        record("La Liga", "Barcelona", Season::S2024_25),
        record("La Liga", "Barcelona", Season::S2025_26),
        record("La Liga", "Real Madrid", Season::S2024_25),
        record("Premier League", "Arsenal", Season::S2024_25),
        record("Premier League", "Arsenal", Season::S2025_26),
        record("Premier League", "Newcastle", Season::S2025_26),
    ])
}

#[test]
fn sentinel_slot_yields_prompt_panels_and_no_derivation() {
    let table = two_league_table();
    let panel = team_panel(&table, &TeamSlot::default(), Category::Attacking);
    assert_eq!(panel.team, None);
    assert_eq!(panel.seasons, vec![SeasonPanel::Prompt, SeasonPanel::Prompt]);
}

#[test]
fn missing_first_season_yields_no_data_and_resets_baseline() {
    let table = two_league_table();
    let slot = TeamSlot {
        league: Some("Premier League".to_string()),
        team: Some("Newcastle".to_string()),
    };
    let panel = team_panel(&table, &slot, Category::Attacking);

    assert_eq!(
        panel.seasons[0],
        SeasonPanel::NoData {
            season: Season::S2024_25
        }
    );
    let SeasonPanel::Stats { season, rows } = &panel.seasons[1] else {
        panic!("second season should have data");
    };
    assert_eq!(*season, Season::S2025_26);
    // No stale baseline: every vs-prev delta is the placeholder.
    for row in rows {
        if row.label == "Goals" {
            continue;
        }
        assert!(row.delta.is_none(), "{} should have no delta", row.label);
    }
}

#[test]
fn missing_second_season_still_renders_the_first() {
    let table = two_league_table();
    let slot = TeamSlot {
        league: Some("La Liga".to_string()),
        team: Some("Real Madrid".to_string()),
    };
    let panel = team_panel(&table, &slot, Category::Overall);
    assert!(matches!(panel.seasons[0], SeasonPanel::Stats { .. }));
    assert_eq!(
        panel.seasons[1],
        SeasonPanel::NoData {
            season: Season::S2025_26
        }
    );
}

#[test]
fn later_season_gets_deltas_when_both_seasons_exist() {
    let table = two_league_table();
    let slot = TeamSlot {
        league: Some("Premier League".to_string()),
        team: Some("Arsenal".to_string()),
    };
    let panel = team_panel(&table, &slot, Category::Overall);

    let SeasonPanel::Stats { rows: first, .. } = &panel.seasons[0] else {
        panic!("first season should have data");
    };
    let SeasonPanel::Stats { rows: second, .. } = &panel.seasons[1] else {
        panic!("second season should have data");
    };
    assert!(first.iter().all(|r| r.delta.is_none()));
    assert!(second.iter().all(|r| r.delta.is_some()));
}

#[test]
fn category_views_have_fixed_disjoint_sizes() {
    let table = two_league_table();
    let slot = TeamSlot {
        league: Some("Premier League".to_string()),
        team: Some("Arsenal".to_string()),
    };
    for (category, expected) in [
        (Category::Attacking, 3),
        (Category::Defensive, 5),
        (Category::Overall, 5),
    ] {
        let panel = team_panel(&table, &slot, category);
        let SeasonPanel::Stats { rows, .. } = &panel.seasons[0] else {
            panic!("season should have data");
        };
        assert_eq!(rows.len(), expected, "{} rows", category.label());
    }
}

#[test]
fn picker_flow_commits_league_and_team() {
    let table = two_league_table();
    let mut state = AppState::new();

    state.open_picker(1, &table);
    assert_eq!(state.screen, Screen::Picker { slot: 1 });
    assert_eq!(state.picker.pane, PickerPane::Leagues);

    // Leagues sort alphabetically: La Liga, Premier League.
    state.picker_next(&table);
    assert!(!state.picker_enter(&table));
    assert_eq!(state.picker.pane, PickerPane::Teams);

    // Teams in Premier League sort: Arsenal, Newcastle.
    state.picker_next(&table);
    assert!(state.picker_enter(&table));
    assert_eq!(state.screen, Screen::Compare);
    assert_eq!(
        state.selection.slots[1],
        TeamSlot {
            league: Some("Premier League".to_string()),
            team: Some("Newcastle".to_string()),
        }
    );
}

#[test]
fn picker_back_steps_panes_then_leaves() {
    let table = two_league_table();
    let mut state = AppState::new();
    state.open_picker(0, &table);
    state.picker_enter(&table);
    assert_eq!(state.picker.pane, PickerPane::Teams);

    assert!(!state.picker_back());
    assert_eq!(state.picker.pane, PickerPane::Leagues);
    assert!(state.picker_back());
    assert_eq!(state.screen, Screen::Compare);
}

#[test]
fn picker_cursor_clamps_at_list_edges() {
    let table = two_league_table();
    let mut state = AppState::new();
    state.open_picker(0, &table);

    state.picker_prev(&table);
    assert_eq!(state.picker.league_idx, 0);
    state.picker_next(&table);
    state.picker_next(&table);
    state.picker_next(&table);
    assert_eq!(state.picker.league_idx, 1, "two leagues, cursor clamps at the end");
}

#[test]
fn cycle_focus_team_walks_the_slot_league() {
    let table = two_league_table();
    let mut state = AppState::new();

    // No league chosen: no-op.
    state.cycle_focus_team(&table, 1);
    assert!(!state.selection.slots[0].is_selected());

    state.selection.slots[0].league = Some("La Liga".to_string());
    state.cycle_focus_team(&table, 1);
    assert_eq!(state.selection.slots[0].team.as_deref(), Some("Barcelona"));
    state.cycle_focus_team(&table, 1);
    assert_eq!(state.selection.slots[0].team.as_deref(), Some("Real Madrid"));
    state.cycle_focus_team(&table, 1);
    assert_eq!(
        state.selection.slots[0].team.as_deref(),
        Some("Real Madrid"),
        "clamps at the last team"
    );
    state.cycle_focus_team(&table, -1);
    assert_eq!(state.selection.slots[0].team.as_deref(), Some("Barcelona"));
}

#[test]
fn category_cycles_through_all_three_views() {
    let mut state = AppState::new();
    assert_eq!(state.selection.category, Category::Attacking);
    state.cycle_category();
    assert_eq!(state.selection.category, Category::Defensive);
    state.cycle_category();
    assert_eq!(state.selection.category, Category::Overall);
    state.cycle_category();
    assert_eq!(state.selection.category, Category::Attacking);
}

#[test]
fn clearing_a_slot_restores_the_sentinel() {
    let mut state = AppState::new();
    state.selection.slots[0] = TeamSlot {
        league: Some("La Liga".to_string()),
        team: Some("Barcelona".to_string()),
    };
    state.focus_slot = 0;
    state.focus_slot_mut().clear();
    assert_eq!(state.selection.slots[0], TeamSlot::default());
}

#[test]
fn log_ring_is_bounded() {
    let mut state = AppState::new();
    for i in 0..500 {
        state.push_log(format!("[INFO] message {i}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] message 499"));
}
