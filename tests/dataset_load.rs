use std::path::PathBuf;

use seasonwise_terminal::dataset::StatsTable;
use seasonwise_terminal::schema::Season;

const VARIANT_A_HEADER: &str = "league,team,season,matches,Wins,Draws,Goals/Game,Expected Goals/Game,Goals Conceded/Game,Expected Goals Conceded/Game,Average_Possession,Shots_Taken/Game,Shot_OnTarget/Game,CrdY/Game,Fouls_Commited/Game,Fouls_Drawn/Game,Tackles_Tkl/Game,Tackles_TklW/Game,Tackles_Def_3rd/Game,Tackles_Mid_3rd/Game,Tackles_Att_3rd/Game";

const VARIANT_B_HEADER: &str = "league,squad,season,mp,w,d,gls/game,xg/game,ga/game,xga/game,possession,shots/game,sot/game,yellows/game,fouls_committed/game,fouls_drawn/game,tackles/game,tackles_won/game,tackles_def_3rd/game,tackles_mid_3rd/game,tackles_att_3rd/game";

const STATS: &str = "38,20,10,2.10,1.80,1.00,1.20,58.2,14.0,5.6,1.8,10.5,11.2,18.0,11.7,9.0,6.0,3.0";

fn fixture_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("domestic_stats.csv");
    path
}

#[test]
fn fixture_file_loads_and_looks_up_by_team_and_season() {
    let table = StatsTable::load(&fixture_path()).expect("fixture should load");
    assert_eq!(table.len(), 5);
    assert!(table.summary().warnings.is_empty());

    let arsenal = table
        .get("Arsenal", Season::S2024_25)
        .expect("arsenal 2024/25 should exist");
    assert_eq!(arsenal.league, "Premier League");
    assert_eq!(arsenal.matches, 38);
    assert!((arsenal.possession - 0.582).abs() < 1e-12, "possession normalized");

    // Valid team, absent season: empty result, not an error.
    assert!(table.get("Newcastle", Season::S2024_25).is_none());
    assert!(table.get("Nottingham Forest", Season::S2024_25).is_none());
}

#[test]
fn both_header_variants_produce_the_same_record() {
    let csv_a = format!("{VARIANT_A_HEADER}\nPremier League,Arsenal,2024/2025,{STATS}\n");
    let csv_b = format!("{VARIANT_B_HEADER}\nPremier League,Arsenal,2425,{STATS}\n");

    let table_a = StatsTable::load_from_reader(csv_a.as_bytes()).unwrap();
    let table_b = StatsTable::load_from_reader(csv_b.as_bytes()).unwrap();

    let rec_a = table_a.get("Arsenal", Season::S2024_25).unwrap();
    let rec_b = table_b.get("Arsenal", Season::S2024_25).unwrap();
    assert_eq!(rec_a, rec_b);
}

#[test]
fn fractional_possession_is_kept_as_is() {
    let csv = format!(
        "{VARIANT_A_HEADER}\nPremier League,Arsenal,2024/2025,38,20,10,2.10,1.80,1.00,1.20,0.582,14.0,5.6,1.8,10.5,11.2,18.0,11.7,9.0,6.0,3.0\n"
    );
    let table = StatsTable::load_from_reader(csv.as_bytes()).unwrap();
    let rec = table.get("Arsenal", Season::S2024_25).unwrap();
    assert!((rec.possession - 0.582).abs() < 1e-12);
}

#[test]
fn duplicate_team_season_keeps_first_row_and_warns() {
    let csv = format!(
        "{VARIANT_A_HEADER}\n\
         Premier League,Arsenal,2024/2025,{STATS}\n\
         Premier League,Arsenal,2024/2025,{STATS}\n"
    );
    let table = StatsTable::load_from_reader(csv.as_bytes()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.summary().rows_skipped, 1);
    assert!(
        table.summary().warnings[0].contains("duplicate"),
        "got {:?}",
        table.summary().warnings
    );
}

#[test]
fn bad_rows_are_skipped_with_line_numbers() {
    let csv = format!(
        "{VARIANT_A_HEADER}\n\
         Premier League,Arsenal,2024/2025,{STATS}\n\
         Premier League,Chelsea,2024/2025,not-a-number,20,10,2.10,1.80,1.00,1.20,58.2,14.0,5.6,1.8,10.5,11.2,18.0,11.7,9.0,6.0,3.0\n\
         Premier League,Spurs,1999/2000,{STATS}\n"
    );
    let table = StatsTable::load_from_reader(csv.as_bytes()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.summary().rows_skipped, 2);
    assert!(table.summary().warnings.iter().any(|w| w.starts_with("line 3:")));
    assert!(
        table
            .summary()
            .warnings
            .iter()
            .any(|w| w.contains("unknown season code")),
        "got {:?}",
        table.summary().warnings
    );
}

#[test]
fn missing_columns_fail_the_load_and_are_named() {
    let csv = "league,team,season\nPremier League,Arsenal,2024/2025\n";
    let err = StatsTable::load_from_reader(csv.as_bytes()).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("missing required columns"), "got {msg}");
    assert!(msg.contains("matches"), "got {msg}");
}

#[test]
fn header_only_sheet_is_a_load_error() {
    let csv = format!("{VARIANT_A_HEADER}\n");
    let err = StatsTable::load_from_reader(csv.as_bytes()).unwrap_err();
    assert!(format!("{err:#}").contains("no usable rows"));
}

#[test]
fn league_and_team_enumeration_is_sorted_and_deduplicated() {
    let table = StatsTable::load(&fixture_path()).unwrap();
    assert_eq!(table.leagues(), vec!["La Liga", "Premier League"]);
    assert_eq!(
        table.teams_in_league("Premier League"),
        vec!["Arsenal", "Newcastle"]
    );
    assert!(table.teams_in_league("Serie A").is_empty());
}
