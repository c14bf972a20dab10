//! Derives the displayed comparison metrics for one team-season and the
//! season-over-season deltas against a previous snapshot.

use crate::dataset::TeamSeasonRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Attacking,
    Defensive,
    Overall,
}

pub const CATEGORIES: [Category; 3] = [Category::Attacking, Category::Defensive, Category::Overall];

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Attacking => "Attacking",
            Category::Defensive => "Defensive",
            Category::Overall => "Overall",
        }
    }

    pub fn cycle(self) -> Category {
        match self {
            Category::Attacking => Category::Defensive,
            Category::Defensive => Category::Overall,
            Category::Overall => Category::Attacking,
        }
    }
}

/// Whether an increase in the metric is favorable for the team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Normal,
    Inverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Goals,
    ShotsOnTarget,
    ShotAccuracy,
    GoalsConceded,
    TacklesAttempted,
    TackleWinRate,
    TacklesAttThird,
    TacklesDefThird,
    PointsPerGame,
    Possession,
    YellowCards,
    FoulsCommitted,
    FoulsDrawn,
}

/// What a metric's delta is measured against.
///
/// Goals and goals conceded carry a same-season expectation gap (vs xG/xGA),
/// so they render a delta even when no previous snapshot exists; everything
/// else compares against the previous season's snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaBasis {
    PreviousSeason,
    ExpectedGoals,
    ExpectedConceded,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    pub metric: Metric,
    pub label: &'static str,
    pub category: Category,
    pub polarity: Polarity,
    /// Stored as a 0..1 fraction, rendered x100 with a `%` suffix; deltas are
    /// percentage points.
    pub percent: bool,
    pub decimals: usize,
    pub basis: DeltaBasis,
}

pub const METRIC_SPECS: &[MetricSpec] = &[
    MetricSpec {
        metric: Metric::Goals,
        label: "Goals",
        category: Category::Attacking,
        polarity: Polarity::Normal,
        percent: false,
        decimals: 2,
        basis: DeltaBasis::ExpectedGoals,
    },
    MetricSpec {
        metric: Metric::ShotsOnTarget,
        label: "Shots On Target",
        category: Category::Attacking,
        polarity: Polarity::Normal,
        percent: false,
        decimals: 1,
        basis: DeltaBasis::PreviousSeason,
    },
    MetricSpec {
        metric: Metric::ShotAccuracy,
        label: "Shot Accuracy",
        category: Category::Attacking,
        polarity: Polarity::Normal,
        percent: true,
        decimals: 1,
        basis: DeltaBasis::PreviousSeason,
    },
    MetricSpec {
        metric: Metric::GoalsConceded,
        label: "Goals Conceded",
        category: Category::Defensive,
        polarity: Polarity::Inverse,
        percent: false,
        decimals: 2,
        basis: DeltaBasis::ExpectedConceded,
    },
    MetricSpec {
        metric: Metric::TacklesAttempted,
        label: "Tackles Attempted",
        category: Category::Defensive,
        polarity: Polarity::Normal,
        percent: false,
        decimals: 1,
        basis: DeltaBasis::PreviousSeason,
    },
    MetricSpec {
        metric: Metric::TackleWinRate,
        label: "Tackle Win Rate",
        category: Category::Defensive,
        polarity: Polarity::Normal,
        percent: true,
        decimals: 1,
        basis: DeltaBasis::PreviousSeason,
    },
    MetricSpec {
        metric: Metric::TacklesAttThird,
        label: "Tackles In Att 3rd",
        category: Category::Defensive,
        polarity: Polarity::Normal,
        percent: true,
        decimals: 1,
        basis: DeltaBasis::PreviousSeason,
    },
    MetricSpec {
        metric: Metric::TacklesDefThird,
        label: "Tackles In Def 3rd",
        category: Category::Defensive,
        polarity: Polarity::Normal,
        percent: true,
        decimals: 1,
        basis: DeltaBasis::PreviousSeason,
    },
    MetricSpec {
        metric: Metric::PointsPerGame,
        label: "Points Per Game",
        category: Category::Overall,
        polarity: Polarity::Normal,
        percent: false,
        decimals: 2,
        basis: DeltaBasis::PreviousSeason,
    },
    MetricSpec {
        metric: Metric::Possession,
        label: "Possession",
        category: Category::Overall,
        polarity: Polarity::Normal,
        percent: true,
        decimals: 0,
        basis: DeltaBasis::PreviousSeason,
    },
    MetricSpec {
        metric: Metric::YellowCards,
        label: "Yellow Cards",
        category: Category::Overall,
        polarity: Polarity::Normal,
        percent: false,
        decimals: 1,
        basis: DeltaBasis::PreviousSeason,
    },
    MetricSpec {
        metric: Metric::FoulsCommitted,
        label: "Fouls Committed",
        category: Category::Overall,
        polarity: Polarity::Inverse,
        percent: false,
        decimals: 1,
        basis: DeltaBasis::PreviousSeason,
    },
    MetricSpec {
        metric: Metric::FoulsDrawn,
        label: "Fouls Drawn",
        category: Category::Overall,
        polarity: Polarity::Normal,
        percent: false,
        decimals: 1,
        basis: DeltaBasis::PreviousSeason,
    },
];

/// Full derived set for one team-season. Also the "previous" baseline when
/// deriving the following season, which is why it always carries every field
/// (including the mid-third share no view surfaces) regardless of the active
/// category filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedSnapshot {
    pub possession: f64,
    pub shot_accuracy: f64,
    pub shots_on_target_pg: f64,
    pub points_pg: f64,
    pub tackles_pg: f64,
    pub tackle_win_rate: f64,
    pub tackles_def_third_share: f64,
    pub tackles_mid_third_share: f64,
    pub tackles_att_third_share: f64,
    pub yellow_cards_pg: f64,
    pub fouls_committed_pg: f64,
    pub fouls_drawn_pg: f64,
}

/// Uniform zero-guard: a zero denominator derives to exactly 0.0, never
/// NaN/Inf.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 { numerator / denominator } else { 0.0 }
}

pub fn points_per_game(wins: u32, draws: u32, matches: u32) -> f64 {
    ratio(f64::from(3 * wins + draws), f64::from(matches))
}

pub fn derive_snapshot(rec: &TeamSeasonRecord) -> DerivedSnapshot {
    DerivedSnapshot {
        possession: rec.possession,
        shot_accuracy: ratio(rec.on_target_pg, rec.shots_pg),
        shots_on_target_pg: rec.on_target_pg,
        points_pg: points_per_game(rec.wins, rec.draws, rec.matches),
        tackles_pg: rec.tackles_pg,
        tackle_win_rate: ratio(rec.tackles_won_pg, rec.tackles_pg),
        tackles_def_third_share: ratio(rec.tackles_def3_pg, rec.tackles_pg),
        tackles_mid_third_share: ratio(rec.tackles_mid3_pg, rec.tackles_pg),
        tackles_att_third_share: ratio(rec.tackles_att3_pg, rec.tackles_pg),
        yellow_cards_pg: rec.yellow_cards_pg,
        fouls_committed_pg: rec.fouls_committed_pg,
        fouls_drawn_pg: rec.fouls_drawn_pg,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricDelta {
    pub text: String,
    /// Signed magnitude after percent scaling; only the sign matters for
    /// favorability coloring.
    pub raw: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub metric: Metric,
    pub label: &'static str,
    pub value: String,
    pub delta: Option<MetricDelta>,
    pub polarity: Polarity,
}

impl MetricRow {
    /// Polarity-aware coloring hint; `None` when the delta is a placeholder.
    pub fn favorable(&self) -> Option<bool> {
        self.delta.as_ref().map(|d| match self.polarity {
            Polarity::Normal => d.raw >= 0.0,
            Polarity::Inverse => d.raw <= 0.0,
        })
    }
}

/// Rows for the active category view. The snapshot passed in must come from
/// `derive_snapshot` on the same record; `prev` is the previous season's
/// snapshot for the same team, or `None` when that season had no data.
pub fn metric_rows(
    rec: &TeamSeasonRecord,
    snap: &DerivedSnapshot,
    prev: Option<&DerivedSnapshot>,
    category: Category,
) -> Vec<MetricRow> {
    METRIC_SPECS
        .iter()
        .filter(|spec| spec.category == category)
        .map(|spec| build_row(spec, rec, snap, prev))
        .collect()
}

/// Every metric in table order, for export.
pub fn all_metric_rows(
    rec: &TeamSeasonRecord,
    snap: &DerivedSnapshot,
    prev: Option<&DerivedSnapshot>,
) -> Vec<MetricRow> {
    METRIC_SPECS
        .iter()
        .map(|spec| build_row(spec, rec, snap, prev))
        .collect()
}

fn build_row(
    spec: &MetricSpec,
    rec: &TeamSeasonRecord,
    snap: &DerivedSnapshot,
    prev: Option<&DerivedSnapshot>,
) -> MetricRow {
    let value = display_value(spec.metric, rec, snap);
    let delta = match spec.basis {
        DeltaBasis::ExpectedGoals => Some(gap_delta(spec, rec.goals_pg - rec.xg_pg, "vs xG")),
        DeltaBasis::ExpectedConceded => {
            Some(gap_delta(spec, rec.conceded_pg - rec.xga_pg, "vs xGA"))
        }
        DeltaBasis::PreviousSeason => prev.and_then(|p| {
            let cur = snapshot_metric(spec.metric, snap)?;
            let base = snapshot_metric(spec.metric, p)?;
            let scale = if spec.percent { 100.0 } else { 1.0 };
            let raw = (cur - base) * scale;
            Some(MetricDelta {
                text: delta_text(spec, raw, "vs prev"),
                raw,
            })
        }),
    };
    MetricRow {
        metric: spec.metric,
        label: spec.label,
        value: format_value(spec, value),
        delta,
        polarity: spec.polarity,
    }
}

fn gap_delta(spec: &MetricSpec, raw: f64, suffix: &str) -> MetricDelta {
    MetricDelta {
        text: delta_text(spec, raw, suffix),
        raw,
    }
}

fn display_value(metric: Metric, rec: &TeamSeasonRecord, snap: &DerivedSnapshot) -> f64 {
    match metric {
        Metric::Goals => rec.goals_pg,
        Metric::GoalsConceded => rec.conceded_pg,
        Metric::ShotsOnTarget => snap.shots_on_target_pg,
        Metric::ShotAccuracy => snap.shot_accuracy,
        Metric::TacklesAttempted => snap.tackles_pg,
        Metric::TackleWinRate => snap.tackle_win_rate,
        Metric::TacklesAttThird => snap.tackles_att_third_share,
        Metric::TacklesDefThird => snap.tackles_def_third_share,
        Metric::PointsPerGame => snap.points_pg,
        Metric::Possession => snap.possession,
        Metric::YellowCards => snap.yellow_cards_pg,
        Metric::FoulsCommitted => snap.fouls_committed_pg,
        Metric::FoulsDrawn => snap.fouls_drawn_pg,
    }
}

/// Snapshot-backed baseline value; the expectation-gap pair has no previous
/// baseline by design (the snapshot carries no goals fields).
fn snapshot_metric(metric: Metric, snap: &DerivedSnapshot) -> Option<f64> {
    match metric {
        Metric::Goals | Metric::GoalsConceded => None,
        Metric::ShotsOnTarget => Some(snap.shots_on_target_pg),
        Metric::ShotAccuracy => Some(snap.shot_accuracy),
        Metric::TacklesAttempted => Some(snap.tackles_pg),
        Metric::TackleWinRate => Some(snap.tackle_win_rate),
        Metric::TacklesAttThird => Some(snap.tackles_att_third_share),
        Metric::TacklesDefThird => Some(snap.tackles_def_third_share),
        Metric::PointsPerGame => Some(snap.points_pg),
        Metric::Possession => Some(snap.possession),
        Metric::YellowCards => Some(snap.yellow_cards_pg),
        Metric::FoulsCommitted => Some(snap.fouls_committed_pg),
        Metric::FoulsDrawn => Some(snap.fouls_drawn_pg),
    }
}

fn format_value(spec: &MetricSpec, value: f64) -> String {
    if spec.percent {
        format!("{:.prec$}%", value * 100.0, prec = spec.decimals)
    } else {
        format!("{:.prec$}", value, prec = spec.decimals)
    }
}

fn delta_text(spec: &MetricSpec, scaled: f64, suffix: &str) -> String {
    if spec.percent {
        format!("{:+.prec$}% {suffix}", scaled, prec = spec.decimals)
    } else {
        format!("{:+.prec$} {suffix}", scaled, prec = spec.decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_subsets_are_disjoint_and_cover_the_table() {
        let mut total = 0;
        for category in CATEGORIES {
            total += METRIC_SPECS.iter().filter(|s| s.category == category).count();
        }
        assert_eq!(total, METRIC_SPECS.len());
    }

    #[test]
    fn only_conceded_and_fouls_committed_are_inverse() {
        let inverse: Vec<Metric> = METRIC_SPECS
            .iter()
            .filter(|s| s.polarity == Polarity::Inverse)
            .map(|s| s.metric)
            .collect();
        assert_eq!(inverse, vec![Metric::GoalsConceded, Metric::FoulsCommitted]);
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio(3.0, 0.0), 0.0);
        assert_eq!(ratio(3.0, -1.0), 0.0);
        assert_eq!(ratio(3.0, 4.0), 0.75);
    }

    #[test]
    fn points_per_game_guards_zero_matches() {
        assert_eq!(points_per_game(5, 2, 0), 0.0);
        let ppg = points_per_game(20, 10, 38);
        assert!((ppg - 70.0 / 38.0).abs() < 1e-12);
    }
}
