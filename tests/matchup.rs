use std::fs;
use std::path::PathBuf;

use hoops_whatif::categories::CategoryConfig;
use hoops_whatif::error::AnalysisError;
use hoops_whatif::fake_league::fake_week;
use hoops_whatif::ingest::parse_period_json;
use hoops_whatif::matchup::{Verdict, compare_teams, simulate};
use hoops_whatif::stats::{PeriodLabel, PeriodTable, StatMode, TeamPeriodStats};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn sample_week() -> PeriodTable {
    parse_period_json(&read_fixture("week_sample.json"), PeriodLabel::Week(7))
        .expect("sample week should parse")
}

#[test]
fn two_team_scenario_matches_hand_tally() {
    let table = sample_week();
    let cfg = CategoryConfig::standard();

    // A wins ftp, tpm, pts, st; B wins fgp, reb, ast, blk, to.
    let a_vs_b = compare_teams(&table, 0, 1, &cfg, StatMode::Totals)
        .unwrap()
        .unwrap();
    assert_eq!(a_vs_b.category_wins, 4);
    assert_eq!(a_vs_b.category_losses, 5);
    assert_eq!(a_vs_b.category_ties, 0);
    assert_eq!(a_vs_b.verdict, Verdict::Loss);

    let b_vs_a = compare_teams(&table, 1, 0, &cfg, StatMode::Totals)
        .unwrap()
        .unwrap();
    assert_eq!(b_vs_a.category_wins, 5);
    assert_eq!(b_vs_a.verdict, Verdict::Win);
}

#[test]
fn two_team_league_scores_one_each_way() {
    let teams = sample_week().teams()[..2].to_vec();
    let table = PeriodTable::new(PeriodLabel::Week(7), teams).unwrap();
    let rr = simulate(&table, &CategoryConfig::standard(), StatMode::Totals).unwrap();
    assert_eq!(rr.scores, vec![-1, 1]);
    assert_eq!(rr.ranked_ids(), vec!["2", "1"]);
}

#[test]
fn totals_round_robin_scores_and_ranking() {
    let table = sample_week();
    let rr = simulate(&table, &CategoryConfig::standard(), StatMode::Totals).unwrap();

    assert_eq!(rr.scores, vec![0, 3, -3, 0]);
    // Alpha and Delta tie on score; Alpha comes first in the input so it ranks first.
    assert_eq!(rr.ranked_ids(), vec!["2", "1", "4", "3"]);

    // Identical stat lines tie every category.
    let a_vs_d = rr.result(0, 3).unwrap();
    assert_eq!(a_vs_d.category_ties, 9);
    assert_eq!(a_vs_d.verdict, Verdict::Tie);

    let b_vs_c = rr.result(1, 2).unwrap();
    assert_eq!(b_vs_c.tally_label(), "9=0=0");
}

#[test]
fn per_game_mode_divides_counting_stats_only() {
    let table = sample_week();
    let rr = simulate(&table, &CategoryConfig::standard(), StatMode::PerGame).unwrap();

    // Delta matches Alpha's totals in one fewer game, so it wins every counting
    // stat but turnovers; the percentages stay tied.
    let d_vs_a = rr.result(3, 0).unwrap();
    assert_eq!(d_vs_a.category_wins, 6);
    assert_eq!(d_vs_a.category_losses, 1);
    assert_eq!(d_vs_a.category_ties, 2);

    assert_eq!(rr.scores, vec![-1, 1, -3, 3]);
    assert_eq!(rr.ranked_ids(), vec!["4", "2", "1", "3"]);
}

#[test]
fn every_pair_accounts_for_every_category() {
    let cfg = CategoryConfig::standard();
    for seed in [1u64, 2, 3] {
        let table = fake_week(10, 3, seed).unwrap();
        for mode in [StatMode::Totals, StatMode::PerGame] {
            let rr = simulate(&table, &cfg, mode).unwrap();
            for (team, row) in rr.results.iter().enumerate() {
                for (opp, res) in row.iter().enumerate() {
                    assert_eq!(
                        res.category_wins + res.category_losses + res.category_ties,
                        9
                    );
                    let mirror = rr.result(opp, team).unwrap();
                    assert_eq!(res.category_wins, mirror.category_losses);
                }
                let own = &row[team];
                assert_eq!(own.category_wins, 0);
                assert_eq!(own.category_losses, 0);
                assert_eq!(own.category_ties, 9);
                assert_eq!(own.verdict, Verdict::Tie);
            }
        }
    }
}

#[test]
fn ranking_is_stable_descending() {
    let table = fake_week(12, 5, 99).unwrap();
    let rr = simulate(&table, &CategoryConfig::standard(), StatMode::Totals).unwrap();
    for pair in rr.ranking.windows(2) {
        assert!(pair[0].score >= pair[1].score);
        if pair[0].score == pair[1].score {
            assert!(pair[0].index < pair[1].index);
        }
    }
    let total: i32 = rr.scores.iter().sum();
    assert_eq!(total, 0);
}

#[test]
fn ranked_matrix_reorders_rows_and_columns() {
    let table = sample_week();
    let rr = simulate(&table, &CategoryConfig::standard(), StatMode::Totals).unwrap();
    let matrix = rr.ranked_matrix();
    let first_row: Vec<i32> = matrix[0].iter().map(|r| r.verdict.score()).collect();
    // Bravo against Bravo, Alpha, Delta, Charlie.
    assert_eq!(first_row, vec![0, 1, 1, 1]);
}

#[test]
fn per_game_with_zero_games_is_an_error() {
    let mut teams: Vec<TeamPeriodStats> = sample_week().teams().to_vec();
    teams[2].games_played = 0;
    let table = PeriodTable::new(PeriodLabel::Week(7), teams).unwrap();
    let cfg = CategoryConfig::standard();

    assert!(simulate(&table, &cfg, StatMode::Totals).is_ok());
    let err = simulate(&table, &cfg, StatMode::PerGame).unwrap_err();
    assert!(matches!(err, AnalysisError::ZeroGamesPlayed { ref team_id } if team_id == "3"));
}

#[test]
fn custom_category_set_changes_the_tally_size() {
    let cfg = CategoryConfig::from_json(&read_fixture("categories_no_turnovers.json")).unwrap();
    let table = sample_week();
    let rr = simulate(&table, &cfg, StatMode::Totals).unwrap();
    let a_vs_b = rr.result(0, 1).unwrap();
    assert_eq!(a_vs_b.category_wins, 2);
    assert_eq!(a_vs_b.category_losses, 3);
    assert_eq!(a_vs_b.category_ties, 0);
    assert_eq!(rr.result(2, 2).unwrap().category_ties, 5);
}
