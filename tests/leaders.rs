use std::fs;
use std::path::PathBuf;

use hoops_whatif::categories::{Category, CategoryConfig};
use hoops_whatif::export::ascii_name;
use hoops_whatif::ingest::parse_period_json;
use hoops_whatif::leaders::{CategoryLeader, category_leaders};
use hoops_whatif::stats::{PeriodLabel, PeriodTable};

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

fn leader(leaders: &[CategoryLeader], category: Category) -> &CategoryLeader {
    leaders
        .iter()
        .find(|l| l.category == category)
        .expect("category should have a leader")
}

#[test]
fn empty_table_has_no_leaders() {
    let table = PeriodTable::new(PeriodLabel::Week(1), Vec::new()).unwrap();
    assert!(category_leaders(&table, &CategoryConfig::standard()).is_empty());
}

#[test]
fn one_leader_per_configured_category_in_config_order() {
    let leaders = category_leaders(&sample_week(), &CategoryConfig::standard());
    let cats: Vec<Category> = leaders.iter().map(|l| l.category).collect();
    assert_eq!(cats, CategoryConfig::standard().categories().collect::<Vec<_>>());
}

#[test]
fn turnovers_pick_the_minimum() {
    let leaders = category_leaders(&sample_week(), &CategoryConfig::standard());
    let to = leader(&leaders, Category::To);
    assert_eq!(to.value, 10.0);
    assert_eq!(to.winners, vec!["Bravo Buckets".to_string()]);

    let reb = leader(&leaders, Category::Reb);
    assert_eq!(reb.value, 45.0);
    assert_eq!(reb.winners, vec!["Bravo Buckets".to_string()]);
}

#[test]
fn tied_winners_keep_table_order() {
    let leaders = category_leaders(&sample_week(), &CategoryConfig::standard());
    let pts = leader(&leaders, Category::Pts);
    assert_eq!(pts.value, 100.0);
    assert_eq!(pts.winners, vec!["Alpha Ballers", "Delta Dunkers"]);

    let ftp = leader(&leaders, Category::Ftp);
    assert_eq!(ftp.value, 0.8);
    assert_eq!(ftp.winners, vec!["Alpha Ballers", "Delta Dunkers"]);

    // Reversing the table reverses the tie order.
    let mut teams = sample_week().teams().to_vec();
    teams.reverse();
    let reversed = PeriodTable::new(PeriodLabel::Week(7), teams).unwrap();
    let leaders = category_leaders(&reversed, &CategoryConfig::standard());
    assert_eq!(
        leader(&leaders, Category::Pts).winners,
        vec!["Delta Dunkers", "Alpha Ballers"]
    );
}

#[test]
fn winners_label_joins_with_pipes() {
    let leaders = category_leaders(&sample_week(), &CategoryConfig::standard());
    assert_eq!(
        leader(&leaders, Category::Pts).winners_label(),
        "Alpha Ballers | Delta Dunkers"
    );
    assert_eq!(leader(&leaders, Category::To).winners_label(), "Bravo Buckets");

    let tied = CategoryLeader {
        category: Category::Blk,
        value: 6.0,
        winners: vec![
            "Charlie\u{1F3C0}Chuckers".to_string(),
            "Bravo Buckets".to_string(),
        ],
    };
    assert_eq!(
        tied.winners_label(),
        "Charlie\u{1F3C0}Chuckers | Bravo Buckets"
    );
    assert_eq!(
        tied.winners_label_by(ascii_name),
        "CharlieChuckers | Bravo Buckets"
    );
}
