use super::*;

fn section(title: &str, lines: Vec<StatLine>) -> StatSection {
    StatSection {
        title: title.to_string(),
        lines,
    }
}

#[test]
fn translate_mapped_label() {
    assert_eq!(translate_statistic_name("Rzuty rożne"), "corner_kicks");
    assert_eq!(translate_statistic_name("Oczekiwane gole (xG)"), "xg");
}

#[test]
fn translate_unmapped_label_falls_back() {
    assert_eq!(translate_statistic_name("Foo Bar"), "foo_bar");
}

#[test]
fn translate_fallback_is_deterministic() {
    let a = translate_statistic_name("Udane  Dryblingi ");
    let b = translate_statistic_name("Udane  Dryblingi ");
    assert_eq!(a, b);
    assert_eq!(a, "udane_dryblingi");
}

#[test]
fn translate_trims_mapped_label() {
    assert_eq!(translate_statistic_name("  Faule "), "fouls");
}

#[test]
fn basic_wins_over_detailed() {
    let basic = vec![StatLine::new("Rzuty rożne", "5", "3")];
    let detailed = vec![section(
        "Ogólnie",
        vec![
            StatLine::new("Rzuty rożne", "9", "9"),
            StatLine::new("Spalone", "1", "2"),
        ],
    )];

    let row = merge_statistics(&basic, &detailed);
    assert_eq!(row.get("corner_kicks"), Some(&StatPair::new("5", "3")));
    assert_eq!(row.get("offsides"), Some(&StatPair::new("1", "2")));
    assert_eq!(row.len(), 2);
}

#[test]
fn first_detailed_section_wins() {
    let detailed = vec![
        section("Strzały", vec![StatLine::new("Strzały na bramkę", "4", "2")]),
        section("Atak", vec![StatLine::new("Strzały na bramkę", "7", "7")]),
    ];

    let row = merge_statistics(&[], &detailed);
    assert_eq!(row.get("shots_on_target"), Some(&StatPair::new("4", "2")));
}

#[test]
fn unmapped_categories_keep_their_values() {
    let basic = vec![StatLine::new("Foo Bar", "1", "0")];
    let row = merge_statistics(&basic, &[]);
    assert_eq!(row.get("foo_bar"), Some(&StatPair::new("1", "0")));
}

#[test]
fn columns_are_home_away_pairs() {
    let basic = vec![
        StatLine::new("Posiadanie piłki", "55%", "45%"),
        StatLine::new("Faule", "12", "9"),
    ];
    let row = merge_statistics(&basic, &[]);
    let columns = row.columns();
    assert_eq!(
        columns,
        vec![
            ("home_ball_possession".to_string(), "55%"),
            ("away_ball_possession".to_string(), "45%"),
            ("home_fouls".to_string(), "12"),
            ("away_fouls".to_string(), "9"),
        ]
    );
}

#[test]
fn empty_inputs_give_empty_row() {
    let row = merge_statistics(&[], &[]);
    assert!(row.is_empty());
    assert!(row.columns().is_empty());
}
