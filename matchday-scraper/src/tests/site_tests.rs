use super::*;

#[test]
fn statistics_url_keeps_query() {
    assert_eq!(
        statistics_url("https://www.flashscore.pl/mecz/pilka-nozna/legia/lech/?mid=KbS1Xz5o").as_deref(),
        Some("https://www.flashscore.pl/mecz/pilka-nozna/legia/lech/szczegoly/statystyki/ogolnie/?mid=KbS1Xz5o")
    );
}

#[test]
fn statistics_url_without_trailing_slash_or_query() {
    assert_eq!(
        statistics_url("https://www.flashscore.pl/mecz/abc").as_deref(),
        Some("https://www.flashscore.pl/mecz/abc/szczegoly/statystyki/ogolnie/")
    );
}

#[test]
fn statistics_url_requires_match_path() {
    assert_eq!(statistics_url("https://www.flashscore.pl/druzyna/legia/"), None);
}

#[test]
fn match_id_prefers_mid_parameter() {
    assert_eq!(
        match_id_from_url("https://www.flashscore.pl/mecz/a/b/?mid=KbS1Xz5o").as_deref(),
        Some("KbS1Xz5o")
    );
}

#[test]
fn match_id_falls_back_to_last_segment() {
    assert_eq!(
        match_id_from_url("https://www.flashscore.pl/mecz/zF9aQ2/").as_deref(),
        Some("zF9aQ2")
    );
    assert_eq!(match_id_from_url("not a url"), None);
}

#[test]
fn season_results_url_appends_wyniki() {
    let archive = parse_url(DEFAULT_ARCHIVE_URL).unwrap();
    assert_eq!(
        season_results_url(&archive, "/pilka-nozna/polska/pko-bp-ekstraklasa-2023-2024/").unwrap(),
        "https://www.flashscore.pl/pilka-nozna/polska/pko-bp-ekstraklasa-2023-2024/wyniki/"
    );
    assert_eq!(
        season_results_url(&archive, "/pilka-nozna/polska/ekstraklasa-2010-2011").unwrap(),
        "https://www.flashscore.pl/pilka-nozna/polska/ekstraklasa-2010-2011/wyniki/"
    );
}

#[test]
fn parse_url_reports_input() {
    match parse_url("::nope") {
        Err(ScrapeError::Url { url, .. }) => assert_eq!(url, "::nope"),
        other => panic!("expected URL error, got {other:?}"),
    }
}
