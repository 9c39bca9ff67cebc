//! Parse a catalog group fetched in the usual 3-line feed format

use tleset::parse_element_sets;

const CATALOG_GROUP: &str = include_str!("../test_fixtures/catalog_group.txt");

#[test]
fn catalog_group_fixture() {
    let records = parse_element_sets(CATALOG_GROUP).unwrap();
    assert_eq!(records.len(), 2);

    for r in &records {
        assert!(!r.name.is_empty());
        assert!(!r.line1.is_empty());
        assert!(!r.line2.is_empty());
        assert_eq!(r.line1.len(), 69);
        assert_eq!(r.line2.len(), 69);
    }

    assert_eq!(records[0].name, "ISS (ZARYA)");
    assert_eq!(records[1].name, "VANGUARD 1");
}

#[test]
fn truncating_the_fixture_fails_as_a_whole() {
    let lines: Vec<&str> = CATALOG_GROUP.lines().collect();
    let truncated = lines[..lines.len() - 1].join("\n");
    assert!(parse_element_sets(&truncated).is_err());
}
