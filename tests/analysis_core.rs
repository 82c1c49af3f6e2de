mod common;

use common::{YEARS, sample_rows, sample_table, table_from, write_sample_csv};
use emissions_rs::analysis::{aggregate, rank};
use emissions_rs::filter::{AGGREGATE_REGION_KEYS, filter};
use emissions_rs::storage::load_table;
use emissions_rs::{CountryTotal, Direction, EmissionsError, FilterMode};
use std::collections::HashSet;
use tempfile::tempdir;

fn names(v: &[CountryTotal]) -> Vec<&str> {
    v.iter().map(|c| c.country.as_str()).collect()
}

#[test]
fn aggregate_never_reports_world() {
    let t = sample_table();
    for mode in [FilterMode::All, FilterMode::CountriesOnly, FilterMode::RegionsOnly] {
        let view = filter(&t, mode).unwrap();
        assert!(
            aggregate(&view).iter().all(|c| c.country != "World"),
            "World leaked in {mode}"
        );
    }
}

#[test]
fn aggregate_sums_every_year() {
    let t = filter(&sample_table(), FilterMode::CountriesOnly).unwrap();
    let totals = aggregate(&t);
    let us = totals.iter().find(|c| c.country == "United States").unwrap();
    assert_eq!(us.total, 7630.0);
    let c05 = totals.iter().find(|c| c.country == "C05").unwrap();
    assert_eq!(c05.total, 30.0);
    assert_eq!(totals.len(), 23);
}

#[test]
fn top_and_bottom_are_disjoint_and_monotonic() {
    let t = filter(&sample_table(), FilterMode::CountriesOnly).unwrap();
    let totals = aggregate(&t);
    let top = rank(&totals, Direction::Top, 10).unwrap();
    let bottom = rank(&totals, Direction::Bottom, 10).unwrap();
    assert_eq!(top.len(), 10);
    assert_eq!(bottom.len(), 10);

    assert_eq!(&names(&top)[..4], ["United States", "United Kingdom", "Canada", "C20"]);
    assert_eq!(&names(&bottom)[..3], ["C01", "C02", "C03"]);

    assert!(top.windows(2).all(|w| w[0].total >= w[1].total));
    assert!(bottom.windows(2).all(|w| w[0].total <= w[1].total));

    let a: HashSet<_> = names(&top).into_iter().collect();
    let b: HashSet<_> = names(&bottom).into_iter().collect();
    assert!(a.is_disjoint(&b));
}

#[test]
fn nine_totals_cannot_fill_a_selection_of_ten() {
    let totals: Vec<CountryTotal> = (0..9)
        .map(|i| CountryTotal {
            country: format!("K{i}"),
            total: i as f64,
        })
        .collect();
    match rank(&totals, Direction::Top, 10) {
        Err(EmissionsError::InsufficientData { needed, found }) => {
            assert_eq!((needed, found), (10, 9));
        }
        other => panic!("expected InsufficientData, got {other:?}"),
    }
}

#[test]
fn loading_twice_gives_identical_totals() {
    let dir = tempdir().unwrap();
    let path = write_sample_csv(dir.path());
    let a = aggregate(&load_table(&path).unwrap());
    let b = aggregate(&load_table(&path).unwrap());
    assert_eq!(a, b);
}

fn three_row_rows() -> Vec<(String, Vec<f64>)> {
    vec![
        ("World".into(), vec![4.0, 4.0, 4.0]),
        ("CountryA".into(), vec![1.0, 2.0, 3.0]),
        ("CountryB".into(), vec![3.0, 2.0, 1.0]),
    ]
}

#[test]
fn equal_totals_rank_in_row_order() {
    let t = table_from(&["1", "2", "3"], &three_row_rows());
    let totals = aggregate(&t);
    assert_eq!(
        totals,
        vec![
            CountryTotal {
                country: "CountryA".into(),
                total: 6.0
            },
            CountryTotal {
                country: "CountryB".into(),
                total: 6.0
            },
        ]
    );
    let top = rank(&totals, Direction::Top, 2).unwrap();
    assert_eq!(names(&top), ["CountryA", "CountryB"]);
    let bottom = rank(&totals, Direction::Bottom, 2).unwrap();
    assert_eq!(names(&bottom), ["CountryA", "CountryB"]);
}

#[test]
fn equal_totals_after_country_filter() {
    // The country view needs every aggregate row present, so pad the three rows with them.
    let mut rows = three_row_rows();
    for key in AGGREGATE_REGION_KEYS.iter().filter(|k| **k != "World") {
        rows.push((key.to_string(), vec![9.0, 9.0, 9.0]));
    }
    let t = table_from(&["1", "2", "3"], &rows);
    let view = filter(&t, FilterMode::CountriesOnly).unwrap();
    let totals = aggregate(&view);
    assert_eq!(names(&totals), ["CountryA", "CountryB"]);
    assert!(totals.iter().all(|c| c.total == 6.0));
    let top = rank(&totals, Direction::Top, 2).unwrap();
    assert_eq!(names(&top), ["CountryA", "CountryB"]);
}

#[test]
fn rank_leaves_input_untouched() {
    let t = table_from(&YEARS, &sample_rows());
    let totals = aggregate(&t);
    let before = totals.clone();
    let _ = rank(&totals, Direction::Bottom, 5).unwrap();
    assert_eq!(totals, before);
}
