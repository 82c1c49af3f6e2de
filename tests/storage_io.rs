mod common;

use common::{YEARS, sample_rows, write_csv, write_sample_csv};
use emissions_rs::menu::PeriodGrowth;
use emissions_rs::storage::{load_table, load_table_with_key, save_period_growth, save_records};
use emissions_rs::{CountryTotal, EmissionsError, Growth, TimePeriod};
use std::fs;
use tempfile::tempdir;

#[test]
fn loads_sample_with_year_columns_in_order() {
    let dir = tempdir().unwrap();
    let path = write_sample_csv(dir.path());
    let t = load_table(&path).unwrap();
    assert_eq!(t.len(), sample_rows().len());
    assert_eq!(t.years(), YEARS);
    assert_eq!(t.value("United States", "2017").unwrap(), 5000.0);
    assert_eq!(t.key_column(), "Country");
}

#[test]
fn non_year_columns_become_metadata() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("meta.csv");
    fs::write(&path, "Code,Country,2000,2001\nFRA,France,1.5,2\nDEU,Germany,3,4\n").unwrap();
    let t = load_table(&path).unwrap();
    assert_eq!(t.metadata_columns(), ["Code"]);
    assert_eq!(t.years(), ["2000", "2001"]);
    assert_eq!(t.row("Germany").unwrap().metadata, ["DEU"]);
    assert_eq!(t.column_count(), 4);
}

#[test]
fn custom_key_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("entity.csv");
    fs::write(&path, "Entity,1990\nX,1\n").unwrap();
    let t = load_table_with_key(&path, "Entity").unwrap();
    assert!(t.contains_key("X"));
    assert!(matches!(load_table(&path), Err(EmissionsError::DataAccess(_))));
}

#[test]
fn missing_or_malformed_files_are_data_access_errors() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        load_table(dir.path().join("nope.csv")),
        Err(EmissionsError::DataAccess(_))
    ));

    let no_years = dir.path().join("no_years.csv");
    fs::write(&no_years, "Country,Code\nX,XX\n").unwrap();
    assert!(matches!(load_table(&no_years), Err(EmissionsError::DataAccess(_))));

    let bad_cell = dir.path().join("bad.csv");
    fs::write(&bad_cell, "Country,2000\nX,lots\n").unwrap();
    assert!(matches!(load_table(&bad_cell), Err(EmissionsError::DataAccess(_))));

    // Parsable but not a tonnage: NaN, infinities and negative values.
    for (i, cell) in ["NaN", "inf", "-inf", "-50"].into_iter().enumerate() {
        let path = dir.path().join(format!("not_tonnage_{i}.csv"));
        fs::write(&path, format!("Country,2000,2001\nK0,1,2\nBad,{cell},1\n")).unwrap();
        match load_table(&path) {
            Err(EmissionsError::DataAccess(msg)) => {
                assert!(msg.contains("'Bad'") && msg.contains("2000"), "{msg}");
            }
            other => panic!("{cell}: expected DataAccess, got {other:?}"),
        }
    }

    let dup = write_csv(
        dir.path(),
        "dup.csv",
        &["2000"],
        &[("X".to_string(), vec![1.0]), ("X".to_string(), vec![2.0])],
    );
    assert!(matches!(load_table(&dup), Err(EmissionsError::DataAccess(_))));
}

#[test]
fn csv_export_neutralizes_formula_cells() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("totals.csv");
    let rows = vec![
        CountryTotal {
            country: "=HYPERLINK(\"x\")".into(),
            total: 1.0,
        },
        CountryTotal {
            country: "Chile".into(),
            total: -2.5,
        },
    ];
    save_records(&rows, &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "country,total");
    assert!(lines[1].starts_with("\"'=HYPERLINK"));
    // Numbers are written as numbers, not escaped.
    assert_eq!(lines[2], "Chile,-2.5");
}

#[test]
fn json_export_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("totals.json");
    let rows = vec![CountryTotal {
        country: "Peru".into(),
        total: 12.0,
    }];
    save_records(&rows, &path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(v[0]["country"], "Peru");
    assert_eq!(v[0]["total"], 12.0);
}

#[test]
fn period_growth_csv_has_one_line_per_country() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("growth.csv");
    let results = vec![PeriodGrowth {
        period: TimePeriod::wwi(),
        growth: vec![
            Growth {
                country: "A".into(),
                delta: 3.0,
            },
            Growth {
                country: "B".into(),
                delta: 1.0,
            },
        ],
    }];
    save_period_growth(&results, &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "period,start_year,end_year,country,delta");
    assert_eq!(lines[1], "WWI,1909,1923,A,3");
    assert_eq!(lines.len(), 3);
}
