#![allow(dead_code)]

use emissions_rs::filter::AGGREGATE_REGION_KEYS;
use emissions_rs::{Row, Table};
use std::path::{Path, PathBuf};

/// Year columns of the sample table; they cover every period preset.
pub const YEARS: [&str; 9] = [
    "1751", "1785", "1840", "1909", "1923", "1934", "1950", "1951", "2017",
];

/// World, the eight other aggregate regions, the three large emitters that only the
/// region view keeps, and twenty small countries `C01`..`C20`.
///
/// Country-view totals: United States 7630, United Kingdom 1130, Canada 641,
/// `Ck` = 6k for k >= 2, `C01` = 0.
pub fn sample_rows() -> Vec<(String, Vec<f64>)> {
    let mut rows = vec![(
        "World".to_string(),
        vec![0.0, 10.0, 100.0, 1000.0, 2000.0, 3000.0, 4000.0, 5000.0, 100_000.0],
    )];
    for key in AGGREGATE_REGION_KEYS.iter().filter(|k| **k != "World") {
        rows.push((key.to_string(), vec![50_000.0; YEARS.len()]));
    }
    rows.push((
        "United Kingdom".into(),
        vec![0.0, 10.0, 40.0, 100.0, 120.0, 150.0, 200.0, 210.0, 300.0],
    ));
    rows.push((
        "United States".into(),
        vec![0.0, 0.0, 20.0, 300.0, 400.0, 500.0, 700.0, 710.0, 5000.0],
    ));
    rows.push((
        "Canada".into(),
        vec![0.0, 0.0, 0.0, 10.0, 20.0, 30.0, 40.0, 41.0, 500.0],
    ));
    for k in 1..=20 {
        let v = if k == 1 { 0.0 } else { k as f64 };
        rows.push((
            format!("C{k:02}"),
            vec![0.0, 0.0, 0.0, v, v, v, v, v, v],
        ));
    }
    rows
}

pub fn table_from(years: &[&str], rows: &[(String, Vec<f64>)]) -> Table {
    Table::new(
        "Country",
        years.iter().map(|y| y.to_string()).collect(),
        Vec::new(),
        rows.iter()
            .map(|(k, v)| Row::new(k.clone(), v.clone()))
            .collect(),
    )
    .expect("valid table")
}

pub fn sample_table() -> Table {
    table_from(&YEARS, &sample_rows())
}

/// Write `rows` as an emissions CSV (`Country,<years...>`) into `dir`.
pub fn write_csv(dir: &Path, name: &str, years: &[&str], rows: &[(String, Vec<f64>)]) -> PathBuf {
    let path = dir.join(name);
    let mut wtr = csv::Writer::from_path(&path).expect("create csv");
    let mut header = vec!["Country".to_string()];
    header.extend(years.iter().map(|y| y.to_string()));
    wtr.write_record(&header).unwrap();
    for (key, values) in rows {
        let mut rec = vec![key.clone()];
        rec.extend(values.iter().map(|v| v.to_string()));
        wtr.write_record(&rec).unwrap();
    }
    wtr.flush().unwrap();
    path
}

pub fn write_sample_csv(dir: &Path) -> PathBuf {
    write_csv(dir, "emission data.csv", &YEARS, &sample_rows())
}

pub fn keys(table: &Table) -> Vec<String> {
    table.keys().map(String::from).collect()
}
