mod common;

use common::sample_table;
use emissions_rs::menu::{ReaderChoices, ScriptedChoices, run_growth_menu};
use std::io::Cursor;

const SELECTION: [&str; 3] = ["United States", "United Kingdom", "C05"];

#[test]
fn scripted_choices_run_each_period_in_order() {
    let t = sample_table();
    let mut choices = ScriptedChoices::parse("1, 4 ;x");
    let mut out = Vec::new();
    let results = run_growth_menu(&t, &SELECTION, &mut choices, &mut out).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].period.start_year, 1785);
    // 1785 -> 1840: US 0 -> 20, UK 10 -> 40, C05 stays at zero.
    let got: Vec<(&str, f64)> = results[0]
        .growth
        .iter()
        .map(|g| (g.country.as_str(), g.delta))
        .collect();
    assert_eq!(got, [("United States", 20.0), ("United Kingdom", 30.0)]);
    assert_eq!(results[1].period.end_year, 2017);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("[Time Period Growth Menu]"));
    assert!(text.contains("Emissions (tons) created during 1785 - 1840"));
    assert!(text.contains("United Kingdom 30"));
    assert!(text.contains("Emissions (tons) created during 1951 - 2017"));
}

#[test]
fn invalid_input_reprompts_without_failing() {
    let t = sample_table();
    let mut choices = ScriptedChoices::parse("9,hello,3,x");
    let mut out = Vec::new();
    let results = run_growth_menu(&t, &SELECTION, &mut choices, &mut out).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].period.label, "WWII");

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("Please enter a valid choice..").count(), 2);
    assert_eq!(text.matches("Please choose an option: ").count(), 4);
}

#[test]
fn end_of_input_exits_like_x() {
    let t = sample_table();
    let mut choices = ReaderChoices::new(Cursor::new("2\n"));
    let mut out = Vec::new();
    let results = run_growth_menu(&t, &SELECTION, &mut choices, &mut out).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].period.start_year, 1909);
}

#[test]
fn unknown_country_aborts_the_menu() {
    let t = sample_table();
    let mut choices = ScriptedChoices::parse("1,x");
    let mut out = Vec::new();
    assert!(run_growth_menu(&t, &["Atlantis"], &mut choices, &mut out).is_err());
}
