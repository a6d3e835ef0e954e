use field_runtime::{Session, parse_script};
use number_field::{FieldConfig, FieldKind, FloatField, IntegerField, NumberField, NumericDomain};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

mod common;

use common::diff_lines;

#[derive(Deserialize)]
struct Corpus {
    scenario: Vec<Scenario>,
}

#[derive(Deserialize)]
struct Scenario {
    name: String,
    config: String,
    script: String,
    expected: String,
}

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("scenarios.toml")
}

fn load_corpus() -> Corpus {
    let path = fixture_path();
    let source = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    toml::from_str(&source).unwrap_or_else(|err| panic!("bad fixture file: {err}"))
}

fn run_scenario<D: NumericDomain>(field: NumberField<D>, scenario: &Scenario) -> Vec<String> {
    let steps = parse_script(&scenario.script, field.field_id())
        .unwrap_or_else(|err| panic!("{}: {err}", scenario.name));
    let mut session = Session::new(field);
    let mut outputs = session.drain();
    for step in &steps {
        outputs.extend(session.run(step));
    }
    outputs.iter().map(|o| o.to_json_line()).collect()
}

#[test]
fn golden_scenarios() {
    let corpus = load_corpus();
    assert!(!corpus.scenario.is_empty(), "no scenarios in {}", fixture_path().display());

    let mut failures = Vec::new();
    for scenario in &corpus.scenario {
        let config = FieldConfig::from_toml_str(&scenario.config)
            .unwrap_or_else(|err| panic!("{}: {err}", scenario.name));
        let actual = match config.kind {
            FieldKind::Float => run_scenario(
                FloatField::from_config(1, &config).expect("float field"),
                scenario,
            ),
            FieldKind::Integer => run_scenario(
                IntegerField::from_config(1, &config).expect("integer field"),
                scenario,
            ),
        };
        let expected: Vec<String> = scenario
            .expected
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if expected != actual {
            failures.push(format!(
                "scenario {}\n{}",
                scenario.name,
                diff_lines(&expected, &actual)
            ));
        }
    }

    assert!(failures.is_empty(), "{}", failures.join("\n"));
}
