//! `numfield [config.toml]`
//!
//! Reads a field script from stdin and prints every listener event and
//! property update as one JSON line on stdout. Logs go to stderr and are
//! filtered through `RUST_LOG`.

use field_runtime::{Session, parse_line};
use mimalloc::MiMalloc;
use number_field::{FieldConfig, FieldKind, FloatField, IntegerField, NumberField, NumericDomain};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const FIELD_ID: u64 = 1;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match FieldConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => FieldConfig::default(),
    };

    let result = match config.kind {
        FieldKind::Float => FloatField::from_config(FIELD_ID, &config).map(run),
        FieldKind::Integer => IntegerField::from_config(FIELD_ID, &config).map(run),
    };
    match result {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(err)) => {
            log::error!("i/o error: {err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run<D: NumericDomain>(field: NumberField<D>) -> io::Result<()> {
    let mut session = Session::new(field);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for output in session.drain() {
        writeln!(out, "{}", output.to_json_line())?;
    }

    for (idx, line) in io::stdin().lock().lines().enumerate() {
        let line = line?;
        let step = match parse_line(idx + 1, &line, FIELD_ID) {
            Ok(Some(step)) => step,
            Ok(None) => continue,
            Err(err) => {
                log::warn!("{err}");
                continue;
            }
        };
        for output in session.run(&step) {
            writeln!(out, "{}", output.to_json_line())?;
        }
    }
    out.flush()
}
