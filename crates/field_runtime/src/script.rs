//! Line-oriented scripts that drive a single field.
//!
//! ```text
//! # comment
//! change 12.5        remote change event with raw text "12.5"
//! input 1            remote input event
//! blur               remote blur event with empty text
//! unparsable 1e      remote surface reports text it could not parse
//! set 3              programmatic value
//! set                programmatic clear
//! manual on          manual validation mode
//! invalid on         external write of the invalid flag
//! message Too big    external write of the error message
//! detach / attach    lifecycle
//! status             snapshot of the field
//! ```

use bus::FieldCommand;
use core_types::FieldId;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum ScriptStep {
    Command(FieldCommand),
    SetValue(Option<f64>),
    Manual(bool),
    SetInvalid(bool),
    SetErrorMessage(String),
    Status,
}

#[derive(Debug, Error, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{word}`")]
    UnknownCommand { line: usize, word: String },

    #[error("line {line}: `{text}` is not a number")]
    BadNumber { line: usize, text: String },

    #[error("line {line}: expected `on` or `off`, got `{text}`")]
    BadSwitch { line: usize, text: String },
}

pub fn parse_script(source: &str, field_id: FieldId) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        if let Some(step) = parse_line(idx + 1, line, field_id)? {
            steps.push(step);
        }
    }
    Ok(steps)
}

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(
    line_no: usize,
    line: &str,
    field_id: FieldId,
) -> Result<Option<ScriptStep>, ScriptError> {
    let line = line.trim_start();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    // Raw text is kept verbatim apart from the separator, so " 5" stays
    // distinguishable from "5".
    let text = rest.to_string();

    let step = match word {
        "input" => ScriptStep::Command(FieldCommand::Input { field_id, text }),
        "change" => ScriptStep::Command(FieldCommand::Change { field_id, text }),
        "blur" => ScriptStep::Command(FieldCommand::Blur { field_id, text }),
        "unparsable" => ScriptStep::Command(FieldCommand::UnparsableChange { field_id, text }),
        "attach" => ScriptStep::Command(FieldCommand::Attach { field_id }),
        "detach" => ScriptStep::Command(FieldCommand::Detach { field_id }),
        "set" => ScriptStep::SetValue(parse_number(line_no, rest.trim())?),
        "manual" => ScriptStep::Manual(parse_switch(line_no, rest.trim())?),
        "invalid" => ScriptStep::SetInvalid(parse_switch(line_no, rest.trim())?),
        "message" => ScriptStep::SetErrorMessage(text),
        "status" => ScriptStep::Status,
        other => {
            return Err(ScriptError::UnknownCommand {
                line: line_no,
                word: other.to_string(),
            });
        }
    };
    Ok(Some(step))
}

fn parse_number(line: usize, text: &str) -> Result<Option<f64>, ScriptError> {
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|_| ScriptError::BadNumber {
            line,
            text: text.to_string(),
        })
}

fn parse_switch(line: usize, text: &str) -> Result<bool, ScriptError> {
    match text {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(ScriptError::BadSwitch {
            line,
            text: text.to_string(),
        }),
    }
}
