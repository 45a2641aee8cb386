//! Output handling for the CLI
//!
//! - stdout carries exactly one JSON object per command, or the plain-text
//!   report when asked for
//! - logs never go to stdout

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// `{"status": "ok", "data": ...}`
pub fn success_envelope(data: Value) -> Value {
    serde_json::json!({
        "status": "ok",
        "data": data
    })
}

/// `{"status": "error", "code": ..., "message": ...}`
pub fn error_envelope(code: &str, message: &str) -> Value {
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

fn write_value(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_value(&success_envelope(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_value(&error_envelope(code, message))
}

/// Write preformatted text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelopes() {
        let ok = success_envelope(serde_json::json!([1, 2]));
        assert_eq!(ok["status"], "ok");
        assert_eq!(ok["data"][1], 2);

        let err = error_envelope("FG_CLI_CONFIG_ERROR", "bad");
        assert_eq!(err["status"], "error");
        assert_eq!(err["code"], "FG_CLI_CONFIG_ERROR");
        assert_eq!(err["message"], "bad");
    }
}
