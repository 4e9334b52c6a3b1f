//! JSON I/O for the CLI
//!
//! - Input: one JSON object per line on stdin
//! - Output: one JSON object per line on stdout
//! - Logs go to stderr, never stdout

use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read one non-empty line from stdin
pub fn read_request() -> CliResult<String> {
    let stdin = io::stdin();
    let mut line = String::new();

    stdin.lock().read_line(&mut line)?;

    if line.trim().is_empty() {
        return Err(CliError::bad_request("Empty input"));
    }

    Ok(line)
}

/// Iterate over non-empty stdin lines (for the serve command)
pub fn read_requests() -> impl Iterator<Item = CliResult<String>> {
    io::stdin()
        .lock()
        .lines()
        .map(|line| line.map_err(CliError::from))
        .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
}

/// Build a success response
pub fn ok_response(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// Build an error response
pub fn error_response(code: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write one response line to stdout
pub fn write_json(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shapes() {
        let ok = ok_response(json!({"book_id": 1}));
        assert_eq!(ok["status"], "ok");
        assert_eq!(ok["data"]["book_id"], 1);

        let err = error_response("BOOKVAULT_NOT_FOUND", "book 1 not found");
        assert_eq!(err["status"], "error");
        assert_eq!(err["code"], "BOOKVAULT_NOT_FOUND");
    }
}
