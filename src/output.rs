//! Result printing for text and JSON output.

use serde::Serialize;

use launchkit_config::OutputFormat;

/// Prints command results in the configured format.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Printer {
    format: OutputFormat,
}

impl Printer {
    pub(crate) fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print `value` as pretty JSON, or hand it to `text` for the
    /// human-readable form.
    pub(crate) fn print<T, F>(&self, value: &T, text: F) -> Result<(), Box<dyn std::error::Error>>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&T),
    {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(value)?;
                println!("{}", json);
            }
            OutputFormat::Text => text(value),
        }
        Ok(())
    }

    /// Print a confirmation for a command without a payload.
    pub(crate) fn done(&self, message: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.print(&serde_json::json!({ "ok": true, "message": message }), |_| {
            println!("{}", message)
        })
    }
}

/// `-` for an absent value, as launchctl prints it.
pub(crate) fn dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
