//! Format parameters for delimited source files.

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// How a source file is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Field delimiter byte. Defaults to `;`.
    pub separator: u8,

    /// Read `48,85` as `48.85`. Defaults to true.
    pub decimal_comma: bool,

    /// Low memory mode - trades performance for memory efficiency.
    /// Defaults to false.
    pub low_memory: bool,

    /// Rows scanned for dtype inference; `None` scans the whole file.
    ///
    /// Letter codes can appear deep into otherwise numeric columns, so the
    /// default is a full scan.
    pub infer_schema_length: Option<usize>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            separator: b';',
            decimal_comma: true,
            low_memory: false,
            infer_schema_length: None,
        }
    }
}

impl ReadOptions {
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_decimal_comma(mut self, enabled: bool) -> Self {
        self.decimal_comma = enabled;
        self
    }

    pub fn with_low_memory(mut self, enabled: bool) -> Self {
        self.low_memory = enabled;
        self
    }

    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Reject parameter combinations the parser cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.decimal_comma && self.separator == b',' {
            return Err(IngestError::InvalidOptions {
                reason: "decimal comma cannot be combined with a ',' separator".to_string(),
            });
        }
        if matches!(self.separator, b'\n' | b'\r' | b'"') {
            return Err(IngestError::InvalidOptions {
                reason: format!("separator {:?} is not usable", char::from(self.separator)),
            });
        }
        if self.infer_schema_length == Some(0) {
            return Err(IngestError::InvalidOptions {
                reason: "schema inference needs at least one row".to_string(),
            });
        }
        Ok(())
    }
}
