use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of checkpoint that produced a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScannerKind {
    Bus,
    School,
}

impl ScannerKind {
    pub fn code(&self) -> &'static str {
        match self {
            ScannerKind::Bus => "bus",
            ScannerKind::School => "school",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.code()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "bus" => Some(ScannerKind::Bus),
            "school" => Some(ScannerKind::School),
            _ => None,
        }
    }
}

impl fmt::Display for ScannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
