pub mod analyze;
pub mod generate;
pub mod launch;
pub mod secrets;

use clap::ValueEnum;

/// Record layout of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemeName {
    /// alpha, m, i, tame, d, r
    Rate,
    /// alpha, m, d, tame, c, r
    Count,
}

impl SchemeName {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemeName::Rate => "rate",
            SchemeName::Count => "count",
        }
    }
}
