//! Shared clap helper types for CLI flags.

use clap::ValueEnum;
use mdcards::PageBreakPolicy;

/// Page-break strategies accepted by `--paginate`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginateArg {
    /// Measured layout height.
    Height,
    /// Character budget from `--max_chars`.
    Chars,
}

impl PaginateArg {
    pub fn policy(self, max_chars: usize) -> PageBreakPolicy {
        match self {
            PaginateArg::Height => PageBreakPolicy::Height,
            PaginateArg::Chars => PageBreakPolicy::CharBudget(max_chars),
        }
    }
}
