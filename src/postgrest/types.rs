//! Types for the table client

/// Count options for queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountOption {
    /// Exact count
    Exact,

    /// Planned count (estimated by the query planner)
    Planned,

    /// Estimated count
    Estimated,
}

impl CountOption {
    /// Convert the option to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CountOption::Exact => "exact",
            CountOption::Planned => "planned",
            CountOption::Estimated => "estimated",
        }
    }
}

/// Options for returning data from writes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReturnOption {
    /// Return representation (the written rows)
    Representation,

    /// Return nothing
    Minimal,
}

impl ReturnOption {
    /// Value for the `Prefer` header
    pub fn as_header(&self) -> &'static str {
        match self {
            ReturnOption::Representation => "return=representation",
            ReturnOption::Minimal => "return=minimal",
        }
    }
}

/// Read the total from a `Content-Range` header such as `0-9/42` or `*/0`
pub fn parse_content_range(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}
