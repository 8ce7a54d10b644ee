use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Identifier for a single route dispatch, backed by ULID.
///
/// Server dispatches reuse an incoming `x-request-id` header when it parses.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct DispatchId(pub ulid::Ulid);

impl DispatchId {
    #[must_use]
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Parse from a header value; generate a fresh id when absent or invalid.
    #[must_use]
    pub fn from_header_or_new(header_value: Option<&str>) -> Self {
        header_value
            .and_then(|s| s.parse::<DispatchId>().ok())
            .unwrap_or_default()
    }
}

impl Default for DispatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DispatchId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DispatchId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = ulid::Ulid::from_string(s)?;
        Ok(DispatchId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_round_trip_and_fallback() {
        let id = DispatchId::new();
        let header = id.to_string();
        assert_eq!(DispatchId::from_header_or_new(Some(&header)), id);
        assert_ne!(DispatchId::from_header_or_new(Some("not-a-ulid")), id);
    }
}
