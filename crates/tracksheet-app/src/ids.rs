// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

const PROGRAM_ID_PREFIX: &str = "program-";

/// Positional identifier assigned at parse time. Only stable within one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(String);

impl ProgramId {
    pub fn from_position(position: usize) -> Self {
        Self(format!("{PROGRAM_ID_PREFIX}{position}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::ProgramId;
    use anyhow::Result;

    #[test]
    fn display_matches_as_str() {
        let id = ProgramId::from_position(12);
        assert_eq!(id.to_string(), "program-12");
        assert_eq!(id.as_str(), "program-12");
    }

    #[test]
    fn serializes_as_bare_string() -> Result<()> {
        let id = ProgramId::from_position(0);
        assert_eq!(serde_json::to_string(&id)?, "\"program-0\"");
        let back: ProgramId = serde_json::from_str("\"program-0\"")?;
        assert_eq!(back, id);
        Ok(())
    }
}
