//! Parsing of `SPOT:KIND` tower placements given on the command line.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Context};
use monochrome_td_core::{BuildSpotId, TowerKind};

/// Tower to construct on a build spot before play begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    pub(crate) spot: BuildSpotId,
    pub(crate) kind: TowerKind,
}

impl FromStr for Placement {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (spot, kind) = value
            .split_once(':')
            .ok_or_else(|| anyhow!("expected SPOT:KIND, found `{value}`"))?;
        let spot = spot
            .trim()
            .parse::<u32>()
            .with_context(|| format!("invalid build spot `{spot}`"))?;
        let kind = match kind.trim().to_ascii_lowercase().as_str() {
            "archer" => TowerKind::Archer,
            "sap" => TowerKind::Sap,
            "rock" => TowerKind::Rock,
            other => return Err(anyhow!("unknown tower kind `{other}`")),
        };

        Ok(Self {
            spot: BuildSpotId::new(spot),
            kind,
        })
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on spot {}", self.kind.name(), self.spot.get())
    }
}
