//! Progress tracking across the levels of a campaign.

use std::collections::BTreeSet;

use monochrome_td_core::{LevelDefinition, LevelError, LevelId, SessionState};
use monochrome_td_system_wave_generation::stock_levels;
use thiserror::Error;
use tracing::info;

use crate::{Session, SessionConfig, SessionError, SessionSummary};

/// Errors raised when starting a campaign level.
#[derive(Debug, Error)]
pub enum CampaignError {
    /// The campaign does not contain the requested level.
    #[error("level {} is not part of the campaign", .0.get())]
    UnknownLevel(LevelId),
    /// The session could not be created.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Ordered set of levels together with the ones already cleared.
#[derive(Clone, Debug)]
pub struct Campaign {
    levels: Vec<LevelDefinition>,
    completed: BTreeSet<LevelId>,
}

impl Campaign {
    /// Creates a campaign over the provided levels with nothing cleared yet.
    #[must_use]
    pub fn new(levels: Vec<LevelDefinition>) -> Self {
        Self {
            levels,
            completed: BTreeSet::new(),
        }
    }

    /// Creates a campaign over the stock levels.
    pub fn stock() -> Result<Self, LevelError> {
        Ok(Self::new(stock_levels()?))
    }

    /// Levels in campaign order.
    #[must_use]
    pub fn levels(&self) -> &[LevelDefinition] {
        &self.levels
    }

    /// Looks a level up by identifier.
    #[must_use]
    pub fn level(&self, level: LevelId) -> Option<&LevelDefinition> {
        self.levels.iter().find(|candidate| candidate.id() == level)
    }

    /// Starts a fresh session on one of the campaign's levels.
    pub fn start(&self, level: LevelId, config: SessionConfig) -> Result<Session, CampaignError> {
        let definition = self
            .level(level)
            .cloned()
            .ok_or(CampaignError::UnknownLevel(level))?;
        Ok(Session::new(definition, config)?)
    }

    /// Records the outcome of a finished session.
    ///
    /// Returns `true` when the session newly cleared its level.
    pub fn record(&mut self, summary: &SessionSummary) -> bool {
        if summary.outcome != SessionState::Victory || self.level(summary.level).is_none() {
            return false;
        }

        let newly_cleared = self.completed.insert(summary.level);
        if newly_cleared {
            info!(
                level = summary.level.get(),
                cleared = self.completed.len(),
                total = self.levels.len(),
                "campaign level cleared"
            );
        }
        newly_cleared
    }

    /// Reports whether the level has been cleared.
    #[must_use]
    pub fn is_completed(&self, level: LevelId) -> bool {
        self.completed.contains(&level)
    }

    /// Reports whether every level of the campaign has been cleared.
    #[must_use]
    pub fn all_cleared(&self) -> bool {
        self.levels
            .iter()
            .all(|level| self.completed.contains(&level.id()))
    }
}
