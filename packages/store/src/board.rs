//! Pipeline kanban board.
//!
//! Columns are the pipeline's stages ordered by `order`; cards are the
//! opportunities currently in each stage. A drag ends on either a column or
//! another card, and both resolve to a target stage. Moves are applied
//! locally before the backend confirms them and reverted if it refuses.
//!
//! A card can be moved again before the backend has answered for the previous
//! move. Only the answer to the card's latest move changes what the board
//! shows; a failure then puts the card back in the last stage the backend
//! confirmed, not in the stage the failed move started from.

use std::collections::HashMap;

use api::{ApiError, Opportunity, Stage, Transport};

use crate::notice::Notice;
use crate::session::Session;

/// What the dragged card was released over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Stage(String),
    /// Another opportunity card; the move goes to that card's stage.
    Card(String),
}

/// A stage change for one opportunity.
///
/// `seq` is assigned by [`Board::apply`] and identifies the move when its
/// result comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageMove {
    pub opp_id: String,
    pub from_stage: String,
    pub to_stage: String,
    pub seq: u64,
}

/// Moves of one card that the backend has not answered yet.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    latest: u64,
    /// Stage the backend last agreed the card is in.
    confirmed_stage: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column<'a> {
    pub stage: &'a Stage,
    pub cards: Vec<&'a Opportunity>,
    pub total_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    stages: Vec<Stage>,
    opportunities: Vec<Opportunity>,
    in_flight: HashMap<String, InFlight>,
    next_seq: u64,
}

impl Board {
    pub fn new(mut stages: Vec<Stage>, opportunities: Vec<Opportunity>) -> Self {
        stages.sort_by_key(|s| s.order);
        Self {
            stages,
            opportunities,
            in_flight: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn opportunities(&self) -> &[Opportunity] {
        &self.opportunities
    }

    pub fn stage(&self, stage_id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.stage_id == stage_id)
    }

    fn opportunity(&self, opp_id: &str) -> Option<&Opportunity> {
        self.opportunities.iter().find(|o| o.opp_id == opp_id)
    }

    pub fn columns(&self) -> Vec<Column<'_>> {
        self.stages
            .iter()
            .map(|stage| {
                let cards: Vec<&Opportunity> = self
                    .opportunities
                    .iter()
                    .filter(|o| o.stage_id == stage.stage_id)
                    .collect();
                let total_value = cards.iter().map(|o| o.estimated_value).sum();
                Column {
                    stage,
                    cards,
                    total_value,
                }
            })
            .collect()
    }

    /// Work out the move for dropping `opp_id` on `target`.
    ///
    /// `None` when either side is unknown or the card already sits in the
    /// target stage.
    pub fn resolve_drop(&self, opp_id: &str, target: &DropTarget) -> Option<StageMove> {
        let card = self.opportunity(opp_id)?;
        let to_stage = match target {
            DropTarget::Stage(stage_id) => self.stage(stage_id)?.stage_id.clone(),
            DropTarget::Card(other) => self.opportunity(other)?.stage_id.clone(),
        };
        if to_stage == card.stage_id {
            return None;
        }
        Some(StageMove {
            opp_id: card.opp_id.clone(),
            from_stage: card.stage_id.clone(),
            to_stage,
            seq: 0,
        })
    }

    /// Show `mv` on the board right away and register it as the card's
    /// latest move. Returns the move stamped with its sequence number.
    pub fn apply(&mut self, mut mv: StageMove) -> StageMove {
        self.next_seq += 1;
        mv.seq = self.next_seq;
        self.in_flight
            .entry(mv.opp_id.clone())
            .and_modify(|f| f.latest = mv.seq)
            .or_insert_with(|| InFlight {
                latest: mv.seq,
                confirmed_stage: mv.from_stage.clone(),
            });
        self.set_stage(&mv.opp_id, &mv.to_stage);
        mv
    }

    /// Whether the backend still owes an answer for `opp_id`.
    pub fn is_moving(&self, opp_id: &str) -> bool {
        self.in_flight.contains_key(opp_id)
    }

    fn set_stage(&mut self, opp_id: &str, stage_id: &str) {
        if let Some(opp) = self.opportunities.iter_mut().find(|o| o.opp_id == opp_id) {
            opp.stage_id = stage_id.to_string();
        }
    }

    /// Replace a card with the server's copy after a successful update.
    pub fn replace(&mut self, updated: Opportunity) {
        if let Some(opp) = self
            .opportunities
            .iter_mut()
            .find(|o| o.opp_id == updated.opp_id)
        {
            *opp = updated;
        }
    }

    /// Take the at-risk flag from the server's copy. The stage is left alone
    /// since the card may have a move of its own in flight.
    pub fn update_risk(&mut self, updated: &Opportunity) {
        if let Some(opp) = self
            .opportunities
            .iter_mut()
            .find(|o| o.opp_id == updated.opp_id)
        {
            opp.is_at_risk = updated.is_at_risk;
            opp.at_risk_reason = updated.at_risk_reason.clone();
        }
    }

    fn stage_name<'a>(&'a self, stage_id: &'a str) -> &'a str {
        self.stage(stage_id).map_or(stage_id, |s| s.name.as_str())
    }

    /// Fold the backend's answer to `mv` into the board.
    ///
    /// For the card's latest move: keep the server's copy on success, put the
    /// card back in its last confirmed stage on failure. An answer to an
    /// older move only updates the confirmed stage and yields no notice.
    pub fn settle(&mut self, mv: &StageMove, result: Result<Opportunity, ApiError>) -> Option<Notice> {
        let Some(flight) = self.in_flight.get_mut(&mv.opp_id) else {
            tracing::debug!(opp_id = %mv.opp_id, seq = mv.seq, "ignoring answer for a settled card");
            return None;
        };
        if flight.latest != mv.seq {
            match &result {
                Ok(updated) => flight.confirmed_stage = updated.stage_id.clone(),
                Err(e) => tracing::debug!(opp_id = %mv.opp_id, seq = mv.seq, "superseded move failed: {}", e),
            }
            return None;
        }
        let confirmed_stage = flight.confirmed_stage.clone();
        self.in_flight.remove(&mv.opp_id);

        let notice = match result {
            Ok(updated) => {
                let notice = Notice::success(format!("Moved to {}", self.stage_name(&mv.to_stage)));
                self.replace(updated);
                notice
            }
            Err(e) => {
                tracing::warn!(opp_id = %mv.opp_id, "stage move failed: {}", e);
                self.set_stage(&mv.opp_id, &confirmed_stage);
                Notice::from_error(&e, "Failed to move opportunity")
            }
        };
        Some(notice)
    }
}

/// Send `mv` to the backend.
///
/// The caller applies the move to its board first so the card jumps
/// immediately, then hands the result to [`Board::settle`].
pub async fn commit_move<T: Transport>(session: &Session<T>, mv: &StageMove) -> Result<Opportunity, ApiError> {
    session.client().move_opportunity(&mv.opp_id, &mv.to_stage).await
}
