use crate::error::{OpsError, Result};
use crate::paths;
use crate::store;
use crate::types::OpportunityStage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Subscription / StageChange
// ---------------------------------------------------------------------------

/// Recurring-revenue terms attached to a deal when the engagement is a
/// subscription rather than a one-off project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub monthly_amount: f64,
    pub term_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageChange {
    pub from: OpportunityStage,
    pub to: OpportunityStage,
    pub at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Opportunity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub name: String,
    pub company: String,
    pub stage: OpportunityStage,
    pub value: f64,
    /// Win probability in percent. Re-defaulted on stage change unless set
    /// explicitly afterwards.
    pub probability: u8,
    /// Referring affiliate, if any. Stored as a plain member ID with no
    /// referential check; readers must tolerate a dangling reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Subscription>,
    #[serde(default)]
    pub stage_history: Vec<StageChange>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Opportunity {
    pub fn new(name: impl Into<String>, company: impl Into<String>, value: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            company: company.into(),
            stage: OpportunityStage::Lead,
            value,
            probability: OpportunityStage::Lead.default_probability(),
            affiliate_id: None,
            subscription: None,
            stage_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the deal to `target`, recording the change and re-defaulting the
    /// win probability for the new stage.
    pub fn set_stage(&mut self, target: OpportunityStage) {
        if target == self.stage {
            return;
        }
        self.stage_history.push(StageChange {
            from: self.stage,
            to: target,
            at: Utc::now(),
        });
        self.stage = target;
        self.probability = target.default_probability();
        self.updated_at = Utc::now();
    }

    pub fn set_probability(&mut self, probability: u8) {
        self.probability = probability.min(100);
        self.updated_at = Utc::now();
    }

    /// Weighted value: deal value scaled by win probability.
    pub fn weighted_value(&self) -> f64 {
        self.value * f64::from(self.probability) / 100.0
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write_doc(root, paths::OPPORTUNITIES, &self.id, self)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        store::read_doc(root, paths::OPPORTUNITIES, id)?
            .ok_or_else(|| OpsError::OpportunityNotFound(id.to_string()))
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = store::list_docs(root, paths::OPPORTUNITIES)?;
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    pub fn delete(root: &Path, id: &str) -> Result<()> {
        if !store::delete_doc(root, paths::OPPORTUNITIES, id)? {
            return Err(OpsError::OpportunityNotFound(id.to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pipeline summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub open_count: usize,
    pub open_value: f64,
    pub weighted_value: f64,
    pub won_value: f64,
    pub lost_count: usize,
}

pub fn summarize(opportunities: &[Opportunity]) -> PipelineSummary {
    let mut summary = PipelineSummary {
        open_count: 0,
        open_value: 0.0,
        weighted_value: 0.0,
        won_value: 0.0,
        lost_count: 0,
    };
    for opp in opportunities {
        match opp.stage {
            OpportunityStage::ClosedWon => summary.won_value += opp.value,
            OpportunityStage::ClosedLost => summary.lost_count += 1,
            _ => {
                summary.open_count += 1;
                summary.open_value += opp.value;
                summary.weighted_value += opp.weighted_value();
            }
        }
    }
    summary
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
