//! Batch run record and transition enforcement.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::types::{ItemStatus, RunProgress, UploadItem};

/// Errors from batch record operations.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Batch contains no files")]
    EmptyBatch,

    #[error("No item with id {0} in this batch")]
    ItemNotFound(usize),

    #[error("Invalid transition for item {item_id}: {from:?} is terminal, cannot move to {to:?}")]
    InvalidTransition {
        item_id: usize,
        from: ItemStatus,
        to: ItemStatus,
    },
}

/// One execution of the orchestrator over a fixed list of items.
///
/// Created with every item `Pending`, mutated exclusively through
/// [`BatchRun::transition`] while active, immutable once finished.
/// Counters are maintained at transition time: `attempted_count` when an
/// item leaves `Pending`, `success_count` when an item reaches
/// `Succeeded`.
#[derive(Debug, Clone)]
pub struct BatchRun {
    id: String,
    category: String,
    items: Vec<UploadItem>,
    success_count: usize,
    attempted_count: usize,
    active: bool,
    started_at: DateTime<Utc>,
}

impl BatchRun {
    /// Creates a run with one `Pending` item per file name, in input order.
    ///
    /// Item ids are positional indexes and stay stable for the lifetime of
    /// the run.
    pub fn new(file_names: &[String], category: &str) -> Result<Self, BatchError> {
        if file_names.is_empty() {
            return Err(BatchError::EmptyBatch);
        }

        let items = file_names
            .iter()
            .enumerate()
            .map(|(id, name)| UploadItem {
                id,
                name: name.clone(),
                status: ItemStatus::Pending,
                message: String::new(),
            })
            .collect();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            category: category.to_string(),
            items,
            success_count: 0,
            attempted_count: 0,
            active: true,
            started_at: Utc::now(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Destination category shared by every item in the run.
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Moves one item to a new status and replaces its message.
    ///
    /// Terminal items reject every further transition. Counter updates
    /// happen here and nowhere else, so attempted/success counts can never
    /// drift from the item records.
    pub fn transition(
        &mut self,
        item_id: usize,
        status: ItemStatus,
        message: impl Into<String>,
    ) -> Result<(), BatchError> {
        let item = self
            .items
            .get_mut(item_id)
            .ok_or(BatchError::ItemNotFound(item_id))?;

        let from = item.status;
        if from.is_terminal() {
            return Err(BatchError::InvalidTransition {
                item_id,
                from,
                to: status,
            });
        }

        if from == ItemStatus::Pending && status != ItemStatus::Pending {
            self.attempted_count += 1;
        }
        if status == ItemStatus::Succeeded {
            self.success_count += 1;
        }

        item.status = status;
        item.message = message.into();
        Ok(())
    }

    /// Marks the run finished. The record is read-only from here on.
    pub fn finish(&mut self) {
        self.active = false;
    }

    /// Clones out a read-only snapshot of the whole run.
    pub fn progress(&self) -> RunProgress {
        RunProgress {
            run_id: self.id.clone(),
            active: self.active,
            success_count: self.success_count,
            attempted_count: self.attempted_count,
            total: self.items.len(),
            started_at: self.started_at,
            items: self.items.clone(),
        }
    }
}
