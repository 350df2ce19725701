use crate::domain::entities::service::{RowIndex, ServiceRecord};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DeleteFlow {
    #[default]
    Idle,
    ConfirmPending(ServiceRecord),
    Deleting(ServiceRecord),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    Proceed(ServiceRecord, RowIndex),
    MissingRowIndex(ServiceRecord),
    NotPending,
}

impl DeleteFlow {
    /// Opens the confirmation step. Ignored while a delete is running.
    pub fn request(&mut self, record: ServiceRecord) {
        if !matches!(self, DeleteFlow::Deleting(_)) {
            *self = DeleteFlow::ConfirmPending(record);
        }
    }

    pub fn cancel(&mut self) {
        if matches!(self, DeleteFlow::ConfirmPending(_)) {
            *self = DeleteFlow::Idle;
        }
    }

    /// Moves to `Deleting` when the pending record still knows its row;
    /// otherwise returns to `Idle`.
    pub fn confirm(&mut self) -> ConfirmOutcome {
        if !matches!(self, DeleteFlow::ConfirmPending(_)) {
            return ConfirmOutcome::NotPending;
        }
        let DeleteFlow::ConfirmPending(record) = std::mem::take(self) else {
            return ConfirmOutcome::NotPending;
        };
        match record.row_index {
            Some(row_index) => {
                *self = DeleteFlow::Deleting(record.clone());
                ConfirmOutcome::Proceed(record, row_index)
            }
            None => ConfirmOutcome::MissingRowIndex(record),
        }
    }

    pub fn finish(&mut self) {
        *self = DeleteFlow::Idle;
    }

    pub fn pending(&self) -> Option<&ServiceRecord> {
        match self {
            DeleteFlow::Idle => None,
            DeleteFlow::ConfirmPending(record) | DeleteFlow::Deleting(record) => Some(record),
        }
    }

    pub fn is_deleting(&self) -> bool {
        matches!(self, DeleteFlow::Deleting(_))
    }
}
