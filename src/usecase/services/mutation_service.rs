use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::entities::service::{ClientId, ServiceRecord, SyncState};
use crate::domain::form::row_data;
use crate::domain::schema::FieldSchema;
use crate::usecase::ports::sheet::{Mutation, MutationAck, MutationSink, SubmissionError};

pub struct MutationService {
    sink: Arc<dyn MutationSink>,
}

fn sync_for(ack: MutationAck) -> SyncState {
    match ack {
        MutationAck::Confirmed { .. } => SyncState::Confirmed,
        MutationAck::Unconfirmed => SyncState::Unconfirmed,
    }
}

impl MutationService {
    pub fn new(sink: Arc<dyn MutationSink>) -> Self {
        Self { sink }
    }

    async fn submit(&self, mutation: Mutation) -> Result<MutationAck, SubmissionError> {
        let action = mutation.action();
        let row_index = mutation.row_index().map(u32::from);
        match self.sink.submit(mutation).await {
            Ok(ack @ MutationAck::Confirmed { .. }) => {
                info!(action, ?row_index, "sheet mutation confirmed");
                Ok(ack)
            }
            Ok(MutationAck::Unconfirmed) => {
                warn!(action, ?row_index, "sheet mutation sent without acknowledgement");
                Ok(MutationAck::Unconfirmed)
            }
            Err(err) => {
                error!(action, ?row_index, error = %err, "sheet mutation failed");
                Err(err)
            }
        }
    }

    /// Inserts the draft and returns the record to prepend locally, with a
    /// fresh client id and the row the script reported, if any.
    pub async fn create(
        &self,
        schema: &FieldSchema,
        draft: &ServiceRecord,
    ) -> Result<ServiceRecord, SubmissionError> {
        let ack = self
            .submit(Mutation::Insert {
                row_data: row_data(schema, draft),
            })
            .await?;

        let mut record = draft.clone();
        record.client_id = ClientId::generate();
        record.row_index = match ack {
            MutationAck::Confirmed { row_index } => row_index,
            MutationAck::Unconfirmed => None,
        };
        record.sync = sync_for(ack);
        Ok(record)
    }

    pub async fn update(
        &self,
        schema: &FieldSchema,
        draft: &ServiceRecord,
    ) -> Result<ServiceRecord, SubmissionError> {
        let row_index = draft
            .row_index
            .ok_or(SubmissionError::MissingRowIndex("updating"))?;
        let ack = self
            .submit(Mutation::Update {
                row_index,
                row_data: row_data(schema, draft),
            })
            .await?;

        let mut record = draft.clone();
        record.sync = sync_for(ack);
        Ok(record)
    }

    pub async fn delete(&self, record: &ServiceRecord) -> Result<MutationAck, SubmissionError> {
        let row_index = record
            .row_index
            .ok_or(SubmissionError::MissingRowIndex("deleting"))?;
        self.submit(Mutation::Delete { row_index }).await
    }
}
