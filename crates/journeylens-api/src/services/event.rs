// Event service: validated ingestion and read paths

use journeylens_core::{
    validate::{validate_string, MAX_STRING_LENGTH},
    AnalyticsError, Event, EventType,
};
use journeylens_storage::{CreateEvent, Database, EventRow};
use std::sync::Arc;
use uuid::Uuid;

use crate::events::CreateEventRequest;

pub struct EventService {
    db: Arc<Database>,
}

impl EventService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: CreateEventRequest) -> Result<Event, AnalyticsError> {
        // Accept either `type` or the legacy `eventType` alias.
        let event_type = req
            .event_type
            .or(req.event_type_alias)
            .ok_or_else(|| AnalyticsError::validation("Either type or eventType is required"))?;

        let duration = req.duration.unwrap_or(0);
        if duration < 0 {
            return Err(AnalyticsError::validation("Duration cannot be negative"));
        }
        let purchase_count = req.purchase_count.unwrap_or(0);
        if purchase_count < 0 {
            return Err(AnalyticsError::validation(
                "Purchase count cannot be negative",
            ));
        }

        let page = req
            .page
            .as_deref()
            .map(|p| validate_string(p, "page", MAX_STRING_LENGTH))
            .transpose()?;
        let item_id = req
            .item_id
            .as_deref()
            .map(|i| validate_string(i, "itemId", MAX_STRING_LENGTH))
            .transpose()?;

        let row = self
            .db
            .create_event(CreateEvent {
                user_id: req.user_id,
                session_id: req.session_id,
                event_type: event_type.as_str().to_string(),
                page,
                item_id,
                duration,
                purchase_count,
                timestamp: req.timestamp,
                metadata: req.metadata,
            })
            .await?;

        Ok(row_to_event(row))
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Event>, AnalyticsError> {
        let row = self.db.get_event(id).await?;
        Ok(row.map(row_to_event))
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Event>, AnalyticsError> {
        let rows = self.db.list_events(limit, offset).await?;
        Ok(rows.into_iter().map(row_to_event).collect())
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Event>, AnalyticsError> {
        let rows = self.db.events_for_user(user_id).await?;
        Ok(rows.into_iter().map(row_to_event).collect())
    }

    pub async fn list_by_session(
        &self,
        session_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>, AnalyticsError> {
        let rows = self
            .db
            .list_events_by_session(session_id, limit, offset)
            .await?;
        Ok(rows.into_iter().map(row_to_event).collect())
    }
}

pub(crate) fn row_to_event(row: EventRow) -> Event {
    Event {
        id: row.id,
        user_id: row.user_id,
        session_id: row.session_id,
        event_type: EventType::from(row.event_type.as_str()),
        page: row.page,
        item_id: row.item_id,
        duration: row.duration,
        purchase_count: row.purchase_count,
        timestamp: row.timestamp,
        metadata: row.metadata,
    }
}
