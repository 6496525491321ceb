// Session service

use journeylens_core::{AnalyticsError, Session};
use journeylens_storage::{CreateSession, Database, SessionRow};
use std::sync::Arc;
use uuid::Uuid;

use crate::sessions::CreateSessionRequest;

pub struct SessionService {
    db: Arc<Database>,
}

impl SessionService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: CreateSessionRequest) -> Result<Session, AnalyticsError> {
        let pages_visited = req.pages_visited.unwrap_or(0);
        if pages_visited < 0 {
            return Err(AnalyticsError::validation(
                "Pages visited cannot be negative",
            ));
        }
        let time_spent = req.time_spent.unwrap_or(0);
        if time_spent < 0 {
            return Err(AnalyticsError::validation("Time spent cannot be negative"));
        }

        let row = self
            .db
            .create_session(CreateSession {
                user_id: req.user_id,
                session_start: req.session_start,
                session_end: req.session_end,
                pages_visited,
                time_spent,
            })
            .await?;

        Ok(row_to_session(row))
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Session>, AnalyticsError> {
        let row = self.db.get_session(id).await?;
        Ok(row.map(row_to_session))
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Session>, AnalyticsError> {
        let rows = self.db.list_sessions(limit, offset).await?;
        Ok(rows.into_iter().map(row_to_session).collect())
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, AnalyticsError> {
        let rows = self.db.sessions_for_user(user_id).await?;
        Ok(rows.into_iter().map(row_to_session).collect())
    }
}

pub(crate) fn row_to_session(row: SessionRow) -> Session {
    Session {
        id: row.id,
        user_id: row.user_id,
        session_start: row.session_start,
        session_end: row.session_end,
        pages_visited: row.pages_visited,
        time_spent: row.time_spent,
        created_at: row.created_at,
    }
}
