// User service: CRUD plus the behavior reconstruction entry point

use journeylens_core::{
    reconstruct_behavior, validate::{parse_date_range, validate_string, MAX_STRING_LENGTH},
    AnalyticsError, BehaviorWindow, User, UserBehavior,
};
use journeylens_storage::{CreateUser, Database, UserRow};
use std::sync::Arc;
use uuid::Uuid;

use crate::users::CreateUserRequest;

pub struct UserService {
    db: Arc<Database>,
}

impl UserService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: CreateUserRequest) -> Result<User, AnalyticsError> {
        let name = validate_string(&req.name, "name", MAX_STRING_LENGTH)?;
        let email = validate_string(&req.email, "email", MAX_STRING_LENGTH)?;
        if !email.contains('@') {
            return Err(AnalyticsError::validation("email is not a valid address"));
        }

        let row = self.db.create_user(CreateUser { name, email }).await?;
        Ok(row_to_user(row))
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<User>, AnalyticsError> {
        let row = self.db.get_user(id).await?;
        Ok(row.map(row_to_user))
    }

    pub async fn list(&self) -> Result<Vec<User>, AnalyticsError> {
        let rows = self.db.list_users().await?;
        Ok(rows.into_iter().map(row_to_user).collect())
    }

    /// Reconstruct one user's journey, optionally date-filtered.
    ///
    /// Input validation (id shape, date range) runs before any database
    /// access. `Ok(None)` means the user does not exist.
    pub async fn user_behavior(
        &self,
        user_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Option<UserBehavior>, AnalyticsError> {
        let user_id = validate_string(user_id, "userId", MAX_STRING_LENGTH)?;
        let user_id = Uuid::parse_str(&user_id)
            .map_err(|_| AnalyticsError::validation("userId is not a valid id"))?;

        let (start, end) = parse_date_range(start_date, end_date).map_err(|err| match err {
            AnalyticsError::Validation(msg) => {
                AnalyticsError::validation(format!("Date range validation failed: {msg}"))
            }
            other => other,
        })?;

        let user = match self.db.get_user(user_id).await? {
            Some(row) => row_to_user(row),
            None => return Ok(None),
        };

        // Deliberately unbounded: fetch everything, filter in memory.
        let events = self.db.events_for_user(user_id).await?;
        let sessions = self.db.sessions_for_user(user_id).await?;

        let events = events.into_iter().map(super::event::row_to_event).collect();
        let sessions = sessions
            .into_iter()
            .map(super::session::row_to_session)
            .collect();

        Ok(Some(reconstruct_behavior(
            user,
            events,
            sessions,
            &BehaviorWindow::new(start, end),
        )))
    }
}

pub(crate) fn row_to_user(row: UserRow) -> User {
    User {
        id: row.id,
        name: row.name,
        email: row.email,
        created_at: row.created_at,
    }
}
