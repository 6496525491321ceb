// Applicant service: apply/save/withdraw actions tracked alongside events

use journeylens_core::{
    validate::{validate_string, MAX_STRING_LENGTH},
    AnalyticsError, Applicant,
};
use journeylens_storage::{ApplicantFilter, ApplicantRow, CreateApplicant, Database};
use std::sync::Arc;
use uuid::Uuid;

use crate::applicants::CreateApplicantRequest;

pub struct ApplicantService {
    db: Arc<Database>,
}

impl ApplicantService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: CreateApplicantRequest) -> Result<Applicant, AnalyticsError> {
        let action_type = validate_string(&req.action_type, "actionType", MAX_STRING_LENGTH)?;

        let row = self
            .db
            .create_applicant(CreateApplicant {
                user_id: req.user_id,
                session_id: req.session_id,
                action_type,
                item_id: req.item_id,
                status: req.status,
                timestamp: req.timestamp,
            })
            .await?;

        Ok(row_to_applicant(row))
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Applicant>, AnalyticsError> {
        let row = self.db.get_applicant(id).await?;
        Ok(row.map(row_to_applicant))
    }

    pub async fn list(&self, filter: ApplicantFilter) -> Result<Vec<Applicant>, AnalyticsError> {
        let rows = self.db.list_applicants(&filter).await?;
        Ok(rows.into_iter().map(row_to_applicant).collect())
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Applicant>, AnalyticsError> {
        let rows = self.db.applicants_for_user(user_id).await?;
        Ok(rows.into_iter().map(row_to_applicant).collect())
    }
}

fn row_to_applicant(row: ApplicantRow) -> Applicant {
    Applicant {
        id: row.id,
        user_id: row.user_id,
        session_id: row.session_id,
        action_type: row.action_type,
        item_id: row.item_id,
        status: row.status,
        timestamp: row.timestamp,
    }
}
