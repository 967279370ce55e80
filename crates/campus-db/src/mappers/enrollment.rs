//! Enrollment model -> entity mapper

use campus_core::{DomainError, Enrollment};

use super::parse_column;
use crate::models::EnrollmentModel;

impl TryFrom<EnrollmentModel> for Enrollment {
    type Error = DomainError;

    fn try_from(model: EnrollmentModel) -> Result<Self, Self::Error> {
        Ok(Enrollment {
            id: model.id,
            user_id: model.user_id,
            course_id: model.course_id,
            status: parse_column("enrollment status", &model.status)?,
            provider: model.provider,
            reference: model.reference,
            provider_transaction_id: model.provider_transaction_id,
            amount: model.amount,
            currency: model.currency,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
