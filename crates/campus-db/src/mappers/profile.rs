//! Profile model -> entity mapper

use campus_core::{DomainError, Profile};

use super::parse_column;
use crate::models::ProfileModel;

impl TryFrom<ProfileModel> for Profile {
    type Error = DomainError;

    fn try_from(model: ProfileModel) -> Result<Self, Self::Error> {
        Ok(Profile {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            role: parse_column("profile role", &model.role)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
