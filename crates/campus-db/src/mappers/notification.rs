//! Notification model -> entity mapper

use campus_core::{DomainError, Notification};

use super::parse_column;
use crate::models::NotificationModel;

impl TryFrom<NotificationModel> for Notification {
    type Error = DomainError;

    fn try_from(model: NotificationModel) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: model.id,
            user_id: model.user_id,
            kind: parse_column("notification kind", &model.kind)?,
            title: model.title,
            body: model.body,
            link: model.link,
            created_at: model.created_at,
            read_at: model.read_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::NotificationKind;
    use chrono::Utc;
    use uuid::Uuid;

    fn model(kind: &str) -> NotificationModel {
        NotificationModel {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: kind.to_string(),
            title: "Enrollment active".to_string(),
            body: "You now have access".to_string(),
            link: None,
            created_at: Utc::now(),
            read_at: None,
        }
    }

    #[test]
    fn test_known_kind_maps() {
        let notification = Notification::try_from(model("enrollment_activated")).unwrap();
        assert_eq!(notification.kind, NotificationKind::EnrollmentActivated);
    }

    #[test]
    fn test_unknown_kind_is_database_error() {
        let err = Notification::try_from(model("party")).unwrap_err();
        assert_eq!(err.code(), "DATABASE_ERROR");
    }
}
