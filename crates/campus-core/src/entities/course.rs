//! Course and lesson entities

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::money;

/// Course entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: Uuid,
    /// Courses may exist outside any community
    pub community_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    /// Stored amount (whole units for XOF, cents otherwise)
    pub price: i64,
    pub currency: String,
    pub published: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Course {
    pub fn new(title: String, price: i64, currency: String, created_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            community_id: None,
            title,
            description: None,
            price,
            currency,
            published: false,
            created_by,
            created_at: Utc::now(),
        }
    }

    pub fn in_community(mut self, community_id: Uuid) -> Self {
        self.community_id = Some(community_id);
        self
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.price == 0
    }

    /// Published and priced, so it goes through checkout
    pub fn is_purchasable(&self) -> bool {
        self.published && !self.is_free()
    }

    /// Published and free, so joining the community enrolls automatically
    pub fn is_auto_enrollable(&self) -> bool {
        self.published && self.is_free()
    }

    pub fn provider_amount(&self) -> f64 {
        money::to_provider_units(self.price, &self.currency)
    }
}

/// Lesson entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub position: i32,
}

impl Lesson {
    pub fn new(course_id: Uuid, title: String, position: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            course_id,
            title,
            position,
        }
    }
}

/// Completion record for one lesson
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonProgress {
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub completed_at: DateTime<Utc>,
}

/// Aggregate progress through a course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseProgress {
    pub completed: i64,
    pub total: i64,
}

impl CourseProgress {
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_purchase_rules() {
        let mut course = Course::new("Intro".into(), 5000, "XOF".into(), Uuid::new_v4());
        assert!(!course.is_purchasable());

        course.published = true;
        assert!(course.is_purchasable());
        assert!(!course.is_auto_enrollable());

        course.price = 0;
        assert!(course.is_free());
        assert!(course.is_auto_enrollable());
    }

    #[test]
    fn test_course_progress() {
        assert!(CourseProgress { completed: 3, total: 3 }.is_complete());
        assert!(!CourseProgress { completed: 1, total: 3 }.is_complete());
        assert!(!CourseProgress { completed: 0, total: 0 }.is_complete());
    }
}
