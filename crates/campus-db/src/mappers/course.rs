//! Course and lesson model -> entity mappers

use campus_core::{Course, CourseProgress, Lesson};

use crate::models::{CourseModel, LessonModel, ProgressCountsModel};

impl From<CourseModel> for Course {
    fn from(model: CourseModel) -> Self {
        Course {
            id: model.id,
            community_id: model.community_id,
            title: model.title,
            description: model.description,
            price: model.price,
            currency: model.currency,
            published: model.published,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}

impl From<LessonModel> for Lesson {
    fn from(model: LessonModel) -> Self {
        Lesson {
            id: model.id,
            course_id: model.course_id,
            title: model.title,
            position: model.position,
        }
    }
}

impl From<ProgressCountsModel> for CourseProgress {
    fn from(model: ProgressCountsModel) -> Self {
        CourseProgress {
            completed: model.completed,
            total: model.total,
        }
    }
}
