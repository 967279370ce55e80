//! # campus-db
//!
//! Database layer implementing the campus-core repository traits with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Model to entity mappers
//! - Repository implementations
//!
//! Invitation lookups by token go through the `resolve_invitation`
//! SECURITY DEFINER function so a not-yet-member can read exactly one row.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use campus_db::{create_pool, run_migrations, PgCourseRepository, PoolConfig};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new("postgres://localhost/campus")).await?;
//!     run_migrations(&pool).await?;
//!     let courses = PgCourseRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgCommunityRepository, PgCourseRepository, PgEnrollmentRepository, PgInvitationRepository,
    PgLessonRepository, PgMembershipRepository, PgNotificationRepository, PgProfileRepository,
    PgSpaceRepository,
};
