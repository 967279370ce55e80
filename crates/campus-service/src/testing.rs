//! In-memory repositories and provider doubles.
//!
//! Enabled for this crate's tests and, through the `testing` feature, for
//! downstream crates that drive the HTTP layer without a database. The
//! in-memory store mirrors the uniqueness rules the Postgres schema enforces:
//! one membership per (community, user), one non-cancelled enrollment per
//! (user, course), one completion per (user, lesson).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use campus_common::{JwtService, SiteConfig};
use campus_core::{
    Caller, Community, CommunityRepository, Course, CourseProgress, CourseRepository, DomainError,
    Enrollment, EnrollmentRepository, EnrollmentStatus, GatewayResult, IdentityProvider,
    IdentityUser, Invitation, InvitationRepository, Lesson, LessonRepository, Membership,
    MembershipRepository, MembershipRole, Notification, NotificationRepository, PaymentGateway,
    PaymentRequest, PlatformRole, Profile, ProfileRepository, RepoResult, Space, SpaceRepository,
    VerifiedTransaction,
};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use secrecy::SecretString;
use uuid::Uuid;

use crate::services::ServiceContext;

pub const TEST_SITE_URL: &str = "http://localhost:3000";
pub const TEST_WEBHOOK_HASH: &str = "test-hash";
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-campus-sessions";
pub const TEST_PAYMENT_LINK: &str = "https://checkout.test/pay/abc";

// ============================================================================
// In-memory database
// ============================================================================

#[derive(Default)]
struct State {
    profiles: HashMap<Uuid, Profile>,
    communities: HashMap<Uuid, Community>,
    spaces: Vec<Space>,
    courses: HashMap<Uuid, Course>,
    lessons: HashMap<Uuid, Lesson>,
    completions: HashSet<(Uuid, Uuid)>,
    invitations: HashMap<Uuid, Invitation>,
    memberships: Vec<Membership>,
    enrollments: Vec<Enrollment>,
    notifications: Vec<Notification>,
}

impl State {
    fn has_live_enrollment(&self, user_id: Uuid, course_id: Uuid) -> bool {
        self.enrollments.iter().any(|e| {
            e.user_id == user_id && e.course_id == course_id && e.status != EnrollmentStatus::Cancelled
        })
    }
}

/// One store behind every repository trait
#[derive(Default)]
pub struct InMemoryDb {
    state: Mutex<State>,
}

impl InMemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock()
    }

    // === Inspection helpers for assertions ===

    pub fn memberships_of(&self, community_id: Uuid) -> Vec<Membership> {
        self.state()
            .memberships
            .iter()
            .filter(|m| m.community_id == community_id)
            .cloned()
            .collect()
    }

    pub fn enrollments_of(&self, user_id: Uuid) -> Vec<Enrollment> {
        self.state()
            .enrollments
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn enrollment(&self, id: Uuid) -> Option<Enrollment> {
        self.state().enrollments.iter().find(|e| e.id == id).cloned()
    }

    pub fn invitation(&self, id: Uuid) -> Option<Invitation> {
        self.state().invitations.get(&id).cloned()
    }

    pub fn notifications_of(&self, user_id: Uuid) -> Vec<Notification> {
        self.state()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Overwrite a stored invitation, e.g. to backdate its expiry
    pub fn put_invitation(&self, invitation: Invitation) {
        self.state().invitations.insert(invitation.id, invitation);
    }

    pub fn put_profile(&self, profile: Profile) {
        self.state().profiles.insert(profile.id, profile);
    }

    pub fn put_course(&self, course: Course) {
        self.state().courses.insert(course.id, course);
    }

    pub fn put_enrollment(&self, enrollment: Enrollment) {
        self.state().enrollments.push(enrollment);
    }
}

#[async_trait]
impl ProfileRepository for InMemoryDb {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Profile>> {
        Ok(self.state().profiles.get(&id).cloned())
    }

    async fn ensure(&self, profile: &Profile) -> RepoResult<Profile> {
        let mut state = self.state();
        Ok(state
            .profiles
            .entry(profile.id)
            .or_insert_with(|| profile.clone())
            .clone())
    }

    async fn update_email(&self, id: Uuid, email: &str) -> RepoResult<()> {
        let mut state = self.state();
        let profile = state
            .profiles
            .get_mut(&id)
            .ok_or(DomainError::ProfileNotFound(id))?;
        profile.email = Some(email.to_string());
        profile.updated_at = Utc::now();
        Ok(())
    }

    async fn role_of(&self, id: Uuid) -> RepoResult<Option<PlatformRole>> {
        Ok(self.state().profiles.get(&id).map(|p| p.role))
    }
}

#[async_trait]
impl CommunityRepository for InMemoryDb {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Community>> {
        Ok(self.state().communities.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Community>> {
        Ok(self
            .state()
            .communities
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn create(&self, community: &Community) -> RepoResult<()> {
        let mut state = self.state();
        if state.communities.values().any(|c| c.slug == community.slug) {
            return Err(DomainError::SlugTaken);
        }
        state.communities.insert(community.id, community.clone());
        state.memberships.push(Membership::new(
            community.id,
            community.creator_id,
            MembershipRole::Admin,
        ));
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut state = self.state();
        if state.communities.remove(&id).is_none() {
            return Err(DomainError::CommunityNotFound(id.to_string()));
        }
        state.spaces.retain(|s| s.community_id != id);
        state.memberships.retain(|m| m.community_id != id);
        state.invitations.retain(|_, i| i.community_id != id);
        state.courses.retain(|_, c| c.community_id != Some(id));
        Ok(())
    }
}

#[async_trait]
impl SpaceRepository for InMemoryDb {
    async fn create(&self, space: &Space) -> RepoResult<()> {
        self.state().spaces.push(space.clone());
        Ok(())
    }

    async fn find_by_community(&self, community_id: Uuid) -> RepoResult<Vec<Space>> {
        let mut spaces: Vec<Space> = self
            .state()
            .spaces
            .iter()
            .filter(|s| s.community_id == community_id)
            .cloned()
            .collect();
        spaces.sort_by_key(|s| (s.position, s.created_at));
        Ok(spaces)
    }
}

#[async_trait]
impl CourseRepository for InMemoryDb {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Course>> {
        Ok(self.state().courses.get(&id).cloned())
    }

    async fn create(&self, course: &Course) -> RepoResult<()> {
        self.state().courses.insert(course.id, course.clone());
        Ok(())
    }

    async fn set_published(&self, id: Uuid, published: bool) -> RepoResult<()> {
        let mut state = self.state();
        let course = state.courses.get_mut(&id).ok_or(DomainError::CourseNotFound(id))?;
        course.published = published;
        Ok(())
    }

    async fn find_free_published(&self, community_id: Uuid) -> RepoResult<Vec<Course>> {
        Ok(self
            .state()
            .courses
            .values()
            .filter(|c| c.community_id == Some(community_id) && c.is_auto_enrollable())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LessonRepository for InMemoryDb {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Lesson>> {
        Ok(self.state().lessons.get(&id).cloned())
    }

    async fn create(&self, lesson: &Lesson) -> RepoResult<()> {
        self.state().lessons.insert(lesson.id, lesson.clone());
        Ok(())
    }

    async fn record_completion(&self, user_id: Uuid, lesson_id: Uuid) -> RepoResult<()> {
        self.state().completions.insert((user_id, lesson_id));
        Ok(())
    }

    async fn progress(&self, user_id: Uuid, course_id: Uuid) -> RepoResult<CourseProgress> {
        let state = self.state();
        let lessons: Vec<Uuid> = state
            .lessons
            .values()
            .filter(|l| l.course_id == course_id)
            .map(|l| l.id)
            .collect();
        let completed = lessons
            .iter()
            .filter(|id| state.completions.contains(&(user_id, **id)))
            .count();
        Ok(CourseProgress {
            completed: completed as i64,
            total: lessons.len() as i64,
        })
    }
}

#[async_trait]
impl InvitationRepository for InMemoryDb {
    async fn create(&self, invitation: &Invitation) -> RepoResult<()> {
        let mut state = self.state();
        if state.invitations.values().any(|i| i.token == invitation.token) {
            return Err(DomainError::InvitationTokenExists);
        }
        state.invitations.insert(invitation.id, invitation.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> RepoResult<Option<Invitation>> {
        Ok(self
            .state()
            .invitations
            .values()
            .find(|i| i.token == token)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Invitation>> {
        Ok(self.state().invitations.get(&id).cloned())
    }

    async fn find_by_community(&self, community_id: Uuid) -> RepoResult<Vec<Invitation>> {
        let mut invitations: Vec<Invitation> = self
            .state()
            .invitations
            .values()
            .filter(|i| i.community_id == community_id)
            .cloned()
            .collect();
        invitations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invitations)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.state()
            .invitations
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::InvitationNotFound)
    }

    async fn mark_accepted(&self, id: Uuid, at: DateTime<Utc>) -> RepoResult<()> {
        if let Some(invitation) = self.state().invitations.get_mut(&id) {
            invitation.accepted_at = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl MembershipRepository for InMemoryDb {
    async fn find(&self, community_id: Uuid, user_id: Uuid) -> RepoResult<Option<Membership>> {
        Ok(self
            .state()
            .memberships
            .iter()
            .find(|m| m.community_id == community_id && m.user_id == user_id)
            .cloned())
    }

    async fn insert_if_absent(&self, membership: &Membership) -> RepoResult<bool> {
        let mut state = self.state();
        let exists = state
            .memberships
            .iter()
            .any(|m| m.community_id == membership.community_id && m.user_id == membership.user_id);
        if exists {
            return Ok(false);
        }
        state.memberships.push(membership.clone());
        Ok(true)
    }

    async fn find_by_community(&self, community_id: Uuid) -> RepoResult<Vec<Membership>> {
        Ok(self.memberships_of(community_id))
    }

    async fn update_role(
        &self,
        community_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
    ) -> RepoResult<()> {
        let mut state = self.state();
        let membership = state
            .memberships
            .iter_mut()
            .find(|m| m.community_id == community_id && m.user_id == user_id)
            .ok_or(DomainError::MembershipNotFound)?;
        membership.role = role;
        Ok(())
    }

    async fn delete(&self, community_id: Uuid, user_id: Uuid) -> RepoResult<()> {
        let mut state = self.state();
        let before = state.memberships.len();
        state
            .memberships
            .retain(|m| !(m.community_id == community_id && m.user_id == user_id));
        if state.memberships.len() == before {
            return Err(DomainError::MembershipNotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryDb {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Enrollment>> {
        Ok(self.enrollment(id))
    }

    async fn find_current(&self, user_id: Uuid, course_id: Uuid) -> RepoResult<Option<Enrollment>> {
        Ok(self
            .state()
            .enrollments
            .iter()
            .find(|e| {
                e.user_id == user_id
                    && e.course_id == course_id
                    && e.status != EnrollmentStatus::Cancelled
            })
            .cloned())
    }

    async fn create(&self, enrollment: &Enrollment) -> RepoResult<bool> {
        let mut state = self.state();
        if state.has_live_enrollment(enrollment.user_id, enrollment.course_id) {
            return Ok(false);
        }
        state.enrollments.push(enrollment.clone());
        Ok(true)
    }

    async fn create_many(&self, enrollments: &[Enrollment]) -> RepoResult<u64> {
        let mut state = self.state();
        let mut inserted = 0;
        for enrollment in enrollments {
            if !state.has_live_enrollment(enrollment.user_id, enrollment.course_id) {
                state.enrollments.push(enrollment.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn update_pending_amount(&self, id: Uuid, amount: i64, currency: &str) -> RepoResult<()> {
        let mut state = self.state();
        let enrollment = state
            .enrollments
            .iter_mut()
            .find(|e| e.id == id && e.status == EnrollmentStatus::Pending)
            .ok_or_else(|| DomainError::EnrollmentNotFound(id.to_string()))?;
        enrollment.amount = amount;
        enrollment.currency = currency.to_string();
        enrollment.updated_at = Utc::now();
        Ok(())
    }

    async fn activate(&self, id: Uuid, provider_transaction_id: &str) -> RepoResult<bool> {
        let mut state = self.state();
        let Some(enrollment) = state
            .enrollments
            .iter_mut()
            .find(|e| e.id == id && e.status != EnrollmentStatus::Cancelled)
        else {
            return Ok(false);
        };
        enrollment.activate(provider_transaction_id.to_string());
        Ok(true)
    }

    async fn cancel(&self, id: Uuid) -> RepoResult<()> {
        let mut state = self.state();
        let enrollment = state
            .enrollments
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| DomainError::EnrollmentNotFound(id.to_string()))?;
        enrollment.status = EnrollmentStatus::Cancelled;
        enrollment.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryDb {
    async fn create(&self, notification: &Notification) -> RepoResult<()> {
        self.state().notifications.push(notification.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: Uuid, limit: i64) -> RepoResult<Vec<Notification>> {
        let mut notifications = self.notifications_of(user_id);
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(notifications)
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        let mut state = self.state();
        let Some(notification) = state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        else {
            return Ok(false);
        };
        notification.read_at.get_or_insert_with(Utc::now);
        Ok(true)
    }
}

// ============================================================================
// Payment gateway double
// ============================================================================

/// Recorded gateway call
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    CreatePayment(PaymentRequest),
    VerifyTransaction(String),
}

#[derive(Default)]
struct GatewayState {
    verified: HashMap<String, VerifiedTransaction>,
    create_error: Option<String>,
    call_log: Vec<GatewayCall>,
}

/// Payment gateway with scripted verify results and a call log
#[derive(Default)]
pub struct MockPaymentGateway {
    inner: Mutex<GatewayState>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, GatewayState> {
        self.inner.lock()
    }

    /// Script what the verify endpoint reports for a transaction id
    pub fn set_verified(&self, transaction_id: impl Into<String>, transaction: VerifiedTransaction) {
        self.state().verified.insert(transaction_id.into(), transaction);
    }

    /// Make `create_payment` fail with a gateway error
    pub fn fail_create(&self, message: impl Into<String>) {
        self.state().create_error = Some(message.into());
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state().call_log.clone()
    }

    pub fn created_payments(&self) -> Vec<PaymentRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::CreatePayment(request) => Some(request),
                GatewayCall::VerifyTransaction(_) => None,
            })
            .collect()
    }

    /// A paid charge as the verify endpoint reports it
    pub fn successful(amount: f64, currency: &str, tx_ref: Uuid) -> VerifiedTransaction {
        VerifiedTransaction {
            response_status: "success".into(),
            status: "successful".into(),
            amount,
            currency: currency.into(),
            tx_ref: Some(tx_ref.to_string()),
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_payment(&self, request: &PaymentRequest) -> GatewayResult<String> {
        let mut state = self.state();
        state.call_log.push(GatewayCall::CreatePayment(request.clone()));
        if let Some(message) = state.create_error.clone() {
            return Err(DomainError::PaymentGatewayError(message));
        }
        Ok(TEST_PAYMENT_LINK.to_string())
    }

    async fn verify_transaction(&self, transaction_id: &str) -> GatewayResult<VerifiedTransaction> {
        let mut state = self.state();
        state
            .call_log
            .push(GatewayCall::VerifyTransaction(transaction_id.to_string()));
        state.verified.get(transaction_id).cloned().ok_or_else(|| {
            DomainError::PaymentVerificationFailed(format!("unknown transaction {transaction_id}"))
        })
    }
}

// ============================================================================
// Identity provider double
// ============================================================================

/// Identity provider that knows a fixed set of authorization codes
#[derive(Default)]
pub struct MockIdentityProvider {
    users: Mutex<HashMap<String, IdentityUser>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_code(&self, code: impl Into<String>, user: IdentityUser) {
        self.users
            .lock()
            .insert(code.into(), user);
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn exchange_code(&self, code: &str) -> GatewayResult<IdentityUser> {
        self.users
            .lock()
            .get(code)
            .cloned()
            .ok_or_else(|| DomainError::IdentityProviderError("invalid authorization code".into()))
    }
}

// ============================================================================
// Test context
// ============================================================================

/// A [`ServiceContext`] wired to in-memory doubles, plus seeding helpers
pub struct TestContext {
    pub ctx: ServiceContext,
    pub db: Arc<InMemoryDb>,
    pub gateway: Arc<MockPaymentGateway>,
    pub identity: Arc<MockIdentityProvider>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        let db = Arc::new(InMemoryDb::new());
        let gateway = Arc::new(MockPaymentGateway::new());
        let identity = Arc::new(MockIdentityProvider::new());

        let ctx = ServiceContext::builder()
            .profile_repo(db.clone())
            .community_repo(db.clone())
            .space_repo(db.clone())
            .course_repo(db.clone())
            .lesson_repo(db.clone())
            .invitation_repo(db.clone())
            .membership_repo(db.clone())
            .enrollment_repo(db.clone())
            .notification_repo(db.clone())
            .payment_gateway(gateway.clone())
            .identity_provider(identity.clone())
            .jwt_service(Arc::new(JwtService::new(TEST_JWT_SECRET, 900, 86_400)))
            .site(SiteConfig {
                url: TEST_SITE_URL.to_string(),
            })
            .webhook_hash(SecretString::new(TEST_WEBHOOK_HASH.to_string()))
            .build()
            .expect("all dependencies provided");

        Self {
            ctx,
            db,
            gateway,
            identity,
        }
    }

    /// Seed a profile and return a caller for it
    pub fn user(&self, email: &str, role: PlatformRole) -> Caller {
        let mut profile = Profile::new(Uuid::new_v4(), Some(email.to_string()), None);
        profile.role = role;
        let caller = Caller::new(profile.id, Some(email.to_string()));
        self.db.put_profile(profile);
        caller
    }

    pub fn student(&self, email: &str) -> Caller {
        self.user(email, PlatformRole::Student)
    }

    /// Seed a community owned by `owner`, with the owner's admin membership
    pub async fn community(&self, owner: &Caller, slug: &str) -> Community {
        let community = Community::new(slug.to_string(), format!("Community {slug}"), owner.user_id);
        CommunityRepository::create(self.db.as_ref(), &community)
            .await
            .expect("seed community");
        community
    }

    /// Seed a course in a community
    pub fn course(
        &self,
        community: &Community,
        price: i64,
        currency: &str,
        published: bool,
    ) -> Course {
        let mut course = Course::new(
            format!("Course {}", &Uuid::new_v4().to_string()[..8]),
            price,
            currency.to_string(),
            community.creator_id,
        )
        .in_community(community.id);
        course.published = published;
        self.db.put_course(course.clone());
        course
    }

    pub async fn lesson(&self, course: &Course, position: i32) -> Lesson {
        let lesson = Lesson::new(course.id, format!("Lesson {position}"), position);
        LessonRepository::create(self.db.as_ref(), &lesson)
            .await
            .expect("seed lesson");
        lesson
    }

    pub async fn add_member(&self, community: &Community, caller: &Caller, role: MembershipRole) {
        MembershipRepository::insert_if_absent(
            self.db.as_ref(),
            &Membership::new(community.id, caller.user_id, role),
        )
        .await
        .expect("seed membership");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_keep_one_membership() {
        let db = Arc::new(InMemoryDb::new());
        let community_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let db = Arc::clone(&db);
                tokio::spawn(async move {
                    let membership = Membership::new(community_id, user_id, MembershipRole::Member);
                    db.insert_if_absent(&membership).await.unwrap()
                })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(db.memberships_of(community_id).len(), 1);
    }
}
