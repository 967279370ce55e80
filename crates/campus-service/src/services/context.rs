//! Service context - dependency container for services
//!
//! Holds the repositories, external provider clients and session signer
//! needed by services.

use std::sync::Arc;

use campus_common::auth::JwtService;
use campus_common::SiteConfig;
use campus_core::traits::{
    CommunityRepository, CourseRepository, EnrollmentRepository, IdentityProvider,
    InvitationRepository, LessonRepository, MembershipRepository, NotificationRepository,
    PaymentGateway, ProfileRepository, SpaceRepository,
};
use secrecy::SecretString;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cloning is cheap; every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    profile_repo: Arc<dyn ProfileRepository>,
    community_repo: Arc<dyn CommunityRepository>,
    space_repo: Arc<dyn SpaceRepository>,
    course_repo: Arc<dyn CourseRepository>,
    lesson_repo: Arc<dyn LessonRepository>,
    invitation_repo: Arc<dyn InvitationRepository>,
    membership_repo: Arc<dyn MembershipRepository>,
    enrollment_repo: Arc<dyn EnrollmentRepository>,
    notification_repo: Arc<dyn NotificationRepository>,

    // External providers
    payment_gateway: Arc<dyn PaymentGateway>,
    identity_provider: Arc<dyn IdentityProvider>,

    // Sessions and configuration
    jwt_service: Arc<JwtService>,
    site: SiteConfig,
    webhook_hash: SecretString,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    pub fn community_repo(&self) -> &dyn CommunityRepository {
        self.community_repo.as_ref()
    }

    pub fn space_repo(&self) -> &dyn SpaceRepository {
        self.space_repo.as_ref()
    }

    pub fn course_repo(&self) -> &dyn CourseRepository {
        self.course_repo.as_ref()
    }

    pub fn lesson_repo(&self) -> &dyn LessonRepository {
        self.lesson_repo.as_ref()
    }

    pub fn invitation_repo(&self) -> &dyn InvitationRepository {
        self.invitation_repo.as_ref()
    }

    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    pub fn enrollment_repo(&self) -> &dyn EnrollmentRepository {
        self.enrollment_repo.as_ref()
    }

    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    // === External providers ===

    pub fn payment_gateway(&self) -> &dyn PaymentGateway {
        self.payment_gateway.as_ref()
    }

    pub fn identity_provider(&self) -> &dyn IdentityProvider {
        self.identity_provider.as_ref()
    }

    // === Sessions and configuration ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Public site settings used to build links
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Shared secret expected in the payment webhook header
    pub fn webhook_hash(&self) -> &SecretString {
        &self.webhook_hash
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("site", &self.site.url)
            .field("repositories", &"...")
            .field("providers", &"...")
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    community_repo: Option<Arc<dyn CommunityRepository>>,
    space_repo: Option<Arc<dyn SpaceRepository>>,
    course_repo: Option<Arc<dyn CourseRepository>>,
    lesson_repo: Option<Arc<dyn LessonRepository>>,
    invitation_repo: Option<Arc<dyn InvitationRepository>>,
    membership_repo: Option<Arc<dyn MembershipRepository>>,
    enrollment_repo: Option<Arc<dyn EnrollmentRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    payment_gateway: Option<Arc<dyn PaymentGateway>>,
    identity_provider: Option<Arc<dyn IdentityProvider>>,
    jwt_service: Option<Arc<JwtService>>,
    site: Option<SiteConfig>,
    webhook_hash: Option<SecretString>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn community_repo(mut self, repo: Arc<dyn CommunityRepository>) -> Self {
        self.community_repo = Some(repo);
        self
    }

    pub fn space_repo(mut self, repo: Arc<dyn SpaceRepository>) -> Self {
        self.space_repo = Some(repo);
        self
    }

    pub fn course_repo(mut self, repo: Arc<dyn CourseRepository>) -> Self {
        self.course_repo = Some(repo);
        self
    }

    pub fn lesson_repo(mut self, repo: Arc<dyn LessonRepository>) -> Self {
        self.lesson_repo = Some(repo);
        self
    }

    pub fn invitation_repo(mut self, repo: Arc<dyn InvitationRepository>) -> Self {
        self.invitation_repo = Some(repo);
        self
    }

    pub fn membership_repo(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.membership_repo = Some(repo);
        self
    }

    pub fn enrollment_repo(mut self, repo: Arc<dyn EnrollmentRepository>) -> Self {
        self.enrollment_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn payment_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.payment_gateway = Some(gateway);
        self
    }

    pub fn identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = Some(provider);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn site(mut self, site: SiteConfig) -> Self {
        self.site = Some(site);
        self
    }

    pub fn webhook_hash(mut self, hash: SecretString) -> Self {
        self.webhook_hash = Some(hash);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            profile_repo: required(self.profile_repo, "profile_repo")?,
            community_repo: required(self.community_repo, "community_repo")?,
            space_repo: required(self.space_repo, "space_repo")?,
            course_repo: required(self.course_repo, "course_repo")?,
            lesson_repo: required(self.lesson_repo, "lesson_repo")?,
            invitation_repo: required(self.invitation_repo, "invitation_repo")?,
            membership_repo: required(self.membership_repo, "membership_repo")?,
            enrollment_repo: required(self.enrollment_repo, "enrollment_repo")?,
            notification_repo: required(self.notification_repo, "notification_repo")?,
            payment_gateway: required(self.payment_gateway, "payment_gateway")?,
            identity_provider: required(self.identity_provider, "identity_provider")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            site: required(self.site, "site")?,
            webhook_hash: required(self.webhook_hash, "webhook_hash")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_reports_missing_dependency() {
        let err = ServiceContextBuilder::new().build().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("profile_repo is required"));
    }
}
