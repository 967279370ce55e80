//! Checkout service
//!
//! Turns a purchase intent into a pending enrollment and a hosted payment
//! link. The enrollment id doubles as the provider's `tx_ref`, which is how
//! the webhook finds it again.

use campus_core::{money, Caller, Course, DomainError, Enrollment, PaymentRequest};
use tracing::{info, instrument};

use crate::dto::{CheckoutRequest, CheckoutResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Checkout service
pub struct CheckoutService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CheckoutService<'a> {
    /// Create a new CheckoutService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Start a hosted payment for a paid course
    #[instrument(skip(self, caller, request), fields(user_id = %caller.user_id, course_id = %request.course_id))]
    pub async fn checkout(
        &self,
        caller: &Caller,
        request: CheckoutRequest,
    ) -> ServiceResult<CheckoutResponse> {
        let course = self
            .ctx
            .course_repo()
            .find_by_id(request.course_id)
            .await?
            .ok_or(DomainError::CourseNotFound(request.course_id))?;

        if !course.is_purchasable() {
            return Err(DomainError::CourseNotPurchasable.into());
        }

        // The price is denominated in the course currency; a buyer may echo it
        // but never pick another one.
        if let Some(code) = request.currency.as_deref() {
            let requested = money::normalize_currency(code)?;
            if requested != course.currency {
                return Err(DomainError::InvalidCurrency(requested).into());
            }
        }
        let currency = course.currency.clone();

        let enrollment = self.pending_enrollment(caller, &course, &currency).await?;

        let profile = self.ctx.profile_repo().find_by_id(caller.user_id).await?;
        let customer_email = caller
            .email()
            .map(str::to_string)
            .or_else(|| profile.as_ref().and_then(|p| p.email.clone()));
        let customer_name = profile.and_then(|p| p.full_name);

        let payment = PaymentRequest {
            tx_ref: enrollment.id.to_string(),
            amount: money::to_provider_units(enrollment.amount, &enrollment.currency),
            currency: enrollment.currency.clone(),
            customer_email,
            customer_name,
            redirect_url: self
                .ctx
                .site()
                .link(&format!("/courses/{}?payment=complete", course.id)),
            title: course.title.clone(),
        };

        let payment_url = self.ctx.payment_gateway().create_payment(&payment).await?;

        info!(
            enrollment_id = %enrollment.id,
            amount = enrollment.amount,
            currency = %enrollment.currency,
            "Checkout started"
        );

        Ok(CheckoutResponse { payment_url })
    }

    /// Reuse the caller's pending enrollment or insert a new one
    async fn pending_enrollment(
        &self,
        caller: &Caller,
        course: &Course,
        currency: &str,
    ) -> ServiceResult<Enrollment> {
        let repo = self.ctx.enrollment_repo();

        if let Some(existing) = repo.find_current(caller.user_id, course.id).await? {
            return self.refresh_pending(existing, course, currency).await;
        }

        let enrollment =
            Enrollment::pending(caller.user_id, course.id, course.price, currency.to_string());
        if repo.create(&enrollment).await? {
            return Ok(enrollment);
        }

        // Lost an insert race; continue with whichever row won.
        let winner = repo
            .find_current(caller.user_id, course.id)
            .await?
            .ok_or_else(|| ServiceError::internal("enrollment vanished after conflicting insert"))?;
        self.refresh_pending(winner, course, currency).await
    }

    async fn refresh_pending(
        &self,
        mut enrollment: Enrollment,
        course: &Course,
        currency: &str,
    ) -> ServiceResult<Enrollment> {
        if enrollment.is_active() {
            return Err(DomainError::AlreadyEnrolled.into());
        }

        if enrollment.amount != course.price || enrollment.currency != currency {
            self.ctx
                .enrollment_repo()
                .update_pending_amount(enrollment.id, course.price, currency)
                .await?;
            enrollment.amount = course.price;
            enrollment.currency = currency.to_string();
        }

        Ok(enrollment)
    }
}
