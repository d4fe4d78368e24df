//! The portal client: session state machine and entry point for every
//! extraction operation.
//!
//! One client owns one browsing cursor. The driver and the ready flag live
//! behind a single async lock, and every public operation holds that lock
//! end-to-end, so two navigation flows can never interleave on the same
//! session.

use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::driver::PageDriver;
use crate::error::PortalError;
use crate::extract;
use crate::model::{
    Assignment, Course, CourseDetail, CourseQuery, Session, StudentProfile, Term, Year,
};
use crate::portal;

const NOT_READY_HINT: &str =
    "call authenticate() with valid credentials before requesting records";

/// Client configuration. View paths and element identities are fixed
/// portal constants; only these knobs vary per deployment.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Portal origin, e.g. `https://sis.district.example`.
    pub base_url: String,
    /// Wait budget for every element wait; expiry surfaces as
    /// [`PortalError::NavigationTimeout`].
    pub wait_timeout: Duration,
    /// Propagate malformed grid rows instead of skipping them.
    pub strict_rows: bool,
}

impl PortalConfig {
    /// Config with the default 30s wait budget and lenient row policy.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            wait_timeout: Duration::from_secs(30),
            strict_rows: false,
        }
    }
}

struct Inner {
    driver: Box<dyn PageDriver>,
    authenticated: bool,
}

/// A stateful portal session.
///
/// Created unauthenticated; [`authenticate`](PortalClient::authenticate)
/// is the only transition to ready, and every extraction operation fails
/// with [`PortalError::NotReady`] until it succeeds. Records are recomputed
/// on every call — each operation re-navigates and re-parses, so results
/// are independently consistent, never incrementally cached.
pub struct PortalClient {
    config: PortalConfig,
    inner: Mutex<Inner>,
}

impl PortalClient {
    /// Wrap a page driver in an unauthenticated client.
    pub fn new(driver: Box<dyn PageDriver>, config: PortalConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                driver,
                authenticated: false,
            }),
        }
    }

    /// Submit credentials and classify the outcome.
    ///
    /// Drives the login form, awaits the navigation the sign-in click
    /// triggers, then inspects the resulting view: an error banner means
    /// [`PortalError::AuthenticationFailed`]; a backend failure at any step
    /// propagates as [`PortalError::Transport`] rather than being silently
    /// downgraded to an unauthenticated session. A failed attempt leaves
    /// the client unauthenticated; there is no partial state.
    pub async fn authenticate(
        &self,
        account: &str,
        secret: &str,
    ) -> Result<Session, PortalError> {
        let mut inner = self.inner.lock().await;
        // A fresh attempt always starts from the unauthenticated state.
        inner.authenticated = false;

        let url = format!("{}{}", self.config.base_url, portal::LOGIN_PATH);
        let timeout = self.config.wait_timeout;
        debug!(%url, "opening login view");

        let lift = |e| PortalError::from_driver(e, "submitting credentials");
        let driver = inner.driver.as_mut();
        driver
            .navigate(&url)
            .await
            .map_err(|e| PortalError::from_driver(e, "opening the login view"))?;
        driver
            .wait_for(portal::ACCOUNT_FIELD, timeout)
            .await
            .map_err(|e| PortalError::from_driver(e, "opening the login view"))?;
        driver
            .fill_field(portal::ACCOUNT_FIELD, account)
            .await
            .map_err(lift)?;
        driver
            .fill_field(portal::PASSWORD_FIELD, secret)
            .await
            .map_err(lift)?;
        driver.click_nav(portal::SIGN_IN_BUTTON).await.map_err(lift)?;

        let rejected = driver
            .element_exists(portal::LOGIN_ERROR_BANNER)
            .await
            .map_err(|e| PortalError::from_driver(e, "checking the login outcome"))?;
        if rejected {
            return Err(PortalError::AuthenticationFailed);
        }

        inner.authenticated = true;
        info!("portal session authenticated");
        Ok(Session {
            authenticated: true,
        })
    }

    /// Acquire the session lock, failing fast when unauthenticated.
    async fn lock_ready(&self) -> Result<MutexGuard<'_, Inner>, PortalError> {
        let inner = self.inner.lock().await;
        if !inner.authenticated {
            return Err(PortalError::NotReady {
                hint: NOT_READY_HINT,
            });
        }
        Ok(inner)
    }

    /// Read the student identity fields and GPA.
    pub async fn student_profile(&self) -> Result<StudentProfile, PortalError> {
        let mut inner = self.lock_ready().await?;
        extract::profile::fetch(inner.driver.as_mut(), &self.config).await
    }

    /// List enrolled courses for a year/term filter, in catalog order.
    pub async fn list_courses(&self, year: Year, term: Term) -> Result<Vec<Course>, PortalError> {
        let mut inner = self.lock_ready().await?;
        extract::catalog::list(inner.driver.as_mut(), &self.config, year, term).await
    }

    /// Resolve a single course by search key; `Ok(None)` when nothing in
    /// the catalog matches.
    pub async fn resolve_course(
        &self,
        query: &CourseQuery,
    ) -> Result<Option<Course>, PortalError> {
        let mut inner = self.lock_ready().await?;
        extract::catalog::resolve(inner.driver.as_mut(), &self.config, query).await
    }

    /// Resolve a course and enrich it from its detail view (teacher email,
    /// class size, grade-category matrix).
    pub async fn course_detail(
        &self,
        query: &CourseQuery,
    ) -> Result<Option<CourseDetail>, PortalError> {
        let mut inner = self.lock_ready().await?;
        extract::detail::fetch(inner.driver.as_mut(), &self.config, query).await
    }

    /// Fetch a resolved course's assignments for one term filter,
    /// cross-referenced against its grading categories. `Ok(None)` when the
    /// course did not resolve.
    pub async fn assignments(
        &self,
        query: &CourseQuery,
        filter: Term,
    ) -> Result<Option<Vec<Assignment>>, PortalError> {
        let mut inner = self.lock_ready().await?;
        extract::assignments::fetch(inner.driver.as_mut(), &self.config, query, filter).await
    }
}
