//! Browser driver boundary.
//!
//! The client only ever talks to the portal through [`PageDriver`]: navigate,
//! wait, interact, and run a pure extraction script against the rendered
//! document. Only plain JSON data crosses this boundary — no live element
//! handles escape. A single driver holds a single page cursor, so callers
//! must serialize operations against it (the client does this with a lock).

pub mod chrome;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub use chrome::ChromeDriver;

/// Failure modes of a [`PageDriver`] call.
#[derive(Debug, Error)]
pub enum DriverError {
    /// An awaited element never appeared within the budget.
    #[error("`{selector}` did not appear within {waited:?}")]
    Timeout {
        /// The selector that was waited on.
        selector: String,
        /// How long the driver waited.
        waited: Duration,
    },

    /// Anything the backend itself failed on (launch, socket, protocol).
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// A single remote browsing cursor over the portal.
#[async_trait]
pub trait PageDriver: Send {
    /// Navigate to `url` and suspend until the load completes.
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// Suspend until `selector` matches an element, or time out.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Set the value of a form field and fire its input event.
    async fn fill_field(&mut self, selector: &str, value: &str) -> Result<(), DriverError>;

    /// Click an element that updates the current page in place.
    async fn click(&mut self, selector: &str) -> Result<(), DriverError>;

    /// Click an element and await the page navigation it triggers.
    ///
    /// This is the only sanctioned way to follow a click that leaves the
    /// current view; callers must not race a bare [`click`](Self::click)
    /// against a subsequent [`wait_for`](Self::wait_for).
    async fn click_nav(&mut self, selector: &str) -> Result<(), DriverError>;

    /// Pick an option (by value) in a select control and fire its change event.
    async fn select_option(&mut self, selector: &str, value: &str) -> Result<(), DriverError>;

    /// Run an extraction script against the rendered document and return its
    /// result as plain JSON.
    async fn evaluate(&mut self, script: &str) -> Result<Value, DriverError>;

    /// Whether `selector` currently matches an element.
    async fn element_exists(&mut self, selector: &str) -> Result<bool, DriverError>;
}

/// Quote a string for interpolation into a single-quoted JS literal.
pub(crate) fn js_quote(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}
