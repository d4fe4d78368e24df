//! Error taxonomy for portal operations.

use std::time::Duration;
use thiserror::Error;

use crate::driver::DriverError;

/// Everything a portal operation can fail with.
#[derive(Debug, Error)]
pub enum PortalError {
    /// An extraction operation was invoked before a successful login.
    #[error("no authenticated session ({hint})")]
    NotReady {
        /// Remediation hint for the caller.
        hint: &'static str,
    },

    /// Login navigation completed but the portal showed its error banner.
    #[error("portal rejected the supplied credentials")]
    AuthenticationFailed,

    /// A required element never appeared within the wait budget.
    #[error("`{selector}` did not appear within {waited:?}")]
    NavigationTimeout {
        /// The selector that was waited on.
        selector: String,
        /// How long the driver waited before giving up.
        waited: Duration,
    },

    /// Rendered content broke a positional or structural assumption.
    #[error("rendered page did not match the expected shape: {0}")]
    ExtractionShape(String),

    /// The browser backend failed mid-flight.
    ///
    /// Carries the phase of the operation so callers can tell a failed
    /// login POST from a failed grid read without parsing messages.
    #[error("browser transport failure while {during}")]
    Transport {
        /// What the client was doing when the backend failed.
        during: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl PortalError {
    /// Lift a driver failure into the portal taxonomy, tagging transport
    /// failures with the operation phase.
    pub(crate) fn from_driver(err: DriverError, during: &'static str) -> Self {
        match err {
            DriverError::Timeout { selector, waited } => {
                PortalError::NavigationTimeout { selector, waited }
            }
            DriverError::Transport(source) => PortalError::Transport { during, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_lifts_to_navigation_timeout() {
        let err = PortalError::from_driver(
            DriverError::Timeout {
                selector: "#courseGrid".into(),
                waited: Duration::from_secs(30),
            },
            "loading the course grid",
        );
        assert!(matches!(err, PortalError::NavigationTimeout { ref selector, .. }
            if selector == "#courseGrid"));
    }

    #[test]
    fn transport_keeps_the_phase() {
        let err = PortalError::from_driver(
            DriverError::Transport(anyhow::anyhow!("socket closed")),
            "submitting credentials",
        );
        let msg = err.to_string();
        assert!(msg.contains("submitting credentials"), "got: {msg}");
    }
}
