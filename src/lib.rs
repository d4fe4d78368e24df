//! Gradeport — headless client for a school information portal.
//!
//! Authenticates a remote browsing session and extracts structured academic
//! records: the student profile, enrolled courses, per-category grade
//! weighting, and individual assignments. The portal renders its data as
//! filterable grids, so each operation drives the session to the right
//! view, waits for the grid, and maps its rows positionally onto typed
//! records.
//!
//! Operations are ordered by construction: assignments need the course
//! detail (for category cross-referencing), the detail needs a resolved
//! course, resolution needs the catalog, and everything needs an
//! authenticated session. The client serializes all of this on one lock
//! because the underlying session has a single page cursor.
//!
//! The browser itself sits behind the [`driver::PageDriver`] trait;
//! [`driver::ChromeDriver`] is the bundled chromiumoxide backend, and tests
//! substitute scripted drivers.

pub mod client;
pub mod driver;
pub mod error;
mod extract;
pub mod model;
pub mod portal;

pub use client::{PortalClient, PortalConfig};
pub use driver::{ChromeDriver, DriverError, PageDriver};
pub use error::PortalError;
pub use model::{
    Assignment, Attendance, Category, Course, CourseDetail, CourseQuery, Score, SearchKey,
    Session, StudentProfile, Term, TermGrade, Year,
};
