//! Fixed identities of the portal's views and form fields.
//!
//! These are constants of the one portal this crate drives, not knobs: the
//! extraction layer's positional assumptions are welded to this markup.
//! Only the base URL is configurable (see `PortalConfig`).

/// Login form view.
pub const LOGIN_PATH: &str = "/portal/login";
/// Student identity view.
pub const PROFILE_PATH: &str = "/portal/student/profile";
/// Separate view carrying the GPA value.
pub const GPA_PATH: &str = "/portal/student/gpa";
/// Enrolled-course catalog view.
pub const COURSES_PATH: &str = "/portal/student/courses";

/// Account (username) input on the login form.
pub const ACCOUNT_FIELD: &str = "#fieldAccount";
/// Password input on the login form.
pub const PASSWORD_FIELD: &str = "#fieldPassword";
/// Sign-in button; clicking it triggers the login navigation.
pub const SIGN_IN_BUTTON: &str = "#btn-sign-in";
/// Error banner shown on the post-login view when credentials were rejected.
pub const LOGIN_ERROR_BANNER: &str = ".feedback-alert";

/// Container present once the profile view has rendered.
pub const PROFILE_PANEL: &str = "#studentProfile";
/// Element holding the GPA text on the GPA view.
pub const GPA_VALUE: &str = "#cumulativeGpa";

/// Year filter select on the course view.
pub const YEAR_SELECT: &str = "#selectYear";
/// Term filter select on the course view.
pub const TERM_SELECT: &str = "#selectTerm";
/// Course data grid; waited on after each filter change.
pub const COURSE_GRID: &str = "#courseGrid";

/// Grade matrix grid on the course detail view.
pub const GRADE_MATRIX: &str = "#gradeMatrix";
/// Fixed-identity input carrying the teacher's email on the detail view.
pub const TEACHER_EMAIL_FIELD: &str = "#inputTeacherEmail";
/// Fixed-identity input carrying the class size on the detail view.
pub const CLASS_SIZE_FIELD: &str = "#inputClassSize";

/// Tab control opening the assignments view from the course detail.
pub const ASSIGNMENTS_TAB: &str = "#tabAssignments";
/// Term filter select on the assignments tab.
pub const ASSIGNMENT_TERM_SELECT: &str = "#selectAssignmentTerm";
/// Assignment data grid.
pub const ASSIGNMENT_GRID: &str = "#assignmentGrid";

/// Attribute on catalog grid rows carrying the opaque row token.
pub const ROW_ID_ATTR: &str = "data-row-id";
