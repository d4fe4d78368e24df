//! Typed records extracted from the portal, plus the closed enumerations
//! used to drive its filter controls.

use serde::{Deserialize, Serialize};

/// A marking period: one of four grading quarters, or the whole year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    Q1,
    Q2,
    Q3,
    Q4,
    All,
}

impl Term {
    /// The four quarters in grid order. Category matrices are always
    /// indexed against this array.
    pub const QUARTERS: [Term; 4] = [Term::Q1, Term::Q2, Term::Q3, Term::Q4];

    /// The opaque code the portal's term filter expects.
    pub fn portal_code(self) -> &'static str {
        match self {
            Term::Q1 => "MP1",
            Term::Q2 => "MP2",
            Term::Q3 => "MP3",
            Term::Q4 => "MP4",
            Term::All => "ALL",
        }
    }
}

/// Which school year the course view should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Year {
    Current,
    Previous,
}

impl Year {
    /// The value the portal's year filter expects.
    pub fn portal_code(self) -> &'static str {
        match self {
            Year::Current => "0",
            Year::Previous => "-1",
        }
    }
}

/// Which [`Course`] field a catalog search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKey {
    CourseName,
    TeacherName,
    CourseCode,
    SectionNumber,
}

impl SearchKey {
    /// Project the searched field out of a course.
    pub fn field<'a>(&self, course: &'a Course) -> &'a str {
        match self {
            SearchKey::CourseName => &course.name,
            SearchKey::TeacherName => &course.teacher_name,
            SearchKey::CourseCode => &course.code,
            SearchKey::SectionNumber => &course.section_number,
        }
    }
}

/// A course reference: how to find the course, and which catalog view to
/// search in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseQuery {
    /// The course field to match on.
    pub key: SearchKey,
    /// Case-insensitive substring to look for in that field.
    pub query: String,
    /// Which year's catalog to search.
    pub year: Year,
    /// Which term filter to apply while listing.
    pub term: Term,
}

impl CourseQuery {
    /// A query against the current year with no term filter.
    pub fn new(key: SearchKey, query: impl Into<String>) -> Self {
        Self {
            key,
            query: query.into(),
            year: Year::Current,
            term: Term::All,
        }
    }
}

/// Outcome of a login attempt. The client keeps the authoritative copy of
/// this flag; the struct is what callers get back from `authenticate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub authenticated: bool,
}

/// Student identity fields plus the GPA from its separate view.
///
/// Every field is optional: a missing element on the profile page yields
/// `None`, never a failed record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: Option<String>,
    pub name: Option<String>,
    pub school_name: Option<String>,
    pub school_id: Option<String>,
    pub counselor: Option<String>,
    pub state_id: Option<String>,
    pub grade: Option<String>,
    pub email: Option<String>,
    pub gpa: Option<f64>,
}

/// Attendance counters from the course row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub absences: u32,
    pub tardy: String,
    pub dismissal: String,
}

/// One enrolled course, as listed in the catalog view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    /// Opaque row token from the catalog grid, used to click back into
    /// this exact row for the detail view.
    pub element_id: String,
    /// `section_number` up to the first `-`.
    pub code: String,
    pub section_number: String,
    pub semesters: String,
    pub teacher_name: String,
    pub room_number: String,
    pub attendance: Attendance,
}

impl Course {
    /// Derive the course code from a section number: everything before the
    /// first `-`, or the whole string when there is none.
    pub fn derive_code(section_number: &str) -> String {
        section_number
            .split('-')
            .next()
            .unwrap_or(section_number)
            .to_string()
    }
}

/// Weight and running average of one category in one term.
///
/// Cells the portal leaves blank parse to `NaN` rather than being omitted;
/// positional mapping means the slot always exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermGrade {
    pub weight: f64,
    pub average: f64,
}

/// A weighted grading bucket with its per-term weight/average matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Indexed in [`Term::QUARTERS`] order; always exactly four entries.
    pub terms: [TermGrade; 4],
}

impl Category {
    /// Look up the grade for a quarter. `Term::All` has no slot.
    pub fn term(&self, term: Term) -> Option<&TermGrade> {
        Term::QUARTERS
            .iter()
            .position(|&q| q == term)
            .map(|i| &self.terms[i])
    }
}

/// A course enriched with its detail view: one `Course` maps to exactly one
/// `CourseDetail`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDetail {
    pub course: Course,
    pub teacher_email: String,
    pub class_size: u32,
    pub categories: Vec<Category>,
}

/// A graded score parsed from the combined assignment score cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub percent: f64,
    /// Kept as the literal fraction text, e.g. `"5/6"`.
    pub fraction: String,
    /// Raw points with the surrounding parentheses stripped.
    pub raw: f64,
}

/// One assignment row from a course's assignments tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    /// Name of the matching grading category, or `None` when the row's
    /// category text matches none of the course's categories.
    pub category: Option<String>,
    pub date_assigned: String,
    pub date_due: String,
    /// `None` when the score cell was malformed (lenient mode keeps the
    /// row and drops only its score).
    pub score: Option<Score>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_prefix_up_to_first_dash() {
        assert_eq!(Course::derive_code("ALG2-01-S1"), "ALG2");
        assert_eq!(Course::derive_code("BIO-7"), "BIO");
    }

    #[test]
    fn code_without_dash_is_whole_section() {
        assert_eq!(Course::derive_code("GYM9"), "GYM9");
        assert_eq!(Course::derive_code(""), "");
    }

    #[test]
    fn term_codes_are_total() {
        for term in [Term::Q1, Term::Q2, Term::Q3, Term::Q4, Term::All] {
            assert!(!term.portal_code().is_empty());
        }
        assert_eq!(Term::Q2.portal_code(), "MP2");
        assert_eq!(Term::All.portal_code(), "ALL");
    }

    #[test]
    fn category_term_lookup_follows_quarter_order() {
        let cat = Category {
            name: "Homework".into(),
            terms: [
                TermGrade { weight: 10.0, average: 91.0 },
                TermGrade { weight: 20.0, average: 92.0 },
                TermGrade { weight: 30.0, average: 93.0 },
                TermGrade { weight: 40.0, average: 94.0 },
            ],
        };
        assert_eq!(cat.term(Term::Q3).map(|t| t.weight), Some(30.0));
        assert!(cat.term(Term::All).is_none());
    }

    #[test]
    fn search_key_projects_the_right_field() {
        let course = Course {
            name: "Algebra II".into(),
            element_id: "row-7".into(),
            code: "ALG2".into(),
            section_number: "ALG2-01".into(),
            semesters: "S1/S2".into(),
            teacher_name: "Rivera".into(),
            room_number: "214".into(),
            attendance: Attendance::default(),
        };
        assert_eq!(SearchKey::CourseName.field(&course), "Algebra II");
        assert_eq!(SearchKey::TeacherName.field(&course), "Rivera");
        assert_eq!(SearchKey::CourseCode.field(&course), "ALG2");
        assert_eq!(SearchKey::SectionNumber.field(&course), "ALG2-01");
    }
}
