//! Course catalog: list enrolled courses and resolve one by a search key.

use serde_json::Value;
use tracing::{debug, warn};

use super::{rows_from_value, rows_script, RawRow};
use crate::client::PortalConfig;
use crate::driver::PageDriver;
use crate::error::PortalError;
use crate::model::{Attendance, Course, CourseQuery, SearchKey, Term, Year};
use crate::portal;

/// Fixed column order of the catalog grid.
///
/// name, section number, semesters, teacher, room, absences, tardy, dismissal
const COURSE_COLUMNS: usize = 8;

/// List the courses shown for a year/term filter combination, in grid order.
pub(crate) async fn list(
    driver: &mut dyn PageDriver,
    config: &PortalConfig,
    year: Year,
    term: Term,
) -> Result<Vec<Course>, PortalError> {
    let lift = |e| PortalError::from_driver(e, "loading the course catalog");
    let url = format!("{}{}", config.base_url, portal::COURSES_PATH);
    debug!(%url, year = year.portal_code(), term = term.portal_code(), "listing courses");

    driver.navigate(&url).await.map_err(lift)?;
    driver
        .wait_for(portal::YEAR_SELECT, config.wait_timeout)
        .await
        .map_err(lift)?;

    // The grid re-renders after each filter change; wait for it to settle
    // before touching the next control.
    driver
        .select_option(portal::YEAR_SELECT, year.portal_code())
        .await
        .map_err(lift)?;
    driver
        .wait_for(portal::COURSE_GRID, config.wait_timeout)
        .await
        .map_err(lift)?;
    driver
        .select_option(portal::TERM_SELECT, term.portal_code())
        .await
        .map_err(lift)?;
    driver
        .wait_for(portal::COURSE_GRID, config.wait_timeout)
        .await
        .map_err(lift)?;

    let value = driver
        .evaluate(&rows_script(portal::COURSE_GRID, portal::ROW_ID_ATTR))
        .await
        .map_err(|e| PortalError::from_driver(e, "reading the course grid"))?;
    parse_course_rows(value, config.strict_rows)
}

/// Resolve a single course: first catalog entry whose searched field
/// contains the query, case-insensitively. No match is `Ok(None)`.
pub(crate) async fn resolve(
    driver: &mut dyn PageDriver,
    config: &PortalConfig,
    query: &CourseQuery,
) -> Result<Option<Course>, PortalError> {
    let courses = list(driver, config, query.year, query.term).await?;
    Ok(find_match(courses, query.key, &query.query))
}

/// Pure matching step: earliest catalog entry wins ties.
pub(crate) fn find_match(courses: Vec<Course>, key: SearchKey, query: &str) -> Option<Course> {
    let needle = query.to_lowercase();
    courses
        .into_iter()
        .find(|course| key.field(course).to_lowercase().contains(&needle))
}

/// Map raw grid rows to courses. The first row is the header; malformed
/// data rows are skipped (or propagated in strict mode).
pub(crate) fn parse_course_rows(value: Value, strict: bool) -> Result<Vec<Course>, PortalError> {
    let rows = rows_from_value(value, portal::COURSE_GRID)?;
    let mut courses = Vec::new();
    for (index, row) in rows.into_iter().enumerate().skip(1) {
        match parse_course_row(&row) {
            Ok(course) => courses.push(course),
            Err(err) if strict => return Err(err),
            Err(err) => warn!(row = index, "skipping malformed course row: {err}"),
        }
    }
    Ok(courses)
}

/// Positional mapping of one catalog row to a [`Course`].
fn parse_course_row(row: &RawRow) -> Result<Course, PortalError> {
    if row.cells.len() < COURSE_COLUMNS {
        return Err(PortalError::ExtractionShape(format!(
            "course row has {} cells, expected {COURSE_COLUMNS}",
            row.cells.len()
        )));
    }
    let section_number = row.cells[1].clone();
    Ok(Course {
        name: row.cells[0].clone(),
        element_id: row.id.clone(),
        code: Course::derive_code(&section_number),
        section_number,
        semesters: row.cells[2].clone(),
        teacher_name: row.cells[3].clone(),
        room_number: row.cells[4].clone(),
        attendance: Attendance {
            absences: row.cells[5].trim().parse().unwrap_or(0),
            tardy: row.cells[6].clone(),
            dismissal: row.cells[7].clone(),
        },
    })
}
