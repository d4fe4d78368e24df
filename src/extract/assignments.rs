//! Per-course assignment records, cross-referenced against the course's
//! grading categories.

use serde_json::Value;
use tracing::{debug, warn};

use super::{detail, rows_from_value, rows_script, RawRow};
use crate::client::PortalConfig;
use crate::driver::PageDriver;
use crate::error::PortalError;
use crate::model::{Assignment, Category, CourseQuery, Score, Term};
use crate::portal;

/// Fixed column order of the assignment grid.
///
/// name, category, date assigned, date due, combined score cell
const ASSIGNMENT_COLUMNS: usize = 5;

/// Fetch the assignments of a resolved course for one term filter.
///
/// `Ok(None)` when the course itself did not resolve. Fetching goes through
/// the detail view first so category names are available for
/// cross-referencing; nothing is cached between calls.
pub(crate) async fn fetch(
    driver: &mut dyn PageDriver,
    config: &PortalConfig,
    query: &CourseQuery,
    filter: Term,
) -> Result<Option<Vec<Assignment>>, PortalError> {
    let Some(course_detail) = detail::fetch(driver, config, query).await? else {
        return Ok(None);
    };

    let lift = |e| PortalError::from_driver(e, "opening the assignments tab");
    debug!(course = %course_detail.course.name, term = filter.portal_code(), "listing assignments");

    driver.click(portal::ASSIGNMENTS_TAB).await.map_err(lift)?;
    driver
        .wait_for(portal::ASSIGNMENT_GRID, config.wait_timeout)
        .await
        .map_err(lift)?;
    driver
        .select_option(portal::ASSIGNMENT_TERM_SELECT, filter.portal_code())
        .await
        .map_err(lift)?;
    driver
        .wait_for(portal::ASSIGNMENT_GRID, config.wait_timeout)
        .await
        .map_err(lift)?;

    let value = driver
        .evaluate(&rows_script(portal::ASSIGNMENT_GRID, portal::ROW_ID_ATTR))
        .await
        .map_err(|e| PortalError::from_driver(e, "reading the assignment grid"))?;
    parse_assignment_rows(value, &course_detail.categories, config.strict_rows).map(Some)
}

/// Map raw grid rows to assignments. First row is the header; malformed
/// rows are skipped (or propagated in strict mode).
pub(crate) fn parse_assignment_rows(
    value: Value,
    categories: &[Category],
    strict: bool,
) -> Result<Vec<Assignment>, PortalError> {
    let rows = rows_from_value(value, portal::ASSIGNMENT_GRID)?;
    let mut assignments = Vec::new();
    for (index, row) in rows.into_iter().enumerate().skip(1) {
        match parse_assignment_row(&row, categories, strict) {
            Ok(assignment) => assignments.push(assignment),
            Err(err) if strict => return Err(err),
            Err(err) => warn!(row = index, "skipping malformed assignment row: {err}"),
        }
    }
    Ok(assignments)
}

/// Positional mapping of one assignment row.
///
/// The category reference is an exact name match against the course's
/// categories; an unknown category text yields `None`, never an error. A
/// malformed score cell costs only this row's score in lenient mode.
fn parse_assignment_row(
    row: &RawRow,
    categories: &[Category],
    strict: bool,
) -> Result<Assignment, PortalError> {
    if row.cells.len() < ASSIGNMENT_COLUMNS {
        return Err(PortalError::ExtractionShape(format!(
            "assignment row has {} cells, expected {ASSIGNMENT_COLUMNS}",
            row.cells.len()
        )));
    }

    let category = categories
        .iter()
        .find(|c| c.name == row.cells[1])
        .map(|c| c.name.clone());

    let score = match parse_score(&row.cells[4]) {
        Ok(score) => Some(score),
        Err(err) if strict => return Err(err),
        Err(err) => {
            warn!(assignment = %row.cells[0], "dropping unparsable score: {err}");
            None
        }
    };

    Ok(Assignment {
        name: row.cells[0].clone(),
        category,
        date_assigned: row.cells[2].clone(),
        date_due: row.cells[3].clone(),
        score,
    })
}

/// Parse the combined score cell: percent, fraction, and parenthesised raw
/// points, tab-separated — e.g. `"83%\t5/6\t(83)"`.
pub(crate) fn parse_score(cell: &str) -> Result<Score, PortalError> {
    let mut parts = cell.split('\t');
    let (Some(percent), Some(fraction), Some(raw)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(PortalError::ExtractionShape(format!(
            "score cell `{cell}` has fewer than 3 tab-separated parts"
        )));
    };

    let percent = percent
        .trim()
        .trim_end_matches('%')
        .parse::<f64>()
        .map_err(|_| {
            PortalError::ExtractionShape(format!("score percent `{percent}` is not numeric"))
        })?;
    let raw = raw
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .parse::<f64>()
        .map_err(|_| {
            PortalError::ExtractionShape(format!("score raw points `{raw}` is not numeric"))
        })?;

    Ok(Score {
        percent,
        fraction: fraction.trim().to_string(),
        raw,
    })
}
