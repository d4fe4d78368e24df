//! Course detail view: teacher email, class size, and the per-category
//! grade matrix.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{catalog, cell_number};
use crate::client::PortalConfig;
use crate::driver::PageDriver;
use crate::error::PortalError;
use crate::model::{Category, CourseDetail, CourseQuery, TermGrade};
use crate::portal;

/// Shape of the detail view as the extraction script reports it.
///
/// Each category is headed by a row-span cell; that row minus its first two
/// leading cells carries the per-term weights, and the following sibling row
/// carries the per-term averages. The script hands both over as raw cell
/// text in grid order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetail {
    teacher_email: String,
    class_size: String,
    categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    name: String,
    weights: Vec<String>,
    averages: Vec<String>,
}

fn detail_script() -> String {
    format!(
        r#"(() => {{
            const grid = document.querySelector('{matrix}');
            if (!grid) return null;
            const email = document.querySelector('{email}');
            const size = document.querySelector('{size}');
            const rows = [...grid.querySelectorAll('tr')];
            const categories = [];
            for (let i = 0; i < rows.length; i++) {{
                const head = rows[i].querySelector('td[rowspan], th[rowspan]');
                if (!head) continue;
                const weights = [...rows[i].querySelectorAll('td')]
                    .slice(2).map(td => td.innerText.trim());
                const sibling = rows[i + 1];
                const averages = sibling
                    ? [...sibling.querySelectorAll('td')].map(td => td.innerText.trim())
                    : [];
                categories.push({{ name: head.innerText.trim(), weights, averages }});
            }}
            return {{
                teacherEmail: email ? email.value : '',
                classSize: size ? size.value : '',
                categories,
            }};
        }})()"#,
        matrix = portal::GRADE_MATRIX,
        email = portal::TEACHER_EMAIL_FIELD,
        size = portal::CLASS_SIZE_FIELD,
    )
}

/// Resolve the course and enrich it from its detail view.
///
/// `Ok(None)` only when the course itself did not resolve; once the course
/// is found, a shape failure on the detail view propagates.
pub(crate) async fn fetch(
    driver: &mut dyn PageDriver,
    config: &PortalConfig,
    query: &CourseQuery,
) -> Result<Option<CourseDetail>, PortalError> {
    let Some(course) = catalog::resolve(driver, config, query).await? else {
        return Ok(None);
    };

    let lift = |e| PortalError::from_driver(e, "opening the course detail view");
    let row_selector = format!("tr[{}='{}']", portal::ROW_ID_ATTR, course.element_id);
    debug!(course = %course.name, row = %course.element_id, "opening detail view");

    driver.click_nav(&row_selector).await.map_err(lift)?;
    driver
        .wait_for(portal::GRADE_MATRIX, config.wait_timeout)
        .await
        .map_err(lift)?;

    let value = driver
        .evaluate(&detail_script())
        .await
        .map_err(|e| PortalError::from_driver(e, "reading the grade matrix"))?;
    parse_detail(course, value).map(Some)
}

/// Pure mapping from the script's output to a [`CourseDetail`].
pub(crate) fn parse_detail(
    course: crate::model::Course,
    value: Value,
) -> Result<CourseDetail, PortalError> {
    if value.is_null() {
        return Err(PortalError::ExtractionShape(format!(
            "`{}` was not present on the detail view",
            portal::GRADE_MATRIX
        )));
    }
    let raw: RawDetail = serde_json::from_value(value).map_err(|e| {
        PortalError::ExtractionShape(format!("detail view did not decode: {e}"))
    })?;

    Ok(CourseDetail {
        course,
        teacher_email: raw.teacher_email,
        class_size: raw.class_size.trim().parse().unwrap_or(0),
        categories: raw.categories.into_iter().map(parse_category).collect(),
    })
}

/// Map one category's weight and average cell sequences positionally onto
/// Q1..Q4. Missing slots become NaN; extra cells are ignored.
fn parse_category(raw: RawCategory) -> Category {
    let mut terms = [TermGrade {
        weight: f64::NAN,
        average: f64::NAN,
    }; 4];
    for (i, slot) in terms.iter_mut().enumerate() {
        slot.weight = cell_number(raw.weights.get(i));
        slot.average = cell_number(raw.averages.get(i));
    }
    Category {
        name: raw.name,
        terms,
    }
}
