//! Student profile view plus the GPA value from its separate view.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::PortalConfig;
use crate::driver::{DriverError, PageDriver};
use crate::error::PortalError;
use crate::model::StudentProfile;
use crate::portal;

/// Labeled identity fields as the extraction script reports them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProfile {
    id: Option<String>,
    name: Option<String>,
    school_name: Option<String>,
    school_id: Option<String>,
    counselor: Option<String>,
    state_id: Option<String>,
    grade: Option<String>,
    email: Option<String>,
}

const PROFILE_SCRIPT: &str = r#"(() => {
    const read = (sel) => {
        const el = document.querySelector(sel);
        return el ? el.innerText.trim() : null;
    };
    return {
        id: read('#studentId'),
        name: read('#studentName'),
        schoolName: read('#schoolName'),
        schoolId: read('#schoolId'),
        counselor: read('#counselorName'),
        stateId: read('#stateStudentId'),
        grade: read('#gradeLevel'),
        email: read('#studentEmail'),
    };
})()"#;

/// Read the student profile, then the GPA from its own view.
///
/// Individual missing fields never fail the record; only transport and
/// whole-view failures propagate.
pub(crate) async fn fetch(
    driver: &mut dyn PageDriver,
    config: &PortalConfig,
) -> Result<StudentProfile, PortalError> {
    let lift = |e| PortalError::from_driver(e, "loading the profile view");
    let url = format!("{}{}", config.base_url, portal::PROFILE_PATH);
    debug!(%url, "reading student profile");

    driver.navigate(&url).await.map_err(lift)?;
    driver
        .wait_for(portal::PROFILE_PANEL, config.wait_timeout)
        .await
        .map_err(lift)?;

    let value = driver
        .evaluate(PROFILE_SCRIPT)
        .await
        .map_err(|e| PortalError::from_driver(e, "reading the profile fields"))?;
    let mut profile = parse_profile(value)?;

    profile.gpa = fetch_gpa(driver, config).await?;
    Ok(profile)
}

/// Read the GPA value. An absent GPA element is missing data, not a
/// failure; transport errors still propagate.
async fn fetch_gpa(
    driver: &mut dyn PageDriver,
    config: &PortalConfig,
) -> Result<Option<f64>, PortalError> {
    let url = format!("{}{}", config.base_url, portal::GPA_PATH);
    driver
        .navigate(&url)
        .await
        .map_err(|e| PortalError::from_driver(e, "loading the GPA view"))?;

    match driver.wait_for(portal::GPA_VALUE, config.wait_timeout).await {
        Ok(()) => {}
        Err(DriverError::Timeout { .. }) => {
            warn!("GPA value never rendered; leaving it unset");
            return Ok(None);
        }
        Err(err) => return Err(PortalError::from_driver(err, "loading the GPA view")),
    }

    let script = format!(
        r#"(() => {{
            const el = document.querySelector('{}');
            return el ? el.innerText.trim() : null;
        }})()"#,
        portal::GPA_VALUE
    );
    let value = driver
        .evaluate(&script)
        .await
        .map_err(|e| PortalError::from_driver(e, "reading the GPA value"))?;
    Ok(value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

/// Pure mapping from the script's output, normalising blank strings away.
pub(crate) fn parse_profile(value: Value) -> Result<StudentProfile, PortalError> {
    let raw: RawProfile = serde_json::from_value(value).map_err(|e| {
        PortalError::ExtractionShape(format!("profile view did not decode: {e}"))
    })?;
    Ok(StudentProfile {
        id: clean(raw.id),
        name: clean(raw.name),
        school_name: clean(raw.school_name),
        school_id: clean(raw.school_id),
        counselor: clean(raw.counselor),
        state_id: clean(raw.state_id),
        grade: clean(raw.grade),
        email: clean(raw.email),
        gpa: None,
    })
}

fn clean(field: Option<String>) -> Option<String> {
    field.and_then(|s| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_become_none_without_failing() {
        let value = json!({
            "id": "100234",
            "name": "Jordan Avery",
            "schoolName": "Northside High",
            "schoolId": null,
            "counselor": "   ",
            "stateId": null,
            "grade": "11",
            "email": "javery@school.example",
        });
        let profile = parse_profile(value).unwrap();
        assert_eq!(profile.id.as_deref(), Some("100234"));
        assert_eq!(profile.name.as_deref(), Some("Jordan Avery"));
        assert_eq!(profile.school_id, None);
        // Whitespace-only text is missing data too.
        assert_eq!(profile.counselor, None);
        assert_eq!(profile.grade.as_deref(), Some("11"));
        assert_eq!(profile.gpa, None);
    }
}
