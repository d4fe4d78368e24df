//! End-to-end client flows against a scripted page driver.
//!
//! The fake driver answers extraction scripts with canned grid payloads
//! keyed on the grid selector each script targets, so the full
//! authenticate → list → resolve → detail → assignments pipeline runs
//! without a browser.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use gradeport::{
    CourseQuery, DriverError, PageDriver, PortalClient, PortalConfig, PortalError, SearchKey,
    Term, Year,
};

struct FakeDriver {
    reject_login: bool,
    fail_navigation: bool,
    catalog: Value,
    detail: Value,
    assignments: Value,
    profile: Value,
    gpa: Value,
}

impl FakeDriver {
    fn portal() -> Self {
        Self {
            reject_login: false,
            fail_navigation: false,
            catalog: json!([
                { "id": "", "cells": ["Course", "Section", "Sem", "Teacher", "Room", "Abs", "Tardy", "Dis"] },
                { "id": "row-1", "cells": ["Algebra II", "ALG2-01", "S1/S2", "Rivera", "214", "2", "1", "0"] },
                { "id": "row-2", "cells": ["Biology", "BIO-03", "S1/S2", "Okafor", "108", "0", "0", "0"] },
                { "id": "row-3", "cells": ["English 11", "ENG11-02", "S1/S2", "Whitfield", "301", "1", "0", "0"] },
                { "id": "row-4", "cells": ["US History", "HIST-05", "S1/S2", "Rivera", "117", "0", "2", "1"] },
                { "id": "row-5", "cells": ["Band", "BAND9", "S1", "Ellis", "Aud", "3", "0", "0"] },
            ]),
            detail: json!({
                "teacherEmail": "rivera@northside.example",
                "classSize": "27",
                "categories": [
                    { "name": "Homework", "weights": ["10", "10", "10", "10"],
                      "averages": ["91", "88", "95", "90"] },
                    { "name": "Tests", "weights": ["40", "40", "40", "40"],
                      "averages": ["84", "81", "86", "88"] },
                ],
            }),
            assignments: json!([
                { "cells": ["Name", "Category", "Assigned", "Due", "Score"] },
                { "cells": ["Quiz 3", "Tests", "01/10", "01/12", "83%\t5/6\t(83)"] },
                { "cells": ["Worksheet 7", "Homework", "01/11", "01/11", "100%\t4/4\t(4)"] },
                { "cells": ["Lab Notebook", "Participation", "01/13", "01/20", "90%\t9/10\t(9)"] },
            ]),
            profile: json!({
                "id": "100234",
                "name": "Jordan Avery",
                "schoolName": "Northside High",
                "schoolId": "NHS",
                "counselor": "M. Donnelly",
                "stateId": null,
                "grade": "11",
                "email": "javery@school.example",
            }),
            gpa: json!("3.72"),
        }
    }

    fn transport_err() -> DriverError {
        DriverError::Transport(anyhow::anyhow!("connection reset by portal"))
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn navigate(&mut self, _url: &str) -> Result<(), DriverError> {
        if self.fail_navigation {
            return Err(Self::transport_err());
        }
        Ok(())
    }

    async fn wait_for(&mut self, _selector: &str, _timeout: Duration) -> Result<(), DriverError> {
        Ok(())
    }

    async fn fill_field(&mut self, _selector: &str, _value: &str) -> Result<(), DriverError> {
        Ok(())
    }

    async fn click(&mut self, _selector: &str) -> Result<(), DriverError> {
        Ok(())
    }

    async fn click_nav(&mut self, _selector: &str) -> Result<(), DriverError> {
        Ok(())
    }

    async fn select_option(&mut self, _selector: &str, _value: &str) -> Result<(), DriverError> {
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<Value, DriverError> {
        if script.contains("#assignmentGrid") {
            Ok(self.assignments.clone())
        } else if script.contains("#gradeMatrix") {
            Ok(self.detail.clone())
        } else if script.contains("#courseGrid") {
            Ok(self.catalog.clone())
        } else if script.contains("#studentId") {
            Ok(self.profile.clone())
        } else if script.contains("#cumulativeGpa") {
            Ok(self.gpa.clone())
        } else {
            Ok(Value::Null)
        }
    }

    async fn element_exists(&mut self, selector: &str) -> Result<bool, DriverError> {
        if selector == ".feedback-alert" {
            return Ok(self.reject_login);
        }
        Ok(true)
    }
}

fn client(driver: FakeDriver) -> PortalClient {
    PortalClient::new(
        Box::new(driver),
        PortalConfig::new("https://sis.district.example"),
    )
}

async fn ready_client() -> PortalClient {
    let client = client(FakeDriver::portal());
    let session = client.authenticate("javery", "hunter2").await.unwrap();
    assert!(session.authenticated);
    client
}

#[tokio::test]
async fn invalid_credentials_fail_and_leave_session_unready() {
    let mut driver = FakeDriver::portal();
    driver.reject_login = true;
    let client = client(driver);

    let err = client.authenticate("javery", "wrong").await.unwrap_err();
    assert!(matches!(err, PortalError::AuthenticationFailed));

    // The session never became ready, so extraction is refused.
    let err = client.list_courses(Year::Current, Term::Q2).await.unwrap_err();
    assert!(matches!(err, PortalError::NotReady { .. }));
}

#[tokio::test]
async fn transport_failure_during_login_is_reported_not_swallowed() {
    let mut driver = FakeDriver::portal();
    driver.fail_navigation = true;
    let client = client(driver);

    let err = client.authenticate("javery", "hunter2").await.unwrap_err();
    assert!(matches!(err, PortalError::Transport { .. }));

    let err = client.student_profile().await.unwrap_err();
    assert!(matches!(err, PortalError::NotReady { .. }));
}

#[tokio::test]
async fn catalog_returns_data_rows_without_the_header() {
    let client = ready_client().await;
    let courses = client.list_courses(Year::Current, Term::Q2).await.unwrap();

    assert_eq!(courses.len(), 5);
    assert_eq!(courses[0].name, "Algebra II");
    assert_eq!(courses[0].code, "ALG2");
    assert_eq!(courses[0].element_id, "row-1");
    assert_eq!(courses[4].code, "BAND9"); // no dash: code is the whole section
}

#[tokio::test]
async fn resolver_finds_earliest_case_insensitive_match() {
    let client = ready_client().await;

    // Rivera teaches two courses; the catalog-order first one wins.
    let query = CourseQuery::new(SearchKey::TeacherName, "RIVERA");
    let course = client.resolve_course(&query).await.unwrap().unwrap();
    assert_eq!(course.name, "Algebra II");

    let query = CourseQuery::new(SearchKey::CourseName, "chemistry");
    assert!(client.resolve_course(&query).await.unwrap().is_none());
}

#[tokio::test]
async fn course_detail_enriches_the_resolved_course() {
    let client = ready_client().await;
    let query = CourseQuery::new(SearchKey::CourseCode, "alg2");

    let detail = client.course_detail(&query).await.unwrap().unwrap();
    assert_eq!(detail.course.section_number, "ALG2-01");
    assert_eq!(detail.teacher_email, "rivera@northside.example");
    assert_eq!(detail.class_size, 27);
    assert_eq!(detail.categories.len(), 2);
    assert_eq!(detail.categories[0].name, "Homework");
    assert_eq!(detail.categories[1].term(Term::Q3).map(|t| t.average), Some(86.0));
}

#[tokio::test]
async fn course_detail_is_idempotent_against_unchanged_state() {
    let client = ready_client().await;
    let query = CourseQuery::new(SearchKey::SectionNumber, "ALG2-01");

    let first = client.course_detail(&query).await.unwrap().unwrap();
    let second = client.course_detail(&query).await.unwrap().unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn unresolved_course_yields_none_for_detail_and_assignments() {
    let client = ready_client().await;
    let query = CourseQuery::new(SearchKey::CourseName, "Ceramics");

    assert!(client.course_detail(&query).await.unwrap().is_none());
    assert!(client.assignments(&query, Term::Q2).await.unwrap().is_none());
}

#[tokio::test]
async fn assignments_cross_reference_categories_and_parse_scores() {
    let client = ready_client().await;
    let query = CourseQuery::new(SearchKey::CourseName, "algebra");

    let assignments = client.assignments(&query, Term::Q2).await.unwrap().unwrap();
    assert_eq!(assignments.len(), 3);

    let quiz = &assignments[0];
    assert_eq!(quiz.category.as_deref(), Some("Tests"));
    let score = quiz.score.as_ref().unwrap();
    assert_eq!(score.percent, 83.0);
    assert_eq!(score.fraction, "5/6");
    assert_eq!(score.raw, 83.0);

    // Category text that matches no course category stays unset.
    assert_eq!(assignments[2].name, "Lab Notebook");
    assert_eq!(assignments[2].category, None);
}

#[tokio::test]
async fn profile_reads_identity_fields_and_gpa() {
    let client = ready_client().await;
    let profile = client.student_profile().await.unwrap();

    assert_eq!(profile.name.as_deref(), Some("Jordan Avery"));
    assert_eq!(profile.school_name.as_deref(), Some("Northside High"));
    assert_eq!(profile.state_id, None);
    assert_eq!(profile.gpa, Some(3.72));
}
