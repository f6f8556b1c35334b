//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use slms_core::{
  alumni::{AlumniQuery, AlumniType, AlumniUpdate, SupportCategory},
  application::{
    ApplicationQuery, ApplicationStatus, ApplicationType, NewApplication, Review,
  },
  career::CareerPosition,
  department::DepartmentFields,
  document::{DocumentCategory, DocumentQuery, NewDocument},
  store::{CampusStore, StoreError, StoreErrorKind},
  student::{Disconnection, Shift, StudentFields, StudentQuery, StudentStatus},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

fn dept(name: &str, code: &str) -> DepartmentFields {
  DepartmentFields { name: name.into(), code: code.into() }
}

fn student_fields(department_id: Uuid, roll: &str) -> StudentFields {
  StudentFields {
    full_name: format!("Student {roll}"),
    roll_number: roll.into(),
    registration_number: format!("REG-{roll}"),
    department_id,
    semester: 3,
    session: "2023-24".into(),
    shift: Shift::Morning,
    enrollment_date: date("2023-01-15"),
  }
}

fn position(company: &str, start: &str) -> CareerPosition {
  CareerPosition {
    company:     company.into(),
    position:    "Engineer".into(),
    start_date:  date(start),
    description: None,
    end_date:    None,
  }
}

fn application(department: &str) -> NewApplication {
  NewApplication {
    applicant_name:      "Karim Ahmed".into(),
    father_name:         None,
    mother_name:         None,
    department:          department.into(),
    session:             "2020-21".into(),
    shift:               Some(Shift::Day),
    roll_number:         "R-77".into(),
    registration_number: "REG-77".into(),
    email:               Some("karim@example.com".into()),
    application_type:    ApplicationType::Testimonial,
    subject:             "Testimonial request".into(),
    message:             None,
    selected_documents:  vec!["Testimonial".into()],
  }
}

fn document(student_id: Uuid, name: &str) -> NewDocument {
  NewDocument {
    student_id,
    file_name: name.into(),
    file_type: "pdf".into(),
    category: DocumentCategory::Marksheet,
    file_path: format!("documents/{}.pdf", Uuid::new_v4()),
    file_size: 42,
    content_hash: "00".repeat(32),
  }
}

/// A department with one enrolled student who has graduated.
async fn alumnus(s: &SqliteStore) -> slms_core::alumni::AlumniRecord {
  let d = s.create_department(dept("Computer", "CST")).await.unwrap();
  let st = s.create_student(student_fields(d.department_id, "CS001")).await.unwrap();
  s.transition_to_alumni(st.student_id, 2024).await.unwrap()
}

// ─── Departments ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_department() {
  let s = store().await;
  let d = s.create_department(dept("Computer Technology", "CST")).await.unwrap();

  let fetched = s.get_department(d.department_id).await.unwrap().unwrap();
  assert_eq!(fetched, d);
}

#[tokio::test]
async fn get_department_missing_returns_none() {
  let s = store().await;
  assert!(s.get_department(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_department_code_is_a_conflict() {
  let s = store().await;
  s.create_department(dept("Computer", "CST")).await.unwrap();
  let err = s.create_department(dept("Civil", "CST")).await.unwrap_err();
  assert!(matches!(err, Error::Duplicate(_)));
  assert_eq!(err.kind(), StoreErrorKind::Conflict);
}

#[tokio::test]
async fn list_departments_counts_students() {
  let s = store().await;
  let civil = s.create_department(dept("Civil", "CT")).await.unwrap();
  let comp = s.create_department(dept("Computer", "CST")).await.unwrap();
  s.create_student(student_fields(comp.department_id, "1")).await.unwrap();
  s.create_student(student_fields(comp.department_id, "2")).await.unwrap();

  let list = s.list_departments().await.unwrap();
  assert_eq!(list.len(), 2);
  assert_eq!(list[0].department.department_id, civil.department_id);
  assert_eq!(list[0].student_count, 0);
  assert_eq!(list[1].student_count, 2);
}

#[tokio::test]
async fn update_department() {
  let s = store().await;
  let d = s.create_department(dept("Computer", "CST")).await.unwrap();
  let updated = s
    .update_department(d.department_id, dept("Computer Science", "CSE"))
    .await
    .unwrap();
  assert_eq!(updated.name, "Computer Science");
  assert_eq!(updated.code, "CSE");
  assert_eq!(updated.created_at, d.created_at);

  let err = s
    .update_department(Uuid::new_v4(), dept("X", "X"))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[tokio::test]
async fn department_with_students_cannot_be_deleted() {
  let s = store().await;
  let d = s.create_department(dept("Computer", "CST")).await.unwrap();
  s.create_student(student_fields(d.department_id, "1")).await.unwrap();
  s.create_student(student_fields(d.department_id, "2")).await.unwrap();

  let err = s.delete_department(d.department_id).await.unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::ProtectedDeletion { student_count: 2 });
  assert!(s.get_department(d.department_id).await.unwrap().is_some());
}

#[tokio::test]
async fn empty_department_can_be_deleted() {
  let s = store().await;
  let d = s.create_department(dept("Computer", "CST")).await.unwrap();
  assert_eq!(s.count_students(d.department_id).await.unwrap(), 0);

  s.delete_department(d.department_id).await.unwrap();
  assert!(s.get_department(d.department_id).await.unwrap().is_none());

  let err = s.delete_department(d.department_id).await.unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

// ─── Students ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_student_requires_department() {
  let s = store().await;
  let missing = Uuid::new_v4();
  let err = s
    .create_student(student_fields(missing, "1"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DepartmentNotFound(id) if id == missing));
}

#[tokio::test]
async fn create_and_get_student() {
  let s = store().await;
  let d = s.create_department(dept("Computer", "CST")).await.unwrap();
  let st = s.create_student(student_fields(d.department_id, "CS001")).await.unwrap();
  assert_eq!(st.status, StudentStatus::Active);

  let fetched = s.get_student(st.student_id).await.unwrap().unwrap();
  assert_eq!(fetched, st);
}

#[tokio::test]
async fn duplicate_roll_number_is_a_conflict() {
  let s = store().await;
  let d = s.create_department(dept("Computer", "CST")).await.unwrap();
  s.create_student(student_fields(d.department_id, "CS001")).await.unwrap();
  let err = s
    .create_student(student_fields(d.department_id, "CS001"))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::Conflict);
}

#[tokio::test]
async fn list_students_filters() {
  let s = store().await;
  let comp = s.create_department(dept("Computer", "CST")).await.unwrap();
  let civil = s.create_department(dept("Civil", "CT")).await.unwrap();

  let mut fields = student_fields(comp.department_id, "CS001");
  fields.full_name = "Rahim Uddin".into();
  s.create_student(fields).await.unwrap();
  let mut fields = student_fields(comp.department_id, "CS002");
  fields.semester = 5;
  s.create_student(fields).await.unwrap();
  s.create_student(student_fields(civil.department_id, "CT001")).await.unwrap();

  let all = s.list_students(&StudentQuery::default()).await.unwrap();
  assert_eq!(all.len(), 3);

  let query = StudentQuery {
    department_id: Some(comp.department_id),
    ..Default::default()
  };
  assert_eq!(s.list_students(&query).await.unwrap().len(), 2);

  let query = StudentQuery {
    department_id: Some(comp.department_id),
    semester: Some(5),
    ..Default::default()
  };
  let found = s.list_students(&query).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].roll_number, "CS002");

  let query = StudentQuery { search: Some("  rahim ".into()), ..Default::default() };
  let found = s.list_students(&query).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].full_name, "Rahim Uddin");

  let query = StudentQuery { search: Some("reg-ct".into()), ..Default::default() };
  assert_eq!(s.list_students(&query).await.unwrap().len(), 1);

  let query = StudentQuery {
    status: Some(StudentStatus::Graduated),
    ..Default::default()
  };
  assert!(s.list_students(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_student() {
  let s = store().await;
  let d = s.create_department(dept("Computer", "CST")).await.unwrap();
  let st = s.create_student(student_fields(d.department_id, "CS001")).await.unwrap();

  let mut fields = student_fields(d.department_id, "CS001");
  fields.semester = 4;
  fields.shift = Shift::Evening;
  let updated = s.update_student(st.student_id, fields).await.unwrap();
  assert_eq!(updated.semester, 4);
  assert_eq!(updated.shift, Shift::Evening);

  let err = s
    .update_student(Uuid::new_v4(), student_fields(d.department_id, "X"))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[tokio::test]
async fn delete_student_cascades_and_returns_documents() {
  let s = store().await;
  let record = alumnus(&s).await;
  let doc = s.create_document(document(record.student_id, "a.pdf")).await.unwrap();

  let removed = s.delete_student(record.student_id).await.unwrap();
  assert_eq!(removed.len(), 1);
  assert_eq!(removed[0].document_id, doc.document_id);

  assert!(s.get_student(record.student_id).await.unwrap().is_none());
  assert!(s.get_alumni(record.alumni_id).await.unwrap().is_none());
  assert!(s.get_document(doc.document_id).await.unwrap().is_none());

  let err = s.delete_student(record.student_id).await.unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[tokio::test]
async fn transition_to_alumni_creates_record() {
  let s = store().await;
  let d = s.create_department(dept("Computer", "CST")).await.unwrap();
  let st = s.create_student(student_fields(d.department_id, "CS001")).await.unwrap();

  let record = s.transition_to_alumni(st.student_id, 2024).await.unwrap();
  assert_eq!(record.student_id, st.student_id);
  assert_eq!(record.graduation_year, 2024);
  assert_eq!(record.alumni_type, AlumniType::Recent);
  assert_eq!(record.support_category, SupportCategory::NoSupportNeeded);
  assert!(record.career.is_empty());

  let student = s.get_student(st.student_id).await.unwrap().unwrap();
  assert_eq!(student.status, StudentStatus::Graduated);

  let by_student = s.get_alumni_by_student(st.student_id).await.unwrap().unwrap();
  assert_eq!(by_student, record);
}

#[tokio::test]
async fn second_transition_is_a_conflict() {
  let s = store().await;
  let record = alumnus(&s).await;
  let err = s
    .transition_to_alumni(record.student_id, 2025)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::AlreadyAlumni(_)));
  assert_eq!(err.kind(), StoreErrorKind::Conflict);
}

#[tokio::test]
async fn disconnect_studies() {
  let s = store().await;
  let d = s.create_department(dept("Computer", "CST")).await.unwrap();
  let st = s.create_student(student_fields(d.department_id, "CS001")).await.unwrap();

  let disconnection = Disconnection { reason: "Moved abroad".into(), last_semester: 3 };
  let updated = s.disconnect_studies(st.student_id, disconnection).await.unwrap();
  assert_eq!(updated.status, StudentStatus::Discontinued);
  assert_eq!(updated.discontinued_reason.as_deref(), Some("Moved abroad"));
  assert_eq!(updated.last_semester, Some(3));

  // A discontinued student cannot graduate.
  let err = s.transition_to_alumni(st.student_id, 2024).await.unwrap_err();
  assert!(matches!(err, Error::Discontinued(_)));
}

#[tokio::test]
async fn graduated_student_cannot_be_disconnected() {
  let s = store().await;
  let record = alumnus(&s).await;
  let disconnection = Disconnection { reason: "x".into(), last_semester: 8 };
  let err = s
    .disconnect_studies(record.student_id, disconnection)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::AlreadyGraduated(_)));
}

// ─── Alumni ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn career_positions_are_stored_newest_first() {
  let s = store().await;
  let record = alumnus(&s).await;

  s.add_career_position(record.alumni_id, position("A Corp", "2020-01-01"))
    .await
    .unwrap();
  let updated = s
    .add_career_position(record.alumni_id, position("B Corp", "2024-01-01"))
    .await
    .unwrap();

  let companies: Vec<_> = updated.career.iter().map(|p| p.company.as_str()).collect();
  assert_eq!(companies, ["B Corp", "A Corp"]);
  assert_eq!(updated.current_position().unwrap().company, "B Corp");

  // Order survives a round trip through the database.
  let fetched = s.get_alumni(record.alumni_id).await.unwrap().unwrap();
  assert_eq!(fetched.career, updated.career);
  assert_eq!(fetched.current_position().unwrap().company, "B Corp");
}

#[tokio::test]
async fn older_position_does_not_displace_current() {
  let s = store().await;
  let record = alumnus(&s).await;

  s.add_career_position(record.alumni_id, position("New", "2023-06-01"))
    .await
    .unwrap();
  let updated = s
    .add_career_position(record.alumni_id, position("Old", "2019-06-01"))
    .await
    .unwrap();
  assert_eq!(updated.current_position().unwrap().company, "New");
  assert_eq!(updated.career.len(), 2);
}

#[tokio::test]
async fn equal_start_dates_keep_insertion_order() {
  let s = store().await;
  let record = alumnus(&s).await;

  for company in ["First", "Second", "Third"] {
    s.add_career_position(record.alumni_id, position(company, "2022-03-01"))
      .await
      .unwrap();
  }
  let fetched = s.get_alumni(record.alumni_id).await.unwrap().unwrap();
  let companies: Vec<_> = fetched.career.iter().map(|p| p.company.as_str()).collect();
  assert_eq!(companies, ["First", "Second", "Third"]);
  assert_eq!(fetched.current_position().unwrap().company, "First");
}

#[tokio::test]
async fn career_position_for_missing_alumni() {
  let s = store().await;
  let err = s
    .add_career_position(Uuid::new_v4(), position("A", "2020-01-01"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::AlumniNotFound(_)));
  assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[tokio::test]
async fn support_category_changes_are_logged() {
  let s = store().await;
  let record = alumnus(&s).await;

  s.update_support_category(
    record.alumni_id,
    SupportCategory::NeedsExtraSupport,
    Some("Job search".into()),
  )
  .await
  .unwrap();
  let updated = s
    .update_support_category(record.alumni_id, SupportCategory::ReceivingSupport, None)
    .await
    .unwrap();

  assert_eq!(updated.support_category, SupportCategory::ReceivingSupport);
  assert_eq!(updated.support_history.len(), 2);
  assert_eq!(updated.support_history[0].notes.as_deref(), Some("Job search"));

  let fetched = s.get_alumni(record.alumni_id).await.unwrap().unwrap();
  assert_eq!(fetched.support_history, updated.support_history);
}

#[tokio::test]
async fn update_and_list_alumni() {
  let s = store().await;
  let record = alumnus(&s).await;

  let update = AlumniUpdate {
    alumni_type:     Some(AlumniType::Established),
    graduation_year: None,
  };
  let updated = s.update_alumni(record.alumni_id, update).await.unwrap();
  assert_eq!(updated.alumni_type, AlumniType::Established);
  assert_eq!(updated.graduation_year, 2024);

  let query = AlumniQuery {
    alumni_type: Some(AlumniType::Established),
    ..Default::default()
  };
  assert_eq!(s.list_alumni(&query).await.unwrap().len(), 1);

  let query = AlumniQuery { graduation_year: Some(1999), ..Default::default() };
  assert!(s.list_alumni(&query).await.unwrap().is_empty());
}

// ─── Applications ────────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_and_review_application() {
  let s = store().await;
  let app = s.submit_application(application("Computer")).await.unwrap();
  assert_eq!(app.status, ApplicationStatus::Pending);
  assert!(app.reviewed_at.is_none());

  let fetched = s.get_application(app.application_id).await.unwrap().unwrap();
  assert_eq!(fetched, app);

  let review = Review {
    status:       ApplicationStatus::Approved,
    reviewed_by:  "Registrar".into(),
    review_notes: Some("Collect from office".into()),
  };
  let reviewed = s.review_application(app.application_id, review).await.unwrap();
  assert_eq!(reviewed.status, ApplicationStatus::Approved);
  assert_eq!(reviewed.reviewed_by.as_deref(), Some("Registrar"));
  assert!(reviewed.reviewed_at.is_some());
}

#[tokio::test]
async fn list_applications_filters() {
  let s = store().await;
  s.submit_application(application("Computer")).await.unwrap();
  let mut other = application("Civil");
  other.application_type = ApplicationType::Transcript;
  s.submit_application(other).await.unwrap();

  let all = s.list_applications(&ApplicationQuery::default()).await.unwrap();
  assert_eq!(all.len(), 2);
  assert!(all[0].submitted_at >= all[1].submitted_at);

  let query = ApplicationQuery {
    department: Some("computer".into()),
    ..Default::default()
  };
  assert_eq!(s.list_applications(&query).await.unwrap().len(), 1);

  let query = ApplicationQuery {
    application_type: Some(ApplicationType::Transcript),
    ..Default::default()
  };
  assert_eq!(s.list_applications(&query).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_application() {
  let s = store().await;
  let app = s.submit_application(application("Computer")).await.unwrap();
  s.delete_application(app.application_id).await.unwrap();
  assert!(s.get_application(app.application_id).await.unwrap().is_none());

  let err = s.delete_application(app.application_id).await.unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn document_requires_student() {
  let s = store().await;
  let err = s
    .create_document(document(Uuid::new_v4(), "a.pdf"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::StudentNotFound(_)));
}

#[tokio::test]
async fn create_list_and_delete_documents() {
  let s = store().await;
  let record = alumnus(&s).await;
  let a = s.create_document(document(record.student_id, "a.pdf")).await.unwrap();
  let mut nid = document(record.student_id, "nid.jpg");
  nid.category = DocumentCategory::Nid;
  s.create_document(nid).await.unwrap();

  let query = DocumentQuery { student_id: Some(record.student_id), category: None };
  assert_eq!(s.list_documents(&query).await.unwrap().len(), 2);

  let query = DocumentQuery { student_id: None, category: Some(DocumentCategory::Nid) };
  assert_eq!(s.list_documents(&query).await.unwrap().len(), 1);

  let deleted = s.delete_document(a.document_id).await.unwrap();
  assert_eq!(deleted, a);
  assert!(s.get_document(a.document_id).await.unwrap().is_none());

  let err = s.delete_document(a.document_id).await.unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

// ─── Statistics ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_groupings_sum_to_totals() {
  let s = store().await;
  let comp = s.create_department(dept("Computer", "CST")).await.unwrap();
  let civil = s.create_department(dept("Civil", "CT")).await.unwrap();
  s.create_department(dept("Power", "PT")).await.unwrap();

  let a = s.create_student(student_fields(comp.department_id, "1")).await.unwrap();
  let b = s.create_student(student_fields(comp.department_id, "2")).await.unwrap();
  let mut fields = student_fields(civil.department_id, "3");
  fields.semester = 7;
  s.create_student(fields).await.unwrap();

  s.transition_to_alumni(a.student_id, 2023).await.unwrap();
  s.disconnect_studies(b.student_id, Disconnection { reason: "r".into(), last_semester: 2 })
    .await
    .unwrap();

  let app = s.submit_application(application("Computer")).await.unwrap();
  s.submit_application(application("Civil")).await.unwrap();
  s.review_application(
    app.application_id,
    Review {
      status:       ApplicationStatus::Rejected,
      reviewed_by:  "Registrar".into(),
      review_notes: None,
    },
  )
  .await
  .unwrap();

  let stats = s.dashboard_stats().await.unwrap();

  let st = &stats.students;
  assert_eq!(st.total, 3);
  assert_eq!((st.active, st.graduated, st.discontinued), (1, 1, 1));
  assert_eq!(st.by_status.iter().map(|c| c.count).sum::<u64>(), st.total);
  assert_eq!(st.by_department.iter().map(|c| c.count).sum::<u64>(), st.total);
  assert_eq!(st.by_semester.iter().map(|c| c.count).sum::<u64>(), st.total);
  assert_eq!(st.by_department.len(), 3);

  let al = &stats.alumni;
  assert_eq!(al.total, 1);
  assert_eq!(al.recent + al.established, al.total);
  assert_eq!(al.by_support.values().sum::<u64>(), al.total);
  assert_eq!(al.by_year.iter().map(|c| c.count).sum::<u64>(), al.total);

  let ap = &stats.applications;
  assert_eq!(ap.total, 2);
  assert_eq!((ap.pending, ap.approved, ap.rejected), (1, 0, 1));
  assert_eq!(ap.by_status.iter().map(|c| c.count).sum::<u64>(), ap.total);
  assert_eq!(ap.by_type.iter().map(|c| c.count).sum::<u64>(), ap.total);
}

#[tokio::test]
async fn alumni_stats_years_newest_first() {
  let s = store().await;
  let d = s.create_department(dept("Computer", "CST")).await.unwrap();
  for (roll, year) in [("1", 2021), ("2", 2024), ("3", 2021)] {
    let st = s.create_student(student_fields(d.department_id, roll)).await.unwrap();
    s.transition_to_alumni(st.student_id, year).await.unwrap();
  }

  let stats = s.alumni_stats().await.unwrap();
  assert_eq!(stats.total, 3);
  assert_eq!(stats.recent, 3);
  let years: Vec<_> = stats.by_year.iter().map(|y| (y.graduation_year, y.count)).collect();
  assert_eq!(years, [(2024, 1), (2021, 2)]);
  assert_eq!(stats.by_support[&SupportCategory::NoSupportNeeded], 3);
}
