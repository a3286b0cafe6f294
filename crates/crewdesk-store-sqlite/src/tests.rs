//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, NaiveDate, Utc};
use crewdesk_core::{
  crew::{CrewQuery, NewCrewMember},
  document::{DocumentKind, NewCrewDocument},
  staff::{Department, NewStaffMember, StaffQuery},
  status::ApplicationStatus,
  store::{RecruitmentStore, SessionStore},
};
use strum::IntoEnumIterator as _;

use crate::{Error, SqliteStore, store::is_unique_violation};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

fn crew(passport: &str, name: &str, rank: &str) -> NewCrewMember {
  NewCrewMember {
    name:                           name.into(),
    nationality:                    "Filipino".into(),
    date_of_birth:                  date("1990-04-12"),
    mobile_number:                  "+63 917 555 0101".into(),
    email:                          "crew@example.com".into(),
    rank:                           rank.into(),
    passport:                       passport.into(),
    years_experience:               8,
    last_vessel_type:               Some("Bulk Carrier".into()),
    availability_date:              date("2026-11-01"),
    available_port_city:            None,
    emergency_contact_name:         Some("Luz Reyes".into()),
    emergency_contact_phone:        None,
    emergency_contact_relationship: Some("Mother".into()),
  }
}

fn document(kind: DocumentKind, name: &str) -> NewCrewDocument {
  NewCrewDocument {
    kind,
    stored_path:       format!("{}/{name}", kind.dir_name()),
    original_filename: name.into(),
    file_size:         2 * 1024 * 1024,
    mime_type:         "application/pdf".into(),
  }
}

fn staff(name: &str, department: Department) -> NewStaffMember {
  NewStaffMember {
    full_name:          name.into(),
    email_or_whatsapp:  "staff@example.com".into(),
    mobile_number:      "+65 8123 4567".into(),
    location:           "Singapore".into(),
    position_applying:  "Crewing Officer".into(),
    department,
    years_experience:   4,
    current_employer:   None,
    availability_date:  date("2026-12-01"),
    education:          None,
    certifications:     None,
    salary_expectation: None,
    resume_file:        Some("staff/cv.pdf".into()),
    photo_file:         None,
  }
}

// ─── Crew registration ───────────────────────────────────────────────────────

#[tokio::test]
async fn register_crew_with_documents() {
  let s = store().await;

  let (member, docs) = s
    .register_crew(crew("P12345", "Ana Reyes", "Second Officer"), vec![
      document(DocumentKind::Passport, "a.pdf"),
      document(DocumentKind::Photo, "b.png"),
    ])
    .await
    .unwrap();

  assert_eq!(member.status, ApplicationStatus::Registered);
  assert_eq!(member.passport, "P12345");
  assert_eq!(member.profile_token.len(), 64);
  assert_eq!(docs.len(), 2);
  assert!(docs.iter().all(|d| d.crew_id == member.crew_id));

  let stored = s.list_crew_documents(member.crew_id).await.unwrap();
  assert_eq!(stored.len(), 2);
  let kinds: Vec<_> = stored.iter().map(|d| d.kind).collect();
  assert!(kinds.contains(&DocumentKind::Passport));
  assert!(kinds.contains(&DocumentKind::Photo));
}

#[tokio::test]
async fn duplicate_passport_is_rejected_and_store_unchanged() {
  let s = store().await;
  s.register_crew(crew("P12345", "Ana Reyes", "Second Officer"), vec![
    document(DocumentKind::Passport, "a.pdf"),
  ])
  .await
  .unwrap();

  let err = s
    .register_crew(crew("P12345", "Someone Else", "Cook"), vec![
      document(DocumentKind::Resume, "cv.pdf"),
    ])
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicatePassport(ref p) if p == "P12345"));

  let all = s.list_crew(&CrewQuery::default()).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].name, "Ana Reyes");
  let docs = s.list_crew_documents(all[0].crew_id).await.unwrap();
  assert_eq!(docs.len(), 1);
}

#[test]
fn only_the_named_unique_column_counts_as_a_duplicate() {
  let conn = rusqlite::Connection::open_in_memory().unwrap();
  conn
    .execute_batch(
      "CREATE TABLE crew_members (
         passport TEXT UNIQUE, profile_token TEXT UNIQUE, status INTEGER CHECK (status >= 0)
       );
       INSERT INTO crew_members VALUES ('P1', 't1', 0);",
    )
    .unwrap();
  let fail = |sql: &str| tokio_rusqlite::Error::Rusqlite(conn.execute(sql, []).unwrap_err());

  let passport = fail("INSERT INTO crew_members VALUES ('P1', 't2', 0)");
  let token = fail("INSERT INTO crew_members VALUES ('P2', 't1', 0)");
  let check = fail("INSERT INTO crew_members VALUES ('P3', 't3', -9)");

  assert!(is_unique_violation(&passport, "crew_members.passport"));
  assert!(!is_unique_violation(&token, "crew_members.passport"));
  assert!(!is_unique_violation(&check, "crew_members.passport"));
}

#[tokio::test]
async fn get_crew_missing_returns_none() {
  let s = store().await;
  assert!(s.get_crew(42).await.unwrap().is_none());
}

#[tokio::test]
async fn find_by_passport() {
  let s = store().await;
  s.register_crew(crew("X1", "Ana", "Cook"), vec![]).await.unwrap();
  let found = s.find_crew_by_passport("X1".into()).await.unwrap();
  assert_eq!(found.unwrap().name, "Ana");
  assert!(s.find_crew_by_passport("X2".into()).await.unwrap().is_none());
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_crew_newest_first_with_filters() {
  let s = store().await;
  let (a, _) = s.register_crew(crew("A1", "Ana Reyes", "Second Officer"), vec![]).await.unwrap();
  let (b, _) = s.register_crew(crew("B2", "Ben Cruz", "Chief Cook"), vec![]).await.unwrap();
  s.register_crew(crew("C3", "Carla Diaz", "Able Seaman"), vec![]).await.unwrap();

  let all = s.list_crew(&CrewQuery::default()).await.unwrap();
  assert_eq!(all.len(), 3);
  assert_eq!(all[0].passport, "C3");

  s.update_crew_status(b.crew_id, ApplicationStatus::Approved, None).await.unwrap();
  let approved = s
    .list_crew(&CrewQuery { status: Some(ApplicationStatus::Approved), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(approved.len(), 1);
  assert_eq!(approved[0].crew_id, b.crew_id);

  let by_rank = s
    .list_crew(&CrewQuery { search: Some("officer".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_rank.len(), 1);
  assert_eq!(by_rank[0].crew_id, a.crew_id);

  let by_passport = s
    .list_crew(&CrewQuery { search: Some("c3".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_passport.len(), 1);

  let limited = s
    .list_crew(&CrewQuery { limit: Some(2), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn search_wildcards_are_literal() {
  let s = store().await;
  s.register_crew(crew("A1", "Ana", "Cook"), vec![]).await.unwrap();
  let hits = s
    .list_crew(&CrewQuery { search: Some("%".into()), ..Default::default() })
    .await
    .unwrap();
  assert!(hits.is_empty());
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn every_status_is_persisted_exactly() {
  let s = store().await;
  let (member, _) = s.register_crew(crew("P1", "Ana", "Cook"), vec![]).await.unwrap();

  for status in ApplicationStatus::iter() {
    let updated = s
      .update_crew_status(member.crew_id, status, Some(format!("now {status}")))
      .await
      .unwrap();
    assert_eq!(updated.status, status);

    let reread = s.get_crew(member.crew_id).await.unwrap().unwrap();
    assert_eq!(reread.status, status);
    assert_eq!(reread.admin_notes.as_deref(), Some(format!("now {status}").as_str()));
    assert!(reread.updated_at >= member.updated_at);
  }
}

#[tokio::test]
async fn update_status_of_missing_crew() {
  let s = store().await;
  let err = s
    .update_crew_status(9, ApplicationStatus::Approved, None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::CrewNotFound(9)));
}

// ─── Tokens and documents ────────────────────────────────────────────────────

#[tokio::test]
async fn rotate_profile_token_replaces_it() {
  let s = store().await;
  let (member, _) = s.register_crew(crew("P1", "Ana", "Cook"), vec![]).await.unwrap();
  let rotated = s.rotate_profile_token(member.crew_id).await.unwrap();
  assert_ne!(rotated.profile_token, member.profile_token);
  assert!(matches!(
    s.rotate_profile_token(999).await,
    Err(Error::CrewNotFound(999))
  ));
}

#[tokio::test]
async fn add_documents_later() {
  let s = store().await;
  let (member, _) = s.register_crew(crew("P1", "Ana", "Cook"), vec![]).await.unwrap();

  let added = s
    .add_crew_documents(member.crew_id, vec![
      document(DocumentKind::StcwCertificates, "stcw1.pdf"),
      document(DocumentKind::StcwCertificates, "stcw2.pdf"),
    ])
    .await
    .unwrap();
  assert_eq!(added.len(), 2);

  let fetched = s
    .get_crew_document(member.crew_id, added[0].document_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.original_filename, "stcw1.pdf");
  assert_eq!(fetched.file_size, 2 * 1024 * 1024);

  // Documents are scoped to their owner.
  let (other, _) = s.register_crew(crew("P2", "Ben", "Cook"), vec![]).await.unwrap();
  assert!(s
    .get_crew_document(other.crew_id, added[0].document_id)
    .await
    .unwrap()
    .is_none());

  assert!(matches!(
    s.add_crew_documents(999, vec![document(DocumentKind::Resume, "x.pdf")]).await,
    Err(Error::CrewNotFound(999))
  ));
}

// ─── Staff ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn staff_register_list_and_update() {
  let s = store().await;
  let registered = s.register_staff(staff("Sam Lee", Department::Crewing)).await.unwrap();
  assert_eq!(registered.status, ApplicationStatus::Screening);
  assert_eq!(registered.resume_file.as_deref(), Some("staff/cv.pdf"));
  s.register_staff(staff("Kim Tan", Department::Technical)).await.unwrap();

  let technical = s
    .list_staff(&StaffQuery { search: Some("technical".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(technical.len(), 1);
  assert_eq!(technical[0].full_name, "Kim Tan");

  let updated = s
    .update_staff_status(registered.staff_id, ApplicationStatus::Rejected, Some("no visa".into()))
    .await
    .unwrap();
  assert_eq!(updated.status, ApplicationStatus::Rejected);
  assert!(matches!(
    s.update_staff_status(77, ApplicationStatus::Approved, None).await,
    Err(Error::StaffNotFound(77))
  ));
}

#[tokio::test]
async fn dashboard_counts() {
  let s = store().await;
  let (a, _) = s.register_crew(crew("A1", "Ana", "Cook"), vec![]).await.unwrap();
  s.register_crew(crew("B2", "Ben", "Cook"), vec![]).await.unwrap();
  s.update_crew_status(a.crew_id, ApplicationStatus::Approved, None).await.unwrap();
  s.register_staff(staff("Sam", Department::Hr)).await.unwrap();

  let stats = s.dashboard_stats().await.unwrap();
  assert_eq!(stats.total_crew, 2);
  assert_eq!(stats.crew_approved, 1);
  assert_eq!(stats.crew_screening, 0);
  assert_eq!(stats.total_staff, 1);
  assert_eq!(stats.staff_screening, 1);
  assert_eq!(stats.staff_approved, 0);
}

// ─── Admins and sessions ─────────────────────────────────────────────────────

#[tokio::test]
async fn admin_usernames_are_unique() {
  let s = store().await;
  let admin = s.create_admin("root".into(), "$argon2id$fake".into()).await.unwrap();
  assert_eq!(admin.username, "root");
  assert!(matches!(
    s.create_admin("root".into(), "x".into()).await,
    Err(Error::AdminExists(ref u)) if u == "root"
  ));
  let found = s.find_admin("root".into()).await.unwrap().unwrap();
  assert_eq!(found.admin_id, admin.admin_id);
  assert!(s.find_admin("nobody".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn session_lifecycle() {
  let s = store().await;
  let admin = s.create_admin("root".into(), "hash".into()).await.unwrap();

  let session = s.create_session(admin.admin_id, Duration::minutes(30)).await.unwrap();
  let (fetched, owner) = s.get_session(session.session_id.clone()).await.unwrap().unwrap();
  assert_eq!(owner.username, "root");
  assert!(!fetched.is_expired(Utc::now()));

  s.delete_session(session.session_id.clone()).await.unwrap();
  assert!(s.get_session(session.session_id).await.unwrap().is_none());
}

#[tokio::test]
async fn purge_removes_only_expired_sessions() {
  let s = store().await;
  let admin = s.create_admin("root".into(), "hash".into()).await.unwrap();
  let stale = s.create_session(admin.admin_id, Duration::minutes(-1)).await.unwrap();
  let live = s.create_session(admin.admin_id, Duration::minutes(30)).await.unwrap();

  assert!(stale.is_expired(Utc::now()));
  assert_eq!(s.purge_expired_sessions(Utc::now()).await.unwrap(), 1);
  assert!(s.get_session(stale.session_id).await.unwrap().is_none());
  assert!(s.get_session(live.session_id).await.unwrap().is_some());
}
