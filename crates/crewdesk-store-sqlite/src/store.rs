//! [`SqliteStore`]: the SQLite implementation of [`RecruitmentStore`] and
//! [`SessionStore`].

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use crewdesk_core::{
  admin::{Admin, DashboardStats, SessionRecord},
  crew::{CrewMember, CrewQuery, NewCrewMember},
  document::{CrewDocument, NewCrewDocument},
  staff::{INITIAL_STAFF_STATUS, NewStaffMember, StaffMember, StaffQuery},
  status::ApplicationStatus,
  store::{RecruitmentStore, SessionStore},
  token::{new_profile_token, new_session_id},
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{
    CREW_COLUMNS, DOCUMENT_COLUMNS, RawAdmin, RawCrew, RawDocument, RawSession,
    RawStaff, STAFF_COLUMNS, encode_date, encode_dt, like_pattern,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A recruitment store backed by a single SQLite file.
///
/// Clones share one reference-counted connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Count rows of `table`, optionally restricted to one status.
  async fn count(
    &self,
    table: &'static str,
    status: Option<ApplicationStatus>,
  ) -> Result<u64> {
    let code = status.map(ApplicationStatus::code);
    let n: i64 = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT COUNT(*) FROM {table} WHERE (?1 IS NULL OR status = ?1)");
        Ok(conn.query_row(&sql, rusqlite::params![code], |r| r.get(0))?)
      })
      .await?;
    crate::encode::decode_u64("count", n)
  }
}

/// `true` if `err` is a UNIQUE failure on `column` (`table.column`).
pub(crate) fn is_unique_violation(err: &tokio_rusqlite::Error, column: &str) -> bool {
  match err {
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, Some(msg))) => {
      f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        && msg.strip_prefix("UNIQUE constraint failed: ") == Some(column)
    }
    _ => false,
  }
}

/// Insert document rows inside an open transaction; returns the new ids in
/// input order.
fn insert_documents(
  tx: &rusqlite::Transaction<'_>,
  crew_id: i64,
  documents: &[NewCrewDocument],
  uploaded_at: &str,
) -> rusqlite::Result<Vec<i64>> {
  let mut stmt = tx.prepare(
    "INSERT INTO crew_documents (
       crew_id, kind, stored_path, original_filename, file_size, mime_type,
       uploaded_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
  )?;
  let mut ids = Vec::with_capacity(documents.len());
  for doc in documents {
    stmt.execute(rusqlite::params![
      crew_id,
      doc.kind.as_str(),
      doc.stored_path,
      doc.original_filename,
      doc.file_size as i64,
      doc.mime_type,
      uploaded_at,
    ])?;
    ids.push(tx.last_insert_rowid());
  }
  Ok(ids)
}

fn built_documents(
  crew_id: i64,
  ids: Vec<i64>,
  documents: Vec<NewCrewDocument>,
  uploaded_at: DateTime<Utc>,
) -> Vec<CrewDocument> {
  ids
    .into_iter()
    .zip(documents)
    .map(|(document_id, doc)| CrewDocument {
      document_id,
      crew_id,
      kind: doc.kind,
      stored_path: doc.stored_path,
      original_filename: doc.original_filename,
      file_size: doc.file_size,
      mime_type: doc.mime_type,
      uploaded_at,
    })
    .collect()
}

fn query_crew(
  conn: &rusqlite::Connection,
  crew_id: i64,
) -> rusqlite::Result<Option<RawCrew>> {
  conn
    .query_row(
      &format!("SELECT {CREW_COLUMNS} FROM crew_members WHERE crew_id = ?1"),
      rusqlite::params![crew_id],
      RawCrew::from_row,
    )
    .optional()
}

fn query_staff(
  conn: &rusqlite::Connection,
  staff_id: i64,
) -> rusqlite::Result<Option<RawStaff>> {
  conn
    .query_row(
      &format!("SELECT {STAFF_COLUMNS} FROM staff_members WHERE staff_id = ?1"),
      rusqlite::params![staff_id],
      RawStaff::from_row,
    )
    .optional()
}

fn limit_param(limit: Option<usize>) -> i64 {
  // SQLite treats a negative LIMIT as "no limit".
  limit.map_or(-1, |l| l as i64)
}

// ─── RecruitmentStore impl ───────────────────────────────────────────────────

impl RecruitmentStore for SqliteStore {
  type Error = Error;

  // ── Crew ──────────────────────────────────────────────────────────────────

  async fn register_crew(
    &self,
    crew: NewCrewMember,
    documents: Vec<NewCrewDocument>,
  ) -> Result<(CrewMember, Vec<CrewDocument>)> {
    let now      = Utc::now();
    let now_str  = encode_dt(now);
    let token    = new_profile_token(&crew.passport);
    let passport = crew.passport.clone();
    let docs     = documents.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let taken = tx
          .query_row(
            "SELECT 1 FROM crew_members WHERE passport = ?1",
            rusqlite::params![crew.passport],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(None);
        }

        tx.execute(
          "INSERT INTO crew_members (
             name, nationality, date_of_birth, mobile_number, email, rank,
             passport, years_experience, last_vessel_type, availability_date,
             available_port_city, emergency_contact_name,
             emergency_contact_phone, emergency_contact_relationship,
             status, profile_token, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     ?14, ?15, ?16, ?17, ?17)",
          rusqlite::params![
            crew.name,
            crew.nationality,
            encode_date(crew.date_of_birth),
            crew.mobile_number,
            crew.email,
            crew.rank,
            crew.passport,
            crew.years_experience,
            crew.last_vessel_type,
            encode_date(crew.availability_date),
            crew.available_port_city,
            crew.emergency_contact_name,
            crew.emergency_contact_phone,
            crew.emergency_contact_relationship,
            ApplicationStatus::Registered.code(),
            token,
            now_str,
          ],
        )?;
        let crew_id = tx.last_insert_rowid();
        let doc_ids = insert_documents(&tx, crew_id, &docs, &now_str)?;
        tx.commit()?;
        Ok(Some((crew_id, doc_ids)))
      })
      .await;

    let (crew_id, doc_ids) = match outcome {
      Ok(Some(ids)) => ids,
      Ok(None) => return Err(Error::DuplicatePassport(passport)),
      Err(e) if is_unique_violation(&e, "crew_members.passport") => {
        return Err(Error::DuplicatePassport(passport));
      }
      Err(e) => return Err(e.into()),
    };

    tracing::debug!(crew_id, documents = doc_ids.len(), "crew member inserted");

    let member = self
      .get_crew(crew_id)
      .await?
      .ok_or(Error::CrewNotFound(crew_id))?;
    Ok((member, built_documents(crew_id, doc_ids, documents, now)))
  }

  async fn get_crew(&self, crew_id: i64) -> Result<Option<CrewMember>> {
    let raw = self
      .conn
      .call(move |conn| Ok(query_crew(conn, crew_id)?))
      .await?;
    raw.map(RawCrew::into_crew).transpose()
  }

  async fn find_crew_by_passport(
    &self,
    passport: String,
  ) -> Result<Option<CrewMember>> {
    let raw: Option<RawCrew> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CREW_COLUMNS} FROM crew_members WHERE passport = ?1"),
              rusqlite::params![passport],
              RawCrew::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawCrew::into_crew).transpose()
  }

  async fn list_crew(&self, query: &CrewQuery) -> Result<Vec<CrewMember>> {
    let status  = query.status.map(ApplicationStatus::code);
    let pattern = query
      .search
      .as_deref()
      .filter(|s| !s.trim().is_empty())
      .map(like_pattern);
    let limit   = limit_param(query.limit);

    let raws: Vec<RawCrew> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CREW_COLUMNS} FROM crew_members
           WHERE (?1 IS NULL OR status = ?1)
             AND (?2 IS NULL
                  OR LOWER(name)     LIKE ?2 ESCAPE '\\'
                  OR LOWER(passport) LIKE ?2 ESCAPE '\\'
                  OR LOWER(rank)     LIKE ?2 ESCAPE '\\')
           ORDER BY created_at DESC, crew_id DESC
           LIMIT ?3"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![status, pattern, limit], RawCrew::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCrew::into_crew).collect()
  }

  async fn update_crew_status(
    &self,
    crew_id: i64,
    status: ApplicationStatus,
    notes: Option<String>,
  ) -> Result<CrewMember> {
    let code    = status.code();
    let now_str = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE crew_members
           SET status = ?2, admin_notes = ?3, updated_at = ?4
           WHERE crew_id = ?1",
          rusqlite::params![crew_id, code, notes, now_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(query_crew(conn, crew_id)?)
      })
      .await?
      .ok_or(Error::CrewNotFound(crew_id))?;

    raw.into_crew()
  }

  async fn rotate_profile_token(&self, crew_id: i64) -> Result<CrewMember> {
    let now_str = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let passport: Option<String> = conn
          .query_row(
            "SELECT passport FROM crew_members WHERE crew_id = ?1",
            rusqlite::params![crew_id],
            |r| r.get(0),
          )
          .optional()?;
        let Some(passport) = passport else {
          return Ok(None);
        };
        conn.execute(
          "UPDATE crew_members SET profile_token = ?2, updated_at = ?3
           WHERE crew_id = ?1",
          rusqlite::params![crew_id, new_profile_token(&passport), now_str],
        )?;
        Ok(query_crew(conn, crew_id)?)
      })
      .await?
      .ok_or(Error::CrewNotFound(crew_id))?;

    raw.into_crew()
  }

  // ── Crew documents ────────────────────────────────────────────────────────

  async fn add_crew_documents(
    &self,
    crew_id: i64,
    documents: Vec<NewCrewDocument>,
  ) -> Result<Vec<CrewDocument>> {
    let now     = Utc::now();
    let now_str = encode_dt(now);
    let docs    = documents.clone();

    let ids = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists = tx
          .query_row(
            "SELECT 1 FROM crew_members WHERE crew_id = ?1",
            rusqlite::params![crew_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !exists {
          return Ok(None);
        }
        let ids = insert_documents(&tx, crew_id, &docs, &now_str)?;
        tx.execute(
          "UPDATE crew_members SET updated_at = ?2 WHERE crew_id = ?1",
          rusqlite::params![crew_id, now_str],
        )?;
        tx.commit()?;
        Ok(Some(ids))
      })
      .await?
      .ok_or(Error::CrewNotFound(crew_id))?;

    Ok(built_documents(crew_id, ids, documents, now))
  }

  async fn list_crew_documents(&self, crew_id: i64) -> Result<Vec<CrewDocument>> {
    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DOCUMENT_COLUMNS} FROM crew_documents
           WHERE crew_id = ?1
           ORDER BY uploaded_at DESC, document_id DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![crew_id], RawDocument::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }

  async fn get_crew_document(
    &self,
    crew_id: i64,
    document_id: i64,
  ) -> Result<Option<CrewDocument>> {
    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {DOCUMENT_COLUMNS} FROM crew_documents
                 WHERE crew_id = ?1 AND document_id = ?2"
              ),
              rusqlite::params![crew_id, document_id],
              RawDocument::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawDocument::into_document).transpose()
  }

  // ── Staff ─────────────────────────────────────────────────────────────────

  async fn register_staff(&self, staff: NewStaffMember) -> Result<StaffMember> {
    let now_str = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO staff_members (
             full_name, email_or_whatsapp, mobile_number, location,
             position_applying, department, years_experience,
             current_employer, availability_date, education, certifications,
             salary_expectation, resume_file, photo_file, status,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     ?14, ?15, ?16, ?16)",
          rusqlite::params![
            staff.full_name,
            staff.email_or_whatsapp,
            staff.mobile_number,
            staff.location,
            staff.position_applying,
            staff.department.as_str(),
            staff.years_experience,
            staff.current_employer,
            encode_date(staff.availability_date),
            staff.education,
            staff.certifications,
            staff.salary_expectation,
            staff.resume_file,
            staff.photo_file,
            INITIAL_STAFF_STATUS.code(),
            now_str,
          ],
        )?;
        let staff_id = conn.last_insert_rowid();
        Ok((staff_id, query_staff(conn, staff_id)?))
      })
      .await?;

    let (staff_id, raw) = raw;
    raw.ok_or(Error::StaffNotFound(staff_id))?.into_staff()
  }

  async fn get_staff(&self, staff_id: i64) -> Result<Option<StaffMember>> {
    let raw = self
      .conn
      .call(move |conn| Ok(query_staff(conn, staff_id)?))
      .await?;
    raw.map(RawStaff::into_staff).transpose()
  }

  async fn list_staff(&self, query: &StaffQuery) -> Result<Vec<StaffMember>> {
    let status  = query.status.map(ApplicationStatus::code);
    let pattern = query
      .search
      .as_deref()
      .filter(|s| !s.trim().is_empty())
      .map(like_pattern);
    let limit   = limit_param(query.limit);

    let raws: Vec<RawStaff> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STAFF_COLUMNS} FROM staff_members
           WHERE (?1 IS NULL OR status = ?1)
             AND (?2 IS NULL
                  OR LOWER(full_name)         LIKE ?2 ESCAPE '\\'
                  OR LOWER(position_applying) LIKE ?2 ESCAPE '\\'
                  OR LOWER(department)        LIKE ?2 ESCAPE '\\')
           ORDER BY created_at DESC, staff_id DESC
           LIMIT ?3"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![status, pattern, limit], RawStaff::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStaff::into_staff).collect()
  }

  async fn update_staff_status(
    &self,
    staff_id: i64,
    status: ApplicationStatus,
    notes: Option<String>,
  ) -> Result<StaffMember> {
    let code    = status.code();
    let now_str = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE staff_members
           SET status = ?2, admin_notes = ?3, updated_at = ?4
           WHERE staff_id = ?1",
          rusqlite::params![staff_id, code, notes, now_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(query_staff(conn, staff_id)?)
      })
      .await?
      .ok_or(Error::StaffNotFound(staff_id))?;

    raw.into_staff()
  }

  // ── Admins ────────────────────────────────────────────────────────────────

  async fn dashboard_stats(&self) -> Result<DashboardStats> {
    use ApplicationStatus::{Approved, Screening};
    Ok(DashboardStats {
      total_crew:      self.count("crew_members", None).await?,
      total_staff:     self.count("staff_members", None).await?,
      crew_screening:  self.count("crew_members", Some(Screening)).await?,
      staff_screening: self.count("staff_members", Some(Screening)).await?,
      crew_approved:   self.count("crew_members", Some(Approved)).await?,
      staff_approved:  self.count("staff_members", Some(Approved)).await?,
    })
  }

  async fn create_admin(
    &self,
    username: String,
    password_hash: String,
  ) -> Result<Admin> {
    let now      = Utc::now();
    let now_str  = encode_dt(now);
    let name     = username.clone();
    let hash     = password_hash.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO admins (username, password_hash, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![name, hash, now_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await;

    let admin_id = match outcome {
      Ok(id) => id,
      Err(e) if is_unique_violation(&e, "admins.username") => {
        return Err(Error::AdminExists(username));
      }
      Err(e) => return Err(e.into()),
    };

    Ok(Admin { admin_id, username, password_hash, created_at: now })
  }

  async fn find_admin(&self, username: String) -> Result<Option<Admin>> {
    let raw: Option<RawAdmin> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT admin_id, username, password_hash, created_at
               FROM admins WHERE username = ?1",
              rusqlite::params![username],
              |row| {
                Ok(RawAdmin {
                  admin_id:      row.get(0)?,
                  username:      row.get(1)?,
                  password_hash: row.get(2)?,
                  created_at:    row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawAdmin::into_admin).transpose()
  }
}

// ─── SessionStore impl ───────────────────────────────────────────────────────

impl SessionStore for SqliteStore {
  type Error = Error;

  async fn create_session(
    &self,
    admin_id: i64,
    ttl: Duration,
  ) -> Result<SessionRecord> {
    let created_at = Utc::now();
    let record = SessionRecord {
      session_id: new_session_id(),
      admin_id,
      created_at,
      expires_at: created_at + ttl,
    };

    let id_str      = record.session_id.clone();
    let created_str = encode_dt(record.created_at);
    let expires_str = encode_dt(record.expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO admin_sessions (session_id, admin_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, admin_id, created_str, expires_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn get_session(
    &self,
    session_id: String,
  ) -> Result<Option<(SessionRecord, Admin)>> {
    let raw: Option<(RawSession, RawAdmin)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT s.session_id, s.admin_id, s.created_at, s.expires_at,
                      a.username, a.password_hash, a.created_at
               FROM admin_sessions s
               JOIN admins a ON a.admin_id = s.admin_id
               WHERE s.session_id = ?1",
              rusqlite::params![session_id],
              |row| {
                Ok((
                  RawSession {
                    session_id: row.get(0)?,
                    admin_id:   row.get(1)?,
                    created_at: row.get(2)?,
                    expires_at: row.get(3)?,
                  },
                  RawAdmin {
                    admin_id:      row.get(1)?,
                    username:      row.get(4)?,
                    password_hash: row.get(5)?,
                    created_at:    row.get(6)?,
                  },
                ))
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(s, a)| -> Result<_> { Ok((s.into_session()?, a.into_admin()?)) })
      .transpose()
  }

  async fn delete_session(&self, session_id: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM admin_sessions WHERE session_id = ?1",
          rusqlite::params![session_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
    let now_str = encode_dt(now);
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM admin_sessions WHERE expires_at <= ?1",
          rusqlite::params![now_str],
        )?)
      })
      .await?;
    Ok(n as u64)
  }
}
