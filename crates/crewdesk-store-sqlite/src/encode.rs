//! Encoding and decoding helpers between domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings with fixed microsecond precision so that
//! lexical order matches chronological order. Calendar dates are
//! `YYYY-MM-DD`. Statuses are their integer codes.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use crewdesk_core::{
  admin::{Admin, SessionRecord},
  crew::CrewMember,
  document::CrewDocument,
  staff::StaffMember,
  status::ApplicationStatus,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Integers ────────────────────────────────────────────────────────────────

pub fn decode_u32(column: &'static str, value: i64) -> Result<u32> {
  u32::try_from(value).map_err(|_| Error::OutOfRange { column, value })
}

pub fn decode_u64(column: &'static str, value: i64) -> Result<u64> {
  u64::try_from(value).map_err(|_| Error::OutOfRange { column, value })
}

/// `%text%` pattern for a case-insensitive `LIKE … ESCAPE '\'`.
pub fn like_pattern(text: &str) -> String {
  let escaped = text
    .trim()
    .to_lowercase()
    .replace('\\', "\\\\")
    .replace('%', "\\%")
    .replace('_', "\\_");
  format!("%{escaped}%")
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching the field order of [`RawCrew::from_row`].
pub const CREW_COLUMNS: &str = "
  crew_id, name, nationality, date_of_birth, mobile_number, email, rank,
  passport, years_experience, last_vessel_type, availability_date,
  available_port_city, emergency_contact_name, emergency_contact_phone,
  emergency_contact_relationship, status, admin_notes, profile_token,
  created_at, updated_at";

/// Raw values read directly from a `crew_members` row.
pub struct RawCrew {
  pub crew_id:                        i64,
  pub name:                           String,
  pub nationality:                    String,
  pub date_of_birth:                  String,
  pub mobile_number:                  String,
  pub email:                          String,
  pub rank:                           String,
  pub passport:                       String,
  pub years_experience:               i64,
  pub last_vessel_type:               Option<String>,
  pub availability_date:              String,
  pub available_port_city:            Option<String>,
  pub emergency_contact_name:         Option<String>,
  pub emergency_contact_phone:        Option<String>,
  pub emergency_contact_relationship: Option<String>,
  pub status:                         i64,
  pub admin_notes:                    Option<String>,
  pub profile_token:                  String,
  pub created_at:                     String,
  pub updated_at:                     String,
}

impl RawCrew {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      crew_id:                        row.get(0)?,
      name:                           row.get(1)?,
      nationality:                    row.get(2)?,
      date_of_birth:                  row.get(3)?,
      mobile_number:                  row.get(4)?,
      email:                          row.get(5)?,
      rank:                           row.get(6)?,
      passport:                       row.get(7)?,
      years_experience:               row.get(8)?,
      last_vessel_type:               row.get(9)?,
      availability_date:              row.get(10)?,
      available_port_city:            row.get(11)?,
      emergency_contact_name:         row.get(12)?,
      emergency_contact_phone:        row.get(13)?,
      emergency_contact_relationship: row.get(14)?,
      status:                         row.get(15)?,
      admin_notes:                    row.get(16)?,
      profile_token:                  row.get(17)?,
      created_at:                     row.get(18)?,
      updated_at:                     row.get(19)?,
    })
  }

  pub fn into_crew(self) -> Result<CrewMember> {
    Ok(CrewMember {
      crew_id:                        self.crew_id,
      name:                           self.name,
      nationality:                    self.nationality,
      date_of_birth:                  decode_date(&self.date_of_birth)?,
      mobile_number:                  self.mobile_number,
      email:                          self.email,
      rank:                           self.rank,
      passport:                       self.passport,
      years_experience:               decode_u32("years_experience", self.years_experience)?,
      last_vessel_type:               self.last_vessel_type,
      availability_date:              decode_date(&self.availability_date)?,
      available_port_city:            self.available_port_city,
      emergency_contact_name:         self.emergency_contact_name,
      emergency_contact_phone:        self.emergency_contact_phone,
      emergency_contact_relationship: self.emergency_contact_relationship,
      status:                         ApplicationStatus::from_code(self.status)?,
      admin_notes:                    self.admin_notes,
      profile_token:                  self.profile_token,
      created_at:                     decode_dt(&self.created_at)?,
      updated_at:                     decode_dt(&self.updated_at)?,
    })
  }
}

pub const DOCUMENT_COLUMNS: &str = "
  document_id, crew_id, kind, stored_path, original_filename, file_size,
  mime_type, uploaded_at";

/// Raw values read directly from a `crew_documents` row.
pub struct RawDocument {
  pub document_id:       i64,
  pub crew_id:           i64,
  pub kind:              String,
  pub stored_path:       String,
  pub original_filename: String,
  pub file_size:         i64,
  pub mime_type:         String,
  pub uploaded_at:       String,
}

impl RawDocument {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      document_id:       row.get(0)?,
      crew_id:           row.get(1)?,
      kind:              row.get(2)?,
      stored_path:       row.get(3)?,
      original_filename: row.get(4)?,
      file_size:         row.get(5)?,
      mime_type:         row.get(6)?,
      uploaded_at:       row.get(7)?,
    })
  }

  pub fn into_document(self) -> Result<CrewDocument> {
    Ok(CrewDocument {
      document_id:       self.document_id,
      crew_id:           self.crew_id,
      kind:              self.kind.parse()?,
      stored_path:       self.stored_path,
      original_filename: self.original_filename,
      file_size:         decode_u64("file_size", self.file_size)?,
      mime_type:         self.mime_type,
      uploaded_at:       decode_dt(&self.uploaded_at)?,
    })
  }
}

pub const STAFF_COLUMNS: &str = "
  staff_id, full_name, email_or_whatsapp, mobile_number, location,
  position_applying, department, years_experience, current_employer,
  availability_date, education, certifications, salary_expectation,
  resume_file, photo_file, status, admin_notes, created_at, updated_at";

/// Raw values read directly from a `staff_members` row.
pub struct RawStaff {
  pub staff_id:           i64,
  pub full_name:          String,
  pub email_or_whatsapp:  String,
  pub mobile_number:      String,
  pub location:           String,
  pub position_applying:  String,
  pub department:         String,
  pub years_experience:   i64,
  pub current_employer:   Option<String>,
  pub availability_date:  String,
  pub education:          Option<String>,
  pub certifications:     Option<String>,
  pub salary_expectation: Option<String>,
  pub resume_file:        Option<String>,
  pub photo_file:         Option<String>,
  pub status:             i64,
  pub admin_notes:        Option<String>,
  pub created_at:         String,
  pub updated_at:         String,
}

impl RawStaff {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      staff_id:           row.get(0)?,
      full_name:          row.get(1)?,
      email_or_whatsapp:  row.get(2)?,
      mobile_number:      row.get(3)?,
      location:           row.get(4)?,
      position_applying:  row.get(5)?,
      department:         row.get(6)?,
      years_experience:   row.get(7)?,
      current_employer:   row.get(8)?,
      availability_date:  row.get(9)?,
      education:          row.get(10)?,
      certifications:     row.get(11)?,
      salary_expectation: row.get(12)?,
      resume_file:        row.get(13)?,
      photo_file:         row.get(14)?,
      status:             row.get(15)?,
      admin_notes:        row.get(16)?,
      created_at:         row.get(17)?,
      updated_at:         row.get(18)?,
    })
  }

  pub fn into_staff(self) -> Result<StaffMember> {
    Ok(StaffMember {
      staff_id:           self.staff_id,
      full_name:          self.full_name,
      email_or_whatsapp:  self.email_or_whatsapp,
      mobile_number:      self.mobile_number,
      location:           self.location,
      position_applying:  self.position_applying,
      department:         self.department.parse()?,
      years_experience:   decode_u32("years_experience", self.years_experience)?,
      current_employer:   self.current_employer,
      availability_date:  decode_date(&self.availability_date)?,
      education:          self.education,
      certifications:     self.certifications,
      salary_expectation: self.salary_expectation,
      resume_file:        self.resume_file,
      photo_file:         self.photo_file,
      status:             ApplicationStatus::from_code(self.status)?,
      admin_notes:        self.admin_notes,
      created_at:         decode_dt(&self.created_at)?,
      updated_at:         decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read from `admins`, optionally joined with `admin_sessions`.
pub struct RawAdmin {
  pub admin_id:      i64,
  pub username:      String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawAdmin {
  pub fn into_admin(self) -> Result<Admin> {
    Ok(Admin {
      admin_id:      self.admin_id,
      username:      self.username,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawSession {
  pub session_id: String,
  pub admin_id:   i64,
  pub created_at: String,
  pub expires_at: String,
}

impl RawSession {
  pub fn into_session(self) -> Result<SessionRecord> {
    Ok(SessionRecord {
      session_id: self.session_id,
      admin_id:   self.admin_id,
      created_at: decode_dt(&self.created_at)?,
      expires_at: decode_dt(&self.expires_at)?,
    })
  }
}
