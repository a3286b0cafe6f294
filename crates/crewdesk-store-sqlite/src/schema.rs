//! SQL schema for the Crewdesk SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS admins (
    admin_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS admin_sessions (
    session_id TEXT PRIMARY KEY,
    admin_id   INTEGER NOT NULL REFERENCES admins(admin_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

-- Crew rows are never deleted by the application.
CREATE TABLE IF NOT EXISTS crew_members (
    crew_id                        INTEGER PRIMARY KEY AUTOINCREMENT,
    name                           TEXT NOT NULL,
    nationality                    TEXT NOT NULL,
    date_of_birth                  TEXT NOT NULL,   -- YYYY-MM-DD
    mobile_number                  TEXT NOT NULL,
    email                          TEXT NOT NULL,
    rank                           TEXT NOT NULL,
    passport                       TEXT NOT NULL UNIQUE,
    years_experience               INTEGER NOT NULL,
    last_vessel_type               TEXT,
    availability_date              TEXT NOT NULL,
    available_port_city            TEXT,
    emergency_contact_name         TEXT,
    emergency_contact_phone        TEXT,
    emergency_contact_relationship TEXT,
    status                         INTEGER NOT NULL DEFAULT 0,
    admin_notes                    TEXT,
    profile_token                  TEXT NOT NULL UNIQUE,
    created_at                     TEXT NOT NULL,
    updated_at                     TEXT NOT NULL,
    CHECK (status IN (0, 1, 2, 3, -1, -2))
);

CREATE TABLE IF NOT EXISTS crew_documents (
    document_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    crew_id           INTEGER NOT NULL REFERENCES crew_members(crew_id) ON DELETE CASCADE,
    kind              TEXT NOT NULL,   -- DocumentKind name
    stored_path       TEXT NOT NULL,   -- relative to the upload root
    original_filename TEXT NOT NULL,
    file_size         INTEGER NOT NULL,
    mime_type         TEXT NOT NULL,
    uploaded_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS staff_members (
    staff_id           INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name          TEXT NOT NULL,
    email_or_whatsapp  TEXT NOT NULL,
    mobile_number      TEXT NOT NULL,
    location           TEXT NOT NULL,
    position_applying  TEXT NOT NULL,
    department         TEXT NOT NULL,
    years_experience   INTEGER NOT NULL,
    current_employer   TEXT,
    availability_date  TEXT NOT NULL,
    education          TEXT,
    certifications     TEXT,
    salary_expectation TEXT,
    resume_file        TEXT,
    photo_file         TEXT,
    status             INTEGER NOT NULL DEFAULT 1,
    admin_notes        TEXT,
    created_at         TEXT NOT NULL,
    updated_at         TEXT NOT NULL,
    CHECK (status IN (0, 1, 2, 3, -1, -2))
);

CREATE INDEX IF NOT EXISTS crew_status_idx     ON crew_members(status);
CREATE INDEX IF NOT EXISTS crew_created_idx    ON crew_members(created_at);
CREATE INDEX IF NOT EXISTS documents_crew_idx  ON crew_documents(crew_id);
CREATE INDEX IF NOT EXISTS staff_status_idx    ON staff_members(status);
CREATE INDEX IF NOT EXISTS sessions_expiry_idx ON admin_sessions(expires_at);

PRAGMA user_version = 1;
";
