//! Static form definitions and server-side field validation.
//!
//! Each registration form is a fixed table of [`FieldSpec`]s. Validation walks
//! the table in order and records the first failing rule per field.

use std::{collections::BTreeMap, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;

use crate::{
  crew::{NewCrewMember, normalize_passport},
  document::DocumentKind,
  staff::{Department, NewStaffMember, StaffFile},
};

// ─── Rules ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub enum Rule {
  Required,
  MaxLen(usize),
  Email,
  Phone,
  /// ISO `YYYY-MM-DD`.
  Date,
  Integer { min: i64, max: i64 },
  OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
  pub name:  &'static str,
  pub label: &'static str,
  pub rules: &'static [Rule],
}

impl FieldSpec {
  pub fn is_required(&self) -> bool {
    self.rules.iter().any(|r| matches!(r, Rule::Required))
  }
}

static EMAIL_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]{10,}$").unwrap());

impl Rule {
  /// `None` if `value` satisfies the rule. Empty optional values are checked
  /// only by `Required`.
  fn check(&self, label: &str, value: &str) -> Option<String> {
    if value.is_empty() {
      return matches!(self, Rule::Required)
        .then(|| format!("{label} is required."));
    }
    match *self {
      Rule::Required => None,
      Rule::MaxLen(n) => (value.chars().count() > n)
        .then(|| format!("{label} must be at most {n} characters.")),
      Rule::Email => (!EMAIL_RE.is_match(value))
        .then(|| "Please enter a valid email address.".to_owned()),
      Rule::Phone => (!PHONE_RE.is_match(value))
        .then(|| "Please enter a valid phone number.".to_owned()),
      Rule::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .is_err()
        .then(|| format!("{label} must be a valid date (YYYY-MM-DD).")),
      Rule::Integer { min, max } => match value.parse::<i64>() {
        Ok(n) if (min..=max).contains(&n) => None,
        _ => Some(format!("{label} must be a number between {min} and {max}.")),
      },
      Rule::OneOf(options) => (!options.iter().any(|o| *o == value))
        .then(|| format!("Please choose a valid {}.", label.to_lowercase())),
    }
  }
}

// ─── Form tables ─────────────────────────────────────────────────────────────

use Rule::*;

const YEARS: Rule = Integer { min: 0, max: 60 };

pub const CREW_FIELDS: &[FieldSpec] = &[
  FieldSpec { name: "name",                 label: "Full name",           rules: &[Required, MaxLen(128)] },
  FieldSpec { name: "nationality",          label: "Nationality",         rules: &[Required, MaxLen(64)] },
  FieldSpec { name: "date_of_birth",        label: "Date of birth",       rules: &[Required, Date] },
  FieldSpec { name: "mobile_number",        label: "Mobile number",       rules: &[Required, MaxLen(20), Phone] },
  FieldSpec { name: "email",                label: "Email",               rules: &[Required, MaxLen(120), Email] },
  FieldSpec { name: "rank",                 label: "Rank",                rules: &[Required, MaxLen(64)] },
  FieldSpec { name: "passport",             label: "Passport number",     rules: &[Required, MaxLen(32)] },
  FieldSpec { name: "years_experience",     label: "Years of experience", rules: &[Required, YEARS] },
  FieldSpec { name: "last_vessel_type",     label: "Last vessel type",    rules: &[MaxLen(128)] },
  FieldSpec { name: "availability_date",    label: "Availability date",   rules: &[Required, Date] },
  FieldSpec { name: "available_port_city",  label: "Available port / city", rules: &[MaxLen(128)] },
  FieldSpec { name: "emergency_contact_name",  label: "Emergency contact name",  rules: &[MaxLen(128)] },
  FieldSpec { name: "emergency_contact_phone", label: "Emergency contact phone", rules: &[MaxLen(20), Phone] },
  FieldSpec { name: "emergency_contact_relationship", label: "Relationship", rules: &[MaxLen(64)] },
];

/// Multipart file fields on the crew registration form, each mapped to the
/// document kind it produces.
pub const CREW_FILE_FIELDS: &[(&str, DocumentKind)] = &[
  ("passport_file", DocumentKind::Passport),
  ("cdc_file", DocumentKind::Cdc),
  ("resume_file", DocumentKind::Resume),
  ("photo_file", DocumentKind::Photo),
  ("medical_certificate_file", DocumentKind::MedicalCertificate),
];

const DEPARTMENTS: &[&str] = &["operations", "hr", "technical", "crewing"];

pub const STAFF_FIELDS: &[FieldSpec] = &[
  FieldSpec { name: "full_name",          label: "Full name",            rules: &[Required, MaxLen(128)] },
  FieldSpec { name: "email_or_whatsapp",  label: "Email or WhatsApp",    rules: &[Required, MaxLen(128)] },
  FieldSpec { name: "mobile_number",      label: "Mobile number",        rules: &[Required, MaxLen(20), Phone] },
  FieldSpec { name: "location",           label: "Location",             rules: &[Required, MaxLen(128)] },
  FieldSpec { name: "position_applying",  label: "Position",             rules: &[Required, MaxLen(128)] },
  FieldSpec { name: "department",         label: "Department",           rules: &[Required, OneOf(DEPARTMENTS)] },
  FieldSpec { name: "years_experience",   label: "Years of experience",  rules: &[Required, YEARS] },
  FieldSpec { name: "current_employer",   label: "Current employer",     rules: &[MaxLen(128)] },
  FieldSpec { name: "availability_date",  label: "Availability date",    rules: &[Required, Date] },
  FieldSpec { name: "education",          label: "Education",            rules: &[MaxLen(255)] },
  FieldSpec { name: "certifications",     label: "Certifications",       rules: &[MaxLen(2000)] },
  FieldSpec { name: "salary_expectation", label: "Salary expectation",   rules: &[MaxLen(64)] },
];

/// Multipart file fields on the staff form; each holds at most one file.
pub const STAFF_FILE_FIELDS: &[(&str, StaffFile)] = &[
  ("resume_file", StaffFile::Resume),
  ("photo_file", StaffFile::Photo),
];

pub const LOGIN_FIELDS: &[FieldSpec] = &[
  FieldSpec { name: "username", label: "Username", rules: &[Required, MaxLen(64)] },
  FieldSpec { name: "password", label: "Password", rules: &[Required] },
];

// ─── Values and errors ───────────────────────────────────────────────────────

/// Submitted text fields, keyed by field name. Values are kept verbatim so a
/// re-rendered form shows exactly what the user typed.
#[derive(Debug, Clone, Default)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.0.insert(name.into(), value.into());
  }

  /// Raw value, or `""` when absent.
  pub fn raw(&self, name: &str) -> &str {
    self.0.get(name).map(String::as_str).unwrap_or("")
  }

  pub fn trimmed(&self, name: &str) -> &str { self.raw(name).trim() }

  fn required(&self, name: &str) -> String { self.trimmed(name).to_owned() }

  fn optional(&self, name: &str) -> Option<String> {
    Some(self.trimmed(name)).filter(|s| !s.is_empty()).map(str::to_owned)
  }

  fn date(&self, name: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(self.trimmed(name), "%Y-%m-%d").ok()
  }

  fn years(&self, name: &str) -> Option<u32> { self.trimmed(name).parse().ok() }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

/// Field name → message for the first rule each field failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn get(&self, field: &str) -> Option<&str> {
    self.0.get(field).map(String::as_str)
  }

  pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_insert_with(|| message.into());
  }

  /// Fold in `other`, keeping any message already recorded for a field.
  pub fn merge(&mut self, other: FormErrors) {
    for (field, message) in other.0 {
      self.insert(field, message);
    }
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }
}

/// Run every rule in `specs` over `values`.
pub fn validate(specs: &[FieldSpec], values: &FormValues) -> FormErrors {
  let mut errors = FormErrors::default();
  for spec in specs {
    let value = values.trimmed(spec.name);
    if let Some(msg) = spec.rules.iter().find_map(|r| r.check(spec.label, value)) {
      errors.insert(spec.name, msg);
    }
  }
  errors
}

// ─── Typed conversion ────────────────────────────────────────────────────────

/// Validate the crew form and build the store input.
pub fn crew_from_form(values: &FormValues) -> Result<NewCrewMember, FormErrors> {
  let errors = validate(CREW_FIELDS, values);
  if !errors.is_empty() {
    return Err(errors);
  }
  // Validation guarantees the parsed fields below are present.
  let (Some(date_of_birth), Some(availability_date), Some(years_experience)) = (
    values.date("date_of_birth"),
    values.date("availability_date"),
    values.years("years_experience"),
  ) else {
    return Err(errors);
  };
  Ok(NewCrewMember {
    name: values.required("name"),
    nationality: values.required("nationality"),
    date_of_birth,
    mobile_number: values.required("mobile_number"),
    email: values.required("email"),
    rank: values.required("rank"),
    passport: normalize_passport(values.raw("passport")),
    years_experience,
    last_vessel_type: values.optional("last_vessel_type"),
    availability_date,
    available_port_city: values.optional("available_port_city"),
    emergency_contact_name: values.optional("emergency_contact_name"),
    emergency_contact_phone: values.optional("emergency_contact_phone"),
    emergency_contact_relationship: values
      .optional("emergency_contact_relationship"),
  })
}

/// Validate the staff form and build the store input. File paths are filled
/// in by the caller once uploads are staged.
pub fn staff_from_form(values: &FormValues) -> Result<NewStaffMember, FormErrors> {
  let errors = validate(STAFF_FIELDS, values);
  if !errors.is_empty() {
    return Err(errors);
  }
  let (Some(availability_date), Some(years_experience), Ok(department)) = (
    values.date("availability_date"),
    values.years("years_experience"),
    values.trimmed("department").parse::<Department>(),
  ) else {
    return Err(errors);
  };
  Ok(NewStaffMember {
    full_name: values.required("full_name"),
    email_or_whatsapp: values.required("email_or_whatsapp"),
    mobile_number: values.required("mobile_number"),
    location: values.required("location"),
    position_applying: values.required("position_applying"),
    department,
    years_experience,
    current_employer: values.optional("current_employer"),
    availability_date,
    education: values.optional("education"),
    certifications: values.optional("certifications"),
    salary_expectation: values.optional("salary_expectation"),
    resume_file: None,
    photo_file: None,
  })
}
