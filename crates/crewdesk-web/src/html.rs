//! Server-rendered HTML pages.
//!
//! Every dynamic value passes through [`escape`]. Form pages are driven by the
//! static [`FieldSpec`] tables so the server rules and the markup hints the
//! browser script reads (`required`, `type=email`, `type=tel`) stay in step.

use std::fmt::Write as _;

use crewdesk_core::{
  admin::DashboardStats,
  crew::CrewMember,
  document::{CrewDocument, DocumentChecklist, format_file_size},
  form::{
    CREW_FIELDS, CREW_FILE_FIELDS, FieldSpec, FormErrors, FormValues, LOGIN_FIELDS, Rule,
    STAFF_FIELDS, STAFF_FILE_FIELDS,
  },
  staff::{Department, StaffFile, StaffMember},
  status::ApplicationStatus,
};
use strum::IntoEnumIterator as _;

use crate::uploads::ALLOWED_EXTENSIONS;

pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
pub const DUPLICATE_PASSPORT: &str = "A crew member with this passport number already exists. Please verify your passport number.";
pub const NO_FILES_SELECTED: &str = "No files were selected for upload.";

// ─── Escaping ────────────────────────────────────────────────────────────────

pub fn escape(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#x27;"),
      _ => out.push(c),
    }
  }
  out
}

/// Percent-encode `s` for use as a query-string value.
pub fn url_encode(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for b in s.bytes() {
    if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
      out.push(b as char);
    } else {
      let _ = write!(out, "%{b:02X}");
    }
  }
  out
}

// ─── Notices ─────────────────────────────────────────────────────────────────

/// One-shot messages carried across a redirect in the `notice` query
/// parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
  CrewRegistered,
  StaffRegistered,
  StatusUpdated,
  LinkGenerated,
  LoggedOut,
}

impl Notice {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::CrewRegistered => "registered",
      Self::StaffRegistered => "staff-registered",
      Self::StatusUpdated => "status-updated",
      Self::LinkGenerated => "link-generated",
      Self::LoggedOut => "logged-out",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    [
      Self::CrewRegistered,
      Self::StaffRegistered,
      Self::StatusUpdated,
      Self::LinkGenerated,
      Self::LoggedOut,
    ]
    .into_iter()
    .find(|n| n.as_str() == s)
  }

  fn message(self) -> &'static str {
    match self {
      Self::CrewRegistered => "Registration successful! Your application has been submitted. Our team will review your profile and contact you with the next steps.",
      Self::StaffRegistered => "Registration successful! Your application has been submitted.",
      Self::StatusUpdated => "Status updated.",
      Self::LinkGenerated => "A new private profile link has been generated. Previous links no longer work.",
      Self::LoggedOut => "You have been logged out.",
    }
  }

  fn kind(self) -> &'static str {
    match self {
      Self::LoggedOut => "info",
      _ => "success",
    }
  }
}

fn alert(kind: &str, message: &str) -> String {
  format!(
    "<div class=\"alert alert-{kind}\" role=\"alert\">{}<button type=\"button\" class=\"alert-close\" aria-label=\"Close\">&times;</button></div>\n",
    escape(message)
  )
}

/// An alert the browser script never auto-dismisses.
fn permanent_alert(kind: &str, message: &str) -> String {
  format!(
    "<div class=\"alert alert-{kind} alert-permanent\" role=\"alert\">{}</div>\n",
    escape(message)
  )
}

fn notice_html(notice: Option<Notice>) -> String {
  notice.map(|n| alert(n.kind(), n.message())).unwrap_or_default()
}

fn badge(status: ApplicationStatus) -> String {
  format!(
    "<span class=\"badge bg-{}\">{}</span>",
    status.badge_class(),
    escape(status.label())
  )
}

// ─── Layout ──────────────────────────────────────────────────────────────────

const STYLE: &str = r#"
*{box-sizing:border-box}
body{margin:0;font-family:system-ui,-apple-system,"Segoe UI",Roboto,sans-serif;color:#1d2733;background:#f4f7fa}
a{color:#0b5cad}
nav{background:#0b2545;color:#fff;padding:.75rem 1.5rem;display:flex;gap:1.25rem;align-items:center}
nav a{color:#fff;text-decoration:none}
nav .brand{font-weight:700;margin-right:auto}
.container{max-width:1100px;margin:0 auto;padding:1.5rem}
.card{background:#fff;border:1px solid #dde3ea;border-radius:8px;padding:1.25rem;margin-bottom:1.25rem}
.grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(240px,1fr));gap:1rem}
.form-group{margin-bottom:1rem}
label{display:block;font-weight:600;margin-bottom:.25rem}
.required::after{content:" *";color:#c0392b}
.form-control{width:100%;padding:.5rem;border:1px solid #b8c2cc;border-radius:4px;font:inherit}
.form-control.is-valid{border-color:#2e8b57}
.form-control.is-invalid{border-color:#c0392b}
.invalid-feedback{color:#c0392b;font-size:.875rem;margin-top:.25rem}
.form-text{color:#5b6b7b;font-size:.8rem}
.btn{display:inline-block;padding:.5rem 1rem;border:0;border-radius:4px;background:#0b5cad;color:#fff;font:inherit;cursor:pointer;text-decoration:none}
.btn-secondary{background:#5b6b7b}
.btn-danger{background:#c0392b}
.btn:disabled{opacity:.65;cursor:wait}
.alert{padding:.75rem 1rem;border-radius:4px;margin-bottom:1rem;display:flex;justify-content:space-between;transition:opacity .3s}
.alert-success{background:#e3f4ea;color:#1e6b3f}
.alert-error{background:#fbe5e3;color:#8e2a1f}
.alert-warning{background:#fff4d6;color:#7a5a00}
.alert-info{background:#e3eefb;color:#0b4a8b}
.alert-close{background:none;border:0;font-size:1.1rem;cursor:pointer;color:inherit}
.badge{display:inline-block;padding:.15rem .5rem;border-radius:999px;font-size:.8rem;color:#fff}
.bg-secondary{background:#6c757d}.bg-warning{background:#d39e00}.bg-info{background:#138496}
.bg-success{background:#28a745}.bg-danger{background:#c0392b}.bg-dark{background:#343a40}
table{width:100%;border-collapse:collapse}
th,td{text-align:left;padding:.5rem;border-bottom:1px solid #e5e9ee;vertical-align:top}
.stats{display:grid;grid-template-columns:repeat(auto-fit,minmax(150px,1fr));gap:1rem}
.stat{background:#fff;border:1px solid #dde3ea;border-radius:8px;padding:1rem;text-align:center}
.stat strong{display:block;font-size:1.75rem}
.progress{background:#e5e9ee;border-radius:4px;height:.75rem;overflow:hidden}
.progress-bar{background:#28a745;height:100%}
.checklist li{margin-bottom:.5rem}
.done{color:#28a745}.missing{color:#c0392b}
.reveal{opacity:0;transform:translateY(12px);transition:opacity .4s,transform .4s}
.reveal.revealed{opacity:1;transform:none}
.inline{display:flex;gap:.5rem;align-items:flex-end;flex-wrap:wrap}
"#;

/// Which navigation bar to show.
#[derive(Debug, Clone, Copy)]
pub enum Nav<'a> {
  Public,
  Admin(&'a str),
}

pub fn layout(title: &str, nav: Nav<'_>, body: &str) -> String {
  let mut out = String::with_capacity(body.len() + STYLE.len() + 1024);
  out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
  out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
  let _ = writeln!(out, "<title>{} · Crewdesk</title>", escape(title));
  out.push_str("<style>");
  out.push_str(STYLE);
  out.push_str("</style>\n</head>\n<body>\n<nav>");
  match nav {
    Nav::Public => out.push_str(
      "<a class=\"brand\" href=\"/\">Crewdesk</a>\
       <a href=\"/register/crew\">Crew registration</a>\
       <a href=\"/register/staff\">Shore staff</a>\
       <a href=\"/track\">Track application</a>",
    ),
    Nav::Admin(username) => {
      out.push_str(
        "<a class=\"brand\" href=\"/admin\">Crewdesk Admin</a>\
         <a href=\"/admin/crew\">Crew</a>\
         <a href=\"/admin/staff\">Staff</a>",
      );
      let _ = write!(
        out,
        "<span>{}</span><form method=\"post\" action=\"/admin/logout\"><button class=\"btn btn-secondary\" type=\"submit\">Log out</button></form>",
        escape(username)
      );
    }
  }
  out.push_str("</nav>\n<main class=\"container\">\n");
  out.push_str(body);
  out.push_str("</main>\n<script src=\"/static/app.js\" defer></script>\n</body>\n</html>\n");
  out
}

pub fn error_page(title: &str, message: &str) -> String {
  let body = format!(
    "<div class=\"card\"><h1>{}</h1><p>{}</p><p><a href=\"/\">Return to the home page</a></p></div>\n",
    escape(title),
    escape(message)
  );
  layout(title, Nav::Public, &body)
}

pub fn home_page() -> String {
  let body = "\
<section class=\"card reveal\">
<h1>Join our fleet</h1>
<p>Register as a seafarer or apply for a shore-based position. Our crewing team reviews every application.</p>
</section>
<div class=\"grid\">
<section class=\"card reveal\"><h2>Seafarers</h2><p>Register with your passport, CDC and certificates.</p><a class=\"btn\" href=\"/register/crew\">Register as crew</a></section>
<section class=\"card reveal\"><h2>Shore staff</h2><p>Apply for operations, HR, technical or crewing roles.</p><a class=\"btn\" href=\"/register/staff\">Apply as staff</a></section>
<section class=\"card reveal\"><h2>Already registered?</h2><p>Check the status of your application with your passport number.</p><a class=\"btn btn-secondary\" href=\"/track\">Track application</a></section>
</div>
";
  layout("Welcome", Nav::Public, body)
}

// ─── Form fields ─────────────────────────────────────────────────────────────

fn input_type(spec: &FieldSpec) -> &'static str {
  spec
    .rules
    .iter()
    .find_map(|r| match r {
      Rule::Email => Some("email"),
      Rule::Phone => Some("tel"),
      Rule::Date => Some("date"),
      Rule::Integer { .. } => Some("number"),
      _ => None,
    })
    .unwrap_or("text")
}

fn max_len(spec: &FieldSpec) -> Option<usize> {
  spec.rules.iter().find_map(|r| match r {
    Rule::MaxLen(n) => Some(*n),
    _ => None,
  })
}

fn option_label(value: &str) -> &str {
  value
    .parse::<Department>()
    .map(Department::label)
    .unwrap_or(value)
}

fn label_html(name: &str, label: &str, required: bool) -> String {
  format!(
    "<label for=\"{name}\"{}>{}</label>",
    if required { " class=\"required\"" } else { "" },
    escape(label)
  )
}

fn feedback_html(errors: &FormErrors, name: &str) -> String {
  errors
    .get(name)
    .map(|msg| format!("<div class=\"invalid-feedback\">{}</div>", escape(msg)))
    .unwrap_or_default()
}

fn field_html(spec: &FieldSpec, values: &FormValues, errors: &FormErrors) -> String {
  let name = spec.name;
  let required = spec.is_required();
  let class = if errors.get(name).is_some() { "form-control is-invalid" } else { "form-control" };
  let value = values.raw(name);
  let req_attr = if required { " required" } else { "" };

  let control = if let Some(options) = spec.rules.iter().find_map(|r| match r {
    Rule::OneOf(opts) => Some(*opts),
    _ => None,
  }) {
    let mut s = format!("<select id=\"{name}\" name=\"{name}\" class=\"{class}\"{req_attr}><option value=\"\">Select…</option>");
    for opt in options {
      let _ = write!(
        s,
        "<option value=\"{}\"{}>{}</option>",
        escape(opt),
        if *opt == value { " selected" } else { "" },
        escape(option_label(opt))
      );
    }
    s.push_str("</select>");
    s
  } else if max_len(spec).is_some_and(|n| n > 255) {
    format!(
      "<textarea id=\"{name}\" name=\"{name}\" class=\"{class}\" rows=\"4\"{req_attr}>{}</textarea>",
      escape(value)
    )
  } else {
    let maxlength = max_len(spec)
      .map(|n| format!(" maxlength=\"{n}\""))
      .unwrap_or_default();
    let min_max = spec
      .rules
      .iter()
      .find_map(|r| match r {
        Rule::Integer { min, max } => Some(format!(" min=\"{min}\" max=\"{max}\"")),
        _ => None,
      })
      .unwrap_or_default();
    format!(
      "<input id=\"{name}\" name=\"{name}\" type=\"{}\" class=\"{class}\" value=\"{}\"{maxlength}{min_max}{req_attr}>",
      input_type(spec),
      escape(value)
    )
  };

  format!(
    "<div class=\"form-group\">{}{control}{}</div>\n",
    label_html(name, spec.label, required),
    feedback_html(errors, name)
  )
}

fn file_input_html(name: &str, label: &str, multiple: bool, errors: &FormErrors, max_bytes: u64) -> String {
  let accept: Vec<String> = ALLOWED_EXTENSIONS.iter().map(|e| format!(".{e}")).collect();
  let class = if errors.get(name).is_some() { "form-control is-invalid" } else { "form-control" };
  format!(
    "<div class=\"form-group\">{}<input id=\"{name}\" name=\"{name}\" type=\"file\" class=\"{class}\" accept=\"{}\" data-max-bytes=\"{max_bytes}\"{}>\
     <div class=\"form-text\">PDF, JPG or PNG, up to {}{}.</div>{}</div>\n",
    label_html(name, label, false),
    accept.join(","),
    if multiple { " multiple" } else { "" },
    format_file_size(max_bytes),
    if multiple { " each" } else { "" },
    feedback_html(errors, name)
  )
}

fn section(title: &str, specs: &[FieldSpec], names: &[&str], values: &FormValues, errors: &FormErrors) -> String {
  let mut out = format!("<section class=\"card reveal\"><h2>{}</h2><div class=\"grid\">\n", escape(title));
  for name in names {
    if let Some(spec) = specs.iter().find(|s| s.name == *name) {
      out.push_str(&field_html(spec, values, errors));
    }
  }
  out.push_str("</div></section>\n");
  out
}

fn submit_button(label: &str, loading: &str) -> String {
  format!(
    "<button class=\"btn\" type=\"submit\" data-loading-text=\"{}\">{}</button>",
    escape(loading),
    escape(label)
  )
}

// ─── Public pages ────────────────────────────────────────────────────────────

const CREW_SECTIONS: &[(&str, &[&str])] = &[
  ("Personal details", &["name", "nationality", "date_of_birth", "mobile_number", "email"]),
  ("Professional details", &["rank", "passport", "years_experience", "last_vessel_type"]),
  ("Availability", &["availability_date", "available_port_city"]),
  ("Emergency contact", &[
    "emergency_contact_name",
    "emergency_contact_phone",
    "emergency_contact_relationship",
  ]),
];

const STAFF_SECTIONS: &[(&str, &[&str])] = &[
  ("Personal details", &["full_name", "email_or_whatsapp", "mobile_number", "location"]),
  ("Position", &["position_applying", "department", "years_experience", "current_employer", "availability_date"]),
  ("Background", &["education", "certifications", "salary_expectation"]),
];

/// Crew registration form, optionally re-rendered with errors.
pub fn crew_form_page(
  values: &FormValues,
  errors: &FormErrors,
  form_error: Option<&str>,
  max_bytes: u64,
) -> String {
  let mut body = String::from("<h1>Crew registration</h1>\n");
  if let Some(msg) = form_error {
    body.push_str(&alert("error", msg));
  } else if !errors.is_empty() {
    body.push_str(&alert("error", "Please correct the errors below."));
  }
  body.push_str("<form method=\"post\" action=\"/register/crew\" enctype=\"multipart/form-data\" novalidate>\n");
  for (title, names) in CREW_SECTIONS {
    body.push_str(&section(title, CREW_FIELDS, names, values, errors));
  }
  body.push_str("<section class=\"card reveal\"><h2>Documents</h2><div class=\"grid\">\n");
  for (field, kind) in CREW_FILE_FIELDS {
    body.push_str(&file_input_html(field, kind.display_name(), true, errors, max_bytes));
  }
  body.push_str("</div></section>\n");
  body.push_str(&submit_button("Submit registration", "Submitting…"));
  body.push_str("\n</form>\n");
  layout("Crew registration", Nav::Public, &body)
}

/// Shore staff application form.
pub fn staff_form_page(
  values: &FormValues,
  errors: &FormErrors,
  notice: Option<Notice>,
  max_bytes: u64,
) -> String {
  let mut body = String::from("<h1>Shore staff application</h1>\n");
  body.push_str(&notice_html(notice));
  if !errors.is_empty() {
    body.push_str(&alert("error", "Please correct the errors below."));
  }
  body.push_str("<form method=\"post\" action=\"/register/staff\" enctype=\"multipart/form-data\" novalidate>\n");
  for (title, names) in STAFF_SECTIONS {
    body.push_str(&section(title, STAFF_FIELDS, names, values, errors));
  }
  body.push_str("<section class=\"card reveal\"><h2>Attachments</h2><div class=\"grid\">\n");
  for (field, which) in STAFF_FILE_FIELDS {
    body.push_str(&file_input_html(field, which.label(), false, errors, max_bytes));
  }
  body.push_str("</div></section>\n");
  body.push_str(&submit_button("Submit application", "Submitting…"));
  body.push_str("\n</form>\n");
  layout("Shore staff application", Nav::Public, &body)
}

/// Outcome of a status lookup.
#[derive(Debug, Clone, Copy)]
pub enum TrackResult<'a> {
  NotSearched,
  Found(&'a CrewMember),
  NotFound,
}

pub fn track_page(passport: &str, result: TrackResult<'_>, notice: Option<Notice>) -> String {
  let mut body = String::from("<h1>Track your application</h1>\n");
  body.push_str(&notice_html(notice));
  let _ = write!(
    body,
    "<form class=\"card inline\" method=\"get\" action=\"/track\">\
     <div class=\"form-group\"><label for=\"passport\" class=\"required\">Passport number</label>\
     <input id=\"passport\" name=\"passport\" class=\"form-control\" value=\"{}\" required></div>\
     <div class=\"form-group\">{}</div></form>\n",
    escape(passport),
    submit_button("Check status", "Checking…")
  );
  match result {
    TrackResult::NotSearched => {}
    TrackResult::NotFound => {
      body.push_str(&alert("error", "No crew member found with this passport number."));
    }
    TrackResult::Found(crew) => {
      let _ = write!(
        body,
        "<section class=\"card reveal\"><h2>{}</h2><p>Rank: {}</p><p>Status: {}</p></section>\n",
        escape(&crew.name),
        escape(&crew.rank),
        badge(crew.status)
      );
    }
  }
  layout("Track application", Nav::Public, &body)
}

// ─── Private profile ─────────────────────────────────────────────────────────

fn checklist_html(checklist: &DocumentChecklist<'_>, link: &dyn Fn(&CrewDocument) -> String) -> String {
  let percent = checklist.completion_percent();
  let mut out = format!(
    "<p>Profile completion: <strong>{percent}%</strong></p>\
     <div class=\"progress\"><div class=\"progress-bar\" style=\"width:{percent}%\"></div></div>\n"
  );
  for section in &checklist.sections {
    let _ = write!(out, "<h3>{}</h3><ul class=\"checklist\">", escape(section.category.title()));
    for entry in &section.entries {
      let (class, mark) = if entry.uploaded() { ("done", "✓") } else { ("missing", "✗") };
      let _ = write!(
        out,
        "<li><span class=\"{class}\">{mark}</span> {}{}",
        escape(entry.kind.display_name()),
        if entry.kind.required() { "" } else { " <em>(optional)</em>" }
      );
      if !entry.files.is_empty() {
        out.push_str("<ul>");
        for doc in &entry.files {
          let _ = write!(
            out,
            "<li><a href=\"{}\">{}</a> <span class=\"form-text\">{}</span></li>",
            escape(&link(doc)),
            escape(&doc.original_filename),
            doc.size_display()
          );
        }
        out.push_str("</ul>");
      }
      out.push_str("</li>");
    }
    out.push_str("</ul>\n");
  }
  out
}

/// Feedback shown at the top of the private profile page.
#[derive(Debug, Clone, Copy)]
pub enum ProfileNotice<'a> {
  None,
  Uploaded(usize),
  NoFiles,
  Rejected(&'a FormErrors),
}

pub fn profile_page(
  crew: &CrewMember,
  documents: &[CrewDocument],
  notice: ProfileNotice<'_>,
  max_bytes: u64,
) -> String {
  let base = format!("/my-profile/{}/{}", crew.crew_id, crew.profile_token);
  let empty = FormErrors::default();
  let errors = match notice {
    ProfileNotice::Rejected(errors) => errors,
    _ => &empty,
  };

  let mut body = format!("<h1>{}</h1>\n", escape(&crew.name));
  match notice {
    ProfileNotice::None => {}
    ProfileNotice::Uploaded(n) => body.push_str(&alert(
      "success",
      &format!("Successfully uploaded {n} file{}.", if n == 1 { "" } else { "s" }),
    )),
    ProfileNotice::NoFiles => body.push_str(&alert("warning", NO_FILES_SELECTED)),
    ProfileNotice::Rejected(_) => body.push_str(&alert("error", "Some files were rejected. Nothing was uploaded.")),
  }
  let _ = write!(
    body,
    "<section class=\"card reveal\"><div class=\"grid\">\
     <p>Rank<br><strong>{}</strong></p><p>Passport<br><strong>{}</strong></p>\
     <p>Status<br>{}</p><p>Available from<br><strong>{}</strong></p></div>\
     {}</section>\n",
    escape(&crew.rank),
    escape(&crew.passport),
    badge(crew.status),
    crew.availability_date,
    permanent_alert("info", "This page is private. Do not share its link.")
  );

  let checklist = DocumentChecklist::build(documents);
  let link = |doc: &CrewDocument| format!("{base}/documents/{}", doc.document_id);
  let _ = write!(
    body,
    "<section class=\"card reveal\"><h2>Documents</h2>{}</section>\n",
    checklist_html(&checklist, &link)
  );

  let _ = write!(
    body,
    "<form class=\"card\" method=\"post\" action=\"{}\" enctype=\"multipart/form-data\"><h2>Upload more documents</h2><div class=\"grid\">\n",
    escape(&base)
  );
  for section in &checklist.sections {
    for entry in &section.entries {
      body.push_str(&file_input_html(entry.kind.as_str(), entry.kind.display_name(), true, errors, max_bytes));
    }
  }
  body.push_str("</div>");
  body.push_str(&submit_button("Upload", "Uploading…"));
  body.push_str("</form>\n");
  layout("My profile", Nav::Public, &body)
}

// ─── Admin pages ─────────────────────────────────────────────────────────────

pub fn login_page(next: &str, error: Option<&str>, username: Option<&str>) -> String {
  let mut body = String::from("<section class=\"card\" style=\"max-width:420px;margin:2rem auto\"><h1>Admin login</h1>\n");
  if let Some(msg) = error {
    body.push_str(&alert("error", msg));
  }
  let mut values = FormValues::new();
  values.insert("username", username.unwrap_or_default());
  let none = FormErrors::default();
  let _ = write!(
    body,
    "<form method=\"post\" action=\"/admin/login\"><input type=\"hidden\" name=\"next\" value=\"{}\">",
    escape(next)
  );
  for spec in LOGIN_FIELDS {
    if spec.name == "password" {
      body.push_str(
        "<div class=\"form-group\"><label for=\"password\" class=\"required\">Password</label>\
         <input id=\"password\" name=\"password\" type=\"password\" class=\"form-control\" required></div>\n",
      );
    } else {
      body.push_str(&field_html(spec, &values, &none));
    }
  }
  body.push_str(&submit_button("Log in", "Logging in…"));
  body.push_str("</form></section>\n");
  layout("Admin login", Nav::Public, &body)
}

pub fn logged_out_page() -> String {
  let body = format!(
    "{}<p><a href=\"/admin/login\">Log in again</a></p>\n",
    alert(Notice::LoggedOut.kind(), Notice::LoggedOut.message())
  );
  layout("Logged out", Nav::Public, &body)
}

fn stat(label: &str, value: u64) -> String {
  format!("<div class=\"stat reveal\"><strong>{value}</strong>{}</div>", escape(label))
}

fn crew_rows(crew: &[CrewMember]) -> String {
  let mut out = String::new();
  for c in crew {
    let _ = write!(
      out,
      "<tr><td><a href=\"/admin/crew/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
      c.crew_id,
      escape(&c.name),
      escape(&c.rank),
      escape(&c.passport),
      escape(&c.nationality),
      badge(c.status),
      c.created_at.format("%Y-%m-%d %H:%M")
    );
  }
  out
}

const CREW_HEADER: &str = "<tr><th>Name</th><th>Rank</th><th>Passport</th><th>Nationality</th><th>Status</th><th>Registered</th></tr>";

fn staff_rows(staff: &[StaffMember]) -> String {
  let mut out = String::new();
  for s in staff {
    let _ = write!(
      out,
      "<tr><td><a href=\"/admin/staff/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
      s.staff_id,
      escape(&s.full_name),
      escape(&s.position_applying),
      escape(s.department.label()),
      escape(&s.location),
      badge(s.status),
      s.created_at.format("%Y-%m-%d %H:%M")
    );
  }
  out
}

const STAFF_HEADER: &str = "<tr><th>Name</th><th>Position</th><th>Department</th><th>Location</th><th>Status</th><th>Applied</th></tr>";

pub fn dashboard_page(
  admin: &str,
  stats: &DashboardStats,
  recent_crew: &[CrewMember],
  recent_staff: &[StaffMember],
) -> String {
  let mut body = String::from("<h1>Dashboard</h1>\n<div class=\"stats\">");
  body.push_str(&stat("Total crew", stats.total_crew));
  body.push_str(&stat("Crew in screening", stats.crew_screening));
  body.push_str(&stat("Crew approved", stats.crew_approved));
  body.push_str(&stat("Total staff", stats.total_staff));
  body.push_str(&stat("Staff in screening", stats.staff_screening));
  body.push_str(&stat("Staff approved", stats.staff_approved));
  body.push_str("</div>\n");
  let _ = write!(
    body,
    "<section class=\"card\"><h2>Recent crew registrations</h2><table>{CREW_HEADER}{}</table><p><a href=\"/admin/crew\">All crew</a></p></section>\n\
     <section class=\"card\"><h2>Recent staff applications</h2><table>{STAFF_HEADER}{}</table><p><a href=\"/admin/staff\">All staff</a></p></section>\n",
    crew_rows(recent_crew),
    staff_rows(recent_staff)
  );
  layout("Dashboard", Nav::Admin(admin), &body)
}

fn status_select(id: &str, selected: Option<ApplicationStatus>, any_label: Option<&str>) -> String {
  let mut out = format!("<select id=\"{id}\" name=\"status\" class=\"form-control\">");
  if let Some(label) = any_label {
    let _ = write!(out, "<option value=\"\">{}</option>", escape(label));
  }
  for status in ApplicationStatus::iter() {
    let _ = write!(
      out,
      "<option value=\"{}\"{}>{}</option>",
      status.slug(),
      if Some(status) == selected { " selected" } else { "" },
      escape(status.label())
    );
  }
  out.push_str("</select>");
  out
}

fn filter_form(action: &str, status: Option<ApplicationStatus>, search: &str, placeholder: &str) -> String {
  format!(
    "<form class=\"card inline\" method=\"get\" action=\"{action}\">\
     <div class=\"form-group\"><label for=\"status\">Status</label>{}</div>\
     <div class=\"form-group\"><label for=\"search\">Search</label><input id=\"search\" name=\"search\" class=\"form-control\" value=\"{}\" placeholder=\"{}\"></div>\
     <div class=\"form-group\"><button class=\"btn\" type=\"submit\">Filter</button></div></form>\n",
    status_select("status", status, Some("All statuses")),
    escape(search),
    escape(placeholder)
  )
}

pub fn crew_list_page(admin: &str, crew: &[CrewMember], status: Option<ApplicationStatus>, search: &str) -> String {
  let mut body = String::from("<h1>Crew members</h1>\n");
  body.push_str(&filter_form("/admin/crew", status, search, "Name, passport or rank"));
  if crew.is_empty() {
    body.push_str("<p>No crew members match.</p>\n");
  } else {
    let _ = write!(body, "<section class=\"card\"><table>{CREW_HEADER}{}</table></section>\n", crew_rows(crew));
  }
  layout("Crew members", Nav::Admin(admin), &body)
}

pub fn staff_list_page(admin: &str, staff: &[StaffMember], status: Option<ApplicationStatus>, search: &str) -> String {
  let mut body = String::from("<h1>Shore staff</h1>\n");
  body.push_str(&filter_form("/admin/staff", status, search, "Name, position or department"));
  if staff.is_empty() {
    body.push_str("<p>No staff applications match.</p>\n");
  } else {
    let _ = write!(body, "<section class=\"card\"><table>{STAFF_HEADER}{}</table></section>\n", staff_rows(staff));
  }
  layout("Shore staff", Nav::Admin(admin), &body)
}

fn detail_rows(rows: &[(&str, String)]) -> String {
  let mut out = String::from("<table>");
  for (label, value) in rows {
    let _ = write!(out, "<tr><th>{}</th><td>{}</td></tr>", escape(label), escape(value));
  }
  out.push_str("</table>");
  out
}

fn opt(value: &Option<String>) -> String { value.clone().unwrap_or_else(|| "—".to_owned()) }

fn status_form(action: &str, status: ApplicationStatus, notes: Option<&str>) -> String {
  format!(
    "<form class=\"card\" method=\"post\" action=\"{action}\"><h2>Update status</h2>\
     <div class=\"form-group\"><label for=\"new-status\">Status</label>{}</div>\
     <div class=\"form-group\"><label for=\"notes\">Admin notes</label><textarea id=\"notes\" name=\"notes\" class=\"form-control\" rows=\"3\">{}</textarea></div>\
     {}</form>\n",
    status_select("new-status", Some(status), None),
    escape(notes.unwrap_or_default()),
    submit_button("Save", "Saving…")
  )
}

pub fn crew_detail_page(
  admin: &str,
  crew: &CrewMember,
  documents: &[CrewDocument],
  profile_url: &str,
  notice: Option<Notice>,
) -> String {
  let id = crew.crew_id;
  let mut body = format!("<h1>{} {}</h1>\n", escape(&crew.name), badge(crew.status));
  body.push_str(&notice_html(notice));

  let rows = [
    ("Rank", crew.rank.clone()),
    ("Passport", crew.passport.clone()),
    ("Nationality", crew.nationality.clone()),
    ("Date of birth", crew.date_of_birth.to_string()),
    ("Mobile", crew.mobile_number.clone()),
    ("Email", crew.email.clone()),
    ("Years of experience", crew.years_experience.to_string()),
    ("Last vessel type", opt(&crew.last_vessel_type)),
    ("Available from", crew.availability_date.to_string()),
    ("Available port / city", opt(&crew.available_port_city)),
    ("Emergency contact", opt(&crew.emergency_contact_name)),
    ("Emergency phone", opt(&crew.emergency_contact_phone)),
    ("Relationship", opt(&crew.emergency_contact_relationship)),
    ("Registered", crew.created_at.format("%Y-%m-%d %H:%M UTC").to_string()),
    ("Last updated", crew.updated_at.format("%Y-%m-%d %H:%M UTC").to_string()),
  ];
  let _ = write!(
    body,
    "<section class=\"card\"><h2>Details</h2>{}<p><a class=\"btn btn-secondary\" href=\"/admin/crew/{id}/export.csv\">Export CSV</a></p></section>\n",
    detail_rows(&rows)
  );

  let checklist = DocumentChecklist::build(documents);
  let link = |doc: &CrewDocument| format!("/admin/crew/{id}/documents/{}", doc.document_id);
  let _ = write!(
    body,
    "<section class=\"card\"><h2>Documents</h2>{}</section>\n",
    checklist_html(&checklist, &link)
  );

  body.push_str(&status_form(&format!("/admin/crew/{id}/status"), crew.status, crew.admin_notes.as_deref()));

  let _ = write!(
    body,
    "<section class=\"card\"><h2>Private profile link</h2>\
     <div class=\"inline\"><input id=\"profile-link\" class=\"form-control\" value=\"{}\" readonly>\
     <button class=\"btn btn-secondary\" type=\"button\" data-copy-target=\"profile-link\">Copy</button></div>\
     <form method=\"post\" action=\"/admin/crew/{id}/profile-link\"><p class=\"form-text\">Generating a new link disables the current one.</p>\
     <button class=\"btn btn-danger\" type=\"submit\">Generate new link</button></form></section>\n",
    escape(profile_url)
  );
  layout(&crew.name, Nav::Admin(admin), &body)
}

pub fn staff_detail_page(admin: &str, staff: &StaffMember, notice: Option<Notice>) -> String {
  let id = staff.staff_id;
  let mut body = format!("<h1>{} {}</h1>\n", escape(&staff.full_name), badge(staff.status));
  body.push_str(&notice_html(notice));
  let rows = [
    ("Position", staff.position_applying.clone()),
    ("Department", staff.department.label().to_owned()),
    ("Email / WhatsApp", staff.email_or_whatsapp.clone()),
    ("Mobile", staff.mobile_number.clone()),
    ("Location", staff.location.clone()),
    ("Years of experience", staff.years_experience.to_string()),
    ("Current employer", opt(&staff.current_employer)),
    ("Available from", staff.availability_date.to_string()),
    ("Education", opt(&staff.education)),
    ("Certifications", opt(&staff.certifications)),
    ("Salary expectation", opt(&staff.salary_expectation)),
    ("Applied", staff.created_at.format("%Y-%m-%d %H:%M UTC").to_string()),
  ];
  let _ = write!(body, "<section class=\"card\"><h2>Details</h2>{}", detail_rows(&rows));
  body.push_str("<p>");
  for which in [StaffFile::Resume, StaffFile::Photo] {
    if staff.file(which).is_some() {
      let _ = write!(
        body,
        "<a class=\"btn btn-secondary\" href=\"/admin/staff/{id}/files/{}\">{}</a> ",
        which.as_str(),
        which.label()
      );
    }
  }
  body.push_str("</p></section>\n");
  body.push_str(&status_form(&format!("/admin/staff/{id}/status"), staff.status, staff.admin_notes.as_deref()));
  layout(&staff.full_name, Nav::Admin(admin), &body)
}
