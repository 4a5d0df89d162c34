// src/pipeline/normalizer.rs
//! Maps the heterogeneous raw payload into the canonical profile model.
//!
//! The external source is not consistent about field names, so every
//! logical field is resolved through an ordered alias table with
//! first-match-wins semantics. Entries that fail their minimal-identity
//! rule are dropped; skills and languages are deduplicated
//! case-insensitively.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashSet;
use tracing::info;

use crate::types::profile::{
    CanonicalProfile, CertificationEntry, EducationEntry, ExperienceEntry, ImportMetadata,
    LanguageEntry, PersonalInfo, ProjectEntry, Provenance, SkillEntry, VolunteerEntry,
};

// Alias tables, ordered by preference. First match wins.
const NAME: &[&str] = &["name", "full_name", "fullName"];
const TITLE: &[&str] = &["headline", "title", "position"];
const EMAIL: &[&str] = &["email"];
const PHONE: &[&str] = &["phone"];
const LOCATION: &[&str] = &["location", "geo_location", "city"];
const PROFILE_URL: &[&str] = &["url", "input_url", "public_profile_url"];
const SUMMARY: &[&str] = &["summary", "about"];

const EXPERIENCE_LIST: &[&str] = &["experience", "experiences"];
const POSITION: &[&str] = &["title", "position", "job_title"];
const COMPANY: &[&str] = &["company", "company_name", "organization"];
const START_DATE: &[&str] = &["start_date", "startDate", "starts_at", "from"];
const END_DATE: &[&str] = &["end_date", "endDate", "ends_at", "to"];
const CURRENT: &[&str] = &["current", "is_current"];
const DESCRIPTION: &[&str] = &["description", "summary"];

const EDUCATION_LIST: &[&str] = &["educations_details", "education"];
const DEGREE: &[&str] = &["degree", "qualification"];
const INSTITUTION: &[&str] = &["school", "institution", "university"];
const FIELD: &[&str] = &["field", "field_of_study", "major"];
const GPA: &[&str] = &["gpa", "grade"];

const SKILL_LIST: &[&str] = &["skills"];
const SKILL_NAME: &[&str] = &["name", "skill"];
const LEVEL: &[&str] = &["level", "proficiency"];

const LANGUAGE_LIST: &[&str] = &["languages"];
const LANGUAGE_NAME: &[&str] = &["name", "language"];
const PROFICIENCY: &[&str] = &["proficiency", "level"];

const CERTIFICATION_LIST: &[&str] = &["certifications"];
const AWARD_LIST: &[&str] = &["honors_and_awards"];
const CERT_NAME: &[&str] = &["name", "title", "award"];
const ISSUER: &[&str] = &["issuer", "organization", "authority"];
const CERT_DATE: &[&str] = &["date", "issue_date", "issued_date"];
const URL: &[&str] = &["url", "link"];

const VOLUNTEER_LIST: &[&str] = &["volunteering", "volunteer_experience"];
const ROLE: &[&str] = &["role", "position", "title"];
const ORGANIZATION: &[&str] = &["organization", "company"];
const CAUSE: &[&str] = &["cause", "field"];

const PROJECT_LIST: &[&str] = &["projects"];
const PROJECT_NAME: &[&str] = &["name", "title"];
const TECHNOLOGIES: &[&str] = &["technologies", "skills"];

/// Build the canonical profile from one raw extraction record.
/// Purely functional apart from the import timestamp.
pub fn normalize(payload: &Value) -> CanonicalProfile {
    let profile = CanonicalProfile {
        personal_info: normalize_personal_info(payload),
        experience: normalize_experience(payload),
        education: normalize_education(payload),
        skills: normalize_skills(payload),
        languages: normalize_languages(payload),
        certifications: normalize_certifications(payload),
        volunteer_experience: normalize_volunteering(payload),
        projects: normalize_projects(payload),
        metadata: ImportMetadata {
            source: "primary".to_string(),
            imported_at: Utc::now().to_rfc3339(),
        },
    };

    info!(
        "Normalized profile: name: {}, experience: {}, education: {}, skills: {}, projects: {}",
        profile.personal_info.full_name,
        profile.experience.len(),
        profile.education.len(),
        profile.skills.len(),
        profile.projects.len()
    );

    profile
}

fn normalize_personal_info(payload: &Value) -> PersonalInfo {
    PersonalInfo {
        full_name: first_string(payload, NAME),
        title: first_string(payload, TITLE),
        email: first_string(payload, EMAIL),
        phone: first_string(payload, PHONE),
        location: first_string(payload, LOCATION),
        profile_url: first_string(payload, PROFILE_URL),
        summary: first_string(payload, SUMMARY),
    }
}

fn normalize_experience(payload: &Value) -> Vec<ExperienceEntry> {
    list_entries(payload, EXPERIENCE_LIST)
        .iter()
        .map(|exp| ExperienceEntry {
            position: first_string(exp, POSITION),
            company: first_string(exp, COMPANY),
            location: first_string(exp, LOCATION),
            start_date: format_date(first_value(exp, START_DATE)),
            end_date: format_date(first_value(exp, END_DATE)),
            current: first_bool(exp, CURRENT),
            description: first_string(exp, DESCRIPTION),
        })
        .filter(|exp| !exp.position.is_empty() || !exp.company.is_empty())
        .collect()
}

fn normalize_education(payload: &Value) -> Vec<EducationEntry> {
    list_entries(payload, EDUCATION_LIST)
        .iter()
        .map(|edu| EducationEntry {
            degree: first_string(edu, DEGREE),
            institution: first_string(edu, INSTITUTION),
            field: first_string(edu, FIELD),
            start_date: format_date(first_value(edu, START_DATE)),
            end_date: format_date(first_value(edu, END_DATE)),
            current: first_bool(edu, CURRENT),
            gpa: first_string(edu, GPA),
        })
        .filter(|edu| !edu.degree.is_empty() || !edu.institution.is_empty())
        .collect()
}

fn normalize_skills(payload: &Value) -> Vec<SkillEntry> {
    let skills = list_entries(payload, SKILL_LIST)
        .iter()
        .filter_map(|skill| skill_from_raw(skill, Provenance::Primary))
        .collect();
    dedup_skills(skills)
}

/// Map one raw skill record - either a bare string or a structured
/// object - into a canonical entry. Empty names are dropped.
pub(crate) fn skill_from_raw(value: &Value, provenance: Provenance) -> Option<SkillEntry> {
    let (name, level) = match value {
        Value::String(s) => (clean_text(s), String::new()),
        Value::Object(_) => (first_string(value, SKILL_NAME), first_string(value, LEVEL)),
        _ => return None,
    };

    if name.is_empty() {
        return None;
    }

    Some(SkillEntry {
        name,
        level,
        provenance,
    })
}

/// Case-insensitive dedup on skill name, keeping the first occurrence.
pub(crate) fn dedup_skills(skills: Vec<SkillEntry>) -> Vec<SkillEntry> {
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .filter(|skill| seen.insert(skill.name.to_lowercase()))
        .collect()
}

fn normalize_languages(payload: &Value) -> Vec<LanguageEntry> {
    let mut seen = HashSet::new();
    list_entries(payload, LANGUAGE_LIST)
        .iter()
        .filter_map(|lang| {
            let (name, proficiency) = match lang {
                Value::String(s) => (clean_text(s), String::new()),
                Value::Object(_) => (
                    first_string(lang, LANGUAGE_NAME),
                    first_string(lang, PROFICIENCY),
                ),
                _ => return None,
            };
            if name.is_empty() || !seen.insert(name.to_lowercase()) {
                return None;
            }
            Some(LanguageEntry { name, proficiency })
        })
        .collect()
}

fn normalize_certifications(payload: &Value) -> Vec<CertificationEntry> {
    // The source splits these across two collections; both map to the
    // same canonical shape.
    let certifications = list_entries(payload, CERTIFICATION_LIST);
    let awards = list_entries(payload, AWARD_LIST);

    certifications
        .iter()
        .chain(awards.iter())
        .map(|cert| CertificationEntry {
            name: first_string(cert, CERT_NAME),
            issuer: first_string(cert, ISSUER),
            date: format_date(first_value(cert, CERT_DATE)),
            url: first_string(cert, URL),
        })
        .filter(|cert| !cert.name.is_empty())
        .collect()
}

fn normalize_volunteering(payload: &Value) -> Vec<VolunteerEntry> {
    list_entries(payload, VOLUNTEER_LIST)
        .iter()
        .map(|vol| VolunteerEntry {
            role: first_string(vol, ROLE),
            organization: first_string(vol, ORGANIZATION),
            cause: first_string(vol, CAUSE),
            start_date: format_date(first_value(vol, START_DATE)),
            end_date: format_date(first_value(vol, END_DATE)),
            current: first_bool(vol, CURRENT),
            description: first_string(vol, DESCRIPTION),
        })
        .filter(|vol| !vol.role.is_empty() || !vol.organization.is_empty())
        .collect()
}

fn normalize_projects(payload: &Value) -> Vec<ProjectEntry> {
    list_entries(payload, PROJECT_LIST)
        .iter()
        .map(|proj| ProjectEntry {
            name: first_string(proj, PROJECT_NAME),
            description: first_string(proj, DESCRIPTION),
            url: first_string(proj, URL),
            start_date: format_date(first_value(proj, START_DATE)),
            end_date: format_date(first_value(proj, END_DATE)),
            technologies: first_value(proj, TECHNOLOGIES)
                .and_then(Value::as_array)
                .map(|arr| {
                    arr.iter()
                        .filter_map(Value::as_str)
                        .map(clean_text)
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
        .filter(|proj| !proj.name.is_empty())
        .collect()
}

/// Resolve an alias table against a record, returning the first value
/// present. Absent keys and explicit nulls are skipped.
fn first_value<'a>(record: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| record.get(alias))
        .find(|v| !v.is_null())
}

/// First non-empty string for an alias table, cleaned of stray whitespace.
fn first_string(record: &Value, aliases: &[&str]) -> String {
    aliases
        .iter()
        .filter_map(|alias| record.get(alias))
        .filter_map(Value::as_str)
        .map(clean_text)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn first_bool(record: &Value, aliases: &[&str]) -> bool {
    aliases
        .iter()
        .filter_map(|alias| record.get(alias))
        .filter_map(Value::as_bool)
        .next()
        .unwrap_or(false)
}

/// The raw list under the first matching alias, or empty when the field
/// is absent or not an array.
fn list_entries<'a>(payload: &'a Value, aliases: &[&str]) -> &'a [Value] {
    first_value(payload, aliases)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Collapse runs of whitespace and newlines into single spaces.
pub(crate) fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Emit one canonical date string (`YYYY` or `YYYY-MM`) from the three
/// raw shapes the source produces: a passthrough string, a structured
/// `{year, month}` record, or an epoch number (seconds or milliseconds).
/// Anything else yields an empty string.
pub(crate) fn format_date(value: Option<&Value>) -> String {
    let Some(value) = value else {
        return String::new();
    };

    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => {
            let Some(year) = map.get("year").and_then(Value::as_i64) else {
                return String::new();
            };
            match map.get("month").and_then(Value::as_i64) {
                Some(month) if (1..=12).contains(&month) => format!("{:04}-{:02}", year, month),
                _ => format!("{:04}", year),
            }
        }
        Value::Number(n) => {
            let Some(raw) = n.as_i64() else {
                return String::new();
            };
            // Millisecond epochs are 13 digits for contemporary dates.
            let seconds = if raw.abs() >= 1_000_000_000_000 {
                raw / 1000
            } else {
                raw
            };
            DateTime::<Utc>::from_timestamp(seconds, 0)
                .map(|dt| dt.format("%Y-%m").to_string())
                .unwrap_or_default()
        }
        _ => String::new(),
    }
}
