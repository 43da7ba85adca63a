use super::normalizer::normalize_header;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Canonical roster columns the validator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RosterField {
    Email,
    FirstName,
    LastName,
    Sport,
    State,
    School,
    Position,
    GraduationYear,
    Phone,
    Instagram,
    TikTok,
    Twitter,
    DateOfBirth,
}

static HEADER_MAP: OnceLock<HashMap<String, RosterField>> = OnceLock::new();

pub(crate) fn field_for_header(normalized_header: &str) -> Option<RosterField> {
    header_map().get(normalized_header).copied()
}

fn header_map() -> &'static HashMap<String, RosterField> {
    HEADER_MAP.get_or_init(|| {
        const HEADER_TO_FIELD: &[(&str, RosterField)] = &[
            ("email", RosterField::Email),
            ("email address", RosterField::Email),
            ("e-mail", RosterField::Email),
            ("athlete email", RosterField::Email),
            ("first_name", RosterField::FirstName),
            ("first name", RosterField::FirstName),
            ("first", RosterField::FirstName),
            ("given name", RosterField::FirstName),
            ("last_name", RosterField::LastName),
            ("last name", RosterField::LastName),
            ("last", RosterField::LastName),
            ("surname", RosterField::LastName),
            ("family name", RosterField::LastName),
            ("sport", RosterField::Sport),
            ("primary sport", RosterField::Sport),
            ("state", RosterField::State),
            ("state code", RosterField::State),
            ("st", RosterField::State),
            ("school", RosterField::School),
            ("school_name", RosterField::School),
            ("school name", RosterField::School),
            ("institution", RosterField::School),
            ("position", RosterField::Position),
            ("pos", RosterField::Position),
            ("graduation_year", RosterField::GraduationYear),
            ("graduation year", RosterField::GraduationYear),
            ("grad year", RosterField::GraduationYear),
            ("class of", RosterField::GraduationYear),
            ("phone", RosterField::Phone),
            ("phone number", RosterField::Phone),
            ("mobile", RosterField::Phone),
            ("cell", RosterField::Phone),
            ("instagram", RosterField::Instagram),
            ("instagram handle", RosterField::Instagram),
            ("ig", RosterField::Instagram),
            ("tiktok", RosterField::TikTok),
            ("tiktok handle", RosterField::TikTok),
            ("twitter", RosterField::Twitter),
            ("twitter handle", RosterField::Twitter),
            ("x handle", RosterField::Twitter),
            ("date_of_birth", RosterField::DateOfBirth),
            ("date of birth", RosterField::DateOfBirth),
            ("dob", RosterField::DateOfBirth),
            ("birthdate", RosterField::DateOfBirth),
        ];

        let mut map = HashMap::with_capacity(HEADER_TO_FIELD.len());
        for (header, field) in HEADER_TO_FIELD {
            map.insert(normalize_header(header), *field);
        }
        map
    })
}

#[cfg(test)]
pub(crate) fn lookup_for_tests(header: &str) -> Option<RosterField> {
    field_for_header(&normalize_header(header))
}
