use std::collections::HashMap;
use std::io::Read;

use super::mapping::{field_for_header, RosterField};
use super::normalizer::normalize_header;

/// One CSV data row after header aliasing, before validation. Every field is
/// optional at this stage; the validator decides what is required.
#[derive(Debug, Default, Clone)]
pub(crate) struct RawRosterRow {
    pub(crate) email: Option<String>,
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
    pub(crate) sport: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) school: Option<String>,
    pub(crate) position: Option<String>,
    pub(crate) graduation_year: Option<String>,
    pub(crate) phone: Option<String>,
    pub(crate) instagram: Option<String>,
    pub(crate) tiktok: Option<String>,
    pub(crate) twitter: Option<String>,
    pub(crate) date_of_birth: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RawRosterRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<HashMap<String, String>>() {
        let cells = record?;
        let mut row = RawRosterRow::default();

        for (header, value) in cells {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            let Some(field) = field_for_header(&normalize_header(&header)) else {
                continue;
            };

            let slot = match field {
                RosterField::Email => &mut row.email,
                RosterField::FirstName => &mut row.first_name,
                RosterField::LastName => &mut row.last_name,
                RosterField::Sport => &mut row.sport,
                RosterField::State => &mut row.state,
                RosterField::School => &mut row.school,
                RosterField::Position => &mut row.position,
                RosterField::GraduationYear => &mut row.graduation_year,
                RosterField::Phone => &mut row.phone,
                RosterField::Instagram => &mut row.instagram,
                RosterField::TikTok => &mut row.tiktok,
                RosterField::Twitter => &mut row.twitter,
                RosterField::DateOfBirth => &mut row.date_of_birth,
            };
            *slot = Some(value.to_string());
        }

        rows.push(row);
    }

    Ok(rows)
}
