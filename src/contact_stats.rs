use serde::Serialize;

use crate::catalog::{BUSINESS_EMAIL, PERSONAL_EMAIL};
use crate::record::FieldLookup;

/// How many records carry each kind of contact channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContactStats {
    pub mobile_phone: usize,
    pub direct_number: usize,
    pub personal_phone: usize,
    pub personal_email: usize,
    pub business_email: usize,
    pub linkedin: usize,
    pub homeowner: usize,
}

impl ContactStats {
    pub fn from_records<R: FieldLookup>(records: &[R]) -> Self {
        let mut stats = Self::default();
        for record in records {
            let has = |field: &str| usize::from(record.populated(field).is_some());
            stats.mobile_phone += has("MOBILE_PHONE");
            stats.direct_number += has("DIRECT_NUMBER");
            stats.personal_phone += has("PERSONAL_PHONE");
            stats.personal_email += has(PERSONAL_EMAIL);
            stats.business_email += has(BUSINESS_EMAIL);
            stats.linkedin += has("LINKEDIN_URL");
            stats.homeowner += usize::from(record.field("HOMEOWNER") == Some("Y"));
        }
        stats
    }

    /// (group, [(label, count)]) rows for display.
    pub fn groups(&self) -> Vec<(&'static str, Vec<(&'static str, usize)>)> {
        vec![
            (
                "Phone Numbers",
                vec![
                    ("Mobile", self.mobile_phone),
                    ("Direct", self.direct_number),
                    ("Personal", self.personal_phone),
                ],
            ),
            (
                "Emails",
                vec![
                    ("Personal", self.personal_email),
                    ("Business", self.business_email),
                ],
            ),
            ("LinkedIn Profiles", vec![("Total", self.linkedin)]),
            ("Homeowner Status", vec![("Yes", self.homeowner)]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[test]
    fn counts_populated_channels() {
        let records = vec![
            Record::new()
                .with_field("MOBILE_PHONE", "555-0100")
                .with_field(PERSONAL_EMAIL, "a@x.example")
                .with_field("HOMEOWNER", "Y"),
            Record::new()
                .with_field("MOBILE_PHONE", " ")
                .with_field(BUSINESS_EMAIL, "b@corp.example")
                .with_field("LINKEDIN_URL", "https://linkedin.example/in/b")
                .with_field("HOMEOWNER", "N"),
        ];
        let stats = ContactStats::from_records(&records);
        assert_eq!(stats.mobile_phone, 1);
        assert_eq!(stats.personal_email, 1);
        assert_eq!(stats.business_email, 1);
        assert_eq!(stats.linkedin, 1);
        assert_eq!(stats.homeowner, 1);
        assert_eq!(stats.direct_number, 0);
    }

    #[test]
    fn groups_cover_every_counter() {
        let stats = ContactStats {
            mobile_phone: 1,
            direct_number: 2,
            personal_phone: 3,
            personal_email: 4,
            business_email: 5,
            linkedin: 6,
            homeowner: 7,
        };
        let sum: usize = stats
            .groups()
            .iter()
            .flat_map(|(_, items)| items.iter().map(|(_, n)| *n))
            .sum();
        assert_eq!(sum, 28);
    }
}
