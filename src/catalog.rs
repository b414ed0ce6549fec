//! Static domain knowledge about contact columns: label maps between raw codes and display
//! labels, per-column ordering tables, composite (virtual) columns and the per-kind column lists.

use crate::DatasetKind;

/// Logical column standing for "has a personal and/or business email".
pub const EMAIL: &str = "EMAIL";
pub const PERSONAL_EMAIL: &str = "PERSONAL_EMAIL";
pub const BUSINESS_EMAIL: &str = "BUSINESS_EMAIL";

/// Label of the synthetic bucket holding records without a usable value.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Pairs of (raw code, display label). Each label appears at most once per table.
pub type LabelMap = &'static [(&'static str, &'static str)];

/// Physical fields making up the EMAIL column, with the label each one contributes.
const EMAIL_MEMBERS: LabelMap = &[
    (PERSONAL_EMAIL, "Personal Email"),
    (BUSINESS_EMAIL, "Business Email"),
];

/// Logical columns that have no physical field of their own.
const COMPOSITE_COLUMNS: &[(&str, LabelMap)] = &[(EMAIL, EMAIL_MEMBERS)];

const GENDER_LABELS: LabelMap = &[("F", "Female"), ("M", "Male"), ("U", "Unknown")];

const YES_NO_LABELS: LabelMap = &[("Y", "Yes"), ("N", "No")];

const REVENUE_LABELS: LabelMap = &[
    ("Under 1 Million", "< $1M"),
    ("1 Million to 5 Million", "$1M - $5M"),
    ("5 Million to 10 Million", "$5M - $10M"),
    ("10 Million to 25 Million", "$10M - $25M"),
    ("25 Million to 50 Million", "$25M - $50M"),
    ("50 Million to 100 Million", "$50M - $100M"),
    ("100 Million to 250 Million", "$100M - $250M"),
    ("250 Million to 500 Million", "$250M - $500M"),
    ("500 Million to 1 Billion", "$500M - $1B"),
    ("1 Billion and Over", "> $1B"),
];

const INCOME_RANGE_LABELS: LabelMap = &[
    ("Less than $20,000", "< $20k"),
    ("$20,000 to $44,999", "$20k - $45k"),
    ("$45,000 to $59,999", "$45k - $60k"),
    ("$60,000 to $74,999", "$60k - $75k"),
    ("$75,000 to $99,999", "$75k - $100k"),
    ("$100,000 to $149,999", "$100k - $150k"),
    ("$150,000 to $199,999", "$150k - $200k"),
    ("$200,000 to $249,000", "$200k - $250k"),
    ("$250,000+", "> $250k"),
];

const NET_WORTH_LABELS: LabelMap = &[
    ("-$20,000 to -$2,500", "-$20k to -$2.5k"),
    ("-$2,499 to $2,499", "-$2.5k to $2.5k"),
    ("$2,500 to $24,999", "$2.5k to $25k"),
    ("$25,000 to $49,999", "$25k to $50k"),
    ("$50,000 to $74,999", "$50k to $75k"),
    ("$75,000 to $99,999", "$75k to $100k"),
    ("$100,000 to $149,999", "$100k to $150k"),
    ("$150,000 to $249,999", "$150k to $250k"),
    ("$250,000 to $374,999", "$250k to $375k"),
    ("$375,000 to $499,999", "$375k to $500k"),
    ("$500,000 to $749,999", "$500k to $750k"),
    ("$750,000 to $999,999", "$750k to $1M"),
    ("More than $1,000,000", "$1M+"),
];

const GENDER_ORDER: &[&str] = &["Female", "Male", "Unknown"];

const YES_NO_ORDER: &[&str] = &["Yes", "No"];

const EMAIL_ORDER: &[&str] = &["Personal Email", "Business Email"];

const COMPANY_SIZE_ORDER: &[&str] = &[
    "1 to 10",
    "11 to 25",
    "26 to 50",
    "51 to 100",
    "101 to 250",
    "251 to 500",
    "501 to 1000",
    "1001 to 5000",
    "5001 to 10000",
    "10000+",
];

const REVENUE_ORDER: &[&str] = &[
    "< $1M",
    "$1M - $5M",
    "$5M - $10M",
    "$10M - $25M",
    "$25M - $50M",
    "$50M - $100M",
    "$100M - $250M",
    "$250M - $500M",
    "$500M - $1B",
    "> $1B",
];

const AGE_RANGE_ORDER: &[&str] = &["18-24", "25-34", "35-44", "45-54", "55-64", "65 and older"];

const INCOME_RANGE_ORDER: &[&str] = &[
    "< $20k",
    "$20k - $45k",
    "$45k - $60k",
    "$60k - $75k",
    "$75k - $100k",
    "$100k - $150k",
    "$150k - $200k",
    "$200k - $250k",
    "> $250k",
];

const NET_WORTH_ORDER: &[&str] = &[
    "-$20k to -$2.5k",
    "-$2.5k to $2.5k",
    "$2.5k to $25k",
    "$25k to $50k",
    "$50k to $75k",
    "$75k to $100k",
    "$100k to $150k",
    "$150k to $250k",
    "$250k to $375k",
    "$375k to $500k",
    "$500k to $750k",
    "$750k to $1M",
    "$1M+",
];

const B2B_SUB_FILTERABLE_COLUMNS: &[&str] = &[
    "COMPANY_INDUSTRY",
    "JOB_TITLE",
    "COMPANY_EMPLOYEE_COUNT",
    "COMPANY_REVENUE",
    "SENIORITY_LEVEL",
    EMAIL,
];

const B2C_SUB_FILTERABLE_COLUMNS: &[&str] = &[
    "AGE_RANGE",
    "GENDER",
    "MARRIED",
    "CHILDREN",
    "INCOME_RANGE",
    "NET_WORTH",
    EMAIL,
];

/// Every column that has a label map, for exhaustive checks.
pub const LABELED_COLUMNS: &[&str] = &[
    "GENDER",
    "MARRIED",
    "CHILDREN",
    "HOMEOWNER",
    EMAIL,
    "COMPANY_REVENUE",
    "INCOME_RANGE",
    "NET_WORTH",
];

/// How a logical column is read from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind<'a> {
    /// One physical field holding raw codes.
    Direct { field: &'a str },
    /// Present when any member field is populated; each member contributes its own label.
    PresenceUnion { members: LabelMap },
}

/// Map a physical field name to the logical column it is filtered under.
///
/// Members of a composite column (the email fields) collapse onto that column; every other
/// name is returned unchanged.
pub fn normalize_column(name: &str) -> &str {
    COMPOSITE_COLUMNS
        .iter()
        .find(|(_, members)| members.iter().any(|(field, _)| *field == name))
        .map(|(column, _)| *column)
        .unwrap_or(name)
}

/// Describe how `column` (logical or physical) is read from a record.
pub fn column_kind(column: &str) -> ColumnKind<'_> {
    let column = normalize_column(column);
    match COMPOSITE_COLUMNS.iter().find(|(name, _)| *name == column) {
        Some((_, members)) => ColumnKind::PresenceUnion { members },
        None => ColumnKind::Direct { field: column },
    }
}

/// Raw → display label table for a column, if it has one.
pub fn label_map(column: &str) -> Option<LabelMap> {
    match normalize_column(column) {
        "GENDER" => Some(GENDER_LABELS),
        "MARRIED" | "CHILDREN" | "HOMEOWNER" => Some(YES_NO_LABELS),
        EMAIL => Some(EMAIL_MEMBERS),
        "COMPANY_REVENUE" => Some(REVENUE_LABELS),
        "INCOME_RANGE" => Some(INCOME_RANGE_LABELS),
        "NET_WORTH" => Some(NET_WORTH_LABELS),
        _ => None,
    }
}

/// Display label for a raw value. Values without a mapping are shown as-is.
///
/// For EMAIL the raw values are the physical field names.
pub fn display_of<'a>(column: &str, raw: &'a str) -> &'a str {
    label_map(column)
        .and_then(|map| map.iter().find(|(key, _)| *key == raw))
        .map(|(_, label)| *label)
        .unwrap_or(raw)
}

/// Raw code behind a display label. Labels that match nothing are treated as already raw.
pub fn raw_of<'a>(column: &str, display: &'a str) -> &'a str {
    label_map(column)
        .and_then(|map| map.iter().find(|(_, label)| *label == display))
        .map(|(key, _)| *key)
        .unwrap_or(display)
}

/// Fixed precedence of display labels for a column, if it has one.
pub fn order_of(column: &str) -> Option<&'static [&'static str]> {
    match normalize_column(column) {
        "GENDER" => Some(GENDER_ORDER),
        "MARRIED" | "CHILDREN" | "HOMEOWNER" => Some(YES_NO_ORDER),
        EMAIL => Some(EMAIL_ORDER),
        "COMPANY_EMPLOYEE_COUNT" => Some(COMPANY_SIZE_ORDER),
        "COMPANY_REVENUE" => Some(REVENUE_ORDER),
        "AGE_RANGE" => Some(AGE_RANGE_ORDER),
        "INCOME_RANGE" => Some(INCOME_RANGE_ORDER),
        "NET_WORTH" => Some(NET_WORTH_ORDER),
        _ => None,
    }
}

/// Columns a dataset kind may be sub-filtered on, in presentation order.
pub fn sub_filterable_columns(kind: DatasetKind) -> &'static [&'static str] {
    match kind {
        DatasetKind::B2b => B2B_SUB_FILTERABLE_COLUMNS,
        DatasetKind::B2c => B2C_SUB_FILTERABLE_COLUMNS,
    }
}

pub fn is_sub_filterable(kind: DatasetKind, column: &str) -> bool {
    sub_filterable_columns(kind).contains(&normalize_column(column))
}

/// Guess the dataset kind from its header. B2B wins when both vocabularies appear.
pub fn detect_kind<S: AsRef<str>>(headers: &[S]) -> Option<DatasetKind> {
    let has_any = |columns: &[&str]| {
        headers
            .iter()
            .any(|h| columns.contains(&h.as_ref()) && h.as_ref() != EMAIL)
    };
    if has_any(B2B_SUB_FILTERABLE_COLUMNS) {
        Some(DatasetKind::B2b)
    } else if has_any(B2C_SUB_FILTERABLE_COLUMNS) {
        Some(DatasetKind::B2c)
    } else {
        None
    }
}

/// Human-readable column heading: email fields read as "EMAIL", underscores become spaces.
pub fn column_display_name(column: &str) -> String {
    normalize_column(column).replace('_', " ")
}

/// Presentation rank of a column for a dataset kind. B2C columns follow a fixed order with
/// unlisted columns last; B2B columns all share one rank so a stable sort keeps input order.
pub fn column_rank(kind: DatasetKind, column: &str) -> usize {
    match kind {
        DatasetKind::B2b => 0,
        DatasetKind::B2c => B2C_SUB_FILTERABLE_COLUMNS
            .iter()
            .position(|c| *c == normalize_column(column))
            .unwrap_or(usize::MAX),
    }
}

/// A value counts as missing when it is empty or only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn round_trip_every_labeled_key() {
        for column in LABELED_COLUMNS {
            let map = label_map(column).expect("labeled column has a map");
            for (raw, _) in map {
                assert_eq!(raw_of(column, display_of(column, raw)), *raw, "{column}/{raw}");
            }
        }
    }

    #[test]
    fn label_maps_are_injective() {
        for column in LABELED_COLUMNS {
            let map = label_map(column).unwrap();
            let labels: HashSet<&str> = map.iter().map(|(_, l)| *l).collect();
            assert_eq!(labels.len(), map.len(), "duplicate label in {column}");
        }
    }

    #[test]
    fn every_produced_label_is_ordered() {
        for column in LABELED_COLUMNS {
            let order = order_of(column).expect("labeled column has an order");
            for (raw, _) in label_map(column).unwrap() {
                let label = display_of(column, raw);
                assert!(order.contains(&label), "{column}: {label} missing from order");
            }
        }
    }

    #[test]
    fn unmapped_values_pass_through() {
        assert_eq!(display_of("GENDER", "X"), "X");
        assert_eq!(display_of("JOB_TITLE", "Engineer"), "Engineer");
        assert_eq!(raw_of("GENDER", "Nonbinary"), "Nonbinary");
        assert_eq!(raw_of("AGE_RANGE", "18-24"), "18-24");
    }

    #[test]
    fn email_labels_use_field_names() {
        assert_eq!(display_of(EMAIL, PERSONAL_EMAIL), "Personal Email");
        assert_eq!(raw_of(EMAIL, "Business Email"), BUSINESS_EMAIL);
        assert_eq!(display_of(PERSONAL_EMAIL, BUSINESS_EMAIL), "Business Email");
    }

    #[test]
    fn normalize_collapses_email_fields() {
        assert_eq!(normalize_column(PERSONAL_EMAIL), EMAIL);
        assert_eq!(normalize_column(BUSINESS_EMAIL), EMAIL);
        assert_eq!(normalize_column(EMAIL), EMAIL);
        assert_eq!(normalize_column("GENDER"), "GENDER");
    }

    #[test]
    fn column_kind_dispatch() {
        assert_eq!(
            column_kind("GENDER"),
            ColumnKind::Direct { field: "GENDER" }
        );
        match column_kind(BUSINESS_EMAIL) {
            ColumnKind::PresenceUnion { members } => assert_eq!(members.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn revenue_order_is_display_vocabulary() {
        assert_eq!(display_of("COMPANY_REVENUE", "Under 1 Million"), "< $1M");
        assert_eq!(order_of("COMPANY_REVENUE").unwrap()[0], "< $1M");
        assert!(order_of("JOB_TITLE").is_none());
    }

    #[test]
    fn detect_kind_from_headers() {
        assert_eq!(
            detect_kind(&["FIRST_NAME", "JOB_TITLE", "PERSONAL_EMAIL"]),
            Some(DatasetKind::B2b)
        );
        assert_eq!(detect_kind(&["GENDER", "AGE_RANGE"]), Some(DatasetKind::B2c));
        assert_eq!(detect_kind(&["EMAIL", "NAME"]), None);
    }

    #[test]
    fn display_names_and_ranks() {
        assert_eq!(column_display_name("COMPANY_EMPLOYEE_COUNT"), "COMPANY EMPLOYEE COUNT");
        assert_eq!(column_display_name(PERSONAL_EMAIL), "EMAIL");
        assert!(column_rank(DatasetKind::B2c, "AGE_RANGE") < column_rank(DatasetKind::B2c, "GENDER"));
        assert_eq!(column_rank(DatasetKind::B2c, BUSINESS_EMAIL), 6);
        assert_eq!(column_rank(DatasetKind::B2c, "ZIP"), usize::MAX);
        assert!(is_sub_filterable(DatasetKind::B2b, PERSONAL_EMAIL));
        assert!(!is_sub_filterable(DatasetKind::B2b, "GENDER"));
    }
}
