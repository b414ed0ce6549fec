use contactlens::aggregate::{aggregate, AggregateOptions, Bucket};
use contactlens::catalog::{self, EMAIL, LABELED_COLUMNS, UNKNOWN_LABEL};
use contactlens::filter::filter_records;
use contactlens::selection::{known_values, FilterSelection};
use contactlens::{FieldLookup, Record};

fn consumers() -> Vec<Record> {
    let rows: [(&str, &str, &str, &str); 8] = [
        ("F", "Y", "25-34", "ana@home.example"),
        ("M", "N", "18-24", ""),
        ("F", "N", "25-34", "cleo@home.example"),
        ("", "Y", "65 and older", ""),
        ("M", "", "", ""),
        ("F", "Y", "45-54", "fay@home.example"),
        ("U", "N", "25-34", ""),
        ("M", "Y", "18-24", "hal@home.example"),
    ];
    rows.iter()
        .map(|(gender, married, age, email)| {
            Record::new()
                .with_field("GENDER", *gender)
                .with_field("MARRIED", *married)
                .with_field("AGE_RANGE", *age)
                .with_field("PERSONAL_EMAIL", *email)
        })
        .collect()
}

#[test]
fn test_gender_aggregation_example() {
    let records = vec![
        Record::new().with_field("GENDER", "F"),
        Record::new().with_field("GENDER", "M"),
        Record::new().with_field("GENDER", "F"),
        Record::new().with_field("GENDER", ""),
    ];
    let buckets = aggregate(&records, "GENDER", AggregateOptions::new().with_unknown(true));
    assert_eq!(
        buckets,
        vec![
            Bucket::new("Female", 2),
            Bucket::new("Male", 1),
            Bucket::new(UNKNOWN_LABEL, 1),
        ]
    );
}

#[test]
fn test_personal_email_example() {
    let records = vec![
        Record::new().with_field("PERSONAL_EMAIL", "a@home.example"),
        Record::new().with_field("BUSINESS_EMAIL", "b@corp.example"),
    ];
    let selection = FilterSelection::new().toggle_value(EMAIL, "Personal Email");
    let kept = filter_records(&records, &selection);
    assert_eq!(kept, vec![&records[0]]);
}

#[test]
fn test_select_none_example() {
    let records = consumers();
    let selection = FilterSelection::new()
        .activate("GENDER", ["Female", "Male"])
        .select_none("GENDER");
    assert!(!selection.is_active("GENDER"));
    assert!(selection.values("GENDER").is_none());
    assert_eq!(filter_records(&records, &selection).len(), records.len());
}

#[test]
fn test_adding_a_value_never_shrinks_the_result() {
    let records = consumers();
    let ages = known_values(&records, "AGE_RANGE");
    let mut selection = FilterSelection::new()
        .toggle_value("MARRIED", "Yes")
        .toggle_value("AGE_RANGE", &ages[0]);
    let mut previous = filter_records(&records, &selection).len();
    for value in &ages[1..] {
        selection = selection.toggle_value("AGE_RANGE", value);
        assert!(selection.is_selected("AGE_RANGE", value));
        let now = filter_records(&records, &selection).len();
        assert!(now >= previous, "adding {value} shrank {previous} -> {now}");
        previous = now;
    }
}

#[test]
fn test_adding_a_column_never_grows_the_result() {
    let records = consumers();
    let base = FilterSelection::new().toggle_value("AGE_RANGE", "25-34");
    let before = filter_records(&records, &base).len();
    for column in ["GENDER", "MARRIED", EMAIL] {
        let narrowed = base.activate(column, known_values(&records, column));
        assert!(filter_records(&records, &narrowed).len() <= before, "{column}");
    }
}

#[test]
fn test_activating_everything_matches_no_entry_when_fully_populated() {
    let records: Vec<Record> = consumers()
        .into_iter()
        .filter(|r| r.populated("MARRIED").is_some())
        .collect();
    let none = FilterSelection::new().toggle_value("GENDER", "Female");
    let all = none.activate("MARRIED", known_values(&records, "MARRIED"));
    assert_eq!(filter_records(&records, &none), filter_records(&records, &all));
}

#[test]
fn test_records_without_a_value_fail_an_active_column() {
    let records = consumers();
    let all = FilterSelection::new().activate("MARRIED", known_values(&records, "MARRIED"));
    // record 4 has no marital status
    assert_eq!(filter_records(&records, &all).len(), records.len() - 1);
}

#[test]
fn test_limit_is_applied_before_unknown() {
    let records = consumers();
    let buckets = aggregate(
        &records,
        "AGE_RANGE",
        AggregateOptions::new().with_limit(2).with_unknown(true),
    );
    assert_eq!(
        buckets,
        vec![
            Bucket::new("18-24", 2),
            Bucket::new("25-34", 3),
            Bucket::new(UNKNOWN_LABEL, 1),
        ]
    );
}

#[test]
fn test_unknown_bucket_only_when_requested() {
    let records = consumers();
    let without = aggregate(&records, "MARRIED", AggregateOptions::new());
    let with = aggregate(&records, "MARRIED", AggregateOptions::new().with_unknown(true));
    assert_eq!(with.len(), without.len() + 1);
    assert_eq!(with.last(), Some(&Bucket::new(UNKNOWN_LABEL, 1)));
    let total: usize = with.iter().map(|b| b.count).sum();
    assert_eq!(total, records.len());
}

#[test]
fn test_unknown_gender_code_shares_the_unknown_bucket() {
    let records = consumers();
    let without = aggregate(&records, "GENDER", AggregateOptions::new());
    assert_eq!(without.last(), Some(&Bucket::new(UNKNOWN_LABEL, 1)));

    let with = aggregate(&records, "GENDER", AggregateOptions::new().with_unknown(true));
    assert_eq!(with.len(), without.len());
    assert_eq!(with.last(), Some(&Bucket::new(UNKNOWN_LABEL, 2)));
    assert_eq!(with.iter().filter(|b| b.label == UNKNOWN_LABEL).count(), 1);
}

#[test]
fn test_every_display_label_is_ordered_or_unknown() {
    for column in LABELED_COLUMNS {
        let order = match catalog::order_of(column) {
            Some(order) => order,
            None => continue,
        };
        for (raw, _) in catalog::label_map(column).unwrap_or_default() {
            let label = catalog::display_of(column, raw);
            assert!(
                label == UNKNOWN_LABEL || order.contains(&label),
                "{column}: {label} missing from ordering table"
            );
        }
    }
}

#[test]
fn test_filter_result_is_a_subset_in_input_order() {
    let records = consumers();
    let selection = FilterSelection::new()
        .toggle_value("GENDER", "Male")
        .toggle_value("GENDER", "Female");
    let kept = filter_records(&records, &selection);
    let positions: Vec<usize> = kept
        .iter()
        .map(|k| records.iter().position(|r| std::ptr::eq(r, *k)).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    assert_eq!(kept.len(), 6);
}
