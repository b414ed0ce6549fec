#![allow(dead_code)]

use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Six consumer contacts with a mix of coded, missing and unmapped values.
pub fn create_b2c_csv(dir: &Path) -> PathBuf {
    let path = dir.join("consumers.csv");
    let mut df = df! (
        "FIRST_NAME" => ["Ana", "Ben", "Cleo", "Dev", "Eli", "Fay"],
        "GENDER" => [Some("F"), Some("M"), Some("F"), None, Some("M"), Some("F")],
        "MARRIED" => [Some("Y"), Some("N"), Some("N"), Some("Y"), None, Some("Y")],
        "AGE_RANGE" => [Some("25-34"), Some("18-24"), Some("25-34"), Some("65 and older"), None, Some("45-54")],
        "INCOME_RANGE" => [Some("$20,000 to $44,999"), Some("Less than $20,000"), None, Some("$20,000 to $44,999"), Some("$100,000 to $149,999"), None],
        "PERSONAL_EMAIL" => [Some("ana@home.example"), None, Some("cleo@home.example"), None, None, Some("fay@home.example")],
        "BUSINESS_EMAIL" => [None, Some("ben@corp.example"), Some("cleo@corp.example"), None, None, None],
        "MOBILE_PHONE" => [Some("555-0101"), None, Some("555-0103"), Some("555-0104"), None, None],
        "HOMEOWNER" => [Some("Y"), Some("N"), Some("Y"), None, Some("N"), Some("Y")]
    )
    .unwrap();
    let mut file = File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(&mut df).unwrap();
    path
}

/// Four business contacts.
pub fn create_b2b_csv(dir: &Path) -> PathBuf {
    let path = dir.join("accounts.csv");
    let mut df = df! (
        "COMPANY_NAME" => ["Acme", "Globex", "Initech", "Umbrella"],
        "COMPANY_INDUSTRY" => [Some("Software"), Some("Energy"), Some("Software"), None],
        "JOB_TITLE" => [Some("Engineer"), Some("Director"), Some("Engineer"), Some("Analyst")],
        "COMPANY_REVENUE" => [Some("1 Million to 5 Million"), Some("1 Billion and Over"), Some("Under 1 Million"), Some("1 Million to 5 Million")],
        "BUSINESS_EMAIL" => [Some("a@acme.example"), None, Some("c@initech.example"), None]
    )
    .unwrap();
    let mut file = File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(&mut df).unwrap();
    path
}
