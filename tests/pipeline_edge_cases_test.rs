//! Edge case tests for the anonymization pipeline
//!
//! Table-driven cases use test-case; the contact-detail sweeps use fake to
//! generate emails, domains and phone numbers.

use fake::faker::internet::en::{DomainSuffix, SafeEmail, Username};
use fake::Fake;
use medanon::anonymization::{AnonymizationConfig, AnonymizationEngine};
use medanon::domain::Placeholder;
use regex::Regex;
use test_case::test_case;

fn engine() -> AnonymizationEngine {
    AnonymizationEngine::from_config(AnonymizationConfig::default()).unwrap()
}

fn anonymize(text: &str) -> String {
    engine().anonymize_text(text).unwrap().text
}

#[test_case("" => "" ; "empty report")]
#[test_case("reach me at john.doe@example.com" => "reach me at [EMAIL]" ; "email")]
#[test_case("Visit www.smiledental.in for slots" => "Visit [WEB] for slots" ; "web address")]
#[test_case("Age: 45" => "Age: [AGE]" ; "age label")]
#[test_case("Mrs Kavita Rao, 32 years" => "[PATIENT_NAME], [AGE]" ; "patient title and age")]
#[test_case("Patient ID: AB-1234" => "Patient ID: [PATIENT_ID]" ; "patient id")]
#[test_case("Seen on 12th March 2024" => "Seen on [DATE]" ; "written date")]
#[test_case("Review on 2024-04-02" => "Review on [DATE]" ; "iso date")]
#[test_case("Referred by Vikram Singh" => "Referred by [PERSON_NAME]" ; "referral cue")]
#[test_case("Call 98765.43210 or 022.2345.6789" => "Call [PHONE] or [PHONE]" ; "dot separated phones")]
#[test_case("Report at https://lab.example.org/r/123456789012 ok" => "Report at [WEB] ok" ; "digit run inside url")]
#[test_case("mail rahul.9876543210@gmail.com today" => "mail [EMAIL] today" ; "digit run inside email")]
#[test_case("dr. sharma advised rest." => "[DOCTOR_NAME] advised rest." ; "lowercase doctor title")]
#[test_case("Dr. sharma" => "[DOCTOR_NAME]" ; "lowercase doctor name")]
fn test_redaction(input: &str) -> String {
    anonymize(input)
}

#[test_case("Tab. Dolo 650mg SOS" ; "brand with dosage")]
#[test_case("Cap. Pand 40mg before breakfast" ; "brand prefix")]
#[test_case("Adv: Hexigel paint twice daily" ; "topical brand")]
#[test_case("Syp. Crocin 5ml thrice daily" ; "syrup")]
#[test_case("Tab. Amlodipine 5mg at night" ; "drug suffix")]
#[test_case("1-0-1 after food for 5 days" ; "dosing schedule")]
fn test_medication_lines_untouched(input: &str) {
    assert_eq!(anonymize(input), input);
}

#[test_case("[PHONE] [EMAIL] [WEB] [DOCTOR_NAME]" ; "contact tags")]
#[test_case("[PATIENT_NAME], [AGE], [PATIENT_ID]" ; "patient tags")]
#[test_case("[PERSON_NAME] on [DATE], ID: [ID]" ; "entity tags")]
fn test_placeholders_are_stable(input: &str) {
    assert_eq!(anonymize(input), input);
}

#[test]
fn test_whitespace_only_report() {
    let result = engine().anonymize_text(" \n\t ").unwrap();
    assert_eq!(result.text, " \n\t ");
    assert_eq!(result.stats.redaction_count, 0);
}

#[test]
fn test_name_inside_longer_word_is_kept() {
    let text = anonymize("Priya visited. Priyanka was not seen.");
    assert_eq!(text, "[PERSON_NAME] visited. Priyanka was not seen.");
}

#[test]
fn test_brand_stays_when_next_to_name() {
    let text = anonymize("Rahul Verma: Allegra 120mg daily");
    assert!(text.contains("Allegra 120mg"));
}

#[test]
fn test_unicode_text_survives() {
    let text = anonymize("Zoë reports rash, mail zoe.m@example.com ✓");
    assert!(text.starts_with("Zoë reports rash"));
    assert!(text.ends_with("✓"));
}

#[test]
fn test_generated_emails_never_survive() {
    let engine = engine();
    let email_shape = Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap();

    for _ in 0..50 {
        let email: String = SafeEmail().fake();
        let report = format!("Follow-up queries: {email}. Tab. Dolo 650mg SOS.");
        let result = engine.anonymize_text(&report).unwrap();

        assert!(!email_shape.is_match(&result.text), "{email} leaked");
        assert!(result.text.contains("[EMAIL]"));
        assert!(result.text.contains("Tab. Dolo 650mg SOS."));
    }
}

#[test]
fn test_generated_urls_never_survive() {
    let engine = engine();

    for _ in 0..50 {
        let user: String = Username().fake();
        let suffix: String = DomainSuffix().fake();
        let url = format!("https://www.{}.{suffix}/reports/{}", user.replace('_', "-"), 42);
        let result = engine
            .anonymize_text(&format!("Download at {url} today"))
            .unwrap();

        assert_eq!(result.text, "Download at [WEB] today", "{url} leaked");
    }
}

#[test]
fn test_generated_phones_never_survive() {
    let engine = engine();
    let digits = Regex::new(r"\d{5}").unwrap();

    for _ in 0..50 {
        let number: u64 = (6_000_000_000u64..9_999_999_999u64).fake();
        let raw = number.to_string();
        let formats = [
            raw.clone(),
            format!("+91 {}", raw),
            format!("{} {}", &raw[..5], &raw[5..]),
            format!("{}-{}-{}", &raw[..3], &raw[3..6], &raw[6..]),
            format!("{}.{}", &raw[..5], &raw[5..]),
            format!("{}.{}.{}", &raw[..3], &raw[3..6], &raw[6..]),
        ];

        for phone in formats {
            let result = engine
                .anonymize_text(&format!("Contact: {phone}, after 6 pm"))
                .unwrap();
            assert!(!digits.is_match(&result.text), "{phone} leaked");
            assert_eq!(
                result.stats.redactions_by_tag.get(&Placeholder::Phone),
                Some(&1)
            );
        }
    }
}

#[test]
fn test_generated_phones_inside_contacts_stay_whole() {
    let engine = engine();

    for _ in 0..50 {
        let number: u64 = (6_000_000_000u64..9_999_999_999u64).fake();
        let suffix: String = DomainSuffix().fake();
        let email = format!("rahul.{number}@example.{suffix}");
        let url = format!("https://lab.example.{suffix}/r/{number}");

        let result = engine
            .anonymize_text(&format!("see {url} or {email}"))
            .unwrap();
        assert_eq!(result.text, "see [WEB] or [EMAIL]", "{url} {email}");
        assert_eq!(result.stats.redactions_by_tag.get(&Placeholder::Phone), None);
    }
}
