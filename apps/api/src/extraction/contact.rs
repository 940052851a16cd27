use std::sync::OnceLock;

use regex::Regex;

use crate::models::candidate::Contact;

/// Minimum digit count for a run of digits to count as a phone number.
const MIN_PHONE_DIGITS: usize = 7;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[\w.+-]+@[\w-]+(?:\.[\w-]+)*").expect("email pattern is valid")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\+?\d[\d\- ]*\d").expect("phone pattern is valid"))
}

/// Pulls a best-guess name, email and phone number out of resume text.
///
/// - name: first line, trimmed
/// - email: first `local@domain` token
/// - phone: first digit run (optional leading `+`, hyphens/spaces allowed)
///   holding at least seven digits
///
/// Never fails; anything not found is an empty string.
pub fn parse_contact(text: &str) -> Contact {
    let name = text.lines().next().unwrap_or_default().trim().to_string();

    let email = email_pattern()
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let phone = phone_pattern()
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|candidate| candidate.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS)
        .map(str::to_string)
        .unwrap_or_default();

    Contact { name, email, phone }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_all_fields() {
        let text = "  Priya Natarajan  \nEmail: priya.n@mail.example.org | Phone: +91-99999-99999\nSkills: Python";
        let contact = parse_contact(text);
        assert_eq!(contact.name, "Priya Natarajan");
        assert_eq!(contact.email, "priya.n@mail.example.org");
        assert_eq!(contact.phone, "+91-99999-99999");
    }

    #[test]
    fn test_empty_text_yields_empty_contact() {
        assert_eq!(parse_contact(""), Contact::default());
    }

    #[test]
    fn test_short_digit_runs_are_not_phones() {
        let text = "Alex\nClass of 2019, 3 years at ACME\nCall 555 0199 123";
        let contact = parse_contact(text);
        assert_eq!(contact.email, "");
        assert_eq!(contact.phone, "555 0199 123");
    }

    #[test]
    fn test_no_phone_when_only_years() {
        let contact = parse_contact("Sam\nWorked 2019 to 2021");
        assert_eq!(contact.phone, "");
    }

    #[test]
    fn test_trailing_sentence_period_not_in_email() {
        let contact = parse_contact("Kim\nReach me at kim@example.com.");
        assert_eq!(contact.email, "kim@example.com");
    }
}
