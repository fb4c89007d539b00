//! Form validation
//!
//! Forms arrive as strings. A [`Validator`] parses each field, records a
//! [`FieldError`] for anything wrong and hands back a usable value (the
//! type's default when the field is invalid). Commands finish with
//! [`Validator::finish`], which yields the parsed input only if every field
//! passed.
//!
//! ```rust,ignore
//! let mut v = Validator::new();
//! let title = v.required_text("title", &self.title, 200);
//! let deadline = v.required_datetime("deadline", &self.deadline);
//! v.finish(NewTask { title, deadline })?;
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use herdbook_common::Language;
use rust_decimal::Decimal;
use std::{collections::BTreeMap, str::FromStr};

use crate::models::Amount;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Why a single field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    TooLong { max: usize },
    InvalidDate,
    InvalidTime,
    InvalidDateTime,
    InvalidInteger,
    Negative,
    InvalidDecimal { max_digits: u32, decimal_places: u32 },
    InvalidChoice,
    InvalidEmail,
    InvalidUsername,
    Duplicate,
    PasswordMismatch,
    PasswordTooShort { min: usize },
    PasswordNumeric,
    AiRecordOtherCow,
    AiRecordLinked,
}

impl FieldError {
    /// Message in the request's language
    pub fn message(self, language: Language) -> String {
        match self {
            FieldError::Required => {
                language.pick("This field is required.", "हे फील्ड आवश्यक आहे.").to_string()
            },
            FieldError::TooLong { max } => match language {
                Language::English => format!("Ensure this value has at most {} characters.", max),
                Language::Marathi => format!("हे मूल्य जास्तीत जास्त {} अक्षरांचे असावे.", max),
            },
            FieldError::InvalidDate => {
                language.pick("Enter a valid date.", "वैध तारीख प्रविष्ट करा.").to_string()
            },
            FieldError::InvalidTime => {
                language.pick("Enter a valid time.", "वैध वेळ प्रविष्ट करा.").to_string()
            },
            FieldError::InvalidDateTime => language
                .pick("Enter a valid date/time.", "वैध तारीख/वेळ प्रविष्ट करा.")
                .to_string(),
            FieldError::InvalidInteger => {
                language.pick("Enter a whole number.", "पूर्ण संख्या प्रविष्ट करा.").to_string()
            },
            FieldError::Negative => language
                .pick(
                    "Ensure this value is greater than or equal to 0.",
                    "हे मूल्य 0 किंवा त्याहून अधिक असावे.",
                )
                .to_string(),
            FieldError::InvalidDecimal {
                max_digits,
                decimal_places,
            } => match language {
                Language::English => format!(
                    "Enter a number with at most {} digits and {} decimal places.",
                    max_digits, decimal_places
                ),
                Language::Marathi => format!(
                    "जास्तीत जास्त {} अंक आणि {} दशांश स्थाने असलेली संख्या प्रविष्ट करा.",
                    max_digits, decimal_places
                ),
            },
            FieldError::InvalidChoice => {
                language.pick("Select a valid choice.", "वैध पर्याय निवडा.").to_string()
            },
            FieldError::InvalidEmail => language
                .pick("Enter a valid email address.", "वैध ईमेल पत्ता प्रविष्ट करा.")
                .to_string(),
            FieldError::InvalidUsername => language
                .pick(
                    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
                    "वैध वापरकर्तानाव प्रविष्ट करा. यात फक्त अक्षरे, अंक आणि @/./+/-/_ चिन्हे असू शकतात.",
                )
                .to_string(),
            FieldError::Duplicate => language
                .pick(
                    "A record with this value already exists.",
                    "या मूल्यासह नोंद आधीच अस्तित्वात आहे.",
                )
                .to_string(),
            FieldError::PasswordMismatch => language
                .pick("The two password fields didn't match.", "दोन्ही पासवर्ड जुळत नाहीत.")
                .to_string(),
            FieldError::PasswordTooShort { min } => match language {
                Language::English => format!(
                    "This password is too short. It must contain at least {} characters.",
                    min
                ),
                Language::Marathi => format!(
                    "हा पासवर्ड खूप लहान आहे. त्यात किमान {} अक्षरे असणे आवश्यक आहे.",
                    min
                ),
            },
            FieldError::PasswordNumeric => language
                .pick("This password is entirely numeric.", "हा पासवर्ड पूर्णपणे अंकांचा आहे.")
                .to_string(),
            FieldError::AiRecordOtherCow => language
                .pick(
                    "The AI record belongs to a different cow.",
                    "ही कृत्रिम रेतन नोंद दुसऱ्या गायीची आहे.",
                )
                .to_string(),
            FieldError::AiRecordLinked => language
                .pick(
                    "This AI record is already linked to a pregnancy.",
                    "ही कृत्रिम रेतन नोंद आधीच गर्भधारणेशी जोडलेली आहे.",
                )
                .to_string(),
        }
    }
}

/// Errors keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, Vec<FieldError>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors containing a single field error
    pub fn single(field: &'static str, error: FieldError) -> Self {
        let mut errors = Self::new();
        errors.add(field, error);
        errors
    }

    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.errors.entry(field).or_default().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> &[FieldError] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, field: &str, error: FieldError) -> bool {
        self.get(field).contains(&error)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.keys().copied()
    }

    pub fn localize(&self, language: Language) -> BTreeMap<&'static str, Vec<String>> {
        self.errors
            .iter()
            .map(|(field, errors)| {
                (*field, errors.iter().map(|e| e.message(language)).collect())
            })
            .collect()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

/// Field-by-field form parser
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.errors.add(field, error);
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// `value` when every field passed, otherwise the collected errors
    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }

    fn present<'a>(&mut self, field: &'static str, raw: &'a str) -> Option<&'a str> {
        let value = raw.trim();
        if value.is_empty() {
            self.add(field, FieldError::Required);
            None
        } else {
            Some(value)
        }
    }

    fn check_length(&mut self, field: &'static str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(field, FieldError::TooLong { max });
        }
    }

    /// Trimmed non-empty text of at most `max` characters
    pub fn required_text(&mut self, field: &'static str, raw: &str, max: usize) -> String {
        match self.present(field, raw) {
            Some(value) => {
                self.check_length(field, value, max);
                value.to_string()
            },
            None => String::new(),
        }
    }

    /// Trimmed non-empty text without a length limit
    pub fn required_long_text(&mut self, field: &'static str, raw: &str) -> String {
        self.present(field, raw).map(str::to_string).unwrap_or_default()
    }

    /// Blank becomes `None`
    pub fn optional_text(&mut self, field: &'static str, raw: &str, max: Option<usize>) -> Option<String> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }
        if let Some(max) = max {
            self.check_length(field, value, max);
        }
        Some(value.to_string())
    }

    pub fn required_date(&mut self, field: &'static str, raw: &str) -> NaiveDate {
        match self.present(field, raw) {
            Some(value) => self.parse_date(field, value).unwrap_or_default(),
            None => NaiveDate::default(),
        }
    }

    pub fn optional_date(&mut self, field: &'static str, raw: &str) -> Option<NaiveDate> {
        let value = raw.trim();
        if value.is_empty() {
            None
        } else {
            self.parse_date(field, value)
        }
    }

    fn parse_date(&mut self, field: &'static str, value: &str) -> Option<NaiveDate> {
        match NaiveDate::parse_from_str(value, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.add(field, FieldError::InvalidDate);
                None
            },
        }
    }

    pub fn required_time(&mut self, field: &'static str, raw: &str) -> NaiveTime {
        let Some(value) = self.present(field, raw) else {
            return NaiveTime::default();
        };
        match TIME_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        {
            Some(time) => time,
            None => {
                self.add(field, FieldError::InvalidTime);
                NaiveTime::default()
            },
        }
    }

    /// `datetime-local` input (`YYYY-MM-DDTHH:MM`), read as UTC
    pub fn required_datetime(&mut self, field: &'static str, raw: &str) -> DateTime<Utc> {
        let Some(value) = self.present(field, raw) else {
            return DateTime::<Utc>::default();
        };
        match DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        {
            Some(datetime) => datetime.and_utc(),
            None => {
                self.add(field, FieldError::InvalidDateTime);
                DateTime::<Utc>::default()
            },
        }
    }

    /// Whole number `>= 0`
    pub fn required_count(&mut self, field: &'static str, raw: &str) -> i64 {
        match self.present(field, raw) {
            Some(value) => self.parse_count(field, value).unwrap_or_default(),
            None => 0,
        }
    }

    pub fn optional_count(&mut self, field: &'static str, raw: &str) -> Option<i64> {
        let value = raw.trim();
        if value.is_empty() {
            None
        } else {
            self.parse_count(field, value)
        }
    }

    fn parse_count(&mut self, field: &'static str, value: &str) -> Option<i64> {
        match value.parse::<i64>() {
            Ok(n) if n < 0 => {
                self.add(field, FieldError::Negative);
                None
            },
            Ok(n) => Some(n),
            Err(_) => {
                self.add(field, FieldError::InvalidInteger);
                None
            },
        }
    }

    /// Decimal with at most `max_digits` digits, `decimal_places` of them after the point
    pub fn optional_amount(
        &mut self,
        field: &'static str,
        raw: &str,
        max_digits: u32,
        decimal_places: u32,
    ) -> Option<Amount> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }
        let invalid = FieldError::InvalidDecimal {
            max_digits,
            decimal_places,
        };
        let Ok(amount) = Decimal::from_str(value) else {
            self.add(field, invalid);
            return None;
        };
        if amount.is_sign_negative() && !amount.is_zero() {
            self.add(field, FieldError::Negative);
            return None;
        }
        if !fits_decimal(amount, max_digits, decimal_places) {
            self.add(field, invalid);
            return None;
        }
        Some(Amount(amount))
    }

    /// Id of a selected record (`<select>` value)
    pub fn required_id(&mut self, field: &'static str, raw: &str) -> i64 {
        let Some(value) = self.present(field, raw) else {
            return 0;
        };
        match value.parse::<i64>() {
            Ok(id) if id > 0 => id,
            _ => {
                self.add(field, FieldError::InvalidChoice);
                0
            },
        }
    }

    pub fn optional_id(&mut self, field: &'static str, raw: &str) -> Option<i64> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }
        match value.parse::<i64>() {
            Ok(id) if id > 0 => Some(id),
            _ => {
                self.add(field, FieldError::InvalidChoice);
                None
            },
        }
    }

    /// One of an enum's codes. Blank is required; the returned default is
    /// only a placeholder once an error is recorded.
    pub fn choice<T: FromStr + Default>(&mut self, field: &'static str, raw: &str) -> T {
        let value = raw.trim();
        if value.is_empty() {
            self.add(field, FieldError::Required);
            return T::default();
        }
        match value.parse() {
            Ok(choice) => choice,
            Err(_) => {
                self.add(field, FieldError::InvalidChoice);
                T::default()
            },
        }
    }

    /// Optional enum choice; blank is `None`
    pub fn optional_choice<T: FromStr>(&mut self, field: &'static str, raw: &str) -> Option<T> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }
        match value.parse() {
            Ok(choice) => Some(choice),
            Err(_) => {
                self.add(field, FieldError::InvalidChoice);
                None
            },
        }
    }

    pub fn optional_email(&mut self, field: &'static str, raw: &str) -> Option<String> {
        let value = self.optional_text(field, raw, Some(254))?;
        if !is_valid_email(&value) {
            self.add(field, FieldError::InvalidEmail);
        }
        Some(value)
    }

    pub fn required_email(&mut self, field: &'static str, raw: &str) -> String {
        let value = self.required_text(field, raw, 254);
        if !value.is_empty() && !is_valid_email(&value) {
            self.add(field, FieldError::InvalidEmail);
        }
        value
    }
}

/// HTML checkbox: absent is `None`, otherwise on/true/1/yes is checked
pub fn checkbox(raw: Option<&str>) -> Option<bool> {
    raw.map(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "on" | "true" | "1" | "yes"
        )
    })
}

fn fits_decimal(amount: Decimal, max_digits: u32, decimal_places: u32) -> bool {
    let normalized = amount.normalize();
    if normalized.scale() > decimal_places {
        return false;
    }
    let integer_part = normalized.trunc().abs().to_string();
    let integer_digits = integer_part.trim_start_matches('0').len() as u32;
    integer_digits <= max_digits.saturating_sub(decimal_places)
}

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

/// Letters, digits and `@ . + - _`
pub fn is_valid_username(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}
