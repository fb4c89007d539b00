//! Display language and the user-facing message table
//!
//! Herdbook speaks English and Marathi. There is no translation framework:
//! each [`Message`] maps to a fixed pair of strings and callers pick one with
//! the request's [`Language`].

use serde::{Deserialize, Serialize};

/// Display language selected for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "mr")]
    Marathi,
}

impl Language {
    pub const ALL: &'static [Language] = &[Language::English, Language::Marathi];

    /// Language for a `lang` code, `None` for codes Herdbook does not know
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::English),
            "mr" => Some(Language::Marathi),
            _ => None,
        }
    }

    /// Like [`Language::from_code`], falling back to English
    pub fn from_code_or_default(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Marathi => "mr",
        }
    }

    /// Pick the variant for this language
    pub fn pick<'a>(self, english: &'a str, marathi: &'a str) -> &'a str {
        match self {
            Language::English => english,
            Language::Marathi => marathi,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Every confirmation or error message shown to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    LoginSuccessful,
    InvalidCredentials,
    LoggedOut,
    LoginRequired,
    AccessDenied,
    WorkerProfileMissing,
    WorkerCreated,
    WorkerDeactivated,
    TaskAssigned,
    TaskUpdated,
    StatusUpdated,
    TaskDeleted,
    CowAdded,
    CowUpdated,
    CowDeactivated,
    DoctorAdded,
    DoctorUpdated,
    DoctorDeactivated,
    VisitRecorded,
    VisitDeleted,
    MedicineAdded,
    AiRecordAdded,
    AiRecordDeleted,
    PregnancyRecorded,
    PregnancyUpdated,
    PregnancyDeleted,
    VaccinationRecorded,
    VaccinationDeleted,
}

impl Message {
    /// (English, Marathi)
    fn pair(self) -> (&'static str, &'static str) {
        match self {
            Message::LoginSuccessful => ("Login successful!", "लॉगिन यशस्वी!"),
            Message::InvalidCredentials => ("Invalid credentials!", "अवैध प्रमाणपत्रे!"),
            Message::LoggedOut => ("Logged out successfully!", "यशस्वीरित्या लॉगआउट झाले!"),
            Message::LoginRequired => (
                "Please log in to continue.",
                "कृपया पुढे जाण्यासाठी लॉगिन करा.",
            ),
            Message::AccessDenied => ("Access denied!", "प्रवेश नाकारला!"),
            Message::WorkerProfileMissing => {
                ("Worker profile not found!", "कामगार प्रोफाइल सापडले नाही!")
            },
            Message::WorkerCreated => {
                ("Worker created successfully!", "कामगार यशस्वीरित्या तयार केला!")
            },
            Message::WorkerDeactivated => ("Worker deactivated!", "कामगार निष्क्रिय केला!"),
            Message::TaskAssigned => {
                ("Task assigned successfully!", "कार्य यशस्वीरित्या नियुक्त केले!")
            },
            Message::TaskUpdated => ("Task updated!", "कार्य अद्यतनित!"),
            Message::StatusUpdated => ("Status updated!", "स्थिती अद्यतनित!"),
            Message::TaskDeleted => ("Task deleted!", "कार्य हटवले!"),
            Message::CowAdded => ("Cow added successfully!", "गाय यशस्वीरित्या जोडली!"),
            Message::CowUpdated => ("Cow updated!", "गाय अद्यतनित!"),
            Message::CowDeactivated => ("Cow deactivated!", "गाय निष्क्रिय केली!"),
            Message::DoctorAdded => ("Doctor added successfully!", "डॉक्टर यशस्वीरित्या जोडले!"),
            Message::DoctorUpdated => ("Doctor updated!", "डॉक्टर अपडेट केले!"),
            Message::DoctorDeactivated => ("Doctor deactivated!", "डॉक्टर निष्क्रिय केले!"),
            Message::VisitRecorded => ("Visit recorded!", "भेट नोंदवली!"),
            Message::VisitDeleted => ("Visit deleted!", "भेट हटवली!"),
            Message::MedicineAdded => ("Medicine added!", "औषध जोडले!"),
            Message::AiRecordAdded => ("AI record added!", "कृत्रिम रेतन नोंद जोडली!"),
            Message::AiRecordDeleted => ("AI record deleted!", "कृत्रिम रेतन नोंद हटवली!"),
            Message::PregnancyRecorded => ("Pregnancy recorded!", "गर्भधारणा नोंदवली!"),
            Message::PregnancyUpdated => ("Pregnancy updated!", "गर्भधारणा अपडेट केली!"),
            Message::PregnancyDeleted => {
                ("Pregnancy record deleted!", "गर्भधारणा नोंद हटवली!")
            },
            Message::VaccinationRecorded => ("Vaccination recorded!", "लसीकरण नोंदवले!"),
            Message::VaccinationDeleted => ("Vaccination deleted!", "लसीकरण नोंद हटवली!"),
        }
    }

    /// Text of this message in `language`
    pub fn text(self, language: Language) -> &'static str {
        let (english, marathi) = self.pair();
        language.pick(english, marathi)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("en"), Some(Language::English));
        assert_eq!(Language::from_code(" MR "), Some(Language::Marathi));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::from_code_or_default("fr"), Language::English);
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn test_message_text_per_language() {
        assert_eq!(Message::TaskDeleted.text(Language::English), "Task deleted!");
        assert_eq!(Message::TaskDeleted.text(Language::Marathi), "कार्य हटवले!");
        assert_eq!(Message::AccessDenied.text(Language::Marathi), "प्रवेश नाकारला!");
    }

    #[test]
    fn test_language_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::Marathi).unwrap(), "\"mr\"");
        let message: Message = serde_json::from_str("\"visit_recorded\"").unwrap();
        assert_eq!(message, Message::VisitRecorded);
    }
}
