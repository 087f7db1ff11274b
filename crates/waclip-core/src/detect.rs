use serde::Serialize;

use crate::patterns::PatternSet;

/// What a dispatch cycle should do with a piece of clipboard text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Blank text or no phone-shaped substring.
    NoNumber,
    /// Strict mode found a number but the text carries more than the number.
    ExtraText,
    Number(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionReport {
    pub text: String,
    pub contains_number: bool,
    pub number_only: bool,
    pub number: Option<String>,
}

impl PatternSet {
    pub fn classify(&self, text: &str, numbers_only: bool) -> Detection {
        if text.trim().is_empty() {
            return Detection::NoNumber;
        }

        let accepted = if numbers_only {
            if self.is_phone_number_only(text) {
                true
            } else if self.contains_phone_number(text) {
                return Detection::ExtraText;
            } else {
                false
            }
        } else {
            self.contains_phone_number(text)
        };

        if !accepted {
            return Detection::NoNumber;
        }

        match self.extract_phone_number(text) {
            Some(number) => Detection::Number(number),
            None => Detection::NoNumber,
        }
    }

    pub fn report(&self, text: &str) -> DetectionReport {
        let contains_number = self.contains_phone_number(text);
        DetectionReport {
            text: text.to_string(),
            contains_number,
            number_only: contains_number && self.is_phone_number_only(text),
            number: if contains_number {
                self.extract_phone_number(text)
            } else {
                None
            },
        }
    }
}

pub fn classify(text: &str, numbers_only: bool) -> Detection {
    PatternSet::default_set().classify(text, numbers_only)
}
