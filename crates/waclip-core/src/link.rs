use serde::Serialize;

use crate::error::{CoreError, Result};

pub const WEB_BASE: &str = "https://wa.me/";
pub const APP_BASE: &str = "whatsapp://send";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatLinks {
    pub number: String,
    pub web: String,
    pub app: String,
}

impl ChatLinks {
    pub fn new(number: &str, message: &str) -> Result<Self> {
        Ok(Self {
            number: number.to_string(),
            web: web_url(number, message)?,
            app: app_url(number, message)?,
        })
    }
}

/// Number as used in chat links: the leading `+` is dropped.
pub fn link_digits(number: &str) -> Result<&str> {
    let trimmed = number.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(CoreError::EmptyPhoneNumber);
    }
    Ok(digits)
}

pub fn web_url(number: &str, message: &str) -> Result<String> {
    let digits = link_digits(number)?;
    Ok(format!(
        "{WEB_BASE}{digits}?text={}",
        urlencoding::encode(message)
    ))
}

pub fn app_url(number: &str, message: &str) -> Result<String> {
    let digits = link_digits(number)?;
    Ok(format!(
        "{APP_BASE}?phone={digits}&text={}",
        urlencoding::encode(message)
    ))
}
