pub mod detect;
pub mod error;
pub mod link;
pub mod matcher;
pub mod patterns;
pub mod phone;

pub use detect::{classify, Detection, DetectionReport};
pub use error::CoreError;
pub use link::{app_url, link_digits, web_url, ChatLinks};
pub use matcher::{contains_phone_number, is_phone_number_only};
pub use patterns::{PatternSet, PhoneMatch};
pub use phone::{extract_phone_number, normalize_candidate};
