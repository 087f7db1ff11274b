use crate::patterns::PatternSet;

const NANP_LOCAL_LEN: usize = 10;
const NANP_TRUNK_LEN: usize = 11;

impl PatternSet {
    /// Extracts the first matched number and rewrites it into `+<digits>` form
    /// when the digit count allows it.
    pub fn extract_phone_number(&self, text: &str) -> Option<String> {
        let found = self.find(text)?;
        normalize_candidate(found.text)
    }
}

pub fn extract_phone_number(text: &str) -> Option<String> {
    PatternSet::default_set().extract_phone_number(text)
}

/// Keeps digits and `+`, then applies the prefix rules:
/// a leading `+` is kept as is, ten digits get `+1`, eleven digits starting
/// with `1` get `+`, any other run of ten or more digits gets `+`.
/// Shorter runs are returned unchanged.
pub fn normalize_candidate(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '+')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    if cleaned.starts_with('+') {
        return Some(cleaned);
    }

    let len = cleaned.len();
    if len == NANP_LOCAL_LEN {
        return Some(format!("+1{cleaned}"));
    }
    if len == NANP_TRUNK_LEN && cleaned.starts_with('1') {
        return Some(format!("+{cleaned}"));
    }
    if len >= NANP_LOCAL_LEN {
        return Some(format!("+{cleaned}"));
    }
    Some(cleaned)
}
