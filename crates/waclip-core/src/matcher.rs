use crate::patterns::PatternSet;

impl PatternSet {
    pub fn contains_phone_number(&self, text: &str) -> bool {
        self.find(text.trim()).is_some()
    }

    /// True when the trimmed text reduces to the first matched number once
    /// separators and punctuation are ignored on both sides.
    pub fn is_phone_number_only(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        let Some(found) = self.find(trimmed) else {
            return false;
        };
        significant_chars(trimmed).eq(significant_chars(found.text))
    }
}

pub fn contains_phone_number(text: &str) -> bool {
    PatternSet::default_set().contains_phone_number(text)
}

pub fn is_phone_number_only(text: &str) -> bool {
    PatternSet::default_set().is_phone_number_only(text)
}

fn significant_chars(value: &str) -> impl Iterator<Item = char> + '_ {
    value
        .chars()
        .filter(|ch| ch.is_alphanumeric() || *ch == '+')
}
