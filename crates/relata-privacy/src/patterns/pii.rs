use regex::Regex;
use std::sync::LazyLock;

/// A compiled PII detection pattern.
pub struct PiiPattern {
    pub name: &'static str,
    pub regex: &'static LazyLock<Option<Regex>>,
    pub marker: &'static str,
}

macro_rules! pii_pattern {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// ── Email ──────────────────────────────────────────────────────────────────
pii_pattern!(
    RE_EMAIL,
    r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}"
);

// ── CPF (national id), formatted or bare ───────────────────────────────────
pii_pattern!(RE_CPF, r"\b\d{3}\.?\d{3}\.?\d{3}-?\d{2}\b");

// ── Brazilian phone, optional +55 and area code, separated groups ──────────
pii_pattern!(
    RE_PHONE,
    r"(?:\+55\s?)?(?:\(\d{2}\)\s?|\b\d{2}\s)?\b\d{4,5}[-.\s]\d{4}\b"
);

// ── Institutional id (NUSP): bare 7-8 digit number ─────────────────────────
pii_pattern!(RE_INSTITUTIONAL_ID, r"\b\d{7,8}\b");

pub const EMAIL_MARKER: &str = "[EMAIL_REMOVED]";
pub const CPF_MARKER: &str = "[CPF_REMOVED]";
pub const PHONE_MARKER: &str = "[PHONE_REMOVED]";
pub const INSTITUTIONAL_ID_MARKER: &str = "[ID_REMOVED]";

/// Patterns in priority order; on equal-length overlaps the earlier one wins.
pub fn all_patterns(include_institutional_id: bool) -> Vec<PiiPattern> {
    let mut patterns = vec![
        PiiPattern {
            name: "email",
            regex: &RE_EMAIL,
            marker: EMAIL_MARKER,
        },
        PiiPattern {
            name: "cpf",
            regex: &RE_CPF,
            marker: CPF_MARKER,
        },
        PiiPattern {
            name: "phone",
            regex: &RE_PHONE,
            marker: PHONE_MARKER,
        },
    ];
    if include_institutional_id {
        patterns.push(PiiPattern {
            name: "institutional_id",
            regex: &RE_INSTITUTIONAL_ID,
            marker: INSTITUTIONAL_ID_MARKER,
        });
    }
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pattern_compiles() {
        for pat in all_patterns(true) {
            assert!(pat.regex.is_some(), "{} failed to compile", pat.name);
        }
    }

    fn matches(re: &LazyLock<Option<Regex>>, text: &str) -> bool {
        re.as_ref().is_some_and(|r| r.is_match(text))
    }

    #[test]
    fn phone_formats() {
        assert!(matches(&RE_PHONE, "ligar para (11) 98765-4321"));
        assert!(matches(&RE_PHONE, "+55 11 98765-4321"));
        assert!(matches(&RE_PHONE, "3091-5555"));
        assert!(!matches(&RE_PHONE, "em 2025 foram 12 relatórios"));
    }

    #[test]
    fn cpf_formats() {
        assert!(matches(&RE_CPF, "CPF 123.456.789-09"));
        assert!(matches(&RE_CPF, "12345678909"));
        assert!(!matches(&RE_CPF, "CNPJ 12.345.678/0001-90"));
    }
}
