use crate::text::fold;

/// Known spellings that refer to the same employer.
const COMPANY_ALIASES: &[(&str, &str)] = &[
    ("btg", "BANCO BTG PACTUAL S.A."),
    ("cip", "CIP - CENTRO DE INFORMAÇÃO E PROCESSAMENTO"),
    ("virtual", "VIRTUAL CIRURGIA"),
];

/// Canonical grouping name for a company: alias table first, otherwise the
/// trimmed, whitespace-collapsed, uppercased legal name.
pub fn canonical_company(name: &str) -> String {
    let folded = fold(name);
    for (needle, canonical) in COMPANY_ALIASES {
        if folded
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == *needle)
        {
            return (*canonical).to_string();
        }
    }
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
