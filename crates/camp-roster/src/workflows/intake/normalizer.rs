/// Drops every whitespace character and invisible marker left by spreadsheet exports.
fn strip_whitespace(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_whitespace() && !matches!(ch, '\u{feff}' | '\u{200b}'))
        .collect()
}

/// `"  jean  MARIE"` becomes `"Jeanmarie"`.
pub(crate) fn normalize_person_name(value: &str) -> String {
    let lowered = strip_whitespace(value).to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn normalize_email(value: &str) -> String {
    strip_whitespace(value).to_lowercase()
}

pub(crate) fn normalize_phone(value: &str) -> String {
    strip_whitespace(value).replace('.', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_names_are_capitalized_without_spaces() {
        assert_eq!(normalize_person_name("  jean  MARIE "), "Jeanmarie");
        assert_eq!(normalize_person_name("\u{feff}élodie"), "Élodie");
        assert_eq!(normalize_person_name("   "), "");
    }

    #[test]
    fn emails_and_phones_are_compacted() {
        assert_eq!(normalize_email(" A.B@Mail.FR "), "a.b@mail.fr");
        assert_eq!(normalize_phone("+33 6.12.34\t56 78"), "+33612345678");
    }
}
