/// Folds a header into the form used for rename lookups: invisible marks
/// dropped, whitespace collapsed, lowercase, accents stripped.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|ch| {
            !matches!(
                ch,
                '\u{feff}' | '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{2060}'
            )
        })
        .map(|ch| if ch == '\u{a0}' { ' ' } else { ch })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    fold_accents(&collapsed)
}

/// Lowercases and strips Spanish diacritics so `Diciembre` and `diciembre`
/// or `Mayo` and `máyo` compare equal.
pub(crate) fn fold_accents(value: &str) -> String {
    value
        .chars()
        .flat_map(char::to_lowercase)
        .map(|ch| match ch {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}
