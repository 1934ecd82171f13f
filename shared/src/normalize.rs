//! Text normalization for heuristic name matching
//!
//! Lot, crop, and state names arrive from field capture with inconsistent
//! casing and accents ("Transición", "transicion", "TRANSICION"). All
//! heuristic comparisons go through [`normalize`] so the rest of the code
//! can compare keys with plain equality.

/// Lowercase a string and fold Spanish diacritics to their ASCII base.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' => 'a',
        'é' => 'e',
        'í' => 'i',
        'ó' => 'o',
        'ú' | 'ü' => 'u',
        'ñ' => 'n',
        _ => c,
    }
}
