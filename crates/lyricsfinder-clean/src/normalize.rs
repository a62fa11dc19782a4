use unicode_normalization::UnicodeNormalization;

/// Normalize a scraped line to NFC and strip surrounding whitespace.
///
/// Genius pages mix precomposed and decomposed kana with dakuten
/// (e.g. "か" + U+3099 vs "が"), which the romanizer only handles in NFC.
/// Non-breaking and zero-width spaces from inline markup are also removed.
pub fn normalize_line(input: &str) -> String {
    let nfc: String = input
        .nfc()
        .filter(|c| *c != '\u{200b}' && *c != '\u{feff}')
        .map(|c| if c == '\u{a0}' { ' ' } else { c })
        .collect();
    nfc.trim().to_string()
}

/// Collapse multiple consecutive blank lines into a single blank line.
pub fn collapse_blank_lines(lines: Vec<String>) -> Vec<String> {
    let mut result = Vec::with_capacity(lines.len());
    let mut prev_blank = false;

    for line in lines {
        let is_blank = line.trim().is_empty();
        if is_blank && prev_blank {
            continue;
        }
        prev_blank = is_blank;
        result.push(line);
    }

    result
}
