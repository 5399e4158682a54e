//! Post-processing of raw Tesseract output.

use crate::models::Language;

/// Share of non-ASCII characters above which text is treated as non-English.
pub const NON_ASCII_THRESHOLD: f32 = 0.3;

const SPANISH_MARKERS: &str = "ñáéíóúü";
const FRENCH_MARKERS: &str = "àâäéèêëïîôöùûüÿç";
const GERMAN_MARKERS: &str = "äöüß";

/// Collapse whitespace inside each line, drop blank lines, rejoin with `\n`.
pub fn clean_text(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mean of the positive word confidences in Tesseract TSV output.
///
/// Rows with a confidence of zero or below (structural rows carry `-1`) are
/// ignored. Returns 0.0 when no row qualifies.
pub fn mean_confidence(tsv: &str) -> f32 {
    let (sum, count) = tsv
        .lines()
        .filter_map(|line| line.split('\t').nth(10))
        .filter_map(|conf| conf.trim().parse::<f32>().ok())
        .filter(|conf| *conf > 0.0)
        .fold((0.0f32, 0u32), |(sum, count), conf| (sum + conf, count + 1));

    if count == 0 {
        0.0
    } else {
        (sum / count as f32).clamp(0.0, 100.0)
    }
}

fn non_ascii_ratio(text: &str) -> f32 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let non_ascii = text.chars().filter(|c| (*c as u32) > 127).count();
    non_ascii as f32 / total as f32
}

/// Crude detection: mostly-ASCII text is English, anything else is Spanish.
pub fn detect_language(text: &str) -> Language {
    if non_ascii_ratio(text) > NON_ASCII_THRESHOLD {
        Language::Es
    } else {
        Language::En
    }
}

/// Like [`detect_language`], but looks for accented marker characters
/// before defaulting non-English text to Spanish.
pub fn detect_language_detailed(text: &str) -> Language {
    if non_ascii_ratio(text) <= NON_ASCII_THRESHOLD {
        return Language::En;
    }

    let lower = text.to_lowercase();
    let has_any = |markers: &str| lower.chars().any(|c| markers.contains(c));

    if has_any(SPANISH_MARKERS) {
        Language::Es
    } else if has_any(FRENCH_MARKERS) {
        Language::Fr
    } else if has_any(GERMAN_MARKERS) {
        Language::De
    } else {
        Language::Es
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t
2\t1\t1\t0\t0\t0\t10\t10\t300\t40\t-1\t
5\t1\t1\t1\t1\t1\t10\t10\t80\t30\t96.5\tPlants
5\t1\t1\t1\t1\t2\t95\t10\t60\t30\t83.5\tmake
5\t1\t1\t1\t1\t3\t160\t10\t60\t30\t0\t~
";

    #[test]
    fn test_clean_text_collapses_and_drops_blank_lines() {
        let raw = "  Photosynthesis   is\t how \n\n   \nplants   make food  \n";
        assert_eq!(clean_text(raw), "Photosynthesis is how\nplants make food");
    }

    #[test]
    fn test_clean_text_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \n \t\n"), "");
    }

    #[test]
    fn test_mean_confidence_ignores_non_positive_rows() {
        assert_eq!(mean_confidence(TSV), 90.0);
    }

    #[test]
    fn test_mean_confidence_without_words_is_zero() {
        let header_only = TSV.lines().take(3).collect::<Vec<_>>().join("\n");
        assert_eq!(mean_confidence(&header_only), 0.0);
        assert_eq!(mean_confidence(""), 0.0);
    }

    #[test]
    fn test_detect_language_non_ascii_is_spanish() {
        assert_eq!(detect_language("ÀÀÀÀÀ hello"), Language::Es);
    }

    #[test]
    fn test_detect_language_ascii_is_english() {
        assert_eq!(detect_language("The water cycle"), Language::En);
        assert_eq!(detect_language(""), Language::En);
    }

    #[test]
    fn test_detect_language_below_threshold_is_english() {
        // 1 of 8 characters non-ASCII
        assert_eq!(detect_language("caf\u{e9} ole"), Language::En);
    }

    #[test]
    fn test_detailed_detection_uses_markers() {
        assert_eq!(detect_language_detailed("ñññ ab"), Language::Es);
        assert_eq!(detect_language_detailed("çàç ab"), Language::Fr);
        assert_eq!(detect_language_detailed("ßßß ab"), Language::De);
        assert_eq!(detect_language_detailed("ÀÀÀÀÀ hello"), Language::Fr);
        assert_eq!(detect_language_detailed("日本語です"), Language::Es);
        assert_eq!(detect_language_detailed("plain text"), Language::En);
    }
}
