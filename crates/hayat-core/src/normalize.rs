//! Bilingual normalization. Inbound text is rewritten into a single
//! canonical English keyword vocabulary so one grammar can parse both
//! locales, and the detected language drives reply selection.

use crate::types::enums::Language;

/// Arabic keyword to canonical token. Applied longest keyword first so
/// a short token never subsumes part of a longer one (for example the
/// feminine `متاحة` must rewrite before `متاح`).
const KEYWORDS: &[(&str, &str)] = &[
    ("تسجيل", "REG"),
    ("أم", "MOTHER"),
    ("ام", "MOTHER"),
    ("متطوعة", "VOLUNTEER"),
    ("متطوع", "VOLUNTEER"),
    ("طوارئ", "EMERGENCY"),
    ("طارئ", "EMERGENCY"),
    ("استغاثة", "SOS"),
    ("عاجل", "URGENT"),
    ("مساندة", "SUPPORT"),
    ("دعم", "SUPPORT"),
    ("اقبل", "ACCEPT"),
    ("قبول", "ACCEPT"),
    ("إنهاء", "COMPLETE"),
    ("انهاء", "COMPLETE"),
    ("اكتمل", "COMPLETE"),
    ("إلغاء", "CANCEL"),
    ("الغاء", "CANCEL"),
    ("متاحة", "AVAILABLE"),
    ("متاح", "AVAILABLE"),
    ("مشغولة", "BUSY"),
    ("مشغول", "BUSY"),
    ("غير متصل", "OFFLINE"),
    ("الحالة", "STATUS"),
    ("حالة", "STATUS"),
    ("مساعدة", "HELP"),
    ("مخيم", "CAMP"),
    ("مناطق", "ZONE"),
    ("منطقة", "ZONE"),
    ("موعد الولادة", "DUE"),
    ("موعد", "DUE"),
    ("خطورة", "RISK"),
    ("خطر", "RISK"),
    ("الاسم", "NAME"),
    ("اسم", "NAME"),
    ("مهارة", "SKILL"),
    ("مرتفع", "HIGH"),
    ("عالي", "HIGH"),
    ("متوسط", "MEDIUM"),
    ("منخفض", "LOW"),
    ("قابلة", "MIDWIFE"),
    ("ممرضة", "NURSE"),
    ("مدربة", "TRAINED"),
    ("عاملة صحية", "CHW"),
    ("صحية", "CHW"),
    ("مجتمعية", "COMMUNITY"),
    ("مجتمع", "COMMUNITY"),
];

fn is_arabic(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Script-based heuristic: more than 20% Arabic-block characters means
/// Arabic, otherwise English. Empty text defaults to English.
pub fn detect_language(text: &str) -> Language {
    let total = text.chars().count();
    if total == 0 {
        return Language::English;
    }
    let arabic = text.chars().filter(|c| is_arabic(*c)).count();
    if arabic * 5 > total {
        Language::Arabic
    } else {
        Language::English
    }
}

/// Rewrites every known Arabic keyword to its canonical English token,
/// longest keyword first, then collapses whitespace. Idempotent on
/// already-canonical input.
pub fn normalize(text: &str) -> String {
    let mut keywords: Vec<(&str, &str)> = KEYWORDS.to_vec();
    keywords.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

    let mut out = text.to_string();
    for (foreign, canonical) in keywords {
        if out.contains(foreign) {
            out = out.replace(foreign, canonical);
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_arabic_over_threshold() {
        assert_eq!(detect_language("طوارئ"), Language::Arabic);
        assert_eq!(detect_language("help طوارئ now please"), Language::Arabic);
        assert_eq!(detect_language("HELP"), Language::English);
        assert_eq!(detect_language(""), Language::English);
    }

    #[test]
    fn mostly_english_with_one_arabic_char_stays_english() {
        // 1 Arabic char out of 21 total is under the 20% threshold.
        assert_eq!(detect_language("please send help now ط"), Language::English);
    }

    #[test]
    fn rewrites_arabic_command() {
        assert_eq!(normalize("طوارئ"), "EMERGENCY");
        assert_eq!(
            normalize("تسجيل ام مخيم A منطقة 3"),
            "REG MOTHER CAMP A ZONE 3"
        );
    }

    #[test]
    fn feminine_form_rewrites_before_masculine_stem() {
        assert_eq!(normalize("متاحة"), "AVAILABLE");
        assert_eq!(normalize("متاح"), "AVAILABLE");
    }

    #[test]
    fn canonical_input_is_a_fixed_point() {
        let canonical = "REG MOTHER CAMP A ZONE 3 DUE 15-02 RISK HIGH";
        assert_eq!(normalize(canonical), canonical);
        let once = normalize("تسجيل ام مخيم B منطقة 7 خطر عالي");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize("  REG   MOTHER  "), "REG MOTHER");
    }
}
