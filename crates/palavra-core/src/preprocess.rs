use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonical text form shared by the corpus fit and every query.
pub trait Normalizer {
    // lower-case, strip accents, drop digits, punctuation to spaces, trim
    fn normalize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let lowered = text.to_lowercase();

        // NFD splits accented letters into base + combining mark
        let stripped: String = lowered.nfd().filter(|c| !is_combining_mark(*c)).collect();

        let cleaned: String = stripped
            .chars()
            .filter(|c| !c.is_numeric())
            .map(|c| {
                if c.is_alphabetic() || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        cleaned.trim().to_string()
    }
}

pub struct DefaultNormalizer;
impl Normalizer for DefaultNormalizer {}

/// Shorthand for [`DefaultNormalizer`]
pub fn normalize(text: &str) -> String {
    DefaultNormalizer.normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_case() {
        assert_eq!(normalize("Aumento anormal da LÍNGUA"), "aumento anormal da lingua");
        assert_eq!(normalize("Efêmero, passageiro"), "efemero  passageiro");
        assert_eq!(normalize("coração"), "coracao");
    }

    #[test]
    fn removes_digits_and_punctuation() {
        assert_eq!(normalize("Art. 5 da CF/88!"), "art   da cf");
        assert_eq!(normalize("  123  "), "");
        assert_eq!(normalize("...?!"), "");
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "Aumento anormal da língua",
            "Que dura pouco tempo; passageiro, temporário",
            "İstanbul — ÇAĞ 2024",
            "Remédio constitucional (art. 5º, LXVIII)",
            "ﬁnal ångström ñandú",
            "",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
