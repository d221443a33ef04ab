use palavra_core::language::LanguageProcessor;

/// Share of the definition's stems that also appear in the answer.
/// Both inputs must already be normalized.
pub fn stem_overlap(processor: &dyn LanguageProcessor, answer: &str, definition: &str) -> f64 {
    let definition_stems = processor.stems(definition);
    if definition_stems.is_empty() {
        return 0.0;
    }

    let answer_stems = processor.stems(answer);
    let shared = definition_stems.intersection(&answer_stems).count();

    shared as f64 / definition_stems.len() as f64
}

#[cfg(test)]
mod tests {
    use palavra_lang_portuguese::PortugueseProcessor;

    use super::*;

    #[test]
    fn counts_morphological_variants() {
        let pt = PortugueseProcessor::new();
        let score = stem_overlap(&pt, "linguas grandes", "lingua grande");
        assert_eq!(score, 1.0);
    }

    #[test]
    fn partial_and_empty() {
        let pt = PortugueseProcessor::new();
        assert_eq!(stem_overlap(&pt, "lingua grande", "aumento anormal da lingua"), 0.25);
        assert_eq!(stem_overlap(&pt, "dor de cabeca", "aumento anormal da lingua"), 0.0);
        assert_eq!(stem_overlap(&pt, "qualquer coisa", ""), 0.0);
        assert_eq!(stem_overlap(&pt, "", "aumento anormal"), 0.0);
    }
}
