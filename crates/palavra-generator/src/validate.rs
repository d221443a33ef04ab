const TEMPLATES: [&str; 3] = [
    "Esta é uma frase de exemplo usando a palavra '{word}'.",
    "Aqui está outro exemplo com '{word}'.",
    "E esta é a terceira frase com '{word}'.",
];

/// Sentence used when the generator is unavailable or exhausted
pub fn fallback_sentence(word: &str) -> String {
    format!("Exemplo usando a palavra '{word}'.")
}

/// Filler sentence for slot `index`; distinct for every index
pub fn template_sentence(word: &str, index: usize) -> String {
    let base = TEMPLATES[index % TEMPLATES.len()].replace("{word}", word);
    let round = index / TEMPLATES.len();
    if round == 0 {
        base
    } else {
        format!("{} ({})", base.trim_end_matches('.'), round + 1)
    }
}

/// Non-blank trimmed lines of a model response, at most `count`
pub fn split_sentences(raw: &str, count: usize) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(count)
        .map(str::to_string)
        .collect()
}

/// Pad `sentences` with templates up to `count`
pub fn fill_with_templates(word: &str, mut sentences: Vec<String>, count: usize) -> Vec<String> {
    sentences.truncate(count);
    while sentences.len() < count {
        sentences.push(template_sentence(word, sentences.len()));
    }
    sentences
}

/// Exact textual match against what is already stored
pub fn is_duplicate(candidate: &str, existing: &[String]) -> bool {
    let candidate = candidate.trim();
    existing.iter().any(|s| s.trim() == candidate)
}
