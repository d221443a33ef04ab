use crate::GenerationRequest;

pub const MAX_SENTENCE_CHARS: usize = 120;

const SINGLE_MAX_TOKENS: u32 = 100;
const THREE_MAX_TOKENS: u32 = 200;
const PROBE_MAX_TOKENS: u32 = 10;

/// Prompt asking for one everyday sentence using `word`
pub fn single_sentence(word: &str, definition: &str, category: &str, temperature: f32) -> GenerationRequest {
    let prompt = format!(
        r#"Gere uma frase em português que use a palavra "{word}" em um contexto natural do dia a dia.

Informações sobre a palavra:
- Definição: {definition}
- Categoria: {category}

Regras para a frase:
1. Use a palavra de forma sutil e natural, como em uma conversa casual
2. Evite explicar diretamente o significado da palavra
3. Crie uma situação cotidiana onde a palavra seria usada naturalmente
4. A frase deve ter no máximo {MAX_SENTENCE_CHARS} caracteres
5. Não use aspas ou formatação especial
6. Retorne apenas a frase, sem numeração ou outros textos

Exemplo de estilo desejado:
Para a palavra "eloquente":
Durante o jantar, fiquei impressionado com o discurso eloquente do professor sobre arte."#
    );

    GenerationRequest {
        prompt,
        max_tokens: SINGLE_MAX_TOKENS,
        temperature,
    }
}

/// Prompt asking for three distinct sentences, one per line
pub fn three_sentences(word: &str, definition: &str, category: &str, temperature: f32) -> GenerationRequest {
    let prompt = format!(
        r#"Gere 3 frases em português que usem a palavra "{word}" em contextos naturais do dia a dia.

Informações sobre a palavra:
- Definição: {definition}
- Categoria: {category}

Regras para as frases:
1. Use a palavra de forma sutil e natural, como em uma conversa casual
2. Evite explicar diretamente o significado da palavra
3. Crie situações cotidianas onde a palavra seria usada naturalmente
4. Cada frase deve ter no máximo {MAX_SENTENCE_CHARS} caracteres
5. As frases devem ser diferentes entre si
6. Não use aspas ou formatação especial
7. Retorne apenas as 3 frases, uma por linha, sem numeração ou outros textos

Exemplo de estilo desejado:
Para a palavra "eloquente":
Durante o jantar, fiquei impressionado com o discurso eloquente do professor sobre arte.
Maria sempre foi eloquente nas reuniões de trabalho, conquistando a atenção de todos.
Seu jeito eloquente de explicar matemática fez toda a turma entender o assunto."#
    );

    GenerationRequest {
        prompt,
        max_tokens: THREE_MAX_TOKENS,
        temperature,
    }
}

/// Short request used to check that the provider answers at all
pub fn connection_probe() -> GenerationRequest {
    GenerationRequest {
        prompt: "Teste de conexão".to_string(),
        max_tokens: PROBE_MAX_TOKENS,
        temperature: 0.0,
    }
}
