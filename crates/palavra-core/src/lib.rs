pub mod corpus;
pub mod error;
pub mod language;
pub mod preprocess;

pub use corpus::Corpus;
pub use error::CorpusError;
pub use language::{LanguageProcessor, Token};
pub use preprocess::{DefaultNormalizer, Normalizer, normalize};
