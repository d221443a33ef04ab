mod corpus;
mod sentences;

pub use corpus::{CorpusLoader, LoadedCorpus};
pub use sentences::JsonSentenceStore;
