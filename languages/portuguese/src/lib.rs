pub mod generator;
pub mod processor;

pub use generator::MistralGenerator;
pub use processor::PortugueseProcessor;
