/// One item of a provider stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LLMChunk {
    /// Incremental reply text
    Token(String),
    /// The provider signalled the end of the reply
    Done,
}
