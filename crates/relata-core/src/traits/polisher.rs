use crate::errors::RelataResult;

/// Optional generative rewrite of a deterministic draft answer.
///
/// Output is treated as untrusted: it is privacy-filtered again, and any error
/// falls back to the draft.
pub trait IResponsePolisher: Send + Sync {
    fn polish(&self, utterance: &str, draft: &str) -> RelataResult<String>;

    fn name(&self) -> &str;
}
