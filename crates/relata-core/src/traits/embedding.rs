use crate::errors::RelataResult;

/// Turns query and section text into fixed-length vectors.
pub trait IEmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> RelataResult<Vec<f32>>;

    /// One vector per section text, in order.
    fn embed_batch(&self, texts: &[String]) -> RelataResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Length of every vector this provider returns.
    fn dimensions(&self) -> usize;

    fn name(&self) -> &str;

    /// False when the provider cannot serve requests right now.
    fn is_available(&self) -> bool;
}
