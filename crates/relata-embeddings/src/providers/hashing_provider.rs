//! Deterministic feature-hashing provider.
//!
//! Each folded token (and each adjacent token pair) lands in a signed bucket chosen by
//! blake3; the result is L2-normalized. Shared vocabulary means nearby vectors, which
//! is enough for offline use and for tests.

use relata_core::errors::RelataResult;
use relata_core::text::fold;
use relata_core::traits::IEmbeddingProvider;

pub struct HashingProvider {
    dimensions: usize,
}

impl HashingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn tokenize(text: &str) -> Vec<String> {
        fold(text)
            .split(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
            .filter(|s| s.chars().count() >= 2)
            .map(str::to_string)
            .collect()
    }

    /// Bucket index and sign for one feature.
    fn bucket(&self, feature: &str) -> (usize, f32) {
        let hash = blake3::hash(feature.as_bytes());
        let bytes = hash.as_bytes();
        let raw = u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]);
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
        ((raw % self.dimensions as u64) as usize, sign)
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dimensions];
        let tokens = Self::tokenize(text);
        for token in &tokens {
            let (i, sign) = self.bucket(token);
            vec[i] += sign;
        }
        for pair in tokens.windows(2) {
            let (i, sign) = self.bucket(&format!("{} {}", pair[0], pair[1]));
            vec[i] += 0.5 * sign;
        }
        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IEmbeddingProvider for HashingProvider {
    fn embed(&self, text: &str) -> RelataResult<Vec<f32>> {
        Ok(self.vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> RelataResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing"
    }

    fn is_available(&self) -> bool {
        true
    }
}
