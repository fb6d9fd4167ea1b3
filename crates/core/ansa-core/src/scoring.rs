//! Relevance scoring primitives
//!
//! A candidate's combined score is cosine similarity between the query and
//! entry embeddings plus a keyword tier bonus from the question text. Either
//! half can contribute 0 on its own without suppressing the other.

/// Cosine similarity between two embeddings
///
/// Accumulates in f64 to keep long f32 vectors stable. Returns 0.0 when
/// either vector has zero magnitude. Callers are expected to pass vectors
/// of the same length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut mag_a = 0.0f64;
    let mut mag_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    let mag_a = mag_a.sqrt();
    let mag_b = mag_b.sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

/// Keyword relevance tier for a query against a text
///
/// Both sides are lowercased first. The first matching tier wins:
/// containment anywhere scores 0.30, a whole-text prefix 0.20, and a
/// prefix of any whitespace-delimited token 0.10. Containment is checked
/// before prefix, so a query that starts the text still scores 0.30.
pub fn keyword_score(query: &str, text: &str) -> f64 {
    let q = query.to_lowercase();
    let t = text.to_lowercase();

    if t.contains(&q) {
        return 0.30;
    }
    if t.starts_with(&q) {
        return 0.20;
    }
    if t.split_whitespace().any(|w| w.starts_with(&q)) {
        return 0.10;
    }

    0.0
}
