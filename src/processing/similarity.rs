//! Document-pair relevance between a job description and a resume

use crate::config::SimilarityMethod;
use crate::processing::text_processor::{term_frequencies, token_set};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Pure, deterministic relevance score in `[0, 1]` of one document pair.
///
/// The score depends on the two documents only, never on other resumes in
/// the same run.
pub trait SimilarityEstimator: Send + Sync {
    fn name(&self) -> &'static str;

    fn similarity(&self, job: &str, resume: &str) -> f32;
}

/// `|A ∩ B| / |A ∪ B|` over normalized token sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaccardSimilarity;

impl SimilarityEstimator for JaccardSimilarity {
    fn name(&self) -> &'static str {
        "jaccard"
    }

    fn similarity(&self, job: &str, resume: &str) -> f32 {
        let a = token_set(job);
        let b = token_set(resume);

        let union = a.union(&b).count();
        if union == 0 {
            return 0.0;
        }
        let intersection = a.intersection(&b).count();
        intersection as f32 / union as f32
    }
}

/// Cosine similarity of TF-IDF weighted term vectors.
///
/// Term weight is `tf * (ln((1 + n) / (1 + df)) + 1)`, with IDF fitted on
/// the two documents being compared.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfSimilarity;

type TermCounts = HashMap<String, usize>;
type WeightedVector = BTreeMap<String, f64>;

impl TfIdfSimilarity {
    fn fit_idf(corpus: &[TermCounts]) -> HashMap<&str, f64> {
        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for counts in corpus {
            for term in counts.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n = corpus.len() as f64;
        document_frequency
            .into_iter()
            .map(|(term, df)| (term, ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
            .collect()
    }

    fn weigh(counts: &TermCounts, idf: &HashMap<&str, f64>) -> WeightedVector {
        counts
            .iter()
            .map(|(term, &tf)| {
                let weight = idf.get(term.as_str()).copied().unwrap_or(1.0);
                (term.clone(), tf as f64 * weight)
            })
            .collect()
    }

    fn cosine(a: &WeightedVector, b: &WeightedVector) -> f32 {
        let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
        let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        let dot: f64 = a
            .iter()
            .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
            .sum();

        ((dot / (norm_a * norm_b)) as f32).clamp(0.0, 1.0)
    }

    fn score_pair(job: &str, resume: &str) -> f32 {
        let corpus = [term_frequencies(job), term_frequencies(resume)];
        let idf = Self::fit_idf(&corpus);
        Self::cosine(&Self::weigh(&corpus[0], &idf), &Self::weigh(&corpus[1], &idf))
    }
}

impl SimilarityEstimator for TfIdfSimilarity {
    fn name(&self) -> &'static str {
        "tfidf"
    }

    fn similarity(&self, job: &str, resume: &str) -> f32 {
        Self::score_pair(job, resume)
    }
}

pub fn from_method(method: SimilarityMethod) -> Arc<dyn SimilarityEstimator> {
    match method {
        SimilarityMethod::Jaccard => Arc::new(JaccardSimilarity),
        SimilarityMethod::TfIdf => Arc::new(TfIdfSimilarity),
    }
}
