//! Fixed-topic-count LDA over the bag-of-words corpus.
//!
//! Training is collapsed Gibbs sampling, seedable for reproducible runs. The
//! fitted model is persisted as a single JSON artifact, overwritten on each
//! retrain; there is no incremental update path.

use crate::corpus::CorpusEntry;
use crate::error::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Token <-> id mapping in first-seen order
#[derive(Debug, Default, Clone)]
pub struct Dictionary {
    tokens: Vec<String>,
    ids: HashMap<String, usize>,
}

impl Dictionary {
    pub fn from_corpus(corpus: &[CorpusEntry]) -> Self {
        let mut dictionary = Dictionary::default();
        for entry in corpus {
            for token in &entry.tokens {
                dictionary.add(token);
            }
        }
        dictionary
    }

    fn add(&mut self, token: &str) -> usize {
        if let Some(&id) = self.ids.get(token) {
            return id;
        }
        let id = self.tokens.len();
        self.tokens.push(token.to_string());
        self.ids.insert(token.to_string(), id);
        id
    }

    pub fn id_of(&self, token: &str) -> Option<usize> {
        self.ids.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Bag-of-words vector: (token_id, count) pairs in first-seen order
    pub fn bow(&self, tokens: &[String]) -> Vec<(usize, usize)> {
        let mut counts: Vec<(usize, usize)> = Vec::new();
        let mut positions: HashMap<usize, usize> = HashMap::new();
        for token in tokens {
            let Some(id) = self.id_of(token) else { continue };
            match positions.get(&id) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    positions.insert(id, counts.len());
                    counts.push((id, 1));
                }
            }
        }
        counts
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// Persisted topic-model artifact
#[derive(Debug, Serialize, Deserialize)]
pub struct TopicModel {
    pub num_topics: usize,
    pub alpha: f64,
    pub beta: f64,
    /// token id -> token text
    pub vocab: Vec<String>,
    /// per-document bill ids, row-aligned with doc_topic
    pub doc_ids: Vec<u64>,
    /// K x V topic-word assignment counts
    pub topic_word: Vec<Vec<usize>>,
    /// D x K document-topic assignment counts
    pub doc_topic: Vec<Vec<usize>>,
    /// total assignments per topic
    pub topic_totals: Vec<usize>,
}

impl TopicModel {
    /// Top-n weighted words per topic
    pub fn top_words(&self, n: usize) -> Vec<Vec<(String, f64)>> {
        let vocab_size = self.vocab.len() as f64;
        self.topic_word
            .iter()
            .enumerate()
            .map(|(k, counts)| {
                let total = self.topic_totals[k] as f64;
                let mut weighted: Vec<(String, f64)> = counts
                    .iter()
                    .enumerate()
                    .filter(|(_, &c)| c > 0)
                    .map(|(w, &c)| {
                        let p = (c as f64 + self.beta) / (total + vocab_size * self.beta);
                        (self.vocab[w].clone(), p)
                    })
                    .collect();
                weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                weighted.truncate(n);
                weighted
            })
            .collect()
    }

    /// Normalized topic distribution for one document row
    pub fn doc_distribution(&self, doc: usize) -> Vec<f64> {
        let counts = &self.doc_topic[doc];
        let total: usize = counts.iter().sum();
        let denom = total as f64 + self.num_topics as f64 * self.alpha;
        counts
            .iter()
            .map(|&c| (c as f64 + self.alpha) / denom)
            .collect()
    }

    /// Overwrite the artifact file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<TopicModel> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Train an LDA model over the corpus with collapsed Gibbs sampling
pub fn train(
    corpus: &[CorpusEntry],
    num_topics: usize,
    iterations: usize,
    seed: Option<u64>,
) -> TopicModel {
    let dictionary = Dictionary::from_corpus(corpus);
    let vocab_size = dictionary.len();
    let alpha = 50.0 / num_topics.max(1) as f64;
    let beta = 0.01;

    // expand each bag-of-words vector back into a token-id sequence; the
    // sampler only needs per-token assignments, not token order
    let docs: Vec<Vec<usize>> = corpus
        .iter()
        .map(|entry| {
            dictionary
                .bow(&entry.tokens)
                .into_iter()
                .flat_map(|(id, count)| std::iter::repeat(id).take(count))
                .collect()
        })
        .collect();
    let doc_ids: Vec<u64> = corpus.iter().map(|entry| entry.bill_id).collect();

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut topic_word = vec![vec![0usize; vocab_size]; num_topics];
    let mut doc_topic = vec![vec![0usize; num_topics]; docs.len()];
    let mut topic_totals = vec![0usize; num_topics];

    // random initial assignment
    let mut assignments: Vec<Vec<usize>> = docs
        .iter()
        .enumerate()
        .map(|(d, words)| {
            words
                .iter()
                .map(|&w| {
                    let k = rng.gen_range(0..num_topics.max(1));
                    topic_word[k][w] += 1;
                    doc_topic[d][k] += 1;
                    topic_totals[k] += 1;
                    k
                })
                .collect()
        })
        .collect();

    if vocab_size > 0 && num_topics > 0 {
        let mut weights = vec![0.0f64; num_topics];
        for _ in 0..iterations {
            for (d, words) in docs.iter().enumerate() {
                for (i, &w) in words.iter().enumerate() {
                    let old = assignments[d][i];
                    topic_word[old][w] -= 1;
                    doc_topic[d][old] -= 1;
                    topic_totals[old] -= 1;

                    for k in 0..num_topics {
                        weights[k] = (doc_topic[d][k] as f64 + alpha)
                            * (topic_word[k][w] as f64 + beta)
                            / (topic_totals[k] as f64 + vocab_size as f64 * beta);
                    }
                    let new = sample_index(&mut rng, &weights);

                    assignments[d][i] = new;
                    topic_word[new][w] += 1;
                    doc_topic[d][new] += 1;
                    topic_totals[new] += 1;
                }
            }
        }
    }

    TopicModel {
        num_topics,
        alpha,
        beta,
        vocab: dictionary.tokens().to_vec(),
        doc_ids,
        topic_word,
        doc_topic,
        topic_totals,
    }
}

fn sample_index(rng: &mut StdRng, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    let mut r = rng.gen::<f64>() * total;
    for (k, w) in weights.iter().enumerate() {
        r -= w;
        if r <= 0.0 {
            return k;
        }
    }
    weights.len() - 1
}
