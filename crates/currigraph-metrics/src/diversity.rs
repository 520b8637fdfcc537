use currigraph_core::{subjects_of_code, LogBase};
use std::collections::BTreeMap;

/// Subject probabilities from listed course codes with cross-listing
/// weight-splitting: a course under k departments contributes 1/k to each,
/// so every subject-bearing course carries total mass 1. Codes without a
/// recognizable subject contribute nothing.
pub fn subject_probs(codes: &[String]) -> BTreeMap<String, f64> {
    let mut contrib: BTreeMap<String, f64> = BTreeMap::new();
    for code in codes {
        let subjects = subjects_of_code(code);
        if subjects.is_empty() {
            continue;
        }
        let weight = 1.0 / subjects.len() as f64;
        for subject in subjects {
            *contrib.entry(subject).or_insert(0.0) += weight;
        }
    }
    let total: f64 = contrib.values().sum();
    if total <= 0.0 {
        return BTreeMap::new();
    }
    contrib
        .into_iter()
        .filter(|(_, mass)| *mass > 0.0)
        .map(|(subject, mass)| (subject, mass / total))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubjectDiversity {
    pub shannon: f64,
    pub shannon_norm: f64,
    pub simpson: f64,
    pub hhi: f64,
    pub n_subjects: usize,
}

impl SubjectDiversity {
    fn empty() -> Self {
        Self {
            shannon: f64::NAN,
            shannon_norm: f64::NAN,
            simpson: f64::NAN,
            hhi: f64::NAN,
            n_subjects: 0,
        }
    }
}

/// Shannon entropy (raw and normalized by log k), Simpson index, and HHI
/// over the subject distribution of the listed codes. All NaN when no
/// subject can be extracted; normalized entropy is 0.0 for a single
/// subject (no diversity to measure).
pub fn subject_diversity(codes: &[String], base: LogBase) -> SubjectDiversity {
    let probs = subject_probs(codes);
    if probs.is_empty() {
        return SubjectDiversity::empty();
    }
    let k = probs.len();
    let shannon: f64 = -probs.values().map(|p| p * base.log(*p)).sum::<f64>();
    let shannon_norm = if k > 1 {
        shannon / base.log(k as f64)
    } else {
        0.0
    };
    let hhi: f64 = probs.values().map(|p| p * p).sum();
    SubjectDiversity {
        shannon,
        shannon_norm,
        simpson: 1.0 - hhi,
        hhi,
        n_subjects: k,
    }
}
