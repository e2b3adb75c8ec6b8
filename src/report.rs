use serde::Serialize;

use crate::config;
use crate::embeddings::engine::l2_norm;

/// Outcome of embedding one sentence.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceReport<'a> {
    pub sentence: &'a str,
    pub embedded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub norm: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<&'a [f32]>,
}

impl<'a> SentenceReport<'a> {
    pub fn new(sentence: &'a str, embedding: Option<&'a [f32]>) -> Self {
        Self {
            sentence,
            embedded: embedding.is_some(),
            dimension: embedding.map(<[f32]>::len),
            norm: embedding.map(l2_norm),
            embedding,
        }
    }

    pub fn render_text(&self) -> String {
        match self.embedding {
            Some(values) => format!(
                "Sentence: {}\nEmbedding shape: ({},)\nFirst {} values: {}\nVector norm: {:.4}",
                self.sentence,
                values.len(),
                config::embedding::SENTENCE_PREVIEW_VALUES,
                format_preview(values, config::embedding::SENTENCE_PREVIEW_VALUES),
                self.norm.unwrap_or_default(),
            ),
            None => format!("Sentence: {} → Skipped", self.sentence),
        }
    }
}

/// Summary of a loaded vector model, plus one probe word.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelReport<'a> {
    pub model_path: String,
    pub dimension: usize,
    pub vocabulary_size: usize,
    pub word: &'a str,
    pub in_vocabulary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector: Option<&'a [f32]>,
}

impl ModelReport<'_> {
    pub fn render_text(&self) -> String {
        let mut lines = vec![
            "Model loaded successfully!".to_string(),
            format!("Dimension: {}", self.dimension),
            format!("Vocabulary size: {}", self.vocabulary_size),
        ];
        match self.vector {
            Some(values) => {
                lines.push(format!(
                    "Vector for '{}' (first {} values): {}",
                    self.word,
                    config::embedding::WORD_PREVIEW_VALUES,
                    format_preview(values, config::embedding::WORD_PREVIEW_VALUES)
                ));
                lines.push(format!("Vector shape: ({},)", values.len()));
            }
            None => lines.push(format!("'{}' is out of vocabulary", self.word)),
        }
        lines.join("\n")
    }
}

/// First `n` values, fixed decimals, space separated: `[0.1234 -0.5000]`.
pub fn format_preview(values: &[f32], n: usize) -> String {
    let shown: Vec<String> = values
        .iter()
        .take(n)
        .map(|v| format!("{:.*}", config::embedding::PREVIEW_DECIMALS, v))
        .collect();
    format!("[{}]", shown.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_preview() {
        assert_eq!(format_preview(&[0.5, -0.25, 1.0], 2), "[0.5000 -0.2500]");
        assert_eq!(format_preview(&[], 8), "[]");
    }

    #[test]
    fn test_sentence_report_text() {
        let values = [0.5, 0.5, 0.0, 0.0];
        let report = SentenceReport::new("a b", Some(&values[..]));
        assert_eq!(
            report.render_text(),
            "Sentence: a b\nEmbedding shape: (4,)\nFirst 8 values: [0.5000 0.5000 0.0000 0.0000]\nVector norm: 0.7071"
        );

        let skipped = SentenceReport::new("   ", None);
        assert_eq!(skipped.render_text(), "Sentence:     → Skipped");
    }

    #[test]
    fn test_sentence_report_json_omits_missing_fields() {
        let report = SentenceReport::new("", None);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({ "sentence": "", "embedded": false }));

        let values = [3.0, 4.0];
        let json = serde_json::to_value(SentenceReport::new("x", Some(&values[..]))).unwrap();
        assert_eq!(json["dimension"], 2);
        assert_eq!(json["norm"], 5.0);
        assert_eq!(json["embedding"], serde_json::json!([3.0, 4.0]));
    }

    #[test]
    fn test_model_report_text() {
        let values = [0.1, 0.2];
        let report = ModelReport {
            model_path: "m.vec".to_string(),
            dimension: 2,
            vocabulary_size: 7,
            word: "ተማሪ",
            in_vocabulary: true,
            vector: Some(&values[..]),
        };
        let text = report.render_text();
        assert!(text.contains("Dimension: 2"));
        assert!(text.contains("Vector for 'ተማሪ' (first 10 values): [0.1000 0.2000]"));
        assert!(text.contains("Vector shape: (2,)"));

        let oov = ModelReport { in_vocabulary: false, vector: None, ..report };
        assert!(oov.render_text().ends_with("'ተማሪ' is out of vocabulary"));
    }
}
