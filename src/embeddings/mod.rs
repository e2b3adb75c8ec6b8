// embeddings/ — Amharic sentence embeddings from pre-trained word vectors.
//
// Provides:
// - Token vector sources (trait + in-memory table) and the `.vec` loader
// - Text normalization and tokenization
// - Mean-pooled sentence embeddings
// - Model download + SHA256 verification

pub mod download;
pub mod engine;
pub mod source;
pub mod text_prep;
pub mod vec_file;
