// IMPORTANT:
// Keep ALL numeric values centralized here (repo rule: no hardcoded numeric values scattered around).

// NOTE: VERSION must stay in sync with the `version` field in Cargo.toml.
pub const VERSION: &str = "0.3.0";

pub const APP_DIR_REL: &str = ".amharic-embed";

pub mod logging {
    pub const LOG_DIR_REL: &str = "logs";
    pub const LOG_FILE_NAME: &str = "amharic_embed";

    pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
    pub const LOG_ROTATE_KEEP_FILES: usize = 5;

    pub const DEFAULT_LEVEL: &str = "info";
    pub const LEVEL_ENV: &str = "AMHARIC_EMBED_LOG";
}

pub mod embedding {
    pub const DEFAULT_MIN_WORDS: usize = 1;

    pub const MODEL_DIR_REL: &str = "models";
    pub const DEFAULT_MODEL_FILE: &str = "cc.am.300.vec";
    pub const MODEL_ENV: &str = "AMHARIC_EMBED_MODEL";

    // Console previews.
    pub const SENTENCE_PREVIEW_VALUES: usize = 8;
    pub const WORD_PREVIEW_VALUES: usize = 10;
    pub const PREVIEW_DECIMALS: usize = 4;

    pub const DEFAULT_INSPECT_WORD: &str = "ተማሪ";
}

pub mod download {
    pub const TIMEOUT_SECS: u64 = 600;
    pub const STAGED_SUFFIX: &str = "tmp";
    pub const HASH_PREFIX_LOG_CHARS: usize = 12;
    pub const STREAM_BUFFER_BYTES: usize = 64 * 1024;
}
