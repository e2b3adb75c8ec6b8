// download.rs — Vector model download with SHA256 verification.
//
// Models are large (the Amharic fastText table is >1 GB as text), so the body is
// streamed to a staging file while hashing and only renamed into place once the
// digest matches.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use sha2::{Digest, Sha256};

use crate::{config, paths};

/// Download `url` into the model directory as `file_name`, verifying `expected_sha256`.
/// Returns the final path. An existing file with the right digest is reused.
pub fn fetch_model(url: &str, file_name: &str, expected_sha256: &str) -> anyhow::Result<PathBuf> {
    let expected = normalize_hex(expected_sha256)?;
    let dir = paths::model_dir()?;
    paths::ensure_dir(&dir)?;
    let dest = dir.join(file_name);

    if dest.exists() {
        let actual = file_sha256(&dest)?;
        if actual == expected {
            log::info!("Model already cached at {}", dest.display());
            return Ok(dest);
        }
        log::warn!("Cached model {} has a different SHA256, downloading again", dest.display());
    }

    download_and_verify(url, &dest, &expected)?;
    log::info!("Model download complete: {}", dest.display());
    Ok(dest)
}

/// Verify a local file against an expected SHA256 (hex). Returns the actual digest.
pub fn verify_file_sha256(path: &Path, expected_sha256: &str) -> anyhow::Result<String> {
    let expected = normalize_hex(expected_sha256)?;
    let actual = file_sha256(path)?;
    if actual != expected {
        bail!(
            "SHA256 mismatch for {}: expected {}, got {}",
            path.display(),
            expected,
            actual
        );
    }
    log::info!(
        "SHA256 verified for {} ({})",
        path.display(),
        &actual[..config::download::HASH_PREFIX_LOG_CHARS]
    );
    Ok(actual)
}

/// Hex SHA256 of a file, streamed.
pub fn file_sha256(path: &Path) -> anyhow::Result<String> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut BufReader::new(file), &mut hasher)
        .with_context(|| format!("read {}", path.display()))?;
    Ok(hex::encode(hasher.finalize()))
}

fn normalize_hex(sha256_hex: &str) -> anyhow::Result<String> {
    let hex_str = sha256_hex.trim().to_ascii_lowercase();
    let bytes = hex::decode(&hex_str).with_context(|| format!("invalid SHA256 hex {sha256_hex:?}"))?;
    if bytes.len() != 32 {
        bail!("SHA256 must be 32 bytes, got {}", bytes.len());
    }
    Ok(hex_str)
}

fn download_and_verify(url: &str, dest: &Path, expected_sha256: &str) -> anyhow::Result<()> {
    log::info!("Downloading {} to {}", url, dest.display());

    let resp = ureq::get(url)
        .timeout(std::time::Duration::from_secs(config::download::TIMEOUT_SECS))
        .call()
        .with_context(|| format!("failed to download {url}"))?;

    let status = resp.status();
    if status != 200 {
        bail!("HTTP {status} downloading {url}");
    }

    install_verified(resp.into_reader(), url, dest, expected_sha256)
}

/// Stage `reader` next to `dest`, then rename into place only if the digest matches.
/// On any failure the staging file is removed and `dest` is left untouched.
fn install_verified(reader: impl Read, source: &str, dest: &Path, expected_sha256: &str) -> anyhow::Result<()> {
    let tmp_path = dest.with_extension(config::download::STAGED_SUFFIX);
    let actual = match stream_to_file(reader, &tmp_path) {
        Ok(hash) => hash,
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
    };

    if actual != expected_sha256 {
        let _ = fs::remove_file(&tmp_path);
        bail!(
            "SHA256 mismatch for {}: expected {}, got {}",
            source,
            expected_sha256,
            actual
        );
    }

    log::info!(
        "SHA256 verified for {} ({})",
        source,
        &actual[..config::download::HASH_PREFIX_LOG_CHARS]
    );

    fs::rename(&tmp_path, dest)
        .with_context(|| format!("failed to rename {} -> {}", tmp_path.display(), dest.display()))?;

    Ok(())
}

/// Copy `reader` into `path`, returning the hex SHA256 of the bytes written.
fn stream_to_file(mut reader: impl Read, path: &Path) -> anyhow::Result<String> {
    let mut file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; config::download::STREAM_BUFFER_BYTES];
    let mut total: u64 = 0;

    loop {
        let n = reader.read(&mut buf).context("failed to read response body")?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        file.write_all(&buf[..n])
            .with_context(|| format!("failed to write {}", path.display()))?;
        total += n as u64;
    }
    file.flush()?;
    log::debug!("Wrote {} bytes to {}", total, path.display());

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // SHA256("abc")
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_file_sha256() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("abc.txt");
        fs::write(&path, b"abc").unwrap();
        assert_eq!(file_sha256(&path).unwrap(), ABC_SHA256);
    }

    #[test]
    fn test_verify_accepts_uppercase_digest() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("abc.txt");
        fs::write(&path, b"abc").unwrap();
        let actual = verify_file_sha256(&path, &ABC_SHA256.to_uppercase()).unwrap();
        assert_eq!(actual, ABC_SHA256);
    }

    #[test]
    fn test_verify_rejects_mismatch() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("abd.txt");
        fs::write(&path, b"abd").unwrap();
        let err = verify_file_sha256(&path, ABC_SHA256).unwrap_err();
        assert!(err.to_string().contains("SHA256 mismatch"));
    }

    #[test]
    fn test_normalize_hex_rejects_bad_input() {
        assert!(normalize_hex("not-hex").is_err());
        assert!(normalize_hex("abcd").is_err());
        assert_eq!(normalize_hex(&format!("  {ABC_SHA256}\n")).unwrap(), ABC_SHA256);
    }

    #[test]
    fn test_install_verified_renames_on_match() {
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("am.vec");
        install_verified(&b"abc"[..], "test", &dest, ABC_SHA256).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"abc");
        assert!(!dir.path().join("am.tmp").exists());
    }

    #[test]
    fn test_install_verified_mismatch_leaves_dest_untouched() {
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("am.vec");
        fs::write(&dest, b"previous").unwrap();

        let err = install_verified(&b"abd"[..], "test", &dest, ABC_SHA256).unwrap_err();
        assert!(err.to_string().contains("SHA256 mismatch"));
        assert_eq!(fs::read(&dest).unwrap(), b"previous");
        assert!(!dir.path().join("am.tmp").exists());
    }

    #[test]
    fn test_stream_to_file_hashes_what_it_writes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("model.tmp");
        let hash = stream_to_file(&b"abc"[..], &path).unwrap();
        assert_eq!(hash, ABC_SHA256);
        assert_eq!(fs::read(&path).unwrap(), b"abc");
    }
}
