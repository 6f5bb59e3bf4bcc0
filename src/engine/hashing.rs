//! blake3 digests of input files

use anyhow::{Context, Result};
use blake3::{Hash, Hasher};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::utils::config::HashingConsts;

/// Feed `reader` into `hasher` in fixed-size chunks until EOF.
fn update_from_reader<R: Read>(hasher: &mut Hasher, mut reader: R) -> Result<()> {
    let mut buffer = vec![0u8; HashingConsts::HASH_READ_CHUNK_SIZE];
    loop {
        match reader.read(&mut buffer)? {
            0 => return Ok(()),
            n => {
                hasher.update(&buffer[..n]);
            }
        }
    }
}

/// Digest of the file at `path`. `size` picks the strategy: files above
/// [`HashingConsts::HASH_MMAP_THRESHOLD`] are memory-mapped, smaller ones streamed.
pub fn hash_file(path: &Path, size: u64) -> Result<[u8; 32]> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Hasher::new();

    if size > HashingConsts::HASH_MMAP_THRESHOLD {
        // SAFETY: read-only map; a concurrent truncation can only corrupt this digest.
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("mmap {}", path.display()))?;
        hasher.update(&mmap);
    } else {
        let reader = BufReader::with_capacity(HashingConsts::HASH_READ_CHUNK_SIZE, file);
        update_from_reader(&mut hasher, reader)
            .with_context(|| format!("read {}", path.display()))?;
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Lowercase hex of a 32-byte digest.
pub fn digest_hex(digest: &[u8; 32]) -> String {
    Hash::from_bytes(*digest).to_hex().to_string()
}
