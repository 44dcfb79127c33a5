use crate::models::FileKind;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Number of leading bytes inspected per file.
const SNIFF_LEN: u64 = 8 * 1024;

/// Share of control characters above which a file counts as binary.
const MAX_CONTROL_RATIO: f64 = 0.10;

/// Classifies a file by its leading bytes. Unreadable files are `Other`.
pub async fn classify(path: &Path) -> FileKind {
    match sniff(path).await {
        Ok(bytes) => classify_bytes(&bytes),
        Err(e) => {
            log::debug!("Cannot inspect {}: {}", path.display(), e);
            FileKind::Other
        }
    }
}

async fn sniff(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = File::open(path).await?;
    let mut bytes = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN).read_to_end(&mut bytes).await?;
    Ok(bytes)
}

pub fn classify_bytes(bytes: &[u8]) -> FileKind {
    if bytes.is_empty() {
        return FileKind::Textual;
    }
    if bytes.contains(&0) {
        return FileKind::Other;
    }

    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        // A multi-byte character cut off by the sniff window is still text.
        Err(e) if e.error_len().is_none() => match std::str::from_utf8(&bytes[..e.valid_up_to()]) {
            Ok(text) => text,
            Err(_) => return FileKind::Other,
        },
        Err(_) => return FileKind::Other,
    };

    let mut total = 0usize;
    let mut control = 0usize;
    for c in text.chars() {
        total += 1;
        if c.is_control() && !matches!(c, '\t' | '\n' | '\r' | '\x0c' | '\x1b') {
            control += 1;
        }
    }

    if total == 0 || (control as f64 / total as f64) < MAX_CONTROL_RATIO {
        FileKind::Textual
    } else {
        FileKind::Other
    }
}
