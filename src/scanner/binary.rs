//! Binary-content sniffing.
//!
//! A file is classified binary from its leading bytes: known magic
//! numbers, embedded NUL bytes, or a high ratio of non-text bytes.

/// Bytes examined from the head of the file.
const SAMPLE_SIZE: usize = 8192;

/// Non-text bytes tolerated before the sample is classified binary.
const NON_TEXT_RATIO: f64 = 0.30;

const MAGIC_NUMBERS: &[&[u8]] = &[
    b"\x7fELF",             // ELF
    b"MZ",                  // PE/DOS
    b"\x89PNG",             // PNG
    b"GIF87a",              // GIF
    b"GIF89a",              // GIF
    b"\xff\xd8\xff",        // JPEG
    b"PK\x03\x04",          // ZIP (also jar, docx, ...)
    b"\x1f\x8b",            // gzip
    b"BZh",                 // bzip2
    b"\xfd7zXZ",            // xz
    b"\x00asm",             // WebAssembly
    b"\xca\xfe\xba\xbe",    // Java class / Mach-O fat
    b"\xfe\xed\xfa\xce",    // Mach-O 32
    b"\xfe\xed\xfa\xcf",    // Mach-O 64
    b"%PDF",                // PDF
    b"OggS",                // Ogg
    b"fLaC",                // FLAC
    b"SQLite format 3\x00", // SQLite
];

/// Classify content as binary.
pub fn is_binary(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }

    for magic in MAGIC_NUMBERS {
        if bytes.starts_with(magic) {
            return true;
        }
    }

    let sample = &bytes[..bytes.len().min(SAMPLE_SIZE)];
    if sample.contains(&0) {
        return true;
    }

    let non_text = sample.iter().filter(|b| is_non_text_byte(**b)).count();
    (non_text as f64) / (sample.len() as f64) > NON_TEXT_RATIO
}

/// Control bytes other than common whitespace and ESC count as non-text.
fn is_non_text_byte(byte: u8) -> bool {
    byte < 0x20 && !matches!(byte, b'\t' | b'\n' | b'\r' | 0x0c | 0x1b)
}
