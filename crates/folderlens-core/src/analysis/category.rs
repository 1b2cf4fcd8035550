/// File categorisation based on file extensions.
///
/// Every extension maps to exactly one of nine fixed categories. Unknown
/// extensions, the empty extension and anything non-ASCII resolve to
/// [`Category::Other`]; classification never fails.
use serde::Serialize;

/// Broad file categories used for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Documents,
    Images,
    Audio,
    Video,
    Code,
    Archives,
    Data,
    Executables,
    Other,
}

impl Category {
    pub const COUNT: usize = 9;

    /// All categories, in reporting order.
    pub const ALL: [Category; Category::COUNT] = [
        Self::Documents,
        Self::Images,
        Self::Audio,
        Self::Video,
        Self::Code,
        Self::Archives,
        Self::Data,
        Self::Executables,
        Self::Other,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Images => "Images",
            Self::Audio => "Audio",
            Self::Video => "Video",
            Self::Code => "Code",
            Self::Archives => "Archives",
            Self::Data => "Data",
            Self::Executables => "Executables",
            Self::Other => "Other",
        }
    }

    /// One-sentence description shown next to category summaries.
    pub fn description(self) -> &'static str {
        match self {
            Self::Documents => {
                "Text documents, spreadsheets, and presentations used for written content and reports."
            }
            Self::Images => "Image files including photos, graphics, icons, and design assets.",
            Self::Audio => "Audio files including music, podcasts, sound effects, and recordings.",
            Self::Video => {
                "Video files including movies, clips, recordings, and multimedia content."
            }
            Self::Code => {
                "Source code files used in software development across various programming languages."
            }
            Self::Archives => "Compressed files and archives containing bundled or backed-up data.",
            Self::Data => {
                "Structured data files used for storage, configuration, and data exchange."
            }
            Self::Executables => "Executable programs and installers for various operating systems.",
            Self::Other => "Miscellaneous files that don't fit into standard categories.",
        }
    }

    /// Position in [`Category::ALL`], for fixed-size per-category tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Longest extension in the table; anything longer is `Other` without a lookup.
const MAX_EXTENSION_LEN: usize = 8;

/// Categorise a file extension.
///
/// One leading dot is stripped and matching is ASCII case-insensitive, so
/// `".JPG"`, `"jpg"` and `"Jpg"` are all images. Lowercasing happens in a
/// small stack buffer, no allocation.
pub fn categorize(ext: &str) -> Category {
    let ext = ext.strip_prefix('.').unwrap_or(ext);
    let bytes = ext.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_EXTENSION_LEN || !ext.is_ascii() {
        return Category::Other;
    }

    let mut lower = [0u8; MAX_EXTENSION_LEN];
    for (dest, &src) in lower.iter_mut().zip(bytes) {
        *dest = src.to_ascii_lowercase();
    }
    let lower = match std::str::from_utf8(&lower[..bytes.len()]) {
        Ok(s) => s,
        Err(_) => return Category::Other,
    };

    match lower {
        "pdf" | "doc" | "docx" | "txt" | "md" | "rtf" | "odt" | "xls" | "xlsx" | "ppt"
        | "pptx" => Category::Documents,
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "svg" | "webp" | "ico" | "tiff" | "psd" => {
            Category::Images
        }
        "mp3" | "wav" | "flac" | "aac" | "ogg" | "wma" | "m4a" => Category::Audio,
        "mp4" | "avi" | "mkv" | "mov" | "wmv" | "flv" | "webm" | "m4v" => Category::Video,
        "py" | "js" | "ts" | "jsx" | "tsx" | "html" | "css" | "scss" | "sass" | "less" | "java"
        | "cpp" | "c" | "h" | "hpp" | "cs" | "go" | "rs" | "rb" | "php" | "swift" | "kt"
        | "scala" | "vue" | "sql" | "sh" | "bat" | "ps1" => Category::Code,
        "zip" | "rar" | "7z" | "tar" | "gz" | "bz2" | "xz" | "iso" => Category::Archives,
        "csv" | "json" | "xml" | "yaml" | "yml" | "sqlite" | "db" | "parquet" => Category::Data,
        "exe" | "msi" | "dll" | "app" | "dmg" | "deb" | "rpm" => Category::Executables,
        _ => Category::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorise_known_extensions() {
        let cases = [
            ("pdf", Category::Documents),
            ("png", Category::Images),
            ("flac", Category::Audio),
            ("mkv", Category::Video),
            ("rs", Category::Code),
            ("7z", Category::Archives),
            ("parquet", Category::Data),
            ("dmg", Category::Executables),
        ];
        for (ext, expected) in cases {
            assert_eq!(categorize(ext), expected, "wrong category for .{ext}");
        }
    }

    #[test]
    fn leading_dot_is_stripped() {
        assert_eq!(categorize(".json"), Category::Data);
        assert_eq!(categorize(".."), Category::Other);
    }

    /// Extension matching must be case-insensitive so "JPG" == "jpg".
    #[test]
    fn categorise_case_insensitive() {
        assert_eq!(categorize("JPG"), Category::Images);
        assert_eq!(categorize(".Rs"), Category::Code);
        assert_eq!(categorize("ZIP"), Category::Archives);
    }

    #[test]
    fn categorise_is_total() {
        for ext in ["", ".", "xyz", "ÄÖÜ", "数据", "jpg\u{301}", "averyveryverylongextension", "\0"] {
            assert_eq!(categorize(ext), Category::Other, "{ext:?}");
        }
    }

    #[test]
    fn labels_round_trip_through_all() {
        for (i, cat) in Category::ALL.iter().enumerate() {
            assert_eq!(cat.index(), i);
            assert!(!cat.description().is_empty());
        }
        assert_eq!(Category::Executables.to_string(), "Executables");
    }
}
