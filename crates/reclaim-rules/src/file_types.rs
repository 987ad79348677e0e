//! Large-file type buckets.
//!
//! A display classification by extension only, independent of the junk
//! categories. The table is ordered; the first bucket whose extension
//! set contains the (lowercased) extension wins, and `other` is the
//! fallback for everything else.

/// One type bucket in the classification table.
#[derive(Debug, Clone, Copy)]
pub struct LargeFileTypeDef {
    /// Stable machine key (`video`, `audio`, ...).
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Display icon.
    pub icon: &'static str,
    /// Display color hint.
    pub color: &'static str,
    /// Extensions belonging to this bucket, lowercased with leading dot.
    pub extensions: &'static [&'static str],
}

static FILE_TYPES: &[LargeFileTypeDef] = &[
    LargeFileTypeDef {
        key: "video",
        name: "Video",
        icon: "🎬",
        color: "#ef4444",
        extensions: &[
            ".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm", ".m4v", ".mpg", ".mpeg",
            ".3gp", ".rmvb", ".rm", ".ts", ".vob",
        ],
    },
    LargeFileTypeDef {
        key: "audio",
        name: "Audio",
        icon: "🎵",
        color: "#8b5cf6",
        extensions: &[
            ".mp3", ".wav", ".flac", ".aac", ".ogg", ".wma", ".m4a", ".ape", ".aiff", ".opus",
        ],
    },
    LargeFileTypeDef {
        key: "image",
        name: "Images",
        icon: "🖼️",
        color: "#10b981",
        extensions: &[
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".psd", ".raw", ".tiff", ".tif", ".svg",
            ".webp", ".ico", ".heic", ".heif",
        ],
    },
    LargeFileTypeDef {
        key: "document",
        name: "Documents",
        icon: "📄",
        color: "#3b82f6",
        extensions: &[
            ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".txt", ".rtf", ".odt",
            ".ods", ".odp", ".pages", ".numbers", ".key", ".epub", ".mobi",
        ],
    },
    LargeFileTypeDef {
        key: "archive",
        name: "Archives",
        icon: "📦",
        color: "#f59e0b",
        extensions: &[
            ".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz", ".iso", ".dmg", ".cab", ".arj",
            ".lzh", ".tgz",
        ],
    },
    LargeFileTypeDef {
        key: "installer",
        name: "Installers",
        icon: "💿",
        color: "#ec4899",
        extensions: &[".exe", ".msi", ".msix", ".appx", ".deb", ".rpm", ".pkg"],
    },
    LargeFileTypeDef {
        key: "database",
        name: "Databases",
        icon: "🗄️",
        color: "#06b6d4",
        extensions: &[
            ".db", ".sqlite", ".sqlite3", ".mdf", ".ldf", ".accdb", ".mdb", ".sql",
        ],
    },
    LargeFileTypeDef {
        key: "code",
        name: "Code & Build",
        icon: "👨‍💻",
        color: "#64748b",
        extensions: &[
            ".js", ".ts", ".py", ".java", ".cpp", ".c", ".cs", ".go", ".rs", ".php", ".rb",
            ".swift", ".kt", ".jar", ".war", ".dll", ".so", ".node",
        ],
    },
    LargeFileTypeDef {
        key: "virtual",
        name: "VM & Disk Images",
        icon: "💻",
        color: "#0ea5e9",
        extensions: &[
            ".vmdk", ".vdi", ".vhd", ".vhdx", ".qcow2", ".img", ".wim", ".esd",
        ],
    },
    LargeFileTypeDef {
        key: "backup",
        name: "Backups",
        icon: "💾",
        color: "#84cc16",
        extensions: &[".bak", ".backup", ".old", ".orig", ".tmp", ".temp", ".cache"],
    },
    LargeFileTypeDef {
        key: "game",
        name: "Game Assets",
        icon: "🎮",
        color: "#a855f7",
        extensions: &[
            ".pak", ".asset", ".unity3d", ".upk", ".vpk", ".wad", ".gcf", ".ncf",
        ],
    },
    LargeFileTypeDef {
        key: "log",
        name: "Logs",
        icon: "📝",
        color: "#78716c",
        extensions: &[".log", ".logs", ".trace", ".etl", ".evtx", ".dmp"],
    },
    LargeFileTypeDef {
        key: "other",
        name: "Other",
        icon: "📁",
        color: "#9ca3af",
        extensions: &[],
    },
];

/// The full ordered type table.
pub fn file_types() -> &'static [LargeFileTypeDef] {
    FILE_TYPES
}

/// Look up a bucket definition by key.
pub fn file_type_def(key: &str) -> Option<&'static LargeFileTypeDef> {
    FILE_TYPES.iter().find(|t| t.key == key)
}

/// Classify an extension (with leading dot, any case) into a bucket key.
pub fn classify_extension(ext: &str) -> &'static str {
    let ext = ext.to_lowercase();
    for def in FILE_TYPES {
        if def.extensions.contains(&ext.as_str()) {
            return def.key;
        }
    }
    "other"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_extensions() {
        assert_eq!(classify_extension(".mp4"), "video");
        assert_eq!(classify_extension(".MP4"), "video");
        assert_eq!(classify_extension(".flac"), "audio");
        assert_eq!(classify_extension(".iso"), "archive");
    }

    #[test]
    fn test_unknown_extension_is_other() {
        assert_eq!(classify_extension(".xyz"), "other");
        assert_eq!(classify_extension(""), "other");
    }

    #[test]
    fn test_table_declaration_order_wins() {
        // ".tmp" appears only in the backup bucket; make sure lookups
        // walk the table in order and stop at the first match.
        assert_eq!(classify_extension(".tmp"), "backup");
        let keys: Vec<_> = file_types().iter().map(|t| t.key).collect();
        assert_eq!(keys.first(), Some(&"video"));
        assert_eq!(keys.last(), Some(&"other"));
    }

    #[test]
    fn test_type_def_lookup() {
        assert!(file_type_def("video").is_some());
        assert!(file_type_def("bogus").is_none());
    }
}
