//! The junk category registry.
//!
//! One [`JunkCategoryDef`] per cleanable class of files, built per
//! platform at startup and never mutated. Most categories are
//! conditional on an application being installed; a missing scan path
//! is a silent skip at scan time, so the registry can list everything
//! the platform could have.

use std::path::PathBuf;

use crate::platform::{PathRules, Platform};

/// A per-profile scan location: enumerate the immediate subdirectories
/// of `base` (one per user profile), then probe
/// `base/<profile>/<per_profile_subpath>`.
#[derive(Debug, Clone)]
pub struct DynamicPath {
    pub base: PathBuf,
    pub per_profile_subpath: PathBuf,
}

impl DynamicPath {
    fn new(base: PathBuf, subpath: &str) -> Self {
        Self {
            base,
            per_profile_subpath: PathBuf::from(subpath),
        }
    }
}

/// Static definition of one junk category.
#[derive(Debug, Clone)]
pub struct JunkCategoryDef {
    /// Stable machine key.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Display icon.
    pub icon: &'static str,
    /// Group key (see [`category_groups`]).
    pub group: &'static str,
    /// One-line description of what gets cleaned.
    pub description: &'static str,
    /// Directories scanned as-is.
    pub scan_paths: Vec<PathBuf>,
    /// Per-profile locations (multi-profile apps).
    pub dynamic_paths: Vec<DynamicPath>,
    /// Extension allowlist (lowercased, leading dot). Empty = no
    /// extension filter.
    pub extensions: Vec<&'static str>,
    /// Name glob allowlist (`*` wildcard, case-insensitive). Empty = no
    /// name filter. When both allowlists are empty every file under the
    /// scan paths matches.
    pub name_patterns: Vec<&'static str>,
    /// Only match files at least this old (by mtime).
    pub min_age_days: Option<u64>,
    /// Whether cleaning this category is safe without review.
    pub safe_to_clean: bool,
    /// Caveat shown for categories that are not safe by default.
    pub warning: Option<&'static str>,
}

impl JunkCategoryDef {
    fn new(key: &'static str, name: &'static str, icon: &'static str, group: &'static str) -> Self {
        Self {
            key,
            name,
            icon,
            group,
            description: "",
            scan_paths: Vec::new(),
            dynamic_paths: Vec::new(),
            extensions: Vec::new(),
            name_patterns: Vec::new(),
            min_age_days: None,
            safe_to_clean: true,
            warning: None,
        }
    }

    fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    fn paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.scan_paths = paths;
        self
    }

    fn dynamic(mut self, dynamic: Vec<DynamicPath>) -> Self {
        self.dynamic_paths = dynamic;
        self
    }

    fn extensions(mut self, extensions: &[&'static str]) -> Self {
        self.extensions = extensions.to_vec();
        self
    }

    fn patterns(mut self, patterns: &[&'static str]) -> Self {
        self.name_patterns = patterns.to_vec();
        self
    }

    fn older_than(mut self, days: u64) -> Self {
        self.min_age_days = Some(days);
        self
    }

    fn unsafe_with_warning(mut self, warning: &'static str) -> Self {
        self.safe_to_clean = false;
        self.warning = Some(warning);
        self
    }
}

/// A display group of categories.
#[derive(Debug, Clone, Copy)]
pub struct CategoryGroup {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub order: u32,
}

static GROUPS: &[CategoryGroup] = &[
    CategoryGroup { key: "system", name: "System Junk", icon: "🖥️", order: 1 },
    CategoryGroup { key: "browser", name: "Browser Caches", icon: "🌐", order: 2 },
    CategoryGroup { key: "social", name: "Messaging Apps", icon: "💬", order: 3 },
    CategoryGroup { key: "development", name: "Developer Tools", icon: "👨‍💻", order: 4 },
    CategoryGroup { key: "gaming", name: "Game Platforms", icon: "🎮", order: 5 },
    CategoryGroup { key: "creative", name: "Creative Apps", icon: "🎨", order: 6 },
    CategoryGroup { key: "office", name: "Office Apps", icon: "📊", order: 7 },
    CategoryGroup { key: "optional", name: "Optional Cleanup", icon: "⚙️", order: 8 },
];

/// All category groups, in display order.
pub fn category_groups() -> &'static [CategoryGroup] {
    GROUPS
}

/// Display name for a group key.
pub fn group_display_name(key: &str) -> &'static str {
    GROUPS
        .iter()
        .find(|g| g.key == key)
        .map(|g| g.name)
        .unwrap_or("Other")
}

/// Build the full junk category registry for the given path tables.
///
/// Table order is display/scan order and is stable.
pub fn junk_categories(rules: &PathRules) -> Vec<JunkCategoryDef> {
    let home = rules.home().clone();
    let platform = rules.platform();
    let mut defs = Vec::new();

    // System junk
    defs.push(
        JunkCategoryDef::new("system_temp", "System temp files", "🗂️", "system")
            .describe("Temporary files in the system temp directories")
            .paths(rules.temp_dirs())
            .extensions(&[".tmp", ".temp", ".log", ".bak", ".old", ".chk", ".gid", ".dmp"]),
    );

    let user_cache_paths = match platform {
        Platform::Windows => vec![
            home.join("AppData\\Local\\Temp"),
            home.join("AppData\\Local\\CrashDumps"),
            home.join("AppData\\Local\\D3DSCache"),
        ],
        Platform::MacOs => vec![home.join("Library/Caches"), PathBuf::from("/var/tmp")],
        Platform::Linux => vec![home.join(".cache"), PathBuf::from("/var/tmp")],
    };
    defs.push(
        JunkCategoryDef::new("user_cache", "User temp files", "💾", "system")
            .describe("Per-account temporary files and caches")
            .paths(user_cache_paths),
    );

    defs.push(
        JunkCategoryDef::new("system_update", "System update cache", "🔄", "system")
            .describe("Downloaded OS update packages")
            .paths(rules.system_update_dirs()),
    );

    let (thumb_paths, thumb_patterns): (Vec<PathBuf>, &[&'static str]) = match platform {
        Platform::Windows => (
            vec![home.join("AppData\\Local\\Microsoft\\Windows\\Explorer")],
            &["thumbcache_*.db", "iconcache_*.db"],
        ),
        Platform::MacOs => (
            vec![home.join("Library/Caches/com.apple.finder")],
            &["*.db"],
        ),
        Platform::Linux => (vec![home.join(".cache/thumbnails")], &[]),
    };
    defs.push(
        JunkCategoryDef::new("thumbnail_cache", "Thumbnail cache", "🖼️", "system")
            .describe("File manager thumbnail caches")
            .paths(thumb_paths)
            .patterns(thumb_patterns),
    );

    if platform == Platform::Windows {
        defs.push(
            JunkCategoryDef::new("prefetch", "Prefetch data", "⚡", "system")
                .describe("Program prefetch caches")
                .paths(vec![PathBuf::from("C:\\Windows\\Prefetch")])
                .extensions(&[".pf"]),
        );
    }

    let (recent_paths, recent_exts): (Vec<PathBuf>, &[&'static str]) = match platform {
        Platform::Windows => (
            vec![home.join("AppData\\Roaming\\Microsoft\\Windows\\Recent")],
            &[".lnk"],
        ),
        Platform::MacOs => (
            vec![home.join("Library/Application Support/com.apple.sharedfilelist")],
            &[".sfl", ".sfl2"],
        ),
        Platform::Linux => (vec![], &[]),
    };
    defs.push(
        JunkCategoryDef::new("recent_files", "Recent file lists", "📋", "system")
            .describe("Shortcuts to recently opened files")
            .paths(recent_paths)
            .extensions(recent_exts),
    );

    let report_paths = match platform {
        Platform::Windows => vec![
            home.join("AppData\\Local\\Microsoft\\Windows\\WER"),
            PathBuf::from("C:\\Windows\\LiveKernelReports"),
            PathBuf::from("C:\\Windows\\Minidump"),
        ],
        Platform::MacOs => vec![
            home.join("Library/Logs/DiagnosticReports"),
            PathBuf::from("/Library/Logs/DiagnosticReports"),
        ],
        Platform::Linux => vec![PathBuf::from("/var/crash")],
    };
    defs.push(
        JunkCategoryDef::new("error_reports", "Error reports", "⚠️", "system")
            .describe("Crash reports and memory dumps")
            .paths(report_paths)
            .extensions(&[".dmp", ".hdmp", ".mdmp", ".crash", ".panic"]),
    );

    defs.push(
        JunkCategoryDef::new("system_logs", "System logs", "📝", "system")
            .describe("Installation and update logs")
            .paths(rules.system_log_dirs())
            .extensions(&[".log", ".etl", ".txt"]),
    );

    // Browser caches
    defs.push(
        JunkCategoryDef::new("chrome_cache", "Google Chrome cache", "🌐", "browser")
            .describe("Chrome cache and temporary files")
            .paths(rules.browser_cache_dirs("chrome")),
    );
    defs.push(
        JunkCategoryDef::new("edge_cache", "Microsoft Edge cache", "🌊", "browser")
            .describe("Edge cache and temporary files")
            .paths(rules.browser_cache_dirs("edge")),
    );
    // Firefox keeps one cache2 tree per profile directory.
    defs.push(
        JunkCategoryDef::new("firefox_cache", "Firefox cache", "🦊", "browser")
            .describe("Firefox per-profile caches")
            .dynamic(
                rules
                    .browser_cache_dirs("firefox")
                    .into_iter()
                    .map(|base| DynamicPath::new(base, "cache2"))
                    .collect(),
            ),
    );
    if platform == Platform::Windows {
        defs.push(
            JunkCategoryDef::new("opera_cache", "Opera cache", "🎭", "browser")
                .describe("Opera cache and temporary files")
                .paths(rules.browser_cache_dirs("opera")),
        );
    }
    if platform == Platform::MacOs {
        defs.push(
            JunkCategoryDef::new("safari_cache", "Safari cache", "🧭", "browser")
                .describe("Safari cache and local storage")
                .paths(rules.browser_cache_dirs("safari")),
        );
    }

    // Messaging apps
    let wechat_dynamic = if platform == Platform::Windows {
        vec![
            DynamicPath::new(home.join("Documents\\WeChat Files"), "FileStorage/Cache"),
            DynamicPath::new(home.join("Documents\\WeChat Files"), "FileStorage/Temp"),
        ]
    } else {
        vec![]
    };
    defs.push(
        JunkCategoryDef::new("wechat_cache", "WeChat cache", "💬", "social")
            .describe("WeChat temporary files and caches (chat history untouched)")
            .paths(rules.social_app_dirs("wechat"))
            .dynamic(wechat_dynamic),
    );

    let qq_dynamic = if platform == Platform::Windows {
        vec![DynamicPath::new(
            home.join("AppData\\Roaming\\Tencent\\Users"),
            "QQ/Temp",
        )]
    } else {
        vec![]
    };
    defs.push(
        JunkCategoryDef::new("qq_cache", "QQ cache", "🐧", "social")
            .describe("QQ temporary files and caches")
            .paths(rules.social_app_dirs("qq"))
            .dynamic(qq_dynamic)
            .extensions(&[".tmp", ".log"]),
    );

    if platform == Platform::Windows {
        defs.push(
            JunkCategoryDef::new("tencent_meeting", "Tencent Meeting cache", "📹", "social")
                .describe("Meeting temporary files and logs")
                .paths(vec![
                    home.join("AppData\\Roaming\\Tencent\\WeMeet\\Cache"),
                    home.join("AppData\\Roaming\\Tencent\\WeMeet\\Logs"),
                    home.join("AppData\\Local\\Tencent\\WeMeet\\Cache"),
                ]),
        );
        defs.push(
            JunkCategoryDef::new("dingtalk_cache", "DingTalk cache", "💼", "social")
                .describe("DingTalk temporary files and caches")
                .paths(vec![
                    home.join("AppData\\Local\\DingTalk\\Cache"),
                    home.join("AppData\\Roaming\\DingTalk\\Cache"),
                ]),
        );
    }

    defs.push(
        JunkCategoryDef::new("telegram_cache", "Telegram cache", "✈️", "social")
            .describe("Telegram media cache")
            .paths(rules.social_app_dirs("telegram")),
    );
    defs.push(
        JunkCategoryDef::new("discord_cache", "Discord cache", "🎮", "social")
            .describe("Discord cache and temporary files")
            .paths(rules.social_app_dirs("discord")),
    );

    // Developer tools
    defs.push(
        JunkCategoryDef::new("npm_cache", "npm cache", "📦", "development")
            .describe("Node.js package manager cache")
            .paths(rules.dev_tool_cache_dirs("npm")),
    );
    defs.push(
        JunkCategoryDef::new("yarn_cache", "Yarn cache", "🧶", "development")
            .describe("Yarn package manager cache")
            .paths(rules.dev_tool_cache_dirs("yarn")),
    );
    defs.push(
        JunkCategoryDef::new("pip_cache", "pip cache", "🐍", "development")
            .describe("Python package manager cache")
            .paths(rules.dev_tool_cache_dirs("pip")),
    );
    defs.push(
        JunkCategoryDef::new("gradle_cache", "Gradle cache", "🐘", "development")
            .describe("Gradle build cache")
            .paths(rules.dev_tool_cache_dirs("gradle")),
    );
    defs.push(
        JunkCategoryDef::new("maven_cache", "Maven repository", "☕", "development")
            .describe("Maven local repository")
            .paths(rules.dev_tool_cache_dirs("maven"))
            .unsafe_with_warning("Project dependencies will be re-downloaded after cleaning"),
    );
    defs.push(
        JunkCategoryDef::new("vscode_cache", "VS Code cache", "💻", "development")
            .describe("Visual Studio Code caches")
            .paths(rules.dev_tool_cache_dirs("vscode")),
    );

    // JetBrains IDEs keep caches/ and log/ per product directory.
    let jetbrains_base = match platform {
        Platform::Windows => home.join("AppData\\Local\\JetBrains"),
        Platform::MacOs => home.join("Library/Caches/JetBrains"),
        Platform::Linux => home.join(".cache/JetBrains"),
    };
    defs.push(
        JunkCategoryDef::new("jetbrains_cache", "JetBrains IDE caches", "🔨", "development")
            .describe("IntelliJ/PyCharm/WebStorm caches and logs")
            .dynamic(vec![
                DynamicPath::new(jetbrains_base.clone(), "caches"),
                DynamicPath::new(jetbrains_base, "log"),
            ]),
    );

    // Game platforms
    if platform == Platform::Windows {
        defs.push(
            JunkCategoryDef::new("steam_cache", "Steam cache", "🎮", "gaming")
                .describe("Steam download and web caches")
                .paths(vec![
                    home.join("AppData\\Local\\Steam\\htmlcache"),
                    PathBuf::from("C:\\Program Files (x86)\\Steam\\appcache\\httpcache"),
                    PathBuf::from("C:\\Program Files (x86)\\Steam\\config\\htmlcache"),
                ]),
        );
        defs.push(
            JunkCategoryDef::new("epic_cache", "Epic Games cache", "🎯", "gaming")
                .describe("Epic Games launcher web cache")
                .paths(vec![
                    home.join("AppData\\Local\\EpicGamesLauncher\\Saved\\webcache")
                ]),
        );
    }

    // Creative apps
    if platform == Platform::Windows {
        defs.push(
            JunkCategoryDef::new("adobe_cache", "Adobe media cache", "🎨", "creative")
                .describe("Adobe media cache files")
                .paths(vec![
                    home.join("AppData\\Local\\Adobe"),
                    home.join("AppData\\Roaming\\Adobe\\Common\\Media Cache Files"),
                    home.join("AppData\\Roaming\\Adobe\\Common\\Media Cache"),
                ])
                .extensions(&[".tmp", ".pek", ".cfa", ".cache"]),
        );
    }
    let spotify_paths = match platform {
        Platform::Windows => vec![home.join("AppData\\Local\\Spotify\\Storage")],
        Platform::MacOs => vec![home.join("Library/Caches/com.spotify.client")],
        Platform::Linux => vec![home.join(".cache/spotify")],
    };
    defs.push(
        JunkCategoryDef::new("spotify_cache", "Spotify cache", "🎵", "creative")
            .describe("Spotify streaming cache")
            .paths(spotify_paths),
    );

    // Office apps
    if platform == Platform::Windows {
        defs.push(
            JunkCategoryDef::new("office_cache", "Microsoft Office cache", "📊", "office")
                .describe("Office temporary files and caches")
                .paths(vec![
                    home.join("AppData\\Local\\Microsoft\\Office\\UnsavedFiles"),
                    home.join("AppData\\Local\\Microsoft\\Office\\16.0\\OfficeFileCache"),
                ]),
        );
    }

    // Optional cleanup
    defs.push(
        JunkCategoryDef::new("downloads_old", "Old downloads", "📥", "optional")
            .describe("Installers and archives in the downloads folder")
            .paths(vec![home.join("Downloads")])
            .extensions(&[".exe", ".msi", ".zip", ".rar", ".7z"])
            .older_than(30)
            .unsafe_with_warning("Only installers and archives older than 30 days are matched"),
    );

    defs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_all_groups() {
        let rules = PathRules::with_home(Platform::Windows, "C:\\Users\\test");
        let defs = junk_categories(&rules);
        for group in category_groups() {
            assert!(
                defs.iter().any(|d| d.group == group.key),
                "no category in group {}",
                group.key
            );
        }
    }

    #[test]
    fn test_keys_are_unique_and_order_stable() {
        let rules = PathRules::with_home(Platform::Linux, "/home/test");
        let defs = junk_categories(&rules);
        let keys: Vec<_> = defs.iter().map(|d| d.key).collect();
        let mut deduped = keys.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), keys.len());
        assert_eq!(keys.first(), Some(&"system_temp"));
        assert_eq!(keys.last(), Some(&"downloads_old"));
    }

    #[test]
    fn test_platform_conditional_categories() {
        let linux = junk_categories(&PathRules::with_home(Platform::Linux, "/home/test"));
        assert!(linux.iter().all(|d| d.key != "prefetch"));
        assert!(linux.iter().all(|d| d.key != "safari_cache"));

        let windows = junk_categories(&PathRules::with_home(Platform::Windows, "C:\\Users\\t"));
        assert!(windows.iter().any(|d| d.key == "prefetch"));
        assert!(windows.iter().any(|d| d.key == "steam_cache"));
    }

    #[test]
    fn test_downloads_old_is_age_gated_and_unsafe() {
        let defs = junk_categories(&PathRules::with_home(Platform::Linux, "/home/test"));
        let downloads = defs.iter().find(|d| d.key == "downloads_old").unwrap();
        assert_eq!(downloads.min_age_days, Some(30));
        assert!(!downloads.safe_to_clean);
        assert!(downloads.warning.is_some());
    }

    #[test]
    fn test_firefox_uses_per_profile_paths() {
        let defs = junk_categories(&PathRules::with_home(Platform::Windows, "C:\\Users\\t"));
        let firefox = defs.iter().find(|d| d.key == "firefox_cache").unwrap();
        assert!(firefox.scan_paths.is_empty());
        assert_eq!(firefox.dynamic_paths.len(), 1);
        assert_eq!(
            firefox.dynamic_paths[0].per_profile_subpath,
            PathBuf::from("cache2")
        );
    }
}
