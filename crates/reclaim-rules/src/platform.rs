//! Per-platform directory tables.
//!
//! Pure configuration: which directories to scan or exclude for each
//! feature on Windows, macOS and Linux. Scanner logic never hardcodes
//! a platform path; it asks [`PathRules`].

use std::path::PathBuf;

/// The operating system the path tables are built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Detect the platform this process runs on.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
        }
    }
}

/// Directory tables for one platform and one home directory.
///
/// The home directory is injected rather than read from the
/// environment at each call so tests can point the tables at a
/// temporary tree.
#[derive(Debug, Clone)]
pub struct PathRules {
    platform: Platform,
    home: PathBuf,
}

impl Default for PathRules {
    fn default() -> Self {
        Self::new()
    }
}

impl PathRules {
    /// Build tables for the current platform and the real home dir.
    pub fn new() -> Self {
        Self::with_home(
            Platform::current(),
            dirs::home_dir().unwrap_or_else(|| PathBuf::from("/")),
        )
    }

    /// Build tables for an explicit platform and home directory.
    pub fn with_home(platform: Platform, home: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            home: home.into(),
        }
    }

    /// The platform these tables describe.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The home directory the tables are rooted at.
    pub fn home(&self) -> &PathBuf {
        &self.home
    }

    /// System temporary directories.
    pub fn temp_dirs(&self) -> Vec<PathBuf> {
        match self.platform {
            Platform::Windows => vec![
                self.home.join("AppData\\Local\\Temp"),
                PathBuf::from("C:\\Windows\\Temp"),
            ],
            Platform::MacOs => vec![
                PathBuf::from("/tmp"),
                PathBuf::from("/var/tmp"),
                self.home.join("Library/Caches"),
            ],
            Platform::Linux => vec![PathBuf::from("/tmp"), PathBuf::from("/var/tmp")],
        }
    }

    /// OS update download caches.
    pub fn system_update_dirs(&self) -> Vec<PathBuf> {
        match self.platform {
            Platform::Windows => {
                vec![PathBuf::from("C:\\Windows\\SoftwareDistribution\\Download")]
            }
            Platform::MacOs => vec![PathBuf::from("/Library/Updates")],
            Platform::Linux => vec![],
        }
    }

    /// System log directories.
    pub fn system_log_dirs(&self) -> Vec<PathBuf> {
        match self.platform {
            Platform::Windows => vec![
                PathBuf::from("C:\\Windows\\Logs"),
                PathBuf::from("C:\\Windows\\Panther"),
                self.home.join("AppData\\Local\\Microsoft\\Windows\\WER"),
            ],
            Platform::MacOs => vec![PathBuf::from("/var/log"), self.home.join("Library/Logs")],
            Platform::Linux => vec![PathBuf::from("/var/log")],
        }
    }

    /// Cache directories for a browser, by key.
    pub fn browser_cache_dirs(&self, browser: &str) -> Vec<PathBuf> {
        match (browser, self.platform) {
            ("chrome", Platform::Windows) => vec![
                self.home
                    .join("AppData\\Local\\Google\\Chrome\\User Data\\Default\\Cache"),
                self.home
                    .join("AppData\\Local\\Google\\Chrome\\User Data\\Default\\Code Cache"),
                self.home
                    .join("AppData\\Local\\Google\\Chrome\\User Data\\Default\\GPUCache"),
            ],
            ("chrome", Platform::MacOs) => vec![
                self.home.join("Library/Caches/Google/Chrome/Default/Cache"),
                self.home
                    .join("Library/Caches/Google/Chrome/Default/Code Cache"),
            ],
            ("chrome", Platform::Linux) => vec![self.home.join(".cache/google-chrome")],
            ("edge", Platform::Windows) => vec![
                self.home
                    .join("AppData\\Local\\Microsoft\\Edge\\User Data\\Default\\Cache"),
                self.home
                    .join("AppData\\Local\\Microsoft\\Edge\\User Data\\Default\\Code Cache"),
            ],
            ("edge", Platform::MacOs) => {
                vec![self.home.join("Library/Caches/Microsoft Edge/Default/Cache")]
            }
            ("edge", Platform::Linux) => vec![self.home.join(".cache/microsoft-edge")],
            ("firefox", Platform::Windows) => {
                vec![self.home.join("AppData\\Local\\Mozilla\\Firefox\\Profiles")]
            }
            ("firefox", Platform::MacOs) => {
                vec![self.home.join("Library/Caches/Firefox/Profiles")]
            }
            ("firefox", Platform::Linux) => vec![self.home.join(".cache/mozilla/firefox")],
            ("safari", Platform::MacOs) => vec![
                self.home.join("Library/Caches/com.apple.Safari"),
                self.home.join("Library/Safari/LocalStorage"),
            ],
            ("opera", Platform::Windows) => vec![
                self.home
                    .join("AppData\\Local\\Opera Software\\Opera Stable\\Cache"),
                self.home
                    .join("AppData\\Local\\Opera Software\\Opera GX Stable\\Cache"),
            ],
            _ => vec![],
        }
    }

    /// Cache directories for a development tool, by key.
    pub fn dev_tool_cache_dirs(&self, tool: &str) -> Vec<PathBuf> {
        match (tool, self.platform) {
            ("npm", Platform::Windows) => vec![self.home.join("AppData\\Local\\npm-cache")],
            ("npm", _) => vec![self.home.join(".npm")],
            ("yarn", Platform::Windows) => vec![self.home.join("AppData\\Local\\Yarn\\Cache")],
            ("yarn", Platform::MacOs) => vec![self.home.join("Library/Caches/Yarn")],
            ("yarn", Platform::Linux) => vec![self.home.join(".cache/yarn")],
            ("pip", Platform::Windows) => vec![self.home.join("AppData\\Local\\pip\\cache")],
            ("pip", Platform::MacOs) => vec![self.home.join("Library/Caches/pip")],
            ("pip", Platform::Linux) => vec![self.home.join(".cache/pip")],
            ("gradle", _) => vec![self.home.join(".gradle").join("caches")],
            ("maven", _) => vec![self.home.join(".m2").join("repository")],
            ("vscode", Platform::Windows) => vec![
                self.home.join("AppData\\Roaming\\Code\\Cache"),
                self.home.join("AppData\\Roaming\\Code\\CachedData"),
            ],
            ("vscode", Platform::MacOs) => vec![
                self.home.join("Library/Caches/com.microsoft.VSCode"),
                self.home.join("Library/Application Support/Code/Cache"),
            ],
            ("vscode", Platform::Linux) => vec![
                self.home.join(".config/Code/Cache"),
                self.home.join(".config/Code/CachedData"),
            ],
            _ => vec![],
        }
    }

    /// Data/cache directories for a messaging app, by key.
    pub fn social_app_dirs(&self, app: &str) -> Vec<PathBuf> {
        match (app, self.platform) {
            ("wechat", Platform::Windows) => vec![
                self.home.join("Documents\\WeChat Files"),
                self.home.join("AppData\\Roaming\\Tencent\\WeChat"),
            ],
            ("wechat", Platform::MacOs) => vec![self.home.join(
                "Library/Containers/com.tencent.xinWeChat/Data/Library/Application Support/com.tencent.xinWeChat",
            )],
            ("qq", Platform::Windows) => vec![
                self.home.join("Documents\\Tencent Files"),
                self.home.join("AppData\\Roaming\\Tencent\\QQ"),
            ],
            ("qq", Platform::MacOs) => vec![self.home.join(
                "Library/Containers/com.tencent.qq/Data/Library/Application Support/QQ",
            )],
            ("telegram", Platform::Windows) => {
                vec![self.home.join("AppData\\Roaming\\Telegram Desktop")]
            }
            ("telegram", Platform::MacOs) => {
                vec![self.home.join("Library/Application Support/Telegram Desktop")]
            }
            ("telegram", Platform::Linux) => {
                vec![self.home.join(".local/share/TelegramDesktop")]
            }
            ("discord", Platform::Windows) => vec![self.home.join("AppData\\Roaming\\discord")],
            ("discord", Platform::MacOs) => {
                vec![self.home.join("Library/Application Support/discord")]
            }
            ("discord", Platform::Linux) => vec![self.home.join(".config/discord")],
            _ => vec![],
        }
    }

    /// User-facing directories likely to hold large files, scanned
    /// before the rest of a volume so relevant results surface early.
    pub fn common_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![
            self.home.join("Downloads"),
            self.home.join("Documents"),
            self.home.join("Desktop"),
            self.home.join("Pictures"),
            self.home.join(if self.platform == Platform::MacOs {
                "Movies"
            } else {
                "Videos"
            }),
            self.home.join("Music"),
        ];
        match self.platform {
            Platform::Windows => {
                dirs.push(self.home.join("AppData"));
                dirs.push(PathBuf::from("C:\\Program Files"));
                dirs.push(PathBuf::from("C:\\Program Files (x86)"));
            }
            Platform::MacOs => {
                dirs.push(PathBuf::from("/Applications"));
                dirs.push(self.home.join("Library"));
            }
            Platform::Linux => {}
        }
        dirs
    }

    /// Path fragments that must never be scanned, matched as
    /// case-insensitive substrings of the full path.
    pub fn system_exclude_paths(&self) -> Vec<String> {
        let paths: &[&str] = match self.platform {
            Platform::Windows => &[
                "Windows\\WinSxS",
                "Windows\\System32",
                "Windows\\SysWOW64",
                "$Recycle.Bin",
                "System Volume Information",
                "Recovery",
                "PerfLogs",
            ],
            Platform::MacOs => &[
                "/System",
                "/Library/System",
                "/private/var/vm",
                "/.Spotlight-V100",
                "/.fseventsd",
                "/.Trashes",
            ],
            Platform::Linux => &["/sys", "/proc", "/dev", "/run"],
        };
        paths.iter().map(|p| p.to_string()).collect()
    }

    /// Volume roots that may be offered for scanning. Non-existent
    /// entries are filtered by the caller.
    pub fn available_drives(&self) -> Vec<PathBuf> {
        match self.platform {
            Platform::Windows => ["C:\\", "D:\\", "E:\\", "F:\\", "G:\\", "H:\\"]
                .iter()
                .map(PathBuf::from)
                .collect(),
            _ => vec![PathBuf::from("/")],
        }
    }

    /// The volume scanned when none is specified.
    pub fn default_drive(&self) -> PathBuf {
        match self.platform {
            Platform::Windows => PathBuf::from("C:\\"),
            _ => PathBuf::from("/"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_tables() {
        let rules = PathRules::with_home(Platform::Linux, "/home/test");
        assert!(rules.temp_dirs().contains(&PathBuf::from("/tmp")));
        assert_eq!(rules.default_drive(), PathBuf::from("/"));
        assert_eq!(
            rules.dev_tool_cache_dirs("npm"),
            vec![PathBuf::from("/home/test/.npm")]
        );
        assert!(rules.system_update_dirs().is_empty());
    }

    #[test]
    fn test_windows_tables() {
        let rules = PathRules::with_home(Platform::Windows, "C:\\Users\\test");
        assert!(
            rules
                .browser_cache_dirs("chrome")
                .iter()
                .all(|p| p.starts_with("C:\\Users\\test"))
        );
        assert!(
            rules
                .system_exclude_paths()
                .contains(&"$Recycle.Bin".to_string())
        );
        assert_eq!(rules.default_drive(), PathBuf::from("C:\\"));
    }

    #[test]
    fn test_unknown_keys_are_empty() {
        let rules = PathRules::with_home(Platform::Linux, "/home/test");
        assert!(rules.browser_cache_dirs("netscape").is_empty());
        assert!(rules.dev_tool_cache_dirs("cobol").is_empty());
        assert!(rules.social_app_dirs("icq").is_empty());
    }
}
