use std::fmt;

/// Operating system the installer runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    Darwin,
    /// Any other system, carrying the raw OS name
    Other(String),
}

impl Platform {
    /// Detect the current platform
    pub fn detect() -> Self {
        Self::from_os_name(Self::detect_os())
    }

    fn detect_os() -> &'static str {
        #[cfg(target_os = "macos")]
        {
            "macos"
        }
        #[cfg(target_os = "linux")]
        {
            "linux"
        }
        #[cfg(target_os = "windows")]
        {
            "windows"
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            std::env::consts::OS
        }
    }

    /// Map a system name to a platform. Unknown names are kept verbatim.
    pub fn from_os_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            "darwin" | "macos" => Platform::Darwin,
            _ => Platform::Other(name.to_string()),
        }
    }

    /// Lowercase token embedded in asset filenames (e.g. `fig-1.0.0-linux.zip`)
    pub fn token(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Darwin => "darwin",
            Platform::Other(_) => "other",
        }
    }

    /// Whether release archives can be installed here.
    /// Darwin has no published build yet and is rejected like unknown systems.
    pub fn is_supported(&self) -> bool {
        matches!(self, Platform::Windows | Platform::Linux)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "Windows"),
            Platform::Linux => write!(f, "Linux"),
            Platform::Darwin => write!(f, "Darwin"),
            Platform::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Trait for platform detection (useful for testing)
#[cfg_attr(test, mockall::automock)]
pub trait PlatformDetector: Send + Sync {
    fn detect(&self) -> Platform;
}

/// Default platform detector using compile-time detection
pub struct DefaultPlatformDetector;

impl PlatformDetector for DefaultPlatformDetector {
    fn detect(&self) -> Platform {
        Platform::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_detect() {
        let platform = DefaultPlatformDetector.detect();

        #[cfg(target_os = "linux")]
        assert_eq!(platform, Platform::Linux);

        #[cfg(target_os = "windows")]
        assert_eq!(platform, Platform::Windows);

        #[cfg(target_os = "macos")]
        assert_eq!(platform, Platform::Darwin);

        assert!(!platform.token().is_empty());
    }

    #[test]
    fn test_from_os_name_known_systems() {
        assert_eq!(Platform::from_os_name("Windows"), Platform::Windows);
        assert_eq!(Platform::from_os_name("Linux"), Platform::Linux);
        assert_eq!(Platform::from_os_name("Darwin"), Platform::Darwin);
        assert_eq!(Platform::from_os_name("macos"), Platform::Darwin);
    }

    #[test]
    fn test_from_os_name_keeps_unknown_name() {
        let platform = Platform::from_os_name("FreeBSD");
        assert_eq!(platform, Platform::Other("FreeBSD".into()));
        assert_eq!(platform.to_string(), "FreeBSD");
        assert_eq!(platform.token(), "other");
    }

    #[test]
    fn test_tokens_and_display() {
        assert_eq!(Platform::Windows.token(), "windows");
        assert_eq!(Platform::Linux.token(), "linux");
        assert_eq!(Platform::Darwin.token(), "darwin");
        assert_eq!(Platform::Windows.to_string(), "Windows");
        assert_eq!(Platform::Darwin.to_string(), "Darwin");
    }

    #[test]
    fn test_only_windows_and_linux_are_supported() {
        assert!(Platform::Windows.is_supported());
        assert!(Platform::Linux.is_supported());
        assert!(!Platform::Darwin.is_supported());
        assert!(!Platform::Other("sunos".into()).is_supported());
    }
}
