//! Compile-time build metadata

use serde::Serialize;

/// Incremented by `build.rs` on every rebuild of `src/`
pub const BUILD_NUMBER: u64 = match option_env!("GS_BUILD_NUMBER") {
    Some(s) => parse_build_number(s),
    None => 0,
};

/// UTC, `YYYY-MM-DDTHH:MM:SSZ`
pub const BUILD_TIMESTAMP: &str = match option_env!("GS_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Decimal digits only; anything else yields 0
const fn parse_build_number(s: &str) -> u64 {
    let bytes = s.as_bytes();
    let mut value: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return 0;
        }
        value = value * 10 + (b - b'0') as u64;
        i += 1;
    }
    value
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub description: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
            description: DESCRIPTION,
        }
    }

    /// `"<version> (build <n>)"`
    pub fn version_string(&self) -> String {
        format!("{} (build {})", self.version, self.build_number)
    }
}

/// Startup banner, on stderr so stdout stays clean for MCP
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("===============================================");
    eprintln!("  GS Coach - nutrition and training planner");
    eprintln!("  Version: {}", info.version_string());
    eprintln!("  Compiled: {}", info.build_timestamp);
    eprintln!("===============================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_number() {
        assert_eq!(parse_build_number("42"), 42);
        assert_eq!(parse_build_number(""), 0);
        assert_eq!(parse_build_number("4x2"), 0);
    }

    #[test]
    fn test_version_string() {
        let info = BuildInfo {
            build_number: 7,
            ..BuildInfo::current()
        };
        assert_eq!(info.version_string(), format!("{} (build 7)", VERSION));
    }
}
