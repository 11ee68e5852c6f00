//! Version information

/// The version of the crate, set at build time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the package
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// The description of the package
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get build information string
pub fn build_info() -> String {
    format!(
        "{} v{}\n{}\nBuilt with Rust {}",
        APP_NAME,
        VERSION,
        APP_DESCRIPTION,
        rustc_version()
    )
}

/// Get the Rust compiler version used to build this binary
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "dialog-registry");
    }

    #[test]
    fn test_version_functions() {
        let info = build_info();
        assert!(info.contains(APP_NAME));
        assert!(info.contains(VERSION));
        assert!(info.contains(APP_DESCRIPTION));
        assert!(info.contains("Rust"));
    }
}
