use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "DAYLIO_BRIDGE_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

fn build_filter(raw: Option<&str>, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(directive) => {
            EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
        }
        None => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}

/// Install the stderr subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let raw = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(raw.as_deref(), verbose);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::build_filter;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn verbose_overrides_env_directive() {
        let filter = build_filter(Some("error"), true);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn blank_directive_falls_back_to_warn() {
        assert_eq!(
            build_filter(Some("   "), false).max_level_hint(),
            Some(LevelFilter::WARN)
        );
        assert_eq!(build_filter(None, false).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn custom_directive_is_kept() {
        assert_eq!(
            build_filter(Some("info"), false).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }
}
