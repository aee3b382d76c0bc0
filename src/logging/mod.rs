//! Structured logging helpers.

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level
/// and any component-specific log levels configured in the LoggingConfig.
///
/// # Examples
///
/// ```
/// use parka::config::LoggingConfig;
/// use parka::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let mut component_levels = HashMap::new();
/// component_levels.insert("manager".to_string(), "debug".to_string());
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: parka::config::LogFormat::Pretty,
///     component_levels: Some(component_levels),
/// };
///
/// let filter_str = build_filter_directives(&config);
/// assert_eq!(filter_str, "info,parka::manager=debug");
/// ```
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        for (component, level) in component_levels {
            filter_str.push_str(&format!(",parka::{}={}", component, level));
        }
    }

    filter_str
}
