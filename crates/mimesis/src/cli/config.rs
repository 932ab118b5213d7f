//! `mimesis config`.

use super::commands::ConfigArgs;
use super::load_config;
use mimesis::{ConfigError, ConfigErrorKind, MimesisConfig, MimesisResult};

/// Print the layered configuration that `mimesis tick` would use.
pub fn show_config(args: ConfigArgs) -> MimesisResult<()> {
    let config = load_config(args.config.as_deref())?;
    print!("{}", render(&config)?);
    Ok(())
}

fn render(config: &MimesisConfig) -> MimesisResult<String> {
    toml::to_string_pretty(config)
        .map_err(|e| ConfigError::new(ConfigErrorKind::Render(e.to_string())).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bundled_defaults() {
        let config =
            MimesisConfig::from_toml_str(include_str!("../../../../mimesis.toml")).unwrap();

        let text = render(&config).unwrap();

        assert!(text.contains("[provider]"));
        assert!(text.contains("model = \"gpt-5-mini\""));
        assert!(text.contains("[[phases]]"));
        assert!(text.contains("name = \"chronicle\""));
    }
}
