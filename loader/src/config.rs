use std::{env, fmt};

pub const PASSWORD_VAR: &str = "JWKGEN_PASSWORD";
pub const OUTPUT_FORMAT_VAR: &str = "JWKGEN_OUTPUT_FORMAT";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

#[derive(Clone, Default)]
pub struct GeneratorConfig {
    password: Option<String>,
    output_format: OutputFormat,
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("output_format", &self.output_format)
            .finish()
    }
}

impl GeneratorConfig {
    pub fn new() -> GeneratorConfig {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> GeneratorConfig {
        let password = lookup(PASSWORD_VAR).filter(|password| !password.is_empty());
        let output_format = match lookup(OUTPUT_FORMAT_VAR).as_deref() {
            None | Some("") | Some("pretty") => OutputFormat::Pretty,
            Some("compact") => OutputFormat::Compact,
            Some(other) => {
                log::warn!("unknown {OUTPUT_FORMAT_VAR}={other}, falling back to pretty");
                OutputFormat::Pretty
            }
        };

        GeneratorConfig {
            password,
            output_format,
        }
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }
}

pub fn generator_config() -> GeneratorConfig {
    GeneratorConfig::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> GeneratorConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GeneratorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config(&[]);
        assert_eq!(config.password(), None);
        assert_eq!(config.output_format(), OutputFormat::Pretty);
    }

    #[test]
    fn reads_password_and_format() {
        let config = config(&[(PASSWORD_VAR, "secret"), (OUTPUT_FORMAT_VAR, "compact")]);
        assert_eq!(config.password(), Some("secret"));
        assert_eq!(config.output_format(), OutputFormat::Compact);
    }

    #[test]
    fn empty_password_counts_as_unset() {
        assert_eq!(config(&[(PASSWORD_VAR, "")]).password(), None);
    }

    #[test]
    fn unknown_format_falls_back_to_pretty() {
        let config = config(&[(OUTPUT_FORMAT_VAR, "yaml")]);
        assert_eq!(config.output_format(), OutputFormat::Pretty);
    }

    #[test]
    fn debug_output_hides_password() {
        let config = config(&[(PASSWORD_VAR, "secret")]);
        assert!(!format!("{config:?}").contains("secret"));
    }
}
