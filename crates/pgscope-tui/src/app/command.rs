//! Command line grammar
//!
//! Commands are entered on a psql-style command line and start with a
//! backslash. Anything else, or a malformed sub-command, parses to
//! `Unknown` carrying a message for the operator.

/// A parsed command line entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedCommand {
    /// `\c [dbname]`; without a name, opens the database picker
    SwitchDatabase(Option<String>),
    /// `\config`
    OpenConfig,
    /// `\configk8s`
    OpenK8sConfig,
    /// `\k8s ...`
    K8s(K8sCommand),
    Unknown(String),
}

/// Sub-commands of `\k8s`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum K8sCommand {
    /// `\k8s ns` or `\k8s namespace`
    Namespaces,
    /// `\k8s secrets <namespace>`
    Secrets(String),
    /// `\k8s secret <namespace> <name>`
    Secret(String, String),
    /// `\k8s context`
    Context,
    /// Bare `\k8s` or an unrecognized sub-command
    Help,
}

pub fn parse_command(input: &str) -> ParsedCommand {
    let input = input.trim();
    let mut parts = input.split_whitespace();

    match parts.next() {
        Some("\\c") => {
            let database = parts.next().map(str::to_string);
            if parts.next().is_some() {
                return ParsedCommand::Unknown("usage: \\c [dbname]".to_string());
            }
            ParsedCommand::SwitchDatabase(database)
        }
        Some("\\config") => ParsedCommand::OpenConfig,
        Some("\\configk8s") => ParsedCommand::OpenK8sConfig,
        Some("\\k8s") => parse_k8s(&mut parts),
        _ => ParsedCommand::Unknown(format!("unknown command: {input}")),
    }
}

fn parse_k8s<'a>(parts: &mut impl Iterator<Item = &'a str>) -> ParsedCommand {
    let command = match parts.next() {
        Some("ns") | Some("namespace") => K8sCommand::Namespaces,
        Some("secrets") => match parts.next() {
            Some(namespace) => K8sCommand::Secrets(namespace.to_string()),
            None => {
                return ParsedCommand::Unknown("usage: \\k8s secrets <namespace>".to_string());
            }
        },
        Some("secret") => match (parts.next(), parts.next()) {
            (Some(namespace), Some(name)) => {
                K8sCommand::Secret(namespace.to_string(), name.to_string())
            }
            _ => {
                return ParsedCommand::Unknown(
                    "usage: \\k8s secret <namespace> <name>".to_string(),
                );
            }
        },
        Some("context") => K8sCommand::Context,
        _ => K8sCommand::Help,
    };
    ParsedCommand::K8s(command)
}

/// Usage lines shown for `\k8s` without a valid sub-command
pub fn k8s_usage() -> Vec<String> {
    vec![
        "\\k8s ns              list namespaces".to_string(),
        "\\k8s secrets <ns>    list secrets in a namespace".to_string(),
        "\\k8s secret <ns> <n> show one secret".to_string(),
        "\\k8s context         show the current context".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_database_with_and_without_name() {
        assert_eq!(
            parse_command("\\c orders"),
            ParsedCommand::SwitchDatabase(Some("orders".to_string()))
        );
        assert_eq!(parse_command("\\c"), ParsedCommand::SwitchDatabase(None));
        assert_eq!(parse_command("  \\c  orders  "), {
            ParsedCommand::SwitchDatabase(Some("orders".to_string()))
        });
    }

    #[test]
    fn switch_database_rejects_extra_arguments() {
        assert!(matches!(
            parse_command("\\c orders extra"),
            ParsedCommand::Unknown(_)
        ));
    }

    #[test]
    fn config_commands() {
        assert_eq!(parse_command("\\config"), ParsedCommand::OpenConfig);
        assert_eq!(parse_command("\\configk8s"), ParsedCommand::OpenK8sConfig);
    }

    #[test]
    fn k8s_subcommands() {
        assert_eq!(
            parse_command("\\k8s ns"),
            ParsedCommand::K8s(K8sCommand::Namespaces)
        );
        assert_eq!(
            parse_command("\\k8s namespace"),
            ParsedCommand::K8s(K8sCommand::Namespaces)
        );
        assert_eq!(
            parse_command("\\k8s secrets prod"),
            ParsedCommand::K8s(K8sCommand::Secrets("prod".to_string()))
        );
        assert_eq!(
            parse_command("\\k8s secret prod pg-creds"),
            ParsedCommand::K8s(K8sCommand::Secret("prod".to_string(), "pg-creds".to_string()))
        );
        assert_eq!(
            parse_command("\\k8s context"),
            ParsedCommand::K8s(K8sCommand::Context)
        );
    }

    #[test]
    fn bare_or_unrecognized_k8s_prints_help() {
        assert_eq!(parse_command("\\k8s"), ParsedCommand::K8s(K8sCommand::Help));
        assert_eq!(
            parse_command("\\k8s bogus"),
            ParsedCommand::K8s(K8sCommand::Help)
        );
    }

    #[test]
    fn k8s_secrets_requires_namespace() {
        assert!(matches!(
            parse_command("\\k8s secrets"),
            ParsedCommand::Unknown(_)
        ));
        assert!(matches!(
            parse_command("\\k8s secret prod"),
            ParsedCommand::Unknown(_)
        ));
    }

    #[test]
    fn anything_else_is_unknown() {
        assert!(matches!(parse_command("\\dt"), ParsedCommand::Unknown(_)));
        assert!(matches!(parse_command("select 1"), ParsedCommand::Unknown(_)));
        assert!(matches!(parse_command(""), ParsedCommand::Unknown(_)));
    }
}
