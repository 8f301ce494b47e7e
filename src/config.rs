use std::path::PathBuf;

use clap::Parser;

/// Server settings, read from flags with environment fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "To-do entries HTTP service")]
pub struct Config {
    /// Address to bind to
    #[arg(long, env = "TODO_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(
        short,
        long,
        env = "TODO_PORT",
        default_value_t = 5000,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub port: u16,

    /// SQLite database file, or `:memory:`
    #[arg(long, env = "TODO_DATABASE", default_value = "todo.sqlite3")]
    pub database: PathBuf,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, env = "TODO_LOG", default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use clap::{CommandFactory, FromArgMatches};

    use super::*;

    const ARG_ENV: [(&str, &str); 4] = [
        ("host", "TODO_HOST"),
        ("port", "TODO_PORT"),
        ("database", "TODO_DATABASE"),
        ("log_level", "TODO_LOG"),
    ];

    /// Parses `args` with every env fallback detached, so the tests do not
    /// depend on the variables of the process running them.
    fn parse_without_env(args: &[&str]) -> Result<Config, clap::Error> {
        let command = ARG_ENV
            .iter()
            .fold(Config::command(), |command, (id, _)| {
                command.mut_arg(*id, |arg| arg.env(None::<&'static str>))
            });
        Config::from_arg_matches(&command.try_get_matches_from(args)?)
    }

    #[test]
    fn defaults() {
        let config = parse_without_env(&["todo-entries-backend"]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.database, PathBuf::from("todo.sqlite3"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse_without_env(&[
            "todo-entries-backend",
            "--host",
            "127.0.0.1",
            "-p",
            "8080",
            "--database",
            ":memory:",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database, PathBuf::from(":memory:"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn rejects_port_zero() {
        assert!(parse_without_env(&["todo-entries-backend", "--port", "0"]).is_err());
    }

    #[test]
    fn every_setting_has_an_env_fallback() {
        let command = Config::command();
        for (id, name) in ARG_ENV {
            let arg = command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .unwrap();
            assert_eq!(arg.get_env(), Some(OsStr::new(name)), "{id}");
        }
    }

    #[test]
    fn env_values_fill_unset_flags() {
        // Variable names private to this test; the process env is shared.
        let command = Config::command()
            .mut_arg("port", |arg| arg.env("TODO_CONFIG_TEST_PORT"))
            .mut_arg("database", |arg| arg.env("TODO_CONFIG_TEST_DATABASE"));
        std::env::set_var("TODO_CONFIG_TEST_PORT", "8081");
        std::env::set_var("TODO_CONFIG_TEST_DATABASE", ":memory:");

        let matches = command
            .try_get_matches_from(["todo-entries-backend", "--port", "9090"])
            .unwrap();
        let config = Config::from_arg_matches(&matches).unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.database, PathBuf::from(":memory:"));
    }
}
