use crate::annotate::AppConfig;

pub const HELP_ALIASES: [&str; 4] = ["help", "--help", "-h", "h"];
pub const VERSION_ALIASES: [&str; 4] = ["version", "--version", "-v", "v"];
pub const COLOR_ALIASES: [&str; 4] = ["color", "--color", "-c", "c"];

/// A command word recognised on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    Color,
}

impl Command {
    /// Match `arg` exactly (case-sensitive) against the alias lists.
    pub fn parse(arg: &str) -> Option<Command> {
        if HELP_ALIASES.contains(&arg) {
            Some(Command::Help)
        } else if VERSION_ALIASES.contains(&arg) {
            Some(Command::Version)
        } else if COLOR_ALIASES.contains(&arg) {
            Some(Command::Color)
        } else {
            None
        }
    }
}

/// What the process does, decided once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Print usage and exit successfully.
    Help,
    /// Print version and database metadata.
    Version,
    /// Annotate each argument and print one result per line.
    Args { config: AppConfig, items: Vec<String> },
    /// Annotate standard input line by line.
    Stdin { config: AppConfig },
}

impl Mode {
    /// Choose the run mode from the positional arguments.
    ///
    /// Only the first argument selects a command. Alias words anywhere in
    /// the list are never annotated.
    pub fn select(args: Vec<String>, stdin_is_terminal: bool) -> Mode {
        let Some(first) = args.first() else {
            return if stdin_is_terminal {
                Mode::Help
            } else {
                Mode::Stdin {
                    config: AppConfig::default(),
                }
            };
        };

        let config = match Command::parse(first) {
            Some(Command::Help) => return Mode::Help,
            Some(Command::Version) => return Mode::Version,
            Some(Command::Color) => AppConfig { color: true },
            None => AppConfig::default(),
        };

        let items = args
            .into_iter()
            .filter(|arg| Command::parse(arg).is_none())
            .collect();
        Mode::Args { config, items }
    }
}

/// Usage text for `program`.
pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <command> [options]\n\
         \n\
         Options:\n\
         \x20 -v, --version\n\
         \x20 -h, --help\n\
         \x20 -c, --color\n\
         \x20 --db <FILE>[,<FILE>...]   database search path [env: NALI_DB]\n\
         \x20 --encoding <LABEL>        stdin encoding [env: NALI_ENCODING] [default: gbk]\n\
         \x20 --                        ends options; never echoed\n\
         \n\
         Commands:\n\
         \x20 IP Address\n"
    )
}
