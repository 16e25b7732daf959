use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use clap::ValueHint;

const AFTER_LONG_HELP: &str = "\
SCRIPT:
    One command per line on stdin. Blank lines and lines starting with # are skipped.

    activate <limit> <cand>...   open the window with candidates
    nr <count> <limit>           announce the candidate count
    page <n> <cand>...           send the candidates of page n
    show-page <n>                switch to page n
    select <i> <0|1>             highlight candidate i
    show | hide | deactivate     window visibility
    move <x> <y>                 move the window
    caret <timeout> <text>       show the caret state indicator
    caret-update | caret-hide    refresh or hide the indicator
    focus | blur                 focus or blur the console input context
    rescan                       look up the helper program again on next open
    status                       print the session state
    quit                         tear down and exit

ENVIRONMENT:
    UIM_CANDWIN_PROG             exact helper program path, wins over everything
    CANDWIN_LIBEXECDIR           directory for --candwin-prog base names
    CANDWIN_POLL_INTERVAL_MS     event loop poll timeout
    CANDWIN_LOG                  write logs to this file instead of stderr

EXAMPLES:
    printf 'activate 10 foo bar\\nselect 1 1\\n' | candwin-bridge --candwin-prog uim-candwin-gtk
    UIM_CANDWIN_PROG=/usr/libexec/uim-candwin-qt candwin-bridge --json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "candwin-bridge")]
#[command(author, version)]
#[command(about = "Drive an out-of-process candidate window from a line script")]
#[command(after_long_help = AFTER_LONG_HELP)]
pub struct Cli {
    /// Helper base name under the libexec directory
    #[arg(long, value_name = "NAME")]
    pub candwin_prog: Option<String>,

    /// Directory holding helper programs
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub libexec_dir: Option<PathBuf>,

    /// Helper used when neither the environment nor --candwin-prog names one
    #[arg(long, value_name = "PATH", value_hint = ValueHint::ExecutablePath)]
    pub default_prog: Option<PathBuf>,

    /// Event loop poll timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    #[arg(
        short,
        long,
        value_enum,
        value_name = "FORMAT",
        default_value_t = OutputFormat::Text
    )]
    pub format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long)]
    pub json: bool,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn effective_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_json_flag_wins() {
        let cli = Cli::parse_from(["candwin-bridge", "--json"]);
        assert_eq!(cli.effective_format(), OutputFormat::Json);

        let cli = Cli::parse_from(["candwin-bridge"]);
        assert_eq!(cli.effective_format(), OutputFormat::Text);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_program_options() {
        let cli = Cli::parse_from([
            "candwin-bridge",
            "--candwin-prog",
            "uim-candwin-gtk",
            "--libexec-dir",
            "/usr/lib/uim",
            "--poll-interval-ms",
            "20",
        ]);
        assert_eq!(cli.candwin_prog.as_deref(), Some("uim-candwin-gtk"));
        assert_eq!(cli.libexec_dir, Some(PathBuf::from("/usr/lib/uim")));
        assert_eq!(cli.poll_interval_ms, Some(20));
        assert_eq!(cli.default_prog, None);
    }
}
