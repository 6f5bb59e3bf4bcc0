use colored::Colorize;
use env_logger::Builder;
use log::Level;
use std::io::Write;

/// Colors for summary output.
pub struct Colors;

impl Colors {
    pub const PROCESSED: &'static str = "green";
    pub const FAILED: &'static str = "red";
    pub const SKIPPED: &'static str = "yellow";

    pub fn colorize(color: &str, text: &str) -> String {
        text.color(color).to_string()
    }
}

/// Initialise env_logger: dependencies at warn, this crate at info (debug when verbose).
/// Worker threads are tagged with their thread name so interleaved lines stay attributable.
pub fn setup_logging(verbose: bool) {
    use log::LevelFilter;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let thread = std::thread::current();
            let thread_tag = match thread.name() {
                Some(t) if t != "main" => format!(" {}", t.dimmed()),
                _ => String::new(),
            };
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        Level::Error => "ERROR".red(),
                        _ => unreachable!(),
                    };
                    let path = record.target().to_string().white();
                    format!(
                        "[{}{} {} {}] {}",
                        name.cyan(),
                        thread_tag,
                        level_str,
                        path,
                        record.args()
                    )
                }
                _ => format!("[{}{}] {}", name.cyan(), thread_tag, record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
