use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub use log::{debug, error, info, trace, warn, LevelFilter};
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};
use sanitize_filename::{sanitize_with_options, Options};

const CONSOLE_PATTERN: &str = "{h({l:<5})} {m}{n}";
const FILE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l:<5} [{M}] {m}{n}";

const FILE_APPENDER: &str = "run-log";
const CONSOLE_APPENDER: &str = "stderr";

#[derive(Debug, Clone, Copy)]
pub struct LoggerConfig<'a> {
    program_name: &'a str,
    run_name: Option<&'a str>,
    file_level: LevelFilter,
    console_level: LevelFilter,
}

impl Default for LoggerConfig<'_> {
    fn default() -> Self {
        Self {
            program_name: env!("CARGO_PKG_NAME"),
            run_name: None,
            file_level: LevelFilter::Debug,
            console_level: LevelFilter::Info,
        }
    }
}

impl<'a> LoggerConfig<'a> {
    #[must_use]
    pub fn builder() -> LoggerConfigBuilder<'a> {
        LoggerConfigBuilder::default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggerConfigBuilder<'a> {
    config: LoggerConfig<'a>,
}

impl<'a> LoggerConfigBuilder<'a> {
    #[must_use]
    pub const fn program_name(mut self, program_name: &'a str) -> Self {
        self.config.program_name = program_name;
        self
    }

    /// Appended to the log file name, so each kind of run keeps its own log.
    #[must_use]
    pub const fn name_suffix(mut self, run_name: &'a str) -> Self {
        self.config.run_name = Some(run_name);
        self
    }

    #[must_use]
    pub const fn file_log_level(mut self, level: LevelFilter) -> Self {
        self.config.file_level = level;
        self
    }

    #[must_use]
    pub const fn console_log_level(mut self, level: LevelFilter) -> Self {
        self.config.console_level = level;
        self
    }

    #[must_use]
    pub const fn build(self) -> LoggerConfig<'a> {
        self.config
    }
}

/// Sends everything to a file in the temp dir and, above the console level, to stderr.
///
/// Stdout is left to the job summaries and `--dump-config`.
pub fn init(cfg: LoggerConfig) -> anyhow::Result<log4rs::Handle> {
    let log_file = log_file_path(&cfg);

    let config = Config::builder()
        .appender(file_appender(&cfg, &log_file)?)
        .appender(console_appender(&cfg))
        .build(
            Root::builder()
                .appenders([FILE_APPENDER, CONSOLE_APPENDER])
                .build(LevelFilter::Trace),
        )?;

    let handle = log4rs::init_config(config)?;

    debug!("Logging to {log_file:?}");

    Ok(handle)
}

fn file_appender(cfg: &LoggerConfig, log_file: &Path) -> anyhow::Result<Appender> {
    if let Some(dir) = log_file.parent() {
        fs::create_dir_all(dir)?;
    }

    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
        .append(false)
        .build(log_file)?;

    Ok(Appender::builder()
        .filter(Box::new(ThresholdFilter::new(cfg.file_level)))
        .build(FILE_APPENDER, Box::new(file)))
}

fn console_appender(cfg: &LoggerConfig) -> Appender {
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();

    Appender::builder()
        .filter(Box::new(ThresholdFilter::new(cfg.console_level)))
        .build(CONSOLE_APPENDER, Box::new(console))
}

/// `<temp dir>/<program>[_<run>].log`, made safe to use as a file name.
fn log_file_path(cfg: &LoggerConfig) -> PathBuf {
    let stem = std::iter::once(cfg.program_name)
        .chain(cfg.run_name)
        .collect::<Vec<_>>()
        .join("_");

    let file_name = sanitize_with_options(
        format!("{stem}.log"),
        Options {
            truncate: true,
            replacement: "^",
            ..Options::default()
        },
    );

    env::temp_dir().join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_named_after_program_and_run() {
        let cfg = LoggerConfig::builder()
            .program_name("scene-batch")
            .name_suffix("thumbnails")
            .build();

        assert_eq!(
            log_file_path(&cfg),
            env::temp_dir().join("scene-batch_thumbnails.log")
        );
    }

    #[test]
    fn log_file_without_run_name() {
        let cfg = LoggerConfig::builder().program_name("scene-batch").build();

        assert_eq!(log_file_path(&cfg), env::temp_dir().join("scene-batch.log"));
    }

    #[test]
    fn log_file_name_is_sanitized() {
        let cfg = LoggerConfig::builder()
            .program_name("scene-batch")
            .name_suffix("a/b:c")
            .build();

        let path = log_file_path(&cfg);
        let file_name = path.file_name().unwrap().to_string_lossy().into_owned();

        assert!(!file_name.contains('/'));
        assert!(file_name.starts_with("scene-batch_a^b"));
        assert_eq!(path.parent(), Some(env::temp_dir().as_path()));
    }

    #[test]
    fn levels_default_to_debug_file_and_info_console() {
        let cfg = LoggerConfig::builder().build();

        assert_eq!(cfg.file_level, LevelFilter::Debug);
        assert_eq!(cfg.console_level, LevelFilter::Info);
    }
}
