use std::process::exit;

use app_config::{Command, Config, APPLICATION_NAME};
use app_logger::{error, info, trace, warn, LevelFilter, LoggerConfig};
use app_media::{BatchReport, DryRun, Ffmpeg, Orchestrator, Transcoder};

fn main() {
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {e:?}");
        exit(1);
    });

    if let Some(dump_type) = config.run.dump_config {
        match config.dump(dump_type) {
            Ok(dumped) => println!("{dumped}"),
            Err(e) => {
                eprintln!("{e:?}");
                exit(1);
            }
        }
        return;
    }

    if let Err(e) = app_logger::init(
        LoggerConfig::builder()
            .program_name(APPLICATION_NAME)
            .name_suffix(config.run.command.name())
            .console_log_level(config.run.log_level())
            .file_log_level(config.run.log_level().max(LevelFilter::Debug))
            .build(),
    ) {
        eprintln!("Failed to initialize logger: {e:?}");
        exit(1);
    }

    trace!("Config: {config:?}");

    if let Err(e) = run(&config) {
        error!("{}", describe(&e));
        exit(1);
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let ffmpeg_path = config.dependencies.ffmpeg_path.clone();
    let transcoder: Box<dyn Transcoder> = if config.run.dry_run {
        info!("Dry run, nothing will be encoded");
        Box::new(DryRun::new(ffmpeg_path))
    } else {
        Box::new(Ffmpeg::new(ffmpeg_path))
    };

    let orchestrator = Orchestrator::new(
        config.layout.clone(),
        config.encoding.clone(),
        transcoder,
    )
    .with_subtitles(config.shorts.subtitles.clone());

    let short_source = config
        .shorts
        .source
        .as_deref()
        .unwrap_or(&config.layout.output_path);

    info!("Running `{command}'", command = config.run.command);

    match config.run.command {
        Command::Assemble => {
            let scenes = orchestrator.discover_scenes()?;
            orchestrator.assemble(&scenes)?;
        }

        Command::Thumbnails => {
            let scenes = orchestrator.discover_scenes()?;
            summarize(&orchestrator.generate_thumbnails(&scenes)?);
        }

        Command::Shorts => {
            summarize(&orchestrator.generate_clips(short_source, &config.shorts.clips)?);
        }

        Command::Cover => {
            summarize(&orchestrator.generate_cover(&config.layout.output_path)?);
        }

        Command::All => {
            for report in orchestrator.run_all(&config.shorts.clips)? {
                summarize(&report);
            }
        }
    }

    Ok(())
}

fn summarize(report: &BatchReport) {
    if report.is_clean() {
        info!("{report}");
        return;
    }

    warn!("{report}");
    for failure in report.failures() {
        if let Err(e) = &failure.result {
            if let Some(stderr) = e.stderr() {
                warn!(
                    "{job} {label}: {stderr}",
                    job = report.job(),
                    label = failure.label
                );
            }
        }
    }
}

/// The error and every cause under it, outermost first.
fn describe(e: &anyhow::Error) -> String {
    format!("{e:#}")
}

#[cfg(test)]
mod tests {
    use std::{io, path::PathBuf};

    use app_media::{BatchError, JobKind, ToolError};

    use super::*;

    #[test]
    fn fatal_errors_are_described_with_their_cause() {
        let err = anyhow::Error::from(BatchError::Io {
            context: "Failed to create shorts directory \"media/video/shorts\"".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        });

        assert_eq!(
            describe(&err),
            "Failed to create shorts directory \"media/video/shorts\": Permission denied"
        );
    }

    #[test]
    fn tool_errors_are_described_once() {
        let err = anyhow::Error::from(BatchError::from(ToolError::Launch {
            job: JobKind::Concat,
            program: PathBuf::from("ffmpeg"),
            error: io::Error::new(io::ErrorKind::NotFound, "not found"),
        }));

        assert_eq!(
            describe(&err),
            "concat failed: could not run \"ffmpeg\": not found"
        );
    }
}
