use std::{fmt::Display, path::PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use serde::{Deserialize, Serialize};

use crate::{
    common::{EncodingArgs, LayoutArgs, ProgramPathConfig, ShortsArgs},
    Config,
};

#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    /// Which job to run. Runs the whole pipeline if omitted.
    pub command: Option<Command>,

    #[command(flatten)]
    pub app: AppArgs,

    #[command(flatten, next_help_heading = Some("Layout"))]
    pub layout: LayoutArgs,

    #[command(flatten, next_help_heading = Some("Encoding"))]
    pub encoding: EncodingArgs,

    #[command(flatten, next_help_heading = Some("Shorts"))]
    pub shorts: ShortsArgs,

    #[command(flatten, next_help_heading = Some("Program paths"))]
    pub paths: ProgramPathConfig,
}

impl CliArgs {
    pub(crate) fn merge_into_config(&self, config: &mut Config) {
        if let Some(scene_dir) = &self.layout.scene_dir {
            eprintln!("Found scene directory from arguments: {:?}", scene_dir.display());
        }

        if let Some(ffmpeg_path) = &self.paths.ffmpeg_path {
            eprintln!("Found ffmpeg path from arguments: {:?}", ffmpeg_path.display());
        }

        config.layout.apply(&self.layout);
        config.encoding.apply(&self.encoding);
        config.shorts.apply(&self.shorts);
        config.dependencies.apply(&self.paths);

        if let Some(config_path) = &self.app.config_path {
            config.app.config_path.clone_from(config_path);
        }

        config.run.command = self.command.clone().unwrap_or_default();
        config.run.dry_run = self.app.dry_run;
        config.run.dump_config = self
            .app
            .dump_config
            .clone()
            .map(|dump_type| dump_type.unwrap_or(DumpType::Toml));
        config.run.verbosity = if self.app.quiet {
            -1
        } else {
            i8::try_from(self.app.verbose).unwrap_or(i8::MAX)
        };
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// Concatenate every scene into the output video.
    Assemble,
    /// Extract one thumbnail per scene.
    Thumbnails,
    /// Cut vertical shorts out of the assembled video.
    Shorts,
    /// Extract a cover frame from the assembled video.
    Cover,
    /// Assemble, then thumbnails, shorts and the cover frame.
    #[default]
    All,
}

impl Command {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Assemble => "assemble",
            Self::Thumbnails => "thumbnails",
            Self::Shorts => "shorts",
            Self::Cover => "cover",
            Self::All => "all",
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum DumpType {
    Toml,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct AppArgs {
    #[arg(short='c', long, default_value = None, env = "SCENE_BATCH_CONFIG", value_hint = ValueHint::FilePath, global = true)]
    /// Location of the configuration file.
    ///
    /// By default it lives in the os-appropriate config directory
    /// under the name `scene-batch/config.toml`
    pub config_path: Option<PathBuf>,

    #[arg(long, ignore_case = true, value_name = "FORMAT", global = true)]
    /// Dump the configuration to stdout and exit.
    ///
    /// Useful for debugging.
    /// When dumped with the `toml` format, can be used as a config file.
    #[allow(clippy::option_option)]
    pub dump_config: Option<Option<DumpType>>,

    #[arg(long, global = true)]
    /// Log the ffmpeg commands instead of running them.
    ///
    /// Directories and the concat list are still written.
    pub dry_run: bool,

    #[arg(short, long, action = ArgAction::Count, global = true)]
    /// More output. Can be repeated.
    pub verbose: u8,

    #[arg(short, long, global = true, conflicts_with = "verbose")]
    /// Only print warnings and errors.
    pub quiet: bool,
}
