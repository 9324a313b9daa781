use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::Parser;
use directories::ProjectDirs;
use log::LevelFilter;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use which::which;

pub use crate::{
    cli::{CliArgs, Command, DumpType},
    clip::{ClipEntry, ClipSpec},
    common::{EncodingArgs, LayoutArgs, ProgramPathConfig, ShortsArgs},
    file::FileConfiguration,
};

mod cli;
pub mod clip;
mod common;
mod file;

pub static APPLICATION_NAME: &str = "scene-batch";
pub static ORGANIZATION_NAME: &str = "allypost";
pub static ORGANIZATION_QUALIFIER: &str = "net";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub app: AppConfig,

    #[serde(skip)]
    pub run: RunConfig,

    pub layout: LayoutConfig,

    pub encoding: EncodingConfig,

    pub dependencies: DependencyConfig,

    pub shorts: ShortsConfig,
}

impl Config {
    /// Parses the process arguments and layers them over the config file(s).
    pub fn load() -> anyhow::Result<Self> {
        Self::from_args(&CliArgs::parse())
    }

    pub fn from_args(args: &CliArgs) -> anyhow::Result<Self> {
        let (file_config, file_path) = FileConfiguration::new(args.app.config_path.as_deref())?;

        let mut config = Self::from_sources(&file_config, args);
        if let Some(file_path) = file_path {
            config.app.config_path = file_path;
        }
        config.resolve()?;

        Ok(config)
    }

    /// Defaults, then the file, then the arguments. Nothing is resolved yet.
    #[must_use]
    pub fn from_sources(file_config: &FileConfiguration, args: &CliArgs) -> Self {
        let mut config = Self::default();

        config.merge_file_config(file_config);
        config.merge_args(args);

        config
    }

    #[must_use]
    pub fn get_config_dir() -> Option<PathBuf> {
        Self::get_project_dir().map(|x| x.config_dir().into())
    }

    fn get_project_dir() -> Option<ProjectDirs> {
        ProjectDirs::from(ORGANIZATION_QUALIFIER, ORGANIZATION_NAME, APPLICATION_NAME)
    }

    pub fn dump(&self, dump_type: DumpType) -> anyhow::Result<String> {
        match dump_type {
            DumpType::Toml => {
                toml::to_string_pretty(self).map_err(|e| anyhow!("Failed to dump config: {e}"))
            }

            DumpType::Json => serde_json::to_string_pretty(self)
                .map_err(|e| anyhow!("Failed to dump config: {e}")),
        }
    }

    fn merge_args(&mut self, args: &CliArgs) -> &Self {
        args.merge_into_config(self);

        self
    }

    fn merge_file_config(&mut self, file_config: &FileConfiguration) -> &Self {
        file_config.merge_into_config(self);

        self
    }

    /// Makes every path absolute and locates `ffmpeg'.
    ///
    /// A missing `ffmpeg' is only an error when something is going to run it.
    pub fn resolve(&mut self) -> anyhow::Result<&Self> {
        {
            let layout = &mut self.layout;
            layout.scene_dir = resolve(&layout.scene_dir)?;
            layout.thumb_dir = resolve(&layout.thumb_dir)?;
            layout.shorts_dir = resolve(&layout.shorts_dir)?;
            layout.output_path = resolve(&layout.output_path)?;
            layout.manifest_path = resolve(&layout.manifest_path)?;
            layout.cover_path = resolve(&layout.cover_path)?;

            let extension = layout.scene_extension.trim_start_matches('.');
            if extension.is_empty() {
                anyhow::bail!("Scene extension must not be empty");
            }
            layout.scene_extension = extension.to_string();
        }

        {
            let shorts = &mut self.shorts;
            shorts.source = match shorts.source.as_ref() {
                Some(source) => Some(resolve(source)?),
                None => Some(self.layout.output_path.clone()),
            };

            if let Some(subtitles) = shorts.subtitles.as_ref() {
                shorts.subtitles = Some(resolve(subtitles)?);
            }
        }

        if self.dependencies.ffmpeg_path.as_os_str().is_empty() {
            self.dependencies.ffmpeg_path = self.run.ffmpeg_or_fallback(which("ffmpeg"))?;
        }

        Ok(self)
    }
}

fn resolve(path: &Path) -> anyhow::Result<PathBuf> {
    path.try_resolve()
        .map(std::borrow::Cow::into_owned)
        .with_context(|| format!("Failed to resolve path {path:?}"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub config_path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    pub command: Command,
    pub dry_run: bool,
    pub dump_config: Option<DumpType>,
    /// `-1` for quiet, otherwise the number of `-v` flags.
    pub verbosity: i8,
}

impl RunConfig {
    /// Dry runs and config dumps never start `ffmpeg', so they get by without one.
    fn ffmpeg_or_fallback(&self, found: which::Result<PathBuf>) -> anyhow::Result<PathBuf> {
        match found {
            Ok(path) => Ok(path),
            Err(_) if self.dry_run || self.dump_config.is_some() => Ok(PathBuf::from("ffmpeg")),
            Err(e) => Err(anyhow!(
                "ffmpeg not found: {e}. Install it or pass --ffmpeg-path"
            )),
        }
    }

    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        match self.verbosity {
            i8::MIN..=-1 => LevelFilter::Warn,
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Where scenes are read from and every artifact is written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub scene_dir: PathBuf,
    pub thumb_dir: PathBuf,
    pub shorts_dir: PathBuf,
    pub output_path: PathBuf,
    pub manifest_path: PathBuf,
    pub cover_path: PathBuf,
    pub scene_extension: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scene_dir: "media/video/scenes".into(),
            thumb_dir: "media/video/thumbs".into(),
            shorts_dir: "media/video/shorts".into(),
            output_path: "media/output/final.mp4".into(),
            manifest_path: "scenes.txt".into(),
            cover_path: "media/thumbnails/cover.jpg".into(),
            scene_extension: "mp4".into(),
        }
    }
}

impl LayoutConfig {
    pub(crate) fn apply(&mut self, args: &LayoutArgs) -> &Self {
        if let Some(scene_dir) = &args.scene_dir {
            self.scene_dir.clone_from(scene_dir);
        }

        if let Some(thumb_dir) = &args.thumb_dir {
            self.thumb_dir.clone_from(thumb_dir);
        }

        if let Some(shorts_dir) = &args.shorts_dir {
            self.shorts_dir.clone_from(shorts_dir);
        }

        if let Some(output_path) = &args.output_path {
            self.output_path.clone_from(output_path);
        }

        if let Some(manifest_path) = &args.manifest_path {
            self.manifest_path.clone_from(manifest_path);
        }

        if let Some(cover_path) = &args.cover_path {
            self.cover_path.clone_from(cover_path);
        }

        if let Some(scene_extension) = &args.scene_extension {
            self.scene_extension.clone_from(scene_extension);
        }

        self
    }
}

/// Everything handed to ffmpeg that isn't a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Applied with `-vf` while concatenating.
    pub color_filter: String,
    /// `-preset` for the concatenated output.
    pub preset: String,
    /// `-crf` for the concatenated output.
    pub crf: u8,
    /// `-ss` for per-scene thumbnails.
    pub thumbnail_seek: String,
    /// `-ss` for the cover frame.
    pub cover_seek: String,
    /// Crop applied to shorts, before scaling to `short_width`x`short_height`.
    pub crop_filter: String,
    pub short_width: u32,
    pub short_height: u32,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            color_filter: "eq=brightness=0.08:contrast=1.05:saturation=1.1".into(),
            preset: "slow".into(),
            crf: 18,
            thumbnail_seek: "00:00:01".into(),
            cover_seek: "00:00:01".into(),
            crop_filter: "crop=ih*9/16:ih".into(),
            short_width: 1080,
            short_height: 1920,
        }
    }
}

impl EncodingConfig {
    /// The crop followed by the scale to the vertical resolution.
    #[must_use]
    pub fn short_filter(&self) -> String {
        format!(
            "{crop},scale={width}:{height}",
            crop = self.crop_filter,
            width = self.short_width,
            height = self.short_height
        )
    }

    pub(crate) fn apply(&mut self, args: &EncodingArgs) -> &Self {
        if let Some(color_filter) = &args.color_filter {
            self.color_filter.clone_from(color_filter);
        }

        if let Some(preset) = &args.preset {
            self.preset.clone_from(preset);
        }

        if let Some(crf) = args.crf {
            self.crf = crf;
        }

        if let Some(thumbnail_seek) = &args.thumbnail_seek {
            self.thumbnail_seek.clone_from(thumbnail_seek);
        }

        if let Some(cover_seek) = &args.cover_seek {
            self.cover_seek.clone_from(cover_seek);
        }

        if let Some(crop_filter) = &args.crop_filter {
            self.crop_filter.clone_from(crop_filter);
        }

        if let Some(short_width) = args.short_width {
            self.short_width = short_width;
        }

        if let Some(short_height) = args.short_height {
            self.short_height = short_height;
        }

        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortsConfig {
    /// Defaults to the assembled output once resolved.
    pub source: Option<PathBuf>,
    pub subtitles: Option<PathBuf>,
    pub clips: Vec<ClipSpec>,
}

impl Default for ShortsConfig {
    fn default() -> Self {
        Self {
            source: None,
            subtitles: None,
            clips: clip::resolve_clips(&clip::default_clips()),
        }
    }
}

impl ShortsConfig {
    pub(crate) fn apply(&mut self, args: &ShortsArgs) -> &Self {
        if let Some(source) = &args.source {
            self.source = Some(source.clone());
        }

        if let Some(subtitles) = &args.subtitles {
            self.subtitles = Some(subtitles.clone());
        }

        if !args.clips.is_empty() {
            self.clips = clip::resolve_clips(&args.clips);
        }

        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyConfig {
    /// Empty until resolved.
    pub ffmpeg_path: PathBuf,
}

impl DependencyConfig {
    pub(crate) fn apply(&mut self, args: &ProgramPathConfig) -> &Self {
        if let Some(ffmpeg_path) = &args.ffmpeg_path {
            self.ffmpeg_path.clone_from(ffmpeg_path);
        }

        self
    }
}
