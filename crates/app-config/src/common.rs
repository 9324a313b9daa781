use std::path::PathBuf;

use clap::{Args, ValueHint};
use serde::{Deserialize, Serialize};

use crate::clip::ClipEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args)]
pub struct LayoutArgs {
    #[arg(long, default_value = None, env = "SCENE_BATCH_SCENE_DIR", value_hint = ValueHint::DirPath)]
    /// Directory holding the per-scene clips.
    ///
    /// If not provided, `media/video/scenes' will be used
    pub scene_dir: Option<PathBuf>,

    #[arg(long, default_value = None, env = "SCENE_BATCH_THUMB_DIR", value_hint = ValueHint::DirPath)]
    /// Directory the per-scene thumbnails are written to.
    ///
    /// Created if missing. Defaults to `media/video/thumbs'
    pub thumb_dir: Option<PathBuf>,

    #[arg(long, default_value = None, env = "SCENE_BATCH_SHORTS_DIR", value_hint = ValueHint::DirPath)]
    /// Directory the vertical shorts are written to.
    ///
    /// Created if missing. Defaults to `media/video/shorts'
    pub shorts_dir: Option<PathBuf>,

    #[arg(long, default_value = None, env = "SCENE_BATCH_OUTPUT", value_hint = ValueHint::FilePath)]
    /// Where the assembled video is written.
    ///
    /// Overwritten on every run. Defaults to `media/output/final.mp4'
    pub output_path: Option<PathBuf>,

    #[arg(long, default_value = None, env = "SCENE_BATCH_MANIFEST", value_hint = ValueHint::FilePath)]
    /// Concat list handed to ffmpeg.
    ///
    /// Regenerated on every run and left on disk afterwards. Defaults to `scenes.txt'
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value = None, env = "SCENE_BATCH_COVER", value_hint = ValueHint::FilePath)]
    /// Where the cover frame of the assembled video is written.
    ///
    /// Defaults to `media/thumbnails/cover.jpg'
    pub cover_path: Option<PathBuf>,

    #[arg(long, default_value = None, env = "SCENE_BATCH_SCENE_EXTENSION", value_name = "EXT")]
    /// Extension (without the dot) a file needs to count as a scene.
    ///
    /// Defaults to `mp4'
    pub scene_extension: Option<String>,
}
impl LayoutArgs {
    pub(crate) fn merge(&mut self, config: &Self) -> &Self {
        if let Some(scene_dir) = config.scene_dir.as_ref() {
            self.scene_dir = Some(scene_dir.clone());
        }

        if let Some(thumb_dir) = config.thumb_dir.as_ref() {
            self.thumb_dir = Some(thumb_dir.clone());
        }

        if let Some(shorts_dir) = config.shorts_dir.as_ref() {
            self.shorts_dir = Some(shorts_dir.clone());
        }

        if let Some(output_path) = config.output_path.as_ref() {
            self.output_path = Some(output_path.clone());
        }

        if let Some(manifest_path) = config.manifest_path.as_ref() {
            self.manifest_path = Some(manifest_path.clone());
        }

        if let Some(cover_path) = config.cover_path.as_ref() {
            self.cover_path = Some(cover_path.clone());
        }

        if let Some(scene_extension) = config.scene_extension.as_ref() {
            self.scene_extension = Some(scene_extension.clone());
        }

        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args)]
pub struct EncodingArgs {
    #[arg(long, default_value = None, env = "SCENE_BATCH_COLOR_FILTER", value_name = "FILTER")]
    /// Filter chain applied while concatenating the scenes.
    ///
    /// Passed to ffmpeg as-is via `-vf'
    pub color_filter: Option<String>,

    #[arg(long, default_value = None, env = "SCENE_BATCH_PRESET")]
    /// Encoder preset used for the assembled video.
    pub preset: Option<String>,

    #[arg(long, default_value = None, env = "SCENE_BATCH_CRF", value_parser = clap::value_parser!(u8).range(0..=51))]
    /// Constant rate factor used for the assembled video.
    ///
    /// Lower is better quality and bigger files
    pub crf: Option<u8>,

    #[arg(long, default_value = None, env = "SCENE_BATCH_THUMBNAIL_SEEK", value_name = "TIMECODE")]
    /// Offset into each scene the thumbnail frame is taken at.
    pub thumbnail_seek: Option<String>,

    #[arg(long, default_value = None, env = "SCENE_BATCH_COVER_SEEK", value_name = "TIMECODE")]
    /// Offset into the assembled video the cover frame is taken at.
    pub cover_seek: Option<String>,

    #[arg(long, default_value = None, env = "SCENE_BATCH_CROP_FILTER", value_name = "FILTER")]
    /// Crop applied to shorts before scaling.
    pub crop_filter: Option<String>,

    #[arg(long, default_value = None, env = "SCENE_BATCH_SHORT_WIDTH")]
    pub short_width: Option<u32>,

    #[arg(long, default_value = None, env = "SCENE_BATCH_SHORT_HEIGHT")]
    pub short_height: Option<u32>,
}
impl EncodingArgs {
    pub(crate) fn merge(&mut self, config: &Self) -> &Self {
        if let Some(color_filter) = config.color_filter.as_ref() {
            self.color_filter = Some(color_filter.clone());
        }

        if let Some(preset) = config.preset.as_ref() {
            self.preset = Some(preset.clone());
        }

        if let Some(crf) = config.crf {
            self.crf = Some(crf);
        }

        if let Some(thumbnail_seek) = config.thumbnail_seek.as_ref() {
            self.thumbnail_seek = Some(thumbnail_seek.clone());
        }

        if let Some(cover_seek) = config.cover_seek.as_ref() {
            self.cover_seek = Some(cover_seek.clone());
        }

        if let Some(crop_filter) = config.crop_filter.as_ref() {
            self.crop_filter = Some(crop_filter.clone());
        }

        if let Some(short_width) = config.short_width {
            self.short_width = Some(short_width);
        }

        if let Some(short_height) = config.short_height {
            self.short_height = Some(short_height);
        }

        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args)]
pub struct ShortsArgs {
    #[arg(long = "short-source", default_value = None, env = "SCENE_BATCH_SHORT_SOURCE", value_hint = ValueHint::FilePath, global = true)]
    /// Video the shorts are cut from.
    ///
    /// If not provided, the assembled output is used
    pub source: Option<PathBuf>,

    #[arg(long, default_value = None, env = "SCENE_BATCH_SUBTITLES", value_hint = ValueHint::FilePath, global = true)]
    /// Subtitle file burned into every short.
    ///
    /// Skipped with a warning if the file does not exist
    pub subtitles: Option<PathBuf>,

    #[arg(long = "clip", value_name = "START+DURATION[@INDEX]", global = true)]
    /// A short to cut. Can be given multiple times.
    ///
    /// Replaces the clips from the config file when given.
    /// Without an `@INDEX' the clip is numbered by its position
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clips: Vec<ClipEntry>,
}
impl ShortsArgs {
    pub(crate) fn merge(&mut self, config: &Self) -> &Self {
        if let Some(source) = config.source.as_ref() {
            self.source = Some(source.clone());
        }

        if let Some(subtitles) = config.subtitles.as_ref() {
            self.subtitles = Some(subtitles.clone());
        }

        if !config.clips.is_empty() {
            self.clips.clone_from(&config.clips);
        }

        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args)]
pub struct ProgramPathConfig {
    #[arg(long, default_value = None, env = "SCENE_BATCH_FFMPEG", value_hint = ValueHint::FilePath)]
    /// Path to the ffmpeg executable.
    ///
    /// If not provided, ffmpeg will be searched for in $PATH
    pub ffmpeg_path: Option<PathBuf>,
}
impl ProgramPathConfig {
    pub(crate) fn merge(&mut self, config: &Self) -> &Self {
        if let Some(ffmpeg_path) = config.ffmpeg_path.as_ref() {
            self.ffmpeg_path = Some(ffmpeg_path.clone());
        }

        self
    }
}
