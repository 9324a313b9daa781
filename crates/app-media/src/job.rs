use std::{
    ffi::OsString,
    fmt::Display,
    path::{Path, PathBuf},
};

use app_config::ClipSpec;

use crate::scene::MediaItem;

/// Prepended to every invocation: overwrite outputs and keep stderr down to actual errors.
const COMMON_ARGS: [&str; 4] = ["-y", "-hide_banner", "-loglevel", "error"];

const CAPTION_STYLE: &str =
    "Alignment=2,FontSize=24,Outline=1,BorderStyle=3,PrimaryColour=&H00FFFFFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Concat,
    Thumbnail,
    Clip,
}

impl JobKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Concat => "concat",
            Self::Thumbnail => "thumbnail",
            Self::Clip => "clip",
        }
    }
}

impl Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One transcoder invocation, fully described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSpec {
    Concat {
        manifest: PathBuf,
        filter: String,
        preset: String,
        crf: u8,
        output: PathBuf,
    },
    Thumbnail {
        input: PathBuf,
        seek: String,
        output: PathBuf,
    },
    Clip {
        source: PathBuf,
        clip: ClipSpec,
        filter: String,
        output: PathBuf,
    },
}

impl JobSpec {
    #[must_use]
    pub const fn kind(&self) -> JobKind {
        match self {
            Self::Concat { .. } => JobKind::Concat,
            Self::Thumbnail { .. } => JobKind::Thumbnail,
            Self::Clip { .. } => JobKind::Clip,
        }
    }

    #[must_use]
    pub fn output(&self) -> &Path {
        match self {
            Self::Concat { output, .. }
            | Self::Thumbnail { output, .. }
            | Self::Clip { output, .. } => output,
        }
    }

    /// Arguments for the transcoder, in a fixed order.
    #[must_use]
    pub fn args(&self) -> Vec<OsString> {
        let mut args = Vec::from(COMMON_ARGS.map(OsString::from));

        match self {
            Self::Concat {
                manifest,
                filter,
                preset,
                crf,
                output,
            } => {
                args.extend(["-f", "concat", "-safe", "0", "-i"].map(OsString::from));
                args.push(manifest.into());
                args.push("-vf".into());
                args.push(filter.into());
                args.push("-preset".into());
                args.push(preset.into());
                args.push("-crf".into());
                args.push(crf.to_string().into());
                args.push(output.into());
            }

            Self::Thumbnail {
                input,
                seek,
                output,
            } => {
                args.push("-i".into());
                args.push(input.into());
                args.push("-ss".into());
                args.push(seek.into());
                args.extend(["-vframes", "1"].map(OsString::from));
                args.push(output.into());
            }

            Self::Clip {
                source,
                clip,
                filter,
                output,
            } => {
                args.push("-i".into());
                args.push(source.into());
                args.push("-ss".into());
                args.push((&clip.start).into());
                args.push("-t".into());
                args.push((&clip.duration).into());
                args.push("-vf".into());
                args.push(filter.into());
                args.push(output.into());
            }
        }

        args
    }
}

/// `<thumb_dir>/<scene name>.jpg`
#[must_use]
pub fn thumbnail_path(thumb_dir: &Path, item: &MediaItem) -> PathBuf {
    thumb_dir.join(format!("{name}.jpg", name = item.name()))
}

/// `<shorts_dir>/short_<index>.mp4`
#[must_use]
pub fn clip_path(shorts_dir: &Path, index: u32) -> PathBuf {
    shorts_dir.join(format!("short_{index}.mp4"))
}

/// Burns `subtitles` in at the bottom of the frame, on a translucent box.
#[must_use]
pub fn subtitles_filter(subtitles: &Path) -> String {
    let escaped = subtitles
        .to_string_lossy()
        .replace('\\', "/")
        .replace(':', r"\:")
        .replace('\'', r"'\''");

    format!("subtitles='{escaped}':force_style='{CAPTION_STYLE}'")
}
