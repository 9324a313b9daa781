use std::path::{Path, PathBuf};

use app_config::{ClipSpec, EncodingConfig, LayoutConfig};
use app_helpers::dirs::{ensure_dir, ensure_parent_dir};
use log::{debug, info, warn};

use crate::{
    error::BatchError,
    job::{self, JobKind, JobSpec},
    manifest,
    report::BatchReport,
    scene::{self, MediaItem},
    transcoder::Transcoder,
};

/// Runs the scene jobs against one layout, one set of encoding settings and one transcoder.
///
/// Assembly is fail-fast: any problem aborts it. Thumbnails, shorts and the cover
/// are best-effort: a failed item is recorded in the [`BatchReport`] and the
/// rest still run. Only job-wide problems (missing source, unwritable output
/// directory) fail those outright.
#[derive(Debug)]
pub struct Orchestrator<T> {
    layout: LayoutConfig,
    encoding: EncodingConfig,
    subtitles: Option<PathBuf>,
    transcoder: T,
}

impl<T: Transcoder> Orchestrator<T> {
    #[must_use]
    pub const fn new(layout: LayoutConfig, encoding: EncodingConfig, transcoder: T) -> Self {
        Self {
            layout,
            encoding,
            subtitles: None,
            transcoder,
        }
    }

    /// Burn these subtitles into every short.
    #[must_use]
    pub fn with_subtitles(mut self, subtitles: Option<PathBuf>) -> Self {
        self.subtitles = subtitles;
        self
    }

    /// Assembles the scenes, then cuts thumbnails, shorts and the cover frame
    /// from the result, in that order.
    ///
    /// The first job-wide error stops the pipeline; nothing runs after a
    /// failed assembly. The reports are in the order the jobs ran.
    pub fn run_all(&self, clips: &[ClipSpec]) -> Result<Vec<BatchReport>, BatchError> {
        let scenes = self.discover_scenes()?;
        let output = self.assemble(&scenes)?;

        let thumbnails = self.generate_thumbnails(&scenes)?;
        let shorts = self.generate_clips(&output, clips)?;
        let cover = self.generate_cover(&output)?;

        Ok(vec![thumbnails, shorts, cover])
    }

    /// The scenes in the configured scene directory, in processing order.
    pub fn discover_scenes(&self) -> Result<Vec<MediaItem>, BatchError> {
        scene::discover_scenes(&self.layout.scene_dir, &self.layout.scene_extension)
    }

    /// [`Self::assemble_concat`] into the configured output with the configured filter.
    pub fn assemble(&self, items: &[MediaItem]) -> Result<PathBuf, BatchError> {
        self.assemble_concat(items, &self.layout.output_path, &self.encoding.color_filter)
    }

    /// Concatenates `items`, in order, into `output` with `filter` applied.
    ///
    /// `output` is overwritten. The concat list is rewritten from scratch first
    /// and stays on disk afterwards.
    pub fn assemble_concat(
        &self,
        items: &[MediaItem],
        output: &Path,
        filter: &str,
    ) -> Result<PathBuf, BatchError> {
        if items.is_empty() {
            return Err(BatchError::NoInput {
                dir: self.layout.scene_dir.clone(),
                extension: self.layout.scene_extension.clone(),
            });
        }

        info!(
            "Assembling {count} scene(s) into {output:?}",
            count = items.len()
        );

        ensure_parent_dir(output)
            .map_err(BatchError::io(format!("Failed to create directory for {output:?}")))?;

        manifest::write(&self.layout.manifest_path, items)?;

        let job = JobSpec::Concat {
            manifest: self.layout.manifest_path.clone(),
            filter: filter.to_string(),
            preset: self.encoding.preset.clone(),
            crf: self.encoding.crf,
            output: output.to_path_buf(),
        };
        self.transcoder.run(&job)?;

        info!("Final video assembled: {output:?}");

        Ok(output.to_path_buf())
    }

    /// [`Self::generate_thumbnails_in`] the configured thumbnail directory.
    pub fn generate_thumbnails(&self, items: &[MediaItem]) -> Result<BatchReport, BatchError> {
        self.generate_thumbnails_in(items, &self.layout.thumb_dir)
    }

    /// Extracts one frame per item into `thumb_dir/<name>.jpg`.
    pub fn generate_thumbnails_in(
        &self,
        items: &[MediaItem],
        thumb_dir: &Path,
    ) -> Result<BatchReport, BatchError> {
        ensure_dir(thumb_dir)
            .map_err(BatchError::io(format!("Failed to create thumbnail directory {thumb_dir:?}")))?;

        let mut report = BatchReport::new(JobKind::Thumbnail);

        if items.is_empty() {
            info!("No scenes, no thumbnails to generate");
            return Ok(report);
        }

        info!(
            "Generating {count} thumbnail(s) in {thumb_dir:?}",
            count = items.len()
        );

        for item in items {
            let output = job::thumbnail_path(thumb_dir, item);
            let job = JobSpec::Thumbnail {
                input: item.path().to_path_buf(),
                seek: self.encoding.thumbnail_seek.clone(),
                output: output.clone(),
            };

            let result = self.transcoder.run(&job);
            if let Err(e) = &result {
                warn!("Thumbnail for {name:?} failed: {e}", name = item.name());
            }
            report.record(item.name(), &output, result);
        }

        Ok(report)
    }

    /// [`Self::generate_clips_in`] the configured shorts directory.
    pub fn generate_clips(
        &self,
        source: &Path,
        clips: &[ClipSpec],
    ) -> Result<BatchReport, BatchError> {
        self.generate_clips_in(source, clips, &self.layout.shorts_dir)
    }

    /// Cuts each clip out of `source` into `output_dir/short_<index>.mp4`, cropped
    /// and scaled to the vertical resolution.
    ///
    /// Offsets and durations go to the transcoder unchecked.
    pub fn generate_clips_in(
        &self,
        source: &Path,
        clips: &[ClipSpec],
        output_dir: &Path,
    ) -> Result<BatchReport, BatchError> {
        self.check_source(source)?;

        ensure_dir(output_dir)
            .map_err(BatchError::io(format!("Failed to create shorts directory {output_dir:?}")))?;

        let filter = self.short_filter();
        debug!("Shorts filter: {filter:?}");

        info!(
            "Cutting {count} short(s) from {source:?} into {output_dir:?}",
            count = clips.len()
        );

        let mut report = BatchReport::new(JobKind::Clip);
        for clip in clips {
            let output = job::clip_path(output_dir, clip.index);
            let job = JobSpec::Clip {
                source: source.to_path_buf(),
                clip: clip.clone(),
                filter: filter.clone(),
                output: output.clone(),
            };

            let result = self.transcoder.run(&job);
            if let Err(e) = &result {
                warn!(
                    "Short {index} ({start}+{duration}) failed: {e}",
                    index = clip.index,
                    start = clip.start,
                    duration = clip.duration
                );
            }
            report.record(format!("short_{}", clip.index), &output, result);
        }

        Ok(report)
    }

    /// Extracts the cover frame of `source` into the configured cover path.
    pub fn generate_cover(&self, source: &Path) -> Result<BatchReport, BatchError> {
        self.check_source(source)?;

        let output = &self.layout.cover_path;
        ensure_parent_dir(output)
            .map_err(BatchError::io(format!("Failed to create directory for {output:?}")))?;

        info!("Extracting cover frame of {source:?} into {output:?}");

        let job = JobSpec::Thumbnail {
            input: source.to_path_buf(),
            seek: self.encoding.cover_seek.clone(),
            output: output.clone(),
        };

        let mut report = BatchReport::new(JobKind::Thumbnail);
        let result = self.transcoder.run(&job);
        if let Err(e) = &result {
            warn!("Cover frame failed: {e}");
        }
        report.record("cover", output, result);

        Ok(report)
    }

    /// A transcoder that doesn't write anything can't be expected to have
    /// produced `source` earlier in the run, so its absence is only logged.
    fn check_source(&self, source: &Path) -> Result<(), BatchError> {
        if source.is_file() {
            return Ok(());
        }

        if !self.transcoder.writes_outputs() {
            debug!("{source:?} does not exist, planning against it anyway");
            return Ok(());
        }

        Err(BatchError::MissingSource(source.to_path_buf()))
    }

    fn short_filter(&self) -> String {
        let mut filter = self.encoding.short_filter();

        match &self.subtitles {
            Some(subtitles) if subtitles.is_file() => {
                filter.push(',');
                filter.push_str(&job::subtitles_filter(subtitles));
            }
            Some(subtitles) => {
                warn!("Subtitle file {subtitles:?} not found, cutting shorts without captions");
            }
            None => {}
        }

        filter
    }
}
