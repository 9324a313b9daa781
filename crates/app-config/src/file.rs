use std::{
    fs,
    io::prelude::*,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};

use crate::{
    common::{EncodingArgs, LayoutArgs, ProgramPathConfig, ShortsArgs},
    Config,
};

const PROJECT_CONFIG_FILE_NAME: &str = "scene-batch.toml";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfiguration {
    pub layout: Option<LayoutArgs>,

    pub encoding: Option<EncodingArgs>,

    pub shorts: Option<ShortsArgs>,

    pub dependencies: Option<ProgramPathConfig>,
}

impl FileConfiguration {
    /// Loads the given file on its own.
    ///
    /// Without one, loads the user config (creating it first if needed) and layers
    /// a `scene-batch.toml` from the working directory over it.
    pub(crate) fn new(config_path: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        if let Some(config_path) = config_path {
            return Ok((Self::load_from_file(config_path)?, Some(config_path.into())));
        }

        let (user_config, user_config_path) = match Self::create_default_config_file() {
            Ok(config_path) => (Self::load_from_file(&config_path)?, Some(config_path)),
            Err(e) => {
                eprintln!("Not using a user config file: {e}");
                (Self::default(), None)
            }
        };

        let project_config_path = PathBuf::from(PROJECT_CONFIG_FILE_NAME);
        if !project_config_path.is_file() {
            return Ok((user_config, user_config_path));
        }

        eprintln!("Found project config file {project_config_path:?}");
        let project_config = Self::load_from_file(&project_config_path)?;

        Ok((user_config.merge(project_config), Some(project_config_path)))
    }

    pub(crate) fn merge_into_config(&self, config: &mut Config) {
        if let Some(layout) = &self.layout {
            if let Some(scene_dir) = &layout.scene_dir {
                eprintln!("Found scene directory from config file: {scene_dir:?}");
            }
            config.layout.apply(layout);
        }

        if let Some(encoding) = &self.encoding {
            config.encoding.apply(encoding);
        }

        if let Some(shorts) = &self.shorts {
            config.shorts.apply(shorts);
        }

        if let Some(dependencies) = &self.dependencies {
            if let Some(ffmpeg_path) = &dependencies.ffmpeg_path {
                eprintln!("Found ffmpeg path from config file: {ffmpeg_path:?}");
            }
            config.dependencies.apply(dependencies);
        }
    }

    /// Layers `other` over `self`, field by field.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let layout = match (self.layout, other.layout) {
            (Some(mut layout), Some(other)) => {
                layout.merge(&other);
                Some(layout)
            }
            (layout, other) => other.or(layout),
        };

        let encoding = match (self.encoding, other.encoding) {
            (Some(mut encoding), Some(other)) => {
                encoding.merge(&other);
                Some(encoding)
            }
            (encoding, other) => other.or(encoding),
        };

        let shorts = match (self.shorts, other.shorts) {
            (Some(mut shorts), Some(other)) => {
                shorts.merge(&other);
                Some(shorts)
            }
            (shorts, other) => other.or(shorts),
        };

        let dependencies = match (self.dependencies, other.dependencies) {
            (Some(mut dependencies), Some(other)) => {
                dependencies.merge(&other);
                Some(dependencies)
            }
            (dependencies, other) => other.or(dependencies),
        };

        Self {
            layout,
            encoding,
            shorts,
            dependencies,
        }
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str::<Self>(contents).map_err(|e| anyhow!("Error parsing config file: {e}"))
    }

    fn load_from_file<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let p = path.as_ref();

        if !p.is_file() {
            bail!("Config file {:?} does not exist or is not a file", &p);
        }

        let config_file =
            fs::read_to_string(p).with_context(|| format!("Failed to read config file {p:?}"))?;

        Self::from_toml_str(&config_file).with_context(|| format!("In config file {p:?}"))
    }

    fn create_default_config_file() -> anyhow::Result<PathBuf> {
        let file = Self::default_config_path().ok_or_else(|| {
            anyhow!("Failed to get config directory. Please pass a config file with --config-path")
        })?;

        let config_dir: PathBuf = file
            .parent()
            .ok_or_else(|| {
                anyhow!(
                    "Failed to get parent directory of config file. Is the config file in root?"
                )
            })?
            .into();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        if !file.exists() {
            eprintln!("Config file not found. Creating one at {file:?}");
            let mut f = fs::File::create(&file)?;
            f.write_all(include_bytes!("./config.toml"))
                .map_err(|e| anyhow!("Failed to create config file: {e}"))?;
        }

        Ok(file)
    }

    fn default_config_path() -> Option<PathBuf> {
        Config::get_config_dir().map(|x| x.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_config_parses() {
        let template = include_str!("./config.toml");

        FileConfiguration::from_toml_str(template).unwrap();
    }

    #[test]
    fn parses_sections_and_clip_tables() {
        let config = FileConfiguration::from_toml_str(
            r#"
            [layout]
            scene_dir = "clips"
            scene_extension = "mov"

            [encoding]
            crf = 20

            [[shorts.clips]]
            start = "00:00:01"
            duration = "5"

            [[shorts.clips]]
            start = "00:00:30"
            duration = "5"
            index = 8
            "#,
        )
        .unwrap();

        let layout = config.layout.unwrap();
        assert_eq!(layout.scene_dir, Some(PathBuf::from("clips")));
        assert_eq!(layout.scene_extension.as_deref(), Some("mov"));
        assert_eq!(config.encoding.unwrap().crf, Some(20));

        let shorts = config.shorts.unwrap();
        assert_eq!(shorts.clips.len(), 2);
        assert_eq!(shorts.clips[1].index, Some(8));
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(FileConfiguration::from_toml_str("[bots]\ntoken = \"x\"").is_err());
    }

    #[test]
    fn later_file_wins_per_field() {
        let base = FileConfiguration::from_toml_str(
            "[encoding]\npreset = \"slow\"\ncrf = 18\n[layout]\nthumb_dir = \"thumbs\"",
        )
        .unwrap();
        let over = FileConfiguration::from_toml_str("[encoding]\ncrf = 23").unwrap();

        let merged = base.merge(over);

        let encoding = merged.encoding.unwrap();
        assert_eq!(encoding.preset.as_deref(), Some("slow"));
        assert_eq!(encoding.crf, Some(23));
        assert_eq!(
            merged.layout.unwrap().thumb_dir,
            Some(PathBuf::from("thumbs"))
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let res = FileConfiguration::new(Some(&dir.path().join("nope.toml")));

        assert!(res.is_err());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[dependencies]\nffmpeg_path = \"/opt/ffmpeg/bin/ffmpeg\"\n").unwrap();

        let (config, used) = FileConfiguration::new(Some(&path)).unwrap();

        assert_eq!(used, Some(path));
        assert_eq!(
            config.dependencies.unwrap().ffmpeg_path,
            Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg"))
        );
    }
}
