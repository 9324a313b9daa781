use std::{collections::HashSet, fmt::Display, str::FromStr};

use log::warn;
use serde::{Deserialize, Serialize};

/// A requested short, as written on the command line or in the config file.
///
/// On the command line the form is `START+DURATION[@INDEX]`, e.g.
/// `00:00:10+00:00:30` or `00:02:00+30@7`.
/// Neither part is validated beyond being non-empty; `ffmpeg` decides what it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipEntry {
    pub start: String,
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

impl ClipEntry {
    #[must_use]
    pub fn new<S: Into<String>, D: Into<String>>(start: S, duration: D) -> Self {
        Self {
            start: start.into(),
            duration: duration.into(),
            index: None,
        }
    }

    #[must_use]
    pub const fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }
}

impl FromStr for ClipEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (range, index) = match s.rsplit_once('@') {
            Some((range, index)) => {
                let index = index
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| format!("Invalid clip index {index:?} in {s:?}: {e}"))?;

                (range, Some(index))
            }
            None => (s, None),
        };

        let (start, duration) = range
            .split_once('+')
            .ok_or_else(|| format!("Clip {s:?} is not in the form START+DURATION[@INDEX]"))?;

        let (start, duration) = (start.trim(), duration.trim());
        if start.is_empty() || duration.is_empty() {
            return Err(format!("Clip {s:?} has an empty start or duration"));
        }

        Ok(Self {
            start: start.to_string(),
            duration: duration.to_string(),
            index,
        })
    }
}

impl Display for ClipEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{}", self.start, self.duration)?;

        if let Some(index) = self.index {
            write!(f, "@{index}")?;
        }

        Ok(())
    }
}

/// A short with its output index settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipSpec {
    pub start: String,
    pub duration: String,
    pub index: u32,
}

/// The shorts cut when nothing else is configured.
#[must_use]
pub fn default_clips() -> Vec<ClipEntry> {
    vec![
        ClipEntry::new("00:00:10", "00:00:30"),
        ClipEntry::new("00:02:00", "00:00:30"),
        ClipEntry::new("00:05:00", "00:00:30"),
    ]
}

/// Entries without an explicit index get their 1-based position in the list.
#[must_use]
pub fn resolve_clips(entries: &[ClipEntry]) -> Vec<ClipSpec> {
    let clips = entries
        .iter()
        .zip(1_u32..)
        .map(|(entry, position)| ClipSpec {
            start: entry.start.clone(),
            duration: entry.duration.clone(),
            index: entry.index.unwrap_or(position),
        })
        .collect::<Vec<_>>();

    let mut seen = HashSet::new();
    for clip in &clips {
        if !seen.insert(clip.index) {
            warn!(
                "Clip index {index} is used more than once, later clips will overwrite earlier ones",
                index = clip.index
            );
        }
    }

    clips
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_and_duration() {
        let clip: ClipEntry = "00:00:10+00:00:30".parse().unwrap();

        assert_eq!(clip, ClipEntry::new("00:00:10", "00:00:30"));
    }

    #[test]
    fn parses_explicit_index() {
        let clip: ClipEntry = "00:02:00 + 30 @ 7".parse().unwrap();

        assert_eq!(clip, ClipEntry::new("00:02:00", "30").with_index(7));
    }

    #[test]
    fn rejects_malformed_clips() {
        assert!("00:00:10".parse::<ClipEntry>().is_err());
        assert!("+00:00:30".parse::<ClipEntry>().is_err());
        assert!("00:00:10+".parse::<ClipEntry>().is_err());
        assert!("00:00:10+30@x".parse::<ClipEntry>().is_err());
    }

    #[test]
    fn display_matches_parse_form() {
        let clip = ClipEntry::new("10", "5").with_index(3);

        assert_eq!(clip.to_string(), "10+5@3");
    }

    #[test]
    fn positions_fill_missing_indices() {
        let clips = resolve_clips(&[
            ClipEntry::new("a", "1"),
            ClipEntry::new("b", "2").with_index(9),
            ClipEntry::new("c", "3"),
        ]);

        let indices = clips.iter().map(|c| c.index).collect::<Vec<_>>();
        assert_eq!(indices, vec![1, 9, 3]);
    }

    #[test]
    fn default_clips_are_three_half_minute_shorts() {
        let clips = resolve_clips(&default_clips());

        assert_eq!(clips.len(), 3);
        assert_eq!(clips[1].start, "00:02:00");
        assert_eq!(clips[2].index, 3);
        assert!(clips.iter().all(|c| c.duration == "00:00:30"));
    }
}
