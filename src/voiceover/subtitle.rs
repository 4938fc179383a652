//! Caption cues and SubRip output
//!
//! Captions are time-coded per scene, not per spoken word: every scene gets a
//! fixed slot regardless of narration length or synthesized audio duration.

use std::fmt;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::storyboard::{Scene, Storyboard};

/// Caption slot length for every scene
pub const SCENE_DURATION_MS: u64 = 3000;

/// A single timed caption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionCue {
    /// 1-based sequence number
    pub index: usize,
    /// Start time in milliseconds
    pub start_ms: u64,
    /// End time in milliseconds
    pub end_ms: u64,
    /// Caption text (single line, may be empty)
    pub text: String,
}

impl CaptionCue {
    #[must_use]
    pub fn new(index: usize, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Self {
            index,
            start_ms,
            end_ms,
            text: text.into(),
        }
    }
}

impl fmt::Display for CaptionCue {
    /// One SRT block, including its blank separator line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(
            f,
            "{} --> {}",
            format_srt_time(self.start_ms),
            format_srt_time(self.end_ms)
        )?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Format time as SRT timestamp (HH:MM:SS,mmm)
///
/// Hours are padded to two digits but never truncated.
#[must_use]
pub fn format_srt_time(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

/// Collapse whitespace runs (newlines included) to single spaces and trim.
#[must_use]
pub fn normalize_caption_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn scene_cue(i: usize, scene: &Scene) -> CaptionCue {
    let start_ms = i as u64 * SCENE_DURATION_MS;
    CaptionCue::new(
        i + 1,
        start_ms,
        start_ms + SCENE_DURATION_MS,
        normalize_caption_text(scene.spoken_text()),
    )
}

/// One cue per scene, back to back, in storyboard order.
#[must_use]
pub fn naive_cues(storyboard: &Storyboard) -> Vec<CaptionCue> {
    storyboard
        .scenes
        .iter()
        .enumerate()
        .map(|(i, scene)| scene_cue(i, scene))
        .collect()
}

/// Render cues as SubRip text
#[must_use]
pub fn render_srt(cues: &[CaptionCue]) -> String {
    cues.iter().map(ToString::to_string).collect()
}

/// Caption file content for a storyboard
#[must_use]
pub fn make_naive_srt(storyboard: &Storyboard) -> String {
    render_srt(&naive_cues(storyboard))
}

/// Read SubRip text back into cues.
///
/// Blocks are separated by blank lines. Every block must start with a numeric
/// index and a `start --> end` line; the text may be empty or span lines.
pub fn parse_srt(content: &str) -> Result<Vec<CaptionCue>> {
    let mut cues = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in content.lines().chain(std::iter::once("")) {
        if !line.trim().is_empty() {
            block.push(line);
        } else if !block.is_empty() {
            cues.push(parse_block(&block)?);
            block.clear();
        }
    }

    Ok(cues)
}

fn parse_block(block: &[&str]) -> Result<CaptionCue> {
    let index = block[0]
        .trim()
        .parse::<usize>()
        .map_err(|_| anyhow!("expected cue index, found {:?}", block[0]))?;
    let timing = block
        .get(1)
        .ok_or_else(|| anyhow!("cue {index} has no timing line"))?;
    let (start, end) = timing
        .split_once("-->")
        .ok_or_else(|| anyhow!("cue {index}: bad timing line {timing:?}"))?;

    Ok(CaptionCue::new(
        index,
        srt_time_to_ms(start.trim())?,
        srt_time_to_ms(end.trim())?,
        block[2..].join("\n"),
    ))
}

/// Inverse of [`format_srt_time`]. Out-of-range fields are rejected.
fn srt_time_to_ms(ts: &str) -> Result<u64> {
    let bad = || anyhow!("bad SRT timestamp {ts:?}");

    let (clock, millis) = ts.split_once(',').ok_or_else(bad)?;
    let mut fields = clock.splitn(3, ':');
    let (Some(h), Some(m), Some(s)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(bad());
    };

    let field = |text: &str, limit: u64| {
        text.parse::<u64>()
            .ok()
            .filter(|v| *v < limit)
            .ok_or_else(bad)
    };
    let hours = field(h, u64::MAX)?;
    let minutes = field(m, 60)?;
    let seconds = field(s, 60)?;
    let millis = field(millis, 1000)?;

    hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1000 + millis))
        .ok_or_else(bad)
}
