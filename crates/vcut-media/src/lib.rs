//! CLI wrappers for the external media tools.
//!
//! This crate provides:
//! - Silence-cut invocation via auto-editor (with timeout and
//!   empty-timeline detection)
//! - Waveform audio extraction via FFmpeg
//! - Best-effort duration probing via FFprobe
//! - Tool discovery and startup availability checks

pub mod audio;
pub mod autoeditor;
pub mod error;
pub mod probe;
pub mod tools;

pub use audio::{extract_wav_audio, is_video_extension, locate_ffmpeg, VIDEO_EXTENSIONS};
pub use autoeditor::{cut_silence, clamp_threshold, CutOutcome};
pub use error::{MediaError, MediaResult};
pub use probe::{duration_or_zero, probe_duration};
pub use tools::{check_autoeditor, check_ffprobe, log_tool_availability};
