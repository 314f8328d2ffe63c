//! Game configuration. Defaults reproduce the stock Dread Spinner cabinet; with
//! the `serde_json` feature a partial JSON object can override any field.

use std::fmt;

use crate::combos::ComboTable;
use crate::sprite::{Direction, SpriteOptions};

/// Host refresh rate the tick delay is derived from.
pub const HOST_TICKS_PER_SECOND: f64 = 60.0;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpinnerConfig {
    // --- Reel animation ---
    pub key_rate: f64,          // pixels per key frame
    pub fps: u32,               // key frames per second
    pub animation_secs: u32,    // spin length before the stop is armed
    pub flip_after: u32,        // key frames of warm-up before reversing
    pub frames_per_reel: usize, // frames on the strip, the last one never wins
    pub initial_frames: Vec<usize>,
    pub frame_width: u32,
    pub frame_height: u32,
    // --- Round timing ---
    pub start_delay_ms: f64,
    pub stagger_ms: f64,
    pub spin_audio_delay_ms: i32,
    pub result_audio_delay_ms: i32,
    // --- Session ---
    pub starting_credits: i64,
    pub default_bet: u32,
    pub combos: ComboTable,
    // --- Assets & DOM ---
    pub image_src: String,
    pub audio_spinning: String,
    pub audio_win: String,
    pub audio_lose: String,
    pub canvas_ids: Vec<String>,
    pub bet_input_id: String,
    pub credit_id: String,
    pub result_id: String,
    pub volume_id: String,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            key_rate: 70.0,
            fps: 30,
            animation_secs: 4,
            flip_after: 3,
            frames_per_reel: 4,
            initial_frames: vec![2, 1, 0],
            frame_width: 200,
            frame_height: 430,
            start_delay_ms: 250.0,
            stagger_ms: 0.0,
            spin_audio_delay_ms: 250,
            result_audio_delay_ms: 100,
            starting_credits: 150,
            default_bet: 5,
            combos: ComboTable::default(),
            image_src: "DreadSpinnerReverse.png".into(),
            audio_spinning: "AudioSpinning.mp3".into(),
            audio_win: "AudioWin.mp3".into(),
            audio_lose: "AudioLose.mp3".into(),
            canvas_ids: vec![
                "spinnerOneAnimation".into(),
                "spinnerTwoAnimation".into(),
                "spinnerThreeAnimation".into(),
            ],
            bet_input_id: "betValue".into(),
            credit_id: "creditAvail".into(),
            result_id: "resultDiv".into(),
            volume_id: "volumeIcon".into(),
        }
    }
}

/// Invalid or unparsable configuration.
#[derive(Debug)]
pub enum ConfigError {
    #[cfg(feature = "serde_json")]
    Json(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "serde_json")]
            ConfigError::Json(e) => write!(f, "config json: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl SpinnerConfig {
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: SpinnerConfig = serde_json::from_str(json).map_err(ConfigError::Json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be positive".into()));
        }
        if self.animation_secs.checked_mul(self.fps).is_none() {
            return Err(ConfigError::Invalid(format!(
                "animation_secs {} at {} fps overflows the key frame counter",
                self.animation_secs, self.fps
            )));
        }
        // a reel that cannot move never reaches its armed stop
        if !self.key_rate.is_finite() || self.key_rate <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "key_rate must be a positive number, got {}",
                self.key_rate
            )));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "frame size must be positive, got {}x{}",
                self.frame_width, self.frame_height
            )));
        }
        if self.frames_per_reel < 2 {
            return Err(ConfigError::Invalid("a reel needs at least two frames".into()));
        }
        if self.initial_frames.len() != self.canvas_ids.len() {
            return Err(ConfigError::Invalid(format!(
                "{} initial frames for {} reels",
                self.initial_frames.len(),
                self.canvas_ids.len()
            )));
        }
        if self.canvas_ids.is_empty() {
            return Err(ConfigError::Invalid("no reels configured".into()));
        }
        Ok(())
    }

    /// Host ticks between key frames, e.g. 2 at 30 fps.
    pub fn ticks_per_key_frame(&self) -> u32 {
        (HOST_TICKS_PER_SECOND / self.fps.max(1) as f64).round() as u32
    }

    /// Key frame count at which the stop is armed.
    pub fn stop_after(&self) -> u32 {
        self.animation_secs.saturating_mul(self.fps)
    }

    pub fn reel_count(&self) -> usize {
        self.canvas_ids.len()
    }

    pub fn sprite_options(&self, reel: usize) -> SpriteOptions {
        SpriteOptions {
            frame_width: self.frame_width as f64,
            frame_height: self.frame_height as f64,
            frames: self.frames_per_reel,
            start_frame: self.initial_frames.get(reel).copied().unwrap_or(0),
            direction: Direction::Forward,
            pixels_per_key_frame: self.key_rate,
            ticks_per_key_frame: self.ticks_per_key_frame(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_timing() {
        let cfg = SpinnerConfig::default();
        assert_eq!(cfg.ticks_per_key_frame(), 2);
        assert_eq!(cfg.stop_after(), 120);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.sprite_options(0).start_frame, 2);
        assert_eq!(cfg.sprite_options(2).start_frame, 0);
    }

    #[test]
    fn rejects_mismatched_reels() {
        let cfg = SpinnerConfig { initial_frames: vec![0, 0], ..SpinnerConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
        let cfg = SpinnerConfig { fps: 0, ..SpinnerConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_overrides_defaults() {
        let cfg = SpinnerConfig::from_json(r#"{"key_rate": 35.0, "stagger_ms": 500}"#).unwrap();
        assert_eq!(cfg.key_rate, 35.0);
        assert_eq!(cfg.stagger_ms, 500.0);
        assert_eq!(cfg.fps, 30);
        assert_eq!(cfg.combos, ComboTable::default());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn bad_json_is_reported() {
        assert!(matches!(SpinnerConfig::from_json("{"), Err(ConfigError::Json(_))));
        assert!(matches!(
            SpinnerConfig::from_json(r#"{"fps": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn rates_that_cannot_reach_a_stop_are_rejected() {
        for json in [
            r#"{"key_rate": -70.0}"#,
            r#"{"key_rate": 0}"#,
            r#"{"key_rate": 0.0}"#,
        ] {
            assert!(
                matches!(SpinnerConfig::from_json(json), Err(ConfigError::Invalid(_))),
                "{json} accepted"
            );
        }
        assert!(SpinnerConfig::from_json(r#"{"key_rate": 0.5}"#).is_ok());
    }

    #[test]
    fn non_finite_rate_is_rejected() {
        for rate in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let cfg = SpinnerConfig { key_rate: rate, ..SpinnerConfig::default() };
            assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))), "{rate} accepted");
        }
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn zero_frame_size_is_rejected() {
        for json in [r#"{"frame_height": 0}"#, r#"{"frame_width": 0}"#] {
            assert!(
                matches!(SpinnerConfig::from_json(json), Err(ConfigError::Invalid(_))),
                "{json} accepted"
            );
        }
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn overflowing_animation_length_is_rejected() {
        assert!(matches!(
            SpinnerConfig::from_json(r#"{"animation_secs": 4294967295}"#),
            Err(ConfigError::Invalid(_))
        ));
        let cfg = SpinnerConfig { animation_secs: u32::MAX, ..SpinnerConfig::default() };
        assert!(cfg.validate().is_err());
        assert_eq!(cfg.stop_after(), u32::MAX);
    }
}
