// src/config.rs
use crate::anim::error::MotionError;
use crate::anim::gate::{HysteresisGate, ThresholdFlag};
use crate::anim::region::LocatorConfig;
use crate::anim::signal::ScrollAnchors;
use crate::anim::stepper::{StepperConfig, TabStepper};
use crate::anim::typewriter::TypewriterTiming;
use crate::utils::layout::Insets;
use configparser::ini::Ini;
use log::{info, warn};
use std::error::Error;
use std::fmt;
use std::path::Path;

// Text reveal
pub const REVEAL_BASE_DELAY_MS: u64 = 0;
pub const REVEAL_UNIT_INTERVAL_MS: u64 = 20;
pub const REVEAL_SCRAMBLE_PERIOD_MS: u64 = 35;
pub const REVEAL_ALPHABET: &str = "01";

// Header / nav bar / scroll-to-top
pub const HEADER_NEAR_TOP_PX: f32 = 10.0;
pub const NAV_NEAR_TOP_PX: f32 = 100.0;
pub const SCROLL_TOP_SHOW_AFTER_PX: f32 = 300.0;
pub const NAV_HEADER_OFFSET_PX: f32 = 80.0; // header height plus some padding

// Section tracking (observation band = viewport minus 50px on top and the lower half)
pub const SECTION_MIN_RATIO: f32 = 0.3;
pub const SECTION_INSET_TOP_PX: f32 = 50.0;
pub const SECTION_INSET_BOTTOM_FRAC: f32 = 0.5;
pub const SECTION_REFERENCE_FRAC: f32 = 0.5;

// Card deck: top edge at 35% of the viewport -> top edge at 10%
pub const DECK_ANCHOR_ENTER: f32 = 0.35;
pub const DECK_ANCHOR_SETTLE: f32 = 0.10;
pub const DECK_CROSSFADE: f32 = 0.0;

// Work-history tabs
pub const TAB_STEP_THRESHOLD_PX: f32 = 100.0;
pub const TAB_BUFFER_FRAC: f32 = 1.0 / 3.0;

// Splash typewriter
pub const SPLASH_START_DELAY_MS: u64 = 100;
pub const SPLASH_TYPE_INTERVAL_MS: u64 = 100;
pub const SPLASH_HOLD_MS: u64 = 1000;
pub const SPLASH_DELETE_INTERVAL_MS: u64 = 100;

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse {
        section: &'static str,
        key: &'static str,
        message: String,
    },
    Invalid(MotionError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "could not read config: {}", e),
            ConfigError::Parse { section, key, message } => {
                write!(f, "bad value for [{}] {}: {}", section, key, message)
            }
            ConfigError::Invalid(e) => write!(f, "invalid config: {}", e),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MotionError> for ConfigError {
    fn from(err: MotionError) -> Self {
        ConfigError::Invalid(err)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RevealConfig {
    pub base_delay_ms: u64,
    pub unit_interval_ms: u64,
    pub scramble_period_ms: u64,
    pub alphabet: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MotionConfig {
    pub reveal: RevealConfig,
    pub header_near_top: f32,
    pub nav_near_top: f32,
    pub scroll_top_after: f32,
    pub nav_header_offset: f32,
    pub sections: LocatorConfig,
    pub deck_anchors: ScrollAnchors,
    pub deck_crossfade: f32,
    pub tabs: StepperConfig,
    pub splash: TypewriterTiming,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reveal: RevealConfig {
                base_delay_ms: REVEAL_BASE_DELAY_MS,
                unit_interval_ms: REVEAL_UNIT_INTERVAL_MS,
                scramble_period_ms: REVEAL_SCRAMBLE_PERIOD_MS,
                alphabet: REVEAL_ALPHABET.to_string(),
            },
            header_near_top: HEADER_NEAR_TOP_PX,
            nav_near_top: NAV_NEAR_TOP_PX,
            scroll_top_after: SCROLL_TOP_SHOW_AFTER_PX,
            nav_header_offset: NAV_HEADER_OFFSET_PX,
            sections: LocatorConfig {
                min_ratio: SECTION_MIN_RATIO,
                insets: Insets {
                    top_px: SECTION_INSET_TOP_PX,
                    bottom_frac: SECTION_INSET_BOTTOM_FRAC,
                },
                reference_frac: SECTION_REFERENCE_FRAC,
            },
            deck_anchors: ScrollAnchors::new_unchecked(DECK_ANCHOR_ENTER, DECK_ANCHOR_SETTLE),
            deck_crossfade: DECK_CROSSFADE,
            tabs: StepperConfig {
                step_threshold: TAB_STEP_THRESHOLD_PX,
                buffer_frac: TAB_BUFFER_FRAC,
            },
            splash: TypewriterTiming {
                start_delay_ms: SPLASH_START_DELAY_MS,
                type_interval_ms: SPLASH_TYPE_INTERVAL_MS,
                hold_ms: SPLASH_HOLD_MS,
                delete_interval_ms: SPLASH_DELETE_INTERVAL_MS,
            },
        }
    }
}

fn float(ini: &Ini, section: &'static str, key: &'static str, default: f32) -> Result<f32, ConfigError> {
    match ini.getfloat(section, key) {
        Ok(Some(v)) => Ok(v as f32),
        Ok(None) => Ok(default),
        Err(message) => Err(ConfigError::Parse { section, key, message }),
    }
}

fn millis(ini: &Ini, section: &'static str, key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match ini.getuint(section, key) {
        Ok(Some(v)) => Ok(v),
        Ok(None) => Ok(default),
        Err(message) => Err(ConfigError::Parse { section, key, message }),
    }
}

impl MotionConfig {
    /// Checks every threshold the engine would otherwise reject at construction.
    pub fn validate(&self) -> Result<(), MotionError> {
        HysteresisGate::new(self.header_near_top)?;
        HysteresisGate::new(self.nav_near_top)?;
        ThresholdFlag::new(self.scroll_top_after)?;
        if !(self.nav_header_offset.is_finite() && self.nav_header_offset >= 0.0) {
            return Err(MotionError::Threshold { name: "nav_offset_px", value: self.nav_header_offset });
        }
        self.sections.validate()?;
        if !(self.deck_crossfade.is_finite() && self.deck_crossfade >= 0.0) {
            return Err(MotionError::Threshold { name: "crossfade", value: self.deck_crossfade });
        }
        TabStepper::new(1, self.tabs)?;
        Ok(())
    }

    /// Overrides on top of the defaults; missing keys keep their default.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let d = MotionConfig::default();

        let reveal = RevealConfig {
            base_delay_ms: millis(ini, "reveal", "base_delay_ms", d.reveal.base_delay_ms)?,
            unit_interval_ms: millis(ini, "reveal", "unit_interval_ms", d.reveal.unit_interval_ms)?,
            scramble_period_ms: millis(ini, "reveal", "scramble_period_ms", d.reveal.scramble_period_ms)?,
            alphabet: ini.get("reveal", "alphabet").unwrap_or(d.reveal.alphabet.clone()),
        };

        let sections = LocatorConfig {
            min_ratio: float(ini, "sections", "min_ratio", d.sections.min_ratio)?,
            insets: Insets {
                top_px: float(ini, "sections", "inset_top_px", d.sections.insets.top_px)?,
                bottom_frac: float(ini, "sections", "inset_bottom_frac", d.sections.insets.bottom_frac)?,
            },
            reference_frac: float(ini, "sections", "reference_frac", d.sections.reference_frac)?,
        };

        let deck_anchors = ScrollAnchors::new(
            float(ini, "deck", "enter", d.deck_anchors.enter())?,
            float(ini, "deck", "settle", d.deck_anchors.settle())?,
        )?;

        let cfg = MotionConfig {
            reveal,
            header_near_top: float(ini, "header", "near_top_px", d.header_near_top)?,
            nav_near_top: float(ini, "header", "nav_near_top_px", d.nav_near_top)?,
            scroll_top_after: float(ini, "header", "scroll_top_after_px", d.scroll_top_after)?,
            nav_header_offset: float(ini, "header", "nav_offset_px", d.nav_header_offset)?,
            sections,
            deck_anchors,
            deck_crossfade: float(ini, "deck", "crossfade", d.deck_crossfade)?,
            tabs: StepperConfig {
                step_threshold: float(ini, "tabs", "step_threshold_px", d.tabs.step_threshold)?,
                buffer_frac: float(ini, "tabs", "buffer_frac", d.tabs.buffer_frac)?,
            },
            splash: TypewriterTiming {
                start_delay_ms: millis(ini, "splash", "start_delay_ms", d.splash.start_delay_ms)?,
                type_interval_ms: millis(ini, "splash", "type_interval_ms", d.splash.type_interval_ms)?,
                hold_ms: millis(ini, "splash", "hold_ms", d.splash.hold_ms)?,
                delete_interval_ms: millis(ini, "splash", "delete_interval_ms", d.splash.delete_interval_ms)?,
            },
        };

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let mut ini = Ini::new();
        ini.read(text.to_string()).map_err(ConfigError::Io)?;
        Self::from_ini(&ini)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut ini = Ini::new();
        ini.load(path).map_err(ConfigError::Io)?;
        let cfg = Self::from_ini(&ini)?;
        info!("Loaded motion config from '{}'.", path.display());
        Ok(cfg)
    }

    /// Missing or broken files are not fatal: log and fall back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No config at '{}', using defaults.", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load '{}' ({}), using defaults.", path.display(), e);
                Self::default()
            }
        }
    }
}
