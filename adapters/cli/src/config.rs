//! Layered game configuration: defaults, then an optional TOML file, then flags.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use goblin_hunt_core::{
    BoardGeometry, Theme, DEFAULT_BOARD_SIZE, SAFETY_TIMEOUT, TICK_INTERVAL,
};
use goblin_hunt_session::SessionConfig;
use goblin_hunt_system_scheduler::Config as SchedulerConfig;
use serde::Deserialize;

/// Fully resolved settings for one run of the binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GameConfig {
    geometry: BoardGeometry,
    timing: SchedulerConfig,
    seed: Option<u64>,
    theme: Theme,
}

/// Values supplied on the command line; each one wins over the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) board_size: Option<u32>,
    pub(crate) tick_ms: Option<u64>,
    pub(crate) safety_ms: Option<u64>,
    pub(crate) seed: Option<u64>,
    pub(crate) theme: Option<Theme>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    board_size: Option<u32>,
    tick_interval_ms: Option<u64>,
    safety_timeout_ms: Option<u64>,
    seed: Option<u64>,
    theme: Option<Theme>,
}

impl ConfigFile {
    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse game config toml contents")
    }
}

impl GameConfig {
    /// Resolves the configuration, reading `path` when provided.
    pub(crate) fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let file = match path {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read game config at {}", path.display()))?;
                ConfigFile::parse(&contents)
                    .with_context(|| format!("invalid game config at {}", path.display()))?
            }
            None => ConfigFile::default(),
        };
        Self::layer(file, overrides)
    }

    fn layer(file: ConfigFile, overrides: Overrides) -> Result<Self> {
        let board_size = overrides
            .board_size
            .or(file.board_size)
            .unwrap_or(DEFAULT_BOARD_SIZE);
        let tick_interval = overrides
            .tick_ms
            .or(file.tick_interval_ms)
            .map_or(TICK_INTERVAL, Duration::from_millis);
        let safety_timeout = overrides
            .safety_ms
            .or(file.safety_timeout_ms)
            .map_or(SAFETY_TIMEOUT, Duration::from_millis);

        let geometry = BoardGeometry::new(board_size).context("invalid board size")?;
        let timing =
            SchedulerConfig::new(tick_interval, safety_timeout).context("invalid timings")?;

        Ok(Self {
            geometry,
            timing,
            seed: overrides.seed.or(file.seed),
            theme: overrides.theme.or(file.theme).unwrap_or_default(),
        })
    }

    /// Board dimensions.
    pub(crate) const fn geometry(&self) -> BoardGeometry {
        self.geometry
    }

    /// Seed shared by target placement and the simulated player.
    pub(crate) const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Parameters handed to the session controller.
    pub(crate) fn session(&self) -> SessionConfig {
        let config = SessionConfig::new(self.timing).with_theme(self.theme);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

/// Parses a `--theme` flag by theme name.
pub(crate) fn parse_theme(value: &str) -> Result<Theme, String> {
    Theme::from_name(value).ok_or_else(|| {
        let known: Vec<&str> = Theme::ALL.iter().map(|theme| theme.as_str()).collect();
        format!("unknown theme `{value}`; expected one of {}", known.join(", "))
    })
}
