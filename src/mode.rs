use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Controls how much the [`Router`](crate::Router) reports about itself.
///
/// In `Debug` mode every registered route is logged through `tracing` at the `debug`
/// level. The mode belongs to a router instance; there is no process-wide switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Debug,
    Release,
    Test,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown router mode '{0}', expected one of: debug, release, test")]
pub struct ParseModeError(String);

impl Mode {
    /// The environment variable read by [`Mode::from_env`].
    pub const ENV: &'static str = "ROUTER_MODE";

    /// Reads the mode from `ROUTER_MODE`, falling back to `Debug` when it is unset.
    pub fn from_env() -> Result<Self, ParseModeError> {
        match env::var(Self::ENV) {
            Ok(mode) => mode.parse(),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn is_debug(self) -> bool {
        self == Mode::Debug
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Debug => "debug",
            Mode::Release => "release",
            Mode::Test => "test",
        }
    }
}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "debug" => Ok(Mode::Debug),
            "release" => Ok(Mode::Release),
            "test" => Ok(Mode::Test),
            other => Err(ParseModeError(other.to_owned())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
