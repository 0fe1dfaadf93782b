use serde::{Deserialize, Serialize};

/// Binary verdict for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Benign,
    Attack,
}

impl Label {
    pub fn as_u8(self) -> u8 {
        match self {
            Label::Benign => 0,
            Label::Attack => 1,
        }
    }

    pub fn is_attack(self) -> bool {
        self == Label::Attack
    }

    /// Regression target for probability models
    pub fn target(self) -> f64 {
        f64::from(self.as_u8())
    }
}

impl From<bool> for Label {
    fn from(attack: bool) -> Self {
        if attack {
            Label::Attack
        } else {
            Label::Benign
        }
    }
}

/// Which rule decided a heuristic label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedRule {
    Whitelist(&'static str),
    Keyword(&'static str),
    FailedRootLogin,
    NoMatch,
}
