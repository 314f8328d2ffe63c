//! Player session: credits, bet, the round's predetermined reel results and the
//! ready flag that gates starting a new round.

use std::collections::HashMap;
use std::fmt;

use crate::combos::Resolution;

/// Identity of a reel (its index in the machine, left to right).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReelId(pub usize);

impl fmt::Display for ReelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reel#{}", self.0)
    }
}

/// Rejected bet input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BetError {
    Empty,
    NotANumber(String),
    NotPositive(i64),
}

impl fmt::Display for BetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetError::Empty => write!(f, "bet is empty"),
            BetError::NotANumber(raw) => write!(f, "bet '{}' is not a whole number", raw),
            BetError::NotPositive(v) => write!(f, "bet must be positive, got {}", v),
        }
    }
}

impl std::error::Error for BetError {}

/// Parse the bet field. Accepts a trimmed, strictly positive whole number.
pub fn parse_bet(raw: &str) -> Result<u32, BetError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(BetError::Empty);
    }
    let v: i64 = s.parse().map_err(|_| BetError::NotANumber(s.to_string()))?;
    if v <= 0 {
        return Err(BetError::NotPositive(v));
    }
    u32::try_from(v).map_err(|_| BetError::NotANumber(s.to_string()))
}

/// How the credit display should be coloured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreditTone {
    Normal,
    Negative,
}

impl CreditTone {
    pub fn css_color(self) -> &'static str {
        match self {
            CreditTone::Normal => "black",
            CreditTone::Negative => "red",
        }
    }
}

/// Settled result of one round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundOutcome {
    pub frames: Vec<usize>,
    pub name: String,
    pub multiplier: i64,
    pub win: bool,
    pub bet: u32,
    pub credits: i64,
}

#[derive(Clone, Debug)]
pub struct Session {
    credits: i64,
    bet: u32,
    results: HashMap<ReelId, usize>,
    ready: bool,
    last_outcome: Option<RoundOutcome>,
}

impl Session {
    pub fn new(credits: i64, bet: u32) -> Self {
        Self { credits, bet, results: HashMap::new(), ready: true, last_outcome: None }
    }

    pub fn credits(&self) -> i64 {
        self.credits
    }
    pub fn bet(&self) -> u32 {
        self.bet
    }
    pub fn is_ready(&self) -> bool {
        self.ready
    }
    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn result_for(&self, reel: ReelId) -> Option<usize> {
        self.results.get(&reel).copied()
    }

    pub fn credit_tone(&self) -> CreditTone {
        if self.credits < 0 { CreditTone::Negative } else { CreditTone::Normal }
    }

    /// Lock the session for a new round with the given bet. Returns false when a
    /// round is already in flight.
    pub(crate) fn begin_round(&mut self, bet: u32) -> bool {
        if !self.ready {
            return false;
        }
        self.ready = false;
        self.bet = bet;
        self.results.clear();
        true
    }

    pub(crate) fn set_result(&mut self, reel: ReelId, frame: usize) {
        self.results.insert(reel, frame);
    }

    /// Apply a resolution to the credits and reopen the session.
    pub(crate) fn settle(&mut self, frames: Vec<usize>, resolution: Resolution) -> RoundOutcome {
        let delta = resolution.multiplier.saturating_mul(self.bet as i64);
        self.credits = self.credits.saturating_add(delta);
        self.ready = true;
        let outcome = RoundOutcome {
            frames,
            name: resolution.name,
            multiplier: resolution.multiplier,
            win: resolution.win,
            bet: self.bet,
            credits: self.credits,
        };
        self.last_outcome = Some(outcome.clone());
        outcome
    }
}
