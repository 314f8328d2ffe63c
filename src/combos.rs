//! Winning combinations and the reel result resolver.

/// Name shown when the landed frames match no combination.
pub const LOSS_NAME: &str = "Try Again";
/// Multiplier applied to the bet on a loss (the bet is forfeited).
pub const LOSS_MULTIPLIER: i64 = -1;

/// One winning pattern: the frame index each reel must land on.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Combo {
    pub name: String,
    pub multiplier: i64,
    pub value: [usize; 3],
}

impl Combo {
    fn new(name: &str, multiplier: i64, value: [usize; 3]) -> Self {
        Self { name: name.to_string(), multiplier, value }
    }
}

/// Outcome of matching landed frames against a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub name: String,
    pub multiplier: i64,
    pub win: bool,
}

/// Ordered table of winning combinations; the first exact match wins.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ComboTable {
    combos: Vec<Combo>,
}

impl Default for ComboTable {
    fn default() -> Self {
        Self::three_reels()
    }
}

impl ComboTable {
    pub fn new(combos: Vec<Combo>) -> Self {
        Self { combos }
    }

    /// The stock table for a three reel, four frame strip.
    pub fn three_reels() -> Self {
        Self::new(vec![
            Combo::new("Winner!! 1x Prize", 1, [0, 0, 0]),
            Combo::new("Winner!! 1x Prize", 1, [1, 1, 1]),
            Combo::new("Winner!! 1x Prize", 1, [2, 2, 2]),
            Combo::new("Bonus!! 2x Prize", 2, [0, 1, 2]),
            Combo::new("Jackpot!! 3x Prize", 3, [2, 1, 0]),
        ])
    }

    pub fn combos(&self) -> &[Combo] {
        &self.combos
    }

    pub fn resolve(&self, frames: &[usize]) -> Resolution {
        match self.combos.iter().find(|c| c.value.as_slice() == frames) {
            Some(c) => Resolution { name: c.name.clone(), multiplier: c.multiplier, win: true },
            None => Resolution {
                name: LOSS_NAME.to_string(),
                multiplier: LOSS_MULTIPLIER,
                win: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_table_multipliers() {
        let table = ComboTable::default();
        assert_eq!(table.resolve(&[0, 0, 0]).multiplier, 1);
        assert_eq!(table.resolve(&[1, 1, 1]).multiplier, 1);
        assert_eq!(table.resolve(&[0, 1, 2]).multiplier, 2);
        let jackpot = table.resolve(&[2, 1, 0]);
        assert_eq!(jackpot.multiplier, 3);
        assert_eq!(jackpot.name, "Jackpot!! 3x Prize");
        assert!(jackpot.win);
    }

    #[test]
    fn no_match_is_a_loss() {
        let r = ComboTable::default().resolve(&[1, 0, 2]);
        assert_eq!(r, Resolution { name: "Try Again".into(), multiplier: -1, win: false });
    }

    #[test]
    fn partial_or_wrong_length_never_matches() {
        let table = ComboTable::default();
        assert!(!table.resolve(&[0, 0]).win);
        assert!(!table.resolve(&[0, 0, 0, 0]).win);
    }

    #[test]
    fn first_match_wins() {
        let table = ComboTable::new(vec![
            Combo::new("first", 5, [1, 1, 1]),
            Combo::new("second", 9, [1, 1, 1]),
        ]);
        assert_eq!(table.resolve(&[1, 1, 1]).name, "first");
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn table_loads_from_json() {
        let json = r#"[{"name":"Triple Two","multiplier":4,"value":[2,2,2]}]"#;
        let table: ComboTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.resolve(&[2, 2, 2]).multiplier, 4);
        assert_eq!(table.resolve(&[0, 0, 0]).multiplier, -1);
    }
}
