//! Categorical labels attached to every document: legislation type and
//! ANZSIC industry division.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primary (Act of Parliament) or Secondary (delegated instrument).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LegislationType {
    Primary,
    Secondary,
}

impl LegislationType {
    /// Primary iff the collection is `act`, compared case-insensitively.
    pub fn from_collection(collection: &str) -> Self {
        if collection.trim().eq_ignore_ascii_case("act") {
            Self::Primary
        } else {
            Self::Secondary
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Secondary => "Secondary",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Primary => "Acts of Parliament",
            Self::Secondary => "Legislative Instruments (regulations, rules, etc.)",
        }
    }
}

impl fmt::Display for LegislationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ANZSIC 1-digit division, plus cross-cutting (`X`) and unclassified (`U`).
///
/// Variant order is the display order: A..S, then X, then U.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndustryCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    X,
    U,
}

impl IndustryCode {
    /// All codes in display order.
    pub const ALL: [IndustryCode; 21] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::I,
        Self::J,
        Self::K,
        Self::L,
        Self::M,
        Self::N,
        Self::O,
        Self::P,
        Self::Q,
        Self::R,
        Self::S,
        Self::X,
        Self::U,
    ];

    pub fn letter(&self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
            Self::G => 'G',
            Self::H => 'H',
            Self::I => 'I',
            Self::J => 'J',
            Self::K => 'K',
            Self::L => 'L',
            Self::M => 'M',
            Self::N => 'N',
            Self::O => 'O',
            Self::P => 'P',
            Self::Q => 'Q',
            Self::R => 'R',
            Self::S => 'S',
            Self::X => 'X',
            Self::U => 'U',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        Self::ALL.into_iter().find(|code| code.letter() == upper)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::A => "Agriculture, Forestry and Fishing",
            Self::B => "Mining",
            Self::C => "Manufacturing",
            Self::D => "Electricity, Gas, Water and Waste Services",
            Self::E => "Construction",
            Self::F => "Wholesale Trade",
            Self::G => "Retail Trade",
            Self::H => "Accommodation and Food Services",
            Self::I => "Transport, Postal and Warehousing",
            Self::J => "Information Media and Telecommunications",
            Self::K => "Financial and Insurance Services",
            Self::L => "Rental, Hiring and Real Estate Services",
            Self::M => "Professional, Scientific and Technical Services",
            Self::N => "Administrative and Support Services",
            Self::O => "Public Administration and Safety",
            Self::P => "Education and Training",
            Self::Q => "Health Care and Social Assistance",
            Self::R => "Arts and Recreation Services",
            Self::S => "Other Services",
            Self::X => "Cross-cutting (All Industries)",
            Self::U => "Unclassified",
        }
    }

    /// Display label such as `"Q: Health Care and Social Assistance"`.
    pub fn label(&self) -> String {
        format!("{}: {}", self.letter(), self.name())
    }

    /// True for the 19 real divisions, false for `X` and `U`.
    pub fn is_division(&self) -> bool {
        !matches!(self, Self::X | Self::U)
    }
}

impl fmt::Display for IndustryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn act_collection_is_primary() {
        assert_eq!(LegislationType::from_collection("act"), LegislationType::Primary);
        assert_eq!(LegislationType::from_collection("Act"), LegislationType::Primary);
        assert_eq!(LegislationType::from_collection(" ACT "), LegislationType::Primary);
    }

    #[test]
    fn everything_else_is_secondary() {
        for c in ["LegislativeInstrument", "NotifiableInstrument", "", "acts", "primary_legislation"] {
            assert_eq!(LegislationType::from_collection(c), LegislationType::Secondary, "{c:?}");
        }
    }

    #[test]
    fn letters_round_trip() {
        for code in IndustryCode::ALL {
            assert_eq!(IndustryCode::from_letter(code.letter()), Some(code));
        }
        assert_eq!(IndustryCode::from_letter('q'), Some(IndustryCode::Q));
        assert_eq!(IndustryCode::from_letter('Z'), None);
    }

    #[test]
    fn display_order_puts_x_and_u_last() {
        let mut codes = vec![IndustryCode::U, IndustryCode::Q, IndustryCode::X, IndustryCode::A];
        codes.sort();
        assert_eq!(
            codes,
            vec![IndustryCode::A, IndustryCode::Q, IndustryCode::X, IndustryCode::U]
        );
    }

    #[test]
    fn labels() {
        assert_eq!(IndustryCode::A.label(), "A: Agriculture, Forestry and Fishing");
        assert_eq!(IndustryCode::X.to_string(), "X");
        assert!(IndustryCode::S.is_division());
        assert!(!IndustryCode::U.is_division());
    }
}
