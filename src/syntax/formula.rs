//! The LTLf formula tree and its canonical textual form.

use std::fmt;

/// An LTLf formula.
///
/// Binary temporal and boolean operators are right-associative in the
/// concrete syntax; the canonical `Display` form inserts parentheses
/// wherever the tree shape would otherwise be lost on re-parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    True,
    False,
    Atom(String),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Equiv(Box<Formula>, Box<Formula>),
    Next(Box<Formula>),
    WeakNext(Box<Formula>),
    Until(Box<Formula>, Box<Formula>),
    Release(Box<Formula>, Box<Formula>),
    Eventually(Box<Formula>),
    Always(Box<Formula>),
}

impl Formula {
    /// Atom constructor, for convenience in tests and template tables.
    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(name.into())
    }

    /// Canonical textual representation.
    ///
    /// This string is the deterministic total order used for tie-breaks:
    /// equal-confidence formulas are always ordered by it, never by map
    /// iteration order.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// Binding strength; higher binds tighter.
    fn prec(&self) -> u8 {
        match self {
            Self::Equiv(..) => 1,
            Self::Implies(..) => 2,
            Self::Or(..) => 3,
            Self::And(..) => 4,
            Self::Until(..) | Self::Release(..) => 5,
            Self::Not(..) => 6,
            // Constants, atoms, and the function-style temporal unaries
            // carry their own delimiters.
            _ => 7,
        }
    }

    fn fmt_prec(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        let prec = self.prec();
        if prec < min {
            write!(f, "(")?;
        }
        match self {
            Self::True => write!(f, "true")?,
            Self::False => write!(f, "false")?,
            Self::Atom(name) => write!(f, "{}", name)?,
            Self::Not(inner) => {
                write!(f, "!")?;
                inner.fmt_prec(f, 6)?;
            }
            Self::And(lhs, rhs) => {
                lhs.fmt_prec(f, prec + 1)?;
                write!(f, " & ")?;
                rhs.fmt_prec(f, prec)?;
            }
            Self::Or(lhs, rhs) => {
                lhs.fmt_prec(f, prec + 1)?;
                write!(f, " | ")?;
                rhs.fmt_prec(f, prec)?;
            }
            Self::Implies(lhs, rhs) => {
                lhs.fmt_prec(f, prec + 1)?;
                write!(f, " -> ")?;
                rhs.fmt_prec(f, prec)?;
            }
            Self::Equiv(lhs, rhs) => {
                lhs.fmt_prec(f, prec + 1)?;
                write!(f, " <-> ")?;
                rhs.fmt_prec(f, prec)?;
            }
            Self::Until(lhs, rhs) => {
                lhs.fmt_prec(f, prec + 1)?;
                write!(f, " U ")?;
                rhs.fmt_prec(f, prec)?;
            }
            Self::Release(lhs, rhs) => {
                lhs.fmt_prec(f, prec + 1)?;
                write!(f, " R ")?;
                rhs.fmt_prec(f, prec)?;
            }
            Self::Next(inner) => {
                write!(f, "X(")?;
                inner.fmt_prec(f, 0)?;
                write!(f, ")")?;
            }
            Self::WeakNext(inner) => {
                write!(f, "WX(")?;
                inner.fmt_prec(f, 0)?;
                write!(f, ")")?;
            }
            Self::Eventually(inner) => {
                write!(f, "F(")?;
                inner.fmt_prec(f, 0)?;
                write!(f, ")")?;
            }
            Self::Always(inner) => {
                write!(f, "G(")?;
                inner.fmt_prec(f, 0)?;
                write!(f, ")")?;
            }
        }
        if prec < min {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_prec(f, 0)
    }
}
