//! Lattice types
//!
//! The closed set of types the inference engine works with. Types are ordered
//! by *wideness*: `Int` is the narrowest, the concrete non-integer types share
//! one middle rank and `Generic` is the widest. Inference may only ever move
//! a believed type downwards in this order.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Double,
    Bool,
    Char,

    Data(String),
    List(Box<Type>),

    /// A function as its *progression*: all parameter types in order,
    /// followed by the result type (always at least two entries)
    Function(Vec<Type>),

    /// A type about which nothing is known yet; the index ties it to the
    /// parameter position it was created for
    Generic(usize),
}

impl Type {
    /// Rank in the wideness order; lower is more specific. `Int` ranks below
    /// `Double` because an integer literal may later turn out to be used as
    /// a double, never the other way around.
    pub fn wideness(&self) -> u8 {
        match self {
            Type::Int => 1,
            Type::Generic(_) => 10,
            _ => 5,
        }
    }

    pub fn is_concrete(&self) -> bool {
        !matches!(self, Type::Generic(_))
    }

    /// The type remaining after one argument has been consumed; `None` if
    /// `self` cannot consume one
    pub fn apply(&self) -> Option<Type> {
        match self {
            Type::Function(progression) if progression.len() == 2 => Some(progression[1].clone()),
            Type::Function(progression) if progression.len() > 2 => {
                Some(Type::Function(progression[1..].to_vec()))
            }
            _ => None,
        }
    }

    /// The narrower of two believed types, preferring `self` on ties
    pub fn narrower(self, other: Type) -> Type {
        if other.wideness() < self.wideness() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "Int"),
            Type::Double => write!(f, "Double"),
            Type::Bool => write!(f, "Bool"),
            Type::Char => write!(f, "Char"),
            Type::Data(name) => write!(f, "{name}"),
            Type::List(inner) => write!(f, "[{inner}]"),
            Type::Function(progression) => {
                for (i, step) in progression.iter().enumerate() {
                    if i > 0 {
                        write!(f, " -> ")?;
                    }
                    if matches!(step, Type::Function(_)) {
                        write!(f, "({step})")?;
                    } else {
                        write!(f, "{step}")?;
                    }
                }
                Ok(())
            }
            Type::Generic(index) => write!(f, "t{index}"),
        }
    }
}
