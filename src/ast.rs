//! Syntax tree
//!
//! The node model a front end hands to this crate. Nodes are built through
//! validating constructors, so a tree that exists is structurally sound:
//! identifiers are lexically valid, character literals are printable and the
//! variable-arity nodes hold at least one child.

use miette::Diagnostic;
use thiserror::Error;

use crate::Type;

#[derive(Debug, Error, Diagnostic)]
pub enum AstError {
    #[error("Invalid identifier: `{name}`")]
    #[diagnostic(help(
        "Identifiers start with a letter and continue with letters, digits or underscores"
    ))]
    InvalidIdentifier { name: String },

    #[error("Unsupported character literal: {value:?}")]
    #[diagnostic(help("Character literals are limited to printable ASCII"))]
    UnprintableChar { value: char },

    #[error("A list literal needs at least one element")]
    EmptyList,

    #[error("The data type `{name}` has no constructors")]
    #[diagnostic(help("Every data type declares at least one constructor"))]
    NoConstructors { name: String },
}

/// A validated identifier; declaration names, parameters and constructors
/// all use this
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    pub fn new(name: impl Into<String>) -> Result<Self, AstError> {
        let name = name.into();
        let mut chars = name.chars();
        let head = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        if head && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            Ok(Self(name))
        } else {
            Err(AstError::InvalidIdentifier { name })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A whole compilation unit: declarations in dependency order, then the
/// module body expression whose value the compiled program prints
#[derive(Debug, Clone)]
pub struct Module {
    pub name: Ident,
    pub declarations: Vec<Declaration>,
    pub body: Expression,
}

impl Module {
    pub fn new(name: Ident, declarations: Vec<Declaration>, body: Expression) -> Self {
        Self {
            name,
            declarations,
            body,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Declaration {
    Function(FunctionDeclaration),
    Data(DataDeclaration),
    TypeAnnotation(TypeAnnotation),
}

#[derive(Debug, Clone)]
pub struct FunctionDeclaration {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Expression,
}

impl FunctionDeclaration {
    pub fn new(name: Ident, params: Vec<Ident>, body: Expression) -> Self {
        Self { name, params, body }
    }
}

#[derive(Debug, Clone)]
pub struct DataDeclaration {
    pub name: Ident,
    pub constructors: Vec<Ident>,
}

impl DataDeclaration {
    pub fn new(name: Ident, constructors: Vec<Ident>) -> Result<Self, AstError> {
        if constructors.is_empty() {
            return Err(AstError::NoConstructors {
                name: name.as_str().to_string(),
            });
        }
        Ok(Self { name, constructors })
    }
}

/// `name :: type`, fixing the type of a later declaration
#[derive(Debug, Clone)]
pub struct TypeAnnotation {
    pub name: Ident,
    pub ty: TypeExpr,
}

impl TypeAnnotation {
    pub fn new(name: Ident, ty: TypeExpr) -> Self {
        Self { name, ty }
    }
}

/// A type as written in an annotation, before resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Named(Ident),
    List(Box<TypeExpr>),
    Function {
        parameter: Box<TypeExpr>,
        result: Box<TypeExpr>,
    },
}

impl TypeExpr {
    pub fn named(name: Ident) -> Self {
        Self::Named(name)
    }

    pub fn list(inner: TypeExpr) -> Self {
        Self::List(Box::new(inner))
    }

    /// Build the right-nested chain `p1 -> p2 -> ... -> result`
    pub fn function(parameters: Vec<TypeExpr>, result: TypeExpr) -> Self {
        parameters
            .into_iter()
            .rev()
            .fold(result, |result, parameter| Self::Function {
                parameter: Box::new(parameter),
                result: Box::new(result),
            })
    }

    /// The four primitive names map to their lattice types, any other name
    /// becomes a data type; function chains flatten into one progression
    pub fn resolve(&self) -> Type {
        match self {
            TypeExpr::Named(name) => match name.as_str() {
                "Int" => Type::Int,
                "Double" => Type::Double,
                "Bool" => Type::Bool,
                "Char" => Type::Char,
                other => Type::Data(other.to_string()),
            },
            TypeExpr::List(inner) => Type::List(Box::new(inner.resolve())),
            TypeExpr::Function { parameter, result } => {
                let mut progression = vec![parameter.resolve()];
                let mut rest = result.as_ref();
                while let TypeExpr::Function { parameter, result } = rest {
                    progression.push(parameter.resolve());
                    rest = result.as_ref();
                }
                progression.push(rest.resolve());
                Type::Function(progression)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Int(i32),
    Double(f64),
    Bool(bool),
    Char(char),
    Var(Ident),

    Unary {
        op: UnaryOperation,
        inner: Box<Expression>,
    },

    Binary {
        op: BinaryOperation,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },

    /// One curried application step: `function` applied to one `argument`
    Apply {
        function: Box<Expression>,
        argument: Box<Expression>,
    },

    List(Vec<Expression>),

    Annotated {
        inner: Box<Expression>,
        ty: TypeExpr,
    },
}

impl Expression {
    pub fn var(name: Ident) -> Self {
        Self::Var(name)
    }

    pub fn char_lit(value: char) -> Result<Self, AstError> {
        if value.is_ascii_graphic() || value == ' ' {
            Ok(Self::Char(value))
        } else {
            Err(AstError::UnprintableChar { value })
        }
    }

    pub fn list(elements: Vec<Expression>) -> Result<Self, AstError> {
        if elements.is_empty() {
            return Err(AstError::EmptyList);
        }
        Ok(Self::List(elements))
    }

    pub fn unary(op: UnaryOperation, inner: Expression) -> Self {
        Self::Unary {
            op,
            inner: Box::new(inner),
        }
    }

    pub fn binary(op: BinaryOperation, lhs: Expression, rhs: Expression) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn apply(function: Expression, argument: Expression) -> Self {
        Self::Apply {
            function: Box::new(function),
            argument: Box::new(argument),
        }
    }

    pub fn annotated(inner: Expression, ty: TypeExpr) -> Self {
        Self::Annotated {
            inner: Box::new(inner),
            ty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperation {
    Not,
    Ord,
    Chr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperation {
    Add,
    Sub,
    Mul,
    Div,
    Equals,
    Less,
    LessEq,
}

use ptree::{print_tree, Style, TreeItem};
use std::borrow::Cow;
use std::{fmt, io};

impl Module {
    pub fn pretty_print(&self) -> io::Result<()> {
        println!("module {}", self.name);
        for declaration in &self.declarations {
            match declaration {
                Declaration::Function(function) => print_tree(function)?,
                Declaration::Data(data) => {
                    let constructors: Vec<&str> =
                        data.constructors.iter().map(Ident::as_str).collect();
                    println!("data {} = {}", data.name, constructors.join(" | "));
                }
                Declaration::TypeAnnotation(annotation) => {
                    println!("{} :: {}", annotation.name, annotation.ty.resolve());
                }
            }
        }
        print_tree(&self.body)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for UnaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperation::Not => write!(f, "not"),
            UnaryOperation::Ord => write!(f, "ord"),
            UnaryOperation::Chr => write!(f, "chr"),
        }
    }
}

impl fmt::Display for BinaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperation::Add => write!(f, "+"),
            BinaryOperation::Sub => write!(f, "-"),
            BinaryOperation::Mul => write!(f, "*"),
            BinaryOperation::Div => write!(f, "/"),
            BinaryOperation::Equals => write!(f, "=="),
            BinaryOperation::Less => write!(f, "<"),
            BinaryOperation::LessEq => write!(f, "<="),
        }
    }
}

impl TreeItem for FunctionDeclaration {
    type Child = Expression;

    fn write_self<W: io::Write>(&self, f: &mut W, style: &Style) -> io::Result<()> {
        let mut header = self.name.to_string();
        for param in &self.params {
            header.push(' ');
            header.push_str(param.as_str());
        }
        write!(f, "{}", style.paint(header))
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(vec![self.body.clone()])
    }
}

impl TreeItem for Expression {
    type Child = Self;

    fn write_self<W: io::Write>(&self, f: &mut W, style: &Style) -> io::Result<()> {
        match self {
            Expression::Int(i) => write!(f, "{}", style.paint(i)),
            Expression::Double(x) => write!(f, "{}", style.paint(format!("{x:?}"))),
            Expression::Bool(b) => write!(f, "{}", style.paint(b)),
            Expression::Char(c) => write!(f, "{}", style.paint(format!("{c:?}"))),
            Expression::Var(x) => write!(f, "{}", style.paint(x)),
            Expression::Unary { op, .. } => write!(f, "{}", style.paint(op)),
            Expression::Binary { op, .. } => write!(f, "{}", style.paint(op)),
            Expression::Apply { .. } => write!(f, "{}", style.paint("APPLY")),
            Expression::List(_) => write!(f, "{}", style.paint("LIST")),
            Expression::Annotated { ty, .. } => {
                write!(f, "{}", style.paint(format!(":: {}", ty.resolve())))
            }
        }
    }

    fn children(&self) -> Cow<[Self::Child]> {
        match self {
            Expression::Int(_)
            | Expression::Double(_)
            | Expression::Bool(_)
            | Expression::Char(_)
            | Expression::Var(_) => Cow::from(vec![]),
            Expression::Unary { inner, .. } => Cow::from(vec![inner.as_ref().clone()]),
            Expression::Binary { lhs, rhs, .. } => {
                Cow::from(vec![lhs.as_ref().clone(), rhs.as_ref().clone()])
            }
            Expression::Apply { function, argument } => {
                Cow::from(vec![function.as_ref().clone(), argument.as_ref().clone()])
            }
            Expression::List(elements) => Cow::from(elements.clone()),
            Expression::Annotated { inner, .. } => Cow::from(vec![inner.as_ref().clone()]),
        }
    }
}
