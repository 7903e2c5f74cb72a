//! Type inference
//!
//! Per-declaration fixpoint inference. Every parameter starts as a `Generic`
//! belief; discovery passes walk the body and record evidence, and a record
//! only sticks when it is strictly narrower (in wideness) than the current
//! belief. Since every believed type can only move down a finite order, the
//! passes reach a fixpoint. The main interface is [infer_function], which
//! returns the declaration's progression.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::ast::{BinaryOperation, Expression, Ident, UnaryOperation};
use crate::{Scope, Type};

#[derive(Debug, Error, Diagnostic)]
pub enum InferError {
    #[error("The function `{function}` expects an argument of type {expected} but got {found}")]
    #[diagnostic(help("An explicit type annotation can fix a declaration's intended types"))]
    ArgumentMismatch {
        function: String,
        expected: Type,
        found: Type,
    },

    #[error("`{function}` has type {found} and cannot be applied to an argument")]
    NotAFunction { function: String, found: Type },
}

type Result<T> = std::result::Result<T, InferError>;

/// Infer the progression of the declaration `f p1 .. pn = body`: one type
/// per parameter followed by the body's type. Parameters that no evidence
/// narrowed stay `Generic`.
pub fn infer_function(params: &[Ident], body: &Expression, scope: &Scope) -> Result<Vec<Type>> {
    let mut evidence = Evidence::new(params.len());
    for (index, param) in params.iter().enumerate() {
        evidence.record_binding(param.as_str(), Type::Generic(index));
    }

    let mut passes = 0;
    let mut body_type;
    loop {
        evidence.modified = false;
        body_type = discover(body, scope, &mut evidence)?;
        passes += 1;
        if !evidence.modified {
            break;
        }
    }
    debug!("inference settled after {passes} passes");

    let mut progression = Vec::with_capacity(params.len() + 1);
    for param in params {
        let ty = evidence
            .bindings
            .get(param.as_str())
            .expect("parameter beliefs are seeded before discovery");
        progression.push(ty.clone());
    }
    progression.push(body_type);
    Ok(progression)
}

/// Evidence key for one sub-expression occurrence, keyed by node address so
/// two structurally equal literals in different places stay independent
#[derive(Debug, Clone, Copy)]
struct Occurrence<'t>(&'t Expression);

impl PartialEq for Occurrence<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for Occurrence<'_> {}

impl Hash for Occurrence<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.0, state);
    }
}

/// Everything believed so far about one declaration body. Identifier nodes
/// share their evidence through `bindings`; every other node is keyed by its
/// occurrence.
struct Evidence<'t> {
    bindings: HashMap<&'t str, Type>,
    occurrences: HashMap<Occurrence<'t>, Type>,
    unknown: usize,
    modified: bool,
}

impl<'t> Evidence<'t> {
    fn new(unknown: usize) -> Self {
        Self {
            bindings: HashMap::new(),
            occurrences: HashMap::new(),
            unknown,
            modified: false,
        }
    }

    fn record(&mut self, expr: &'t Expression, ty: Type) {
        match expr {
            Expression::Var(name) => self.record_binding(name.as_str(), ty),
            _ => match self.occurrences.entry(Occurrence(expr)) {
                Entry::Vacant(vacant) => {
                    vacant.insert(ty);
                    self.modified = true;
                }
                Entry::Occupied(mut occupied) => {
                    if ty.wideness() < occupied.get().wideness() {
                        occupied.insert(ty);
                        self.modified = true;
                    }
                }
            },
        }
    }

    fn record_binding(&mut self, name: &'t str, ty: Type) {
        match self.bindings.entry(name) {
            Entry::Vacant(vacant) => {
                vacant.insert(ty);
                self.modified = true;
            }
            Entry::Occupied(mut occupied) => {
                if ty.wideness() < occupied.get().wideness() {
                    occupied.insert(ty);
                    self.modified = true;
                }
            }
        }
    }

    fn believed(&self, expr: &'t Expression) -> Type {
        let known = match expr {
            Expression::Var(name) => self.bindings.get(name.as_str()),
            _ => self.occurrences.get(&Occurrence(expr)),
        };
        known.cloned().unwrap_or(Type::Generic(self.unknown))
    }
}

/// One post-order pass, recording evidence and returning the node's
/// believed type afterwards
fn discover<'t>(
    expr: &'t Expression,
    scope: &Scope,
    evidence: &mut Evidence<'t>,
) -> Result<Type> {
    match expr {
        Expression::Int(_) => {
            evidence.record(expr, Type::Int);
            Ok(Type::Int)
        }
        Expression::Double(_) => {
            evidence.record(expr, Type::Double);
            Ok(Type::Double)
        }
        Expression::Bool(_) => {
            evidence.record(expr, Type::Bool);
            Ok(Type::Bool)
        }
        Expression::Char(_) => {
            evidence.record(expr, Type::Char);
            Ok(Type::Char)
        }

        Expression::Var(name) => {
            if !evidence.bindings.contains_key(name.as_str()) {
                if let Ok(ty) = scope.lookup_type(name.as_str()) {
                    let ty = ty.clone();
                    evidence.record_binding(name.as_str(), ty);
                }
            }
            Ok(evidence.believed(expr))
        }

        Expression::Unary { op, inner } => {
            discover(inner, scope, evidence)?;
            let (operand, result) = match op {
                UnaryOperation::Not => (Type::Bool, Type::Bool),
                UnaryOperation::Ord => (Type::Char, Type::Int),
                UnaryOperation::Chr => (Type::Int, Type::Char),
            };
            evidence.record(inner, operand);
            evidence.record(expr, result);
            Ok(evidence.believed(expr))
        }

        Expression::Binary { op, lhs, rhs } => {
            let lhs_type = discover(lhs, scope, evidence)?;
            discover(rhs, scope, evidence)?;
            match op {
                // the left operand's belief spreads to the right and to
                // the whole operation
                BinaryOperation::Add
                | BinaryOperation::Sub
                | BinaryOperation::Mul
                | BinaryOperation::Div => {
                    evidence.record(rhs, lhs_type.clone());
                    evidence.record(expr, lhs_type);
                }
                BinaryOperation::Equals | BinaryOperation::Less | BinaryOperation::LessEq => {
                    evidence.record(expr, Type::Bool);
                }
            }
            Ok(evidence.believed(expr))
        }

        Expression::Apply { function, argument } => {
            let callee = discover(function, scope, evidence)?;
            let arg_type = discover(argument, scope, evidence)?;
            match &callee {
                Type::Function(progression) => {
                    if let Some(param) = progression.first() {
                        if param.is_concrete() {
                            if arg_type.is_concrete() {
                                if arg_type != *param {
                                    return Err(InferError::ArgumentMismatch {
                                        function: describe(function),
                                        expected: param.clone(),
                                        found: arg_type,
                                    });
                                }
                            } else {
                                evidence.record(argument, param.clone());
                            }
                        }
                    }
                    if let Some(result) = callee.apply() {
                        evidence.record(expr, result);
                    }
                    Ok(evidence.believed(expr))
                }
                other if other.is_concrete() => Err(InferError::NotAFunction {
                    function: describe(function),
                    found: other.clone(),
                }),
                _ => Ok(evidence.believed(expr)),
            }
        }

        Expression::List(elements) => {
            for element in elements {
                discover(element, scope, evidence)?;
            }
            Ok(evidence.believed(expr))
        }

        Expression::Annotated { inner, ty } => {
            discover(inner, scope, evidence)?;
            let annotated = ty.resolve();
            evidence.record(inner, annotated.clone());
            evidence.record(expr, annotated);
            Ok(evidence.believed(expr))
        }
    }
}

pub(crate) fn describe(expr: &Expression) -> String {
    match expr {
        Expression::Var(name) => name.to_string(),
        Expression::Apply { function, .. } => describe(function),
        _ => String::from("this expression"),
    }
}
