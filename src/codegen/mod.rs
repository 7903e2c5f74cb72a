//! Code generation
//!
//! This module turns a [Module](crate::ast::Module) into Jasmin assembler
//! units, one per emitted class. The main interface is [compile].
//! Declarations are processed strictly in module order against one [Scope],
//! so a declaration only ever sees what was declared before it.

mod closure;
mod expression;

use miette::Diagnostic;
use thiserror::Error;
use tracing::info;

use crate::ast::{Declaration, Module};
use crate::infer::infer_function;
use crate::scope::UnknownIdentifier;
use crate::{InferError, Scope, Type};

/// Operand-stack slack added on top of the measured words of every method
pub(crate) const STACK_HEADROOM: u32 = 10;

#[derive(Debug, Error, Diagnostic)]
pub enum CodegenError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Unknown(#[from] UnknownIdentifier),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Infer(#[from] InferError),

    #[error("No instruction for the operator `{op}` on operands of type {ty}")]
    UnsupportedOperand { op: String, ty: Type },

    #[error("The operator `{op}` is applied to a {lhs} operand and a {rhs} operand")]
    #[diagnostic(help("Both operand types must agree; a type annotation can settle them"))]
    MixedOperands { op: String, lhs: Type, rhs: Type },

    #[error("The operand types of `{op}` stayed unresolved")]
    #[diagnostic(help("No evidence narrowed these operands; a type annotation can"))]
    UnresolvedOperands { op: String },

    #[error("The annotated type {ty} does not fit the declaration of `{name}`")]
    #[diagnostic(help(
        "`{name}` declares {params} parameters, so its annotation must be a function type with that many parameters"
    ))]
    AnnotationMismatch {
        name: String,
        params: usize,
        ty: Type,
    },
}

type Result<T> = std::result::Result<T, CodegenError>;

/// One emitted Jasmin classfile source: the file name the text is meant
/// for, e.g. `Main.j`, and the normalized assembler text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub name: String,
    pub text: String,
}

/// Compile a module into its Jasmin units: the closure classes in
/// declaration order, the module's entry class and the shared
/// `AbstractFunction` base class
pub fn compile(module: &Module) -> Result<Vec<Unit>> {
    let mut scope = Scope::new();
    let mut units = Vec::new();

    for declaration in &module.declarations {
        if let Some(unit) = closure::declare(declaration, &mut scope)? {
            info!("synthesized {}", unit.name);
            units.push(unit);
        }
    }

    // The module body is typed like any parameterless body before it is lowered.
    infer_function(&[], &module.body, &scope)?;

    scope.take_stack_words();
    let body = module.body.emit(&mut scope)?;
    let words = scope.take_stack_words();
    units.push(entry_unit(module.name.as_str(), &body, words));
    units.push(base_unit());

    info!("compiled module {} into {} units", module.name, units.len());
    Ok(units)
}

/// The effective type of every declared name, in declaration order
pub fn declaration_types(module: &Module) -> Result<Vec<(String, Type)>> {
    let mut scope = Scope::new();
    let mut report = Vec::new();
    for declaration in &module.declarations {
        closure::declare(declaration, &mut scope)?;
        match declaration {
            Declaration::Function(function) => {
                let ty = scope.lookup_type(function.name.as_str())?.clone();
                report.push((function.name.to_string(), ty));
            }
            Declaration::Data(data) => {
                for constructor in &data.constructors {
                    let ty = scope.lookup_type(constructor.as_str())?.clone();
                    report.push((constructor.to_string(), ty));
                }
            }
            Declaration::TypeAnnotation(_) => {}
        }
    }
    Ok(report)
}

/// The module's own class: `main` prints what the static `module` method
/// computes
fn entry_unit(name: &str, body: &str, words: u32) -> Unit {
    let text = format!(
        "\
.class public {name}
.super java/lang/Object

.method public static main([Ljava/lang/String;)V
    .limit stack 2
    .limit locals 1
    getstatic java/lang/System/out Ljava/io/PrintStream;
    invokestatic {name}/module()Ljava/lang/Object;
    invokevirtual java/io/PrintStream/println(Ljava/lang/Object;)V
    return
.end method

.method public static module()Ljava/lang/Object;
    .limit stack {limit}
    .limit locals 0
{body}
    areturn
.end method
",
        limit = words + STACK_HEADROOM,
    );
    Unit {
        name: format!("{name}.j"),
        text: tidy(&text),
    }
}

fn base_unit() -> Unit {
    let text = "\
.class public abstract AbstractFunction
.super java/lang/Object

.field public boundCount I
.field public remaining I

.method public <init>()V
    .limit stack 1
    .limit locals 1
    aload_0
    invokespecial java/lang/Object/<init>()V
    return
.end method

.method public abstract apply(Ljava/lang/Object;)Ljava/lang/Object;
.end method
";
    Unit {
        name: String::from("AbstractFunction.j"),
        text: tidy(text),
    }
}

/// Normalize emitted text: trim every line, drop blank ones
pub(crate) fn tidy(text: &str) -> String {
    let mut tidied = String::with_capacity(text.len());
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        tidied.push_str(line);
        tidied.push('\n');
    }
    tidied
}
