mod ast;
mod codegen;
mod infer;
mod scope;
mod types;

pub mod samples;

pub use ast::{
    AstError, BinaryOperation, DataDeclaration, Declaration, Expression, FunctionDeclaration,
    Ident, Module, TypeAnnotation, TypeExpr, UnaryOperation,
};
pub use codegen::{compile, declaration_types, CodegenError, Unit};
pub use infer::{infer_function, InferError};
pub use scope::{Scope, UnknownIdentifier};
pub use types::Type;
