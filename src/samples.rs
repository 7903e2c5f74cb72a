//! Built-in sample modules
//!
//! Small demonstration programs constructed through the builder API, shared
//! by the CLI and the test suite. Input normally arrives from a front end as
//! a finished tree, so these stand in for source files. Each function builds
//! a fresh tree.

use crate::ast::{
    BinaryOperation, DataDeclaration, Declaration, Expression, FunctionDeclaration, Ident, Module,
    TypeAnnotation, TypeExpr, UnaryOperation,
};
use crate::AstError;

type Result<T> = std::result::Result<T, AstError>;

/// `module Answer = 42`
pub fn answer() -> Result<Module> {
    Ok(Module::new(
        Ident::new("Answer")?,
        vec![],
        Expression::Int(42),
    ))
}

/// `module Inlined = x` with `x = 3`: a zero-parameter declaration,
/// inlined at its use site
pub fn inlined() -> Result<Module> {
    let x = Ident::new("x")?;
    Ok(Module::new(
        Ident::new("Inlined")?,
        vec![Declaration::Function(FunctionDeclaration::new(
            x.clone(),
            vec![],
            Expression::Int(3),
        ))],
        Expression::var(x),
    ))
}

/// `module Arithmetic = 3 * 2 + 1`
pub fn arithmetic() -> Result<Module> {
    Ok(Module::new(
        Ident::new("Arithmetic")?,
        vec![],
        Expression::binary(
            BinaryOperation::Add,
            Expression::binary(BinaryOperation::Mul, Expression::Int(3), Expression::Int(2)),
            Expression::Int(1),
        ),
    ))
}

/// `module Doubles = 3.0 * 7.0 + 3.5`
pub fn doubles() -> Result<Module> {
    Ok(Module::new(
        Ident::new("Doubles")?,
        vec![],
        Expression::binary(
            BinaryOperation::Add,
            Expression::binary(
                BinaryOperation::Mul,
                Expression::Double(3.0),
                Expression::Double(7.0),
            ),
            Expression::Double(3.5),
        ),
    ))
}

/// `module Booleans = not false == true`
pub fn booleans() -> Result<Module> {
    Ok(Module::new(
        Ident::new("Booleans")?,
        vec![],
        Expression::binary(
            BinaryOperation::Equals,
            Expression::unary(UnaryOperation::Not, Expression::Bool(false)),
            Expression::Bool(true),
        ),
    ))
}

/// `module Characters = chr (ord 'a' + 1)`
pub fn characters() -> Result<Module> {
    Ok(Module::new(
        Ident::new("Characters")?,
        vec![],
        Expression::unary(
            UnaryOperation::Chr,
            Expression::binary(
                BinaryOperation::Add,
                Expression::unary(UnaryOperation::Ord, Expression::char_lit('a')?),
                Expression::Int(1),
            ),
        ),
    ))
}

/// `module Triples = triple 2` with `triple x = x * 3`: single-parameter
/// currying without any annotation
pub fn triples() -> Result<Module> {
    let triple = Ident::new("triple")?;
    let x = Ident::new("x")?;
    Ok(Module::new(
        Ident::new("Triples")?,
        vec![Declaration::Function(FunctionDeclaration::new(
            triple.clone(),
            vec![x.clone()],
            Expression::binary(BinaryOperation::Mul, Expression::var(x), Expression::Int(3)),
        ))],
        Expression::apply(Expression::var(triple), Expression::Int(2)),
    ))
}

/// `module Curried = mul 2.0 5.0` with an annotated two-parameter `mul`
pub fn curried() -> Result<Module> {
    let (annotation, declaration, mul) = annotated_mul()?;
    Ok(Module::new(
        Ident::new("Curried")?,
        vec![
            Declaration::TypeAnnotation(annotation),
            Declaration::Function(declaration),
        ],
        Expression::apply(
            Expression::apply(Expression::var(mul), Expression::Double(2.0)),
            Expression::Double(5.0),
        ),
    ))
}

/// `module Partial = mul 2.0`: one argument short, so the module's value is
/// a closure and the program prints its rendering
pub fn partial() -> Result<Module> {
    let (annotation, declaration, mul) = annotated_mul()?;
    Ok(Module::new(
        Ident::new("Partial")?,
        vec![
            Declaration::TypeAnnotation(annotation),
            Declaration::Function(declaration),
        ],
        Expression::apply(Expression::var(mul), Expression::Double(2.0)),
    ))
}

/// `module Colors = Red == Blue` with `data Color = Red | Green | Blue`
pub fn colors() -> Result<Module> {
    let red = Ident::new("Red")?;
    let blue = Ident::new("Blue")?;
    let data = DataDeclaration::new(
        Ident::new("Color")?,
        vec![red.clone(), Ident::new("Green")?, blue.clone()],
    )?;
    Ok(Module::new(
        Ident::new("Colors")?,
        vec![Declaration::Data(data)],
        Expression::binary(
            BinaryOperation::Equals,
            Expression::var(red),
            Expression::var(blue),
        ),
    ))
}

/// `module Matching = Red == Red`: both sides reference the same constructor
pub fn matching() -> Result<Module> {
    let red = Ident::new("Red")?;
    let data = DataDeclaration::new(
        Ident::new("Color")?,
        vec![red.clone(), Ident::new("Green")?, Ident::new("Blue")?],
    )?;
    Ok(Module::new(
        Ident::new("Matching")?,
        vec![Declaration::Data(data)],
        Expression::binary(
            BinaryOperation::Equals,
            Expression::var(red.clone()),
            Expression::var(red),
        ),
    ))
}

/// `module Listing = [1, 2 + 3, 4]`
pub fn listing() -> Result<Module> {
    Ok(Module::new(
        Ident::new("Listing")?,
        vec![],
        Expression::list(vec![
            Expression::Int(1),
            Expression::binary(BinaryOperation::Add, Expression::Int(2), Expression::Int(3)),
            Expression::Int(4),
        ])?,
    ))
}

/// `mul :: Double -> Double -> Double` and `mul x y = x * y`
fn annotated_mul() -> Result<(TypeAnnotation, FunctionDeclaration, Ident)> {
    let mul = Ident::new("mul")?;
    let x = Ident::new("x")?;
    let y = Ident::new("y")?;
    let double = Ident::new("Double")?;

    let annotation = TypeAnnotation::new(
        mul.clone(),
        TypeExpr::function(
            vec![
                TypeExpr::named(double.clone()),
                TypeExpr::named(double.clone()),
            ],
            TypeExpr::named(double),
        ),
    );
    let declaration = FunctionDeclaration::new(
        mul.clone(),
        vec![x.clone(), y.clone()],
        Expression::binary(BinaryOperation::Mul, Expression::var(x), Expression::var(y)),
    );
    Ok((annotation, declaration, mul))
}
