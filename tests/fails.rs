use funj::{
    BinaryOperation, Declaration, Expression, FunctionDeclaration, Ident, Module, TypeAnnotation,
    TypeExpr,
};

mod common;
use common::run_pipeline;

fn ident(name: &str) -> Ident {
    Ident::new(name).unwrap()
}

fn var(name: &str) -> Expression {
    Expression::var(ident(name))
}

fn double() -> TypeExpr {
    TypeExpr::named(ident("Double"))
}

fn mul_declaration() -> Declaration {
    Declaration::Function(FunctionDeclaration::new(
        ident("mul"),
        vec![ident("x"), ident("y")],
        Expression::binary(BinaryOperation::Mul, var("x"), var("y")),
    ))
}

#[test]
#[should_panic]
fn fail_unknown_identifier() {
    run_pipeline(Module::new(ident("Broken"), vec![], var("nope")));
}

#[test]
#[should_panic]
fn fail_parameters_stay_local() {
    // g tries to read f's parameter
    let f = FunctionDeclaration::new(
        ident("f"),
        vec![ident("x")],
        Expression::binary(BinaryOperation::Mul, var("x"), Expression::Int(3)),
    );
    let g = FunctionDeclaration::new(ident("g"), vec![], var("x"));
    run_pipeline(Module::new(
        ident("Broken"),
        vec![Declaration::Function(f), Declaration::Function(g)],
        Expression::Int(1),
    ));
}

#[test]
#[should_panic]
fn fail_argument_mismatch() {
    let annotation = TypeAnnotation::new(
        ident("mul"),
        TypeExpr::function(vec![double(), double()], double()),
    );
    run_pipeline(Module::new(
        ident("Broken"),
        vec![Declaration::TypeAnnotation(annotation), mul_declaration()],
        Expression::apply(var("mul"), Expression::Int(2)),
    ));
}

#[test]
#[should_panic]
fn fail_applying_a_value() {
    let x = FunctionDeclaration::new(ident("x"), vec![], Expression::Int(3));
    run_pipeline(Module::new(
        ident("Broken"),
        vec![Declaration::Function(x)],
        Expression::apply(var("x"), Expression::Int(1)),
    ));
}

#[test]
#[should_panic]
fn fail_mixed_operands() {
    run_pipeline(Module::new(
        ident("Broken"),
        vec![],
        Expression::binary(BinaryOperation::Add, Expression::Bool(true), Expression::Int(1)),
    ));
}

#[test]
#[should_panic]
fn fail_unresolved_operands() {
    // nothing ever narrows x or y, so no instruction template fits
    let f = FunctionDeclaration::new(
        ident("f"),
        vec![ident("x"), ident("y")],
        Expression::binary(BinaryOperation::Add, var("x"), var("y")),
    );
    run_pipeline(Module::new(
        ident("Broken"),
        vec![Declaration::Function(f)],
        Expression::Int(1),
    ));
}

#[test]
#[should_panic]
fn fail_arithmetic_on_booleans() {
    run_pipeline(Module::new(
        ident("Broken"),
        vec![],
        Expression::binary(
            BinaryOperation::Add,
            Expression::Bool(true),
            Expression::Bool(false),
        ),
    ));
}

#[test]
#[should_panic]
fn fail_ordering_characters() {
    run_pipeline(Module::new(
        ident("Broken"),
        vec![],
        Expression::binary(
            BinaryOperation::Less,
            Expression::char_lit('a').unwrap(),
            Expression::char_lit('b').unwrap(),
        ),
    ));
}

#[test]
#[should_panic]
fn fail_annotation_shape() {
    // a bare Double cannot type a two-parameter declaration
    let annotation = TypeAnnotation::new(ident("mul"), double());
    run_pipeline(Module::new(
        ident("Broken"),
        vec![Declaration::TypeAnnotation(annotation), mul_declaration()],
        Expression::Int(1),
    ));
}

#[test]
#[should_panic]
fn fail_annotation_arity() {
    // one parameter annotated, two declared
    let annotation = TypeAnnotation::new(
        ident("mul"),
        TypeExpr::function(vec![double()], double()),
    );
    run_pipeline(Module::new(
        ident("Broken"),
        vec![Declaration::TypeAnnotation(annotation), mul_declaration()],
        Expression::Int(1),
    ));
}
