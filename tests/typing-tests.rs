use funj::{
    declaration_types, infer_function, samples, BinaryOperation, Expression, Ident, InferError,
    Scope, Type, TypeExpr, UnaryOperation,
};

fn ident(name: &str) -> Ident {
    Ident::new(name).unwrap()
}

fn var(name: &str) -> Expression {
    Expression::var(ident(name))
}

#[test]
fn literal_bodies() {
    let scope = Scope::new();
    let progression = infer_function(&[], &Expression::Int(42), &scope).unwrap();
    assert_eq!(progression, vec![Type::Int]);
    let progression = infer_function(&[], &Expression::Double(1.5), &scope).unwrap();
    assert_eq!(progression, vec![Type::Double]);
    let progression = infer_function(&[], &Expression::Bool(true), &scope).unwrap();
    assert_eq!(progression, vec![Type::Bool]);
}

#[test]
fn parameters_without_evidence_stay_generic() {
    // triple x = x * 3
    let scope = Scope::new();
    let params = [ident("x")];
    let body = Expression::binary(BinaryOperation::Mul, var("x"), Expression::Int(3));
    let progression = infer_function(&params, &body, &scope).unwrap();
    assert_eq!(progression, vec![Type::Generic(0), Type::Generic(0)]);
}

#[test]
fn unary_operations_pin_their_operands() {
    // shift c = ord c
    let scope = Scope::new();
    let params = [ident("c")];
    let body = Expression::unary(UnaryOperation::Ord, var("c"));
    let progression = infer_function(&params, &body, &scope).unwrap();
    assert_eq!(progression, vec![Type::Char, Type::Int]);

    // wrap c = chr (ord c)
    let body = Expression::unary(
        UnaryOperation::Chr,
        Expression::unary(UnaryOperation::Ord, var("c")),
    );
    let progression = infer_function(&params, &body, &scope).unwrap();
    assert_eq!(progression, vec![Type::Char, Type::Char]);
}

#[test]
fn arithmetic_spreads_the_left_belief() {
    // f x y = x * y: both parameters end up sharing the body's unknown
    let scope = Scope::new();
    let params = [ident("x"), ident("y")];
    let body = Expression::binary(BinaryOperation::Mul, var("x"), var("y"));
    let progression = infer_function(&params, &body, &scope).unwrap();
    assert_eq!(
        progression,
        vec![Type::Generic(0), Type::Generic(1), Type::Generic(0)]
    );
}

#[test]
fn comparisons_produce_booleans() {
    let scope = Scope::new();
    let params = [ident("x")];
    let body = Expression::binary(BinaryOperation::Less, var("x"), Expression::Int(3));
    let progression = infer_function(&params, &body, &scope).unwrap();
    assert_eq!(progression, vec![Type::Generic(0), Type::Bool]);
}

#[test]
fn annotated_expressions_are_evidence() {
    // f x = (x :: Int) + 1
    let scope = Scope::new();
    let params = [ident("x")];
    let body = Expression::binary(
        BinaryOperation::Add,
        Expression::annotated(var("x"), TypeExpr::named(ident("Int"))),
        Expression::Int(1),
    );
    let progression = infer_function(&params, &body, &scope).unwrap();
    assert_eq!(progression, vec![Type::Int, Type::Int]);
}

#[test]
fn earlier_declarations_are_evidence() {
    let mut scope = Scope::new();
    scope.bind_type("y", Type::Int, false);
    let body = Expression::binary(BinaryOperation::Add, var("y"), Expression::Int(1));
    let progression = infer_function(&[], &body, &scope).unwrap();
    assert_eq!(progression, vec![Type::Int]);
}

#[test]
fn applications_narrow_generic_arguments() {
    // f x = mul x 3.0 against an annotated mul
    let mut scope = Scope::new();
    scope.bind_type(
        "mul",
        Type::Function(vec![Type::Double, Type::Double, Type::Double]),
        true,
    );
    let params = [ident("x")];
    let body = Expression::apply(
        Expression::apply(var("mul"), var("x")),
        Expression::Double(3.0),
    );
    let progression = infer_function(&params, &body, &scope).unwrap();
    assert_eq!(progression, vec![Type::Double, Type::Double]);
}

#[test]
fn application_mismatch_is_an_error() {
    let mut scope = Scope::new();
    scope.bind_type(
        "mul",
        Type::Function(vec![Type::Double, Type::Double, Type::Double]),
        true,
    );
    let body = Expression::apply(var("mul"), Expression::Int(2));
    let err = infer_function(&[], &body, &scope).unwrap_err();
    match err {
        InferError::ArgumentMismatch {
            function,
            expected,
            found,
        } => {
            assert_eq!(function, "mul");
            assert_eq!(expected, Type::Double);
            assert_eq!(found, Type::Int);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn applying_a_value_is_an_error() {
    let mut scope = Scope::new();
    scope.bind_type("x", Type::Int, true);
    let body = Expression::apply(var("x"), Expression::Int(1));
    let err = infer_function(&[], &body, &scope).unwrap_err();
    assert!(matches!(err, InferError::NotAFunction { .. }));
}

#[test]
fn inference_is_idempotent() {
    // f x y = (x * y) + 1
    let scope = Scope::new();
    let params = [ident("x"), ident("y")];
    let body = Expression::binary(
        BinaryOperation::Add,
        Expression::binary(BinaryOperation::Mul, var("x"), var("y")),
        Expression::Int(1),
    );
    let first = infer_function(&params, &body, &scope).unwrap();
    let second = infer_function(&params, &body, &scope).unwrap();
    assert_eq!(first, second);
}

#[test]
fn declaration_report_annotation_wins() {
    let module = samples::curried().unwrap();
    let report = declaration_types(&module).unwrap();
    assert_eq!(
        report,
        vec![(
            String::from("mul"),
            Type::Function(vec![Type::Double, Type::Double, Type::Double]),
        )]
    );
}

#[test]
fn declaration_report_constructors() {
    let module = samples::colors().unwrap();
    let report = declaration_types(&module).unwrap();
    let color = Type::Data(String::from("Color"));
    assert_eq!(
        report,
        vec![
            (String::from("Red"), color.clone()),
            (String::from("Green"), color.clone()),
            (String::from("Blue"), color),
        ]
    );
}

#[test]
fn declaration_report_inferred() {
    let report = declaration_types(&samples::inlined().unwrap()).unwrap();
    assert_eq!(report, vec![(String::from("x"), Type::Int)]);

    let report = declaration_types(&samples::triples().unwrap()).unwrap();
    assert_eq!(
        report,
        vec![(
            String::from("triple"),
            Type::Function(vec![Type::Generic(0), Type::Generic(0)]),
        )]
    );
}
