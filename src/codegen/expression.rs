//! Expression emission
//!
//! Jasmin instruction text for every expression form. All values live on the
//! operand stack as boxed objects; an operator unboxes each operand right
//! after evaluating it, works on primitives and re-boxes its result. The
//! instruction template of an operator is chosen by the operands' *resolved*
//! types, recomputed from the scope's registered types.

use crate::ast::{BinaryOperation, Expression, UnaryOperation};
use crate::codegen::CodegenError;
use crate::infer::describe;
use crate::{InferError, Scope, Type};

type Result<T> = std::result::Result<T, CodegenError>;

pub(crate) const BOX_INT: &str = "invokestatic java/lang/Integer/valueOf(I)Ljava/lang/Integer;\n";
pub(crate) const BOX_DOUBLE: &str =
    "invokestatic java/lang/Double/valueOf(D)Ljava/lang/Double;\n";
pub(crate) const BOX_BOOL: &str =
    "invokestatic java/lang/Boolean/valueOf(Z)Ljava/lang/Boolean;\n";
pub(crate) const BOX_CHAR: &str =
    "invokestatic java/lang/Character/valueOf(C)Ljava/lang/Character;\n";

const UNBOX_INT: &str = "checkcast java/lang/Integer\ninvokevirtual java/lang/Integer/intValue()I\n";
const UNBOX_DOUBLE: &str =
    "checkcast java/lang/Double\ninvokevirtual java/lang/Double/doubleValue()D\n";
const UNBOX_BOOL: &str =
    "checkcast java/lang/Boolean\ninvokevirtual java/lang/Boolean/booleanValue()Z\n";
const UNBOX_CHAR: &str =
    "checkcast java/lang/Character\ninvokevirtual java/lang/Character/charValue()C\n";

impl Expression {
    /// The type this expression has at its place of use. Unlike inference
    /// this never learns anything; an expression without enough registered
    /// context resolves to `Generic`.
    pub(crate) fn resolved_type(&self, scope: &Scope) -> Result<Type> {
        match self {
            Expression::Int(_) => Ok(Type::Int),
            Expression::Double(_) => Ok(Type::Double),
            Expression::Bool(_) => Ok(Type::Bool),
            Expression::Char(_) => Ok(Type::Char),
            Expression::Var(name) => Ok(scope.lookup_type(name.as_str())?.clone()),
            Expression::Unary { op, .. } => Ok(match op {
                UnaryOperation::Not => Type::Bool,
                UnaryOperation::Ord => Type::Int,
                UnaryOperation::Chr => Type::Char,
            }),
            Expression::Binary { op, lhs, rhs } => match op {
                BinaryOperation::Equals | BinaryOperation::Less | BinaryOperation::LessEq => {
                    Ok(Type::Bool)
                }
                _ => {
                    let lhs_type = lhs.resolved_type(scope)?;
                    let rhs_type = rhs.resolved_type(scope)?;
                    Ok(lhs_type.narrower(rhs_type))
                }
            },
            Expression::Apply { function, .. } => {
                let callee = function.resolved_type(scope)?;
                match callee.apply() {
                    Some(result) => Ok(result),
                    None if callee.is_concrete() => Err(InferError::NotAFunction {
                        function: describe(function),
                        found: callee,
                    }
                    .into()),
                    None => Ok(Type::Generic(0)),
                }
            }
            Expression::List(elements) => {
                let mut element_type = Type::Generic(0);
                for element in elements {
                    element_type = element_type.narrower(element.resolved_type(scope)?);
                }
                Ok(Type::List(Box::new(element_type)))
            }
            Expression::Annotated { ty, .. } => Ok(ty.resolve()),
        }
    }

    /// Emit the instruction fragment computing this expression's boxed
    /// value, charging its operand-stack words to the scope as it goes
    pub(crate) fn emit(&self, scope: &mut Scope) -> Result<String> {
        match self {
            Expression::Int(value) => {
                scope.allocate(1);
                Ok(format!("ldc {value}\n{BOX_INT}"))
            }
            Expression::Double(value) => {
                scope.allocate(2);
                Ok(format!("ldc2_w {value:?}\n{BOX_DOUBLE}"))
            }
            Expression::Bool(value) => {
                scope.allocate(1);
                let instruction = if *value { "iconst_1" } else { "iconst_0" };
                Ok(format!("{instruction}\n{BOX_BOOL}"))
            }
            Expression::Char(value) => {
                scope.allocate(1);
                Ok(format!("ldc {}\n{BOX_CHAR}", *value as u32))
            }

            Expression::Var(name) => Ok(scope.lookup(name.as_str())?),

            Expression::Unary { op, inner } => {
                let operand_type = inner.resolved_type(scope)?;
                let inner_code = inner.emit(scope)?;
                scope.allocate(1);
                match op {
                    UnaryOperation::Not => {
                        require_operand(op, operand_type, Type::Bool)?;
                        let toggled = format!("{inner_code}{UNBOX_BOOL}");
                        Ok(branch_to_bool(&toggled, "ifeq", scope))
                    }
                    UnaryOperation::Ord => {
                        require_operand(op, operand_type, Type::Char)?;
                        Ok(format!("{inner_code}{UNBOX_CHAR}{BOX_INT}"))
                    }
                    UnaryOperation::Chr => {
                        require_operand(op, operand_type, Type::Int)?;
                        Ok(format!("{inner_code}{UNBOX_INT}i2c\n{BOX_CHAR}"))
                    }
                }
            }

            Expression::Binary { op, lhs, rhs } => {
                let operand_type = binary_operand_type(op, lhs, rhs, scope)?;
                let lhs_code = lhs.emit(scope)?;
                let rhs_code = rhs.emit(scope)?;
                scope.allocate(2);
                match op {
                    BinaryOperation::Add
                    | BinaryOperation::Sub
                    | BinaryOperation::Mul
                    | BinaryOperation::Div => {
                        let instruction = arithmetic_instruction(op, &operand_type)?;
                        let unbox = unbox_instruction(&operand_type)?;
                        let rebox = box_instruction(&operand_type)?;
                        Ok(format!(
                            "{lhs_code}{unbox}{rhs_code}{unbox}{instruction}\n{rebox}"
                        ))
                    }
                    BinaryOperation::Equals | BinaryOperation::Less | BinaryOperation::LessEq => {
                        let (unbox, prepare, branch) = comparison_parts(op, &operand_type)?;
                        let compared = format!("{lhs_code}{unbox}{rhs_code}{unbox}{prepare}");
                        Ok(branch_to_bool(&compared, branch, scope))
                    }
                }
            }

            Expression::Apply { function, argument } => {
                let function_code = function.emit(scope)?;
                let argument_code = argument.emit(scope)?;
                scope.allocate(2);
                Ok(format!(
                    "{function_code}checkcast AbstractFunction\n{argument_code}\
                     invokevirtual AbstractFunction/apply(Ljava/lang/Object;)Ljava/lang/Object;\n"
                ))
            }

            Expression::List(elements) => {
                scope.allocate(2);
                let mut code = String::from(
                    "new java/util/ArrayList\ndup\ninvokespecial java/util/ArrayList/<init>()V\n",
                );
                for element in elements {
                    let element_code = element.emit(scope)?;
                    code.push_str("dup\n");
                    code.push_str(&element_code);
                    code.push_str("invokevirtual java/util/ArrayList/add(Ljava/lang/Object;)Z\npop\n");
                }
                Ok(code)
            }

            Expression::Annotated { inner, .. } => inner.emit(scope),
        }
    }
}

/// Finish a branching lowering: `condition` leaves the comparison done up to
/// the final branch instruction, which jumps when the result is true
fn branch_to_bool(condition: &str, branch: &str, scope: &mut Scope) -> String {
    let truthy = scope.fresh_label();
    let falsy = scope.fresh_label();
    let done = scope.fresh_label();
    format!(
        "{condition}{branch} L{truthy}\nL{falsy}:\niconst_0\ngoto L{done}\nL{truthy}:\niconst_1\nL{done}:\n{BOX_BOOL}"
    )
}

/// The agreed operand type of a binary operator: a generic side follows a
/// concrete one, two different concrete sides cannot agree
fn binary_operand_type(
    op: &BinaryOperation,
    lhs: &Expression,
    rhs: &Expression,
    scope: &Scope,
) -> Result<Type> {
    let lhs_type = lhs.resolved_type(scope)?;
    let rhs_type = rhs.resolved_type(scope)?;
    match (lhs_type.is_concrete(), rhs_type.is_concrete()) {
        (true, true) if lhs_type == rhs_type => Ok(lhs_type),
        (true, true) => Err(CodegenError::MixedOperands {
            op: op.to_string(),
            lhs: lhs_type,
            rhs: rhs_type,
        }),
        (true, false) => Ok(lhs_type),
        (false, true) => Ok(rhs_type),
        (false, false) => Err(CodegenError::UnresolvedOperands { op: op.to_string() }),
    }
}

fn arithmetic_instruction(op: &BinaryOperation, ty: &Type) -> Result<&'static str> {
    match (op, ty) {
        (BinaryOperation::Add, Type::Int) => Ok("iadd"),
        (BinaryOperation::Sub, Type::Int) => Ok("isub"),
        (BinaryOperation::Mul, Type::Int) => Ok("imul"),
        (BinaryOperation::Div, Type::Int) => Ok("idiv"),
        (BinaryOperation::Add, Type::Double) => Ok("dadd"),
        (BinaryOperation::Sub, Type::Double) => Ok("dsub"),
        (BinaryOperation::Mul, Type::Double) => Ok("dmul"),
        (BinaryOperation::Div, Type::Double) => Ok("ddiv"),
        _ => Err(CodegenError::UnsupportedOperand {
            op: op.to_string(),
            ty: ty.clone(),
        }),
    }
}

/// `Equals` works on every primitive, on data-type tokens and on lists
/// (through `Object.equals`); the orderings only on `Int` and `Double`
fn comparison_parts(
    op: &BinaryOperation,
    ty: &Type,
) -> Result<(&'static str, &'static str, &'static str)> {
    match (op, ty) {
        (BinaryOperation::Equals, Type::Int) => Ok((UNBOX_INT, "", "if_icmpeq")),
        (BinaryOperation::Equals, Type::Char) => Ok((UNBOX_CHAR, "", "if_icmpeq")),
        (BinaryOperation::Equals, Type::Bool) => Ok((UNBOX_BOOL, "", "if_icmpeq")),
        (BinaryOperation::Equals, Type::Double) => Ok((UNBOX_DOUBLE, "dcmpl\n", "ifeq")),
        (BinaryOperation::Equals, Type::Data(_) | Type::List(_)) => Ok((
            "",
            "invokevirtual java/lang/Object/equals(Ljava/lang/Object;)Z\n",
            "ifne",
        )),
        (BinaryOperation::Less, Type::Int) => Ok((UNBOX_INT, "", "if_icmplt")),
        (BinaryOperation::LessEq, Type::Int) => Ok((UNBOX_INT, "", "if_icmple")),
        (BinaryOperation::Less, Type::Double) => Ok((UNBOX_DOUBLE, "dcmpl\n", "iflt")),
        (BinaryOperation::LessEq, Type::Double) => Ok((UNBOX_DOUBLE, "dcmpl\n", "ifle")),
        _ => Err(CodegenError::UnsupportedOperand {
            op: op.to_string(),
            ty: ty.clone(),
        }),
    }
}

fn unbox_instruction(ty: &Type) -> Result<&'static str> {
    match ty {
        Type::Int => Ok(UNBOX_INT),
        Type::Double => Ok(UNBOX_DOUBLE),
        Type::Bool => Ok(UNBOX_BOOL),
        Type::Char => Ok(UNBOX_CHAR),
        _ => Err(CodegenError::UnsupportedOperand {
            op: String::from("unbox"),
            ty: ty.clone(),
        }),
    }
}

fn box_instruction(ty: &Type) -> Result<&'static str> {
    match ty {
        Type::Int => Ok(BOX_INT),
        Type::Double => Ok(BOX_DOUBLE),
        Type::Bool => Ok(BOX_BOOL),
        Type::Char => Ok(BOX_CHAR),
        _ => Err(CodegenError::UnsupportedOperand {
            op: String::from("box"),
            ty: ty.clone(),
        }),
    }
}

fn require_operand(op: &UnaryOperation, found: Type, expected: Type) -> Result<()> {
    if found.is_concrete() && found != expected {
        return Err(CodegenError::UnsupportedOperand {
            op: op.to_string(),
            ty: found,
        });
    }
    Ok(())
}
