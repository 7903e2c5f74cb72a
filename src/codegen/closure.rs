//! Declarations and curried closures
//!
//! Every multi-parameter declaration `f p1 .. pn = body` becomes one Jasmin
//! class `{f}Function extends AbstractFunction` holding the first `n-1`
//! arguments in fields; the public `apply` routes each incoming argument to
//! a partial or final transition by the `boundCount` counter. Zero-parameter
//! declarations produce no class at all, their body is inlined wherever the
//! name is used.

use crate::ast::{Declaration, FunctionDeclaration};
use crate::codegen::{tidy, CodegenError, Unit, STACK_HEADROOM};
use crate::infer::infer_function;
use crate::{Scope, Type};

type Result<T> = std::result::Result<T, CodegenError>;

pub(crate) fn declare(declaration: &Declaration, scope: &mut Scope) -> Result<Option<Unit>> {
    match declaration {
        Declaration::TypeAnnotation(annotation) => {
            scope.bind_type(annotation.name.as_str(), annotation.ty.resolve(), true);
            Ok(None)
        }

        Declaration::Data(data) => {
            for constructor in &data.constructors {
                scope.bind(constructor.as_str(), format!("ldc \"{constructor}\"\n"), 1);
                scope.bind_type(
                    constructor.as_str(),
                    Type::Data(data.name.to_string()),
                    true,
                );
            }
            Ok(None)
        }

        Declaration::Function(function) if function.params.is_empty() => {
            inline(function, scope)?;
            Ok(None)
        }

        Declaration::Function(function) => {
            let progression = infer_function(&function.params, &function.body, scope)?;
            scope.bind_type(function.name.as_str(), Type::Function(progression), false);
            scope.bind(
                function.name.as_str(),
                construction(function.name.as_str()),
                2,
            );
            synthesize(function, scope).map(Some)
        }
    }
}

/// The zero-parameter path: evaluate the body once against a snapshot with
/// reset counters, so the memoized fragment's stack cost is known and its
/// labels are numbered from `L1` for renumbering at every paste.
fn inline(function: &FunctionDeclaration, scope: &mut Scope) -> Result<()> {
    let mut progression = infer_function(&function.params, &function.body, scope)?;
    let body_type = progression
        .pop()
        .expect("a progression always ends with the body type");

    let mut body_scope = scope.snapshot();
    body_scope.take_stack_words();
    body_scope.take_labels();
    let fragment = function.body.emit(&mut body_scope)?;
    let words = body_scope.take_stack_words();
    let labels = body_scope.take_labels();

    scope.bind_inlined(function.name.as_str(), fragment, words, labels);
    scope.bind_type(function.name.as_str(), body_type, false);
    Ok(())
}

fn construction(name: &str) -> String {
    format!("new {name}Function\ndup\ninvokespecial {name}Function/<init>()V\n")
}

/// Build the `{f}Function` class; the registered type is read back from the
/// scope, so a definite annotation decides the parameter types
fn synthesize(function: &FunctionDeclaration, scope: &Scope) -> Result<Unit> {
    let name = function.name.as_str();
    let class = format!("{name}Function");
    let params = function.params.len();

    let registered = scope.lookup_type(name)?;
    let progression = match registered {
        Type::Function(progression) if progression.len() == params + 1 => progression.clone(),
        other => {
            return Err(CodegenError::AnnotationMismatch {
                name: name.to_string(),
                params,
                ty: other.clone(),
            })
        }
    };

    let mut text = header(&class, params);
    for index in 0..params - 1 {
        text.push_str(&binder(&class, index));
        text.push_str(&partial_apply(&class, index));
    }
    text.push_str(&final_apply(function, &class, &progression, scope)?);
    text.push_str(&dispatch(&class, params));
    text.push_str(&to_string(&class, params));

    Ok(Unit {
        name: format!("{class}.j"),
        text: tidy(&text),
    })
}

fn header(class: &str, params: usize) -> String {
    let mut text = format!(
        "\
.class public {class}
.super AbstractFunction
"
    );
    for index in 0..params - 1 {
        text.push_str(&format!(".field private param_{index} Ljava/lang/Object;\n"));
    }
    text.push_str(&format!(
        "\
.method public <init>()V
    .limit stack 2
    .limit locals 1
    aload_0
    invokespecial AbstractFunction/<init>()V
    aload_0
    bipush {params}
    putfield AbstractFunction/remaining I
    return
.end method
"
    ));
    text
}

/// `set_{i}`: bind-and-advance, only ever called on instances no one else
/// holds yet
fn binder(class: &str, index: usize) -> String {
    format!(
        "\
.method public set_{index}(Ljava/lang/Object;)V
    .limit stack 3
    .limit locals 2
    aload_0
    dup
    getfield AbstractFunction/boundCount I
    iconst_1
    iadd
    putfield AbstractFunction/boundCount I
    aload_0
    dup
    getfield AbstractFunction/remaining I
    iconst_1
    isub
    putfield AbstractFunction/remaining I
    aload_0
    aload_1
    putfield {class}/param_{index} Ljava/lang/Object;
    return
.end method
"
    )
}

/// `apply_{i}` for a non-final argument: copy the bound fields into a fresh
/// instance, bind one more, leave the receiver untouched
fn partial_apply(class: &str, index: usize) -> String {
    let mut text = format!(
        "\
.method public apply_{index}(Ljava/lang/Object;)Ljava/lang/Object;
    .limit stack 4
    .limit locals 2
    new {class}
    dup
    invokespecial {class}/<init>()V
"
    );
    for bound in 0..index {
        text.push_str(&format!(
            "\
    dup
    aload_0
    getfield {class}/param_{bound} Ljava/lang/Object;
    invokevirtual {class}/set_{bound}(Ljava/lang/Object;)V
"
        ));
    }
    text.push_str(&format!(
        "\
    dup
    aload_1
    invokevirtual {class}/set_{index}(Ljava/lang/Object;)V
    areturn
.end method
"
    ));
    text
}

/// `apply_{n-1}`: parameters resolve to field loads, the last one to the
/// argument register, and the body is evaluated
fn final_apply(
    function: &FunctionDeclaration,
    class: &str,
    progression: &[Type],
    scope: &Scope,
) -> Result<String> {
    let last = function.params.len() - 1;

    let mut body_scope = scope.snapshot();
    for (index, param) in function.params.iter().enumerate() {
        if index < last {
            body_scope.bind(
                param.as_str(),
                format!("aload_0\ngetfield {class}/param_{index} Ljava/lang/Object;\n"),
                1,
            );
        } else {
            body_scope.bind(param.as_str(), "aload_1\n", 1);
        }
        body_scope.bind_type(param.as_str(), progression[index].clone(), true);
    }

    body_scope.take_stack_words();
    let body = function.body.emit(&mut body_scope)?;
    let words = body_scope.take_stack_words();

    Ok(format!(
        "\
.method public apply_{last}(Ljava/lang/Object;)Ljava/lang/Object;
    .limit stack {limit}
    .limit locals 2
{body}
    areturn
.end method
",
        limit = words + STACK_HEADROOM,
    ))
}

/// The public `apply`: route by `boundCount` to the matching transition
fn dispatch(class: &str, params: usize) -> String {
    let mut text = String::from(
        "\
.method public apply(Ljava/lang/Object;)Ljava/lang/Object;
    .limit stack 3
    .limit locals 2
    aload_0
    getfield AbstractFunction/boundCount I
",
    );
    for state in 0..params {
        text.push_str(&format!(
            "\
    dup
    bipush {state}
    if_icmpeq state_{state}
"
        ));
    }
    // no further argument fits; unreachable through the public surface
    text.push_str(
        "\
    new java/lang/IllegalStateException
    dup
    invokespecial java/lang/IllegalStateException/<init>()V
    athrow
",
    );
    for state in 0..params {
        text.push_str(&format!(
            "\
state_{state}:
    pop
    aload_0
    aload_1
    invokevirtual {class}/apply_{state}(Ljava/lang/Object;)Ljava/lang/Object;
    areturn
"
        ));
    }
    text.push_str(".end method\n");
    text
}

fn to_string(class: &str, params: usize) -> String {
    let mut text = format!(
        "\
.method public toString()Ljava/lang/String;
    .limit stack 4
    .limit locals 2
    new java/lang/StringBuilder
    dup
    invokespecial java/lang/StringBuilder/<init>()V
    astore_1
    aload_1
    ldc \"{class} with bound parameters: \"
    invokevirtual java/lang/StringBuilder/append(Ljava/lang/String;)Ljava/lang/StringBuilder;
    pop
"
    );
    for index in 0..params - 1 {
        text.push_str(&format!(
            "\
    aload_0
    getfield {class}/param_{index} Ljava/lang/Object;
    ifnull skip_{index}
    aload_1
    ldc \"(\"
    invokevirtual java/lang/StringBuilder/append(Ljava/lang/String;)Ljava/lang/StringBuilder;
    pop
    aload_1
    aload_0
    getfield {class}/param_{index} Ljava/lang/Object;
    invokevirtual java/lang/Object/toString()Ljava/lang/String;
    invokevirtual java/lang/StringBuilder/append(Ljava/lang/String;)Ljava/lang/StringBuilder;
    pop
    aload_1
    ldc \") \"
    invokevirtual java/lang/StringBuilder/append(Ljava/lang/String;)Ljava/lang/StringBuilder;
    pop
skip_{index}:
"
        ));
    }
    text.push_str(
        "\
    aload_1
    invokevirtual java/lang/StringBuilder/toString()Ljava/lang/String;
    areturn
.end method
",
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_fragment_is_zero_bound() {
        let fragment = construction("mul");
        assert_eq!(
            fragment,
            "new mulFunction\ndup\ninvokespecial mulFunction/<init>()V\n"
        );
    }

    #[test]
    fn dispatch_covers_every_state() {
        let text = dispatch("mulFunction", 3);
        for state in 0..3 {
            assert!(text.contains(&format!("bipush {state}\n")));
            assert!(text.contains(&format!("state_{state}:\n")));
            assert!(text.contains(&format!(
                "invokevirtual mulFunction/apply_{state}(Ljava/lang/Object;)Ljava/lang/Object;"
            )));
        }
        assert!(text.contains("IllegalStateException"));
    }

    #[test]
    fn partial_apply_copies_earlier_fields() {
        let text = partial_apply("fFunction", 2);
        assert!(text.contains("getfield fFunction/param_0"));
        assert!(text.contains("getfield fFunction/param_1"));
        assert!(text.contains("invokevirtual fFunction/set_2(Ljava/lang/Object;)V"));
        // the receiver's own fields are only read
        assert!(!text.contains("putfield"));
    }
}
