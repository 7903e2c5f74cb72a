use std::collections::hash_map::Entry;
use std::collections::HashMap;

use miette::Diagnostic;
use thiserror::Error;

use crate::Type;

#[derive(Debug, Error, Diagnostic)]
#[error("The identifier `{name}` is not bound")]
#[diagnostic(help(
    "Declarations are processed in order; `{name}` must be declared before its first use"
))]
pub struct UnknownIdentifier {
    pub name: String,
}

#[derive(Debug, Clone)]
struct Binding {
    fragment: String,
    words: u32,
    labels: u32,
}

#[derive(Debug, Clone)]
struct TypeBinding {
    ty: Type,
    definite: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Scope {
    identifiers: HashMap<String, Binding>,
    types: HashMap<String, TypeBinding>,
    label: u32,
    stack_words: u32,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: &str, fragment: impl Into<String>, words: u32) {
        self.bind_inlined(name, fragment, words, 0);
    }

    /// Bind a memoized body fragment that defines `labels` branch labels,
    /// numbered from `L1`; every lookup renumbers them
    pub fn bind_inlined(
        &mut self,
        name: &str,
        fragment: impl Into<String>,
        words: u32,
        labels: u32,
    ) {
        self.identifiers.insert(
            name.to_string(),
            Binding {
                fragment: fragment.into(),
                words,
                labels,
            },
        );
    }

    /// A definite binding always replaces whatever is there; a provisional
    /// one fills a vacancy or narrows an earlier provisional belief
    pub fn bind_type(&mut self, name: &str, ty: Type, definite: bool) {
        match self.types.entry(name.to_string()) {
            Entry::Vacant(vacant) => {
                vacant.insert(TypeBinding { ty, definite });
            }
            Entry::Occupied(mut occupied) => {
                let existing = occupied.get_mut();
                if definite {
                    *existing = TypeBinding { ty, definite };
                } else if !existing.definite && ty.wideness() < existing.ty.wideness() {
                    existing.ty = ty;
                }
            }
        }
    }

    /// Fetch the fragment bound to `name`, charging its stack cost and
    /// renumbering its labels past those this scope already handed out
    pub fn lookup(&mut self, name: &str) -> Result<String, UnknownIdentifier> {
        match self.identifiers.get(name) {
            Some(binding) => {
                self.stack_words += binding.words;
                if binding.labels == 0 {
                    return Ok(binding.fragment.clone());
                }
                let base = self.label;
                self.label += binding.labels;
                Ok(shift_labels(&binding.fragment, base))
            }
            None => Err(UnknownIdentifier {
                name: name.to_string(),
            }),
        }
    }

    pub fn lookup_type(&self, name: &str) -> Result<&Type, UnknownIdentifier> {
        self.types
            .get(name)
            .map(|binding| &binding.ty)
            .ok_or_else(|| UnknownIdentifier {
                name: name.to_string(),
            })
    }

    pub fn fresh_label(&mut self) -> u32 {
        self.label += 1;
        self.label
    }

    pub fn allocate(&mut self, words: u32) {
        self.stack_words += words;
    }

    pub fn take_stack_words(&mut self) -> u32 {
        std::mem::take(&mut self.stack_words)
    }

    pub fn take_labels(&mut self) -> u32 {
        std::mem::take(&mut self.label)
    }

    pub fn snapshot(&self) -> Scope {
        self.clone()
    }
}

/// Shift every `L{n}` token of a pasted fragment up by `base`, so no two
/// pastes into one method define the same label
fn shift_labels(fragment: &str, base: u32) -> String {
    let mut shifted = String::with_capacity(fragment.len());
    for line in fragment.lines() {
        if let Some(number) = line.strip_suffix(':').and_then(label_number) {
            shifted.push_str(&format!("L{}:", number + base));
        } else if let Some((instruction, number)) = branch_target(line) {
            shifted.push_str(&format!("{instruction} L{}", number + base));
        } else {
            shifted.push_str(line);
        }
        shifted.push('\n');
    }
    shifted
}

// only branch instructions end in a label token
fn branch_target(line: &str) -> Option<(&str, u32)> {
    let (instruction, target) = line.rsplit_once(' ')?;
    Some((instruction, label_number(target)?))
}

fn label_number(token: &str) -> Option<u32> {
    token.strip_prefix('L')?.parse().ok()
}
