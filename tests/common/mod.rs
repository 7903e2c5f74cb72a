use funj::{compile, Module, Unit};

pub fn run_pipeline(module: Module) -> Vec<Unit> {
    compile(&module).unwrap()
}
