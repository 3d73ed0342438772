use anyhow::Result;

/// A runnable implementation of the language. The tree-walking
/// interpreter is the only engine today; the seam leaves room for a
/// bytecode engine without touching the front-ends.
pub trait Engine {
    fn run(&mut self, input: &str) -> Result<String>;
}
