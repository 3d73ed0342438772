use anyhow::{anyhow, bail, Result};

use super::object::Object;

/// Read-only registry consulted only after identifier lookup misses the
/// whole environment chain, so user bindings may shadow a builtin.
pub struct Builtins;

impl Builtins {
    pub fn lookup(name: &str) -> Option<Object> {
        match name {
            "len" => Some(Object::BuiltInFunction(Self::len_fn)),
            _ => None,
        }
    }

    fn len_fn(args: Vec<Object>) -> Result<Object> {
        if args.len() != 1 {
            bail!(
                "wrong number of arguments for len: want=1, got={}",
                args.len()
            );
        }

        match args.first() {
            Some(Object::String(value)) => Ok(Object::Integer(value.len() as i64)),
            Some(other) => Err(anyhow!(
                "argument to `len` not supported, got {}",
                other.type_name()
            )),
            None => Err(anyhow!("argument to `len` not provided")),
        }
    }
}
