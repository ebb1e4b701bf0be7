use anyhow::{Context, Result};
use boic_core::Jewel;
use std::rc::Rc;

pub fn execute(jewel: &Rc<Jewel>, path: &str) -> Result<()> {
    let path = jewel.path(path);
    let location = path
        .canonicalize()
        .with_context(|| format!("Cannot resolve {path}"))?;
    println!("{}", location.display());
    Ok(())
}
