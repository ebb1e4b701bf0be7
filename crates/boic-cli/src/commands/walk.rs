use anyhow::Result;
use boic_core::{Jewel, JewelPath};
use std::rc::Rc;

pub fn execute(jewel: &Rc<Jewel>, path: Option<&str>, depth: Option<usize>) -> Result<()> {
    let start = path.map_or_else(|| jewel.root(), |path| jewel.path(path));
    let depth = depth.or(jewel.config().scan.max_depth);

    for entry in start.walk(depth) {
        println!("{}", entry.root);
        for dir in &entry.dirs {
            println!("  {}/", name(dir));
        }
        for file in &entry.files {
            println!("  {}", name(file));
        }
    }
    Ok(())
}

fn name(path: &JewelPath) -> &str {
    path.file_name().unwrap_or_default()
}
