use super::options;
use anyhow::Result;
use boic_core::shard::scan;
use boic_core::Jewel;
use std::rc::Rc;

pub fn execute(jewel: &Rc<Jewel>, shard_type: Option<&str>, depth: Option<usize>) -> Result<()> {
    let options = options(jewel, depth);
    let mut count = 0usize;

    for shard in scan(jewel, options.max_depth, options.on_error) {
        let shard = shard?;
        if shard_type.is_some_and(|typ| !shard.is_type(typ)) {
            continue;
        }
        println!("{}", shard.summary());
        count += 1;
    }

    tracing::info!(count, "Listed shards");
    Ok(())
}
