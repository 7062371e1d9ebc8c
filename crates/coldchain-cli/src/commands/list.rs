//! List command implementation.

use coldchain_canonical::Identity;
use coldchain_store::{
    AndFilter, CallerFilter, FilteredReader, HeightRangeFilter, OperationFilter, ReadMode,
    RecordFilter, StoreReader,
};

use super::{CommandResult, Context};
use crate::output;

pub struct ListArgs {
    pub operation: Option<String>,
    pub caller: Option<Identity>,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub json: bool,
}

pub fn run(ctx: &Context, args: ListArgs) -> CommandResult {
    let reader = match ctx.reader(ReadMode::Permissive)? {
        Some(reader) => reader,
        None => {
            if !args.json {
                println!("ledger {} is empty", ctx.config.journal.display());
            }
            return Ok(());
        }
    };

    let mut filters: Vec<Box<dyn RecordFilter>> = vec![Box::new(HeightRangeFilter {
        from: args.from,
        to: args.to,
    })];
    if let Some(kind) = args.operation {
        filters.push(Box::new(OperationFilter { kind }));
    }
    if let Some(caller) = args.caller {
        filters.push(Box::new(CallerFilter { caller }));
    }
    let mut reader = FilteredReader::new(reader, AndFilter { filters });

    if !args.json {
        output::print_table_header();
    }
    while let Some(record) = reader.read_next()? {
        if args.json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{}", output::format_table_row(&record));
        }
    }
    Ok(())
}
