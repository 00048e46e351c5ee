use phone_mark_checker::{logger, parse, Provider};
use std::error::Error;

/// Run a provider parser over a saved search result page.
fn main() -> Result<(), Box<dyn Error>> {
    logger::init_logger(true);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 2 {
        eprintln!("Usage: parse_fixture <baidu|so360> <page.html>");
        std::process::exit(2);
    }

    let provider: Provider = args[0].parse()?;
    let body = std::fs::read_to_string(&args[1])?;
    let record = parse(provider, &body);

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
