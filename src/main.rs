use phone_mark_checker::{logger, PhoneChecker, ProxySettings};
use serde_json::json;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut verbose = false;
    let mut phones = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            _ => phones.push(arg),
        }
    }

    logger::init_logger(verbose);

    if phones.is_empty() {
        eprintln!("Usage: phone_mark_checker [-v] <phone>...");
        std::process::exit(2);
    }

    let settings = ProxySettings::from_env()?;
    let checker = PhoneChecker::new(&settings)?;

    let results: Vec<_> = phones
        .iter()
        .map(|phone| json!({ "phone": phone, "marks": checker.check_all(phone) }))
        .collect();

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
