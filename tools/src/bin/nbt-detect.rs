use clap::{App, Arg};
use log::{info, warn};
use nbtcodec::{classify, Verdict};
use nbtcodec_tools::{init_logging, parse_millis, read_input, Result};
use rayon::prelude::*;

fn main() -> Result<()> {
    init_logging();

    let matches = App::new("nbt-detect")
        .about("report which files look like NBT")
        .arg(
            Arg::with_name("files")
                .required(true)
                .multiple(true)
                .help("files to classify"),
        )
        .arg(
            Arg::with_name("budget-ms")
                .long("budget-ms")
                .takes_value(true)
                .required(false)
                .default_value("20")
                .help("time to spend on each file"),
        )
        .get_matches();

    let budget = parse_millis(matches.value_of("budget-ms").unwrap_or("20"))?;
    let files: Vec<&str> = matches.values_of("files").into_iter().flatten().collect();

    let verdicts: Vec<(&str, Option<Verdict>)> = files
        .par_iter()
        .map(|&path| match read_input(path) {
            Ok(bytes) => (path, Some(classify(&bytes, budget))),
            Err(e) => {
                warn!("{}", e);
                (path, None)
            }
        })
        .collect();

    let mut rejected = 0;
    for (path, verdict) in &verdicts {
        match verdict {
            Some(v) if v.is_nbt() => println!("{}: {:?}", path, v),
            Some(v) => {
                println!("{}: {:?}", path, v);
                rejected += 1;
            }
            None => rejected += 1,
        }
    }

    info!("{} of {} files look like NBT", verdicts.len() - rejected, verdicts.len());

    if rejected > 0 {
        std::process::exit(1);
    }
    Ok(())
}
