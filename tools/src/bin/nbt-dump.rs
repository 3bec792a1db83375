use clap::{App, Arg};
use log::info;
use nbtcodec::DecodeOpts;
use nbtcodec_tools::{init_logging, parse_millis, read_input, Result};

fn main() -> Result<()> {
    init_logging();

    let matches = App::new("nbt-dump")
        .about("decode an NBT file, gzipped or not, and print it")
        .arg(
            Arg::with_name("file")
                .required(true)
                .help("file to read, or - for stdin"),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .takes_value(false)
                .help("print as JSON rather than as a debug tree"),
        )
        .arg(
            Arg::with_name("deadline-ms")
                .long("deadline-ms")
                .takes_value(true)
                .required(false)
                .help("give up after this many milliseconds"),
        )
        .get_matches();

    let bytes = read_input(matches.value_of("file").unwrap_or("-"))?;

    let mut opts = DecodeOpts::new();
    if let Some(ms) = matches.value_of("deadline-ms") {
        opts = opts.deadline(parse_millis(ms)?);
    }

    let (root, compression) = nbtcodec::decode_with_opts(&bytes, opts)?;
    info!(
        "{} bytes, compression {:?}, root {:?} with {} entries",
        bytes.len(),
        compression,
        root.name,
        root.body.len()
    );

    if matches.is_present("json") {
        println!("{}", serde_json::to_string_pretty(&root)?);
    } else {
        println!("{:#?}", root);
    }

    Ok(())
}
