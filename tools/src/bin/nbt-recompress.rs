use clap::{App, Arg, ArgGroup};
use log::info;
use nbtcodec::Compression;
use nbtcodec_tools::{init_logging, read_input, write_output, ErrorMessage, Result};

fn main() -> Result<()> {
    init_logging();

    let matches = App::new("nbt-recompress")
        .about("decode an NBT file and write it back, gzipped or raw")
        .arg(
            Arg::with_name("file")
                .required(true)
                .help("file to read, or - for stdin"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .takes_value(true)
                .required(true)
                .help("where to write the result, or - for stdout"),
        )
        .arg(Arg::with_name("gzip").long("gzip").help("gzip the output"))
        .arg(Arg::with_name("raw").long("raw").help("write plain NBT"))
        .group(ArgGroup::with_name("compression").args(&["gzip", "raw"]))
        .get_matches();

    let bytes = read_input(matches.value_of("file").unwrap_or("-"))?;
    let (root, found) = nbtcodec::decode(&bytes, None)?;

    // Without a flag the document keeps the framing it arrived with.
    let target = if matches.is_present("gzip") {
        Compression::Gzip
    } else if matches.is_present("raw") {
        Compression::None
    } else {
        found
    };

    let output = matches
        .value_of("output")
        .ok_or_else(|| ErrorMessage("no output given".to_owned()))?;
    write_output(output, &nbtcodec::encode(&root, target)?)?;

    info!("{:?} -> {:?}, written to {}", found, target, output);
    Ok(())
}
