//! Command-line interface for weft
//! Round-trips DOCX files through style-preserving Markdown and back.
//!
//! Usage:
//!   weft to-md `<input.docx>` -o out.md [--media-dir media]   - DOCX -> Markdown
//!   weft to-docx `<input.md>` -o out.docx [--ref orig.docx]   - Markdown -> DOCX

use clap::{Arg, Command};
use std::path::PathBuf;

fn main() {
    let matches = Command::new("weft")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Round-trip DOCX <-> Markdown with style preservation")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("to-md")
                .about("Convert DOCX to Markdown (preserving Word styles)")
                .arg(
                    Arg::new("input")
                        .help("Input .docx")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .index(1),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .help("Output .md")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("media-dir")
                        .long("media-dir")
                        .help("Directory for exported images")
                        .default_value("media")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("to-docx")
                .about("Convert Markdown back to DOCX (re-applying Word styles)")
                .arg(
                    Arg::new("input")
                        .help("Input .md")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .index(1),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .help("Output .docx")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("ref")
                        .long("ref")
                        .help("Reference .docx with style definitions (recommended: the original DOCX)")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("to-md", sub)) => {
            let input = sub.get_one::<PathBuf>("input").expect("input is required");
            let out = sub.get_one::<PathBuf>("out").expect("out is required");
            let media_dir = sub
                .get_one::<PathBuf>("media-dir")
                .expect("media-dir has a default");
            match weft::to_markdown(input, out, media_dir) {
                Ok(path) => println!("Wrote Markdown: {}", path.display()),
                Err(err) => fail(err),
            }
        }
        Some(("to-docx", sub)) => {
            let input = sub.get_one::<PathBuf>("input").expect("input is required");
            let out = sub.get_one::<PathBuf>("out").expect("out is required");
            let reference = sub.get_one::<PathBuf>("ref");
            match weft::to_docx(input, out, reference.map(PathBuf::as_path)) {
                Ok(path) => println!("Wrote DOCX: {}", path.display()),
                Err(err) => fail(err),
            }
        }
        _ => unreachable!("subcommand is required"),
    }
}

fn fail(error: weft::ConvertError) -> ! {
    eprintln!("{error}");
    std::process::exit(1);
}
