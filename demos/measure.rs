//! Very simple tool that accepts SVG path as an input and reports its geometry
#![deny(warnings)]

use cubicpath::*;
use std::{env, fs::File, io::Read};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

type Error = Box<dyn std::error::Error>;

#[derive(Debug)]
struct Args {
    input_file: String,
    tr: Transform,
    arc_length: ArcLength,
    close: Option<Scalar>,
    json: bool,
}

impl Args {
    fn parse() -> Result<Args, Error> {
        let mut result = Args {
            input_file: String::new(),
            tr: Transform::identity(),
            arc_length: ArcLength::default(),
            close: None,
            json: false,
        };
        let mut positional = 0;
        let mut args = env::args();
        let cmd = args.next().unwrap_or_else(|| "measure".to_owned());
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "-h" => {
                    positional = 0;
                    break;
                }
                "-t" => {
                    result.tr = args.next().ok_or("-t requires argument")?.parse()?;
                }
                "-g" => {
                    result.arc_length.method = ArcLengthMethod::Gravesen;
                }
                "-e" => {
                    let tolerance: Scalar = args.next().ok_or("-e requires argument")?.parse()?;
                    if tolerance < EPSILON {
                        return Err("tolerance is too small".into());
                    }
                    result.arc_length.tolerance = tolerance;
                }
                "-c" => {
                    let close = args.next().ok_or("-c requires argument")?;
                    result.close = Some(close.parse()?);
                }
                "-j" => {
                    result.json = true;
                }
                _ => {
                    positional += 1;
                    match positional {
                        1 => result.input_file = arg,
                        _ => return Err("unexpected positional argument".into()),
                    }
                }
            }
        }
        if positional < 1 {
            eprintln!("Very simple tool that accepts SVG path as an input and reports its geometry");
            eprintln!("\nUSAGE:");
            eprintln!(
                "    {} [-t <transform>] [-g] [-e <tolerance>] [-c <tolerance>] [-j] <file.path>",
                cmd
            );
            eprintln!("\nARGS:");
            eprintln!("    -t <transform>     apply SVG transform before measuring");
            eprintln!("    -g                 use Gravesen instead of Simpson arc length");
            eprintln!(
                "    -e <tolerance>     arc length tolerance (default: {})",
                DEFAULT_TOLERANCE
            );
            eprintln!("    -c <tolerance>     close all sub-paths before measuring");
            eprintln!("    -j                 print super-path as JSON");
            eprintln!("    <file.path>        file containing SVG path ('-' means stdin)");
            std::process::exit(1);
        }
        Ok(result)
    }
}

/// Load path for the file
fn path_load(path: String) -> Result<SuperPath, Error> {
    let mut contents = String::new();
    if path != "-" {
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;
    } else {
        std::io::stdin().read_to_string(&mut contents)?;
    }
    Ok(tracing::debug_span!("[parse]").in_scope(|| contents.parse())?)
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse()?;
    let mut path = path_load(args.input_file)?;
    path.transform(args.tr);
    if let Some(tolerance) = args.close {
        path.close_all(tolerance);
    }
    tracing::debug!("[path:subpaths] {}", path.len());

    let (lengths, total) =
        tracing::debug_span!("[lengths]").in_scope(|| path.lengths(&args.arc_length));
    for (index, (nodes, lengths)) in path.subpaths().zip(&lengths).enumerate() {
        println!(
            "subpath {}: nodes={} segments={} length={:.3}",
            index,
            nodes.len(),
            lengths.len(),
            lengths.iter().sum::<Scalar>()
        );
    }
    println!("total length: {:.3}", total);
    match (path.rough_bbox(), path.bbox()) {
        (Some(rough), Some(bbox)) => {
            println!("rough bbox: {:?}", rough);
            println!("bbox: {:?}", bbox);
        }
        _ => println!("path is empty"),
    }
    if args.json {
        println!("{}", path.to_json()?);
    }
    Ok(())
}
