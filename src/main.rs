use anyhow::Result;
use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use std::process;

use fhpack::{HoleMode, ParseMode};

enum Mode {
    Compress,
    Decompress,
    Test,
}

fn main() -> Result<()> {
    let mut mode: Option<Mode> = None;
    let mut holes = HoleMode::Rewrite;
    let mut parsing = ParseMode::Optimal;
    let mut files: Vec<PathBuf> = Vec::new();

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        use lexopt::prelude::*;
        match arg {
            Short('c') | Long("compress") => set_mode(&mut mode, Mode::Compress),
            Short('d') | Long("decompress") => set_mode(&mut mode, Mode::Decompress),
            Short('t') | Long("test") => set_mode(&mut mode, Mode::Test),
            Short('h') | Long("preserve-holes") => holes = HoleMode::Preserve,
            Short('1') | Long("fast") => parsing = ParseMode::Greedy,
            Short('9') | Long("best") => parsing = ParseMode::Optimal,
            Long("help") => print_help(0),
            Value(val) => files.push(val.into()),
            _ => return Err(arg.unexpected().into()),
        }
    }

    match mode.unwrap_or_else(|| print_help(2)) {
        Mode::Compress => {
            if files.len() != 2 {
                print_help(2);
            }
            let data = read_file(&files[0])?;
            let packed = fhpack::pack(&data, parsing, holes)?;
            File::create(&files[1])?.write_all(&packed)?;
            println!(
                "Compressed {} bytes to {} bytes ({:.1}%)",
                data.len(),
                packed.len(),
                packed.len() as f32 * 100. / data.len() as f32
            );
        }
        Mode::Decompress => {
            if files.len() != 2 {
                print_help(2);
            }
            let data = read_file(&files[0])?;
            let (expanded, consumed) = fhpack::unpack_consumed(&data)?;
            if consumed != data.len() {
                eprintln!(
                    "Warning: used only {} of {} input bytes",
                    consumed,
                    data.len()
                );
            }
            File::create(&files[1])?.write_all(&expanded)?;
        }
        Mode::Test => {
            if files.is_empty() {
                print_help(2);
            }
            let mut failed = false;
            for file in &files {
                match test_file(file, parsing, holes) {
                    Ok(size) => println!("{}: ok, compressed len is {}", file.display(), size),
                    Err(err) => {
                        eprintln!("{}: {err}", file.display());
                        failed = true;
                    }
                }
            }
            if failed {
                process::exit(1);
            }
        }
    }

    Ok(())
}

fn set_mode(mode: &mut Option<Mode>, new: Mode) {
    if mode.is_some() {
        print_help(2);
    }
    *mode = Some(new);
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut data = vec![];
    File::open(path)?.read_to_end(&mut data)?;
    Ok(data)
}

fn test_file(path: &Path, parsing: ParseMode, holes: HoleMode) -> Result<usize> {
    let data = read_file(path)?;
    let packed = fhpack::pack(&data, parsing, holes)?;
    Ok(packed.len())
}

fn print_help(exit_code: i32) -> ! {
    eprintln!("Usage:");
    eprintln!("  fhpack -c [-h] [-1|-9] <infile> <outfile>");
    eprintln!("  fhpack -d <infile> <outfile>");
    eprintln!("  fhpack -t [-h] [-1|-9] <infile>...");
    eprintln!();
    eprintln!(" -c, --compress        compress a hi-res page");
    eprintln!(" -d, --decompress      expand a compressed page");
    eprintln!(" -t, --test            compress and verify, writing nothing");
    eprintln!(" -h, --preserve-holes  keep the screen hole bytes exactly as given");
    eprintln!(" -1, --fast            greedy parsing");
    eprintln!(" -9, --best            optimal parsing (default)");
    process::exit(exit_code);
}
