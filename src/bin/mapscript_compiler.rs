// mapscript-compiler - Event Script Compiler
// Compiles map/event script source files to runtime bytecode

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::process;

use mapscript::script_compiler::lexer::split_source;
use mapscript::script_compiler::listing::ListingWriter;
use mapscript::script_compiler::{CommandTable, ScriptCompiler};

fn main() {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = program_name(&args);

    if args.len() < 2 {
        print_usage(program);
        process::exit(1);
    }

    let mut input_file = "";
    let mut output_file = String::new();
    let mut commands_file: Option<String> = None;
    let mut listing_file: Option<String> = None;
    let mut show_symbols = false;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" | "--commands" | "-l" | "--listing" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: {} requires a filename", args[i]);
                    process::exit(1);
                }
                let value = args[i + 1].clone();
                match args[i].as_str() {
                    "-o" | "--output" => output_file = value,
                    "--commands" => commands_file = Some(value),
                    _ => listing_file = Some(value),
                }
                i += 2;
            }
            "--symbols" => {
                show_symbols = true;
                i += 1;
            }
            "-v" | "--verbose" => {
                verbose = true;
                i += 1;
            }
            "-h" | "--help" => {
                print_usage(program);
                process::exit(0);
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option '{}'", arg);
                print_usage(program);
                process::exit(1);
            }
            _ => {
                if input_file.is_empty() {
                    input_file = &args[i];
                } else {
                    eprintln!("Error: Multiple input files specified");
                    process::exit(1);
                }
                i += 1;
            }
        }
    }

    if input_file.is_empty() {
        eprintln!("Error: No input file specified");
        print_usage(program);
        process::exit(1);
    }

    if output_file.is_empty() {
        let input_path = Path::new(input_file);
        let base_name = input_path.file_stem().unwrap_or_else(|| {
            eprintln!("Error: Invalid input filename");
            process::exit(1);
        });
        output_file = format!("{}.bin", base_name.to_string_lossy());
    }

    let compiler = match &commands_file {
        Some(path) => CommandTable::from_file(path).map(ScriptCompiler::with_commands),
        None => ScriptCompiler::new(),
    };
    let compiler = match compiler {
        Ok(compiler) => compiler,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };

    if verbose {
        println!(
            "Compiling {} -> {} ({} commands)",
            input_file,
            output_file,
            compiler.commands().len()
        );
    }

    let source = match fs::read_to_string(input_file) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Error reading '{}': {}", input_file, err);
            process::exit(1);
        }
    };

    let mut lines = split_source(&source);
    let assembly = compiler.compile_lines(&mut lines);

    if let Err(err) = assembly.diagnostics.render(&mut io::stderr()) {
        eprintln!("Error writing diagnostics: {}", err);
    }

    if let Some(path) = &listing_file {
        let written = fs::File::create(path).and_then(|file| {
            let mut writer = ListingWriter::new(io::BufWriter::new(file));
            writer.write_listing(&lines, &assembly.bytes)
        });
        if let Err(err) = written {
            eprintln!("Error writing listing '{}': {}", path, err);
            process::exit(1);
        }
    }

    if show_symbols {
        let mut writer = ListingWriter::new(io::stdout().lock());
        if let Err(err) = writer.write_symbols(&assembly.labels, &assembly.variables) {
            eprintln!("Error writing symbols: {}", err);
        }
    }

    if !assembly.is_usable() {
        eprintln!(
            "Compilation failed: {} errors, {} warnings",
            assembly.diagnostics.error_count(),
            assembly.diagnostics.warning_count()
        );
        process::exit(1);
    }

    let data_size = assembly.bytes.len();
    if let Err(err) = fs::write(&output_file, assembly.bytes) {
        eprintln!("Error writing '{}': {}", output_file, err);
        process::exit(1);
    }

    if verbose {
        println!(
            "Successfully compiled {} bytes to {} ({} warnings)",
            data_size,
            output_file,
            assembly.diagnostics.warning_count()
        );
    }
}

/// argv[0], or the default binary name when the OS passed an empty argv.
fn program_name(args: &[String]) -> &str {
    args.first()
        .map(String::as_str)
        .unwrap_or("mapscript-compiler")
}

fn print_usage(program_name: &str) {
    println!("Usage: {} [options] <input>", program_name);
    println!();
    println!("Options:");
    println!("  -o, --output <file>     Output filename (default: input.bin)");
    println!("  --commands <file>       Command table in TOML (default: built-in set)");
    println!("  -l, --listing <file>    Write an address/bytes/source listing");
    println!("  --symbols               Print labels and variables after compiling");
    println!("  -v, --verbose           Verbose output");
    println!("  -h, --help              Show this help message");
    println!();
    println!("Examples:");
    println!(
        "  {} route1.script                    # Compile to route1.bin",
        program_name
    );
    println!(
        "  {} -l town.lst --symbols town.script",
        program_name
    );
    println!(
        "  {} --commands custom.toml event.script",
        program_name
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_from_argv() {
        let args = vec!["./mapscript-compiler".to_string(), "town.script".to_string()];
        assert_eq!(program_name(&args), "./mapscript-compiler");
    }

    #[test]
    fn test_program_name_with_empty_argv() {
        assert_eq!(program_name(&[]), "mapscript-compiler");
    }
}
