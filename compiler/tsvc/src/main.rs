//! `tsv`: type-error assertion verifier CLI.

use tsvc::commands::{parse_check_args, print_markers, run_check};

fn main() {
    tsvc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "check" => {
            let check = match parse_check_args(&args[2..]) {
                Ok(check) => check,
                Err(e) => {
                    eprintln!("error: {e}");
                    eprintln!();
                    print_check_usage();
                    std::process::exit(1);
                }
            };
            std::process::exit(run_check(&check));
        }
        "markers" => {
            if args.len() < 3 {
                eprintln!("Usage: tsv markers <file.ts>");
                std::process::exit(1);
            }
            std::process::exit(print_markers(&args[2]));
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("tsv {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("tsv: verify expected type errors in TypeScript fragments");
    println!();
    println!("Usage: tsv <command> [options]");
    println!();
    println!("Commands:");
    println!("  check [path]         Verify fragments (default: current directory)");
    println!("  markers <file.ts>    Show the markers extracted from one fragment");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    print_check_usage();
}

fn print_check_usage() {
    println!("Check options:");
    println!("  --tsc=<path>            Compiler executable (default: $TSV_TSC or tsc)");
    println!("  --shared=<file>         Shared declaration file (repeatable)");
    println!("  --option=<name>=<val>   Compiler option for every fragment (repeatable)");
    println!("  --timeout=<secs>        Per-fragment timeout (default: 30)");
    println!("  --tolerance=<lines>     Lines above a marker a diagnostic may sit (default: 2)");
    println!("  --jobs=<n>              Worker threads");
    println!("  --no-parallel           Verify fragments one at a time");
    println!("  --format=text|json      Report format (default: text)");
    println!("  --filter=<substr>       Only fragments whose path contains substr");
    println!("  --xfail=<file>          Expected-failure list (labels only; failures still fail)");
    println!("  -v, --verbose           List passing fragments and timings");
    println!();
    println!("Logging: set TSV_LOG (e.g. TSV_LOG=tsvc=debug).");
}
