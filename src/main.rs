use std::{fs, io::BufRead};

use ll1_parser_helper::Grammar;

fn print_help() {
    println!("Usage: ll1-parser-helper [actions] outputs [options] [grammar file]");
    println!("actions:");
    println!("  elf: Eliminate left recursion");
    println!("outputs:");
    println!("  prod: Productions");
    println!("  nff: Nullable first and follow");
    println!("  ll1: LL(1) parsing table");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
}

fn main() {
    let mut actions: Vec<&str> = Vec::new();
    let mut outputs: Vec<&str> = Vec::new();
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let mut i: usize = 0;
    while i < args.len() && args[i] == "elf" {
        actions.push(args[i].as_str());
        i += 1;
    }
    while i < args.len() && ["prod", "nff", "ll1"].contains(&args[i].as_str()) {
        outputs.push(args[i].as_str());
        i += 1;
    }

    enum OutputFormat {
        Plain,
        LaTeX,
        Json,
    }
    let mut output_format = OutputFormat::Plain;

    while i < args.len() && ["-h", "--help", "-l", "-j"].contains(&args[i].as_str()) {
        if args[i] == "-h" || args[i] == "--help" {
            print_help();
            return;
        } else if args[i] == "-l" {
            output_format = OutputFormat::LaTeX;
        } else if args[i] == "-j" {
            output_format = OutputFormat::Json;
        }
        i += 1;
    }

    if i + 1 < args.len() || outputs.is_empty() {
        print_help();
        std::process::exit(2);
    }

    let input: String = if i == args.len() {
        std::io::stdin()
            .lock()
            .lines()
            .map(|l| l.unwrap())
            .collect::<Vec<String>>()
            .join("\n")
    } else {
        match fs::read_to_string(args[i].as_str()) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("failed to read {}: {}", args[i], e);
                std::process::exit(1);
            }
        }
    };

    let mut g = match Grammar::parse(&input) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    for action in actions {
        if action == "elf" {
            g.eliminate_left_recursion();
        }
    }

    let nff = g.nullable_first_follow();
    let mut failed = false;

    for output in outputs {
        if output == "prod" {
            let t = g.to_production_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
        }
        if output == "nff" {
            let t = g.to_non_terminal_output_vec(&nff);
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
        }
        if output == "ll1" {
            let t = g.to_ll1_table_output(&nff);
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
            if let Err(e) = g.ll1_table(&nff) {
                eprintln!("{}", e);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
