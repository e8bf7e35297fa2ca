use std::env::args;
use std::fs::File;
use std::io::prelude::*;
use std::io::stdout;
use std::io::BufReader;

use anyhow::{Context, Result};

use basic_rs::parser::Parser;
use basic_rs::runtime::{run_program, stock_interpreter, CancelFlag, Interpreter};
use basic_rs::scanner::Scanner;

fn main() -> Result<()> {
    let args = args();
    if args.len() > 2 {
        let mut stderr = std::io::stderr().lock();
        stderr
            .write_all("Usage: basic-rs [script]".as_bytes())
            .unwrap();
        std::process::exit(64);
    } else if args.len() == 2 {
        // Size is validated
        let script_path = args.skip(1).next().unwrap();
        let mut file = File::open(&script_path).context("Unable to open script file")?;
        let mut script = String::new();
        file.read_to_string(&mut script)
            .context("Unable to read script file")?;
        run_script(&script, &script_path);
    } else {
        run_prompt()?;
    }
    Ok(())
}

fn run_script(script: &str, path: &str) {
    let mut interpreter = stock_interpreter();
    match Parser::new(Scanner::with_file(script, path)) {
        Ok(mut parser) => {
            if let Err(error) = run_program(&mut interpreter, &mut parser, &CancelFlag::new()) {
                eprintln!("{}", error);
            }
        }
        Err(error) => eprintln!("{}", error),
    }
}

fn run_prompt() -> Result<()> {
    let stdin = std::io::stdin().lock();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();
    let mut interpreter = stock_interpreter();
    loop {
        {
            let mut stdout = stdout().lock();
            stdout.write_all("> ".as_bytes()).unwrap();
            stdout.flush()?;
        }
        let n = reader.read_line(&mut line)?;
        if n == 0 || line.trim().is_empty() {
            break;
        }
        run_line(&mut interpreter, &line);
        // Don't keep appending code until the next time
        line.clear();
    }
    Ok(())
}

// One REPL line may hold several statements; errors end the line but the
// interpreter (and its variables) survive for the next one.
fn run_line(interpreter: &mut Interpreter, line: &str) {
    let mut parser = match Parser::new(Scanner::new(line)) {
        Ok(parser) => parser,
        Err(error) => {
            eprintln!("{}", error);
            return;
        }
    };
    loop {
        match parser.parse_statement() {
            Ok(Some(statement)) => {
                if let Err(error) = interpreter.execute_statement(&statement) {
                    eprintln!("{}", error);
                    break;
                }
            }
            Ok(None) => break,
            Err(error) => {
                eprintln!("{}", error);
                break;
            }
        }
    }
}
