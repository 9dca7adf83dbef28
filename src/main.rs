use std::env;
use std::fs;
use std::process;

use charly::{repl, Interpreter};

fn main() {
    let mut no_prelude = false;
    let mut path: Option<String> = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--no-prelude" => no_prelude = true,
            "--help" | "-h" => {
                println!("Usage: charly [--no-prelude] [file]");
                return;
            }
            _ => path = Some(arg),
        }
    }

    let Some(path) = path else {
        repl::start(!no_prelude);
        return;
    };

    let source = fs::read_to_string(&path).unwrap_or_else(|err| {
        eprintln!("Failed to read {}: {}", path, err);
        process::exit(1);
    });

    let mut interpreter = if no_prelude {
        Interpreter::without_prelude()
    } else {
        match Interpreter::new() {
            Ok(interpreter) => interpreter,
            Err(err) => {
                eprintln!("{}", err);
                process::exit(1);
            }
        }
    };
    interpreter.set_program_path(&path);

    match interpreter.run(&source) {
        Ok(_) => print!("{}", interpreter.output()),
        Err(err) => {
            print!("{}", interpreter.output());
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
