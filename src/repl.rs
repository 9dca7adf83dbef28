use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::{Interpreter, ValueKind};

pub fn start(load_prelude: bool) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("Cannot start interactive session: {}", err);
            std::process::exit(1);
        }
    };
    let history = history_file();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    let mut interpreter = build_interpreter(load_prelude);
    interpreter.set_program_path("<repl>");

    let mut pending = String::new();
    loop {
        let prompt = if pending.is_empty() {
            "charly> "
        } else {
            "   ...> "
        };
        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                pending.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", err);
                break;
            }
        };

        if !pending.is_empty() {
            pending.push('\n');
        }
        pending.push_str(&line);
        if needs_more_input(&pending) {
            continue;
        }

        let source = std::mem::take(&mut pending);
        let _ = editor.add_history_entry(&source);

        match interpreter.run(&source) {
            Ok(value) => {
                let printed = interpreter.take_output();
                print!("{}", printed);
                if printed.is_empty() && !matches!(value.kind, ValueKind::Null) {
                    println!("{}", value.to_string_value());
                }
            }
            Err(err) => {
                print!("{}", interpreter.take_output());
                eprintln!("{}", err);
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
}

fn build_interpreter(load_prelude: bool) -> Interpreter {
    if !load_prelude {
        return Interpreter::without_prelude();
    }
    match Interpreter::new() {
        Ok(interpreter) => interpreter,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Starting without the prelude");
            Interpreter::without_prelude()
        }
    }
}

/// An entry is evaluated only once every delimiter opened in it has been
/// closed. String literals, comments and an unfinished string or block
/// comment all hold the prompt open for another line.
fn needs_more_input(source: &str) -> bool {
    let mut open: Vec<char> = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                let mut closed = false;
                while let Some(inner) = chars.next() {
                    match inner {
                        '\\' => {
                            chars.next();
                        }
                        '"' => {
                            closed = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !closed {
                    return true;
                }
            }
            '/' => match chars.peek() {
                Some('/') => {
                    for inner in chars.by_ref() {
                        if inner == '\n' {
                            break;
                        }
                    }
                }
                Some('*') => {
                    chars.next();
                    let mut closed = false;
                    while let Some(inner) = chars.next() {
                        if inner == '*' && chars.peek() == Some(&'/') {
                            chars.next();
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        return true;
                    }
                }
                _ => {}
            },
            '(' | '[' | '{' => open.push(ch),
            ')' | ']' | '}' => {
                open.pop();
            }
            _ => {}
        }
    }
    !open.is_empty()
}

fn history_file() -> Option<std::path::PathBuf> {
    let home = std::env::var("HOME").ok()?;
    let dir = std::path::PathBuf::from(home).join(".charly");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("history"))
}

#[cfg(test)]
mod tests {
    use super::needs_more_input;

    #[test]
    fn balanced_input_is_complete() {
        assert!(!needs_more_input(""));
        assert!(!needs_more_input("let a = [1, 2]"));
        assert!(!needs_more_input("func f() { 1 }"));
    }

    #[test]
    fn open_delimiters_hold_the_prompt() {
        assert!(needs_more_input("func f() {"));
        assert!(needs_more_input("let a = [1,"));
        assert!(needs_more_input("f(1, 2"));
        assert!(!needs_more_input("func f() {\n  1\n}"));
    }

    #[test]
    fn delimiters_inside_strings_do_not_count() {
        assert!(!needs_more_input("let s = \"{ [ (\""));
        assert!(!needs_more_input("let s = \"quote: \\\" {\""));
    }

    #[test]
    fn unfinished_strings_hold_the_prompt() {
        assert!(needs_more_input("let s = \"unclosed"));
    }

    #[test]
    fn delimiters_inside_comments_do_not_count() {
        assert!(!needs_more_input("1 // {"));
        assert!(!needs_more_input("1 /* { */"));
        assert!(needs_more_input("1 /* {"));
    }
}
