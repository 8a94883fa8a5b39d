use assist_core::core::engine::MAX_SUGGESTIONS;
use assist_core::core::types::{ControlKey, Event, Outcome};
use assist_core::AssistEngine;
use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEventKind};
use crossterm::style::Stylize;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::execute;
use std::io::{self, stdin, stdout, Write};
use std::path::Path;

const STORE_DIR: &str = "assist_store";
const EXPORT_FILE: &str = "word_frequency_backup.txt";

fn main() {
    env_logger::init();
    let mut engine = AssistEngine::from_store_or_new(Path::new(STORE_DIR));

    // Startup backup of the learned dictionary, same payload as `export`.
    if let Err(e) = std::fs::write(Path::new(STORE_DIR).join(EXPORT_FILE), engine.frequency_export()) {
        eprintln!("[warn] could not write startup backup: {}", e);
    }

    let mut transcript: Vec<String> = Vec::new();

    println!("Word guessing assistant. {} words learned.", engine.dictionary_size());
    println!("---------------------------------------------------------------");
    println!("Commands:");
    println!("  round <masked>         start a round (e.g. 'round __k_ ___')");
    println!("  chat <speaker>: <text> feed a chat message");
    println!("  answer <word>          conclude the round with the revealed word");
    println!("  type                   guess interactively (arrows cycle, Esc leaves)");
    println!("  export                 print the dictionary backup payload");
    println!("  exit                   save and quit\n");

    loop {
        print!("> ");
        stdout().flush().ok();

        let mut line = String::new();
        match stdin().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "exit" => break,
            "round" if !rest.is_empty() => {
                transcript.clear();
                let outcome = engine.handle_event(Event::PatternReveal {
                    masked: rest.to_string(),
                    concluded: false,
                });
                if let Outcome::SetGuess(word) = outcome {
                    println!("only one candidate, auto-filled: {}", word.as_str().bold());
                }
                print_suggestions(&engine);
            }
            "chat" if !rest.is_empty() => {
                transcript.push(rest.to_string());
                engine.handle_event(Event::TranscriptUpdate {
                    messages: transcript.clone(),
                });
                print_suggestions(&engine);
            }
            "answer" if !rest.is_empty() => {
                engine.handle_event(Event::PatternReveal {
                    masked: rest.to_string(),
                    concluded: true,
                });
                println!("recorded '{}', {} words known", rest, engine.dictionary_size());
            }
            "type" => {
                if let Err(e) = guess_loop(&mut engine) {
                    eprintln!("[warn] terminal error: {}", e);
                }
            }
            "export" => println!("{}", engine.frequency_export()),
            "" => {}
            _ => println!("unknown command '{}'", command),
        }
    }

    println!("\nSaving dictionary...");
    engine.save();
}

fn print_suggestions(engine: &AssistEngine) {
    let suggestions = engine.suggestions(MAX_SUGGESTIONS);
    if suggestions.is_empty() {
        println!("no suggestions.");
        return;
    }
    for row in suggestions {
        println!("  {:<20} {:>3} {:>3}", row.word.as_str().bold(), row.count, row.amplified);
    }
}

/// Raw-mode guessing loop: arrows and Enter go to the engine exactly as a
/// browser key handler would see them, anything printable edits the local
/// field. The engine sees the field state from before the key is applied.
fn guess_loop(engine: &mut AssistEngine) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let result = run_field(engine);
    terminal::disable_raw_mode()?;
    println!();
    result
}

fn run_field(engine: &mut AssistEngine) -> io::Result<()> {
    let mut text = String::new();
    let mut caret: usize = 0;

    render(engine, &text)?;
    loop {
        let TermEvent::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        let control = match key.code {
            KeyCode::Esc => return Ok(()),
            KeyCode::Enter => Some(ControlKey::Submit),
            KeyCode::Left => Some(ControlKey::Left),
            KeyCode::Right => Some(ControlKey::Right),
            KeyCode::Up => Some(ControlKey::Up),
            KeyCode::Down => Some(ControlKey::Down),
            _ => None,
        };

        let outcome = engine.handle_event(Event::Input {
            key: control,
            text: text.clone(),
            caret,
        });
        match outcome {
            Outcome::SetGuess(word) => {
                caret = word.chars().count();
                text = word;
            }
            Outcome::ClearGuess => {
                text.clear();
                caret = 0;
            }
            Outcome::Idle => apply_editing_key(key.code, &mut text, &mut caret),
        }
        render(engine, &text)?;
    }
}

fn apply_editing_key(code: KeyCode, text: &mut String, caret: &mut usize) {
    match code {
        KeyCode::Char(c) => {
            text.insert(byte_offset(text, *caret), c);
            *caret += 1;
        }
        KeyCode::Backspace => {
            if *caret > 0 {
                *caret -= 1;
                text.remove(byte_offset(text, *caret));
            }
        }
        KeyCode::Left => *caret = caret.saturating_sub(1),
        KeyCode::Right => *caret = (*caret + 1).min(text.chars().count()),
        _ => {}
    }
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

fn render(engine: &AssistEngine, text: &str) -> io::Result<()> {
    let mut out = stdout();
    let listing = engine
        .suggestions(5)
        .into_iter()
        .map(|s| format!("{} ({})", s.word, s.amplified))
        .collect::<Vec<_>>()
        .join("  ");
    execute!(out, Clear(ClearType::CurrentLine), MoveToColumn(0))?;
    write!(out, "[guess] {}  {}", text.bold(), listing.dark_grey())?;
    out.flush()
}
