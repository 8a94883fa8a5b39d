use assist_core::core::engine::MAX_SUGGESTIONS;
use assist_core::core::types::{ControlKey, Event, Outcome};
use assist_core::AssistEngine;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

// Line-protocol driver: an external host (page scraper, input hook) feeds
// events over stdin and applies the guess-field commands we write to stdout.

fn store_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("word-guess-assist");
    path
}

fn main() -> io::Result<()> {
    env_logger::init();

    let mut engine = AssistEngine::from_store_or_new(&store_dir());
    log::info!("engine ready, {} words learned", engine.dictionary_size());
    if let Err(e) = std::fs::write(store_dir().join("word_frequency_backup.txt"), engine.frequency_export()) {
        log::warn!("could not write startup backup: {}", e);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut transcript: Vec<String> = Vec::new();

    for line in stdin.lock().lines() {
        let input = line?;
        log::debug!("<- {:?}", input);
        let (command, rest) = input.split_once(' ').unwrap_or((input.as_str(), ""));

        match command {
            "REVEAL" => {
                transcript.clear();
                let outcome = engine.handle_event(Event::PatternReveal {
                    masked: rest.to_string(),
                    concluded: false,
                });
                respond(&engine, outcome, &mut stdout)?;
            }
            "REVEALED" => {
                let outcome = engine.handle_event(Event::PatternReveal {
                    masked: rest.to_string(),
                    concluded: true,
                });
                respond(&engine, outcome, &mut stdout)?;
            }
            "CHAT" => {
                transcript.push(rest.to_string());
                let outcome = engine.handle_event(Event::TranscriptUpdate {
                    messages: transcript.clone(),
                });
                respond(&engine, outcome, &mut stdout)?;
            }
            "KEY" => match parse_key(rest) {
                Some((key, caret, text)) => {
                    let outcome = engine.handle_event(Event::Input { key, text, caret });
                    respond(&engine, outcome, &mut stdout)?;
                }
                None => log::warn!("malformed KEY command: {:?}", rest),
            },
            "EXPORT" => {
                writeln!(stdout, "EXPORT_BEGIN")?;
                writeln!(stdout, "{}", engine.frequency_export())?;
                writeln!(stdout, "EXPORT_END")?;
                stdout.flush()?;
            }
            "EXIT" => {
                log::info!("received EXIT, saving dictionary");
                engine.save();
                break;
            }
            _ => log::warn!("unknown command {:?}", command),
        }
    }
    Ok(())
}

/// `KEY <code> <caret> <text...>`; code 0 stands for a plain typing key, and
/// the trailing text (possibly empty, possibly containing spaces) is the
/// guess field content when the key arrived.
fn parse_key(rest: &str) -> Option<(Option<ControlKey>, usize, String)> {
    let mut parts = rest.splitn(3, ' ');
    let code: u32 = parts.next()?.parse().ok()?;
    let caret: usize = parts.next()?.parse().ok()?;
    let text = parts.next().unwrap_or("").to_string();
    Some((ControlKey::from_code(code), caret, text))
}

fn respond(engine: &AssistEngine, outcome: Outcome, stdout: &mut io::Stdout) -> io::Result<()> {
    match outcome {
        Outcome::SetGuess(word) => {
            log::debug!("-> SET_GUESS_TEXT {}", word);
            writeln!(stdout, "SET_GUESS_TEXT {}", word)?;
        }
        Outcome::ClearGuess => {
            log::debug!("-> CLEAR_GUESS_TEXT");
            writeln!(stdout, "CLEAR_GUESS_TEXT")?;
        }
        Outcome::Idle => {}
    }

    let suggestions = engine.suggestions(MAX_SUGGESTIONS);
    if suggestions.is_empty() {
        writeln!(stdout, "HIDE_SUGGESTIONS")?;
    } else {
        for (i, row) in suggestions.iter().enumerate() {
            writeln!(stdout, "ADD_SUGGESTION {} '{}' {} {}", i, row.word, row.count, row.amplified)?;
        }
        writeln!(stdout, "SHOW_SUGGESTIONS")?;
    }
    stdout.flush()
}
