//! Interactive playback control prompt.
//!
//! After `voxpad read` starts a session, this loop accepts the same
//! commands an editor toolbar would offer: the five playback affordances
//! plus the two settings controls. Enablement is derived from the port's
//! status the same way a toolbar would derive it, so a refused command
//! explains itself instead of silently doing nothing.

use std::sync::Arc;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use voxpad_core::{ControlStates, SpeechPlaybackPort, SpeechPortError};
use voxpad_speech::{SpeechService, status_label};

/// One parsed control-prompt command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    Pause,
    Resume,
    Stop,
    Status,
    Rate(u32),
    Voice(String),
    Voices,
    Help,
    Quit,
}

/// Parse one non-empty prompt line.
pub fn parse_control_command(line: &str) -> Result<ControlCommand, String> {
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or("");
    match head {
        "pause" | "p" => Ok(ControlCommand::Pause),
        "resume" | "r" => Ok(ControlCommand::Resume),
        "stop" | "s" => Ok(ControlCommand::Stop),
        "status" => Ok(ControlCommand::Status),
        "voices" => Ok(ControlCommand::Voices),
        "help" | "?" => Ok(ControlCommand::Help),
        "quit" | "q" | "exit" => Ok(ControlCommand::Quit),
        "rate" => parts
            .next()
            .ok_or_else(|| "usage: rate <wpm>".to_string())?
            .parse()
            .map(ControlCommand::Rate)
            .map_err(|_| "rate expects a number of words per minute".to_string()),
        "voice" => {
            let id = parts.collect::<Vec<_>>().join(" ");
            if id.is_empty() {
                Err("usage: voice <id>".to_string())
            } else {
                Ok(ControlCommand::Voice(id))
            }
        }
        other => Err(format!("unknown command: {other} (try 'help')")),
    }
}

/// Run the control prompt until quit or end of input.
pub async fn run(service: Arc<SpeechService>) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("Playback started. Type 'help' for commands.");

    loop {
        match editor.readline("voxpad> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(trimmed);
                match parse_control_command(trimmed) {
                    Ok(ControlCommand::Quit) => break,
                    Ok(command) => dispatch(&service, command).await,
                    Err(message) => println!("{message}"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    // Leave nothing speaking behind on the way out.
    let _ = service.stop().await;
    Ok(())
}

/// Execute one command, printing enablement-aware feedback.
async fn dispatch(service: &Arc<SpeechService>, command: ControlCommand) {
    let controls = ControlStates::from_status(service.status().await);

    match command {
        ControlCommand::Pause => {
            if controls.pause_enabled {
                report(service.pause().await);
            } else {
                println!("Nothing is being spoken.");
            }
        }
        ControlCommand::Resume => {
            if controls.resume_enabled {
                report(service.resume().await);
            } else {
                println!("Playback is not paused.");
            }
        }
        ControlCommand::Stop => {
            if controls.stop_enabled {
                report(service.stop().await);
            } else {
                println!("Nothing to stop.");
            }
        }
        ControlCommand::Status => {
            let status = service.status().await;
            match service.snapshot() {
                Some(snapshot) if status.active && snapshot.sentence_count > 0 => {
                    println!(
                        "state: {} (sentence {} of {})",
                        status_label(status),
                        snapshot.current_index + 1,
                        snapshot.sentence_count
                    );
                }
                _ => println!("state: {}", status_label(status)),
            }
        }
        ControlCommand::Rate(wpm) => {
            match service.set_rate(wpm).await {
                Ok(()) if controls.settings_enabled => println!("Rate set to {wpm} wpm."),
                Ok(()) => println!("Rate stored; it applies from the next reading."),
                Err(e) => println!("{e}"),
            }
        }
        ControlCommand::Voice(id) => {
            match service.set_voice(&id).await {
                Ok(()) if controls.settings_enabled => println!("Voice set to {id}."),
                Ok(()) => println!("Voice stored; it applies from the next reading."),
                Err(e) => println!("{e}"),
            }
        }
        ControlCommand::Voices => match service.list_voices().await {
            Ok(voices) => {
                for voice in voices {
                    println!("{:<24} {}", voice.id, voice.name);
                }
            }
            Err(e) => println!("{e}"),
        },
        ControlCommand::Help => print_help(),
        ControlCommand::Quit => unreachable!("handled by the caller"),
    }
}

fn report(result: Result<(), SpeechPortError>) {
    if let Err(e) = result {
        println!("{e}");
    }
}

fn print_help() {
    println!("Commands:");
    println!("  pause        pause at the current sentence");
    println!("  resume       continue from the paused sentence");
    println!("  stop         stop reading and reset position");
    println!("  status       show playback state and progress");
    println!("  rate <wpm>   set the speaking rate (90-280)");
    println!("  voice <id>   select a voice ('default' for the engine default)");
    println!("  voices       list available voices");
    println!("  quit         stop and leave the prompt");
}
