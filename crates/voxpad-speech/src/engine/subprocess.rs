//! Subprocess speech backend — one short-lived child per utterance.
//!
//! Each [`speak`] spawns the platform speech program (`say`, `espeak-ng`
//! or `espeak`), feeds it the sentence on stdin and reaps it. The child
//! handle lives in a `Mutex<Option<Child>>` so that [`interrupt`] can kill
//! it from another thread while the worker is blocked in the reap loop; a
//! killed or vanished child is a clean interruption, never an error.
//!
//! [`speak`]: super::SpeechEngine::speak
//! [`interrupt`]: super::SpeechEngine::interrupt

use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;

use tracing::{debug, warn};

use voxpad_core::DEFAULT_RATE;

use super::{EngineError, SpeechEngine, Voice};

/// How often the reap loop re-checks the child while an utterance plays.
const REAP_POLL: Duration = Duration::from_millis(20);

// ── Program table ──────────────────────────────────────────────────

/// The speech programs this backend knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechProgram {
    /// macOS `say`.
    Say,
    /// `espeak-ng`, the maintained espeak fork.
    EspeakNg,
    /// Legacy `espeak`.
    Espeak,
}

impl SpeechProgram {
    /// The binary name probed on `PATH`.
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Say => "say",
            Self::EspeakNg => "espeak-ng",
            Self::Espeak => "espeak",
        }
    }

    /// Flag that sets the words-per-minute rate.
    const fn rate_flag(self) -> &'static str {
        match self {
            Self::Say => "-r",
            Self::EspeakNg | Self::Espeak => "-s",
        }
    }

    /// Flag that selects a voice. Omitted entirely for the default
    /// sentinel so the program uses its own default voice.
    const fn voice_flag(self) -> &'static str {
        "-v"
    }
}

// ── Applied settings ───────────────────────────────────────────────

/// Rate/voice values applied to the next spawned child.
#[derive(Debug, Clone)]
struct AppliedSettings {
    rate: u32,
    voice: Option<String>,
}

impl Default for AppliedSettings {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            voice: None,
        }
    }
}

// ── Engine ─────────────────────────────────────────────────────────

/// [`SpeechEngine`] backed by a platform speech program.
pub struct SubprocessEngine {
    program: SpeechProgram,
    path: PathBuf,

    /// The child currently vocalizing, if any. `interrupt` takes and
    /// kills it; the reap loop treats the emptied slot as interruption.
    child: Mutex<Option<Child>>,

    settings: Mutex<AppliedSettings>,
}

impl SubprocessEngine {
    /// Wrap a resolved speech program.
    #[must_use]
    pub fn new(program: SpeechProgram, path: PathBuf) -> Self {
        Self {
            program,
            path,
            child: Mutex::new(None),
            settings: Mutex::new(AppliedSettings::default()),
        }
    }

    /// Build the argument list for one utterance from the applied
    /// settings. The sentence itself arrives on stdin.
    fn utterance_args(&self) -> Vec<String> {
        let settings = self.settings.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut args = vec![
            self.program.rate_flag().to_string(),
            settings.rate.to_string(),
        ];
        if let Some(ref voice) = settings.voice {
            args.push(self.program.voice_flag().to_string());
            args.push(voice.clone());
        }
        args
    }

    /// Block until the stashed child exits or is taken by `interrupt`.
    fn reap(&self) {
        loop {
            {
                let mut slot = self
                    .child
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                let Some(child) = slot.as_mut() else {
                    // interrupt() took and killed the child.
                    debug!(program = self.program.binary(), "Utterance interrupted");
                    return;
                };
                match child.try_wait() {
                    Ok(Some(status)) => {
                        if !status.success() {
                            // A killed child reports failure on most
                            // platforms; anything else is still worth a log.
                            debug!(
                                program = self.program.binary(),
                                %status,
                                "Speech child exited without success"
                            );
                        }
                        *slot = None;
                        return;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(program = self.program.binary(), error = %e, "Failed to poll speech child");
                        let _ = child.kill();
                        let _ = child.wait();
                        *slot = None;
                        return;
                    }
                }
            }
            std::thread::sleep(REAP_POLL);
        }
    }
}

impl SpeechEngine for SubprocessEngine {
    fn speak(&self, text: &str) -> Result<(), EngineError> {
        let mut child = Command::new(&self.path)
            .args(self.utterance_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: self.program.binary().to_string(),
                source,
            })?;

        let stdin = child.stdin.take();

        // Stash the child before writing so a concurrent interrupt can
        // reach it even while stdin is still being fed.
        *self
            .child
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(child);

        if let Some(mut stdin) = stdin {
            // A broken pipe means the child was already killed — that is
            // an interruption, not a failure.
            if let Err(e) = stdin.write_all(text.as_bytes()).and_then(|()| stdin.write_all(b"\n")) {
                debug!(error = %e, "Speech child stdin closed early");
            }
        }

        self.reap();
        Ok(())
    }

    fn interrupt(&self) {
        let taken = self
            .child
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(mut child) = taken {
            let _ = child.kill();
            let _ = child.wait();
            debug!(program = self.program.binary(), "Killed in-flight speech child");
        }
    }

    fn set_rate(&self, wpm: u32) {
        self.settings
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .rate = wpm;
    }

    fn set_voice(&self, voice_id: Option<&str>) {
        self.settings
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .voice = voice_id.map(str::to_string);
    }

    fn list_voices(&self) -> Result<Vec<Voice>, EngineError> {
        let output = match self.program {
            SpeechProgram::Say => Command::new(&self.path).args(["-v", "?"]).output(),
            SpeechProgram::EspeakNg | SpeechProgram::Espeak => {
                Command::new(&self.path).arg("--voices").output()
            }
        }
        .map_err(|e| EngineError::ListVoices(e.to_string()))?;

        if !output.status.success() {
            return Err(EngineError::ListVoices(format!(
                "{} exited with {}",
                self.program.binary(),
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(match self.program {
            SpeechProgram::Say => parse_say_voices(&stdout),
            SpeechProgram::EspeakNg | SpeechProgram::Espeak => parse_espeak_voices(&stdout),
        })
    }

    fn name(&self) -> &'static str {
        self.program.binary()
    }
}

// ── Voice list parsers ─────────────────────────────────────────────

/// Parse `espeak-ng --voices` / `espeak --voices` output.
///
/// The listing is column-formatted; the language code (column 2) is the
/// id the `-v` flag accepts, and the voice name runs from column 4 up to
/// the voice file column (recognisable by its `dir/voice` shape).
#[must_use]
pub fn parse_espeak_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 || fields[0].parse::<u32>().is_err() {
                // Header line or malformed row.
                return None;
            }
            let id = fields[1].to_string();
            let name: String = fields[3..]
                .iter()
                .take_while(|f| !f.contains('/'))
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            let name = if name.is_empty() { id.clone() } else { name };
            Some(Voice { id, name })
        })
        .collect()
}

/// Parse `say -v ?` output.
///
/// Each line is `Name  locale  # sample sentence`; names may contain
/// spaces, so the locale is recognised as the last token before the `#`.
#[must_use]
pub fn parse_say_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter_map(|line| {
            let left = line.split('#').next().unwrap_or("").trim_end();
            let mut tokens: Vec<&str> = left.split_whitespace().collect();
            let locale = tokens.pop()?;
            if tokens.is_empty() {
                return None;
            }
            let name = tokens.join(" ");
            Some(Voice {
                id: name.clone(),
                name: format!("{name} ({locale})"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESPEAK_SAMPLE: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 5  am              --/M      Amharic            sem/am
 2  en-gb           --/M      English (Great Britain) gmw/en       (en 2)
 5  en-us           --/M      English (America)  gmw/en-US        (en 3)
 5  pt-br           --/M      Portuguese (Brazil) roa/pt-BR       (pt 6)
";

    const SAY_SAMPLE: &str = "\
Alex                en_US    # Most people recognize me by my voice.
Alice               it_IT    # Salve, mi chiamo Alice e sono una voce italiana.
Bad News            en_US    # The light you see at the end of the tunnel is the headlamp of a fast approaching train.
Luciana             pt_BR    # Ol\u{e1}, meu nome \u{e9} Luciana.
";

    #[test]
    fn espeak_parser_skips_header_and_extracts_ids() {
        let voices = parse_espeak_voices(ESPEAK_SAMPLE);
        assert_eq!(voices.len(), 5);
        assert_eq!(voices[0], Voice {
            id: "af".to_string(),
            name: "Afrikaans".to_string(),
        });
    }

    #[test]
    fn espeak_parser_keeps_multi_word_names() {
        let voices = parse_espeak_voices(ESPEAK_SAMPLE);
        let en_gb = voices.iter().find(|v| v.id == "en-gb").unwrap();
        assert_eq!(en_gb.name, "English (Great Britain)");

        let pt_br = voices.iter().find(|v| v.id == "pt-br").unwrap();
        assert_eq!(pt_br.name, "Portuguese (Brazil)");
    }

    #[test]
    fn espeak_parser_handles_empty_output() {
        assert!(parse_espeak_voices("").is_empty());
        assert!(parse_espeak_voices("Pty Language Age/Gender VoiceName File\n").is_empty());
    }

    #[test]
    fn say_parser_extracts_name_and_locale() {
        let voices = parse_say_voices(SAY_SAMPLE);
        assert_eq!(voices.len(), 4);
        assert_eq!(voices[0], Voice {
            id: "Alex".to_string(),
            name: "Alex (en_US)".to_string(),
        });
    }

    #[test]
    fn say_parser_keeps_multi_word_names() {
        let voices = parse_say_voices(SAY_SAMPLE);
        let bad_news = voices.iter().find(|v| v.id == "Bad News").unwrap();
        assert_eq!(bad_news.name, "Bad News (en_US)");
    }

    #[test]
    fn say_parser_ignores_blank_lines() {
        assert!(parse_say_voices("\n\n").is_empty());
    }

    #[test]
    fn utterance_args_include_rate_and_optional_voice() {
        let engine = SubprocessEngine::new(SpeechProgram::EspeakNg, PathBuf::from("/usr/bin/espeak-ng"));
        assert_eq!(engine.utterance_args(), vec!["-s", "175"]);

        engine.set_rate(220);
        engine.set_voice(Some("pt-br"));
        assert_eq!(engine.utterance_args(), vec!["-s", "220", "-v", "pt-br"]);

        engine.set_voice(None);
        assert_eq!(engine.utterance_args(), vec!["-s", "220"]);
    }

    #[test]
    fn say_uses_its_own_rate_flag() {
        let engine = SubprocessEngine::new(SpeechProgram::Say, PathBuf::from("/usr/bin/say"));
        assert_eq!(engine.utterance_args(), vec!["-r", "175"]);
    }

    #[test]
    fn interrupt_with_no_child_is_a_no_op() {
        let engine = SubprocessEngine::new(SpeechProgram::Espeak, PathBuf::from("/usr/bin/espeak"));
        engine.interrupt();
        engine.interrupt();
    }
}
