//! Narrative generation seam.
//!
//! A [`Narrator`] turns a text and its scores into a prose explanation. The
//! core never depends on a particular generator: [`CommandNarrator`] pipes a
//! rendered prompt through any configured program (an LLM CLI, a script) and
//! reads the narrative from its standard output.
//!
//! Every failure is reported as a [`NarrativeError`] so callers can fall back
//! to a report without a narrative.

use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{NarrativeError, NarrativeResult};
use crate::metrics::ScoreSet;
use crate::readability::Text;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

const DEFAULT_PROMPT_TEMPLATE: &str = "\
Role: {role}
Goal: {goal}
Max Iterations: {max_iterations}
Allow Delegation: {allow_delegation}

Backstory:
{backstory}

The text to analyze is:
{text}

The readability scores are:
{scores}

Explain why the text received these scores.
";

/// Persona and process settings for narrative generation.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Role the generator is asked to play.
    pub role: String,
    /// What the generator should achieve.
    pub goal: String,
    /// Background given to the generator.
    pub backstory: String,
    /// Iteration budget passed through to the generator.
    pub max_iterations: u32,
    /// Whether the generator may hand work to other agents.
    pub allow_delegation: bool,
    /// Prompt with `{role}`, `{goal}`, `{backstory}`, `{max_iterations}`,
    /// `{allow_delegation}`, `{text}` and `{scores}` placeholders.
    pub prompt_template: String,
    /// Program and arguments that read a prompt on stdin and print a
    /// narrative on stdout. Narratives are disabled when unset.
    pub command: Option<Vec<String>>,
    /// Seconds to wait for the program before killing it.
    pub timeout_secs: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            role: "Readability Analyzer".to_string(),
            goal: "Analyze readability scores and explain why the text received these scores."
                .to_string(),
            backstory: "You are an expert in text analysis, specializing in readability \
                        metrics. Your primary mission is to ensure that the readability \
                        analysis is accurate and informative."
                .to_string(),
            max_iterations: 15,
            allow_delegation: false,
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            command: None,
            timeout_secs: 120,
        }
    }
}

impl NarrativeConfig {
    /// Whether `prompt_template` differs from the built-in one.
    pub fn has_custom_prompt(&self) -> bool {
        self.prompt_template != DEFAULT_PROMPT_TEMPLATE
    }
}

/// What a narrator is asked to explain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeRequest<'a> {
    /// The analysed text, verbatim.
    pub text: &'a str,
    /// The scores as `ID: value` lines in fixed order.
    pub scores: String,
}

impl<'a> NarrativeRequest<'a> {
    /// Build a request from a text and its scores.
    pub fn new(text: &'a Text, scores: &ScoreSet) -> Self {
        Self {
            text: text.as_str(),
            scores: scores.to_listing(),
        }
    }
}

/// Fill the prompt template for one request.
pub fn render_prompt(config: &NarrativeConfig, request: &NarrativeRequest<'_>) -> String {
    // Request fields go last so placeholders inside the user's text stay literal
    config
        .prompt_template
        .replace("{role}", &config.role)
        .replace("{goal}", &config.goal)
        .replace("{backstory}", &config.backstory)
        .replace("{max_iterations}", &config.max_iterations.to_string())
        .replace("{allow_delegation}", &config.allow_delegation.to_string())
        .replace("{scores}", &request.scores)
        .replace("{text}", request.text)
}

/// Produces a free-text explanation of a score set.
pub trait Narrator {
    /// Explain the scores for the requested text.
    ///
    /// # Errors
    ///
    /// Returns a [`NarrativeError`] when no narrative could be produced.
    fn narrate(&self, request: &NarrativeRequest<'_>) -> NarrativeResult<String>;
}

/// Runs an external program as the narrator.
#[derive(Debug, Clone)]
pub struct CommandNarrator {
    config: NarrativeConfig,
    program: String,
    args: Vec<String>,
}

impl CommandNarrator {
    /// Build a narrator from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::Disabled`] when no command is configured.
    pub fn from_config(config: &NarrativeConfig) -> NarrativeResult<Self> {
        let (program, args) = config
            .command
            .as_deref()
            .and_then(<[String]>::split_first)
            .ok_or(NarrativeError::Disabled)?;
        Ok(Self {
            config: config.clone(),
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// The program this narrator runs.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Narrator for CommandNarrator {
    #[tracing::instrument(skip_all, fields(program = %self.program))]
    fn narrate(&self, request: &NarrativeRequest<'_>) -> NarrativeResult<String> {
        let prompt = render_prompt(&self.config, request);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| NarrativeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let writer = pump(move || feed_prompt(stdin, &prompt));
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        let secs = self.config.timeout_secs;
        let deadline = Instant::now() + Duration::from_secs(secs);
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                tracing::warn!(secs, "narrator timed out, killing it");
                child.kill()?;
                child.wait()?;
                return Err(NarrativeError::Timeout { secs });
            }
            thread::sleep(POLL_INTERVAL);
        };

        // Background children may hold the pipes open after the narrator exits
        let stdout = drain(&stdout, deadline, secs)?;
        let stderr = drain(&stderr, deadline, secs)?;
        drain(&writer, deadline, secs)?;

        if !status.success() {
            return Err(NarrativeError::Failed {
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        let narrative = stdout.trim();
        if narrative.is_empty() {
            return Err(NarrativeError::Empty);
        }
        tracing::debug!(len = narrative.len(), "narrative received");
        Ok(narrative.to_string())
    }
}

fn feed_prompt(stdin: Option<impl Write>, prompt: &str) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(prompt.as_bytes()) {
        // Programs may exit without reading their input
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn spawn_reader<R: Read + Send + 'static>(source: Option<R>) -> Receiver<io::Result<String>> {
    pump(move || {
        let mut buf = Vec::new();
        if let Some(mut source) = source {
            source.read_to_end(&mut buf)?;
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    })
}

/// Run blocking pipe I/O on its own thread and hand back the result.
///
/// The thread is detached. It ends once its pipe closes, even when nobody is
/// waiting for the result any more.
fn pump<T, F>(work: F) -> Receiver<io::Result<T>>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The receiver is gone after a timeout
        let _ = tx.send(work());
    });
    rx
}

fn drain<T>(result: &Receiver<io::Result<T>>, deadline: Instant, secs: u64) -> NarrativeResult<T> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    match result.recv_timeout(remaining) {
        Ok(output) => Ok(output?),
        Err(RecvTimeoutError::Timeout) => {
            tracing::warn!(secs, "narrator output still open at the deadline");
            Err(NarrativeError::Timeout { secs })
        }
        Err(RecvTimeoutError::Disconnected) => {
            Err(io::Error::other("narrator pipe thread panicked").into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NarrativeRequest<'static> {
        NarrativeRequest {
            text: "The cat sat.",
            scores: "FRE: 119.19\nDW: 0".to_string(),
        }
    }

    fn shell(script: &str, timeout_secs: u64) -> CommandNarrator {
        let config = NarrativeConfig {
            command: Some(vec!["sh".into(), "-c".into(), script.into()]),
            timeout_secs,
            ..NarrativeConfig::default()
        };
        CommandNarrator::from_config(&config).unwrap()
    }

    #[test]
    fn prompt_fills_every_placeholder() {
        let prompt = render_prompt(&NarrativeConfig::default(), &request());
        assert!(prompt.contains("Role: Readability Analyzer"));
        assert!(prompt.contains("Max Iterations: 15"));
        assert!(prompt.contains("Allow Delegation: false"));
        assert!(prompt.contains("The cat sat."));
        assert!(prompt.contains("FRE: 119.19\nDW: 0"));
        assert!(!prompt.contains('{'), "{prompt}");
    }

    #[test]
    fn custom_prompt_is_detected() {
        let mut config = NarrativeConfig::default();
        assert!(!config.has_custom_prompt());
        config.prompt_template = "Explain {scores}".to_string();
        assert!(config.has_custom_prompt());
    }

    #[test]
    fn placeholders_in_user_text_stay_literal() {
        let req = NarrativeRequest {
            text: "Say {role} out loud.",
            scores: String::new(),
        };
        let prompt = render_prompt(&NarrativeConfig::default(), &req);
        assert!(prompt.contains("Say {role} out loud."));
    }

    #[test]
    fn no_command_means_disabled() {
        let err = CommandNarrator::from_config(&NarrativeConfig::default()).unwrap_err();
        assert!(matches!(err, NarrativeError::Disabled));

        let empty = NarrativeConfig {
            command: Some(Vec::new()),
            ..NarrativeConfig::default()
        };
        assert!(matches!(
            CommandNarrator::from_config(&empty),
            Err(NarrativeError::Disabled)
        ));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let config = NarrativeConfig {
            command: Some(vec!["readable-iq-no-such-narrator".into()]),
            ..NarrativeConfig::default()
        };
        let narrator = CommandNarrator::from_config(&config).unwrap();
        let err = narrator.narrate(&request()).unwrap_err();
        assert!(matches!(err, NarrativeError::Spawn { .. }), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn stdout_becomes_narrative() {
        let narrator = shell("cat > /dev/null; echo '  Short words keep it easy.  '", 10);
        assert_eq!(
            narrator.narrate(&request()).unwrap(),
            "Short words keep it easy."
        );
    }

    #[cfg(unix)]
    #[test]
    fn prompt_arrives_on_stdin() {
        let narrator = shell("cat", 10);
        let narrative = narrator.narrate(&request()).unwrap();
        assert!(narrative.contains("The text to analyze is:\nThe cat sat."));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_failure() {
        let narrator = shell("echo boom >&2; exit 3", 10);
        match narrator.narrate(&request()).unwrap_err() {
            NarrativeError::Failed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn blank_output_is_empty() {
        let narrator = shell("cat > /dev/null; printf '  \\n'", 10);
        assert!(matches!(
            narrator.narrate(&request()),
            Err(NarrativeError::Empty)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn slow_narrator_times_out() {
        let narrator = shell("exec sleep 5", 1);
        let start = Instant::now();
        assert!(matches!(
            narrator.narrate(&request()),
            Err(NarrativeError::Timeout { secs: 1 })
        ));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn inherited_pipes_do_not_outlive_timeout() {
        // The shell exits at once but its background child keeps stdout open
        let narrator = shell("cat > /dev/null; sleep 6 & echo hi", 1);
        let start = Instant::now();
        let result = narrator.narrate(&request());
        assert!(
            matches!(result, Err(NarrativeError::Timeout { secs: 1 })),
            "{result:?}"
        );
        assert!(start.elapsed() < Duration::from_secs(3));
    }
}
