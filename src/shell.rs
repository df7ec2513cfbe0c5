//! Terminal front-end: a [`Page`] on stdout/stderr and a line-command loop.
//!
//! Each input line is one page event. The form is re-rendered after every
//! change so the affix controls and the selected layout are always visible.
//!
//! # Commands
//!
//! | Command | Event |
//! |---------|-------|
//! | `add` | click "+" on the last field |
//! | `remove <id>` | click "-" on field `id` |
//! | `topic <id> <text>` | type `text` into field `id` |
//! | `layout <id>` | click a layout icon |
//! | `language <name>` | change the language select |
//! | `length standard\|advanced` | change the length select |
//! | `show` | print the form |
//! | `submit` | click "Produce newspaper" |
//! | `help` | list commands |
//! | `quit` | leave without submitting |

use crate::api::GenerateAsync;
use crate::controller::{DeskController, FormEvents};
use crate::form::TopicForm;
use crate::models::LengthMode;
use crate::page::{LoadingView, Page};
use crate::utils::{resolve_destination, status_stamp};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, instrument, warn};
use url::Url;

pub const HELP: &str = "\
commands:
  add                        add a topic field
  remove <id>                remove topic field <id>
  topic <id> <text>          set the text of topic field <id>
  layout <id>                pick a layout
  language <name>            pick a language
  length standard|advanced   pick the article length
  show                       print the form
  submit                     produce the newspaper
  quit                       leave";

/// A page rendered on the terminal.
///
/// Alerts go to stderr; navigation prints the resolved URL and remembers it.
#[derive(Debug)]
pub struct TerminalPage {
    base: Url,
    location: Mutex<Option<Url>>,
}

impl TerminalPage {
    pub fn new(base: Url) -> Self {
        Self { base, location: Mutex::new(None) }
    }

    /// Where the page has navigated to, if anywhere.
    pub fn location(&self) -> Option<Url> {
        self.location.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl LoadingView for TerminalPage {
    fn show_loading(&self) {
        println!("Producing your newspaper. This can take a few minutes.");
    }

    fn set_loading_message(&self, message: &str) {
        println!("  [{}] {}", status_stamp(), message);
    }

    fn hide_loading(&self) {
        debug!("Loading region hidden");
    }
}

impl Page for TerminalPage {
    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }

    fn set_length_warning(&self, visible: bool) {
        if visible {
            println!("Note: advanced mode writes one long article and accepts a single topic.");
        }
    }

    fn navigate(&self, path: &str) {
        match resolve_destination(&self.base, path) {
            Ok(url) => {
                println!("Your newspaper is ready: {url}");
                if let Ok(mut location) = self.location.lock() {
                    *location = Some(url);
                }
            }
            Err(e) => warn!(%path, error = %e, "Could not resolve newspaper location"),
        }
    }
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add,
    Remove(usize),
    Topic(usize, String),
    Layout(String),
    Language(String),
    Length(LengthMode),
    Show,
    Submit,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {what}")]
    MissingArgument { command: &'static str, what: &'static str },
    #[error("`{0}` is not a field id")]
    BadFieldId(String),
    #[error("{0}")]
    BadLength(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let field_id = |s: &str| -> Result<usize, CommandError> {
            s.parse::<usize>().map_err(|_| CommandError::BadFieldId(s.to_string()))
        };
        let required = |command: &'static str, what: &'static str| -> Result<String, CommandError> {
            if rest.is_empty() {
                Err(CommandError::MissingArgument { command, what })
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "add" | "+" => Ok(Command::Add),
            "remove" | "-" => field_id(&required("remove", "a field id")?).map(Command::Remove),
            "topic" => {
                let args = required("topic", "a field id and text")?;
                let (id, text) = match args.split_once(char::is_whitespace) {
                    Some((id, text)) => (id, text.trim()),
                    None => (args.as_str(), ""),
                };
                Ok(Command::Topic(field_id(id)?, text.to_string()))
            }
            "layout" => required("layout", "a layout id").map(Command::Layout),
            "language" => required("language", "a language").map(Command::Language),
            "length" => {
                let mode = required("length", "standard or advanced")?;
                mode.parse().map(Command::Length).map_err(CommandError::BadLength)
            }
            "show" => Ok(Command::Show),
            "submit" | "produce" => Ok(Command::Submit),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Draw the form as text.
pub fn render_form(form: &TopicForm) -> String {
    let topics = form
        .fields()
        .iter()
        .zip(form.controls())
        .enumerate()
        .map(|(i, (field, controls))| {
            let affixes = [(controls.add, "[+]"), (controls.remove, "[-]")]
                .iter()
                .filter(|(on, _)| *on)
                .map(|(_, label)| *label)
                .join(" ");
            format!("  {:>2}. {:<40} {}", i + 1, field.value, affixes)
                .trim_end()
                .to_string()
        })
        .join("\n");
    let layouts = form
        .layouts()
        .iter()
        .map(|icon| if icon.selected { format!("(*) {}", icon.layout) } else { format!("( ) {}", icon.layout) })
        .join("  ");

    let mut out = format!(
        "Topics:\n{topics}\nLayout:   {layouts}\nLanguage: {}\nLength:   {}",
        form.language(),
        form.length()
    );
    if form.length_warning_visible() {
        out.push_str("  (limited to 1 topic)");
    }
    out
}

/// Drive `controller` from lines read off `input` until `quit`, end of input
/// or a successful submission. Returns the path navigated to, if any.
#[instrument(level = "info", skip_all)]
pub async fn run_interactive<G, P, R>(
    controller: &DeskController<G, P>,
    input: R,
    out: &mut impl Write,
) -> std::io::Result<Option<String>>
where
    G: GenerateAsync,
    P: Page + 'static,
    R: AsyncBufRead + Unpin,
{
    let lines = stream::unfold(input.lines(), |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line, lines)),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed reading input");
                None
            }
        }
    });
    futures::pin_mut!(lines);

    writeln!(out, "{}\n", render_form(&controller.snapshot()))?;
    while let Some(line) = lines.next().await {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        debug!(?command, "Dispatching command");

        let changed = match command {
            Command::Add => controller.on_add().is_ok(),
            Command::Remove(id) => controller.on_remove(id).is_ok(),
            Command::Topic(id, text) => controller.on_topic_input(id, &text).is_ok(),
            Command::Layout(layout) => controller.on_layout_pick(&layout).is_ok(),
            Command::Language(language) => controller.on_language_change(&language).is_ok(),
            Command::Length(mode) => {
                controller.on_length_change(mode);
                true
            }
            Command::Show => true,
            Command::Help => {
                writeln!(out, "{HELP}")?;
                false
            }
            Command::Quit => return Ok(None),
            Command::Submit if !controller.can_submit() => {
                writeln!(out, "submit is disabled while a request is in flight")?;
                false
            }
            Command::Submit => {
                if let Ok(path) = controller.on_submit().await {
                    return Ok(Some(path));
                }
                false
            }
        };
        if changed {
            writeln!(out, "{}\n", render_form(&controller.snapshot()))?;
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::loading::LoadingIndicator;
    use crate::models::{DEFAULT_LANGUAGE, DEFAULT_LAYOUT, GenerateRequest, GenerateResponse};
    use crate::page::testing::RecordingPage;
    use std::sync::Arc;
    use std::time::Duration;

    struct CountingBackend {
        calls: Mutex<Vec<GenerateRequest>>,
    }

    impl GenerateAsync for CountingBackend {
        async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
            self.calls.lock().unwrap().push(request.clone());
            Ok(GenerateResponse { path: Some("/result/42.html".into()) })
        }
    }

    fn form() -> TopicForm {
        TopicForm::new(
            &["layout_1.html".to_string(), "layout_2.html".to_string()],
            DEFAULT_LAYOUT,
            &["english".to_string(), "spanish".to_string()],
            DEFAULT_LANGUAGE,
        )
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("add".parse::<Command>(), Ok(Command::Add));
        assert_eq!("remove 3".parse::<Command>(), Ok(Command::Remove(3)));
        assert_eq!(
            "topic 2   deep sea mining ".parse::<Command>(),
            Ok(Command::Topic(2, "deep sea mining".into()))
        );
        assert_eq!("topic 2".parse::<Command>(), Ok(Command::Topic(2, String::new())));
        assert_eq!("LAYOUT layout_2.html".parse::<Command>(), Ok(Command::Layout("layout_2.html".into())));
        assert_eq!("length advanced".parse::<Command>(), Ok(Command::Length(LengthMode::Advanced)));
        assert_eq!("  ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_command_errors() {
        assert_eq!("remove x".parse::<Command>(), Err(CommandError::BadFieldId("x".into())));
        assert_eq!(
            "layout".parse::<Command>(),
            Err(CommandError::MissingArgument { command: "layout", what: "a layout id" })
        );
        assert!(matches!("length huge".parse::<Command>(), Err(CommandError::BadLength(_))));
        assert_eq!("dance".parse::<Command>(), Err(CommandError::Unknown("dance".into())));
    }

    #[test]
    fn test_render_form_marks_controls_and_layout() {
        let mut form = form();
        form.add_field().unwrap();
        form.set_topic(1, "climate").unwrap();
        form.pick_layout("layout_2.html").unwrap();

        let text = render_form(&form);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Topics:");
        assert!(lines[1].contains("climate"));
        assert!(!lines[1].contains("[+]"));
        assert!(lines[2].ends_with("[+] [-]"));
        assert!(text.contains("( ) layout_1.html  (*) layout_2.html"));
        assert!(text.contains("Length:   standard"));
    }

    #[test]
    fn test_terminal_page_resolves_navigation() {
        let page = TerminalPage::new(Url::parse("http://127.0.0.1:5000/").unwrap());
        page.navigate("/result/123.html");
        assert_eq!(
            page.location().map(|u| u.to_string()).as_deref(),
            Some("http://127.0.0.1:5000/result/123.html")
        );
    }

    #[tokio::test]
    async fn test_interactive_session_submits_form() {
        let page = Arc::new(RecordingPage::default());
        let backend = CountingBackend { calls: Mutex::new(Vec::new()) };
        let ctl = DeskController::new(form(), backend, page.clone(), LoadingIndicator::new(Duration::from_secs(12)));

        let script = "\
topic 1 climate
add
topic 2 elections
bogus
layout layout_2.html
language spanish
submit
topic 1 never read
";
        let mut out = Vec::new();
        let navigated = run_interactive(&ctl, script.as_bytes(), &mut out).await.unwrap();

        assert_eq!(navigated.as_deref(), Some("/result/42.html"));
        assert_eq!(page.location().as_deref(), Some("/result/42.html"));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("unknown command `bogus`"));
        let snapshot = ctl.snapshot();
        assert_eq!(snapshot.fields()[0].value, "climate");
    }

    #[tokio::test]
    async fn test_interactive_session_rejected_submit_keeps_going() {
        let page = Arc::new(RecordingPage::default());
        let backend = CountingBackend { calls: Mutex::new(Vec::new()) };
        let ctl = DeskController::new(form(), backend, page.clone(), LoadingIndicator::new(Duration::from_secs(12)));

        let script = "submit\nlength advanced\nadd\nquit\n";
        let mut out = Vec::new();
        let navigated = run_interactive(&ctl, script.as_bytes(), &mut out).await.unwrap();

        assert_eq!(navigated, None);
        assert_eq!(
            page.alerts(),
            vec![
                "Please fill in at least one topic.",
                "Advanced mode is limited to 1 topic due to longer processing time.",
            ]
        );
        assert_eq!(ctl.snapshot().topic_count(), 1);
    }
}
