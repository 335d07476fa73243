//! Interactive REPL for jyotish
//!
//! Two phases share one readline editor:
//! - intake: prompt for birth details and submit them
//! - consultation: chat lines go to the backend, slash commands drive the
//!   chart view, focus area and session reset

pub mod colors;
pub mod commands;
pub mod helper;
pub mod intake;

use anyhow::Result;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use std::sync::Arc;

use crate::api::Backend;
use crate::conversation::{Message, Role, Settled};
use crate::intake::IntakeForm;
use crate::notify::{Notice, Notifier};
use crate::session::{Phase, SessionController};

use commands::Command;
use helper::JyotishHelper;

/// Prints notices straight to the terminal
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        println!("{}", colors::notice(notice.level, &notice.text));
    }
}

enum Flow {
    Continue,
    Quit,
}

/// REPL state
pub struct Repl {
    /// Readline editor with history and completion
    editor: Editor<JyotishHelper, DefaultHistory>,
    /// Astrology backend
    backend: Arc<dyn Backend>,
    /// Session, conversation and chart tab
    controller: SessionController,
    /// Defaults offered at each intake
    prefill: IntakeForm,
    notifier: TerminalNotifier,
    /// Shown by /version and /status
    api_url: String,
    /// History file path
    history_path: std::path::PathBuf,
}

impl Repl {
    pub fn new(backend: Arc<dyn Backend>) -> Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(JyotishHelper::new()));

        Ok(Self {
            editor,
            backend,
            controller: SessionController::new(),
            prefill: IntakeForm::new(),
            notifier: TerminalNotifier,
            api_url: String::new(),
            history_path: crate::config::home_dir().join("history"),
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Values from the command line to pre-fill the intake form
    pub fn with_prefill(mut self, form: IntakeForm) -> Self {
        self.prefill = form;
        self
    }

    /// Load command history
    fn load_history(&mut self) {
        if self.history_path.exists() {
            let _ = self.editor.load_history(&self.history_path);
        }
    }

    /// Save command history
    fn save_history(&mut self) {
        if let Some(parent) = self.history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = self.editor.save_history(&self.history_path);
    }

    /// Run the REPL loop
    pub async fn run(&mut self) -> Result<()> {
        self.load_history();

        loop {
            let flow = match self.controller.phase() {
                Phase::Intake => self.run_intake().await?,
                Phase::Consultation => self.run_turn().await?,
            };
            if let Flow::Quit = flow {
                println!("Goodbye! 🙏");
                break;
            }
        }

        self.save_history();
        Ok(())
    }

    /// One intake attempt; stays in intake on failure
    async fn run_intake(&mut self) -> Result<Flow> {
        let mut form = self.prefill.clone();
        if !intake::fill_form(&mut self.editor, &mut form)? {
            return Ok(Flow::Quit);
        }

        println!("{}", colors::status("Calculating birth chart..."));
        match self
            .controller
            .submit_intake(&form, self.backend.as_ref(), &self.notifier)
            .await
        {
            Ok(session) => {
                tracing::debug!("consultation started for session {}", session.id());
                // Keep what the user typed for the next /new
                self.prefill = form;
                self.print_consultation_intro();
            }
            // The notifier has already shown the failure
            Err(err) => tracing::debug!("intake failed: {}", err),
        }
        println!();
        Ok(Flow::Continue)
    }

    fn print_consultation_intro(&self) {
        println!();
        println!("{}", colors::banner_accent("AI Jyotish Consultation"));
        println!("{}", colors::separator(50));
        println!("{}", self.controller.render_chart());
        println!("{}", colors::separator(50));
        if let Ok(conversation) = self.controller.conversation() {
            for message in conversation.transcript().iter() {
                print_message(message);
            }
        }
        println!(
            "{}",
            colors::status("Type a question, /suggest for ideas, /help for commands")
        );
    }

    /// Read one line in consultation and act on it
    async fn run_turn(&mut self) -> Result<Flow> {
        let focus = self
            .controller
            .conversation()
            .map(|c| c.focus().as_str())
            .unwrap_or("general");

        let line = match self.editor.readline(&format!("[{}] >>> ", focus)) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                return Ok(Flow::Continue);
            }
            Err(ReadlineError::Eof) => return Ok(Flow::Quit),
            Err(err) => {
                eprintln!("Error: {:?}", err);
                return Ok(Flow::Quit);
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Flow::Continue);
        }
        self.editor.add_history_entry(trimmed)?;

        match Command::parse(trimmed) {
            Some(command) => self.handle_command(command).await,
            None => {
                let backend = Arc::clone(&self.backend);
                println!("{}", colors::thinking());
                let result = self
                    .controller
                    .send(backend.as_ref(), trimmed, &self.notifier)
                    .await;
                self.report_send(result);
                Ok(Flow::Continue)
            }
        }
    }

    fn report_send(&self, result: crate::error::Result<Settled>) {
        match result {
            Ok(_) => {
                if let Some(reply) = self
                    .controller
                    .conversation()
                    .ok()
                    .and_then(|c| c.transcript().last())
                {
                    print_message(reply);
                }
            }
            Err(err) => println!("{}", colors::warning(&err.to_string())),
        }
    }

    /// Handle slash commands
    async fn handle_command(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Help => println!("{}", commands::help_text()),
            Command::Version => {
                println!("Jyotish v{}", env!("CARGO_PKG_VERSION"));
                println!("  Backend: {}", self.api_url);
            }
            Command::Chart(tab) => {
                if let Some(tab) = tab {
                    self.controller.select_tab(tab);
                }
                println!("{}", self.controller.render_chart());
            }
            Command::Focus(None) => {
                if let Ok(conversation) = self.controller.conversation() {
                    let focus = conversation.focus();
                    println!("Focus area: {} ({})", focus.label(), focus);
                }
            }
            Command::Focus(Some(focus)) => {
                self.controller.set_focus(focus)?;
                println!("{}", colors::success(&format!("Focus area: {}", focus.label())));
            }
            Command::Suggest => {
                if let Ok(conversation) = self.controller.conversation() {
                    println!("Quick questions ({}):", conversation.focus().label());
                    for (i, question) in conversation.suggestions().iter().enumerate() {
                        println!("  {}. {}", i + 1, question);
                    }
                }
            }
            Command::Ask(index) => {
                let backend = Arc::clone(&self.backend);
                if let Ok(conversation) = self.controller.conversation() {
                    if let Some(question) = conversation.suggestions().get(index) {
                        println!("{}: {}", colors::speaker(Role::User), question);
                        println!("{}", colors::thinking());
                    }
                }
                let result = self
                    .controller
                    .ask_suggested(backend.as_ref(), index, &self.notifier)
                    .await;
                self.report_send(result);
            }
            Command::History => {
                if let Ok(conversation) = self.controller.conversation() {
                    for message in conversation.transcript().iter() {
                        print_message(message);
                    }
                }
            }
            Command::Status => self.cmd_status().await,
            Command::New => {
                self.controller.reset_session();
                println!("{}", colors::success("Session cleared. Starting over."));
                println!();
            }
            Command::Quit => return Ok(Flow::Quit),
            Command::Usage(text) => println!("{}", colors::warning(&text)),
            Command::Unknown(name) => println!("Unknown command: {}. Try /help", name),
        }
        Ok(Flow::Continue)
    }

    /// /status - Show current state
    async fn cmd_status(&self) {
        match self.controller.session() {
            Some(session) => println!("Session: {}", session.id()),
            None => println!("Session: (none)"),
        }
        if let Ok(conversation) = self.controller.conversation() {
            println!("Messages: {}", conversation.transcript().len());
            println!("Focus area: {}", conversation.focus().label());
        }
        println!("Chart tab: {}", self.controller.chart_tab().as_str());
        println!("Backend URL: {}", self.api_url);

        match self.backend.health().await {
            Ok(health) => {
                let model = health.model.map(|m| format!(" ({})", m)).unwrap_or_default();
                println!("Backend: {}{}", colors::success(&health.status), model);
            }
            Err(e) => println!("Backend: {}", colors::error(&e.to_string())),
        }
    }
}

fn print_message(message: &Message) {
    println!(
        "{} {}\n{}\n",
        colors::speaker(message.role),
        colors::timestamp(&message.timestamp),
        message.content
    );
}

/// Entry point for the REPL
pub async fn run(backend: Arc<dyn Backend>, api_url: &str, prefill: IntakeForm) -> Result<()> {
    let mut repl = Repl::new(backend)?
        .with_api_url(api_url)
        .with_prefill(prefill);
    repl.run().await
}
