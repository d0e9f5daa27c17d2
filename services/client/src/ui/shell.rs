//! services/client/src/ui/shell.rs
//!
//! The interactive loop: draw the current screen, read a line, hand the
//! action to the flow controller, repeat. The shell never calls the backend
//! itself.
//!
//! Actions that wait on the backend run as spawned tasks. The frame is redrawn
//! as soon as the request is in flight, so its loading state shows, and input
//! keeps being read so the learner can switch pages mid-request.

use std::collections::VecDeque;
use std::path::Path;

use learning_path_core::{
    AnswerFeedback, FlowController, Page, QuizSheet, ResumeFile, StepOutcome, ViewModel,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::task::{AbortHandle, JoinSet};
use tracing::{debug, info};

use super::command::{Command, HELP};
use super::render::render;
use super::theme::Theme;
use crate::error::ClientError;

/// A line of feedback to print above the next frame, if any.
type Reply = Result<Option<String>, ClientError>;

enum Step {
    Continue,
    Quit,
}

pub struct Shell<R, W> {
    controller: FlowController,
    theme: &'static Theme,
    input: Lines<R>,
    output: W,
    requests: JoinSet<Reply>,
    /// Lines typed while a request was in flight, run in order once it settles.
    queued: VecDeque<Command>,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(controller: FlowController, theme: &'static Theme, input: R, output: W) -> Self {
        Self {
            controller,
            theme,
            input: input.lines(),
            output,
            requests: JoinSet::new(),
            queued: VecDeque::new(),
        }
    }

    /// Runs until the learner quits, or the input ends and every request has
    /// settled. Only failures to read input or write output end the loop with
    /// an error.
    pub async fn run(mut self) -> Result<W, ClientError> {
        self.draw().await?;
        let mut input_open = true;
        loop {
            tokio::select! {
                Some(joined) = self.requests.join_next(), if !self.requests.is_empty() => {
                    self.report(joined?).await?;
                    self.draw().await?;
                    if let Step::Quit = self.drain_queue().await? {
                        break;
                    }
                }
                line = self.input.next_line(), if input_open => match line? {
                    Some(line) => {
                        if let Step::Quit = self.accept(&line).await? {
                            break;
                        }
                    }
                    None => input_open = false,
                },
                else => break,
            }
        }
        self.output.flush().await?;
        Ok(self.output)
    }

    async fn accept(&mut self, line: &str) -> Result<Step, ClientError> {
        if line.trim().is_empty() {
            return Ok(Step::Continue);
        }
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => {
                self.say(&self.theme.wrong(&format!("! {e}"))).await?;
                return Ok(Step::Continue);
            }
        };

        let must_wait = !self.queued.is_empty()
            || (!self.requests.is_empty() && !command.runs_during_request());
        if must_wait {
            debug!(?command, "Holding command until the request in flight settles");
            self.queued.push_back(command);
            return Ok(Step::Continue);
        }
        self.execute(command).await
    }

    async fn execute(&mut self, command: Command) -> Result<Step, ClientError> {
        match command {
            Command::Quit => {
                info!("Learner quit the session");
                return Ok(Step::Quit);
            }
            Command::Help => {
                self.say(HELP).await?;
                return Ok(Step::Continue);
            }
            _ => {}
        }

        debug!(?command, "Dispatching command");
        if command.needs_backend() {
            let handle = self
                .requests
                .spawn(dispatch(self.controller.clone(), self.theme, command));
            self.settle(&handle).await;
        } else {
            let reply = dispatch(self.controller.clone(), self.theme, command).await;
            self.report(reply).await?;
        }
        self.draw().await?;
        Ok(Step::Continue)
    }

    /// Runs held commands until one of them starts a new request.
    async fn drain_queue(&mut self) -> Result<Step, ClientError> {
        while self.requests.is_empty() {
            let Some(command) = self.queued.pop_front() else {
                break;
            };
            if let Step::Quit = self.execute(command).await? {
                return Ok(Step::Quit);
            }
        }
        Ok(Step::Continue)
    }

    /// Waits until a spawned request has either finished or marked its page
    /// as loading.
    async fn settle(&self, handle: &AbortHandle) {
        while !handle.is_finished() && !self.controller.is_loading().await {
            tokio::task::yield_now().await;
        }
    }

    async fn report(&mut self, reply: Reply) -> Result<(), ClientError> {
        match reply {
            Ok(Some(message)) => self.say(&message).await,
            Ok(None) => Ok(()),
            Err(e) => self.say(&self.theme.wrong(&format!("! {e}"))).await,
        }
    }

    async fn draw(&mut self) -> Result<(), ClientError> {
        let screen = self.controller.screen().await;
        let frame = render(&screen, self.theme);
        self.say(&format!("\n{frame}\n> ")).await
    }

    async fn say(&mut self, text: &str) -> Result<(), ClientError> {
        self.output.write_all(text.as_bytes()).await?;
        if !text.ends_with("> ") {
            self.output.write_all(b"\n").await?;
        }
        self.output.flush().await?;
        Ok(())
    }
}

/// Maps one action onto the controller.
async fn dispatch(flow: FlowController, theme: &'static Theme, command: Command) -> Reply {
    let page = flow.page().await;
    let needs_home = !matches!(
        command,
        Command::Home | Command::Dashboard | Command::Dismiss(_) | Command::Answer { .. }
            | Command::Take(_) | Command::Close
    );
    if needs_home && page != Page::Home {
        return Ok(Some("Switch back with /home first.".to_string()));
    }

    match command {
        Command::Upload(path) => {
            let file = read_resume(&path).await?;
            if !file.is_pdf() {
                return Ok(Some("Please choose a PDF file.".to_string()));
            }
            Ok(describe(flow.submit_resume(file).await?))
        }
        Command::Say(text) => Ok(describe(flow.send_chat_message(&text).await?)),
        Command::Continue => Ok(describe(flow.confirm_pipeline().await?)),
        Command::Budget(euros) => {
            let budget = flow.set_budget(euros).await;
            Ok(Some(format!("Budget set to €{}.", budget.euros())))
        }
        Command::Quiz => match flow.start_quiz().await? {
            StepOutcome::Advanced(_) => Ok(describe(flow.load_quiz().await?)),
            outcome => Ok(describe(outcome)),
        },
        Command::Load => Ok(describe(flow.load_quiz().await?)),
        Command::Answer { question, option } => {
            let index = question - 1;
            let screen = flow.screen().await;
            let sheet = match (&screen.page, &screen.view) {
                (Page::Dashboard, ViewModel::Dashboard { panel: Some(panel), .. }) => &panel.sheet,
                (Page::Home, ViewModel::Quiz { sheet: Some(sheet), .. }) => sheet,
                _ => return Ok(Some("There is no quiz to answer.".to_string())),
            };
            let Some(choice) = option_text(sheet, index, option - 1) else {
                return Ok(Some(format!("Question {question} has no option {option}.")));
            };
            if screen.page == Page::Dashboard {
                let feedback = flow.answer_panel(index, &choice).await?;
                Ok(Some(match feedback {
                    AnswerFeedback::Correct => theme.correct("Correct!"),
                    AnswerFeedback::Wrong { correct_answer } => {
                        theme.wrong(&format!("Wrong. Correct answer: {correct_answer}"))
                    }
                }))
            } else {
                flow.answer_quiz(index, &choice).await?;
                Ok(None)
            }
        }
        Command::Submit => Ok(describe(flow.submit_quiz().await?)),
        Command::Home => {
            flow.go_home().await;
            Ok(None)
        }
        Command::Dashboard => {
            flow.go_dashboard().await;
            Ok(None)
        }
        Command::Take(module) => {
            if page != Page::Dashboard {
                return Ok(Some("Open the /dashboard to retake a quiz.".to_string()));
            }
            Ok(describe(flow.request_quiz(&module).await?))
        }
        Command::Close => Ok(flow.close_quiz_panel().await.map(|score| {
            format!(
                "Recorded {} out of {} (+{} XP).",
                score.result.score(),
                score.result.total(),
                score.xp_gained
            )
        })),
        Command::Dismiss(id) => {
            if flow.dismiss_notice(id).await {
                Ok(None)
            } else {
                Ok(Some(format!("There is no notice {id}.")))
            }
        }
        Command::Help | Command::Quit => Ok(None),
    }
}

fn describe(outcome: StepOutcome) -> Option<String> {
    match outcome {
        StepOutcome::Discarded => Some("That response arrived too late and was ignored.".to_string()),
        _ => None,
    }
}

fn option_text(sheet: &QuizSheet, question: usize, option: usize) -> Option<String> {
    sheet
        .questions()
        .get(question)
        .and_then(|q| q.options.get(option))
        .cloned()
}

/// Reads a resume from disk. The content type comes from the extension or,
/// failing that, the PDF magic bytes.
async fn read_resume(path: &Path) -> Result<ResumeFile, ClientError> {
    let data = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume.pdf".to_string());
    let looks_like_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        || data.starts_with(b"%PDF");
    let mut file = ResumeFile::pdf(file_name, data);
    if !looks_like_pdf {
        file.content_type = "application/octet-stream".to_string();
    }
    Ok(file)
}
