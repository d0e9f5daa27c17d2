//! services/client/src/ui/render.rs
//!
//! Presentational views. Each function only formats the data it is given;
//! none of them reach the controller or the network.

use learning_path_core::{
    AnswerFeedback, Budget, Bundle, ChatRole, Module, NoticeLevel, Page, Progress,
    QuizHistoryEntry, QuizPanel, QuizResult, QuizSelection, QuizSheet, Screen, Transcript,
    ViewModel,
};

use super::theme::Theme;

/// Draws one full frame: navigation, notices, then the active view.
pub fn render(screen: &Screen, theme: &Theme) -> String {
    let mut lines = vec![nav_bar(screen, theme)];

    for notice in &screen.notices {
        let text = format!("[{}] {} (/dismiss {})", notice.id, notice.message, notice.id);
        lines.push(match notice.level {
            NoticeLevel::Error => theme.wrong(&text),
            NoticeLevel::Info => theme.muted(&text),
        });
    }
    lines.push(String::new());

    lines.extend(match &screen.view {
        ViewModel::Upload { loading } => upload_view(*loading, theme),
        ViewModel::Chat {
            transcript,
            loading,
            ready,
        } => chat_view(transcript, *loading, ready.as_ref(), theme),
        ViewModel::Bundle {
            bundle,
            budget,
            selection,
        } => bundle_view(bundle, *budget, selection.as_ref(), theme),
        ViewModel::Quiz {
            selection,
            sheet,
            loading,
        } => quiz_view(selection.as_ref(), sheet.as_ref(), *loading, theme),
        ViewModel::Done { result, progress } => done_view(result.as_ref(), progress, theme),
        ViewModel::Dashboard {
            progress,
            history,
            panel,
            loading,
        } => dashboard_view(progress, history, panel.as_ref(), *loading, theme),
    });

    lines.join("\n")
}

fn nav_bar(screen: &Screen, theme: &Theme) -> String {
    let (home, dashboard) = match screen.page {
        Page::Home => (theme.heading("Learning"), "Dashboard".to_string()),
        Page::Dashboard => ("Learning".to_string(), theme.heading("Dashboard")),
    };
    format!(
        "== {home} | {dashboard} ==  stage: {}  XP: {}",
        screen.stage, screen.progress.xp
    )
}

pub fn upload_view(loading: bool, theme: &Theme) -> Vec<String> {
    let mut lines = vec![theme.heading("Upload your resume (PDF)")];
    if loading {
        lines.push(theme.muted("Uploading..."));
    } else {
        lines.push("Use /upload <file.pdf> to get started.".to_string());
    }
    lines
}

pub fn chat_view(
    transcript: &Transcript,
    loading: bool,
    ready: Option<&QuizSelection>,
    theme: &Theme,
) -> Vec<String> {
    let mut lines = Vec::new();
    for turn in transcript.turns() {
        let speaker = match turn.role {
            ChatRole::System => "System",
            ChatRole::User => "You",
            ChatRole::Assistant => "Bot",
        };
        let mut text = turn.text.lines();
        lines.push(format!(
            "{}: {}",
            theme.heading(speaker),
            text.next().unwrap_or_default()
        ));
        lines.extend(text.map(|line| format!("     {line}")));
    }
    if loading {
        lines.push(theme.muted("..."));
    } else if let Some(selection) = ready {
        lines.push(theme.correct(&format!(
            "Ready! Type /continue to see your bundle and a quiz on {} ({}).",
            selection.module, selection.skill
        )));
    } else {
        lines.push(theme.muted("Type your message..."));
    }
    lines
}

pub fn bundle_view(
    bundle: &Bundle,
    budget: Budget,
    selection: Option<&QuizSelection>,
    theme: &Theme,
) -> Vec<String> {
    let mut lines = vec![
        theme.heading("Your learning bundle"),
        format!(
            "Budget: €{} (adjust with /budget, {}-{})",
            budget.euros(),
            Budget::MIN,
            Budget::MAX
        ),
    ];
    if bundle.is_empty() {
        lines.push(theme.muted("No modules were recommended."));
    }
    for (i, module) in bundle.modules().iter().enumerate() {
        lines.push(String::new());
        lines.extend(module_card(i + 1, module, theme));
    }
    let total = bundle.total_price();
    if total > 0.0 {
        lines.push(String::new());
        let summary = format!("Bundle total: €{total}");
        lines.push(if total > f64::from(budget.euros()) {
            theme.wrong(&format!("{summary}, over your budget"))
        } else {
            summary
        });
    }
    lines.push(String::new());
    if let Some(selection) = selection {
        lines.push(format!(
            "/quiz  Take the {} quiz to unlock the next module",
            selection.module
        ));
    }
    lines
}

fn module_card(number: usize, module: &Module, theme: &Theme) -> Vec<String> {
    let mut lines = vec![theme.heading(&format!("{number}. {}", module.module_title))];
    if !module.course_title.is_empty() {
        lines.push(theme.muted(&format!("   {}", module.course_title)));
    }
    if !module.description.is_empty() {
        lines.push(format!("   {}", module.description));
    }
    if !module.subtopics.is_empty() {
        lines.push("   Subtopics:".to_string());
        lines.extend(module.subtopics.iter().map(|s| format!("     - {s}")));
    }
    if !module.rationale.is_empty() {
        lines.push(format!("   Why this module? {}", module.rationale));
    }
    let mut facts = Vec::new();
    if let Some(price) = module.price {
        facts.push(format!("Price: €{price}"));
    }
    if let Some(hours) = module.duration_hours {
        facts.push(format!("Duration: {hours}h"));
    }
    if !facts.is_empty() {
        lines.push(format!("   {}", facts.join("  ")));
    }
    lines
}

pub fn quiz_view(
    selection: Option<&QuizSelection>,
    sheet: Option<&QuizSheet>,
    loading: bool,
    theme: &Theme,
) -> Vec<String> {
    let title = match selection {
        Some(s) => format!("Quiz: {} - {}", s.skill, s.module),
        None => "Quiz".to_string(),
    };
    let mut lines = vec![theme.heading(&title)];
    match sheet {
        _ if loading => lines.push(theme.muted("Loading questions...")),
        None => lines.push("Questions are not loaded yet. Use /load to retry.".to_string()),
        Some(sheet) => {
            lines.extend(questions(sheet, false, theme));
            lines.push(String::new());
            if sheet.is_complete() {
                lines.push("/submit  Submit Quiz".to_string());
            } else {
                lines.push(theme.muted(&format!(
                    "{} question(s) left. Answer with /answer <question> <option>.",
                    sheet.unanswered()
                )));
            }
        }
    }
    lines
}

/// Numbered questions with their options. With `reveal`, answered questions
/// show whether they were right.
fn questions(sheet: &QuizSheet, reveal: bool, theme: &Theme) -> Vec<String> {
    let mut lines = Vec::new();
    for (q, question) in sheet.questions().iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("{}. {}", q + 1, question.question));
        let chosen = sheet.answer(q);
        for (o, option) in question.options.iter().enumerate() {
            let marker = if chosen == Some(option.as_str()) { "(x)" } else { "( )" };
            let text = format!("   {marker} {}. {option}", o + 1);
            lines.push(match (reveal && chosen.is_some(), question.is_correct(option)) {
                (true, true) => theme.correct(&text),
                (true, false) if chosen == Some(option.as_str()) => theme.wrong(&text),
                _ => text,
            });
        }
        if reveal {
            match sheet.feedback(q) {
                Some(AnswerFeedback::Correct) => lines.push(theme.correct("   Correct!")),
                Some(AnswerFeedback::Wrong { correct_answer }) => lines.push(theme.wrong(
                    &format!("   Wrong. Correct answer: {correct_answer}"),
                )),
                None => {}
            }
        }
    }
    lines
}

pub fn done_view(result: Option<&QuizResult>, progress: &Progress, theme: &Theme) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(result) = result {
        let score = format!("You scored {} out of {}!", result.score(), result.total());
        lines.push(if result.is_perfect() {
            theme.correct(&format!("Perfect! {score}"))
        } else {
            score
        });
    }
    lines.push(theme.heading("All done! Check your progress on the dashboard."));
    lines.extend(progress_lines(progress, theme));
    lines
}

fn progress_lines(progress: &Progress, theme: &Theme) -> Vec<String> {
    let mut line = format!("XP: {}", progress.xp);
    for badge in &progress.badges {
        line.push(' ');
        line.push_str(&theme.badge(badge));
    }
    vec![line]
}

pub fn dashboard_view(
    progress: &Progress,
    history: &[QuizHistoryEntry],
    panel: Option<&QuizPanel>,
    loading: bool,
    theme: &Theme,
) -> Vec<String> {
    let mut lines = vec![theme.heading("Dashboard"), "XP & Badges".to_string()];
    lines.extend(progress_lines(progress, theme));

    lines.push(String::new());
    lines.push(theme.heading("Quiz History"));
    if history.is_empty() {
        lines.push(theme.muted("No quizzes taken yet."));
    }
    for entry in history {
        lines.push(format!(
            "  {:<28} {:>2} / {:<2}  {}",
            entry.module,
            entry.score,
            entry.total,
            entry.taken_at.format("%Y-%m-%d")
        ));
    }
    lines.push(theme.muted("Retake one with /take <module>. /home goes back to learning."));

    if loading {
        lines.push(String::new());
        lines.push(theme.muted("Loading quiz..."));
    }
    if let Some(panel) = panel {
        lines.push(String::new());
        lines.push(theme.heading(&format!("Quiz: {}", panel.selection.module)));
        lines.extend(questions(&panel.sheet, true, theme));
        lines.push(String::new());
        lines.push("/close  Close".to_string());
    }
    lines
}
