use crate::models::Difficulty;
use crate::stats::AggregateStats;
use chrono::Utc;
use crossterm::terminal as term;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// ISO 8601 UTC timestamp for when the session ended
    pub finished_at: String,
    pub completed: bool,
    pub difficulty: Difficulty,
    pub score: usize,
    pub question_count: usize,
    pub answered: usize,
    /// only set for completed sessions
    pub accuracy: Option<f64>,
    pub duration_secs: f64,
}

impl SessionSummary {
    pub fn new(
        completed: bool,
        difficulty: Difficulty,
        score: usize,
        question_count: usize,
        answered: usize,
        duration: Duration,
    ) -> Self {
        let accuracy = if completed && question_count > 0 {
            Some(score as f64 / question_count as f64 * 100.0)
        } else {
            None
        };

        Self {
            finished_at: Utc::now().to_rfc3339(),
            completed,
            difficulty,
            score,
            question_count,
            answered,
            accuracy,
            duration_secs: duration.as_secs_f64(),
        }
    }
}

/// Formats the session history as a table, newest first, narrowing columns to
/// fit `term_width`.
pub fn format_history(stats: &AggregateStats, term_width: usize) -> Vec<String> {
    let records = &stats.history;
    let mut out = Vec::new();

    if records.is_empty() {
        out.push(String::new());
        out.push("  No sessions yet. Finish a quiz to start tracking your progress.".to_string());
        out.push(String::new());
        return out;
    }

    const W_NUM: usize = 5;
    const W_TIME: usize = 10;
    const W_DIFF: usize = 9;
    const W_SCORE: usize = 8;
    const W_ACC: usize = 9;
    const W_DUR: usize = 9;
    const W_DONE: usize = 5;

    let base_width = 1 + W_NUM + W_SCORE + W_ACC + W_DONE;
    let show_diff = term_width >= base_width + W_DIFF;
    let show_time = term_width >= base_width + W_DIFF + W_TIME;
    let show_dur = term_width >= base_width + W_DIFF + W_TIME + W_DUR;

    let total_width = base_width
        + if show_diff { W_DIFF } else { 0 }
        + if show_time { W_TIME } else { 0 }
        + if show_dur { W_DUR } else { 0 };

    let divider = "-".repeat(total_width);

    let completed: Vec<&SessionSummary> = records.iter().filter(|r| r.completed).collect();
    let total = records.len();
    let done = completed.len();

    out.push(String::new());
    if !completed.is_empty() {
        let avg_acc = completed.iter().filter_map(|r| r.accuracy).sum::<f64>() / done as f64;
        out.push(format!(
            "  {} sessions  |  {} completed  |  avg score {:.2}%  |  best streak {}  |  avg {:.1}s per answer",
            total, done, avg_acc, stats.best_streak, stats.average_time_per_question
        ));
    } else {
        out.push(format!("  {} sessions total  |  {} completed", total, done));
    }
    out.push(String::new());

    let mut header = format!(" {:<nw$}", "#", nw = W_NUM);
    if show_time { header.push_str(&format!("{:<tw$}", "ended", tw = W_TIME)); }
    if show_diff { header.push_str(&format!("{:<dw$}", "level", dw = W_DIFF)); }
    header.push_str(&format!("{:<sw$}", "score", sw = W_SCORE));
    header.push_str(&format!("{:<aw$}", "acc", aw = W_ACC));
    if show_dur { header.push_str(&format!("{:<uw$}", "time", uw = W_DUR)); }
    header.push_str("done");
    out.push(header);
    out.push(format!(" {}", divider));

    for (i, r) in records.iter().rev().enumerate() {
        // HH:MM:SS out of the RFC 3339 timestamp
        let ended = r.finished_at.get(11..19).unwrap_or(&r.finished_at).to_string();
        let score = format!("{}/{}", r.score, r.question_count);
        let acc = r.accuracy.map(|v| format!("{:.0}%", v)).unwrap_or_else(|| "-".to_string());
        let time = format!("{:.1}s", r.duration_secs);
        let done = if r.completed { "Y" } else { "N" };

        let mut row = format!(" {:<nw$}", i + 1, nw = W_NUM);
        if show_time { row.push_str(&format!("{:<tw$}", ended, tw = W_TIME)); }
        if show_diff { row.push_str(&format!("{:<dw$}", r.difficulty.label(), dw = W_DIFF)); }
        row.push_str(&format!("{:<sw$}", score, sw = W_SCORE));
        row.push_str(&format!("{:<aw$}", acc, aw = W_ACC));
        if show_dur { row.push_str(&format!("{:<uw$}", time, uw = W_DUR)); }
        row.push_str(done);
        out.push(row);
    }

    out.push(format!(" {}", divider));
    out.push(String::new());
    out
}

/// Prints this process's session history to stdout, sized to the terminal.
pub fn print_history(stats: &AggregateStats) {
    let term_width = term::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(80)
        .max(40);

    for line in format_history(stats, term_width) {
        println!("{}", line);
    }
}
