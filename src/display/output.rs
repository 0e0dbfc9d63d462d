use crate::analysis::{
    HeadToHeadStats, Outcome, PerformanceTrend, PersonalRecords, StreakInfo, StreakType,
    TeammateStats,
};
use colored::*;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct OpponentRow {
    #[tabled(rename = "#")]
    rank: String,
    opponent: String,
    played: String,
    record: String,
    win_rate: String,
    avg_score: String,
    streak: String,
    form: String,
}

#[derive(Tabled)]
struct TeammateRow {
    #[tabled(rename = "#")]
    rank: String,
    teammate: String,
    played: String,
    record: String,
    win_rate: String,
    avg_combined: String,
    best_run: String,
}

#[derive(Tabled)]
struct TrendRow {
    date: String,
    result: String,
    score: String,
    record: String,
    win_rate: String,
}

#[derive(Tabled)]
struct RecordRow {
    record: String,
    value: String,
    date: String,
}

fn colored_outcome(outcome: Outcome) -> String {
    match outcome {
        Outcome::Win => "WIN".green().to_string(),
        Outcome::Loss => "LOSS".red().to_string(),
        Outcome::Draw => "DRAW".yellow().to_string(),
    }
}

fn signed_streak(streak: i32) -> String {
    match streak {
        n if n > 0 => format!("W{}", n).green().to_string(),
        n if n < 0 => format!("L{}", -n).red().to_string(),
        _ => "-".to_string(),
    }
}

/// Last five results, oldest first.
fn recent_form<'a, I>(outcomes: I) -> String
where
    I: DoubleEndedIterator<Item = &'a Outcome>,
{
    let mut recent: Vec<String> = outcomes.rev().take(5).map(|o| o.to_string()).collect();
    recent.reverse();
    recent.join(" ")
}

fn section_header(title: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());
}

pub fn display_head_to_head(stats: &[HeadToHeadStats], top_n: usize) {
    section_header("⚔️  HEAD-TO-HEAD");

    if stats.is_empty() {
        println!("{}", "No opponents found".yellow());
        return;
    }

    let rows: Vec<OpponentRow> = stats
        .iter()
        .take(top_n)
        .enumerate()
        .map(|(idx, s)| {
            let outcomes: Vec<Outcome> = s.history.iter().map(|e| e.outcome).collect();
            OpponentRow {
                rank: format!("#{}", idx + 1),
                opponent: if s.is_guest {
                    format!("{} (guest)", s.opponent_name)
                } else {
                    s.opponent_name.clone()
                },
                played: s.matches_played.to_string(),
                record: format!("{}-{}-{}", s.wins, s.losses, s.draws),
                win_rate: format!("{:.1}%", s.win_rate),
                avg_score: format!("{:.1} : {:.1}", s.avg_points_scored, s.avg_points_conceded),
                streak: signed_streak(s.current_streak),
                form: recent_form(outcomes.iter()),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    if let Some(nemesis) = stats
        .iter()
        .filter(|s| s.matches_played >= 3)
        .min_by(|a, b| a.win_rate.partial_cmp(&b.win_rate).unwrap_or(std::cmp::Ordering::Equal))
    {
        println!(
            "\n{} {} ({:.1}% over {} games, longest losing run {})",
            "Toughest opponent:".bold().red(),
            nemesis.opponent_name,
            nemesis.win_rate,
            nemesis.matches_played,
            nemesis.longest_loss_streak
        );
    }
    println!();
}

pub fn display_teammates(stats: &[TeammateStats], top_n: usize) {
    section_header("👥 TEAMMATE SYNERGY");

    if stats.is_empty() {
        println!("{}", "No teammates found".yellow());
        return;
    }

    let rows: Vec<TeammateRow> = stats
        .iter()
        .take(top_n)
        .enumerate()
        .map(|(idx, s)| TeammateRow {
            rank: format!("#{}", idx + 1),
            teammate: if s.is_guest {
                format!("{} (guest)", s.teammate_name)
            } else {
                s.teammate_name.clone()
            },
            played: s.matches_played.to_string(),
            record: format!("{}-{}-{}", s.wins, s.losses, s.draws),
            win_rate: format!("{:.1}%", s.win_rate),
            avg_combined: format!("{:.1}", s.avg_combined_score),
            best_run: s.longest_win_streak.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    if let Some(best) = stats
        .iter()
        .filter(|s| s.matches_played >= 3)
        .max_by(|a, b| a.win_rate.partial_cmp(&b.win_rate).unwrap_or(std::cmp::Ordering::Equal))
    {
        println!(
            "\n{} {} ({:.1}% over {} games)",
            "Best partner:".bold().green(),
            best.teammate_name,
            best.win_rate,
            best.matches_played
        );
    }
    println!();
}

pub fn display_trend(trend: &[PerformanceTrend], last_n: usize) {
    section_header("📈 PERFORMANCE TREND");

    let Some(latest) = trend.last() else {
        println!("{}", "No matches played yet".yellow());
        return;
    };

    println!(
        "{} {} W / {} played ({:.1}% WR)\n",
        "Overall:".bold(),
        latest.cumulative_wins.to_string().green(),
        latest.cumulative_matches,
        latest.win_rate
    );

    let skip = trend.len().saturating_sub(last_n);
    let rows: Vec<TrendRow> = trend
        .iter()
        .skip(skip)
        .map(|t| TrendRow {
            date: t.date.format("%Y-%m-%d %H:%M").to_string(),
            result: colored_outcome(t.outcome),
            score: format!("{} - {}", t.score, t.opponent_score),
            record: format!("{}/{}", t.cumulative_wins, t.cumulative_matches),
            win_rate: format!("{:.1}%", t.win_rate),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_streaks(info: &StreakInfo) {
    section_header("🔥 STREAKS");

    let current = match info.current_streak_type {
        StreakType::Win => format!("{} wins", info.current_streak).green().to_string(),
        StreakType::Loss => format!("{} losses", -info.current_streak).red().to_string(),
        StreakType::None => "none".to_string(),
    };

    println!("  {} {}", "Current:".bold(), current);
    println!("  {} {}", "Longest win streak:".bold(), info.longest_win_streak);
    println!("  {} {}\n", "Longest loss streak:".bold(), info.longest_loss_streak);
}

pub fn display_records(records: &PersonalRecords) {
    section_header("🏆 PERSONAL RECORDS");

    let mut rows = Vec::new();
    let mut push = |name: &str, value: Option<String>, date: Option<String>| {
        rows.push(RecordRow {
            record: name.to_string(),
            value: value.unwrap_or_else(|| "-".to_string()),
            date: date.unwrap_or_else(|| "-".to_string()),
        });
    };
    let day = |d: &chrono::DateTime<chrono::Utc>| d.format("%Y-%m-%d").to_string();

    push(
        "Highest score",
        records.highest_score.as_ref().map(|r| r.value.to_string()),
        records.highest_score.as_ref().map(|r| day(&r.date)),
    );
    push(
        "Most sinks",
        records.most_sinks.as_ref().map(|r| r.value.to_string()),
        records.most_sinks.as_ref().map(|r| day(&r.date)),
    );
    push(
        "Most goals",
        records.most_goals.as_ref().map(|r| r.value.to_string()),
        records.most_goals.as_ref().map(|r| day(&r.date)),
    );
    push(
        "Best hit rate",
        records.best_hit_rate.as_ref().map(|r| format!("{:.1}%", r.value)),
        records.best_hit_rate.as_ref().map(|r| day(&r.date)),
    );
    push(
        "Best catch rate",
        records.best_catch_rate.as_ref().map(|r| format!("{:.1}%", r.value)),
        records.best_catch_rate.as_ref().map(|r| day(&r.date)),
    );
    push(
        "Fastest win",
        records
            .fastest_win
            .as_ref()
            .map(|r| format!("{}m {:02}s", r.value / 60, r.value % 60)),
        records.fastest_win.as_ref().map(|r| day(&r.date)),
    );
    push(
        "Longest win streak",
        records.longest_win_streak.as_ref().map(|s| s.length.to_string()),
        records
            .longest_win_streak
            .as_ref()
            .map(|s| format!("{} → {}", day(&s.start_date), day(&s.end_date))),
    );

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
