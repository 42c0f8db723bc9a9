//! Habit management commands for CLI.

use chrono::Days;
use clap::Subcommand;
use habitkeep_core::habit::recompute;
use habitkeep_core::{
    add_habit, is_task_day, next_task_day_on_or_after, summarize, toggle_and_save, CoreError,
    CustomSchedule, Frequency, Habit, HabitStore, HabitType, SqliteStore,
};

use super::{print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit (daily unless a schedule flag is given)
    Add {
        /// Habit name
        name: String,
        /// Icon identifier
        #[arg(long, default_value = "")]
        icon: String,
        /// Track something to avoid rather than to do
        #[arg(long)]
        negative: bool,
        /// Target duration in seconds
        #[arg(long)]
        target_secs: Option<u64>,
        /// Weekly on these weekdays, 1 = Sunday .. 7 = Saturday (e.g. 2,4,6)
        #[arg(long, value_delimiter = ',', conflicts_with_all = ["days_of_month", "every"])]
        weekly: Option<Vec<u8>>,
        /// Monthly on these days of the month (e.g. 1,15)
        #[arg(long, value_delimiter = ',', conflicts_with = "every")]
        days_of_month: Option<Vec<u8>>,
        /// Every N days, counted from 1970-01-01
        #[arg(long)]
        every: Option<u32>,
    },
    /// List habits
    List,
    /// Show one habit
    Show {
        /// Habit ID
        id: String,
    },
    /// Delete a habit and its history
    Delete {
        /// Habit ID
        id: String,
    },
    /// Mark or unmark today as done
    Toggle {
        /// Habit ID
        id: String,
    },
    /// Next task day on or after today
    Next {
        /// Habit ID
        id: String,
        /// Days to search ahead (default from config)
        #[arg(long)]
        lookahead: Option<u32>,
    },
    /// Completion statistics for recent days
    Stats {
        /// Habit ID
        id: String,
        /// Window size in days, ending today
        #[arg(long, default_value = "30", value_parser = clap::value_parser!(u32).range(1..))]
        days: u32,
    },
}

fn load(store: &SqliteStore, id: &str) -> Result<Habit, CoreError> {
    store
        .get(id)?
        .ok_or_else(|| CoreError::HabitNotFound(id.to_string()))
}

fn build_habit(
    name: String,
    weekly: Option<Vec<u8>>,
    days_of_month: Option<Vec<u8>>,
    every: Option<u32>,
) -> Result<Habit, CoreError> {
    let habit = match (weekly, days_of_month, every) {
        (Some(days), _, _) => {
            let mut habit = Habit::new(name, Frequency::Weekly);
            habit.task_days = days.into_iter().collect();
            habit
        }
        (None, Some(days), _) => Habit::custom(name, CustomSchedule::days_of_month(days)?),
        (None, None, Some(n)) => Habit::custom(name, CustomSchedule::interval_days(n)?),
        (None, None, None) => Habit::daily(name),
    };
    Ok(habit)
}

fn print_line(habit: &Habit, ctx: &Context) {
    let mark = if !is_task_day(habit, ctx.today) {
        "-"
    } else if habit.is_completed_on(ctx.today) {
        "x"
    } else {
        " "
    };
    println!(
        "[{mark}] {}  streak {} (best {})  {}",
        habit.name, habit.current_streak, habit.best_streak, habit.id
    );
}

pub fn run(action: HabitAction, ctx: &Context) -> CmdResult {
    let mut store = SqliteStore::open()?;

    match action {
        HabitAction::Add {
            name,
            icon,
            negative,
            target_secs,
            weekly,
            days_of_month,
            every,
        } => {
            let mut habit = build_habit(name, weekly, days_of_month, every)?.with_icon(icon);
            if negative {
                habit = habit.with_type(HabitType::Negative);
            }
            if let Some(secs) = target_secs {
                habit = habit.with_target_duration(secs);
            }
            let habit = add_habit(&mut store, habit, ctx.today)?;
            if ctx.json {
                print_json(&habit)?;
            } else {
                println!("Habit created: {}", habit.id);
            }
        }
        HabitAction::List => {
            // Streaks as of today; nothing is saved.
            let habits: Vec<Habit> = store
                .load_all_habits()?
                .iter()
                .map(|habit| recompute(habit, ctx.today))
                .collect();
            if ctx.json {
                print_json(&habits)?;
            } else if habits.is_empty() {
                println!("No habits");
            } else {
                for habit in &habits {
                    print_line(habit, ctx);
                }
            }
        }
        HabitAction::Show { id } => {
            let habit = recompute(&load(&store, &id)?, ctx.today);
            print_json(&habit)?;
        }
        HabitAction::Delete { id } => {
            if !store.delete(&id)? {
                return Err(CoreError::HabitNotFound(id).into());
            }
            println!("Habit deleted: {id}");
        }
        HabitAction::Toggle { id } => {
            let habit = toggle_and_save(&mut store, &id, ctx.today)?;
            if ctx.json {
                print_json(&habit)?;
            } else if !is_task_day(&habit, ctx.today) {
                println!("{} is not scheduled on {}", habit.name, ctx.today);
            } else {
                print_line(&habit, ctx);
            }
        }
        HabitAction::Next { id, lookahead } => {
            let habit = load(&store, &id)?;
            let window = lookahead.unwrap_or(ctx.lookahead_days);
            let next = next_task_day_on_or_after(&habit, ctx.today, window);
            if ctx.json {
                print_json(&serde_json::json!({ "id": habit.id, "next": next }))?;
            } else {
                match next {
                    Some(day) => println!("{day}"),
                    None => println!("no task day within {window} days"),
                }
            }
        }
        HabitAction::Stats { id, days } => {
            let habit = load(&store, &id)?;
            let from = ctx
                .today
                .checked_sub_days(Days::new(u64::from(days - 1)))
                .ok_or("window reaches before the supported calendar")?;
            let stats = summarize(&habit, from, ctx.today);
            if ctx.json {
                print_json(&stats)?;
            } else {
                println!("{} from {} to {}", habit.name, stats.from, stats.to);
                println!(
                    "  completed {} of {} task days ({:.0}%)",
                    stats.completed_task_days,
                    stats.task_days,
                    stats.completion_rate * 100.0
                );
                println!("  longest run {}", stats.longest_streak);
            }
        }
    }
    Ok(())
}
