use std::io::{self, BufRead, Write};

use chrono::Local;

use crate::clients::calendar::CalendarBackend;
use crate::display;
use crate::error::AgendoError;
use crate::input::{Prompter, TerminalPrompter};
use crate::models::category::CategoryRegistry;
use crate::service::{activity, plan};

/// Interactive loop for long tracking sessions. Reads whitespace-split
/// command lines and dispatches them to the same commands as the one-shot
/// CLI; the current activity survives between commands.
pub async fn run(
    backend: &dyn CalendarBackend,
    categories: &CategoryRegistry,
) -> Result<(), AgendoError> {
    display::heading("Welcome to agendo!");

    let mut session = activity::SessionState::default();

    // Offer to resume the most recent event as the current activity.
    let now = Local::now().naive_local();
    match backend.last_event(now).await {
        Ok(Some(last)) if last.end > now => {
            println!("Last event: {}", last.name);
            if ask_yes_no("Are you still doing that?")? {
                session.current = Some(last);
            }
        }
        Ok(_) => {}
        Err(err) => display::error(&err.to_string()),
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let now = Local::now().naive_local();
        if let Some(current) = &session.current {
            print!(
                "[ {} {} ]",
                current.name,
                activity::format_duration(now - current.start)
            );
        }
        print!("> ");
        let _ = io::stdout().flush();

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|_| AgendoError::InputClosed)?;
        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens[0].eq_ignore_ascii_case("exit") {
            handle_exit(backend, &mut session).await;
            break;
        }
        if let Err(err) = dispatch(&tokens, backend, categories, &mut session).await {
            match err {
                AgendoError::InputClosed => return Err(AgendoError::InputClosed),
                other => display::error(&format!("ERROR: {}", other)),
            }
        }
    }
    Ok(())
}

/// Stops whatever is still running when the user leaves. The end timestamp is
/// taken here, at the moment of stopping, not at the last prompt: the shell
/// may have sat idle at the prompt for a long time before the exit.
async fn handle_exit(backend: &dyn CalendarBackend, session: &mut activity::SessionState) {
    println!("See you later!");
    if session.current.is_some() {
        let now = Local::now().naive_local();
        if let Err(err) = activity::stop(backend, session, now).await {
            display::error(&err.to_string());
        }
    }
}

async fn dispatch(
    tokens: &[String],
    backend: &dyn CalendarBackend,
    categories: &CategoryRegistry,
    session: &mut activity::SessionState,
) -> Result<(), AgendoError> {
    let now = Local::now().naive_local();
    let mut prompter = TerminalPrompter;
    let tail = &tokens[1..];
    match tokens[0].to_uppercase().as_str() {
        "START" => {
            let Some(category) = tail.first() else {
                return Err(AgendoError::Command(
                    "start needs a category, e.g. 'start work'".to_string(),
                ));
            };
            activity::start(
                backend,
                categories,
                session,
                category,
                &tail[1..],
                now,
                &mut prompter,
            )
            .await
        }
        "STOP" => activity::stop(backend, session, now).await,
        "DELETE" => activity::delete(backend, session, now).await,
        "RENAME" => activity::rename(backend, session, tail, now, &mut prompter).await,
        "ADD" => plan::add(backend, categories, tail, now, &mut prompter).await,
        "PLAN" => {
            plan::show(
                backend,
                categories,
                tail.first().map(String::as_str),
                tail.get(1).map(String::as_str),
                now,
            )
            .await
        }
        "STATS" => {
            plan::stats(
                backend,
                categories,
                tail.first().map(String::as_str),
                tail.get(1).map(String::as_str),
                now,
            )
            .await
        }
        "HELP" => {
            print_help(categories);
            Ok(())
        }
        other => Err(AgendoError::Command(format!("{}: command not found", other))),
    }
}

fn ask_yes_no(question: &str) -> Result<bool, AgendoError> {
    let mut prompter = TerminalPrompter;
    loop {
        let answer = prompter.prompt_line(&format!("{} (y/n)", question))?;
        match answer.trim() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => {}
        }
    }
}

fn print_help(categories: &CategoryRegistry) {
    display::heading("= Commands =");
    for name in categories.names() {
        println!(" start {} [name...] - begin a {} activity now", name, name);
    }
    println!(" stop - stop the current activity");
    println!(" rename [name...] - rename the current activity");
    println!(" delete - delete the current activity");
    println!(" add [args...] - log an event at an arbitrary time");
    println!(" plan [date] [days] - show the schedule");
    println!(" stats [date] [days] - time per category");
    println!(" exit - stop the current activity and leave");
    println!();
    println!(" (time) is 'now', 'HH', 'HH:MM' or 'HH:MM:SS'");
    println!(" (date) is 'yesterday', 'today', 'tomorrow', 'YYYY-MM-DD', 'YYYY/MM/DD', 'MM-DD' or 'MM/DD'");
    println!(" (category) is one of the names in your CATEGORIES config entry");
}
