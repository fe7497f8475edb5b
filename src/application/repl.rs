use std::io;
use std::io::Write;

use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::ThreadListController;
use crate::infrastructure::stores::StoreManager;

const HELP_TEXT: &str = "COMMANDS:
- list               Refresh and print the thread list.
- open <n|id>        Switch to a thread by list number or id.
- new                Start a fresh thread.
- delete <n|id>      Delete a thread by list number or id.
- help               Print this help.
- quit               Exit.";

fn print_prompt() -> Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;
    return Ok(());
}

fn render(controller: &mut ThreadListController) {
    println!();

    if controller.threads().is_empty() {
        println!("No threads on the store yet.");
    } else {
        for (idx, thread) in controller.threads().iter().enumerate() {
            let mut line = format!("{}. {}", idx + 1, thread.title);
            if thread.thread_id == controller.current_thread_id() {
                line = Paint::green(line).to_string();
            }
            println!("{line}");
        }
    }

    if controller.is_new_chat() {
        println!(
            "\nOn a new thread ({}). It appears in the list after the first message.",
            controller.current_thread_id()
        );
    }

    for message in controller.previous_chats() {
        let mut author = message.role.to_string();
        if author == "user" {
            author = Config::get(ConfigKey::Username);
        }
        println!("{}: {}", Paint::blue(author), message.content);
    }

    if let Some(notice) = controller.take_notice() {
        println!("{}", Paint::yellow(notice.text));
    }
}

fn resolve_thread_id(controller: &ThreadListController, arg: &str) -> String {
    if let Ok(idx) = arg.parse::<usize>() {
        if idx >= 1 && idx <= controller.threads().len() {
            return controller.threads()[idx - 1].thread_id.to_string();
        }
    }

    return arg.to_string();
}

pub async fn start() -> Result<()> {
    let mut controller = ThreadListController::new(
        StoreManager::get(),
        Config::get_bool(ConfigKey::SurfaceErrors),
    );

    controller.refresh().await;
    render(&mut controller);
    println!("\nType 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_prompt()?;

    while let Some(line) = lines.next_line().await? {
        let parts = line.split_whitespace().collect::<Vec<&str>>();
        match parts.as_slice() {
            [] => {}
            ["help"] => {
                println!("{HELP_TEXT}");
            }
            ["quit"] | ["exit"] | ["q"] => {
                break;
            }
            ["list"] | ["ls"] => {
                controller.refresh().await;
                render(&mut controller);
            }
            ["new"] => {
                controller.create_new_thread();
                controller.refresh().await;
                render(&mut controller);
            }
            ["open", target] => {
                let thread_id = resolve_thread_id(&controller, target);
                let before = controller.current_thread_id().to_string();
                controller.switch_thread(&thread_id).await;
                if controller.current_thread_id() != before {
                    controller.refresh().await;
                }
                render(&mut controller);
            }
            ["delete", target] | ["rm", target] => {
                let thread_id = resolve_thread_id(&controller, target);
                let before = controller.current_thread_id().to_string();
                controller.delete_thread(&thread_id).await;
                if controller.current_thread_id() != before {
                    controller.refresh().await;
                }
                render(&mut controller);
            }
            _ => {
                println!("Unknown command. Type 'help' for commands.");
            }
        }

        print_prompt()?;
    }

    return Ok(());
}
