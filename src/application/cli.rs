#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Thread;
use crate::infrastructure::stores::StoreManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

fn format_thread(thread: &Thread) -> String {
    let mut title = thread.title.to_string();
    if title.len() >= 70 {
        // Titles are arbitrary UTF-8; cut on a char boundary.
        let mut cut = 67;
        while !title.is_char_boundary(cut) {
            cut -= 1;
        }
        title = format!("{}...", &title[..cut]);
    }

    return format!("- (ID: {}) {title}", thread.thread_id);
}

async fn print_threads_list() -> Result<()> {
    let threads = StoreManager::get()
        .list_threads()
        .await?
        .iter()
        .map(|thread| {
            return format_thread(thread);
        })
        .collect::<Vec<String>>();

    if threads.is_empty() {
        println!("There are no threads on the store yet. You should start your first one!");
    } else {
        println!("{}", threads.join("\n"));
    }

    return Ok(());
}

async fn delete_thread(thread_id: &str) -> Result<()> {
    StoreManager::get().delete_thread(thread_id).await?;
    println!("Deleted thread {thread_id}");

    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if !config_file_path.parent().unwrap().exists() {
        fs::create_dir_all(config_file_path.parent().unwrap()).await?;
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    let config_path_display = config_file_path.as_os_str().to_str().unwrap();
    println!("Created default config file at {config_path_display}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_threads_delete() -> Command {
    return Command::new("delete")
        .about("Delete a thread on the remote store.")
        .arg(
            clap::Arg::new("thread-id")
                .short('i')
                .long("id")
                .help("Thread ID")
                .required(true)
                .num_args(1),
        );
}

fn subcommand_threads() -> Command {
    return Command::new("threads")
        .about("Manage threads on the remote store.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list").about("List all threads on the store with their ids and titles."),
        )
        .subcommand(subcommand_threads_delete());
}

fn arg_store_url() -> Arg {
    return Arg::new(ConfigKey::StoreURL.to_string())
        .short('u')
        .long(ConfigKey::StoreURL.to_string())
        .env("THREADBAR_STORE_URL")
        .num_args(1)
        .help(format!(
            "The base URL of the remote thread store API. [default: {}]",
            Config::default(ConfigKey::StoreURL)
        ))
        .global(true);
}

fn arg_surface_errors() -> Arg {
    return Arg::new(ConfigKey::SurfaceErrors.to_string())
        .long(ConfigKey::SurfaceErrors.to_string())
        .env("THREADBAR_SURFACE_ERRORS")
        .num_args(1)
        .help(format!(
            "Show a transient notice in the chat view when a store request fails. [default: {}]",
            Config::default(ConfigKey::SurfaceErrors)
        ))
        .value_parser(PossibleValuesParser::new(["true", "false"]))
        .global(true);
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("threadbar")
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(false)
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_threads())
        .arg(arg_store_url())
        .arg(arg_surface_errors())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("THREADBAR_CONFIG_FILE")
                .num_args(1)
                .help(format!(
                    "Path to configuration file [default: {}]",
                    Config::default(ConfigKey::ConfigFile)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Username.to_string())
                .long(ConfigKey::Username.to_string())
                .env("THREADBAR_USERNAME")
                .num_args(1)
                .help("Your user name displayed in the chat view.")
                .global(true),
        );
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("threads", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("list", _)) => {
                Config::load(build(), vec![&matches]).await?;
                print_threads_list().await?;
                return Ok(false);
            }
            Some(("delete", delete_matches)) => {
                Config::load(build(), vec![&matches]).await?;
                let thread_id = delete_matches.get_one::<String>("thread-id").unwrap();
                delete_thread(thread_id).await?;
                return Ok(false);
            }
            _ => {
                subcommand_threads().print_long_help()?;
                return Ok(false);
            }
        },
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
