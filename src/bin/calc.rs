//! Terminal calculator
//!
//! Line-oriented front end over the calculator state machine. Each
//! character of a line is fed to the machine as a key press, so
//! `2+3=` behaves exactly like pressing those four buttons. Completed
//! calculations land in the capped history log.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use log::{debug, warn};

use skyops::application::calculator::{Calculator, Key};
use skyops::application::CalculationService;
use skyops::infrastructure::{InMemoryStorage, LatencyProfile};

const HISTORY_SHOWN: usize = 10;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let storage = Arc::new(InMemoryStorage::new(LatencyProfile::none()));
    let history = CalculationService::new(storage);
    let mut calc = Calculator::new();

    println!("skyops-calc {}", env!("CARGO_PKG_VERSION"));
    println!("Keys: digits . + - * / = | commands: c, ac, history, quit");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("[{}] > ", calc.display());
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim().to_lowercase().as_str() {
            "" => continue,
            "quit" | "exit" | "q" => break,
            "ac" => {
                calc.all_clear();
                continue;
            }
            "c" | "clear" => {
                calc.clear();
                continue;
            }
            "history" => {
                match history.recent(HISTORY_SHOWN).await {
                    Ok(entries) if entries.is_empty() => println!("(no calculations yet)"),
                    Ok(entries) => {
                        for entry in entries {
                            println!("{}", entry);
                        }
                    }
                    Err(e) => warn!("Could not read history: {}", e),
                }
                continue;
            }
            _ => {}
        }

        for c in line.trim().chars() {
            if c.is_whitespace() {
                continue;
            }
            let Some(key) = Key::from_char(c) else {
                println!("unknown key: {}", c);
                calc.all_clear();
                break;
            };
            debug!("key press: {:?}", key);

            match calc.press(key) {
                Ok(Some(entry)) => {
                    println!("= {}", calc.display());
                    if let Err(e) = history.record(&entry).await {
                        warn!("Could not record calculation: {}", e);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    println!("error: {}", e);
                    break;
                }
            }
        }
    }

    Ok(())
}
