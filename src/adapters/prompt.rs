use crate::domain::ports::Confirm;
use std::io::{self, BufRead, Write};

/// 在主控台詢問 y/N，讀取失敗視為拒絕
#[derive(Debug, Clone, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        Self
    }
}

pub fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl Confirm for ConsolePrompt {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N]: ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => parse_answer(&answer),
            Err(e) => {
                tracing::warn!("⚠️ Could not read confirmation: {}", e);
                false
            }
        }
    }
}
