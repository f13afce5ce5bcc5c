//! Stdin Confirmer - 在终端上询问是否继续

use std::io::{self, BufRead, Write};

use crate::application::ports::ConfirmerPort;

/// 读取一行回答，`y` 或 `yes`（不区分大小写）视为同意
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirmer;

impl StdinConfirmer {
    pub fn new() -> Self {
        Self
    }
}

/// 解析回答
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl ConfirmerPort for StdinConfirmer {
    fn confirm(&self, question: &str) -> bool {
        let mut stdout = io::stdout().lock();
        if writeln!(stdout, "{}", question)
            .and_then(|_| write!(stdout, "Continue? [y/N] "))
            .and_then(|_| stdout.flush())
            .is_err()
        {
            return false;
        }
        drop(stdout);

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read confirmation");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("yep"));
    }
}
