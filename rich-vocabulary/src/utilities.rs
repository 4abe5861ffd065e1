use std::io::{self, Write};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Exit,
    Define(String),
    Legacy(String),
    Language(String),
    Examples(String),
    Unknown(String),
}

impl Command {
    /// `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_ascii_whitespace();
        let command = parts.next()?;
        let rest = parts.collect::<Vec<&str>>().join(" ");
        Some(match command {
            "exit" | "leave" | "quit" | "e" | "q" | "l" => Self::Exit,
            "define" | "find" => Self::Define(rest),
            "legacy" => Self::Legacy(rest),
            "language" | "lang" => Self::Language(rest),
            "examples" => Self::Examples(rest),
            other => Self::Unknown(other.to_string()),
        })
    }
}

/// Reads one line, `None` once stdin is closed.
pub fn input(prompt: &str) -> io::Result<Option<String>> {
    let mut line = String::new();
    print!("{prompt}");
    io::stdout().flush()?;
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

pub fn str_to_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "yeah" | "yea" | "true" | "on" => Some(true),
        "n" | "no" | "nope" | "false" | "off" => Some(false),
        _ => None,
    }
}
