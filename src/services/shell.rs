//! Line handling for the interactive session.

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ShellError {
    #[error("unterminated {0} quote")]
    UnterminatedQuote(char),
    #[error("trailing backslash")]
    TrailingEscape,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    Skip,
    Exit,
    Command(Vec<String>),
}

pub fn classify(raw: &str) -> Result<Line, ShellError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(Line::Skip);
    }
    if trimmed == "exit" || trimmed == "quit" {
        return Ok(Line::Exit);
    }
    Ok(Line::Command(split(trimmed)?))
}

/// POSIX-ish word splitting: single quotes are literal, double quotes allow
/// `\"` and `\\`, a bare backslash escapes the next character.
pub fn split(line: &str) -> Result<Vec<String>, ShellError> {
    let mut words = Vec::new();
    let mut cur = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(x) => cur.push(x),
                        None => return Err(ShellError::UnterminatedQuote('\'')),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(x @ ('"' | '\\')) => cur.push(x),
                            Some(x) => {
                                cur.push('\\');
                                cur.push(x);
                            }
                            None => return Err(ShellError::UnterminatedQuote('"')),
                        },
                        Some(x) => cur.push(x),
                        None => return Err(ShellError::UnterminatedQuote('"')),
                    }
                }
            }
            '\\' => {
                in_word = true;
                cur.push(chars.next().ok_or(ShellError::TrailingEscape)?);
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut cur));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                cur.push(c);
            }
        }
    }
    if in_word {
        words.push(cur);
    }
    Ok(words)
}
