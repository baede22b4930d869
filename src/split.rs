//! Statement splitting and classification for raw SQL scripts.

/// Strip comments, collapse whitespace and split on unquoted `;`.
pub fn split_statements(sql: &str) -> Vec<String> {
    let cleaned = clean_sql(sql);

    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;

    for c in cleaned.chars() {
        if (c == '"' || c == '\'') && prev != Some('\\') {
            match quote {
                None => quote = Some(c),
                Some(q) if q == c => quote = None,
                Some(_) => {}
            }
        }

        if c == ';' && quote.is_none() {
            push_statement(&mut statements, &current);
            current.clear();
        } else {
            current.push(c);
        }
        prev = Some(c);
    }
    push_statement(&mut statements, &current);

    statements
}

fn push_statement(statements: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}

/// Remove `--` and `/* */` comments and collapse whitespace runs.
///
/// Comment markers are not quote-aware: a `--` inside a string literal still
/// ends the line.
pub fn clean_sql(sql: &str) -> String {
    let without_line_comments: Vec<&str> = sql
        .split('\n')
        .map(|line| match line.find("--") {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect();
    let joined = without_line_comments.join("\n");

    let without_block_comments = strip_block_comments(&joined);

    without_block_comments
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_block_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut rest = sql;

    while let Some(start) = rest.find("/*") {
        match rest[start + 2..].find("*/") {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + 2 + end + 2..];
            }
            // Unterminated block comment is left as text
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Whether the statement is `CREATE [TEMPORARY] TABLE ...`, case-insensitively.
pub fn is_create_table(statement: &str) -> bool {
    let lower = statement.to_lowercase();
    let Some(rest) = lower.trim_start().strip_prefix("create") else {
        return false;
    };
    let Some(rest) = strip_keyword_gap(rest) else {
        return false;
    };
    let rest = rest
        .strip_prefix("temporary")
        .and_then(strip_keyword_gap)
        .unwrap_or(rest);

    rest.strip_prefix("table")
        .is_some_and(|after| after.starts_with(char::is_whitespace))
}

/// Consume the whitespace that must follow a keyword.
fn strip_keyword_gap(s: &str) -> Option<&str> {
    let trimmed = s.trim_start();
    if trimmed.len() < s.len() {
        Some(trimmed)
    } else {
        None
    }
}
