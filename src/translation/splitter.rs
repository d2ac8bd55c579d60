use super::scanner::{Region, Scanner};

/// Splits a multi-statement SQL blob into executable statements.
pub trait StatementSplitter: Send {
    /// Ordered, trimmed, non-empty statements of `sql`.
    fn split(&self, sql: &str) -> Vec<String>;
}

/// Splits on `;` outside string literals, quoted identifiers and comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralAwareSplitter;

impl StatementSplitter for LiteralAwareSplitter {
    fn split(&self, sql: &str) -> Vec<String> {
        split_statements(sql)
    }
}

/// Split `sql` on statement-terminating semicolons.
///
/// Fragments holding nothing but whitespace or comments are dropped. `BEGIN ... END` bodies are
/// not recognised, so a procedure body containing `;` has to be sent with
/// [`DatabaseDriver::query`](crate::driver::DatabaseDriver::query) instead of as a batch.
#[must_use]
pub fn split_statements(sql: &str) -> Vec<String> {
    let bytes = sql.as_bytes();
    let mut statements = Vec::new();
    let mut start = 0;
    let mut has_content = false;

    for (idx, region) in Scanner::new(sql) {
        match region {
            Region::Code if bytes[idx] == b';' => {
                push_statement(&mut statements, &sql[start..idx], has_content);
                start = idx + 1;
                has_content = false;
            }
            Region::Code if bytes[idx].is_ascii_whitespace() => {}
            Region::Comment => {}
            _ => has_content = true,
        }
    }
    push_statement(&mut statements, &sql[start..], has_content);

    statements
}

fn push_statement(statements: &mut Vec<String>, fragment: &str, has_content: bool) {
    if has_content {
        statements.push(fragment.trim().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_in_order_and_trims() {
        let sql = "  CREATE TABLE a (id int);\nINSERT INTO a VALUES (1) ;SELECT * FROM a";
        assert_eq!(
            split_statements(sql),
            vec![
                "CREATE TABLE a (id int)",
                "INSERT INTO a VALUES (1)",
                "SELECT * FROM a",
            ]
        );
    }

    #[test]
    fn drops_empty_statements() {
        assert_eq!(split_statements(";; SELECT 1;;  ;\n"), vec!["SELECT 1"]);
        assert!(split_statements("").is_empty());
        assert!(split_statements("  -- nothing here\n; /* or here */").is_empty());
    }

    #[test]
    fn ignores_semicolons_in_literals_identifiers_and_comments() {
        let sql = "INSERT INTO t VALUES ('a;b', 'it''s; fine'); SELECT [odd;name] FROM t -- x;y\n; /* ; */ SELECT 2";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0], "INSERT INTO t VALUES ('a;b', 'it''s; fine')");
        assert_eq!(statements[1], "SELECT [odd;name] FROM t -- x;y");
        assert_eq!(statements[2], "/* ; */ SELECT 2");
    }

    #[test]
    fn statement_count_matches_separated_statements() {
        for n in 1..8 {
            let parts: Vec<String> = (0..n).map(|i| format!("UPDATE t SET c = {i}")).collect();
            let sql = parts.join(";\n");
            assert_eq!(split_statements(&sql), parts);
        }
    }
}
