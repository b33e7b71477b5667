/// Splits a SQL batch on a literal delimiter.
///
/// Pieces are trimmed and blank pieces dropped. The delimiter is not
/// quote-aware: a `;` inside a string literal still splits.
pub fn split_statements(sql: &str, delimiter: char) -> Vec<&str> {
    sql.split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic_batch() {
        let sql = "CREATE TABLE a (id INT);\nINSERT INTO a VALUES (1);\n";
        assert_eq!(
            split_statements(sql, ';'),
            vec!["CREATE TABLE a (id INT)", "INSERT INTO a VALUES (1)"]
        );
    }

    #[test]
    fn test_split_skips_blank_pieces() {
        let sql = ";;  \n\t; SELECT 1 ;\n\n";
        assert_eq!(split_statements(sql, ';'), vec!["SELECT 1"]);
    }

    #[test]
    fn test_split_without_trailing_delimiter() {
        assert_eq!(split_statements("SELECT 1", ';'), vec!["SELECT 1"]);
    }

    #[test]
    fn test_split_empty_file() {
        assert!(split_statements("", ';').is_empty());
        assert!(split_statements("\n  \n", ';').is_empty());
    }

    #[test]
    fn test_split_custom_delimiter() {
        let sql = "CREATE PROCEDURE p() BEGIN SELECT 1; END$$ CALL p()$$";
        assert_eq!(
            split_statements(sql, '$'),
            vec!["CREATE PROCEDURE p() BEGIN SELECT 1; END", "CALL p()"]
        );
    }

    #[test]
    fn test_split_is_not_quote_aware() {
        let sql = "INSERT INTO t VALUES ('a;b')";
        assert_eq!(
            split_statements(sql, ';'),
            vec!["INSERT INTO t VALUES ('a", "b')"]
        );
    }
}
