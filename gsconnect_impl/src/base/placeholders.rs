// Counts the `?` markers of a statement text.
//
// Markers within string literals, quoted identifiers, and comments do not count.
pub(crate) fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '?' => count += 1,
            '\'' | '"' => {
                // a doubled quote char is an escaped quote and keeps us inside
                while let Some(q) = chars.next() {
                    if q == c {
                        if chars.peek() == Some(&c) {
                            chars.next();
                        } else {
                            break;
                        }
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for n in chars.by_ref() {
                    if n == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for n in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
            }
            _ => {}
        }
    }
    count
}

#[cfg(test)]
mod test {
    use super::count_placeholders;

    #[test]
    fn test_count_placeholders() {
        assert_eq!(0, count_placeholders("SELECT * FROM Sample"));
        assert_eq!(
            2,
            count_placeholders("INSERT INTO Sample VALUES (?, ?)")
        );
        assert_eq!(
            1,
            count_placeholders("SELECT * FROM Sample WHERE value = '?' AND id > ?")
        );
        assert_eq!(1, count_placeholders("SELECT \"a?\" FROM t WHERE x = ?"));
        assert_eq!(1, count_placeholders("SELECT 'it''s ?' FROM t WHERE x = ?"));
        assert_eq!(
            1,
            count_placeholders("SELECT * FROM t -- where x = ?\n WHERE y = ?")
        );
        assert_eq!(2, count_placeholders("SELECT /* ? */ ?, ? FROM t"));
        assert_eq!(0, count_placeholders("SELECT '? unterminated"));
    }
}
