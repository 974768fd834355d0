// Line lexer tests

#[cfg(test)]
mod tests {
    use crate::script_compiler::lexer::{split_source, LineLexer};

    fn tokenize(input: &str) -> Vec<String> {
        LineLexer::new(input).tokenize()
    }

    #[test]
    fn test_whitespace_and_commas_separate() {
        assert_eq!(tokenize("MOVE_NPC 3, 4,5"), vec!["MOVE_NPC", "3", "4", "5"]);
        assert_eq!(tokenize("\tJUMP   LOOP  "), vec!["JUMP", "LOOP"]);
    }

    #[test]
    fn test_quoted_string_is_one_token() {
        assert_eq!(
            tokenize(r#"TEXT "Hello, world; friend""#),
            vec!["TEXT", r#""Hello, world; friend""#]
        );
    }

    #[test]
    fn test_escaped_quote_stays_inside_string() {
        assert_eq!(
            tokenize(r#"TEXT "say \"hi\"" 1"#),
            vec!["TEXT", r#""say \"hi\"""#, "1"]
        );
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        assert_eq!(tokenize(r#"TEXT "oops 1 2"#), vec!["TEXT", r#""oops 1 2"#]);
    }

    #[test]
    fn test_comment_ends_line() {
        assert_eq!(tokenize("WAIT 30 ; half a second"), vec!["WAIT", "30"]);
        assert!(tokenize("; nothing here").is_empty());
    }

    #[test]
    fn test_string_directly_after_word() {
        assert_eq!(tokenize(r#"TEXT"hi""#), vec!["TEXT", r#""hi""#]);
    }

    #[test]
    fn test_split_source_skips_blank_and_comment_lines() {
        let source = "; header comment\n\nLOOP:\n   \n  JUMP LOOP ; forever\n";
        let lines = split_source(source);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number(), 3);
        assert_eq!(lines[0].tokens(), &["LOOP:".to_string()]);
        assert_eq!(lines[1].number(), 5);
        assert_eq!(lines[1].text(), "JUMP LOOP ; forever");
        assert_eq!(lines[1].code_offset(), None);
    }

    #[test]
    fn test_code_offset_is_settable() {
        let mut lines = split_source("END");
        lines[0].set_code_offset(12);
        assert_eq!(lines[0].code_offset(), Some(12));
    }
}
