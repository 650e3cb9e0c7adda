/**
 * Lexer Tests
 *
 * Token positions and values for the expression lexer
 */

#[cfg(test)]
mod tests {
    use trellis_compiler::expression_parser::lexer::{Lexer, Token, TokenType};

    fn lex(text: &str) -> Vec<Token> {
        Lexer::new().tokenize(text)
    }

    fn expect_token(token: &Token, index: usize, end: usize) {
        assert_eq!(token.index, index, "Token index mismatch");
        assert_eq!(token.end, end, "Token end mismatch");
    }

    fn expect_number_token(token: &Token, index: usize, end: usize, n: f64) {
        expect_token(token, index, end);
        assert!(token.is_number(), "Expected number token");
        assert!(
            (token.num_value - n).abs() < f64::EPSILON,
            "Expected number {}",
            n
        );
    }

    fn expect_string_token(token: &Token, index: usize, end: usize, s: &str) {
        expect_token(token, index, end);
        assert!(token.is_string(), "Expected string token");
        assert_eq!(token.str_value, s);
    }

    fn expect_operator_token(token: &Token, index: usize, end: usize, operator: &str) {
        expect_token(token, index, end);
        assert!(
            token.is_operator(operator),
            "Expected operator token '{}', got {:?}",
            operator,
            token
        );
    }

    #[test]
    fn should_tokenize_role_access() {
        let tokens = lex("self.count");
        assert_eq!(tokens.len(), 3);
        expect_token(&tokens[0], 0, 4);
        assert!(tokens[0].is_keyword_named("self"));
        assert!(tokens[1].is_character('.'));
        expect_token(&tokens[2], 5, 10);
        assert!(tokens[2].is_identifier());
        assert_eq!(tokens[2].str_value, "count");
    }

    #[test]
    fn should_treat_every_role_as_keyword() {
        for role in ["self", "parent", "root", "this"] {
            let tokens = lex(role);
            assert!(tokens[0].is_keyword(), "{} should be a keyword", role);
        }
        assert!(lex("selfish")[0].is_identifier());
    }

    #[test]
    fn should_tokenize_numbers() {
        expect_number_token(&lex("12")[0], 0, 2, 12.0);
        expect_number_token(&lex("0.5")[0], 0, 3, 0.5);
        expect_number_token(&lex(".5")[0], 0, 2, 0.5);
        expect_number_token(&lex("1.5e3")[0], 0, 5, 1500.0);
        expect_number_token(&lex("2E-1")[0], 0, 4, 0.2);
    }

    #[test]
    fn should_report_invalid_exponent() {
        let tokens = lex("1e");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_error());
    }

    #[test]
    fn should_tokenize_strings_with_escapes() {
        expect_string_token(&lex("'abc'")[0], 0, 5, "abc");
        expect_string_token(&lex("\"a\\\"b\"")[0], 0, 6, "a\"b");
        expect_string_token(&lex("'\\n'")[0], 0, 4, "\n");
        expect_string_token(&lex("'\\u0041'")[0], 0, 8, "A");
    }

    #[test]
    fn should_report_unterminated_string() {
        let tokens = lex("'abc");
        assert!(tokens[0].is_error());
        assert_eq!(tokens[0].str_value, "Unterminated quote");
    }

    #[test]
    fn should_tokenize_multi_character_operators() {
        let tokens = lex("a === b !== c == d != e <= f >= g && h || i ?? j");
        let operators: Vec<&str> = tokens
            .iter()
            .filter(|t| t.token_type == TokenType::Operator)
            .map(|t| t.str_value.as_str())
            .collect();
        assert_eq!(
            operators,
            vec!["===", "!==", "==", "!=", "<=", ">=", "&&", "||", "??"]
        );
    }

    #[test]
    fn should_tokenize_conditional_operators() {
        let tokens = lex("a ? b : c");
        expect_operator_token(&tokens[1], 2, 3, "?");
        assert!(tokens[3].is_character(':'));
    }

    #[test]
    fn should_reject_single_ampersand() {
        let tokens = lex("a & b");
        assert!(tokens.last().map(|t| t.is_error()).unwrap_or(false));
    }

    #[test]
    fn should_reject_unknown_characters() {
        let tokens = lex("self.a # 1");
        let error = tokens.last().unwrap();
        assert!(error.is_error());
        assert!(error.str_value.contains("Unexpected character [#]"));
    }

    #[test]
    fn should_skip_whitespace() {
        let tokens = lex("  1 +\t2 ");
        assert_eq!(tokens.len(), 3);
        expect_number_token(&tokens[0], 2, 3, 1.0);
        expect_operator_token(&tokens[1], 4, 5, "+");
        expect_number_token(&tokens[2], 6, 7, 2.0);
    }
}
