//! Character constants shared by the expression lexer and the markup lexer

pub const EOF: char = '\0';
pub const LF: char = '\n';
pub const NBSP: char = '\u{00A0}';

pub const BANG: char = '!';
pub const DQ: char = '"';
pub const SQ: char = '\'';
pub const PERCENT: char = '%';
pub const AMPERSAND: char = '&';
pub const STAR: char = '*';
pub const PLUS: char = '+';
pub const MINUS: char = '-';
pub const SLASH: char = '/';
pub const BACKSLASH: char = '\\';
pub const COMMA: char = ',';
pub const PERIOD: char = '.';
pub const COLON: char = ':';
pub const SEMICOLON: char = ';';
pub const QUESTION: char = '?';
pub const BAR: char = '|';

pub const LT: char = '<';
pub const EQ: char = '=';
pub const GT: char = '>';

pub const LPAREN: char = '(';
pub const RPAREN: char = ')';
pub const LBRACKET: char = '[';
pub const RBRACKET: char = ']';
pub const LBRACE: char = '{';
pub const RBRACE: char = '}';

/// Marker the template pre-pass places around every `{expression}` so the
/// bracketed text survives markup parsing untouched. Never valid in
/// hand-written markup.
pub const EXPR_MARKER: char = '\u{1F}';

/// ASCII control characters and spaces, plus NBSP. The expression marker
/// is a control character but never whitespace.
pub fn is_whitespace(ch: char) -> bool {
    (ch <= ' ' && ch != EXPR_MARKER) || ch == NBSP
}

pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub fn is_ascii_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

pub fn is_quote(ch: char) -> bool {
    ch == SQ || ch == DQ
}

pub fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

pub fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || ch.is_ascii_digit()
}

/// Tag and attribute names: letters, digits and `- _ : .`
pub fn is_name_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ':' | '.')
}
