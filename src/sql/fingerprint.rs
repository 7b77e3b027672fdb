//! Literal-insensitive fingerprints of canonical SQL

use sqlparser::tokenizer::Token;

use super::canonical::{join_tokens, significant_tokens, SqlDialect};

/// Replace every literal and bind parameter in a canonical statement with `?`.
///
/// Returns `None` when the text cannot be tokenized; fingerprints only feed
/// similarity reporting, so callers skip such statements.
pub fn fingerprint(canonical: &str, dialect: SqlDialect) -> Option<String> {
    let tokens: Vec<Token> = significant_tokens(canonical, dialect)
        .ok()?
        .into_iter()
        .map(|token| {
            if is_literal(&token) {
                Token::Placeholder("?".to_string())
            } else {
                token
            }
        })
        .collect();

    if tokens.is_empty() {
        return None;
    }

    Some(join_tokens(&tokens))
}

fn is_literal(token: &Token) -> bool {
    matches!(
        token,
        Token::Number(_, _)
            | Token::SingleQuotedString(_)
            | Token::NationalStringLiteral(_)
            | Token::EscapedStringLiteral(_)
            | Token::HexStringLiteral(_)
            | Token::DollarQuotedString(_)
            | Token::Placeholder(_)
    )
}
