use serde::{Deserialize, Serialize};
use sqlparser::{
    dialect::{
        Dialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect,
    },
    keywords::Keyword,
    parser::Parser,
    tokenizer::{Token, Tokenizer},
};

use crate::{error::invalid_input, Result};

/// SQL dialect used to parse and tokenize statements
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    Generic,
    Postgresql,
    Mysql,
    Sqlite,
    Mssql,
}

impl SqlDialect {
    pub fn dialect(self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::Generic => Box::new(GenericDialect {}),
            SqlDialect::Postgresql => Box::new(PostgreSqlDialect {}),
            SqlDialect::Mysql => Box::new(MySqlDialect {}),
            SqlDialect::Sqlite => Box::new(SQLiteDialect {}),
            SqlDialect::Mssql => Box::new(MsSqlDialect {}),
        }
    }
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlDialect::Generic => write!(f, "generic"),
            SqlDialect::Postgresql => write!(f, "postgresql"),
            SqlDialect::Mysql => write!(f, "mysql"),
            SqlDialect::Sqlite => write!(f, "sqlite"),
            SqlDialect::Mssql => write!(f, "mssql"),
        }
    }
}

/// Maps SQL text to a canonical key used for duplicate detection.
///
/// Implementations must be deterministic and idempotent. Two statements that differ
/// only in keyword case, whitespace or comments must map to the same key, while
/// different literal values or different statements must not.
pub trait Canonicalize {
    fn canonicalize(&self, sql: &str) -> Result<String>;
}

/// Canonicalizes by parsing the statement and printing the AST back out
#[derive(Debug, Clone, Copy, Default)]
pub struct AstCanonicalizer {
    dialect: SqlDialect,
}

impl AstCanonicalizer {
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect }
    }
}

impl Canonicalize for AstCanonicalizer {
    fn canonicalize(&self, sql: &str) -> Result<String> {
        let dialect = self.dialect.dialect();
        let statements = Parser::parse_sql(dialect.as_ref(), sql)
            .map_err(|e| invalid_input(format!("failed to parse SQL: {}", e)))?;

        if statements.is_empty() {
            return Err(invalid_input("SQL text contains no statement"));
        }

        Ok(statements
            .iter()
            .map(|stmt| stmt.to_string())
            .collect::<Vec<_>>()
            .join("; "))
    }
}

/// Canonicalizes at the token level.
///
/// Comments and whitespace are dropped, every unquoted word the dialect knows as a
/// keyword is upper-cased (identifiers such as `name` included) and trailing
/// semicolons removed. Quoted strings and identifiers keep their escaping as written.
/// Works for statements the parser does not support.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCanonicalizer {
    dialect: SqlDialect,
}

impl TokenCanonicalizer {
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect }
    }
}

impl Canonicalize for TokenCanonicalizer {
    fn canonicalize(&self, sql: &str) -> Result<String> {
        let mut tokens: Vec<Token> = significant_tokens(sql, self.dialect)?
            .into_iter()
            .map(|token| match token {
                Token::Word(mut word)
                    if word.quote_style.is_none() && word.keyword != Keyword::NoKeyword =>
                {
                    word.value = word.value.to_uppercase();
                    Token::Word(word)
                }
                other => other,
            })
            .collect();

        while matches!(tokens.last(), Some(Token::SemiColon)) {
            tokens.pop();
        }

        if tokens.is_empty() {
            return Err(invalid_input("SQL text contains no statement"));
        }

        Ok(join_tokens(&tokens))
    }
}

/// Tokenize `sql`, keeping everything except whitespace and comments.
///
/// Literals and quoted identifiers are not unescaped, so joining the tokens again
/// yields text that tokenizes back to the same stream.
pub(crate) fn significant_tokens(sql: &str, dialect: SqlDialect) -> Result<Vec<Token>> {
    let dialect = dialect.dialect();
    let tokens = Tokenizer::new(dialect.as_ref(), sql)
        .with_unescape(false)
        .tokenize()
        .map_err(|e| invalid_input(format!("failed to tokenize SQL: {}", e)))?;

    Ok(tokens
        .into_iter()
        .filter(|token| !matches!(token, Token::Whitespace(_) | Token::EOF))
        .collect())
}

/// Join tokens with single spaces, glued around parentheses, commas and dots
pub(crate) fn join_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;

    for token in tokens {
        if let Some(prev) = prev {
            let glued = matches!(
                token,
                Token::RParen | Token::Comma | Token::SemiColon | Token::Period
            ) || matches!(prev, Token::LParen | Token::Period);
            if !glued {
                out.push(' ');
            }
        }
        match token {
            // E'..' strings are always unescaped by the tokenizer
            Token::EscapedStringLiteral(value) => {
                out.push_str("E'");
                out.push_str(&value.replace('\\', "\\\\").replace('\'', "\\'"));
                out.push('\'');
            }
            other => out.push_str(&other.to_string()),
        }
        prev = Some(token);
    }

    out
}
