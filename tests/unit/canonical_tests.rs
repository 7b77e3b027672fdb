//! Unit tests for SQL canonicalization
//!
//! Both canonicalizers must be idempotent, insensitive to cosmetic formatting and
//! sensitive to literal values

use seequell::{AstCanonicalizer, Canonicalize, SqlDialect, TokenCanonicalizer};

/// Statements paired with cosmetic variants that must canonicalize identically
fn cosmetic_variants() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        (
            "SELECT * FROM accounts WHERE owner_id = 7",
            vec![
                "select * from accounts where owner_id = 7",
                "SELECT *\n  FROM accounts\n WHERE owner_id = 7",
                "SELECT * FROM accounts -- owner lookup\nWHERE owner_id = 7",
                "/* orm:Account */ SELECT * FROM accounts WHERE owner_id = 7;",
                "\tSelect *   From accounts   Where owner_id = 7   ",
            ],
        ),
        (
            "INSERT INTO orders (owner_id, amount) VALUES (1, 99.5)",
            vec![
                "insert into orders (owner_id, amount) values (1, 99.5)",
                "INSERT INTO orders(owner_id,amount) VALUES(1,99.5);",
                "INSERT  INTO orders\n  (owner_id, amount)\nVALUES\n  (1, 99.5)",
            ],
        ),
        (
            "UPDATE accounts SET nickname = 'bob' WHERE owner_id = 3",
            vec![
                "update accounts set nickname = 'bob' where owner_id = 3",
                "UPDATE accounts\nSET nickname='bob'\nWHERE owner_id=3 -- rename",
            ],
        ),
    ]
}

fn canonicalizers() -> Vec<Box<dyn Canonicalize>> {
    vec![
        Box::new(AstCanonicalizer::default()),
        Box::new(TokenCanonicalizer::default()),
        Box::new(AstCanonicalizer::new(SqlDialect::Postgresql)),
        Box::new(TokenCanonicalizer::new(SqlDialect::Sqlite)),
    ]
}

#[cfg(test)]
mod canonical_unit_tests {
    use super::*;

    #[test]
    fn test_cosmetic_variants_share_a_key() {
        for canonicalizer in canonicalizers() {
            for (base, variants) in cosmetic_variants() {
                let expected = canonicalizer.canonicalize(base).unwrap();
                for variant in variants {
                    assert_eq!(
                        canonicalizer.canonicalize(variant).unwrap(),
                        expected,
                        "variant {:?} of {:?}",
                        variant,
                        base
                    );
                }
            }
        }
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        for canonicalizer in canonicalizers() {
            for (base, variants) in cosmetic_variants() {
                for sql in std::iter::once(base).chain(variants) {
                    let once = canonicalizer.canonicalize(sql).unwrap();
                    let twice = canonicalizer.canonicalize(&once).unwrap();
                    assert_eq!(once, twice, "canonical form of {:?} is not stable", sql);
                }
            }

            for sql in [
                "SELECT 'it''s'",
                "SELECT * FROM accounts WHERE nickname = 'x'' OR ''y'",
            ] {
                let once = canonicalizer.canonicalize(sql).unwrap();
                let twice = canonicalizer.canonicalize(&once).unwrap();
                assert_eq!(once, twice, "canonical form of {:?} is not stable", sql);
            }
        }
    }

    #[test]
    fn test_literals_stay_distinct() {
        let pairs = vec![
            (
                "SELECT * FROM accounts WHERE owner_id = 1",
                "SELECT * FROM accounts WHERE owner_id = 2",
            ),
            (
                "SELECT * FROM accounts WHERE nickname = 'bob'",
                "SELECT * FROM accounts WHERE nickname = 'BOB'",
            ),
            (
                "SELECT * FROM accounts WHERE nickname = 'a  b'",
                "SELECT * FROM accounts WHERE nickname = 'a b'",
            ),
            ("SELECT * FROM accounts", "SELECT * FROM orders"),
            (
                "SELECT * FROM accounts WHERE nickname = 'x'' OR ''y'",
                "SELECT * FROM accounts WHERE nickname = 'x' OR 'y'",
            ),
        ];

        for canonicalizer in canonicalizers() {
            for (left, right) in &pairs {
                assert_ne!(
                    canonicalizer.canonicalize(left).unwrap(),
                    canonicalizer.canonicalize(right).unwrap(),
                    "{:?} and {:?} collided",
                    left,
                    right
                );
            }
        }
    }

    #[test]
    fn test_ast_canonicalizer_joins_multiple_statements() {
        let canonical = AstCanonicalizer::default()
            .canonicalize("select 1; select owner_id from accounts;")
            .unwrap();
        assert_eq!(canonical, "SELECT 1; SELECT owner_id FROM accounts");
    }

    #[test]
    fn test_token_canonicalizer_rejects_empty_input() {
        let canonicalizer = TokenCanonicalizer::default();
        assert!(canonicalizer.canonicalize("").is_err());
        assert!(canonicalizer.canonicalize("  -- nothing here\n ;").is_err());
    }

    #[test]
    fn test_token_canonicalizer_rejects_unterminated_string() {
        let err = TokenCanonicalizer::default()
            .canonicalize("SELECT * FROM accounts WHERE nickname = 'bob")
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_mysql_backticks() {
        let canonicalizer = AstCanonicalizer::new(SqlDialect::Mysql);
        let left = canonicalizer
            .canonicalize("select `owner_id` from `accounts`")
            .unwrap();
        let right = canonicalizer
            .canonicalize("SELECT `owner_id`\nFROM `accounts`")
            .unwrap();
        assert_eq!(left, right);
        assert_eq!(left, "SELECT `owner_id` FROM `accounts`");
    }
}
