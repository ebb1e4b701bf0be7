//! ShQL grammar, built with chumsky.
//!
//! ```text
//! statement := (select | insert) [';']
//! select    := SELECT ('*' | item (',' item)*) [FROM name [[AS] alias]] [WHERE or]
//! item      := (column | literal) [AS name]
//! insert    := INSERT INTO name '(' name, ... ')' VALUES '(' literal, ... ')'
//! or        := and (OR and)*
//! and       := cmp (AND cmp)*
//! cmp       := atom [('=' | LIKE) atom]
//! atom      := '(' or ')' | column | literal
//! ```

use super::ast::{Column, Expr, Insert, Literal, Select, Table};
use chumsky::extra;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

/// Extra type for parsers - uses Rich errors for better messages
pub type Extra<'src> = extra::Err<Rich<'src, char>>;

const RESERVED: &[&str] = &[
    "SELECT", "FROM", "WHERE", "AND", "OR", "LIKE", "AS", "INSERT", "INTO", "VALUES", "TRUE",
    "FALSE", "NULL",
];

// ============================================================================
// Primitive parsers
// ============================================================================

/// Case-insensitive keyword matcher
pub fn kw<'src>(keyword: &'static str) -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_alphabetic())
        .repeated()
        .at_least(1)
        .to_slice()
        .try_map(move |s: &str, span| {
            if s.eq_ignore_ascii_case(keyword) {
                Ok(())
            } else {
                Err(Rich::custom(span, format!("expected keyword '{keyword}'")))
            }
        })
        .padded()
}

/// Identifier: a letter or `_`, then letters, digits and `_`; keywords excluded
pub fn ident<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_alphabetic() || *c == '_')
        .then(
            any()
                .filter(|c: &char| c.is_alphanumeric() || *c == '_')
                .repeated(),
        )
        .to_slice()
        .try_map(|s: &str, span| {
            if RESERVED.iter().any(|k| k.eq_ignore_ascii_case(s)) {
                Err(Rich::custom(
                    span,
                    format!("reserved keyword '{s}' cannot be used as a name"),
                ))
            } else {
                Ok(s.to_string())
            }
        })
        .padded()
        .labelled("identifier")
}

/// Parser for single-quoted string literals: 'value'
fn single_quoted_string<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    just('\'')
        .ignore_then(
            none_of("'")
                .repeated()
                .to_slice()
                .map(|s: &str| s.to_string()),
        )
        .then_ignore(just('\''))
}

/// Parser for double-quoted string literals: "value"
fn double_quoted_string<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    just('"')
        .ignore_then(
            none_of("\"")
                .repeated()
                .to_slice()
                .map(|s: &str| s.to_string()),
        )
        .then_ignore(just('"'))
}

/// Parser for string literals (single or double quoted)
pub fn string_literal<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    single_quoted_string()
        .or(double_quoted_string())
        .labelled("string literal")
}

fn number<'src>() -> impl Parser<'src, &'src str, f64, Extra<'src>> + Clone {
    just('-')
        .or_not()
        .then(
            any()
                .filter(|c: &char| c.is_ascii_digit())
                .repeated()
                .at_least(1),
        )
        .then(
            just('.')
                .then(any().filter(|c: &char| c.is_ascii_digit()).repeated())
                .or_not(),
        )
        .to_slice()
        .try_map(|s: &str, span: SimpleSpan| {
            s.parse::<f64>()
                .map_err(|_| Rich::custom(span, "invalid number literal"))
        })
        .labelled("number")
}

/// Parser for constants: strings, numbers, booleans and NULL
pub fn literal<'src>() -> impl Parser<'src, &'src str, Literal, Extra<'src>> + Clone {
    choice((
        string_literal().map(Literal::String),
        number().map(Literal::Number),
        kw("TRUE").to(Literal::Bool(true)),
        kw("FALSE").to(Literal::Bool(false)),
        kw("NULL").to(Literal::Null),
    ))
    .padded()
    .labelled("literal")
}

/// Parser for dotted field paths: `nom`, `a.nom`
pub fn column<'src>() -> impl Parser<'src, &'src str, Column, Extra<'src>> + Clone {
    ident()
        .separated_by(just('.'))
        .at_least(1)
        .collect::<Vec<_>>()
        .map(|path| Column { path })
        .labelled("column")
}

// ============================================================================
// Predicates
// ============================================================================

/// Parser for WHERE conditions; OR binds looser than AND
pub fn condition<'src>() -> impl Parser<'src, &'src str, Expr, Extra<'src>> + Clone {
    recursive(|condition| {
        let atom = choice((
            condition
                .delimited_by(just('(').padded(), just(')').padded()),
            column().map(Expr::Column),
            literal().map(Expr::Literal),
        ));

        let comparison = atom
            .clone()
            .then(
                choice((just('=').padded().to(true), kw("LIKE").to(false)))
                    .then(atom)
                    .or_not(),
            )
            .map(|(left, rest)| match rest {
                Some((true, right)) => Expr::Eq(Box::new(left), Box::new(right)),
                Some((false, pattern)) => Expr::Like {
                    expr: Box::new(left),
                    pattern: Box::new(pattern),
                },
                None => left,
            });

        let conjunction = comparison.clone().foldl(
            kw("AND").ignore_then(comparison).repeated(),
            |left, right| Expr::And(Box::new(left), Box::new(right)),
        );

        conjunction.clone().foldl(
            kw("OR").ignore_then(conjunction).repeated(),
            |left, right| Expr::Or(Box::new(left), Box::new(right)),
        )
    })
}

// ============================================================================
// Statements
// ============================================================================

fn select<'src>() -> impl Parser<'src, &'src str, Expr, Extra<'src>> {
    let item = choice((column().map(Expr::Column), literal().map(Expr::Literal)))
        .then(kw("AS").ignore_then(ident()).or_not())
        .map(|(expr, alias)| match alias {
            Some(alias) => Expr::Alias {
                expr: Box::new(expr),
                alias,
            },
            None => expr,
        });

    let columns = choice((
        just('*').padded().to(vec![Expr::Star]),
        item.separated_by(just(',').padded())
            .at_least(1)
            .collect::<Vec<_>>(),
    ));

    let table = ident()
        .then(kw("AS").or_not().ignore_then(ident()).or_not())
        .map(|(name, alias)| Table { name, alias });

    kw("SELECT")
        .ignore_then(columns)
        .then(kw("FROM").ignore_then(table).or_not())
        .then(kw("WHERE").ignore_then(condition()).or_not())
        .map(|((columns, from), selection)| {
            Expr::Select(Select {
                columns,
                from,
                selection: selection.map(Box::new),
            })
        })
}

fn insert<'src>() -> impl Parser<'src, &'src str, Expr, Extra<'src>> {
    let names = ident()
        .separated_by(just(',').padded())
        .at_least(1)
        .collect::<Vec<_>>()
        .delimited_by(just('(').padded(), just(')').padded());

    let values = literal()
        .separated_by(just(',').padded())
        .at_least(1)
        .collect::<Vec<_>>()
        .delimited_by(just('(').padded(), just(')').padded());

    kw("INSERT")
        .ignore_then(kw("INTO"))
        .ignore_then(ident())
        .then(names)
        .then_ignore(kw("VALUES"))
        .then(values)
        .map(|((table, columns), values)| {
            Expr::Insert(Insert {
                table,
                columns,
                values,
            })
        })
}

/// Main ShQL parser: one statement, optionally terminated by `;`
pub fn statement<'src>() -> impl Parser<'src, &'src str, Expr, Extra<'src>> {
    choice((select(), insert()))
        .then_ignore(just(';').padded().or_not())
        .padded()
        .then_ignore(end())
}

// ============================================================================
// Error formatting
// ============================================================================

/// Format chumsky errors for human consumption
pub fn format_errors(errs: &[Rich<'_, char>], input: &str) -> String {
    errs.iter()
        .map(|e| {
            let start = e.span().start;
            let line = input[..start].matches('\n').count() + 1;
            let col = start - input[..start].rfind('\n').map_or(0, |i| i + 1);

            let found = e
                .found()
                .map_or("end of input".to_string(), |c| format!("'{c}'"));

            format!(
                "Line {line}, column {}: {} (found {found})",
                col + 1,
                e.reason()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn parse(input: &str) -> Expr {
        statement().parse(input).into_result().unwrap()
    }

    fn select_of(input: &str) -> Select {
        match parse(input) {
            Expr::Select(select) => select,
            other => panic!("expected a SELECT, got {other:?}"),
        }
    }

    #[test]
    fn test_kw_case_insensitive() {
        assert!(kw("SELECT").parse("select").into_result().is_ok());
        assert!(kw("SELECT").parse("SeLeCt").into_result().is_ok());
        assert!(kw("SELECT").parse("selects").into_result().is_err());
    }

    #[test]
    fn test_ident() {
        assert_eq!(ident().parse("numéro_2").into_result().unwrap(), "numéro_2");
        assert!(ident().parse("2nom").into_result().is_err());
        assert!(ident().parse("where").into_result().is_err());
    }

    #[test]
    fn test_column_path() {
        let column = column().parse("a.site.nom").into_result().unwrap();
        assert_eq!(column.path, ["a", "site", "nom"]);
        assert_eq!(column.name(), "nom");
    }

    #[test_case("'Usine'", Literal::String("Usine".into()) ; "single quoted")]
    #[test_case("\"Usine\"", Literal::String("Usine".into()) ; "double quoted")]
    #[test_case("42", Literal::Number(42.0) ; "integer")]
    #[test_case("-1.5", Literal::Number(-1.5) ; "decimal")]
    #[test_case("true", Literal::Bool(true) ; "boolean")]
    #[test_case("NULL", Literal::Null ; "null")]
    fn test_literal(input: &str, expected: Literal) {
        assert_eq!(literal().parse(input).into_result().unwrap(), expected);
    }

    #[test]
    fn test_select_star() {
        let select = select_of("SELECT * FROM AIOT");
        assert_eq!(select.columns, [Expr::Star]);
        assert_eq!(
            select.from,
            Some(Table {
                name: "AIOT".into(),
                alias: None
            })
        );
        assert!(select.selection.is_none());
    }

    #[test]
    fn test_select_without_from() {
        let select = select_of("select id, path;");
        assert_eq!(select.columns.len(), 2);
        assert!(select.from.is_none());
    }

    #[test]
    fn test_select_columns_and_aliases() {
        let select = select_of("SELECT nom, a.nom AS site FROM INSPECTION i");
        assert_eq!(select.columns[0], Expr::column(["nom"]));
        assert_eq!(
            select.columns[1],
            Expr::Alias {
                expr: Box::new(Expr::column(["a", "nom"])),
                alias: "site".into()
            }
        );
        assert_eq!(select.from.unwrap().alias.as_deref(), Some("i"));
    }

    #[test]
    fn test_table_alias_with_as() {
        let select = select_of("SELECT i.nom FROM INSPECTION AS i WHERE i.nom = 'x'");
        assert_eq!(select.from.unwrap().alias.as_deref(), Some("i"));
        assert!(select.selection.is_some());
    }

    #[test]
    fn test_where_like() {
        let select = select_of("SELECT nom FROM AIOT WHERE nom LIKE '%Usine%'");
        assert_eq!(
            *select.selection.unwrap(),
            Expr::Like {
                expr: Box::new(Expr::column(["nom"])),
                pattern: Box::new(Expr::Literal(Literal::String("%Usine%".into())))
            }
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let select = select_of("SELECT * WHERE a = 1 OR b = 2 AND c = 3");
        assert_eq!(
            select.selection.unwrap().to_string(),
            "(a = 1 OR (b = 2 AND c = 3))"
        );
    }

    #[test]
    fn test_parentheses() {
        let select = select_of("SELECT * WHERE (a = 1 OR b = 2) AND c = 3");
        assert_eq!(
            select.selection.unwrap().to_string(),
            "((a = 1 OR b = 2) AND c = 3)"
        );
    }

    #[test]
    fn test_insert() {
        let expr = parse("INSERT INTO AIOT (nom, code) VALUES ('Usine Est', 4)");
        assert_eq!(
            expr,
            Expr::Insert(Insert {
                table: "AIOT".into(),
                columns: vec!["nom".into(), "code".into()],
                values: vec![Literal::String("Usine Est".into()), Literal::Number(4.0)],
            })
        );
    }

    #[test_case("SELECT" ; "no columns")]
    #[test_case("SELECT nom FROM" ; "missing table")]
    #[test_case("SELECT nom WHERE" ; "missing condition")]
    #[test_case("SELECT nom FROM AIOT extra tokens" ; "trailing input")]
    #[test_case("SELECT nom WHERE nom LIKE 'x" ; "unterminated string")]
    fn test_invalid(input: &str) {
        assert!(statement().parse(input).into_result().is_err());
    }

    #[test]
    fn test_format_errors() {
        let input = "SELECT nom\nFROM";
        let errs = statement().parse(input).into_result().unwrap_err();
        let message = format_errors(&errs, input);
        assert!(message.starts_with("Line 2"), "{message}");
    }
}
