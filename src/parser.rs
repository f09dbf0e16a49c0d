//! This module provides the parser for program statements, utilizing the `pest` crate.
//! It defines the grammar for a single statement line and functions to turn user input
//! into `Transition`s and whole `Program`s.

use crate::{
    program::Program,
    types::{Action, Slot, Transition, TuringMachineError},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Position, Span,
};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the statement grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct StatementParser;

/// Parses a single statement line into a `Transition`.
///
/// The line must look like `Q0 1 : Q1 X L`: exactly one colon, two tokens before it,
/// and three after it, the last of which is `L`, `R` or `H`. State and symbol names are
/// otherwise free-form.
///
/// # Arguments
///
/// * `line` - The raw text of one program row.
///
/// # Returns
///
/// * `Ok(Transition)` with the five parts taken verbatim from the line.
/// * `Err(TuringMachineError::ParseError)` if the line is malformed.
pub fn parse(line: &str) -> Result<Transition, TuringMachineError> {
    let root = parse_statement(line).map_err(TuringMachineError::ParseError)?;
    parse_transition(root).map_err(TuringMachineError::ParseError)
}

/// Parses a multi-line program text into a `Program`.
///
/// Every line becomes one row. Lines holding only whitespace become empty rows, so the
/// row numbers of a program match the line numbers of its text.
///
/// # Returns
///
/// * `Ok(Program)` if every non-blank line is a valid statement.
/// * `Err(TuringMachineError::InvalidLine)` for the first malformed line (1-based).
pub fn parse_program(text: &str) -> Result<Program, TuringMachineError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if line.trim().is_empty() {
                return Ok(Slot::Empty);
            }

            parse_statement(line)
                .and_then(parse_transition)
                .map(Slot::Filled)
                .map_err(|source| TuringMachineError::InvalidLine { line: i + 1, source })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Program::from)
}

/// Runs the grammar over one line and returns the `statement` pair.
fn parse_statement(line: &str) -> Result<Pair<'_, Rule>, Box<Error<Rule>>> {
    StatementParser::parse(Rule::statement, line)?
        .next()
        .ok_or_else(|| {
            Box::new(Error::new_from_pos(
                ErrorVariant::CustomError {
                    message: "Empty statement".to_string(),
                },
                Position::from_start(line),
            ))
        })
}

/// Builds a `Transition` from a `Pair<Rule::statement>`.
fn parse_transition(pair: Pair<Rule>) -> Result<Transition, Box<Error<Rule>>> {
    let span = pair.as_span();
    let mut symbols = Vec::with_capacity(4);
    let mut action = None;

    // Rule: statement > condition > [symbol, symbol]
    //                 > effect > [symbol, symbol, action]
    for p in pair.into_inner().flat_map(|p| p.into_inner()) {
        match p.as_rule() {
            Rule::symbol => symbols.push(p.as_str().to_string()),
            Rule::action => action = Some(parse_action(p)?),
            _ => {}
        }
    }

    match (<[String; 4]>::try_from(symbols), action) {
        (Ok([current_state, input, next_state, output]), Some(action)) => Ok(Transition {
            current_state,
            input,
            next_state,
            output,
            action,
        }),
        _ => Err(Box::new(custom_error("Incomplete statement", span))),
    }
}

/// Parses an action letter from a `Pair<Rule::action>`.
fn parse_action(pair: Pair<Rule>) -> Result<Action, Box<Error<Rule>>> {
    let span = pair.as_span();
    Action::from_letter(pair.as_str()).ok_or_else(|| {
        Box::new(custom_error(
            &format!("Unsupported action: {}", pair.as_str()),
            span,
        ))
    })
}

/// Creates a pest custom error from a message and a `Span`.
fn custom_error(msg: &str, span: Span) -> Error<Rule> {
    Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_simple_statement() {
        let transition = parse("Q0 1 : Q1 X L").unwrap();

        assert_eq!(transition.current_state, "Q0");
        assert_eq!(transition.input, "1");
        assert_eq!(transition.next_state, "Q1");
        assert_eq!(transition.output, "X");
        assert_eq!(transition.action, Action::Left);
    }

    #[test]
    fn test_parse_without_spaces_around_colon() {
        assert_eq!(
            parse("Q0 1:Q1 X L").unwrap(),
            Transition::new("Q0", "1", "Q1", "X", Action::Left)
        );
    }

    #[test]
    fn test_parse_surrounding_and_repeated_whitespace() {
        assert_eq!(
            parse("  Q2\t1 :   Q2  1 H  ").unwrap(),
            Transition::new("Q2", "1", "Q2", "1", Action::Halt)
        );
    }

    #[test]
    fn test_parse_tabs_and_double_spaces_separate_tokens() {
        let expected = Transition::new("Q0", "1", "Q1", "X", Action::Left);

        assert_eq!(parse("Q0  1 : Q1 X L").unwrap(), expected);
        assert_eq!(parse("Q0 1 : Q1  X  L").unwrap(), expected);
        assert_eq!(parse("Q0\t1 : Q1\tX\tL").unwrap(), expected);
        assert_eq!(parse("Q0\t1:Q1 \t X\t\tL").unwrap(), expected);

        // A tab never ends up inside a token.
        let program = parse_program("Q0\t1 : Q1\tX\tL").unwrap();
        assert_eq!(program.lines(), vec!["Q0 1 : Q1 X L"]);
    }

    #[test]
    fn test_parse_multi_character_tokens() {
        let transition = parse("start blank : scan-right mark R").unwrap();
        assert_eq!(transition.current_state, "start");
        assert_eq!(transition.input, "blank");
        assert_eq!(transition.next_state, "scan-right");
        assert_eq!(transition.output, "mark");
        assert_eq!(transition.action, Action::Right);
    }

    #[test]
    fn test_parse_letters_as_symbols() {
        // Action letters are ordinary tokens outside the action position.
        assert_eq!(
            parse("L H : R L H").unwrap(),
            Transition::new("L", "H", "R", "L", Action::Halt)
        );
    }

    #[test]
    fn test_parse_missing_colon() {
        let result = parse("Q0 1 Q1 X L");
        assert!(matches!(result, Err(TuringMachineError::ParseError(_))));
    }

    #[test]
    fn test_parse_extra_colon() {
        assert!(parse("Q0 1 : Q1 X : L").is_err());
        assert!(parse("Q0 1 :: Q1 X L").is_err());
        assert!(parse("Q0 1 : Q1 X L :").is_err());
    }

    #[test]
    fn test_parse_wrong_condition_count() {
        assert!(parse("Q0 : Q1 X L").is_err());
        assert!(parse("Q0 1 2 : Q1 X L").is_err());
        assert!(parse(" : Q1 X L").is_err());
    }

    #[test]
    fn test_parse_wrong_effect_count() {
        assert!(parse("Q0 1 : Q1 L").is_err());
        assert!(parse("Q0 1 : Q1 X Y L").is_err());
        assert!(parse("Q0 1 :").is_err());
    }

    #[test]
    fn test_parse_invalid_action() {
        assert!(parse("Q0 1 : Q1 X S").is_err());
        assert!(parse("Q0 1 : Q1 X l").is_err());
        assert!(parse("Q0 1 : Q1 X LR").is_err());
        assert!(parse("Q0 1 : Q1 X Left").is_err());
    }

    #[test]
    fn test_parse_empty_line() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
    }

    #[test]
    fn test_parse_error_message() {
        let error = parse("Q0 1 : Q1 X Z").unwrap_err();
        assert!(error.to_string().starts_with("Statement parsing error"));
    }

    #[test]
    fn test_parse_program_with_blank_rows() {
        let program = parse_program("Q0 1 : Q1 X L\n\nQ1 b : Q0 Y R\n   \n").unwrap();

        assert_eq!(program.len(), 4);
        assert_eq!(
            program.get(0).and_then(Slot::transition),
            Some(&Transition::new("Q0", "1", "Q1", "X", Action::Left))
        );
        assert_eq!(program.get(1), Some(&Slot::Empty));
        assert_eq!(
            program.get(2).and_then(Slot::transition).map(|t| t.action),
            Some(Action::Right)
        );
        assert_eq!(program.get(3), Some(&Slot::Empty));
    }

    #[test]
    fn test_parse_program_reports_line() {
        let error = parse_program("Q0 1 : Q1 X L\nQ0 X : Q0 X R\nQ0 Y Q0 Y R").unwrap_err();

        match error {
            TuringMachineError::InvalidLine { line, .. } => assert_eq!(line, 3),
            other => panic!("Expected an InvalidLine error, but got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_program() {
        let program = parse_program("").unwrap();
        assert!(program.is_empty());
    }

    proptest! {
        /// Property: any well-formed statement parses to its five tokens verbatim
        #[test]
        fn prop_well_formed_statement_parses(
            state in "[A-Za-z0-9_]{1,6}",
            input in "[A-Za-z0-9#*]{1,3}",
            next in "[A-Za-z0-9_]{1,6}",
            output in "[A-Za-z0-9#*]{1,3}",
            action in prop_oneof![Just(Action::Left), Just(Action::Right), Just(Action::Halt)],
        ) {
            let line = format!("{state} {input} : {next} {output} {action}");
            let transition = parse(&line).unwrap();

            prop_assert_eq!(&transition.current_state, &state);
            prop_assert_eq!(&transition.input, &input);
            prop_assert_eq!(&transition.next_state, &next);
            prop_assert_eq!(&transition.output, &output);
            prop_assert_eq!(transition.action, action);
            prop_assert_eq!(transition.to_string(), line);
        }

        /// Property: an action letter outside L, R and H is always rejected
        #[test]
        fn prop_unknown_action_rejected(action in "[A-GI-KM-QS-Z]") {
            let line = format!("Q0 1 : Q1 X {action}");
            prop_assert!(parse(&line).is_err());
        }

        /// Property: statements without a colon are always rejected
        #[test]
        fn prop_missing_colon_rejected(line in "[A-Za-z0-9 ]{0,20}") {
            prop_assert!(parse(&line).is_err());
        }
    }
}
