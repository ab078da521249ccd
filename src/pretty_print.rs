use crate::{Error, EvalError, ParseError};
use ariadne::{Label, Report, ReportKind, Source};

impl Error {
    pub fn pretty_print(&self, input: &str) {
        match self {
            Error::Syntax(parse_error) => parse_error.pretty_print(input),
            Error::Eval(eval_error) => eval_error.pretty_print(input),
        }
    }
}

impl EvalError {
    pub fn pretty_print(&self, input: &str) {
        // Spans do not survive into the expression tree, so the report
        // labels the whole input.
        let range = 0..input.len();
        let report = Report::build(ReportKind::Error, ("REPL", range.clone()))
            .with_message("Evaluation Error")
            .with_label(Label::new(("REPL", range)).with_message(self.to_string()));
        report.finish().print(("REPL", Source::from(input))).ok();
    }
}

impl ParseError {
    pub fn pretty_print(&self, input: &str) {
        let report = match self {
            ParseError::UnexpectedToken { found, expected } => {
                Report::build(ReportKind::Error, ("REPL", found.span.to_range()))
                    .with_message(format!("Unexpected token: {}", found.kind))
                    .with_label(
                        Label::new(("REPL", found.span.to_range()))
                            .with_message(format!("Expected {expected}")),
                    )
            }
            ParseError::UnexpectedEof(expected) => {
                let idx = input.len();
                Report::build(ReportKind::Error, ("REPL", idx..idx))
                    .with_message("Unexpected EOF")
                    .with_label(Label::new(("REPL", idx..idx)).with_message(expected))
            }
            ParseError::LexerError(lex_err) => {
                Report::build(ReportKind::Error, ("REPL", lex_err.span.to_range()))
                    .with_message("Lexer Error")
                    .with_label(
                        Label::new(("REPL", lex_err.span.to_range()))
                            .with_message(lex_err.error.to_string()),
                    )
            }
            ParseError::InvalidDotSyntax(span) => {
                Report::build(ReportKind::Error, ("REPL", span.to_range()))
                    .with_message("Invalid Dot Syntax")
                    .with_label(Label::new(("REPL", span.to_range())).with_message(
                        "A dot may only sit between the last two elements of a list",
                    ))
            }
            ParseError::DanglingQuote => {
                let idx = input.len();
                Report::build(ReportKind::Error, ("REPL", idx..idx))
                    .with_message("Dangling Quote")
                    .with_label(
                        Label::new(("REPL", idx..idx))
                            .with_message("This quote has no expression to quote"),
                    )
            }
        };
        report.finish().print(("REPL", Source::from(input))).ok();
    }
}
