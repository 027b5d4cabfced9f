//! Text command parsing.
//!
//! A command line is lower-cased, split into whitespace-separated tokens and
//! handed to an ordered list of grammar rules. The first rule that recognises
//! the line decides its [`Intent`]; later rules are never consulted.

use chrono::NaiveDate;

use crate::domain::{parse_amount, Amount, Participant};

/// The classified meaning of a text command.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    AddExpense(ExpenseDraft),
    ShowBalances,
    ShowSummary,
    Help,
    Clear,
    Unknown,
}

/// An expense as written in a command, not yet recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub paid_by: Participant,
    pub amount: Amount,
    pub description: String,
    /// `None` when the command has no `split` clause
    pub split_among: Option<Vec<Participant>>,
    pub date: DateClause,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DateClause {
    Unspecified,
    Date(NaiveDate),
    /// An `on ...` clause that is not a `YYYY-MM-DD` date; recorded as today
    Malformed(String),
}

impl DateClause {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateClause::Date(date) => Some(*date),
            DateClause::Unspecified | DateClause::Malformed(_) => None,
        }
    }
}

type Rule = fn(&Command<'_>) -> Option<Intent>;

/// Grammar rules in priority order.
const RULES: &[Rule] = &[
    add_expense_rule,
    show_balances_rule,
    show_summary_rule,
    help_rule,
    clear_rule,
];

const SPLIT_KEYWORDS: &[&str] = &["between", "among", "with"];

/// Classify one line of free text.
pub fn classify(line: &str) -> Intent {
    let text = line.to_lowercase();
    let command = Command::new(&text);
    RULES
        .iter()
        .find_map(|rule| rule(&command))
        .unwrap_or(Intent::Unknown)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    text: &'a str,
    start: usize,
    end: usize,
}

/// Split on whitespace, keeping byte offsets so clauses can be sliced
/// out of the line with their inner spacing intact.
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (index, ch) in text.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(from)) => {
                tokens.push(Token {
                    text: &text[from..index],
                    start: from,
                    end: index,
                });
                start = None;
            }
            (false, None) => start = Some(index),
            _ => {}
        }
    }
    if let Some(from) = start {
        tokens.push(Token {
            text: &text[from..],
            start: from,
            end: text.len(),
        });
    }

    tokens
}

struct Command<'a> {
    text: &'a str,
    tokens: Vec<Token<'a>>,
}

impl<'a> Command<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            tokens: tokenize(text),
        }
    }

    fn contains_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|phrase| self.text.contains(phrase))
    }

    /// Text covered by a non-empty run of tokens.
    fn span(&self, tokens: &[Token<'a>]) -> &'a str {
        match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => &self.text[first.start..last.end],
            _ => "",
        }
    }
}

/// `<payer> paid <amount> for <description> [split (between|among|with) <names>] [on <date>]`
fn add_expense_rule(command: &Command<'_>) -> Option<Intent> {
    let tokens = &command.tokens;

    for index in 1..tokens.len() {
        if tokens[index].text != "paid" {
            continue;
        }
        let payer = match Participant::new(trailing_word(tokens[index - 1].text)) {
            Some(payer) => payer,
            None => continue,
        };
        let amount = match tokens.get(index + 1).map(|t| parse_amount(t.text)) {
            Some(Ok(amount)) => amount,
            _ => continue,
        };
        if tokens.get(index + 2).map(|t| t.text) != Some("for") {
            continue;
        }
        let rest = &tokens[(index + 3).min(tokens.len())..];
        if rest.is_empty() {
            continue;
        }

        // The description is as short as possible while the remainder still
        // reads as optional split and date clauses.
        let (description, tail) = (1..=rest.len())
            .find_map(|cut| {
                parse_tail(command, &rest[cut..]).map(|tail| (command.span(&rest[..cut]), tail))
            })?;

        let split_among = tail.names.map(|names| {
            let mut group: Vec<Participant> = split_names(names)
                .into_iter()
                .filter_map(Participant::new)
                .collect();
            if !group.contains(&payer) {
                group.push(payer.clone());
            }
            group
        });

        let date = match tail.date {
            None => DateClause::Unspecified,
            Some(raw) => match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
                Ok(date) => DateClause::Date(date),
                Err(_) => DateClause::Malformed(raw.trim().to_string()),
            },
        };

        return Some(Intent::AddExpense(ExpenseDraft {
            paid_by: payer,
            amount,
            description: description.trim().to_string(),
            split_among,
            date,
        }));
    }

    None
}

struct Tail<'a> {
    names: Option<&'a str>,
    date: Option<&'a str>,
}

/// Match what follows the description: nothing, a split clause, a date clause,
/// or a split clause followed by a date clause.
fn parse_tail<'a>(command: &Command<'a>, tokens: &[Token<'a>]) -> Option<Tail<'a>> {
    match tokens.first().map(|t| t.text) {
        None => Some(Tail {
            names: None,
            date: None,
        }),
        Some("split") => {
            let keyword = tokens.get(1)?;
            if tokens.len() < 3 || !SPLIT_KEYWORDS.iter().any(|k| *k == keyword.text) {
                return None;
            }
            // Names stop at the first `on` that is followed by something
            let end = (3..tokens.len())
                .find(|&i| tokens[i].text == "on" && i + 1 < tokens.len())
                .unwrap_or(tokens.len());
            Some(Tail {
                names: Some(command.span(&tokens[2..end])),
                date: date_clause(command, &tokens[end..]),
            })
        }
        Some("on") if tokens.len() >= 2 => Some(Tail {
            names: None,
            date: date_clause(command, tokens),
        }),
        Some(_) => None,
    }
}

fn date_clause<'a>(command: &Command<'a>, tokens: &[Token<'a>]) -> Option<&'a str> {
    if tokens.len() < 2 {
        return None;
    }
    Some(command.span(&tokens[1..]))
}

/// Split a name list on commas and on the word "and".
/// "a and b", "a, b" and "a, b, and c" all produce plain names.
fn split_names(names: &str) -> Vec<&str> {
    let mut result = Vec::new();

    for piece in names.split(',') {
        let tokens = tokenize(piece);
        for group in tokens.split(|t| t.text == "and") {
            if let (Some(first), Some(last)) = (group.first(), group.last()) {
                result.push(&piece[first.start..last.end]);
            }
        }
    }

    result
}

/// Trailing run of word characters, e.g. "mr.john" -> "john".
fn trailing_word(token: &str) -> &str {
    let start = token
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
        .last()
        .map(|(index, _)| index)
        .unwrap_or(token.len());
    &token[start..]
}

fn show_balances_rule(command: &Command<'_>) -> Option<Intent> {
    command
        .contains_any(&["balance", "who owes", "owes who"])
        .then_some(Intent::ShowBalances)
}

fn show_summary_rule(command: &Command<'_>) -> Option<Intent> {
    command
        .contains_any(&["summary", "list expenses"])
        .then_some(Intent::ShowSummary)
}

fn help_rule(command: &Command<'_>) -> Option<Intent> {
    command.contains_any(&["help"]).then_some(Intent::Help)
}

fn clear_rule(command: &Command<'_>) -> Option<Intent> {
    command
        .contains_any(&["clear", "reset"])
        .then_some(Intent::Clear)
}
