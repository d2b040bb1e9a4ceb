use std::fmt::{Display, Formatter};

use log::trace;

use crate::error::GrammarError;
use crate::spacial::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    MoveTo,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CubicCurveTo,
    QuadraticCurveTo,
    SmoothCubicTo,
    SmoothQuadraticTo,
    ClosePath,
}

impl CommandKind {
    /// Returns the kind and whether the letter denotes relative coordinates.
    pub fn from_letter(letter: char) -> Option<(Self, bool)> {
        let kind = match letter.to_ascii_lowercase() {
            'm' => CommandKind::MoveTo,
            'l' => CommandKind::LineTo,
            'h' => CommandKind::HorizontalLineTo,
            'v' => CommandKind::VerticalLineTo,
            'c' => CommandKind::CubicCurveTo,
            'q' => CommandKind::QuadraticCurveTo,
            's' => CommandKind::SmoothCubicTo,
            't' => CommandKind::SmoothQuadraticTo,
            'z' => CommandKind::ClosePath,
            _ => return None,
        };
        Some((kind, letter.is_ascii_lowercase()))
    }

    pub fn letter(&self, relative: bool) -> char {
        let letter = match self {
            CommandKind::MoveTo => 'm',
            CommandKind::LineTo => 'l',
            CommandKind::HorizontalLineTo => 'h',
            CommandKind::VerticalLineTo => 'v',
            CommandKind::CubicCurveTo => 'c',
            CommandKind::QuadraticCurveTo => 'q',
            CommandKind::SmoothCubicTo => 's',
            CommandKind::SmoothQuadraticTo => 't',
            CommandKind::ClosePath => 'z',
        };
        match relative {
            true => letter,
            false => letter.to_ascii_uppercase(),
        }
    }

    /// Number of points making up one segment of this command.
    pub fn group_size(&self) -> usize {
        match self {
            CommandKind::ClosePath => 0,
            CommandKind::MoveTo
            | CommandKind::LineTo
            | CommandKind::HorizontalLineTo
            | CommandKind::VerticalLineTo
            | CommandKind::SmoothQuadraticTo => 1,
            CommandKind::QuadraticCurveTo | CommandKind::SmoothCubicTo => 2,
            CommandKind::CubicCurveTo => 3,
        }
    }

    fn is_scalar(&self) -> bool {
        matches!(self, CommandKind::HorizontalLineTo | CommandKind::VerticalLineTo)
    }
}

/// One command letter and its operands.
///
/// `H`/`V` operands are lifted into points with the missing axis set to 0.
/// Extra points on a move are implicit line-to segments.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    pub kind: CommandKind,
    pub relative: bool,
    pub points: Vec<Point>,
}

impl PathCommand {
    pub fn new(kind: CommandKind, relative: bool, points: Vec<Point>) -> Self {
        Self {
            kind,
            relative,
            points,
        }
    }

    pub fn letter(&self) -> char {
        self.kind.letter(self.relative)
    }

    /// Operands grouped per segment, e.g. three points per cubic segment.
    pub fn segments(&self) -> impl Iterator<Item = &[Point]> {
        self.points
            .chunks(self.kind.group_size().max(1))
    }
}

impl Display for PathCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())?;
        for point in &self.points {
            match self.kind {
                CommandKind::HorizontalLineTo => write!(f, " {}", point.x)?,
                CommandKind::VerticalLineTo => write!(f, " {}", point.y)?,
                _ => write!(f, " {},{}", point.x, point.y)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    Command { letter: char, offset: usize },
    Number(f64),
}

struct Lexer<'a> {
    text: &'a str,
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn skip_separators(&mut self) {
        while let Some(byte) = self.peek() {
            if byte.is_ascii_whitespace() || byte == b',' {
                self.position += 1;
            } else {
                break;
            }
        }
    }

    fn take_digits(&mut self) -> usize {
        let start = self.position;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.position += 1;
        }
        self.position - start
    }

    fn number(&mut self) -> Result<Token, GrammarError> {
        let start = self.position;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.position += 1;
        }
        let mut digits = self.take_digits();
        if self.peek() == Some(b'.') {
            self.position += 1;
            digits += self.take_digits();
        }
        let mut valid = digits > 0;
        if valid && matches!(self.peek(), Some(b'e' | b'E')) {
            self.position += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.position += 1;
            }
            valid = self.take_digits() > 0;
        }

        let token = &self.text[start..self.position];
        let malformed = || GrammarError::MalformedNumber {
            token: token.to_string(),
            offset: start,
        };
        if !valid {
            return Err(malformed());
        }
        token
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| malformed())
    }

    fn next_token(&mut self) -> Option<Result<Token, GrammarError>> {
        self.skip_separators();
        let offset = self.position;
        let byte = self.peek()?;

        let token = match byte {
            b'+' | b'-' | b'.' | b'0'..=b'9' => self.number(),
            _ => {
                let Some(letter) = self.text[offset..].chars().next() else {
                    return None;
                };
                self.position += letter.len_utf8();
                match letter {
                    'a' | 'A' => Err(GrammarError::UnsupportedCommand {
                        command: letter,
                        offset,
                    }),
                    _ if CommandKind::from_letter(letter).is_some() => Ok(Token::Command {
                        letter,
                        offset,
                    }),
                    _ => Err(GrammarError::UnknownCommand {
                        command: letter,
                        offset,
                    }),
                }
            }
        };
        Some(token)
    }
}

fn finish_command(letter: char, numbers: &[f64]) -> Result<PathCommand, GrammarError> {
    let Some((kind, relative)) = CommandKind::from_letter(letter) else {
        return Err(GrammarError::UnknownCommand {
            command: letter,
            offset: 0,
        });
    };

    let unbalanced = || GrammarError::UnbalancedArguments {
        command: letter,
        group: kind.group_size(),
        count: numbers.len(),
    };

    let points = if kind == CommandKind::ClosePath {
        if !numbers.is_empty() {
            return Err(unbalanced());
        }
        Vec::new()
    } else if kind.is_scalar() {
        if numbers.is_empty() {
            return Err(unbalanced());
        }
        numbers
            .iter()
            .map(|value| match kind {
                CommandKind::HorizontalLineTo => Point::new(*value, 0.0),
                _ => Point::new(0.0, *value),
            })
            .collect()
    } else {
        let numbers_per_segment = kind.group_size() * 2;
        if numbers.is_empty() || numbers.len() % numbers_per_segment != 0 {
            return Err(unbalanced());
        }
        numbers
            .chunks(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect()
    };

    Ok(PathCommand::new(kind, relative, points))
}

/// Parse path text into commands; any error aborts without a partial result.
pub fn parse(text: &str) -> Result<Vec<PathCommand>, GrammarError> {
    let mut lexer = Lexer::new(text);
    let mut commands: Vec<PathCommand> = Vec::new();
    let mut current: Option<char> = None;
    let mut numbers: Vec<f64> = Vec::new();

    while let Some(token) = lexer.next_token() {
        match token? {
            Token::Command {
                letter, ..
            } => {
                if let Some(previous) = current.take() {
                    commands.push(finish_command(previous, &numbers)?);
                    numbers.clear();
                } else if !matches!(letter, 'm' | 'M') {
                    return Err(GrammarError::MissingInitialMove {
                        found: letter.to_string(),
                    });
                }
                current = Some(letter);
            }
            Token::Number(value) => {
                if current.is_none() {
                    return Err(GrammarError::MissingInitialMove {
                        found: value.to_string(),
                    });
                }
                numbers.push(value);
            }
        }
    }

    match current {
        Some(letter) => commands.push(finish_command(letter, &numbers)?),
        None => return Err(GrammarError::Empty),
    }

    trace!("parsed {} path commands from '{}'", commands.len(), text);

    Ok(commands)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_parse_mixed_commands() {
        // when
        let commands = parse("M 10,20 l 5 -5 H 30 v 2 z").unwrap();

        // then
        assert_eq!(commands, vec![
            PathCommand::new(CommandKind::MoveTo, false, vec![Point::new(10.0, 20.0)]),
            PathCommand::new(CommandKind::LineTo, true, vec![Point::new(5.0, -5.0)]),
            PathCommand::new(CommandKind::HorizontalLineTo, false, vec![Point::new(30.0, 0.0)]),
            PathCommand::new(CommandKind::VerticalLineTo, true, vec![Point::new(0.0, 2.0)]),
            PathCommand::new(CommandKind::ClosePath, true, vec![]),
        ]);
    }

    #[test]
    fn test_parse_compact_numbers() {
        // when
        let commands = parse("m1-2.5.5-1e1,2E-1").unwrap();

        // then
        assert_eq!(commands[0].points, vec![
            Point::new(1.0, -2.5),
            Point::new(0.5, -10.0),
            Point::new(2.0, 0.2),
        ]);
    }

    #[test]
    fn test_parse_curve_groups() {
        // when
        let commands = parse("m0,0 c1,1 2,2 3,3 4,4 5,5 6,6 q 1 1 2 2 t 3 3 s 1 1 2 2").unwrap();

        // then
        assert_eq!(commands[1].segments().count(), 2);
        assert_eq!(commands[2].segments().count(), 1);
        assert_eq!(commands[3].segments().count(), 1);
        assert_eq!(commands[4].kind, CommandKind::SmoothCubicTo);
    }

    #[rstest]
    #[case("", GrammarError::Empty)]
    #[case("   ", GrammarError::Empty)]
    #[case("m 0 0 a 1 1 0 0 1 2 2", GrammarError::UnsupportedCommand { command: 'a', offset: 6 })]
    #[case("M 0 0 x 1", GrammarError::UnknownCommand { command: 'x', offset: 6 })]
    #[case("m 1e", GrammarError::MalformedNumber { token: "1e".to_string(), offset: 2 })]
    #[case("m - 1", GrammarError::MalformedNumber { token: "-".to_string(), offset: 2 })]
    #[case("m 1 2 3", GrammarError::UnbalancedArguments { command: 'm', group: 1, count: 3 })]
    #[case("m 0 0 c 1 2 3 4", GrammarError::UnbalancedArguments { command: 'c', group: 3, count: 4 })]
    #[case("m 0 0 z 1", GrammarError::UnbalancedArguments { command: 'z', group: 0, count: 1 })]
    #[case("m 0 0 h", GrammarError::UnbalancedArguments { command: 'h', group: 1, count: 0 })]
    #[case("l 1 1", GrammarError::MissingInitialMove { found: "l".to_string() })]
    #[case("3 4", GrammarError::MissingInitialMove { found: "3".to_string() })]
    fn test_parse_errors(#[case] text: &str, #[case] expected: GrammarError) {
        assert_eq!(parse(text), Err(expected));
    }

    #[test]
    fn test_display_round_trip() {
        // given
        let commands = parse("m 0.1,-2 h 3 V 4 c 1,1 2,2 3,3 z").unwrap();

        // when
        let text = commands
            .iter()
            .map(|command| command.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        // then
        assert_eq!(text, "m 0.1,-2 h 3 V 4 c 1,1 2,2 3,3 z");
        assert_eq!(parse(&text).unwrap(), commands);
    }
}
