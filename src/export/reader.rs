use log::debug;
use num_rational::BigRational;

use crate::contraction::IndexSpaces;
use crate::error::ParseError;
use crate::export::decimal::parse_decimal;
use crate::export::lexer::{tokenize, Token};
use crate::export::record::{
    RawArc, RawContraction, RawExternalIndex, RawFactor, RawInternalIndex, RawOperator,
};
use crate::types::Space;

const CONTRACTION_STRING_COLUMNS: usize = 6;
const RESULT_STRING_COLUMNS: usize = 5;

/// Reads all contraction records of an export.
///
/// The export is a sequence of `[CONTR]` records terminated by `[END]`. Records
/// are returned in file order.
///
/// # Examples
/// ```
/// # use gecco_notation::export::read_export;
/// let records = read_export("[END]").unwrap();
/// assert!(records.is_empty());
/// ```
pub fn read_export(content: &str) -> Result<Vec<RawContraction>, ParseError> {
    let mut reader = Reader::new(content);
    let mut records = Vec::new();

    loop {
        let token = reader.peek("[CONTR] or [END]")?;
        match token.text {
            "[END]" => {
                reader.next("[END]")?;
                break;
            }
            "[CONTR]" => records.push(reader.contraction()?),
            _ => return Err(reader.unexpected(token, "[CONTR] or [END]")),
        }
    }

    if let Some(trailing) = reader.tokens.get(reader.pos) {
        return Err(reader.unexpected(*trailing, "end of input after [END]"));
    }

    debug!(records = records.len(); "Read contraction export");
    Ok(records)
}

/// Cursor over the tokens of an export.
struct Reader<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            tokens: tokenize(content),
            pos: 0,
        }
    }

    /// Line used for errors at the end of input.
    fn last_line(&self) -> usize {
        self.tokens.last().map_or(1, |token| token.line)
    }

    fn unexpected(&self, token: Token<'_>, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            line: token.line,
            expected,
            found: token.text.to_owned(),
        }
    }

    fn peek(&self, expected: &'static str) -> Result<Token<'a>, ParseError> {
        self.tokens
            .get(self.pos)
            .copied()
            .ok_or(ParseError::UnexpectedEnd {
                line: self.last_line(),
                expected,
            })
    }

    fn next(&mut self, expected: &'static str) -> Result<Token<'a>, ParseError> {
        let token = self.peek(expected)?;
        self.pos += 1;
        Ok(token)
    }

    /// Returns `true` if the next token exists and is not a section tag.
    fn at_field(&self) -> bool {
        self.tokens.get(self.pos).is_some_and(|token| !token.is_tag())
    }

    fn expect_tag(&mut self, tag: &'static str) -> Result<(), ParseError> {
        let token = self.next(tag)?;
        if token.text == tag {
            Ok(())
        } else {
            Err(self.unexpected(token, tag))
        }
    }

    fn integer(&mut self) -> Result<i64, ParseError> {
        let token = self.next("an integer")?;
        if token.is_tag() {
            return Err(self.unexpected(token, "an integer"));
        }
        parse_integer(token)
    }

    fn decimal(&mut self) -> Result<BigRational, ParseError> {
        let token = self.next("a decimal number")?;
        parse_decimal(token.text).ok_or_else(|| ParseError::InvalidNumber {
            line: token.line,
            found: token.text.to_owned(),
        })
    }

    fn flag(&mut self) -> Result<bool, ParseError> {
        let token = self.next("flag T or F")?;
        parse_flag(token)
    }

    /// Reads one or more adjacent space-group tokens.
    fn space_groups(&mut self) -> Result<Vec<IndexSpaces>, ParseError> {
        let first = self.next("space groups")?;
        if !first.is_space_group() {
            return Err(self.unexpected(first, "space groups"));
        }
        let mut groups = parse_space_groups(first)?;
        while let Some(token) = self.tokens.get(self.pos).filter(|t| t.is_space_group()) {
            groups.extend(parse_space_groups(*token)?);
            self.pos += 1;
        }
        Ok(groups)
    }

    fn operator(&mut self) -> Result<RawOperator, ParseError> {
        let name = self.next("an operator name")?;
        if name.is_tag() || name.is_space_group() {
            return Err(self.unexpected(name, "an operator name"));
        }
        let transposed = self.flag()?;
        let slots = self.space_groups()?;
        Ok(RawOperator {
            name: name.text.to_owned(),
            transposed,
            slots,
        })
    }

    fn arc(&mut self) -> Result<RawArc, ParseError> {
        let first_vertex = self.integer()?;
        let second_vertex = self.integer()?;
        let spaces = self.space_groups()?;
        Ok(RawArc {
            first_vertex,
            second_vertex,
            spaces,
        })
    }

    /// Collects all tokens up to the next section tag.
    fn section_fields(&mut self) -> Vec<Token<'a>> {
        let start = self.pos;
        while self.at_field() {
            self.pos += 1;
        }
        self.tokens[start..self.pos].to_vec()
    }

    fn contraction_id(&mut self) -> Result<i64, ParseError> {
        let token = self.next("#")?;
        match token.text.strip_prefix('#') {
            Some("") => self.integer(),
            Some(number) => parse_integer(Token {
                text: number,
                line: token.line,
            }),
            None => Err(self.unexpected(token, "#")),
        }
    }

    fn contraction(&mut self) -> Result<RawContraction, ParseError> {
        self.expect_tag("[CONTR]")?;
        let id = self.contraction_id()?;

        self.expect_tag("[RESULT]")?;
        let result = self.operator()?;

        self.expect_tag("[FACTOR]")?;
        let factor = RawFactor {
            external: self.decimal()?,
            sign: self.decimal()?,
            magnitude: self.decimal()?,
        };

        self.expect_tag("[#VERTICES]")?;
        let num_vertices = self.integer()?;
        let num_operators = self.integer()?;

        self.expect_tag("[SVERTEX]")?;
        let super_vertex_association = self
            .section_fields()
            .into_iter()
            .map(parse_integer)
            .collect::<Result<Vec<_>, _>>()?;

        self.expect_tag("[#ARCS]")?;
        let num_arcs = self.integer()?;
        let num_external_arcs = self.integer()?;

        self.expect_tag("[VERTICES]")?;
        let mut vertices = Vec::new();
        while self.at_field() {
            vertices.push(self.operator()?);
        }

        self.expect_tag("[ARCS]")?;
        let mut arcs = Vec::new();
        while self.at_field() {
            arcs.push(self.arc()?);
        }

        self.expect_tag("[XARCS]")?;
        let mut external_arcs = Vec::new();
        while self.at_field() {
            external_arcs.push(self.arc()?);
        }

        self.expect_tag("[CONTR_STRING]")?;
        let contraction_string = contraction_string(&self.section_fields(), self.last_line())?;

        self.expect_tag("[RESULT_STRING]")?;
        let result_string = result_string(&self.section_fields(), self.last_line())?;

        debug!(id, vertices = vertices.len(), arcs = arcs.len(); "Read contraction record");
        Ok(RawContraction {
            id,
            result,
            factor,
            num_vertices,
            num_operators,
            super_vertex_association,
            num_arcs,
            num_external_arcs,
            vertices,
            arcs,
            external_arcs,
            contraction_string,
            result_string,
        })
    }
}

fn parse_integer(token: Token<'_>) -> Result<i64, ParseError> {
    token.text.parse().map_err(|_| ParseError::InvalidInteger {
        line: token.line,
        found: token.text.to_owned(),
    })
}

fn parse_flag(token: Token<'_>) -> Result<bool, ParseError> {
    match token.text {
        "T" => Ok(true),
        "F" => Ok(false),
        _ => Err(ParseError::InvalidFlag {
            line: token.line,
            found: token.text.to_owned(),
        }),
    }
}

/// Parses a token such as `(HH,PP)`, `(,V)` or `(HP,PH)(V,V)`.
fn parse_space_groups(token: Token<'_>) -> Result<Vec<IndexSpaces>, ParseError> {
    let malformed = || ParseError::MalformedSpaceGroups {
        line: token.line,
        found: token.text.to_owned(),
    };
    let letters = |run: &str| {
        run.chars()
            .map(|letter| {
                Space::from_letter(letter).ok_or(ParseError::UnknownSpace {
                    line: token.line,
                    letter,
                })
            })
            .collect::<Result<Vec<_>, _>>()
    };

    let mut groups = Vec::new();
    let mut rest = token.text;
    while !rest.is_empty() {
        let (body, tail) = rest
            .strip_prefix('(')
            .and_then(|inner| inner.split_once(')'))
            .ok_or_else(malformed)?;
        let (creators, annihilators) = body.split_once(',').ok_or_else(malformed)?;
        groups.push(IndexSpaces::new(letters(creators)?, letters(annihilators)?));
        rest = tail;
    }
    Ok(groups)
}

/// Regroups a column-major section into rows of `columns` fields.
fn column_major<'a>(
    fields: &[Token<'a>],
    columns: usize,
    section: &'static str,
    fallback_line: usize,
) -> Result<Vec<Vec<Token<'a>>>, ParseError> {
    if fields.len() % columns != 0 {
        return Err(ParseError::ColumnCount {
            line: fields.first().map_or(fallback_line, |token| token.line),
            section,
            columns,
            len: fields.len(),
        });
    }
    let n = fields.len() / columns;
    Ok((0..n)
        .map(|row| (0..columns).map(|column| fields[row + column * n]).collect())
        .collect())
}

fn contraction_string(
    fields: &[Token<'_>],
    fallback_line: usize,
) -> Result<Vec<RawInternalIndex>, ParseError> {
    column_major(
        fields,
        CONTRACTION_STRING_COLUMNS,
        "[CONTR_STRING]",
        fallback_line,
    )?
    .into_iter()
    .map(|row| {
        Ok(RawInternalIndex {
            vertex: parse_integer(row[0])?,
            index_type: parse_integer(row[1])?,
            space: parse_integer(row[2])?,
            external: parse_flag(row[3])?,
            arc: parse_integer(row[4])?,
            id: parse_integer(row[5])?,
        })
    })
    .collect()
}

fn result_string(
    fields: &[Token<'_>],
    fallback_line: usize,
) -> Result<Vec<RawExternalIndex>, ParseError> {
    column_major(fields, RESULT_STRING_COLUMNS, "[RESULT_STRING]", fallback_line)?
        .into_iter()
        .map(|row| {
            Ok(RawExternalIndex {
                vertex: parse_integer(row[0])?,
                index_type: parse_integer(row[1])?,
                space: parse_integer(row[2])?,
                vertex_duplicate: parse_integer(row[3])?,
                id: parse_integer(row[4])?,
            })
        })
        .collect()
}
