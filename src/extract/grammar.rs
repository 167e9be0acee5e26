//! Grammar of one class entry.
//!
//! An entry reads, left to right:
//!
//! ```text
//! Title. [Lecturer] Type. [(Subgroup).] Classroom. [dates]
//! ```
//!
//! e.g. `Матанализ. Иванов И.И. Лекция. (А). 101Л. [02.09-23.12 к.н.]`.
//!
//! Each field has its own small parser working on the unconsumed suffix.
//! Title and lecturer are lazy: the title is the shortest dot-terminated
//! prefix for which the rest of the entry parses, and the lecturer is the
//! shortest run in front of a type keyword. When no split parses, the error
//! of the attempt that got furthest is reported.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::date::DateResolver;
use crate::model::{DateError, DateModel, PairType, Subgroup};

static SUBGROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\((\S)\)\.").expect("valid subgroup regex"));

/// Type keywords, lowercase, without the terminating dot.
const TYPE_KEYWORDS: [(&str, PairType); 5] = [
    ("лабораторные занятия", PairType::Laboratory),
    ("лабораторная", PairType::Laboratory),
    ("семинар", PairType::Seminar),
    ("лекции", PairType::Lecture),
    ("лекция", PairType::Lecture),
];

/// Why an entry failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("Pair not found: '{0}'")]
    NotMatched(String),

    #[error("Date block not found: '{0}'")]
    MissingDates(String),

    #[error("Unknown type: '{0}'")]
    UnknownType(String),

    #[error("Unknown subgroup: '{0}'")]
    UnknownSubgroup(String),

    #[error("Invalid classroom: '{0}'")]
    InvalidClassroom(String),

    #[error(transparent)]
    Date(#[from] DateError),
}

/// Fields of an entry, before slot times are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFields {
    pub title: String,
    pub lecturer: String,
    pub pair_type: PairType,
    pub subgroup: Subgroup,
    pub classroom: String,
    pub date: DateModel,
}

/// Structural fields, parsed before the date block is resolved.
#[derive(Debug)]
struct Head {
    title: String,
    lecturer: String,
    pair_type: PairType,
    subgroup: Subgroup,
    classroom: String,
}

/// How far an attempt got. Later stages rank higher when reporting errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Type,
    Subgroup,
    Classroom,
}

/// Parse one trimmed entry.
pub fn parse_entry(entry: &str, dates: &DateResolver) -> Result<EntryFields, EntryError> {
    let (head, block) = split_date_block(entry)?;
    let parsed = parse_head(entry, head)?;
    let date = dates.resolve_block(block)?;

    Ok(EntryFields {
        title: parsed.title,
        lecturer: parsed.lecturer,
        pair_type: parsed.pair_type,
        subgroup: parsed.subgroup,
        classroom: parsed.classroom,
        date,
    })
}

/// Split at the last `[`: the entry head and its date block.
fn split_date_block(entry: &str) -> Result<(&str, &str), EntryError> {
    let missing = || EntryError::MissingDates(entry.to_string());
    let open = entry.rfind('[').ok_or_else(missing)?;
    let block = &entry[open..];
    if !block.ends_with(']') {
        return Err(missing());
    }
    Ok((&entry[..open], block))
}

fn parse_head(entry: &str, head: &str) -> Result<Head, EntryError> {
    let mut best: Option<(Stage, EntryError)> = None;

    for title_end in title_ends(head) {
        let title = strip_dot(&head[..title_end]);
        if title.is_empty() {
            continue;
        }

        match parse_after_title(head, title_end) {
            Ok((lecturer, pair_type, subgroup, classroom)) => {
                return Ok(Head {
                    title,
                    lecturer,
                    pair_type,
                    subgroup,
                    classroom,
                });
            }
            Err((stage, err)) => {
                if best.as_ref().map_or(true, |(best_stage, _)| stage > *best_stage) {
                    best = Some((stage, err));
                }
            }
        }
    }

    Err(match best {
        Some((Stage::Type, _)) | None => diagnose_type(entry, head),
        Some((_, err)) => err,
    })
}

type AfterTitle = (String, PairType, Subgroup, String);

/// Parse lecturer, type, subgroup and classroom after a title ending at
/// byte offset `title_end` of `head`.
fn parse_after_title(head: &str, title_end: usize) -> Result<AfterTitle, (Stage, EntryError)> {
    let rest_start = skip_whitespace(head, title_end);
    let rest = &head[rest_start..];

    let mut best: Option<(Stage, EntryError)> = None;
    for (at, pair_type, type_len) in type_positions(head, rest_start) {
        let lecturer_text = &rest[..at];
        if !lecturer_text.chars().all(is_lecturer_char) {
            continue;
        }

        let after_type = rest_start + at + type_len;
        match parse_tail(head, after_type) {
            Ok((subgroup, classroom)) => {
                return Ok((strip_dot(lecturer_text), pair_type, subgroup, classroom));
            }
            Err((stage, err)) => {
                if best.as_ref().map_or(true, |(best_stage, _)| stage > *best_stage) {
                    best = Some((stage, err));
                }
            }
        }
    }

    Err(best.unwrap_or((Stage::Type, EntryError::NotMatched(head.to_string()))))
}

/// Parse the optional subgroup and the classroom after the type.
fn parse_tail(head: &str, after_type: usize) -> Result<(Subgroup, String), (Stage, EntryError)> {
    let rest = &head[skip_whitespace(head, after_type)..];

    let (subgroup, rest) = match SUBGROUP.captures(rest) {
        Some(caps) => {
            let token = caps.get(0).map_or("", |m| m.as_str());
            let subgroup = parse_subgroup(&caps[1])
                .ok_or_else(|| (Stage::Subgroup, EntryError::UnknownSubgroup(token.to_string())))?;
            (subgroup, &rest[token.len()..])
        }
        None => (Subgroup::Common, rest),
    };

    let classroom = rest.trim();
    if classroom.is_empty()
        || !classroom.ends_with('.')
        || classroom.contains(['[', ']'])
    {
        return Err((
            Stage::Classroom,
            EntryError::InvalidClassroom(classroom.to_string()),
        ));
    }

    Ok((subgroup, strip_dot(classroom)))
}

fn parse_subgroup(letter: &str) -> Option<Subgroup> {
    match letter {
        "А" | "а" | "A" | "a" => Some(Subgroup::A),
        "Б" | "б" | "B" | "b" => Some(Subgroup::B),
        _ => None,
    }
}

/// Byte offsets just past each `.` that can end a title, shortest first.
///
/// Stops at the first character a title cannot contain.
fn title_ends(head: &str) -> Vec<usize> {
    let mut ends = Vec::new();
    for (idx, ch) in head.char_indices() {
        if !is_title_char(ch) {
            break;
        }
        if ch == '.' && idx > 0 {
            ends.push(idx + 1);
        }
    }
    ends
}

/// Candidate type positions in `head[rest_start..]`, as
/// `(offset into the rest, type, consumed byte length)`.
///
/// Positions with a lecturer in front come first, shortest lecturer first;
/// the position without a lecturer is tried last.
fn type_positions(head: &str, rest_start: usize) -> Vec<(usize, PairType, usize)> {
    let rest = &head[rest_start..];
    let mut with_lecturer = Vec::new();
    let mut without_lecturer = Vec::new();

    for (at, _) in rest.char_indices() {
        let Some((pair_type, len)) = type_at(head, rest_start + at) else {
            continue;
        };
        if at == 0 {
            without_lecturer.push((at, pair_type, len));
        } else {
            with_lecturer.push((at, pair_type, len));
        }
    }

    with_lecturer.extend(without_lecturer);
    with_lecturer
}

/// Type keyword starting at byte `at` of `head`.
///
/// A lone `.` after whitespace stands for an omitted type, which means a
/// lecture.
fn type_at(head: &str, at: usize) -> Option<(PairType, usize)> {
    let text = &head[at..];

    for (keyword, pair_type) in TYPE_KEYWORDS {
        if let Some(len) = prefix_len_ignore_case(text, keyword) {
            if text[len..].starts_with('.') {
                return Some((pair_type, len + 1));
            }
        }
    }

    let after_space = head[..at].chars().next_back().is_some_and(char::is_whitespace);
    if text.starts_with('.') && after_space {
        return Some((PairType::Lecture, 1));
    }
    None
}

/// Byte length of `keyword` at the start of `text`, compared case-insensitively.
fn prefix_len_ignore_case(text: &str, keyword: &str) -> Option<usize> {
    let mut chars = text.char_indices();
    let mut len = 0;
    for expected in keyword.chars() {
        let (idx, ch) = chars.next()?;
        if !ch.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        len = idx + ch.len_utf8();
    }
    Some(len)
}

/// Explain a missing type by naming the word where the type should be.
fn diagnose_type(entry: &str, head: &str) -> EntryError {
    let pieces: Vec<&str> = head.trim().split(". ").collect();
    if pieces.len() < 3 {
        return EntryError::NotMatched(entry.to_string());
    }

    let candidate = pieces[..pieces.len() - 1]
        .iter()
        .rev()
        .find(|piece| !SUBGROUP.is_match(&format!("{}.", piece.trim())));

    match candidate {
        Some(piece) => EntryError::UnknownType(format!("{}.", piece.trim())),
        None => EntryError::NotMatched(entry.to_string()),
    }
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    text[from..]
        .char_indices()
        .find(|(_, ch)| !ch.is_whitespace())
        .map_or(text.len(), |(idx, _)| from + idx)
}

fn strip_dot(text: &str) -> String {
    let text = text.trim();
    text.strip_suffix('.').unwrap_or(text).trim().to_string()
}

fn is_title_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch.is_whitespace() || matches!(ch, '.' | ',' | '-' | '(' | ')' | '/' | ':')
}

fn is_lecturer_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch.is_whitespace() || matches!(ch, '_' | '.')
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::DateItem;

    fn resolver() -> DateResolver {
        DateResolver::new(2024, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap())
    }

    fn parse(entry: &str) -> Result<EntryFields, EntryError> {
        parse_entry(entry, &resolver())
    }

    #[test]
    fn full_entry() {
        let fields = parse("Матанализ. Иванов И.И. Лекция. (А). 101Л. [02.09-23.09 к.н.]").unwrap();
        assert_eq!(fields.title, "Матанализ");
        assert_eq!(fields.lecturer, "Иванов И.И");
        assert_eq!(fields.pair_type, PairType::Lecture);
        assert_eq!(fields.subgroup, Subgroup::A);
        assert_eq!(fields.classroom, "101Л");
        assert_eq!(fields.date.len(), 1);
    }

    #[test]
    fn seminar_without_space_before_dates() {
        let fields = parse("Физика. Петров П.П. Семинар. 205.[02.09]").unwrap();
        assert_eq!(fields.title, "Физика");
        assert_eq!(fields.lecturer, "Петров П.П");
        assert_eq!(fields.pair_type, PairType::Seminar);
        assert_eq!(fields.subgroup, Subgroup::Common);
        assert_eq!(fields.classroom, "205");
        assert_eq!(
            fields.date.items(),
            &[DateItem::Single(NaiveDate::from_ymd_opt(2024, 9, 2).unwrap())]
        );
    }

    #[test]
    fn lecturer_is_optional() {
        let fields = parse("Физика. Семинар. 205. [02.09]").unwrap();
        assert_eq!(fields.lecturer, "");
        assert_eq!(fields.pair_type, PairType::Seminar);
    }

    #[test]
    fn omitted_type_is_lecture() {
        let fields = parse("Физкультура. Сидоров С.С. . Спортзал. [02.09]").unwrap();
        assert_eq!(fields.lecturer, "Сидоров С.С");
        assert_eq!(fields.pair_type, PairType::Lecture);
        assert_eq!(fields.classroom, "Спортзал");
    }

    #[test]
    fn laboratory_keywords() {
        let fields = parse("Химия. Лабораторные занятия. (Б). 310. [02.09]").unwrap();
        assert_eq!(fields.pair_type, PairType::Laboratory);
        assert_eq!(fields.subgroup, Subgroup::B);

        let fields = parse("Химия. ЛАБОРАТОРНАЯ. 310. [02.09]").unwrap();
        assert_eq!(fields.pair_type, PairType::Laboratory);
    }

    #[test]
    fn title_may_contain_dots_and_punctuation() {
        let fields = parse("Теор. механика (ч. 2). Лекции. 0301. [02.09]").unwrap();
        assert_eq!(fields.title, "Теор. механика (ч. 2)");
        assert_eq!(fields.lecturer, "");
        assert_eq!(fields.pair_type, PairType::Lecture);
    }

    #[test]
    fn latin_subgroup_letters() {
        assert_eq!(parse("Физика. Семинар. (a). 205. [02.09]").unwrap().subgroup, Subgroup::A);
        assert_eq!(parse("Физика. Семинар. (B). 205. [02.09]").unwrap().subgroup, Subgroup::B);
    }

    #[test]
    fn unknown_subgroup_is_an_error() {
        let err = parse("Физика. Семинар. (В). 205. [02.09]").unwrap_err();
        assert_eq!(err, EntryError::UnknownSubgroup("(В).".into()));
    }

    #[test]
    fn unknown_type_is_named() {
        let err = parse("Физика. Петров П.П. Тренинг. 205. [02.09]").unwrap_err();
        assert_eq!(err, EntryError::UnknownType("Тренинг.".into()));
        assert_eq!(err.to_string(), "Unknown type: 'Тренинг.'");
    }

    #[test]
    fn classroom_must_end_with_dot() {
        let err = parse("Физика. Семинар. 205 [02.09]").unwrap_err();
        assert_eq!(err, EntryError::InvalidClassroom("205".into()));
    }

    #[test]
    fn missing_date_block() {
        let err = parse("Физика. Семинар. 205.").unwrap_err();
        assert!(matches!(err, EntryError::MissingDates(_)));
    }

    #[test]
    fn date_errors_pass_through() {
        let err = parse("Физика. Семинар. 205. [02.09, когда-нибудь]").unwrap_err();
        assert_eq!(err, EntryError::Date(DateError::UnknownDate("когда-нибудь".into())));
        assert_eq!(err.to_string(), "Unknown date: 'когда-нибудь'");
    }

    #[test]
    fn garbage_is_not_matched() {
        let err = parse("<<>> [02.09]").unwrap_err();
        assert!(matches!(err, EntryError::NotMatched(_)));
    }

    #[test]
    fn keyword_match_ignores_case() {
        assert_eq!(prefix_len_ignore_case("СЕМИНАР.", "семинар"), Some("СЕМИНАР".len()));
        assert_eq!(prefix_len_ignore_case("Сем", "семинар"), None);
    }
}
