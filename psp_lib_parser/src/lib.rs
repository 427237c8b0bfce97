// PSPLIB files are parsed line by line: chumsky handles the grammar of a
// single line, the section headers drive which grammar applies.

use chumsky::{prelude::*, Parser};
use hashbrown::HashMap;
use log::{debug, trace};
use structs::{
    PspLibPrecedenceRelation, PspLibProblem, PspLibProblemResources, PspLibProjectInformation,
    PspLibRequestDuration,
};
use thiserror::Error;

pub mod structs;

#[derive(Debug, Error)]
pub enum PspLibParseError {
    #[error("ParseError occurred on line {line}: {errors:?}")]
    ParseError {
        line: usize,
        errors: Vec<Simple<char>>,
    },
    #[error("Field `{0}` is missing")]
    MissingField(&'static str),
    #[error("Section `{0}` is missing or empty")]
    MissingSection(&'static str),
    #[error("Malformed row on line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    ProjectInformation,
    PrecedenceRelations,
    RequestsDurations,
    ResourceAvailabilities,
}

impl Section {
    fn from_header(line: &str) -> Option<Self> {
        if line.starts_with("PROJECT INFORMATION") {
            Some(Section::ProjectInformation)
        } else if line.starts_with("PRECEDENCE RELATIONS") {
            Some(Section::PrecedenceRelations)
        } else if line.starts_with("REQUESTS/DURATIONS") {
            Some(Section::RequestsDurations)
        } else if line.starts_with("RESOURCEAVAILABILITIES") {
            Some(Section::ResourceAvailabilities)
        } else {
            None
        }
    }
}

pub fn parse_psp_lib(content: &str) -> Result<PspLibProblem, PspLibParseError> {
    let mut section = Section::Preamble;

    // label -> (line number, raw value)
    let mut fields: HashMap<String, (usize, String)> = HashMap::new();
    let mut project_info = vec![];
    let mut precedence_relations = vec![];
    let mut request_durations = vec![];
    let mut resource_availabilities = vec![];

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('*') {
            continue;
        }

        if let Some(next) = Section::from_header(line) {
            trace!("line {line_number}: entering section {next:?}");
            section = next;
            continue;
        }

        if section == Section::Preamble {
            if line.contains(':') {
                let (label, value) = parse_line(field_parser(), line, line_number)?;
                fields.insert(label, (line_number, value));
            }
            continue;
        }

        // Column captions and rulers
        if !line.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }

        let row = parse_line(number_row_parser(), line, line_number)?;

        match section {
            Section::Preamble => {}
            Section::ProjectInformation => {
                if row.len() < 6 {
                    return Err(malformed(line_number, "expected 6 project values", &row));
                }
                project_info.push(PspLibProjectInformation {
                    number: row[0],
                    jobs: row[1],
                    relative_date: row[2],
                    due_date: row[3],
                    tard_cost: row[4],
                    mpm_time: row[5],
                });
            }
            Section::PrecedenceRelations => {
                if row.len() < 3 || row.len() != 3 + row[2] {
                    return Err(malformed(
                        line_number,
                        "successor count does not match the listed successors",
                        &row,
                    ));
                }
                precedence_relations.push(PspLibPrecedenceRelation {
                    job_number: row[0],
                    mode_count: row[1],
                    successor_count: row[2],
                    successors: row[3..].to_vec(),
                });
            }
            Section::RequestsDurations => {
                if row.len() < 3 {
                    return Err(malformed(
                        line_number,
                        "expected job number, mode and duration",
                        &row,
                    ));
                }
                request_durations.push(PspLibRequestDuration {
                    job_number: row[0],
                    mode: row[1],
                    duration: row[2],
                    requests: row[3..].to_vec(),
                });
            }
            Section::ResourceAvailabilities => {
                if !resource_availabilities.is_empty() {
                    return Err(malformed(
                        line_number,
                        "resource availabilities listed twice",
                        &row,
                    ));
                }
                resource_availabilities = row;
            }
        }
    }

    if precedence_relations.is_empty() {
        return Err(PspLibParseError::MissingSection("PRECEDENCE RELATIONS"));
    }
    if request_durations.is_empty() {
        return Err(PspLibParseError::MissingSection("REQUESTS/DURATIONS"));
    }
    if resource_availabilities.is_empty() {
        return Err(PspLibParseError::MissingSection("RESOURCEAVAILABILITIES"));
    }

    let problem = PspLibProblem {
        file_with_basedata: text_field(&fields, "file with basedata")?,
        initial_rng: number_field(&fields, "initial value random generator")?,
        projects: number_field(&fields, "projects")?,
        jobs: number_field(&fields, "jobs")?,
        horizon: number_field(&fields, "horizon")?,
        resources: PspLibProblemResources {
            renewable: number_field(&fields, "- renewable")?,
            nonrenewable: number_field(&fields, "- nonrenewable")?,
            doubly_constrained: number_field(&fields, "- doubly constrained")?,
        },
        project_info,
        precedence_relations,
        request_durations,
        resource_availabilities,
    };

    debug!(
        "parsed {} with {} jobs and {} renewable resources",
        problem.file_with_basedata, problem.jobs, problem.resources.renewable
    );

    Ok(problem)
}

fn parse_line<O>(
    parser: impl Parser<char, O, Error = Simple<char>>,
    line: &str,
    line_number: usize,
) -> Result<O, PspLibParseError> {
    parser
        .parse(line)
        .map_err(|errors| PspLibParseError::ParseError {
            line: line_number,
            errors,
        })
}

fn malformed(line: usize, reason: &str, row: &[usize]) -> PspLibParseError {
    PspLibParseError::MalformedRow {
        line,
        reason: format!("{reason}: {row:?}"),
    }
}

fn find_field<'a>(
    fields: &'a HashMap<String, (usize, String)>,
    label: &'static str,
) -> Result<&'a (usize, String), PspLibParseError> {
    fields
        .iter()
        .find(|(key, _)| key.starts_with(label))
        .map(|(_, value)| value)
        .ok_or(PspLibParseError::MissingField(label))
}

fn text_field(
    fields: &HashMap<String, (usize, String)>,
    label: &'static str,
) -> Result<String, PspLibParseError> {
    find_field(fields, label).map(|(_, value)| value.clone())
}

fn number_field(
    fields: &HashMap<String, (usize, String)>,
    label: &'static str,
) -> Result<usize, PspLibParseError> {
    let (line_number, value) = find_field(fields, label)?;
    parse_line(leading_number_parser(), value, *line_number)
}

pub(crate) fn number_parser() -> impl Parser<char, usize, Error = Simple<char>> {
    text::int(10)
        .try_map(|digits: String, span| {
            digits
                .parse::<usize>()
                .map_err(|err| Simple::custom(span, format!("{digits}: {err}")))
        })
        .labelled("number")
}

/// `label : value`, both sides trimmed.
pub(crate) fn field_parser() -> impl Parser<char, (String, String), Error = Simple<char>> {
    let label = filter(|c: &char| *c != ':')
        .repeated()
        .at_least(1)
        .collect::<String>()
        .map(|label| label.trim().to_string())
        .labelled("label");

    let value = any::<char, Simple<char>>()
        .repeated()
        .collect::<String>()
        .map(|value| value.trim().to_string())
        .labelled("value");

    label.then_ignore(just(':')).then(value).then_ignore(end())
}

/// A number followed by an optional unit suffix, e.g. `4   R`.
pub(crate) fn leading_number_parser() -> impl Parser<char, usize, Error = Simple<char>> {
    number_parser()
        .then_ignore(any().repeated())
        .then_ignore(end())
}

pub(crate) fn number_row_parser() -> impl Parser<char, Vec<usize>, Error = Simple<char>> {
    number_parser()
        .padded()
        .repeated()
        .at_least(1)
        .then_ignore(end())
}
