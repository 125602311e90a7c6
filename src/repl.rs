use crate::core::db::{format_record, Assignments, DatabaseHandle, FieldSpec};
use crate::core::{ManageDbError, Result};
use rusqlite::types::Value;
use std::io::{BufRead, Write};
use std::num::IntErrorKind;
use tracing::debug;

/// Menu shown before every prompt
pub const MENU: &str = "------------
0 - exit
1 - open DB
2 - close
3 - get
4 - set
5 - del
6 - list tables
7 - create table
8 - request
9 - list fields
";

/// Represents an entry of the numbered menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuChoice {
    Exit,
    Open,
    Close,
    Get,
    Set,
    Delete,
    ListTables,
    CreateTable,
    Request,
    ListFields,
}

impl MenuChoice {
    /// Maps a menu number to its entry; numbers outside 0-9 have none
    pub fn from_number(n: i64) -> Option<Self> {
        let choice = match n {
            0 => MenuChoice::Exit,
            1 => MenuChoice::Open,
            2 => MenuChoice::Close,
            3 => MenuChoice::Get,
            4 => MenuChoice::Set,
            5 => MenuChoice::Delete,
            6 => MenuChoice::ListTables,
            7 => MenuChoice::CreateTable,
            8 => MenuChoice::Request,
            9 => MenuChoice::ListFields,
            _ => return None,
        };
        Some(choice)
    }
}

/// Parses the "Your choice" answer.
///
/// Anything that is not a number is an input error; a number without a
/// menu entry yields `None`.
pub fn parse_choice(input: &str) -> Result<Option<MenuChoice>> {
    let input = input.trim();
    match input.parse::<i64>() {
        Ok(n) => Ok(MenuChoice::from_number(n)),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Ok(None)
        }
        Err(_) => Err(ManageDbError::Input(format!("'{}' is not a menu number", input))),
    }
}

/// Splits a comma separated list, trimming items and dropping empty ones
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parses the field list of a get; `*` means every field
pub fn parse_fields_to_get(input: &str) -> Option<Vec<String>> {
    if input.trim() == "*" {
        None
    } else {
        Some(parse_list(input))
    }
}

/// Splits a `key=value` couple on its first `=`
pub fn parse_couple(couple: &str) -> Result<(String, String)> {
    let (key, value) = couple.split_once('=').ok_or_else(|| {
        ManageDbError::Input(format!("'{}' is not a field=value couple", couple))
    })?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

/// Parses comma separated `field=value` couples into an ordered mapping of text values
pub fn parse_assignments(input: &str) -> Result<Assignments> {
    let mut assignments = Assignments::new();
    for couple in parse_list(input) {
        let (key, value) = parse_couple(&couple)?;
        assignments.insert(key, Value::Text(value));
    }
    Ok(assignments)
}

/// Parses comma separated fields, each a bare name or a `name=type` couple
pub fn parse_field_specs(input: &str) -> Result<Vec<FieldSpec>> {
    parse_list(input)
        .into_iter()
        .map(|field| {
            if field.contains('=') {
                let (name, column_type) = parse_couple(&field)?;
                Ok(FieldSpec::Typed { name, column_type })
            } else {
                Ok(FieldSpec::Name(field))
            }
        })
        .collect()
}

enum Flow {
    Continue,
    Exit,
}

/// Interactive numbered menu driving a `DatabaseHandle`.
///
/// The menu reads answers from `input` and writes prompts and results to
/// `output`. The first failing command ends the loop with its error.
pub struct Menu<R, W> {
    handle: DatabaseHandle,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(handle: DatabaseHandle, input: R, output: W) -> Self {
        Menu {
            handle,
            input,
            output,
        }
    }

    /// The handle the menu operates on
    pub fn handle(&self) -> &DatabaseHandle {
        &self.handle
    }

    /// Runs the menu until exit, end of input, or the first error
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.output, "{}", MENU)?;
            let Some(answer) = self.prompt("Your choice: ")? else {
                return Ok(());
            };

            let Some(choice) = parse_choice(&answer)? else {
                continue;
            };
            debug!("Menu choice {:?}", choice);

            if let Flow::Exit = self.dispatch(choice)? {
                return Ok(());
            }
        }
    }

    /// Prints `text` and reads one line; `None` at end of input
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<Flow> {
        match choice {
            MenuChoice::Exit => return Ok(Flow::Exit),
            MenuChoice::Open => {
                let Some(path) = self.prompt("DB file name: ")? else {
                    return Ok(Flow::Exit);
                };
                let path = path.trim();
                let requested = if path.is_empty() { None } else { Some(path) };
                if self.handle.open(requested) {
                    writeln!(self.output, "Opened database: {}", self.handle.path())?;
                } else {
                    writeln!(self.output, "failed to open DB '{}'", self.handle.path())?;
                }
            }
            MenuChoice::Close => {
                self.handle.close()?;
            }
            MenuChoice::Get => {
                let Some(table) = self.prompt("Table where to get items: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(fields) =
                    self.prompt("Fields to get (comma separated, else \"*\" for all): ")?
                else {
                    return Ok(Flow::Exit);
                };
                let fields = parse_fields_to_get(&fields);
                let records = self.handle.get(table.trim(), fields.as_deref())?;
                for record in &records {
                    writeln!(self.output, "{}", format_record(record))?;
                }
                writeln!(self.output, "({} rows)", records.len())?;
            }
            MenuChoice::Set => {
                let Some(table) = self.prompt("Table where to add item: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(couples) =
                    self.prompt("Couples of field=value to set (comma separated): ")?
                else {
                    return Ok(Flow::Exit);
                };
                let assignments = parse_assignments(&couples)?;
                self.handle.set(table.trim(), &assignments)?;
            }
            MenuChoice::Delete => {
                let Some(table) = self.prompt("Table where to delete an item: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(couples) = self.prompt(
                    "Couples of field=value identifying the item (comma separated): ",
                )?
                else {
                    return Ok(Flow::Exit);
                };
                let conditions = parse_assignments(&couples)?;
                let deleted = self.handle.delete(table.trim(), &conditions)?;
                writeln!(self.output, "Deleted {} row(s)", deleted)?;
            }
            MenuChoice::ListTables => {
                let tables = self.handle.list_tables()?;
                writeln!(self.output, "{:?}", tables)?;
            }
            MenuChoice::CreateTable => {
                let Some(table) = self.prompt("Table to create: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(fields) = self.prompt(
                    "List (comma separated) of fields (of type TEXT) and/or couples field=type: ",
                )?
                else {
                    return Ok(Flow::Exit);
                };
                let fields = parse_field_specs(&fields)?;
                self.handle.create(table.trim(), &fields)?;
            }
            MenuChoice::Request => {
                let Some(request) = self.prompt("Request: ")? else {
                    return Ok(Flow::Exit);
                };
                self.handle.execute(&request, None)?;
                writeln!(self.output, "Result:\nOK")?;
            }
            MenuChoice::ListFields => {
                let Some(table) = self.prompt("Table where to get fields: ")? else {
                    return Ok(Flow::Exit);
                };
                let fields = self.handle.list_fields(table.trim())?;
                writeln!(self.output, "{:?}", fields)?;
            }
        }
        Ok(Flow::Continue)
    }
}
