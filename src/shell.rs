use std::io::{self, BufRead, Write};

use crate::{
    db::InventoryStore,
    error::{InventoryError, Result},
    models::part::{Direction, PartInput, StockedPart, parse_part_number},
};

const HELP: &str = "\
commands:
  list                              all items
  low                               items below their minimum on hand
  search <term>                     items with any field containing <term>
  show <part>                       one item
  add field=value; field=value      new item (part_name, quantity, min_on_hand required)
  update <part> field=value; ...    change fields of an item
  remove <part>                     delete an item (asks for confirmation)
  in <part> [qty]                   scan parts in (qty defaults to 1)
  out <part> [qty]                  scan parts out (qty defaults to 1)
  quit
fields: part_name description origin_part_number vendor_part_number cost quantity min_on_hand location";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Low,
    Search(String),
    Show(String),
    Add(String),
    Update { part_number: String, assignments: String },
    Remove(String),
    Scan { direction: Direction, part_number: String, quantity: String },
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));

        match word.to_ascii_lowercase().as_str() {
            "" => Command::Empty,
            "list" => Command::List,
            "low" => Command::Low,
            "search" => Command::Search(rest.to_string()),
            "show" => Command::Show(rest.to_string()),
            "add" => Command::Add(rest.to_string()),
            "update" => {
                let (part_number, assignments) = rest
                    .split_once(char::is_whitespace)
                    .unwrap_or((rest, ""));
                Command::Update {
                    part_number: part_number.to_string(),
                    assignments: assignments.trim().to_string(),
                }
            }
            "remove" => Command::Remove(rest.to_string()),
            "in" | "out" => {
                let direction = if word.eq_ignore_ascii_case("in") {
                    Direction::In
                } else {
                    Direction::Out
                };
                let mut args = rest.split_whitespace();
                Command::Scan {
                    direction,
                    part_number: args.next().unwrap_or_default().to_string(),
                    quantity: args.next().unwrap_or("1").to_string(),
                }
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Apply `field=value; field=value` assignments to a form.
pub fn apply_assignments(input: &mut PartInput, assignments: &str) -> Result<()> {
    for chunk in assignments.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        let (field, value) = chunk.split_once('=').ok_or_else(|| {
            InventoryError::validation("field", format!("expected field=value, got '{chunk}'"))
        })?;
        input.assign(field, value.trim())?;
    }
    Ok(())
}

/// Line-oriented front end: one command per input line, rows printed as JSON lines
pub struct Shell<'a> {
    store: &'a InventoryStore,
}

impl<'a> Shell<'a> {
    pub fn new(store: &'a InventoryStore) -> Self {
        Self { store }
    }

    /// Run until `quit` or end of input. Store errors are printed, never fatal.
    pub async fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> io::Result<()> {
        let mut lines = input.lines();

        while let Some(line) = lines.next() {
            let command = Command::parse(&line?);
            let outcome = match command {
                Command::Quit => break,
                Command::Remove(raw) => {
                    let part_number = match parse_part_number(&raw) {
                        Ok(part_number) => part_number,
                        Err(err) => {
                            writeln!(out, "error: {err}")?;
                            continue;
                        }
                    };
                    writeln!(
                        out,
                        "Are you sure you want to remove item with part number '{part_number}'? [y/N]"
                    )?;
                    let answer = lines.next().transpose()?.unwrap_or_default();
                    if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                        self.store
                            .remove(part_number)
                            .await
                            .map(|()| "Item removed successfully.".to_string())
                    } else {
                        Ok("Removal cancelled.".to_string())
                    }
                }
                command => self.execute(command, out).await?,
            };

            match outcome {
                Ok(message) if message.is_empty() => {}
                Ok(message) => writeln!(out, "{message}")?,
                Err(err) => writeln!(out, "error: {err}")?,
            }
            out.flush()?;
        }

        Ok(())
    }

    /// Run one command. Rows are written directly; the returned message, if
    /// any, is the status line to print after them.
    async fn execute<W: Write>(&self, command: Command, out: &mut W) -> io::Result<Result<String>> {
        let outcome = match command {
            Command::List => match self.store.list().await {
                Ok(parts) => {
                    write_rows(out, &parts)?;
                    Ok(String::new())
                }
                Err(err) => Err(err),
            },
            Command::Low => match self.store.list_below_minimum().await {
                Ok(parts) if parts.is_empty() => {
                    Ok("All items meet minimum on-hand levels.".to_string())
                }
                Ok(parts) => {
                    write_rows(out, &parts)?;
                    Ok(String::new())
                }
                Err(err) => Err(err),
            },
            Command::Search(term) => match self.store.search(&term).await {
                Ok(parts) if parts.is_empty() => {
                    Ok("No items found matching the search criteria.".to_string())
                }
                Ok(parts) => {
                    write_rows(out, &parts)?;
                    Ok(String::new())
                }
                Err(err) => Err(err),
            },
            Command::Show(raw) => match self.show(&raw).await {
                Ok(part) => {
                    write_rows(out, &[part])?;
                    Ok(String::new())
                }
                Err(err) => Err(err),
            },
            Command::Add(assignments) => self.add(&assignments).await,
            Command::Update {
                part_number,
                assignments,
            } => self.update(&part_number, &assignments).await,
            Command::Scan {
                direction,
                part_number,
                quantity,
            } => self
                .store
                .scan(&part_number, &quantity, direction)
                .await
                .map(|new_quantity| scan_message(direction, &part_number, &quantity, new_quantity)),
            Command::Help => Ok(HELP.to_string()),
            // confirmation needs the input stream, handled in `run`
            Command::Remove(_) | Command::Empty | Command::Quit => Ok(String::new()),
            Command::Unknown(word) => Ok(format!("Unknown command '{word}', try 'help'.")),
        };
        Ok(outcome)
    }

    async fn show(&self, raw: &str) -> Result<StockedPart> {
        let part_number = parse_part_number(raw)?;
        Ok(self.store.get(part_number).await?.into())
    }

    async fn add(&self, assignments: &str) -> Result<String> {
        let mut input = PartInput::default();
        apply_assignments(&mut input, assignments)?;
        let part_number = self.store.add(&input).await?;
        Ok(format!(
            "Item added successfully with part number '{part_number}'."
        ))
    }

    async fn update(&self, raw: &str, assignments: &str) -> Result<String> {
        let part_number = parse_part_number(raw)?;
        let current = self.store.get(part_number).await?;
        let mut input = PartInput::from(&current);
        apply_assignments(&mut input, assignments)?;
        self.store.update(part_number, &input).await?;
        Ok("Item updated successfully.".to_string())
    }
}

fn write_rows<W: Write>(out: &mut W, parts: &[StockedPart]) -> io::Result<()> {
    for part in parts {
        let row = serde_json::to_string(part).map_err(io::Error::other)?;
        writeln!(out, "{row}")?;
    }
    Ok(())
}

fn scan_message(direction: Direction, part_number: &str, quantity: &str, new_quantity: i64) -> String {
    let (part_number, quantity) = (part_number.trim(), quantity.trim());
    match direction {
        Direction::In => format!(
            "Added {quantity} units of item with part number '{part_number}'. New quantity: {new_quantity}"
        ),
        Direction::Out => format!(
            "Removed {quantity} units of item with part number '{part_number}'. Remaining quantity: {new_quantity}"
        ),
    }
}
