//! Parsing of the single-line commands accepted on each screen.
//! Input is trimmed and case-insensitive.

use crate::ops::view::{Filter, SortKey};

/// Main menu commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    View,
    Add,
    Quit,
}

/// Task list commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCommand {
    Sort(SortKey),
    Filter(Filter),
    Add,
    Edit,
    Back,
    /// 1-based row number in the displayed list
    Select(usize),
}

/// Which field the edit screen should change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Title,
    DueDate,
    Priority,
    Completed,
}

/// Edit screen commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    Field(EditTarget),
    Revert,
    Back,
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

pub fn parse_menu(input: &str) -> Option<MenuCommand> {
    match normalize(input).as_str() {
        "V" => Some(MenuCommand::View),
        "A" => Some(MenuCommand::Add),
        "Q" => Some(MenuCommand::Quit),
        _ => None,
    }
}

pub fn parse_list(input: &str) -> Option<ListCommand> {
    let cmd = normalize(input);
    match cmd.as_str() {
        "D" => Some(ListCommand::Sort(SortKey::DueDate)),
        "P" => Some(ListCommand::Sort(SortKey::Priority)),
        "T" => Some(ListCommand::Sort(SortKey::Title)),
        "N" => Some(ListCommand::Filter(Filter::All)),
        "I" => Some(ListCommand::Filter(Filter::Incomplete)),
        "C" => Some(ListCommand::Filter(Filter::Completed)),
        "A" => Some(ListCommand::Add),
        "E" => Some(ListCommand::Edit),
        "B" => Some(ListCommand::Back),
        _ => parse_row_number(&cmd).map(ListCommand::Select),
    }
}

pub fn parse_edit(input: &str) -> Option<EditCommand> {
    match normalize(input).as_str() {
        "1" => Some(EditCommand::Field(EditTarget::Title)),
        "2" => Some(EditCommand::Field(EditTarget::DueDate)),
        "3" => Some(EditCommand::Field(EditTarget::Priority)),
        "4" => Some(EditCommand::Field(EditTarget::Completed)),
        "R" => Some(EditCommand::Revert),
        "B" => Some(EditCommand::Back),
        _ => None,
    }
}

/// A bare run of ASCII digits. Numbers too large for `usize` still count as
/// a selection (they are simply out of range).
pub fn parse_row_number(input: &str) -> Option<usize> {
    let s = input.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(s.parse().unwrap_or(usize::MAX))
}
