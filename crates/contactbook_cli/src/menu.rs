//! Interactive text menu over a `ContactBook`.
//!
//! # Responsibility
//! - Prompt for input, convert it, call one repository operation, print the
//!   outcome.
//! - Flush on explicit request, on quit and when input ends unexpectedly.
//!
//! # Invariants
//! - Repository and input errors are printed and never end the session.
//! - Only a closed or unreadable input stream ends the session without `Q`.

use crate::input::{
    optional_text, parse_id, parse_id_list, parse_optional_timestamp, parse_required_day,
    parse_required_timestamp,
};
use contactbook_core::{
    format_timestamp, Clock, Contact, ContactBook, Meeting, SnapshotStore,
};
use log::{info, warn};
use std::error::Error;
use std::io::{self, BufRead, Write};

const MENU: &str = "\
*************************
**** CONTACT MANAGER ****
*************************

CONTACTS
J. Add a new contact
K. List contacts for ids
L. Search contacts by name

MEETINGS
A. Add a future meeting
B. Show a past meeting by id
C. Show a future meeting by id
D. Show a meeting by id
E. List future meetings with a contact
F. List meetings on a date
G. List past meetings with a contact
H. Record a past meeting
I. Add notes to a meeting

GENERAL
M. Save all data to disk
Q. Save and quit
";

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user chose `Q`.
    Quit { flushed: bool },
    /// Input closed or failed mid-session.
    InputClosed { flushed: bool },
}

/// One interactive session bound to a book and an input/output pair.
pub struct Session<'book, S: SnapshotStore, C: Clock, R: BufRead, W: Write> {
    book: &'book mut ContactBook<S, C>,
    input: R,
    output: W,
}

impl<'book, S: SnapshotStore, C: Clock, R: BufRead, W: Write> Session<'book, S, C, R, W> {
    pub fn new(book: &'book mut ContactBook<S, C>, input: R, output: W) -> Self {
        Self {
            book,
            input,
            output,
        }
    }

    /// Runs the menu loop until quit or end of input.
    ///
    /// Output write failures are returned; the book is flushed first.
    pub fn run(mut self) -> io::Result<SessionEnd> {
        loop {
            let step = self.step();
            match step {
                Ok(Some(end)) => return Ok(end),
                Ok(None) => {}
                Err(err) => {
                    let flushed = self.book.flush();
                    warn!(
                        "event=session_end module=cli status=error reason=io_error flushed={flushed} error={err}"
                    );
                    return Err(err);
                }
            }
        }
    }

    fn step(&mut self) -> io::Result<Option<SessionEnd>> {
        write!(self.output, "{MENU}> ")?;
        self.output.flush()?;
        let Some(line) = self.read_line()? else {
            let flushed = self.book.flush();
            info!("event=session_end module=cli status=ok reason=input_closed flushed={flushed}");
            return Ok(Some(SessionEnd::InputClosed { flushed }));
        };

        let choice = line.trim().to_ascii_lowercase();
        match choice.as_str() {
            "a" => self.add_future_meeting()?,
            "b" => self.show_past_meeting()?,
            "c" => self.show_future_meeting()?,
            "d" => self.show_meeting()?,
            "e" => self.list_future_meetings_for_contact()?,
            "f" => self.list_meetings_on_date()?,
            "g" => self.list_past_meetings_for_contact()?,
            "h" => self.record_past_meeting()?,
            "i" => self.add_meeting_notes()?,
            "j" => self.add_contact()?,
            "k" => self.list_contacts_by_ids()?,
            "l" => self.search_contacts()?,
            "m" => {
                let flushed = self.book.flush();
                self.report_flush(flushed)?;
            }
            "q" => {
                let flushed = self.book.flush();
                self.report_flush(flushed)?;
                info!("event=session_end module=cli status=ok reason=quit flushed={flushed}");
                return Ok(Some(SessionEnd::Quit { flushed }));
            }
            _ => writeln!(self.output, "Unknown selection.")?,
        }
        Ok(None)
    }

    fn add_contact(&mut self) -> io::Result<()> {
        let name = self.ask("Name for new contact: ")?;
        let notes = self.ask("Notes for new contact: ")?;
        let result = self
            .book
            .manager_mut()
            .add_contact(name.as_deref(), notes.as_deref());
        match result {
            Ok(id) => writeln!(self.output, "Added contact #{id}."),
            Err(err) => self.report_error(&err),
        }
    }

    fn list_contacts_by_ids(&mut self) -> io::Result<()> {
        let text = self.ask("Contact ids: ")?.unwrap_or_default();
        let ids = match parse_id_list(&text) {
            Ok(ids) => ids,
            Err(err) => return self.report_error(&err),
        };
        let found = self.book.manager().find_contacts_by_ids(&ids);
        match found {
            Ok(contacts) => write_contacts(&mut self.output, &contacts),
            Err(err) => self.report_error(&err),
        }
    }

    fn search_contacts(&mut self) -> io::Result<()> {
        let needle = self.ask("Search contact names for: ")?;
        let found = self.book.manager().find_contacts_by_name(needle.as_deref());
        match found {
            Ok(contacts) => write_contacts(&mut self.output, &contacts),
            Err(err) => self.report_error(&err),
        }
    }

    fn add_future_meeting(&mut self) -> io::Result<()> {
        let date_text = self.ask("Date (yyyy/MM/dd HH:mm:ss): ")?.unwrap_or_default();
        let date = match parse_required_timestamp(&date_text) {
            Ok(date) => date,
            Err(err) => return self.report_error(&err),
        };
        let ids_text = self.ask("Attendee ids: ")?.unwrap_or_default();
        let ids = match parse_id_list(&ids_text) {
            Ok(ids) => ids,
            Err(err) => return self.report_error(&err),
        };
        let result = self.book.manager_mut().add_future_meeting(&ids, date);
        match result {
            Ok(id) => writeln!(self.output, "Scheduled meeting #{id}."),
            Err(err) => self.report_error(&err),
        }
    }

    fn show_past_meeting(&mut self) -> io::Result<()> {
        let Some(id) = self.ask_id("Past meeting id: ")? else {
            return Ok(());
        };
        let found = self.book.manager().get_past_meeting(id);
        match found {
            Ok(meeting) => write_optional_meeting(&mut self.output, meeting),
            Err(err) => self.report_error(&err),
        }
    }

    fn show_future_meeting(&mut self) -> io::Result<()> {
        let Some(id) = self.ask_id("Future meeting id: ")? else {
            return Ok(());
        };
        let found = self.book.manager().get_future_meeting(id);
        match found {
            Ok(meeting) => write_optional_meeting(&mut self.output, meeting),
            Err(err) => self.report_error(&err),
        }
    }

    fn show_meeting(&mut self) -> io::Result<()> {
        let Some(id) = self.ask_id("Meeting id: ")? else {
            return Ok(());
        };
        let meeting = self.book.manager().get_meeting(id);
        write_optional_meeting(&mut self.output, meeting)
    }

    fn list_future_meetings_for_contact(&mut self) -> io::Result<()> {
        let Some(id) = self.ask_id("Contact id: ")? else {
            return Ok(());
        };
        let found = self.book.manager().get_future_meetings_for_contact(id);
        match found {
            Ok(meetings) => write_meetings(&mut self.output, &meetings),
            Err(err) => self.report_error(&err),
        }
    }

    fn list_past_meetings_for_contact(&mut self) -> io::Result<()> {
        let Some(id) = self.ask_id("Contact id: ")? else {
            return Ok(());
        };
        let found = self.book.manager().get_past_meetings_for_contact(id);
        match found {
            Ok(meetings) => write_meetings(&mut self.output, &meetings),
            Err(err) => self.report_error(&err),
        }
    }

    fn list_meetings_on_date(&mut self) -> io::Result<()> {
        let text = self.ask("Day (yyyy/MM/dd): ")?.unwrap_or_default();
        let day = match parse_required_day(&text) {
            Ok(day) => day,
            Err(err) => return self.report_error(&err),
        };
        let meetings = self.book.manager().get_meetings_on_date(day);
        write_meetings(&mut self.output, &meetings)
    }

    fn record_past_meeting(&mut self) -> io::Result<()> {
        let date_text = self.ask("Date (yyyy/MM/dd HH:mm:ss): ")?.unwrap_or_default();
        let date = match parse_optional_timestamp(&date_text) {
            Ok(date) => date,
            Err(err) => return self.report_error(&err),
        };
        let ids_text = self.ask("Attendee ids: ")?.unwrap_or_default();
        let ids = match parse_id_list(&ids_text) {
            Ok(ids) => ids,
            Err(err) => return self.report_error(&err),
        };
        let notes = self.ask("Meeting notes: ")?;
        let result =
            self.book
                .manager_mut()
                .add_new_past_meeting(Some(&ids), date, notes.as_deref());
        match result {
            Ok(id) => writeln!(self.output, "Recorded meeting #{id}."),
            Err(err) => self.report_error(&err),
        }
    }

    fn add_meeting_notes(&mut self) -> io::Result<()> {
        let Some(id) = self.ask_id("Meeting id: ")? else {
            return Ok(());
        };
        let text = self.ask("Notes: ")?;
        let result = self
            .book
            .manager_mut()
            .add_meeting_notes(id, text.as_deref());
        match result {
            Ok(()) => writeln!(self.output, "Notes saved for meeting #{id}."),
            Err(err) => self.report_error(&err),
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Prompts for one line; blank input is `None`.
    ///
    /// End of input mid-prompt is reported as `UnexpectedEof`.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        match self.read_line()? {
            Some(line) => Ok(optional_text(&line)),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            )),
        }
    }

    fn ask_id(&mut self, prompt: &str) -> io::Result<Option<u32>> {
        let text = self.ask(prompt)?.unwrap_or_default();
        match parse_id(&text) {
            Ok(id) => Ok(Some(id)),
            Err(err) => {
                self.report_error(&err)?;
                Ok(None)
            }
        }
    }

    fn report_error(&mut self, err: &dyn Error) -> io::Result<()> {
        writeln!(self.output, "Error: {err}")
    }

    fn report_flush(&mut self, flushed: bool) -> io::Result<()> {
        if flushed {
            writeln!(self.output, "Saved.")
        } else {
            writeln!(self.output, "Error: could not save data, see log for details.")
        }
    }
}

fn write_contacts(out: &mut impl Write, contacts: &[&Contact]) -> io::Result<()> {
    if contacts.is_empty() {
        return writeln!(out, "No contacts found.");
    }
    for contact in contacts {
        writeln!(out, "#{} {}", contact.id(), contact.name())?;
        for line in contact.notes().lines() {
            writeln!(out, "    {line}")?;
        }
    }
    Ok(())
}

fn write_optional_meeting(out: &mut impl Write, meeting: Option<&Meeting>) -> io::Result<()> {
    match meeting {
        Some(meeting) => write_meetings(out, &[meeting]),
        None => writeln!(out, "Meeting not found."),
    }
}

fn write_meetings(out: &mut impl Write, meetings: &[&Meeting]) -> io::Result<()> {
    if meetings.is_empty() {
        return writeln!(out, "No meetings found.");
    }
    for meeting in meetings {
        let attendees = meeting
            .attendees()
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "#{} {} attendees: {}",
            meeting.id(),
            format_timestamp(&meeting.date()),
            attendees
        )?;
        if let Some(notes) = meeting.notes() {
            for line in notes.lines() {
                writeln!(out, "    {line}")?;
            }
        }
    }
    Ok(())
}
