//! Screen gating and the interactive draft editing session.
//!
//! The session is a line-oriented loop over any `BufRead`/`Write` pair, so the
//! binary runs it on stdin/stdout and tests run it on in-memory buffers.

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::draft::{DraftEditor, Finished, Mode, SaveStatus, Section};
use crate::editor::{
    Confirm, DeleteEditor, EditorOutcome, PatchEditor, ServiceEditor, ServicePatch,
    parse_assignment,
};
use crate::error::{AdminError, Result};
use crate::gallery::HERO_GALLERY;
use crate::ingest::{IngestOptions, ingest_file};
use crate::model::{AppConfig, Change, Field, ImageSlot};
use crate::store::{ConfigStore, revision_of};

/// Top-level screen shown for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Onboarding,
    Dashboard,
}

/// Onboarding replaces the dashboard until the record is onboarded.
#[must_use]
pub const fn screen_for(config: &AppConfig) -> Screen {
    if config.is_onboarded {
        Screen::Dashboard
    } else {
        Screen::Onboarding
    }
}

/// Fail with [`AdminError::NotOnboarded`] unless the dashboard is reachable.
pub const fn require_dashboard(config: &AppConfig) -> Result<()> {
    match screen_for(config) {
        Screen::Dashboard => Ok(()),
        Screen::Onboarding => Err(AdminError::NotOnboarded),
    }
}

const HELP: &str = "\
commands:
  status                     mode, section, unsaved flag, save status
  show                       current draft
  toggle <section>           identity | appearance | services
  set <field> <value>        edit a field in the draft
  image <profile|hero> <path>
  gallery [index]            list hero gallery, or pick an entry
  open [id]                  edit a service (no id: new service)
  save key=value ...         save the open service (title, tag, duration, image, popular, other keys are details)
  delete [id]                delete the open service (or the given one)
  cancel                     leave the service editor
  diff                       pending changes
  commit                     save the draft
  discard                    reset everything to defaults
  reload                     pick up changes made elsewhere
  quit";

/// Confirmation answered by the next input line.
struct LineConfirm<'a, R, W> {
    input: &'a mut R,
    out: &'a mut W,
}

impl<R: BufRead, W: Write> Confirm for LineConfirm<'_, R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if write!(self.out, "{prompt} [y/N] ").and_then(|()| self.out.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        if self.input.read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// Interactive draft session bound to one store.
pub struct Session<'s, R, W> {
    store: &'s mut ConfigStore,
    draft: DraftEditor,
    input: R,
    out: W,
    ingest: IngestOptions,
    notices: Rc<RefCell<Vec<String>>>,
}

enum Flow {
    Continue,
    Quit,
}

impl<'s, R: BufRead, W: Write> Session<'s, R, W> {
    /// Start a session. The record must be onboarded.
    pub fn new(store: &'s mut ConfigStore, input: R, out: W, ingest: IngestOptions) -> Result<Self> {
        require_dashboard(store.current())?;
        let draft = DraftEditor::new(store);
        Ok(Self {
            store,
            draft,
            input,
            out,
            ingest,
            notices: Rc::new(RefCell::new(Vec::new())),
        })
    }

    /// Run until `quit` or end of input.
    #[instrument(skip_all)]
    pub fn run(mut self) -> Result<()> {
        let sink = Rc::clone(&self.notices);
        let subscription = self.store.subscribe(move |config| {
            sink.borrow_mut()
                .push(format!("store updated (revision {})", revision_of(config)));
        });
        info!("Session started");
        writeln!(self.out, "coach session, type `help` for commands")?;

        let result = self.read_loop();
        self.store.unsubscribe(subscription);
        info!("Session ended");
        result
    }

    fn read_loop(&mut self) -> Result<()> {
        loop {
            write!(self.out, "{}> ", self.prompt())?;
            self.out.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.out)?;
                return Ok(());
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let flow = match self.execute(line) {
                Ok(flow) => flow,
                Err(e) => {
                    writeln!(self.out, "error: {e}")?;
                    if let Some(hint) = e.suggestion() {
                        writeln!(self.out, "hint: {hint}")?;
                    }
                    Flow::Continue
                }
            };
            self.flush_notices()?;
            if matches!(flow, Flow::Quit) {
                return Ok(());
            }
        }
    }

    fn prompt(&self) -> String {
        let mark = if self.draft.is_unsaved() { "*" } else { "" };
        match self.draft.mode() {
            Mode::Dashboard => format!("dashboard{mark}"),
            Mode::Editor { .. } => format!("service{mark}"),
        }
    }

    fn flush_notices(&mut self) -> Result<()> {
        for notice in self.notices.borrow_mut().drain(..) {
            writeln!(self.out, "({notice})")?;
        }
        Ok(())
    }

    fn execute(&mut self, line: &str) -> Result<Flow> {
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        debug!(cmd, "Session command");

        match cmd {
            "help" | "?" => writeln!(self.out, "{HELP}")?,
            "status" => self.status()?,
            "show" => self.show()?,
            "toggle" => {
                let section = parse_section(rest)?;
                self.draft.toggle_section(section);
                match self.draft.expanded() {
                    Some(s) => writeln!(self.out, "expanded {}", s.as_str())?,
                    None => writeln!(self.out, "collapsed")?,
                }
            }
            "set" => {
                let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
                let field: Field = field.parse()?;
                let changed = self.draft.set_field(field, value.trim())?;
                writeln!(
                    self.out,
                    "{field} {}",
                    if changed { "updated" } else { "unchanged" }
                )?;
            }
            "image" => {
                let (slot, path) = rest.split_once(' ').unwrap_or((rest, ""));
                let slot = match slot {
                    "profile" => ImageSlot::Profile,
                    "hero" => ImageSlot::Hero,
                    other => return Err(AdminError::Other(format!("Unknown image slot '{other}'"))),
                };
                let image = ingest_file(Path::new(path.trim()), &self.ingest)?;
                self.draft.set_image(slot, &image);
                writeln!(self.out, "{slot} image set ({}x{})", image.width, image.height)?;
            }
            "gallery" => self.gallery(rest)?,
            "open" => {
                let id = (!rest.is_empty()).then_some(rest);
                self.draft.open_editor(id)?;
                match self.draft.editing_service() {
                    Some(s) => writeln!(self.out, "editing {} ({})", s.title, s.id)?,
                    None => writeln!(self.out, "new service")?,
                }
            }
            "save" => {
                self.ensure_editor()?;
                let patch = parse_patch(rest)?;
                let mut editor = PatchEditor::new(patch);
                let outcome = editor.edit(self.draft.editing_service());
                if let Some(e) = editor.take_error() {
                    return Err(e);
                }
                self.finish(outcome)?;
            }
            "delete" => {
                if !rest.is_empty() {
                    self.draft.open_editor(Some(rest))?;
                }
                self.ensure_editor()?;
                let outcome = DeleteEditor.edit(self.draft.editing_service());
                self.finish(outcome)?;
            }
            "cancel" => {
                self.finish(EditorOutcome::Cancel)?;
            }
            "diff" => self.diff()?,
            "commit" => {
                self.draft.commit(self.store)?;
                writeln!(self.out, "saved")?;
            }
            "discard" => {
                let mut confirm = LineConfirm {
                    input: &mut self.input,
                    out: &mut self.out,
                };
                if confirm.confirm("Discard all changes and restore defaults?") {
                    self.draft.discard(self.store)?;
                    writeln!(self.out, "reset to defaults")?;
                    if screen_for(self.store.current()) == Screen::Onboarding {
                        writeln!(self.out, "onboarding required, leaving session")?;
                        return Ok(Flow::Quit);
                    }
                } else {
                    writeln!(self.out, "kept")?;
                }
            }
            "reload" => self.reload()?,
            "quit" | "exit" => {
                if self.draft.is_unsaved() {
                    let mut confirm = LineConfirm {
                        input: &mut self.input,
                        out: &mut self.out,
                    };
                    if !confirm.confirm("Quit with unsaved changes?") {
                        return Ok(Flow::Continue);
                    }
                }
                return Ok(Flow::Quit);
            }
            other => {
                writeln!(self.out, "unknown command '{other}', try `help`")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn ensure_editor(&self) -> Result<()> {
        if matches!(self.draft.mode(), Mode::Editor { .. }) {
            Ok(())
        } else {
            Err(AdminError::Other(
                "No service open, use `open [id]` first".to_string(),
            ))
        }
    }

    fn finish(&mut self, outcome: EditorOutcome) -> Result<()> {
        let mut confirm = LineConfirm {
            input: &mut self.input,
            out: &mut self.out,
        };
        let finished = self.draft.finish_editing(outcome, self.store, &mut confirm)?;
        let message = match finished {
            Finished::Saved => "service saved",
            Finished::Deleted => "service deleted",
            Finished::Declined => "kept",
            Finished::Cancelled => "back to dashboard",
        };
        writeln!(self.out, "{message}")?;
        Ok(())
    }

    fn status(&mut self) -> Result<()> {
        let status = match self.draft.status_at(Instant::now()) {
            SaveStatus::Failed { reason } => format!("failed: {reason}"),
            other => other.label().to_string(),
        };
        let expanded = self.draft.expanded().map_or("none", Section::as_str);
        writeln!(self.out, "mode:     {}", self.prompt().trim_end_matches('*'))?;
        writeln!(self.out, "expanded: {expanded}")?;
        writeln!(self.out, "unsaved:  {}", self.draft.is_unsaved())?;
        writeln!(self.out, "save:     {status}")?;
        writeln!(self.out, "revision: {}", self.store.revision())?;
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let config = self.draft.draft();
        for field in Field::ALL {
            writeln!(self.out, "{:<17} {}", field.key(), config.field(field))?;
        }
        for service in &config.services {
            let star = if service.popular { " *" } else { "" };
            writeln!(self.out, "- {} [{}]{star}", service.title, service.id)?;
        }
        Ok(())
    }

    fn gallery(&mut self, rest: &str) -> Result<()> {
        if rest.is_empty() {
            for (i, entry) in HERO_GALLERY.iter().enumerate() {
                writeln!(self.out, "{i}. {}", entry.label)?;
            }
            return Ok(());
        }
        let index: usize = rest
            .parse()
            .map_err(|_| AdminError::Other(format!("Invalid gallery index '{rest}'")))?;
        self.draft.select_gallery_hero(index)?;
        writeln!(self.out, "hero set to {}", HERO_GALLERY[index].label)?;
        Ok(())
    }

    fn diff(&mut self) -> Result<()> {
        let changes = self.draft.pending_changes();
        if changes.is_empty() {
            writeln!(self.out, "no pending changes")?;
        }
        for change in &changes {
            writeln!(self.out, "  {}", describe_change(change))?;
        }
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        if !self.store.reload()? {
            writeln!(self.out, "already up to date")?;
            return Ok(());
        }
        if self.draft.is_unsaved() {
            writeln!(
                self.out,
                "stored record changed; draft kept (commit to overwrite, discard to reset)"
            )?;
        } else {
            self.draft.rebase(self.store);
            writeln!(self.out, "draft refreshed")?;
        }
        Ok(())
    }
}

fn parse_section(raw: &str) -> Result<Section> {
    Section::ALL
        .into_iter()
        .find(|s| s.as_str() == raw.to_lowercase())
        .ok_or_else(|| AdminError::Other(format!("Unknown section '{raw}'")))
}

/// Build a patch from `key=value` words. Known keys map to service fields,
/// anything else becomes a detail. The id cannot be edited.
fn parse_patch(raw: &str) -> Result<ServicePatch> {
    let mut patch = ServicePatch::default();
    for word in raw.split_whitespace() {
        // Underscores in values stand for spaces.
        let (key, value) = match parse_assignment(word)? {
            (key, Value::String(s)) => (key, Value::String(s.replace('_', " "))),
            pair => pair,
        };
        let text = value
            .as_str()
            .map_or_else(|| value.to_string(), str::to_string);
        match key.as_str() {
            "title" => patch.title = Some(text),
            "tag" => patch.tag = Some(text),
            "duration" => patch.duration = Some(text),
            "image" => patch.image = Some(text),
            "popular" => patch.popular = Some(value.as_bool().unwrap_or(text == "yes")),
            "id" => return Err(AdminError::ReservedDetailKey { key }),
            _ => {
                patch.details.insert(key, value);
            }
        }
    }
    Ok(patch)
}

/// One-line description of a pending change.
#[must_use]
pub fn describe_change(change: &Change) -> String {
    match change {
        Change::Field { field, from, to } => format!("{field}: \"{from}\" -> \"{to}\""),
        Change::Image { slot } => format!("{slot} image replaced"),
        Change::Onboarding { to } => format!("onboarded: {to}"),
        Change::ServiceAdded { id, title } => format!("+ service {title} ({id})"),
        Change::ServiceRemoved { id, title } => format!("- service {title} ({id})"),
        Change::ServiceModified { id, fields } => {
            format!("~ service {id}: {}", fields.join(", "))
        }
        Change::ServicesReordered => "services reordered".to_string(),
    }
}
