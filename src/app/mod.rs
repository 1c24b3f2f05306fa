//! Line-oriented host shell around one annotation session.
//!
//! Stands in for a toolbar and a pointer device: commands arrive one per line, mode
//! notifications and completed drawings are written back as they happen.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Receiver};

use crate::error::AppResult;
use crate::geojson::FeatureCollection;
use crate::input::{parse_command, Command, ZoomDirection};
use crate::mode::ModeSubscription;
use crate::session::AnnotationSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellFlow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    session: AnnotationSession,
    modes: ModeSubscription,
    completed: Receiver<FeatureCollection>,
}

impl App {
    pub fn new(mut session: AnnotationSession) -> Self {
        let modes = session.subscribe_mode();
        let (tx, completed) = mpsc::channel();
        session.on_draw_complete(move |collection| {
            let _ = tx.send(collection.clone());
        });
        Self {
            session,
            modes,
            completed,
        }
    }

    pub fn session(&self) -> &AnnotationSession {
        &self.session
    }

    /// Processes commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> AppResult<()> {
        self.flush_events(output)?;
        for line in input.lines() {
            let line = line?;
            let flow = match parse_command(&line) {
                Ok(None) => ShellFlow::Continue,
                Ok(Some(command)) => self.execute(command, output)?,
                Err(err) => {
                    tracing::debug!(%err, line = line.trim(), "rejected shell command");
                    writeln!(output, "error: {err}")?;
                    ShellFlow::Continue
                }
            };
            self.flush_events(output)?;
            if flow == ShellFlow::Quit {
                break;
            }
        }
        output.flush()?;
        Ok(())
    }

    pub fn close(self) -> FeatureCollection {
        self.session.close()
    }

    fn execute<W: Write>(&mut self, command: Command, output: &mut W) -> AppResult<ShellFlow> {
        match command {
            Command::Draw { kind, freehand } => self.session.set_draw_mode(kind, freehand),
            Command::Edit => self.session.enter_edit_mode(),
            Command::Delete => self.session.enter_delete_mode(),
            Command::Undo => {
                if !self.session.undo_last_point() {
                    tracing::debug!("nothing to undo");
                }
            }
            Command::Pointer(event) => {
                self.session.handle_pointer(event);
            }
            Command::Zoom(ZoomDirection::In) => self.session.zoom_in(),
            Command::Zoom(ZoomDirection::Out) => self.session.zoom_out(),
            Command::Pan { delta_x, delta_y } => self.session.pan_by(delta_x, delta_y),
            Command::Export => {
                let collection = self.session.serialize_annotations();
                writeln!(output, "{}", collection.to_json_pretty()?)?;
            }
            Command::Mode => writeln!(output, "mode: {}", self.session.mode())?,
            Command::Quit => return Ok(ShellFlow::Quit),
        }
        Ok(ShellFlow::Continue)
    }

    fn flush_events<W: Write>(&mut self, output: &mut W) -> AppResult<()> {
        for mode in self.modes.drain() {
            writeln!(output, "mode: {mode}")?;
        }
        for collection in self.completed.try_iter() {
            writeln!(output, "{}", collection.to_json()?)?;
        }
        Ok(())
    }
}
