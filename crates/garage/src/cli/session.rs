//! One CLI invocation against a garage.
//!
//! Each command first redraws the active table into the surface, the same
//! as opening the garage screen, and then acts on what is displayed.

use std::io::Write;

use tracing::debug;

use crate::app::{Action, CheckInForm, Confirm, FixedAnswer, Garage, Instruction, Notice, Rejection};
use crate::error::Result;
use crate::render::TerminalSurface;
use crate::storage::KeyValueStore;

use super::commands::{CheckInCommand, CheckOutCommand, OperatorAction};

/// A garage wired to a terminal surface.
#[derive(Debug)]
pub struct Session<S, W> {
    garage: Garage<S>,
    surface: TerminalSurface<W>,
    confirm_check_out: bool,
}

impl<S: KeyValueStore, W: Write> Session<S, W> {
    /// Create a session. Check-outs ask for confirmation by default.
    pub fn new(garage: Garage<S>, surface: TerminalSurface<W>) -> Self {
        Self {
            garage,
            surface,
            confirm_check_out: true,
        }
    }

    /// Whether check-outs ask for confirmation.
    #[must_use]
    pub fn with_check_out_confirmation(mut self, confirm: bool) -> Self {
        self.confirm_check_out = confirm;
        self
    }

    /// Borrow the garage.
    #[must_use]
    pub fn garage(&self) -> &Garage<S> {
        &self.garage
    }

    /// Borrow the surface.
    #[must_use]
    pub fn surface(&self) -> &TerminalSurface<W> {
        &self.surface
    }

    /// Consume the session and return its surface.
    pub fn into_surface(self) -> TerminalSurface<W> {
        self.surface
    }

    fn refresh(&mut self) -> Result<()> {
        let instructions = self.garage.refresh()?;
        self.surface.apply(instructions)
    }

    /// Print the active table.
    ///
    /// # Errors
    ///
    /// Returns an error if storage or output fails.
    pub fn list(&mut self) -> Result<()> {
        self.refresh()?;
        self.surface.print_table()
    }

    /// Fill in the check-in form from `cmd` and submit it.
    ///
    /// Giving an owner is the same as typing into the owner field: the name
    /// is remembered for next time. Without one, the remembered name is used.
    ///
    /// # Errors
    ///
    /// Returns an error if storage or output fails.
    pub fn check_in(&mut self, cmd: &CheckInCommand) -> Result<()> {
        self.refresh()?;

        if let Some(owner) = &cmd.owner {
            // Only the field echo is shown, not the operator notice
            self.garage.set_operator(owner)?;
            self.surface
                .apply(vec![Instruction::PrefillOwner(owner.clone())])?;
        }

        let form = CheckInForm::new(
            self.surface.owner_field().unwrap_or_default(),
            cmd.name.as_str(),
            cmd.licence.as_str(),
        );
        let instructions = self
            .garage
            .dispatch(Action::CheckIn(form), &mut FixedAnswer(true))?;
        let accepted = instructions
            .iter()
            .any(|i| matches!(i, Instruction::AppendRow(_)));

        self.surface.apply(instructions)?;
        if accepted {
            self.surface.print_table()?;
        }
        Ok(())
    }

    /// Trigger the check-out action of the displayed row for `cmd.licence`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage or output fails.
    pub fn check_out(&mut self, cmd: &CheckOutCommand, confirm: &mut dyn Confirm) -> Result<()> {
        self.refresh()?;

        let Some(row) = self.surface.find_row(&cmd.licence).cloned() else {
            debug!("No displayed row for {}", cmd.licence);
            return self.surface.apply(vec![Instruction::Notice(Notice::Rejected(
                Rejection::NotParked {
                    licence: cmd.licence.clone(),
                },
            ))]);
        };

        let mut auto = FixedAnswer(true);
        let confirm: &mut dyn Confirm = if cmd.yes || !self.confirm_check_out {
            &mut auto
        } else {
            confirm
        };

        let instructions = self
            .garage
            .dispatch(Action::CheckOut(row.check_out_request()), confirm)?;
        let redrawn = instructions.contains(&Instruction::ClearTable);

        self.surface.apply(instructions)?;
        if redrawn {
            self.surface.print_table()?;
        }
        Ok(())
    }

    /// Open the history view.
    ///
    /// # Errors
    ///
    /// Returns an error if storage or output fails.
    pub fn history(&mut self) -> Result<()> {
        let instructions = self.garage.dispatch(Action::ShowHistory, &mut FixedAnswer(true))?;
        self.surface.apply(instructions)
    }

    /// Discard every stored vehicle after confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if storage or output fails.
    pub fn clear_history(&mut self, yes: bool, confirm: &mut dyn Confirm) -> Result<()> {
        let stored = self.garage.storage().load_vehicles()?.len();
        let message = format!("Discard all {stored} stored vehicles, parked ones included?");
        if !yes && !confirm.confirm(&message) {
            return self.surface.write_message("History kept.");
        }

        let instructions = self
            .garage
            .dispatch(Action::ClearHistory, &mut FixedAnswer(true))?;
        self.surface.apply(instructions)
    }

    /// Show or change the remembered operator name.
    ///
    /// # Errors
    ///
    /// Returns an error if storage or output fails.
    pub fn operator(&mut self, action: Option<&OperatorAction>) -> Result<()> {
        let name = match action {
            None => {
                return match self.garage.storage().operator_name()? {
                    Some(name) => self.surface.write_message(&name),
                    None => self.surface.write_message("No operator set."),
                };
            }
            Some(OperatorAction::Set { name }) => name.as_str(),
            Some(OperatorAction::Clear) => "",
        };

        let instructions = self
            .garage
            .dispatch(Action::SetOperator(name.to_string()), &mut FixedAnswer(true))?;
        self.surface.apply(instructions)
    }
}
