//! Command handlers for the garage.
//!
//! Every user action is an [`Action`] handed to [`Garage::dispatch`]. Handlers
//! read the vehicle list from storage, change it, write it back whole, and
//! return [`Instruction`]s describing what the user interface should show.
//! Nothing in here touches a terminal; the only interaction point is the
//! [`Confirm`] port used before a check-out.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::format::{elapsed_millis, format_period, DisplayZone};
use crate::render::{self, TableRow};
use crate::report::HistoryReport;
use crate::storage::{GarageStorage, KeyValueStore};
use crate::vehicle::{LicencePattern, Vehicle};

/// Values submitted through the check-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckInForm {
    /// Owner field.
    pub owner: String,
    /// Vehicle name field.
    pub name: String,
    /// Licence plate field.
    pub licence: String,
}

impl CheckInForm {
    /// Build a form from its three field values.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        licence: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            licence: licence.into(),
        }
    }
}

/// The values of a displayed row whose check-out action was triggered.
///
/// `checked_in_at` comes from the row metadata, not from the formatted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutRequest {
    /// Vehicle name shown in the row.
    pub name: String,
    /// Licence plate shown in the row.
    pub licence: String,
    /// Owner shown in the row.
    pub owner: String,
    /// Raw check-in instant attached to the row.
    pub checked_in_at: DateTime<Utc>,
}

/// Why an action was refused without changing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Vehicle name or licence plate left empty.
    MissingFields,
    /// Licence plate does not match the plate pattern.
    InvalidLicence {
        /// The configured pattern, when it is not the stock `AAA-1234` one.
        pattern: Option<String>,
    },
    /// Owner left empty.
    OwnerRequired,
    /// No parked vehicle carries this licence plate.
    NotParked {
        /// The licence that was looked up.
        licence: String,
    },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "Name and licence are required."),
            Self::InvalidLicence { pattern: None } => {
                write!(f, "Invalid licence plate. The format must be AAA-1234.")
            }
            Self::InvalidLicence {
                pattern: Some(pattern),
            } => write!(f, "Invalid licence plate. It must match {pattern}."),
            Self::OwnerRequired => write!(f, "Owner is required."),
            Self::NotParked { licence } => {
                write!(f, "No parked vehicle with licence {licence}.")
            }
        }
    }
}

/// A message to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The action was refused.
    Rejected(Rejection),
    /// A vehicle was checked in.
    CheckedIn {
        /// Vehicle name.
        name: String,
        /// Licence plate.
        licence: String,
    },
    /// Vehicles with a licence were checked out.
    CheckedOut {
        /// Licence plate.
        licence: String,
        /// Formatted parked time.
        period: String,
        /// How many parked records carried the licence.
        matched: usize,
    },
    /// The user declined the check-out confirmation.
    CheckOutCancelled {
        /// Licence plate.
        licence: String,
    },
    /// History was requested but nothing has been checked out.
    NoHistory,
    /// The whole stored collection was discarded.
    HistoryCleared,
    /// The operator name was remembered.
    OperatorSaved {
        /// The stored name.
        name: String,
    },
    /// The operator name was forgotten.
    OperatorCleared,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(rejection) => write!(f, "{rejection}"),
            Self::CheckedIn { name, licence } => write!(f, "Checked in {name} ({licence})."),
            Self::CheckedOut {
                licence, period, ..
            } => write!(f, "Checked out {licence} after {period}."),
            Self::CheckOutCancelled { licence } => write!(f, "Check-out of {licence} cancelled."),
            Self::NoHistory => write!(f, "There is no vehicle history."),
            Self::HistoryCleared => write!(f, "Vehicle history cleared successfully!"),
            Self::OperatorSaved { name } => write!(f, "Operator set to {name}."),
            Self::OperatorCleared => write!(f, "Operator cleared."),
        }
    }
}

/// A change the user interface should make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Remove every row from the active table.
    ClearTable,
    /// Add a row to the active table.
    AppendRow(TableRow),
    /// Empty the check-in form fields.
    ClearForm,
    /// Put the remembered operator name into the owner field.
    PrefillOwner(String),
    /// Show a message.
    Notice(Notice),
    /// Open a history report in a separate view.
    OpenHistory(HistoryReport),
}

impl Instruction {
    fn rejected(rejection: Rejection) -> Self {
        Self::Notice(Notice::Rejected(rejection))
    }
}

/// Asks the user a yes/no question and blocks until answered.
pub trait Confirm {
    /// Return `true` if the user accepts.
    fn confirm(&mut self, message: &str) -> bool;
}

/// A [`Confirm`] that always gives the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, message: &str) -> bool {
        debug!(answer = self.0, "Auto-answering confirmation: {}", message);
        self.0
    }
}

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Redraw the active table and prefill the owner field.
    Refresh,
    /// Submit the check-in form.
    CheckIn(CheckInForm),
    /// Trigger the check-out action of a row.
    CheckOut(CheckOutRequest),
    /// Open the history view.
    ShowHistory,
    /// Discard the whole stored collection.
    ClearHistory,
    /// Edit the owner field, which remembers the operator name.
    SetOperator(String),
}

/// Build the check-out confirmation message.
#[must_use]
pub fn check_out_prompt(name: &str, licence: &str, period: &str) -> String {
    format!(
        "The vehicle {name} with licence {licence} stayed parked for {period}.\n\nCheck it out?"
    )
}

/// The garage application over a key-value store.
#[derive(Debug)]
pub struct Garage<S> {
    storage: GarageStorage<S>,
    licence_pattern: LicencePattern,
    zone: DisplayZone,
}

impl<S: KeyValueStore> Garage<S> {
    /// Create a garage with the default plate pattern and local display time.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            storage: GarageStorage::new(store),
            licence_pattern: LicencePattern::default(),
            zone: DisplayZone::default(),
        }
    }

    /// Create a garage using the plate pattern and display zone from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured plate pattern does not compile.
    pub fn from_config(store: S, config: &Config) -> Result<Self> {
        Ok(Self::new(store)
            .with_licence_pattern(LicencePattern::new(&config.checkin.licence_pattern)?)
            .with_display_zone(config.display.timezone))
    }

    /// Use a different licence plate pattern.
    #[must_use]
    pub fn with_licence_pattern(mut self, pattern: LicencePattern) -> Self {
        self.licence_pattern = pattern;
        self
    }

    /// Display check-in times in `zone`.
    #[must_use]
    pub fn with_display_zone(mut self, zone: DisplayZone) -> Self {
        self.zone = zone;
        self
    }

    /// Borrow the storage accessor.
    #[must_use]
    pub fn storage(&self) -> &GarageStorage<S> {
        &self.storage
    }

    /// Run `action` at the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails. Validation problems are not errors;
    /// they come back as [`Notice::Rejected`].
    pub fn dispatch(
        &mut self,
        action: Action,
        confirm: &mut dyn Confirm,
    ) -> Result<Vec<Instruction>> {
        self.dispatch_at(action, Utc::now(), confirm)
    }

    /// Run `action` as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn dispatch_at(
        &mut self,
        action: Action,
        now: DateTime<Utc>,
        confirm: &mut dyn Confirm,
    ) -> Result<Vec<Instruction>> {
        match action {
            Action::Refresh => self.refresh(),
            Action::CheckIn(form) => self.check_in(form, now),
            Action::CheckOut(request) => self.check_out(&request, now, confirm),
            Action::ShowHistory => self.show_history(),
            Action::ClearHistory => self.clear_history(),
            Action::SetOperator(name) => self.set_operator(&name),
        }
    }

    /// Redraw the active table and prefill the owner field.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn refresh(&self) -> Result<Vec<Instruction>> {
        let mut instructions = render::render(&self.storage.load_vehicles()?, self.zone);
        if let Some(name) = self.storage.operator_name()? {
            instructions.push(Instruction::PrefillOwner(name));
        }
        Ok(instructions)
    }

    /// The rows of the active table.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn active_rows(&self) -> Result<Vec<TableRow>> {
        Ok(render::active_rows(&self.storage.load_vehicles()?, self.zone))
    }

    /// The first active row showing `licence`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn find_active_row(&self, licence: &str) -> Result<Option<TableRow>> {
        Ok(self
            .active_rows()?
            .into_iter()
            .find(|row| row.licence == licence))
    }

    /// Validate the check-in form and park a new vehicle.
    ///
    /// Checks run in order and the first failure wins: name and licence
    /// present, licence matches the plate pattern, owner present.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn check_in(&mut self, form: CheckInForm, now: DateTime<Utc>) -> Result<Vec<Instruction>> {
        if form.name.is_empty() || form.licence.is_empty() {
            return Ok(vec![Instruction::rejected(Rejection::MissingFields)]);
        }
        if !self.licence_pattern.is_valid(&form.licence) {
            debug!("Rejected licence {:?}", form.licence);
            let pattern = (!self.licence_pattern.is_default())
                .then(|| self.licence_pattern.as_str().to_string());
            return Ok(vec![Instruction::rejected(Rejection::InvalidLicence {
                pattern,
            })]);
        }
        if form.owner.is_empty() {
            return Ok(vec![Instruction::rejected(Rejection::OwnerRequired)]);
        }

        let vehicle = Vehicle::new(form.name, form.licence, form.owner, now);
        let mut vehicles = self.storage.load_vehicles()?;
        vehicles.push(vehicle.clone());
        self.storage.save_vehicles(&vehicles)?;
        info!("Checked in {} ({})", vehicle.name, vehicle.licence);

        Ok(vec![
            Instruction::AppendRow(TableRow::from_vehicle(&vehicle, self.zone)),
            Instruction::ClearForm,
            Instruction::Notice(Notice::CheckedIn {
                name: vehicle.name,
                licence: vehicle.licence,
            }),
        ])
    }

    /// Confirm and check out the vehicle shown in a row.
    ///
    /// Every record carrying the row's licence is marked checked out, not just
    /// the one the row came from.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn check_out(
        &mut self,
        request: &CheckOutRequest,
        now: DateTime<Utc>,
        confirm: &mut dyn Confirm,
    ) -> Result<Vec<Instruction>> {
        let period = format_period(elapsed_millis(request.checked_in_at, now));
        let prompt = check_out_prompt(&request.name, &request.licence, &period);
        if !confirm.confirm(&prompt) {
            debug!("Check-out of {} declined", request.licence);
            return Ok(vec![Instruction::Notice(Notice::CheckOutCancelled {
                licence: request.licence.clone(),
            })]);
        }

        let mut vehicles = self.storage.load_vehicles()?;
        let mut matched = 0;
        for vehicle in vehicles.iter_mut().filter(|v| v.licence == request.licence) {
            if vehicle.is_parked() {
                matched += 1;
            }
            vehicle.check_out();
        }

        if matched == 0 {
            return Ok(vec![Instruction::rejected(Rejection::NotParked {
                licence: request.licence.clone(),
            })]);
        }
        if matched > 1 {
            warn!(
                "Licence {} matched {} parked vehicles; checking out all of them",
                request.licence, matched
            );
        }

        self.storage.save_vehicles(&vehicles)?;
        info!("Checked out {} after {}", request.licence, period);

        let mut instructions = render::render(&vehicles, self.zone);
        instructions.push(Instruction::Notice(Notice::CheckedOut {
            licence: request.licence.clone(),
            period,
            matched,
        }));
        Ok(instructions)
    }

    /// Snapshot of every checked-out vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn history_report(&self) -> Result<HistoryReport> {
        Ok(HistoryReport::from_vehicles(
            &self.storage.load_vehicles()?,
            self.zone,
        ))
    }

    /// Open the history view, or say there is nothing to show.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn show_history(&self) -> Result<Vec<Instruction>> {
        let report = self.history_report()?;
        if report.is_empty() {
            return Ok(vec![Instruction::Notice(Notice::NoHistory)]);
        }
        debug!("Opening history with {} entries", report.len());
        Ok(vec![Instruction::OpenHistory(report)])
    }

    /// Discard the whole stored collection, parked vehicles included.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn clear_history(&mut self) -> Result<Vec<Instruction>> {
        self.storage.clear()?;
        info!("Cleared vehicle history");
        Ok(vec![
            Instruction::ClearTable,
            Instruction::Notice(Notice::HistoryCleared),
        ])
    }

    /// Remember `name` as the operator. An empty name forgets it.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn set_operator(&mut self, name: &str) -> Result<Vec<Instruction>> {
        self.storage.set_operator_name(name)?;
        if name.is_empty() {
            Ok(vec![Instruction::Notice(Notice::OperatorCleared)])
        } else {
            Ok(vec![
                Instruction::PrefillOwner(name.to_string()),
                Instruction::Notice(Notice::OperatorSaved {
                    name: name.to_string(),
                }),
            ])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap()
    }

    fn create_test_garage() -> Garage<MemoryStore> {
        crate::logging::init_test_logging();
        Garage::new(MemoryStore::new()).with_display_zone(DisplayZone::Utc)
    }

    fn park(garage: &mut Garage<MemoryStore>, name: &str, licence: &str) {
        let out = garage
            .check_in(CheckInForm::new("Owner", name, licence), now())
            .unwrap();
        assert!(matches!(out[0], Instruction::AppendRow(_)));
    }

    /// Records every prompt it sees.
    struct Recorder {
        answer: bool,
        prompts: Vec<String>,
    }

    impl Confirm for Recorder {
        fn confirm(&mut self, message: &str) -> bool {
            self.prompts.push(message.to_string());
            self.answer
        }
    }

    #[test]
    fn test_check_in_success() {
        let mut garage = create_test_garage();
        let out = garage
            .check_in(CheckInForm::new("Ana", "Civic", "ABC-1234"), now())
            .unwrap();

        let Instruction::AppendRow(row) = &out[0] else {
            panic!("expected a row, got {out:?}");
        };
        assert_eq!(row.name, "Civic");
        assert_eq!(row.licence, "ABC-1234");
        assert_eq!(row.owner, "Ana");
        assert_eq!(row.checked_in, "01/07/2024 10:00");
        assert_eq!(row.checked_in_at, now());
        assert_eq!(out[1], Instruction::ClearForm);

        let stored = garage.storage().load_vehicles().unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].is_parked());
    }

    #[test]
    fn test_check_in_missing_fields() {
        let mut garage = create_test_garage();
        for form in [
            CheckInForm::new("Ana", "", "ABC-1234"),
            CheckInForm::new("Ana", "Civic", ""),
            CheckInForm::new("", "", ""),
        ] {
            let out = garage.check_in(form, now()).unwrap();
            assert_eq!(out, vec![Instruction::rejected(Rejection::MissingFields)]);
        }
        assert!(garage.storage().load_vehicles().unwrap().is_empty());
    }

    #[test]
    fn test_check_in_invalid_licence() {
        let mut garage = create_test_garage();
        for licence in ["abc-1234", "AAA-12345", "AAA1234"] {
            let out = garage
                .check_in(CheckInForm::new("Ana", "Civic", licence), now())
                .unwrap();
            assert_eq!(
                out,
                vec![Instruction::rejected(Rejection::InvalidLicence { pattern: None })]
            );
        }
        assert!(garage.storage().load_vehicles().unwrap().is_empty());
    }

    #[test]
    fn test_check_in_validation_order() {
        let mut garage = create_test_garage();

        // Bad licence is reported before a missing owner
        let out = garage
            .check_in(CheckInForm::new("", "Civic", "bad"), now())
            .unwrap();
        assert_eq!(
            out,
            vec![Instruction::rejected(Rejection::InvalidLicence { pattern: None })]
        );

        let out = garage
            .check_in(CheckInForm::new("", "Civic", "ABC-1234"), now())
            .unwrap();
        assert_eq!(out, vec![Instruction::rejected(Rejection::OwnerRequired)]);
    }

    #[test]
    fn test_check_in_custom_pattern() {
        let mut garage = create_test_garage()
            .with_licence_pattern(LicencePattern::new(r"^[A-Z]{3}\d[A-Z]\d{2}$").unwrap());
        let out = garage
            .check_in(CheckInForm::new("Ana", "Civic", "BRA2E19"), now())
            .unwrap();
        assert!(matches!(out[0], Instruction::AppendRow(_)));
    }

    #[test]
    fn test_custom_pattern_rejection_names_pattern() {
        let mut garage = create_test_garage()
            .with_licence_pattern(LicencePattern::new(r"^[A-Z]{3}\d[A-Z]\d{2}$").unwrap());
        let out = garage
            .check_in(CheckInForm::new("Ana", "Civic", "ABC-1234"), now())
            .unwrap();

        let [Instruction::Notice(notice)] = out.as_slice() else {
            panic!("expected a rejection, got {out:?}");
        };
        assert_eq!(
            notice.to_string(),
            r"Invalid licence plate. It must match ^[A-Z]{3}\d[A-Z]\d{2}$."
        );
        assert!(garage.storage().load_vehicles().unwrap().is_empty());
    }

    #[test]
    fn test_check_out_confirmed() {
        let mut garage = create_test_garage();
        park(&mut garage, "Civic", "ABC-1234");
        park(&mut garage, "Golf", "DEF-5678");

        let row = garage.find_active_row("ABC-1234").unwrap().unwrap();
        let mut confirm = Recorder {
            answer: true,
            prompts: Vec::new(),
        };
        let later = now() + Duration::milliseconds(125_000);
        let out = garage
            .check_out(&row.check_out_request(), later, &mut confirm)
            .unwrap();

        assert_eq!(confirm.prompts.len(), 1);
        assert!(confirm.prompts[0].contains("Civic"));
        assert!(confirm.prompts[0].contains("ABC-1234"));
        assert!(confirm.prompts[0].contains("2m e 5s"));

        assert_eq!(out[0], Instruction::ClearTable);
        let rows: Vec<&TableRow> = out
            .iter()
            .filter_map(|i| match i {
                Instruction::AppendRow(row) => Some(row),
                _ => None,
            })
            .collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].licence, "DEF-5678");
        assert_eq!(
            out.last(),
            Some(&Instruction::Notice(Notice::CheckedOut {
                licence: "ABC-1234".to_string(),
                period: "2m e 5s".to_string(),
                matched: 1,
            }))
        );

        let stored = garage.storage().load_vehicles().unwrap();
        assert!(stored[0].deleted);
        assert!(!stored[1].deleted);
    }

    #[test]
    fn test_check_out_declined() {
        let mut garage = create_test_garage();
        park(&mut garage, "Civic", "ABC-1234");
        let before = garage.storage().load_vehicles().unwrap();

        let row = garage.find_active_row("ABC-1234").unwrap().unwrap();
        let out = garage
            .check_out(&row.check_out_request(), now(), &mut FixedAnswer(false))
            .unwrap();

        assert_eq!(
            out,
            vec![Instruction::Notice(Notice::CheckOutCancelled {
                licence: "ABC-1234".to_string()
            })]
        );
        assert_eq!(garage.storage().load_vehicles().unwrap(), before);
    }

    #[test]
    fn test_check_out_marks_every_matching_licence() {
        let mut garage = create_test_garage();
        park(&mut garage, "Civic", "ABC-1234");
        park(&mut garage, "Civic again", "ABC-1234");
        park(&mut garage, "Golf", "DEF-5678");

        let row = garage.find_active_row("ABC-1234").unwrap().unwrap();
        let out = garage
            .check_out(&row.check_out_request(), now(), &mut FixedAnswer(true))
            .unwrap();

        assert!(out.contains(&Instruction::Notice(Notice::CheckedOut {
            licence: "ABC-1234".to_string(),
            period: "0m e 0s".to_string(),
            matched: 2,
        })));
        let active = garage.active_rows().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].licence, "DEF-5678");
    }

    #[test]
    fn test_check_out_stale_row() {
        let mut garage = create_test_garage();
        park(&mut garage, "Civic", "ABC-1234");
        let row = garage.find_active_row("ABC-1234").unwrap().unwrap();
        garage.clear_history().unwrap();

        let out = garage
            .check_out(&row.check_out_request(), now(), &mut FixedAnswer(true))
            .unwrap();
        assert_eq!(
            out,
            vec![Instruction::rejected(Rejection::NotParked {
                licence: "ABC-1234".to_string()
            })]
        );
        assert!(garage.storage().load_vehicles().unwrap().is_empty());
    }

    #[test]
    fn test_show_history_empty() {
        let garage = create_test_garage();
        assert_eq!(
            garage.show_history().unwrap(),
            vec![Instruction::Notice(Notice::NoHistory)]
        );
    }

    #[test]
    fn test_show_history_lists_checked_out_only() {
        let mut garage = create_test_garage();
        park(&mut garage, "Civic", "ABC-1234");
        park(&mut garage, "Golf", "DEF-5678");
        let row = garage.find_active_row("DEF-5678").unwrap().unwrap();
        garage
            .check_out(&row.check_out_request(), now(), &mut FixedAnswer(true))
            .unwrap();

        let out = garage.show_history().unwrap();
        let [Instruction::OpenHistory(report)] = out.as_slice() else {
            panic!("expected a history report, got {out:?}");
        };
        assert_eq!(report.len(), 1);
        assert_eq!(report.entries()[0].licence, "DEF-5678");
    }

    #[test]
    fn test_clear_history_discards_everything() {
        let mut garage = create_test_garage();
        park(&mut garage, "Civic", "ABC-1234");
        park(&mut garage, "Golf", "DEF-5678");

        let out = garage.clear_history().unwrap();
        assert_eq!(
            out,
            vec![
                Instruction::ClearTable,
                Instruction::Notice(Notice::HistoryCleared)
            ]
        );
        assert!(garage.active_rows().unwrap().is_empty());
        assert_eq!(
            garage.show_history().unwrap(),
            vec![Instruction::Notice(Notice::NoHistory)]
        );
    }

    #[test]
    fn test_refresh_prefills_operator() {
        let mut garage = create_test_garage();
        park(&mut garage, "Civic", "ABC-1234");
        garage.set_operator("Joana").unwrap();

        let out = garage.refresh().unwrap();
        assert_eq!(out[0], Instruction::ClearTable);
        assert!(matches!(out[1], Instruction::AppendRow(_)));
        assert_eq!(out[2], Instruction::PrefillOwner("Joana".to_string()));
    }

    #[test]
    fn test_set_operator_empty_clears() {
        let mut garage = create_test_garage();
        garage.set_operator("Joana").unwrap();
        let out = garage.set_operator("").unwrap();

        assert_eq!(out, vec![Instruction::Notice(Notice::OperatorCleared)]);
        assert!(garage.storage().operator_name().unwrap().is_none());
    }

    #[test]
    fn test_dispatch_routes_actions() {
        let mut garage = create_test_garage();
        let mut confirm = FixedAnswer(true);

        let out = garage
            .dispatch_at(
                Action::CheckIn(CheckInForm::new("Ana", "Civic", "ABC-1234")),
                now(),
                &mut confirm,
            )
            .unwrap();
        assert!(matches!(out[0], Instruction::AppendRow(_)));

        let out = garage
            .dispatch_at(Action::ShowHistory, now(), &mut confirm)
            .unwrap();
        assert_eq!(out, vec![Instruction::Notice(Notice::NoHistory)]);

        let out = garage
            .dispatch_at(Action::ClearHistory, now(), &mut confirm)
            .unwrap();
        assert_eq!(out[0], Instruction::ClearTable);
    }

    #[test]
    fn test_from_config_rejects_bad_pattern() {
        let mut config = Config::default();
        config.checkin.licence_pattern = "[bad".to_string();
        assert!(Garage::from_config(MemoryStore::new(), &config).is_err());
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(
            Notice::Rejected(Rejection::MissingFields).to_string(),
            "Name and licence are required."
        );
        assert_eq!(
            Notice::Rejected(Rejection::InvalidLicence { pattern: None }).to_string(),
            "Invalid licence plate. The format must be AAA-1234."
        );
        assert_eq!(Notice::NoHistory.to_string(), "There is no vehicle history.");
        assert_eq!(
            Notice::HistoryCleared.to_string(),
            "Vehicle history cleared successfully!"
        );
    }

    #[test]
    fn test_check_out_prompt() {
        let prompt = check_out_prompt("Civic", "ABC-1234", "2m e 5s");
        assert_eq!(
            prompt,
            "The vehicle Civic with licence ABC-1234 stayed parked for 2m e 5s.\n\nCheck it out?"
        );
    }
}
