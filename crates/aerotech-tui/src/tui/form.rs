// Create/edit forms, text entry and y/n confirmation.
//
// A `Form` is a list of labelled fields with one focused at a time. Text
// fields take typed characters; choice fields cycle through fixed options
// with Left/Right. `submit` validates the values and builds the command the
// orchestrator should run.

use aerotech_core::models::resources::{
    split_list, Part, Personnel, ResourceKind, ResourceRecord, Tool, ToolStatus,
};
use aerotech_core::models::work_package::{WorkPackage, WorkPackagePatch, WorkPackageStatus};
use aerotech_core::protocol::{SprintStartForm, UserCommand};

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        ChoiceOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text,
    Choice(Vec<ChoiceOption>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub input: FieldInput,
}

impl FormField {
    fn text(key: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        FormField {
            key,
            label,
            value: value.into(),
            input: FieldInput::Text,
        }
    }

    fn choice(
        key: &'static str,
        label: &'static str,
        value: impl Into<String>,
        options: Vec<ChoiceOption>,
    ) -> Self {
        FormField {
            key,
            label,
            value: value.into(),
            input: FieldInput::Choice(options),
        }
    }

    /// What the form shows for this field: the option label for choices.
    pub fn display_value(&self) -> &str {
        match &self.input {
            FieldInput::Text => &self.value,
            FieldInput::Choice(options) => options
                .iter()
                .find(|o| o.value == self.value)
                .map_or(self.value.as_str(), |o| o.label.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// What a submitted form turns into.
#[derive(Debug, Clone, PartialEq)]
pub enum FormTarget {
    /// `None` creates a new package.
    WorkPackage(Option<Box<WorkPackage>>),
    Resource {
        original: Box<ResourceRecord>,
        is_new: bool,
    },
    SprintStart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub title: String,
    pub target: FormTarget,
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl Form {
    /// New or edit form for a work package. Assignee options are the
    /// personnel with a linked user account.
    pub fn work_package(existing: Option<&WorkPackage>, assignees: &[Personnel]) -> Form {
        let wp = existing.cloned().unwrap_or_default();

        let mut assignee_options = vec![ChoiceOption::new("", "Unassigned")];
        assignee_options.extend(assignees.iter().filter_map(|p| {
            let user_id = p.linked_user_id.as_deref().filter(|id| !id.is_empty())?;
            Some(ChoiceOption::new(user_id, format!("{} ({})", p.name, p.role)))
        }));
        let assigned = wp.assigned_to.clone().unwrap_or_default();
        if !assignee_options.iter().any(|o| o.value == assigned) {
            assignee_options.push(ChoiceOption::new(assigned.clone(), assigned.clone()));
        }

        let status_options = WorkPackageStatus::BOARD
            .iter()
            .map(|s| ChoiceOption::new(s.as_str(), s.label()))
            .collect();

        let mut fields = Vec::new();
        if existing.is_none() {
            fields.push(FormField::text("id", "ID (blank = generate)", ""));
        }
        fields.extend([
            FormField::text("title", "Title", wp.title.clone()),
            FormField::text("aircraft", "Aircraft", wp.aircraft.clone().unwrap_or_default()),
            FormField::text("ata", "ATA", wp.ata.clone().unwrap_or_default()),
            FormField::choice("status", "Status", wp.status.as_str(), status_options),
            FormField::choice("assigned_to", "Assignee", assigned, assignee_options),
            FormField::text("due_date", "Due date", wp.due_date.clone().unwrap_or_default()),
        ]);

        let title = match existing {
            Some(wp) => format!("Edit {}", wp.key()),
            None => "New work package".to_string(),
        };
        Form {
            title,
            target: FormTarget::WorkPackage(existing.map(|wp| Box::new(wp.clone()))),
            fields,
            focus: 0,
        }
    }

    /// New (`existing = None`) or edit form for a resource.
    pub fn resource(kind: ResourceKind, existing: Option<&ResourceRecord>) -> Form {
        let is_new = existing.is_none();
        let original = existing.cloned().unwrap_or_else(|| match kind {
            ResourceKind::Personnel => ResourceRecord::Personnel(Personnel {
                shift: "day".into(),
                availability: "available".into(),
                ..Default::default()
            }),
            ResourceKind::Tools => ResourceRecord::Tool(Tool::default()),
            ResourceKind::Parts => ResourceRecord::Part(Part::default()),
        });

        let mut fields = Vec::new();
        if is_new {
            fields.push(FormField::text("id", "ID (blank = generate)", ""));
        }
        match &original {
            ResourceRecord::Personnel(p) => fields.extend([
                FormField::text("name", "Name", p.name.clone()),
                FormField::text("role", "Role", p.role.clone()),
                FormField::text("ratings", "Ratings (comma list)", p.ratings.join(", ")),
                FormField::text(
                    "specializations",
                    "Specializations (comma list)",
                    p.specializations.join(", "),
                ),
                FormField::choice(
                    "shift",
                    "Shift",
                    p.shift.clone(),
                    vec![ChoiceOption::new("day", "Day"), ChoiceOption::new("night", "Night")],
                ),
                FormField::choice(
                    "availability",
                    "Availability",
                    p.availability.clone(),
                    vec![
                        ChoiceOption::new("available", "Available"),
                        ChoiceOption::new("busy", "Busy"),
                    ],
                ),
                FormField::text(
                    "linked_user_id",
                    "Linked user ID",
                    p.linked_user_id.clone().unwrap_or_default(),
                ),
            ]),
            ResourceRecord::Tool(t) => fields.extend([
                FormField::text("name", "Name", t.name.clone()),
                FormField::text("category", "Category", t.category.clone()),
                FormField::text("location", "Location", t.location.clone()),
                FormField::text(
                    "calibration_due",
                    "Calibration due",
                    t.calibration_due.clone().unwrap_or_default(),
                ),
            ]),
            ResourceRecord::Part(p) => fields.extend([
                FormField::text("part_no", "Part number", p.part_no.clone()),
                FormField::text("name", "Name", p.name.clone()),
                FormField::text("ata_chapter", "ATA chapter", p.ata_chapter.clone()),
                FormField::text("stock_level", "Stock level", p.stock_level.to_string()),
                FormField::text("location", "Location", p.location.clone()),
                FormField::text("lead_time_days", "Lead time (days)", p.lead_time_days.to_string()),
            ]),
        }

        let title = if is_new {
            format!("New {}", singular(kind))
        } else {
            format!("Edit {}", original.id())
        };
        Form {
            title,
            target: FormTarget::Resource {
                original: Box::new(original),
                is_new,
            },
            fields,
            focus: 0,
        }
    }

    /// Sprint start form. A blank duration uses the configured default.
    pub fn sprint_start() -> Form {
        Form {
            title: "Start sprint".into(),
            target: FormTarget::SprintStart,
            fields: vec![
                FormField::text("name", "Name", ""),
                FormField::text("goal", "Goal", ""),
                FormField::text("start_date", "Start date", ""),
                FormField::text("end_date", "End date", ""),
                FormField::text("duration_days", "Duration (days)", ""),
            ],
            focus: 0,
        }
    }

    // --- Editing ---

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn insert(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.input == FieldInput::Text {
                field.value.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.input == FieldInput::Text {
                field.value.pop();
            }
        }
    }

    /// Step the focused choice field forward or back, wrapping.
    pub fn cycle(&mut self, forward: bool) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        let FieldInput::Choice(options) = &field.input else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let len = options.len();
        let current = options.iter().position(|o| o.value == field.value);
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        };
        field.value = options[next].value.clone();
    }

    /// Trimmed value of the field with `key`, empty if absent.
    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map_or("", |f| f.value.trim())
    }

    fn optional(&self, key: &str) -> Option<String> {
        let v = self.value(key);
        (!v.is_empty()).then(|| v.to_string())
    }

    fn required(&self, key: &str, label: &str) -> Result<String, String> {
        self.optional(key).ok_or_else(|| format!("{label} is required"))
    }

    // --- Submission ---

    /// Validate and build the command. The error is shown to the user and
    /// the form stays open.
    pub fn submit(&self) -> Result<UserCommand, String> {
        match &self.target {
            FormTarget::WorkPackage(existing) => self.submit_work_package(existing.as_deref()),
            FormTarget::Resource { original, is_new } => self.submit_resource(original, *is_new),
            FormTarget::SprintStart => self.submit_sprint_start(),
        }
    }

    fn submit_work_package(&self, existing: Option<&WorkPackage>) -> Result<UserCommand, String> {
        let base = existing.cloned().unwrap_or_default();
        let record = WorkPackage {
            id: existing.map_or_else(|| self.value("id").to_string(), |wp| wp.id.clone()),
            title: self.required("title", "Title")?,
            aircraft: self.optional("aircraft"),
            ata: self.optional("ata"),
            status: WorkPackageStatus::from(self.optional("status")),
            assigned_to: self.optional("assigned_to"),
            due_date: self.optional("due_date"),
            ..base
        };

        Ok(match existing {
            Some(wp) => UserCommand::UpdateWorkPackage {
                id: wp.key().to_string(),
                patch: Box::new(WorkPackagePatch::from_record(&record)),
            },
            None => UserCommand::CreateWorkPackage(Box::new(record)),
        })
    }

    fn submit_resource(&self, original: &ResourceRecord, is_new: bool) -> Result<UserCommand, String> {
        let id = if is_new {
            self.value("id").to_string()
        } else {
            original.id().to_string()
        };

        let record = match original {
            ResourceRecord::Personnel(_) => ResourceRecord::Personnel(Personnel {
                id,
                name: self.required("name", "Name")?,
                role: self.value("role").to_string(),
                ratings: split_list(self.value("ratings")),
                specializations: split_list(self.value("specializations")),
                shift: self.value("shift").to_string(),
                availability: self.value("availability").to_string(),
                linked_user_id: self.optional("linked_user_id"),
            }),
            ResourceRecord::Tool(t) => ResourceRecord::Tool(Tool {
                id,
                name: self.required("name", "Name")?,
                category: self.value("category").to_string(),
                location: self.value("location").to_string(),
                calibration_due: self.optional("calibration_due"),
                status: if is_new { ToolStatus::Available } else { t.status.clone() },
            }),
            ResourceRecord::Part(_) => ResourceRecord::Part(Part {
                id,
                part_no: self.required("part_no", "Part number")?,
                name: self.required("name", "Name")?,
                ata_chapter: self.value("ata_chapter").to_string(),
                stock_level: self.whole_number("stock_level", "Stock level")?,
                location: self.value("location").to_string(),
                lead_time_days: self.whole_number("lead_time_days", "Lead time")?,
            }),
        };

        Ok(UserCommand::SaveResource {
            record: Box::new(record),
            is_new,
        })
    }

    fn submit_sprint_start(&self) -> Result<UserCommand, String> {
        let duration_days = match self.optional("duration_days") {
            None => None,
            Some(v) => match v.parse::<u32>() {
                Ok(days) if days > 0 => Some(days),
                _ => return Err("Duration must be a positive number of days".into()),
            },
        };
        Ok(UserCommand::StartSprint(SprintStartForm {
            name: self.value("name").to_string(),
            goal: self.value("goal").to_string(),
            start_date: self.value("start_date").to_string(),
            end_date: self.value("end_date").to_string(),
            duration_days,
        }))
    }

    /// Blank reads as 0.
    fn whole_number(&self, key: &str, label: &str) -> Result<i64, String> {
        match self.value(key) {
            "" => Ok(0),
            v => v
                .parse::<i64>()
                .map_err(|_| format!("{label} must be a whole number")),
        }
    }
}

fn singular(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Personnel => "technician",
        ResourceKind::Tools => "tool",
        ResourceKind::Parts => "part",
    }
}

// ---------------------------------------------------------------------------
// Text entry and confirmation
// ---------------------------------------------------------------------------

/// Where a line of typed text goes when Enter is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget {
    Question,
    FaultDescription,
    SprintRequest,
}

impl TextTarget {
    pub fn prompt(self) -> &'static str {
        match self {
            TextTarget::Question => "Ask the assistant",
            TextTarget::FaultDescription => "Describe the fault",
            TextTarget::SprintRequest => "Sprint request",
        }
    }

    pub fn command(self, text: String) -> UserCommand {
        match self {
            TextTarget::Question => UserCommand::AskQuestion(text),
            TextTarget::FaultDescription => UserCommand::GeneratePlan(text),
            TextTarget::SprintRequest => UserCommand::SprintRequest(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    pub target: TextTarget,
    pub text: String,
}

/// A pending destructive action waiting for `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirm {
    pub prompt: String,
    pub command: UserCommand,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
