use once_cell::sync::Lazy;
use regex::Regex;

/// Fields pulled out of a "remind me to ..." command.
///
/// `time` and `date` are lowercased and default to `"unspecified"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReminder {
    pub task: String,
    pub time: String,
    pub date: String,
}

/// What a scheduling prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleCommand {
    List,
    Add(ParsedReminder),
    /// Neither a list request nor a reminder with a task.
    Unparsed,
}

pub const UNSPECIFIED: &str = "unspecified";

static LIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)what(['’]| i)?s on my schedule|what(['’]| i)?s my schedule|show schedule|list schedule")
        .expect("valid list regex")
});

static TASK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)remind me to (.+?)(?: at\b| on\b|$)").expect("valid task regex")
});

static TIME_AT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bat (\d{1,2}(?::\d{2})?\s?(?:am|pm)?)").expect("valid time regex")
});

// Without "at", only accept something that reads as a clock time: either a
// colon or an am/pm marker. A bare number is too often part of the task.
static TIME_BARE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}:\d{2}\s?(?:am|pm)?|\d{1,2}\s?(?:am|pm))\b").expect("valid bare time regex")
});

static DATE_ON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bon (today|tomorrow|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .expect("valid date regex")
});

static DATE_BARE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(today|tomorrow|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .expect("valid bare date regex")
});

static DELETE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^delete\s*").expect("valid delete regex"));

static REMOVE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^remove\s*").expect("valid remove regex"));

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

/// Classify a prompt sent to the schedule endpoint. List requests win over
/// reminders.
pub fn parse_schedule_prompt(prompt: &str) -> ScheduleCommand {
    if LIST_RE.is_match(prompt) {
        return ScheduleCommand::List;
    }
    match parse_reminder(prompt) {
        Some(reminder) => ScheduleCommand::Add(reminder),
        None => ScheduleCommand::Unparsed,
    }
}

pub fn parse_reminder(prompt: &str) -> Option<ParsedReminder> {
    let task = TASK_RE
        .captures(prompt)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())?;

    let time = first_capture(&TIME_AT_RE, prompt)
        .or_else(|| first_capture(&TIME_BARE_RE, prompt))
        .unwrap_or_else(|| UNSPECIFIED.to_string());
    let date = first_capture(&DATE_ON_RE, prompt)
        .or_else(|| first_capture(&DATE_BARE_RE, prompt))
        .unwrap_or_else(|| UNSPECIFIED.to_string());

    Some(ParsedReminder { task, time, date })
}

/// Lowercase the prompt and strip a leading "delete" or "remove".
pub fn delete_keyword(prompt: &str) -> String {
    let lowered = prompt.trim().to_lowercase();
    let stripped = DELETE_PREFIX_RE.replace(&lowered, "");
    let stripped = REMOVE_PREFIX_RE.replace(&stripped, "");
    stripped.trim().to_string()
}
