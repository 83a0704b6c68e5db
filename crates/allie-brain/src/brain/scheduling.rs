use allie_core::error::{AllieError, Result};
use allie_core::types::ScheduleEvent;
use serde::Deserialize;

use super::Brain;
use crate::service::schedule::{delete_keyword, parse_schedule_prompt, ScheduleCommand};

/// Body of `POST /api/schedule/delete`. `id` wins when both are present.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Brain {
    /// List or add, depending on what the prompt asks for.
    pub async fn handle_schedule(&self, prompt: Option<String>) -> Result<String> {
        let prompt = non_blank(prompt)
            .ok_or_else(|| AllieError::BadRequest("Prompt is required".to_string()))?;

        match parse_schedule_prompt(&prompt) {
            ScheduleCommand::List => self.list_schedule().await,
            ScheduleCommand::Add(reminder) => {
                let event = ScheduleEvent::new(reminder.task, reminder.time, reminder.date);
                self.store.insert(&event).await?;
                tracing::info!(id = %event.id, task = %event.task, "reminder added");
                Ok(format!(
                    "Added \"{}\" at {} on {}.",
                    event.task, event.time, event.date
                ))
            }
            ScheduleCommand::Unparsed => Ok("Could not parse your scheduling command.".to_string()),
        }
    }

    async fn list_schedule(&self) -> Result<String> {
        let events = self.store.list().await?;
        if events.is_empty() {
            return Ok("Your schedule is empty.".to_string());
        }
        let lines: Vec<String> = events.iter().map(ScheduleEvent::summary).collect();
        Ok(format!("Here are your upcoming events:\n\n{}", lines.join("\n")))
    }

    /// Delete by exact id, or by a keyword matched against task text. More
    /// than one match deletes nothing and asks for an id.
    pub async fn handle_schedule_delete(&self, request: DeleteRequest) -> Result<String> {
        if let Some(id) = non_blank(request.id) {
            let id = id.trim();
            return if self.store.delete(id).await? {
                tracing::info!(id, "schedule event deleted");
                Ok("Event deleted successfully.".to_string())
            } else {
                Ok(format!("No event found with ID \"{id}\"."))
            };
        }

        let prompt = non_blank(request.prompt).ok_or_else(|| {
            AllieError::BadRequest("Prompt or id is required to delete an event.".to_string())
        })?;
        let keyword = delete_keyword(&prompt);
        if keyword.is_empty() {
            return Err(AllieError::BadRequest("Tell me which event to delete.".to_string()));
        }

        let matches = self.store.find_by_task(&keyword).await?;
        match matches.as_slice() {
            [] => Ok(format!("No events found containing \"{keyword}\".")),
            [only] => {
                self.store.delete(&only.id).await?;
                tracing::info!(id = %only.id, keyword = %keyword, "schedule event deleted by keyword");
                Ok(format!("Deleted \"{}\".", only.task))
            }
            many => {
                let list: Vec<String> = many
                    .iter()
                    .enumerate()
                    .map(|(i, e)| format!("{}. {} (ID: {})", i + 1, e.summary(), e.id))
                    .collect();
                Ok(format!(
                    "I found multiple matches:\n\n{}\n\nPlease provide the specific ID to delete.",
                    list.join("\n")
                ))
            }
        }
    }
}
