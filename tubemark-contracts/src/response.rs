use serde::de::Deserializer;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reply to one command.
///
/// On the wire a completed command is `{success, data}` with `data` always
/// present (possibly `null`); a failed one is `{success: false, error}`.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResponse {
    Completed { success: bool, data: Option<Value> },
    Failed { error: String },
}

impl CommandResponse {
    /// Completed successfully with no payload.
    pub fn done() -> Self {
        CommandResponse::Completed {
            success: true,
            data: None,
        }
    }

    pub fn with_data(data: Value) -> Self {
        CommandResponse::Completed {
            success: true,
            data: Some(data),
        }
    }

    /// A query that ran fine but found nothing, e.g. an untracked video.
    pub fn not_found() -> Self {
        CommandResponse::Completed {
            success: false,
            data: None,
        }
    }

    pub fn failed(error: impl std::fmt::Display) -> Self {
        CommandResponse::Failed {
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandResponse::Completed { success: true, .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            CommandResponse::Completed { data, .. } => data.as_ref(),
            CommandResponse::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CommandResponse::Failed { error } => Some(error),
            CommandResponse::Completed { .. } => None,
        }
    }
}

impl Serialize for CommandResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("CommandResponse", 2)?;
        match self {
            CommandResponse::Completed { success, data } => {
                state.serialize_field("success", success)?;
                state.serialize_field("data", data)?;
            }
            CommandResponse::Failed { error } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for CommandResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ResponseHelper {
            success: bool,
            #[serde(default)]
            data: Option<Value>,
            #[serde(default)]
            error: Option<String>,
        }

        let helper = ResponseHelper::deserialize(deserializer)?;
        Ok(match helper.error {
            Some(error) => CommandResponse::Failed { error },
            None => CommandResponse::Completed {
                success: helper.success,
                data: helper.data,
            },
        })
    }
}
