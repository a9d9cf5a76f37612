use crate::ids::MarkId;

/// A named moment inside a video.
///
/// Two marks are the "same moment" when title and time match; the optional
/// id only exists for marks created since ids were introduced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Mark {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub id: Option<MarkId>,
    pub title: String,
    #[cfg_attr(
        feature = "serde",
        serde(serialize_with = "crate::tracking::seconds::serialize")
    )]
    pub time: f64,
}

impl Mark {
    /// A fresh mark with a generated id.
    pub fn new(title: impl Into<String>, time: f64) -> Self {
        Self {
            id: Some(MarkId::new()),
            title: title.into(),
            time,
        }
    }

    /// A mark without an id, as older stores hold them.
    pub fn untagged(title: impl Into<String>, time: f64) -> Self {
        Self {
            id: None,
            title: title.into(),
            time,
        }
    }

    pub fn same_moment(&self, title: &str, time: f64) -> bool {
        self.title == title && self.time == time
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Mark {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Early stores kept bare offsets in `timestamps`.
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum MarkRepr {
            Full {
                #[serde(default)]
                id: Option<MarkId>,
                #[serde(default)]
                title: String,
                time: f64,
            },
            Offset(f64),
        }

        Ok(match MarkRepr::deserialize(deserializer)? {
            MarkRepr::Full { id, title, time } => Mark { id, title, time },
            MarkRepr::Offset(time) => Mark::untagged(String::new(), time),
        })
    }
}
