use serde::{Deserialize, Serialize};

pub const CSV_HEADERS: [&str; 6] = [
    "Company Name",
    "Full Description",
    "YC Page",
    "Website",
    "LinkedIn URL",
    "Mentions YC S25",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(rename = "Company Name")]
    pub name: String,
    #[serde(rename = "Full Description")]
    pub description: Option<String>,
    #[serde(rename = "YC Page")]
    pub yc_page: String,
    #[serde(rename = "Website")]
    pub website: Option<String>,
    #[serde(rename = "LinkedIn URL")]
    pub linkedin_url: Option<String>,
    #[serde(rename = "Mentions YC S25", with = "mention_flag")]
    pub mentions_batch: bool,
}

/// A company as it appears on the directory listing, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub yc_page: String,
}

impl ListingEntry {
    pub fn new(name: impl Into<String>, yc_page: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            yc_page: yc_page.into(),
        }
    }
}

/// Stored as `0`/`1`. Reading also tolerates float and boolean renderings.
mod mention_flag {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*flag))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_lowercase().as_str() {
            "" | "0" | "0.0" | "false" => Ok(false),
            "1" | "1.0" | "true" => Ok(true),
            other => Err(de::Error::custom(format!(
                "invalid mention flag: {:?}",
                other
            ))),
        }
    }
}
