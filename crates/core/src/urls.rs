//! Endpoint resolution for the two external platforms.
//!
//! Operation identifiers are symbolic names; resolution is a pure lookup
//! over a fixed set. Unknown identifiers resolve to `None` and callers must
//! treat that as an error.

use url::Url;

pub const DEFAULT_HUBSPOT_BASE: &str = "https://api.hubapi.com";
pub const DEFAULT_CLICKUP_BASE: &str = "https://api.clickup.com";

pub const CREATE_CONTACT_HUBSPOT: &str = "CREATE_CONTACT_HUBSPOT";
pub const LIST_CONTACTS_HUBSPOT: &str = "LIST_CONTACTS_HUBSPOT";
pub const CREATE_TASK_CLICKUP: &str = "CREATE_TASK_CLICKUP";
/// Reported when the profile URL cannot be built from the HubSpot base.
pub const CONTACT_PROFILE_HUBSPOT: &str = "CONTACT_PROFILE_HUBSPOT";

/// External platform an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    HubSpot,
    ClickUp,
}

/// Maps operation identifiers to fully-qualified endpoint URLs.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    hubspot_base: String,
    clickup_base: String,
    clickup_list_id: String,
}

impl UrlResolver {
    /// Base URLs are stored without a trailing slash.
    pub fn new(
        hubspot_base: impl Into<String>,
        clickup_base: impl Into<String>,
        clickup_list_id: impl Into<String>,
    ) -> Self {
        Self {
            hubspot_base: trim_base(hubspot_base.into()),
            clickup_base: trim_base(clickup_base.into()),
            clickup_list_id: clickup_list_id.into(),
        }
    }

    pub fn resolve(&self, platform: Platform, operation_id: &str) -> Option<String> {
        match (platform, operation_id) {
            (Platform::HubSpot, CREATE_CONTACT_HUBSPOT) => {
                Some(format!("{}/crm/v3/objects/contacts/", self.hubspot_base))
            }
            (Platform::HubSpot, LIST_CONTACTS_HUBSPOT) => {
                Some(format!("{}/crm/v3/objects/contacts", self.hubspot_base))
            }
            (Platform::ClickUp, CREATE_TASK_CLICKUP) => Some(format!(
                "{}/api/v2/list/{}/task",
                self.clickup_base, self.clickup_list_id
            )),
            _ => None,
        }
    }

    /// Profile endpoint for a single contact.
    ///
    /// The id is pushed as one percent-encoded path segment, so it can never
    /// climb out of the profile path. `None` if the HubSpot base is not a
    /// usable URL.
    pub fn contact_profile(&self, contact_id: &str) -> Option<String> {
        let mut url = Url::parse(&format!("{}/contacts/v1/contact/vid", self.hubspot_base)).ok()?;
        url.path_segments_mut()
            .ok()?
            .push(contact_id)
            .push("profile");
        Some(url.into())
    }
}

fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}
