/// Trusted traveler programs whose appointment slots can be probed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ServiceKind {
    /// Global Entry enrollment interviews
    #[default]
    GlobalEntry,
    /// NEXUS enrollment interviews
    Nexus,
    /// Any other name; probed with the Global Entry URL shape
    Other(String),
}

/// Implementation for ServiceKind
impl ServiceKind {
    /// Parses the configured service name, keeping unknown names verbatim
    pub fn from_name(name: &str) -> Self {
        match name {
            "Global Entry" => ServiceKind::GlobalEntry,
            "NEXUS" => ServiceKind::Nexus,
            other => ServiceKind::Other(other.to_string()),
        }
    }

    /// Gets the display name used in notification text
    pub fn name(&self) -> &str {
        match self {
            ServiceKind::GlobalEntry => "Global Entry",
            ServiceKind::Nexus => "NEXUS",
            ServiceKind::Other(name) => name,
        }
    }

    /// Title of an availability notification
    pub fn notification_title(&self) -> String {
        format!("{} Appointment Notification", self.name())
    }

    /// Title of a subscription expiry notification
    pub fn expiration_title(&self) -> String {
        format!("{} Subscription Expired", self.name())
    }

    /// Body of a subscription expiry notification
    pub fn expiration_message(&self) -> String {
        format!("Your {} appointment subscription has expired.", self.name())
    }
}
