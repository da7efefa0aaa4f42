use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NotificationPayload<'a> {
    pub topic: &'a str,
    pub message: &'a str,
    pub title: &'a str,
}
