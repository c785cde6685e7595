//! Repository notification models and `add-notification` validation.
//!
//! A notification ties a registry [`Event`] to a delivery [`Method`]. The
//! registry accepts a handful of flag combinations only, so the raw flag
//! values collected by the CLI go through [`NotificationFlags::validate`]
//! before any request is built:
//!
//! 1. `event` and `method` are both required and must be known values.
//! 2. `vulnerability_found` requires a `level` from 0 to 6.
//! 3. Every other event forbids `level`.
//! 4. The `email` method requires `email`.
//! 5. The `slack` and `webhook` methods require `url`.
//! 6. `repo_push` forbids `ref`.
//! 7. The repository must be given as `namespace/name`.
//!
//! Empty strings count as absent, so `--level=""` behaves like no flag.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::path::RepositoryRef;
use crate::repository::null_as_default;
use crate::validation::ValidationError;

/// Registry lifecycle trigger that fires a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// An image was pushed.
    RepoPush,
    /// A build was queued.
    BuildQueued,
    /// A build started.
    BuildStart,
    /// A build completed successfully.
    BuildSuccess,
    /// A build failed.
    BuildFailure,
    /// A build was cancelled.
    BuildCancelled,
    /// The security scanner found a vulnerability.
    VulnerabilityFound,
}

impl Event {
    /// All events, in the order the registry documents them.
    pub const ALL: [Self; 7] = [
        Self::RepoPush,
        Self::BuildQueued,
        Self::BuildStart,
        Self::BuildSuccess,
        Self::BuildFailure,
        Self::BuildCancelled,
        Self::VulnerabilityFound,
    ];

    /// Returns the wire name of the event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RepoPush => "repo_push",
            Self::BuildQueued => "build_queued",
            Self::BuildStart => "build_start",
            Self::BuildSuccess => "build_success",
            Self::BuildFailure => "build_failure",
            Self::BuildCancelled => "build_cancelled",
            Self::VulnerabilityFound => "vulnerability_found",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Event {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| {
                ValidationError::format(
                    "event",
                    format!("unknown event '{s}', expected one of {}", join_names(&Self::ALL)),
                )
            })
    }
}

/// Delivery channel of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// HTTP POST to an arbitrary URL.
    Webhook,
    /// Slack incoming webhook.
    Slack,
    /// E-mail to a verified address.
    Email,
}

impl Method {
    /// All delivery methods.
    pub const ALL: [Self; 3] = [Self::Webhook, Self::Slack, Self::Email];

    /// Returns the wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Webhook => "webhook",
            Self::Slack => "slack",
            Self::Email => "email",
        }
    }

    /// Whether this method delivers to a URL.
    #[must_use]
    pub const fn needs_url(self) -> bool {
        matches!(self, Self::Webhook | Self::Slack)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| {
                ValidationError::format(
                    "method",
                    format!("unknown method '{s}', expected one of {}", join_names(&Self::ALL)),
                )
            })
    }
}

fn join_names<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Minimum vulnerability severity that fires a `vulnerability_found`
/// notification. `0` is the most severe level, `6` the least.
///
/// Sent to the registry as a string; accepted back as a string or number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VulnerabilityLevel(u8);

impl VulnerabilityLevel {
    /// Highest (least severe) accepted level.
    pub const MAX: u8 = 6;

    /// Creates a level, rejecting values above [`Self::MAX`].
    ///
    /// # Errors
    ///
    /// Returns a range [`ValidationError`] for `level > 6`.
    pub fn new(level: u8) -> Result<Self, ValidationError> {
        if level > Self::MAX {
            return Err(Self::out_of_range(&level.to_string()));
        }
        Ok(Self(level))
    }

    /// Returns the numeric level.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    fn out_of_range(raw: &str) -> ValidationError {
        ValidationError::range(
            "level",
            format!("level must be an integer from 0 to {}, got '{raw}'", Self::MAX),
        )
    }
}

impl fmt::Display for VulnerabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VulnerabilityLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Exactly one digit: no sign, no padding.
        match s.as_bytes() {
            [digit @ b'0'..=b'6'] => Ok(Self(digit - b'0')),
            _ => Err(Self::out_of_range(s)),
        }
    }
}

impl Serialize for VulnerabilityLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VulnerabilityLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelVisitor;

        impl Visitor<'_> for LevelVisitor {
            type Value = VulnerabilityLevel;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a vulnerability level from 0 to 6 as a string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                u8::try_from(v)
                    .map_err(|_| E::custom(VulnerabilityLevel::out_of_range(&v.to_string())))
                    .and_then(|level| VulnerabilityLevel::new(level).map_err(E::custom))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom(VulnerabilityLevel::out_of_range(&v.to_string())))
                    .and_then(|level| self.visit_u64(level))
            }
        }

        deserializer.deserialize_any(LevelVisitor)
    }
}

/// Event-specific filter of a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEventConfig {
    /// Severity threshold, only for `vulnerability_found`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<VulnerabilityLevel>,

    /// Git ref pattern, e.g. `(refs/heads/somebranch)|(refs/tags/sometag)`.
    #[serde(rename = "ref-regex", default, skip_serializing_if = "Option::is_none")]
    pub ref_regex: Option<String>,
}

impl fmt::Display for NotificationEventConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(level) = self.level {
            parts.push(format!("level={level}"));
        }
        if let Some(ref_regex) = &self.ref_regex {
            parts.push(format!("ref-regex={ref_regex}"));
        }
        write_parts(f, &parts)
    }
}

/// Delivery target of a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Destination URL for `webhook` and `slack`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Destination address for `email`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl fmt::Display for NotificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(url) = &self.url {
            parts.push(format!("url={url}"));
        }
        if let Some(email) = &self.email {
            parts.push(format!("email={email}"));
        }
        write_parts(f, &parts)
    }
}

fn write_parts(f: &mut fmt::Formatter<'_>, parts: &[String]) -> fmt::Result {
    if parts.is_empty() {
        f.write_str("-")
    } else {
        f.write_str(&parts.join(","))
    }
}

/// A notification as stored by the registry.
///
/// `event` and `method` stay plain strings: the registry also stores kinds
/// this client never creates (`quay_notification`, `repo_image_expiry`),
/// and listing must not fail on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Server-assigned identifier.
    pub uuid: String,

    /// Optional human-readable title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: Option<String>,

    /// Triggering event, e.g. `repo_push`.
    pub event: String,

    /// Delivery method, e.g. `webhook`.
    pub method: String,

    /// Event filter.
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_config: NotificationEventConfig,

    /// Delivery target.
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: NotificationConfig,

    /// Consecutive delivery failures recorded by the registry.
    #[serde(default)]
    pub number_of_failures: u32,
}

/// Body of `POST .../notification/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateNotificationRequest {
    /// Optional human-readable title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Triggering event.
    pub event: Event,

    /// Delivery method.
    pub method: Method,

    /// Delivery target.
    pub config: NotificationConfig,

    /// Event filter.
    #[serde(rename = "eventConfig")]
    pub event_config: NotificationEventConfig,
}

/// Raw `add-notification` flag values as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationFlags {
    /// `--event`
    pub event: String,
    /// `--method`
    pub method: String,
    /// `--level`
    pub level: Option<String>,
    /// `--ref`
    pub ref_regex: Option<String>,
    /// `--email`
    pub email: Option<String>,
    /// `--url`
    pub url: Option<String>,
    /// `--title`
    pub title: Option<String>,
}

/// A notification request that passed validation, with its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedNotification {
    /// Repository the notification is added to.
    pub repository: RepositoryRef,
    /// Request body ready to send.
    pub request: CreateNotificationRequest,
}

impl NotificationFlags {
    /// Checks the flag combination and builds the creation request.
    ///
    /// Rules are checked in order and the first violation is returned.
    /// Nothing is sent anywhere.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] whose `field` names the offending flag,
    /// or `repository` when `repository` is not `namespace/name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use qucli_core::NotificationFlags;
    ///
    /// let flags = NotificationFlags {
    ///     event: "vulnerability_found".into(),
    ///     method: "email".into(),
    ///     ..Default::default()
    /// };
    ///
    /// let err = flags.validate("koudaiii/qucli").unwrap_err();
    /// assert_eq!(err.field, "level");
    /// ```
    pub fn validate(&self, repository: &str) -> Result<ValidatedNotification, ValidationError> {
        let event_raw = non_empty(Some(&self.event));
        let method_raw = non_empty(Some(&self.method));
        let level = non_empty(self.level.as_ref());
        let ref_regex = non_empty(self.ref_regex.as_ref());
        let email = non_empty(self.email.as_ref());
        let url = non_empty(self.url.as_ref());

        let (Some(event_raw), Some(method_raw)) = (event_raw, method_raw) else {
            let field = if event_raw.is_none() { "event" } else { "method" };
            return Err(ValidationError::required(
                field,
                "add-notification requires both --event and --method",
            ));
        };
        let event: Event = event_raw.parse()?;
        let method: Method = method_raw.parse()?;

        let level = match (event, level) {
            (Event::VulnerabilityFound, None) => {
                return Err(ValidationError::required(
                    "level",
                    "the 'vulnerability_found' event requires --level (0-6, 0 is the most severe)",
                ));
            }
            (Event::VulnerabilityFound, Some(raw)) => Some(raw.parse::<VulnerabilityLevel>()?),
            (other, Some(_)) => {
                return Err(ValidationError::conflict(
                    "level",
                    format!(
                        "--level is only allowed with the 'vulnerability_found' event, not '{other}'"
                    ),
                ));
            }
            (_, None) => None,
        };

        if method == Method::Email && email.is_none() {
            return Err(ValidationError::required(
                "email",
                "the 'email' method requires --email",
            ));
        }

        if method.needs_url() && url.is_none() {
            return Err(ValidationError::required(
                "url",
                format!("the '{method}' method requires --url"),
            ));
        }

        if event == Event::RepoPush && ref_regex.is_some() {
            return Err(ValidationError::conflict(
                "ref",
                "the 'repo_push' event cannot be scoped with --ref",
            ));
        }

        let repository = RepositoryRef::parse(repository)?;

        Ok(ValidatedNotification {
            repository,
            request: CreateNotificationRequest {
                title: non_empty(self.title.as_ref()).map(str::to_string),
                event,
                method,
                config: NotificationConfig {
                    url: url.map(str::to_string),
                    email: email.map(str::to_string),
                },
                event_config: NotificationEventConfig {
                    level,
                    ref_regex: ref_regex.map(str::to_string),
                },
            },
        })
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;
    use serde_json::json;

    fn flags(event: &str, method: &str) -> NotificationFlags {
        NotificationFlags {
            event: event.to_string(),
            method: method.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_repo_push_webhook_accepted() {
        let mut input = flags("repo_push", "webhook");
        input.url = Some("http://x".to_string());

        let validated = input.validate("koudaiii/qucli").unwrap();
        assert_eq!(validated.repository, RepositoryRef::new("koudaiii", "qucli"));
        assert_eq!(validated.request.event, Event::RepoPush);
        assert_eq!(validated.request.method, Method::Webhook);
        assert_eq!(validated.request.config.url.as_deref(), Some("http://x"));
        assert!(validated.request.event_config.level.is_none());
        assert!(validated.request.event_config.ref_regex.is_none());
    }

    #[test]
    fn test_vulnerability_found_email_accepted() {
        let mut input = flags("vulnerability_found", "email");
        input.level = Some("2".to_string());
        input.email = Some("a@b.com".to_string());

        let validated = input.validate("koudaiii/qucli").unwrap();
        assert_eq!(
            validated.request.event_config.level,
            Some(VulnerabilityLevel::new(2).unwrap())
        );
        assert_eq!(validated.request.config.email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_vulnerability_found_without_level_names_level() {
        let err = flags("vulnerability_found", "email")
            .validate("koudaiii/qucli")
            .unwrap_err();
        assert_eq!(err.field, "level");
        assert_eq!(err.kind, ValidationErrorKind::Required);
        assert!(err.to_string().contains("level"));
    }

    #[test]
    fn test_missing_event_or_method() {
        let err = flags("", "webhook").validate("koudaiii/qucli").unwrap_err();
        assert_eq!(err.field, "event");
        assert_eq!(err.kind, ValidationErrorKind::Required);

        let err = flags("repo_push", "").validate("koudaiii/qucli").unwrap_err();
        assert_eq!(err.field, "method");
    }

    #[test]
    fn test_unknown_event_and_method() {
        let err = flags("repo_pull", "webhook").validate("a/b").unwrap_err();
        assert_eq!(err.field, "event");
        assert_eq!(err.kind, ValidationErrorKind::Format);

        let err = flags("repo_push", "pager").validate("a/b").unwrap_err();
        assert_eq!(err.field, "method");
    }

    #[test]
    fn test_level_out_of_range() {
        let mut input = flags("vulnerability_found", "email");
        input.email = Some("a@b.com".to_string());

        input.level = Some("7".to_string());
        let err = input.validate("a/b").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Range);

        input.level = Some("high".to_string());
        assert_eq!(input.validate("a/b").unwrap_err().field, "level");

        input.level = Some("0".to_string());
        assert!(input.validate("a/b").is_ok());
    }

    #[test]
    fn test_level_rejects_sign_and_padding() {
        for raw in ["+2", "02", "-0", " 2", "2 ", "６"] {
            let err = raw.parse::<VulnerabilityLevel>().unwrap_err();
            assert_eq!(err.field, "level", "{raw:?} should be rejected");
            assert_eq!(err.kind, ValidationErrorKind::Range);
        }
        assert_eq!("6".parse::<VulnerabilityLevel>().unwrap().get(), 6);

        let mut input = flags("vulnerability_found", "email");
        input.email = Some("a@b.com".to_string());
        input.level = Some("+2".to_string());
        assert_eq!(input.validate("a/b").unwrap_err().field, "level");
    }

    #[test]
    fn test_level_forbidden_for_other_events() {
        let mut input = flags("build_success", "webhook");
        input.url = Some("http://x".to_string());
        input.level = Some("3".to_string());

        let err = input.validate("a/b").unwrap_err();
        assert_eq!(err.field, "level");
        assert_eq!(err.kind, ValidationErrorKind::Conflict);
    }

    #[test]
    fn test_empty_level_counts_as_absent() {
        let mut input = flags("build_start", "slack");
        input.url = Some("https://hooks.slack.com/services/x".to_string());
        input.level = Some(String::new());

        assert!(input.validate("a/b").is_ok());
    }

    #[test]
    fn test_email_method_requires_email() {
        let err = flags("build_failure", "email").validate("a/b").unwrap_err();
        assert_eq!(err.field, "email");
    }

    #[test]
    fn test_url_methods_require_url() {
        for method in ["slack", "webhook"] {
            let err = flags("build_queued", method).validate("a/b").unwrap_err();
            assert_eq!(err.field, "url");
            assert!(err.message.contains(method));
        }
    }

    #[test]
    fn test_repo_push_rejects_ref() {
        let mut input = flags("repo_push", "webhook");
        input.url = Some("http://x".to_string());
        input.ref_regex = Some("refs/heads/main".to_string());

        let err = input.validate("a/b").unwrap_err();
        assert_eq!(err.field, "ref");
        assert_eq!(err.kind, ValidationErrorKind::Conflict);
    }

    #[test]
    fn test_build_event_accepts_ref() {
        let mut input = flags("build_success", "webhook");
        input.url = Some("http://x".to_string());
        input.ref_regex = Some("(refs/heads/somebranch)|(refs/tags/sometag)".to_string());

        let validated = input.validate("a/b").unwrap();
        assert_eq!(
            validated.request.event_config.ref_regex.as_deref(),
            Some("(refs/heads/somebranch)|(refs/tags/sometag)")
        );
    }

    #[test]
    fn test_repository_checked_last() {
        let mut input = flags("repo_push", "webhook");
        input.url = Some("http://x".to_string());

        let err = input.validate("quay.io/koudaiii/qucli").unwrap_err();
        assert_eq!(err.field, "repository");

        // Flag rules win over a bad path.
        let err = flags("repo_push", "webhook")
            .validate("quay.io/koudaiii/qucli")
            .unwrap_err();
        assert_eq!(err.field, "url");
    }

    #[test]
    fn test_create_request_serialize() {
        let mut input = flags("vulnerability_found", "slack");
        input.level = Some("1".to_string());
        input.url = Some("https://hooks.slack.com/services/x".to_string());
        input.title = Some("scanner".to_string());

        let request = input.validate("a/b").unwrap().request;
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "title": "scanner",
                "event": "vulnerability_found",
                "method": "slack",
                "config": {"url": "https://hooks.slack.com/services/x"},
                "eventConfig": {"level": "1"}
            })
        );
    }

    #[test]
    fn test_create_request_omits_empty_title() {
        let mut input = flags("repo_push", "email");
        input.email = Some("a@b.com".to_string());
        input.title = Some(String::new());

        let value = serde_json::to_value(input.validate("a/b").unwrap().request).unwrap();
        assert!(value.get("title").is_none());
        assert_eq!(value["eventConfig"], json!({}));
    }

    #[test]
    fn test_notification_deserialize() {
        let notification: Notification = serde_json::from_value(json!({
            "uuid": "7b1a5c42-0000-0000-0000-000000000000",
            "title": null,
            "event": "vulnerability_found",
            "method": "email",
            "config": {"email": "a@b.com"},
            "event_config": {"level": 3},
            "number_of_failures": 2
        }))
        .unwrap();

        assert!(notification.title.is_none());
        assert_eq!(notification.event, "vulnerability_found");
        assert_eq!(notification.event_config.level.map(VulnerabilityLevel::get), Some(3));
        assert_eq!(notification.config.to_string(), "email=a@b.com");
        assert_eq!(notification.event_config.to_string(), "level=3");
        assert_eq!(notification.number_of_failures, 2);
    }

    #[test]
    fn test_notification_deserialize_unmanaged_kind() {
        let notification: Notification = serde_json::from_value(json!({
            "uuid": "n-2",
            "title": "expiry",
            "event": "repo_image_expiry",
            "method": "quay_notification",
            "config": {"target": {"name": "koudaiii", "kind": "user"}},
            "event_config": {"days": 7},
            "number_of_failures": 0
        }))
        .unwrap();

        assert_eq!(notification.event, "repo_image_expiry");
        assert_eq!(notification.method, "quay_notification");
        assert_eq!(notification.config.to_string(), "-");
        assert_eq!(notification.event_config.to_string(), "-");
    }

    #[test]
    fn test_notification_deserialize_string_level() {
        let config: NotificationEventConfig =
            serde_json::from_value(json!({"level": "5", "ref-regex": "refs/tags/.*"})).unwrap();
        assert_eq!(config.level, Some(VulnerabilityLevel::new(5).unwrap()));
        assert_eq!(config.ref_regex.as_deref(), Some("refs/tags/.*"));
    }

    #[test]
    fn test_notification_deserialize_rejects_bad_level() {
        let result: Result<NotificationEventConfig, _> =
            serde_json::from_value(json!({"level": 9}));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_configs_display_dash() {
        assert_eq!(NotificationEventConfig::default().to_string(), "-");
        assert_eq!(NotificationConfig::default().to_string(), "-");
    }

    #[test]
    fn test_event_round_trip_names() {
        for event in Event::ALL {
            assert_eq!(event.as_str().parse::<Event>().unwrap(), event);
        }
    }
}
